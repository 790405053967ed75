use glam::{Mat4, Vec3};
use glow::HasContext;

use super::camera::PerspectiveCamera;
use super::mesh::MeshData;
use crate::state::preview::PreviewScene;

// ── Per-frame data ───────────────────────────────────────────

/// Everything the GL side needs for one frame, captured on the UI thread
#[derive(Clone, Copy)]
pub struct FrameData {
    pub view_projection: Mat4,
    pub model: Mat4,
    pub camera_position: Vec3,
    pub background: [f32; 3],
    pub ambient: [f32; 3],
    /// Light colour premultiplied by intensity
    pub light_color: [f32; 3],
    /// World-space direction towards the light
    pub light_dir: Vec3,
    pub specular: [f32; 3],
    pub shininess: f32,
    pub has_mesh: bool,
}

impl FrameData {
    pub fn capture(scene: &PreviewScene, camera: &PerspectiveCamera) -> Self {
        let light = &scene.directional;
        let light_color = light.color.map(|c| c * light.intensity);
        let (model, specular, shininess) = match &scene.mesh {
            Some(mesh) => (mesh.model_matrix(), mesh.material.specular, mesh.material.shininess),
            None => (Mat4::IDENTITY, [0.0; 3], 1.0),
        };

        Self {
            view_projection: camera.view_projection(),
            model,
            camera_position: camera.position,
            background: scene.background,
            ambient: scene.ambient.color,
            light_color,
            light_dir: light.position.normalize_or_zero(),
            specular,
            shininess,
            has_mesh: scene.mesh.is_some(),
        }
    }
}

// ── GPU mesh handle ──────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    program: glow::Program,
    mesh: Option<GpuMesh>,
    /// Preview generation the uploaded mesh belongs to
    mesh_generation: Option<u64>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let program = compile_program(gl, PHONG_VERT, PHONG_FRAG)?;
        Ok(Self {
            program,
            mesh: None,
            mesh_generation: None,
        })
    }

    pub fn mesh_generation(&self) -> Option<u64> {
        self.mesh_generation
    }

    /// Upload the preview mesh once per preview generation
    pub fn sync_mesh(&mut self, gl: &glow::Context, data: Option<&MeshData>, generation: u64) {
        if self.mesh_generation == Some(generation) {
            return;
        }
        self.mesh_generation = Some(generation);

        if let Some(old) = self.mesh.take() {
            delete_mesh(gl, &old);
        }

        if let Some(data) = data {
            match upload_mesh(gl, data) {
                Ok(mesh) => self.mesh = Some(mesh),
                Err(e) => tracing::error!("Failed to upload preview mesh: {e}"),
            }
        }
    }

    /// Render one frame into `viewport` = [x, y, width, height] in pixels
    pub fn paint(&self, gl: &glow::Context, frame: &FrameData, viewport: [i32; 4]) {
        unsafe {
            gl.viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
            gl.scissor(viewport[0], viewport[1], viewport[2], viewport[3]);
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(frame.background[0], frame.background[1], frame.background[2], 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            if let (true, Some(mesh)) = (frame.has_mesh, self.mesh.as_ref()) {
                gl.enable(glow::DEPTH_TEST);
                gl.depth_func(glow::LESS);

                gl.use_program(Some(self.program));
                set_uniform_mat4(gl, self.program, "u_view_proj", &frame.view_projection);
                set_uniform_mat4(gl, self.program, "u_model", &frame.model);
                set_uniform_vec3(gl, self.program, "u_camera_pos", frame.camera_position.to_array());
                set_uniform_vec3(gl, self.program, "u_ambient", frame.ambient);
                set_uniform_vec3(gl, self.program, "u_light_color", frame.light_color);
                set_uniform_vec3(gl, self.program, "u_light_dir", frame.light_dir.to_array());
                set_uniform_vec3(gl, self.program, "u_specular", frame.specular);
                let loc = gl.get_uniform_location(self.program, "u_shininess");
                gl.uniform_1_f32(loc.as_ref(), frame.shininess);

                gl.bind_vertex_array(Some(mesh.vao));
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
                gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
                gl.bind_vertex_array(None);

                gl.use_program(None);
                gl.disable(glow::DEPTH_TEST);
            }

            gl.disable(glow::SCISSOR_TEST);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
        }
        if let Some(mesh) = self.mesh.take() {
            delete_mesh(gl, &mesh);
        }
        self.mesh_generation = None;
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 9 * 4; // 9 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let vert = gl.create_shader(glow::VERTEX_SHADER)?;
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER)?;
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !linked {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("Program link error: {log}"));
        }

        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: [f32; 3]) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v[0], v[1], v[2]);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const PHONG_VERT: &str = r#"#version 330 core
uniform mat4 u_view_proj;
uniform mat4 u_model;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_world_pos;
out vec3 v_normal;
out vec3 v_color;

void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    gl_Position = u_view_proj * world;
    v_world_pos = world.xyz;
    v_normal = mat3(u_model) * a_normal;
    v_color = a_color;
}
"#;

// Blinn-Phong: ambient + one directional light
const PHONG_FRAG: &str = r#"#version 330 core
uniform vec3 u_camera_pos;
uniform vec3 u_ambient;
uniform vec3 u_light_color;
uniform vec3 u_light_dir;
uniform vec3 u_specular;
uniform float u_shininess;

in vec3 v_world_pos;
in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_pos);
    vec3 half_dir = normalize(u_light_dir + view_dir);

    float diffuse = max(dot(n, u_light_dir), 0.0);
    float highlight = diffuse > 0.0 ? pow(max(dot(n, half_dir), 0.0), u_shininess) : 0.0;

    vec3 color = v_color * (u_ambient + u_light_color * diffuse) + u_specular * u_light_color * highlight;
    frag_color = vec4(color, 1.0);
}
"#;
