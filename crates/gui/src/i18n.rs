use std::sync::atomic::{AtomicU8, Ordering};

use crate::state::Language;

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Language {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Language::Ru,
        _ => Language::En,
    }
}

pub fn set_lang(l: Language) {
    CURRENT_LANG.store(
        match l {
            Language::En => 0,
            Language::Ru => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Language::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.new_chat" => if ru { "Новый чат  Ctrl+N" } else { "New chat  Ctrl+N" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },
        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.sidebar" => if ru { "Боковая панель" } else { "Sidebar" },
        "menu.preview" => if ru { "3D превью" } else { "3D preview" },
        "menu.upload" => if ru { "Загрузить модель..." } else { "Upload model..." },
        "menu.settings" => if ru { "Настройки" } else { "Settings" },
        "menu.preferences" => if ru { "Параметры..." } else { "Preferences..." },
        "menu.language" => if ru { "Язык" } else { "Language" },

        // ── Settings window ─────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },
        "settings.backend" => if ru { "Адрес бэкенда" } else { "Backend address" },
        "settings.apply" => if ru { "Применить" } else { "Apply" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },
        "settings.rotation_step" => if ru { "Скорость вращения" } else { "Rotation speed" },
        "settings.save" => if ru { "Сохранить" } else { "Save" },

        // ── Sidebar ─────────────────────────────────────────
        "sidebar.new_chat" => if ru { "+ Новый чат" } else { "+ New chat" },
        "sidebar.tools" => if ru { "Инструменты" } else { "Tools" },
        "sidebar.quick_actions" => if ru { "Быстрые действия" } else { "Quick actions" },
        "sidebar.context" => if ru { "Контекст" } else { "Context" },
        "action.upload" => if ru { "Загрузить 3D" } else { "Upload 3D" },
        "action.generate" => if ru { "Сгенерировать код" } else { "Generate code" },
        "action.optimize" => if ru { "Оптимизировать" } else { "Optimize" },
        "action.analyze" => if ru { "Анализ производительности" } else { "Analyze performance" },
        "action.preview" => if ru { "3D превью" } else { "3D preview" },
        "qa.rotating_cube" => if ru { "Вращающийся куб" } else { "Rotating cube" },
        "qa.orbit_controls" => if ru { "OrbitControls" } else { "Orbit controls" },
        "qa.load_gltf" => if ru { "Загрузка GLTF" } else { "Load a GLTF model" },
        "qa.particles" => if ru { "Система частиц" } else { "Particle system" },

        // ── Chat panel ──────────────────────────────────────
        "chat.welcome_title" => if ru { "Three.js AI ассистент" } else { "Three.js AI Assistant" },
        "chat.welcome_body" => if ru {
            "Спросите про сцены, материалы, шейдеры или производительность."
        } else {
            "Ask about scenes, materials, shaders or performance."
        },
        "chat.suggestions" => if ru { "Попробуйте:" } else { "Try:" },
        "chat.ask" => if ru { "Спросите про Three.js..." } else { "Ask about Three.js..." },
        "chat.send_tip" => if ru { "Отправить (Enter)" } else { "Send (Enter)" },
        "chat.you" => if ru { "Вы" } else { "You" },
        "chat.copy" => if ru { "Копировать" } else { "Copy" },
        "chat.typing" => if ru { "AI печатает..." } else { "AI is typing..." },
        "chat.code" => if ru { "код" } else { "code" },

        // ── Preview window ──────────────────────────────────
        "preview.title" => if ru { "3D превью" } else { "3D Preview" },
        "preview.pause" => if ru { "⏸ Пауза" } else { "⏸ Pause Rotation" },
        "preview.rotate" => if ru { "⟳ Вращать" } else { "⟳ Auto Rotate" },
        "preview.reset" => if ru { "Сбросить вид" } else { "Reset View" },
        "preview.no_gl" => if ru { "OpenGL недоступен" } else { "OpenGL is not available" },

        // ── Upload window ───────────────────────────────────
        "upload.title" => if ru { "Загрузка 3D модели" } else { "Upload 3D Model" },
        "upload.drop_hint" => if ru { "Перетащите файл сюда" } else { "Drop your file here" },
        "upload.formats" => if ru { "GLTF, GLB, OBJ, FBX" } else { "GLTF, GLB, OBJ, FBX" },
        "upload.browse" => if ru { "Выбрать файл..." } else { "Browse files..." },
        "upload.last" => if ru { "Последний файл:" } else { "Last file:" },

        _ => "???",
    }
}
