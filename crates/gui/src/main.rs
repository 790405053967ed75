mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::markup`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use three_ai_lib::backend;
pub use three_ai_lib::markup;
pub use three_ai_lib::state;

use std::sync::Arc;

use app::ThreeAiApp;
use backend::HttpBackend;
use state::chat::ChatState;
use state::{AppSettings, AppState};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "three_ai=info,three_ai_lib=info".into()),
        )
        .init();

    let mut settings = AppSettings::load();
    if let Some(url) = parse_backend_arg() {
        settings.apply_backend_override(&url);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start tokio runtime: {e}");
            return;
        }
    };

    tracing::info!("Using backend {}", settings.backend.base_url);
    let backend = Arc::new(HttpBackend::new(&settings.backend.base_url));
    let chat = ChatState::new(
        backend,
        runtime.handle().clone(),
        settings.chat.default_context.clone(),
    );
    let state = AppState::new(chat, settings);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Three.js AI Assistant")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "three-ai",
        native_options,
        Box::new(move |cc| Ok(Box::new(ThreeAiApp::new(cc, state, runtime)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_backend_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--backend" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}
