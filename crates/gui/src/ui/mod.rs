pub mod chat_panel;
pub mod preview_window;
pub mod sidebar;
pub mod upload_window;
