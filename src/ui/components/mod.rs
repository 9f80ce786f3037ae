pub mod chat_area;
pub mod compose_bar;
pub mod notice_panel;
