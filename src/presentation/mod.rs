// Presentation layer - HTTP shell, page controllers and chart rendering
pub mod app_state;
pub mod charts;
pub mod handlers;
pub mod page_controller;
