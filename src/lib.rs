// Widget-driven dashboard and analytics engine
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
