// Domain layer - plain data shared by every other layer
pub mod dashboard;
pub mod format;
pub mod layout;
pub mod metric;
pub mod records;
pub mod scene;
pub mod settings;
pub mod snapshot;
pub mod widget;
