// Application layer - Use cases, registries and repository ports
pub mod aggregators;
pub mod layout_store;
pub mod registry;
pub mod settings_repository;
pub mod source_feed;
