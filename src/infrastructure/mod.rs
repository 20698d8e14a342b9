// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod event_stream;
pub mod firestore_store;
pub mod firestore_value;
pub mod http_response;
pub mod json_store;
pub mod memory_store;
pub mod store_error;
