pub mod config;
pub mod document_store;

pub use config::{AppConfig, ConfigError, StoreBackend, SupabaseConfig};
pub use document_store::{InMemoryDocumentStore, SupabaseDocumentStore};
