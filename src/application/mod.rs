//! Application layer - Use cases and orchestration.
//!
//! Services depend on domain ports (traits) rather than concrete store
//! implementations.

pub mod services;

pub use services::SearchService;
