pub mod auth;
pub mod logging;

pub use auth::webhook_secret_auth;
pub use logging::{request_logger, REQUEST_ID_HEADER};
