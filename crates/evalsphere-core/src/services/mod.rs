//! Clients for the external services and interpretation of their responses.

pub mod backend;
pub mod evaluation;

pub use backend::{BackendClient, BackendConfig, BackendError, BackendResult, CsvUpload};
pub use evaluation::interpret_response;
