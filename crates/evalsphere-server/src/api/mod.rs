pub mod agents;
pub mod auth;
pub mod canvas;
pub mod evaluations;
pub mod executions;
pub mod response;
pub mod state;
pub mod suites;
pub mod workflows;

pub use response::ApiResponse;
