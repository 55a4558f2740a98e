//! Request extractors and response bodies shared by all routes

pub mod envelope;
pub mod error;
pub mod json;
pub mod query;

pub use envelope::Envelope;
pub use error::ApiError;
pub use json::Json;
pub use query::Query;
