pub mod client;
pub mod error;
pub mod jsonapi;

pub use client::ApiClient;
pub use error::{ApiHttpError, ApiHttpErrorKind};
