//! Stateless HTTP relay and browser identity generator.

pub mod error;
pub mod forward;
pub mod identity;
pub mod models;
pub mod payload;

pub use error::{RelayError, Result};
pub use forward::{Relay, DEFAULT_TIMEOUT_MS};
pub use models::{ContentType, ForwardRequest, ForwardResult, Method};
pub use payload::Payload;
