//! Service layer
//!
//! Services orchestrate outbound work for the web handlers. They hold no
//! per-request state and are shared across requests behind an `Arc`.

pub mod playlist_validator;

pub use playlist_validator::{PlaylistValidator, PlaylistValidatorSettings};
