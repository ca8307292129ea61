//! Centralized error handling for the IPTV device API
//!
//! This module provides the error types shared by the configuration layer,
//! the playlist probing client and the web layer.
//!
//! # Error Categories
//!
//! - **Probe Errors**: outbound HTTP failures while probing a playlist URL
//! - **Validation Errors**: input validation and business rule violations
//! - **Web Errors**: HTTP request/response handling issues
//!
//! Playlist verdict failures (missing header, no channels, ...) are not errors:
//! they are reported as data inside a [`crate::models::ValidationVerdict`].
//!
//! # Usage
//!
//! ```rust
//! use iptv_device_api::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::validation("url must not be empty"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for playlist probe Results
pub type ProbeResult<T> = Result<T, ProbeError>;
