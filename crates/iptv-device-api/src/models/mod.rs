//! Domain models
//!
//! - [`validation`]: playlist validation requests and verdicts
//! - [`device`]: device registration payloads and their boundary validation

pub mod device;
pub mod validation;

pub use device::{DeviceRegistrationRequest, DeviceType, MacAddress, ValidatedDevice};
pub use validation::{
    PlaylistFormat, ValidatePlaylistRequest, ValidationFailure, ValidationMode, ValidationVerdict,
};
