//! Web handlers module
//!
//! HTTP request handlers organized by domain. Handlers stay thin and hand the
//! actual work to the service layer.

pub mod devices;
pub mod health;
pub mod playlists;
