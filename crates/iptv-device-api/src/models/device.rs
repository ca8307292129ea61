//! Device registration payloads
//!
//! Devices are identified by their MAC address and point at an M3U playlist.
//! This module owns the boundary validation for those payloads: MAC address
//! normalization, device type parsing and the playlist URL precondition.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use utoipa::ToSchema;

use crate::utils::url::UrlUtils;
use crate::utils::validation::{ValidationError, ValidationResult, ValidationRule, Validator};

/// Maximum length of a device display name
pub const MAX_DEVICE_NAME_LENGTH: usize = 100;

static MAC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5}|[0-9A-Fa-f]{2}(?:-[0-9A-Fa-f]{2}){5}|[0-9A-Fa-f]{4}(?:\.[0-9A-Fa-f]{4}){2}|[0-9A-Fa-f]{12})$",
    )
    .expect("MAC address pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid MAC address '{0}'")]
pub struct InvalidMacAddress(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid device type '{0}' (expected one of: android, ios, smart_tv, mag, web, other)")]
pub struct InvalidDeviceType(String);

/// A 48-bit MAC address, displayed as `AA:BB:CC:DD:EE:FF`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl FromStr for MacAddress {
    type Err = InvalidMacAddress;

    /// Accepts `AA:BB:CC:DD:EE:FF`, `aa-bb-cc-dd-ee-ff`, `aabb.ccdd.eeff` and
    /// `aabbccddeeff`; mixed separators are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !MAC_PATTERN.is_match(trimmed) {
            return Err(InvalidMacAddress(s.to_string()));
        }

        let digits: String = trimmed.chars().filter(char::is_ascii_hexdigit).collect();
        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| InvalidMacAddress(s.to_string()))?;
        }

        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Kind of client device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Android,
    Ios,
    SmartTv,
    Mag,
    Web,
    Other,
}

impl FromStr for DeviceType {
    type Err = InvalidDeviceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "android" => Ok(DeviceType::Android),
            "ios" => Ok(DeviceType::Ios),
            "smart_tv" | "smarttv" => Ok(DeviceType::SmartTv),
            "mag" => Ok(DeviceType::Mag),
            "web" => Ok(DeviceType::Web),
            "other" => Ok(DeviceType::Other),
            _ => Err(InvalidDeviceType(s.to_string())),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Android => write!(f, "android"),
            DeviceType::Ios => write!(f, "ios"),
            DeviceType::SmartTv => write!(f, "smart_tv"),
            DeviceType::Mag => write!(f, "mag"),
            DeviceType::Web => write!(f, "web"),
            DeviceType::Other => write!(f, "other"),
        }
    }
}

/// Raw device payload as submitted by a client
///
/// Every field is optional at the JSON level so that missing fields are
/// reported alongside other field errors instead of as a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeviceRegistrationRequest {
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub m3u_url: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A device payload that passed validation, in normalized form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidatedDevice {
    #[schema(value_type = String, example = "AA:BB:CC:DD:EE:FF")]
    pub mac_address: MacAddress,
    pub m3u_url: String,
    pub device_type: DeviceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn check_mac_address(value: &str) -> Result<(), String> {
    MacAddress::from_str(value)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn check_device_type(value: &str) -> Result<(), String> {
    DeviceType::from_str(value)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

impl DeviceRegistrationRequest {
    fn fields(&self) -> HashMap<String, Option<String>> {
        HashMap::from([
            ("mac_address".to_string(), self.mac_address.clone()),
            ("m3u_url".to_string(), self.m3u_url.clone()),
            ("device_type".to_string(), self.device_type.clone()),
            ("name".to_string(), self.name.clone()),
        ])
    }

    /// Validate every field and return the normalized device
    ///
    /// All failing fields are reported together.
    pub fn validate(&self) -> ValidationResult<ValidatedDevice> {
        Validator::new()
            .rule(ValidationRule::required("mac_address"))
            .rule(ValidationRule::custom("mac_address", check_mac_address))
            .rule(ValidationRule::required("m3u_url"))
            .rule(ValidationRule::playlist_url("m3u_url"))
            .rule(ValidationRule::required("device_type"))
            .rule(ValidationRule::custom("device_type", check_device_type))
            .rule(ValidationRule::max_length("name", MAX_DEVICE_NAME_LENGTH))
            .validate(&self.fields())?;

        let field_error = |field: &str, message: String| {
            vec![ValidationError::Custom {
                field: field.to_string(),
                message,
            }]
        };

        let mac_address = MacAddress::from_str(self.mac_address.as_deref().unwrap_or_default())
            .map_err(|e| field_error("mac_address", e.to_string()))?;
        let device_type = DeviceType::from_str(self.device_type.as_deref().unwrap_or_default())
            .map_err(|e| field_error("device_type", e.to_string()))?;
        let m3u_url = UrlUtils::parse_playlist_url(self.m3u_url.as_deref().unwrap_or_default())
            .map_err(|e| field_error("m3u_url", e.to_string()))?;

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(ValidatedDevice {
            mac_address,
            m3u_url: m3u_url.to_string(),
            device_type,
            name,
        })
    }
}
