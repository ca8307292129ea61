//! Input validation utilities
//!
//! Field-level validation used at the web boundary. Rules are collected on a
//! [`Validator`] and applied to a map of raw field values; every failing rule
//! is reported, not just the first.
//!
//! # Usage
//!
//! ```rust
//! use iptv_device_api::utils::validation::{Validator, ValidationRule};
//! use std::collections::HashMap;
//!
//! let validator = Validator::new()
//!     .rule(ValidationRule::required("m3u_url"))
//!     .rule(ValidationRule::playlist_url("m3u_url"))
//!     .rule(ValidationRule::max_length("name", 100));
//!
//! let mut data = HashMap::new();
//! data.insert("m3u_url".to_string(), Some("http://example.com/tv.m3u".to_string()));
//! data.insert("name".to_string(), Some("Living room".to_string()));
//! assert!(validator.validate(&data).is_ok());
//! ```

use std::collections::HashMap;
use thiserror::Error;

use crate::utils::url::UrlUtils;

/// Validation errors that can occur during input validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is required but missing or empty
    #[error("Field '{field}' is required")]
    Required { field: String },

    /// Field value is too long
    #[error("Field '{field}' must be at most {max} characters long (got {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    /// Field value is not an absolute http(s) URL
    #[error("Field '{field}' must be a valid http or https URL")]
    InvalidUrl { field: String },

    /// Custom validation error
    #[error("Field '{field}': {message}")]
    Custom { field: String, message: String },
}

impl ValidationError {
    /// Name of the field the error refers to
    pub fn field(&self) -> &str {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::InvalidUrl { field }
            | Self::Custom { field, .. } => field,
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

/// A validation rule that can be applied to a field
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// Field is required (not None, not blank)
    Required(String),

    /// Field must be at most max characters long (after trimming)
    MaxLength { field: String, max: usize },

    /// Field must pass the playlist URL boundary check
    PlaylistUrl(String),

    /// Custom validation function
    Custom {
        field: String,
        validator: fn(&str) -> Result<(), String>,
    },
}

impl ValidationRule {
    /// Create a required field rule
    pub fn required<S: Into<String>>(field: S) -> Self {
        Self::Required(field.into())
    }

    /// Create a maximum length rule
    pub fn max_length<S: Into<String>>(field: S, max: usize) -> Self {
        Self::MaxLength {
            field: field.into(),
            max,
        }
    }

    /// Create a playlist URL rule
    pub fn playlist_url<S: Into<String>>(field: S) -> Self {
        Self::PlaylistUrl(field.into())
    }

    /// Create a custom validation rule
    pub fn custom<S: Into<String>>(field: S, validator: fn(&str) -> Result<(), String>) -> Self {
        Self::Custom {
            field: field.into(),
            validator,
        }
    }
}

/// Validator that applies multiple validation rules
#[derive(Debug, Default)]
pub struct Validator {
    rules: Vec<ValidationRule>,
}

impl Validator {
    /// Create a new empty validator
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a validation rule
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate a map of field values
    ///
    /// Non-required rules skip fields that are missing or blank, so pair them
    /// with [`ValidationRule::required`] when the field is mandatory.
    pub fn validate(&self, data: &HashMap<String, Option<String>>) -> ValidationResult<()> {
        let errors: Vec<ValidationError> = self
            .rules
            .iter()
            .filter_map(|rule| Self::apply_rule(rule, data).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn present<'a>(data: &'a HashMap<String, Option<String>>, field: &str) -> Option<&'a str> {
        data.get(field)
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn apply_rule(
        rule: &ValidationRule,
        data: &HashMap<String, Option<String>>,
    ) -> Result<(), ValidationError> {
        match rule {
            ValidationRule::Required(field) => match Self::present(data, field) {
                Some(_) => Ok(()),
                None => Err(ValidationError::Required {
                    field: field.clone(),
                }),
            },

            ValidationRule::MaxLength { field, max } => match Self::present(data, field) {
                Some(value) if value.chars().count() > *max => Err(ValidationError::TooLong {
                    field: field.clone(),
                    max: *max,
                    actual: value.chars().count(),
                }),
                _ => Ok(()),
            },

            ValidationRule::PlaylistUrl(field) => match Self::present(data, field) {
                Some(value) if !UrlUtils::is_valid(value) => Err(ValidationError::InvalidUrl {
                    field: field.clone(),
                }),
                _ => Ok(()),
            },

            ValidationRule::Custom { field, validator } => match Self::present(data, field) {
                Some(value) => validator(value).map_err(|message| ValidationError::Custom {
                    field: field.clone(),
                    message,
                }),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, Option<&str>)]) -> HashMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_required_validation() {
        let data = data(&[("name", Some("test")), ("empty", Some("  ")), ("missing", None)]);

        let validator = Validator::new()
            .rule(ValidationRule::required("name"))
            .rule(ValidationRule::required("empty"))
            .rule(ValidationRule::required("missing"))
            .rule(ValidationRule::required("absent"));

        let errors = validator.validate(&data).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::Required { .. })));
    }

    #[test]
    fn test_max_length_counts_characters() {
        let data = data(&[("short", Some("ünïcödé")), ("long", Some("this is a very long string"))]);

        let validator = Validator::new()
            .rule(ValidationRule::max_length("short", 7))
            .rule(ValidationRule::max_length("long", 10));

        let errors = validator.validate(&data).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::TooLong {
                field: "long".to_string(),
                max: 10,
                actual: 26
            }]
        );
    }

    #[test]
    fn test_playlist_url_validation() {
        let data = data(&[
            ("valid", Some("https://example.com/tv.m3u")),
            ("invalid", Some("not-a-url")),
            ("wrong_scheme", Some("ftp://example.com/tv.m3u")),
        ]);

        let validator = Validator::new()
            .rule(ValidationRule::playlist_url("valid"))
            .rule(ValidationRule::playlist_url("invalid"))
            .rule(ValidationRule::playlist_url("wrong_scheme"));

        let errors = validator.validate(&data).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec!["invalid", "wrong_scheme"]);
    }

    #[test]
    fn test_custom_validation_skips_missing_fields() {
        fn digits_only(value: &str) -> Result<(), String> {
            if value.chars().all(|c| c.is_ascii_digit()) {
                Ok(())
            } else {
                Err("must contain only digits".to_string())
            }
        }

        let validator = Validator::new()
            .rule(ValidationRule::custom("pin", digits_only))
            .rule(ValidationRule::custom("other", digits_only));

        assert!(validator.validate(&data(&[("pin", Some("1234"))])).is_ok());

        let errors = validator.validate(&data(&[("pin", Some("12a4"))])).unwrap_err();
        assert_eq!(errors[0].to_string(), "Field 'pin': must contain only digits");
    }
}
