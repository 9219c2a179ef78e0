// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/core/src/error.rs
use thiserror::Error;

/// Errors raised by the parameter store.
///
/// Every validation failure names the parameter and the offending value so a
/// CLI layer can print it as-is.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value set for {name}: {value} is out of bounds [{min}, {max}]")]
    OutOfBounds {
        name: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Invalid value set for {name}: {value} is not a valid option for this parameter. Valid options are: {options}")]
    InvalidOption {
        name: String,
        value: String,
        options: String,
    },

    #[error("Invalid value set for {name}: {value} is an invalid option for {enum_name}. Valid options are: {options}")]
    InvalidEnumValue {
        name: String,
        value: String,
        enum_name: String,
        options: String,
    },

    #[error("Type mismatch for {name}: expected {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Cannot parse '{value}' for {name}: expected {expected}")]
    ParseValue {
        name: String,
        value: String,
        expected: String,
    },

    #[error("Unknown parameter: {path}")]
    UnknownParameter { path: String },

    #[error("Duplicate name '{name}' in {scope}")]
    DuplicateName { name: String, scope: String },

    #[error("Invalid schema for {name}: {message}")]
    InvalidSchema { name: String, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// True for the errors produced by rejecting a candidate value.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConfigError::OutOfBounds { .. }
                | ConfigError::InvalidOption { .. }
                | ConfigError::InvalidEnumValue { .. }
                | ConfigError::TypeMismatch { .. }
                | ConfigError::ParseValue { .. }
        )
    }

    /// Replace the parameter name of a validation error with its dotted path.
    pub(crate) fn at_path(self, path: &str) -> Self {
        let path = path.to_string();
        match self {
            ConfigError::OutOfBounds { value, min, max, .. } => ConfigError::OutOfBounds { name: path, value, min, max },
            ConfigError::InvalidOption { value, options, .. } => ConfigError::InvalidOption { name: path, value, options },
            ConfigError::InvalidEnumValue {
                value,
                enum_name,
                options,
                ..
            } => ConfigError::InvalidEnumValue {
                name: path,
                value,
                enum_name,
                options,
            },
            ConfigError::TypeMismatch { expected, found, .. } => ConfigError::TypeMismatch { name: path, expected, found },
            ConfigError::ParseValue { value, expected, .. } => ConfigError::ParseValue { name: path, value, expected },
            other => other,
        }
    }

    pub(crate) fn invalid_schema(name: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidSchema {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn type_mismatch(name: &str, expected: &str, found: &str) -> Self {
        ConfigError::TypeMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn parse_value(name: &str, value: &str, expected: &str) -> Self {
        ConfigError::ParseValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message_names_parameter_and_bounds() {
        let err = ConfigError::OutOfBounds {
            name: "batch_size".to_string(),
            value: "0".to_string(),
            min: "1".to_string(),
            max: "512".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("batch_size"));
        assert!(msg.contains("0 is out of bounds [1, 512]"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_structural_errors_are_not_validation() {
        let err = ConfigError::UnknownParameter {
            path: "dataset.nope".to_string(),
        };
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Unknown parameter: dataset.nope");
    }

    #[test]
    fn test_at_path_renames_validation_errors_only() {
        let err = ConfigError::parse_value("num_workers", "x", "integer").at_path("dataset.num_workers");
        assert_eq!(err.to_string(), "Cannot parse 'x' for dataset.num_workers: expected integer");

        let err = ConfigError::UnknownParameter { path: "a.b".to_string() }.at_path("c.d");
        assert_eq!(err.to_string(), "Unknown parameter: a.b");
    }
}
