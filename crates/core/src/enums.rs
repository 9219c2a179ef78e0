// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/core/src/enums.rs
//
// Closed sets of string tokens used by enum parameters.
//
use crate::error::{ConfigError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A named, closed set of tokens in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumOptions {
    name: String,
    values: Vec<String>,
}

impl EnumOptions {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ConfigError::invalid_schema(&name, "enum has no values"));
        }
        for (i, v) in values.iter().enumerate() {
            if values[..i].contains(v) {
                return Err(ConfigError::DuplicateName {
                    name: v.clone(),
                    scope: format!("enum {}", name),
                });
            }
        }
        Ok(Self { name, values })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.iter().any(|v| v == token)
    }

    /// Comma-separated list of valid tokens, for error messages.
    pub fn describe(&self) -> String {
        self.values.join(", ")
    }

    /// Coerce a canonical token into a typed value of this enum.
    pub fn parse(&self, token: &str) -> Result<EnumValue> {
        self.coerce(&self.name, EnumInput::Token(token.to_string()))
    }

    pub fn value_at(&self, index: usize) -> Option<EnumValue> {
        self.values.get(index).map(|token| EnumValue {
            enum_name: self.name.clone(),
            token: token.clone(),
        })
    }

    /// Coerce a token or typed value on behalf of parameter `param`.
    ///
    /// Typed values must belong to this enum; their token is kept as-is.
    pub(crate) fn coerce(&self, param: &str, input: EnumInput) -> Result<EnumValue> {
        let (token, foreign) = match input {
            EnumInput::Token(token) => (token, false),
            EnumInput::Typed(value) => {
                let foreign = value.enum_name != self.name;
                (value.token, foreign)
            }
        };
        if foreign || !self.contains(&token) {
            return Err(ConfigError::InvalidEnumValue {
                name: param.to_string(),
                value: token,
                enum_name: self.name.clone(),
                options: self.describe(),
            });
        }
        Ok(EnumValue {
            enum_name: self.name.clone(),
            token,
        })
    }
}

/// A member of some [`EnumOptions`]. Renders as its canonical token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    enum_name: String,
    token: String,
}

impl EnumValue {
    pub fn enum_name(&self) -> &str {
        &self.enum_name
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl Serialize for EnumValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token)
    }
}

/// Input accepted by enum setters: a raw token or an already-typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumInput {
    Token(String),
    Typed(EnumValue),
}

impl From<&str> for EnumInput {
    fn from(s: &str) -> Self {
        EnumInput::Token(s.to_string())
    }
}

impl From<String> for EnumInput {
    fn from(s: String) -> Self {
        EnumInput::Token(s)
    }
}

impl From<EnumValue> for EnumInput {
    fn from(v: EnumValue) -> Self {
        EnumInput::Typed(v)
    }
}

impl From<&EnumValue> for EnumInput {
    fn from(v: &EnumValue) -> Self {
        EnumInput::Typed(v.clone())
    }
}

/// A Rust enum usable as the option set of an enum parameter.
///
/// Usually implemented through [`configurable_enum!`](crate::configurable_enum).
pub trait ConfigurableEnum: Sized + Copy + PartialEq + 'static {
    const NAME: &'static str;
    const VARIANTS: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn options() -> EnumOptions {
        EnumOptions {
            name: Self::NAME.to_string(),
            values: Self::VARIANTS.iter().map(|v| v.as_str().to_string()).collect(),
        }
    }

    fn parse(token: &str) -> Result<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.as_str() == token)
            .ok_or_else(|| ConfigError::InvalidEnumValue {
                name: Self::NAME.to_string(),
                value: token.to_string(),
                enum_name: Self::NAME.to_string(),
                options: Self::options().describe(),
            })
    }

    fn to_value(&self) -> EnumValue {
        EnumValue {
            enum_name: Self::NAME.to_string(),
            token: self.as_str().to_string(),
        }
    }

    /// Read a stored value back into the Rust enum.
    fn from_value(value: &EnumValue) -> Result<Self> {
        if value.enum_name != Self::NAME {
            return Err(ConfigError::type_mismatch(
                Self::NAME,
                Self::NAME,
                &value.enum_name,
            ));
        }
        Self::parse(&value.token)
    }
}

/// Declare a fieldless enum together with its [`ConfigurableEnum`] impl.
///
/// ```
/// otx_cfg_core::configurable_enum! {
///     /// Anomaly map normalization.
///     pub enum NormalizationMethod("NormalizationMethod") {
///         None => "none",
///         Standard => "standard",
///         MinMax => "minmax",
///     }
/// }
/// use otx_cfg_core::ConfigurableEnum;
/// assert_eq!(NormalizationMethod::MinMax.as_str(), "minmax");
/// ```
#[macro_export]
macro_rules! configurable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($label:literal) {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::enums::ConfigurableEnum for $name {
            const NAME: &'static str = $label;
            const VARIANTS: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::enums::ConfigurableEnum::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::ConfigError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <$name as $crate::enums::ConfigurableEnum>::parse(s)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::configurable_enum! {
        enum Normalization("NormalizationMethod") {
            None => "none",
            Standard => "standard",
            MinMax => "minmax",
        }
    }

    #[test]
    fn test_parse_known_token() {
        let opts = Normalization::options();
        let v = opts.parse("standard").unwrap();
        assert_eq!(v.as_str(), "standard");
        assert_eq!(v.enum_name(), "NormalizationMethod");
        assert_eq!(Normalization::from_value(&v).unwrap(), Normalization::Standard);
    }

    #[test]
    fn test_unknown_token_lists_options() {
        let err = Normalization::options().parse("zscore").unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ConfigError::InvalidEnumValue { .. }));
        assert!(msg.contains("zscore"), "{}", msg);
        assert!(msg.contains("none, standard, minmax"), "{}", msg);
    }

    #[test]
    fn test_typed_value_from_other_enum_is_rejected() {
        let other = EnumOptions::new("Other", ["none"]).unwrap();
        let foreign = other.parse("none").unwrap();
        let err = Normalization::options()
            .coerce("normalization_method", foreign.into())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_coercion_is_idempotent() {
        let opts = Normalization::options();
        let once = opts.coerce("p", "minmax".into()).unwrap();
        let twice = opts.coerce("p", once.clone().into()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_values() {
        assert!(EnumOptions::new("Empty", Vec::<String>::new()).is_err());
        let err = EnumOptions::new("Dup", ["a", "b", "a"]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateName { .. }));
    }

    #[test]
    fn test_macro_display_and_from_str() {
        assert_eq!(Normalization::MinMax.to_string(), "minmax");
        let parsed: Normalization = "none".parse().unwrap();
        assert_eq!(parsed, Normalization::None);
        assert!("bogus".parse::<Normalization>().is_err());
    }

    #[test]
    fn test_value_serializes_as_token() {
        let v = Normalization::Standard.to_value();
        assert_eq!(serde_yaml::to_string(&v).unwrap().trim(), "standard");
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"standard\"");
    }
}
