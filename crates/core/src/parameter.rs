// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/core/src/parameter.rs
use crate::enums::{ConfigurableEnum, EnumInput, EnumOptions, EnumValue};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use tracing::{debug, warn};

crate::configurable_enum! {
    /// Stage of the model lifecycle a parameter influences.
    pub enum ModelLifecycle("ModelLifecycle") {
        None => "NONE",
        Everything => "EVERYTHING",
        Training => "TRAINING",
        Inference => "INFERENCE",
        Testing => "TESTING",
        Archiving => "ARCHIVING",
    }
}

/// Candidate value for numeric setters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }
}

impl From<i64> for Numeric {
    fn from(v: i64) -> Self {
        Numeric::Int(v)
    }
}

impl From<i32> for Numeric {
    fn from(v: i32) -> Self {
        Numeric::Int(v.into())
    }
}

impl From<u32> for Numeric {
    fn from(v: u32) -> Self {
        Numeric::Int(v.into())
    }
}

impl From<f64> for Numeric {
    fn from(v: f64) -> Self {
        Numeric::Float(v)
    }
}

impl From<f32> for Numeric {
    fn from(v: f32) -> Self {
        Numeric::Float(v.into())
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(i) => write!(f, "{}", i),
            Numeric::Float(x) => write!(f, "{}", x),
        }
    }
}

/// One entry of a selectable parameter's option set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selectable {
    Float(f64),
    Text(String),
}

impl Selectable {
    fn to_yaml(&self) -> Value {
        match self {
            Selectable::Float(f) => Value::from(*f),
            Selectable::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl From<&str> for Selectable {
    fn from(s: &str) -> Self {
        Selectable::Text(s.to_string())
    }
}

impl From<String> for Selectable {
    fn from(s: String) -> Self {
        Selectable::Text(s)
    }
}

impl From<f64> for Selectable {
    fn from(f: f64) -> Self {
        Selectable::Float(f)
    }
}

impl fmt::Display for Selectable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selectable::Float(x) => write!(f, "{}", x),
            Selectable::Text(s) => f.write_str(s),
        }
    }
}

/// The kind of a parameter together with its value, default and constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    Integer { value: i64, default: i64, min: i64, max: i64 },
    Float { value: f64, default: f64, min: f64, max: f64 },
    Boolean { value: bool, default: bool },
    String { value: String, default: String },
    Selectable { value: Selectable, default: Selectable, options: Vec<Selectable> },
    Enum { value: EnumValue, default: EnumValue, options: EnumOptions },
}

impl ParameterKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterKind::Integer { .. } => "integer",
            ParameterKind::Float { .. } => "float",
            ParameterKind::Boolean { .. } => "boolean",
            ParameterKind::String { .. } => "string",
            ParameterKind::Selectable { .. } => "selectable",
            ParameterKind::Enum { .. } => "enum",
        }
    }
}

/// Borrowed view of a parameter's current (or default) value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue<'a> {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(&'a str),
    Selectable(&'a Selectable),
    Enum(&'a EnumValue),
}

impl ParameterValue<'_> {
    /// Primitive YAML form; enums become their token.
    pub fn to_yaml(&self) -> Value {
        match self {
            ParameterValue::Integer(i) => Value::from(*i),
            ParameterValue::Float(f) => Value::from(*f),
            ParameterValue::Boolean(b) => Value::from(*b),
            ParameterValue::String(s) => Value::from(*s),
            ParameterValue::Selectable(s) => s.to_yaml(),
            ParameterValue::Enum(e) => Value::from(e.as_str()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Integer(i) => Some(*i as f64),
            ParameterValue::Float(f) => Some(*f),
            ParameterValue::Selectable(Selectable::Float(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(*s),
            ParameterValue::Selectable(Selectable::Text(s)) => Some(s.as_str()),
            ParameterValue::Enum(e) => Some(e.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Integer(i) => write!(f, "{}", i),
            ParameterValue::Float(x) => write!(f, "{}", x),
            ParameterValue::Boolean(b) => write!(f, "{}", b),
            ParameterValue::String(s) => f.write_str(s),
            ParameterValue::Selectable(s) => write!(f, "{}", s),
            ParameterValue::Enum(e) => write!(f, "{}", e),
        }
    }
}

/// A single named, typed, constrained configuration value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    header: String,
    description: String,
    warning: Option<String>,
    editable: bool,
    visible_in_ui: bool,
    affects_outcome_of: ModelLifecycle,
    kind: ParameterKind,
}

impl Parameter {
    fn with_kind(name: impl Into<String>, kind: ParameterKind) -> Self {
        let name = name.into();
        Self {
            header: name.clone(),
            name,
            description: String::new(),
            warning: None,
            editable: true,
            visible_in_ui: true,
            affects_outcome_of: ModelLifecycle::Training,
            kind,
        }
    }

    pub fn integer(name: impl Into<String>, default: i64, min: i64, max: i64) -> Result<Self> {
        let name = name.into();
        if min > max {
            return Err(ConfigError::invalid_schema(&name, format!("min {} > max {}", min, max)));
        }
        check_bounds(&name, default, min, max)?;
        Ok(Self::with_kind(name, ParameterKind::Integer { value: default, default, min, max }))
    }

    pub fn float(name: impl Into<String>, default: f64, min: f64, max: f64) -> Result<Self> {
        let name = name.into();
        if !(min <= max) {
            return Err(ConfigError::invalid_schema(&name, format!("min {} > max {}", min, max)));
        }
        check_bounds(&name, default, min, max)?;
        Ok(Self::with_kind(name, ParameterKind::Float { value: default, default, min, max }))
    }

    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self::with_kind(name, ParameterKind::Boolean { value: default, default })
    }

    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        let default = default.into();
        Self::with_kind(name, ParameterKind::String { value: default.clone(), default })
    }

    pub fn selectable<I, S>(name: impl Into<String>, default: impl Into<Selectable>, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Selectable>,
    {
        let name = name.into();
        let options: Vec<Selectable> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(ConfigError::invalid_schema(&name, "selectable has no options"));
        }
        let default = default.into();
        check_option(&name, &default, &options)?;
        Ok(Self::with_kind(
            name,
            ParameterKind::Selectable { value: default.clone(), default, options },
        ))
    }

    pub fn enumeration(name: impl Into<String>, default: impl Into<EnumInput>, options: EnumOptions) -> Result<Self> {
        let name = name.into();
        let default = options.coerce(&name, default.into())?;
        Ok(Self::with_kind(
            name,
            ParameterKind::Enum { value: default.clone(), default, options },
        ))
    }

    /// Enum parameter backed by a Rust enum; the default is always valid.
    pub fn configurable_enum<E: ConfigurableEnum>(name: impl Into<String>, default: E) -> Self {
        let default = default.to_value();
        Self::with_kind(
            name,
            ParameterKind::Enum { value: default.clone(), default, options: E::options() },
        )
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn visible_in_ui(mut self, visible: bool) -> Self {
        self.visible_in_ui = visible;
        self
    }

    pub fn affects_outcome_of(mut self, stage: ModelLifecycle) -> Self {
        self.affects_outcome_of = stage;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_visible_in_ui(&self) -> bool {
        self.visible_in_ui
    }

    pub fn lifecycle(&self) -> ModelLifecycle {
        self.affects_outcome_of
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn value(&self) -> ParameterValue<'_> {
        match &self.kind {
            ParameterKind::Integer { value, .. } => ParameterValue::Integer(*value),
            ParameterKind::Float { value, .. } => ParameterValue::Float(*value),
            ParameterKind::Boolean { value, .. } => ParameterValue::Boolean(*value),
            ParameterKind::String { value, .. } => ParameterValue::String(value),
            ParameterKind::Selectable { value, .. } => ParameterValue::Selectable(value),
            ParameterKind::Enum { value, .. } => ParameterValue::Enum(value),
        }
    }

    pub fn default_value(&self) -> ParameterValue<'_> {
        match &self.kind {
            ParameterKind::Integer { default, .. } => ParameterValue::Integer(*default),
            ParameterKind::Float { default, .. } => ParameterValue::Float(*default),
            ParameterKind::Boolean { default, .. } => ParameterValue::Boolean(*default),
            ParameterKind::String { default, .. } => ParameterValue::String(default),
            ParameterKind::Selectable { default, .. } => ParameterValue::Selectable(default),
            ParameterKind::Enum { default, .. } => ParameterValue::Enum(default),
        }
    }

    pub fn is_default(&self) -> bool {
        self.value() == self.default_value()
    }

    pub fn to_yaml(&self) -> Value {
        self.value().to_yaml()
    }

    /// Current value of an enum parameter as a Rust enum.
    pub fn enum_value<E: ConfigurableEnum>(&self) -> Result<E> {
        match &self.kind {
            ParameterKind::Enum { value, .. } => E::from_value(value),
            other => Err(ConfigError::type_mismatch(&self.name, "enum", other.type_name())),
        }
    }

    pub fn reset(&mut self) {
        match &mut self.kind {
            ParameterKind::Integer { value, default, .. } => *value = *default,
            ParameterKind::Float { value, default, .. } => *value = *default,
            ParameterKind::Boolean { value, default } => *value = *default,
            ParameterKind::String { value, default } => *value = default.clone(),
            ParameterKind::Selectable { value, default, .. } => *value = default.clone(),
            ParameterKind::Enum { value, default, .. } => *value = default.clone(),
        }
    }

    /// Replace the value of an integer or float parameter, keeping it on failure.
    pub fn set_numeric(&mut self, value: impl Into<Numeric>) -> Result<()> {
        let value = value.into();
        let result = self.try_set_numeric(value);
        self.log_outcome(&result);
        result
    }

    fn try_set_numeric(&mut self, value: Numeric) -> Result<()> {
        let name = &self.name;
        match &mut self.kind {
            ParameterKind::Integer { value: current, min, max, .. } => {
                let candidate = match value {
                    Numeric::Int(i) => i,
                    // i64::MAX as f64 rounds up to 2^63, which does not fit
                    Numeric::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => f as i64,
                    Numeric::Float(f) if f.fract() == 0.0 || f.is_infinite() => {
                        return Err(ConfigError::OutOfBounds {
                            name: name.to_string(),
                            value: f.to_string(),
                            min: min.to_string(),
                            max: max.to_string(),
                        })
                    }
                    Numeric::Float(f) => return Err(ConfigError::type_mismatch(name, "integer", &f.to_string())),
                };
                check_bounds(name, candidate, *min, *max)?;
                *current = candidate;
                Ok(())
            }
            ParameterKind::Float { value: current, min, max, .. } => {
                let candidate = value.as_f64();
                check_bounds(name, candidate, *min, *max)?;
                *current = candidate;
                Ok(())
            }
            other => Err(ConfigError::type_mismatch(name, "numeric", other.type_name())),
        }
    }

    /// Replace the value of a selectable parameter with a member of its option set.
    pub fn set_selectable(&mut self, value: impl Into<Selectable>) -> Result<()> {
        let value = value.into();
        let name = &self.name;
        let result = match &mut self.kind {
            ParameterKind::Selectable { value: current, options, .. } => {
                check_option(name, &value, options).map(|()| *current = value)
            }
            other => Err(ConfigError::type_mismatch(name, "selectable", other.type_name())),
        };
        self.log_outcome(&result);
        result
    }

    /// Replace the value of an enum parameter from a token or a typed value.
    pub fn set_enum(&mut self, value: impl Into<EnumInput>) -> Result<()> {
        let value = value.into();
        let name = &self.name;
        let result = match &mut self.kind {
            ParameterKind::Enum { value: current, options, .. } => {
                options.coerce(name, value).map(|coerced| *current = coerced)
            }
            other => Err(ConfigError::type_mismatch(name, "enum", other.type_name())),
        };
        self.log_outcome(&result);
        result
    }

    pub fn set_bool(&mut self, value: bool) -> Result<()> {
        let result = match &mut self.kind {
            ParameterKind::Boolean { value: current, .. } => {
                *current = value;
                Ok(())
            }
            other => Err(ConfigError::type_mismatch(&self.name, "boolean", other.type_name())),
        };
        self.log_outcome(&result);
        result
    }

    pub fn set_string(&mut self, value: impl Into<String>) -> Result<()> {
        let result = match &mut self.kind {
            ParameterKind::String { value: current, .. } => {
                *current = value.into();
                Ok(())
            }
            other => Err(ConfigError::type_mismatch(&self.name, "string", other.type_name())),
        };
        self.log_outcome(&result);
        result
    }

    /// Parse a textual override (e.g. from the command line) for this parameter's kind.
    pub fn set_from_str(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        match &self.kind {
            ParameterKind::Integer { .. } => {
                let v = match text.parse::<i64>() {
                    Ok(i) => Numeric::Int(i),
                    Err(_) => text
                        .parse::<f64>()
                        .map(Numeric::Float)
                        .map_err(|_| ConfigError::parse_value(&self.name, text, "integer"))?,
                };
                self.set_numeric(v)
            }
            ParameterKind::Float { .. } => {
                let v: f64 = text
                    .parse()
                    .map_err(|_| ConfigError::parse_value(&self.name, text, "float"))?;
                self.set_numeric(v)
            }
            ParameterKind::Boolean { .. } => {
                let v = parse_bool(text).ok_or_else(|| ConfigError::parse_value(&self.name, text, "boolean"))?;
                self.set_bool(v)
            }
            ParameterKind::String { .. } => self.set_string(text),
            ParameterKind::Selectable { options, .. } => {
                let candidate = if options.iter().any(|o| matches!(o, Selectable::Text(s) if s == text)) {
                    Selectable::Text(text.to_string())
                } else if let Ok(f) = text.parse::<f64>() {
                    Selectable::Float(f)
                } else {
                    Selectable::Text(text.to_string())
                };
                self.set_selectable(candidate)
            }
            ParameterKind::Enum { .. } => self.set_enum(text),
        }
    }

    /// Apply a value read from a YAML/JSON document.
    pub fn set_from_yaml(&mut self, value: &Value) -> Result<()> {
        let mismatch = |expected: &str| ConfigError::type_mismatch(&self.name, expected, yaml_type_name(value));
        match &self.kind {
            ParameterKind::Integer { .. } | ParameterKind::Float { .. } => {
                let n = match value {
                    Value::Number(n) => match n.as_i64() {
                        Some(i) => Numeric::Int(i),
                        None => Numeric::Float(n.as_f64().ok_or_else(|| mismatch("number"))?),
                    },
                    _ => return Err(mismatch(self.kind.type_name())),
                };
                self.set_numeric(n)
            }
            ParameterKind::Boolean { .. } => {
                let b = value.as_bool().ok_or_else(|| mismatch("boolean"))?;
                self.set_bool(b)
            }
            ParameterKind::String { .. } => {
                let s = value.as_str().ok_or_else(|| mismatch("string"))?;
                self.set_string(s)
            }
            ParameterKind::Selectable { .. } => {
                let candidate = match value {
                    Value::String(s) => Selectable::Text(s.clone()),
                    Value::Number(n) => Selectable::Float(n.as_f64().ok_or_else(|| mismatch("selectable"))?),
                    _ => return Err(mismatch("selectable")),
                };
                self.set_selectable(candidate)
            }
            ParameterKind::Enum { .. } => {
                let s = value.as_str().ok_or_else(|| mismatch("enum token"))?;
                self.set_enum(s)
            }
        }
    }

    /// Kind, default, constraints and UI metadata as a YAML mapping.
    pub fn describe(&self) -> Mapping {
        let mut m = Mapping::new();
        m.insert("type".into(), self.kind.type_name().into());
        m.insert("header".into(), self.header.as_str().into());
        m.insert("description".into(), self.description.as_str().into());
        if let Some(w) = &self.warning {
            m.insert("warning".into(), w.as_str().into());
        }
        m.insert("editable".into(), self.editable.into());
        m.insert("visible_in_ui".into(), self.visible_in_ui.into());
        m.insert("affects_outcome_of".into(), self.affects_outcome_of.as_str().into());
        m.insert("default_value".into(), self.default_value().to_yaml());
        m.insert("value".into(), self.to_yaml());
        match &self.kind {
            ParameterKind::Integer { min, max, .. } => {
                m.insert("min_value".into(), (*min).into());
                m.insert("max_value".into(), (*max).into());
            }
            ParameterKind::Float { min, max, .. } => {
                m.insert("min_value".into(), (*min).into());
                m.insert("max_value".into(), (*max).into());
            }
            ParameterKind::Selectable { options, .. } => {
                let opts: Vec<Value> = options.iter().map(Selectable::to_yaml).collect();
                m.insert("options".into(), Value::Sequence(opts));
            }
            ParameterKind::Enum { options, .. } => {
                m.insert("enum_name".into(), options.name().into());
                let opts: Vec<Value> = options.values().iter().map(|v| v.as_str().into()).collect();
                m.insert("options".into(), Value::Sequence(opts));
            }
            ParameterKind::Boolean { .. } | ParameterKind::String { .. } => {}
        }
        m
    }

    fn log_outcome(&self, result: &Result<()>) {
        match result {
            Ok(()) => debug!("Set {} = {}", self.name, self.value()),
            Err(e) => warn!("Rejected value for {}: {}", self.name, e),
        }
    }
}

fn check_bounds<T: PartialOrd + fmt::Display>(name: &str, value: T, min: T, max: T) -> Result<()> {
    if min <= value && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfBounds {
            name: name.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        })
    }
}

fn check_option(name: &str, value: &Selectable, options: &[Selectable]) -> Result<()> {
    if options.contains(value) {
        return Ok(());
    }
    Err(ConfigError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
        options: options.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
    })
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
