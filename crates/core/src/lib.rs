// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core library for otx-cfg ─ typed, bounded training parameters with
//! validation, enum coercion and YAML/JSON serialization.

pub mod document;
pub mod enums;
pub mod error;
pub mod group;
pub mod id;
pub mod parameter;
pub mod registry;

pub use document::{from_yaml_str, load_document};
pub use enums::{ConfigurableEnum, EnumInput, EnumOptions, EnumValue};
pub use error::{ConfigError, Result};
pub use group::{Entry, ParameterGroup};
pub use id::{normalize_identifier, Id, IdInput};
pub use parameter::{ModelLifecycle, Numeric, Parameter, ParameterKind, ParameterValue, Selectable};
pub use registry::Registry;
