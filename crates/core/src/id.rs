// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/core/src/id.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque string-backed identity. The empty string is the canonical "no id".
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(representation: impl Into<String>) -> Self {
        Self(representation.into())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Anything [`normalize_identifier`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum IdInput {
    Missing,
    Raw(String),
    Typed(Id),
}

impl From<&str> for IdInput {
    fn from(s: &str) -> Self {
        IdInput::Raw(s.to_string())
    }
}

impl From<String> for IdInput {
    fn from(s: String) -> Self {
        IdInput::Raw(s)
    }
}

impl From<Id> for IdInput {
    fn from(id: Id) -> Self {
        IdInput::Typed(id)
    }
}

impl From<Option<&str>> for IdInput {
    fn from(s: Option<&str>) -> Self {
        s.map_or(IdInput::Missing, IdInput::from)
    }
}

impl From<Option<String>> for IdInput {
    fn from(s: Option<String>) -> Self {
        s.map_or(IdInput::Missing, IdInput::Raw)
    }
}

impl From<Option<Id>> for IdInput {
    fn from(id: Option<Id>) -> Self {
        id.map_or(IdInput::Missing, IdInput::Typed)
    }
}

/// Turn an optional string or id into an [`Id`]; existing ids pass through untouched.
pub fn normalize_identifier(input: impl Into<IdInput>) -> Id {
    match input.into() {
        IdInput::Missing => Id::empty(),
        IdInput::Raw(s) => Id::new(s),
        IdInput::Typed(id) => id,
    }
}
