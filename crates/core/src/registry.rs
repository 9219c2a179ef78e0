// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/core/src/registry.rs
use crate::error::{ConfigError, Result};

/// Insertion-ordered table of named entries.
///
/// Owned by whoever consumes it; there is no process-wide instance.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    scope: String,
    entries: Vec<(String, T)>,
}

impl<T> Registry<T> {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            entries: Vec::new(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn register(&mut self, name: impl Into<String>, item: T) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ConfigError::DuplicateName {
                name,
                scope: format!("registry {}", self.scope),
            });
        }
        tracing::debug!("Registered {} in {}", name, self.scope);
        self.entries.push((name, item));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, item)| item)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, item)| (n.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
