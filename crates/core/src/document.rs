// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/core/src/document.rs
//
// Reading values documents from disk or text. JSON is a subset of YAML, so
// one parser covers both.
//
use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Parse a YAML (or JSON) document.
pub fn from_yaml_str(text: &str) -> Result<serde_yaml::Value> {
    Ok(serde_yaml::from_str(text)?)
}

/// Load a YAML (or JSON) document from a file.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<serde_yaml::Value> {
    debug!("Loading document {:?}", path.as_ref());
    let text = std::fs::read_to_string(&path)?;
    from_yaml_str(&text)
}
