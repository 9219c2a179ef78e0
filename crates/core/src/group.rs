// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/core/src/group.rs
//
// Ordered tree of parameters addressed by dotted paths
// ("learning_parameters.batch_size").
//
use crate::enums::EnumInput;
use crate::error::{ConfigError, Result};
use crate::parameter::{yaml_type_name, Numeric, Parameter, Selectable};
use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Parameter(Parameter),
    Group(ParameterGroup),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Parameter(p) => p.name(),
            Entry::Group(g) => g.name(),
        }
    }
}

/// Named, ordered collection of parameters and nested groups.
///
/// Children are owned, so the tree cannot contain cycles. Names are unique
/// within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGroup {
    name: String,
    header: String,
    description: String,
    entries: Vec<Entry>,
}

impl ParameterGroup {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            header: name.clone(),
            name,
            description: String::new(),
            entries: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
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

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: Entry) -> Result<()> {
        if self.entry(entry.name()).is_some() {
            return Err(ConfigError::DuplicateName {
                name: entry.name().to_string(),
                scope: format!("group {}", self.name),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<()> {
        self.push(Entry::Parameter(parameter))
    }

    pub fn add_group(&mut self, group: ParameterGroup) -> Result<()> {
        self.push(Entry::Group(group))
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Result<Self> {
        self.add_parameter(parameter)?;
        Ok(self)
    }

    pub fn with_group(mut self, group: ParameterGroup) -> Result<Self> {
        self.add_group(group)?;
        Ok(self)
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.name() == name)
    }

    pub fn parameter(&self, path: &str) -> Result<&Parameter> {
        let found = match path.split_once('.') {
            None => match self.entry(path) {
                Some(Entry::Parameter(p)) => Some(p),
                _ => None,
            },
            Some((head, rest)) => match self.entry(head) {
                Some(Entry::Group(g)) => g.parameter(rest).ok(),
                _ => None,
            },
        };
        found.ok_or_else(|| unknown(path))
    }

    pub fn parameter_mut(&mut self, path: &str) -> Result<&mut Parameter> {
        let found = match path.split_once('.') {
            None => match self.entry_mut(path) {
                Some(Entry::Parameter(p)) => Some(p),
                _ => None,
            },
            Some((head, rest)) => match self.entry_mut(head) {
                Some(Entry::Group(g)) => g.parameter_mut(rest).ok(),
                _ => None,
            },
        };
        found.ok_or_else(|| unknown(path))
    }

    pub fn group(&self, path: &str) -> Result<&ParameterGroup> {
        let found = match path.split_once('.') {
            None => match self.entry(path) {
                Some(Entry::Group(g)) => Some(g),
                _ => None,
            },
            Some((head, rest)) => match self.entry(head) {
                Some(Entry::Group(g)) => g.group(rest).ok(),
                _ => None,
            },
        };
        found.ok_or_else(|| unknown(path))
    }

    pub fn group_mut(&mut self, path: &str) -> Result<&mut ParameterGroup> {
        let found = match path.split_once('.') {
            None => match self.entry_mut(path) {
                Some(Entry::Group(g)) => Some(g),
                _ => None,
            },
            Some((head, rest)) => match self.entry_mut(head) {
                Some(Entry::Group(g)) => g.group_mut(rest).ok(),
                _ => None,
            },
        };
        found.ok_or_else(|| unknown(path))
    }

    pub fn set_numeric(&mut self, path: &str, value: impl Into<Numeric>) -> Result<()> {
        self.parameter_mut(path)?.set_numeric(value)
    }

    pub fn set_selectable(&mut self, path: &str, value: impl Into<Selectable>) -> Result<()> {
        self.parameter_mut(path)?.set_selectable(value)
    }

    pub fn set_enum(&mut self, path: &str, value: impl Into<EnumInput>) -> Result<()> {
        self.parameter_mut(path)?.set_enum(value)
    }

    pub fn set_bool(&mut self, path: &str, value: bool) -> Result<()> {
        self.parameter_mut(path)?.set_bool(value)
    }

    pub fn set_string(&mut self, path: &str, value: impl Into<String>) -> Result<()> {
        self.parameter_mut(path)?.set_string(value)
    }

    pub fn set_from_str(&mut self, path: &str, text: &str) -> Result<()> {
        self.parameter_mut(path)?.set_from_str(text)
    }

    /// Name → value mapping in declaration order. Enums render as tokens.
    pub fn serialize(&self) -> Value {
        let mut m = Mapping::new();
        for entry in &self.entries {
            let v = match entry {
                Entry::Parameter(p) => p.to_yaml(),
                Entry::Group(g) => g.serialize(),
            };
            m.insert(Value::from(entry.name()), v);
        }
        Value::Mapping(m)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.serialize())?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.serialize())?)
    }

    /// Same shape as [`serialize`](Self::serialize) but only with values that
    /// differ from their defaults. Groups left empty are dropped.
    pub fn diff_from_defaults(&self) -> Value {
        let mut m = Mapping::new();
        for entry in &self.entries {
            match entry {
                Entry::Parameter(p) if !p.is_default() => {
                    m.insert(Value::from(p.name()), p.to_yaml());
                }
                Entry::Parameter(_) => {}
                Entry::Group(g) => {
                    if let Value::Mapping(sub) = g.diff_from_defaults() {
                        if !sub.is_empty() {
                            m.insert(Value::from(g.name()), Value::Mapping(sub));
                        }
                    }
                }
            }
        }
        Value::Mapping(m)
    }

    /// Header, description and every parameter's constraints, for help output.
    pub fn schema(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("type".into(), "group".into());
        m.insert("header".into(), self.header.as_str().into());
        m.insert("description".into(), self.description.as_str().into());
        let mut children = Mapping::new();
        for entry in &self.entries {
            let v = match entry {
                Entry::Parameter(p) => Value::Mapping(p.describe()),
                Entry::Group(g) => g.schema(),
            };
            children.insert(Value::from(entry.name()), v);
        }
        m.insert("entries".into(), Value::Mapping(children));
        Value::Mapping(m)
    }

    /// Every parameter with its dotted path, depth first.
    pub fn parameters(&self) -> Vec<(String, &Parameter)> {
        let mut out = Vec::new();
        self.collect_parameters("", &mut out);
        out
    }

    fn collect_parameters<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Parameter)>) {
        for entry in &self.entries {
            let path = join(prefix, entry.name());
            match entry {
                Entry::Parameter(p) => out.push((path, p)),
                Entry::Group(g) => g.collect_parameters(&path, out),
            }
        }
    }

    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            match entry {
                Entry::Parameter(p) => p.reset(),
                Entry::Group(g) => g.reset(),
            }
        }
    }

    /// Load a (possibly partial) values document.
    ///
    /// Either every value in `doc` is accepted or the group is left unchanged.
    pub fn apply_document(&mut self, doc: &Value) -> Result<()> {
        let mut working = self.clone();
        working.apply_values("", doc)?;
        *self = working;
        info!("Applied document to parameter group {}", self.name);
        Ok(())
    }

    fn apply_values(&mut self, prefix: &str, doc: &Value) -> Result<()> {
        let map = match doc {
            Value::Null => return Ok(()),
            Value::Mapping(m) => m,
            other => {
                let scope = if prefix.is_empty() { self.name.as_str() } else { prefix };
                return Err(ConfigError::type_mismatch(scope, "mapping", yaml_type_name(other)));
            }
        };
        for (key, value) in map {
            let key = key
                .as_str()
                .ok_or_else(|| ConfigError::type_mismatch(prefix, "string key", yaml_type_name(key)))?;
            let path = join(prefix, key);
            match self.entry_mut(key) {
                Some(Entry::Parameter(p)) => {
                    let applied = match value {
                        Value::Mapping(full) => match full.get("value") {
                            Some(v) => p.set_from_yaml(v),
                            None => Err(ConfigError::type_mismatch(&path, p.kind().type_name(), "mapping")),
                        },
                        v => p.set_from_yaml(v),
                    };
                    applied.map_err(|e| e.at_path(&path))?;
                }
                Some(Entry::Group(g)) => g.apply_values(&path, value)?,
                // schema()-style documents nest children under `entries`
                None if key == "entries" => self.apply_values(prefix, value)?,
                None if GROUP_METADATA_KEYS.contains(&key) => debug!("Skipping metadata key {}", path),
                None => return Err(unknown(&path)),
            }
        }
        Ok(())
    }

    /// Apply `path=value` style overrides; all succeed or none are kept.
    pub fn apply_overrides<I, K, V>(&mut self, overrides: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut working = self.clone();
        let mut count = 0usize;
        for (path, text) in overrides {
            debug!("Override {} = {}", path.as_ref(), text.as_ref());
            working
                .set_from_str(path.as_ref(), text.as_ref())
                .map_err(|e| e.at_path(path.as_ref()))?;
            count += 1;
        }
        *self = working;
        info!("Applied {} override(s) to parameter group {}", count, self.name);
        Ok(())
    }
}

impl Serialize for ParameterGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Serialize::serialize(&ParameterGroup::serialize(self), serializer)
    }
}

/// Descriptive keys a group may carry next to its children in dumped configs.
const GROUP_METADATA_KEYS: &[&str] = &[
    "type",
    "header",
    "description",
    "warning",
    "editable",
    "visible_in_ui",
    "affects_outcome_of",
];

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn unknown(path: &str) -> ConfigError {
    ConfigError::UnknownParameter { path: path.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnumOptions;

    fn schema() -> ParameterGroup {
        let normalization = EnumOptions::new("NormalizationMethod", ["none", "standard", "minmax"]).unwrap();
        let learning = ParameterGroup::new("learning_parameters")
            .with_parameter(Parameter::integer("batch_size", 32, 1, 512).unwrap())
            .unwrap()
            .with_parameter(Parameter::float("learning_rate", 0.01, 1e-4, 1.0).unwrap())
            .unwrap();
        let post = ParameterGroup::new("postprocessing")
            .with_parameter(Parameter::enumeration("normalization_method", "minmax", normalization).unwrap())
            .unwrap();
        ParameterGroup::new("root")
            .with_group(learning)
            .unwrap()
            .with_group(post)
            .unwrap()
            .with_parameter(Parameter::boolean("enable_pruning", false))
            .unwrap()
    }

    #[test]
    fn test_batch_size_example() {
        let mut group = ParameterGroup::new("cfg")
            .with_parameter(Parameter::integer("batch_size", 32, 1, 512).unwrap())
            .unwrap();
        assert!(matches!(
            group.set_numeric("batch_size", 0).unwrap_err(),
            ConfigError::OutOfBounds { .. }
        ));
        group.set_numeric("batch_size", 512).unwrap();
        let expected: Value = serde_yaml::from_str("batch_size: 512").unwrap();
        assert_eq!(group.serialize(), expected);
    }

    #[test]
    fn test_serialize_nested_preserves_order_and_tokens() {
        let mut g = schema();
        g.set_enum("postprocessing.normalization_method", "standard").unwrap();
        let yaml = g.to_yaml_string().unwrap();
        let expected = "\
learning_parameters:
  batch_size: 32
  learning_rate: 0.01
postprocessing:
  normalization_method: standard
enable_pruning: false
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut g = schema();
        let err = g.add_parameter(Parameter::boolean("enable_pruning", true)).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateName { .. }));
        let err = g.add_group(ParameterGroup::new("postprocessing")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateName { .. }));
    }

    #[test]
    fn test_path_lookup() {
        let g = schema();
        assert_eq!(g.parameter("learning_parameters.batch_size").unwrap().name(), "batch_size");
        assert!(g.group("learning_parameters").is_ok());
        assert!(matches!(
            g.parameter("learning_parameters").unwrap_err(),
            ConfigError::UnknownParameter { .. }
        ));
        assert!(g.parameter("learning_parameters.nope").is_err());
        assert!(g.parameter("enable_pruning.x").is_err());
    }

    #[test]
    fn test_apply_document_is_all_or_nothing() {
        let mut g = schema();
        let bad: Value = serde_yaml::from_str(
            "learning_parameters:\n  batch_size: 64\n  learning_rate: 5.0\n",
        )
        .unwrap();
        assert!(g.apply_document(&bad).is_err());
        assert_eq!(g.parameter("learning_parameters.batch_size").unwrap().value().as_i64(), Some(32));

        let good: Value = serde_yaml::from_str(
            "learning_parameters:\n  batch_size: 64\npostprocessing:\n  normalization_method: none\n",
        )
        .unwrap();
        g.apply_document(&good).unwrap();
        assert_eq!(g.parameter("learning_parameters.batch_size").unwrap().value().as_i64(), Some(64));
        assert_eq!(
            g.parameter("postprocessing.normalization_method").unwrap().value().as_str(),
            Some("none")
        );
    }

    #[test]
    fn test_apply_document_unknown_key_reports_full_path() {
        let mut g = schema();
        let doc: Value = serde_yaml::from_str("learning_parameters:\n  num_epochs: 3\n").unwrap();
        match g.apply_document(&doc).unwrap_err() {
            ConfigError::UnknownParameter { path } => assert_eq!(path, "learning_parameters.num_epochs"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_apply_document_accepts_full_form() {
        let mut g = schema();
        let doc: Value = serde_yaml::from_str(
            "learning_parameters:\n  batch_size:\n    value: 8\n    header: Batch size\n",
        )
        .unwrap();
        g.apply_document(&doc).unwrap();
        assert_eq!(g.parameter("learning_parameters.batch_size").unwrap().value().as_i64(), Some(8));
    }

    #[test]
    fn test_apply_document_accepts_own_schema() {
        let mut g = schema();
        g.set_numeric("learning_parameters.batch_size", 64).unwrap();
        let before = g.serialize();
        let dumped = g.schema();
        g.apply_document(&dumped).unwrap();
        assert_eq!(g.serialize(), before);

        let mut fresh = schema();
        fresh.apply_document(&dumped).unwrap();
        assert_eq!(fresh.parameter("learning_parameters.batch_size").unwrap().value().as_i64(), Some(64));
    }

    #[test]
    fn test_apply_document_skips_group_metadata() {
        let mut g = schema();
        let doc: Value = serde_yaml::from_str(
            "learning_parameters:\n  header: Learning Parameters\n  description: Tuning\n  type: PARAMETER_GROUP\n  visible_in_ui: true\n  batch_size:\n    value: 8\n",
        )
        .unwrap();
        g.apply_document(&doc).unwrap();
        assert_eq!(g.parameter("learning_parameters.batch_size").unwrap().value().as_i64(), Some(8));
    }

    #[test]
    fn test_document_value_errors_name_full_path() {
        let mut g = schema();
        let doc: Value = serde_yaml::from_str("learning_parameters:\n  batch_size: 1024\n").unwrap();
        match g.apply_document(&doc).unwrap_err() {
            ConfigError::OutOfBounds { name, .. } => assert_eq!(name, "learning_parameters.batch_size"),
            other => panic!("unexpected error: {}", other),
        }

        let err = g
            .apply_overrides([("postprocessing.normalization_method", "zscore")])
            .unwrap_err();
        assert!(err.to_string().contains("postprocessing.normalization_method"), "{}", err);
    }

    #[test]
    fn test_round_trip_through_document() {
        let mut g = schema();
        g.set_numeric("learning_parameters.batch_size", 128).unwrap();
        let doc = g.serialize();
        let mut fresh = schema();
        fresh.apply_document(&doc).unwrap();
        assert_eq!(fresh.serialize(), doc);
    }

    #[test]
    fn test_apply_overrides() {
        let mut g = schema();
        g.apply_overrides([("learning_parameters.batch_size", "2"), ("enable_pruning", "true")])
            .unwrap();
        assert_eq!(g.parameter("learning_parameters.batch_size").unwrap().value().as_i64(), Some(2));

        let err = g
            .apply_overrides([("learning_parameters.batch_size", "4"), ("postprocessing.normalization_method", "zscore")])
            .unwrap_err();
        assert!(err.to_string().contains("none, standard, minmax"));
        assert_eq!(g.parameter("learning_parameters.batch_size").unwrap().value().as_i64(), Some(2));
    }

    #[test]
    fn test_diff_reset_and_listing() {
        let mut g = schema();
        assert_eq!(g.diff_from_defaults(), Value::Mapping(Mapping::new()));
        g.set_bool("enable_pruning", true).unwrap();
        let expected: Value = serde_yaml::from_str("enable_pruning: true").unwrap();
        assert_eq!(g.diff_from_defaults(), expected);

        let paths: Vec<String> = g.parameters().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec![
                "learning_parameters.batch_size",
                "learning_parameters.learning_rate",
                "postprocessing.normalization_method",
                "enable_pruning",
            ]
        );

        g.reset();
        assert_eq!(g.diff_from_defaults(), Value::Mapping(Mapping::new()));
    }

    #[test]
    fn test_json_rendering() {
        let g = schema();
        let json = g.to_json_value().unwrap();
        assert_eq!(json["learning_parameters"]["batch_size"], serde_json::json!(32));
        assert_eq!(json["postprocessing"]["normalization_method"], serde_json::json!("minmax"));
        assert_eq!(serde_json::to_value(&g).unwrap(), json);
    }

    #[test]
    fn test_schema_lists_options() {
        let g = schema();
        let s = g.schema();
        let opts = &s["entries"]["postprocessing"]["entries"]["normalization_method"]["options"];
        assert_eq!(opts.as_sequence().map(Vec::len), Some(3));
    }
}
