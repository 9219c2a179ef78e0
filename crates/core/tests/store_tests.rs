// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use otx_cfg_core::{
    load_document, normalize_identifier, ConfigError, EnumOptions, Id, Parameter, ParameterGroup,
};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn training_schema() -> Result<ParameterGroup, ConfigError> {
    let normalization = EnumOptions::new("NormalizationMethod", ["none", "standard", "minmax"])?;
    ParameterGroup::new("training")
        .with_group(
            ParameterGroup::new("learning_parameters")
                .with_parameter(Parameter::integer("batch_size", 32, 1, 512)?)?
                .with_parameter(Parameter::selectable("preset", "mixed", ["mixed", "performance"])?)?,
        )?
        .with_group(
            ParameterGroup::new("postprocessing")
                .with_parameter(Parameter::enumeration("normalization_method", "minmax", normalization)?)?,
        )
}

#[test]
fn numeric_setter_is_inclusive_over_whole_range() {
    let mut p = Parameter::integer("batch_size", 32, 1, 512).unwrap();
    for v in [-1i64, 0, 1, 2, 256, 511, 512, 513, 10_000] {
        let accepted = p.set_numeric(v).is_ok();
        assert_eq!(accepted, (1..=512).contains(&v), "value {}", v);
    }
    assert_eq!(p.value().as_i64(), Some(512));
}

#[test]
fn load_fixture_and_serialize() {
    let mut schema = training_schema().unwrap();
    let doc = load_document(fixture_path("training_params.yaml")).unwrap();
    schema.apply_document(&doc).unwrap();
    assert_eq!(schema.serialize(), doc);
}

#[test]
fn selectable_round_trip_reproduces_value() {
    let mut schema = training_schema().unwrap();
    schema.set_selectable("learning_parameters.preset", "performance").unwrap();
    let values = schema.serialize();
    assert_eq!(values["learning_parameters"]["preset"].as_str(), Some("performance"));
}

#[test]
fn failed_set_keeps_store_usable() {
    let mut schema = training_schema().unwrap();
    assert!(schema.set_enum("postprocessing.normalization_method", "zscore").is_err());
    assert!(schema.set_numeric("learning_parameters.batch_size", 0).is_err());
    schema.set_numeric("learning_parameters.batch_size", 64).unwrap();
    let values = schema.serialize();
    assert_eq!(values["learning_parameters"]["batch_size"].as_i64(), Some(64));
    assert_eq!(values["postprocessing"]["normalization_method"].as_str(), Some("minmax"));
}

#[test]
fn identifiers_normalize() {
    assert_eq!(normalize_identifier(None::<String>), Id::empty());
    assert_eq!(normalize_identifier("abc"), Id::new("abc"));
    let typed = Id::new("6f0c1a");
    assert_eq!(normalize_identifier(Some(typed.clone())), typed);
}
