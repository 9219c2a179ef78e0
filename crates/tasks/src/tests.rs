// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::anomaly::{padim_config, stfpm_config};
use crate::backbones::{register_anomaly_backbones, BackboneRegistry};
use crate::sections::detection_config;
use crate::{builtin_backbones, parse_task_type, NormalizationMethod, TaskType, TemplateRegistry, TrainingOptions};
use anyhow::Result;
use otx_cfg_core::{ConfigError, ConfigurableEnum};

#[test]
fn test_padim_defaults() -> Result<()> {
    let config = padim_config()?;
    assert_eq!(config.header(), "Configuration for Padim");
    assert_eq!(config.parameter("dataset.train_batch_size")?.value().as_i64(), Some(32));
    assert_eq!(
        config.parameter("postprocessing.normalization_method")?.value().as_str(),
        Some("minmax")
    );
    assert_eq!(config.parameter("pot_parameters.preset")?.value().as_str(), Some("PERFORMANCE"));
    Ok(())
}

#[test]
fn test_anomaly_normalization_rejects_unknown() -> Result<()> {
    let mut config = padim_config()?;
    let err = config
        .set_enum("postprocessing.normalization_method", "zscore")
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnumValue { .. }));
    assert!(err.to_string().contains("none, standard, minmax"));

    config.set_enum("postprocessing.normalization_method", NormalizationMethod::Standard.to_value())?;
    assert_eq!(
        config.parameter("postprocessing.normalization_method")?.enum_value::<NormalizationMethod>()?,
        NormalizationMethod::Standard
    );
    Ok(())
}

#[test]
fn test_stfpm_extends_base() -> Result<()> {
    let config = stfpm_config()?;
    assert!(config.parameter("learning_parameters.backbone").is_ok());
    assert_eq!(config.parameter("learning_parameters.lr")?.value().as_f64(), Some(0.4));
    assert_eq!(
        config.parameter("learning_parameters.early_stopping.metric")?.value().as_str(),
        Some("image_F1")
    );
    assert!(padim_config()?.parameter("learning_parameters.lr").is_err());
    Ok(())
}

#[test]
fn test_detection_overrides_like_cli_harness() -> Result<()> {
    let mut config = detection_config()?;
    config.apply_overrides([
        ("learning_parameters.num_iters", "2"),
        ("learning_parameters.batch_size", "2"),
    ])?;
    assert_eq!(config.parameter("learning_parameters.num_iters")?.value().as_i64(), Some(2));
    assert!(config.set_numeric("learning_parameters.batch_size", 0).is_err());
    assert_eq!(config.parameter("learning_parameters.batch_size")?.value().as_i64(), Some(2));
    Ok(())
}

#[test]
fn test_builtin_templates_are_consistent() -> Result<()> {
    let templates = TemplateRegistry::with_builtin_templates()?;
    let backbones = builtin_backbones()?;
    templates.validate(&backbones)?;
    assert_eq!(templates.filter(TaskType::Detection).len(), 2);
    assert!(templates.get("Custom_Object_Detection_Gen3_ATSS").is_some());
    Ok(())
}

#[test]
fn test_validate_reports_missing_backbone() -> Result<()> {
    let templates = TemplateRegistry::with_builtin_templates()?;
    let mut only_anomaly = BackboneRegistry::new("anomaly");
    register_anomaly_backbones(&mut only_anomaly)?;
    let err = templates.validate(&only_anomaly).unwrap_err();
    assert!(err.to_string().contains("unregistered backbone"));
    Ok(())
}

#[test]
fn test_duplicate_template_rejected() -> Result<()> {
    let mut templates = TemplateRegistry::with_builtin_templates()?;
    let atss = templates.get("Custom_Object_Detection_Gen3_ATSS").cloned().unwrap();
    assert!(templates.register(atss).is_err());
    Ok(())
}

#[test]
fn test_training_options_for_anomaly_and_detection() -> Result<()> {
    let mut stfpm = stfpm_config()?;
    stfpm.set_numeric("dataset.train_batch_size", 16)?;
    let opts = TrainingOptions::from_config(TaskType::AnomalySegmentation, &stfpm)?;
    assert_eq!(opts.batch_size, 16);
    assert_eq!(opts.learning_rate, Some(0.4));
    assert_eq!(opts.normalization.as_deref(), Some("minmax"));
    assert_eq!(opts.num_iters, None);

    let det = detection_config()?;
    let opts = TrainingOptions::from_config(TaskType::Detection, &det)?;
    assert_eq!(opts.batch_size, 8);
    assert_eq!(opts.num_iters, Some(200));
    assert_eq!(opts.train_type.as_deref(), Some("INCREMENTAL"));
    assert_eq!(opts.pot_preset, "PERFORMANCE");
    assert!(opts.enable_quantization);
    Ok(())
}

#[test]
fn test_parse_task_type_case_insensitive() {
    assert_eq!(parse_task_type("detection").unwrap(), TaskType::Detection);
    assert_eq!(parse_task_type("ANOMALY_SEGMENTATION").unwrap(), TaskType::AnomalySegmentation);
    assert!(parse_task_type("tracking").is_err());
}
