// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/tasks/src/training_options.rs
//
// The view a trainer takes of a finalized configuration. Read once at
// training start; never written back.
//
use crate::enums::{NormalizationMethod, PotQuantizationPreset, TaskType, TrainType};
use anyhow::{Context, Result};
use otx_cfg_core::ParameterGroup;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingOptions {
    pub batch_size: usize,
    pub num_workers: usize,
    pub num_iters: Option<u32>,
    pub learning_rate: Option<f64>,
    pub warmup_iters: Option<u32>,
    pub train_type: Option<String>,
    pub normalization: Option<String>,
    pub pot_preset: String,
    pub stat_subset_size: u32,
    pub enable_quantization: bool,
    pub enable_pruning: bool,
}

fn int(config: &ParameterGroup, path: &str) -> Result<i64> {
    config
        .parameter(path)?
        .value()
        .as_i64()
        .with_context(|| format!("{} is not an integer parameter", path))
}

fn float(config: &ParameterGroup, path: &str) -> Result<f64> {
    config
        .parameter(path)?
        .value()
        .as_f64()
        .with_context(|| format!("{} is not a numeric parameter", path))
}

fn flag(config: &ParameterGroup, path: &str) -> Result<bool> {
    config
        .parameter(path)?
        .value()
        .as_bool()
        .with_context(|| format!("{} is not a boolean parameter", path))
}

impl TrainingOptions {
    /// Convert a task configuration into trainer options.
    pub fn from_config(task_type: TaskType, config: &ParameterGroup) -> Result<Self> {
        let pot_preset = config.parameter("pot_parameters.preset")?.enum_value::<PotQuantizationPreset>()?;
        let common = Self {
            batch_size: 0,
            num_workers: 0,
            num_iters: None,
            learning_rate: None,
            warmup_iters: None,
            train_type: None,
            normalization: None,
            pot_preset: pot_preset.to_string(),
            stat_subset_size: u32::try_from(int(config, "pot_parameters.stat_subset_size")?)?,
            enable_quantization: flag(config, "nncf_optimization.enable_quantization")?,
            enable_pruning: flag(config, "nncf_optimization.enable_pruning")?,
        };

        if task_type.is_anomaly() {
            let normalization = config
                .parameter("postprocessing.normalization_method")?
                .enum_value::<NormalizationMethod>()?;
            let learning_rate = match config.parameter("learning_parameters.lr") {
                Ok(_) => Some(float(config, "learning_parameters.lr")?),
                Err(_) => None,
            };
            Ok(Self {
                batch_size: usize::try_from(int(config, "dataset.train_batch_size")?)?,
                num_workers: usize::try_from(int(config, "dataset.num_workers")?)?,
                learning_rate,
                normalization: Some(normalization.to_string()),
                ..common
            })
        } else {
            let train_type = config.parameter("algo_backend.train_type")?.enum_value::<TrainType>()?;
            Ok(Self {
                batch_size: usize::try_from(int(config, "learning_parameters.batch_size")?)?,
                num_workers: usize::try_from(int(config, "learning_parameters.num_workers")?)?,
                num_iters: Some(u32::try_from(int(config, "learning_parameters.num_iters")?)?),
                learning_rate: Some(float(config, "learning_parameters.learning_rate")?),
                warmup_iters: Some(u32::try_from(int(config, "learning_parameters.learning_rate_warmup_iters")?)?),
                train_type: Some(train_type.to_string()),
                ..common
            })
        }
    }
}
