// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/tasks/src/sections.rs
//
// Parameter groups shared by several task schemas.
//
use crate::enums::{PotQuantizationPreset, TrainType};
use otx_cfg_core::{ModelLifecycle, Parameter, ParameterGroup, Result};

/// Defaults for the `learning_parameters` section of supervised tasks.
#[derive(Debug, Clone, Copy)]
pub struct LearningDefaults {
    pub batch_size: i64,
    pub num_iters: i64,
    pub learning_rate: f64,
    pub learning_rate_warmup_iters: i64,
    pub num_workers: i64,
}

pub fn learning_parameters(defaults: LearningDefaults) -> Result<ParameterGroup> {
    ParameterGroup::new("learning_parameters")
        .with_header("Learning Parameters")
        .with_parameter(
            Parameter::integer("batch_size", defaults.batch_size, 1, 512)?
                .with_header("Batch size")
                .with_description(
                    "The number of training samples seen in each iteration of training. \
                     Increasing this value improves training time and may make the training more stable.",
                )
                .with_warning("Increasing this value may cause the system to use more memory than available."),
        )?
        .with_parameter(
            Parameter::integer("num_iters", defaults.num_iters, 1, 100_000)?
                .with_header("Number of training iterations")
                .with_description("Increasing this value causes the results to be more robust but training time will be longer."),
        )?
        .with_parameter(
            Parameter::float("learning_rate", defaults.learning_rate, 1e-7, 1e-1)?
                .with_header("Learning rate")
                .with_description("Increasing this value will speed up training convergence but might make it unstable."),
        )?
        .with_parameter(
            Parameter::integer("learning_rate_warmup_iters", defaults.learning_rate_warmup_iters, 0, 10_000)?
                .with_header("Number of iterations for learning rate warmup"),
        )?
        .with_parameter(
            Parameter::integer("num_workers", defaults.num_workers, 0, 36)?
                .with_header("Number of cpu threads to use during batch generation")
                .affects_outcome_of(ModelLifecycle::None),
        )
}

pub fn detection_postprocessing() -> Result<ParameterGroup> {
    ParameterGroup::new("postprocessing")
        .with_header("Postprocessing")
        .with_parameter(
            Parameter::float("confidence_threshold", 0.35, 0.0, 1.0)?
                .with_header("Confidence threshold")
                .with_description("This threshold only takes effect if the threshold is not set based on the result.")
                .affects_outcome_of(ModelLifecycle::Inference),
        )?
        .with_parameter(
            Parameter::boolean("result_based_confidence_threshold", true)
                .with_header("Result based confidence threshold")
                .affects_outcome_of(ModelLifecycle::Inference),
        )
}

pub fn algo_backend() -> Result<ParameterGroup> {
    ParameterGroup::new("algo_backend")
        .with_header("Algo backend parameters")
        .with_parameter(
            Parameter::configurable_enum("train_type", TrainType::Incremental)
                .with_header("Train type")
                .visible_in_ui(false),
        )
}

pub fn pot_parameters() -> Result<ParameterGroup> {
    ParameterGroup::new("pot_parameters")
        .with_header("POT Parameters")
        .with_parameter(
            Parameter::configurable_enum("preset", PotQuantizationPreset::Performance)
                .with_header("Preset")
                .with_description("Quantization preset that defines quantization scheme")
                .editable(false)
                .visible_in_ui(false),
        )?
        .with_parameter(
            Parameter::integer("stat_subset_size", 300, 1, i64::from(i32::MAX))?
                .with_header("Number of data samples")
                .with_description("Number of data samples used for post-training optimization"),
        )
}

pub fn nncf_optimization() -> Result<ParameterGroup> {
    ParameterGroup::new("nncf_optimization")
        .with_header("Optimization by NNCF")
        .with_parameter(
            Parameter::boolean("enable_quantization", true)
                .with_header("Enable quantization algorithm")
                .affects_outcome_of(ModelLifecycle::Training),
        )?
        .with_parameter(
            Parameter::boolean("enable_pruning", false)
                .with_header("Enable filter pruning algorithm")
                .affects_outcome_of(ModelLifecycle::Training),
        )?
        .with_parameter(
            Parameter::boolean("pruning_supported", false)
                .with_header("Whether filter pruning is supported")
                .editable(false)
                .visible_in_ui(false),
        )
}

fn supervised_config(header: &str, defaults: LearningDefaults, with_postprocessing: bool) -> Result<ParameterGroup> {
    let mut group = ParameterGroup::new("root")
        .with_header(header)
        .with_description(header)
        .with_group(learning_parameters(defaults)?)?;
    if with_postprocessing {
        group.add_group(detection_postprocessing()?)?;
    }
    group
        .with_group(algo_backend()?)?
        .with_group(pot_parameters()?)?
        .with_group(nncf_optimization()?)
}

pub fn detection_config() -> Result<ParameterGroup> {
    supervised_config(
        "Configuration for an object detection task",
        LearningDefaults {
            batch_size: 8,
            num_iters: 200,
            learning_rate: 0.008,
            learning_rate_warmup_iters: 3,
            num_workers: 2,
        },
        true,
    )
}

pub fn segmentation_config() -> Result<ParameterGroup> {
    supervised_config(
        "Configuration for a semantic segmentation task",
        LearningDefaults {
            batch_size: 8,
            num_iters: 200,
            learning_rate: 0.001,
            learning_rate_warmup_iters: 100,
            num_workers: 4,
        },
        false,
    )
}

pub fn classification_config() -> Result<ParameterGroup> {
    supervised_config(
        "Configuration for an image classification task",
        LearningDefaults {
            batch_size: 32,
            num_iters: 90,
            learning_rate: 0.0071,
            learning_rate_warmup_iters: 0,
            num_workers: 4,
        },
        false,
    )
}

pub fn action_classification_config() -> Result<ParameterGroup> {
    supervised_config(
        "Configuration for an action classification task",
        LearningDefaults {
            batch_size: 8,
            num_iters: 5,
            learning_rate: 0.01,
            learning_rate_warmup_iters: 10,
            num_workers: 0,
        },
        false,
    )
}
