// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/tasks/src/anomaly.rs
use crate::enums::{ModelBackbone, NormalizationMethod};
use crate::sections::{nncf_optimization, pot_parameters};
use otx_cfg_core::{ModelLifecycle, Parameter, ParameterGroup, Result};

/// Parameters common to every anomaly task.
pub fn base_anomaly_config(header: &str) -> Result<ParameterGroup> {
    let dataset = ParameterGroup::new("dataset")
        .with_header("Dataset Parameters")
        .with_description("Parameters for the anomaly dataset")
        .with_parameter(
            Parameter::integer("train_batch_size", 32, 1, 512)?
                .with_header("Batch size")
                .with_description(
                    "The number of training samples seen in each iteration of training. \
                     Increasing this value improves training time and may make the training more stable.",
                )
                .with_warning("Increasing this value may cause the system to use more memory than available."),
        )?
        .with_parameter(
            Parameter::integer("num_workers", 8, 0, 36)?
                .with_header("Number of workers")
                .with_description("Increasing this value might improve training speed however it might cause out of memory errors.")
                .affects_outcome_of(ModelLifecycle::None),
        )?;

    let learning = ParameterGroup::new("learning_parameters")
        .with_header("Learning Parameters")
        .with_parameter(
            Parameter::configurable_enum("backbone", ModelBackbone::Resnet18)
                .with_header("Model Backbone")
                .with_description("Pre-trained backbone used for feature extraction"),
        )?;

    let postprocessing = ParameterGroup::new("postprocessing")
        .with_header("Postprocessing")
        .with_parameter(
            Parameter::configurable_enum("normalization_method", NormalizationMethod::MinMax)
                .with_header("Normalization method")
                .with_description("Method used to normalize anomaly scores before thresholding")
                .affects_outcome_of(ModelLifecycle::Inference),
        )?;

    ParameterGroup::new("root")
        .with_header(header)
        .with_description(header)
        .with_group(dataset)?
        .with_group(learning)?
        .with_group(postprocessing)?
        .with_group(pot_parameters()?)?
        .with_group(nncf_optimization()?)
}

pub fn padim_config() -> Result<ParameterGroup> {
    base_anomaly_config("Configuration for Padim")
}

/// STFPM trains its student network, so it adds optimizer and early stopping settings.
pub fn stfpm_config() -> Result<ParameterGroup> {
    let mut config = base_anomaly_config("Configuration for STFPM")?;
    let early_stopping = ParameterGroup::new("early_stopping")
        .with_header("Early Stopping Parameters")
        .with_parameter(
            Parameter::selectable("metric", "image_F1", ["image_F1", "image_AUROC"])?
                .with_header("Early Stopping Metric"),
        )?
        .with_parameter(
            Parameter::integer("patience", 10, 1, 100)?
                .with_header("Early Stopping Patience")
                .with_description("Number of epochs to wait for an improvement in the monitored metric"),
        )?;

    let learning = config.group_mut("learning_parameters")?;
    learning.add_parameter(
        Parameter::float("lr", 0.4, 1e-3, 1.0)?
            .with_header("Learning Rate")
            .with_description("Learning rate used for optimizing the Student network."),
    )?;
    learning.add_parameter(Parameter::float("momentum", 0.9, 0.1, 1.0)?.with_header("Momentum"))?;
    learning.add_parameter(Parameter::float("weight_decay", 1e-4, 1e-6, 1e-1)?.with_header("Weight Decay"))?;
    learning.add_group(early_stopping)?;
    Ok(config)
}
