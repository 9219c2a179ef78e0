// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/tasks/src/enums.rs
use otx_cfg_core::configurable_enum;

configurable_enum! {
    /// Kind of problem a model template solves.
    pub enum TaskType("TaskType") {
        Classification => "CLASSIFICATION",
        Detection => "DETECTION",
        Segmentation => "SEGMENTATION",
        AnomalyClassification => "ANOMALY_CLASSIFICATION",
        AnomalySegmentation => "ANOMALY_SEGMENTATION",
        ActionClassification => "ACTION_CLASSIFICATION",
    }
}

impl TaskType {
    pub fn is_anomaly(self) -> bool {
        matches!(self, TaskType::AnomalyClassification | TaskType::AnomalySegmentation)
    }
}

configurable_enum! {
    pub enum TrainType("TrainType") {
        Incremental => "INCREMENTAL",
        Semisupervised => "SEMISUPERVISED",
        Selfsupervised => "SELFSUPERVISED",
    }
}

configurable_enum! {
    /// Post-training quantization preset.
    pub enum PotQuantizationPreset("POTQuantizationPreset") {
        Mixed => "MIXED",
        Performance => "PERFORMANCE",
    }
}

configurable_enum! {
    /// How anomaly scores are normalized before thresholding.
    pub enum NormalizationMethod("NormalizationMethod") {
        None => "none",
        Standard => "standard",
        MinMax => "minmax",
    }
}

configurable_enum! {
    pub enum ModelBackbone("ModelBackbone") {
        Resnet18 => "resnet18",
        WideResnet50 => "wide_resnet50",
    }
}
