// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod anomaly;
pub mod backbones;
pub mod enums;
pub mod sections;
pub mod templates;
pub mod training_options;

#[cfg(test)]
mod tests;

// Re-export main types
pub use backbones::{builtin_backbones, BackboneRegistry, BackboneSpec};
pub use enums::{ModelBackbone, NormalizationMethod, PotQuantizationPreset, TaskType, TrainType};
pub use templates::{parse_task_type, ModelTemplate, TemplateRegistry};
pub use training_options::TrainingOptions;
