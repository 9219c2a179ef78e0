// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/tasks/src/backbones.rs
//
// Backbones are registered by explicit calls into a registry the caller owns.
//
use otx_cfg_core::{Registry, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackboneSpec {
    pub name: String,
    /// Training framework the backbone is provided by
    pub framework: String,
    /// Channels of each feature level the backbone exposes
    pub out_channels: Vec<usize>,
    pub pretrained: bool,
}

impl BackboneSpec {
    pub fn new(name: &str, framework: &str, out_channels: &[usize], pretrained: bool) -> Self {
        Self {
            name: name.to_string(),
            framework: framework.to_string(),
            out_channels: out_channels.to_vec(),
            pretrained,
        }
    }
}

pub type BackboneRegistry = Registry<BackboneSpec>;

fn register_all(registry: &mut BackboneRegistry, specs: Vec<BackboneSpec>) -> Result<()> {
    for spec in specs {
        registry.register(spec.name.clone(), spec)?;
    }
    Ok(())
}

pub fn register_anomaly_backbones(registry: &mut BackboneRegistry) -> Result<()> {
    register_all(
        registry,
        vec![
            BackboneSpec::new("resnet18", "anomalib", &[64, 128, 256], true),
            BackboneSpec::new("wide_resnet50", "anomalib", &[256, 512, 1024], true),
        ],
    )
}

pub fn register_action_backbones(registry: &mut BackboneRegistry) -> Result<()> {
    register_all(
        registry,
        vec![
            BackboneSpec::new("X3D", "mmaction", &[432], true),
            BackboneSpec::new("MoViNetBase", "mmaction", &[480], true),
        ],
    )
}

pub fn register_detection_backbones(registry: &mut BackboneRegistry) -> Result<()> {
    register_all(
        registry,
        vec![
            BackboneSpec::new("mobilenetv2_w1", "mmdetection", &[24, 32, 96, 320], true),
            BackboneSpec::new("efficientnet_b2b", "mmdetection", &[24, 48, 120, 352], true),
        ],
    )
}

pub fn register_segmentation_backbones(registry: &mut BackboneRegistry) -> Result<()> {
    register_all(
        registry,
        vec![BackboneSpec::new("litehrnet18", "mmsegmentation", &[40, 80, 160, 320], true)],
    )
}

pub fn register_classification_backbones(registry: &mut BackboneRegistry) -> Result<()> {
    register_all(
        registry,
        vec![
            BackboneSpec::new("efficientnet_b0", "mmclassification", &[1280], true),
            BackboneSpec::new("mobilenet_v3_large", "mmclassification", &[960], true),
        ],
    )
}

/// Registry holding every backbone known to the built-in templates.
pub fn builtin_backbones() -> Result<BackboneRegistry> {
    let mut registry = BackboneRegistry::new("backbones");
    register_anomaly_backbones(&mut registry)?;
    register_action_backbones(&mut registry)?;
    register_detection_backbones(&mut registry)?;
    register_segmentation_backbones(&mut registry)?;
    register_classification_backbones(&mut registry)?;
    Ok(registry)
}
