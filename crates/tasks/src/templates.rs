// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

// crates/tasks/src/templates.rs
use crate::anomaly::{padim_config, stfpm_config};
use crate::backbones::BackboneRegistry;
use crate::enums::TaskType;
use crate::sections::{action_classification_config, classification_config, detection_config, segmentation_config};
use anyhow::{Context, Result};
use otx_cfg_core::{load_document, ConfigurableEnum, Id, ParameterGroup, Registry};
use std::path::Path;
use tracing::info;

pub type SchemaFn = fn() -> otx_cfg_core::Result<ParameterGroup>;

/// A trainable model recipe: which task it solves and how it is configured.
#[derive(Debug, Clone)]
pub struct ModelTemplate {
    pub model_template_id: Id,
    pub name: String,
    pub task_type: TaskType,
    pub framework: String,
    pub backbone: String,
    pub schema: SchemaFn,
}

impl ModelTemplate {
    pub fn new(id: &str, name: &str, task_type: TaskType, framework: &str, backbone: &str, schema: SchemaFn) -> Self {
        Self {
            model_template_id: Id::new(id),
            name: name.to_string(),
            task_type,
            framework: framework.to_string(),
            backbone: backbone.to_string(),
            schema,
        }
    }

    /// Fresh configuration with default values.
    pub fn config(&self) -> otx_cfg_core::Result<ParameterGroup> {
        (self.schema)()
    }

    /// Defaults, then an optional values document, then `path=value` overrides.
    pub fn load_config<S: AsRef<str>>(&self, document: Option<&Path>, overrides: &[(S, S)]) -> Result<ParameterGroup> {
        let mut config = self
            .config()
            .with_context(|| format!("Failed to build schema for {}", self.model_template_id))?;

        if let Some(path) = document {
            info!("Loading parameters for {} from {:?}", self.model_template_id, path);
            let doc = load_document(path).with_context(|| format!("Failed to read config file {:?}", path))?;
            config
                .apply_document(&doc)
                .with_context(|| format!("Invalid parameters in {:?}", path))?;
        }

        if !overrides.is_empty() {
            config
                .apply_overrides(overrides.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
                .context("Invalid parameter override")?;
        }
        Ok(config)
    }
}

/// Explicit table of model templates, keyed by template id.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Registry<ModelTemplate>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            templates: Registry::new("templates"),
        }
    }

    pub fn with_builtin_templates() -> otx_cfg_core::Result<Self> {
        let mut registry = Self::new();
        for template in builtin_templates() {
            registry.register(template)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, template: ModelTemplate) -> otx_cfg_core::Result<()> {
        self.templates.register(template.model_template_id.to_string(), template)
    }

    pub fn get(&self, id: &str) -> Option<&ModelTemplate> {
        self.templates.get(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.templates.names().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelTemplate> {
        self.templates.iter().map(|(_, t)| t)
    }

    pub fn filter(&self, task_type: TaskType) -> Vec<&ModelTemplate> {
        self.iter().filter(|t| t.task_type == task_type).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Every template must name a registered backbone and build a valid schema.
    pub fn validate(&self, backbones: &BackboneRegistry) -> Result<()> {
        for template in self.iter() {
            if !backbones.contains(&template.backbone) {
                anyhow::bail!(
                    "Template {} uses unregistered backbone '{}'",
                    template.model_template_id,
                    template.backbone
                );
            }
            template
                .config()
                .with_context(|| format!("Schema for template {} is invalid", template.model_template_id))?;
        }
        Ok(())
    }
}

fn builtin_templates() -> Vec<ModelTemplate> {
    vec![
        ModelTemplate::new("ote_anomaly_classification_padim", "PADIM", TaskType::AnomalyClassification, "anomalib", "resnet18", padim_config),
        ModelTemplate::new("ote_anomaly_classification_stfpm", "STFPM", TaskType::AnomalyClassification, "anomalib", "resnet18", stfpm_config),
        ModelTemplate::new("ote_anomaly_segmentation_padim", "PADIM", TaskType::AnomalySegmentation, "anomalib", "resnet18", padim_config),
        ModelTemplate::new("ote_anomaly_segmentation_stfpm", "STFPM", TaskType::AnomalySegmentation, "anomalib", "resnet18", stfpm_config),
        ModelTemplate::new("Custom_Object_Detection_Gen3_ATSS", "ATSS", TaskType::Detection, "mmdetection", "mobilenetv2_w1", detection_config),
        ModelTemplate::new("Custom_Object_Detection_YOLOX", "YOLOX", TaskType::Detection, "mmdetection", "efficientnet_b2b", detection_config),
        ModelTemplate::new("Custom_Semantic_Segmentation_Lite-HRNet-18_OCR", "Lite-HRNet-18", TaskType::Segmentation, "mmsegmentation", "litehrnet18", segmentation_config),
        ModelTemplate::new("Custom_Image_Classification_EfficinetNet-B0", "EfficientNet-B0", TaskType::Classification, "mmclassification", "efficientnet_b0", classification_config),
        ModelTemplate::new("Custom_Image_Classification_MobileNet-V3-large-1x", "MobileNet-V3-large-1x", TaskType::Classification, "mmclassification", "mobilenet_v3_large", classification_config),
        ModelTemplate::new("Custom_Action_Classification_X3D", "X3D", TaskType::ActionClassification, "mmaction", "X3D", action_classification_config),
    ]
}

/// Parse a task type token such as `DETECTION`, case-insensitively.
pub fn parse_task_type(token: &str) -> otx_cfg_core::Result<TaskType> {
    TaskType::parse(&token.to_ascii_uppercase())
}
