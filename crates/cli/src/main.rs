// SPDX-FileCopyrightText: 2025 Russ Fellows <russ.fellows@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use otx_cfg_tasks::{parse_task_type, ModelTemplate, TemplateRegistry};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// otx-cfg – inspect, override and validate training parameters of model templates
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered model templates
    List {
        /// Only show templates for this task type (e.g. DETECTION)
        #[arg(long)]
        task: Option<String>,
    },
    /// Print a template's parameter schema with constraints and defaults
    Schema {
        /// Model template id
        #[arg(short, long)]
        template: String,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// Resolve the final parameters: defaults, then a values document, then overrides
    Params {
        /// Model template id
        #[arg(short, long)]
        template: String,

        /// Path to a YAML/JSON values document
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override a parameter, e.g. --set learning_parameters.batch_size=2
        #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_override)]
        overrides: Vec<(String, String)>,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,

        /// Only print values that differ from the defaults
        #[arg(long)]
        changed_only: bool,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate values documents against a template without running anything
    Validate {
        /// Model template id
        #[arg(short, long)]
        template: String,

        /// Documents to check; glob patterns are expanded
        #[arg(short, long, required = true, num_args = 1..)]
        config: Vec<String>,
    },
}

fn parse_override(s: &str) -> std::result::Result<(String, String), String> {
    let (path, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{}'", s))?;
    if path.trim().is_empty() {
        return Err(format!("missing parameter path in '{}'", s));
    }
    Ok((path.trim().to_string(), value.to_string()))
}

fn main() -> Result<()> {
    // Load environment variables from .env file early (RUST_LOG etc.)
    dotenvy::dotenv().ok(); // Ignore errors if .env doesn't exist

    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let log_level = if args.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("otx_cfg={0},otx_cfg_core={0},otx_cfg_tasks={0}", log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("otx-cfg v{} starting", env!("CARGO_PKG_VERSION"));

    let templates = TemplateRegistry::with_builtin_templates().context("Failed to register built-in templates")?;

    match args.command {
        Commands::List { task } => list_templates(&templates, task.as_deref()),
        Commands::Schema { template, json } => show_schema(find_template(&templates, &template)?, json),
        Commands::Params {
            template,
            config,
            overrides,
            json,
            changed_only,
            output,
        } => resolve_params(
            find_template(&templates, &template)?,
            config.as_deref(),
            &overrides,
            json,
            changed_only,
            output.as_deref(),
        ),
        Commands::Validate { template, config } => validate_documents(find_template(&templates, &template)?, &config),
    }
}

fn find_template<'a>(templates: &'a TemplateRegistry, id: &str) -> Result<&'a ModelTemplate> {
    templates.get(id).with_context(|| {
        format!(
            "Unknown model template '{}'. Available templates: {}",
            id,
            templates.ids().join(", ")
        )
    })
}

fn render(value: &serde_yaml::Value, json: bool) -> Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(value)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(serde_yaml::to_string(value)?)
    }
}

fn list_templates(templates: &TemplateRegistry, task: Option<&str>) -> Result<()> {
    let selected: Vec<&ModelTemplate> = match task {
        Some(token) => {
            let task_type = parse_task_type(token)?;
            templates.filter(task_type)
        }
        None => templates.iter().collect(),
    };

    for t in selected {
        println!(
            "{:<52} {:<24} {:<24} {}",
            t.model_template_id,
            t.task_type.to_string(),
            t.name,
            t.backbone
        );
    }
    Ok(())
}

fn show_schema(template: &ModelTemplate, json: bool) -> Result<()> {
    let config = template.config()?;
    print!("{}", render(&config.schema(), json)?);
    Ok(())
}

fn resolve_params(
    template: &ModelTemplate,
    document: Option<&Path>,
    overrides: &[(String, String)],
    json: bool,
    changed_only: bool,
    output: Option<&Path>,
) -> Result<()> {
    let config = template.load_config(document, overrides)?;

    let values = if changed_only {
        config.diff_from_defaults()
    } else {
        config.serialize()
    };
    let text = render(&values, json)?;

    if let Some(path) = output {
        std::fs::write(path, &text).with_context(|| format!("Failed to write parameters to {:?}", path))?;
        info!("Parameters for {} written to {:?}", template.model_template_id, path);
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let before = paths.len();
        for entry in glob::glob(pattern).with_context(|| format!("Invalid glob pattern '{}'", pattern))? {
            paths.push(entry?);
        }
        if paths.len() == before {
            anyhow::bail!("No config files match '{}'", pattern);
        }
    }
    Ok(paths)
}

fn validate_documents(template: &ModelTemplate, patterns: &[String]) -> Result<()> {
    let paths = expand_patterns(patterns)?;
    let no_overrides: &[(&str, &str)] = &[];

    let mut failed = 0usize;
    for path in &paths {
        match template.load_config(Some(path.as_path()), no_overrides) {
            Ok(_) => println!("✅ {}", path.display()),
            Err(e) => {
                failed += 1;
                error!("Validation failed for {:?}: {:#}", path, e);
                println!("❌ {}: {:#}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} documents failed validation", failed, paths.len());
    }
    println!("🎉 {} document(s) valid for {}", paths.len(), template.model_template_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("learning_parameters.batch_size=2").unwrap(),
            ("learning_parameters.batch_size".to_string(), "2".to_string())
        );
        assert_eq!(parse_override("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
        assert!(parse_override("no_equals").is_err());
        assert!(parse_override("=3").is_err());
    }

    #[test]
    fn test_args_parse_repeated_set() {
        let args = Args::try_parse_from([
            "otx-cfg",
            "params",
            "--template",
            "Custom_Object_Detection_Gen3_ATSS",
            "--set",
            "learning_parameters.num_iters=2",
            "--set",
            "learning_parameters.batch_size=2",
        ])
        .unwrap();
        match args.command {
            Commands::Params { overrides, .. } => assert_eq!(overrides.len(), 2),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
