// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shellgen CLI - generate a building shell into a document snapshot.
//!
//! # Commands
//!
//! - `shellgen generate` - Load a template or a prior snapshot, build the shell,
//!   write the snapshot
//! - `shellgen template` - Print the built-in starter template
//! - `shellgen points` - Print the wall loop corners in millimeters
//!
//! Logging is controlled by `RUST_LOG` (default `info`). Generator settings
//! can also be overridden with `SHELLGEN_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shellgen::{generate_points, starter_template, CommandStatus, ShellCommand, ShellConfig};
use shellgen_model::units::mm;
use shellgen_model::{
    convert_from_internal, Document, DocumentSnapshot, DocumentTemplate, LengthUnit,
};

#[derive(Parser)]
#[command(name = "shellgen", about = "Procedural building shell generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate walls, door, windows and roof into a document
    Generate {
        /// Document template JSON (defaults to the starter template)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Snapshot written by an earlier run to generate into
        #[arg(short, long, conflicts_with = "template")]
        document: Option<PathBuf>,

        /// Generator configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the document snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate even if the document already has a shell
        #[arg(long)]
        allow_duplicates: bool,
    },

    /// Print the starter document template
    Template,

    /// Print the rectangle corners in millimeters
    Points {
        #[arg(long, default_value_t = shellgen::config::DEFAULT_WIDTH_MM)]
        width_mm: f64,

        #[arg(long, default_value_t = shellgen::config::DEFAULT_DEPTH_MM)]
        depth_mm: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            template,
            document,
            config,
            output,
            allow_duplicates,
        } => {
            let doc = load_document(template.as_deref(), document.as_deref())?;
            let snapshot = cmd_generate(doc, config.as_deref(), allow_duplicates)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, snapshot)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Snapshot written");
                }
                None => println!("{snapshot}"),
            }
        }
        Commands::Template => {
            println!("{}", starter_template().to_json()?);
        }
        Commands::Points { width_mm, depth_mm } => {
            println!("{}", cmd_points(width_mm, depth_mm)?);
        }
    }

    Ok(())
}

/// Restores a prior snapshot, or builds a fresh document from a template.
fn load_document(template: Option<&Path>, document: Option<&Path>) -> Result<Document> {
    if let Some(path) = document {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read document {}", path.display()))?;
        let snapshot = DocumentSnapshot::from_json(&json)
            .with_context(|| format!("invalid document {}", path.display()))?;
        return Document::from_snapshot(&snapshot)
            .with_context(|| format!("failed to restore document {}", path.display()));
    }

    let template = match template {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path.display()))?;
            DocumentTemplate::from_json(&json)
                .with_context(|| format!("invalid template {}", path.display()))?
        }
        None => starter_template(),
    };
    Document::from_template(&template).context("failed to build document")
}

/// Runs the command on `doc` and returns the snapshot JSON.
fn cmd_generate(mut doc: Document, config: Option<&Path>, allow_duplicates: bool) -> Result<String> {

    let mut config = ShellConfig::load(config).context("failed to load configuration")?;
    config.allow_duplicates |= allow_duplicates;

    let result = ShellCommand::new(config).execute(&mut doc);
    match result.status {
        CommandStatus::Succeeded => {
            let ids = result
                .report
                .map(|r| r.element_ids(&doc))
                .unwrap_or_default();
            tracing::info!(elements = ids.len(), "Shell generated");
        }
        CommandStatus::Cancelled => {
            tracing::warn!(
                reason = result.message.as_deref().unwrap_or("no changes made"),
                "Generation cancelled"
            );
        }
        CommandStatus::Failed => {
            bail!(
                "shell generation failed: {}",
                result.message.unwrap_or_default()
            );
        }
    }

    doc.to_json().context("failed to serialize document")
}

fn cmd_points(width_mm: f64, depth_mm: f64) -> Result<String> {
    if !(width_mm > 0.0 && depth_mm > 0.0) {
        bail!("width and depth must be positive");
    }
    let points: Vec<[f64; 3]> = generate_points(mm(width_mm), mm(depth_mm))
        .iter()
        .map(|p| {
            [p.x, p.y, p.z].map(|v| convert_from_internal(v, LengthUnit::Millimeters))
        })
        .collect();
    Ok(serde_json::to_string_pretty(&points)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_with_starter_template() {
        let doc = load_document(None, None).unwrap();
        let json = cmd_generate(doc, None, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["walls"].as_array().unwrap().len(), 4);
        assert_eq!(value["roofs"].as_array().unwrap().len(), 1);
        assert_eq!(value["instances"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn generate_from_template_and_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.json");
        let config_path = dir.path().join("config.json");

        let mut template = starter_template();
        template.levels[0].name = "Level 1".into();
        std::fs::write(&template_path, template.to_json().unwrap()).unwrap();
        std::fs::write(
            &config_path,
            r#"{ "base_level": { "name": "Level 1" }, "width_mm": 6000 }"#,
        )
        .unwrap();

        let doc = load_document(Some(&template_path), None).unwrap();
        let json = cmd_generate(doc, Some(&config_path), false).unwrap();
        assert!(json.contains("\"walls\""));
    }

    #[test]
    fn failed_generation_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "top_level": { "name": "Roof" } }"#).unwrap();

        let doc = load_document(None, None).unwrap();
        let err = cmd_generate(doc, Some(&config_path), false).unwrap_err();
        assert!(err.to_string().contains("failed"));
    }

    #[test]
    fn missing_template_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(Some(&dir.path().join("nope.json")), None).unwrap_err();
        assert!(err.to_string().contains("failed to read template"));
    }

    fn wall_count(json: &str) -> usize {
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        value["walls"].as_array().unwrap().len()
    }

    #[test]
    fn rerun_on_generated_document() {
        let dir = tempfile::tempdir().unwrap();
        let first_path = dir.path().join("first.json");
        let first = cmd_generate(load_document(None, None).unwrap(), None, false).unwrap();
        std::fs::write(&first_path, &first).unwrap();

        // The shell is already there, so the second run changes nothing.
        let doc = load_document(None, Some(&first_path)).unwrap();
        let second = cmd_generate(doc, None, false).unwrap();
        assert_eq!(wall_count(&second), 4);
        assert_eq!(second, first);

        let doc = load_document(None, Some(&first_path)).unwrap();
        let third = cmd_generate(doc, None, true).unwrap();
        assert_eq!(wall_count(&third), 8);
    }

    #[test]
    fn template_is_not_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.json");
        std::fs::write(&path, starter_template().to_json().unwrap()).unwrap();
        let err = load_document(None, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("invalid document"));
    }

    #[test]
    fn document_and_template_conflict() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
        let parsed = Cli::try_parse_from([
            "shellgen", "generate", "--template", "a.json", "--document", "b.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn points_in_millimeters() {
        let json = cmd_points(10000.0, 5000.0).unwrap();
        let points: Vec<[f64; 3]> = serde_json::from_str(&json).unwrap();
        assert_eq!(points.len(), 5);
        assert!((points[0][0] + 5000.0).abs() < 1e-6);
        assert!((points[2][1] - 2500.0).abs() < 1e-6);
        assert!(cmd_points(0.0, 10.0).is_err());
    }
}
