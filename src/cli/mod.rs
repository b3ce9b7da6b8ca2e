//! SOL-007: CLI subcommands — resources, blocks, sniff.
//!
//! Thin inspection layer over the core loaders: load a definition file and
//! dump what the core sees as JSON. Diagnostics go to stderr; any error
//! diagnostic makes the command fail.

use crate::core::{schema, script, version};
use clap::Subcommand;
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a scripted definition file and print its resources
    Resources {
        /// Path to the scripted definition file
        file: PathBuf,
    },

    /// Print the recognized top-level blocks of a declarative file
    Blocks {
        /// Path to the declarative definition file
        file: PathBuf,
    },

    /// Extract version requirements from a declarative file
    Sniff {
        /// Path to the declarative definition file
        file: PathBuf,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Resources { file } => cmd_resources(&file),
        Commands::Blocks { file } => cmd_blocks(&file),
        Commands::Sniff { file } => cmd_sniff(&file),
    }
}

fn cmd_resources(file: &Path) -> Result<(), String> {
    let (resources, diags) = script::load_script_file(file);
    report(&diags);

    let rendered = serde_json::to_string_pretty(&resources)
        .map_err(|e| format!("failed to render resources: {}", e))?;
    println!("{}", rendered);

    finish(&diags)
}

fn cmd_blocks(file: &Path) -> Result<(), String> {
    let src = read_source(file)?;
    let (body, mut diags) = schema::parse_body(&file.display().to_string(), &src);

    let mut summary = Vec::new();
    if let Some(body) = body {
        let (by_type, extract_diags) = schema::extract_top_level(&body);
        diags.extend(extract_diags);
        for (block_type, blocks) in &by_type {
            for block in blocks {
                summary.push(json!({
                    "type": block_type,
                    "labels": block.labels,
                }));
            }
        }
    }
    report(&diags);

    let rendered = serde_json::to_string_pretty(&summary)
        .map_err(|e| format!("failed to render blocks: {}", e))?;
    println!("{}", rendered);

    finish(&diags)
}

fn cmd_sniff(file: &Path) -> Result<(), String> {
    let src = read_source(file)?;
    let (constraints, diags) = version::sniff_source(&file.display().to_string(), &src);
    report(&diags);

    let rendered = serde_json::to_string_pretty(&constraints)
        .map_err(|e| format!("failed to render constraints: {}", e))?;
    println!("{}", rendered);

    finish(&diags)
}

fn read_source(file: &Path) -> Result<String, String> {
    std::fs::read_to_string(file).map_err(|e| format!("failed to read {}: {}", file.display(), e))
}

fn report(diags: &crate::core::diag::Diagnostics) {
    for diag in diags.iter() {
        eprintln!("{}", diag);
    }
}

fn finish(diags: &crate::core::diag::Diagnostics) -> Result<(), String> {
    if diags.has_errors() {
        Err("load completed with errors".to_string())
    } else {
        Ok(())
    }
}
