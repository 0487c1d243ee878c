// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: pair parallel edge lines from a drawing dump and print the
//! resulting centerlines as JSON
//!
//! Usage:
//!   linerun <lines.json> [options]

use anyhow::{bail, Context};
use linerun_centerline::{process_drawing, LayerFilter, PairingConfig, RawLine};
use serde::Deserialize;
use std::env;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Line dump as written by the drawing exporter
#[derive(Debug, Deserialize)]
struct LineDump {
    #[serde(default)]
    config: Option<PairingConfig>,
    lines: Vec<RawLine>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut layers: Vec<String> = Vec::new();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "--layer" | "--config" if i + 1 >= args.len() => {
                bail!("option {} needs a value", args[i]);
            }
            "--output" => {
                i += 1;
                output_path = Some(args[i].clone());
            }
            "--layer" => {
                i += 1;
                layers.push(args[i].clone());
            }
            "--config" => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            other => {
                print_usage();
                bail!("unknown option: {other}");
            }
        }
        i += 1;
    }

    let content = fs::read_to_string(input_path)
        .with_context(|| format!("cannot read line dump '{input_path}'"))?;
    let dump: LineDump = serde_json::from_str(&content)
        .with_context(|| format!("cannot parse line dump '{input_path}'"))?;

    let config = match config_path {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("cannot read config '{path}'"))?;
            PairingConfig::from_json_str(&json)
                .with_context(|| format!("invalid config '{path}'"))?
        }
        None => dump.config.unwrap_or_default(),
    };

    let filter = if layers.is_empty() {
        LayerFilter::All
    } else {
        LayerFilter::only(layers)
    };

    tracing::info!(
        input = %input_path,
        lines = dump.lines.len(),
        "pairing edge lines"
    );

    let results = process_drawing(&dump.lines, &filter, &config)?;

    for result in &results {
        tracing::info!(
            layer = %result.layer,
            segments = result.stats.segment_count,
            rejected = result.stats.rejected_count,
            centerlines = result.centerlines.len(),
            "layer done"
        );
    }

    let json = serde_json::to_string_pretty(&results)?;
    match output_path {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("cannot write '{path}'"))?;
            tracing::info!(output = %path, "centerlines written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn print_usage() {
    println!(
        r#"linerun - duct and cable-tray centerlines from CAD edge lines

USAGE:
  linerun <lines.json> [OPTIONS]

ARGUMENTS:
  <lines.json>        Line dump: {{ "config": {{...}}, "lines": [{{ "layer", "start", "end" }}] }}

OPTIONS:
  --output <path>     Write the JSON result to a file instead of stdout
  --layer <name>      Only process this layer (repeatable)
  --config <path>     JSON thresholds overriding the dump's "config"
  -h, --help          Show this help message

Set RUST_LOG=debug for per-layer diagnostics."#
    );
}
