//! cavegen - headless cave generation
//!
//! Generates a grid of regions from a TOML config and prints a per-region summary.

use anyhow::Result;
use cavegen::{export, run, GeneratorConfig, MAX_GRID_RADIUS};
use std::{env, path::PathBuf};
use tracing::info;

#[derive(Debug, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    grid_radius: Option<i32>,
    export_path: Option<PathBuf>,
    save_config: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config_path = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--seed" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.seed = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--seed must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--seed requires an integer");
                    }
                }
                "--grid-radius" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<i32>() {
                            Ok(value) => {
                                opts.grid_radius = Some(value.clamp(0, MAX_GRID_RADIUS))
                            }
                            Err(err) => {
                                tracing::error!(
                                    %err,
                                    value = %raw,
                                    "--grid-radius must be an integer"
                                );
                            }
                        }
                    } else {
                        tracing::error!("--grid-radius requires an integer");
                    }
                }
                "--export" => {
                    if let Some(path) = args.next() {
                        opts.export_path = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--export requires a file path");
                    }
                }
                "--save-config" => {
                    if let Some(path) = args.next() {
                        opts.save_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--save-config requires a file path");
                    }
                }
                other => tracing::warn!(arg = other, "ignoring unknown argument"),
            }
        }
        opts
    }
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting cavegen v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let mut config = match &cli.config_path {
        Some(path) => GeneratorConfig::load_from_path(path),
        None => GeneratorConfig::load(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(radius) = cli.grid_radius {
        config.grid_radius = radius;
    }
    if let Some(path) = &cli.save_config {
        config.save_to_path(path)?;
        info!("Saved config to {}", path.display());
    }

    let summaries = run(&config)?;
    for summary in &summaries {
        println!(
            "{:?}..={:?}  caves={:<6} bounded={:<4} floors={:<4} anchors={:<4} {}us",
            summary.min,
            summary.max,
            summary.cave_voxels,
            summary.bounded_caves,
            summary.floor_columns,
            summary.object_anchors,
            summary.micros
        );
    }
    if let Some(path) = &cli.export_path {
        export(path, &summaries)?;
        info!("Exported {} region summaries to {}", summaries.len(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_known_flags() {
        let opts = parse(&["--seed", "42", "--grid-radius", "99", "--export", "out.json"]);
        assert_eq!(opts.seed, Some(42));
        assert_eq!(opts.grid_radius, Some(16));
        assert_eq!(opts.export_path, Some(PathBuf::from("out.json")));
        assert!(opts.config_path.is_none());
    }

    #[test]
    fn bad_values_are_ignored() {
        let opts = parse(&["--seed", "abc", "--config"]);
        assert_eq!(opts.seed, None);
        assert!(opts.config_path.is_none());
    }
}
