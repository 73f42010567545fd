// SPDX-License-Identifier: MIT OR Apache-2.0
//! Turnroot skill runner.
//!
//! Loads a skill graph asset, fires one battle event at it and prints what
//! happened. Suspended cues can be resumed automatically, standing in for
//! the presentation layer, so designers can dry-run a skill end to end.

mod config;
mod report;

use clap::{Parser, Subcommand};
use config::{ConfigError, RunnerConfig};
use report::RunReport;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use turnroot_skill_graph::library;
use turnroot_skill_graph::{AssetError, EventKind, ExecutionError, GraphAsset, GraphError, GraphExecutor};

/// Dry-run Turnroot skill graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fire one event at a graph asset
    Run {
        /// Path to the graph asset (RON)
        graph: PathBuf,
        /// Event to fire, e.g. `unit_attacks` or a custom event name
        event: EventKind,

        /// Runner configuration (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Resume every suspension as soon as it parks
        #[arg(short, long)]
        auto_resume: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stock events and built-in node kinds
    Nodes,
}

#[derive(Debug, Error)]
enum RunnerError {
    #[error("Failed to load graph: {0}")]
    Asset(#[from] AssetError),

    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error("Graph cannot run: {0}")]
    Graph(#[from] GraphError),

    #[error("Execution failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("turnroot_skill_graph=debug,turnroot_skill_runner=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match Cli::parse().command {
        Command::Run {
            graph,
            event,
            config,
            auto_resume,
            json,
        } => run(&graph, &event, config.as_deref(), auto_resume, json),
        Command::Nodes => {
            print!("{}", node_listing());
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(
    graph_path: &Path,
    event: &EventKind,
    config_path: Option<&Path>,
    auto_resume: bool,
    json: bool,
) -> Result<(), RunnerError> {
    let graph = GraphAsset::load(graph_path)?;
    let mut config = match config_path {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    config.auto_resume |= auto_resume;

    let executor = GraphExecutor::with_settings(&graph, config.executor.clone())?;
    let mut ctx = config.seeded_context();

    tracing::info!(
        graph = %graph.name,
        %event,
        max_node_visits = executor.settings().max_node_visits,
        "Firing event"
    );
    let mut status = executor.trigger(event, &mut ctx)?;

    let mut played = Vec::new();
    while config.auto_resume && !ctx.state().is_finished() {
        let Some(handle) = status.handles().first().cloned() else {
            break;
        };
        let cue = handle.cue.clone().unwrap_or_else(|| handle.node.to_string());
        tracing::info!(cue = %cue, "Auto-resuming");
        played.push(cue);
        status = executor.resume(&handle, &mut ctx)?;
    }

    let report = RunReport::new(&graph, event.name(), &status, &ctx, played, &config.report_keys);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn node_listing() -> String {
    let mut out = String::from("Events:\n");
    for event in &EventKind::STOCK {
        out.push_str(&format!("  {:<16} {}\n", event.name(), event.description()));
    }
    out.push_str("Nodes:\n");
    for info in library::catalog() {
        out.push_str(&format!("  {:<16} {:<11} {}\n", info.tag, format!("{:?}", info.category), info.label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_listing_covers_events_and_kinds() {
        let listing = node_listing();
        assert!(listing.contains("unit_attacks"));
        assert!(listing.contains("Runs when this unit attacks"));
        assert!(listing.contains("play_cue"));
        assert!(listing.contains("Waits for an animation or effect to finish"));
        assert_eq!(listing.lines().count(), 2 + EventKind::STOCK.len() + library::catalog().len());
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from(["skill-runner", "run", "sol.ron", "unit_attacks", "--auto-resume"]).unwrap();
        match cli.command {
            Command::Run { event, auto_resume, json, .. } => {
                assert_eq!(event, EventKind::UnitAttacks);
                assert!(auto_resume);
                assert!(!json);
            }
            Command::Nodes => panic!("expected run"),
        }
    }
}
