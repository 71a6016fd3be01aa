mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use deploy_config::{loader, Config, Metric};
use rule_publisher::{GsutilCopier, PublishError};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{Cli, Command};

/// Metrics derived for one project, as printed by `rulegen metrics`.
#[derive(Debug, Serialize)]
struct ProjectMetrics<'a> {
    project: &'a str,
    metrics: Vec<Metric>,
}

async fn generate_rules(config_path: &Path, output_path: Option<&str>) -> Result<()> {
    let config = loader::load_config(config_path)?;

    match rule_publisher::run(&config, output_path, &GsutilCopier::default()).await {
        Ok(written) => {
            info!(files = written.len(), "rule generation complete");
            Ok(())
        }
        Err(PublishError::Generation(partial)) => {
            warn!(
                generated = partial.rules.len(),
                failed = partial.error.failures.len(),
                "not writing partial rule output"
            );
            Err(partial.error).context("rule generation failed")
        }
        Err(err) => Err(err).context("failed to publish rules"),
    }
}

fn derived_metrics(config: &Config) -> Vec<ProjectMetrics<'_>> {
    let mut out = Vec::new();
    for project in config.all_projects() {
        let derived = project.derived_metrics();
        for err in &derived.errors {
            warn!(project = %project.id, error = %err, "skipping metric");
        }
        if !derived.metrics.is_empty() {
            out.push(ProjectMetrics {
                project: &project.id,
                metrics: derived.metrics,
            });
        }
    }
    out
}

fn print_metrics(config_path: &Path) -> Result<()> {
    let config = loader::load_config(config_path)?;
    let metrics = derived_metrics(&config);
    let yaml = serde_yml::to_string(&metrics).context("failed to serialize metrics")?;
    print!("{yaml}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Rules {
            config,
            output_path,
        } => {
            info!(config_file = %config.display(), "generating rules");
            generate_rules(&config, output_path.as_deref()).await
        }
        Command::Metrics { config } => {
            info!(config_file = %config.display(), "deriving metrics");
            print_metrics(&config)
        }
    }
}
