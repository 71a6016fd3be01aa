use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rulegen", version, about = "Generate security scanner rules from a deployment config")]
pub struct Cli {
    /// Log level filter, used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate every scanner rule file and write it to its destination
    Rules {
        /// Path to the deployment config file
        #[arg(short, long)]
        config: PathBuf,

        /// Local directory or gs:// bucket (defaults to the forseti server bucket)
        #[arg(short, long)]
        output_path: Option<String>,
    },

    /// Print the unexpected-access metrics derived from bucket expected users
    Metrics {
        /// Path to the deployment config file
        #[arg(short, long)]
        config: PathBuf,
    },
}
