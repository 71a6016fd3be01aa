use std::path::PathBuf;

use thiserror::Error;

/// Failure of the external copy step.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("failed to run {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command:?} exited with {status}: {output}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        output: String,
    },
}

/// Errors raised while writing or uploading rule files.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("forseti config must be set when using the rule generator")]
    MissingForseti,

    #[error("no output path given and forseti server_bucket is not set")]
    MissingServerBucket,

    #[error("failed to parse destination {destination:?}: {source}")]
    InvalidDestination {
        destination: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to create temp dir: {0}")]
    TempDir(#[source] std::io::Error),

    #[error("failed to create output directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to marshal rules for {generator:?}: {source}")]
    Serialize {
        generator: String,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to write rules to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Generation(#[from] rulegen::PartialGeneration),

    #[error("failed to copy yaml files to {destination}: {source}")]
    Copy {
        destination: String,
        #[source]
        source: CopyError,
    },
}
