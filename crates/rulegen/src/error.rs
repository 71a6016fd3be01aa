use std::fmt::Write as _;

use deploy_config::LookupError;
use thiserror::Error;

use crate::dispatcher::RuleFiles;

/// Failure of a single generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("failed to serialize rules: {0}")]
    Serialize(#[from] serde_yml::Error),

    #[error("{0}")]
    Other(String),
}

/// One generator that failed during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorFailure {
    pub generator: String,
    pub message: String,
}

/// Every generator failure from a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to generate rules for {} scanners:\n{}", .failures.len(), list_failures(.failures))]
pub struct AggregateGenerationError {
    pub failures: Vec<GeneratorFailure>,
}

impl AggregateGenerationError {
    pub fn failed_generators(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.generator.as_str())
    }
}

fn list_failures(failures: &[GeneratorFailure]) -> String {
    let mut out = String::new();
    for (i, f) in failures.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "- {:?}: {}", f.generator, f.message);
    }
    out
}

/// A dispatch where at least one generator failed. `rules` holds the output
/// of every generator that succeeded; writing it is up to the caller.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PartialGeneration {
    pub rules: RuleFiles,
    pub error: AggregateGenerationError,
}
