use std::path::PathBuf;

use deploy_config::Config;
use rulegen::RuleFiles;
use tracing::info;

use crate::copier::Copier;
use crate::destination::Destination;
use crate::error::PublishError;
use crate::writer::write_rule_files;

/// Write `files` to `destination`.
///
/// Bucket destinations are staged in a temporary directory, which is removed
/// once the copy finishes. Returns the local paths written (for buckets, the
/// staged paths, which no longer exist on return).
pub async fn publish<C: Copier>(
    files: &RuleFiles,
    destination: &Destination,
    copier: &C,
) -> Result<Vec<PathBuf>, PublishError> {
    match destination {
        Destination::Local(dir) => write_rule_files(files, dir).await,
        Destination::Bucket(_) => {
            let staging = tempfile::tempdir().map_err(PublishError::TempDir)?;
            let written = write_rule_files(files, staging.path()).await?;

            let rules_uri = destination.rules_uri().unwrap_or_else(|| destination.to_string());
            copier
                .copy_to_destination(staging.path(), &rules_uri)
                .await
                .map_err(|source| PublishError::Copy {
                    destination: rules_uri.clone(),
                    source,
                })?;
            info!(destination = %rules_uri, files = written.len(), "rules uploaded");
            Ok(written)
        }
    }
}

/// Pick the destination for a run: `output_path` when given, else the
/// forseti server bucket.
pub fn resolve_destination(config: &Config, output_path: Option<&str>) -> Result<Destination, PublishError> {
    if config.forseti.is_none() {
        return Err(PublishError::MissingForseti);
    }
    let path = match output_path.filter(|p| !p.is_empty()) {
        Some(path) => path,
        None => config
            .forseti_generated_fields()
            .map(|f| f.server_bucket.as_str())
            .unwrap_or_default(),
    };
    if path.is_empty() {
        return Err(PublishError::MissingServerBucket);
    }
    path.parse()
}

/// Generate every rule file for `config` and publish it.
///
/// Nothing is written when any generator fails; the returned error carries
/// the partial output and every failure.
pub async fn run<C: Copier>(
    config: &Config,
    output_path: Option<&str>,
    copier: &C,
) -> Result<Vec<PathBuf>, PublishError> {
    let destination = resolve_destination(config, output_path)?;
    let files = rulegen::generate_all(config)?;
    info!(%destination, files = files.len(), "publishing rules");
    publish(&files, &destination, copier).await
}
