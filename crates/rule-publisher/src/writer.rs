use std::path::{Path, PathBuf};

use rulegen::RuleFiles;
use tracing::info;

use crate::error::PublishError;

/// Path of the rule file for `generator` inside `dir`.
pub fn rule_file_path(dir: &Path, generator: &str) -> PathBuf {
    dir.join(format!("{generator}_rules.yaml"))
}

/// Write each rule file as `{dir}/{name}_rules.yaml`, creating `dir` if
/// needed. Returns the written paths in generator-name order.
pub async fn write_rule_files(files: &RuleFiles, dir: &Path) -> Result<Vec<PathBuf>, PublishError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| PublishError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut written = Vec::with_capacity(files.len());
    for (generator, file) in files {
        let yaml = serde_yml::to_string(file).map_err(|source| PublishError::Serialize {
            generator: generator.clone(),
            source,
        })?;

        let path = rule_file_path(dir, generator);
        info!(path = %path.display(), "writing rules");
        tokio::fs::write(&path, yaml)
            .await
            .map_err(|source| PublishError::Write {
                path: path.clone(),
                source,
            })?;
        written.push(path);
    }
    Ok(written)
}
