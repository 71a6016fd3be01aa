use std::path::Path;

use tracing::debug;

use crate::error::CopyError;

/// Copies every staged rule file into a remote destination.
#[allow(async_fn_in_trait)]
pub trait Copier {
    async fn copy_to_destination(&self, source_dir: &Path, dest: &str) -> Result<(), CopyError>;
}

/// Copies with `gsutil cp {dir}/*.yaml {dest}`. gsutil expands the wildcard
/// itself, so no shell is involved.
#[derive(Debug, Clone)]
pub struct GsutilCopier {
    program: String,
}

impl Default for GsutilCopier {
    fn default() -> Self {
        Self {
            program: "gsutil".to_string(),
        }
    }
}

impl GsutilCopier {
    /// Arguments passed to the copy program.
    pub fn args(source_dir: &Path, dest: &str) -> Vec<String> {
        vec![
            "cp".to_string(),
            source_dir.join("*.yaml").display().to_string(),
            dest.to_string(),
        ]
    }
}

impl Copier for GsutilCopier {
    async fn copy_to_destination(&self, source_dir: &Path, dest: &str) -> Result<(), CopyError> {
        let args = Self::args(source_dir, dest);
        let command = format!("{} {}", self.program, args.join(" "));
        debug!(%command, "copying rule files");

        let output = tokio::process::Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| CopyError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(CopyError::Failed {
                command,
                status: output.status,
                output: combined.trim().to_string(),
            });
        }
        Ok(())
    }
}
