use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::schema::Config;

/// Load a [`Config`] from a YAML file on disk.
///
/// The returned config has been validated and normalized; rule generators
/// can read it as-is.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config = load_config_from_str(&contents)
        .with_context(|| format!("failed to load config file: {}", path.display()))?;

    info!(
        path = %path.display(),
        projects = config.projects.len(),
        "deployment config loaded"
    );
    Ok(config)
}

/// Parse, validate and normalize a [`Config`] from a YAML string.
///
/// Validation failures keep their [`ValidationError`](crate::ValidationError)
/// type and can be recovered with `downcast_ref`.
pub fn load_config_from_str(yaml: &str) -> Result<Config> {
    let mut config: Config = serde_yml::from_str(yaml).context("YAML deserialization failed")?;
    config.init()?;
    Ok(config)
}
