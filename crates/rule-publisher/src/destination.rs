use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::error::PublishError;

/// Where rule files end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A local directory; files are written into it directly.
    Local(PathBuf),
    /// A GCS bucket URI; files are staged locally and copied under `rules/`.
    Bucket(Url),
}

impl Destination {
    /// The URI the staged files are copied to: `rules` joined onto the bucket
    /// path. `None` for local destinations.
    pub fn rules_uri(&self) -> Option<String> {
        let Self::Bucket(url) = self else {
            return None;
        };
        let mut base = url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let joined = base.join("rules").unwrap_or(base);
        Some(joined.to_string())
    }
}

impl FromStr for Destination {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("gs://") {
            return Ok(Self::Local(PathBuf::from(s)));
        }
        let url = Url::parse(s).map_err(|source| PublishError::InvalidDestination {
            destination: s.to_string(),
            source,
        })?;
        Ok(Self::Bucket(url))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Bucket(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_paths_are_not_parsed_as_urls() {
        let dest: Destination = "/tmp/rules-out".parse().unwrap();
        assert_eq!(dest, Destination::Local(PathBuf::from("/tmp/rules-out")));
        assert_eq!(dest.rules_uri(), None);
    }

    #[test]
    fn bucket_rules_uri() {
        let dest: Destination = "gs://my-forseti-project-server/".parse().unwrap();
        assert_eq!(
            dest.rules_uri().as_deref(),
            Some("gs://my-forseti-project-server/rules")
        );
    }

    #[test]
    fn bucket_subdirectory_without_trailing_slash() {
        let dest: Destination = "gs://bucket/forseti".parse().unwrap();
        assert_eq!(dest.rules_uri().as_deref(), Some("gs://bucket/forseti/rules"));
    }

    #[test]
    fn invalid_bucket_uri_is_rejected() {
        let err = "gs://[::1/rules".parse::<Destination>().unwrap_err();
        assert!(matches!(err, PublishError::InvalidDestination { .. }));
    }
}
