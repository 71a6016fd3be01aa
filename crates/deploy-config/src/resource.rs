use serde::{Deserialize, Serialize};

use crate::bucket::Bucket;
use crate::dataset::Dataset;
use crate::error::ValidationError;
use crate::instance::Instance;

/// The slice of a [`Project`](crate::Project) that resources need while they
/// are being normalized.
#[derive(Debug, Clone, Copy)]
pub struct ProjectContext<'a> {
    pub id: &'a str,
    pub owners_group: &'a str,
    pub readwrite_groups: &'a [String],
    pub readonly_groups: &'a [String],
    /// Name of the project's audit-log bucket, if one is declared.
    pub audit_logs_bucket: Option<&'a str>,
}

impl<'a> ProjectContext<'a> {
    /// Default `(role, group)` grants: owners first, then read-write groups,
    /// then read-only groups. Blank group emails are skipped.
    pub fn default_grants(
        &self,
        owner_role: &str,
        write_role: &str,
        read_role: &str,
    ) -> Vec<(String, &'a str)> {
        let owners = std::iter::once(self.owners_group).map(|g| (owner_role, g));
        let writers = self.readwrite_groups.iter().map(|g| (write_role, g.as_str()));
        let readers = self.readonly_groups.iter().map(|g| (read_role, g.as_str()));

        owners
            .chain(writers)
            .chain(readers)
            .filter(|(_, group)| !group.is_empty())
            .map(|(role, group)| (role.to_string(), group))
            .collect()
    }

    /// Bucket that receives this project's access logs.
    pub fn log_bucket(&self) -> String {
        match self.audit_logs_bucket {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}-logs", self.id),
        }
    }
}

/// Capabilities shared by every data resource kind.
pub trait DataResource {
    /// Resource type as named in scanner rules (`bucket`, `dataset`, ...).
    fn kind(&self) -> &'static str;

    fn name(&self) -> &str;

    /// Location (or zone) the resource is pinned to, as declared.
    fn location_key(&self) -> &str;

    /// Validate the declaration and apply project defaults in place.
    fn init(&mut self, project: &ProjectContext<'_>) -> Result<(), ValidationError>;
}

/// A data resource declared under a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResourceEntry", into = "ResourceEntry")]
pub enum Resource {
    Bucket(Bucket),
    Dataset(Dataset),
    Instance(Instance),
}

impl Resource {
    fn inner(&self) -> &dyn DataResource {
        match self {
            Resource::Bucket(b) => b,
            Resource::Dataset(d) => d,
            Resource::Instance(i) => i,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn DataResource {
        match self {
            Resource::Bucket(b) => b,
            Resource::Dataset(d) => d,
            Resource::Instance(i) => i,
        }
    }
}

impl DataResource for Resource {
    fn kind(&self) -> &'static str {
        self.inner().kind()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn location_key(&self) -> &str {
        self.inner().location_key()
    }

    fn init(&mut self, project: &ProjectContext<'_>) -> Result<(), ValidationError> {
        self.inner_mut().init(project)
    }
}

/// On-disk shape of a resource list entry: a map with a single kind key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcs_bucket: Option<Bucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bigquery_dataset: Option<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gce_instance: Option<Instance>,
}

impl TryFrom<ResourceEntry> for Resource {
    type Error = ValidationError;

    fn try_from(entry: ResourceEntry) -> Result<Self, Self::Error> {
        match (entry.gcs_bucket, entry.bigquery_dataset, entry.gce_instance) {
            (Some(b), None, None) => Ok(Resource::Bucket(b)),
            (None, Some(d), None) => Ok(Resource::Dataset(d)),
            (None, None, Some(i)) => Ok(Resource::Instance(i)),
            (b, d, i) => Err(ValidationError::ResourceKind {
                found: [b.is_some(), d.is_some(), i.is_some()]
                    .into_iter()
                    .filter(|present| *present)
                    .count(),
            }),
        }
    }
}

impl From<Resource> for ResourceEntry {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::Bucket(b) => ResourceEntry {
                gcs_bucket: Some(b),
                ..Default::default()
            },
            Resource::Dataset(d) => ResourceEntry {
                bigquery_dataset: Some(d),
                ..Default::default()
            },
            Resource::Instance(i) => ResourceEntry {
                gce_instance: Some(i),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(rw: &'a [String], ro: &'a [String]) -> ProjectContext<'a> {
        ProjectContext {
            id: "my-project",
            owners_group: "owners@x.com",
            readwrite_groups: rw,
            readonly_groups: ro,
            audit_logs_bucket: None,
        }
    }

    #[test]
    fn default_grants_are_owner_then_write_then_read() {
        let rw = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let ro = vec!["c@x.com".to_string()];
        let grants = ctx(&rw, &ro).default_grants("O", "W", "R");
        assert_eq!(
            grants,
            vec![
                ("O".to_string(), "owners@x.com"),
                ("W".to_string(), "a@x.com"),
                ("W".to_string(), "b@x.com"),
                ("R".to_string(), "c@x.com"),
            ]
        );
    }

    #[test]
    fn log_bucket_defaults_to_project_logs() {
        let c = ctx(&[], &[]);
        assert_eq!(c.log_bucket(), "my-project-logs");

        let named = ProjectContext {
            audit_logs_bucket: Some("central-logs"),
            ..c
        };
        assert_eq!(named.log_bucket(), "central-logs");
    }

    #[test]
    fn parses_single_kind_entries() {
        let yaml = r#"
- gcs_bucket:
    properties:
      name: foo-bucket
      location: us-east1
- bigquery_dataset:
    properties:
      name: foo-dataset
      location: US
- gce_instance:
    properties:
      name: foo-instance
      zone: us-east1-a
"#;
        let resources: Vec<Resource> = serde_yml::from_str(yaml).unwrap();
        let kinds: Vec<_> = resources.iter().map(|r| (r.kind(), r.name())).collect();
        assert_eq!(
            kinds,
            vec![
                ("bucket", "foo-bucket"),
                ("dataset", "foo-dataset"),
                ("instance", "foo-instance"),
            ]
        );
        assert_eq!(resources[2].location_key(), "us-east1-a");
    }

    #[test]
    fn rejects_entry_with_two_kinds() {
        let yaml = r#"
- gcs_bucket:
    properties:
      name: a
  gce_instance:
    properties:
      name: b
"#;
        let err = serde_yml::from_str::<Vec<Resource>>(yaml).unwrap_err();
        assert!(
            err.to_string().contains("exactly one of"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let yaml = r#"
- pubsub_topic:
    properties:
      name: t
"#;
        assert!(serde_yml::from_str::<Vec<Resource>>(yaml).is_err());
    }
}
