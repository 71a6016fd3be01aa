use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::binding::{merge_bindings, Binding};
use crate::error::{RenderError, ValidationError};
use crate::metric::{render_unexpected_access_filter, Metric};
use crate::resource::{DataResource, ProjectContext};

const KIND: &str = "bucket";

/// A Cloud Storage bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub properties: BucketProperties,
    /// Principals allowed to read data. Access by anyone else is counted by a
    /// derived log metric.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_users: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketProperties {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub versioning: Versioning,
    #[serde(default)]
    pub logging: BucketLogging,
    /// Remaining template properties, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Versioning {
    /// `None` when the config does not mention versioning at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketLogging {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_bucket: String,
}

impl Bucket {
    /// Derived metric counting data access by principals outside
    /// `expected_users`. `Ok(None)` when no expected users are declared.
    pub fn unexpected_access_metric(&self, project_id: &str) -> Result<Option<Metric>, RenderError> {
        if self.expected_users.is_empty() {
            return Ok(None);
        }
        let filter = render_unexpected_access_filter(project_id, self.name(), &self.expected_users)?;
        Ok(Some(Metric::unexpected_access(self.name(), filter)))
    }
}

impl DataResource for Bucket {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn name(&self) -> &str {
        &self.properties.name
    }

    fn location_key(&self) -> &str {
        &self.properties.location
    }

    fn init(&mut self, project: &ProjectContext<'_>) -> Result<(), ValidationError> {
        let props = &mut self.properties;
        if props.name.is_empty() {
            return Err(ValidationError::missing(KIND, &props.name, "name"));
        }
        if props.location.is_empty() {
            return Err(ValidationError::missing(KIND, &props.name, "location"));
        }
        if props.versioning.enabled == Some(false) {
            return Err(ValidationError::violation(
                KIND,
                &props.name,
                "versioning must not be disabled",
            ));
        }
        props.versioning.enabled = Some(true);

        let defaults = project
            .default_grants(
                "roles/storage.admin",
                "roles/storage.objectAdmin",
                "roles/storage.objectViewer",
            )
            .into_iter()
            .map(|(role, group)| Binding::new(role, [format!("group:{group}")]));
        let declared = std::mem::take(&mut props.bindings);
        props.bindings = merge_bindings(defaults.chain(declared));

        props.logging.log_bucket = project.log_bucket();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project<'a>(rw: &'a [String], ro: &'a [String]) -> ProjectContext<'a> {
        ProjectContext {
            id: "my-project",
            owners_group: "owners@x.com",
            readwrite_groups: rw,
            readonly_groups: ro,
            audit_logs_bucket: None,
        }
    }

    fn bucket_from_yaml(yaml: &str) -> Bucket {
        serde_yml::from_str(yaml).expect("test YAML should parse")
    }

    #[test]
    fn versioning_forced_on_when_unset() {
        let mut b = bucket_from_yaml(
            r#"
properties:
  name: foo-bucket
  location: us-east1
"#,
        );
        b.init(&project(&[], &[])).unwrap();
        assert_eq!(b.properties.versioning.enabled, Some(true));
    }

    #[test]
    fn disabled_versioning_rejected() {
        let mut b = bucket_from_yaml(
            r#"
properties:
  name: foo-bucket
  location: us-east1
  versioning:
    enabled: false
"#,
        );
        let err = b.init(&project(&[], &[])).unwrap_err();
        assert!(
            err.to_string().contains("versioning must not be disabled"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn missing_name_or_location_rejected() {
        let mut nameless = bucket_from_yaml("properties:\n  location: US\n");
        assert!(matches!(
            nameless.init(&project(&[], &[])),
            Err(ValidationError::MissingField { field: "name", .. })
        ));

        let mut placeless = bucket_from_yaml("properties:\n  name: b\n");
        assert!(matches!(
            placeless.init(&project(&[], &[])),
            Err(ValidationError::MissingField { field: "location", .. })
        ));
    }

    #[test]
    fn default_bindings_precede_declared_and_merge() {
        let rw = vec!["rw@x.com".to_string()];
        let ro = vec!["ro@x.com".to_string(), "ro2@x.com".to_string()];
        let mut b = bucket_from_yaml(
            r#"
properties:
  name: foo-bucket
  location: us-east1
  bindings:
  - role: roles/storage.objectViewer
    members:
    - user:extra@x.com
    - group:ro@x.com
  - role: roles/custom.reader
    members:
    - user:extra@x.com
"#,
        );
        b.init(&project(&rw, &ro)).unwrap();

        assert_eq!(
            b.properties.bindings,
            vec![
                Binding::new("roles/storage.admin", ["group:owners@x.com".to_string()]),
                Binding::new("roles/storage.objectAdmin", ["group:rw@x.com".to_string()]),
                Binding::new(
                    "roles/storage.objectViewer",
                    [
                        "group:ro2@x.com".to_string(),
                        "group:ro@x.com".to_string(),
                        "user:extra@x.com".to_string(),
                    ]
                ),
                Binding::new("roles/custom.reader", ["user:extra@x.com".to_string()]),
            ]
        );
    }

    #[test]
    fn log_bucket_synthesized_from_project_id() {
        let mut b = bucket_from_yaml("properties:\n  name: b\n  location: US\n");
        b.init(&project(&[], &[])).unwrap();
        assert_eq!(b.properties.logging.log_bucket, "my-project-logs");
    }

    #[test]
    fn init_is_idempotent() {
        let rw = vec!["rw@x.com".to_string()];
        let mut b = bucket_from_yaml("properties:\n  name: b\n  location: US\n");
        b.init(&project(&rw, &[])).unwrap();
        let once = b.clone();
        b.init(&project(&rw, &[])).unwrap();
        assert_eq!(b, once);
    }

    #[test]
    fn extra_properties_round_trip() {
        let b = bucket_from_yaml(
            r#"
properties:
  name: b
  location: US
  storageClass: MULTI_REGIONAL
"#,
        );
        let value = serde_json::to_value(&b).unwrap();
        assert_eq!(value["properties"]["storageClass"], "MULTI_REGIONAL");
    }

    #[test]
    fn no_expected_users_means_no_metric() {
        let b = bucket_from_yaml("properties:\n  name: b\n  location: US\n");
        assert_eq!(b.unexpected_access_metric("my-project").unwrap(), None);
    }
}
