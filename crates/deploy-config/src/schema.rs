use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bucket::Bucket;
use crate::dataset::Dataset;
use crate::error::{LookupError, RenderError, ValidationError};
use crate::instance::Instance;
use crate::metric::Metric;
use crate::resource::{DataResource, ProjectContext, Resource};

/// Default name of a project's audit-log dataset.
pub const DEFAULT_AUDIT_DATASET: &str = "audit_logs";

/// Top-level deployment configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub overall: Overall,
    /// Project hosting every project's audit logs, when centralized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_logs_project: Option<Project>,
    /// The security-scanner deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forseti: Option<Forseti>,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Fields recorded at provisioning time, keyed by project id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_fields: Option<AllGeneratedFields>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overall {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organization_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub folder_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub billing_account: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(default)]
    pub allowed_apis: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forseti {
    pub project: Project,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_fields: Option<ForsetiGeneratedFields>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForsetiGeneratedFields {
    #[serde(default)]
    pub service_account: String,
    /// Bucket the scanner reads its rule files from (`gs://...`).
    #[serde(default)]
    pub server_bucket: String,
}

/// Top-level `generated_fields` layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllGeneratedFields {
    #[serde(default)]
    pub projects: BTreeMap<String, GeneratedFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forseti: Option<ForsetiGeneratedFields>,
}

/// A project and the data resources it owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "project_id")]
    pub id: String,
    #[serde(default)]
    pub owners_group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub editors_group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auditors_group: String,
    #[serde(default)]
    pub data_readwrite_groups: Vec<String>,
    #[serde(default)]
    pub data_readonly_groups: Vec<String>,
    #[serde(default)]
    pub enabled_apis: Vec<String>,
    #[serde(default)]
    pub audit_logs: AuditLogs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_fields: Option<GeneratedFields>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// Where a project's audit logs are delivered. Either block may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLogs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_gcs_bucket: Option<LogsBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_bigquery_dataset: Option<LogsDataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogsBucket {
    #[serde(default)]
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogsDataset {
    #[serde(default)]
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFields {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_sink_service_account: String,
    #[serde(default)]
    pub gce_instance_info: Vec<InstanceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceInfo {
    pub name: String,
    pub id: String,
}

/// Every derived metric of a project, with render failures kept apart so one
/// bad bucket does not hide the others.
#[derive(Debug, Default)]
pub struct DerivedMetrics {
    pub metrics: Vec<Metric>,
    pub errors: Vec<RenderError>,
}

impl Config {
    /// Every project in the config: the audit-logs project, the scanner
    /// project, then the declared projects.
    pub fn all_projects(&self) -> impl Iterator<Item = &Project> {
        self.audit_logs_project
            .iter()
            .chain(self.forseti.iter().map(|f| &f.project))
            .chain(self.projects.iter())
    }

    fn all_projects_mut(&mut self) -> impl Iterator<Item = &mut Project> {
        self.audit_logs_project
            .iter_mut()
            .chain(self.forseti.iter_mut().map(|f| &mut f.project))
            .chain(self.projects.iter_mut())
    }

    /// Id of the project that hosts `project`'s audit-log bucket and dataset.
    pub fn audit_logs_project_id<'a>(&'a self, project: &'a Project) -> &'a str {
        self.audit_logs_project
            .as_ref()
            .map_or(project.id.as_str(), |p| p.id.as_str())
    }

    /// Generated fields of the scanner deployment, from either layout.
    pub fn forseti_generated_fields(&self) -> Option<&ForsetiGeneratedFields> {
        self.forseti
            .as_ref()
            .and_then(|f| f.generated_fields.as_ref())
            .or_else(|| self.generated_fields.as_ref()?.forseti.as_ref())
    }

    /// Validate project ids and normalize every project and resource.
    ///
    /// Must run once, before any rule is generated from this config.
    pub fn init(&mut self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for project in self.all_projects() {
            if project.id.is_empty() {
                return Err(ValidationError::EmptyProjectId);
            }
            if !seen.insert(project.id.as_str()) {
                return Err(ValidationError::DuplicateProjectId(project.id.clone()));
            }
        }

        let mut top_level = self.generated_fields.take();
        for project in self.all_projects_mut() {
            let hoisted = top_level
                .as_mut()
                .and_then(|g| g.projects.remove(&project.id));
            match (hoisted, project.generated_fields.is_some()) {
                (Some(_), true) => {
                    return Err(ValidationError::ConflictingGeneratedFields(
                        project.id.clone(),
                    ))
                }
                (Some(fields), false) => project.generated_fields = Some(fields),
                (None, _) => {}
            }
            project.init()?;
        }
        self.generated_fields = top_level;
        Ok(())
    }
}

impl Project {
    /// Apply audit-log defaults, then validate and normalize every resource.
    pub fn init(&mut self) -> Result<(), ValidationError> {
        if let Some(bucket) = self.audit_logs.logs_gcs_bucket.as_mut() {
            if bucket.name.is_empty() {
                bucket.name = format!("{}-logs", self.id);
            }
        }
        if let Some(dataset) = self.audit_logs.logs_bigquery_dataset.as_mut() {
            if dataset.name.is_empty() {
                dataset.name = DEFAULT_AUDIT_DATASET.to_string();
            }
        }

        let ctx = ProjectContext {
            id: &self.id,
            owners_group: &self.owners_group,
            readwrite_groups: &self.data_readwrite_groups,
            readonly_groups: &self.data_readonly_groups,
            audit_logs_bucket: self
                .audit_logs
                .logs_gcs_bucket
                .as_ref()
                .map(|b| b.name.as_str()),
        };
        for (index, resource) in self.resources.iter_mut().enumerate() {
            resource.init(&ctx).map_err(|error| ValidationError::InProject {
                project: self.id.clone(),
                index,
                error: Box::new(error),
            })?;
        }

        debug!(
            project = %self.id,
            resources = self.resources.len(),
            "project initialized"
        );
        Ok(())
    }

    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Bucket(b) => Some(b),
            _ => None,
        })
    }

    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Dataset(d) => Some(d),
            _ => None,
        })
    }

    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Instance(i) => Some(i),
            _ => None,
        })
    }

    /// Audit-log bucket, when one is declared.
    pub fn audit_logs_bucket(&self) -> Option<&LogsBucket> {
        self.audit_logs
            .logs_gcs_bucket
            .as_ref()
            .filter(|b| !b.name.is_empty())
    }

    /// Audit-log dataset, when one is declared.
    pub fn audit_logs_dataset(&self) -> Option<&LogsDataset> {
        self.audit_logs
            .logs_bigquery_dataset
            .as_ref()
            .filter(|d| !d.name.is_empty())
    }

    /// Numeric id recorded for the instance named `name`.
    pub fn instance_id(&self, name: &str) -> Result<&str, LookupError> {
        self.generated_fields
            .iter()
            .flat_map(|g| g.gce_instance_info.iter())
            .find(|info| info.name == name)
            .map(|info| info.id.as_str())
            .ok_or_else(|| LookupError {
                project: self.id.clone(),
                instance: name.to_string(),
            })
    }

    pub fn log_sink_service_account(&self) -> Option<&str> {
        self.generated_fields
            .as_ref()
            .map(|g| g.log_sink_service_account.as_str())
            .filter(|sa| !sa.is_empty())
    }

    /// Unexpected-access metrics for every bucket declaring expected users.
    pub fn derived_metrics(&self) -> DerivedMetrics {
        let mut derived = DerivedMetrics::default();
        for bucket in self.buckets() {
            match bucket.unexpected_access_metric(&self.id) {
                Ok(Some(metric)) => derived.metrics.push(metric),
                Ok(None) => {}
                Err(err) => derived.errors.push(err),
            }
        }
        derived
    }
}
