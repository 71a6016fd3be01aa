use std::collections::{BTreeMap, BTreeSet};

use deploy_config::{Config, DataResource, LookupError, Project};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scope::{dataset_id, global_scope, ResourceScope, RuleMode};

/// A location scanner rule: the listed resources may only live in
/// `locations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRule {
    pub name: String,
    pub mode: RuleMode,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceScope>,
    pub applies_to: Vec<AppliesTo>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliesTo {
    #[serde(rename = "type")]
    pub kind: String,
    pub resource_ids: Vec<String>,
}

impl AppliesTo {
    fn new(kind: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            kind: kind.into(),
            resource_ids: ids,
        }
    }
}

/// Resource ids grouped by uppercased location, then by resource type.
/// Ids keep the order they were added in.
#[derive(Debug, Default)]
struct LocationToResources(BTreeMap<String, BTreeMap<&'static str, Vec<String>>>);

impl LocationToResources {
    fn add(&mut self, location: &str, kind: &'static str, id: String) {
        self.0
            .entry(location.to_uppercase())
            .or_default()
            .entry(kind)
            .or_default()
            .push(id);
    }

    fn add_project(&mut self, project: &Project) -> Result<(), LookupError> {
        for bucket in project.buckets() {
            self.add(bucket.location_key(), bucket.kind(), bucket.name().to_string());
        }
        for dataset in project.datasets() {
            let id = dataset_id(&project.id, dataset.name());
            self.add(dataset.location_key(), dataset.kind(), id);
        }
        for instance in project.instances() {
            let id = project.instance_id(instance.name())?;
            self.add(instance.location_key(), instance.kind(), id.to_string());
        }
        Ok(())
    }
}

/// Build location whitelist rules for every project in `config`.
///
/// The first rule is a global whitelist of every location in use. It is
/// followed, per project in declaration order, by one rule per location
/// holding that project's resources and then the audit-log bucket and dataset
/// rules.
pub fn location_rules(config: &Config) -> Result<Vec<LocationRule>, LookupError> {
    let mut all_locations = BTreeSet::new();
    let mut project_rules = Vec::new();

    for project in &config.projects {
        let mut by_location = LocationToResources::default();
        by_location.add_project(project)?;

        for (location, by_kind) in by_location.0 {
            let applies_to = by_kind
                .into_iter()
                .map(|(kind, ids)| AppliesTo::new(kind, ids))
                .collect();
            project_rules.push(LocationRule {
                name: format!(
                    "Project {} resource whitelist for location {location}.",
                    project.id
                ),
                mode: RuleMode::Whitelist,
                resources: vec![ResourceScope::project(&project.id)],
                applies_to,
                locations: vec![location.clone()],
            });
            all_locations.insert(location);
        }

        let audit_project_id = config.audit_logs_project_id(project);
        let audit_scope = vec![ResourceScope::project(audit_project_id)];

        if let Some(bucket) = project.audit_logs_bucket() {
            let location = bucket.location.to_uppercase();
            project_rules.push(LocationRule {
                name: format!("Project {} audit logs bucket location whitelist.", project.id),
                mode: RuleMode::Whitelist,
                resources: audit_scope.clone(),
                applies_to: vec![AppliesTo::new("bucket", vec![bucket.name.clone()])],
                locations: vec![location.clone()],
            });
            all_locations.insert(location);
        }

        if let Some(dataset) = project.audit_logs_dataset() {
            let location = dataset.location.to_uppercase();
            project_rules.push(LocationRule {
                name: format!("Project {} audit logs dataset location whitelist.", project.id),
                mode: RuleMode::Whitelist,
                resources: audit_scope,
                applies_to: vec![AppliesTo::new(
                    "dataset",
                    vec![dataset_id(audit_project_id, &dataset.name)],
                )],
                locations: vec![location.clone()],
            });
            all_locations.insert(location);
        }
    }

    debug!(
        locations = all_locations.len(),
        project_rules = project_rules.len(),
        "location rules built"
    );

    let global = LocationRule {
        name: "Global location whitelist.".to_string(),
        mode: RuleMode::Whitelist,
        resources: vec![global_scope(config)],
        applies_to: vec![AppliesTo::new("*", vec!["*".to_string()])],
        locations: all_locations.into_iter().collect(),
    };

    let mut rules = Vec::with_capacity(project_rules.len() + 1);
    rules.push(global);
    rules.extend(project_rules);
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{config, config_with, rules_from_yaml};

    #[test]
    fn rules_for_bucket_dataset_and_instance() {
        let config = config_with(
            r#"
resources:
- bigquery_dataset:
    properties:
      name: foo-dataset
      location: US
- gce_instance:
    properties:
      name: foo-instance
      zone: us-east1-a
- gcs_bucket:
    properties:
      name: foo-bucket
      location: us-east1
"#,
        );

        let want: Vec<LocationRule> = rules_from_yaml(
            r#"
- name: Global location whitelist.
  mode: whitelist
  resource:
  - type: organization
    resource_ids:
    - '12345678'
  applies_to:
  - type: '*'
    resource_ids:
    - '*'
  locations:
  - US
  - US-EAST1
  - US-EAST1-A
- name: Project my-project resource whitelist for location US.
  mode: whitelist
  resource:
  - type: project
    resource_ids:
    - my-project
  applies_to:
  - type: dataset
    resource_ids:
    - my-project:foo-dataset
  locations:
  - US
- name: Project my-project resource whitelist for location US-EAST1.
  mode: whitelist
  resource:
  - type: project
    resource_ids:
    - my-project
  applies_to:
  - type: bucket
    resource_ids:
    - foo-bucket
  locations:
  - US-EAST1
- name: Project my-project resource whitelist for location US-EAST1-A.
  mode: whitelist
  resource:
  - type: project
    resource_ids:
    - my-project
  applies_to:
  - type: instance
    resource_ids:
    - '123'
  locations:
  - US-EAST1-A
- name: Project my-project audit logs bucket location whitelist.
  mode: whitelist
  resource:
  - type: project
    resource_ids:
    - my-project
  applies_to:
  - type: bucket
    resource_ids:
    - my-project-logs
  locations:
  - US
- name: Project my-project audit logs dataset location whitelist.
  mode: whitelist
  resource:
  - type: project
    resource_ids:
    - my-project
  applies_to:
  - type: dataset
    resource_ids:
    - my-project:audit_logs
  locations:
  - US
"#,
        );

        assert_eq!(location_rules(&config).unwrap(), want);
    }

    #[test]
    fn global_locations_sorted_and_uppercased() {
        let config = config_with(
            r#"
resources:
- gcs_bucket:
    properties:
      name: foo-bucket
      location: us-east1
- bigquery_dataset:
    properties:
      name: foo-dataset
      location: US
"#,
        );
        let rules = location_rules(&config).unwrap();
        assert_eq!(rules[0].locations, vec!["US", "US-EAST1"]);

        let per_location: Vec<_> = rules
            .iter()
            .filter(|r| r.name.contains("resource whitelist for location"))
            .collect();
        assert_eq!(per_location.len(), 2);
        for rule in per_location {
            assert_eq!(rule.resources, vec![ResourceScope::project("my-project")]);
        }
    }

    #[test]
    fn ids_keep_encounter_order_within_type() {
        let config = config_with(
            r#"
resources:
- gcs_bucket:
    properties:
      name: zeta-bucket
      location: us
- gcs_bucket:
    properties:
      name: alpha-bucket
      location: US
"#,
        );
        let rules = location_rules(&config).unwrap();
        assert_eq!(
            rules[1].applies_to,
            vec![AppliesTo::new(
                "bucket",
                vec!["zeta-bucket".to_string(), "alpha-bucket".to_string()]
            )]
        );
    }

    #[test]
    fn audit_resources_scoped_to_audit_logs_project() {
        let mut config = config();
        let mut audit = deploy_config::Project::default();
        audit.id = "central-audit".to_string();
        config.audit_logs_project = Some(audit);

        let rules = location_rules(&config).unwrap();
        let dataset_rule = rules
            .iter()
            .find(|r| r.name == "Project my-project audit logs dataset location whitelist.")
            .unwrap();
        assert_eq!(dataset_rule.resources, vec![ResourceScope::project("central-audit")]);
        assert_eq!(
            dataset_rule.applies_to[0].resource_ids,
            vec!["central-audit:audit_logs"]
        );
    }

    #[test]
    fn lowercase_audit_locations_join_global_list() {
        let mut config = config();
        let audit_logs = &mut config.projects[0].audit_logs;
        audit_logs.logs_gcs_bucket.as_mut().unwrap().location = "us-central1".to_string();
        audit_logs.logs_bigquery_dataset.as_mut().unwrap().location = "eu".to_string();

        let rules = location_rules(&config).unwrap();
        assert_eq!(rules[0].locations, vec!["EU", "US-CENTRAL1"]);

        let bucket_rule = rules
            .iter()
            .find(|r| r.name == "Project my-project audit logs bucket location whitelist.")
            .unwrap();
        assert_eq!(bucket_rule.locations, vec!["US-CENTRAL1"]);
        let dataset_rule = rules
            .iter()
            .find(|r| r.name == "Project my-project audit logs dataset location whitelist.")
            .unwrap();
        assert_eq!(dataset_rule.locations, vec!["EU"]);
    }

    #[test]
    fn unresolved_instance_fails_whole_generator() {
        let config = config_with(
            r#"
resources:
- gce_instance:
    properties:
      name: bar-instance
      zone: us-east1-a
"#,
        );
        let err = location_rules(&config).unwrap_err();
        assert_eq!(err.instance, "bar-instance");
    }
}
