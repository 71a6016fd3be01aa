use deploy_config::Config;
use serde::{Deserialize, Serialize};

use crate::scope::{ResourceScope, RuleMode};

/// Filter matching every Cloud Audit log entry.
const AUDIT_LOG_FILTER: &str = r#"logName:"logs/cloudaudit.googleapis.com""#;

/// A log sink scanner rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSinkRule {
    pub name: String,
    pub mode: RuleMode,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceScope>,
    pub sink: Sink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sink {
    pub destination: String,
    pub filter: String,
    pub include_children: String,
}

/// Allow only BigQuery sinks anywhere, and require each project with an
/// audit-log dataset to export its audit logs there.
pub fn log_sink_rules(config: &Config) -> Vec<LogSinkRule> {
    let mut rules = vec![LogSinkRule {
        name: "Only allow BigQuery log sinks in all projects.".to_string(),
        mode: RuleMode::Whitelist,
        resources: vec![ResourceScope::any_project()],
        sink: Sink {
            destination: "bigquery.googleapis.com/*".to_string(),
            filter: "*".to_string(),
            include_children: "*".to_string(),
        },
    }];

    for project in &config.projects {
        let Some(dataset) = project.audit_logs_dataset() else {
            continue;
        };
        rules.push(LogSinkRule {
            name: format!("Require a BigQuery log sink in project {}.", project.id),
            mode: RuleMode::Required,
            resources: vec![ResourceScope::project(&project.id)],
            sink: Sink {
                destination: format!(
                    "bigquery.googleapis.com/projects/{}/datasets/{}",
                    config.audit_logs_project_id(project),
                    dataset.name
                ),
                filter: AUDIT_LOG_FILTER.to_string(),
                include_children: "*".to_string(),
            },
        });
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{config, rules_from_yaml};

    #[test]
    fn whitelist_then_required_sink_per_project() {
        let want: Vec<LogSinkRule> = rules_from_yaml(
            r#"
- name: Only allow BigQuery log sinks in all projects.
  mode: whitelist
  resource:
  - type: project
    resource_ids:
    - '*'
  sink:
    destination: bigquery.googleapis.com/*
    filter: '*'
    include_children: '*'
- name: Require a BigQuery log sink in project my-project.
  mode: required
  resource:
  - type: project
    resource_ids:
    - my-project
  sink:
    destination: bigquery.googleapis.com/projects/my-project/datasets/audit_logs
    filter: 'logName:"logs/cloudaudit.googleapis.com"'
    include_children: '*'
"#,
        );
        assert_eq!(log_sink_rules(&config()), want);
    }

    #[test]
    fn project_without_audit_dataset_gets_no_sink_rule() {
        let mut config = config();
        config.projects[0].audit_logs.logs_bigquery_dataset = None;
        assert_eq!(log_sink_rules(&config).len(), 1);
    }
}
