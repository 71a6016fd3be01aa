use deploy_config::{merge_bindings, Binding, Config, DataResource, Project};
use serde::{Deserialize, Serialize};

use crate::scope::{dataset_id, global_scope, ResourceScope, RuleMode};

/// A BigQuery dataset ACL scanner rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigqueryRule {
    pub name: String,
    pub mode: RuleMode,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceScope>,
    pub dataset_ids: Vec<String>,
    pub bindings: Vec<BigqueryBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigqueryBinding {
    pub role: String,
    pub members: Vec<BigqueryMember>,
}

/// One principal in a dataset binding. Exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigqueryMember {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group_email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub special_group: String,
}

impl BigqueryMember {
    /// Convert an IAM member string (`group:x`, `user:x`, `domain:x`).
    fn from_member(member: &str) -> Self {
        match member.split_once(':') {
            Some(("group", email)) => Self {
                group_email: email.to_string(),
                ..Default::default()
            },
            Some(("domain", domain)) => Self {
                domain: domain.to_string(),
                ..Default::default()
            },
            Some(("user", email)) => Self {
                user_email: email.to_string(),
                ..Default::default()
            },
            _ => Self {
                user_email: member.to_string(),
                ..Default::default()
            },
        }
    }
}

/// Forbid domain and special-group access to any dataset, then whitelist the
/// normalized access list of every dataset, audit-log datasets included.
pub fn bigquery_rules(config: &Config) -> Vec<BigqueryRule> {
    let mut rules = vec![BigqueryRule {
        name: "No public, domain or special group dataset access.".to_string(),
        mode: RuleMode::Blacklist,
        resources: vec![global_scope(config)],
        dataset_ids: vec!["*".to_string()],
        bindings: vec![BigqueryBinding {
            role: "*".to_string(),
            members: vec![
                BigqueryMember {
                    domain: "*".to_string(),
                    ..Default::default()
                },
                BigqueryMember {
                    special_group: "*".to_string(),
                    ..Default::default()
                },
            ],
        }],
    }];

    for project in &config.projects {
        if let Some(dataset) = project.audit_logs_dataset() {
            let audit_project_id = config.audit_logs_project_id(project);
            rules.push(whitelist(
                audit_project_id,
                dataset_id(audit_project_id, &dataset.name),
                audit_dataset_grants(project),
            ));
        }
        for dataset in project.datasets() {
            rules.push(whitelist(
                &project.id,
                dataset_id(&project.id, dataset.name()),
                dataset.role_grants(),
            ));
        }
    }
    rules
}

fn audit_dataset_grants(project: &Project) -> Vec<Binding> {
    let mut grants = Vec::new();
    if !project.owners_group.is_empty() {
        grants.push(Binding::new("OWNER", [format!("group:{}", project.owners_group)]));
    }
    if let Some(sa) = project.log_sink_service_account() {
        grants.push(Binding::new("WRITER", [format!("user:{sa}")]));
    }
    if !project.auditors_group.is_empty() {
        grants.push(Binding::new("READER", [format!("group:{}", project.auditors_group)]));
    }
    grants
}

fn whitelist(project_id: &str, id: String, grants: Vec<Binding>) -> BigqueryRule {
    let bindings = merge_bindings(grants)
        .into_iter()
        .map(|b| BigqueryBinding {
            role: b.role,
            members: b
                .members
                .iter()
                .map(|m| BigqueryMember::from_member(m))
                .collect(),
        })
        .collect();

    BigqueryRule {
        name: format!("Whitelist for dataset {id}."),
        mode: RuleMode::Whitelist,
        resources: vec![ResourceScope::project(project_id)],
        dataset_ids: vec![id],
        bindings,
    }
}
