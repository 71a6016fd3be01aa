use deploy_config::Config;
use serde::{Deserialize, Serialize};

use crate::scope::ResourceScope;

/// An audit logging scanner rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLoggingRule {
    pub name: String,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceScope>,
    pub service: String,
    pub log_types: Vec<String>,
}

/// Require every Cloud Audit log type for all services in every project.
pub fn audit_logging_rules(_config: &Config) -> Vec<AuditLoggingRule> {
    vec![AuditLoggingRule {
        name: "Require all Cloud Audit logs.".to_string(),
        resources: vec![ResourceScope::any_project()],
        service: "allServices".to_string(),
        log_types: ["ADMIN_READ", "DATA_READ", "DATA_WRITE"]
            .into_iter()
            .map(String::from)
            .collect(),
    }]
}
