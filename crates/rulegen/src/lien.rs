use deploy_config::Config;
use serde::{Deserialize, Serialize};

use crate::scope::{ResourceScope, RuleMode};

/// A lien scanner rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LienRule {
    pub name: String,
    pub mode: RuleMode,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceScope>,
    pub restrictions: Vec<String>,
}

/// Require a deletion lien on every project.
pub fn lien_rules(_config: &Config) -> Vec<LienRule> {
    vec![LienRule {
        name: "Require project deletion liens for all projects.".to_string(),
        mode: RuleMode::Required,
        resources: vec![ResourceScope::any_project()],
        restrictions: vec!["resourcemanager.projects.delete".to_string()],
    }]
}
