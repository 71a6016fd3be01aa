use deploy_config::Config;
use serde::{Deserialize, Serialize};

use crate::scope::{global_scope, ResourceScope, RuleMode};

/// An enabled APIs scanner rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledApisRule {
    pub name: String,
    pub mode: RuleMode,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceScope>,
    pub services: Vec<String>,
}

/// Whitelist `overall.allowed_apis` across the whole deployment. No rule is
/// produced when the config allows no APIs explicitly.
pub fn enabled_apis_rules(config: &Config) -> Vec<EnabledApisRule> {
    if config.overall.allowed_apis.is_empty() {
        return Vec::new();
    }
    vec![EnabledApisRule {
        name: "Global API whitelist.".to_string(),
        mode: RuleMode::Whitelist,
        resources: vec![global_scope(config)],
        services: config.overall.allowed_apis.clone(),
    }]
}
