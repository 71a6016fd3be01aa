use deploy_config::Config;
use serde::{Deserialize, Serialize};

/// How a scanner interprets a rule's listed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMode {
    /// Only the listed values are permitted.
    Whitelist,
    /// The listed values are forbidden.
    Blacklist,
    /// The listed values must exist.
    Required,
}

/// The resources a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceScope {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(rename = "resource_ids")]
    pub ids: Vec<String>,
}

impl ResourceScope {
    pub fn new(kind: impl Into<String>, ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            kind: kind.into(),
            ids: ids.into_iter().collect(),
        }
    }

    pub fn project(id: impl Into<String>) -> Self {
        Self::new("project", [id.into()])
    }

    /// Every project.
    pub fn any_project() -> Self {
        Self::project("*")
    }
}

/// The widest scope the config can name: its organization, else its folder,
/// else every project.
pub fn global_scope(config: &Config) -> ResourceScope {
    let overall = &config.overall;
    if !overall.organization_id.is_empty() {
        ResourceScope::new("organization", [overall.organization_id.clone()])
    } else if !overall.folder_id.is_empty() {
        ResourceScope::new("folder", [overall.folder_id.clone()])
    } else {
        ResourceScope::any_project()
    }
}

/// `{project}:{dataset}` id used for datasets in scanner rules.
pub(crate) fn dataset_id(project_id: &str, dataset: &str) -> String {
    format!("{project_id}:{dataset}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_scope_prefers_organization() {
        let mut config = Config::default();
        config.overall.organization_id = "123".to_string();
        config.overall.folder_id = "456".to_string();
        assert_eq!(
            global_scope(&config),
            ResourceScope::new("organization", ["123".to_string()])
        );

        config.overall.organization_id.clear();
        assert_eq!(
            global_scope(&config),
            ResourceScope::new("folder", ["456".to_string()])
        );

        config.overall.folder_id.clear();
        assert_eq!(global_scope(&config), ResourceScope::any_project());
    }

    #[test]
    fn untyped_scope_omits_type_key() {
        let yaml = serde_yml::to_string(&ResourceScope::new("", ["*".to_string()])).unwrap();
        assert!(!yaml.contains("type"), "unexpected yaml: {yaml}");
        assert!(yaml.contains("resource_ids"));
    }
}
