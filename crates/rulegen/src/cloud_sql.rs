use deploy_config::Config;
use serde::{Deserialize, Serialize};

use crate::scope::{global_scope, ResourceScope};

/// A Cloud SQL scanner rule matching publicly reachable instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudSqlRule {
    pub name: String,
    pub instance_name: String,
    pub authorized_networks: String,
    pub ssl_enabled: String,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceScope>,
}

/// Disallow Cloud SQL instances open to `0.0.0.0/0`, with or without SSL.
pub fn cloud_sql_rules(config: &Config) -> Vec<CloudSqlRule> {
    let scope = global_scope(config);
    [("disabled", "false"), ("enabled", "true")]
        .into_iter()
        .map(|(label, ssl)| CloudSqlRule {
            name: format!("Disallow publicly exposed cloudsql instances (SSL {label})."),
            instance_name: "*".to_string(),
            authorized_networks: "0.0.0.0/0".to_string(),
            ssl_enabled: ssl.to_string(),
            resources: vec![scope.clone()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{config, rules_from_yaml};

    #[test]
    fn public_instances_disallowed() {
        let want: Vec<CloudSqlRule> = rules_from_yaml(
            r#"
- name: Disallow publicly exposed cloudsql instances (SSL disabled).
  instance_name: '*'
  authorized_networks: 0.0.0.0/0
  ssl_enabled: 'false'
  resource:
  - type: organization
    resource_ids:
    - '12345678'
- name: Disallow publicly exposed cloudsql instances (SSL enabled).
  instance_name: '*'
  authorized_networks: 0.0.0.0/0
  ssl_enabled: 'true'
  resource:
  - type: organization
    resource_ids:
    - '12345678'
"#,
        );
        assert_eq!(cloud_sql_rules(&config()), want);
    }
}
