use deploy_config::Config;
use serde::{Deserialize, Serialize};

use crate::scope::ResourceScope;

/// A bucket ACL scanner rule. `*` fields match anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRule {
    pub name: String,
    pub bucket: String,
    pub entity: String,
    pub email: String,
    pub domain: String,
    pub role: String,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceScope>,
}

/// Flag every bucket ACL entry; access must be granted through IAM.
pub fn bucket_rules(_config: &Config) -> Vec<BucketRule> {
    let any = || "*".to_string();
    vec![BucketRule {
        name: "Disallow all acl rules, only allow IAM.".to_string(),
        bucket: any(),
        entity: any(),
        email: any(),
        domain: any(),
        role: any(),
        resources: vec![ResourceScope::new("", [any()])],
    }]
}
