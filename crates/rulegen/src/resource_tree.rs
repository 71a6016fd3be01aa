use deploy_config::{Config, DataResource, LookupError, Project};
use serde::{Deserialize, Serialize};

use crate::scope::{dataset_id, RuleMode};

/// A resource scanner rule: every node in `resource_trees` must exist under
/// its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRule {
    pub name: String,
    pub mode: RuleMode,
    pub resource_types: Vec<String>,
    pub resource_trees: Vec<ResourceTree>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTree {
    #[serde(rename = "type")]
    pub kind: String,
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResourceTree>,
}

impl ResourceTree {
    fn leaf(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            resource_id: id.into(),
            children: Vec::new(),
        }
    }
}

/// Build the single "required resources" rule covering every project.
pub fn resource_rules(config: &Config) -> Result<Vec<ResourceRule>, LookupError> {
    let mut trees = vec![ResourceTree::leaf("project", "*")];
    for project in &config.projects {
        trees.push(project_tree(config, project)?);
    }

    Ok(vec![ResourceRule {
        name: "Project resource trees.".to_string(),
        mode: RuleMode::Required,
        resource_types: ["project", "bucket", "dataset", "instance"]
            .into_iter()
            .map(String::from)
            .collect(),
        resource_trees: trees,
    }])
}

fn project_tree(config: &Config, project: &Project) -> Result<ResourceTree, LookupError> {
    let mut children = Vec::new();

    if let Some(bucket) = project.audit_logs_bucket() {
        children.push(ResourceTree::leaf("bucket", &bucket.name));
    }
    if let Some(dataset) = project.audit_logs_dataset() {
        let id = dataset_id(config.audit_logs_project_id(project), &dataset.name);
        children.push(ResourceTree::leaf("dataset", id));
    }

    for bucket in project.buckets() {
        children.push(ResourceTree::leaf(bucket.kind(), bucket.name()));
    }
    for dataset in project.datasets() {
        let id = dataset_id(&project.id, dataset.name());
        children.push(ResourceTree::leaf(dataset.kind(), id));
    }
    for instance in project.instances() {
        let id = project.instance_id(instance.name())?;
        children.push(ResourceTree::leaf(instance.kind(), id));
    }

    Ok(ResourceTree {
        kind: "project".to_string(),
        resource_id: project.id.clone(),
        children,
    })
}
