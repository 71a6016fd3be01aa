use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::binding::Binding;
use crate::error::ValidationError;
use crate::resource::{DataResource, ProjectContext};

const KIND: &str = "dataset";

/// A BigQuery dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub properties: DatasetProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetProperties {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, rename = "access")]
    pub accesses: Vec<Access>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub set_default_owner: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yml::Value>,
}

/// One dataset access entry. Exactly one principal field may be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Access {
    pub role: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_by_email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group_by_email: String,

    // Rejected at init.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub special_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<serde_yml::Value>,
}

impl Access {
    pub fn group(role: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            group_by_email: email.into(),
            ..Default::default()
        }
    }

    pub fn user(role: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            user_by_email: email.into(),
            ..Default::default()
        }
    }

    /// IAM-style member string for this entry (`group:x` or `user:x`).
    pub fn member(&self) -> Option<String> {
        match (self.user_by_email.is_empty(), self.group_by_email.is_empty()) {
            (false, true) => Some(format!("user:{}", self.user_by_email)),
            (true, false) => Some(format!("group:{}", self.group_by_email)),
            _ => None,
        }
    }

    fn validate(&self, dataset: &str) -> Result<(), ValidationError> {
        let disallowed = |principal| ValidationError::DisallowedPrincipal {
            kind: KIND,
            name: dataset.to_string(),
            principal,
            role: self.role.clone(),
        };
        if !self.special_group.is_empty() {
            return Err(disallowed("specialGroup"));
        }
        if self.view.is_some() {
            return Err(disallowed("view"));
        }
        if self.member().is_none() {
            return Err(ValidationError::AmbiguousPrincipal {
                kind: KIND,
                name: dataset.to_string(),
                role: self.role.clone(),
            });
        }
        Ok(())
    }
}

impl Dataset {
    /// The access list viewed as role grants, one binding per entry, in
    /// declaration order. Feed through
    /// [`merge_bindings`](crate::merge_bindings) for one grant per role.
    pub fn role_grants(&self) -> Vec<Binding> {
        self.properties
            .accesses
            .iter()
            .filter_map(|a| a.member().map(|m| Binding::new(a.role.clone(), [m])))
            .collect()
    }
}

impl DataResource for Dataset {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn name(&self) -> &str {
        &self.properties.name
    }

    fn location_key(&self) -> &str {
        &self.properties.location
    }

    fn init(&mut self, project: &ProjectContext<'_>) -> Result<(), ValidationError> {
        let props = &mut self.properties;
        if props.name.is_empty() {
            return Err(ValidationError::missing(KIND, &props.name, "name"));
        }
        if props.location.is_empty() {
            return Err(ValidationError::missing(KIND, &props.name, "location"));
        }
        if props.set_default_owner {
            return Err(ValidationError::violation(
                KIND,
                &props.name,
                "setDefaultOwner must not be true",
            ));
        }
        for access in &props.accesses {
            access.validate(&props.name)?;
        }

        let defaults = project
            .default_grants("OWNER", "WRITER", "READER")
            .into_iter()
            .map(|(role, group)| Access::group(role, group));
        props.accesses.extend(defaults);

        let mut seen = HashSet::new();
        props
            .accesses
            .retain(|a| seen.insert((a.role.clone(), a.member())));
        Ok(())
    }
}
