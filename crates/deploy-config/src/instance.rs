use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::resource::{DataResource, ProjectContext};

const KIND: &str = "instance";

/// A Compute Engine instance. Scanner rules refer to it by the numeric id
/// recorded in the project's generated fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub properties: InstanceProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceProperties {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub zone: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yml::Value>,
}

impl DataResource for Instance {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn name(&self) -> &str {
        &self.properties.name
    }

    fn location_key(&self) -> &str {
        &self.properties.zone
    }

    fn init(&mut self, _project: &ProjectContext<'_>) -> Result<(), ValidationError> {
        if self.properties.name.is_empty() {
            return Err(ValidationError::missing(KIND, &self.properties.name, "name"));
        }
        if self.properties.zone.is_empty() {
            return Err(ValidationError::missing(KIND, &self.properties.name, "zone"));
        }
        Ok(())
    }
}
