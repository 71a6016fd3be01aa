use thiserror::Error;

/// A resource or project declaration that is malformed or violates a fixed
/// safety policy. Fatal: the run stops before any rule is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{kind} {name:?}: {field} must be set")]
    MissingField {
        kind: &'static str,
        name: String,
        field: &'static str,
    },

    #[error("{kind} {name:?}: {reason}")]
    PolicyViolation {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("{kind} {name:?}: {principal} access is not allowed (role {role:?})")]
    DisallowedPrincipal {
        kind: &'static str,
        name: String,
        principal: &'static str,
        role: String,
    },

    #[error("{kind} {name:?}: access entry for role {role:?} must set exactly one of userByEmail or groupByEmail")]
    AmbiguousPrincipal {
        kind: &'static str,
        name: String,
        role: String,
    },

    #[error("resource entry must declare exactly one of gcs_bucket, bigquery_dataset or gce_instance (found {found})")]
    ResourceKind { found: usize },

    #[error("project_id must not be empty")]
    EmptyProjectId,

    #[error("duplicate project_id: {0:?}")]
    DuplicateProjectId(String),

    #[error("project {0:?}: generated_fields must not appear both in the project and at the top level")]
    ConflictingGeneratedFields(String),

    /// A resource failed validation; `index` is its position in the
    /// project's `resources` list.
    #[error("project {project:?}, resources[{index}]: {error}")]
    InProject {
        project: String,
        index: usize,
        error: Box<ValidationError>,
    },
}

impl ValidationError {
    /// The underlying resource error, without project context.
    pub fn root(&self) -> &ValidationError {
        match self {
            Self::InProject { error, .. } => error.root(),
            other => other,
        }
    }

    pub(crate) fn missing(kind: &'static str, name: &str, field: &'static str) -> Self {
        Self::MissingField {
            kind,
            name: name.to_string(),
            field,
        }
    }

    pub(crate) fn violation(kind: &'static str, name: &str, reason: impl Into<String>) -> Self {
        Self::PolicyViolation {
            kind,
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// An instance has no numeric id recorded in the project's generated fields,
/// usually because it has not been provisioned yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("project {project:?}: info for instance {instance:?} not found in generated_fields")]
pub struct LookupError {
    pub project: String,
    pub instance: String,
}

/// Failure to build a derived resource's expression text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("bucket {bucket:?}: expected user entry must not be blank")]
    BlankExpectedUser { bucket: String },

    #[error("bucket {bucket:?}: expected user {user:?} contains characters not allowed in a log filter")]
    UnsafeExpectedUser { bucket: String, user: String },
}
