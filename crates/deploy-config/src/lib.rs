//! # deploy-config
//!
//! Typed model of a deployment config: projects, their IAM groups, audit-log
//! destinations and data resources (buckets, datasets, instances).
//!
//! Loading a config also normalizes it. Each resource is validated against
//! fixed safety settings and receives the default grants derived from its
//! project's groups, so everything downstream reads a finished config.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use deploy_config::loader;
//!
//! let config = loader::load_config("project_config.yaml").unwrap();
//! for project in &config.projects {
//!     println!("{}: {} resources", project.id, project.resources.len());
//! }
//! ```

mod binding;
mod bucket;
mod dataset;
mod error;
mod instance;
pub mod loader;
mod metric;
mod resource;
mod schema;

pub use binding::{merge_bindings, Binding};
pub use bucket::{Bucket, BucketLogging, BucketProperties, Versioning};
pub use dataset::{Access, Dataset, DatasetProperties};
pub use error::{LookupError, RenderError, ValidationError};
pub use instance::{Instance, InstanceProperties};
pub use metric::{render_unexpected_access_filter, Metric, MetricDescriptor, MetricLabel};
pub use resource::{DataResource, ProjectContext, Resource, ResourceEntry};
pub use schema::{
    AllGeneratedFields, AuditLogs, Config, DerivedMetrics, Forseti, ForsetiGeneratedFields,
    GeneratedFields, InstanceInfo, LogsBucket, LogsDataset, Overall, Project,
    DEFAULT_AUDIT_DATASET,
};
