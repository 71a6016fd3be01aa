//! # rulegen
//!
//! Generates security scanner rules from a loaded [`deploy_config::Config`].
//!
//! Each scanner has its own generator producing a list of rules. The
//! [`Dispatcher`] runs them all and returns a map from scanner name to the
//! rule document for that scanner. Generators are independent: when some
//! fail, the others' output is still returned inside [`PartialGeneration`].
//!
//! ```rust,no_run
//! use deploy_config::loader;
//!
//! let config = loader::load_config("project_config.yaml").unwrap();
//! let files = rulegen::generate_all(&config).unwrap();
//! for (scanner, file) in &files {
//!     println!("{scanner}: {:?}", file.rules);
//! }
//! ```

mod audit_logging;
mod bigquery;
mod bucket;
mod cloud_sql;
mod dispatcher;
mod enabled_apis;
mod error;
mod lien;
mod location;
mod log_sink;
mod resource_tree;
mod scope;

#[cfg(test)]
mod testutil;

pub use audit_logging::{audit_logging_rules, AuditLoggingRule};
pub use bigquery::{bigquery_rules, BigqueryBinding, BigqueryMember, BigqueryRule};
pub use bucket::{bucket_rules, BucketRule};
pub use cloud_sql::{cloud_sql_rules, CloudSqlRule};
pub use dispatcher::{generate_all, Dispatcher, RuleFile, RuleFiles, RuleGenerator};
pub use enabled_apis::{enabled_apis_rules, EnabledApisRule};
pub use error::{AggregateGenerationError, GenerationError, GeneratorFailure, PartialGeneration};
pub use lien::{lien_rules, LienRule};
pub use location::{location_rules, AppliesTo, LocationRule};
pub use log_sink::{log_sink_rules, LogSinkRule, Sink};
pub use resource_tree::{resource_rules, ResourceRule, ResourceTree};
pub use scope::{global_scope, ResourceScope, RuleMode};
