use std::collections::BTreeMap;

use deploy_config::Config;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AggregateGenerationError, GenerationError, GeneratorFailure, PartialGeneration};

// ---------------------------------------------------------------------------
// Rule files
// ---------------------------------------------------------------------------

/// The document written for one scanner: a single top-level `rules` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFile {
    pub rules: serde_yml::Value,
}

/// Generated rule files keyed by generator name.
pub type RuleFiles = BTreeMap<String, RuleFile>;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Produces the rule list for one scanner.
pub trait RuleGenerator: Send + Sync {
    /// Name of the scanner; also the stem of the written rule file.
    fn name(&self) -> &str;

    fn generate(&self, config: &Config) -> Result<serde_yml::Value, GenerationError>;
}

type GenerateFn = fn(&Config) -> Result<serde_yml::Value, GenerationError>;

/// A generator backed by a plain function.
struct FnGenerator {
    name: &'static str,
    generate: GenerateFn,
}

impl RuleGenerator for FnGenerator {
    fn name(&self) -> &str {
        self.name
    }

    fn generate(&self, config: &Config) -> Result<serde_yml::Value, GenerationError> {
        (self.generate)(config)
    }
}

fn to_value<T: Serialize>(rules: Vec<T>) -> Result<serde_yml::Value, GenerationError> {
    Ok(serde_yml::to_value(rules)?)
}

fn builtin_generators() -> Vec<Box<dyn RuleGenerator>> {
    let table: [(&'static str, GenerateFn); 9] = [
        ("audit_logging", |c| to_value(crate::audit_logging::audit_logging_rules(c))),
        ("bigquery", |c| to_value(crate::bigquery::bigquery_rules(c))),
        ("bucket", |c| to_value(crate::bucket::bucket_rules(c))),
        ("cloud_sql", |c| to_value(crate::cloud_sql::cloud_sql_rules(c))),
        ("enabled_apis", |c| to_value(crate::enabled_apis::enabled_apis_rules(c))),
        ("lien", |c| to_value(crate::lien::lien_rules(c))),
        ("location", |c| to_value(crate::location::location_rules(c)?)),
        ("log_sink", |c| to_value(crate::log_sink::log_sink_rules(c))),
        ("resource", |c| to_value(crate::resource_tree::resource_rules(c)?)),
    ];
    table
        .into_iter()
        .map(|(name, generate)| Box::new(FnGenerator { name, generate }) as Box<dyn RuleGenerator>)
        .collect()
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Runs a set of generators over one config and collects their output.
pub struct Dispatcher {
    generators: Vec<Box<dyn RuleGenerator>>,
}

impl Default for Dispatcher {
    /// A dispatcher running every built-in scanner generator.
    fn default() -> Self {
        Self::new(builtin_generators())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("generators", &self.generator_names().collect::<Vec<_>>())
            .finish()
    }
}

impl Dispatcher {
    pub fn new(generators: Vec<Box<dyn RuleGenerator>>) -> Self {
        Self { generators }
    }

    /// Add a generator, replacing any existing one with the same name.
    pub fn with_generator(mut self, generator: Box<dyn RuleGenerator>) -> Self {
        self.generators.retain(|g| g.name() != generator.name());
        self.generators.push(generator);
        self
    }

    pub fn generator_names(&self) -> impl Iterator<Item = &str> {
        self.generators.iter().map(|g| g.name())
    }

    /// Run every generator. A failing generator does not stop the others:
    /// on any failure the successful output is returned inside
    /// [`PartialGeneration`] together with every failure.
    pub fn generate(&self, config: &Config) -> Result<RuleFiles, PartialGeneration> {
        let mut rules = RuleFiles::new();
        let mut failures = Vec::new();

        for generator in &self.generators {
            let name = generator.name();
            debug!(generator = name, "generating rules");
            match generator.generate(config) {
                Ok(value) => {
                    rules.insert(name.to_string(), RuleFile { rules: value });
                }
                Err(err) => {
                    warn!(generator = name, error = %err, "rule generation failed");
                    failures.push(GeneratorFailure {
                        generator: name.to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(rules)
        } else {
            Err(PartialGeneration {
                rules,
                error: AggregateGenerationError { failures },
            })
        }
    }
}

/// Run every built-in generator over `config`.
pub fn generate_all(config: &Config) -> Result<RuleFiles, PartialGeneration> {
    Dispatcher::default().generate(config)
}
