//! # rule-publisher
//!
//! Writes generated scanner rule files to their destination. Each file is
//! `{scanner}_rules.yaml` holding a single top-level `rules` list.
//!
//! A destination is either a local directory or a `gs://` bucket URI. Bucket
//! uploads are staged in a temporary directory and handed to a [`Copier`]
//! (by default [`GsutilCopier`]), which places them under `rules/` in the
//! bucket.

mod copier;
mod destination;
mod error;
mod publish;
mod writer;

pub use copier::{Copier, GsutilCopier};
pub use destination::Destination;
pub use error::{CopyError, PublishError};
pub use publish::{publish, resolve_destination, run};
pub use writer::{rule_file_path, write_rule_files};
