//! `weld_core` is the engine behind [weld](https://github.com/weld-rs/weld):
//! it resolves textual import directives embedded in source files and
//! splices the referenced content into the importing file, producing one
//! self-contained artifact per dependency root.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Candidate file set
//!   → Scanner (per-file fan-out: extract literal import tokens)
//!   → Resolver (token → candidate file, extension-omitted forms included)
//!   → Classifier (dependents + standalone-output suppression)
//!   → Order (dependency linearization, cycle fail-fast)
//!   → Splicer (sequential, indentation-preserving directive substitution)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — `weld.toml` loading: pattern groups, sanitize rules,
//!   preserve globs, build directories.
//! - [`patterns`] — compiled directive finders/replacers and sanitize rules.
//! - [`project`] — the `SourceFile` arena, project loading, staging, and
//!   output emission.
//! - [`scanner`] / [`resolver`] — token extraction and candidate matching.
//! - [`splicer`] — the substitution step itself.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use weld_core::CombineOptions;
//! use weld_core::SourceSet;
//! use weld_core::WeldConfig;
//! use weld_core::combine_project;
//!
//! # fn main() -> weld_core::WeldResult<()> {
//! let root = Path::new(".");
//! let config = WeldConfig::load(root)?;
//! let options = CombineOptions::from_config(config.as_ref())?;
//!
//! let mut set = SourceSet::load(root, &[])?;
//! set.stage(Path::new(".weld/work"))?;
//!
//! let report = combine_project(&mut set, &options)?;
//! if !report.is_ok() {
//! 	eprintln!("{} file(s) failed to combine", report.failures.len());
//! }
//! set.emit(Path::new("dist"))?;
//! # Ok(())
//! # }
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use order::*;
pub use patterns::*;
pub use project::*;
pub use resolver::*;
pub use scanner::*;
pub use splicer::*;

pub mod config;
mod engine;
mod error;
mod order;
pub mod patterns;
pub mod project;
pub mod resolver;
pub mod scanner;
pub mod splicer;

#[cfg(test)]
mod __fixtures;
