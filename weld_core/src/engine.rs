use std::collections::HashSet;

use globset::GlobSet;
use rayon::prelude::*;

use crate::WeldResult;
use crate::config::WeldConfig;
use crate::config::default_patterns;
use crate::config::default_sanitize;
use crate::order::combine_order;
use crate::patterns::PatternRegistry;
use crate::patterns::SanitizeRule;
use crate::patterns::compile_sanitize_rules;
use crate::project::FileId;
use crate::project::FileState;
use crate::project::ImportEdge;
use crate::project::SourceSet;
use crate::project::build_preserve_set;
use crate::resolver;
use crate::scanner;
use crate::splicer;
use crate::splicer::CombineOutcome;

/// Compiled run options: the pattern registry, sanitize rules, and preserve
/// matcher derived from a [`WeldConfig`] (or the compiled-in defaults).
#[derive(Debug)]
pub struct CombineOptions {
	pub registry: PatternRegistry,
	pub sanitize: Vec<SanitizeRule>,
	pub preserve: GlobSet,
}

impl CombineOptions {
	/// Construct options from a loaded config. `None` uses the defaults
	/// throughout.
	pub fn from_config(config: Option<&WeldConfig>) -> WeldResult<Self> {
		let (patterns, sanitize, preserve) = match config {
			Some(config) => (
				config.effective_patterns(),
				config.effective_sanitize(),
				config.preserve.patterns.clone(),
			),
			None => (default_patterns(), default_sanitize(), Vec::new()),
		};

		Ok(Self {
			registry: PatternRegistry::from_configs(&patterns)?,
			sanitize: compile_sanitize_rules(&sanitize)?,
			preserve: build_preserve_set(&preserve)?,
		})
	}
}

/// One host whose combine step failed.
#[derive(Debug)]
pub struct CombineFailure {
	pub file: FileId,
	pub message: String,
}

/// Result of combining a project.
///
/// Per-file failures are recorded here rather than aborting the run, so a
/// caller can distinguish a fully combined set from a partially combined
/// one without inspecting logs.
#[derive(Debug, Default)]
pub struct CombineReport {
	/// Hosts whose working copies were rewritten.
	pub combined: Vec<FileId>,
	/// Hosts left untouched (no imports, or no directive matched).
	pub unchanged: Vec<FileId>,
	/// Hosts skipped because they were already finalized.
	pub skipped: Vec<FileId>,
	/// Hosts whose combine step failed.
	pub failures: Vec<CombineFailure>,
}

impl CombineReport {
	/// Returns true when every combine step completed without failure.
	#[must_use]
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Scan every file for import directives and resolve the extracted tokens
/// against the candidate set.
///
/// The scan/resolve work fans out across the set; each worker reads only
/// its own file's content plus the shared read-only set, and produces that
/// file's edge list. The `collect` is the join barrier — edges are written
/// into the arena only after every file has completed (successfully or
/// silently skipped), on the calling thread.
pub fn resolve_imports(set: &mut SourceSet, registry: &PatternRegistry) {
	let resolved: Vec<(FileId, Vec<ImportEdge>)> = {
		let shared: &SourceSet = set;
		shared
			.ids()
			.into_par_iter()
			.filter(|&id| shared.get(id).state != FileState::Done)
			.map(|id| {
				let file = shared.get(id);
				let tokens = match scanner::scan(file, registry) {
					Ok(tokens) => tokens,
					Err(e) => {
						tracing::error!(
							file = %file.relative_path.display(),
							"failed to scan imports: {e}"
						);
						Vec::new()
					}
				};

				let original = file.original_extension();
				let current = file.extension();
				let groups = registry.groups_for(original.as_deref(), current.as_deref());
				let edges = tokens
					.iter()
					.filter_map(|token| resolver::resolve(shared, id, token, &groups))
					.collect();
				(id, edges)
			})
			.collect()
	};

	for (id, edges) in resolved {
		set.get_mut(id).imports = edges;
	}
}

/// Derive every file's dependents and output suppression from the resolved
/// edges, and fold extension-omitted marks onto their targets.
///
/// Must run strictly after [`resolve_imports`] has completed for the whole
/// set — it reads every file's `imports`. Recomputes from scratch, so
/// re-running it is idempotent.
pub fn link_dependents(set: &mut SourceSet, preserve: &GlobSet) {
	let ids = set.ids();
	for &id in &ids {
		let file = set.get_mut(id);
		file.dependents.clear();
		file.no_copy = false;
		file.ext_omitted = false;
	}

	for &host in &ids {
		let edges = set.get(host).imports.clone();
		let mut seen: HashSet<FileId> = HashSet::new();
		for edge in edges {
			let target = set.get_mut(edge.target);
			if seen.insert(edge.target) {
				target.dependents.push(host);
			}
			target.ext_omitted |= edge.ext_omitted;
			if !preserve.is_match(&target.relative_path) {
				target.no_copy = true;
			}
		}
	}
}

/// Run the full pipeline over a staged set: parallel scan/resolve, the
/// classify pass, dependency ordering, and the strictly sequential combine
/// pass.
///
/// A cyclic import graph aborts before any splice. Per-file combine
/// failures are logged, recorded in the report, and never halt the pipeline
/// for subsequent files.
pub fn combine_project(set: &mut SourceSet, options: &CombineOptions) -> WeldResult<CombineReport> {
	resolve_imports(set, &options.registry);
	link_dependents(set, &options.preserve);
	let order = combine_order(set)?;

	let mut report = CombineReport::default();
	for id in order {
		match splicer::combine_file(set, id, &options.registry, &options.sanitize) {
			Ok(CombineOutcome::Combined { .. }) => report.combined.push(id),
			Ok(CombineOutcome::Unchanged) => report.unchanged.push(id),
			Ok(CombineOutcome::Skipped) => report.skipped.push(id),
			Err(e) => {
				tracing::error!(
					file = %set.get(id).relative_path.display(),
					"error combining imports: {e}"
				);
				report.failures.push(CombineFailure {
					file: id,
					message: e.to_string(),
				});
			}
		}
	}

	Ok(report)
}
