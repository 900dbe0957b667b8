use regex::Regex;

use crate::WeldError;
use crate::WeldResult;
use crate::patterns::PatternRegistry;
use crate::patterns::SanitizeRule;
use crate::patterns::sanitize;
use crate::patterns::unsanitize;
use crate::project::FileId;
use crate::project::FileState;
use crate::project::SourceFile;
use crate::project::SourceSet;
use crate::resolver::relative_import;
use crate::resolver::strip_extension;

/// What happened to one host during its combine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineOutcome {
	/// At least one import was spliced and the working copy was rewritten.
	Combined {
		/// Number of splice steps that produced a change.
		steps: usize,
	},
	/// Nothing to do: no imports, or no directive matched anymore.
	Unchanged,
	/// The host is finalized (`Done`) and was not touched.
	Skipped,
}

/// Regex fragment matching one import's relative path as the host may have
/// written it: optional `./` prefix, either path-separator style between
/// segments, and an optional current-or-original extension suffix.
#[must_use]
pub fn import_alias(host: &SourceFile, import: &SourceFile) -> String {
	let bare = relative_import(host, import, true);
	let stem = strip_extension(&bare);

	let mut escaped: String = stem
		.split('/')
		.map(|segment| regex::escape(segment))
		.collect::<Vec<_>>()
		.join(r"[/\\]");

	let mut extensions: Vec<String> = Vec::new();
	for ext in [import.extension(), import.original_extension()]
		.into_iter()
		.flatten()
	{
		if !extensions.contains(&ext) {
			extensions.push(ext);
		}
	}
	if !extensions.is_empty() {
		let alternatives = extensions
			.iter()
			.map(|ext| regex::escape(ext))
			.collect::<Vec<_>>()
			.join("|");
		escaped.push_str(&format!("(?:{alternatives})?"));
	}

	format!(r"(?:[.][/])?{escaped}")
}

/// Replace every occurrence of the directive located by `replacer` in
/// `content` with `new_content`, re-indenting each inlined line by that
/// occurrence's captured leading whitespace. The inlined content passes
/// through the sanitize rules before substitution and the whole result is
/// unsanitized afterwards. Returns `None` when the directive no longer
/// matches (e.g. removed by a prior identical splice).
#[must_use]
pub fn splice(
	replacer: &Regex,
	content: &str,
	new_content: &str,
	rules: &[SanitizeRule],
) -> Option<String> {
	if !replacer.is_match(content) {
		return None;
	}

	let sanitized = sanitize(new_content, rules);
	let mut result = String::with_capacity(content.len() + sanitized.len());
	let mut last = 0;

	for captures in replacer.captures_iter(content) {
		let Some(matched) = captures.get(0) else {
			continue;
		};
		result.push_str(&content[last..matched.start()]);
		match captures.get(1).map(|group| group.as_str()) {
			Some(whitespace) if !whitespace.is_empty() => {
				result.push_str(&indent_lines(&sanitized, whitespace));
			}
			_ => result.push_str(&sanitized),
		}
		last = matched.end();
	}
	result.push_str(&content[last..]);

	Some(unsanitize(&result, rules))
}

/// Prefix every line with the captured directive indentation so inlined
/// content visually nests where the directive stood.
fn indent_lines(content: &str, whitespace: &str) -> String {
	let mut result = String::with_capacity(content.len() + whitespace.len() * 4);
	for line in content.split_inclusive('\n') {
		result.push_str(whitespace);
		result.push_str(line);
	}
	result
}

/// Splice every resolved import into one host, in discovery order, feeding
/// each step's output forward as the next step's input. Each import's
/// *current* working content is read at splice time, so nested inlining
/// requires imports to have been combined first (see
/// [`combine_order`](crate::order::combine_order)).
///
/// A step whose directive no longer matches, or whose import content cannot
/// be read, produces no change and processing continues with the next
/// import. The working copy is rewritten only when the accumulated content
/// differs from the original.
pub fn combine_file(
	set: &SourceSet,
	host_id: FileId,
	registry: &PatternRegistry,
	rules: &[SanitizeRule],
) -> WeldResult<CombineOutcome> {
	let host = set.get(host_id);
	if host.state == FileState::Done {
		return Ok(CombineOutcome::Skipped);
	}
	if host.imports.is_empty() {
		return Ok(CombineOutcome::Unchanged);
	}

	let host_display = host.relative_path.display().to_string();
	let group = host
		.extension()
		.and_then(|ext| registry.patterns_for(&ext))
		.or_else(|| {
			host.original_extension()
				.and_then(|ext| registry.patterns_for(&ext))
		})
		.ok_or_else(|| WeldError::MissingReplacer {
			file: host_display.clone(),
		})?;

	let original = std::fs::read_to_string(&host.working_path).map_err(|e| {
		WeldError::Combine {
			host: host_display.clone(),
			reason: e.to_string(),
		}
	})?;

	let mut content = original.clone();
	let mut steps = 0;
	for edge in &host.imports {
		let import = set.get(edge.target);
		tracing::debug!("combining '{}' into '{}'", import.name(), host.name());

		let replacer = group.replacer_for(&import_alias(host, import))?;
		let new_content = match std::fs::read_to_string(&import.working_path) {
			Ok(new_content) => new_content,
			Err(e) => {
				tracing::error!(
					host = %host_display,
					import = %import.relative_path.display(),
					"failed to read import content: {e}"
				);
				continue;
			}
		};

		if let Some(next) = splice(&replacer, &content, &new_content, rules) {
			content = next;
			steps += 1;
		}
	}

	if !content.is_empty() && content != original {
		std::fs::write(&host.working_path, &content).map_err(|e| WeldError::Combine {
			host: host_display,
			reason: e.to_string(),
		})?;
		Ok(CombineOutcome::Combined { steps })
	} else {
		Ok(CombineOutcome::Unchanged)
	}
}
