use std::sync::OnceLock;

use regex::Regex;

use crate::WeldResult;
use crate::patterns::PatternGroup;
use crate::patterns::PatternRegistry;
use crate::project::FileState;
use crate::project::SourceFile;

fn quoted_literal() -> &'static Regex {
	static QUOTED: OnceLock<Regex> = OnceLock::new();
	QUOTED.get_or_init(|| Regex::new(r#"["']([^"']*)["']"#).expect("quoted literal pattern"))
}

/// Extract the literal import tokens from one file's current content.
///
/// A file whose state is [`FileState::Done`] is never re-scanned. Every
/// finder applicable to the file (selected by both its original and its
/// current extension) runs against the content; each directive's quoted
/// path literal becomes one token. Scanning reads only this file and
/// produces no side effects, so it is safe to fan out across the whole set.
pub fn scan(file: &SourceFile, registry: &PatternRegistry) -> WeldResult<Vec<String>> {
	if file.state == FileState::Done {
		return Ok(Vec::new());
	}

	let original = file.original_extension();
	let current = file.extension();
	let groups = registry.groups_for(original.as_deref(), current.as_deref());
	if groups.is_empty() {
		return Ok(Vec::new());
	}

	let content = std::fs::read_to_string(&file.working_path)?;
	Ok(scan_content(&content, &groups))
}

/// Token extraction over in-memory content.
pub fn scan_content(content: &str, groups: &[&PatternGroup]) -> Vec<String> {
	let mut tokens = Vec::new();
	for group in groups {
		for matched in group.finder.find_iter(content) {
			if matched.as_str().is_empty() {
				continue;
			}
			if let Some(token) = extract_token(matched.as_str()) {
				tokens.push(token);
			}
		}
	}
	tokens
}

fn extract_token(directive: &str) -> Option<String> {
	let captures = quoted_literal().captures(directive)?;
	let literal = captures.get(1)?.as_str();
	if literal.is_empty() {
		return None;
	}
	Some(normalize_token(literal))
}

/// Imports are always treated as relative: a bare reference gains a `./`
/// prefix. Separators are normalized to `/`.
pub(crate) fn normalize_token(literal: &str) -> String {
	let literal = literal.replace('\\', "/");
	if literal.starts_with("./") || literal.starts_with("../") {
		literal
	} else {
		format!("./{literal}")
	}
}
