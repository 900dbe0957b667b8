use regex::NoExpand;
use regex::Regex;

use crate::WeldError;
use crate::WeldResult;
use crate::config::PatternConfig;
use crate::config::SanitizeConfig;
use crate::config::default_patterns;
use crate::config::default_sanitize;

/// Literal placeholder in replacer templates, substituted with the matcher
/// for one import's relative path.
pub(crate) const REPLACE_PLACEHOLDER: &str = "replace";

/// Alternate-extension entry accepting any extension.
pub const WILDCARD_EXTENSION: &str = ".*";

/// Normalize an extension to lowercase with a leading dot. The wildcard
/// entry is passed through unchanged.
#[must_use]
pub fn normalize_extension(extension: &str) -> String {
	if extension == WILDCARD_EXTENSION {
		return extension.to_string();
	}

	let lower = extension.to_ascii_lowercase();
	if lower.starts_with('.') {
		lower
	} else {
		format!(".{lower}")
	}
}

/// One compiled directive pattern group.
#[derive(Debug, Clone)]
pub struct PatternGroup {
	/// Extensions this group recognizes directives in.
	pub extensions: Vec<String>,
	/// Extensions additionally accepted when validating import targets.
	pub alternate_extensions: Vec<String>,
	/// Matcher recognizing a directive occurrence in file content.
	pub finder: Regex,
	/// Replacer template source, still carrying the `replace` placeholder.
	replacer: String,
}

impl PatternGroup {
	fn from_config(config: &PatternConfig) -> WeldResult<Self> {
		let extensions: Vec<String> = config
			.extensions
			.iter()
			.map(|ext| normalize_extension(ext))
			.collect();
		let alternate_extensions: Vec<String> = config
			.alternate_extensions
			.iter()
			.map(|ext| normalize_extension(ext))
			.collect();
		let invalid = |reason: String| WeldError::InvalidPattern {
			extensions: extensions.join(", "),
			reason,
		};

		let finder = Regex::new(&config.find).map_err(|e| invalid(e.to_string()))?;

		if !config.replace.contains(REPLACE_PLACEHOLDER) {
			return Err(invalid(format!(
				"replacer template has no `{REPLACE_PLACEHOLDER}` placeholder"
			)));
		}
		// Compile with a dummy alias once so a malformed template fails at
		// load time rather than during a splice.
		Regex::new(&config.replace.replacen(REPLACE_PLACEHOLDER, "x", 1))
			.map_err(|e| invalid(e.to_string()))?;

		Ok(Self {
			extensions,
			alternate_extensions,
			finder,
			replacer: config.replace.clone(),
		})
	}

	/// Whether this group recognizes directives in files with the given
	/// extension. Alternate extensions do not participate here.
	#[must_use]
	pub fn matches_extension(&self, extension: &str) -> bool {
		let extension = normalize_extension(extension);
		self.extensions.iter().any(|ext| *ext == extension)
	}

	/// Whether an import target with the given extension is acceptable for
	/// this group. Checks both the extension set and the alternates; a `.*`
	/// entry accepts anything.
	#[must_use]
	pub fn accepts_target_extension(&self, extension: Option<&str>) -> bool {
		let extension = extension.map(normalize_extension);
		self.extensions
			.iter()
			.chain(self.alternate_extensions.iter())
			.any(|entry| {
				entry == WILDCARD_EXTENSION || extension.as_deref() == Some(entry.as_str())
			})
	}

	/// Build the full directive matcher for one import by substituting the
	/// placeholder with `alias` (a regex fragment matching the import's
	/// relative path as the host may have written it).
	pub fn replacer_for(&self, alias: &str) -> WeldResult<Regex> {
		let stringified = self.replacer.replacen(REPLACE_PLACEHOLDER, alias, 1);
		Regex::new(&stringified).map_err(|e| WeldError::InvalidPattern {
			extensions: self.extensions.join(", "),
			reason: e.to_string(),
		})
	}
}

/// The directive pattern groups for a run. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
	groups: Vec<PatternGroup>,
}

impl PatternRegistry {
	/// Compile a registry from configured pattern groups.
	pub fn from_configs(configs: &[PatternConfig]) -> WeldResult<Self> {
		let groups = configs
			.iter()
			.map(PatternGroup::from_config)
			.collect::<WeldResult<Vec<_>>>()?;
		Ok(Self { groups })
	}

	/// Compile the built-in pattern groups.
	pub fn with_defaults() -> WeldResult<Self> {
		Self::from_configs(&default_patterns())
	}

	/// The single best-matching group for an extension: the first group whose
	/// extension set contains it.
	#[must_use]
	pub fn patterns_for(&self, extension: &str) -> Option<&PatternGroup> {
		self.groups
			.iter()
			.find(|group| group.matches_extension(extension))
	}

	/// The union of groups applicable to a file scanned by both its original
	/// and its current extension. A file whose extensions select the same
	/// group yields that group once.
	#[must_use]
	pub fn groups_for(
		&self,
		original_extension: Option<&str>,
		current_extension: Option<&str>,
	) -> Vec<&PatternGroup> {
		let mut groups: Vec<&PatternGroup> = Vec::new();
		for extension in [original_extension, current_extension].into_iter().flatten() {
			if let Some(group) = self.patterns_for(extension) {
				if !groups.iter().any(|existing| std::ptr::eq(*existing, group)) {
					groups.push(group);
				}
			}
		}
		groups
	}

	/// All groups in declaration order.
	#[must_use]
	pub fn groups(&self) -> &[PatternGroup] {
		&self.groups
	}
}

/// One compiled sanitization rule.
#[derive(Debug, Clone)]
pub struct SanitizeRule {
	target: Regex,
	replacement: String,
	reverse: Regex,
	original: String,
}

impl SanitizeRule {
	fn from_config(config: &SanitizeConfig) -> WeldResult<Self> {
		let invalid = |reason: String| WeldError::InvalidSanitizeRule {
			target: config.target.clone(),
			reason,
		};
		Ok(Self {
			target: Regex::new(&config.target).map_err(|e| invalid(e.to_string()))?,
			replacement: config.replacement.clone(),
			reverse: Regex::new(&config.reverse).map_err(|e| invalid(e.to_string()))?,
			original: config.original.clone(),
		})
	}
}

/// Compile configured sanitize rules.
pub fn compile_sanitize_rules(configs: &[SanitizeConfig]) -> WeldResult<Vec<SanitizeRule>> {
	configs.iter().map(SanitizeRule::from_config).collect()
}

/// Compile the built-in sanitize rules.
pub fn default_sanitize_rules() -> WeldResult<Vec<SanitizeRule>> {
	compile_sanitize_rules(&default_sanitize())
}

/// Park substitution-sensitive text behind placeholders before content is
/// spliced into a host.
#[must_use]
pub fn sanitize(content: &str, rules: &[SanitizeRule]) -> String {
	let mut result = content.to_string();
	for rule in rules {
		result = rule
			.target
			.replace_all(&result, NoExpand(&rule.replacement))
			.into_owned();
	}
	result
}

/// Restore placeholders to their original text after splicing.
#[must_use]
pub fn unsanitize(content: &str, rules: &[SanitizeRule]) -> String {
	let mut result = content.to_string();
	for rule in rules {
		result = rule
			.reverse
			.replace_all(&result, NoExpand(&rule.original))
			.into_owned();
	}
	result
}
