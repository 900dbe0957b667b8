use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::WeldError;
use crate::WeldResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["weld.toml", ".weld.toml", ".config/weld.toml"];

/// Configuration loaded from a `weld.toml` file.
///
/// ```toml
/// [[patterns]]
/// extensions = [".html"]
/// find = "..."
/// replace = "..."
///
/// [[sanitize]]
/// target = "[$]"
/// replacement = "@weld-dollar@"
/// reverse = "@weld-dollar@"
/// original = "$"
///
/// [preserve]
/// patterns = ["shared/**/*.html"]
///
/// [build]
/// working = ".weld/work"
/// output = "dist"
/// ```
///
/// Every section is optional. Missing `[[patterns]]` and `[[sanitize]]`
/// entries fall back to the compiled-in defaults from
/// [`default_patterns`] and [`default_sanitize`].
#[derive(Debug, Default, Deserialize)]
pub struct WeldConfig {
	/// Directive pattern groups, keyed by the file extensions they apply to.
	#[serde(default)]
	pub patterns: Vec<PatternConfig>,
	/// Reversible text transforms protecting substitution-sensitive
	/// characters in inlined content.
	#[serde(default)]
	pub sanitize: Vec<SanitizeConfig>,
	/// Path globs exempting files from standalone-output suppression.
	#[serde(default)]
	pub preserve: PreserveConfig,
	/// Working and output directory layout used by the CLI.
	#[serde(default)]
	pub build: BuildConfig,
}

/// One directive pattern group.
///
/// ```toml
/// [[patterns]]
/// extensions = [".yaml", ".yml", ".json"]
/// alternate_extensions = [".*"]
/// find = '''([ \t]*)[-][ ]?import[:][ ]*["'].*?["']'''
/// replace = '''([ \t]*)[-][ ]?import[:][ ]*["']replace["']'''
/// ```
///
/// `find` recognizes a directive occurrence in file content. `replace` is a
/// template for locating one already-identified occurrence: the literal
/// `replace` placeholder is substituted with a matcher for the import's
/// relative path, and capture group 1 must be the directive's leading
/// indentation. `alternate_extensions` participate only in import-target
/// matching, never in directive recognition; `.*` accepts any extension.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct PatternConfig {
	pub extensions: Vec<String>,
	#[serde(default)]
	pub alternate_extensions: Vec<String>,
	pub find: String,
	pub replace: String,
}

/// One sanitization rule: `target` text is rewritten to `replacement` before
/// substitution and text matching `reverse` is restored to `original` after.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct SanitizeConfig {
	/// Pattern matching the substitution-sensitive text.
	pub target: String,
	/// Placeholder written in place of each `target` match.
	pub replacement: String,
	/// Pattern matching the placeholder.
	pub reverse: String,
	/// Text restored in place of each `reverse` match.
	pub original: String,
}

/// Path globs for files that are inlined *and* still emitted standalone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreserveConfig {
	/// Glob patterns matched against project-relative paths.
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Directory layout for the combine run.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
	/// Directory holding the working copies the splicer reads and writes.
	#[serde(default = "default_working_dir")]
	pub working: PathBuf,
	/// Directory non-suppressed files are emitted into after combining.
	#[serde(default = "default_output_dir")]
	pub output: PathBuf,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			working: default_working_dir(),
			output: default_output_dir(),
		}
	}
}

fn default_working_dir() -> PathBuf {
	PathBuf::from(".weld/work")
}

fn default_output_dir() -> PathBuf {
	PathBuf::from("dist")
}

impl WeldConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> WeldResult<Option<WeldConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: WeldConfig =
			toml::from_str(&content).map_err(|e| WeldError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// The configured pattern groups, or the compiled-in defaults when the
	/// config declares none.
	#[must_use]
	pub fn effective_patterns(&self) -> Vec<PatternConfig> {
		if self.patterns.is_empty() {
			default_patterns()
		} else {
			self.patterns.clone()
		}
	}

	/// The configured sanitize rules, or the compiled-in defaults when the
	/// config declares none.
	#[must_use]
	pub fn effective_sanitize(&self) -> Vec<SanitizeConfig> {
		if self.sanitize.is_empty() {
			default_sanitize()
		} else {
			self.sanitize.clone()
		}
	}
}

/// The built-in directive pattern groups: HTML comment directives, script
/// line/block comment directives, stylesheet comment directives, and
/// structured-data list-entry directives.
#[must_use]
pub fn default_patterns() -> Vec<PatternConfig> {
	vec![
		PatternConfig {
			extensions: vec![".html".into()],
			alternate_extensions: vec![],
			find: r#"[<][!][-]{2}.?import[(]?.?["'].*?["'].?[)]?.?[-]{2}[>]"#.into(),
			replace: r#"([ \t]*)[<][!][-]{2}.?import[(]?.?["']replace["'].?[)]?.?[-]{2}[>]"#.into(),
		},
		PatternConfig {
			extensions: vec![".js".into()],
			alternate_extensions: vec![],
			find: r#"([/]{2}|[/][*]).?import.?[(]?.?["'].*?["'].?[)]?[;]?.*?(\n[*][/])?"#.into(),
			replace: r#"([ \t]*)([/]{2}|[/][*]).?import.?[(]?.?["']replace["'].?[)]?[;]?.*?(\n[*][/])?"#
				.into(),
		},
		PatternConfig {
			extensions: vec![".css".into()],
			alternate_extensions: vec![],
			find: r#"([/]{2}|[/][*]).?import[(]?.?["'].*?["'].?[)]?([*][/])?"#.into(),
			replace: r#"([ \t]*)([/]{2}|[/][*]).?import[(]?.?["']replace["'].?[)]?([*][/])?"#.into(),
		},
		PatternConfig {
			extensions: vec![".yaml".into(), ".yml".into(), ".json".into()],
			alternate_extensions: vec![".*".into()],
			find: r#"([ \t]*)[-][ ]?import[:][ ]*["'].*?["']"#.into(),
			replace: r#"([ \t]*)[-][ ]?import[:][ ]*["']replace["']"#.into(),
		},
	]
}

/// The built-in sanitize rules. `$` is substitution-sensitive and is parked
/// behind a placeholder while content is spliced.
#[must_use]
pub fn default_sanitize() -> Vec<SanitizeConfig> {
	vec![SanitizeConfig {
		target: "[$]".into(),
		replacement: "@weld-dollar@".into(),
		reverse: "@weld-dollar@".into(),
		original: "$".into(),
	}]
}
