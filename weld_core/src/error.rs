use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum WeldError {
	#[error(transparent)]
	#[diagnostic(code(weld::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(weld::config_parse),
		help("check that weld.toml is valid TOML with [[patterns]], [[sanitize]], and [preserve] sections")
	)]
	ConfigParse(String),

	#[error("invalid pattern for {extensions}: {reason}")]
	#[diagnostic(
		code(weld::invalid_pattern),
		help("finder and replacer patterns must be valid regular expressions; the replacer must contain the `replace` placeholder")
	)]
	InvalidPattern { extensions: String, reason: String },

	#[error("invalid sanitize rule `{target}`: {reason}")]
	#[diagnostic(code(weld::invalid_sanitize_rule))]
	InvalidSanitizeRule { target: String, reason: String },

	#[error("invalid preserve pattern `{0}`")]
	#[diagnostic(
		code(weld::invalid_preserve_pattern),
		help("preserve patterns use glob syntax, e.g. `shared/**/*.html`")
	)]
	InvalidPreservePattern(String),

	#[error("no replacer pattern applies to `{file}`")]
	#[diagnostic(
		code(weld::missing_replacer),
		help("add a [[patterns]] group whose extensions cover this file")
	)]
	MissingReplacer { file: String },

	#[error("import cycle detected: {files}")]
	#[diagnostic(
		code(weld::import_cycle),
		help("remove one of the import directives on the cycle; nested splicing requires an acyclic import graph")
	)]
	ImportCycle { files: String },

	#[error("error combining imports for `{host}`: {reason}")]
	#[diagnostic(code(weld::combine))]
	Combine { host: String, reason: String },
}

pub type WeldResult<T> = Result<T, WeldError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
