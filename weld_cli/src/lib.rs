use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Splice imported files into self-contained artifacts.",
	long_about = "weld resolves textual import directives embedded in source files (markup, \
	              scripts, stylesheets, structured data) and splices the referenced content \
	              into the importing file, producing one self-contained artifact per \
	              dependency root.\n\nQuick start:\n  weld init     Create a sample weld.toml\n  \
	              weld combine  Resolve and splice all imports\n  weld list     Show resolved \
	              imports and suppressed files"
)]
pub struct WeldCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize weld in a project by creating a sample config file.
	///
	/// Creates a commented `weld.toml` in the project root describing the
	/// pattern, sanitize, preserve, and build sections. If the file already
	/// exists, this command is a no-op and exits successfully.
	Init,
	/// Resolve every import directive and splice the referenced content.
	///
	/// Scans all project files for import directives, resolves them against
	/// the candidate set, stages working copies, splices imports in
	/// dependency order, and emits non-suppressed files to the output
	/// directory. Files whose content was fully absorbed by an importer are
	/// suppressed from standalone output unless a preserve pattern matches
	/// them.
	///
	/// Exits with a non-zero status when any file's combine step failed.
	Combine {
		/// Stage and splice working copies but skip emitting output files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Output format for the run summary. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List every file with its resolved imports and dependents.
	///
	/// Runs the scan, resolve, and classify phases without splicing or
	/// writing anything. Useful for auditing which files will be inlined
	/// and which will be suppressed from standalone output.
	List {
		/// Output format for the listing. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
