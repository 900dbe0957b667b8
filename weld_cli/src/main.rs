use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use weld_cli::Commands;
use weld_cli::OutputFormat;
use weld_cli::WeldCli;
use weld_core::AnyEmptyResult;
use weld_core::CombineOptions;
use weld_core::CombineReport;
use weld_core::SourceSet;
use weld_core::WeldConfig;
use weld_core::combine_project;
use weld_core::link_dependents;
use weld_core::relative_import;
use weld_core::resolve_imports;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = WeldCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	if args.verbose {
		tracing_subscriber::fmt()
			.with_env_filter(
				tracing_subscriber::EnvFilter::try_from_default_env()
					.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("weld_core=debug")),
			)
			.with_writer(std::io::stderr)
			.init();
	}

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Combine { dry_run, format }) => run_combine(&args, dry_run, format),
		Some(Commands::List { format }) => run_list(&args, format),
		None => {
			eprintln!("No subcommand specified. Run `weld --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<weld_core::WeldError>() {
			Ok(weld_err) => {
				let report: miette::Report = (*weld_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &WeldCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

const SAMPLE_CONFIG: &str = "# weld configuration\n\
	\n\
	# Directive pattern groups. When no [[patterns]] entries are present the\n\
	# built-in groups apply: .html comments, .js line/block comments, .css\n\
	# comments, and .yaml/.yml/.json list entries (with a `.*` alternate).\n\
	#\n\
	# [[patterns]]\n\
	# extensions = [\".html\"]\n\
	# find = '''[<][!][-]{2}.?import[(]?.?[\"'].*?[\"'].?[)]?.?[-]{2}[>]'''\n\
	# replace = '''([ \\t]*)[<][!][-]{2}.?import[(]?.?[\"']replace[\"'].?[)]?.?[-]{2}[>]'''\n\
	\n\
	# Files matching these globs are inlined *and* still emitted standalone.\n\
	# [preserve]\n\
	# patterns = [\"shared/**\"]\n\
	\n\
	# Working and output directory layout.\n\
	# [build]\n\
	# working = \".weld/work\"\n\
	# output = \"dist\"\n";

fn run_init(args: &WeldCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config_path = root.join("weld.toml");

	if config_path.exists() {
		println!("Config file already exists: {}", config_path.display());
		return Ok(());
	}

	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created weld.toml");
	println!();
	println!("Next steps:");
	println!("  1. Add import directives to your source files, e.g. <!-- import('nav.html') -->");
	println!("  2. Run `weld combine` to splice imports and emit artifacts");
	println!("  3. Run `weld list` to audit resolved imports");

	Ok(())
}

fn run_combine(args: &WeldCli, dry_run: bool, format: OutputFormat) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = WeldConfig::load(&root)?;
	let options = CombineOptions::from_config(config.as_ref())?;
	let build = config.map(|c| c.build).unwrap_or_default();

	let mut set = SourceSet::load(&root, &[build.working.clone(), build.output.clone()])?;
	set.stage(&root.join(&build.working))?;

	let report = combine_project(&mut set, &options)?;
	let emitted = if dry_run {
		Vec::new()
	} else {
		set.emit(&root.join(&build.output))?
	};

	match format {
		OutputFormat::Text => print_combine_text(&set, &report, &emitted, dry_run, &build.output),
		OutputFormat::Json => print_combine_json(&set, &report, &emitted),
	}

	if !report.is_ok() {
		return Err(format!("{} file(s) failed to combine", report.failures.len()).into());
	}

	Ok(())
}

fn print_combine_text(
	set: &SourceSet,
	report: &CombineReport,
	emitted: &[PathBuf],
	dry_run: bool,
	output: &std::path::Path,
) {
	if report.combined.is_empty() {
		println!("Nothing to combine — no import directives resolved.");
	} else {
		println!(
			"{}",
			colored!(format!("Combined {} file(s):", report.combined.len()), bold)
		);
		for &id in &report.combined {
			let file = set.get(id);
			let imports: Vec<String> = file
				.imports
				.iter()
				.map(|edge| set.get(edge.target).relative_path.display().to_string())
				.collect();
			println!("  {} <- {}", file.relative_path.display(), imports.join(", "));
		}
	}

	let suppressed = set.iter().filter(|(_, file)| file.no_copy).count();
	if suppressed > 0 {
		println!("{suppressed} file(s) suppressed from standalone output.");
	}

	if dry_run {
		let would_emit = set.len() - suppressed;
		println!("Dry run: would emit {would_emit} file(s) to {}.", output.display());
	} else {
		println!("Emitted {} file(s) to {}.", emitted.len(), output.display());
	}

	for failure in &report.failures {
		println!(
			"{} {}: {}",
			colored!("error:", red),
			set.get(failure.file).relative_path.display(),
			failure.message
		);
	}
}

fn print_combine_json(set: &SourceSet, report: &CombineReport, emitted: &[PathBuf]) {
	let paths = |ids: &[weld_core::FileId]| -> Vec<String> {
		ids.iter()
			.map(|&id| set.get(id).relative_path.display().to_string())
			.collect()
	};

	let suppressed: Vec<String> = set
		.iter()
		.filter(|(_, file)| file.no_copy)
		.map(|(_, file)| file.relative_path.display().to_string())
		.collect();

	let json = serde_json::json!({
		"combined": paths(&report.combined),
		"unchanged": paths(&report.unchanged),
		"skipped": paths(&report.skipped),
		"suppressed": suppressed,
		"emitted": emitted
			.iter()
			.map(|path| path.display().to_string())
			.collect::<Vec<_>>(),
		"failures": report
			.failures
			.iter()
			.map(|failure| {
				serde_json::json!({
					"file": set.get(failure.file).relative_path.display().to_string(),
					"message": failure.message,
				})
			})
			.collect::<Vec<_>>(),
	});
	println!("{json:#}");
}

fn run_list(args: &WeldCli, format: OutputFormat) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = WeldConfig::load(&root)?;
	let options = CombineOptions::from_config(config.as_ref())?;
	let build = config.map(|c| c.build).unwrap_or_default();

	let mut set = SourceSet::load(&root, &[build.working.clone(), build.output.clone()])?;
	resolve_imports(&mut set, &options.registry);
	link_dependents(&mut set, &options.preserve);

	match format {
		OutputFormat::Text => print_list_text(&set),
		OutputFormat::Json => print_list_json(&set),
	}

	Ok(())
}

fn print_list_text(set: &SourceSet) {
	for (_, file) in set.iter() {
		let marker = if file.no_copy {
			format!(" {}", colored!("(suppressed)", yellow))
		} else {
			String::new()
		};
		println!("{}{marker}", file.relative_path.display());

		for edge in &file.imports {
			let import = set.get(edge.target);
			println!("  imports {}", relative_import(file, import, false));
		}
		for &dependent in &file.dependents {
			println!(
				"  imported by {}",
				set.get(dependent).relative_path.display()
			);
		}
	}

	let suppressed = set.iter().filter(|(_, file)| file.no_copy).count();
	println!();
	println!(
		"{} file(s), {suppressed} suppressed from standalone output.",
		set.len()
	);
}

fn print_list_json(set: &SourceSet) {
	let files: Vec<serde_json::Value> = set
		.iter()
		.map(|(_, file)| {
			serde_json::json!({
				"file": file.relative_path.display().to_string(),
				"imports": file
					.imports
					.iter()
					.map(|edge| set.get(edge.target).relative_path.display().to_string())
					.collect::<Vec<_>>(),
				"dependents": file
					.dependents
					.iter()
					.map(|&id| set.get(id).relative_path.display().to_string())
					.collect::<Vec<_>>(),
				"suppressed": file.no_copy,
			})
		})
		.collect();

	println!("{:#}", serde_json::Value::Array(files));
}
