use std::path::Path;
use std::path::PathBuf;

use crate::engine::CombineOptions;
use crate::project::SourceFile;
use crate::project::SourceSet;

/// Write `content` at `relative` under `root`, creating parent directories.
pub(crate) fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).expect("create fixture directories");
	}
	std::fs::write(&path, content).expect("write fixture file");
	path
}

/// Write the given `(relative, content)` files under `root` and build a
/// [`SourceSet`] containing them in the given order. Insertion order is the
/// resolution tie-break order, so tests control it explicitly.
pub(crate) fn set_from(root: &Path, files: &[(&str, &str)]) -> SourceSet {
	let mut set = SourceSet::new();
	for (relative, content) in files {
		let path = write_file(root, relative, content);
		set.push(SourceFile::new(path, *relative));
	}
	set
}

/// Options built from the compiled-in defaults with no preserve patterns.
pub(crate) fn default_options() -> CombineOptions {
	CombineOptions::from_config(None).expect("default options")
}
