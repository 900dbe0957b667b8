use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;

use crate::WeldError;
use crate::WeldResult;
use crate::config::CONFIG_FILE_CANDIDATES;

/// Stable handle for a [`SourceFile`] inside a [`SourceSet`].
///
/// Import and dependent edges are stored as ids rather than references, so
/// the graph can be traversed in both directions without ownership cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
	/// The arena index backing this id.
	#[must_use]
	pub fn index(self) -> usize {
		self.0
	}
}

/// Processing state of a file within a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileState {
	/// Participates in scanning and splicing.
	#[default]
	Pending,
	/// Finalized by an upstream step. Still spliced *into* importers, but
	/// never re-scanned or re-spliced as a host.
	Done,
}

/// One resolved import edge, owned by the importing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportEdge {
	/// The imported file.
	pub target: FileId,
	/// The host referenced the target without its extension.
	pub ext_omitted: bool,
}

/// A member of the candidate file set.
#[derive(Debug, Clone)]
pub struct SourceFile {
	/// Identity: unique full path of the file in the project source tree.
	pub full_path: PathBuf,
	/// Current on-disk location read and written during the combine phase.
	pub working_path: PathBuf,
	/// Pre-transform path. Differs from `full_path` when an upstream step
	/// compiled the file to another extension; pattern selection consults
	/// both.
	pub original_path: PathBuf,
	/// Path relative to the project root, used for preserve matching and
	/// display.
	pub relative_path: PathBuf,
	/// Resolved imports in the order their directives were discovered.
	pub imports: Vec<ImportEdge>,
	/// Files whose `imports` reference this file. Derived, not
	/// authoritative.
	pub dependents: Vec<FileId>,
	/// Content is fully absorbed elsewhere; suppress standalone output.
	pub no_copy: bool,
	/// At least one importer referenced this file without its extension, so
	/// relative-path computations for it omit the extension.
	pub ext_omitted: bool,
	/// Lifecycle state.
	pub state: FileState,
}

impl SourceFile {
	/// Create a file rooted at `full_path` with the given project-relative
	/// path. Working and original paths start out identical to the full
	/// path.
	#[must_use]
	pub fn new(full_path: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
		let full_path = full_path.into();
		Self {
			working_path: full_path.clone(),
			original_path: full_path.clone(),
			full_path,
			relative_path: relative_path.into(),
			imports: Vec::new(),
			dependents: Vec::new(),
			no_copy: false,
			ext_omitted: false,
			state: FileState::default(),
		}
	}

	/// Record a pre-transform path (e.g. the `.coffee` source of a compiled
	/// `.js` file).
	#[must_use]
	pub fn with_original_path(mut self, original_path: impl Into<PathBuf>) -> Self {
		self.original_path = original_path.into();
		self
	}

	/// Override the lifecycle state.
	#[must_use]
	pub fn with_state(mut self, state: FileState) -> Self {
		self.state = state;
		self
	}

	/// Current file name.
	#[must_use]
	pub fn name(&self) -> String {
		self.working_path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default()
	}

	/// Current extension (with leading dot, lowercase), from the working
	/// path.
	#[must_use]
	pub fn extension(&self) -> Option<String> {
		path_extension(&self.working_path)
	}

	/// Pre-transform extension (with leading dot, lowercase).
	#[must_use]
	pub fn original_extension(&self) -> Option<String> {
		path_extension(&self.original_path)
	}
}

fn path_extension(path: &Path) -> Option<String> {
	path.extension()
		.and_then(|ext| ext.to_str())
		.map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

/// Arena of [`SourceFile`] records forming the candidate set for one run.
///
/// Files are addressed by [`FileId`]; insertion order is preserved and is
/// the resolution tie-break order.
#[derive(Debug, Default)]
pub struct SourceSet {
	files: Vec<SourceFile>,
}

impl SourceSet {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a file, returning its id. A file whose full path is already
	/// present is not duplicated; the existing id is returned.
	pub fn push(&mut self, file: SourceFile) -> FileId {
		if let Some(existing) = self.find(&file.full_path) {
			return existing;
		}
		let id = FileId(self.files.len());
		self.files.push(file);
		id
	}

	#[must_use]
	pub fn get(&self, id: FileId) -> &SourceFile {
		&self.files[id.0]
	}

	pub fn get_mut(&mut self, id: FileId) -> &mut SourceFile {
		&mut self.files[id.0]
	}

	/// Ids in insertion order.
	#[must_use]
	pub fn ids(&self) -> Vec<FileId> {
		(0..self.files.len()).map(FileId).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
		self.files.iter().enumerate().map(|(i, f)| (FileId(i), f))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.files.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Look up a file by its full path.
	#[must_use]
	pub fn find(&self, full_path: &Path) -> Option<FileId> {
		self.files
			.iter()
			.position(|file| file.full_path == full_path)
			.map(FileId)
	}

	/// Build the candidate set by walking `root`. Hidden files and anything
	/// ignored by `.gitignore` are skipped, as are the config file and any
	/// `exclude` directory prefixes (working/output trees). Files are added
	/// in sorted path order so resolution tie-breaks are deterministic.
	pub fn load(root: &Path, exclude: &[PathBuf]) -> WeldResult<Self> {
		let mut paths = Vec::new();
		for entry in WalkBuilder::new(root).build() {
			let entry = entry.map_err(|e| WeldError::Io(std::io::Error::other(e)))?;
			if entry.file_type().is_some_and(|ft| ft.is_file()) {
				paths.push(entry.into_path());
			}
		}
		paths.sort();

		let mut set = Self::new();
		for path in paths {
			let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
			if CONFIG_FILE_CANDIDATES
				.iter()
				.any(|candidate| Path::new(candidate) == relative)
			{
				continue;
			}
			if exclude.iter().any(|prefix| relative.starts_with(prefix)) {
				continue;
			}
			set.push(SourceFile::new(path, relative));
		}
		Ok(set)
	}

	/// Copy every file into `working_dir` (preserving relative layout) and
	/// repoint working paths there. The splicer mutates only these copies.
	pub fn stage(&mut self, working_dir: &Path) -> WeldResult<()> {
		for file in &mut self.files {
			let dest = working_dir.join(&file.relative_path);
			if let Some(parent) = dest.parent() {
				std::fs::create_dir_all(parent)?;
			}
			std::fs::copy(&file.full_path, &dest)?;
			file.working_path = dest;
		}
		Ok(())
	}

	/// Copy every non-suppressed working copy into `output_dir`, returning
	/// the relative paths emitted.
	pub fn emit(&self, output_dir: &Path) -> WeldResult<Vec<PathBuf>> {
		let mut emitted = Vec::new();
		for file in &self.files {
			if file.no_copy {
				continue;
			}
			let dest = output_dir.join(&file.relative_path);
			if let Some(parent) = dest.parent() {
				std::fs::create_dir_all(parent)?;
			}
			std::fs::copy(&file.working_path, &dest)?;
			emitted.push(file.relative_path.clone());
		}
		Ok(emitted)
	}
}

/// Build the preserve matcher from configured glob patterns.
pub fn build_preserve_set(patterns: &[String]) -> WeldResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern)
			.map_err(|_| WeldError::InvalidPreservePattern(pattern.clone()))?;
		builder.add(glob);
	}
	builder
		.build()
		.map_err(|_| WeldError::InvalidPreservePattern(patterns.join(", ")))
}
