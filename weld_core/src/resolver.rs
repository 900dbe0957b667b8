use std::path::Path;

use crate::patterns::PatternGroup;
use crate::project::FileId;
use crate::project::ImportEdge;
use crate::project::SourceFile;
use crate::project::SourceSet;

/// Map one literal import token to a candidate file.
///
/// Two ways to match, tried for each candidate in set insertion order:
///
/// 1. The candidate's path relative to the host equals the token exactly.
/// 2. The stems (paths minus extension) are equal and the candidate's
///    extension — original or current — is accepted by one of the host's
///    pattern groups (extension set, alternates, or a `.*` wildcard). The
///    produced edge is marked [`ImportEdge::ext_omitted`].
///
/// The first candidate satisfying either rule wins; a token matching no
/// candidate resolves to `None` (an external reference, not an error). A
/// file never resolves to itself.
pub fn resolve(
	set: &SourceSet,
	host_id: FileId,
	token: &str,
	groups: &[&PatternGroup],
) -> Option<ImportEdge> {
	let host = set.get(host_id);
	let token_stem = strip_extension(token);

	for (id, candidate) in set.iter() {
		if id == host_id {
			continue;
		}
		let relative = relative_import(host, candidate, false);
		if relative == token {
			return Some(ImportEdge {
				target: id,
				ext_omitted: false,
			});
		}
		if strip_extension(&relative) == token_stem && accepts_extension(groups, candidate) {
			return Some(ImportEdge {
				target: id,
				ext_omitted: true,
			});
		}
	}

	None
}

fn accepts_extension(groups: &[&PatternGroup], candidate: &SourceFile) -> bool {
	let current = candidate.extension();
	let original = candidate.original_extension();
	groups.iter().any(|group| {
		group.accepts_target_extension(current.as_deref())
			|| group.accepts_target_extension(original.as_deref())
	})
}

/// The candidate's path expressed relative to the host file's directory,
/// `/`-separated. Unless `omit_prefix` is set, the result carries a `./`
/// prefix when it does not already climb with `../`. A candidate marked
/// extension-omitted loses its extension, matching how its importers wrote
/// the reference.
#[must_use]
pub fn relative_import(host: &SourceFile, import: &SourceFile, omit_prefix: bool) -> String {
	let host_dir = host.full_path.parent().unwrap_or(Path::new(""));
	let import_dir = import.full_path.parent().unwrap_or(Path::new(""));

	let mut relative = relative_dir(host_dir, import_dir);
	if !relative.is_empty() {
		relative.push('/');
	}
	relative.push_str(&import.name());

	if import.ext_omitted {
		if let Some(ext) = import.extension() {
			if let Some(stem) = relative.strip_suffix(&ext) {
				relative = stem.to_string();
			}
		}
	}

	if !omit_prefix && !relative.starts_with("./") && !relative.starts_with("../") {
		relative = format!("./{relative}");
	}
	relative
}

/// `to` expressed relative to `from`, `/`-separated. Empty when the
/// directories are equal.
fn relative_dir(from: &Path, to: &Path) -> String {
	let from: Vec<String> = components_of(from);
	let to: Vec<String> = components_of(to);
	let common = from
		.iter()
		.zip(to.iter())
		.take_while(|(a, b)| a == b)
		.count();

	let mut parts: Vec<&str> = Vec::new();
	for _ in common..from.len() {
		parts.push("..");
	}
	for part in &to[common..] {
		parts.push(part);
	}
	parts.join("/")
}

fn components_of(path: &Path) -> Vec<String> {
	path.components()
		.map(|component| component.as_os_str().to_string_lossy().into_owned())
		.collect()
}

/// Strip the final `.suffix` from the last segment of a `/`-separated path.
/// A dotfile segment (`.env`) keeps its name.
pub(crate) fn strip_extension(path: &str) -> &str {
	let segment_start = path.rfind('/').map_or(0, |idx| idx + 1);
	match path[segment_start..].rfind('.') {
		Some(dot) if dot > 0 => &path[..segment_start + dot],
		_ => path,
	}
}
