use assert_cmd::Command;
use weld_core::AnyEmptyResult;

#[test]
fn combine_splices_imports_and_emits_artifacts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("a.html"),
		"<main>\n  <!-- import('b.html') -->\n</main>\n",
	)?;
	std::fs::write(tmp.path().join("b.html"), "<b>B</b>")?;

	let mut cmd = Command::cargo_bin("weld")?;
	cmd.env("NO_COLOR", "1")
		.arg("combine")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Combined 1 file(s)"))
		.stdout(predicates::str::contains("Emitted 1 file(s)"));

	// The emitted artifact is spliced; the suppressed import is not emitted.
	let artifact = std::fs::read_to_string(tmp.path().join("dist/a.html"))?;
	assert_eq!(artifact, "<main>\n  <b>B</b>\n</main>\n");
	assert!(!tmp.path().join("dist/b.html").exists());

	// Sources are untouched; only working copies were rewritten.
	let source = std::fs::read_to_string(tmp.path().join("a.html"))?;
	assert!(source.contains("import('b.html')"));

	Ok(())
}

#[test]
fn combine_dry_run_does_not_emit() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.html"), "<!-- import('b.html') -->\n")?;
	std::fs::write(tmp.path().join("b.html"), "<b>B</b>")?;

	let mut cmd = Command::cargo_bin("weld")?;
	cmd.env("NO_COLOR", "1")
		.arg("combine")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run"));

	assert!(!tmp.path().join("dist").exists());

	Ok(())
}

#[test]
fn combine_json_reports_combined_and_suppressed() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.html"), "<!-- import('b.html') -->\n")?;
	std::fs::write(tmp.path().join("b.html"), "<b>B</b>")?;

	let mut cmd = Command::cargo_bin("weld")?;
	let output = cmd
		.env("NO_COLOR", "1")
		.arg("combine")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let json: serde_json::Value = serde_json::from_slice(&output)?;
	assert_eq!(json["combined"], serde_json::json!(["a.html"]));
	assert_eq!(json["suppressed"], serde_json::json!(["b.html"]));
	assert_eq!(json["emitted"], serde_json::json!(["a.html"]));
	assert_eq!(json["failures"], serde_json::json!([]));

	Ok(())
}

#[test]
fn combine_rejects_cyclic_imports() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.html"), "<!-- import('b.html') -->\n")?;
	std::fs::write(tmp.path().join("b.html"), "<!-- import('a.html') -->\n")?;

	let mut cmd = Command::cargo_bin("weld")?;
	cmd.env("NO_COLOR", "1")
		.arg("combine")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains("import cycle"));

	Ok(())
}

#[test]
fn combine_respects_preserve_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("weld.toml"),
		"[preserve]\npatterns = [\"shared/**\"]\n",
	)?;
	std::fs::create_dir_all(tmp.path().join("shared"))?;
	std::fs::write(
		tmp.path().join("page.html"),
		"<!-- import('shared/nav.html') -->\n",
	)?;
	std::fs::write(tmp.path().join("shared/nav.html"), "<nav/>")?;

	let mut cmd = Command::cargo_bin("weld")?;
	cmd.env("NO_COLOR", "1")
		.arg("combine")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Emitted 2 file(s)"));

	// The preserved partial is inlined *and* still emitted standalone.
	assert!(tmp.path().join("dist/page.html").is_file());
	assert!(tmp.path().join("dist/shared/nav.html").is_file());
	let page = std::fs::read_to_string(tmp.path().join("dist/page.html"))?;
	assert_eq!(page, "<nav/>\n");

	Ok(())
}
