use assert_cmd::Command;
use weld_core::AnyEmptyResult;

#[test]
fn init_creates_sample_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = Command::cargo_bin("weld")?;
	cmd.env("NO_COLOR", "1")
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created weld.toml"));

	let content = std::fs::read_to_string(tmp.path().join("weld.toml"))?;
	assert!(content.contains("[[patterns]]"));
	assert!(content.contains("[preserve]"));

	Ok(())
}

#[test]
fn init_is_a_noop_when_config_exists() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("weld.toml"), "# existing\n")?;

	let mut cmd = Command::cargo_bin("weld")?;
	cmd.env("NO_COLOR", "1")
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	let content = std::fs::read_to_string(tmp.path().join("weld.toml"))?;
	assert_eq!(content, "# existing\n");

	Ok(())
}
