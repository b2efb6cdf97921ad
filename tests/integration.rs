//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use assert_cmd::Command;

use pretty_assertions::assert_eq;

#[test]
fn check_clean_file()
{
	let mut cmd = Command::cargo_bin("phpsa").unwrap();
	cmd.arg("check");
	cmd.arg("--color=never");
	cmd.arg("tests/samples/clean.php");
	cmd.assert().success();
}

#[test]
fn check_by_default()
{
	let mut cmd = Command::cargo_bin("phpsa").unwrap();
	cmd.arg("--color=never");
	cmd.arg("tests/samples/passes/use_cast.php");
	let output = cmd.assert().success().get_output().stdout.clone();
	let stdout = String::from_utf8(output).unwrap();
	assert!(stdout.contains("fcall.cast"), "{}", stdout);
	assert!(stdout.contains("Checked 1 file(s): 2 issue(s)."), "{}", stdout);
}

#[test]
fn fail_on_fatal_issue()
{
	let mut cmd = Command::cargo_bin("phpsa").unwrap();
	cmd.arg("check");
	cmd.arg("--color=never");
	cmd.arg("tests/samples/fatal.php");
	cmd.assert().failure();
}

#[test]
fn fail_on_parse_error()
{
	let mut cmd = Command::cargo_bin("phpsa").unwrap();
	cmd.arg("check");
	cmd.arg("--arrows=ascii");
	cmd.arg("tests/samples/invalid/missing_semicolon.php");
	cmd.assert().failure();
}

#[test]
fn fail_on_missing_path()
{
	let mut cmd = Command::cargo_bin("phpsa").unwrap();
	cmd.arg("check");
	cmd.arg("tests/samples/does_not_exist.php");
	cmd.assert().failure();
}

#[test]
fn check_directory_with_report()
{
	let outdir = tempfile::tempdir().unwrap();
	let report_path = outdir.path().join("issues.json");
	let mut cmd = Command::cargo_bin("phpsa").unwrap();
	cmd.arg("check");
	cmd.arg("--color=never");
	cmd.arg("--report-json");
	cmd.arg(&report_path);
	cmd.arg("tests/samples/passes");
	cmd.assert().success();

	let raw = std::fs::read_to_string(&report_path).unwrap();
	let issues = phpsa::report::from_json(&raw).unwrap();
	assert_eq!(issues.len(), 18);
	// Files are visited in sorted order.
	assert_eq!(issues[0].code, "fcall.alias");
	assert_eq!(issues[17].code, "fcall.cast");
}

#[test]
fn check_with_configuration_file()
{
	let workdir = tempfile::tempdir().unwrap();
	std::fs::write(
		workdir.path().join("debug.php"),
		"<?php\ndd(1);\nvar_dump(2);\n",
	)
	.unwrap();
	std::fs::write(
		workdir.path().join(".phpsa.toml"),
		"[analyzers.debug_code]\nfunctions = [\"dd\"]\n",
	)
	.unwrap();
	let report_path = workdir.path().join("issues.json");

	let mut cmd = Command::cargo_bin("phpsa").unwrap();
	cmd.arg("check");
	cmd.arg("--report-json");
	cmd.arg(&report_path);
	cmd.arg(workdir.path());
	cmd.assert().success();

	let raw = std::fs::read_to_string(&report_path).unwrap();
	let issues = phpsa::report::from_json(&raw).unwrap();
	assert_eq!(issues.len(), 2);
}

#[test]
fn reject_invalid_configuration()
{
	let workdir = tempfile::tempdir().unwrap();
	let config_path = workdir.path().join("custom.toml");
	std::fs::write(&config_path, "[analyzers.nonsense]\n").unwrap();

	let mut cmd = Command::cargo_bin("phpsa").unwrap();
	cmd.arg("check");
	cmd.arg("--config");
	cmd.arg(&config_path);
	cmd.arg("tests/samples/clean.php");
	cmd.assert().failure();
}
