//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use phpsa::config::Configuration;
use phpsa::context::Severity;
use phpsa::report;

use pretty_assertions::assert_eq;

#[test]
fn round_trip_issues_through_json()
{
	let source = "<?php\n$a = array();\necho 1 % 0;\n";
	let issues =
		phpsa::analyze_source(source, "round_trip.php", &Configuration::default())
			.unwrap();
	assert_eq!(issues.len(), 2);

	let json = report::to_json(&issues).unwrap();
	let parsed = report::from_json(&json).unwrap();
	assert_eq!(parsed, issues);
	assert_eq!(parsed[1].severity, Severity::Warning);
	assert_eq!(parsed[1].location.source_filename, "round_trip.php");
	assert_eq!(parsed[1].location.line_start, 3);
	assert_eq!(parsed[1].location.span, issues[1].location.span);
}

#[test]
fn write_json_report()
{
	let outdir = tempfile::tempdir().unwrap();
	let path = outdir.path().join("report.json");
	let source = "<?php\nvar_dump(1);\n";
	let issues =
		phpsa::analyze_source(source, "dump.php", &Configuration::default())
			.unwrap();
	report::write_json(&path, &issues).unwrap();

	let raw = std::fs::read_to_string(&path).unwrap();
	let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
	assert_eq!(value[0]["code"], "debug.code");
	assert_eq!(value[0]["severity"], "notice");
	assert_eq!(value[0]["location"]["line_start"], 2);
}
