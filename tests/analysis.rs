//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use phpsa::config::Configuration;
use phpsa::context::{Issue, Severity};
use phpsa::*;

use pretty_assertions::assert_eq;

fn analyze_with(filename: &str, configuration: &Configuration) -> Vec<Issue>
{
	let source = std::fs::read_to_string(filename).unwrap();
	match phpsa::analyze_source(&source, filename, configuration)
	{
		Ok(issues) => issues,
		Err(errors) => panic!("failed to parse {}: {:?}", filename, errors),
	}
}

fn analyze(filename: &str) -> Vec<Issue>
{
	analyze_with(filename, &Configuration::default())
}

fn codes(issues: &[Issue]) -> Vec<&str>
{
	issues.iter().map(|issue| issue.code.as_str()).collect()
}

fn analyze_to_fail(codes: &[u16], filename: &str)
{
	let source = std::fs::read_to_string(filename).unwrap();
	match phpsa::analyze_source(&source, filename, &Configuration::default())
	{
		Ok(_) => panic!("broken test"),
		Err(errors) =>
		{
			assert_eq!(errors.codes(), codes, "unexpected {:?}", errors)
		}
	}
}

#[test]
fn analyze_clean()
{
	let issues = analyze("tests/samples/clean.php");
	assert_eq!(issues, vec![]);
}

#[test]
fn analyze_alias_check()
{
	let issues = analyze("tests/samples/passes/alias_check.php");
	assert_eq!(codes(&issues), vec!["fcall.alias"; 3]);
	assert_eq!(
		issues[0].message,
		"join() is an alias of function. Use implode(...)."
	);
	assert_eq!(issues[2].location.line_start, 6);
}

#[test]
fn analyze_array_short_definition()
{
	let issues = analyze("tests/samples/passes/array_short_definition.php");
	assert_eq!(codes(&issues), vec!["array.short-syntax"; 2]);
	assert_eq!(issues[0].location.line_start, 3);
	assert_eq!(issues[1].location.line_start, 5);
}

#[test]
fn analyze_constant_condition()
{
	let issues = analyze("tests/samples/passes/constant_condition.php");
	assert_eq!(codes(&issues), vec!["condition.constant"; 2]);
	assert_eq!(issues[0].message, "Condition is always true.");
	assert_eq!(issues[1].message, "Condition is always false.");
}

#[test]
fn analyze_debug_code()
{
	let issues = analyze("tests/samples/passes/debug_code.php");
	assert_eq!(codes(&issues), vec!["debug.code"; 2]);
	assert!(issues.iter().all(|issue| issue.severity == Severity::Notice));
}

#[test]
fn analyze_debug_code_with_configured_functions()
{
	let configuration: Configuration =
		"[analyzers.debug_code]\nfunctions = [\"dd\"]\n".parse().unwrap();
	let issues =
		analyze_with("tests/samples/passes/debug_code.php", &configuration);
	assert_eq!(codes(&issues), vec!["debug.code"; 3]);
	assert_eq!(
		issues[2].message,
		"Function dd() is a debug function, please don't use it in \
		 production."
	);
}

#[test]
fn analyze_deprecated_ini_options()
{
	let issues = analyze("tests/samples/passes/deprecated_ini_options.php");
	assert_eq!(codes(&issues), vec!["deprecated.option"; 2]);
	assert_eq!(issues[0].severity, Severity::Warning);
	assert_eq!(issues[0].message, "Ini option safe_mode was removed in PHP 5.4.");
	assert_eq!(
		issues[1].message,
		"Ini option track_errors is deprecated since PHP 7.2."
	);
}

#[test]
fn analyze_method_cannot_return()
{
	let issues = analyze("tests/samples/passes/method_cannot_return.php");
	assert_eq!(codes(&issues), vec!["return.construct"]);
	assert_eq!(issues[0].message, "Method __construct cannot return a value.");
	assert_eq!(issues[0].location.line_start, 11);
}

#[test]
fn analyze_random_api_migration()
{
	let issues = analyze("tests/samples/passes/random_api_migration.php");
	assert_eq!(codes(&issues), vec!["rand.api.migration"; 3]);
}

#[test]
fn analyze_test_annotation()
{
	let issues = analyze("tests/samples/passes/test_annotation.php");
	assert_eq!(codes(&issues), vec!["test.annotation"]);
	assert_eq!(issues[0].severity, Severity::Notice);
	assert_eq!(issues[0].location.line_start, 8);
}

#[test]
fn analyze_use_cast()
{
	let issues = analyze("tests/samples/passes/use_cast.php");
	assert_eq!(codes(&issues), vec!["fcall.cast"; 2]);
}

#[test]
fn analyze_with_disabled_pass()
{
	let configuration: Configuration =
		"[analyzers.test_annotation]\nenabled = false\n".parse().unwrap();
	let issues =
		analyze_with("tests/samples/passes/test_annotation.php", &configuration);
	assert_eq!(issues, vec![]);
}

#[test]
fn analyze_fatal_statement()
{
	let issues = analyze("tests/samples/fatal.php");
	assert_eq!(codes(&issues), vec!["compiler.fatal", "array.short-syntax"]);
	assert_eq!(issues[0].severity, Severity::Fatal);
	assert_eq!(issues[0].message, "Cannot re-assign $this.");
	assert!(issues[0].is_failure());
}

#[test]
fn fail_to_parse_missing_semicolon()
{
	analyze_to_fail(&[300], "tests/samples/invalid/missing_semicolon.php");
}

#[test]
fn fail_to_parse_missing_operand()
{
	analyze_to_fail(&[300], "tests/samples/invalid/missing_operand.php");
}

#[test]
fn fail_to_parse_unterminated_string()
{
	analyze_to_fail(&[161], "tests/samples/invalid/unterminated_string.php");
}

#[test]
fn fail_to_parse_deep_nesting()
{
	let source = format!("<?php echo {}1{};", "(".repeat(500), ")".repeat(500));
	match analyze_source(&source, "deep.php", &Configuration::default())
	{
		Ok(_) => panic!("broken test"),
		Err(errors) => assert_eq!(errors.codes(), vec![391]),
	}
}

#[test]
fn fail_to_parse_deep_nesting_on_a_small_stack()
{
	let handle = std::thread::Builder::new()
		.stack_size(2 * 1024 * 1024)
		.spawn(|| {
			let source =
				format!("<?php echo {}1{};", "(".repeat(40), ")".repeat(40));
			parser::parse(lexer::lex(&source, "deep.php")).1.len()
		})
		.unwrap();
	assert_eq!(handle.join().unwrap(), 1);
}

#[test]
fn fail_to_parse_deep_unary_nesting()
{
	let source = format!("<?php echo {}1;", "!".repeat(500));
	match analyze_source(&source, "deep.php", &Configuration::default())
	{
		Ok(_) => panic!("broken test"),
		Err(errors) => assert_eq!(errors.codes(), vec![391]),
	}
}

#[test]
fn fail_to_parse_long_operator_chain()
{
	let terms = vec!["1"; 1000];
	let source = format!("<?php echo {};", terms.join(" + "));
	match analyze_source(&source, "long.php", &Configuration::default())
	{
		Ok(_) => panic!("broken test"),
		Err(errors) => assert_eq!(errors.codes(), vec![391]),
	}
}

#[test]
fn fail_to_parse_long_method_chain()
{
	let source = format!("<?php $query{};", "->where()".repeat(1000));
	match analyze_source(&source, "long.php", &Configuration::default())
	{
		Ok(_) => panic!("broken test"),
		Err(errors) => assert_eq!(errors.codes(), vec![391]),
	}
}

#[test]
fn analyze_moderate_operator_chain()
{
	let terms = vec!["'a'"; 30];
	let source = format!("<?php echo {} . $b;", terms.join(" . "));
	let issues =
		analyze_source(&source, "chain.php", &Configuration::default()).unwrap();
	assert_eq!(issues, vec![]);
}
