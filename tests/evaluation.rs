//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use phpsa::common::Statement;
use phpsa::compiled::{ArrayElement, ArrayKey, CompiledValue};
use phpsa::context::{Context, Issue, Severity};
use phpsa::dispatcher::Dispatcher;
use phpsa::evaluator::Evaluator;
use phpsa::*;

use pretty_assertions::assert_eq;

fn parse_single_expression(source: &str) -> Vec<Statement>
{
	let source = format!("<?php {};", source);
	let (statements, errors) = parser::parse(lexer::lex(&source, "test.php"));
	assert!(errors.is_empty(), "unexpected {:?}", errors);
	assert_eq!(statements.len(), 1);
	statements
}

fn evaluate(source: &str) -> (CompiledValue, Vec<Issue>)
{
	let statements = parse_single_expression(source);
	let expression = match &statements[0]
	{
		Statement::Expression { expression, .. } => expression,
		other => panic!("unexpected {:?}", other),
	};
	let mut dispatcher = Dispatcher::with_passes(analyzer::all());
	let mut context = Context::new();
	let mut evaluator = Evaluator::new(&mut dispatcher, &mut context);
	let value = evaluator.evaluate(expression).unwrap();
	(value, context.into_issues())
}

fn evaluate_value(source: &str) -> CompiledValue
{
	let (value, issues) = evaluate(source);
	assert_eq!(issues, vec![], "unexpected issues for {}", source);
	value
}

#[test]
fn divide_integers_exactly()
{
	let data = [
		("-1 / -1", 1),
		("-1 / 1", -1),
		("1 / 1", 1),
		("true / 1", 1),
		("true / true", 1),
		("1 / true", 1),
		("0 / 1", 0),
		("25 / 25", 1),
		("50 / 50", 1),
		("500 / 50", 10),
		("5000 / 50", 100),
	];
	for (source, expected) in data
	{
		assert_eq!(
			evaluate_value(source),
			CompiledValue::Integer(Some(expected)),
			"{}",
			source
		);
	}
}

#[test]
fn divide_integers_inexactly()
{
	assert_eq!(evaluate_value("1 / 3"), CompiledValue::Float(Some(1.0 / 3.0)));
	assert_eq!(evaluate_value("7 / 2"), CompiledValue::Float(Some(3.5)));
}

#[test]
fn divide_by_floats()
{
	let data = [
		("-1 / -1.25", 0.8),
		("-1 / 1.25", -0.8),
		("1 / 1.25", 0.8),
		("true / 1.25", 0.8),
		("0 / 1.25", 0.0),
		("25 / 12.5", 2.0),
		("25 / 6.25", 4.0),
		("25 / 3.125", 8.0),
		("-1.25 / -1", 1.25),
		("1.25 / -1", -1.25),
		("1.25 / true", 1.25),
		("12.5 / 25", 0.5),
		("6.25 / 25", 0.25),
		("3.125 / 25.0", 0.125),
	];
	for (source, expected) in data
	{
		assert_eq!(
			evaluate_value(source),
			CompiledValue::Float(Some(expected)),
			"{}",
			source
		);
	}
}

#[test]
fn divide_by_zero()
{
	let (value, issues) = evaluate("1 / 0");
	assert_eq!(value, CompiledValue::Unknown);
	assert_eq!(issues.len(), 1);
	assert_eq!(issues[0].code, "division.zero");
	assert_eq!(issues[0].severity, Severity::Warning);
	assert_eq!(issues[0].message, "Division by zero.");
	assert!(!issues[0].is_failure());
}

#[test]
fn modulo_by_zero()
{
	let (value, issues) = evaluate("5 % 0");
	assert_eq!(value, CompiledValue::Unknown);
	assert_eq!(issues.len(), 1);
	assert_eq!(issues[0].message, "Modulo by zero.");
}

#[test]
fn compare_smaller()
{
	let data = [
		("1 < 2", true),
		("2 < 1", false),
		("1.5 < 2", true),
		("2.5 < 2", false),
		("'abc' < 'abd'", true),
		("'10' < '9'", false),
		("null < 1", true),
		("false < true", true),
	];
	for (source, expected) in data
	{
		assert_eq!(
			evaluate_value(source),
			CompiledValue::Boolean(Some(expected)),
			"{}",
			source
		);
	}
}

#[test]
fn compare_partially_known()
{
	assert_eq!(evaluate_value("$x < 1"), CompiledValue::Boolean(None));
	assert_eq!(evaluate_value("$x <=> 1"), CompiledValue::Integer(None));
	assert_eq!(evaluate_value("1 == '1'"), CompiledValue::Boolean(Some(true)));
	assert_eq!(evaluate_value("1 === '1'"), CompiledValue::Boolean(Some(false)));
}

#[test]
fn concatenate_and_fold()
{
	assert_eq!(
		evaluate_value("'a' . 1 . 2.5"),
		CompiledValue::String(Some("a12.5".to_string()))
	);
	assert_eq!(evaluate_value("2 ** 10"), CompiledValue::Integer(Some(1024)));
	assert_eq!(evaluate_value("-2 ** 2"), CompiledValue::Integer(Some(-4)));
	assert_eq!(
		evaluate_value("PHP_INT_MAX + 1"),
		CompiledValue::Float(Some(9.223372036854776e18))
	);
}

#[test]
fn fold_overflowing_literals()
{
	assert_eq!(
		evaluate_value("9223372036854775808"),
		CompiledValue::Float(Some(2f64.powi(63)))
	);
	assert_eq!(
		evaluate_value("9223372036854775808 == PHP_INT_MAX + 1"),
		CompiledValue::Boolean(Some(true))
	);
	assert_eq!(
		evaluate_value("123456789012345678901234567890"),
		CompiledValue::Float(Some(1.2345678901234568e29))
	);
	assert_eq!(
		evaluate_value("0x8000000000000000"),
		CompiledValue::Float(Some(2f64.powi(63)))
	);
}

#[test]
fn poison_arithmetic_with_unknowns()
{
	let data = [
		("$x + 1", CompiledValue::Unknown),
		("$x / 2", CompiledValue::Unknown),
		("2 - $x", CompiledValue::Unknown),
		("'abc' * 2", CompiledValue::Unknown),
		("[] + 1", CompiledValue::Unknown),
		("(int) $x + 1", CompiledValue::Unknown),
		("(float) $x + 1.5", CompiledValue::Float(None)),
		("(float) $x * 2", CompiledValue::Float(None)),
		("1.5 / (float) $x", CompiledValue::Float(None)),
		("$x . 'a'", CompiledValue::Unknown),
		("(string) $x . 'a'", CompiledValue::String(None)),
	];
	for (source, expected) in data
	{
		assert_eq!(evaluate_value(source), expected, "{}", source);
	}
}

#[test]
fn compare_loosely_across_types()
{
	let data = [
		("'abc' == 0", true),
		("'1e3' == '1000'", true),
		("'1abc' == 1", true),
		("'10' == '1e1'", true),
		("100 == '1e2'", true),
		("0 == ''", true),
		("true == 'a'", true),
		("false == '0'", true),
		("null == '0'", false),
		("null == false", true),
		("null == []", true),
		("'abc' == 'ABC'", false),
		("[1] == 1", false),
		("[] == false", true),
		("[1, 2] > 5", true),
		("5 < [1]", true),
		("[1, 2] == [1, 2]", true),
		("[1, 2] == [2 => 1]", false),
	];
	for (source, expected) in data
	{
		assert_eq!(
			evaluate_value(source),
			CompiledValue::Boolean(Some(expected)),
			"{}",
			source
		);
	}
}

#[test]
fn fold_short_array()
{
	let expected = CompiledValue::Array(Some(vec![
		ArrayElement {
			key: ArrayKey::Integer(0),
			value: CompiledValue::Integer(Some(1)),
		},
		ArrayElement {
			key: ArrayKey::String("a".to_string()),
			value: CompiledValue::Integer(Some(2)),
		},
		ArrayElement {
			key: ArrayKey::Integer(1),
			value: CompiledValue::Integer(Some(3)),
		},
	]));
	assert_eq!(evaluate_value("[1, 'a' => 2, 3]"), expected);
}

#[test]
fn fold_array_with_largest_key()
{
	let expected = CompiledValue::Array(Some(vec![ArrayElement {
		key: ArrayKey::Integer(i64::MAX),
		value: CompiledValue::Integer(Some(1)),
	}]));
	assert_eq!(evaluate_value("[PHP_INT_MAX => 1]"), expected);
	assert_eq!(evaluate_value("[PHP_INT_MAX => 1, 2]"), CompiledValue::Unknown);
}

#[test]
fn evaluate_idempotently()
{
	let statements = parse_single_expression("1 / 0");
	let expression = match &statements[0]
	{
		Statement::Expression { expression, .. } => expression,
		other => panic!("unexpected {:?}", other),
	};
	let mut dispatcher = Dispatcher::with_passes(analyzer::all());
	let mut context = Context::new();
	let mut evaluator = Evaluator::new(&mut dispatcher, &mut context);
	let first = evaluator.evaluate(expression).unwrap();
	let second = evaluator.evaluate(expression).unwrap();
	assert_eq!(first, second);
	assert_eq!(context.issues().len(), 1);
}

#[test]
fn evaluate_fatal_assignment()
{
	let statements = parse_single_expression("echo 1 / 0 + (1 = 2)");
	let mut dispatcher = Dispatcher::with_passes(analyzer::all());
	let mut context = Context::new();
	let mut evaluator = Evaluator::new(&mut dispatcher, &mut context);
	evaluator.run(&statements);
	let issues = context.into_issues();
	assert_eq!(issues.len(), 1);
	assert_eq!(issues[0].code, "compiler.fatal");
	assert_eq!(issues[0].message, "Cannot assign to this expression.");
}

#[test]
fn evaluate_fatal_read_of_append()
{
	let source = "<?php echo $items[];\n$a = 1 / 0;";
	let issues = analyze_source(source, "test.php", &Default::default()).unwrap();
	let codes: Vec<&str> = issues.iter().map(|x| x.code.as_str()).collect();
	assert_eq!(codes, vec!["compiler.fatal", "division.zero"]);
	assert_eq!(issues[0].message, "Cannot use [] for reading.");
}

#[test]
fn forget_variables_assigned_in_branches()
{
	let source = "<?php\n$a = 1;\nif ($x) { $a = 0; }\nif ($a) { }\n";
	let issues = analyze_source(source, "test.php", &Default::default()).unwrap();
	assert_eq!(issues, vec![]);
}

#[test]
fn forget_variables_assigned_in_loops()
{
	let source = "<?php\n$i = 0;\nwhile ($i < 10) { $i = $i + 1; }\n";
	let issues = analyze_source(source, "test.php", &Default::default()).unwrap();
	assert_eq!(issues, vec![]);
}

#[test]
fn keep_variables_across_statements()
{
	let source = "<?php\n$a = 0;\n$b = $a;\nif ($b) { }\n";
	let issues = analyze_source(source, "test.php", &Default::default()).unwrap();
	assert_eq!(issues.len(), 1);
	assert_eq!(issues[0].message, "Condition is always false.");
	assert_eq!(issues[0].location.line_start, 4);
}
