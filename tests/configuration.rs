//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use phpsa::analyzer;
use phpsa::config::{Configuration, Error};

use pretty_assertions::assert_eq;

fn names(configuration: &Configuration) -> Vec<&'static str>
{
	analyzer::from_configuration(configuration)
		.iter()
		.map(|pass| pass.name())
		.collect()
}

#[test]
fn enable_every_pass_by_default()
{
	let configuration: Configuration = "".parse().unwrap();
	assert!(!configuration.blame);
	assert_eq!(
		names(&configuration),
		vec![
			"alias_check",
			"debug_code",
			"random_api_migration",
			"use_cast",
			"deprecated_ini_options",
			"array_short_definition",
			"method_cannot_return",
			"test_annotation",
			"constant_condition",
		]
	);
}

#[test]
fn disable_pass()
{
	let raw = "blame = true\n\n[analyzers.alias_check]\nenabled = false\n";
	let configuration: Configuration = raw.parse().unwrap();
	assert!(configuration.blame);
	assert!(!configuration.is_enabled("alias_check"));
	assert!(configuration.is_enabled("use_cast"));
	assert_eq!(names(&configuration).len(), 8);
	assert!(!names(&configuration).contains(&"alias_check"));
}

#[test]
fn read_string_list_option()
{
	let raw = "[analyzers.debug_code]\nfunctions = [\"dd\", \"dump\"]\n";
	let configuration: Configuration = raw.parse().unwrap();
	assert_eq!(
		configuration.string_list("debug_code", "functions"),
		vec!["dd", "dump"]
	);
	assert_eq!(
		configuration.string_list("alias_check", "functions"),
		Vec::<String>::new()
	);
}

#[test]
fn reject_unknown_analyzer()
{
	let raw = "[analyzers.spelling]\nenabled = true\n";
	match raw.parse::<Configuration>()
	{
		Err(Error::UnknownAnalyzer { name, known }) =>
		{
			assert_eq!(name, "spelling");
			assert!(known.contains("alias_check"));
			assert!(known.contains("constant_condition"));
		}
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn reject_disabling_mandatory_pass()
{
	let raw = "[analyzers.constant_condition]\nenabled = false\n";
	match raw.parse::<Configuration>()
	{
		Err(Error::CannotBeDisabled(name)) =>
		{
			assert_eq!(name, "constant_condition")
		}
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn reject_undeclared_option()
{
	let raw = "[analyzers.alias_check]\nfunctions = [\"join\"]\n";
	match raw.parse::<Configuration>()
	{
		Err(Error::UnknownOption { name, option }) =>
		{
			assert_eq!(name, "alias_check");
			assert_eq!(option, "functions");
		}
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn reject_malformed_option()
{
	let raw = "[analyzers.debug_code]\nfunctions = \"dd\"\n";
	match raw.parse::<Configuration>()
	{
		Err(Error::InvalidOption { .. }) => (),
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn reject_unknown_top_level_key()
{
	match "colour = true\n".parse::<Configuration>()
	{
		Err(Error::Toml(_)) => (),
		other => panic!("unexpected {:?}", other),
	}
}
