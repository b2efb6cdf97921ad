//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! A static analyzer for PHP. Source files are lexed and parsed, constant
//! expressions are folded by the evaluator, and every node is handed to the
//! analyzer passes registered for its kind.

pub mod analyzer;
pub mod common;
pub mod compiled;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod docblock;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod report;
pub mod stdout;

use crate::common::Statement;
use crate::config::Configuration;
use crate::context::{Context, Issue};
use crate::dispatcher::Dispatcher;
use crate::error::Errors;
use crate::evaluator::Evaluator;

use anyhow::Context as _;

/// Lexes, parses and analyzes a single source file. Analysis is skipped
/// when the file does not parse.
pub fn analyze_source(
	source: &str,
	filename: &str,
	configuration: &Configuration,
) -> Result<Vec<Issue>, Errors>
{
	let tokens = lexer::lex(source, filename);
	log::trace!("lexed {} tokens from {}", tokens.len(), filename);
	let (statements, errors) = parser::parse(tokens);
	if !errors.is_empty()
	{
		log::debug!("{} parse errors in {}", errors.len(), filename);
		return Err(Errors::from(errors));
	}
	let issues = analyze(&statements, configuration);
	log::debug!("{} issues in {}", issues.len(), filename);
	Ok(issues)
}

pub fn analyze_file(
	path: &std::path::Path,
	configuration: &Configuration,
) -> Result<Vec<Issue>, anyhow::Error>
{
	let source = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read '{}'", path.display()))?;
	let filename = path.to_string_lossy();
	let issues = analyze_source(&source, &filename, configuration)?;
	Ok(issues)
}

/// Runs the enabled passes over parsed statements.
pub fn analyze(
	statements: &[Statement],
	configuration: &Configuration,
) -> Vec<Issue>
{
	let passes = analyzer::from_configuration(configuration);
	let mut dispatcher = Dispatcher::with_passes(passes);
	let mut context = Context::new();
	let mut evaluator = Evaluator::new(&mut dispatcher, &mut context);
	evaluator.run(statements);
	context.into_issues()
}
