//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! Errors that prevent a source file from being analyzed.

pub use crate::lexer;
pub use crate::lexer::Location;

use ariadne::{Report, ReportKind};

/// The errors encountered while lexing and parsing a single source file.
#[must_use]
#[derive(Debug, Default)]
pub struct Errors
{
	pub errors: Vec<Error>,
}

impl Errors
{
	pub fn codes(&self) -> Vec<u16>
	{
		self.errors.iter().map(|x| x.code()).collect()
	}

	pub fn is_empty(&self) -> bool
	{
		self.errors.is_empty()
	}

	pub fn len(&self) -> usize
	{
		self.errors.len()
	}
}

impl From<Vec<Error>> for Errors
{
	fn from(errors: Vec<Error>) -> Errors
	{
		Errors { errors }
	}
}

impl IntoIterator for Errors
{
	type Item = Error;
	type IntoIter = std::vec::IntoIter<Error>;

	fn into_iter(self) -> Self::IntoIter
	{
		self.errors.into_iter()
	}
}

impl std::fmt::Display for Errors
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		write!(f, "{} parse error(s)", self.errors.len())
	}
}

impl std::error::Error for Errors {}

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Error
{
	UnexpectedEndOfFile
	{
		last_location: Location,
		expectation: String,
	},
	Lexical
	{
		error: lexer::Error,
		location: Location,
		expectation: String,
	},
	UnexpectedToken
	{
		location: Location,
		expectation: String,
	},
	MaximumParseDepthExceeded
	{
		location: Location
	},
}

impl Error
{
	pub fn code(&self) -> u16
	{
		match self
		{
			Error::UnexpectedEndOfFile { .. } => 100,
			Error::Lexical { error, .. } => match error
			{
				lexer::Error::UnexpectedCharacter => 160,
				lexer::Error::MissingClosingQuote => 161,
				lexer::Error::UnterminatedComment => 162,
				lexer::Error::InvalidNumericLiteral => 163,
			},
			Error::UnexpectedToken { .. } => 300,
			Error::MaximumParseDepthExceeded { .. } => 391,
		}
	}

	pub fn location(&self) -> &Location
	{
		match self
		{
			Error::UnexpectedEndOfFile { last_location, .. } => last_location,
			Error::Lexical { location, .. } => location,
			Error::UnexpectedToken { location, .. } => location,
			Error::MaximumParseDepthExceeded { location } => location,
		}
	}

	pub fn report(
		&self,
		config: ariadne::Config,
	) -> Report<(String, std::ops::Range<usize>)>
	{
		let mut colors = ariadne::ColorGenerator::new();
		let a = colors.next();

		match self
		{
			Error::UnexpectedEndOfFile {
				expectation,
				last_location,
			} => Report::build(
				ReportKind::Error,
				&last_location.source_filename,
				last_location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Unexpected end of file")
			.with_label(
				last_location
					.label_after_end()
					.with_message(expectation)
					.with_color(a),
			)
			.with_config(config)
			.finish(),
			Error::Lexical {
				error,
				location,
				expectation,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message(capitalize(&error.to_string()))
			.with_label(
				location
					.label()
					.with_message(expectation)
					.with_color(a),
			)
			.with_config(config)
			.finish(),
			Error::UnexpectedToken {
				location,
				expectation,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Unexpected token")
			.with_label(
				location
					.label()
					.with_message(expectation)
					.with_color(a),
			)
			.with_config(config)
			.finish(),
			Error::MaximumParseDepthExceeded { location } => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Maximum parse depth exceeded")
			.with_label(
				location
					.label()
					.with_message("nesting is too deep here")
					.with_color(a),
			)
			.with_config(config)
			.finish(),
		}
	}
}

fn capitalize(text: &str) -> String
{
	let mut chars = text.chars();
	match chars.next()
	{
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
