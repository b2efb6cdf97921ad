//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! The diagnostics sink of a single analysis run.

pub use crate::lexer::Location;

use ariadne::{Report, ReportKind};
use serde::{Deserialize, Serialize};

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity
{
	Notice,
	Warning,
	Error,
	Fatal,
}

impl std::fmt::Display for Severity
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		let name = match self
		{
			Severity::Notice => "notice",
			Severity::Warning => "warning",
			Severity::Error => "error",
			Severity::Fatal => "fatal",
		};
		write!(f, "{}", name)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue
{
	pub code: String,
	pub severity: Severity,
	pub message: String,
	pub location: Location,
}

impl Issue
{
	pub fn is_failure(&self) -> bool
	{
		self.severity >= Severity::Error
	}

	pub fn report(
		&self,
		config: ariadne::Config,
	) -> Report<(String, std::ops::Range<usize>)>
	{
		let mut colors = ariadne::ColorGenerator::new();
		let a = colors.next();

		let kind = match self.severity
		{
			Severity::Notice => ReportKind::Advice,
			Severity::Warning => ReportKind::Warning,
			Severity::Error | Severity::Fatal => ReportKind::Error,
		};
		Report::build(
			kind,
			&self.location.source_filename,
			self.location.span.start,
		)
		.with_code(&self.code)
		.with_message(&self.message)
		.with_label(self.location.label().with_color(a))
		.with_config(config)
		.finish()
	}
}

/// A position in the list of issues that can be rolled back to.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint(usize);

#[derive(Debug, Default)]
pub struct Context
{
	issues: Vec<Issue>,
}

impl Context
{
	pub fn new() -> Context
	{
		Context::default()
	}

	/// Records an issue, unless an issue with the same code was already
	/// reported at the same location. Returns whether it was recorded.
	pub fn report(
		&mut self,
		code: &str,
		severity: Severity,
		message: impl Into<String>,
		location: &Location,
	) -> bool
	{
		let is_duplicate = self
			.issues
			.iter()
			.any(|issue| issue.code == code && &issue.location == location);
		if is_duplicate
		{
			log::trace!("dropping duplicate {} {}", code, location.format());
			return false;
		}
		self.issues.push(Issue {
			code: code.to_string(),
			severity,
			message: message.into(),
			location: location.clone(),
		});
		true
	}

	pub fn issues(&self) -> &[Issue]
	{
		&self.issues
	}

	pub fn into_issues(self) -> Vec<Issue>
	{
		self.issues
	}

	pub fn checkpoint(&self) -> Checkpoint
	{
		Checkpoint(self.issues.len())
	}

	/// Discards every issue reported since the checkpoint was taken.
	pub fn rollback(&mut self, checkpoint: Checkpoint)
	{
		self.issues.truncate(checkpoint.0);
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	use pretty_assertions::assert_eq;

	fn location(start: usize) -> Location
	{
		Location {
			source_filename: "test.php".to_string(),
			span: start..start + 1,
			line_start: 1,
			line_end: 1,
		}
	}

	#[test]
	fn deduplicate_issues_per_location()
	{
		let mut context = Context::new();
		assert!(context.report("a.b", Severity::Notice, "x", &location(3)));
		assert!(!context.report("a.b", Severity::Notice, "x", &location(3)));
		assert!(context.report("a.b", Severity::Notice, "x", &location(4)));
		assert!(context.report("a.c", Severity::Notice, "x", &location(3)));
		assert_eq!(context.issues().len(), 3);
	}

	#[test]
	fn rollback_to_checkpoint()
	{
		let mut context = Context::new();
		context.report("a.b", Severity::Notice, "x", &location(1));
		let checkpoint = context.checkpoint();
		context.report("a.b", Severity::Warning, "y", &location(2));
		context.report("a.c", Severity::Warning, "z", &location(3));
		context.rollback(checkpoint);
		assert_eq!(context.issues().len(), 1);
		assert_eq!(context.issues()[0].location, location(1));
	}
}
