//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! The command line interface prints issues and parse errors as annotated
//! source excerpts, and progress when run with the _verbose_ flag.

use crate::context::{Issue, Severity};
use crate::error::Errors;

use std::io::Write;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Default, clap::Args)]
pub struct Options
{
	/// Show which files are being analyzed
	#[clap(short, long)]
	verbose: bool,

	/// When to use ANSI colors in issue reports
	#[clap(long, value_name("WHEN"))]
	#[clap(value_enum, default_value_t=ColorChoice::Auto)]
	color: ColorChoice,

	/// Which character set to use to draw the arrows in issue reports
	#[clap(long, value_name("CHARSET"))]
	#[clap(value_enum, default_value_t=CharSet::Unicode)]
	arrows: CharSet,
}

#[derive(Debug, Default, Clone, Copy, clap::ValueEnum)]
pub enum ColorChoice
{
	#[default]
	Auto,
	Always,
	Never,
}

impl From<ColorChoice> for termcolor::ColorChoice
{
	fn from(choice: ColorChoice) -> termcolor::ColorChoice
	{
		match choice
		{
			ColorChoice::Auto => termcolor::ColorChoice::Auto,
			ColorChoice::Always => termcolor::ColorChoice::Always,
			ColorChoice::Never => termcolor::ColorChoice::Never,
		}
	}
}

#[derive(Debug, Default, Clone, Copy, clap::ValueEnum)]
pub enum CharSet
{
	#[default]
	Unicode,
	Ascii,
}

impl From<CharSet> for ariadne::CharSet
{
	fn from(choice: CharSet) -> ariadne::CharSet
	{
		match choice
		{
			CharSet::Unicode => ariadne::CharSet::Unicode,
			CharSet::Ascii => ariadne::CharSet::Ascii,
		}
	}
}

/// Totals shown after every file has been analyzed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Summary
{
	pub files: usize,
	pub failed_files: usize,
	pub issues: usize,
	pub failures: usize,
}

impl Summary
{
	pub fn is_success(&self) -> bool
	{
		self.failed_files == 0 && self.failures == 0
	}
}

pub struct StdOut
{
	stdout: StandardStream,
	is_verbose: bool,
	report_config: ariadne::Config,
}

impl StdOut
{
	pub fn new(options: Options) -> StdOut
	{
		let stdout = StandardStream::stdout(options.color.into());
		let is_verbose = options.verbose;
		let with_color = match options.color
		{
			ColorChoice::Auto => stdout.supports_color(),
			ColorChoice::Always => true,
			ColorChoice::Never => false,
		};
		let report_config = ariadne::Config::default()
			.with_color(with_color)
			.with_char_set(options.arrows.into());
		StdOut {
			stdout,
			is_verbose,
			report_config,
		}
	}

	pub fn header(
		&mut self,
		preamble: &str,
		filename: &str,
	) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			let colorspec_header = ColorSpec::new();
			self.stdout.set_color(&colorspec_header)?;
			writeln!(self.stdout, "{} {}...", preamble, filename)?;
		}
		Ok(())
	}

	pub fn caution(&mut self, text: &str) -> Result<(), std::io::Error>
	{
		let colorspec_warning = ColorSpec::new()
			.set_fg(Some(Color::Yellow))
			.set_bold(true)
			.to_owned();
		self.stdout.set_color(&colorspec_warning)?;
		writeln!(self.stdout, "{}", text)?;
		self.stdout.reset()?;
		Ok(())
	}

	pub fn show_issues(
		&mut self,
		issues: &[Issue],
		mut source_cache: impl ariadne::Cache<String>,
	) -> Result<(), std::io::Error>
	{
		for issue in issues
		{
			self.stdout.reset()?;
			let report = issue.report(self.report_config);
			report.write(&mut source_cache, &mut self.stdout)?;
		}
		Ok(())
	}

	pub fn show_errors(
		&mut self,
		errors: Errors,
		mut source_cache: impl ariadne::Cache<String>,
	) -> Result<(), std::io::Error>
	{
		for error in errors
		{
			self.stdout.reset()?;
			let report = error.report(self.report_config);
			report.write(&mut source_cache, &mut self.stdout)?;
		}
		Ok(())
	}

	pub fn summary(&mut self, summary: &Summary) -> Result<(), std::io::Error>
	{
		let colorspec = if summary.is_success()
		{
			ColorSpec::new().set_fg(Some(Color::Green)).to_owned()
		}
		else
		{
			ColorSpec::new()
				.set_fg(Some(Color::Red))
				.set_bold(true)
				.to_owned()
		};
		writeln!(self.stdout)?;
		self.stdout.set_color(&colorspec)?;
		write!(
			self.stdout,
			"Checked {} file(s): {} issue(s)",
			summary.files, summary.issues
		)?;
		if summary.failures > 0
		{
			write!(
				self.stdout,
				", {} at {} or above",
				summary.failures,
				Severity::Error
			)?;
		}
		if summary.failed_files > 0
		{
			write!(
				self.stdout,
				", {} file(s) could not be parsed",
				summary.failed_files
			)?;
		}
		writeln!(self.stdout, ".")?;
		self.stdout.reset()?;
		Ok(())
	}
}
