//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use phpsa::config;
use phpsa::config::Configuration;
use phpsa::context::Issue;
use phpsa::report;
use phpsa::stdout;
use phpsa::stdout::{StdOut, Summary};

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use anyhow::Context;
use clap::Parser;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[cfg(feature = "logging")]
use env_logger;

/// Above this many files the user is warned that the run may be slow.
const MANY_FILES: usize = 100;

#[derive(Debug, clap::Parser)]
#[clap(version, propagate_version = true)]
#[clap(args_conflicts_with_subcommands = true)]
struct Cli
{
	#[clap(subcommand)]
	sub: Option<Subcommand>,

	#[clap(flatten)]
	check: CheckArgs,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand
{
	/// Analyze a PHP file or every PHP file in a directory (default)
	Check(CheckArgs),
}

#[derive(Debug, clap::Args)]
struct CheckArgs
{
	/// A PHP file, or a directory to scan for PHP files
	#[clap(value_parser, default_value = ".")]
	path: PathBuf,

	/// Write every issue to this file as a JSON array
	#[clap(long, value_name("FILE"))]
	report_json: Option<PathBuf>,

	/// Load analyzer settings from this TOML file (default: '.phpsa.toml')
	#[clap(long, value_name("FILE"))]
	config: Option<PathBuf>,

	/// Look up who last changed the line of each issue
	#[clap(long)]
	blame: bool,

	#[clap(flatten)]
	output: stdout::Options,
}

fn main() -> Result<(), anyhow::Error>
{
	#[cfg(feature = "logging")]
	env_logger::init();

	let result = do_main();
	if result.is_err()
	{
		let mut stdout = StandardStream::stdout(ColorChoice::Auto);
		let colorspec_error = ColorSpec::new()
			.set_fg(Some(Color::Red))
			.set_bold(true)
			.to_owned();
		stdout.set_color(&colorspec_error)?;
		writeln!(stdout)?;
	}
	result
}

fn do_main() -> Result<(), anyhow::Error>
{
	let args = match Cli::parse()
	{
		Cli {
			sub: Some(Subcommand::Check(args)),
			check: _,
		} => args,
		Cli {
			sub: None,
			check: args,
		} => args,
	};
	let CheckArgs {
		path,
		report_json,
		config,
		blame,
		output,
	} = args;

	if !path.exists()
	{
		return Err(anyhow!("no such file or directory: '{}'", path.display()));
	}

	let mut configuration = load_configuration(&path, config)?;
	configuration.blame |= blame;
	if configuration.blame
	{
		log::debug!("blame lookup is not available, issues are unattributed");
	}

	let filepaths = collect_php_files(&path)?;
	log::debug!("found {} PHP files in {}", filepaths.len(), path.display());

	let mut stdout = StdOut::new(output);
	if filepaths.len() > MANY_FILES
	{
		stdout.caution(&format!(
			"Analyzing {} files, this may take a while.",
			filepaths.len()
		))?;
	}

	let mut summary = Summary::default();
	let mut all_issues: Vec<Issue> = Vec::new();
	for filepath in filepaths
	{
		let filename = filepath.to_string_lossy().to_string();
		stdout.header("Analyzing", &filename)?;
		let source = std::fs::read_to_string(&filepath)
			.with_context(|| format!("failed to read '{}'", filename))?;
		let sources = vec![(filename.clone(), source.clone())];
		summary.files += 1;
		match phpsa::analyze_source(&source, &filename, &configuration)
		{
			Ok(issues) =>
			{
				stdout.show_issues(&issues, ariadne::sources(sources))?;
				summary.issues += issues.len();
				summary.failures +=
					issues.iter().filter(|x| x.is_failure()).count();
				all_issues.extend(issues);
			}
			Err(errors) =>
			{
				summary.failed_files += 1;
				stdout.show_errors(errors, ariadne::sources(sources))?;
			}
		}
	}

	if let Some(report_path) = report_json
	{
		report::write_json(&report_path, &all_issues).with_context(|| {
			format!("failed to write '{}'", report_path.display())
		})?;
	}

	stdout.summary(&summary)?;
	if summary.is_success()
	{
		Ok(())
	}
	else
	{
		Err(anyhow!("analysis failed"))
	}
}

fn load_configuration(
	path: &Path,
	config: Option<PathBuf>,
) -> Result<Configuration, anyhow::Error>
{
	let filepath = match config
	{
		Some(filepath) => filepath,
		None =>
		{
			let directory = if path.is_dir()
			{
				path
			}
			else
			{
				path.parent().unwrap_or_else(|| Path::new("."))
			};
			let filepath = directory.join(config::DEFAULT_FILENAME);
			if !filepath.exists()
			{
				return Ok(Configuration::default());
			}
			filepath
		}
	};
	log::debug!("loading configuration from {}", filepath.display());
	Configuration::from_file(&filepath).with_context(|| {
		format!("failed to load '{}'", filepath.to_string_lossy())
	})
}

/// Every `.php` file at or below the path, sorted.
fn collect_php_files(path: &Path) -> Result<Vec<PathBuf>, anyhow::Error>
{
	if !path.is_dir()
	{
		return Ok(vec![path.to_path_buf()]);
	}

	let mut filepaths = Vec::new();
	let mut directories = vec![path.to_path_buf()];
	while let Some(directory) = directories.pop()
	{
		let entries = std::fs::read_dir(&directory).with_context(|| {
			format!("failed to read directory '{}'", directory.display())
		})?;
		for entry in entries
		{
			let entry_path = entry?.path();
			if entry_path.is_dir()
			{
				directories.push(entry_path);
			}
			else if entry_path.extension().map_or(false, |x| x == "php")
			{
				filepaths.push(entry_path);
			}
		}
	}
	filepaths.sort();
	Ok(filepaths)
}
