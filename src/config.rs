//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! Analyzer settings loaded from a TOML file.

use crate::analyzer;

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_FILENAME: &str = ".phpsa.toml";

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration
{
	/// Whether to look up the author of each issue.
	pub blame: bool,
	pub analyzers: BTreeMap<String, AnalyzerSettings>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AnalyzerSettings
{
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(flatten)]
	pub options: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Error)]
pub enum Error
{
	#[error("failed to read configuration: {0}")]
	Io(#[from] std::io::Error),
	#[error("failed to parse configuration: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("unknown analyzer '{name}', expected one of: {known}")]
	UnknownAnalyzer
	{
		name: String, known: String
	},
	#[error("analyzer '{0}' cannot be disabled")]
	CannotBeDisabled(String),
	#[error("analyzer '{name}' has no option '{option}'")]
	UnknownOption
	{
		name: String, option: String
	},
	#[error("option '{option}' of analyzer '{name}' must be a list of strings")]
	InvalidOption
	{
		name: String, option: String
	},
}

impl std::str::FromStr for Configuration
{
	type Err = Error;

	fn from_str(raw: &str) -> Result<Configuration, Error>
	{
		let configuration: Configuration = toml::from_str(raw)?;
		configuration.validate()?;
		Ok(configuration)
	}
}

impl Configuration
{
	pub fn from_file(path: &std::path::Path) -> Result<Configuration, Error>
	{
		let raw = std::fs::read_to_string(path)?;
		raw.parse()
	}

	/// Checks every section against the passes that exist.
	pub fn validate(&self) -> Result<(), Error>
	{
		let passes = analyzer::all();
		for (name, settings) in &self.analyzers
		{
			let found = passes.iter().find(|pass| pass.name() == name.as_str());
			let pass = match found
			{
				Some(pass) => pass,
				None =>
				{
					let known: Vec<&str> =
						passes.iter().map(|pass| pass.name()).collect();
					return Err(Error::UnknownAnalyzer {
						name: name.clone(),
						known: known.join(", "),
					});
				}
			};
			let declared = pass.configuration();
			let can_be_disabled = match &declared
			{
				Some(declared) => declared.can_be_disabled,
				None => false,
			};
			if settings.enabled == Some(false) && !can_be_disabled
			{
				return Err(Error::CannotBeDisabled(name.clone()));
			}
			let options = match &declared
			{
				Some(declared) => declared.options,
				None => &[],
			};
			for (option, value) in &settings.options
			{
				if !options.contains(&option.as_str())
				{
					return Err(Error::UnknownOption {
						name: name.clone(),
						option: option.clone(),
					});
				}
				if as_string_list(value).is_none()
				{
					return Err(Error::InvalidOption {
						name: name.clone(),
						option: option.clone(),
					});
				}
			}
		}
		Ok(())
	}

	pub fn is_enabled(&self, name: &str) -> bool
	{
		self.analyzers
			.get(name)
			.and_then(|settings| settings.enabled)
			.unwrap_or(true)
	}

	/// The strings configured for an option, or nothing if it is unset.
	pub fn string_list(&self, name: &str, option: &str) -> Vec<String>
	{
		self.analyzers
			.get(name)
			.and_then(|settings| settings.options.get(option))
			.and_then(as_string_list)
			.unwrap_or_default()
	}
}

fn as_string_list(value: &toml::Value) -> Option<Vec<String>>
{
	value
		.as_array()?
		.iter()
		.map(|x| x.as_str().map(|x| x.to_string()))
		.collect()
}
