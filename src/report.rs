//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! Machine readable issue reports.

use crate::context::Issue;

pub fn to_json(issues: &[Issue]) -> Result<String, serde_json::Error>
{
	serde_json::to_string_pretty(issues)
}

pub fn from_json(raw: &str) -> Result<Vec<Issue>, serde_json::Error>
{
	serde_json::from_str(raw)
}

pub fn write_json(
	path: &std::path::Path,
	issues: &[Issue],
) -> Result<(), anyhow::Error>
{
	let json = to_json(issues)?;
	std::fs::write(path, json)?;
	log::debug!("wrote {} issues to {}", issues.len(), path.display());
	Ok(())
}
