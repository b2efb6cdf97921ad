//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! Minimal parsing of `/** ... */` documentation blocks.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag
{
	pub name: String,
	pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock
{
	pub summary: String,
	pub tags: Vec<Tag>,
}

impl DocBlock
{
	pub fn parse(text: &str) -> DocBlock
	{
		let inner = text.trim();
		let inner = inner.strip_prefix("/**").unwrap_or(inner);
		let inner = inner.strip_suffix("*/").unwrap_or(inner);

		let mut summary_lines = Vec::new();
		let mut tags: Vec<Tag> = Vec::new();
		let mut is_summary_done = false;
		for line in inner.lines()
		{
			let line = line.trim_start();
			let line = line.strip_prefix('*').unwrap_or(line).trim();
			if let Some(rest) = line.strip_prefix('@')
			{
				is_summary_done = true;
				let end = rest
					.find(|x: char| x.is_whitespace() || x == '(')
					.unwrap_or(rest.len());
				let (name, body) = rest.split_at(end);
				if !name.is_empty()
				{
					tags.push(Tag {
						name: name.to_string(),
						body: body.trim().to_string(),
					});
				}
			}
			else if let Some(tag) = tags.last_mut()
			{
				// Continuation of a multiline tag.
				if !line.is_empty()
				{
					if !tag.body.is_empty()
					{
						tag.body.push(' ');
					}
					tag.body.push_str(line);
				}
			}
			else if line.is_empty()
			{
				is_summary_done |= !summary_lines.is_empty();
			}
			else if !is_summary_done
			{
				summary_lines.push(line);
			}
		}

		DocBlock {
			summary: summary_lines.join(" "),
			tags,
		}
	}

	pub fn has_tag(&self, name: &str) -> bool
	{
		self.tags.iter().any(|tag| tag.name == name)
	}
}
