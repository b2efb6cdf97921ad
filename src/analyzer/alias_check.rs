//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{function_name, Node, Pass, PassConfiguration};

use crate::common::*;
use crate::context::{Context, Severity};

use enumset::EnumSet;

const ALIASES: &[(&str, &str)] = &[
	("join", "implode"),
	("sizeof", "count"),
	("chop", "rtrim"),
	("close", "closedir"),
	("is_integer", "is_int"),
	("is_long", "is_int"),
	("is_double", "is_float"),
	("is_real", "is_float"),
	("doubleval", "floatval"),
	("key_exists", "array_key_exists"),
	("fputs", "fwrite"),
	("ini_alter", "ini_set"),
	("strchr", "strstr"),
	("pos", "current"),
	("show_source", "highlight_file"),
	("diskfreespace", "disk_free_space"),
	("is_writeable", "is_writable"),
	("set_file_buffer", "stream_set_write_buffer"),
];

/// Suggests the canonical name of functions that are only aliases.
pub struct AliasCheck;

impl Pass for AliasCheck
{
	fn name(&self) -> &'static str
	{
		"alias_check"
	}

	fn registered_kinds(&self) -> EnumSet<NodeKind>
	{
		EnumSet::only(NodeKind::FunctionCall)
	}

	fn run(&mut self, node: Node, context: &mut Context) -> bool
	{
		let (name, location) = match node
		{
			Node::Expression {
				expression: Expression::FunctionCall { name, location, .. },
				..
			} => (name, location),
			_ => return false,
		};
		let called = function_name(name);
		let canonical = match ALIASES.iter().find(|(alias, _)| *alias == called)
		{
			Some((_, canonical)) => canonical,
			None => return false,
		};
		context.report(
			"fcall.alias",
			Severity::Notice,
			format!(
				"{}() is an alias of function. Use {}(...).",
				called, canonical
			),
			location,
		)
	}

	fn configuration(&self) -> Option<PassConfiguration>
	{
		Some(PassConfiguration::can_be_disabled())
	}
}
