//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{function_name, Node, Pass, PassConfiguration};

use crate::common::*;
use crate::context::{Context, Severity};

use enumset::EnumSet;

const DEBUG_FUNCTIONS: &[&str] = &[
	"var_dump",
	"var_export",
	"debug_zval_dump",
	"debug_print_backtrace",
	"print_r",
];

/// Reports calls to functions that only belong in development code.
pub struct DebugCode
{
	functions: Vec<String>,
}

impl DebugCode
{
	pub fn new(extra_functions: Vec<String>) -> DebugCode
	{
		let mut functions: Vec<String> =
			DEBUG_FUNCTIONS.iter().map(|x| x.to_string()).collect();
		for name in extra_functions
		{
			let name = name.to_ascii_lowercase();
			if !functions.contains(&name)
			{
				functions.push(name);
			}
		}
		DebugCode { functions }
	}
}

impl Pass for DebugCode
{
	fn name(&self) -> &'static str
	{
		"debug_code"
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
		if !self.functions.contains(&called)
		{
			return false;
		}
		context.report(
			"debug.code",
			Severity::Notice,
			format!(
				"Function {}() is a debug function, please don't use it in \
				 production.",
				called
			),
			location,
		)
	}

	fn configuration(&self) -> Option<PassConfiguration>
	{
		Some(PassConfiguration {
			can_be_disabled: true,
			options: &["functions"],
		})
	}
}
