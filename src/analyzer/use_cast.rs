//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{function_name, Node, Pass, PassConfiguration};

use crate::common::*;
use crate::context::{Context, Severity};

use enumset::EnumSet;

const CASTS: &[(&str, &str)] = &[
	("intval", "int"),
	("floatval", "float"),
	("doubleval", "float"),
	("boolval", "bool"),
	("strval", "string"),
];

/// Suggests a cast instead of a single-argument conversion function.
pub struct UseCast;

impl Pass for UseCast
{
	fn name(&self) -> &'static str
	{
		"use_cast"
	}

	fn registered_kinds(&self) -> EnumSet<NodeKind>
	{
		EnumSet::only(NodeKind::FunctionCall)
	}

	fn run(&mut self, node: Node, context: &mut Context) -> bool
	{
		let (name, arguments, location) = match node
		{
			Node::Expression {
				expression:
					Expression::FunctionCall {
						name,
						arguments,
						location,
					},
				..
			} => (name, arguments, location),
			_ => return false,
		};
		// With a second argument, intval() takes a base.
		if arguments.len() != 1
		{
			return false;
		}
		let called = function_name(name);
		let cast = match CASTS.iter().find(|(function, _)| *function == called)
		{
			Some((_, cast)) => cast,
			None => return false,
		};
		context.report(
			"fcall.cast",
			Severity::Notice,
			format!(
				"Please use ({}) cast instead of function call {}().",
				cast, called
			),
			location,
		)
	}

	fn configuration(&self) -> Option<PassConfiguration>
	{
		Some(PassConfiguration::can_be_disabled())
	}
}
