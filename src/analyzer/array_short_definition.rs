//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{Node, Pass, PassConfiguration};

use crate::common::*;
use crate::context::{Context, Severity};

use enumset::EnumSet;

pub struct ArrayShortDefinition;

impl Pass for ArrayShortDefinition
{
	fn name(&self) -> &'static str
	{
		"array_short_definition"
	}

	fn registered_kinds(&self) -> EnumSet<NodeKind>
	{
		EnumSet::only(NodeKind::Array)
	}

	fn run(&mut self, node: Node, context: &mut Context) -> bool
	{
		match node
		{
			Node::Expression {
				expression:
					Expression::Array {
						syntax: ArraySyntax::Long,
						location,
						..
					},
				..
			} =>
			{
				context.report(
					"array.short-syntax",
					Severity::Notice,
					"Please use [] (short syntax) for array definition.",
					location,
				)
			}
			_ => false,
		}
	}

	fn configuration(&self) -> Option<PassConfiguration>
	{
		Some(PassConfiguration::can_be_disabled())
	}
}
