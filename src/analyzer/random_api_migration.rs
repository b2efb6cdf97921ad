//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{function_name, Node, Pass, PassConfiguration};

use crate::common::*;
use crate::context::{Context, Severity};

use enumset::EnumSet;

const REPLACEMENTS: &[(&str, &str)] = &[
	("rand", "mt_rand"),
	("srand", "mt_srand"),
	("getrandmax", "mt_getrandmax"),
];

pub struct RandomApiMigration;

impl Pass for RandomApiMigration
{
	fn name(&self) -> &'static str
	{
		"random_api_migration"
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
		let replacement =
			match REPLACEMENTS.iter().find(|(old, _)| *old == called)
			{
				Some((_, replacement)) => replacement,
				None => return false,
			};
		context.report(
			"rand.api.migration",
			Severity::Notice,
			format!(
				"Function {}() is not recommended, please use {}() instead.",
				called, replacement
			),
			location,
		)
	}

	fn configuration(&self) -> Option<PassConfiguration>
	{
		Some(PassConfiguration::can_be_disabled())
	}
}
