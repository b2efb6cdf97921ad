//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{Node, Pass, PassConfiguration};

use crate::common::*;
use crate::context::{Context, Severity};

use enumset::EnumSet;

pub struct MethodCannotReturn;

impl Pass for MethodCannotReturn
{
	fn name(&self) -> &'static str
	{
		"method_cannot_return"
	}

	fn registered_kinds(&self) -> EnumSet<NodeKind>
	{
		EnumSet::only(NodeKind::ClassMethod)
	}

	fn run(&mut self, node: Node, context: &mut Context) -> bool
	{
		let method = match node
		{
			Node::Method(method) => method,
			_ => return false,
		};
		let name = method.name.name.to_ascii_lowercase();
		if name != "__construct" && name != "__destruct"
		{
			return false;
		}
		let body = match &method.body
		{
			Some(body) => body,
			None => return false,
		};

		let mut locations = Vec::new();
		for statement in &body.statements
		{
			collect_valued_returns(statement, &mut locations);
		}
		let mut reported = false;
		for location in &locations
		{
			reported |= context.report(
				"return.construct",
				Severity::Notice,
				format!("Method {} cannot return a value.", method.name.name),
				location,
			);
		}
		reported
	}

	fn configuration(&self) -> Option<PassConfiguration>
	{
		Some(PassConfiguration::can_be_disabled())
	}
}

fn collect_valued_returns<'a>(
	statement: &'a Statement,
	locations: &mut Vec<&'a Location>,
)
{
	match statement
	{
		Statement::Return {
			value: Some(_),
			location,
		} => locations.push(location),
		Statement::If {
			then_branch,
			else_branch,
			..
		} =>
		{
			collect_valued_returns(then_branch, locations);
			if let Some(else_branch) = else_branch
			{
				collect_valued_returns(else_branch, locations);
			}
		}
		Statement::While { body, .. } => collect_valued_returns(body, locations),
		Statement::Block(block) =>
		{
			for statement in &block.statements
			{
				collect_valued_returns(statement, locations);
			}
		}
		// Nested declarations have their own return semantics.
		Statement::Function(_) | Statement::Class(_) => (),
		Statement::Return { value: None, .. }
		| Statement::Expression { .. }
		| Statement::Echo { .. }
		| Statement::InlineHtml { .. }
		| Statement::Constant { .. }
		| Statement::Invalid { .. } => (),
	}
}
