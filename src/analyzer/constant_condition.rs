//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{Node, Pass};

use crate::common::*;
use crate::context::{Context, Severity};
use crate::operators;

use enumset::EnumSet;

/// Reports conditions whose truthiness is known without running the code.
pub struct ConstantCondition;

impl Pass for ConstantCondition
{
	fn name(&self) -> &'static str
	{
		"constant_condition"
	}

	fn registered_kinds(&self) -> EnumSet<NodeKind>
	{
		NodeKind::If | NodeKind::While
	}

	fn run(&mut self, node: Node, context: &mut Context) -> bool
	{
		let (statement, operands) = match node
		{
			Node::Statement {
				statement,
				operands,
			} => (statement, operands),
			_ => return false,
		};
		let condition = match statement
		{
			Statement::If { condition, .. } => condition,
			Statement::While { condition, .. } =>
			{
				if is_infinite_loop(condition)
				{
					return false;
				}
				condition
			}
			_ => return false,
		};
		let truthiness = match operands.first().and_then(operators::to_bool)
		{
			Some(truthiness) => truthiness,
			None => return false,
		};
		let message = if truthiness
		{
			"Condition is always true."
		}
		else
		{
			"Condition is always false."
		};
		context.report(
			"condition.constant",
			Severity::Notice,
			message,
			condition.location(),
		)
	}
}

/// `while (true)` and `while (1)` loop until something breaks out.
fn is_infinite_loop(condition: &Expression) -> bool
{
	match condition
	{
		Expression::Literal { literal, .. } =>
		{
			*literal == Literal::Bool(true) || *literal == Literal::Integer(1)
		}
		_ => false,
	}
}
