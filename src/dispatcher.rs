//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! Routes nodes to the passes registered for their exact kind.

use crate::analyzer::{Node, Pass};
use crate::common::*;
use crate::compiled::CompiledValue;
use crate::context::Context;

use std::collections::HashMap;

#[derive(Default)]
pub struct Dispatcher
{
	passes: Vec<Box<dyn Pass>>,
	routes: HashMap<NodeKind, Vec<usize>>,
}

impl Dispatcher
{
	pub fn new() -> Dispatcher
	{
		Dispatcher::default()
	}

	pub fn with_passes(passes: Vec<Box<dyn Pass>>) -> Dispatcher
	{
		let mut dispatcher = Dispatcher::new();
		for pass in passes
		{
			dispatcher.add(pass);
		}
		dispatcher
	}

	/// Registers a pass for every kind it declares.
	pub fn add(&mut self, pass: Box<dyn Pass>)
	{
		let kinds = pass.registered_kinds();
		let index = self.passes.len();
		self.passes.push(pass);
		for kind in kinds
		{
			self.routes.entry(kind).or_default().push(index);
		}
	}

	/// Registers a pass for a single kind, regardless of the kinds it
	/// declares.
	pub fn register(&mut self, kind: NodeKind, pass: Box<dyn Pass>)
	{
		let index = self.passes.len();
		self.passes.push(pass);
		self.routes.entry(kind).or_default().push(index);
	}

	pub fn is_empty(&self) -> bool
	{
		self.passes.is_empty()
	}

	/// Runs every pass registered for the kind of the node, in registration
	/// order. Returns true if any pass was registered for it.
	pub fn dispatch(&mut self, node: Node, context: &mut Context) -> bool
	{
		let indices = match self.routes.get(&node.kind())
		{
			Some(indices) => indices,
			None => return false,
		};
		for &index in indices
		{
			let pass = &mut self.passes[index];
			let reported = pass.run(node, context);
			log::trace!(
				"{} on {:?} {}: {}",
				pass.name(),
				node.kind(),
				node.location().format(),
				if reported { "reported" } else { "nothing" }
			);
		}
		true
	}

	pub fn before_expression(
		&mut self,
		expression: &Expression,
		operands: &[CompiledValue],
		context: &mut Context,
	) -> bool
	{
		let node = Node::Expression {
			expression,
			operands,
		};
		self.dispatch(node, context)
	}

	pub fn before_statement(
		&mut self,
		statement: &Statement,
		operands: &[CompiledValue],
		context: &mut Context,
	) -> bool
	{
		let node = Node::Statement {
			statement,
			operands,
		};
		self.dispatch(node, context)
	}

	pub fn before_method(&mut self, method: &Method, context: &mut Context)
		-> bool
	{
		self.dispatch(Node::Method(method), context)
	}
}
