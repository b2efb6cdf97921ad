//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! Analyzer passes and the contract they fulfil.

mod alias_check;
mod array_short_definition;
mod constant_condition;
mod debug_code;
mod deprecated_ini_options;
mod method_cannot_return;
mod random_api_migration;
mod test_annotation;
mod use_cast;

pub use alias_check::AliasCheck;
pub use array_short_definition::ArrayShortDefinition;
pub use constant_condition::ConstantCondition;
pub use debug_code::DebugCode;
pub use deprecated_ini_options::DeprecatedIniOptions;
pub use method_cannot_return::MethodCannotReturn;
pub use random_api_migration::RandomApiMigration;
pub use test_annotation::TestAnnotation;
pub use use_cast::UseCast;

use crate::common::*;
use crate::compiled::CompiledValue;
use crate::config::Configuration;
use crate::context::Context;

use enumset::EnumSet;

/// A node handed to the passes registered for its kind, together with the
/// compiled values of its direct operands.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a>
{
	Expression
	{
		expression: &'a Expression,
		operands: &'a [CompiledValue],
	},
	Statement
	{
		statement: &'a Statement,
		operands: &'a [CompiledValue],
	},
	Method(&'a Method),
}

impl<'a> Node<'a>
{
	pub fn kind(&self) -> NodeKind
	{
		match self
		{
			Node::Expression { expression, .. } => expression.kind(),
			Node::Statement { statement, .. } => statement.kind(),
			Node::Method(_) => NodeKind::ClassMethod,
		}
	}

	pub fn location(&self) -> &'a Location
	{
		match self
		{
			Node::Expression { expression, .. } => expression.location(),
			Node::Statement { statement, .. } => statement.location(),
			Node::Method(method) => &method.location,
		}
	}
}

/// The options a pass accepts in its configuration section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassConfiguration
{
	pub can_be_disabled: bool,
	pub options: &'static [&'static str],
}

impl PassConfiguration
{
	pub fn can_be_disabled() -> PassConfiguration
	{
		PassConfiguration {
			can_be_disabled: true,
			options: &[],
		}
	}
}

pub trait Pass
{
	/// The key of this pass in the configuration file.
	fn name(&self) -> &'static str;

	fn registered_kinds(&self) -> EnumSet<NodeKind>;

	/// Inspects a node and reports issues into the context. Returns true if
	/// at least one issue was reported.
	fn run(&mut self, node: Node, context: &mut Context) -> bool;

	fn configuration(&self) -> Option<PassConfiguration>
	{
		None
	}
}

/// Every pass with its default options.
pub fn all() -> Vec<Box<dyn Pass>>
{
	from_configuration(&Configuration::default())
}

/// The enabled passes, in the order they are registered.
pub fn from_configuration(configuration: &Configuration) -> Vec<Box<dyn Pass>>
{
	let debug_functions = configuration.string_list("debug_code", "functions");
	let passes: Vec<Box<dyn Pass>> = vec![
		Box::new(AliasCheck),
		Box::new(DebugCode::new(debug_functions)),
		Box::new(RandomApiMigration),
		Box::new(UseCast),
		Box::new(DeprecatedIniOptions),
		Box::new(ArrayShortDefinition),
		Box::new(MethodCannotReturn),
		Box::new(TestAnnotation),
		Box::new(ConstantCondition),
	];
	passes
		.into_iter()
		.filter(|pass| configuration.is_enabled(pass.name()))
		.collect()
}

/// The name of a called function as PHP resolves it: case-insensitively
/// and without a leading namespace separator.
fn function_name(name: &Identifier) -> String
{
	name.name.trim_start_matches('\\').to_ascii_lowercase()
}
