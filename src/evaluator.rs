//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! Abstract evaluation of statements and expressions.
//!
//! The evaluator walks the syntax tree depth-first, compiling each
//! expression to a [`CompiledValue`]. Before folding a node it hands the node
//! and the compiled values of its operands to the dispatcher, so that the
//! registered passes can inspect it.

use crate::common::*;
use crate::compiled::{ArrayElement, ArrayKey, CompiledValue};
use crate::context::{Context, Severity};
use crate::dispatcher::Dispatcher;
use crate::operators::{self, Hazard};

use std::collections::{HashMap, HashSet};

/// A structurally invalid node that aborts evaluation of the enclosing
/// top-level statement.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fatal
{
	pub message: String,
	pub location: Location,
}

type Scope = HashMap<String, CompiledValue>;

pub struct Evaluator<'a>
{
	dispatcher: &'a mut Dispatcher,
	context: &'a mut Context,
	scope: Scope,
	constants: HashMap<String, CompiledValue>,
}

impl<'a> Evaluator<'a>
{
	pub fn new(
		dispatcher: &'a mut Dispatcher,
		context: &'a mut Context,
	) -> Evaluator<'a>
	{
		Evaluator {
			dispatcher,
			context,
			scope: Scope::new(),
			constants: HashMap::new(),
		}
	}

	/// Evaluates every top-level statement. A statement that ends fatally
	/// has its issues replaced by a single fatal issue, after which
	/// evaluation continues with the next statement.
	pub fn run(&mut self, statements: &[Statement])
	{
		log::debug!("evaluating {} top-level statements", statements.len());
		for statement in statements
		{
			let checkpoint = self.context.checkpoint();
			match self.execute(statement)
			{
				Ok(()) => (),
				Err(Fatal { message, location }) =>
				{
					log::debug!("fatal {}: {}", location.format(), message);
					self.context.rollback(checkpoint);
					self.context.report(
						"compiler.fatal",
						Severity::Fatal,
						message,
						&location,
					);
				}
			}
		}
	}

	pub fn execute(&mut self, statement: &Statement) -> Result<(), Fatal>
	{
		match statement
		{
			Statement::Expression { expression, .. } =>
			{
				let value = self.evaluate(expression)?;
				self.hook_statement(statement, &[value]);
				Ok(())
			}
			Statement::Echo { expressions, .. } =>
			{
				let values = self.evaluate_all(expressions)?;
				self.hook_statement(statement, &values);
				Ok(())
			}
			Statement::Return { value, .. } =>
			{
				let values = match value
				{
					Some(value) => vec![self.evaluate(value)?],
					None => Vec::new(),
				};
				self.hook_statement(statement, &values);
				Ok(())
			}
			Statement::If {
				condition,
				then_branch,
				else_branch,
				..
			} =>
			{
				let value = self.evaluate(condition)?;
				self.hook_statement(statement, &[value]);

				let before = self.scope.clone();
				self.execute(then_branch)?;
				self.scope = before.clone();
				if let Some(else_branch) = else_branch
				{
					self.execute(else_branch)?;
					self.scope = before;
				}

				let mut assigned = HashSet::new();
				assigned_in_statement(then_branch, &mut assigned);
				if let Some(else_branch) = else_branch
				{
					assigned_in_statement(else_branch, &mut assigned);
				}
				self.forget(&assigned);
				Ok(())
			}
			Statement::While {
				condition, body, ..
			} =>
			{
				// The condition is also evaluated after any iteration.
				let mut assigned = HashSet::new();
				assigned_in_expression(condition, &mut assigned);
				assigned_in_statement(body, &mut assigned);
				self.forget(&assigned);

				let value = self.evaluate(condition)?;
				self.hook_statement(statement, &[value]);
				self.execute(body)?;
				self.forget(&assigned);
				Ok(())
			}
			Statement::Block(block) =>
			{
				self.hook_statement(statement, &[]);
				for statement in &block.statements
				{
					self.execute(statement)?;
				}
				Ok(())
			}
			Statement::InlineHtml { .. } =>
			{
				self.hook_statement(statement, &[]);
				Ok(())
			}
			Statement::Function(function) =>
			{
				self.hook_statement(statement, &[]);
				let scope = self.scope_with_parameters(&function.parameters)?;
				self.execute_body(scope, &function.body)
			}
			Statement::Class(class) =>
			{
				self.hook_statement(statement, &[]);
				for method in &class.methods
				{
					self.execute_method(class, method)?;
				}
				Ok(())
			}
			Statement::Constant { name, value, .. } =>
			{
				let value = self.evaluate(value)?;
				self.hook_statement(statement, &[value.clone()]);
				if value.has_value()
				{
					self.constants.insert(name.name.clone(), value);
				}
				Ok(())
			}
			Statement::Invalid { location } => Err(Fatal {
				message: "Invalid statement.".to_string(),
				location: location.clone(),
			}),
		}
	}

	fn execute_method(&mut self, class: &Class, method: &Method)
		-> Result<(), Fatal>
	{
		self.dispatcher.before_method(method, self.context);
		let body = match &method.body
		{
			Some(body) => body,
			None => return Ok(()),
		};
		let mut scope = self.scope_with_parameters(&method.parameters)?;
		if !method.flags.contains(MethodFlag::Static)
		{
			let this = CompiledValue::Object(Some(class.name.name.clone()));
			scope.insert("this".to_string(), this);
		}
		self.execute_body(scope, body)
	}

	fn scope_with_parameters(
		&mut self,
		parameters: &[Parameter],
	) -> Result<Scope, Fatal>
	{
		let mut scope = Scope::new();
		for parameter in parameters
		{
			if let Some(default) = &parameter.default
			{
				let _ = self.evaluate(default)?;
			}
			let value = CompiledValue::Variable(parameter.name.clone());
			scope.insert(parameter.name.clone(), value);
		}
		Ok(scope)
	}

	fn execute_body(&mut self, scope: Scope, body: &Block)
		-> Result<(), Fatal>
	{
		let outer = std::mem::replace(&mut self.scope, scope);
		let result = body
			.statements
			.iter()
			.try_for_each(|statement| self.execute(statement));
		self.scope = outer;
		result
	}

	fn forget(&mut self, names: &HashSet<String>)
	{
		for name in names
		{
			if let Some(value) = self.scope.get_mut(name)
			{
				*value = CompiledValue::Unknown;
			}
		}
	}

	pub fn evaluate(
		&mut self,
		expression: &Expression,
	) -> Result<CompiledValue, Fatal>
	{
		match expression
		{
			Expression::Literal { literal, .. } =>
			{
				self.hook_expression(expression, &[]);
				Ok(CompiledValue::from(literal))
			}
			Expression::Variable { name, .. } =>
			{
				self.hook_expression(expression, &[]);
				Ok(self.lookup_variable(name))
			}
			Expression::ConstantFetch { name, .. } =>
			{
				self.hook_expression(expression, &[]);
				Ok(self.lookup_constant(name))
			}
			Expression::Assignment {
				op,
				target,
				value,
				location,
			} =>
			{
				if !target.is_assignable()
				{
					return Err(Fatal {
						message: "Cannot assign to this expression."
							.to_string(),
						location: target.location().clone(),
					});
				}
				self.evaluate_target_operands(target)?;
				let value = self.evaluate(value)?;
				self.hook_expression(expression, &[value.clone()]);
				let result = match op
				{
					Some(op) =>
					{
						let current = self.read_target(target);
						let outcome = operators::binary(*op, &current, &value);
						self.report_hazard(outcome.hazard, location);
						outcome.value
					}
					None => value,
				};
				self.assign(target, &result)?;
				Ok(result)
			}
			Expression::Binary {
				op,
				left,
				right,
				location,
				..
			} =>
			{
				let left = self.evaluate(left)?;
				let right = self.evaluate(right)?;
				let operands = [left, right];
				self.hook_expression(expression, &operands);
				let [left, right] = operands;
				let outcome = operators::binary(*op, &left, &right);
				self.report_hazard(outcome.hazard, location);
				Ok(outcome.value)
			}
			Expression::Unary {
				op,
				expression: operand,
				..
			} =>
			{
				let operand = self.evaluate(operand)?;
				self.hook_expression(expression, std::slice::from_ref(&operand));
				Ok(operators::unary(*op, &operand))
			}
			Expression::Cast {
				cast_type,
				expression: operand,
				..
			} =>
			{
				let operand = self.evaluate(operand)?;
				self.hook_expression(expression, std::slice::from_ref(&operand));
				Ok(operators::cast(*cast_type, &operand))
			}
			Expression::Array { elements, .. } =>
			{
				let mut keys = Vec::with_capacity(elements.len());
				let mut values = Vec::with_capacity(elements.len());
				for element in elements
				{
					let key = match &element.key
					{
						Some(key) => Some(self.evaluate(key)?),
						None => None,
					};
					keys.push(key);
					values.push(self.evaluate(&element.value)?);
				}
				self.hook_expression(expression, &values);
				Ok(fold_array(keys, values))
			}
			Expression::FunctionCall { arguments, .. }
			| Expression::StaticCall { arguments, .. } =>
			{
				let arguments = self.evaluate_all(arguments)?;
				self.hook_expression(expression, &arguments);
				Ok(CompiledValue::Unknown)
			}
			Expression::MethodCall {
				object, arguments, ..
			} =>
			{
				let _ = self.evaluate(object)?;
				let arguments = self.evaluate_all(arguments)?;
				self.hook_expression(expression, &arguments);
				Ok(CompiledValue::Unknown)
			}
			Expression::New {
				class, arguments, ..
			} =>
			{
				let arguments = self.evaluate_all(arguments)?;
				self.hook_expression(expression, &arguments);
				let name = class.name.trim_start_matches('\\').to_string();
				Ok(CompiledValue::Object(Some(name)))
			}
			Expression::PropertyFetch { object, .. } =>
			{
				let object = self.evaluate(object)?;
				self.hook_expression(expression, std::slice::from_ref(&object));
				Ok(CompiledValue::Unknown)
			}
			Expression::ArrayAccess {
				array,
				index,
				location,
			} =>
			{
				let index = match index
				{
					Some(index) => index,
					None =>
					{
						return Err(Fatal {
							message: "Cannot use [] for reading.".to_string(),
							location: location.clone(),
						})
					}
				};
				let array = self.evaluate(array)?;
				let index = self.evaluate(index)?;
				let operands = [array, index];
				self.hook_expression(expression, &operands);
				Ok(fetch_element(&operands[0], &operands[1]))
			}
			Expression::InterpolatedString { .. } =>
			{
				self.hook_expression(expression, &[]);
				Ok(CompiledValue::String(None))
			}
			Expression::Invalid { location } => Err(Fatal {
				message: "Invalid expression.".to_string(),
				location: location.clone(),
			}),
		}
	}

	fn evaluate_all(
		&mut self,
		expressions: &[Expression],
	) -> Result<Vec<CompiledValue>, Fatal>
	{
		expressions.iter().map(|x| self.evaluate(x)).collect()
	}

	/// Evaluates the parts of an assignment target that are read, such as
	/// the object of a property or the index of an element.
	fn evaluate_target_operands(
		&mut self,
		target: &Expression,
	) -> Result<(), Fatal>
	{
		match target
		{
			Expression::PropertyFetch { object, .. } =>
			{
				let _ = self.evaluate(object)?;
			}
			Expression::ArrayAccess { array, index, .. } =>
			{
				self.evaluate_target_operands(array)?;
				if let Some(index) = index
				{
					let _ = self.evaluate(index)?;
				}
			}
			_ => (),
		}
		Ok(())
	}

	fn read_target(&self, target: &Expression) -> CompiledValue
	{
		match target
		{
			Expression::Variable { name, .. } => self.lookup_variable(name),
			_ => CompiledValue::Unknown,
		}
	}

	fn assign(
		&mut self,
		target: &Expression,
		value: &CompiledValue,
	) -> Result<(), Fatal>
	{
		match target
		{
			Expression::Variable { name, location } =>
			{
				if name == "this"
				{
					return Err(Fatal {
						message: "Cannot re-assign $this.".to_string(),
						location: location.clone(),
					});
				}
				self.scope.insert(name.clone(), value.clone());
			}
			Expression::ArrayAccess { array, .. } =>
			{
				// Writing an element changes the whole array.
				if let Some(name) = base_variable(array)
				{
					self.scope.insert(name.to_string(), CompiledValue::Unknown);
				}
			}
			_ => (),
		}
		Ok(())
	}

	fn lookup_variable(&self, name: &str) -> CompiledValue
	{
		match self.scope.get(name)
		{
			Some(value) => value.clone(),
			None => CompiledValue::Unknown,
		}
	}

	fn lookup_constant(&self, name: &str) -> CompiledValue
	{
		let name = name.trim_start_matches('\\');
		if let Some(value) = self.constants.get(name)
		{
			return value.clone();
		}
		match builtin_constant(name)
		{
			Some(value) => value,
			None => CompiledValue::Constant(name.to_string()),
		}
	}

	fn report_hazard(&mut self, hazard: Option<Hazard>, location: &Location)
	{
		let message = match hazard
		{
			Some(Hazard::DivisionByZero) => "Division by zero.",
			Some(Hazard::ModuloByZero) => "Modulo by zero.",
			None => return,
		};
		self.context
			.report("division.zero", Severity::Warning, message, location);
	}

	fn hook_expression(
		&mut self,
		expression: &Expression,
		operands: &[CompiledValue],
	)
	{
		self.dispatcher
			.before_expression(expression, operands, self.context);
	}

	fn hook_statement(
		&mut self,
		statement: &Statement,
		operands: &[CompiledValue],
	)
	{
		self.dispatcher
			.before_statement(statement, operands, self.context);
	}
}

fn builtin_constant(name: &str) -> Option<CompiledValue>
{
	let value = match name
	{
		"PHP_INT_MAX" => CompiledValue::Integer(Some(i64::MAX)),
		"PHP_INT_MIN" => CompiledValue::Integer(Some(i64::MIN)),
		"PHP_INT_SIZE" => CompiledValue::Integer(Some(8)),
		"PHP_FLOAT_EPSILON" => CompiledValue::Float(Some(f64::EPSILON)),
		"PHP_FLOAT_MAX" => CompiledValue::Float(Some(f64::MAX)),
		"PHP_FLOAT_MIN" => CompiledValue::Float(Some(f64::MIN_POSITIVE)),
		"PHP_EOL" => CompiledValue::String(Some("\n".to_string())),
		"DIRECTORY_SEPARATOR" => CompiledValue::String(Some("/".to_string())),
		"M_PI" => CompiledValue::Float(Some(std::f64::consts::PI)),
		"M_E" => CompiledValue::Float(Some(std::f64::consts::E)),
		"NAN" => CompiledValue::Float(Some(f64::NAN)),
		"INF" => CompiledValue::Float(Some(f64::INFINITY)),
		"E_ERROR" => CompiledValue::Integer(Some(1)),
		"E_WARNING" => CompiledValue::Integer(Some(2)),
		"E_NOTICE" => CompiledValue::Integer(Some(8)),
		"E_ALL" => CompiledValue::Integer(Some(32767)),
		_ => return None,
	};
	Some(value)
}

/// Folds an array literal, if every key and value is known.
fn fold_array(
	keys: Vec<Option<CompiledValue>>,
	values: Vec<CompiledValue>,
) -> CompiledValue
{
	let mut elements: Vec<ArrayElement> = Vec::with_capacity(values.len());
	// No next index remains once `PHP_INT_MAX` has been used as a key.
	let mut next_index: Option<i64> = Some(0);
	for (key, value) in keys.into_iter().zip(values)
	{
		if !value.has_value()
		{
			return CompiledValue::Unknown;
		}
		let key = match key
		{
			Some(key) => match operators::to_array_key(&key)
			{
				Some(key) => key,
				None => return CompiledValue::Unknown,
			},
			None => match next_index
			{
				Some(index) => ArrayKey::Integer(index),
				None => return CompiledValue::Unknown,
			},
		};
		if let ArrayKey::Integer(index) = key
		{
			if next_index.map_or(false, |next| index >= next)
			{
				next_index = index.checked_add(1);
			}
		}
		match elements.iter_mut().find(|element| element.key == key)
		{
			Some(element) => element.value = value,
			None => elements.push(ArrayElement { key, value }),
		}
	}
	CompiledValue::Array(Some(elements))
}

fn fetch_element(array: &CompiledValue, index: &CompiledValue)
	-> CompiledValue
{
	let elements = match array
	{
		CompiledValue::Array(Some(elements)) => elements,
		_ => return CompiledValue::Unknown,
	};
	let key = match operators::to_array_key(index)
	{
		Some(key) => key,
		None => return CompiledValue::Unknown,
	};
	match elements.iter().find(|element| element.key == key)
	{
		Some(element) => element.value.clone(),
		None => CompiledValue::Unknown,
	}
}

fn base_variable(expression: &Expression) -> Option<&str>
{
	match expression
	{
		Expression::Variable { name, .. } => Some(name),
		Expression::ArrayAccess { array, .. } => base_variable(array),
		_ => None,
	}
}

fn assigned_in_statement(statement: &Statement, names: &mut HashSet<String>)
{
	match statement
	{
		Statement::Expression { expression, .. } =>
		{
			assigned_in_expression(expression, names)
		}
		Statement::Echo { expressions, .. } =>
		{
			for expression in expressions
			{
				assigned_in_expression(expression, names);
			}
		}
		Statement::Return {
			value: Some(value), ..
		} => assigned_in_expression(value, names),
		Statement::If {
			condition,
			then_branch,
			else_branch,
			..
		} =>
		{
			assigned_in_expression(condition, names);
			assigned_in_statement(then_branch, names);
			if let Some(else_branch) = else_branch
			{
				assigned_in_statement(else_branch, names);
			}
		}
		Statement::While {
			condition, body, ..
		} =>
		{
			assigned_in_expression(condition, names);
			assigned_in_statement(body, names);
		}
		Statement::Block(block) =>
		{
			for statement in &block.statements
			{
				assigned_in_statement(statement, names);
			}
		}
		Statement::Constant { value, .. } => assigned_in_expression(value, names),
		// Declarations have scopes of their own.
		Statement::Function(_) | Statement::Class(_) => (),
		Statement::Return { value: None, .. }
		| Statement::InlineHtml { .. }
		| Statement::Invalid { .. } => (),
	}
}

fn assigned_in_expression(expression: &Expression, names: &mut HashSet<String>)
{
	match expression
	{
		Expression::Assignment { target, value, .. } =>
		{
			if let Some(name) = base_variable(target)
			{
				names.insert(name.to_string());
			}
			assigned_in_expression(target, names);
			assigned_in_expression(value, names);
		}
		Expression::Binary { left, right, .. } =>
		{
			assigned_in_expression(left, names);
			assigned_in_expression(right, names);
		}
		Expression::Unary { expression, .. }
		| Expression::Cast { expression, .. } =>
		{
			assigned_in_expression(expression, names)
		}
		Expression::Array { elements, .. } =>
		{
			for element in elements
			{
				if let Some(key) = &element.key
				{
					assigned_in_expression(key, names);
				}
				assigned_in_expression(&element.value, names);
			}
		}
		Expression::FunctionCall { arguments, .. }
		| Expression::StaticCall { arguments, .. }
		| Expression::New { arguments, .. } =>
		{
			for argument in arguments
			{
				assigned_in_expression(argument, names);
			}
		}
		Expression::MethodCall {
			object, arguments, ..
		} =>
		{
			assigned_in_expression(object, names);
			for argument in arguments
			{
				assigned_in_expression(argument, names);
			}
		}
		Expression::PropertyFetch { object, .. } =>
		{
			assigned_in_expression(object, names)
		}
		Expression::ArrayAccess { array, index, .. } =>
		{
			assigned_in_expression(array, names);
			if let Some(index) = index
			{
				assigned_in_expression(index, names);
			}
		}
		Expression::Literal { .. }
		| Expression::Variable { .. }
		| Expression::ConstantFetch { .. }
		| Expression::InterpolatedString { .. }
		| Expression::Invalid { .. } => (),
	}
}
