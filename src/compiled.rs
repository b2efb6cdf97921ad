//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! The result of compiling an expression: an inferred kind and, when it can
//! be determined statically, a concrete value.

use crate::common::Literal;

use serde::{Deserialize, Serialize};

#[must_use]
#[derive(Debug, Clone)]
pub enum CompiledValue
{
	Unknown,
	Null,
	Boolean(Option<bool>),
	Integer(Option<i64>),
	Float(Option<f64>),
	String(Option<String>),
	Array(Option<Vec<ArrayElement>>),
	Object(Option<String>),
	/// A variable that is known to exist but whose value is not.
	Variable(String),
	/// A named constant that is not resolved to a value.
	Constant(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind
{
	Unknown,
	Null,
	Boolean,
	Integer,
	Float,
	String,
	Array,
	Object,
	Variable,
	Constant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayElement
{
	pub key: ArrayKey,
	pub value: CompiledValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey
{
	Integer(i64),
	String(String),
}

impl CompiledValue
{
	pub fn kind(&self) -> Kind
	{
		match self
		{
			CompiledValue::Unknown => Kind::Unknown,
			CompiledValue::Null => Kind::Null,
			CompiledValue::Boolean(_) => Kind::Boolean,
			CompiledValue::Integer(_) => Kind::Integer,
			CompiledValue::Float(_) => Kind::Float,
			CompiledValue::String(_) => Kind::String,
			CompiledValue::Array(_) => Kind::Array,
			CompiledValue::Object(_) => Kind::Object,
			CompiledValue::Variable(_) => Kind::Variable,
			CompiledValue::Constant(_) => Kind::Constant,
		}
	}

	/// Whether the concrete value is statically known.
	pub fn has_value(&self) -> bool
	{
		match self
		{
			CompiledValue::Unknown => false,
			CompiledValue::Null => true,
			CompiledValue::Boolean(value) => value.is_some(),
			CompiledValue::Integer(value) => value.is_some(),
			CompiledValue::Float(value) => value.is_some(),
			CompiledValue::String(value) => value.is_some(),
			CompiledValue::Array(value) => value.is_some(),
			CompiledValue::Object(_) => false,
			CompiledValue::Variable(_) => false,
			CompiledValue::Constant(_) => false,
		}
	}

	/// The same kind with the value forgotten.
	pub fn without_value(&self) -> CompiledValue
	{
		match self
		{
			CompiledValue::Boolean(_) => CompiledValue::Boolean(None),
			CompiledValue::Integer(_) => CompiledValue::Integer(None),
			CompiledValue::Float(_) => CompiledValue::Float(None),
			CompiledValue::String(_) => CompiledValue::String(None),
			CompiledValue::Array(_) => CompiledValue::Array(None),
			other => other.clone(),
		}
	}

	pub fn as_str(&self) -> Option<&str>
	{
		match self
		{
			CompiledValue::String(Some(value)) => Some(value),
			_ => None,
		}
	}
}

impl From<&Literal> for CompiledValue
{
	fn from(literal: &Literal) -> CompiledValue
	{
		match literal
		{
			Literal::Integer(value) => CompiledValue::Integer(Some(*value)),
			Literal::Float(value) => CompiledValue::Float(Some(*value)),
			Literal::String(value) => CompiledValue::String(Some(value.clone())),
			Literal::Bool(value) => CompiledValue::Boolean(Some(*value)),
			Literal::Null => CompiledValue::Null,
		}
	}
}

impl PartialEq for CompiledValue
{
	fn eq(&self, other: &CompiledValue) -> bool
	{
		match (self, other)
		{
			(CompiledValue::Unknown, CompiledValue::Unknown) => true,
			(CompiledValue::Null, CompiledValue::Null) => true,
			(CompiledValue::Boolean(a), CompiledValue::Boolean(b)) => a == b,
			(CompiledValue::Integer(a), CompiledValue::Integer(b)) => a == b,
			(CompiledValue::Float(a), CompiledValue::Float(b)) =>
			{
				a.map(f64::to_bits) == b.map(f64::to_bits)
			}
			(CompiledValue::String(a), CompiledValue::String(b)) => a == b,
			(CompiledValue::Array(a), CompiledValue::Array(b)) => a == b,
			(CompiledValue::Object(a), CompiledValue::Object(b)) => a == b,
			(CompiledValue::Variable(a), CompiledValue::Variable(b)) => a == b,
			(CompiledValue::Constant(a), CompiledValue::Constant(b)) => a == b,
			_ => false,
		}
	}
}

impl std::fmt::Display for Kind
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		let name = match self
		{
			Kind::Unknown => "unknown",
			Kind::Null => "null",
			Kind::Boolean => "bool",
			Kind::Integer => "int",
			Kind::Float => "float",
			Kind::String => "string",
			Kind::Array => "array",
			Kind::Object => "object",
			Kind::Variable => "variable",
			Kind::Constant => "constant",
		};
		write!(f, "{}", name)
	}
}
