//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! PHP's operator semantics on compiled values.
//!
//! Every function here is pure: it maps operands to a new compiled value
//! following PHP's implicit coercion rules. Operands whose kind is unknown
//! poison arithmetic; comparisons and logical operators always produce a
//! boolean kind and only carry a value when both sides do.

use crate::common::{BinaryOp, CastType, UnaryOp};
use crate::compiled::{ArrayElement, ArrayKey, CompiledValue, Kind};

use std::cmp::Ordering;

/// The number of significant digits PHP uses when converting a float to a
/// string (the `precision` ini setting).
const FLOAT_PRECISION: i32 = 14;

/// A runtime error that the operation would raise if it were executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard
{
	DivisionByZero,
	ModuloByZero,
}

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome
{
	pub value: CompiledValue,
	pub hazard: Option<Hazard>,
}

impl From<CompiledValue> for Outcome
{
	fn from(value: CompiledValue) -> Outcome
	{
		Outcome {
			value,
			hazard: None,
		}
	}
}

#[derive(Debug, Clone, Copy)]
enum Number
{
	Integer(i64),
	Float(f64),
}

impl Number
{
	fn as_float(self) -> f64
	{
		match self
		{
			Number::Integer(value) => value as f64,
			Number::Float(value) => value,
		}
	}

	fn as_integer(self) -> i64
	{
		match self
		{
			Number::Integer(value) => value,
			Number::Float(value) => float_to_integer(value),
		}
	}

	fn is_zero(self) -> bool
	{
		match self
		{
			Number::Integer(value) => value == 0,
			Number::Float(value) => value == 0.0,
		}
	}
}

impl From<Number> for CompiledValue
{
	fn from(number: Number) -> CompiledValue
	{
		match number
		{
			Number::Integer(value) => CompiledValue::Integer(Some(value)),
			Number::Float(value) => CompiledValue::Float(Some(value)),
		}
	}
}

pub fn binary(
	op: BinaryOp,
	left: &CompiledValue,
	right: &CompiledValue,
) -> Outcome
{
	match op
	{
		BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply =>
		{
			arithmetic(op, left, right).into()
		}
		BinaryOp::Divide => divide(left, right),
		BinaryOp::Modulo => modulo(left, right),
		BinaryOp::Power => power(left, right).into(),
		BinaryOp::Concat => concat(left, right).into(),
		BinaryOp::BitwiseAnd | BinaryOp::BitwiseOr | BinaryOp::BitwiseXor =>
		{
			bitwise(op, left, right).into()
		}
		BinaryOp::ShiftLeft | BinaryOp::ShiftRight =>
		{
			shift(op, left, right).into()
		}
		BinaryOp::BooleanAnd | BinaryOp::LogicalAnd =>
		{
			let value = match (to_bool(left), to_bool(right))
			{
				(Some(false), _) => Some(false),
				(Some(true), right) => right,
				(None, _) => None,
			};
			CompiledValue::Boolean(value).into()
		}
		BinaryOp::BooleanOr | BinaryOp::LogicalOr =>
		{
			let value = match (to_bool(left), to_bool(right))
			{
				(Some(true), _) => Some(true),
				(Some(false), right) => right,
				(None, _) => None,
			};
			CompiledValue::Boolean(value).into()
		}
		BinaryOp::LogicalXor =>
		{
			let value = match (to_bool(left), to_bool(right))
			{
				(Some(a), Some(b)) => Some(a != b),
				_ => None,
			};
			CompiledValue::Boolean(value).into()
		}
		BinaryOp::Equal
		| BinaryOp::NotEqual
		| BinaryOp::Identical
		| BinaryOp::NotIdentical
		| BinaryOp::Smaller
		| BinaryOp::SmallerOrEqual
		| BinaryOp::Greater
		| BinaryOp::GreaterOrEqual
		| BinaryOp::Spaceship => comparison(op, left, right).into(),
	}
}

pub fn unary(op: UnaryOp, operand: &CompiledValue) -> CompiledValue
{
	match op
	{
		UnaryOp::BooleanNot => CompiledValue::Boolean(to_bool(operand).map(|x| !x)),
		UnaryOp::Plus => match to_number(operand)
		{
			Some(number) => number.into(),
			None => infer_numeric(operand, operand),
		},
		UnaryOp::Minus => match to_number(operand)
		{
			Some(Number::Integer(value)) => match value.checked_neg()
			{
				Some(negated) => CompiledValue::Integer(Some(negated)),
				None => CompiledValue::Float(Some(-(value as f64))),
			},
			Some(Number::Float(value)) => CompiledValue::Float(Some(-value)),
			None => infer_numeric(operand, operand),
		},
		UnaryOp::BitwiseNot => match operand
		{
			CompiledValue::Integer(Some(value)) =>
			{
				CompiledValue::Integer(Some(!value))
			}
			CompiledValue::Float(Some(value)) =>
			{
				CompiledValue::Integer(Some(!float_to_integer(*value)))
			}
			CompiledValue::String(Some(value)) =>
			{
				let bytes: Vec<u8> = value.bytes().map(|x| !x).collect();
				CompiledValue::String(String::from_utf8(bytes).ok())
			}
			CompiledValue::Integer(None) | CompiledValue::Float(None) =>
			{
				CompiledValue::Integer(None)
			}
			CompiledValue::String(None) => CompiledValue::String(None),
			_ => CompiledValue::Unknown,
		},
	}
}

pub fn cast(cast_type: CastType, operand: &CompiledValue) -> CompiledValue
{
	if cast_type == CastType::Unset
	{
		return CompiledValue::Null;
	}
	if !operand.has_value()
	{
		return match cast_type
		{
			CastType::Int => CompiledValue::Integer(None),
			CastType::Float => CompiledValue::Float(None),
			CastType::String => CompiledValue::String(None),
			CastType::Bool => CompiledValue::Boolean(to_bool(operand)),
			CastType::Array => CompiledValue::Array(None),
			CastType::Object => CompiledValue::Object(None),
			CastType::Unset => CompiledValue::Null,
		};
	}
	match cast_type
	{
		CastType::Int => CompiledValue::Integer(to_integer(operand)),
		CastType::Float => CompiledValue::Float(to_float(operand)),
		CastType::String => CompiledValue::String(to_php_string(operand)),
		CastType::Bool => CompiledValue::Boolean(to_bool(operand)),
		CastType::Array => match operand
		{
			CompiledValue::Null => CompiledValue::Array(Some(Vec::new())),
			CompiledValue::Array(elements) => CompiledValue::Array(elements.clone()),
			scalar => CompiledValue::Array(Some(vec![ArrayElement {
				key: ArrayKey::Integer(0),
				value: scalar.clone(),
			}])),
		},
		CastType::Object => CompiledValue::Object(Some("stdClass".to_string())),
		CastType::Unset => CompiledValue::Null,
	}
}

/// PHP's truthiness of a value, if it is known.
pub fn to_bool(value: &CompiledValue) -> Option<bool>
{
	match value
	{
		CompiledValue::Null => Some(false),
		CompiledValue::Boolean(value) => *value,
		CompiledValue::Integer(value) => value.map(|x| x != 0),
		CompiledValue::Float(value) => value.map(|x| x != 0.0),
		CompiledValue::String(value) =>
		{
			value.as_ref().map(|x| !(x.is_empty() || x == "0"))
		}
		CompiledValue::Array(value) =>
		{
			value.as_ref().map(|elements| !elements.is_empty())
		}
		CompiledValue::Object(_) => Some(true),
		CompiledValue::Unknown => None,
		CompiledValue::Variable(_) => None,
		CompiledValue::Constant(_) => None,
	}
}

/// An explicit `(int)` conversion.
pub fn to_integer(value: &CompiledValue) -> Option<i64>
{
	match value
	{
		CompiledValue::Null => Some(0),
		CompiledValue::Boolean(value) => value.map(i64::from),
		CompiledValue::Integer(value) => *value,
		CompiledValue::Float(value) => value.map(float_to_integer),
		CompiledValue::String(value) => value
			.as_ref()
			.map(|x| numeric_prefix(x).map_or(0, Number::as_integer)),
		CompiledValue::Array(value) =>
		{
			value.as_ref().map(|elements| i64::from(!elements.is_empty()))
		}
		_ => None,
	}
}

/// An explicit `(float)` conversion.
pub fn to_float(value: &CompiledValue) -> Option<f64>
{
	match value
	{
		CompiledValue::Float(value) => *value,
		CompiledValue::String(value) => value
			.as_ref()
			.map(|x| numeric_prefix(x).map_or(0.0, Number::as_float)),
		other => to_integer(other).map(|x| x as f64),
	}
}

/// An explicit `(string)` conversion.
pub fn to_php_string(value: &CompiledValue) -> Option<String>
{
	match value
	{
		CompiledValue::Null => Some(String::new()),
		CompiledValue::Boolean(value) =>
		{
			value.map(|x| if x { "1".to_string() } else { String::new() })
		}
		CompiledValue::Integer(value) => value.map(|x| x.to_string()),
		CompiledValue::Float(value) => value.map(format_float),
		CompiledValue::String(value) => value.clone(),
		CompiledValue::Array(value) => value.as_ref().map(|_| "Array".to_string()),
		_ => None,
	}
}

/// Formats a float the way PHP's `echo` does, with 14 significant digits.
pub fn format_float(value: f64) -> String
{
	if value.is_nan()
	{
		return "NAN".to_string();
	}
	else if value.is_infinite()
	{
		return if value > 0.0 { "INF" } else { "-INF" }.to_string();
	}
	else if value == 0.0
	{
		return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
	}

	let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, value);
	let (mantissa, exponent) = match scientific.split_once('e')
	{
		Some(parts) => parts,
		None => return scientific,
	};
	let exponent: i32 = exponent.parse().unwrap_or(0);
	let sign = if value < 0.0 { "-" } else { "" };
	let digits: String = mantissa.chars().filter(|x| x.is_ascii_digit()).collect();
	let digits = digits.trim_end_matches('0');
	let digits = if digits.is_empty() { "0" } else { digits };
	let decimal_point = exponent + 1;

	if decimal_point < -3 || decimal_point > FLOAT_PRECISION
	{
		let (first, rest) = digits.split_at(1);
		let rest = if rest.is_empty() { "0" } else { rest };
		let exponent_sign = if exponent < 0 { "-" } else { "+" };
		format!(
			"{}{}.{}E{}{}",
			sign,
			first,
			rest,
			exponent_sign,
			exponent.abs()
		)
	}
	else if decimal_point <= 0
	{
		let zeroes = "0".repeat((-decimal_point) as usize);
		format!("{}0.{}{}", sign, zeroes, digits)
	}
	else
	{
		let decimal_point = decimal_point as usize;
		if digits.len() <= decimal_point
		{
			let zeroes = "0".repeat(decimal_point - digits.len());
			format!("{}{}{}", sign, digits, zeroes)
		}
		else
		{
			let (whole, fraction) = digits.split_at(decimal_point);
			format!("{}{}.{}", sign, whole, fraction)
		}
	}
}

/// Normalizes a value used as an array key, as PHP does.
pub fn to_array_key(value: &CompiledValue) -> Option<ArrayKey>
{
	match value
	{
		CompiledValue::Integer(Some(value)) => Some(ArrayKey::Integer(*value)),
		CompiledValue::String(Some(value)) => match canonical_integer(value)
		{
			Some(integer) => Some(ArrayKey::Integer(integer)),
			None => Some(ArrayKey::String(value.clone())),
		},
		CompiledValue::Boolean(Some(value)) =>
		{
			Some(ArrayKey::Integer(i64::from(*value)))
		}
		CompiledValue::Float(Some(value)) =>
		{
			Some(ArrayKey::Integer(float_to_integer(*value)))
		}
		CompiledValue::Null => Some(ArrayKey::String(String::new())),
		_ => None,
	}
}

/// Whether a string is a numeric string, as defined by `is_numeric()`.
pub fn is_numeric_string(value: &str) -> bool
{
	parse_numeric_string(value).is_some()
}

fn float_to_integer(value: f64) -> i64
{
	if !value.is_finite()
	{
		0
	}
	else if value >= -9.223372036854775808e18 && value < 9.223372036854775808e18
	{
		value.trunc() as i64
	}
	else
	{
		// Out of range floats wrap around modulo 2^64.
		let wrapped = value.trunc().rem_euclid(18446744073709551616.0);
		wrapped as u64 as i64
	}
}

fn canonical_integer(value: &str) -> Option<i64>
{
	let digits = value.strip_prefix('-').unwrap_or(value);
	let is_canonical = match digits.as_bytes()
	{
		[] => false,
		[b'0'] => digits.len() == value.len(),
		[b'0', ..] => false,
		bytes => bytes.iter().all(|x| x.is_ascii_digit()),
	};
	if is_canonical
	{
		value.parse().ok()
	}
	else
	{
		None
	}
}

/// Scans the longest numeric prefix of a string, returning the number and
/// the number of bytes it spans (including leading whitespace).
fn scan_number(value: &str) -> Option<(Number, usize)>
{
	let bytes = value.as_bytes();
	let is_digit = |i: usize| i < bytes.len() && bytes[i].is_ascii_digit();
	let mut i = 0;
	while i < bytes.len()
		&& matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
	{
		i += 1;
	}
	let start = i;
	if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-')
	{
		i += 1;
	}
	let integer_start = i;
	while is_digit(i)
	{
		i += 1;
	}
	let has_integer_digits = i > integer_start;
	let mut is_float = false;
	if i < bytes.len() && bytes[i] == b'.'
	{
		let mut j = i + 1;
		while is_digit(j)
		{
			j += 1;
		}
		if has_integer_digits || j > i + 1
		{
			i = j;
			is_float = true;
		}
	}
	if !has_integer_digits && !is_float
	{
		return None;
	}
	if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E')
	{
		let mut j = i + 1;
		if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-')
		{
			j += 1;
		}
		let exponent_start = j;
		while is_digit(j)
		{
			j += 1;
		}
		if j > exponent_start
		{
			i = j;
			is_float = true;
		}
	}
	let text = &value[start..i];
	let number = if is_float
	{
		Number::Float(text.parse().ok()?)
	}
	else
	{
		match text.parse()
		{
			Ok(integer) => Number::Integer(integer),
			Err(_) => Number::Float(text.parse().ok()?),
		}
	};
	Some((number, i))
}

fn parse_numeric_string(value: &str) -> Option<Number>
{
	match scan_number(value)
	{
		Some((number, len)) if len == value.len() => Some(number),
		_ => None,
	}
}

/// The leading numeric part of a string, as used by explicit conversions
/// and by comparisons between numbers and strings.
fn numeric_prefix(value: &str) -> Option<Number>
{
	scan_number(value).map(|(number, _)| number)
}

/// Implicit numeric conversion for arithmetic. Non-numeric strings, arrays
/// and values that are not known do not convert.
fn to_number(value: &CompiledValue) -> Option<Number>
{
	match value
	{
		CompiledValue::Null => Some(Number::Integer(0)),
		CompiledValue::Boolean(Some(value)) =>
		{
			Some(Number::Integer(i64::from(*value)))
		}
		CompiledValue::Integer(Some(value)) => Some(Number::Integer(*value)),
		CompiledValue::Float(Some(value)) => Some(Number::Float(*value)),
		CompiledValue::String(Some(value)) => parse_numeric_string(value),
		_ => None,
	}
}

fn is_numeric_kind(value: &CompiledValue) -> bool
{
	match value.kind()
	{
		Kind::Null | Kind::Boolean | Kind::Integer | Kind::Float => true,
		_ => false,
	}
}

/// The kind of an arithmetic result whose value cannot be computed: only a
/// float operand determines it, because integer arithmetic may overflow.
fn infer_numeric(left: &CompiledValue, right: &CompiledValue) -> CompiledValue
{
	let has_float =
		left.kind() == Kind::Float || right.kind() == Kind::Float;
	if has_float && is_numeric_kind(left) && is_numeric_kind(right)
	{
		CompiledValue::Float(None)
	}
	else
	{
		CompiledValue::Unknown
	}
}

fn arithmetic(
	op: BinaryOp,
	left: &CompiledValue,
	right: &CompiledValue,
) -> CompiledValue
{
	let (a, b) = match (to_number(left), to_number(right))
	{
		(Some(a), Some(b)) => (a, b),
		_ => return infer_numeric(left, right),
	};
	match (a, b)
	{
		(Number::Integer(a), Number::Integer(b)) =>
		{
			let result = match op
			{
				BinaryOp::Add => a.checked_add(b),
				BinaryOp::Subtract => a.checked_sub(b),
				BinaryOp::Multiply => a.checked_mul(b),
				_ => None,
			};
			match result
			{
				Some(value) => CompiledValue::Integer(Some(value)),
				None => float_arithmetic(op, a as f64, b as f64),
			}
		}
		(a, b) => float_arithmetic(op, a.as_float(), b.as_float()),
	}
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> CompiledValue
{
	let value = match op
	{
		BinaryOp::Add => a + b,
		BinaryOp::Subtract => a - b,
		BinaryOp::Multiply => a * b,
		BinaryOp::Divide => a / b,
		_ => return CompiledValue::Unknown,
	};
	CompiledValue::Float(Some(value))
}

fn divide(left: &CompiledValue, right: &CompiledValue) -> Outcome
{
	let divisor = match to_number(right)
	{
		Some(divisor) if divisor.is_zero() =>
		{
			return Outcome {
				value: CompiledValue::Unknown,
				hazard: Some(Hazard::DivisionByZero),
			};
		}
		Some(divisor) => divisor,
		None => return infer_numeric(left, right).into(),
	};
	let dividend = match to_number(left)
	{
		Some(dividend) => dividend,
		None => return infer_numeric(left, right).into(),
	};
	let value = match (dividend, divisor)
	{
		(Number::Integer(a), Number::Integer(b)) => match a.checked_rem(b)
		{
			Some(0) => match a.checked_div(b)
			{
				Some(quotient) => CompiledValue::Integer(Some(quotient)),
				None => CompiledValue::Float(Some(a as f64 / b as f64)),
			},
			_ => CompiledValue::Float(Some(a as f64 / b as f64)),
		},
		(a, b) => CompiledValue::Float(Some(a.as_float() / b.as_float())),
	};
	value.into()
}

fn modulo(left: &CompiledValue, right: &CompiledValue) -> Outcome
{
	let divisor = match to_number(right).map(Number::as_integer)
	{
		Some(0) =>
		{
			return Outcome {
				value: CompiledValue::Unknown,
				hazard: Some(Hazard::ModuloByZero),
			};
		}
		Some(divisor) => divisor,
		None => return integer_kind_of(left, right).into(),
	};
	match to_number(left).map(Number::as_integer)
	{
		Some(dividend) =>
		{
			// PHP_INT_MIN % -1 is 0 rather than an overflow.
			let value = dividend.checked_rem(divisor).unwrap_or(0);
			CompiledValue::Integer(Some(value)).into()
		}
		None => integer_kind_of(left, right).into(),
	}
}

fn integer_kind_of(left: &CompiledValue, right: &CompiledValue) -> CompiledValue
{
	if is_numeric_kind(left) && is_numeric_kind(right)
	{
		CompiledValue::Integer(None)
	}
	else
	{
		CompiledValue::Unknown
	}
}

fn power(left: &CompiledValue, right: &CompiledValue) -> CompiledValue
{
	let (base, exponent) = match (to_number(left), to_number(right))
	{
		(Some(a), Some(b)) => (a, b),
		_ => return infer_numeric(left, right),
	};
	match (base, exponent)
	{
		(Number::Integer(base), Number::Integer(exponent)) if exponent >= 0 =>
		{
			let result = u32::try_from(exponent)
				.ok()
				.and_then(|exponent| base.checked_pow(exponent));
			match result
			{
				Some(value) => CompiledValue::Integer(Some(value)),
				None => CompiledValue::Float(Some(
					(base as f64).powf(exponent as f64),
				)),
			}
		}
		(base, exponent) => CompiledValue::Float(Some(
			base.as_float().powf(exponent.as_float()),
		)),
	}
}

fn concat(left: &CompiledValue, right: &CompiledValue) -> CompiledValue
{
	if left.kind() == Kind::Unknown || right.kind() == Kind::Unknown
	{
		return CompiledValue::Unknown;
	}
	match (to_php_string(left), to_php_string(right))
	{
		(Some(a), Some(b)) => CompiledValue::String(Some(a + &b)),
		_ => CompiledValue::String(None),
	}
}

fn bitwise(
	op: BinaryOp,
	left: &CompiledValue,
	right: &CompiledValue,
) -> CompiledValue
{
	if let (CompiledValue::String(Some(a)), CompiledValue::String(Some(b))) =
		(left, right)
	{
		let (a, b) = (a.as_bytes(), b.as_bytes());
		let bytes: Vec<u8> = match op
		{
			BinaryOp::BitwiseAnd =>
			{
				a.iter().zip(b.iter()).map(|(x, y)| x & y).collect()
			}
			BinaryOp::BitwiseXor =>
			{
				a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
			}
			_ =>
			{
				let len = std::cmp::max(a.len(), b.len());
				(0..len)
					.map(|i| a.get(i).unwrap_or(&0) | b.get(i).unwrap_or(&0))
					.collect()
			}
		};
		return CompiledValue::String(String::from_utf8(bytes).ok());
	}
	match (to_number(left), to_number(right))
	{
		(Some(a), Some(b)) =>
		{
			let (a, b) = (a.as_integer(), b.as_integer());
			let value = match op
			{
				BinaryOp::BitwiseAnd => a & b,
				BinaryOp::BitwiseOr => a | b,
				_ => a ^ b,
			};
			CompiledValue::Integer(Some(value))
		}
		_ => integer_kind_of(left, right),
	}
}

fn shift(
	op: BinaryOp,
	left: &CompiledValue,
	right: &CompiledValue,
) -> CompiledValue
{
	let (a, b) = match (to_number(left), to_number(right))
	{
		(Some(a), Some(b)) => (a.as_integer(), b.as_integer()),
		_ => return integer_kind_of(left, right),
	};
	if b < 0
	{
		// Shifting by a negative amount throws at runtime.
		return CompiledValue::Unknown;
	}
	let value = match op
	{
		BinaryOp::ShiftLeft if b >= 64 => 0,
		BinaryOp::ShiftLeft => a.wrapping_shl(b as u32),
		_ if b >= 64 => if a < 0 { -1 } else { 0 },
		_ => a >> b,
	};
	CompiledValue::Integer(Some(value))
}

fn comparison(
	op: BinaryOp,
	left: &CompiledValue,
	right: &CompiledValue,
) -> CompiledValue
{
	let is_known = left.has_value() && right.has_value();
	if op == BinaryOp::Spaceship
	{
		if !is_known
		{
			return CompiledValue::Integer(None);
		}
		let value = match loose_compare(left, right)
		{
			Some(Ordering::Less) => -1,
			Some(Ordering::Equal) => 0,
			Some(Ordering::Greater) | None => 1,
		};
		return CompiledValue::Integer(Some(value));
	}
	if !is_known
	{
		return CompiledValue::Boolean(None);
	}
	let value = match op
	{
		BinaryOp::Identical => is_identical(left, right),
		BinaryOp::NotIdentical => !is_identical(left, right),
		BinaryOp::Equal => loose_compare(left, right) == Some(Ordering::Equal),
		BinaryOp::NotEqual =>
		{
			loose_compare(left, right) != Some(Ordering::Equal)
		}
		BinaryOp::Smaller => loose_compare(left, right) == Some(Ordering::Less),
		BinaryOp::SmallerOrEqual => matches!(
			loose_compare(left, right),
			Some(Ordering::Less) | Some(Ordering::Equal)
		),
		BinaryOp::Greater =>
		{
			loose_compare(left, right) == Some(Ordering::Greater)
		}
		BinaryOp::GreaterOrEqual => matches!(
			loose_compare(left, right),
			Some(Ordering::Greater) | Some(Ordering::Equal)
		),
		_ => return CompiledValue::Boolean(None),
	};
	CompiledValue::Boolean(Some(value))
}

/// Strict comparison (`===`) of two known values.
pub fn is_identical(left: &CompiledValue, right: &CompiledValue) -> bool
{
	match (left, right)
	{
		(CompiledValue::Null, CompiledValue::Null) => true,
		(CompiledValue::Boolean(Some(a)), CompiledValue::Boolean(Some(b))) =>
		{
			a == b
		}
		(CompiledValue::Integer(Some(a)), CompiledValue::Integer(Some(b))) =>
		{
			a == b
		}
		(CompiledValue::Float(Some(a)), CompiledValue::Float(Some(b))) =>
		{
			a == b
		}
		(CompiledValue::String(Some(a)), CompiledValue::String(Some(b))) =>
		{
			a == b
		}
		(CompiledValue::Array(Some(a)), CompiledValue::Array(Some(b))) =>
		{
			a.len() == b.len()
				&& a.iter().zip(b.iter()).all(|(x, y)| {
					x.key == y.key && is_identical(&x.value, &y.value)
				})
		}
		_ => false,
	}
}

/// Loose comparison of two known values following PHP 7's comparison
/// table. Returns `None` when the values are uncomparable.
pub fn loose_compare(
	left: &CompiledValue,
	right: &CompiledValue,
) -> Option<Ordering>
{
	use CompiledValue as V;

	match (left, right)
	{
		(V::Null, V::Null) => Some(Ordering::Equal),
		(V::Null, V::String(Some(b))) => Some("".cmp(b.as_str())),
		(V::String(Some(a)), V::Null) => Some(a.as_str().cmp("")),
		(V::Null, _) | (V::Boolean(_), _) | (_, V::Null) | (_, V::Boolean(_)) =>
		{
			let a = to_bool(left)?;
			let b = to_bool(right)?;
			Some(a.cmp(&b))
		}
		(V::String(Some(a)), V::String(Some(b))) =>
		{
			match (parse_numeric_string(a), parse_numeric_string(b))
			{
				(Some(x), Some(y)) => compare_numbers(x, y),
				_ => Some(a.as_bytes().cmp(b.as_bytes())),
			}
		}
		(V::String(Some(a)), _) =>
		{
			let b = to_number(right)?;
			compare_numbers(numeric_prefix(a).unwrap_or(Number::Integer(0)), b)
		}
		(_, V::String(Some(b))) =>
		{
			let a = to_number(left)?;
			compare_numbers(a, numeric_prefix(b).unwrap_or(Number::Integer(0)))
		}
		(V::Array(Some(a)), V::Array(Some(b))) => compare_arrays(a, b),
		(V::Array(Some(_)), _) => Some(Ordering::Greater),
		(_, V::Array(Some(_))) => Some(Ordering::Less),
		_ =>
		{
			let a = to_number(left)?;
			let b = to_number(right)?;
			compare_numbers(a, b)
		}
	}
}

fn compare_numbers(a: Number, b: Number) -> Option<Ordering>
{
	match (a, b)
	{
		(Number::Integer(a), Number::Integer(b)) => Some(a.cmp(&b)),
		(a, b) => a.as_float().partial_cmp(&b.as_float()),
	}
}

fn compare_arrays(a: &[ArrayElement], b: &[ArrayElement]) -> Option<Ordering>
{
	if a.len() != b.len()
	{
		return Some(a.len().cmp(&b.len()));
	}
	for element in a
	{
		let other = b.iter().find(|x| x.key == element.key)?;
		match loose_compare(&element.value, &other.value)?
		{
			Ordering::Equal => (),
			ordering => return Some(ordering),
		}
	}
	Some(Ordering::Equal)
}

#[cfg(test)]
mod tests
{
	use super::*;

	use pretty_assertions::assert_eq;

	#[test]
	fn format_floats_like_echo()
	{
		assert_eq!(format_float(0.1 + 0.2), "0.3");
		assert_eq!(format_float(1.5), "1.5");
		assert_eq!(format_float(-1.25), "-1.25");
		assert_eq!(format_float(2.0), "2");
		assert_eq!(format_float(1e13), "10000000000000");
		assert_eq!(format_float(1e15), "1.0E+15");
		assert_eq!(format_float(1.5e20), "1.5E+20");
		assert_eq!(format_float(0.0001), "0.0001");
		assert_eq!(format_float(0.00001), "1.0E-5");
		assert_eq!(format_float(-0.0), "-0");
		assert_eq!(format_float(f64::INFINITY), "INF");
		assert_eq!(format_float(f64::NAN), "NAN");
	}

	#[test]
	fn recognize_numeric_strings()
	{
		assert!(is_numeric_string("12"));
		assert!(is_numeric_string(" 12"));
		assert!(is_numeric_string("-1.5e3"));
		assert!(is_numeric_string(".5"));
		assert!(!is_numeric_string("12abc"));
		assert!(!is_numeric_string("abc"));
		assert!(!is_numeric_string(""));
		assert!(!is_numeric_string("."));
		assert!(!is_numeric_string("1e"));
	}

	#[test]
	fn normalize_array_keys()
	{
		let key = |value: CompiledValue| to_array_key(&value);
		assert_eq!(
			key(CompiledValue::String(Some("8".to_string()))),
			Some(ArrayKey::Integer(8))
		);
		assert_eq!(
			key(CompiledValue::String(Some("08".to_string()))),
			Some(ArrayKey::String("08".to_string()))
		);
		assert_eq!(
			key(CompiledValue::String(Some("-0".to_string()))),
			Some(ArrayKey::String("-0".to_string()))
		);
		assert_eq!(
			key(CompiledValue::Boolean(Some(true))),
			Some(ArrayKey::Integer(1))
		);
		assert_eq!(
			key(CompiledValue::Float(Some(1.7))),
			Some(ArrayKey::Integer(1))
		);
		assert_eq!(key(CompiledValue::Null), Some(ArrayKey::String("".into())));
		assert_eq!(key(CompiledValue::Unknown), None);
	}

	#[test]
	fn wrap_out_of_range_floats()
	{
		assert_eq!(float_to_integer(1e19), -8446744073709551616);
		assert_eq!(float_to_integer(-1.9), -1);
		assert_eq!(float_to_integer(f64::NAN), 0);
	}
}
