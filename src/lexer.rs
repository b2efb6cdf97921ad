//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! The lexer cuts PHP source text into tokens with source locations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token
{
	OpenTag,
	CloseTag,
	InlineHtml(String),
	DocComment(String),

	// Punctuation.
	ParenLeft,
	ParenRight,
	BraceLeft,
	BraceRight,
	BracketLeft,
	BracketRight,
	Comma,
	Semicolon,
	Colon,
	DoubleColon,
	Arrow,       // ->
	DoubleArrow, // =>
	Question,

	// Operators.
	Plus,
	Minus,
	Times,
	Divide,
	Modulo,
	Power,
	Dot,
	Ampersand,
	Pipe,
	Caret,
	Tilde,
	ShiftLeft,
	ShiftRight,
	Exclamation,
	DoubleAmpersand,
	DoublePipe,
	Assignment,
	PlusAssign,
	MinusAssign,
	TimesAssign,
	DivideAssign,
	ModuloAssign,
	DotAssign,
	Equals,
	Identical,
	NotEquals,
	NotIdentical,
	Less,
	LessEquals,
	Greater,
	GreaterEquals,
	Spaceship,
	Cast(CastType),

	// Keywords.
	Function,
	Class,
	Abstract,
	Final,
	Extends,
	Public,
	Protected,
	Private,
	Static,
	Var,
	Return,
	If,
	Elseif,
	Else,
	While,
	Echo,
	New,
	Const,
	And,
	Or,
	Xor,

	// Literals.
	Variable(String),
	Identifier(String),
	Integer(i64),
	Float(f64),
	Bool(bool),
	Null,
	StringLiteral
	{
		value: String,
		is_interpolated: bool,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastType
{
	Int,
	Float,
	String,
	Bool,
	Array,
	Object,
	Unset,
}

#[derive(Debug, Clone)]
pub struct LexedToken
{
	pub result: Result<Token, Error>,
	pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location
{
	pub source_filename: String,
	pub span: std::ops::Range<usize>,
	pub line_start: usize,
	pub line_end: usize,
}

impl Location
{
	pub fn combined_with(self, other: &Location) -> Location
	{
		if self.source_filename != other.source_filename
		{
			return self;
		}
		let span = if self.span.start <= other.span.start
		{
			self.span.start..std::cmp::max(self.span.end, other.span.end)
		}
		else
		{
			other.span.start..std::cmp::max(self.span.end, other.span.end)
		};
		Location {
			source_filename: self.source_filename,
			span,
			line_start: std::cmp::min(self.line_start, other.line_start),
			line_end: std::cmp::max(self.line_end, other.line_end),
		}
	}

	pub fn format(&self) -> String
	{
		if self.line_start == self.line_end
		{
			format!("at {}:{}", self.source_filename, self.line_start)
		}
		else
		{
			format!(
				"at {}:{}-{}",
				self.source_filename, self.line_start, self.line_end
			)
		}
	}

	pub fn label(&self) -> ariadne::Label<(String, std::ops::Range<usize>)>
	{
		ariadne::Label::new((self.source_filename.clone(), self.span.clone()))
	}

	pub fn label_after_end(
		&self,
	) -> ariadne::Label<(String, std::ops::Range<usize>)>
	{
		let end = self.span.end;
		ariadne::Label::new((self.source_filename.clone(), end..end + 1))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error
{
	#[error("unexpected character")]
	UnexpectedCharacter,
	#[error("missing closing quote")]
	MissingClosingQuote,
	#[error("unterminated comment")]
	UnterminatedComment,
	#[error("invalid numeric literal")]
	InvalidNumericLiteral,
}

pub fn lex(source: &str, source_filename: &str) -> Vec<LexedToken>
{
	let mut scanner = Scanner {
		source,
		offset: 0,
		line: 1,
	};
	let mut tokens = Vec::new();
	let mut is_in_code = false;
	while !scanner.is_at_end()
	{
		let start = scanner.offset;
		let start_line = scanner.line;
		let result = if is_in_code
		{
			match lex_code_token(&mut scanner)
			{
				Some(Ok(Token::CloseTag)) =>
				{
					is_in_code = false;
					Ok(Token::CloseTag)
				}
				Some(result) => result,
				None => continue,
			}
		}
		else
		{
			let html = scanner.take_until("<?php");
			if scanner.starts_with("<?php")
			{
				if !html.is_empty()
				{
					tokens.push(LexedToken {
						result: Ok(Token::InlineHtml(html.to_string())),
						location: scanner.location_since(
							source_filename,
							start,
							start_line,
						),
					});
				}
				let start = scanner.offset;
				let start_line = scanner.line;
				scanner.advance_by("<?php".len());
				is_in_code = true;
				tokens.push(LexedToken {
					result: Ok(Token::OpenTag),
					location: scanner.location_since(
						source_filename,
						start,
						start_line,
					),
				});
				continue;
			}
			Ok(Token::InlineHtml(html.to_string()))
		};
		let location =
			scanner.location_since(source_filename, start, start_line);
		tokens.push(LexedToken { result, location });
	}
	tokens
}

struct Scanner<'a>
{
	source: &'a str,
	offset: usize,
	line: usize,
}

impl<'a> Scanner<'a>
{
	fn is_at_end(&self) -> bool
	{
		self.offset >= self.source.len()
	}

	fn rest(&self) -> &'a str
	{
		&self.source[self.offset..]
	}

	fn peek(&self) -> Option<char>
	{
		self.rest().chars().next()
	}

	fn peek_nth(&self, n: usize) -> Option<char>
	{
		self.rest().chars().nth(n)
	}

	fn starts_with(&self, pattern: &str) -> bool
	{
		self.rest().starts_with(pattern)
	}

	fn next(&mut self) -> Option<char>
	{
		let x = self.peek()?;
		self.offset += x.len_utf8();
		if x == '\n'
		{
			self.line += 1;
		}
		Some(x)
	}

	fn next_if(&mut self, expected: char) -> bool
	{
		if self.peek() == Some(expected)
		{
			self.next();
			true
		}
		else
		{
			false
		}
	}

	fn advance_by(&mut self, len: usize)
	{
		let end = self.offset + len;
		while self.offset < end && self.next().is_some()
		{}
	}

	fn take_until(&mut self, pattern: &str) -> &'a str
	{
		let start = self.offset;
		let len = self.rest().find(pattern).unwrap_or(self.rest().len());
		self.advance_by(len);
		&self.source[start..self.offset]
	}

	fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str
	{
		let start = self.offset;
		while let Some(x) = self.peek()
		{
			if predicate(x)
			{
				self.next();
			}
			else
			{
				break;
			}
		}
		&self.source[start..self.offset]
	}

	fn location_since(
		&self,
		source_filename: &str,
		start: usize,
		start_line: usize,
	) -> Location
	{
		let end = std::cmp::max(self.offset, start + 1);
		let line_end = if self.source[start..self.offset].ends_with('\n')
		{
			self.line - 1
		}
		else
		{
			self.line
		};
		Location {
			source_filename: source_filename.to_string(),
			span: start..end,
			line_start: start_line,
			line_end: std::cmp::max(start_line, line_end),
		}
	}
}

fn lex_code_token(scanner: &mut Scanner) -> Option<Result<Token, Error>>
{
	let x = scanner.next()?;
	let token = match x
	{
		' ' | '\t' | '\r' | '\n' => return None,
		'#' => skip_line_comment(scanner)?,
		'(' => match lex_cast(scanner)
		{
			Some(cast_type) => Token::Cast(cast_type),
			None => Token::ParenLeft,
		},
		')' => Token::ParenRight,
		'{' => Token::BraceLeft,
		'}' => Token::BraceRight,
		'[' => Token::BracketLeft,
		']' => Token::BracketRight,
		',' => Token::Comma,
		';' => Token::Semicolon,
		'~' => Token::Tilde,
		':' =>
		{
			if scanner.next_if(':')
			{
				Token::DoubleColon
			}
			else
			{
				Token::Colon
			}
		}
		'?' =>
		{
			if scanner.next_if('>')
			{
				Token::CloseTag
			}
			else
			{
				Token::Question
			}
		}
		'+' =>
		{
			if scanner.next_if('=')
			{
				Token::PlusAssign
			}
			else
			{
				Token::Plus
			}
		}
		'-' =>
		{
			if scanner.next_if('=')
			{
				Token::MinusAssign
			}
			else if scanner.next_if('>')
			{
				Token::Arrow
			}
			else
			{
				Token::Minus
			}
		}
		'*' =>
		{
			if scanner.next_if('*')
			{
				Token::Power
			}
			else if scanner.next_if('=')
			{
				Token::TimesAssign
			}
			else
			{
				Token::Times
			}
		}
		'/' =>
		{
			if scanner.next_if('/')
			{
				skip_line_comment(scanner)?
			}
			else if scanner.next_if('*')
			{
				return lex_block_comment(scanner);
			}
			else if scanner.next_if('=')
			{
				Token::DivideAssign
			}
			else
			{
				Token::Divide
			}
		}
		'%' =>
		{
			if scanner.next_if('=')
			{
				Token::ModuloAssign
			}
			else
			{
				Token::Modulo
			}
		}
		'^' => Token::Caret,
		'&' =>
		{
			if scanner.next_if('&')
			{
				Token::DoubleAmpersand
			}
			else
			{
				Token::Ampersand
			}
		}
		'|' =>
		{
			if scanner.next_if('|')
			{
				Token::DoublePipe
			}
			else
			{
				Token::Pipe
			}
		}
		'!' =>
		{
			if scanner.next_if('=')
			{
				if scanner.next_if('=')
				{
					Token::NotIdentical
				}
				else
				{
					Token::NotEquals
				}
			}
			else
			{
				Token::Exclamation
			}
		}
		'=' =>
		{
			if scanner.next_if('=')
			{
				if scanner.next_if('=')
				{
					Token::Identical
				}
				else
				{
					Token::Equals
				}
			}
			else if scanner.next_if('>')
			{
				Token::DoubleArrow
			}
			else
			{
				Token::Assignment
			}
		}
		'<' =>
		{
			if scanner.next_if('<')
			{
				Token::ShiftLeft
			}
			else if scanner.next_if('>')
			{
				Token::NotEquals
			}
			else if scanner.next_if('=')
			{
				if scanner.next_if('>')
				{
					Token::Spaceship
				}
				else
				{
					Token::LessEquals
				}
			}
			else
			{
				Token::Less
			}
		}
		'>' =>
		{
			if scanner.next_if('>')
			{
				Token::ShiftRight
			}
			else if scanner.next_if('=')
			{
				Token::GreaterEquals
			}
			else
			{
				Token::Greater
			}
		}
		'.' =>
		{
			if scanner.peek().map_or(false, |y| y.is_ascii_digit())
			{
				return Some(lex_number(scanner, x));
			}
			else if scanner.next_if('=')
			{
				Token::DotAssign
			}
			else
			{
				Token::Dot
			}
		}
		'$' =>
		{
			let name = scanner.take_while(is_identifier_continuation);
			if name.is_empty()
			{
				return Some(Err(Error::UnexpectedCharacter));
			}
			Token::Variable(name.to_string())
		}
		'\'' => return Some(lex_single_quoted_string(scanner)),
		'"' => return Some(lex_double_quoted_string(scanner)),
		'0'..='9' => return Some(lex_number(scanner, x)),
		x if is_identifier_start(x)
			|| (x == '\\' && scanner.peek().map_or(false, is_identifier_start)) =>
		{
			let rest = scanner.take_while(is_identifier_continuation);
			let mut identifier = x.to_string();
			identifier.push_str(rest);
			lex_keyword(identifier)
		}
		_ => return Some(Err(Error::UnexpectedCharacter)),
	};
	Some(Ok(token))
}

fn skip_line_comment(scanner: &mut Scanner) -> Option<Token>
{
	while let Some(y) = scanner.peek()
	{
		if y == '\n'
		{
			break;
		}
		if scanner.starts_with("?>")
		{
			// The closing tag ends a single line comment.
			scanner.advance_by(2);
			return Some(Token::CloseTag);
		}
		scanner.next();
	}
	None
}

fn lex_block_comment(scanner: &mut Scanner) -> Option<Result<Token, Error>>
{
	let is_doc_comment =
		scanner.peek() == Some('*') && scanner.peek_nth(1) != Some('/');
	let body = scanner.take_until("*/");
	if !scanner.starts_with("*/")
	{
		return Some(Err(Error::UnterminatedComment));
	}
	scanner.advance_by(2);
	if is_doc_comment
	{
		let text = format!("/*{}*/", body);
		Some(Ok(Token::DocComment(text)))
	}
	else
	{
		None
	}
}

fn lex_cast(scanner: &mut Scanner) -> Option<CastType>
{
	let rest = scanner.rest();
	let inner = rest.trim_start_matches(|c| c == ' ' || c == '\t');
	let name_len = inner
		.find(|c: char| !c.is_ascii_alphabetic())
		.unwrap_or(inner.len());
	let name = &inner[..name_len];
	let after = inner[name_len..].trim_start_matches(|c| c == ' ' || c == '\t');
	if !after.starts_with(')')
	{
		return None;
	}
	let cast_type = match name.to_ascii_lowercase().as_str()
	{
		"int" | "integer" => CastType::Int,
		"float" | "double" | "real" => CastType::Float,
		"string" | "binary" => CastType::String,
		"bool" | "boolean" => CastType::Bool,
		"array" => CastType::Array,
		"object" => CastType::Object,
		"unset" => CastType::Unset,
		_ => return None,
	};
	let len = rest.len() - after.len() + 1;
	scanner.advance_by(len);
	Some(cast_type)
}

fn lex_keyword(identifier: String) -> Token
{
	match identifier.to_ascii_lowercase().as_str()
	{
		"function" => Token::Function,
		"class" => Token::Class,
		"abstract" => Token::Abstract,
		"final" => Token::Final,
		"extends" => Token::Extends,
		"public" => Token::Public,
		"protected" => Token::Protected,
		"private" => Token::Private,
		"static" => Token::Static,
		"var" => Token::Var,
		"return" => Token::Return,
		"if" => Token::If,
		"elseif" => Token::Elseif,
		"else" => Token::Else,
		"while" => Token::While,
		"echo" => Token::Echo,
		"new" => Token::New,
		"const" => Token::Const,
		"and" => Token::And,
		"or" => Token::Or,
		"xor" => Token::Xor,
		"true" => Token::Bool(true),
		"false" => Token::Bool(false),
		"null" => Token::Null,
		_ => Token::Identifier(identifier),
	}
}

fn lex_number(scanner: &mut Scanner, first: char) -> Result<Token, Error>
{
	if first == '0'
	{
		let radix = match scanner.peek()
		{
			Some('x') | Some('X') => Some(16),
			Some('b') | Some('B') => Some(2),
			Some('o') | Some('O') => Some(8),
			_ => None,
		};
		if let Some(radix) = radix
		{
			scanner.next();
			let digits = scanner.take_while(|y| y.is_ascii_hexdigit() || y == '_');
			return parse_integer(digits, radix);
		}
	}

	let mut literal = first.to_string();
	literal.push_str(scanner.take_while(|y| y.is_ascii_digit() || y == '_'));
	let mut is_float = first == '.';
	if !is_float
		&& scanner.peek() == Some('.')
		&& scanner.peek_nth(1).map_or(true, |y| y != '.')
	{
		scanner.next();
		literal.push('.');
		literal.push_str(scanner.take_while(|y| y.is_ascii_digit() || y == '_'));
		is_float = true;
	}
	if let Some('e') | Some('E') = scanner.peek()
	{
		let has_exponent = match scanner.peek_nth(1)
		{
			Some('+') | Some('-') => scanner
				.peek_nth(2)
				.map_or(false, |y| y.is_ascii_digit()),
			Some(y) => y.is_ascii_digit(),
			None => false,
		};
		if has_exponent
		{
			literal.push('e');
			scanner.next();
			if let Some(sign) = scanner.peek().filter(|y| *y == '+' || *y == '-')
			{
				literal.push(sign);
				scanner.next();
			}
			literal.push_str(scanner.take_while(|y| y.is_ascii_digit()));
			is_float = true;
		}
	}
	if is_float
	{
		let cleaned: String = literal.chars().filter(|c| *c != '_').collect();
		cleaned
			.parse()
			.map(Token::Float)
			.map_err(|_| Error::InvalidNumericLiteral)
	}
	else if literal.len() > 1 && literal.starts_with('0')
	{
		parse_integer(&literal[1..], 8)
	}
	else
	{
		parse_integer(&literal, 10)
	}
}

fn parse_integer(digits: &str, radix: u32) -> Result<Token, Error>
{
	let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
	if cleaned.is_empty()
	{
		return Err(Error::InvalidNumericLiteral);
	}
	match i64::from_str_radix(&cleaned, radix)
	{
		Ok(value) => Ok(Token::Integer(value)),
		Err(_) =>
		{
			// Integer literals that overflow are floats in PHP.
			parse_wide_integer(&cleaned, radix).map(Token::Float)
		}
	}
}

/// Converts digits too large for an integer to the nearest float.
fn parse_wide_integer(digits: &str, radix: u32) -> Result<f64, Error>
{
	let bits_per_digit = match radix
	{
		2 => 1,
		8 => 3,
		16 => 4,
		_ => return digits.parse().map_err(|_| Error::InvalidNumericLiteral),
	};
	// The leading bits, with any discarded nonzero bit folded into the
	// lowest one so that the final conversion rounds correctly.
	let mut leading: u128 = 0;
	let mut discarded_nonzero = false;
	let mut exponent: i32 = 0;
	for c in digits.chars()
	{
		let digit = c.to_digit(radix).ok_or(Error::InvalidNumericLiteral)?;
		if leading.leading_zeros() >= bits_per_digit
		{
			leading = (leading << bits_per_digit) | u128::from(digit);
		}
		else
		{
			exponent += bits_per_digit as i32;
			discarded_nonzero |= digit != 0;
		}
	}
	let leading = leading | u128::from(discarded_nonzero);
	Ok((leading as f64) * 2f64.powi(exponent))
}

fn lex_single_quoted_string(scanner: &mut Scanner) -> Result<Token, Error>
{
	let mut value = String::new();
	loop
	{
		match scanner.next()
		{
			Some('\'') => break,
			Some('\\') => match scanner.peek()
			{
				Some('\'') | Some('\\') =>
				{
					value.extend(scanner.next());
				}
				_ => value.push('\\'),
			},
			Some(x) => value.push(x),
			None => return Err(Error::MissingClosingQuote),
		}
	}
	Ok(Token::StringLiteral {
		value,
		is_interpolated: false,
	})
}

fn lex_double_quoted_string(scanner: &mut Scanner) -> Result<Token, Error>
{
	let mut value = String::new();
	let mut is_interpolated = false;
	loop
	{
		match scanner.next()
		{
			Some('"') => break,
			Some('\\') => match scanner.next()
			{
				Some('n') => value.push('\n'),
				Some('t') => value.push('\t'),
				Some('r') => value.push('\r'),
				Some('v') => value.push('\u{0b}'),
				Some('e') => value.push('\u{1b}'),
				Some('f') => value.push('\u{0c}'),
				Some('\\') => value.push('\\'),
				Some('$') => value.push('$'),
				Some('"') => value.push('"'),
				Some(x @ '0'..='7') =>
				{
					let mut code = x.to_digit(8).unwrap_or(0);
					for _ in 0..2
					{
						match scanner.peek().and_then(|y| y.to_digit(8))
						{
							Some(digit) =>
							{
								scanner.next();
								code = code * 8 + digit;
							}
							None => break,
						}
					}
					value.push(char::from((code & 0xFF) as u8));
				}
				Some('x')
					if scanner.peek().map_or(false, |y| y.is_ascii_hexdigit()) =>
				{
					let mut code = 0;
					for _ in 0..2
					{
						match scanner.peek().and_then(|y| y.to_digit(16))
						{
							Some(digit) =>
							{
								scanner.next();
								code = code * 16 + digit;
							}
							None => break,
						}
					}
					value.push(char::from(code as u8));
				}
				Some('u') if scanner.peek() == Some('{') =>
				{
					scanner.next();
					let digits = scanner.take_while(|y| y.is_ascii_hexdigit());
					let decoded = u32::from_str_radix(digits, 16)
						.ok()
						.and_then(char::from_u32);
					match (decoded, scanner.next_if('}'))
					{
						(Some(x), true) => value.push(x),
						_ => return Err(Error::UnexpectedCharacter),
					}
				}
				Some(x) =>
				{
					value.push('\\');
					value.push(x);
				}
				None => return Err(Error::MissingClosingQuote),
			},
			Some('$')
				if scanner
					.peek()
					.map_or(false, |y| is_identifier_start(y)) =>
			{
				is_interpolated = true;
				value.push('$');
			}
			Some('{') if scanner.peek() == Some('$') =>
			{
				is_interpolated = true;
				value.push('{');
			}
			Some(x) => value.push(x),
			None => return Err(Error::MissingClosingQuote),
		}
	}
	Ok(Token::StringLiteral {
		value,
		is_interpolated,
	})
}

fn is_identifier_start(x: char) -> bool
{
	match x
	{
		'a'..='z' | 'A'..='Z' | '_' => true,
		x => !x.is_ascii() && x.is_alphabetic(),
	}
}

fn is_identifier_continuation(x: char) -> bool
{
	match x
	{
		'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '\\' => true,
		x => !x.is_ascii() && x.is_alphanumeric(),
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	use pretty_assertions::assert_eq;

	fn tokens(source: &str) -> Vec<Token>
	{
		lex(source, "test.php")
			.into_iter()
			.map(|x| x.result.unwrap())
			.collect()
	}

	#[test]
	fn lex_open_tag_and_echo()
	{
		assert_eq!(
			tokens("<?php echo 1;"),
			vec![
				Token::OpenTag,
				Token::Echo,
				Token::Integer(1),
				Token::Semicolon
			]
		);
	}

	#[test]
	fn lex_numbers()
	{
		assert_eq!(
			tokens("<?php 0x1F 0b101 017 1_000 1.5 .5 1e3 9223372036854775808"),
			vec![
				Token::OpenTag,
				Token::Integer(31),
				Token::Integer(5),
				Token::Integer(15),
				Token::Integer(1000),
				Token::Float(1.5),
				Token::Float(0.5),
				Token::Float(1000.0),
				Token::Float(9223372036854775808.0),
			]
		);
	}

	#[test]
	fn lex_overflowing_integers()
	{
		assert_eq!(
			tokens(
				"<?php 123456789012345678901234567890 0xFFFFFFFFFFFFFFFF \
				 0b1_0000000000000000000000000000000000000000000000000000000000000001 \
				 0x10000000000000000000000000000000000000000 0777777777777777777777777"
			),
			vec![
				Token::OpenTag,
				Token::Float(123456789012345678901234567890.0),
				Token::Float(18446744073709551616.0),
				Token::Float(18446744073709551616.0),
				Token::Float(2f64.powi(160)),
				Token::Float(4722366482869645213696.0),
			]
		);
	}

	#[test]
	fn lex_casts_and_parentheses()
	{
		assert_eq!(
			tokens("<?php ( int )$a ($b)"),
			vec![
				Token::OpenTag,
				Token::Cast(CastType::Int),
				Token::Variable("a".to_string()),
				Token::ParenLeft,
				Token::Variable("b".to_string()),
				Token::ParenRight,
			]
		);
	}

	#[test]
	fn lex_strings()
	{
		assert_eq!(
			tokens(r#"<?php 'it\'s' "a\tb" "$x""#),
			vec![
				Token::OpenTag,
				Token::StringLiteral {
					value: "it's".to_string(),
					is_interpolated: false,
				},
				Token::StringLiteral {
					value: "a\tb".to_string(),
					is_interpolated: false,
				},
				Token::StringLiteral {
					value: "$x".to_string(),
					is_interpolated: true,
				},
			]
		);
	}

	#[test]
	fn lex_doc_comment_but_not_block_comment()
	{
		assert_eq!(
			tokens("<?php /* plain */ /** @test */ function"),
			vec![
				Token::OpenTag,
				Token::DocComment("/** @test */".to_string()),
				Token::Function,
			]
		);
	}

	#[test]
	fn track_lines()
	{
		let lexed = lex("<?php\n\n$a\n= 1;", "test.php");
		let variable = &lexed[1];
		assert_eq!(variable.location.line_start, 3);
		assert_eq!(variable.location.span, 7..9);
	}

	#[test]
	fn report_missing_closing_quote()
	{
		let lexed = lex("<?php 'abc", "test.php");
		assert_eq!(lexed[1].result, Err(Error::MissingClosingQuote));
	}
}
