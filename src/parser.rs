//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! The parser takes lexed tokens and builds the abstract syntax tree.

use crate::common::*;
use crate::error::Error;
use crate::lexer::{LexedToken, Token};

use std::collections::{HashMap, VecDeque};

use enumset::EnumSet;

/// How deeply statements and parenthesized or unary operands may nest.
pub const MAX_PARSE_DEPTH: usize = 32;

/// How tall a single expression tree may grow, counting chains such as
/// `1 + 2 + 3` and `$a->b()->c()` one level per operator.
pub const MAX_EXPRESSION_HEIGHT: usize = 128;

/// Parses a file. Statements that fail to parse are replaced by
/// [`Statement::Invalid`] and the errors are returned alongside.
pub fn parse(tokens: Vec<LexedToken>) -> (Vec<Statement>, Vec<Error>)
{
	let mut statements = Vec::new();

	let mut tokens = Tokens::from(tokens);
	while !tokens.is_empty()
	{
		let remaining = tokens.tokens.len();
		let start = tokens.start_location_span();
		match parse_statement(&mut tokens)
		{
			Ok(Some(statement)) => statements.push(statement),
			Ok(None) => (),
			Err(error) =>
			{
				tokens.errors.push(error);
				if tokens.tokens.len() == remaining
				{
					tokens.pop_front();
				}
				let location = tokens.location_of_span(start);
				statements.push(Statement::Invalid { location });
				skip_until_next_statement(&mut tokens);
			}
		}
	}

	(statements, tokens.errors)
}

struct Tokens
{
	tokens: VecDeque<LexedToken>,
	last_location: Location,
	/// Doc comments, by the offset of the token that follows them.
	doc_comments: HashMap<usize, DocComment>,
	errors: Vec<Error>,
	depth: usize,
}

impl From<Vec<LexedToken>> for Tokens
{
	fn from(tokens: Vec<LexedToken>) -> Tokens
	{
		let last_location = match tokens.first()
		{
			Some(LexedToken {
				result: _,
				location,
			}) => Location {
				span: location.span.start..location.span.start,
				..location.clone()
			},
			None => Location {
				source_filename: String::new(),
				span: 0..0,
				line_start: 1,
				line_end: 1,
			},
		};

		let mut doc_comments = HashMap::new();
		let mut pending = None;
		let mut filtered = VecDeque::with_capacity(tokens.len());
		for token in tokens
		{
			match token
			{
				LexedToken {
					result: Ok(Token::DocComment(text)),
					location,
				} =>
				{
					pending = Some(DocComment { text, location });
				}
				token =>
				{
					if let Some(doc_comment) = pending.take()
					{
						doc_comments.insert(token.location.span.start, doc_comment);
					}
					filtered.push_back(token);
				}
			}
		}

		Tokens {
			tokens: filtered,
			last_location,
			doc_comments,
			errors: Vec::new(),
			depth: 0,
		}
	}
}

impl Tokens
{
	fn is_empty(&self) -> bool
	{
		self.tokens.is_empty()
	}

	fn pop_front(&mut self) -> Option<LexedToken>
	{
		let popped = self.tokens.pop_front();
		match &popped
		{
			Some(LexedToken {
				result: _,
				location,
			}) =>
			{
				self.last_location = location.clone();
			}
			None => (),
		}
		popped
	}

	fn start_location_span(&self) -> Option<Location>
	{
		match self.tokens.front()
		{
			Some(LexedToken {
				result: _,
				location,
			}) => Some(location.clone()),
			None => None,
		}
	}

	fn location_of_span(&self, start: Option<Location>) -> Location
	{
		match start
		{
			Some(location) => location.combined_with(&self.last_location),
			None => self.last_location.clone(),
		}
	}

	/// The doc comment directly preceding the token at the given location.
	fn take_doc_comment(&mut self, start: &Option<Location>)
		-> Option<DocComment>
	{
		match start
		{
			Some(location) => self.doc_comments.remove(&location.span.start),
			None => None,
		}
	}

	fn descend(&mut self) -> Result<(), Error>
	{
		if self.depth >= MAX_PARSE_DEPTH
		{
			return Err(Error::MaximumParseDepthExceeded {
				location: self.last_location.clone(),
			});
		}
		self.depth += 1;
		Ok(())
	}

	fn ascend(&mut self)
	{
		self.depth -= 1;
	}

	fn check_height(&self, height: usize) -> Result<(), Error>
	{
		if height > MAX_EXPRESSION_HEIGHT
		{
			return Err(Error::MaximumParseDepthExceeded {
				location: self.last_location.clone(),
			});
		}
		Ok(())
	}
}

fn peek(tokens: &mut Tokens) -> Option<&Token>
{
	match tokens.tokens.front()
	{
		Some(LexedToken {
			result: Ok(token),
			location: _,
		}) => Some(token),
		Some(LexedToken {
			result: Err(_),
			location: _,
		}) => None,
		None => None,
	}
}

fn consume(
	expected_token: Token,
	expectation: &str,
	tokens: &mut Tokens,
) -> Result<(), Error>
{
	match tokens.pop_front()
	{
		Some(LexedToken {
			result: Ok(token),
			location: _,
		}) if token == expected_token => Ok(()),
		Some(LexedToken {
			result: Ok(_),
			location,
		}) => Err(Error::UnexpectedToken {
			expectation: expectation.to_string(),
			location,
		}),
		Some(LexedToken {
			result: Err(error),
			location,
		}) => Err(Error::Lexical {
			error,
			expectation: expectation.to_string(),
			location,
		}),
		None => Err(Error::UnexpectedEndOfFile {
			expectation: expectation.to_string(),
			last_location: tokens.last_location.clone(),
		}),
	}
}

fn extract_identifier(
	expectation: &str,
	tokens: &mut Tokens,
) -> Result<Identifier, Error>
{
	match tokens.pop_front()
	{
		Some(LexedToken {
			result: Ok(Token::Identifier(name)),
			location,
		}) => Ok(Identifier { name, location }),
		Some(LexedToken {
			result: Ok(_),
			location,
		}) => Err(Error::UnexpectedToken {
			expectation: expectation.to_string(),
			location,
		}),
		Some(LexedToken {
			result: Err(error),
			location,
		}) => Err(Error::Lexical {
			error,
			expectation: expectation.to_string(),
			location,
		}),
		None => Err(Error::UnexpectedEndOfFile {
			expectation: expectation.to_string(),
			last_location: tokens.last_location.clone(),
		}),
	}
}

fn extract(
	expectation: &str,
	tokens: &mut Tokens,
) -> Result<(Token, Location), Error>
{
	match tokens.pop_front()
	{
		Some(LexedToken {
			result: Ok(token),
			location,
		}) => Ok((token, location)),
		Some(LexedToken {
			result: Err(error),
			location,
		}) => Err(Error::Lexical {
			error,
			expectation: expectation.to_string(),
			location,
		}),
		None => Err(Error::UnexpectedEndOfFile {
			expectation: expectation.to_string(),
			last_location: tokens.last_location.clone(),
		}),
	}
}

fn can_start_declaration(token: &Token) -> bool
{
	match token
	{
		Token::Function => true,
		Token::Class => true,
		Token::Abstract => true,
		Token::Final => true,
		Token::Const => true,
		Token::OpenTag => true,
		Token::InlineHtml(_) => true,
		_ => false,
	}
}

fn skip_until_next_statement(tokens: &mut Tokens)
{
	while let Some(token) = peek(tokens)
	{
		if can_start_declaration(token)
		{
			return;
		}
		let is_terminator = match token
		{
			Token::Semicolon | Token::BraceRight | Token::CloseTag => true,
			_ => false,
		};
		tokens.pop_front();
		if is_terminator
		{
			return;
		}
	}
	// A token that failed to lex.
	tokens.pop_front();
}

fn consume_terminator(tokens: &mut Tokens) -> Result<(), Error>
{
	match peek(tokens)
	{
		// The closing tag implies a semicolon.
		Some(Token::CloseTag) => Ok(()),
		_ => consume(Token::Semicolon, "expected semicolon", tokens),
	}
}

fn parse_statement(tokens: &mut Tokens) -> Result<Option<Statement>, Error>
{
	tokens.descend()?;
	let result = parse_statement_inner(tokens);
	tokens.ascend();
	result
}

fn parse_statement_inner(
	tokens: &mut Tokens,
) -> Result<Option<Statement>, Error>
{
	let start = tokens.start_location_span();
	let (token, location) = match peek(tokens)
	{
		Some(Token::OpenTag) | Some(Token::CloseTag) | Some(Token::Semicolon) =>
		{
			tokens.pop_front();
			return Ok(None);
		}
		Some(Token::InlineHtml(_)) =>
		{
			let (_, location) = extract("expected inline HTML", tokens)?;
			return Ok(Some(Statement::InlineHtml { location }));
		}
		Some(Token::Echo) => extract("expected keyword", tokens)?,
		Some(Token::Return) => extract("expected keyword", tokens)?,
		Some(Token::If) => extract("expected keyword", tokens)?,
		Some(Token::While) => extract("expected keyword", tokens)?,
		Some(Token::BraceLeft) => extract("expected brace", tokens)?,
		Some(Token::Const) => extract("expected keyword", tokens)?,
		Some(Token::Function) =>
		{
			let doc_comment = tokens.take_doc_comment(&start);
			let function = parse_function_declaration(doc_comment, tokens)?;
			return Ok(Some(Statement::Function(function)));
		}
		Some(Token::Class) | Some(Token::Abstract) | Some(Token::Final) =>
		{
			let doc_comment = tokens.take_doc_comment(&start);
			let class = parse_class_declaration(doc_comment, tokens)?;
			return Ok(Some(Statement::Class(class)));
		}
		_ =>
		{
			let expression = parse_expression(tokens)?;
			consume_terminator(tokens)?;
			let location = tokens.location_of_span(start);
			return Ok(Some(Statement::Expression {
				expression,
				location,
			}));
		}
	};

	let statement = match token
	{
		Token::Echo =>
		{
			let mut expressions = vec![parse_expression(tokens)?];
			while let Some(Token::Comma) = peek(tokens)
			{
				tokens.pop_front();
				expressions.push(parse_expression(tokens)?);
			}
			consume_terminator(tokens)?;
			Statement::Echo {
				expressions,
				location: tokens.location_of_span(start),
			}
		}
		Token::Return =>
		{
			let value = match peek(tokens)
			{
				Some(Token::Semicolon) | Some(Token::CloseTag) => None,
				_ => Some(parse_expression(tokens)?),
			};
			consume_terminator(tokens)?;
			Statement::Return {
				value,
				location: tokens.location_of_span(start),
			}
		}
		Token::If => parse_rest_of_if(start, tokens)?,
		Token::While =>
		{
			let condition = parse_condition(tokens)?;
			let body = parse_body(tokens)?;
			Statement::While {
				condition,
				body: Box::new(body),
				location: tokens.location_of_span(start),
			}
		}
		Token::BraceLeft => Statement::Block(parse_rest_of_block(location, tokens)?),
		Token::Const =>
		{
			let name = extract_identifier("expected constant name", tokens)?;
			consume(Token::Assignment, "expected equals sign", tokens)?;
			let value = parse_expression(tokens)?;
			consume_terminator(tokens)?;
			Statement::Constant {
				name,
				value,
				location: tokens.location_of_span(start),
			}
		}
		_ => unreachable!(),
	};
	Ok(Some(statement))
}

fn parse_condition(tokens: &mut Tokens) -> Result<Expression, Error>
{
	consume(Token::ParenLeft, "expected left parenthesis", tokens)?;
	let condition = parse_expression(tokens)?;
	consume(Token::ParenRight, "expected right parenthesis", tokens)?;
	Ok(condition)
}

/// The statement controlled by an `if`, `else` or `while`.
fn parse_body(tokens: &mut Tokens) -> Result<Statement, Error>
{
	match parse_statement(tokens)?
	{
		Some(statement) => Ok(statement),
		None => Ok(Statement::Block(Block {
			statements: Vec::new(),
			location: tokens.last_location.clone(),
		})),
	}
}

fn parse_rest_of_if(
	start: Option<Location>,
	tokens: &mut Tokens,
) -> Result<Statement, Error>
{
	let condition = parse_condition(tokens)?;
	let then_branch = parse_body(tokens)?;
	let else_branch = match peek(tokens)
	{
		Some(Token::Elseif) =>
		{
			let start_of_elseif = tokens.start_location_span();
			tokens.pop_front();
			let elseif = parse_rest_of_if(start_of_elseif, tokens)?;
			Some(Box::new(elseif))
		}
		Some(Token::Else) =>
		{
			tokens.pop_front();
			let start_of_else = tokens.start_location_span();
			// Treat `else if` the same as `elseif`.
			if let Some(Token::If) = peek(tokens)
			{
				tokens.pop_front();
				let elseif = parse_rest_of_if(start_of_else, tokens)?;
				Some(Box::new(elseif))
			}
			else
			{
				Some(Box::new(parse_body(tokens)?))
			}
		}
		_ => None,
	};
	Ok(Statement::If {
		condition,
		then_branch: Box::new(then_branch),
		else_branch,
		location: tokens.location_of_span(start),
	})
}

fn parse_rest_of_block(
	start: Location,
	tokens: &mut Tokens,
) -> Result<Block, Error>
{
	let mut statements = Vec::new();
	loop
	{
		if let Some(Token::BraceRight) = peek(tokens)
		{
			tokens.pop_front();
			break;
		}
		else if tokens.is_empty()
		{
			return Err(Error::UnexpectedEndOfFile {
				expectation: "expected right brace".to_string(),
				last_location: tokens.last_location.clone(),
			});
		}

		if let Some(statement) = parse_statement(tokens)?
		{
			statements.push(statement);
		}
	}

	let location = start.combined_with(&tokens.last_location);
	Ok(Block {
		statements,
		location,
	})
}

fn parse_function_declaration(
	doc_comment: Option<DocComment>,
	tokens: &mut Tokens,
) -> Result<Function, Error>
{
	let start = tokens.start_location_span();
	consume(Token::Function, "expected function", tokens)?;
	if let Some(Token::Ampersand) = peek(tokens)
	{
		tokens.pop_front();
	}
	let name = extract_identifier("expected function name", tokens)?;
	let parameters = parse_parameters(tokens)?;
	skip_return_type(tokens);
	let brace = tokens.start_location_span();
	consume(Token::BraceLeft, "expected function body", tokens)?;
	let body = parse_rest_of_block(brace.unwrap_or_default(), tokens)?;
	Ok(Function {
		name,
		parameters,
		body,
		doc_comment,
		location: tokens.location_of_span(start),
	})
}

fn parse_parameters(tokens: &mut Tokens) -> Result<Vec<Parameter>, Error>
{
	consume(Token::ParenLeft, "expected parameter list", tokens)?;

	let mut parameters = Vec::new();

	loop
	{
		if let Some(Token::ParenRight) = peek(tokens)
		{
			break;
		}

		let start = tokens.start_location_span();
		skip_type(tokens);
		while let Some(Token::Ampersand) | Some(Token::Dot) = peek(tokens)
		{
			tokens.pop_front();
		}
		let (token, location) = extract("expected parameter name", tokens)?;
		let name = match token
		{
			Token::Variable(name) => name,
			_ =>
			{
				return Err(Error::UnexpectedToken {
					expectation: "expected parameter name".to_string(),
					location,
				});
			}
		};
		let default = match peek(tokens)
		{
			Some(Token::Assignment) =>
			{
				tokens.pop_front();
				Some(parse_expression(tokens)?)
			}
			_ => None,
		};
		parameters.push(Parameter {
			name,
			default,
			location: tokens.location_of_span(start),
		});

		if let Some(Token::Comma) = peek(tokens)
		{
			tokens.pop_front();
		}
		else
		{
			break;
		}
	}

	consume(
		Token::ParenRight,
		"expected comma or right parenthesis",
		tokens,
	)?;

	Ok(parameters)
}

/// Skips a type declaration such as `?int` or `Foo|Bar`.
fn skip_type(tokens: &mut Tokens)
{
	while let Some(Token::Identifier(_))
	| Some(Token::Question)
	| Some(Token::Pipe)
	| Some(Token::Static) = peek(tokens)
	{
		tokens.pop_front();
	}
}

fn skip_return_type(tokens: &mut Tokens)
{
	if let Some(Token::Colon) = peek(tokens)
	{
		tokens.pop_front();
		skip_type(tokens);
	}
}

fn parse_class_declaration(
	doc_comment: Option<DocComment>,
	tokens: &mut Tokens,
) -> Result<Class, Error>
{
	let start = tokens.start_location_span();
	let mut flags = EnumSet::new();
	loop
	{
		match peek(tokens)
		{
			Some(Token::Abstract) => flags.insert(ClassFlag::Abstract),
			Some(Token::Final) => flags.insert(ClassFlag::Final),
			_ => break,
		};
		tokens.pop_front();
	}
	consume(Token::Class, "expected class", tokens)?;
	let name = extract_identifier("expected class name", tokens)?;
	let parent = match peek(tokens)
	{
		Some(Token::Extends) =>
		{
			tokens.pop_front();
			Some(extract_identifier("expected parent class name", tokens)?)
		}
		_ => None,
	};
	// Interfaces do not matter to the analysis.
	while let Some(Token::Identifier(_)) | Some(Token::Comma) = peek(tokens)
	{
		tokens.pop_front();
	}
	consume(Token::BraceLeft, "expected class body", tokens)?;

	let mut methods = Vec::new();
	loop
	{
		if let Some(Token::BraceRight) = peek(tokens)
		{
			tokens.pop_front();
			break;
		}
		if let Some(method) = parse_member(tokens)?
		{
			methods.push(method);
		}
	}

	Ok(Class {
		name,
		parent,
		flags,
		methods,
		doc_comment,
		location: tokens.location_of_span(start),
	})
}

/// Parses a class member, returning it if it is a method.
fn parse_member(tokens: &mut Tokens) -> Result<Option<Method>, Error>
{
	let start = tokens.start_location_span();
	let doc_comment = tokens.take_doc_comment(&start);
	let mut flags = EnumSet::new();
	loop
	{
		match peek(tokens)
		{
			Some(Token::Public) => flags.insert(MethodFlag::Public),
			Some(Token::Protected) => flags.insert(MethodFlag::Protected),
			Some(Token::Private) => flags.insert(MethodFlag::Private),
			Some(Token::Static) => flags.insert(MethodFlag::Static),
			Some(Token::Abstract) => flags.insert(MethodFlag::Abstract),
			Some(Token::Final) => flags.insert(MethodFlag::Final),
			Some(Token::Var) => flags.insert(MethodFlag::Public),
			_ => break,
		};
		tokens.pop_front();
	}

	match peek(tokens)
	{
		Some(Token::Function) => (),
		Some(Token::Const)
		| Some(Token::Variable(_))
		| Some(Token::Identifier(_))
		| Some(Token::Question) =>
		{
			// Properties and class constants are skipped.
			skip_until_semicolon(tokens)?;
			return Ok(None);
		}
		_ =>
		{
			let (_, location) = extract("expected class member", tokens)?;
			return Err(Error::UnexpectedToken {
				expectation: "expected class member".to_string(),
				location,
			});
		}
	}
	tokens.pop_front();
	if let Some(Token::Ampersand) = peek(tokens)
	{
		tokens.pop_front();
	}
	let name = extract_identifier("expected method name", tokens)?;
	let parameters = parse_parameters(tokens)?;
	skip_return_type(tokens);
	let body = match peek(tokens)
	{
		Some(Token::Semicolon) =>
		{
			tokens.pop_front();
			None
		}
		_ =>
		{
			let brace = tokens.start_location_span();
			consume(Token::BraceLeft, "expected method body", tokens)?;
			Some(parse_rest_of_block(brace.unwrap_or_default(), tokens)?)
		}
	};
	Ok(Some(Method {
		name,
		parameters,
		body,
		flags,
		doc_comment,
		location: tokens.location_of_span(start),
	}))
}

fn skip_until_semicolon(tokens: &mut Tokens) -> Result<(), Error>
{
	loop
	{
		let (token, _) = extract("expected semicolon", tokens)?;
		if token == Token::Semicolon
		{
			return Ok(());
		}
	}
}

fn parse_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	tokens.descend()?;
	let result = parse_binary(LOWEST_PRECEDENCE, tokens);
	tokens.ascend();
	result
}

const LOWEST_PRECEDENCE: u8 = 1;
const ASSIGNMENT_PRECEDENCE: u8 = 4;

enum Infix
{
	Binary(BinaryOp),
	Assignment(Option<BinaryOp>),
}

/// The operator a token stands for between two operands, and how tightly
/// it binds.
fn infix_operator(token: &Token) -> Option<(Infix, u8)>
{
	let binary =
		|op: BinaryOp, precedence: u8| Some((Infix::Binary(op), precedence));
	let assignment = |op: Option<BinaryOp>| {
		Some((Infix::Assignment(op), ASSIGNMENT_PRECEDENCE))
	};
	match token
	{
		Token::Or => binary(BinaryOp::LogicalOr, 1),
		Token::Xor => binary(BinaryOp::LogicalXor, 2),
		Token::And => binary(BinaryOp::LogicalAnd, 3),
		Token::Assignment => assignment(None),
		Token::PlusAssign => assignment(Some(BinaryOp::Add)),
		Token::MinusAssign => assignment(Some(BinaryOp::Subtract)),
		Token::TimesAssign => assignment(Some(BinaryOp::Multiply)),
		Token::DivideAssign => assignment(Some(BinaryOp::Divide)),
		Token::ModuloAssign => assignment(Some(BinaryOp::Modulo)),
		Token::DotAssign => assignment(Some(BinaryOp::Concat)),
		Token::DoublePipe => binary(BinaryOp::BooleanOr, 5),
		Token::DoubleAmpersand => binary(BinaryOp::BooleanAnd, 6),
		Token::Pipe => binary(BinaryOp::BitwiseOr, 7),
		Token::Caret => binary(BinaryOp::BitwiseXor, 8),
		Token::Ampersand => binary(BinaryOp::BitwiseAnd, 9),
		Token::Equals => binary(BinaryOp::Equal, 10),
		Token::NotEquals => binary(BinaryOp::NotEqual, 10),
		Token::Identical => binary(BinaryOp::Identical, 10),
		Token::NotIdentical => binary(BinaryOp::NotIdentical, 10),
		Token::Spaceship => binary(BinaryOp::Spaceship, 10),
		Token::Less => binary(BinaryOp::Smaller, 11),
		Token::LessEquals => binary(BinaryOp::SmallerOrEqual, 11),
		Token::Greater => binary(BinaryOp::Greater, 11),
		Token::GreaterEquals => binary(BinaryOp::GreaterOrEqual, 11),
		Token::ShiftLeft => binary(BinaryOp::ShiftLeft, 12),
		Token::ShiftRight => binary(BinaryOp::ShiftRight, 12),
		Token::Plus => binary(BinaryOp::Add, 13),
		Token::Minus => binary(BinaryOp::Subtract, 13),
		Token::Dot => binary(BinaryOp::Concat, 13),
		Token::Times => binary(BinaryOp::Multiply, 14),
		Token::Divide => binary(BinaryOp::Divide, 14),
		Token::Modulo => binary(BinaryOp::Modulo, 14),
		_ => None,
	}
}

/// Parses operations that bind at least as tightly as `min_precedence`.
/// Binary operators are left associative, assignments right associative.
fn parse_binary(
	min_precedence: u8,
	tokens: &mut Tokens,
) -> Result<Expression, Error>
{
	let mut expression = parse_unary_expression(tokens)?;
	let mut height = expression.height();

	loop
	{
		let (infix, precedence) = match peek(tokens).and_then(infix_operator)
		{
			Some((infix, precedence)) if precedence >= min_precedence =>
			{
				(infix, precedence)
			}
			_ => return Ok(expression),
		};
		tokens.pop_front();
		let location_of_op = tokens.last_location.clone();

		expression = match infix
		{
			Infix::Binary(op) =>
			{
				let right = parse_binary(precedence + 1, tokens)?;
				height = std::cmp::max(height, right.height()) + 1;
				let location =
					expression.location().clone().combined_with(right.location());
				Expression::Binary {
					op,
					left: Box::new(expression),
					right: Box::new(right),
					location,
					location_of_op,
				}
			}
			Infix::Assignment(op) =>
			{
				if let Some(Token::Ampersand) = peek(tokens)
				{
					// Assignment by reference.
					tokens.pop_front();
				}
				tokens.descend()?;
				let value = parse_binary(precedence, tokens);
				tokens.ascend();
				let value = value?;
				height = std::cmp::max(height, value.height()) + 1;
				let location =
					expression.location().clone().combined_with(value.location());
				Expression::Assignment {
					op,
					target: Box::new(expression),
					value: Box::new(value),
					location,
				}
			}
		};
		tokens.check_height(height)?;
	}
}

fn parse_unary_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let op = match peek(tokens)
	{
		Some(Token::Exclamation) => UnaryOp::BooleanNot,
		Some(Token::Minus) => UnaryOp::Minus,
		Some(Token::Plus) => UnaryOp::Plus,
		Some(Token::Tilde) => UnaryOp::BitwiseNot,
		Some(Token::Cast(_)) =>
		{
			let (token, location_of_cast) = extract("expected cast", tokens)?;
			let cast_type = match token
			{
				Token::Cast(cast_type) => cast_type,
				_ => unreachable!(),
			};
			let expression = parse_operand_of_unary(tokens)?;
			let location = location_of_cast.combined_with(expression.location());
			return Ok(Expression::Cast {
				cast_type,
				expression: Box::new(expression),
				location,
			});
		}
		_ => return parse_power(tokens),
	};
	tokens.pop_front();
	let location_of_op = tokens.last_location.clone();
	let expression = parse_operand_of_unary(tokens)?;
	let location = location_of_op.clone().combined_with(expression.location());
	Ok(Expression::Unary {
		op,
		expression: Box::new(expression),
		location,
		location_of_op,
	})
}

fn parse_operand_of_unary(tokens: &mut Tokens) -> Result<Expression, Error>
{
	tokens.descend()?;
	let result = parse_unary_expression(tokens);
	tokens.ascend();
	result
}

/// Exponentiation is right associative and binds tighter than unary minus.
fn parse_power(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let base = parse_postfix_expression(tokens)?;
	match peek(tokens)
	{
		Some(Token::Power) => (),
		_ => return Ok(base),
	}
	tokens.pop_front();
	let location_of_op = tokens.last_location.clone();
	let exponent = parse_operand_of_unary(tokens)?;
	let location = base.location().clone().combined_with(exponent.location());
	Ok(Expression::Binary {
		op: BinaryOp::Power,
		left: Box::new(base),
		right: Box::new(exponent),
		location,
		location_of_op,
	})
}

fn parse_postfix_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let mut expression = parse_primary_expression(tokens)?;
	let mut height = expression.height();
	loop
	{
		match peek(tokens)
		{
			Some(Token::Arrow) =>
			{
				tokens.pop_front();
				let name = extract_identifier("expected member name", tokens)?;
				if let Some(Token::ParenLeft) = peek(tokens)
				{
					let arguments = parse_arguments(tokens)?;
					let location = expression
						.location()
						.clone()
						.combined_with(&tokens.last_location);
					expression = Expression::MethodCall {
						object: Box::new(expression),
						method: name,
						arguments,
						location,
					};
				}
				else
				{
					let location =
						expression.location().clone().combined_with(&name.location);
					expression = Expression::PropertyFetch {
						object: Box::new(expression),
						property: name,
						location,
					};
				}
			}
			Some(Token::BracketLeft) =>
			{
				tokens.pop_front();
				let index = match peek(tokens)
				{
					Some(Token::BracketRight) => None,
					_ => Some(Box::new(parse_expression(tokens)?)),
				};
				consume(Token::BracketRight, "expected right bracket", tokens)?;
				let location = expression
					.location()
					.clone()
					.combined_with(&tokens.last_location);
				expression = Expression::ArrayAccess {
					array: Box::new(expression),
					index,
					location,
				};
			}
			_ => return Ok(expression),
		}
		height += 1;
		tokens.check_height(height)?;
	}
}

fn parse_primary_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	// A missing operand is recorded but does not derail the statement.
	match peek(tokens)
	{
		Some(Token::Semicolon)
		| Some(Token::ParenRight)
		| Some(Token::BracketRight)
		| Some(Token::Comma)
		| Some(Token::CloseTag) =>
		{
			let location = tokens.start_location_span().unwrap_or_default();
			tokens.errors.push(Error::UnexpectedToken {
				expectation: "expected expression".to_string(),
				location: location.clone(),
			});
			return Ok(Expression::Invalid { location });
		}
		_ => (),
	}

	let (token, location) = extract("expected expression", tokens)?;
	match token
	{
		Token::Integer(value) => Ok(Expression::Literal {
			literal: Literal::Integer(value),
			location,
		}),
		Token::Float(value) => Ok(Expression::Literal {
			literal: Literal::Float(value),
			location,
		}),
		Token::Bool(value) => Ok(Expression::Literal {
			literal: Literal::Bool(value),
			location,
		}),
		Token::Null => Ok(Expression::Literal {
			literal: Literal::Null,
			location,
		}),
		Token::StringLiteral {
			value,
			is_interpolated: false,
		} => Ok(Expression::Literal {
			literal: Literal::String(value),
			location,
		}),
		Token::StringLiteral {
			is_interpolated: true,
			..
		} => Ok(Expression::InterpolatedString { location }),
		Token::Variable(name) => Ok(Expression::Variable { name, location }),
		Token::ParenLeft =>
		{
			let expression = parse_expression(tokens)?;
			consume(Token::ParenRight, "expected right parenthesis", tokens)?;
			Ok(expression)
		}
		Token::BracketLeft =>
		{
			let elements = parse_rest_of_array(Token::BracketRight, tokens)?;
			Ok(Expression::Array {
				elements,
				syntax: ArraySyntax::Short,
				location: location.combined_with(&tokens.last_location),
			})
		}
		Token::New =>
		{
			let class = match peek(tokens)
			{
				Some(Token::Static) =>
				{
					let (_, location) = extract("expected class name", tokens)?;
					Identifier {
						name: "static".to_string(),
						location,
					}
				}
				_ => extract_identifier("expected class name", tokens)?,
			};
			let arguments = match peek(tokens)
			{
				Some(Token::ParenLeft) => parse_arguments(tokens)?,
				_ => Vec::new(),
			};
			Ok(Expression::New {
				class,
				arguments,
				location: location.combined_with(&tokens.last_location),
			})
		}
		Token::Static =>
		{
			let name = Identifier {
				name: "static".to_string(),
				location,
			};
			parse_rest_of_name(name, tokens)
		}
		Token::Identifier(name) =>
		{
			let is_array = name.eq_ignore_ascii_case("array")
				&& peek(tokens) == Some(&Token::ParenLeft);
			if is_array
			{
				tokens.pop_front();
				let elements = parse_rest_of_array(Token::ParenRight, tokens)?;
				return Ok(Expression::Array {
					elements,
					syntax: ArraySyntax::Long,
					location: location.combined_with(&tokens.last_location),
				});
			}
			parse_rest_of_name(Identifier { name, location }, tokens)
		}
		_ => Err(Error::UnexpectedToken {
			expectation: "expected expression".to_string(),
			location,
		}),
	}
}

/// Parses what follows a bare name: a call, a static member or nothing.
fn parse_rest_of_name(
	name: Identifier,
	tokens: &mut Tokens,
) -> Result<Expression, Error>
{
	match peek(tokens)
	{
		Some(Token::ParenLeft) =>
		{
			let arguments = parse_arguments(tokens)?;
			let location = name.location.clone().combined_with(&tokens.last_location);
			Ok(Expression::FunctionCall {
				name,
				arguments,
				location,
			})
		}
		Some(Token::DoubleColon) =>
		{
			tokens.pop_front();
			let member = extract_identifier("expected static member", tokens)?;
			if let Some(Token::ParenLeft) = peek(tokens)
			{
				let arguments = parse_arguments(tokens)?;
				let location =
					name.location.clone().combined_with(&tokens.last_location);
				Ok(Expression::StaticCall {
					class: name,
					method: member,
					arguments,
					location,
				})
			}
			else
			{
				let location = name.location.combined_with(&member.location);
				Ok(Expression::ConstantFetch {
					name: format!("{}::{}", name.name, member.name),
					location,
				})
			}
		}
		_ => Ok(Expression::ConstantFetch {
			name: name.name,
			location: name.location,
		}),
	}
}

fn parse_arguments(tokens: &mut Tokens) -> Result<Vec<Expression>, Error>
{
	consume(Token::ParenLeft, "expected argument list", tokens)?;

	let mut arguments = Vec::new();

	loop
	{
		if let Some(Token::ParenRight) = peek(tokens)
		{
			break;
		}

		let expression = parse_expression(tokens)?;
		arguments.push(expression);

		if let Some(Token::Comma) = peek(tokens)
		{
			tokens.pop_front();
		}
		else
		{
			break;
		}
	}

	consume(
		Token::ParenRight,
		"expected comma or right parenthesis",
		tokens,
	)?;

	Ok(arguments)
}

fn parse_rest_of_array(
	closing_token: Token,
	tokens: &mut Tokens,
) -> Result<Vec<ArrayItem>, Error>
{
	let mut elements = Vec::new();

	loop
	{
		if peek(tokens) == Some(&closing_token)
		{
			break;
		}

		let first = parse_expression(tokens)?;
		let element = match peek(tokens)
		{
			Some(Token::DoubleArrow) =>
			{
				tokens.pop_front();
				ArrayItem {
					key: Some(first),
					value: parse_expression(tokens)?,
				}
			}
			_ => ArrayItem {
				key: None,
				value: first,
			},
		};
		elements.push(element);

		if let Some(Token::Comma) = peek(tokens)
		{
			tokens.pop_front();
		}
		else
		{
			break;
		}
	}

	consume(closing_token, "expected comma or end of array", tokens)?;

	Ok(elements)
}

#[cfg(test)]
mod tests
{
	use super::*;

	use crate::lexer;

	use pretty_assertions::assert_eq;

	fn parse_source(source: &str) -> (Vec<Statement>, Vec<Error>)
	{
		parse(lexer::lex(source, "test.php"))
	}

	#[test]
	fn parse_precedence()
	{
		let (statements, errors) = parse_source("<?php 1 + 2 * 3 ** 2;");
		assert!(errors.is_empty());
		match &statements[..]
		{
			[Statement::Expression {
				expression:
					Expression::Binary {
						op: BinaryOp::Add,
						right,
						..
					},
				..
			}] => match right.as_ref()
			{
				Expression::Binary {
					op: BinaryOp::Multiply,
					right,
					..
				} => assert_eq!(right.kind(), NodeKind::Power),
				other => panic!("unexpected {:?}", other),
			},
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn parse_assignment_below_logical_keywords()
	{
		let (statements, errors) = parse_source("<?php $a = true and false;");
		assert!(errors.is_empty());
		match &statements[..]
		{
			[Statement::Expression {
				expression:
					Expression::Binary {
						op: BinaryOp::LogicalAnd,
						left,
						..
					},
				..
			}] => assert_eq!(left.kind(), NodeKind::Assignment),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn parse_associativity()
	{
		let (statements, errors) =
			parse_source("<?php 1 - 2 - 3; $a = $b .= 'c'; 2 ** 3 ** 2;");
		assert!(errors.is_empty());
		match &statements[..]
		{
			[Statement::Expression {
				expression: Expression::Binary { left: subtraction, .. },
				..
			}, Statement::Expression {
				expression: Expression::Assignment { op: None, value, .. },
				..
			}, Statement::Expression {
				expression: Expression::Binary { right: exponent, .. },
				..
			}] =>
			{
				assert_eq!(subtraction.kind(), NodeKind::Subtract);
				match value.as_ref()
				{
					Expression::Assignment {
						op: Some(BinaryOp::Concat),
						..
					} => (),
					other => panic!("unexpected {:?}", other),
				}
				assert_eq!(exponent.kind(), NodeKind::Power);
			}
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn measure_chains_by_height()
	{
		let (statements, errors) = parse_source("<?php 1 + 2 * 3 - $a->b()[0];");
		assert!(errors.is_empty());
		match &statements[..]
		{
			[Statement::Expression { expression, .. }] =>
			{
				assert_eq!(expression.height(), 4)
			}
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn attach_doc_comments_to_methods()
	{
		let source = "<?php\nclass A {\n\t/** @test */\n\tpublic function \
		              testFoo() {}\n\tprivate $x = 1;\n}\n";
		let (statements, errors) = parse_source(source);
		assert!(errors.is_empty(), "{:?}", errors);
		match &statements[..]
		{
			[Statement::Class(class)] =>
			{
				assert_eq!(class.methods.len(), 1);
				let method = &class.methods[0];
				assert_eq!(method.name.name, "testFoo");
				assert!(method.flags.contains(MethodFlag::Public));
				let doc_comment = method.doc_comment.as_ref().unwrap();
				assert_eq!(doc_comment.text, "/** @test */");
				assert_eq!(method.name.location.line_start, 4);
			}
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn desugar_elseif()
	{
		let source = "<?php if ($a) { } elseif ($b) { } else { echo 1; }";
		let (statements, errors) = parse_source(source);
		assert!(errors.is_empty());
		match &statements[..]
		{
			[Statement::If {
				else_branch: Some(else_branch),
				..
			}] => assert_eq!(else_branch.kind(), NodeKind::If),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn recover_from_missing_operand()
	{
		let (statements, errors) = parse_source("<?php $a = 1 + ;\necho 2;");
		assert_eq!(errors.len(), 1);
		assert_eq!(statements.len(), 2);
		match &statements[0]
		{
			Statement::Expression {
				expression: Expression::Assignment { value, .. },
				..
			} => match value.as_ref()
			{
				Expression::Binary { right, .. } =>
				{
					assert_eq!(right.kind(), NodeKind::InvalidExpression)
				}
				other => panic!("unexpected {:?}", other),
			},
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn recover_from_invalid_statement()
	{
		let (statements, errors) = parse_source("<?php echo 1 2;\necho 3;");
		assert_eq!(errors.len(), 1);
		assert_eq!(statements.len(), 2);
		assert_eq!(statements[0].kind(), NodeKind::InvalidStatement);
		assert_eq!(statements[1].kind(), NodeKind::Echo);
	}
}
