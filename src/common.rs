//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

//! The abstract syntax tree produced by the parser.

pub use crate::lexer::CastType;
pub use crate::lexer::Location;

use enumset::{EnumSet, EnumSetType};

/// The concrete kind of a node, used to route nodes to analyzer passes.
#[derive(Debug, Hash, EnumSetType)]
pub enum NodeKind
{
	Literal,
	Variable,
	ConstantFetch,
	Assignment,
	Cast,
	Array,
	FunctionCall,
	MethodCall,
	StaticCall,
	New,
	PropertyFetch,
	ArrayAccess,
	InterpolatedString,
	InvalidExpression,

	// One kind per operator.
	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
	Power,
	Concat,
	BitwiseAnd,
	BitwiseOr,
	BitwiseXor,
	ShiftLeft,
	ShiftRight,
	BooleanAnd,
	BooleanOr,
	LogicalAnd,
	LogicalOr,
	LogicalXor,
	Equal,
	NotEqual,
	Identical,
	NotIdentical,
	Smaller,
	SmallerOrEqual,
	Greater,
	GreaterOrEqual,
	Spaceship,
	UnaryMinus,
	UnaryPlus,
	BooleanNot,
	BitwiseNot,

	ExpressionStatement,
	Echo,
	Return,
	If,
	While,
	Block,
	InlineHtml,
	Function,
	Class,
	ClassMethod,
	ConstantDeclaration,
	InvalidStatement,
}

impl NodeKind
{
	pub fn arithmetic() -> EnumSet<NodeKind>
	{
		NodeKind::Add
			| NodeKind::Subtract
			| NodeKind::Multiply
			| NodeKind::Divide
			| NodeKind::Modulo
			| NodeKind::Power
	}

	pub fn comparisons() -> EnumSet<NodeKind>
	{
		NodeKind::Equal
			| NodeKind::NotEqual
			| NodeKind::Identical
			| NodeKind::NotIdentical
			| NodeKind::Smaller
			| NodeKind::SmallerOrEqual
			| NodeKind::Greater
			| NodeKind::GreaterOrEqual
			| NodeKind::Spaceship
	}
}

#[derive(Debug, Clone)]
pub struct DocComment
{
	pub text: String,
	pub location: Location,
}

#[derive(Debug, Clone)]
pub struct Identifier
{
	pub name: String,
	pub location: Location,
}

#[derive(Debug, Clone)]
pub enum Statement
{
	Expression
	{
		expression: Expression,
		location: Location,
	},
	Echo
	{
		expressions: Vec<Expression>,
		location: Location,
	},
	Return
	{
		value: Option<Expression>,
		location: Location,
	},
	If
	{
		condition: Expression,
		then_branch: Box<Statement>,
		else_branch: Option<Box<Statement>>,
		location: Location,
	},
	While
	{
		condition: Expression,
		body: Box<Statement>,
		location: Location,
	},
	Block(Block),
	InlineHtml
	{
		location: Location,
	},
	Function(Function),
	Class(Class),
	Constant
	{
		name: Identifier,
		value: Expression,
		location: Location,
	},
	Invalid
	{
		location: Location,
	},
}

impl Statement
{
	pub fn kind(&self) -> NodeKind
	{
		match self
		{
			Statement::Expression { .. } => NodeKind::ExpressionStatement,
			Statement::Echo { .. } => NodeKind::Echo,
			Statement::Return { .. } => NodeKind::Return,
			Statement::If { .. } => NodeKind::If,
			Statement::While { .. } => NodeKind::While,
			Statement::Block(_) => NodeKind::Block,
			Statement::InlineHtml { .. } => NodeKind::InlineHtml,
			Statement::Function(_) => NodeKind::Function,
			Statement::Class(_) => NodeKind::Class,
			Statement::Constant { .. } => NodeKind::ConstantDeclaration,
			Statement::Invalid { .. } => NodeKind::InvalidStatement,
		}
	}

	pub fn location(&self) -> &Location
	{
		match self
		{
			Statement::Expression { location, .. } => location,
			Statement::Echo { location, .. } => location,
			Statement::Return { location, .. } => location,
			Statement::If { location, .. } => location,
			Statement::While { location, .. } => location,
			Statement::Block(block) => &block.location,
			Statement::InlineHtml { location } => location,
			Statement::Function(function) => &function.location,
			Statement::Class(class) => &class.location,
			Statement::Constant { location, .. } => location,
			Statement::Invalid { location } => location,
		}
	}
}

#[derive(Debug, Clone)]
pub struct Block
{
	pub statements: Vec<Statement>,
	pub location: Location,
}

#[derive(Debug, Clone)]
pub struct Parameter
{
	pub name: String,
	pub default: Option<Expression>,
	pub location: Location,
}

#[derive(Debug, Clone)]
pub struct Function
{
	pub name: Identifier,
	pub parameters: Vec<Parameter>,
	pub body: Block,
	pub doc_comment: Option<DocComment>,
	pub location: Location,
}

#[derive(Debug, EnumSetType)]
pub enum ClassFlag
{
	Abstract,
	Final,
}

#[derive(Debug, Clone)]
pub struct Class
{
	pub name: Identifier,
	pub parent: Option<Identifier>,
	pub flags: EnumSet<ClassFlag>,
	pub methods: Vec<Method>,
	pub doc_comment: Option<DocComment>,
	pub location: Location,
}

#[derive(Debug, EnumSetType)]
pub enum MethodFlag
{
	Public,
	Protected,
	Private,
	Static,
	Abstract,
	Final,
}

#[derive(Debug, Clone)]
pub struct Method
{
	pub name: Identifier,
	pub parameters: Vec<Parameter>,
	pub body: Option<Block>,
	pub flags: EnumSet<MethodFlag>,
	pub doc_comment: Option<DocComment>,
	pub location: Location,
}

#[derive(Debug, Clone)]
pub enum Expression
{
	Literal
	{
		literal: Literal,
		location: Location,
	},
	Variable
	{
		name: String,
		location: Location,
	},
	ConstantFetch
	{
		name: String,
		location: Location,
	},
	Assignment
	{
		op: Option<BinaryOp>,
		target: Box<Expression>,
		value: Box<Expression>,
		location: Location,
	},
	Binary
	{
		op: BinaryOp,
		left: Box<Expression>,
		right: Box<Expression>,
		location: Location,
		location_of_op: Location,
	},
	Unary
	{
		op: UnaryOp,
		expression: Box<Expression>,
		location: Location,
		location_of_op: Location,
	},
	Cast
	{
		cast_type: CastType,
		expression: Box<Expression>,
		location: Location,
	},
	Array
	{
		elements: Vec<ArrayItem>,
		syntax: ArraySyntax,
		location: Location,
	},
	FunctionCall
	{
		name: Identifier,
		arguments: Vec<Expression>,
		location: Location,
	},
	MethodCall
	{
		object: Box<Expression>,
		method: Identifier,
		arguments: Vec<Expression>,
		location: Location,
	},
	StaticCall
	{
		class: Identifier,
		method: Identifier,
		arguments: Vec<Expression>,
		location: Location,
	},
	New
	{
		class: Identifier,
		arguments: Vec<Expression>,
		location: Location,
	},
	PropertyFetch
	{
		object: Box<Expression>,
		property: Identifier,
		location: Location,
	},
	ArrayAccess
	{
		array: Box<Expression>,
		index: Option<Box<Expression>>,
		location: Location,
	},
	InterpolatedString
	{
		location: Location,
	},
	Invalid
	{
		location: Location,
	},
}

impl Expression
{
	/// Whether the expression can appear on the left of an assignment.
	pub fn is_assignable(&self) -> bool
	{
		match self
		{
			Expression::Variable { .. } => true,
			Expression::PropertyFetch { .. } => true,
			Expression::ArrayAccess { .. } => true,
			_ => false,
		}
	}

	pub fn kind(&self) -> NodeKind
	{
		match self
		{
			Expression::Literal { .. } => NodeKind::Literal,
			Expression::Variable { .. } => NodeKind::Variable,
			Expression::ConstantFetch { .. } => NodeKind::ConstantFetch,
			Expression::Assignment { .. } => NodeKind::Assignment,
			Expression::Binary { op, .. } => op.kind(),
			Expression::Unary { op, .. } => op.kind(),
			Expression::Cast { .. } => NodeKind::Cast,
			Expression::Array { .. } => NodeKind::Array,
			Expression::FunctionCall { .. } => NodeKind::FunctionCall,
			Expression::MethodCall { .. } => NodeKind::MethodCall,
			Expression::StaticCall { .. } => NodeKind::StaticCall,
			Expression::New { .. } => NodeKind::New,
			Expression::PropertyFetch { .. } => NodeKind::PropertyFetch,
			Expression::ArrayAccess { .. } => NodeKind::ArrayAccess,
			Expression::InterpolatedString { .. } =>
			{
				NodeKind::InterpolatedString
			}
			Expression::Invalid { .. } => NodeKind::InvalidExpression,
		}
	}

	/// The number of nodes on the longest path from this node to a leaf.
	pub fn height(&self) -> usize
	{
		let children = |expressions: &[Expression]| {
			expressions.iter().map(|x| x.height()).max().unwrap_or(0)
		};
		let below = match self
		{
			Expression::Literal { .. } => 0,
			Expression::Variable { .. } => 0,
			Expression::ConstantFetch { .. } => 0,
			Expression::InterpolatedString { .. } => 0,
			Expression::Invalid { .. } => 0,
			Expression::Assignment { target, value, .. } =>
			{
				std::cmp::max(target.height(), value.height())
			}
			Expression::Binary { left, right, .. } =>
			{
				std::cmp::max(left.height(), right.height())
			}
			Expression::Unary { expression, .. } => expression.height(),
			Expression::Cast { expression, .. } => expression.height(),
			Expression::Array { elements, .. } => elements
				.iter()
				.map(|element| {
					let key = element.key.as_ref().map_or(0, |x| x.height());
					std::cmp::max(key, element.value.height())
				})
				.max()
				.unwrap_or(0),
			Expression::FunctionCall { arguments, .. } => children(arguments),
			Expression::StaticCall { arguments, .. } => children(arguments),
			Expression::New { arguments, .. } => children(arguments),
			Expression::MethodCall {
				object, arguments, ..
			} => std::cmp::max(object.height(), children(arguments)),
			Expression::PropertyFetch { object, .. } => object.height(),
			Expression::ArrayAccess { array, index, .. } =>
			{
				let index = index.as_ref().map_or(0, |x| x.height());
				std::cmp::max(array.height(), index)
			}
		};
		below + 1
	}

	pub fn location(&self) -> &Location
	{
		match self
		{
			Expression::Literal { location, .. } => location,
			Expression::Variable { location, .. } => location,
			Expression::ConstantFetch { location, .. } => location,
			Expression::Assignment { location, .. } => location,
			Expression::Binary { location, .. } => location,
			Expression::Unary { location, .. } => location,
			Expression::Cast { location, .. } => location,
			Expression::Array { location, .. } => location,
			Expression::FunctionCall { location, .. } => location,
			Expression::MethodCall { location, .. } => location,
			Expression::StaticCall { location, .. } => location,
			Expression::New { location, .. } => location,
			Expression::PropertyFetch { location, .. } => location,
			Expression::ArrayAccess { location, .. } => location,
			Expression::InterpolatedString { location } => location,
			Expression::Invalid { location } => location,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal
{
	Integer(i64),
	Float(f64),
	String(String),
	Bool(bool),
	Null,
}

#[derive(Debug, Clone)]
pub struct ArrayItem
{
	pub key: Option<Expression>,
	pub value: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySyntax
{
	/// `array(...)`
	Long,
	/// `[...]`
	Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp
{
	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
	Power,
	Concat,
	BitwiseAnd,
	BitwiseOr,
	BitwiseXor,
	ShiftLeft,
	ShiftRight,
	BooleanAnd,
	BooleanOr,
	LogicalAnd,
	LogicalOr,
	LogicalXor,
	Equal,
	NotEqual,
	Identical,
	NotIdentical,
	Smaller,
	SmallerOrEqual,
	Greater,
	GreaterOrEqual,
	Spaceship,
}

impl BinaryOp
{
	pub fn kind(&self) -> NodeKind
	{
		match self
		{
			BinaryOp::Add => NodeKind::Add,
			BinaryOp::Subtract => NodeKind::Subtract,
			BinaryOp::Multiply => NodeKind::Multiply,
			BinaryOp::Divide => NodeKind::Divide,
			BinaryOp::Modulo => NodeKind::Modulo,
			BinaryOp::Power => NodeKind::Power,
			BinaryOp::Concat => NodeKind::Concat,
			BinaryOp::BitwiseAnd => NodeKind::BitwiseAnd,
			BinaryOp::BitwiseOr => NodeKind::BitwiseOr,
			BinaryOp::BitwiseXor => NodeKind::BitwiseXor,
			BinaryOp::ShiftLeft => NodeKind::ShiftLeft,
			BinaryOp::ShiftRight => NodeKind::ShiftRight,
			BinaryOp::BooleanAnd => NodeKind::BooleanAnd,
			BinaryOp::BooleanOr => NodeKind::BooleanOr,
			BinaryOp::LogicalAnd => NodeKind::LogicalAnd,
			BinaryOp::LogicalOr => NodeKind::LogicalOr,
			BinaryOp::LogicalXor => NodeKind::LogicalXor,
			BinaryOp::Equal => NodeKind::Equal,
			BinaryOp::NotEqual => NodeKind::NotEqual,
			BinaryOp::Identical => NodeKind::Identical,
			BinaryOp::NotIdentical => NodeKind::NotIdentical,
			BinaryOp::Smaller => NodeKind::Smaller,
			BinaryOp::SmallerOrEqual => NodeKind::SmallerOrEqual,
			BinaryOp::Greater => NodeKind::Greater,
			BinaryOp::GreaterOrEqual => NodeKind::GreaterOrEqual,
			BinaryOp::Spaceship => NodeKind::Spaceship,
		}
	}

	pub fn symbol(&self) -> &'static str
	{
		match self
		{
			BinaryOp::Add => "+",
			BinaryOp::Subtract => "-",
			BinaryOp::Multiply => "*",
			BinaryOp::Divide => "/",
			BinaryOp::Modulo => "%",
			BinaryOp::Power => "**",
			BinaryOp::Concat => ".",
			BinaryOp::BitwiseAnd => "&",
			BinaryOp::BitwiseOr => "|",
			BinaryOp::BitwiseXor => "^",
			BinaryOp::ShiftLeft => "<<",
			BinaryOp::ShiftRight => ">>",
			BinaryOp::BooleanAnd => "&&",
			BinaryOp::BooleanOr => "||",
			BinaryOp::LogicalAnd => "and",
			BinaryOp::LogicalOr => "or",
			BinaryOp::LogicalXor => "xor",
			BinaryOp::Equal => "==",
			BinaryOp::NotEqual => "!=",
			BinaryOp::Identical => "===",
			BinaryOp::NotIdentical => "!==",
			BinaryOp::Smaller => "<",
			BinaryOp::SmallerOrEqual => "<=",
			BinaryOp::Greater => ">",
			BinaryOp::GreaterOrEqual => ">=",
			BinaryOp::Spaceship => "<=>",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp
{
	Minus,
	Plus,
	BooleanNot,
	BitwiseNot,
}

impl UnaryOp
{
	pub fn kind(&self) -> NodeKind
	{
		match self
		{
			UnaryOp::Minus => NodeKind::UnaryMinus,
			UnaryOp::Plus => NodeKind::UnaryPlus,
			UnaryOp::BooleanNot => NodeKind::BooleanNot,
			UnaryOp::BitwiseNot => NodeKind::BitwiseNot,
		}
	}
}
