//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{Node, Pass, PassConfiguration};

use crate::common::NodeKind;
use crate::context::{Context, Severity};
use crate::docblock::DocBlock;

use enumset::EnumSet;

/// Flags `@test` annotations on methods that PHPUnit already recognizes as
/// tests by their `test` prefix.
pub struct TestAnnotation;

impl Pass for TestAnnotation
{
	fn name(&self) -> &'static str
	{
		"test_annotation"
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
		if !method.name.name.starts_with("test")
		{
			return false;
		}
		let doc_comment = match &method.doc_comment
		{
			Some(doc_comment) => doc_comment,
			None => return false,
		};
		if !DocBlock::parse(&doc_comment.text).has_tag("test")
		{
			return false;
		}
		context.report(
			"test.annotation",
			Severity::Notice,
			"Annotation @test is not needed when the method is prefixed \
			 with test.",
			&method.name.location,
		)
	}

	fn configuration(&self) -> Option<PassConfiguration>
	{
		Some(PassConfiguration::can_be_disabled())
	}
}
