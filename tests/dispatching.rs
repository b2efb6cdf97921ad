//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use phpsa::analyzer::{Node, Pass};
use phpsa::common::{NodeKind, Statement};
use phpsa::context::{Context, Severity};
use phpsa::dispatcher::Dispatcher;
use phpsa::evaluator::Evaluator;
use phpsa::*;

use std::cell::RefCell;
use std::rc::Rc;

use enumset::EnumSet;
use pretty_assertions::assert_eq;

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder
{
	name: &'static str,
	kinds: EnumSet<NodeKind>,
	log: Log,
	reports: bool,
}

impl Pass for Recorder
{
	fn name(&self) -> &'static str
	{
		self.name
	}

	fn registered_kinds(&self) -> EnumSet<NodeKind>
	{
		self.kinds
	}

	fn run(&mut self, node: Node, context: &mut Context) -> bool
	{
		self.log
			.borrow_mut()
			.push(format!("{} {:?}", self.name, node.kind()));
		if self.reports
		{
			context.report(self.name, Severity::Notice, "seen", node.location())
		}
		else
		{
			false
		}
	}
}

fn recorder(
	name: &'static str,
	kinds: EnumSet<NodeKind>,
	log: &Log,
	reports: bool,
) -> Box<dyn Pass>
{
	Box::new(Recorder {
		name,
		kinds,
		log: log.clone(),
		reports,
	})
}

fn run(source: &str, dispatcher: &mut Dispatcher) -> Context
{
	let (statements, errors) = parser::parse(lexer::lex(source, "test.php"));
	assert!(errors.is_empty(), "unexpected {:?}", errors);
	let mut context = Context::new();
	let mut evaluator = Evaluator::new(dispatcher, &mut context);
	evaluator.run(&statements);
	context
}

#[test]
fn dispatch_exact_kind()
{
	let log = Log::default();
	let mut dispatcher = Dispatcher::new();
	dispatcher.add(recorder("a", EnumSet::only(NodeKind::Literal), &log, false));
	run("<?php echo 1 + 2;", &mut dispatcher);
	assert_eq!(*log.borrow(), vec!["a Literal", "a Literal"]);
}

#[test]
fn dispatch_nothing_without_registration()
{
	let mut dispatcher = Dispatcher::new();
	assert!(dispatcher.is_empty());
	let context = run("<?php echo 1 / 0;", &mut dispatcher);
	// Hazards are reported by the evaluator itself.
	assert_eq!(context.issues().len(), 1);
}

#[test]
fn dispatch_in_registration_order()
{
	let log = Log::default();
	let kinds = NodeKind::Echo | NodeKind::Literal;
	let mut dispatcher = Dispatcher::new();
	dispatcher.add(recorder("first", kinds, &log, false));
	dispatcher.add(recorder("second", EnumSet::only(NodeKind::Echo), &log, false));
	dispatcher.add(recorder("third", kinds, &log, false));
	run("<?php echo 1;", &mut dispatcher);
	assert_eq!(
		*log.borrow(),
		vec![
			"first Literal",
			"third Literal",
			"first Echo",
			"second Echo",
			"third Echo",
		]
	);
}

#[test]
fn dispatch_independently()
{
	let log = Log::default();
	let kinds = EnumSet::only(NodeKind::FunctionCall);
	let mut dispatcher = Dispatcher::new();
	dispatcher.add(recorder("loud", kinds, &log, true));
	dispatcher.add(recorder("quiet", kinds, &log, false));
	dispatcher.add(recorder("other", kinds, &log, true));
	let context = run("<?php foo();", &mut dispatcher);
	assert_eq!(log.borrow().len(), 3);
	let codes: Vec<&str> =
		context.issues().iter().map(|x| x.code.as_str()).collect();
	assert_eq!(codes, vec!["loud", "other"]);
}

#[test]
fn dispatch_registered_kind_only()
{
	let log = Log::default();
	let mut dispatcher = Dispatcher::new();
	dispatcher.register(
		NodeKind::ClassMethod,
		recorder("methods", EnumSet::only(NodeKind::Literal), &log, false),
	);
	run("<?php class A { function f() { return 1; } }", &mut dispatcher);
	assert_eq!(*log.borrow(), vec!["methods ClassMethod"]);
}

#[test]
fn dispatch_operators_by_kind()
{
	let log = Log::default();
	let mut dispatcher = Dispatcher::new();
	dispatcher.add(recorder("division", EnumSet::only(NodeKind::Divide), &log, false));
	dispatcher.add(recorder("comparison", NodeKind::comparisons(), &log, false));
	dispatcher.add(recorder("arithmetic", NodeKind::arithmetic(), &log, false));
	dispatcher.add(recorder("negation", EnumSet::only(NodeKind::BooleanNot), &log, false));
	run("<?php echo !(1 / 2 < 3 . 'a');", &mut dispatcher);
	assert_eq!(
		*log.borrow(),
		vec![
			"division Divide",
			"arithmetic Divide",
			"comparison Smaller",
			"negation BooleanNot",
		]
	);
}

#[test]
fn report_only_new_issues()
{
	let (statements, errors) =
		parser::parse(lexer::lex("<?php join(',', $a);", "test.php"));
	assert!(errors.is_empty());
	let expression = match &statements[0]
	{
		Statement::Expression { expression, .. } => expression,
		other => panic!("unexpected {:?}", other),
	};
	let node = Node::Expression {
		expression,
		operands: &[],
	};
	let mut passes = analyzer::all();
	let pass = passes
		.iter_mut()
		.find(|pass| pass.name() == "alias_check")
		.unwrap();
	let mut context = Context::new();
	assert!(pass.run(node, &mut context));
	assert!(!pass.run(node, &mut context));
	assert_eq!(context.issues().len(), 1);
}
