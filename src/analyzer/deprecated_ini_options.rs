//
// Part of phpsa
// Copyright (c) 2023 The phpsa developers
// License: MIT
//

use super::{function_name, Node, Pass, PassConfiguration};

use crate::common::*;
use crate::context::{Context, Severity};

use enumset::EnumSet;

const INI_FUNCTIONS: &[&str] = &["ini_set", "ini_get", "ini_alter", "ini_restore"];

#[derive(Debug, Clone, Copy)]
enum Status
{
	Deprecated,
	Removed,
}

const OPTIONS: &[(&str, Status, &str)] = &[
	("define_syslog_variables", Status::Removed, "5.4"),
	("register_globals", Status::Removed, "5.4"),
	("register_long_arrays", Status::Removed, "5.4"),
	("safe_mode", Status::Removed, "5.4"),
	("safe_mode_gid", Status::Removed, "5.4"),
	("safe_mode_include_dir", Status::Removed, "5.4"),
	("safe_mode_exec_dir", Status::Removed, "5.4"),
	("safe_mode_allowed_env_vars", Status::Removed, "5.4"),
	("safe_mode_protected_env_vars", Status::Removed, "5.4"),
	("magic_quotes_gpc", Status::Removed, "5.4"),
	("magic_quotes_runtime", Status::Removed, "5.4"),
	("magic_quotes_sybase", Status::Removed, "5.4"),
	("allow_call_time_pass_reference", Status::Removed, "5.4"),
	("highlight.bg", Status::Removed, "5.4"),
	("session.bug_compat_42", Status::Removed, "5.4"),
	("session.bug_compat_warn", Status::Removed, "5.4"),
	("y2k_compliance", Status::Removed, "5.4"),
	("zend.ze1_compatibility_mode", Status::Removed, "5.3"),
	("iconv.input_encoding", Status::Deprecated, "5.6"),
	("iconv.output_encoding", Status::Deprecated, "5.6"),
	("iconv.internal_encoding", Status::Deprecated, "5.6"),
	("mbstring.http_input", Status::Deprecated, "5.6"),
	("mbstring.http_output", Status::Deprecated, "5.6"),
	("mbstring.internal_encoding", Status::Deprecated, "5.6"),
	("asp_tags", Status::Removed, "7.0"),
	("always_populate_raw_post_data", Status::Removed, "7.0"),
	("xsl.security_prefs", Status::Removed, "7.0"),
	("mbstring.func_overload", Status::Deprecated, "7.2"),
	("track_errors", Status::Deprecated, "7.2"),
];

/// Reports ini directives that no longer have an effect, when the name of
/// the directive folds to a known string.
pub struct DeprecatedIniOptions;

impl Pass for DeprecatedIniOptions
{
	fn name(&self) -> &'static str
	{
		"deprecated_ini_options"
	}

	fn registered_kinds(&self) -> EnumSet<NodeKind>
	{
		EnumSet::only(NodeKind::FunctionCall)
	}

	fn run(&mut self, node: Node, context: &mut Context) -> bool
	{
		let (name, location, operands) = match node
		{
			Node::Expression {
				expression: Expression::FunctionCall { name, location, .. },
				operands,
			} => (name, location, operands),
			_ => return false,
		};
		if !INI_FUNCTIONS.contains(&function_name(name).as_str())
		{
			return false;
		}
		let option = match operands.first().and_then(|x| x.as_str())
		{
			Some(option) => option,
			None => return false,
		};
		let (status, version) =
			match OPTIONS.iter().find(|(name, _, _)| *name == option)
			{
				Some((_, status, version)) => (status, version),
				None => return false,
			};
		let message = match status
		{
			Status::Deprecated => format!(
				"Ini option {} is deprecated since PHP {}.",
				option, version
			),
			Status::Removed => format!(
				"Ini option {} was removed in PHP {}.",
				option, version
			),
		};
		context.report("deprecated.option", Severity::Warning, message, location)
	}

	fn configuration(&self) -> Option<PassConfiguration>
	{
		Some(PassConfiguration::can_be_disabled())
	}
}
