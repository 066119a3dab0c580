//! Argument-shape rules for intrinsic function calls

use tower_lsp::lsp_types::Range;
use tracing::trace;

use super::Analyzer;
use crate::analysis::messages::Message;
use crate::analysis::references::EntityReference;
use crate::spec::cfn_ir::types::{
	CfnFunction, CfnScalar, CfnValue, NESTED_STACK_TYPE, is_custom_type,
};
use crate::spec::code_utils::names;
use crate::spec::intrinsics::{FunctionForm, IntrinsicFunction};
use crate::spec::resolver::{self, EntityScope};

/// The only argument, when it is a non-null scalar
fn single_scalar(args: &[CfnValue]) -> Option<&CfnScalar> {
	match args {
		[arg] => arg.as_scalar(),
		_ => None,
	}
}

impl<'a> Analyzer<'a> {
	/// Check one call; nested calls in its arguments are visited afterwards
	pub(super) fn check_function(&mut self, function: &'a CfnFunction) {
		trace!(function = function.function.name(), args = function.args.len(), "check function");

		let args = function.args.as_slice();
		let violation = match function.function {
			IntrinsicFunction::Ref => match single_scalar(args) {
				Some(name) => {
					if !self.spec.is_pseudo_parameter(&name.text) {
						self.reference(EntityReference::entity(
							name.range,
							&name.text,
							EntityScope::PARAMETERS_AND_RESOURCES,
						));
					}
					None
				}
				None => Some(Message::RefArguments),
			},
			IntrinsicFunction::Condition => match single_scalar(args) {
				Some(name) => {
					self.reference(EntityReference::entity(
						name.range,
						&name.text,
						EntityScope::CONDITIONS,
					));
					None
				}
				None => Some(Message::ConditionArguments),
			},
			IntrinsicFunction::Base64 => (args.len() != 1).then_some(Message::Base64Arguments),
			IntrinsicFunction::FindInMap => self.check_find_in_map(args),
			IntrinsicFunction::GetAtt => self.check_get_att(function.form, args),
			IntrinsicFunction::GetAZs => (args.len() != 1).then_some(Message::GetAZsArguments),
			IntrinsicFunction::ImportValue => {
				(args.len() != 1).then_some(Message::ImportValueArguments)
			}
			IntrinsicFunction::Join => match args {
				[delimiter, CfnValue::Array(_)] if delimiter.as_scalar().is_some() => None,
				_ => Some(Message::JoinArguments),
			},
			IntrinsicFunction::Select => match args {
				[index, _] => index
					.as_scalar()
					.filter(|index| index.text.parse::<u64>().is_err())
					.map(|_| Message::SelectIndex),
				_ => Some(Message::SelectArguments),
			},
			IntrinsicFunction::Sub => match args {
				[_] | [_, CfnValue::Object(_)] => None,
				_ => Some(Message::SubArguments),
			},
			IntrinsicFunction::And | IntrinsicFunction::Or => {
				(args.len() < 2).then_some(Message::TooFewConditions(function.function))
			}
			IntrinsicFunction::Equals => (args.len() != 2).then_some(Message::EqualsArguments),
			IntrinsicFunction::If => match args {
				[condition, _, _] => match condition.as_scalar() {
					Some(name) => {
						self.reference(EntityReference::entity(
							name.range,
							&name.text,
							EntityScope::CONDITIONS,
						));
						None
					}
					None => Some(Message::IfConditionName),
				},
				_ => Some(Message::IfArguments),
			},
			IntrinsicFunction::Not => (args.len() != 1).then_some(Message::NotArguments),
		};

		if let Some(message) = violation {
			self.report(function.range, &message);
		}
	}

	/// `[MapName, TopLevelKey, SecondLevelKey]`; keys are only bound to a
	/// mapping that is actually declared
	fn check_find_in_map(&mut self, args: &'a [CfnValue]) -> Option<Message<'a>> {
		let [map_name, top_level_key, second_level_key] = args else {
			return Some(Message::FindInMapArguments);
		};

		let map_name = map_name.as_scalar()?;
		self.reference(EntityReference::entity(
			map_name.range,
			&map_name.text,
			EntityScope::MAPPINGS,
		));

		resolver::resolve_mapping(self.template, &map_name.text)?;

		let top_level_key = top_level_key.as_scalar()?;
		self.reference(EntityReference::mapping_key(
			top_level_key.range,
			&top_level_key.text,
			&map_name.text,
		));

		if let Some(second_level_key) = second_level_key.as_scalar() {
			self.reference(EntityReference::mapping_second_key(
				second_level_key.range,
				&second_level_key.text,
				&map_name.text,
				&top_level_key.text,
			));
		}

		None
	}

	/// Short form `Resource.Attribute`, or long form `[Resource, Attribute]`
	fn check_get_att(&mut self, form: FunctionForm, args: &'a [CfnValue]) -> Option<Message<'a>> {
		if form == FunctionForm::Short
			&& let [arg] = args
			&& let Some(scalar) = arg.as_scalar()
		{
			// Split at the first dot: nested stack attributes are `Outputs.Name`
			let Some((resource_name, attribute)) = scalar.text.split_once('.') else {
				return Some(Message::GetAttShortForm);
			};

			self.reference(EntityReference::entity(
				scalar.range,
				resource_name,
				EntityScope::RESOURCES,
			));
			self.check_attribute(resource_name, attribute, scalar.range);
			return None;
		}

		let [resource_name, attribute] = args else {
			return Some(Message::GetAttArguments);
		};
		let Some(resource_name) = resource_name.as_scalar() else {
			return Some(Message::GetAttArguments);
		};

		self.reference(EntityReference::entity(
			resource_name.range,
			&resource_name.text,
			EntityScope::RESOURCES,
		));

		// A computed attribute name (e.g. !Ref) can't be checked
		if let Some(attribute) = attribute.as_scalar() {
			self.check_attribute(&resource_name.text, &attribute.text, attribute.range);
		}
		None
	}

	/// Attribute must exist on the resolved resource's catalog type
	fn check_attribute(&mut self, resource_name: &str, attribute: &str, range: Range) {
		let Some(type_name) =
			resolver::resolve_resource(self.template, resource_name).and_then(|r| r.type_name())
		else {
			return;
		};

		if is_custom_type(type_name)
			|| (type_name == NESTED_STACK_TYPE && attribute.starts_with("Outputs."))
		{
			return;
		}

		let spec = self.spec;
		let Some(descriptor) = spec.find_resource_type(type_name) else {
			return;
		};

		if descriptor.find_attribute(attribute).is_none() {
			let suggestion = names::suggest(attribute, descriptor.attribute_names());
			self.report_with_suggestion(
				range,
				&Message::UnknownAttribute {
					resource_type: type_name,
					attribute,
				},
				suggestion,
			);
		}
	}
}
