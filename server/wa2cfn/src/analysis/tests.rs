use std::collections::BTreeSet;

use tower_lsp::lsp_types::{DiagnosticSeverity, Range};

use crate::analysis::references::{EntityReference, ReferenceTarget};
use crate::analysis::{AnalysisResult, analyze};
use crate::spec::cfn_ir::types::{CfnSection, CfnTemplate, NamedNode, SectionKind};
use crate::spec::resolver::EntityScope;
use crate::spec::spec_store::SpecStore;
use crate::test_support::{analyze_json, analyze_yaml, messages, sample_spec};

fn load(text: &str) -> CfnTemplate {
	CfnTemplate::from_yaml(text).unwrap()
}

fn references_named<'r>(result: &'r AnalysisResult, name: &str) -> Vec<&'r EntityReference> {
	result
		.references
		.references()
		.filter(|reference| reference.name == name)
		.collect()
}

fn only_reference<'r>(result: &'r AnalysisResult, name: &str) -> &'r EntityReference {
	let found = references_named(result, name);
	assert_eq!(found.len(), 1, "references to {name}: {found:?}");
	found[0]
}

fn names(items: &[&str]) -> BTreeSet<String> {
	items.iter().map(|name| name.to_string()).collect()
}

/// Wrap a single property value in an SNS topic so it gets analyzed
fn topic_with(value: &str) -> String {
	format!(
		r#"
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      DisplayName: {value}
"#
	)
}

// -------------------------------------------------------------------------
// Root and sections
// -------------------------------------------------------------------------

#[test]
fn missing_resources_is_the_only_root_diagnostic() {
	let template = load(
		r#"
Parameters:
  Stage:
    Type: String
Outputs:
  Name:
    Value: !Ref Stage
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert_eq!(messages(&result), vec!["Resources section is missing."]);
	assert_eq!(result.diagnostics[0].range, template.range);
}

#[test]
fn empty_resources_section_is_not_descended() {
	let result = analyze_yaml("Resources: {}\n");

	assert_eq!(
		messages(&result),
		vec!["Resources section must declare at least one resource"]
	);
	assert!(result.references.is_empty());
}

#[test]
fn empty_sections_are_reported_at_their_key() {
	let template = load(
		r#"
Parameters: {}
Mappings: {}
Resources:
  Topic:
    Type: AWS::SNS::Topic
Outputs: {}
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert_eq!(
		messages(&result),
		vec![
			"Parameters section must declare at least one parameter",
			"Mappings section must declare at least one mapping",
			"Outputs section must declare at least one stack output",
		]
	);

	let Some(CfnSection::Outputs(outputs)) = template.sections_of(SectionKind::Outputs).next() else {
		panic!("Outputs section not loaded");
	};
	assert_eq!(result.diagnostics[2].range, outputs.anchor());
	assert_eq!(outputs.anchor().start.line, 6);
}

#[test]
fn outputs_over_the_limit_name_the_limit() {
	let spec = SpecStore::from_json_bytes(br#"{ "Limits": { "MaxOutputs": 1 } }"#).unwrap();
	let template = load(
		r#"
Resources:
  Thing:
    Type: Custom::Thing
Outputs:
  First:
    Value: a
  Second:
    Value: b
"#,
	);

	let result = analyze(&template, &spec);

	assert_eq!(
		messages(&result),
		vec!["Outputs section cannot declare more than 1 stack outputs"]
	);
}

#[test]
fn zero_limit_reports_empty_and_over_limit_together() {
	let spec = SpecStore::from_json_bytes(br#"{ "Limits": { "MaxOutputs": 0 } }"#).unwrap();
	let template = load(
		r#"
Resources:
  Thing:
    Type: Custom::Thing
Outputs: {}
"#,
	);

	let result = analyze(&template, &spec);

	assert_eq!(
		messages(&result),
		vec![
			"Outputs section must declare at least one stack output",
			"Outputs section cannot declare more than 0 stack outputs",
		]
	);
	assert_eq!(result.diagnostics[0].range, result.diagnostics[1].range);
}

#[test]
fn parameter_and_mapping_limits_are_independent() {
	let spec = SpecStore::from_json_bytes(
		br#"{ "Limits": { "MaxParameters": 1, "MaxMappings": 1 } }"#,
	)
	.unwrap();
	let template = load(
		r#"
Parameters:
  A:
    Type: String
  B:
    Type: String
Mappings:
  Only:
    key:
      value: x
Resources:
  Thing:
    Type: Custom::Thing
"#,
	);

	let result = analyze(&template, &spec);

	assert_eq!(
		messages(&result),
		vec!["Parameters section cannot declare more than 1 parameters"]
	);
}

// -------------------------------------------------------------------------
// Resources
// -------------------------------------------------------------------------

#[test]
fn resource_without_type_is_not_checked_further() {
	let template = load(
		r#"
Resources:
  Typeless:
    Properties:
      Name: !Join [only-one]
    DependsOn: [Other]
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert_eq!(messages(&result), vec!["Resource must declare a Type"]);
	let resource = template.resources().next().unwrap();
	assert_eq!(result.diagnostics[0].range, resource.anchor());
	assert!(result.references.is_empty());
}

#[test]
fn empty_type_value_is_required() {
	let template = load(
		r#"
Resources:
  Blank:
    Type: ""
    Properties:
      Name: !Ref Stage
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert_eq!(messages(&result), vec!["Type value is required"]);
	let type_key = &template.resources().next().unwrap().resource_type().unwrap().key;
	assert_eq!(result.diagnostics[0].range, type_key.range);
	// siblings of the Type key are still walked
	assert_eq!(references_named(&result, "Stage").len(), 1);
}

#[test]
fn non_string_type_value_is_required() {
	let result = analyze_yaml(
		r#"
Resources:
  Listed:
    Type: 42
"#,
	);

	assert_eq!(messages(&result), vec!["Type value is required"]);
}

#[test]
fn unknown_resource_type_suggests_the_closest() {
	let template = load(
		r#"
Resources:
  Bucket:
    Type: AWS::S3::Buckett
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert_eq!(messages(&result), vec!["Unknown resource type: AWS::S3::Buckett"]);
	let diag = &result.diagnostics[0];
	assert_eq!(diag.severity, Some(DiagnosticSeverity::ERROR));
	assert_eq!(
		diag.data,
		Some(serde_json::json!({ "suggestion": "AWS::S3::Bucket" }))
	);
	let type_value = template.resources().next().unwrap().resource_type().unwrap().value.range();
	assert_eq!(diag.range, type_value);
}

#[test]
fn custom_types_need_no_catalog_entry() {
	let result = analyze_yaml(
		r#"
Resources:
  Seeder:
    Type: Custom::DatabaseSeeder
    Properties:
      ServiceToken: arn:aws:lambda:us-east-1:123456789012:function:seed
      Anything: goes
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn unknown_property_is_a_warning_with_suggestion() {
	let template = load(
		r#"
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketNam: logs
      Comment: not checked
      "//": neither is this
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert_eq!(
		messages(&result),
		vec!["Unknown property for resource type AWS::S3::Bucket: BucketNam"]
	);
	let diag = &result.diagnostics[0];
	assert_eq!(diag.severity, Some(DiagnosticSeverity::WARNING));
	assert_eq!(diag.data, Some(serde_json::json!({ "suggestion": "BucketName" })));
	assert_eq!(diag.range.start.line, 5);
	assert_eq!(diag.range.start.character, 6);
}

#[test]
fn custom_resource_properties_are_not_flagged() {
	let result = analyze_yaml(
		r#"
Resources:
  Seeder:
    Type: AWS::CloudFormation::CustomResource
    Properties:
      ServiceToken: arn:aws:lambda:us-east-1:123456789012:function:seed
      TableName: users
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn missing_required_properties_without_block_anchor_to_the_resource() {
	let template = load(
		r#"
Resources:
  Handler:
    Type: AWS::Lambda::Function
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert_eq!(messages(&result), vec!["Missing required properties: Code, Role"]);
	let resource = template.resources().next().unwrap();
	assert_eq!(result.diagnostics[0].range, resource.anchor());
}

#[test]
fn missing_required_properties_in_block_anchor_to_the_block() {
	let template = load(
		r#"
Resources:
  Handler:
    Type: AWS::Lambda::Function
    Properties:
      Runtime: python3.12
      Role: arn:aws:iam::123456789012:role/lambda
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert_eq!(messages(&result), vec!["Missing required properties: Code"]);
	let properties = template.resources().next().unwrap().properties().unwrap();
	assert_eq!(result.diagnostics[0].range, properties.key.range);
}

#[test]
fn computed_properties_block_is_not_compared() {
	let result = analyze_yaml(
		r#"
Conditions:
  IsProd: !Equals [!Ref Stage, prod]
Resources:
  Handler:
    Type: AWS::Lambda::Function
    Properties: !If [IsProd, {}, {}]
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert_eq!(
		only_reference(&result, "IsProd").scope(),
		Some(EntityScope::CONDITIONS)
	);
}

#[test]
fn depends_on_excludes_owner_and_siblings() {
	let result = analyze_yaml(
		r#"
Resources:
  A:
    Type: AWS::SNS::Topic
  B:
    Type: AWS::SNS::Topic
  C:
    Type: AWS::SNS::Topic
    DependsOn: [A, B]
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

	let a = only_reference(&result, "A");
	assert_eq!(a.scope(), Some(EntityScope::RESOURCES));
	assert_eq!(a.excluded, names(&["C", "B"]));
	assert!(!a.is_candidate("C"));
	assert!(a.is_candidate("A"));

	let b = only_reference(&result, "B");
	assert_eq!(b.excluded, names(&["C", "A"]));
}

#[test]
fn single_depends_on_excludes_the_owner() {
	let result = analyze_yaml(
		r#"
Resources:
  A:
    Type: AWS::SNS::Topic
  C:
    Type: AWS::SNS::Topic
    DependsOn: A
"#,
	);

	assert_eq!(only_reference(&result, "A").excluded, names(&["C"]));
}

#[test]
fn resource_condition_is_a_condition_reference() {
	let result = analyze_yaml(
		r#"
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Condition: IsProd
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	let reference = only_reference(&result, "IsProd");
	assert_eq!(reference.scope(), Some(EntityScope::CONDITIONS));
	assert!(reference.excluded.is_empty());
}

// -------------------------------------------------------------------------
// Intrinsic functions
// -------------------------------------------------------------------------

#[test]
fn ref_to_pseudo_parameter_records_nothing() {
	let result = analyze_yaml(&topic_with("!Ref AWS::Region"));

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert!(result.references.is_empty());
}

#[test]
fn ref_is_recorded_even_when_undeclared() {
	let result = analyze_yaml(&topic_with("!Ref SomeParam"));

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert_eq!(result.references.len(), 1);
	let reference = only_reference(&result, "SomeParam");
	assert_eq!(
		reference.target,
		ReferenceTarget::Entity(EntityScope::PARAMETERS_AND_RESOURCES)
	);
	assert!(result.references.at(reference.location.start).any(|r| r == reference));
}

#[test]
fn ref_needs_one_name() {
	let result = analyze_yaml(&topic_with("!Ref [a, b]"));

	assert_eq!(messages(&result), vec!["Reference expects one string argument"]);
	assert!(result.references.is_empty());
}

#[test]
fn condition_function_needs_one_name() {
	let result = analyze_yaml(
		r#"
Conditions:
  IsProd: !Equals [a, b]
  Both: !And [!Condition IsProd, !Condition [a, b]]
Resources:
  Topic:
    Type: AWS::SNS::Topic
"#,
	);

	assert_eq!(
		messages(&result),
		vec!["Condition reference expects one string argument"]
	);
	assert_eq!(
		only_reference(&result, "IsProd").scope(),
		Some(EntityScope::CONDITIONS)
	);
}

#[test]
fn get_att_short_form_references_the_resource() {
	let template = load(
		r#"
Resources:
  MyBucket:
    Type: AWS::S3::Bucket
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      DisplayName: !GetAtt MyBucket.Arn
"#,
	);

	let result = analyze(&template, &sample_spec());

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	let reference = only_reference(&result, "MyBucket");
	assert_eq!(reference.scope(), Some(EntityScope::RESOURCES));
	assert_eq!(reference.location.start.line, 7);
}

#[test]
fn repeated_short_form_refs_are_recorded_at_each_use() {
	let result = analyze_yaml(
		r#"
Parameters:
  Stage:
    Type: String
Resources:
  Bucket:
    Type: AWS::S3::Bucket
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !Ref Stage
      DisplayName: !Ref Stage
  Queue:
    Type: AWS::SQS::Queue
    Properties:
      QueueName: !GetAtt Bucket.Arm
"#,
	);

	let stages = references_named(&result, "Stage");
	assert_eq!(stages.len(), 2, "{stages:?}");
	let lines: Vec<u32> = stages.iter().map(|r| r.location.start.line).collect();
	assert_eq!(lines, vec![10, 11]);
	assert!(stages.iter().all(|r| r.location != Range::default()));

	let bucket = only_reference(&result, "Bucket");
	assert_eq!(bucket.location.start.line, 15);
	assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
	assert_eq!(result.diagnostics[0].range.start.line, 15);
}

#[test]
fn get_att_unknown_attribute_is_reported() {
	let result = analyze_yaml(
		r#"
Resources:
  MyBucket:
    Type: AWS::S3::Bucket
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      DisplayName: !GetAtt MyBucket.Arm
"#,
	);

	assert_eq!(
		messages(&result),
		vec!["Unknown attribute in resource type AWS::S3::Bucket: Arm"]
	);
	assert_eq!(
		result.diagnostics[0].data,
		Some(serde_json::json!({ "suggestion": "Arn" }))
	);
	assert_eq!(references_named(&result, "MyBucket").len(), 1);
}

#[test]
fn get_att_short_form_without_dot() {
	let result = analyze_yaml(&topic_with("!GetAtt NoDotHere"));

	assert_eq!(
		messages(&result),
		vec![
			"GetAttr in short form requires argument in the format logicalNameOfResource.attributeName"
		]
	);
	assert!(result.references.is_empty());
}

#[test]
fn get_att_long_form() {
	let result = analyze_yaml(
		r#"
Resources:
  MyBucket:
    Type: AWS::S3::Bucket
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      DisplayName: !GetAtt [MyBucket, WebsiteURL]
      TopicName: !GetAtt [MyBucket, Missing]
      Subscription: !GetAtt [MyBucket]
"#,
	);

	assert_eq!(
		messages(&result),
		vec![
			"Unknown attribute in resource type AWS::S3::Bucket: Missing",
			"GetAtt requires two string arguments in full form or one string argument in short form",
		]
	);
	assert_eq!(references_named(&result, "MyBucket").len(), 2);
}

#[test]
fn get_att_with_computed_attribute_is_not_checked() {
	let result = analyze_yaml(
		r#"
Resources:
  MyBucket:
    Type: AWS::S3::Bucket
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      DisplayName: !GetAtt [MyBucket, !Ref AttributeName]
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert_eq!(references_named(&result, "MyBucket").len(), 1);
	assert_eq!(references_named(&result, "AttributeName").len(), 1);
}

#[test]
fn get_att_skips_custom_and_nested_stack_outputs() {
	let result = analyze_yaml(
		r#"
Resources:
  Child:
    Type: AWS::CloudFormation::Stack
    Properties:
      TemplateURL: https://example.com/child.yaml
  Seeder:
    Type: Custom::Seeder
    Properties:
      ServiceToken: arn:aws:lambda:us-east-1:123456789012:function:seed
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      DisplayName: !GetAtt Child.Outputs.BucketName
      TopicName: !GetAtt Seeder.Whatever
      Subscription: !GetAtt Undeclared.Anything
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert_eq!(only_reference(&result, "Child").scope(), Some(EntityScope::RESOURCES));
	assert_eq!(references_named(&result, "Undeclared").len(), 1);
}

#[test]
fn find_in_map_binds_keys_to_a_declared_mapping() {
	let result = analyze_yaml(
		r#"
Mappings:
  RegionMap:
    us-east-1:
      Ami: ami-123
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      DisplayName: !FindInMap [RegionMap, us-east-1, Ami]
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert_eq!(result.references.len(), 3);
	assert_eq!(
		only_reference(&result, "RegionMap").scope(),
		Some(EntityScope::MAPPINGS)
	);
	assert_eq!(
		only_reference(&result, "us-east-1").target,
		ReferenceTarget::MappingKey {
			mapping: "RegionMap".into()
		}
	);
	assert_eq!(
		only_reference(&result, "Ami").target,
		ReferenceTarget::MappingSecondKey {
			mapping: "RegionMap".into(),
			top_level_key: "us-east-1".into(),
		}
	);
}

#[test]
fn find_in_map_keys_need_a_declared_mapping_and_scalar_keys() {
	let result = analyze_yaml(
		r#"
Mappings:
  RegionMap:
    us-east-1:
      Ami: ami-123
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      DisplayName: !FindInMap [Undeclared, us-east-1, Ami]
      TopicName: !FindInMap [RegionMap, !Ref Stage, Ami]
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert_eq!(references_named(&result, "Undeclared").len(), 1);
	assert_eq!(references_named(&result, "RegionMap").len(), 1);
	assert_eq!(references_named(&result, "Stage").len(), 1);
	assert!(references_named(&result, "us-east-1").is_empty());
	assert!(references_named(&result, "Ami").is_empty());
}

#[test]
fn find_in_map_needs_three_arguments() {
	let result = analyze_yaml(&topic_with("!FindInMap [RegionMap, us-east-1]"));

	assert_eq!(messages(&result), vec!["FindInMap requires 3 arguments"]);
	assert!(result.references.is_empty());
}

#[test]
fn join_needs_a_list_second_argument() {
	let result = analyze_yaml(&topic_with(r#"!Join ["-", "not-an-array"]"#));

	assert_eq!(
		messages(&result),
		vec!["Join expects a string argument and an array argument"]
	);
	assert!(result.references.is_empty());
}

#[test]
fn join_with_list_is_accepted() {
	let result = analyze_yaml(&topic_with(r#"!Join ["-", [a, !Ref Stage]]"#));

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert_eq!(references_named(&result, "Stage").len(), 1);
}

#[test]
fn select_index_and_arity() {
	let cases = [
		("!Select [0, [a, b]]", None),
		("!Select [!Ref Index, [a, b]]", None),
		(
			r#"!Select ["-1", [a, b]]"#,
			Some("Select index should be a valid non-negative number"),
		),
		(
			"!Select [first, [a, b]]",
			Some("Select index should be a valid non-negative number"),
		),
		(
			"!Select [[a, b]]",
			Some("Select expects an index argument and an array argument"),
		),
	];

	for (value, expected) in cases {
		let result = analyze_yaml(&topic_with(value));
		assert_eq!(messages(&result), expected.into_iter().collect::<Vec<_>>(), "{value}");
	}
}

#[test]
fn sub_takes_a_string_and_optional_map() {
	let cases = [
		(r#"!Sub "${AWS::StackName}-topic""#, None),
		(r#"!Sub ["${Prefix}-topic", {Prefix: !Ref Stage}]"#, None),
		(
			r#"!Sub ["${Prefix}-topic", not-a-map]"#,
			Some("Sub expects one argument plus an optional value map"),
		),
	];

	for (value, expected) in cases {
		let result = analyze_yaml(&topic_with(value));
		assert_eq!(messages(&result), expected.into_iter().collect::<Vec<_>>(), "{value}");
	}
}

#[test]
fn single_argument_functions() {
	let cases = [
		("!Base64 encoded", None),
		("!Base64 [a, b]", Some("Base64 reference expects 1 argument")),
		(r#"!GetAZs """#, None),
		("!GetAZs [a, b]", Some("GetAZs expects one argument")),
		("!ImportValue shared-vpc", None),
		("!ImportValue [a, b]", Some("ImportValue expects one argument")),
	];

	for (value, expected) in cases {
		let result = analyze_yaml(&topic_with(value));
		assert_eq!(messages(&result), expected.into_iter().collect::<Vec<_>>(), "{value}");
	}
}

#[test]
fn condition_functions() {
	let result = analyze_yaml(
		r#"
Conditions:
  IsProd: !Equals [!Ref Stage, prod]
  IsUs: !Equals [!Ref Region]
  Both: !And [!Condition IsProd, !Condition IsUs]
  Lonely: !And [!Condition IsProd]
  Either: !Or [!Condition IsProd]
  Neither: !Not [!Condition IsProd, !Condition IsUs]
Resources:
  Topic:
    Type: AWS::SNS::Topic
"#,
	);

	assert_eq!(
		messages(&result),
		vec![
			"Equals expects exactly 2 arguments",
			"And expects at least 2 arguments",
			"Or expects at least 2 arguments",
			"Not expects exactly 1 argument",
		]
	);
	assert_eq!(references_named(&result, "IsProd").len(), 4);
}

#[test]
fn if_names_a_condition() {
	let cases = [
		("!If [IsProd, a, b]", None),
		("!If [IsProd, a]", Some("If expects exactly 3 arguments")),
		("!If [[IsProd], a, b]", Some("If's first argument should be a condition name")),
	];

	for (value, expected) in cases {
		let result = analyze_yaml(&topic_with(value));
		assert_eq!(messages(&result), expected.into_iter().collect::<Vec<_>>(), "{value}");
	}

	let result = analyze_yaml(&topic_with("!If [IsProd, a, b]"));
	assert_eq!(
		only_reference(&result, "IsProd").scope(),
		Some(EntityScope::CONDITIONS)
	);
}

#[test]
fn nested_functions_are_checked_after_an_outer_violation() {
	let result = analyze_yaml(&topic_with(r#"!Join ["-", !Ref [a, b]]"#));

	assert_eq!(
		messages(&result),
		vec![
			"Join expects a string argument and an array argument",
			"Reference expects one string argument",
		]
	);
}

#[test]
fn functions_outside_resources_are_checked() {
	let result = analyze_yaml(
		r#"
Resources:
  Topic:
    Type: AWS::SNS::Topic
Outputs:
  TopicName:
    Value: !GetAtt Topic.TopicName
  Broken:
    Value: !GetAtt Topic
"#,
	);

	assert_eq!(
		messages(&result),
		vec![
			"GetAttr in short form requires argument in the format logicalNameOfResource.attributeName"
		]
	);
	assert_eq!(references_named(&result, "Topic").len(), 1);
}

// -------------------------------------------------------------------------
// Metadata
// -------------------------------------------------------------------------

#[test]
fn interface_metadata_references_parameters() {
	let result = analyze_yaml(
		r#"
Metadata:
  AWS::CloudFormation::Interface:
    ParameterGroups:
      - Label:
          default: Deployment
        Parameters:
          - Stage
          - AWS::Region
          - [Nested]
    ParameterLabels:
      Stage:
        default: Deployment stage
Parameters:
  Stage:
    Type: String
Resources:
  Topic:
    Type: AWS::SNS::Topic
"#,
	);

	assert_eq!(messages(&result), vec!["Expected a string."]);

	let stages = references_named(&result, "Stage");
	assert_eq!(stages.len(), 2);
	assert!(stages.iter().all(|r| r.scope() == Some(EntityScope::PARAMETERS)));
	assert!(references_named(&result, "AWS::Region").is_empty());
}

#[test]
fn other_metadata_is_ignored() {
	let result = analyze_yaml(
		r#"
Metadata:
  Owner: platform
  Labels:
    - Stage
Resources:
  Topic:
    Type: AWS::SNS::Topic
"#,
	);

	assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
	assert!(result.references.is_empty());
}

// -------------------------------------------------------------------------
// Whole-document behaviour
// -------------------------------------------------------------------------

#[test]
fn diagnostics_follow_document_order() {
	let result = analyze_yaml(
		r#"
Parameters: {}
Resources:
  First:
    Type: AWS::Nope::Thing
  Second:
    Type: AWS::S3::Bucket
    Properties:
      Extra: 1
Outputs:
  Out:
    Value: !Join [only]
"#,
	);

	assert_eq!(
		messages(&result),
		vec![
			"Parameters section must declare at least one parameter",
			"Unknown resource type: AWS::Nope::Thing",
			"Unknown property for resource type AWS::S3::Bucket: Extra",
			"Join expects a string argument and an array argument",
		]
	);
}

#[test]
fn one_bad_resource_does_not_hide_its_siblings() {
	let result = analyze_yaml(
		r#"
Resources:
  Broken: not-a-mapping
  Handler:
    Type: AWS::Lambda::Function
"#,
	);

	assert_eq!(
		messages(&result),
		vec![
			"Resource must declare a Type",
			"Missing required properties: Code, Role",
		]
	);
}

#[test]
fn json_templates_are_analyzed_the_same_way() {
	let result = analyze_json(
		r#"{
  "Parameters": { "Stage": { "Type": "String" } },
  "Resources": {
    "MyBucket": { "Type": "AWS::S3::Bucket" },
    "Topic": {
      "Type": "AWS::SNS::Topic",
      "DependsOn": "MyBucket",
      "Properties": {
        "DisplayName": { "Fn::Join": ["-", [{ "Ref": "Stage" }, { "Ref": "AWS::NoValue" }]] },
        "TopicName": { "Fn::GetAtt": ["MyBucket", "Arn"] },
        "Subscription": { "Fn::GetAtt": "MyBucket.Arn" }
      }
    }
  }
}"#,
	);

	assert_eq!(
		messages(&result),
		vec!["GetAtt requires two string arguments in full form or one string argument in short form"]
	);
	assert_eq!(only_reference(&result, "Stage").scope(), Some(EntityScope::PARAMETERS_AND_RESOURCES));
	assert_eq!(references_named(&result, "MyBucket").len(), 2);
	assert!(references_named(&result, "AWS::NoValue").is_empty());
}

#[test]
fn analysis_is_repeatable() {
	let template = load(
		r#"
Resources:
  A:
    Type: AWS::SNS::Topic
  C:
    Type: AWS::SQS::Queue
    DependsOn: [A, B]
    Properties:
      QueueNam: !GetAtt A.Arn
"#,
	);
	let spec = sample_spec();

	let first = analyze(&template, &spec);
	let second = analyze(&template, &spec);

	assert_eq!(first, second);
	assert!(!first.diagnostics.is_empty());
	assert!(!first.references.is_empty());
}

#[test]
fn empty_catalog_still_checks_function_shapes() {
	let template = load(&topic_with("!Join [only]"));

	let result = analyze(&template, &SpecStore::default());

	assert_eq!(
		messages(&result),
		vec![
			"Unknown resource type: AWS::SNS::Topic",
			"Join expects a string argument and an array argument",
		]
	);
}
