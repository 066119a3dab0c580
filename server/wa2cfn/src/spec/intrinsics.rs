// server/wa2cfn/src/spec/intrinsics.rs
//! Declarative registry of CloudFormation intrinsic functions

/// Every intrinsic function the analyzer understands.
///
/// Dispatch over this enum is exhaustive everywhere it matters, so a new
/// variant fails to compile until each match learns about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntrinsicFunction {
	Ref,
	Condition,
	Base64,
	FindInMap,
	GetAtt,
	GetAZs,
	ImportValue,
	Join,
	Select,
	Sub,
	And,
	Or,
	Equals,
	If,
	Not,
}

/// Which textual form a call was written in.
///
/// `Short` is a YAML tag applied to a single scalar (`!GetAtt Bucket.Arn`);
/// everything else, including `!GetAtt [Bucket, Arn]`, is `Long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionForm {
	Long,
	Short,
}

impl IntrinsicFunction {
	pub const ALL: [IntrinsicFunction; 15] = [
		IntrinsicFunction::Ref,
		IntrinsicFunction::Condition,
		IntrinsicFunction::Base64,
		IntrinsicFunction::FindInMap,
		IntrinsicFunction::GetAtt,
		IntrinsicFunction::GetAZs,
		IntrinsicFunction::ImportValue,
		IntrinsicFunction::Join,
		IntrinsicFunction::Select,
		IntrinsicFunction::Sub,
		IntrinsicFunction::And,
		IntrinsicFunction::Or,
		IntrinsicFunction::Equals,
		IntrinsicFunction::If,
		IntrinsicFunction::Not,
	];

	/// Bare name used in messages (`And`, `GetAtt`, ...)
	pub const fn name(self) -> &'static str {
		match self {
			IntrinsicFunction::Ref => "Ref",
			IntrinsicFunction::Condition => "Condition",
			IntrinsicFunction::Base64 => "Base64",
			IntrinsicFunction::FindInMap => "FindInMap",
			IntrinsicFunction::GetAtt => "GetAtt",
			IntrinsicFunction::GetAZs => "GetAZs",
			IntrinsicFunction::ImportValue => "ImportValue",
			IntrinsicFunction::Join => "Join",
			IntrinsicFunction::Select => "Select",
			IntrinsicFunction::Sub => "Sub",
			IntrinsicFunction::And => "And",
			IntrinsicFunction::Or => "Or",
			IntrinsicFunction::Equals => "Equals",
			IntrinsicFunction::If => "If",
			IntrinsicFunction::Not => "Not",
		}
	}

	/// Canonical long-form key, as used in JSON (`Fn::Join`, `Ref`)
	pub const fn json_key(self) -> &'static str {
		match self {
			IntrinsicFunction::Ref => "Ref",
			IntrinsicFunction::Condition => "Condition",
			IntrinsicFunction::Base64 => "Fn::Base64",
			IntrinsicFunction::FindInMap => "Fn::FindInMap",
			IntrinsicFunction::GetAtt => "Fn::GetAtt",
			IntrinsicFunction::GetAZs => "Fn::GetAZs",
			IntrinsicFunction::ImportValue => "Fn::ImportValue",
			IntrinsicFunction::Join => "Fn::Join",
			IntrinsicFunction::Select => "Fn::Select",
			IntrinsicFunction::Sub => "Fn::Sub",
			IntrinsicFunction::And => "Fn::And",
			IntrinsicFunction::Or => "Fn::Or",
			IntrinsicFunction::Equals => "Fn::Equals",
			IntrinsicFunction::If => "Fn::If",
			IntrinsicFunction::Not => "Fn::Not",
		}
	}

	/// YAML short-form tag without the leading `!`.
	/// Every intrinsic shares its bare name with its tag.
	pub const fn yaml_tag(self) -> &'static str {
		self.name()
	}
}

/// Look up intrinsic by YAML tag
pub fn get_intrinsic_by_tag(tag: &str) -> Option<IntrinsicFunction> {
	IntrinsicFunction::ALL
		.into_iter()
		.find(|function| function.yaml_tag() == tag)
}

/// Look up intrinsic by JSON key
pub fn get_intrinsic_by_json_key(key: &str) -> Option<IntrinsicFunction> {
	IntrinsicFunction::ALL
		.into_iter()
		.find(|function| function.json_key() == key)
}
