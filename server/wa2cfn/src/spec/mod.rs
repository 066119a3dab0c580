pub mod cfn_ir;
pub mod code_utils;
pub mod intrinsics;
pub mod resolver;
pub mod spec_store;
