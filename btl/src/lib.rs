// Bitauth template language (BTL) compiler library.
//
// SPDX-License-Identifier: Apache-2.0
//
// Written in 2019-2023 by
//     Dr Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// Copyright (C) 2019-2023 LNP/BP Standards Association. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Coding conventions
#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    unused_imports,
    dead_code
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Compiler for the Bitauth template language (BTL): parsing into a ranged
//! syntax tree, identifier resolution over a caller-supplied compilation
//! environment, and reduction to deterministic byte-exact bytecode,
//! including compile-time `$(...)` evaluations run on the BCH virtual
//! machine.

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

/// Re-export of the virtual machine crate.
pub extern crate bavm;

mod range;
mod error;
mod segment;
mod parser;
mod environment;
mod resolver;
mod reducer;
mod operations;
mod compiler;
mod standard;

pub use compiler::{
    compile_btl, compile_script, CompilationFailure, CompilationResult, CompilationStage,
    CompilationSuccess,
};
pub use environment::{
    CompilationData, CompilationEnvironment, CompilerOperation, CompilerOperations, EvaluationVm,
    OperationSet, Variable, VariableType,
};
pub use error::{CompilationError, ParseError};
pub use operations::standard_operations;
pub use parser::parse_script;
pub use range::Range;
pub use reducer::{reduce_script, ReductionNode};
pub use resolver::bigint_to_script_number;
pub use segment::{
    resolution_errors, BytecodeOrigin, LiteralKind, ResolvedKind, ResolvedScript, ResolvedSegment,
    ScriptSegment, SegmentKind,
};
pub use standard::{standard_environment, standard_opcodes};
