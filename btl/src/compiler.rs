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

use crate::environment::{CompilationData, CompilationEnvironment};
use crate::parser::parse_script;
use crate::reducer::{reduce_script, ReductionNode};
use crate::resolver::resolve_segments;
use crate::segment::resolution_errors;
use crate::{CompilationError, Range, ResolvedScript, ScriptSegment};

/// The stage a failed compilation stopped producing meaningful output at.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub enum CompilationStage {
    Parse,
    Resolve,
    Reduce,
}

/// A successful compilation: the bytecode plus every intermediate tree,
/// retained for tooling.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompilationSuccess {
    /// The compiled bytecode.
    pub bytecode: Vec<u8>,
    /// The parse tree.
    pub parsed: Vec<ScriptSegment>,
    /// The resolved tree.
    pub resolved: ResolvedScript,
    /// The full reduction trace.
    pub reduction: ReductionNode,
}

/// A failed compilation: the collected errors plus whatever partial output
/// the failing stage still produced.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompilationFailure {
    /// The earliest stage which produced errors.
    pub stage: CompilationStage,
    /// Every collected error, in source order.
    pub errors: Vec<CompilationError>,
    /// Best-effort bytecode (empty where undefined).
    pub bytecode: Vec<u8>,
}

pub type CompilationResult = Result<CompilationSuccess, CompilationFailure>;

/// Compiles a script from the environment's script table.
pub fn compile_script(
    script_id: &str,
    data: &CompilationData,
    environment: &CompilationEnvironment,
) -> CompilationResult {
    let Some(source) = environment.scripts.get(script_id) else {
        return Err(CompilationFailure {
            stage: CompilationStage::Resolve,
            errors: vec![CompilationError::new(
                format!("Unknown script '{script_id}'."),
                Range::ZERO,
            )],
            bytecode: vec![],
        });
    };
    compile_btl(source, data, environment, &[script_id.to_owned()])
}

/// Compiles raw BTL source against an environment.
///
/// `source_script_ids` is the compilation path used for cycle detection: the
/// identifiers of every script whose compilation is currently in progress,
/// ending with the script being compiled (empty for ad-hoc sources).
pub fn compile_btl(
    source: &str,
    data: &CompilationData,
    environment: &CompilationEnvironment,
    source_script_ids: &[String],
) -> CompilationResult {
    let parsed = match parse_script(source) {
        Ok(parsed) => parsed,
        Err(error) => {
            return Err(CompilationFailure {
                stage: CompilationStage::Parse,
                errors: vec![CompilationError::new(error.message, error.range)],
                bytecode: vec![],
            })
        }
    };
    let resolved =
        resolve_segments(&parsed, data, environment, source_script_ids, Range::ZERO);
    let resolve_stage_errors = resolution_errors(&resolved);
    let reduction = reduce_script(&resolved, environment.vm.as_deref());
    if !reduction.errors.is_empty() {
        let stage = if resolve_stage_errors.is_empty() {
            CompilationStage::Reduce
        } else {
            CompilationStage::Resolve
        };
        return Err(CompilationFailure {
            stage,
            errors: reduction.errors.clone(),
            bytecode: reduction.bytecode,
        });
    }
    Ok(CompilationSuccess {
        bytecode: reduction.bytecode.clone(),
        parsed,
        resolved,
        reduction,
    })
}

/// Compiles a nested script during identifier resolution, returning its
/// bytecode and resolved tree on success.
pub(crate) fn compile_nested_script(
    source: &str,
    data: &CompilationData,
    environment: &CompilationEnvironment,
    source_script_ids: &[String],
) -> Result<(Vec<u8>, ResolvedScript), Vec<CompilationError>> {
    match compile_btl(source, data, environment, source_script_ids) {
        Ok(success) => Ok((success.bytecode, success.resolved)),
        Err(failure) => Err(failure.errors),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn literal_compilation() {
        let environment = CompilationEnvironment::default();
        let data = CompilationData::default();
        let success = compile_btl("0x0102", &data, &environment, &[]).unwrap();
        assert_eq!(success.bytecode, vec![0x01, 0x02]);
        assert_eq!(success.parsed.len(), 1);
        assert_eq!(success.resolved.len(), 1);
    }

    #[test]
    fn utf8_push_compilation() {
        let environment = CompilationEnvironment::default();
        let data = CompilationData::default();
        let success = compile_btl("<'abc'>", &data, &environment, &[]).unwrap();
        assert_eq!(success.bytecode, vec![0x03, 0x61, 0x62, 0x63]);
    }

    #[test]
    fn parse_failure() {
        let environment = CompilationEnvironment::default();
        let data = CompilationData::default();
        let failure = compile_btl("0x01 <", &data, &environment, &[]).unwrap_err();
        assert_eq!(failure.stage, CompilationStage::Parse);
        assert_eq!(failure.errors.len(), 1);
    }

    #[test]
    fn resolve_failure_keeps_partial_bytecode() {
        let environment = CompilationEnvironment::default();
        let data = CompilationData::default();
        let failure = compile_btl("0x0102 nonsense", &data, &environment, &[]).unwrap_err();
        assert_eq!(failure.stage, CompilationStage::Resolve);
        assert_eq!(failure.errors.len(), 1);
        assert!(failure.errors[0].error.contains("Unknown identifier 'nonsense'"));
        // Best-effort bytecode from the segments which did resolve.
        assert_eq!(failure.bytecode, vec![0x01, 0x02]);
    }

    #[test]
    fn empty_source_compiles_to_empty_bytecode() {
        let environment = CompilationEnvironment::default();
        let data = CompilationData::default();
        let success = compile_btl("", &data, &environment, &[]).unwrap();
        assert_eq!(success.bytecode, Vec::<u8>::new());
        // The resolved tree still carries one (empty comment) range.
        assert_eq!(success.resolved.len(), 1);
    }

    #[test]
    fn compilation_is_deterministic() {
        let environment = CompilationEnvironment::default();
        let data = CompilationData::default();
        let first = compile_btl("<1> <2> 0x93", &data, &environment, &[]).unwrap();
        let second = compile_btl("<1> <2> 0x93", &data, &environment, &[]).unwrap();
        assert_eq!(first.bytecode, second.bytecode);
        assert_eq!(first.resolved, second.resolved);
        assert_eq!(first.reduction, second.reduction);
    }
}
