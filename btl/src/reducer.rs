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

use bavm::{encode_data_push, instructions_are_malformed, parse_bytecode};

use crate::environment::EvaluationVm;
use crate::{CompilationError, Range, ResolvedKind, ResolvedScript};

/// One node of the reduction trace: the bytecode contributed by a resolved
/// segment, the source span it reduces, the traces of its children and any
/// errors collected beneath it.
///
/// The root node's `bytecode` is the compiled script; reduction always
/// produces best-effort bytecode (empty where undefined) alongside its
/// errors.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct ReductionNode {
    pub bytecode: Vec<u8>,
    pub range: Range,
    pub source: Vec<ReductionNode>,
    pub errors: Vec<CompilationError>,
}

impl ReductionNode {
    fn leaf(bytecode: Vec<u8>, range: Range) -> Self {
        ReductionNode {
            bytecode,
            range,
            source: vec![],
            errors: vec![],
        }
    }

    fn error(message: String, range: Range) -> Self {
        ReductionNode {
            bytecode: vec![],
            range,
            source: vec![],
            errors: vec![CompilationError::new(message, range)],
        }
    }
}

/// Folds a resolved script into a single bytecode blob.
///
/// Children reduce in source order and concatenate verbatim; pushes wrap
/// their reduced child in the minimal data-push encoding; evaluations run
/// the supplied virtual machine over the child's aggregated bytecode and
/// substitute the final top stack item. The returned node's range merges the
/// children's ranges.
pub fn reduce_script(resolved: &ResolvedScript, vm: Option<&dyn EvaluationVm>) -> ReductionNode {
    let source: Vec<ReductionNode> = resolved
        .iter()
        .map(|segment| match &segment.kind {
            ResolvedKind::Bytecode { value, .. } => {
                ReductionNode::leaf(value.clone(), segment.range)
            }
            ResolvedKind::Comment(_) => ReductionNode::leaf(vec![], segment.range),
            ResolvedKind::Error(message) => ReductionNode::error(message.clone(), segment.range),
            ResolvedKind::Push(children) => {
                let child = reduce_script(children, vm);
                ReductionNode {
                    bytecode: if child.errors.is_empty() {
                        encode_data_push(&child.bytecode)
                    } else {
                        vec![]
                    },
                    range: segment.range,
                    errors: child.errors.clone(),
                    source: vec![child],
                }
            }
            ResolvedKind::Evaluation(children) => {
                let child = reduce_script(children, vm);
                if !child.errors.is_empty() {
                    let errors = child.errors.clone();
                    return ReductionNode {
                        bytecode: vec![],
                        range: segment.range,
                        errors,
                        source: vec![child],
                    };
                }
                let result = evaluate_child(&child.bytecode, vm);
                match result {
                    Ok(bytecode) => ReductionNode {
                        bytecode,
                        range: segment.range,
                        errors: vec![],
                        source: vec![child],
                    },
                    Err(message) => {
                        let error = CompilationError::new(message, segment.range);
                        ReductionNode {
                            bytecode: vec![],
                            range: segment.range,
                            errors: vec![error],
                            source: vec![child],
                        }
                    }
                }
            }
        })
        .collect();

    let bytecode = source.iter().flat_map(|node| node.bytecode.iter().copied()).collect();
    let errors = source.iter().flat_map(|node| node.errors.iter().cloned()).collect();
    let range = Range::merge_all(source.iter().map(|node| node.range)).unwrap_or_default();
    ReductionNode {
        bytecode,
        range,
        source,
        errors,
    }
}

fn evaluate_child(bytecode: &[u8], vm: Option<&dyn EvaluationVm>) -> Result<Vec<u8>, String> {
    let Some(vm) = vm else {
        return Err(
            "The compilation environment does not include a virtual machine, which is required \
             to reduce evaluations."
                .to_owned(),
        );
    };
    // Malformed-instruction detection runs on the final aggregated bytecode
    // before it is handed to the virtual machine.
    if instructions_are_malformed(&parse_bytecode(bytecode)) {
        return Err("The bytecode generated by this evaluation ends with an incomplete data push \
                    and cannot be evaluated."
            .to_owned());
    }
    vm.evaluate_bytecode(bytecode)
}
