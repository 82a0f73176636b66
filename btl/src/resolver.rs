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

use amplify::hex::FromHex;

use crate::compiler::compile_nested_script;
use crate::environment::{CompilationData, CompilationEnvironment, OperationSet, VariableType};
use crate::{
    BytecodeOrigin, LiteralKind, Range, ResolvedKind, ResolvedScript, ResolvedSegment,
    ScriptSegment, SegmentKind,
};

/// Encodes an integer literal as a script number (sign-magnitude
/// little-endian, minimal length, empty for zero). Literals may exceed the
/// virtual machine's operand range; the encoding itself is unbounded.
pub fn bigint_to_script_number(value: i128) -> Vec<u8> {
    if value == 0 {
        return vec![];
    }
    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();
    let mut bytes = Vec::with_capacity(17);
    while magnitude > 0 {
        bytes.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }
    let sign = if negative { 0x80 } else { 0x00 };
    if bytes.last().expect("nonzero magnitude") & 0x80 != 0 {
        bytes.push(sign);
    } else {
        *bytes.last_mut().expect("nonzero magnitude") |= sign;
    }
    bytes
}

/// Applies the identifier resolver over a parse tree, producing the resolved
/// tree handed to the reducer. An empty child list resolves to a single
/// empty comment spanning the parent, so every node carries a range.
pub(crate) fn resolve_segments(
    segments: &[ScriptSegment],
    data: &CompilationData,
    environment: &CompilationEnvironment,
    source_script_ids: &[String],
    parent_range: Range,
) -> ResolvedScript {
    if segments.is_empty() {
        return vec![ResolvedSegment {
            range: parent_range,
            kind: ResolvedKind::Comment(String::new()),
        }];
    }
    segments
        .iter()
        .map(|segment| {
            let kind = match &segment.kind {
                SegmentKind::Identifier(identifier) => {
                    resolve_identifier(identifier, data, environment, source_script_ids)
                }
                SegmentKind::Push(children) => ResolvedKind::Push(resolve_segments(
                    children,
                    data,
                    environment,
                    source_script_ids,
                    segment.range,
                )),
                SegmentKind::Evaluation(children) => ResolvedKind::Evaluation(resolve_segments(
                    children,
                    data,
                    environment,
                    source_script_ids,
                    segment.range,
                )),
                SegmentKind::BigIntLiteral(value) => ResolvedKind::Bytecode {
                    value: bigint_to_script_number(*value),
                    origin: BytecodeOrigin::Literal(LiteralKind::BigInt),
                },
                SegmentKind::HexLiteral(digits) => match Vec::<u8>::from_hex(digits) {
                    Ok(value) => ResolvedKind::Bytecode {
                        value,
                        origin: BytecodeOrigin::Literal(LiteralKind::Hex),
                    },
                    Err(_) => ResolvedKind::Error(format!("Invalid hex literal '0x{digits}'.")),
                },
                SegmentKind::Utf8Literal(text) => ResolvedKind::Bytecode {
                    value: text.as_bytes().to_vec(),
                    origin: BytecodeOrigin::Literal(LiteralKind::Utf8),
                },
                SegmentKind::Comment(comment) => ResolvedKind::Comment(comment.clone()),
            };
            ResolvedSegment {
                range: segment.range,
                kind,
            }
        })
        .collect()
}

/// Resolves a single identifier in deterministic first-match order: opcode
/// table, variables (built-ins first), then nested scripts.
pub(crate) fn resolve_identifier(
    identifier: &str,
    data: &CompilationData,
    environment: &CompilationEnvironment,
    source_script_ids: &[String],
) -> ResolvedKind {
    if let Some(opcode) = environment.opcodes.get(identifier) {
        return ResolvedKind::Bytecode {
            value: vec![*opcode],
            origin: BytecodeOrigin::Opcode(identifier.to_owned()),
        };
    }
    if let Some(resolution) = resolve_variable(identifier, data, environment) {
        return match resolution {
            Ok(value) => ResolvedKind::Bytecode {
                value,
                origin: BytecodeOrigin::Variable(identifier.to_owned()),
            },
            Err(message) => ResolvedKind::Error(message),
        };
    }
    if let Some(resolution) = resolve_script(identifier, data, environment, source_script_ids) {
        return resolution;
    }
    ResolvedKind::Error(format!("Unknown identifier '{identifier}'."))
}

/// Attempts variable resolution: `None` means the identifier names no
/// built-in and no declared variable, and resolution continues with nested
/// scripts.
fn resolve_variable(
    identifier: &str,
    data: &CompilationData,
    environment: &CompilationEnvironment,
) -> Option<Result<Vec<u8>, String>> {
    let mut parts = identifier.splitn(2, '.');
    let variable_id = parts.next().expect("splitn yields at least one part");
    // The operation identifier is the single segment after the first dot;
    // any further segments are interpreted by the operation itself.
    let operation_id = parts.next().map(|rest| {
        rest.split('.').next().expect("split yields at least one part").to_owned()
    });

    let (operations, type_name) = match variable_id {
        "current_block_height" => {
            (&environment.operations.current_block_height, "current_block_height")
        }
        "current_block_time" => {
            (&environment.operations.current_block_time, "current_block_time")
        }
        "signing_serialization" => {
            (&environment.operations.signing_serialization, "signing_serialization")
        }
        _ => {
            let variable = environment.variables.get(variable_id)?;
            let operations = match variable.variable_type {
                VariableType::Key => &environment.operations.key,
                VariableType::HdKey => &environment.operations.hd_key,
                VariableType::AddressData => &environment.operations.address_data,
                VariableType::WalletData => &environment.operations.wallet_data,
            };
            (operations, variable.variable_type.type_name())
        }
    };

    let Some(operations) = operations else {
        return Some(Err(format!(
            "Identifier '{identifier}' refers to a {type_name} variable, but the {type_name} \
             operations are not included in this compilation environment."
        )));
    };
    Some(match operations {
        OperationSet::Single(operation) => operation(identifier, data, environment),
        OperationSet::Map(map) => {
            let Some(operation_id) = operation_id else {
                let example = operations.example_operation().unwrap_or("operation");
                return Some(Err(format!(
                    "This identifier requires an operation identifier, e.g. \
                     '{variable_id}.{example}'."
                )));
            };
            match map.get(&operation_id) {
                Some(operation) => operation(identifier, data, environment),
                None => Err(format!(
                    "The identifier '{identifier}' refers to an operation '{operation_id}' which \
                     is not available to this compilation environment."
                )),
            }
        }
    })
}

/// Attempts nested-script resolution, detecting reference cycles against the
/// compilation path.
fn resolve_script(
    identifier: &str,
    data: &CompilationData,
    environment: &CompilationEnvironment,
    source_script_ids: &[String],
) -> Option<ResolvedKind> {
    let source = environment.scripts.get(identifier)?;
    if source_script_ids.iter().any(|id| id == identifier) {
        let chain = source_script_ids
            .iter()
            .map(String::as_str)
            .chain([identifier])
            .collect::<Vec<_>>()
            .join("' -> '");
        return Some(ResolvedKind::Error(format!(
            "The script '{identifier}' is part of a reference cycle: '{chain}'."
        )));
    }
    let mut extended = source_script_ids.to_vec();
    extended.push(identifier.to_owned());
    Some(match compile_nested_script(source, data, environment, &extended) {
        Ok((bytecode, resolved)) => ResolvedKind::Bytecode {
            value: bytecode,
            origin: BytecodeOrigin::Script {
                id: identifier.to_owned(),
                source: resolved,
            },
        },
        Err(errors) => {
            let details = errors
                .iter()
                .map(|error| error.error.clone())
                .collect::<Vec<_>>()
                .join(" ");
            ResolvedKind::Error(format!("Compilation error in script '{identifier}': {details}"))
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn script_number_encoding() {
        assert_eq!(bigint_to_script_number(0), Vec::<u8>::new());
        assert_eq!(bigint_to_script_number(1), vec![0x01]);
        assert_eq!(bigint_to_script_number(-1), vec![0x81]);
        assert_eq!(bigint_to_script_number(127), vec![0x7f]);
        assert_eq!(bigint_to_script_number(128), vec![0x80, 0x00]);
        assert_eq!(bigint_to_script_number(-128), vec![0x80, 0x80]);
        assert_eq!(bigint_to_script_number(0x0102), vec![0x02, 0x01]);
        // Beyond the VM operand range the encoding simply grows.
        assert_eq!(bigint_to_script_number(1i128 << 40), vec![0, 0, 0, 0, 0, 0x01]);
    }

    #[test]
    fn unknown_identifier() {
        let environment = CompilationEnvironment::default();
        let resolved =
            resolve_identifier("missing", &CompilationData::default(), &environment, &[]);
        assert_eq!(resolved, ResolvedKind::Error("Unknown identifier 'missing'.".to_owned()));
    }

    #[test]
    fn opcode_resolution_wins() {
        let mut environment = CompilationEnvironment::default();
        environment.opcodes.insert("OP_ADD".to_owned(), 0x93);
        let resolved =
            resolve_identifier("OP_ADD", &CompilationData::default(), &environment, &[]);
        assert_eq!(resolved, ResolvedKind::Bytecode {
            value: vec![0x93],
            origin: BytecodeOrigin::Opcode("OP_ADD".to_owned()),
        });
    }

    #[test]
    fn empty_segments_resolve_to_empty_comment() {
        let environment = CompilationEnvironment::default();
        let range = Range::new(1, 1, 1, 3);
        let resolved =
            resolve_segments(&[], &CompilationData::default(), &environment, &[], range);
        assert_eq!(resolved, vec![ResolvedSegment {
            range,
            kind: ResolvedKind::Comment(String::new()),
        }]);
    }
}
