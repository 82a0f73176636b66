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

use crate::Range;

/// A parsed BTL syntax tree node.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct ScriptSegment {
    /// The exact source span of this node.
    pub range: Range,
    pub kind: SegmentKind,
}

impl ScriptSegment {
    pub fn new(kind: SegmentKind, range: Range) -> Self { ScriptSegment { range, kind } }
}

/// BTL syntax tree node variants.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub enum SegmentKind {
    /// An opcode, variable or script reference.
    Identifier(String),
    /// `<...>`: child segments compiled and wrapped in a minimal data push.
    Push(Vec<ScriptSegment>),
    /// `$(...)`: child segments compiled and evaluated at compile time; the
    /// resulting top stack item replaces the segment.
    Evaluation(Vec<ScriptSegment>),
    /// A decimal integer literal, encoded as a script number.
    BigIntLiteral(i128),
    /// A `0x`-prefixed hex literal (stored without the prefix).
    HexLiteral(String),
    /// A single- or double-quoted UTF-8 literal.
    Utf8Literal(String),
    /// A `//` or `/* */` comment, retained for tooling.
    Comment(String),
}

/// The kind of literal a resolved bytecode segment originates from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub enum LiteralKind {
    BigInt,
    Hex,
    Utf8,
}

/// What produced the bytecode of a resolved segment.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub enum BytecodeOrigin {
    /// A literal of the given kind.
    Literal(LiteralKind),
    /// An opcode identifier from the environment's opcode table.
    Opcode(String),
    /// A variable resolved through a compiler operation.
    Variable(String),
    /// A nested script, carrying its own resolved tree.
    Script {
        id: String,
        source: ResolvedScript,
    },
}

/// A resolved syntax tree node: the parse tree after identifier resolution,
/// still carrying ranges, ready for reduction to bytecode.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct ResolvedSegment {
    pub range: Range,
    pub kind: ResolvedKind,
}

/// Resolved node variants. An identifier resolves to exactly one of
/// [`ResolvedKind::Bytecode`] or [`ResolvedKind::Error`].
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub enum ResolvedKind {
    Push(ResolvedScript),
    Evaluation(ResolvedScript),
    Bytecode {
        value: Vec<u8>,
        origin: BytecodeOrigin,
    },
    Comment(String),
    Error(String),
}

/// An ordered sequence of resolved segments. An empty parse tree resolves to
/// a single `Comment("")` node so downstream reducers always see at least
/// one range.
pub type ResolvedScript = Vec<ResolvedSegment>;

/// Collects every [`ResolvedKind::Error`] in a resolved tree, in source
/// order.
pub fn resolution_errors(resolved: &ResolvedScript) -> Vec<(String, Range)> {
    let mut errors = vec![];
    for segment in resolved {
        match &segment.kind {
            ResolvedKind::Error(message) => errors.push((message.clone(), segment.range)),
            ResolvedKind::Push(inner) | ResolvedKind::Evaluation(inner) => {
                errors.extend(resolution_errors(inner))
            }
            ResolvedKind::Bytecode { .. } | ResolvedKind::Comment(_) => {}
        }
    }
    errors
}
