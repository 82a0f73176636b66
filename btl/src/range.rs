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

/// A source location span: 1-indexed lines and columns, half-open at the
/// end.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display)]
#[display("{start_line}:{start_column}-{end_line}:{end_column}")]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct Range {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Default for Range {
    fn default() -> Self { Range::ZERO }
}

impl Range {
    /// The degenerate span at the start of a source.
    pub const ZERO: Range = Range {
        start_line: 1,
        start_column: 1,
        end_line: 1,
        end_column: 1,
    };

    pub const fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Range {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    fn start(&self) -> (u32, u32) { (self.start_line, self.start_column) }

    fn end(&self) -> (u32, u32) { (self.end_line, self.end_column) }

    /// Merges two spans into the smallest span covering both; commutative
    /// and associative.
    pub fn merge(self, other: Range) -> Range {
        let (start_line, start_column) = self.start().min(other.start());
        let (end_line, end_column) = self.end().max(other.end());
        Range {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Merges a sequence of spans; a single span merges to itself.
    pub fn merge_all(ranges: impl IntoIterator<Item = Range>) -> Option<Range> {
        ranges.into_iter().reduce(Range::merge)
    }
}
