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

/// A BTL syntax error, pointing at the offending source location.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error)]
#[display("{message} [{range}]")]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct ParseError {
    /// What was expected or found instead.
    pub message: String,
    /// The source span of the offending character(s).
    pub range: Range,
}

impl ParseError {
    pub fn new(message: impl ToString, range: Range) -> Self {
        ParseError {
            message: message.to_string(),
            range,
        }
    }
}

/// A resolution or reduction error, carrying the source span it originates
/// from. Errors are values: compilation collects every error instead of
/// aborting on the first.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error)]
#[display("{error} [{range}]")]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct CompilationError {
    /// Human-readable error description.
    pub error: String,
    /// The BTL source span this error originates from.
    pub range: Range,
}

impl CompilationError {
    pub fn new(error: impl ToString, range: Range) -> Self {
        CompilationError {
            error: error.to_string(),
            range,
        }
    }
}
