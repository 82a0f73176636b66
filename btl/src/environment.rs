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

use std::collections::BTreeMap;

use bavm::TxContext;

/// A compiler operation: a pure function resolving one variable identifier
/// to bytecode using the per-compilation data and the environment. A
/// returned `Err` is a recoverable resolution error embedded in the
/// resolved tree.
pub type CompilerOperation =
    fn(&str, &CompilationData, &CompilationEnvironment) -> Result<Vec<u8>, String>;

/// The operations available for one variable type or built-in variable:
/// either a single operation, or a dispatch table over operation
/// identifiers (the segment after the first `.`).
#[derive(Clone, Debug)]
pub enum OperationSet {
    Single(CompilerOperation),
    Map(BTreeMap<String, CompilerOperation>),
}

impl OperationSet {
    /// An example operation identifier, used in error messages for
    /// identifiers lacking one.
    pub fn example_operation(&self) -> Option<&str> {
        match self {
            OperationSet::Single(_) => None,
            OperationSet::Map(map) => map.keys().next().map(String::as_str),
        }
    }
}

/// Compiler operation tables, one per variable type plus one per built-in
/// variable.
#[derive(Clone, Debug, Default)]
pub struct CompilerOperations {
    pub key: Option<OperationSet>,
    pub hd_key: Option<OperationSet>,
    pub address_data: Option<OperationSet>,
    pub wallet_data: Option<OperationSet>,
    pub current_block_height: Option<OperationSet>,
    pub current_block_time: Option<OperationSet>,
    pub signing_serialization: Option<OperationSet>,
}

/// The type of a declared template variable, selecting its operation table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub enum VariableType {
    Key,
    HdKey,
    AddressData,
    WalletData,
}

impl VariableType {
    /// The name used in diagnostics.
    pub const fn type_name(self) -> &'static str {
        match self {
            VariableType::Key => "Key",
            VariableType::HdKey => "HdKey",
            VariableType::AddressData => "AddressData",
            VariableType::WalletData => "WalletData",
        }
    }
}

/// A template variable declaration.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct Variable {
    pub variable_type: VariableType,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Variable {
    pub fn new(variable_type: VariableType) -> Self {
        Variable {
            variable_type,
            name: None,
            description: None,
        }
    }
}

/// The virtual machine seam used by the reducer to run `$(...)` evaluations:
/// returns the top stack item of the final state (empty bytes when the stack
/// is empty), or an error description.
pub trait EvaluationVm {
    fn evaluate_bytecode(&self, bytecode: &[u8]) -> Result<Vec<u8>, String>;
}

/// Everything identifier resolution consults: opcode identifiers, nested
/// script sources, variable declarations and their operations, plus the
/// optional virtual machine for compile-time evaluations.
///
/// The list of scripts currently being compiled (for cycle detection) is
/// never part of the environment: it is threaded through compilation as an
/// explicit parameter.
#[derive(Default)]
pub struct CompilationEnvironment {
    /// Opcode identifier to bytecode byte.
    pub opcodes: BTreeMap<String, u8>,
    /// Script identifier to BTL source.
    pub scripts: BTreeMap<String, String>,
    /// Declared template variables.
    pub variables: BTreeMap<String, Variable>,
    /// Operation tables for variable types and built-in variables.
    pub operations: CompilerOperations,
    /// The virtual machine used by `$(...)` evaluations; without one, any
    /// evaluation is a reduction error.
    pub vm: Option<Box<dyn EvaluationVm>>,
}

/// Per-compilation inputs read by compiler operations.
#[derive(Clone, Debug, Default)]
pub struct CompilationData {
    /// Public keys by `Key` variable identifier.
    pub keys: BTreeMap<String, Vec<u8>>,
    /// Derived public keys by `HdKey` variable identifier.
    pub hd_keys: BTreeMap<String, Vec<u8>>,
    /// Precomputed signatures by full identifier (e.g.
    /// `owner.signature.all_outputs`). Signing itself happens outside the
    /// compiler.
    pub signatures: BTreeMap<String, Vec<u8>>,
    /// Bytecode by `AddressData` variable identifier.
    pub address_data: BTreeMap<String, Vec<u8>>,
    /// Bytecode by `WalletData` variable identifier.
    pub wallet_data: BTreeMap<String, Vec<u8>>,
    /// Resolves the `current_block_height` built-in.
    pub current_block_height: Option<u32>,
    /// Resolves the `current_block_time` built-in (UNIX timestamp).
    pub current_block_time: Option<u32>,
    /// Transaction context for `signing_serialization.*` built-ins.
    pub transaction_context: Option<TxContext>,
    /// The bytecode covered by signature checks, for
    /// `signing_serialization.covered_bytecode` and the full-serialization
    /// operations.
    pub covered_bytecode: Option<Vec<u8>>,
}
