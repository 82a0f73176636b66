// Bitcoin Cash script virtual machine library.
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

use std::num::ParseIntError;
use std::str::FromStr;

use amplify::{Bytes32, Bytes32StrRev};

use crate::num::{item_is_truthy, ScriptNum};
use crate::{Instruction, LockTime, SeqNo, VmError, LIB_NAME_BITAUTH};

/// Maximum combined number of stack and alt stack items.
pub const MAX_STACK_DEPTH: usize = 1000;
/// Maximum byte length of a single stack item.
pub const MAX_STACK_ITEM_LENGTH: usize = 520;
/// Maximum number of non-push operations per evaluation.
pub const MAX_OPS_PER_SCRIPT: usize = 201;
/// Maximum number of public keys consumed by a single OP_CHECKMULTISIG.
pub const MAX_PUBKEYS_PER_MULTISIG: i64 = 20;

#[derive(Wrapper, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, From, Default)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
#[wrapper(BorrowSlice, Index, RangeOps, Debug, Hex, Display, FromStr)]
// all-zeros used in coinbase
pub struct Txid(
    #[from]
    #[from([u8; 32])]
    Bytes32StrRev,
);

impl From<Txid> for [u8; 32] {
    fn from(txid: Txid) -> Self { txid.to_byte_array() }
}

impl Txid {
    #[inline]
    pub fn coinbase() -> Self { Self(Bytes32StrRev::zero()) }
    #[inline]
    pub fn is_coinbase(&self) -> bool { self.to_byte_array() == [0u8; 32] }
    #[inline]
    pub fn to_byte_array(&self) -> [u8; 32] { self.0.to_byte_array() }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Default)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
#[display(inner)]
pub struct Vout(u32);

impl Vout {
    pub const fn from_u32(u: u32) -> Self { Vout(u) }
    #[inline]
    pub const fn into_u32(self) -> u32 { self.0 }
    #[inline]
    pub const fn to_u32(&self) -> u32 { self.0 }
}

impl FromStr for Vout {
    type Err = ParseIntError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> { s.parse().map(Self) }
}

/// Reference to the transaction output spent by the input under validation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Default)]
#[display("{txid}:{vout}")]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct Outpoint {
    pub txid: Txid,
    pub vout: Vout,
}

impl Outpoint {
    #[inline]
    pub fn new(txid: Txid, vout: impl Into<Vout>) -> Self {
        Self {
            txid,
            vout: vout.into(),
        }
    }

    #[inline]
    pub fn coinbase() -> Self {
        Self {
            txid: Txid::coinbase(),
            vout: Vout::from_u32(0),
        }
    }
}

#[derive(Wrapper, WrapperMut, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, From, Default)]
#[wrapper(Add, Sub, Mul, Div, FromStr)]
#[wrapper_mut(MathAssign)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct Sats(
    #[from]
    #[from(u32)]
    #[from(u16)]
    #[from(u8)]
    pub u64,
);

impl Sats {
    pub const ZERO: Self = Sats(0);
    #[allow(clippy::inconsistent_digit_grouping)]
    pub const BTC: Self = Sats(1_000_000_00);

    pub const fn from_btc(btc: u32) -> Self { Self(btc as u64 * Self::BTC.0) }
    pub fn from_sats(sats: impl Into<u64>) -> Self { Self(sats.into()) }

    pub const fn is_zero(&self) -> bool { self.0 == 0 }
    pub const fn sats(&self) -> u64 { self.0 }
}

/// Transaction context read (and never mutated) by the virtual machine: the
/// external state of an evaluation.
///
/// The transaction-wide digests are precomputed by the caller with double
/// SHA-256 over the respective serializations, as consensus prescribes for
/// the BCH signing serialization.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct TxContext {
    /// Transaction `nVersion`.
    pub version: u32,
    /// The outpoint spent by the input under validation.
    pub outpoint: Outpoint,
    /// Value of the output being spent.
    pub output_value: Sats,
    /// `nSequence` of the input under validation.
    pub sequence: SeqNo,
    /// Transaction `nLockTime`.
    pub locktime: LockTime,
    /// Double SHA256 of the serialized outpoints of all inputs.
    pub transaction_outpoints_hash: Bytes32,
    /// Double SHA256 of the serialized sequence numbers of all inputs.
    pub transaction_sequence_numbers_hash: Bytes32,
    /// Double SHA256 of all serialized outputs.
    pub transaction_outputs_hash: Bytes32,
    /// Double SHA256 of the output at the index of the input under
    /// validation (all-zero when no such output exists).
    pub corresponding_output_hash: Bytes32,
}

/// Complete state of a single bytecode evaluation.
///
/// A fresh state is created per evaluation; operations transform it in place
/// and the machine halts as soon as [`ProgramState::error`] is set or the
/// instruction pointer passes the final instruction.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ProgramState {
    /// The parsed program.
    pub instructions: Vec<Instruction>,
    /// Index of the next instruction to execute; always within
    /// `0..=instructions.len()`.
    pub ip: usize,
    /// The main stack.
    pub stack: Vec<Vec<u8>>,
    /// The alt stack.
    pub alt_stack: Vec<Vec<u8>>,
    /// One entry per open conditional block; an operation executes only when
    /// every entry is `true`.
    pub execution_stack: Vec<bool>,
    /// Index of the last executed OP_CODESEPARATOR, bounding the bytecode
    /// covered by signature checks.
    pub last_code_separator: Option<usize>,
    /// Number of executed non-push operations.
    pub operation_count: usize,
    /// The first rule violation, if any; evaluation halts once set.
    pub error: Option<VmError>,
    /// The transaction context of the evaluation.
    pub context: TxContext,
}

impl ProgramState {
    /// Initializes an evaluation over `instructions`, continuing from an
    /// already-populated stack.
    pub fn with(instructions: Vec<Instruction>, stack: Vec<Vec<u8>>, context: TxContext) -> Self {
        ProgramState {
            instructions,
            ip: 0,
            stack,
            alt_stack: vec![],
            execution_stack: vec![],
            last_code_separator: None,
            operation_count: 0,
            error: None,
            context,
        }
    }

    /// Detects whether the current position is inside fully-active
    /// conditional blocks.
    #[inline]
    pub fn executing(&self) -> bool { self.execution_stack.iter().all(|branch| *branch) }

    /// Records the first error; later violations do not overwrite it.
    #[inline]
    pub fn fail(&mut self, error: VmError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    #[inline]
    pub fn push(&mut self, item: Vec<u8>) { self.stack.push(item) }

    #[inline]
    pub fn push_num(&mut self, num: ScriptNum) { self.stack.push(num.to_bytes()) }

    #[inline]
    pub fn push_bool(&mut self, flag: bool) {
        self.stack.push(if flag { vec![0x01] } else { vec![] })
    }

    pub fn pop(&mut self) -> Result<Vec<u8>, VmError> {
        self.stack.pop().ok_or(VmError::EmptyStack)
    }

    pub fn pop_bool(&mut self) -> Result<bool, VmError> {
        self.pop().map(|item| item_is_truthy(&item))
    }

    pub fn pop_num(&mut self, require_minimal: bool) -> Result<ScriptNum, VmError> {
        let item = self.pop()?;
        ScriptNum::from_bytes(&item, require_minimal)
    }

    pub fn pop_alt(&mut self) -> Result<Vec<u8>, VmError> {
        self.alt_stack.pop().ok_or(VmError::EmptyAlternateStack)
    }

    pub fn peek(&self) -> Result<&Vec<u8>, VmError> {
        self.stack.last().ok_or(VmError::EmptyStack)
    }

    /// Combined stack and alt stack depth, bounded by [`MAX_STACK_DEPTH`].
    #[inline]
    pub fn combined_depth(&self) -> usize { self.stack.len() + self.alt_stack.len() }
}
