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

//! Bitcoin Cash script virtual machine: bytecode parsing and disassembly,
//! per-instruction state transitions under consensus resource limits, the
//! flag-driven BCH rule-set matrix and the transaction-validation wrapper
//! with P2SH and SegWit-recovery handling.
//!
//! Cryptographic primitives are collaborators: hashing goes through the
//! [`digest`] seam and all elliptic-curve operations through the re-exported
//! `secp256k1` crate.

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate strict_encoding;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

/// Re-export of `secp256k1` crate.
pub extern crate secp256k1;

pub mod opcodes;
mod instruction;
mod script;
mod num;
mod digest;
mod timelocks;
mod sigtypes;
mod sighash;
mod state;
mod error;
mod ops;
mod vm;

pub use digest::{hash160, hash256, Digest, Ripemd160, Sha1, Sha256};
pub use error::VmError;
pub use instruction::{
    disassemble_bytecode, encode_data_push, instructions_are_malformed, parse_bytecode,
    push_is_minimal, serialize_instructions, Instruction,
};
pub use num::{item_is_truthy, ScriptNum, MAX_SCRIPT_NUMBER_LENGTH};
pub use script::{
    is_witness_program, LockingBytecode, RedeemBytecode, ScriptByteArray, ScriptBytes, ScriptHash,
    UnlockingBytecode, MAX_BYTECODE_LENGTH,
};
pub use sighash::{push_var_int, signing_serialization, signing_serialization_digest};
pub use sigtypes::{
    parse_pubkey, DataSignature, Sig, SigError, SighashFlag, SighashType, TxSignature,
    SIGHASH_ANYONECANPAY, SIGHASH_FORKID,
};
pub use state::{
    Outpoint, ProgramState, Sats, TxContext, Txid, Vout, MAX_OPS_PER_SCRIPT, MAX_PUBKEYS_PER_MULTISIG,
    MAX_STACK_DEPTH, MAX_STACK_ITEM_LENGTH,
};
pub use timelocks::{LockTime, SeqNo, LOCKTIME_THRESHOLD};
pub use vm::{AuthenticationProgram, BchVm, VmFlags};

pub const LIB_NAME_BITAUTH: &str = "Bitauth";
