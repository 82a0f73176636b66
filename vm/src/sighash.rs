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

//! BCH signing serialization (the BIP143 layout with the fork identifier),
//! covered by every transaction signature check.

use crate::digest::hash256;
use crate::sigtypes::{SighashFlag, SighashType};
use crate::state::TxContext;

/// Appends a Bitcoin variable-length integer.
///
/// Bitcoin consensus allows var-ints up to 64 bits; covered bytecode is
/// bounded far below the single-byte bracket in practice, yet the full
/// bracket table is kept for correctness.
pub fn push_var_int(buf: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xFC => buf.push(value as u8),
        0xFD..=0xFFFF => {
            buf.push(0xFD);
            buf.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x10000..=0xFFFFFFFF => {
            buf.push(0xFE);
            buf.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xFF);
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Builds the serialization covered by a transaction signature: the fixed
/// BIP143-style layout over the transaction context, the covered bytecode
/// (the serialized instructions after the last executed OP_CODESEPARATOR)
/// and the sighash type.
///
/// Component selection honors the sighash flags: `ANYONECANPAY` blanks the
/// outpoints digest, `NONE`/`SINGLE` blank the sequence digest, and the
/// outputs digest becomes the corresponding-output digest under `SINGLE` or
/// all-zero under `NONE`.
pub fn signing_serialization(
    context: &TxContext,
    covered_bytecode: &[u8],
    sighash_type: SighashType,
) -> Vec<u8> {
    const BLANK: [u8; 32] = [0u8; 32];

    let hash_prevouts = if sighash_type.anyone_can_pay {
        BLANK
    } else {
        context.transaction_outpoints_hash.to_byte_array()
    };
    let hash_sequence =
        if sighash_type.anyone_can_pay || sighash_type.flag != SighashFlag::All {
            BLANK
        } else {
            context.transaction_sequence_numbers_hash.to_byte_array()
        };
    let hash_outputs = match sighash_type.flag {
        SighashFlag::All => context.transaction_outputs_hash.to_byte_array(),
        SighashFlag::Single => context.corresponding_output_hash.to_byte_array(),
        SighashFlag::None => BLANK,
    };

    let mut buf = Vec::with_capacity(157 + covered_bytecode.len());
    buf.extend_from_slice(&context.version.to_le_bytes());
    buf.extend_from_slice(&hash_prevouts);
    buf.extend_from_slice(&hash_sequence);
    buf.extend_from_slice(&context.outpoint.txid.to_byte_array());
    buf.extend_from_slice(&context.outpoint.vout.to_u32().to_le_bytes());
    push_var_int(&mut buf, covered_bytecode.len() as u64);
    buf.extend_from_slice(covered_bytecode);
    buf.extend_from_slice(&context.output_value.sats().to_le_bytes());
    buf.extend_from_slice(&context.sequence.to_consensus_u32().to_le_bytes());
    buf.extend_from_slice(&hash_outputs);
    buf.extend_from_slice(&context.locktime.to_consensus_u32().to_le_bytes());
    buf.extend_from_slice(&sighash_type.to_consensus_u32().to_le_bytes());
    buf
}

/// The 32-byte message digest covered by a transaction signature: double
/// SHA256 of the signing serialization.
pub fn signing_serialization_digest(
    context: &TxContext,
    covered_bytecode: &[u8],
    sighash_type: SighashType,
) -> [u8; 32] {
    hash256(&signing_serialization(context, covered_bytecode, sighash_type))
}
