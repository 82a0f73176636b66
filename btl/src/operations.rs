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

//! The standard compiler operations: pure functions resolving variable
//! identifiers to bytecode from the per-compilation data.
//!
//! Key signing happens outside the compiler (elliptic-curve signing is a
//! collaborator concern), so `signature`/`data_signature` operations resolve
//! from precomputed signatures supplied in [`CompilationData`].

use std::collections::BTreeMap;

use bavm::{push_var_int, signing_serialization, SighashType};

use crate::environment::{
    CompilationData, CompilationEnvironment, CompilerOperations, OperationSet,
};
use crate::resolver::bigint_to_script_number;

/// The standard operation tables for every variable type and built-in.
pub fn standard_operations() -> CompilerOperations {
    CompilerOperations {
        key: Some(OperationSet::Map(BTreeMap::from([
            ("public_key".to_owned(), op_key_public_key as crate::CompilerOperation),
            ("signature".to_owned(), op_data_signature_lookup as _),
            ("data_signature".to_owned(), op_data_signature_lookup as _),
        ]))),
        hd_key: Some(OperationSet::Map(BTreeMap::from([
            ("public_key".to_owned(), op_hd_key_public_key as crate::CompilerOperation),
            ("signature".to_owned(), op_data_signature_lookup as _),
            ("data_signature".to_owned(), op_data_signature_lookup as _),
        ]))),
        address_data: Some(OperationSet::Single(op_address_data)),
        wallet_data: Some(OperationSet::Single(op_wallet_data)),
        current_block_height: Some(OperationSet::Single(op_current_block_height)),
        current_block_time: Some(OperationSet::Single(op_current_block_time)),
        signing_serialization: Some(OperationSet::Map(signing_serialization_operations())),
    }
}

fn variable_id(identifier: &str) -> &str {
    identifier.split('.').next().expect("split yields at least one part")
}

fn op_address_data(
    identifier: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    data.address_data.get(variable_id(identifier)).cloned().ok_or(format!(
        "Identifier '{identifier}' refers to an AddressData, but no bytecode for it was provided \
         in the compilation data."
    ))
}

fn op_wallet_data(
    identifier: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    data.wallet_data.get(variable_id(identifier)).cloned().ok_or(format!(
        "Identifier '{identifier}' refers to a WalletData, but no bytecode for it was provided \
         in the compilation data."
    ))
}

fn op_key_public_key(
    identifier: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    data.keys.get(variable_id(identifier)).cloned().ok_or(format!(
        "Identifier '{identifier}' refers to a public key, but no public key for \
         '{}' was provided in the compilation data.",
        variable_id(identifier)
    ))
}

fn op_hd_key_public_key(
    identifier: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    data.hd_keys.get(variable_id(identifier)).cloned().ok_or(format!(
        "Identifier '{identifier}' refers to an HD public key, but no derived public key for \
         '{}' was provided in the compilation data.",
        variable_id(identifier)
    ))
}

/// `<variable>.signature.<sighash>` and `<variable>.data_signature.<id>`:
/// both resolve from precomputed signatures keyed by the full identifier.
fn op_data_signature_lookup(
    identifier: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    data.signatures.get(identifier).cloned().ok_or(format!(
        "Identifier '{identifier}' refers to a signature, but no signature for it was provided \
         in the compilation data."
    ))
}

fn op_current_block_height(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    data.current_block_height
        .map(|height| bigint_to_script_number(height as i128))
        .ok_or_else(|| {
            "The current block height was not provided in the compilation data.".to_owned()
        })
}

fn op_current_block_time(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    data.current_block_time
        .map(|time| bigint_to_script_number(time as i128))
        .ok_or_else(|| {
            "The current block time was not provided in the compilation data.".to_owned()
        })
}

fn signing_serialization_operations() -> BTreeMap<String, crate::CompilerOperation> {
    BTreeMap::from([
        ("version".to_owned(), op_ss_version as crate::CompilerOperation),
        ("transaction_outpoints_hash".to_owned(), op_ss_outpoints_hash as _),
        ("outpoint_transaction_hash".to_owned(), op_ss_outpoint_txid as _),
        ("outpoint_index".to_owned(), op_ss_outpoint_index as _),
        ("covered_bytecode_length".to_owned(), op_ss_covered_bytecode_length as _),
        ("covered_bytecode".to_owned(), op_ss_covered_bytecode as _),
        ("output_value".to_owned(), op_ss_output_value as _),
        ("sequence_number".to_owned(), op_ss_sequence_number as _),
        ("transaction_sequence_numbers_hash".to_owned(), op_ss_sequence_numbers_hash as _),
        ("transaction_outputs_hash".to_owned(), op_ss_outputs_hash as _),
        ("corresponding_output_hash".to_owned(), op_ss_corresponding_output_hash as _),
        ("locktime".to_owned(), op_ss_locktime as _),
        ("full_all_outputs".to_owned(), op_ss_full_all_outputs as _),
    ])
}

fn context(data: &CompilationData) -> Result<&bavm::TxContext, String> {
    data.transaction_context.as_ref().ok_or_else(|| {
        "Signing-serialization identifiers require a transaction context in the compilation data."
            .to_owned()
    })
}

fn covered(data: &CompilationData) -> Result<&Vec<u8>, String> {
    data.covered_bytecode.as_ref().ok_or_else(|| {
        "Signing-serialization identifiers require the covered bytecode in the compilation data."
            .to_owned()
    })
}

fn op_ss_version(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.version.to_le_bytes().to_vec())
}

fn op_ss_outpoints_hash(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.transaction_outpoints_hash.to_byte_array().to_vec())
}

fn op_ss_outpoint_txid(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.outpoint.txid.to_byte_array().to_vec())
}

fn op_ss_outpoint_index(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.outpoint.vout.to_u32().to_le_bytes().to_vec())
}

fn op_ss_covered_bytecode_length(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    let covered = covered(data)?;
    let mut buf = vec![];
    push_var_int(&mut buf, covered.len() as u64);
    Ok(buf)
}

fn op_ss_covered_bytecode(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    covered(data).cloned()
}

fn op_ss_output_value(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.output_value.sats().to_le_bytes().to_vec())
}

fn op_ss_sequence_number(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.sequence.to_consensus_u32().to_le_bytes().to_vec())
}

fn op_ss_sequence_numbers_hash(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.transaction_sequence_numbers_hash.to_byte_array().to_vec())
}

fn op_ss_outputs_hash(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.transaction_outputs_hash.to_byte_array().to_vec())
}

fn op_ss_corresponding_output_hash(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.corresponding_output_hash.to_byte_array().to_vec())
}

fn op_ss_locktime(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(context(data)?.locktime.to_consensus_u32().to_le_bytes().to_vec())
}

/// The complete signing serialization under `SIGHASH_ALL | SIGHASH_FORKID`.
fn op_ss_full_all_outputs(
    _: &str,
    data: &CompilationData,
    _: &CompilationEnvironment,
) -> Result<Vec<u8>, String> {
    Ok(signing_serialization(context(data)?, covered(data)?, SighashType::all()))
}
