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

use crate::digest::{hash160, hash256, Digest, Ripemd160, Sha1, Sha256};
use crate::instruction::serialize_instructions;
use crate::sighash::signing_serialization_digest;
use crate::sigtypes::{DataSignature, SigError, TxSignature};
use crate::state::{MAX_OPS_PER_SCRIPT, MAX_PUBKEYS_PER_MULTISIG};
use crate::{ProgramState, VmError};

fn digest_top(state: &mut ProgramState, digest: impl FnOnce(&[u8]) -> Vec<u8>) {
    match state.pop() {
        Ok(item) => state.push(digest(&item)),
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_ripemd160(state: &mut ProgramState) {
    digest_top(state, |item| Ripemd160::hash(item).to_vec())
}

pub(crate) fn op_sha1(state: &mut ProgramState) {
    digest_top(state, |item| Sha1::hash(item).to_vec())
}

pub(crate) fn op_sha256(state: &mut ProgramState) {
    digest_top(state, |item| Sha256::hash(item).to_vec())
}

pub(crate) fn op_hash160(state: &mut ProgramState) {
    digest_top(state, |item| hash160(item).to_vec())
}

pub(crate) fn op_hash256(state: &mut ProgramState) {
    digest_top(state, |item| hash256(item).to_vec())
}

/// `OP_CODESEPARATOR`: signature checks after this point cover only the
/// following instructions.
pub(crate) fn op_codeseparator(state: &mut ProgramState) {
    state.last_code_separator = Some(state.ip);
}

/// The serialized bytecode covered by transaction signature checks: every
/// instruction after the last executed `OP_CODESEPARATOR`.
fn covered_bytecode(state: &ProgramState) -> Vec<u8> {
    let start = state.last_code_separator.map_or(0, |separator| separator + 1);
    serialize_instructions(&state.instructions[start.min(state.instructions.len())..])
}

fn sig_error(err: SigError) -> VmError {
    match err {
        SigError::SighashType(_) => VmError::InvalidSighashType,
        SigError::PublicKeyEncoding => VmError::InvalidPublicKeyEncoding,
        SigError::EmptySignature | SigError::DerEncoding | SigError::SchnorrEncoding => {
            VmError::InvalidSignatureEncoding
        }
    }
}

/// `OP_CHECKSIG`: verifies a transaction signature over the signing
/// serialization of the current evaluation.
pub(crate) fn op_checksig(state: &mut ProgramState, require_null_failure: bool) {
    let pubkey_item = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    let sig_item = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    if sig_item.is_empty() {
        return state.push_bool(false);
    }
    let pubkey = match crate::sigtypes::parse_pubkey(&pubkey_item) {
        Ok(pubkey) => pubkey,
        Err(err) => return state.fail(sig_error(err)),
    };
    let signature = match TxSignature::from_bytes(&sig_item) {
        Ok(signature) => signature,
        Err(err) => return state.fail(sig_error(err)),
    };
    let digest = signing_serialization_digest(
        &state.context,
        &covered_bytecode(state),
        signature.sighash_type,
    );
    let valid = signature.verify(digest, &pubkey);
    if !valid && require_null_failure {
        return state.fail(VmError::NonNullSignatureFailure);
    }
    state.push_bool(valid);
}

/// `OP_CHECKMULTISIG`: verifies an m-of-n threshold of transaction
/// signatures; signatures must appear in public-key order. Schnorr
/// signatures are rejected here.
pub(crate) fn op_checkmultisig(
    state: &mut ProgramState,
    require_minimal: bool,
    require_null_failure: bool,
    require_bug_value_zero: bool,
) {
    let pubkey_count = match state.pop_num(require_minimal) {
        Ok(num) => num.into_i64(),
        Err(err) => return state.fail(err),
    };
    if !(0..=MAX_PUBKEYS_PER_MULTISIG).contains(&pubkey_count) {
        return state.fail(VmError::InvalidMultisigPublicKeyCount);
    }
    // Consensus counts every provided public key towards the operation
    // limit.
    state.operation_count += pubkey_count as usize;
    if state.operation_count > MAX_OPS_PER_SCRIPT {
        return state.fail(VmError::ExceededMaximumOperationCount);
    }
    let mut pubkeys = Vec::with_capacity(pubkey_count as usize);
    for _ in 0..pubkey_count {
        match state.pop() {
            Ok(item) => pubkeys.push(item),
            Err(err) => return state.fail(err),
        }
    }
    pubkeys.reverse();

    let sig_count = match state.pop_num(require_minimal) {
        Ok(num) => num.into_i64(),
        Err(err) => return state.fail(err),
    };
    if !(0..=pubkey_count).contains(&sig_count) {
        return state.fail(VmError::InvalidMultisigSignatureCount);
    }
    let mut sig_items = Vec::with_capacity(sig_count as usize);
    for _ in 0..sig_count {
        match state.pop() {
            Ok(item) => sig_items.push(item),
            Err(err) => return state.fail(err),
        }
    }
    sig_items.reverse();

    // The historic consume-one-extra bug of the reference implementation.
    let bug_value = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    if require_bug_value_zero && !bug_value.is_empty() {
        return state.fail(VmError::NonEmptyMultisigBugValue);
    }

    let covered = covered_bytecode(state);
    let mut key_index = 0usize;
    let mut valid = true;
    for sig_item in &sig_items {
        if sig_item.len() == 65 {
            return state.fail(VmError::SchnorrSignatureInMultisig);
        }
        if sig_item.is_empty() {
            valid = false;
            continue;
        }
        let signature = match TxSignature::from_bytes(sig_item) {
            Ok(signature) => signature,
            Err(err) => return state.fail(sig_error(err)),
        };
        let digest = signing_serialization_digest(&state.context, &covered, signature.sighash_type);
        let mut matched = false;
        while key_index < pubkeys.len() {
            let candidate = &pubkeys[key_index];
            key_index += 1;
            if let Ok(pubkey) = crate::sigtypes::parse_pubkey(candidate) {
                if signature.verify(digest, &pubkey) {
                    matched = true;
                    break;
                }
            }
        }
        if !matched {
            valid = false;
        }
    }

    if !valid && require_null_failure && sig_items.iter().any(|item| !item.is_empty()) {
        return state.fail(VmError::NonNullSignatureFailure);
    }
    state.push_bool(valid);
}

/// `OP_CHECKDATASIG`: verifies a data signature over the single SHA256 of an
/// arbitrary message.
pub(crate) fn op_checkdatasig(state: &mut ProgramState, require_null_failure: bool) {
    let pubkey_item = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    let message = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    let sig_item = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    if sig_item.is_empty() {
        return state.push_bool(false);
    }
    let pubkey = match crate::sigtypes::parse_pubkey(&pubkey_item) {
        Ok(pubkey) => pubkey,
        Err(err) => return state.fail(sig_error(err)),
    };
    let signature = match DataSignature::from_bytes(&sig_item) {
        Ok(signature) => signature,
        Err(err) => return state.fail(sig_error(err)),
    };
    let valid = signature.verify(Sha256::hash(&message), &pubkey);
    if !valid && require_null_failure {
        return state.fail(VmError::NonNullSignatureFailure);
    }
    state.push_bool(valid);
}
