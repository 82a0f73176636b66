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

use crate::instruction::{instructions_are_malformed, parse_bytecode};
use crate::num::item_is_truthy;
use crate::ops;
use crate::opcodes::*;
use crate::script::{is_witness_program, LockingBytecode, UnlockingBytecode, MAX_BYTECODE_LENGTH};
use crate::state::{MAX_OPS_PER_SCRIPT, MAX_STACK_DEPTH, MAX_STACK_ITEM_LENGTH};
use crate::{Instruction, ProgramState, TxContext, VmError};

/// The four rule-set booleans tuning evaluation strictness. The named
/// [`BchVm`] presets are combinations of these; the booleans remain the real
/// configuration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct VmFlags {
    /// Fail on `OP_NOP1`/`OP_NOP4..OP_NOP10` instead of ignoring them.
    pub disallow_upgradable_nops: bool,
    /// Require the extra item consumed by `OP_CHECKMULTISIG` to be empty.
    pub require_bug_value_zero: bool,
    /// Require minimal encoding of script numbers and data pushes.
    pub require_minimal_encoding: bool,
    /// Require failing signature checks to have consumed only empty
    /// signatures.
    pub require_null_signature_failures: bool,
}

/// A complete transaction-validation program: both bytecode sides plus the
/// transaction context they are validated under.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct AuthenticationProgram {
    pub unlocking_bytecode: UnlockingBytecode,
    pub locking_bytecode: LockingBytecode,
    pub context: TxContext,
}

/// The BCH virtual machine: a stack machine over parsed instructions, plus
/// the consensus wrapper validating unlocking/locking bytecode pairs with
/// P2SH and the SegWit-recovery exemption.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BchVm {
    pub flags: VmFlags,
}

impl Default for BchVm {
    fn default() -> Self { Self::BCH_2019_11 }
}

impl BchVm {
    /// The May 2019 rule set.
    pub const BCH_2019_05: Self = BchVm {
        flags: VmFlags {
            disallow_upgradable_nops: false,
            require_bug_value_zero: false,
            require_minimal_encoding: false,
            require_null_signature_failures: false,
        },
    };
    /// The May 2019 rule set with all strictness requirements enabled.
    pub const BCH_2019_05_STRICT: Self = BchVm {
        flags: VmFlags {
            disallow_upgradable_nops: true,
            require_bug_value_zero: true,
            require_minimal_encoding: true,
            require_null_signature_failures: true,
        },
    };
    /// The November 2019 rule set: minimal encoding and null signature
    /// failures became consensus rules.
    pub const BCH_2019_11: Self = BchVm {
        flags: VmFlags {
            disallow_upgradable_nops: false,
            require_bug_value_zero: false,
            require_minimal_encoding: true,
            require_null_signature_failures: true,
        },
    };
    /// The November 2019 rule set with all strictness requirements enabled.
    pub const BCH_2019_11_STRICT: Self = Self::BCH_2019_05_STRICT;

    pub const fn with(flags: VmFlags) -> Self { BchVm { flags } }

    /// Executes the instruction at the current pointer and advances it,
    /// applying the conditional-execution gate, operation counting and
    /// resource limits.
    pub fn step(&self, state: &mut ProgramState) {
        let Some(instruction) = state.instructions.get(state.ip).cloned() else {
            return;
        };
        let opcode = instruction.opcode();
        if instruction.is_malformed() {
            state.fail(VmError::MalformedPush);
            state.ip += 1;
            return;
        }
        if !state.executing() && !is_conditional_flow_op(opcode) {
            state.ip += 1;
            return;
        }
        if opcode > OP_16 {
            state.operation_count += 1;
            if state.operation_count > MAX_OPS_PER_SCRIPT {
                state.fail(VmError::ExceededMaximumOperationCount);
                state.ip += 1;
                return;
            }
        }
        self.execute(&instruction, state);
        state.ip += 1;
        self.check_limits(state);
    }

    /// Drives an evaluation to completion: steps until an error is recorded
    /// or the instruction pointer passes the final instruction.
    pub fn run(&self, state: &mut ProgramState) {
        while state.error.is_none() && state.ip < state.instructions.len() {
            self.step(state);
        }
    }

    /// Evaluates `instructions` over an initial `stack`, returning the final
    /// state.
    pub fn evaluate(
        &self,
        instructions: Vec<Instruction>,
        stack: Vec<Vec<u8>>,
        context: TxContext,
    ) -> ProgramState {
        let mut state = ProgramState::with(instructions, stack, context);
        self.run(&mut state);
        state
    }

    /// Like [`BchVm::evaluate`], additionally recording every intermediate
    /// state: entry `i` is the state after executing instruction `i`.
    pub fn debug(
        &self,
        instructions: Vec<Instruction>,
        stack: Vec<Vec<u8>>,
        context: TxContext,
    ) -> Vec<ProgramState> {
        let mut state = ProgramState::with(instructions, stack, context);
        let mut samples = Vec::with_capacity(state.instructions.len());
        while state.error.is_none() && state.ip < state.instructions.len() {
            self.step(&mut state);
            samples.push(state.clone());
        }
        if samples.is_empty() {
            samples.push(state);
        }
        samples
    }

    /// Validates a transaction input: the consensus evaluation order over
    /// unlocking and locking bytecode, including the P2SH path and the
    /// SegWit-recovery exemption.
    pub fn evaluate_program(&self, program: &AuthenticationProgram) -> ProgramState {
        let fail = |error: VmError| {
            let mut state = ProgramState::with(vec![], vec![], program.context.clone());
            state.fail(error);
            state
        };

        if program.unlocking_bytecode.len() > MAX_BYTECODE_LENGTH {
            return fail(VmError::ExceededMaximumBytecodeLengthUnlocking);
        }
        let unlocking_instructions = parse_bytecode(&program.unlocking_bytecode);
        if instructions_are_malformed(&unlocking_instructions) {
            return fail(VmError::MalformedUnlockingBytecode);
        }
        if program.locking_bytecode.len() > MAX_BYTECODE_LENGTH {
            return fail(VmError::ExceededMaximumBytecodeLengthLocking);
        }
        let locking_instructions = parse_bytecode(&program.locking_bytecode);
        if instructions_are_malformed(&locking_instructions) {
            return fail(VmError::MalformedLockingBytecode);
        }
        if unlocking_instructions.iter().any(|instruction| !is_push(instruction.opcode())) {
            return fail(VmError::RequiresPushOnly);
        }

        let unlocking_state =
            self.evaluate(unlocking_instructions, vec![], program.context.clone());
        if unlocking_state.error.is_some() {
            return unlocking_state;
        }
        let mut locking_state = self.evaluate(
            locking_instructions,
            unlocking_state.stack.clone(),
            program.context.clone(),
        );

        if !program.locking_bytecode.is_p2sh() {
            return locking_state;
        }

        let mut p2sh_stack = unlocking_state.stack;
        let Some(p2sh_bytecode) = p2sh_stack.pop() else {
            return locking_state;
        };
        // Consensus exemption: SegWit-shaped redeem bytecode is not
        // re-evaluated, so that BTC-style refunds stay spendable.
        if p2sh_stack.is_empty() && is_witness_program(&p2sh_bytecode) {
            return locking_state;
        }
        let p2sh_instructions = parse_bytecode(&p2sh_bytecode);
        if instructions_are_malformed(&p2sh_instructions) {
            locking_state.fail(VmError::MalformedP2shBytecode);
            return locking_state;
        }
        self.evaluate(p2sh_instructions, p2sh_stack, program.context.clone())
    }

    /// The final acceptance predicate over an evaluation result.
    pub fn verify(&self, state: &ProgramState) -> Result<(), VmError> {
        if let Some(error) = &state.error {
            return Err(error.clone());
        }
        if !state.execution_stack.is_empty() {
            return Err(VmError::NonEmptyExecutionStack);
        }
        if state.stack.len() > 1 {
            return Err(VmError::RequiresCleanStack);
        }
        let Some(top) = state.stack.last() else {
            return Err(VmError::UnexpectedEmptyStack);
        };
        if !item_is_truthy(top) {
            return Err(VmError::UnsuccessfulEvaluation);
        }
        Ok(())
    }

    /// Validates a program and applies the acceptance predicate.
    pub fn verify_program(&self, program: &AuthenticationProgram) -> Result<(), VmError> {
        self.verify(&self.evaluate_program(program))
    }

    fn execute(&self, instruction: &Instruction, state: &mut ProgramState) {
        let minimal = self.flags.require_minimal_encoding;
        let null_failure = self.flags.require_null_signature_failures;
        let opcode = instruction.opcode();
        match opcode {
            OP_0..=OP_PUSHDATA4 | OP_1NEGATE | OP_1..=OP_16 => {
                ops::push::op_push(state, instruction, minimal)
            }
            OP_NOP => ops::nop::op_nop(state),
            OP_IF => ops::flow::op_if(state, false),
            OP_NOTIF => ops::flow::op_if(state, true),
            OP_ELSE => ops::flow::op_else(state),
            OP_ENDIF => ops::flow::op_endif(state),
            OP_VERIFY => ops::flow::op_verify(state),
            OP_RETURN => ops::flow::op_return(state),
            OP_RESERVED | OP_VER | OP_VERIF | OP_VERNOTIF | OP_RESERVED1 | OP_RESERVED2 => state
                .fail(VmError::ReservedOpcode(
                    opcode_name(opcode).expect("reserved opcodes are named").to_owned(),
                )),
            OP_TOALTSTACK => ops::stack::op_toaltstack(state),
            OP_FROMALTSTACK => ops::stack::op_fromaltstack(state),
            OP_2DROP => ops::stack::op_2drop(state),
            OP_2DUP => ops::stack::op_2dup(state),
            OP_3DUP => ops::stack::op_3dup(state),
            OP_2OVER => ops::stack::op_2over(state),
            OP_2ROT => ops::stack::op_2rot(state),
            OP_2SWAP => ops::stack::op_2swap(state),
            OP_IFDUP => ops::stack::op_ifdup(state),
            OP_DEPTH => ops::stack::op_depth(state),
            OP_DROP => ops::stack::op_drop(state),
            OP_DUP => ops::stack::op_dup(state),
            OP_NIP => ops::stack::op_nip(state),
            OP_OVER => ops::stack::op_over(state),
            OP_PICK => ops::stack::op_pick(state, minimal, false),
            OP_ROLL => ops::stack::op_pick(state, minimal, true),
            OP_ROT => ops::stack::op_rot(state),
            OP_SWAP => ops::stack::op_swap(state),
            OP_TUCK => ops::stack::op_tuck(state),
            OP_CAT => ops::splice::op_cat(state),
            OP_SPLIT => ops::splice::op_split(state, minimal),
            OP_NUM2BIN => ops::splice::op_num2bin(state, minimal),
            OP_BIN2NUM => ops::splice::op_bin2num(state),
            OP_SIZE => ops::splice::op_size(state),
            OP_INVERT | OP_2MUL | OP_2DIV | OP_MUL | OP_LSHIFT | OP_RSHIFT => state.fail(
                VmError::DisabledOpcode(
                    opcode_name(opcode).expect("disabled opcodes are named").to_owned(),
                ),
            ),
            OP_AND => ops::bitwise::op_and(state),
            OP_OR => ops::bitwise::op_or(state),
            OP_XOR => ops::bitwise::op_xor(state),
            OP_EQUAL => ops::bitwise::op_equal(state),
            OP_EQUALVERIFY => {
                ops::bitwise::op_equal(state);
                if state.error.is_none() {
                    ops::flow::op_verify(state);
                }
            }
            OP_1ADD => ops::arithmetic::op_1add(state, minimal),
            OP_1SUB => ops::arithmetic::op_1sub(state, minimal),
            OP_NEGATE => ops::arithmetic::op_negate(state, minimal),
            OP_ABS => ops::arithmetic::op_abs(state, minimal),
            OP_NOT => ops::arithmetic::op_not(state, minimal),
            OP_0NOTEQUAL => ops::arithmetic::op_0notequal(state, minimal),
            OP_ADD => ops::arithmetic::op_add(state, minimal),
            OP_SUB => ops::arithmetic::op_sub(state, minimal),
            OP_DIV => ops::arithmetic::op_div(state, minimal),
            OP_MOD => ops::arithmetic::op_mod(state, minimal),
            OP_BOOLAND => ops::arithmetic::op_booland(state, minimal),
            OP_BOOLOR => ops::arithmetic::op_boolor(state, minimal),
            OP_NUMEQUAL => ops::arithmetic::op_numequal(state, minimal),
            OP_NUMEQUALVERIFY => {
                ops::arithmetic::op_numequal(state, minimal);
                if state.error.is_none() {
                    ops::flow::op_verify(state);
                }
            }
            OP_NUMNOTEQUAL => ops::arithmetic::op_numnotequal(state, minimal),
            OP_LESSTHAN => ops::arithmetic::op_lessthan(state, minimal),
            OP_GREATERTHAN => ops::arithmetic::op_greaterthan(state, minimal),
            OP_LESSTHANOREQUAL => ops::arithmetic::op_lessthanorequal(state, minimal),
            OP_GREATERTHANOREQUAL => ops::arithmetic::op_greaterthanorequal(state, minimal),
            OP_MIN => ops::arithmetic::op_min(state, minimal),
            OP_MAX => ops::arithmetic::op_max(state, minimal),
            OP_WITHIN => ops::arithmetic::op_within(state, minimal),
            OP_RIPEMD160 => ops::crypto::op_ripemd160(state),
            OP_SHA1 => ops::crypto::op_sha1(state),
            OP_SHA256 => ops::crypto::op_sha256(state),
            OP_HASH160 => ops::crypto::op_hash160(state),
            OP_HASH256 => ops::crypto::op_hash256(state),
            OP_CODESEPARATOR => ops::crypto::op_codeseparator(state),
            OP_CHECKSIG => ops::crypto::op_checksig(state, null_failure),
            OP_CHECKSIGVERIFY => {
                ops::crypto::op_checksig(state, null_failure);
                if state.error.is_none() {
                    ops::flow::op_verify(state);
                }
            }
            OP_CHECKMULTISIG => ops::crypto::op_checkmultisig(
                state,
                minimal,
                null_failure,
                self.flags.require_bug_value_zero,
            ),
            OP_CHECKMULTISIGVERIFY => {
                ops::crypto::op_checkmultisig(
                    state,
                    minimal,
                    null_failure,
                    self.flags.require_bug_value_zero,
                );
                if state.error.is_none() {
                    ops::flow::op_verify(state);
                }
            }
            OP_NOP1 | OP_NOP4..=OP_NOP10 => {
                ops::nop::op_upgradable_nop(state, self.flags.disallow_upgradable_nops)
            }
            OP_CHECKLOCKTIMEVERIFY => ops::time::op_checklocktimeverify(state, minimal),
            OP_CHECKSEQUENCEVERIFY => ops::time::op_checksequenceverify(state, minimal),
            OP_CHECKDATASIG => ops::crypto::op_checkdatasig(state, null_failure),
            OP_CHECKDATASIGVERIFY => {
                ops::crypto::op_checkdatasig(state, null_failure);
                if state.error.is_none() {
                    ops::flow::op_verify(state);
                }
            }
            undefined => state.fail(VmError::UnknownOpcode(undefined)),
        }
    }

    fn check_limits(&self, state: &mut ProgramState) {
        if state.error.is_some() {
            return;
        }
        if state.combined_depth() > MAX_STACK_DEPTH {
            return state.fail(VmError::ExceededMaximumStackDepth);
        }
        if state.stack.last().map_or(false, |top| top.len() > MAX_STACK_ITEM_LENGTH) {
            state.fail(VmError::ExceededMaximumStackItemLength);
        }
    }
}

/// Flow-control opcodes which execute inside inactive conditional branches
/// (they maintain the execution stack itself).
const fn is_conditional_flow_op(opcode: u8) -> bool {
    matches!(opcode, OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::instruction::encode_data_push;
    use crate::RedeemBytecode;

    fn program(unlocking: Vec<u8>, locking: Vec<u8>) -> AuthenticationProgram {
        AuthenticationProgram {
            unlocking_bytecode: UnlockingBytecode::from_unsafe(unlocking),
            locking_bytecode: LockingBytecode::from_unsafe(locking),
            context: TxContext::default(),
        }
    }

    fn evaluate_bytes(bytecode: &[u8]) -> ProgramState {
        BchVm::BCH_2019_11.evaluate(parse_bytecode(bytecode), vec![], TxContext::default())
    }

    #[test]
    fn add_program() {
        let state = evaluate_bytes(&[OP_1, OP_2, OP_ADD]);
        assert_eq!(state.error, None);
        assert_eq!(state.stack, vec![vec![0x03]]);
        assert_eq!(state.operation_count, 1);
    }

    #[test]
    fn conditional_branches() {
        // IF 2 ELSE 3 ENDIF over a true condition.
        let state = evaluate_bytes(&[OP_1, OP_IF, OP_2, OP_ELSE, OP_3, OP_ENDIF]);
        assert_eq!(state.error, None);
        assert_eq!(state.stack, vec![vec![0x02]]);

        let state = evaluate_bytes(&[OP_0, OP_IF, OP_2, OP_ELSE, OP_3, OP_ENDIF]);
        assert_eq!(state.stack, vec![vec![0x03]]);

        // Nested skipped branches must stay balanced.
        let state =
            evaluate_bytes(&[OP_0, OP_IF, OP_1, OP_IF, OP_2, OP_ENDIF, OP_ENDIF, OP_4]);
        assert_eq!(state.error, None);
        assert_eq!(state.stack, vec![vec![0x04]]);
    }

    #[test]
    fn unbalanced_conditional_detected_by_verify() {
        let vm = BchVm::BCH_2019_11;
        let state = evaluate_bytes(&[OP_1, OP_IF, OP_1]);
        assert_eq!(state.error, None);
        assert_eq!(vm.verify(&state), Err(VmError::NonEmptyExecutionStack));
    }

    #[test]
    fn operation_count_limit() {
        let mut bytecode = vec![OP_1];
        bytecode.extend(std::iter::repeat(OP_DUP).take(MAX_OPS_PER_SCRIPT));
        let state = evaluate_bytes(&bytecode);
        assert_eq!(state.error, None);

        bytecode.push(OP_DUP);
        let state = evaluate_bytes(&bytecode);
        assert_eq!(state.error, Some(VmError::ExceededMaximumOperationCount));
    }

    #[test]
    fn stack_depth_limit() {
        // Pushes are not operations, so depth can be built past the
        // operation-count limit.
        let mut bytecode = vec![];
        for _ in 0..MAX_STACK_DEPTH {
            bytecode.push(OP_1);
        }
        let state = evaluate_bytes(&bytecode);
        assert_eq!(state.error, None);

        bytecode.push(OP_1);
        let state = evaluate_bytes(&bytecode);
        assert_eq!(state.error, Some(VmError::ExceededMaximumStackDepth));
    }

    #[test]
    fn unknown_and_disabled_opcodes() {
        let state = evaluate_bytes(&[0xbc]);
        assert_eq!(state.error, Some(VmError::UnknownOpcode(0xbc)));

        let state = evaluate_bytes(&[OP_1, OP_1, OP_MUL]);
        assert_eq!(state.error, Some(VmError::DisabledOpcode("OP_MUL".to_owned())));

        // Inside an inactive branch a disabled opcode is never executed.
        let state = evaluate_bytes(&[OP_0, OP_IF, OP_MUL, OP_ENDIF, OP_1]);
        assert_eq!(state.error, None);
    }

    #[test]
    fn minimal_encoding_flag_difference() {
        // A non-minimal push of 0x07 via OP_PUSHBYTES_1.
        let bytecode = [0x01, 0x07, OP_DROP, OP_1];
        let strict = BchVm::BCH_2019_11.evaluate(
            parse_bytecode(&bytecode),
            vec![],
            TxContext::default(),
        );
        assert_eq!(strict.error, Some(VmError::RequiresMinimalPushEncoding));

        let lax =
            BchVm::BCH_2019_05.evaluate(parse_bytecode(&bytecode), vec![], TxContext::default());
        assert_eq!(lax.error, None);
    }

    #[test]
    fn upgradable_nop_flag_difference() {
        let bytecode = [OP_1, OP_NOP1];
        let strict = BchVm::BCH_2019_05_STRICT.evaluate(
            parse_bytecode(&bytecode),
            vec![],
            TxContext::default(),
        );
        assert_eq!(strict.error, Some(VmError::DisallowedUpgradableNop));

        let lax =
            BchVm::BCH_2019_11.evaluate(parse_bytecode(&bytecode), vec![], TxContext::default());
        assert_eq!(lax.error, None);
    }

    #[test]
    fn debug_samples_instruction_order() {
        let vm = BchVm::BCH_2019_11;
        let samples =
            vm.debug(parse_bytecode(&[OP_1, OP_2, OP_ADD]), vec![], TxContext::default());
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].stack, vec![vec![0x01]]);
        assert_eq!(samples[1].stack, vec![vec![0x01], vec![0x02]]);
        assert_eq!(samples[2].stack, vec![vec![0x03]]);
        assert_eq!(samples[2].ip, 3);
    }

    #[test]
    fn requires_push_only_unlocking() {
        // Unlocking `OP_1 OP_2 OP_ADD` fails before any evaluation.
        let state = BchVm::BCH_2019_11
            .evaluate_program(&program(vec![OP_1, OP_2, OP_ADD], vec![OP_3, OP_EQUAL]));
        assert_eq!(state.error, Some(VmError::RequiresPushOnly));
    }

    #[test]
    fn two_phase_evaluation() {
        let vm = BchVm::BCH_2019_11;
        let state = vm.evaluate_program(&program(vec![OP_2, OP_3], vec![OP_ADD, OP_5, OP_EQUAL]));
        assert_eq!(state.error, None);
        assert!(vm.verify(&state).is_ok());

        let state = vm.evaluate_program(&program(vec![OP_2, OP_2], vec![OP_ADD, OP_5, OP_EQUAL]));
        assert_eq!(vm.verify(&state), Err(VmError::UnsuccessfulEvaluation));
    }

    #[test]
    fn oversized_and_malformed_bytecode() {
        let vm = BchVm::BCH_2019_11;
        let state = vm.evaluate_program(&program(vec![0u8; MAX_BYTECODE_LENGTH + 1], vec![OP_1]));
        assert_eq!(state.error, Some(VmError::ExceededMaximumBytecodeLengthUnlocking));

        let state = vm.evaluate_program(&program(vec![0x02, 0xaa], vec![OP_1]));
        assert_eq!(state.error, Some(VmError::MalformedUnlockingBytecode));

        let state = vm.evaluate_program(&program(vec![OP_1], vec![0x4c])); // PUSHDATA1 missing length
        assert_eq!(state.error, Some(VmError::MalformedLockingBytecode));
    }

    #[test]
    fn p2sh_redeem_evaluation() {
        let vm = BchVm::BCH_2019_11;
        // Redeem script `OP_1` committed to by the locking bytecode.
        let mut redeem = RedeemBytecode::new();
        redeem.push_opcode(OP_1);
        let locking = redeem.to_locking_bytecode();
        let unlocking = encode_data_push(redeem.as_slice());

        let state = vm.evaluate_program(&program(unlocking, locking.to_vec()));
        assert_eq!(state.error, None);
        assert!(vm.verify(&state).is_ok());

        // A redeem script leaving a falsy result fails verification.
        let mut falsy = RedeemBytecode::new();
        falsy.push_opcode(OP_0);
        let unlocking = encode_data_push(falsy.as_slice());
        let locking = falsy.to_locking_bytecode();
        let state = vm.evaluate_program(&program(unlocking, locking.to_vec()));
        assert_eq!(vm.verify(&state), Err(VmError::UnsuccessfulEvaluation));
    }

    #[test]
    fn p2sh_stack_carries_below_redeem_script() {
        let vm = BchVm::BCH_2019_11;
        // Redeem script `OP_3 OP_EQUAL` consuming one carried item.
        let mut redeem = RedeemBytecode::new();
        redeem.push_opcode(OP_3);
        redeem.push_opcode(OP_EQUAL);
        let locking = redeem.to_locking_bytecode();
        let mut unlocking = vec![OP_3];
        unlocking.extend(encode_data_push(redeem.as_slice()));

        let state = vm.evaluate_program(&program(unlocking, locking.to_vec()));
        assert_eq!(state.error, None);
        assert!(vm.verify(&state).is_ok());
    }

    #[test]
    fn segwit_recovery_exemption() {
        let vm = BchVm::BCH_2019_11;
        // A P2WPKH-shaped program: OP_0 OP_PUSHBYTES_20 <20 bytes>.
        let mut witness_program = vec![OP_0, 0x14];
        witness_program.extend_from_slice(&[0x42; 20]);
        assert!(is_witness_program(&witness_program));

        let redeem = RedeemBytecode::from_unsafe(witness_program);
        let locking = redeem.to_locking_bytecode();
        let unlocking = encode_data_push(redeem.as_slice());

        // Without the exemption the witness program would leave two items on
        // the stack and fail; the exemption returns the locking result (the
        // successful OP_EQUAL comparison) unchanged.
        let state = vm.evaluate_program(&program(unlocking, locking.to_vec()));
        assert_eq!(state.error, None);
        assert!(vm.verify(&state).is_ok());
    }

    #[test]
    fn segwit_shape_with_extra_stack_items_is_evaluated() {
        let vm = BchVm::BCH_2019_11;
        let mut witness_program = vec![OP_0, 0x14];
        witness_program.extend_from_slice(&[0x42; 20]);
        let redeem = RedeemBytecode::from_unsafe(witness_program);
        let locking = redeem.to_locking_bytecode();
        // An extra unlocking item disables the exemption; the redeem script
        // then executes and leaves two stack items.
        let mut unlocking = vec![OP_1];
        unlocking.extend(encode_data_push(redeem.as_slice()));

        let state = vm.evaluate_program(&program(unlocking, locking.to_vec()));
        assert_eq!(vm.verify(&state), Err(VmError::RequiresCleanStack));
    }
}
