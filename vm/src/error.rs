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

/// Failure modes of bytecode evaluation under the BCH rule set.
///
/// Errors are values: an evaluation never panics, it records the first
/// violation in [`crate::ProgramState::error`] and halts.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error)]
#[display(doc_comments)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[non_exhaustive]
pub enum VmError {
    /// unlocking bytecode exceeds the maximum bytecode length (10,000 bytes).
    ExceededMaximumBytecodeLengthUnlocking,

    /// locking bytecode exceeds the maximum bytecode length (10,000 bytes).
    ExceededMaximumBytecodeLengthLocking,

    /// unlocking bytecode ends with an incomplete data push.
    MalformedUnlockingBytecode,

    /// locking bytecode ends with an incomplete data push.
    MalformedLockingBytecode,

    /// redeem bytecode ends with an incomplete data push.
    MalformedP2shBytecode,

    /// unlocking bytecode may contain only push operations.
    RequiresPushOnly,

    /// an executed instruction ends with an incomplete data push.
    MalformedPush,

    /// the opcode `{0}` carries no meaning under the current rule set.
    UnknownOpcode(u8),

    /// the opcode `{0}` is disabled.
    DisabledOpcode(String),

    /// a reserved opcode `{0}` was executed.
    ReservedOpcode(String),

    /// use of a NOP opcode reserved for future upgrades.
    DisallowedUpgradableNop,

    /// exceeded the maximum operation count of 201 operations per evaluation.
    ExceededMaximumOperationCount,

    /// exceeded the maximum combined depth of 1,000 stack and alt stack items.
    ExceededMaximumStackDepth,

    /// a stack item exceeds the maximum stack item length of 520 bytes.
    ExceededMaximumStackItemLength,

    /// a script number exceeds the maximum script number length.
    ExceededMaximumScriptNumberLength,

    /// a script number is not minimally encoded.
    RequiresMinimalScriptNumberEncoding,

    /// a data push is not minimally encoded.
    RequiresMinimalPushEncoding,

    /// an operand required a stack item the stack does not hold.
    EmptyStack,

    /// an operand required an alt stack item the alt stack does not hold.
    EmptyAlternateStack,

    /// an OP_ELSE or OP_ENDIF has no preceding OP_IF or OP_NOTIF.
    UnexpectedElseOrEndIf,

    /// the evaluation ended inside an unclosed OP_IF or OP_NOTIF block.
    NonEmptyExecutionStack,

    /// OP_VERIFY consumed a falsy stack item.
    FailedVerify,

    /// OP_RETURN was executed.
    CalledReturn,

    /// a stack index operand is negative or out of range.
    InvalidStackIndex,

    /// an OP_SPLIT index is out of range of the split item.
    InvalidSplitIndex,

    /// OP_NUM2BIN cannot fit the number into the requested length.
    InsufficientNum2BinLength,

    /// division by zero.
    DivisionByZero,

    /// operands of a bitwise operation differ in length.
    MismatchedBitwiseOperandLength,

    /// a signature is not validly encoded for the current rule set.
    InvalidSignatureEncoding,

    /// a public key is not validly encoded.
    InvalidPublicKeyEncoding,

    /// a signature check covered no standard sighash type or lacks the BCH
    /// fork identifier.
    InvalidSighashType,

    /// a failing signature check consumed a non-empty signature.
    NonNullSignatureFailure,

    /// the dummy element consumed by OP_CHECKMULTISIG must be empty.
    NonEmptyMultisigBugValue,

    /// Schnorr signatures are not permitted in OP_CHECKMULTISIG.
    SchnorrSignatureInMultisig,

    /// the number of public keys given to OP_CHECKMULTISIG is out of range.
    InvalidMultisigPublicKeyCount,

    /// the number of signatures given to OP_CHECKMULTISIG is out of range.
    InvalidMultisigSignatureCount,

    /// the locktime requirement of OP_CHECKLOCKTIMEVERIFY is unsatisfied.
    UnsatisfiedLocktime,

    /// the sequence requirement of OP_CHECKSEQUENCEVERIFY is unsatisfied.
    UnsatisfiedSequenceNumber,

    /// the evaluation completed with more than one stack item.
    RequiresCleanStack,

    /// the evaluation completed with an empty stack.
    UnexpectedEmptyStack,

    /// the evaluation completed with a falsy top stack item.
    UnsuccessfulEvaluation,
}
