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

use crate::num::ScriptNum;
use crate::{LockTime, ProgramState, SeqNo, VmError};

/// Locktime operands may use up to 5 bytes, as the `nLockTime` range exceeds
/// the 4-byte script-number range.
const MAX_LOCKTIME_OPERAND_LENGTH: usize = 5;

/// `OP_CHECKLOCKTIMEVERIFY`: verifies the transaction locktime against the
/// top stack item, which stays on the stack.
pub(crate) fn op_checklocktimeverify(state: &mut ProgramState, require_minimal: bool) {
    let operand = match state.peek() {
        Ok(item) => item.clone(),
        Err(err) => return state.fail(err),
    };
    let required =
        match ScriptNum::from_bytes_limited(&operand, require_minimal, MAX_LOCKTIME_OPERAND_LENGTH)
        {
            Ok(num) => num.into_i64(),
            Err(err) => return state.fail(err),
        };
    if required < 0 {
        return state.fail(VmError::UnsatisfiedLocktime);
    }
    let required = LockTime::from_consensus_u32(required as u32);
    if !state.context.locktime.satisfies(required) || state.context.sequence.is_final() {
        state.fail(VmError::UnsatisfiedLocktime);
    }
}

/// `OP_CHECKSEQUENCEVERIFY`: verifies the input sequence number against the
/// top stack item, which stays on the stack.
pub(crate) fn op_checksequenceverify(state: &mut ProgramState, require_minimal: bool) {
    let operand = match state.peek() {
        Ok(item) => item.clone(),
        Err(err) => return state.fail(err),
    };
    let required =
        match ScriptNum::from_bytes_limited(&operand, require_minimal, MAX_LOCKTIME_OPERAND_LENGTH)
        {
            Ok(num) => num.into_i64(),
            Err(err) => return state.fail(err),
        };
    if required < 0 {
        return state.fail(VmError::UnsatisfiedSequenceNumber);
    }
    let required = SeqNo::from_consensus_u32(required as u32);
    // An operand with the disable flag set makes the check a no-op.
    if required.is_relative_disabled() {
        return;
    }
    if state.context.version < 2 || !state.context.sequence.satisfies(required) {
        state.fail(VmError::UnsatisfiedSequenceNumber);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TxContext;

    fn state_with(locktime: u32, sequence: u32, version: u32, operand: i64) -> ProgramState {
        let context = TxContext {
            version,
            locktime: LockTime::from_consensus_u32(locktime),
            sequence: SeqNo::from_consensus_u32(sequence),
            ..TxContext::default()
        };
        let mut state = ProgramState::with(vec![], vec![], context);
        state.push_num(ScriptNum::new(operand));
        state
    }

    #[test]
    fn locktime_satisfied() {
        let mut state = state_with(600_000, 0xFFFFFFFE, 2, 599_999);
        op_checklocktimeverify(&mut state, true);
        assert_eq!(state.error, None);
        // The operand stays on the stack.
        assert_eq!(state.stack.len(), 1);
    }

    #[test]
    fn locktime_unsatisfied() {
        let mut state = state_with(600_000, 0xFFFFFFFE, 2, 600_001);
        op_checklocktimeverify(&mut state, true);
        assert_eq!(state.error, Some(VmError::UnsatisfiedLocktime));

        // Mismatched units: height lock against a timestamp requirement.
        let mut state = state_with(600_000, 0xFFFFFFFE, 2, 1_600_000_000);
        op_checklocktimeverify(&mut state, true);
        assert_eq!(state.error, Some(VmError::UnsatisfiedLocktime));

        // A final sequence number opts out of locktime enforcement.
        let mut state = state_with(600_000, 0xFFFFFFFF, 2, 599_999);
        op_checklocktimeverify(&mut state, true);
        assert_eq!(state.error, Some(VmError::UnsatisfiedLocktime));

        let mut state = state_with(600_000, 0xFFFFFFFE, 2, -1);
        op_checklocktimeverify(&mut state, true);
        assert_eq!(state.error, Some(VmError::UnsatisfiedLocktime));
    }

    #[test]
    fn sequence_satisfied() {
        let mut state = state_with(0, 10, 2, 5);
        op_checksequenceverify(&mut state, true);
        assert_eq!(state.error, None);
        assert_eq!(state.stack.len(), 1);
    }

    #[test]
    fn sequence_disable_flag_bypasses() {
        let mut state = state_with(0, 0, 1, i64::from(SeqNo::DISABLE_FLAG));
        op_checksequenceverify(&mut state, true);
        assert_eq!(state.error, None);
    }

    #[test]
    fn sequence_unsatisfied() {
        let mut state = state_with(0, 5, 2, 10);
        op_checksequenceverify(&mut state, true);
        assert_eq!(state.error, Some(VmError::UnsatisfiedSequenceNumber));

        // Version-1 transactions cannot satisfy relative locktimes.
        let mut state = state_with(0, 10, 1, 5);
        op_checksequenceverify(&mut state, true);
        assert_eq!(state.error, Some(VmError::UnsatisfiedSequenceNumber));
    }
}
