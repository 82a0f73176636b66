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

use crate::instruction::push_is_minimal;
use crate::state::MAX_STACK_ITEM_LENGTH;
use crate::{Instruction, ProgramState, VmError};

/// Executes any push instruction: inline data pushes and the constant pushes
/// `OP_1NEGATE`/`OP_1..OP_16`.
pub(crate) fn op_push(
    state: &mut ProgramState,
    instruction: &Instruction,
    require_minimal: bool,
) {
    let Some(data) = instruction.pushed_data() else {
        // Non-push opcodes are never dispatched here.
        return state.fail(VmError::UnknownOpcode(instruction.opcode()));
    };
    if data.len() > MAX_STACK_ITEM_LENGTH {
        return state.fail(VmError::ExceededMaximumStackItemLength);
    }
    if let Instruction::Push { opcode, data } = instruction {
        if require_minimal && !push_is_minimal(*opcode, data) {
            return state.fail(VmError::RequiresMinimalPushEncoding);
        }
    }
    state.push(data);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::opcodes::*;
    use crate::TxContext;

    fn fresh() -> ProgramState { ProgramState::with(vec![], vec![], TxContext::default()) }

    #[test]
    fn inline_data() {
        let mut state = fresh();
        op_push(&mut state, &Instruction::Push { opcode: 0x02, data: vec![0xab, 0xcd] }, true);
        assert_eq!(state.error, None);
        assert_eq!(state.stack, vec![vec![0xab, 0xcd]]);
    }

    #[test]
    fn constant_pushes() {
        let mut state = fresh();
        op_push(&mut state, &Instruction::Op(OP_16), true);
        op_push(&mut state, &Instruction::Op(OP_1NEGATE), true);
        assert_eq!(state.stack, vec![vec![0x10], vec![0x81]]);
    }

    #[test]
    fn non_minimal_push_rejected() {
        // A single 0x07 byte must use OP_7, not OP_PUSHBYTES_1.
        let instruction = Instruction::Push { opcode: 0x01, data: vec![0x07] };
        let mut state = fresh();
        op_push(&mut state, &instruction, false);
        assert_eq!(state.error, None);

        let mut state = fresh();
        op_push(&mut state, &instruction, true);
        assert_eq!(state.error, Some(VmError::RequiresMinimalPushEncoding));
    }

    #[test]
    fn oversized_push_rejected() {
        let mut state = fresh();
        op_push(
            &mut state,
            &Instruction::Push { opcode: OP_PUSHDATA2, data: vec![0; MAX_STACK_ITEM_LENGTH + 1] },
            false,
        );
        assert_eq!(state.error, Some(VmError::ExceededMaximumStackItemLength));
    }
}
