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

use crate::{ProgramState, VmError};

fn binary_bitwise(state: &mut ProgramState, op: impl Fn(u8, u8) -> u8) {
    let top = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    let second = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    if second.len() != top.len() {
        return state.fail(VmError::MismatchedBitwiseOperandLength);
    }
    let combined = second.iter().zip(top.iter()).map(|(a, b)| op(*a, *b)).collect();
    state.push(combined);
}

pub(crate) fn op_and(state: &mut ProgramState) { binary_bitwise(state, |a, b| a & b) }

pub(crate) fn op_or(state: &mut ProgramState) { binary_bitwise(state, |a, b| a | b) }

pub(crate) fn op_xor(state: &mut ProgramState) { binary_bitwise(state, |a, b| a ^ b) }

/// `OP_EQUAL`: byte-exact comparison of the top two items.
pub(crate) fn op_equal(state: &mut ProgramState) {
    let top = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    let second = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    state.push_bool(second == top);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TxContext;

    fn with_items(items: &[&[u8]]) -> ProgramState {
        let mut state = ProgramState::with(vec![], vec![], TxContext::default());
        for item in items {
            state.push(item.to_vec());
        }
        state
    }

    #[test]
    fn bitwise_combinations() {
        let mut state = with_items(&[&[0b1100], &[0b1010]]);
        op_and(&mut state);
        assert_eq!(state.stack, vec![vec![0b1000]]);

        let mut state = with_items(&[&[0b1100], &[0b1010]]);
        op_or(&mut state);
        assert_eq!(state.stack, vec![vec![0b1110]]);

        let mut state = with_items(&[&[0b1100], &[0b1010]]);
        op_xor(&mut state);
        assert_eq!(state.stack, vec![vec![0b0110]]);
    }

    #[test]
    fn operand_lengths_must_match() {
        let mut state = with_items(&[&[0x01, 0x02], &[0x01]]);
        op_and(&mut state);
        assert_eq!(state.error, Some(VmError::MismatchedBitwiseOperandLength));
    }

    #[test]
    fn equality() {
        let mut state = with_items(&[&[0x01, 0x02], &[0x01, 0x02]]);
        op_equal(&mut state);
        assert_eq!(state.stack, vec![vec![0x01]]);

        let mut state = with_items(&[&[0x01], &[0x02]]);
        op_equal(&mut state);
        assert_eq!(state.stack, vec![Vec::<u8>::new()]);
    }
}
