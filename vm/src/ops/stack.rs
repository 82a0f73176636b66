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

use crate::num::{item_is_truthy, ScriptNum};
use crate::{ProgramState, VmError};

/// Requires `depth` stack items and returns the index of the item `offset`
/// positions below the top.
fn from_top(state: &ProgramState, depth: usize, offset: usize) -> Result<usize, VmError> {
    if state.stack.len() < depth {
        return Err(VmError::EmptyStack);
    }
    Ok(state.stack.len() - 1 - offset)
}

pub(crate) fn op_toaltstack(state: &mut ProgramState) {
    match state.pop() {
        Ok(item) => state.alt_stack.push(item),
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_fromaltstack(state: &mut ProgramState) {
    match state.pop_alt() {
        Ok(item) => state.push(item),
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_2drop(state: &mut ProgramState) {
    if let Err(err) = state.pop().and_then(|_| state.pop()) {
        state.fail(err);
    }
}

pub(crate) fn op_2dup(state: &mut ProgramState) {
    match from_top(state, 2, 1) {
        Ok(second) => {
            let pair = state.stack[second..].to_vec();
            state.stack.extend(pair);
        }
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_3dup(state: &mut ProgramState) {
    match from_top(state, 3, 2) {
        Ok(third) => {
            let triple = state.stack[third..].to_vec();
            state.stack.extend(triple);
        }
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_2over(state: &mut ProgramState) {
    match from_top(state, 4, 3) {
        Ok(fourth) => {
            let pair = state.stack[fourth..fourth + 2].to_vec();
            state.stack.extend(pair);
        }
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_2rot(state: &mut ProgramState) {
    match from_top(state, 6, 5) {
        Ok(sixth) => {
            let pair: Vec<_> = state.stack.drain(sixth..sixth + 2).collect();
            state.stack.extend(pair);
        }
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_2swap(state: &mut ProgramState) {
    match from_top(state, 4, 3) {
        Ok(fourth) => {
            let pair: Vec<_> = state.stack.drain(fourth..fourth + 2).collect();
            state.stack.extend(pair);
        }
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_ifdup(state: &mut ProgramState) {
    match state.peek() {
        Ok(top) if item_is_truthy(top) => {
            let duplicate = top.clone();
            state.push(duplicate);
        }
        Ok(_) => {}
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_depth(state: &mut ProgramState) {
    state.push_num(ScriptNum::new(state.stack.len() as i64))
}

pub(crate) fn op_drop(state: &mut ProgramState) {
    if let Err(err) = state.pop() {
        state.fail(err);
    }
}

pub(crate) fn op_dup(state: &mut ProgramState) {
    match state.peek() {
        Ok(top) => {
            let duplicate = top.clone();
            state.push(duplicate);
        }
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_nip(state: &mut ProgramState) {
    match from_top(state, 2, 1) {
        Ok(second) => {
            state.stack.remove(second);
        }
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_over(state: &mut ProgramState) {
    match from_top(state, 2, 1) {
        Ok(second) => {
            let item = state.stack[second].clone();
            state.push(item);
        }
        Err(err) => state.fail(err),
    }
}

/// `OP_PICK`/`OP_ROLL`: the popped operand selects the item to copy (pick)
/// or move (roll) to the top.
pub(crate) fn op_pick(state: &mut ProgramState, require_minimal: bool, remove: bool) {
    let depth = match state.pop_num(require_minimal).and_then(ScriptNum::into_index) {
        Ok(depth) => depth,
        Err(err) => return state.fail(err),
    };
    if depth >= state.stack.len() {
        return state.fail(VmError::InvalidStackIndex);
    }
    let index = state.stack.len() - 1 - depth;
    let item = if remove { state.stack.remove(index) } else { state.stack[index].clone() };
    state.push(item);
}

pub(crate) fn op_rot(state: &mut ProgramState) {
    match from_top(state, 3, 2) {
        Ok(third) => {
            let item = state.stack.remove(third);
            state.push(item);
        }
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_swap(state: &mut ProgramState) {
    match from_top(state, 2, 1) {
        Ok(second) => state.stack.swap(second, second + 1),
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_tuck(state: &mut ProgramState) {
    match from_top(state, 2, 1) {
        Ok(second) => {
            let top = state.stack.last().expect("depth checked").clone();
            state.stack.insert(second, top);
        }
        Err(err) => state.fail(err),
    }
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
    fn alt_stack_transfer() {
        let mut state = with_items(&[&[0x01]]);
        op_toaltstack(&mut state);
        assert!(state.stack.is_empty());
        assert_eq!(state.alt_stack, vec![vec![0x01]]);
        op_fromaltstack(&mut state);
        assert_eq!(state.stack, vec![vec![0x01]]);
        op_fromaltstack(&mut state);
        assert_eq!(state.error, Some(VmError::EmptyAlternateStack));
    }

    #[test]
    fn pair_operations() {
        let mut state = with_items(&[&[0x01], &[0x02]]);
        op_2dup(&mut state);
        assert_eq!(state.stack, vec![vec![0x01], vec![0x02], vec![0x01], vec![0x02]]);
        op_2swap(&mut state);
        assert_eq!(state.stack, vec![vec![0x01], vec![0x02], vec![0x01], vec![0x02]]);
        op_2over(&mut state);
        assert_eq!(state.stack.len(), 6);
        assert_eq!(&state.stack[4..], &[vec![0x01], vec![0x02]]);
    }

    #[test]
    fn rotations() {
        let mut state = with_items(&[&[0x01], &[0x02], &[0x03]]);
        op_rot(&mut state);
        assert_eq!(state.stack, vec![vec![0x02], vec![0x03], vec![0x01]]);

        let mut state =
            with_items(&[&[0x01], &[0x02], &[0x03], &[0x04], &[0x05], &[0x06]]);
        op_2rot(&mut state);
        assert_eq!(state.stack, vec![
            vec![0x03],
            vec![0x04],
            vec![0x05],
            vec![0x06],
            vec![0x01],
            vec![0x02]
        ]);
    }

    #[test]
    fn pick_and_roll() {
        let mut state = with_items(&[&[0x0a], &[0x0b], &[0x0c], &[0x02]]);
        op_pick(&mut state, true, false);
        assert_eq!(state.stack, vec![vec![0x0a], vec![0x0b], vec![0x0c], vec![0x0a]]);

        let mut state = with_items(&[&[0x0a], &[0x0b], &[0x0c], &[0x02]]);
        op_pick(&mut state, true, true);
        assert_eq!(state.stack, vec![vec![0x0b], vec![0x0c], vec![0x0a]]);

        let mut state = with_items(&[&[0x0a], &[0x05]]);
        op_pick(&mut state, true, false);
        assert_eq!(state.error, Some(VmError::InvalidStackIndex));

        let mut state = with_items(&[&[0x0a], &[0x81]]);
        op_pick(&mut state, true, false);
        assert_eq!(state.error, Some(VmError::InvalidStackIndex));
    }

    #[test]
    fn singles() {
        let mut state = with_items(&[&[0x01], &[0x02]]);
        op_swap(&mut state);
        assert_eq!(state.stack, vec![vec![0x02], vec![0x01]]);
        op_tuck(&mut state);
        assert_eq!(state.stack, vec![vec![0x01], vec![0x02], vec![0x01]]);
        op_nip(&mut state);
        assert_eq!(state.stack, vec![vec![0x01], vec![0x01]]);
        op_depth(&mut state);
        assert_eq!(state.stack.last().unwrap(), &vec![0x02]);
        op_drop(&mut state);
        op_2drop(&mut state);
        assert!(state.stack.is_empty());
    }

    #[test]
    fn ifdup_duplicates_only_truthy() {
        let mut state = with_items(&[&[0x01]]);
        op_ifdup(&mut state);
        assert_eq!(state.stack.len(), 2);

        let mut state = with_items(&[&[]]);
        op_ifdup(&mut state);
        assert_eq!(state.stack.len(), 1);
    }
}
