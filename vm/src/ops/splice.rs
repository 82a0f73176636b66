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

use crate::num::{ScriptNum, MAX_SCRIPT_NUMBER_LENGTH};
use crate::state::MAX_STACK_ITEM_LENGTH;
use crate::{ProgramState, VmError};

/// Strips a stack item down to the minimal script-number encoding,
/// operating on raw bytes so that items longer than any number limit
/// minimize correctly.
pub(crate) fn minimally_encode(mut data: Vec<u8>) -> Vec<u8> {
    let Some(&last) = data.last() else {
        return data;
    };
    if last & 0x7f != 0 {
        return data;
    }
    let sign = last & 0x80;
    data.pop();
    while data.len() > 1 && *data.last().expect("nonempty") == 0x00 &&
        data[data.len() - 2] & 0x80 == 0
    {
        data.pop();
    }
    match data.last_mut() {
        // The value was zero (or negative zero).
        None => vec![],
        Some(top) if *top & 0x80 != 0 => {
            data.push(sign);
            data
        }
        Some(top) => {
            *top |= sign;
            data
        }
    }
}

pub(crate) fn op_cat(state: &mut ProgramState) {
    let (second, top) = match state.pop().and_then(|top| Ok((state.pop()?, top))) {
        Ok(pair) => pair,
        Err(err) => return state.fail(err),
    };
    if second.len() + top.len() > MAX_STACK_ITEM_LENGTH {
        return state.fail(VmError::ExceededMaximumStackItemLength);
    }
    let mut joined = second;
    joined.extend_from_slice(&top);
    state.push(joined);
}

pub(crate) fn op_split(state: &mut ProgramState, require_minimal: bool) {
    let index = match state.pop_num(require_minimal) {
        Ok(num) => num,
        Err(err) => return state.fail(err),
    };
    let item = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    let index = match index.into_index() {
        Ok(index) if index <= item.len() => index,
        _ => return state.fail(VmError::InvalidSplitIndex),
    };
    state.push(item[..index].to_vec());
    state.push(item[index..].to_vec());
}

pub(crate) fn op_num2bin(state: &mut ProgramState, require_minimal: bool) {
    let length = match state.pop_num(require_minimal).and_then(ScriptNum::into_index) {
        Ok(length) => length,
        Err(err) => return state.fail(err),
    };
    if length > MAX_STACK_ITEM_LENGTH {
        return state.fail(VmError::ExceededMaximumStackItemLength);
    }
    let item = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    let mut minimal = minimally_encode(item);
    if minimal.len() > length {
        return state.fail(VmError::InsufficientNum2BinLength);
    }
    if minimal.len() == length {
        return state.push(minimal);
    }
    // Pad with zero bytes, relocating the sign bit onto the new top byte.
    let sign = match minimal.last_mut() {
        Some(top) => {
            let sign = *top & 0x80;
            *top &= 0x7f;
            sign
        }
        None => 0x00,
    };
    minimal.resize(length, 0x00);
    if let Some(top) = minimal.last_mut() {
        *top |= sign;
    }
    state.push(minimal);
}

pub(crate) fn op_bin2num(state: &mut ProgramState) {
    let item = match state.pop() {
        Ok(item) => item,
        Err(err) => return state.fail(err),
    };
    let minimal = minimally_encode(item);
    if minimal.len() > MAX_SCRIPT_NUMBER_LENGTH {
        return state.fail(VmError::ExceededMaximumScriptNumberLength);
    }
    state.push(minimal);
}

pub(crate) fn op_size(state: &mut ProgramState) {
    match state.peek() {
        Ok(top) => {
            let length = ScriptNum::new(top.len() as i64);
            state.push_num(length);
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
    fn minimal_reencoding() {
        assert_eq!(minimally_encode(vec![]), Vec::<u8>::new());
        assert_eq!(minimally_encode(vec![0x00]), Vec::<u8>::new());
        assert_eq!(minimally_encode(vec![0x80]), Vec::<u8>::new());
        assert_eq!(minimally_encode(vec![0x01, 0x00]), vec![0x01]);
        assert_eq!(minimally_encode(vec![0x01, 0x00, 0x00]), vec![0x01]);
        assert_eq!(minimally_encode(vec![0x01, 0x80]), vec![0x81]);
        assert_eq!(minimally_encode(vec![0x80, 0x00]), vec![0x80, 0x00]);
        assert_eq!(minimally_encode(vec![0x80, 0x80]), vec![0x80, 0x80]);
        assert_eq!(minimally_encode(vec![0xff, 0x00]), vec![0xff, 0x00]);
    }

    #[test]
    fn cat_joins_in_order() {
        let mut state = with_items(&[&[0x01, 0x02], &[0x03]]);
        op_cat(&mut state);
        assert_eq!(state.stack, vec![vec![0x01, 0x02, 0x03]]);

        let mut state = with_items(&[&[0x00; 300], &[0x00; 300]]);
        op_cat(&mut state);
        assert_eq!(state.error, Some(VmError::ExceededMaximumStackItemLength));
    }

    #[test]
    fn split_halves() {
        let mut state = with_items(&[&[0x01, 0x02, 0x03], &[0x01]]);
        op_split(&mut state, true);
        assert_eq!(state.stack, vec![vec![0x01], vec![0x02, 0x03]]);

        // Index zero and full-length splits are legal.
        let mut state = with_items(&[&[0x01, 0x02], &[]]);
        op_split(&mut state, true);
        assert_eq!(state.stack, vec![vec![], vec![0x01, 0x02]]);

        let mut state = with_items(&[&[0x01, 0x02], &[0x03]]);
        op_split(&mut state, true);
        assert_eq!(state.error, Some(VmError::InvalidSplitIndex));
    }

    #[test]
    fn num2bin_padding() {
        let mut state = with_items(&[&[0x02], &[0x04]]);
        op_num2bin(&mut state, true);
        assert_eq!(state.stack, vec![vec![0x02, 0x00, 0x00, 0x00]]);

        // Negative numbers keep the sign bit on the top byte.
        let mut state = with_items(&[&[0x82], &[0x03]]);
        op_num2bin(&mut state, true);
        assert_eq!(state.stack, vec![vec![0x02, 0x00, 0x80]]);

        let mut state = with_items(&[&[0x01, 0x02], &[0x01]]);
        op_num2bin(&mut state, true);
        assert_eq!(state.error, Some(VmError::InsufficientNum2BinLength));
    }

    #[test]
    fn bin2num_minimizes() {
        let mut state = with_items(&[&[0x02, 0x00, 0x00, 0x00]]);
        op_bin2num(&mut state);
        assert_eq!(state.stack, vec![vec![0x02]]);

        let mut state = with_items(&[&[0xff, 0xff, 0xff, 0xff, 0x00]]);
        op_bin2num(&mut state);
        assert_eq!(state.error, Some(VmError::ExceededMaximumScriptNumberLength));
    }

    #[test]
    fn size_peeks() {
        let mut state = with_items(&[&[0x01, 0x02, 0x03]]);
        op_size(&mut state);
        assert_eq!(state.stack, vec![vec![0x01, 0x02, 0x03], vec![0x03]]);
    }
}
