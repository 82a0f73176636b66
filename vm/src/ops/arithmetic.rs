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

//! Arithmetic operations.
//!
//! Operands are bounded to 4 bytes by the script-number codec, so `i64`
//! arithmetic cannot overflow; results re-encode minimally and may exceed
//! the operand length (consensus permits producing a 5-byte sum).

use crate::num::ScriptNum;
use crate::{ProgramState, VmError};

fn unary(state: &mut ProgramState, require_minimal: bool, op: impl FnOnce(i64) -> i64) {
    match state.pop_num(require_minimal) {
        Ok(num) => state.push_num(ScriptNum::new(op(num.into_i64()))),
        Err(err) => state.fail(err),
    }
}

fn binary(
    state: &mut ProgramState,
    require_minimal: bool,
    op: impl FnOnce(i64, i64) -> Result<i64, VmError>,
) {
    let top = match state.pop_num(require_minimal) {
        Ok(num) => num.into_i64(),
        Err(err) => return state.fail(err),
    };
    let second = match state.pop_num(require_minimal) {
        Ok(num) => num.into_i64(),
        Err(err) => return state.fail(err),
    };
    match op(second, top) {
        Ok(result) => state.push_num(ScriptNum::new(result)),
        Err(err) => state.fail(err),
    }
}

pub(crate) fn op_1add(state: &mut ProgramState, minimal: bool) {
    unary(state, minimal, |a| a + 1)
}

pub(crate) fn op_1sub(state: &mut ProgramState, minimal: bool) {
    unary(state, minimal, |a| a - 1)
}

pub(crate) fn op_negate(state: &mut ProgramState, minimal: bool) {
    unary(state, minimal, |a| -a)
}

pub(crate) fn op_abs(state: &mut ProgramState, minimal: bool) {
    unary(state, minimal, i64::abs)
}

pub(crate) fn op_not(state: &mut ProgramState, minimal: bool) {
    unary(state, minimal, |a| (a == 0) as i64)
}

pub(crate) fn op_0notequal(state: &mut ProgramState, minimal: bool) {
    unary(state, minimal, |a| (a != 0) as i64)
}

pub(crate) fn op_add(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok(a + b))
}

pub(crate) fn op_sub(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok(a - b))
}

/// `OP_DIV`: truncated division, failing on a zero divisor.
pub(crate) fn op_div(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| {
        if b == 0 {
            Err(VmError::DivisionByZero)
        } else {
            Ok(a / b)
        }
    })
}

/// `OP_MOD`: remainder of truncated division (the sign follows the
/// dividend), failing on a zero divisor.
pub(crate) fn op_mod(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| {
        if b == 0 {
            Err(VmError::DivisionByZero)
        } else {
            Ok(a % b)
        }
    })
}

pub(crate) fn op_booland(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok((a != 0 && b != 0) as i64))
}

pub(crate) fn op_boolor(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok((a != 0 || b != 0) as i64))
}

pub(crate) fn op_numequal(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok((a == b) as i64))
}

pub(crate) fn op_numnotequal(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok((a != b) as i64))
}

pub(crate) fn op_lessthan(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok((a < b) as i64))
}

pub(crate) fn op_greaterthan(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok((a > b) as i64))
}

pub(crate) fn op_lessthanorequal(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok((a <= b) as i64))
}

pub(crate) fn op_greaterthanorequal(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok((a >= b) as i64))
}

pub(crate) fn op_min(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok(a.min(b)))
}

pub(crate) fn op_max(state: &mut ProgramState, minimal: bool) {
    binary(state, minimal, |a, b| Ok(a.max(b)))
}

/// `OP_WITHIN`: half-open range test `lower <= value < upper` over the three
/// top items.
pub(crate) fn op_within(state: &mut ProgramState, minimal: bool) {
    let upper = match state.pop_num(minimal) {
        Ok(num) => num.into_i64(),
        Err(err) => return state.fail(err),
    };
    let lower = match state.pop_num(minimal) {
        Ok(num) => num.into_i64(),
        Err(err) => return state.fail(err),
    };
    let value = match state.pop_num(minimal) {
        Ok(num) => num.into_i64(),
        Err(err) => return state.fail(err),
    };
    state.push_num(ScriptNum::from(lower <= value && value < upper));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TxContext;

    fn with_nums(nums: &[i64]) -> ProgramState {
        let mut state = ProgramState::with(vec![], vec![], TxContext::default());
        for num in nums {
            state.push_num(ScriptNum::new(*num));
        }
        state
    }

    fn result(state: &mut ProgramState) -> i64 {
        state.pop_num(true).unwrap().into_i64()
    }

    #[test]
    fn unary_operations() {
        let mut state = with_nums(&[5]);
        op_1add(&mut state, true);
        assert_eq!(result(&mut state), 6);

        let mut state = with_nums(&[-5]);
        op_abs(&mut state, true);
        assert_eq!(result(&mut state), 5);

        let mut state = with_nums(&[0]);
        op_not(&mut state, true);
        assert_eq!(result(&mut state), 1);

        let mut state = with_nums(&[7]);
        op_0notequal(&mut state, true);
        assert_eq!(result(&mut state), 1);
    }

    #[test]
    fn binary_operations() {
        let mut state = with_nums(&[3, 4]);
        op_add(&mut state, true);
        assert_eq!(result(&mut state), 7);

        let mut state = with_nums(&[10, 4]);
        op_sub(&mut state, true);
        assert_eq!(result(&mut state), 6);

        let mut state = with_nums(&[3, 5]);
        op_lessthan(&mut state, true);
        assert_eq!(result(&mut state), 1);

        let mut state = with_nums(&[3, 5]);
        op_max(&mut state, true);
        assert_eq!(result(&mut state), 5);
    }

    #[test]
    fn division_semantics() {
        let mut state = with_nums(&[7, 2]);
        op_div(&mut state, true);
        assert_eq!(result(&mut state), 3);

        let mut state = with_nums(&[-7, 2]);
        op_div(&mut state, true);
        assert_eq!(result(&mut state), -3);

        let mut state = with_nums(&[-7, 2]);
        op_mod(&mut state, true);
        assert_eq!(result(&mut state), -1);

        let mut state = with_nums(&[7, 0]);
        op_div(&mut state, true);
        assert_eq!(state.error, Some(VmError::DivisionByZero));

        let mut state = with_nums(&[7, 0]);
        op_mod(&mut state, true);
        assert_eq!(state.error, Some(VmError::DivisionByZero));
    }

    #[test]
    fn within_range() {
        let mut state = with_nums(&[5, 0, 10]);
        op_within(&mut state, true);
        assert_eq!(result(&mut state), 1);

        // The upper bound is exclusive.
        let mut state = with_nums(&[10, 0, 10]);
        op_within(&mut state, true);
        assert_eq!(result(&mut state), 0);

        let mut state = with_nums(&[0, 0, 10]);
        op_within(&mut state, true);
        assert_eq!(result(&mut state), 1);
    }

    #[test]
    fn sums_may_exceed_operand_length() {
        let mut state = with_nums(&[0x7fffffff, 0x7fffffff]);
        op_add(&mut state, true);
        assert_eq!(state.error, None);
        assert_eq!(state.pop().unwrap(), vec![0xfe, 0xff, 0xff, 0xff, 0x00]);
    }
}
