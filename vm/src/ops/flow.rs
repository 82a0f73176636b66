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

/// `OP_IF`/`OP_NOTIF`: opens a conditional block. Runs regardless of the
/// execution stack; inside an inactive branch it records a skipped block
/// without consuming a stack item.
pub(crate) fn op_if(state: &mut ProgramState, invert: bool) {
    if !state.executing() {
        state.execution_stack.push(false);
        return;
    }
    match state.pop_bool() {
        Ok(condition) => state.execution_stack.push(condition != invert),
        Err(err) => state.fail(err),
    }
}

/// `OP_ELSE`: inverts the innermost conditional branch.
pub(crate) fn op_else(state: &mut ProgramState) {
    match state.execution_stack.last_mut() {
        Some(branch) => *branch = !*branch,
        None => state.fail(VmError::UnexpectedElseOrEndIf),
    }
}

/// `OP_ENDIF`: closes the innermost conditional block.
pub(crate) fn op_endif(state: &mut ProgramState) {
    if state.execution_stack.pop().is_none() {
        state.fail(VmError::UnexpectedElseOrEndIf);
    }
}

/// `OP_VERIFY`: pops the top item and fails the evaluation unless it is
/// truthy.
pub(crate) fn op_verify(state: &mut ProgramState) {
    match state.pop_bool() {
        Ok(true) => {}
        Ok(false) => state.fail(VmError::FailedVerify),
        Err(err) => state.fail(err),
    }
}

/// `OP_RETURN`: fails the evaluation unconditionally.
pub(crate) fn op_return(state: &mut ProgramState) { state.fail(VmError::CalledReturn) }

#[cfg(test)]
mod test {
    use super::*;
    use crate::TxContext;

    fn fresh() -> ProgramState { ProgramState::with(vec![], vec![], TxContext::default()) }

    #[test]
    fn conditional_blocks() {
        let mut state = fresh();
        state.push_bool(true);
        op_if(&mut state, false);
        assert_eq!(state.execution_stack, vec![true]);
        op_else(&mut state);
        assert_eq!(state.execution_stack, vec![false]);
        op_endif(&mut state);
        assert!(state.execution_stack.is_empty());
        assert_eq!(state.error, None);
    }

    #[test]
    fn notif_inverts() {
        let mut state = fresh();
        state.push_bool(false);
        op_if(&mut state, true);
        assert_eq!(state.execution_stack, vec![true]);
    }

    #[test]
    fn inactive_branch_skips_condition_pop() {
        let mut state = fresh();
        state.execution_stack.push(false);
        op_if(&mut state, false);
        assert_eq!(state.execution_stack, vec![false, false]);
        assert_eq!(state.error, None);
    }

    #[test]
    fn unbalanced_conditionals() {
        let mut state = fresh();
        op_else(&mut state);
        assert_eq!(state.error, Some(VmError::UnexpectedElseOrEndIf));

        let mut state = fresh();
        op_endif(&mut state);
        assert_eq!(state.error, Some(VmError::UnexpectedElseOrEndIf));
    }

    #[test]
    fn verify_and_return() {
        let mut state = fresh();
        state.push_bool(true);
        op_verify(&mut state);
        assert_eq!(state.error, None);
        assert!(state.stack.is_empty());

        state.push_bool(false);
        op_verify(&mut state);
        assert_eq!(state.error, Some(VmError::FailedVerify));

        let mut state = fresh();
        op_return(&mut state);
        assert_eq!(state.error, Some(VmError::CalledReturn));
    }
}
