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

/// `OP_NOP`: does nothing.
pub(crate) fn op_nop(_state: &mut ProgramState) {}

/// `OP_NOP1`, `OP_NOP4..OP_NOP10`: reserved for future upgrades; a no-op
/// unless the rule set disallows their use.
pub(crate) fn op_upgradable_nop(state: &mut ProgramState, disallow: bool) {
    if disallow {
        state.fail(VmError::DisallowedUpgradableNop);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TxContext;

    #[test]
    fn upgradable_nops_follow_the_flag() {
        let mut state = ProgramState::with(vec![], vec![], TxContext::default());
        op_upgradable_nop(&mut state, false);
        assert_eq!(state.error, None);
        op_upgradable_nop(&mut state, true);
        assert_eq!(state.error, Some(VmError::DisallowedUpgradableNop));
    }
}
