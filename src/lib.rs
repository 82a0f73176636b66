// Bitauth Core Library: Bitauth template compiler and Bitcoin Cash script
// virtual machine.
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

// Coding conventions
#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    unused_imports,
    dead_code
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Bitauth Core Lib: the authentication-template compiler and the Bitcoin
//! Cash script virtual machine.
//!
//! The library pairs two engines which recursively depend on each other:
//! * [`btl`] compiles Bitauth template language source into byte-exact
//!   bytecode, running `$(...)` segments on the virtual machine at compile
//!   time;
//! * [`bavm`] evaluates bytecode under the BCH consensus rule sets,
//!   including P2SH redeem evaluation and the SegWit-recovery exemption.

/// Re-export of the BCH virtual machine crate.
pub extern crate bavm;
/// Re-export of the BTL compiler crate.
pub extern crate btl;

pub use bavm::{
    disassemble_bytecode, encode_data_push, instructions_are_malformed, parse_bytecode,
    AuthenticationProgram, BchVm, Instruction, LockingBytecode, ProgramState, RedeemBytecode,
    ScriptNum, TxContext, UnlockingBytecode, VmError, VmFlags,
};
pub use btl::{
    compile_btl, compile_script, parse_script, standard_environment, CompilationData,
    CompilationEnvironment, CompilationError, CompilationResult, Range, ScriptSegment,
};

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compile_then_validate() {
        // Compile a trivial lock/unlock pair and validate it on the machine.
        let environment = standard_environment();
        let data = CompilationData::default();
        let locking = compile_btl("OP_3 OP_EQUAL", &data, &environment, &[]).unwrap();
        let unlocking = compile_btl("<$(<1> <2> OP_ADD)>", &data, &environment, &[]).unwrap();
        assert_eq!(unlocking.bytecode, vec![0x53]);

        let vm = BchVm::default();
        let program = AuthenticationProgram {
            unlocking_bytecode: UnlockingBytecode::from_unsafe(unlocking.bytecode),
            locking_bytecode: LockingBytecode::from_unsafe(locking.bytecode),
            context: TxContext::default(),
        };
        assert_eq!(vm.verify_program(&program), Ok(()));
    }
}
