// Bitauth template language (BTL) compiler library.
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

//! The standard BCH compilation environment: the full opcode identifier
//! table, the standard compiler operations and the BCH virtual machine for
//! `$(...)` evaluations. This module closes the compile/evaluate recursion:
//! the reducer drives the machine, and evaluated bytecode feeds back into
//! compilation.

use std::collections::BTreeMap;

use bavm::opcodes::opcode_name;
use bavm::{instructions_are_malformed, parse_bytecode, BchVm, TxContext};

use crate::environment::EvaluationVm;
use crate::operations::standard_operations;
use crate::CompilationEnvironment;

/// Every opcode identifier of the BCH instruction set, mapped to its
/// bytecode byte.
pub fn standard_opcodes() -> BTreeMap<String, u8> {
    (0x00..=0xff)
        .filter_map(|opcode| opcode_name(opcode).map(|name| (name.to_owned(), opcode)))
        .collect()
}

/// A ready-to-use BCH compilation environment; callers add their scripts and
/// variables.
pub fn standard_environment() -> CompilationEnvironment {
    CompilationEnvironment {
        opcodes: standard_opcodes(),
        scripts: BTreeMap::new(),
        variables: BTreeMap::new(),
        operations: standard_operations(),
        vm: Some(Box::new(BchVm::default())),
    }
}

impl EvaluationVm for BchVm {
    fn evaluate_bytecode(&self, bytecode: &[u8]) -> Result<Vec<u8>, String> {
        let instructions = parse_bytecode(bytecode);
        if instructions_are_malformed(&instructions) {
            return Err("the bytecode ends with an incomplete data push".to_owned());
        }
        let state = BchVm::evaluate(self, instructions, vec![], TxContext::default());
        if let Some(error) = state.error {
            return Err(error.to_string());
        }
        Ok(state.stack.last().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{compile_btl, compile_script, CompilationData, CompilationStage};

    fn compile(source: &str) -> Result<Vec<u8>, Vec<String>> {
        compile_btl(source, &CompilationData::default(), &standard_environment(), &[])
            .map(|success| success.bytecode)
            .map_err(|failure| {
                failure.errors.into_iter().map(|error| error.error).collect()
            })
    }

    #[test]
    fn opcode_identifier_table() {
        let opcodes = standard_opcodes();
        assert_eq!(opcodes.get("OP_0"), Some(&0x00));
        assert_eq!(opcodes.get("OP_16"), Some(&0x60));
        assert_eq!(opcodes.get("OP_ADD"), Some(&0x93));
        assert_eq!(opcodes.get("OP_CHECKDATASIGVERIFY"), Some(&0xbb));
        assert!(!opcodes.contains_key("OP_UNKNOWN_200"));
        assert_eq!(opcodes.len(), 0xbc);
    }

    #[test]
    fn opcode_compilation() {
        assert_eq!(compile("OP_1 OP_2 OP_ADD").unwrap(), vec![0x51, 0x52, 0x93]);
    }

    #[test]
    fn evaluation_feeds_back_as_bytecode() {
        // The evaluated script pushes 1 and 2 and adds them; the resulting
        // top stack item (the script number 3) becomes the compiled
        // bytecode of the evaluation segment.
        assert_eq!(compile("$(<1> <2> OP_ADD)").unwrap(), vec![0x03]);
    }

    #[test]
    fn evaluation_composes_with_pushes() {
        // The evaluated single byte 0x03 re-pushes minimally as OP_3.
        assert_eq!(compile("<$(<1> <2> OP_ADD)>").unwrap(), vec![0x53]);
        assert_eq!(compile("<$(<2> <3> OP_MOD)>").unwrap(), vec![0x52]);
    }

    #[test]
    fn evaluation_with_empty_stack_yields_empty_bytecode() {
        assert_eq!(compile("$(OP_1 OP_DROP)").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn failing_evaluation_is_a_reduction_error() {
        let errors = compile("$(OP_RETURN)").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("OP_RETURN"));
    }

    #[test]
    fn nested_script_resolution() {
        let mut environment = standard_environment();
        environment.scripts.insert("lock".to_owned(), "OP_3 OP_EQUAL".to_owned());
        environment.scripts.insert("redeem".to_owned(), "lock".to_owned());
        let success =
            compile_script("redeem", &CompilationData::default(), &environment).unwrap();
        assert_eq!(success.bytecode, vec![0x53, 0x87]);
    }

    #[test]
    fn script_cycles_are_detected() {
        let mut environment = standard_environment();
        environment.scripts.insert("a".to_owned(), "b".to_owned());
        environment.scripts.insert("b".to_owned(), "a".to_owned());
        let failure =
            compile_script("a", &CompilationData::default(), &environment).unwrap_err();
        assert_eq!(failure.stage, CompilationStage::Resolve);
        assert_eq!(failure.errors.len(), 1);
        let message = &failure.errors[0].error;
        assert!(message.contains("cycle"), "unexpected message: {message}");
        assert!(message.contains("'a'"), "unexpected message: {message}");
        assert!(message.contains("'b'"), "unexpected message: {message}");
    }

    #[test]
    fn self_referential_script_is_a_cycle() {
        let mut environment = standard_environment();
        environment.scripts.insert("loop".to_owned(), "loop".to_owned());
        let failure =
            compile_script("loop", &CompilationData::default(), &environment).unwrap_err();
        assert!(failure.errors[0].error.contains("cycle"));
    }

    #[test]
    fn p2pkh_template_compilation() {
        let mut environment = standard_environment();
        environment.scripts.insert(
            "p2pkh_lock".to_owned(),
            "OP_DUP OP_HASH160 <$(<0x030405> OP_HASH160)> OP_EQUALVERIFY OP_CHECKSIG".to_owned(),
        );
        let success =
            compile_script("p2pkh_lock", &CompilationData::default(), &environment).unwrap();
        assert_eq!(success.bytecode.len(), 25);
        assert_eq!(success.bytecode[0], 0x76);
        assert_eq!(success.bytecode[1], 0xa9);
        assert_eq!(success.bytecode[2], 0x14);
        assert_eq!(success.bytecode[23], 0x88);
        assert_eq!(success.bytecode[24], 0xac);
    }
}
