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

//! Operation implementations, grouped the way the opcode table groups them.
//!
//! Every operation transforms a [`crate::ProgramState`] in place and reports
//! violations through [`crate::ProgramState::fail`]; the conditional-
//! execution gate, operation counting and resource limits are applied by the
//! virtual machine around these functions.

pub(crate) mod arithmetic;
pub(crate) mod bitwise;
pub(crate) mod crypto;
pub(crate) mod flow;
pub(crate) mod nop;
pub(crate) mod push;
pub(crate) mod splice;
pub(crate) mod stack;
pub(crate) mod time;
