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

//! Bitcoin Cash opcode table (BCH 2019 rule set): constants, canonical names
//! and push-classification predicates used by the instruction parser, the
//! disassembler and the virtual machine dispatch.

/// Push an empty array onto the stack.
pub const OP_0: u8 = 0x00;
/// Push the next byte as an array onto the stack.
pub const OP_PUSHBYTES_1: u8 = 0x01;
/// Push the next 2 bytes as an array onto the stack.
pub const OP_PUSHBYTES_2: u8 = 0x02;
/// Push the next 3 bytes as an array onto the stack.
pub const OP_PUSHBYTES_3: u8 = 0x03;
/// Push the next 4 bytes as an array onto the stack.
pub const OP_PUSHBYTES_4: u8 = 0x04;
/// Push the next 20 bytes as an array onto the stack (the length of a
/// HASH160 digest).
pub const OP_PUSHBYTES_20: u8 = 0x14;
/// Push the next 32 bytes as an array onto the stack (the length of a
/// SHA256 digest).
pub const OP_PUSHBYTES_32: u8 = 0x20;
/// Push the next 40 bytes as an array onto the stack (the longest witness
/// program).
pub const OP_PUSHBYTES_40: u8 = 0x28;
/// Push the next 75 bytes as an array onto the stack (the longest direct
/// push).
pub const OP_PUSHBYTES_75: u8 = 0x4b;
/// Read the next byte as N; push the next N bytes as an array onto the stack.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Read the next 2 bytes as N; push the next N bytes as an array onto the
/// stack.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Read the next 4 bytes as N; push the next N bytes as an array onto the
/// stack.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the array `0x81` onto the stack.
pub const OP_1NEGATE: u8 = 0x4f;
/// Fail the script if executed (reserved opcode).
pub const OP_RESERVED: u8 = 0x50;
/// Push the array `0x01` onto the stack.
pub const OP_1: u8 = 0x51;
/// Push the array `0x02` onto the stack.
pub const OP_2: u8 = 0x52;
/// Push the array `0x03` onto the stack.
pub const OP_3: u8 = 0x53;
/// Push the array `0x04` onto the stack.
pub const OP_4: u8 = 0x54;
/// Push the array `0x05` onto the stack.
pub const OP_5: u8 = 0x55;
/// Push the array `0x06` onto the stack.
pub const OP_6: u8 = 0x56;
/// Push the array `0x07` onto the stack.
pub const OP_7: u8 = 0x57;
/// Push the array `0x08` onto the stack.
pub const OP_8: u8 = 0x58;
/// Push the array `0x09` onto the stack.
pub const OP_9: u8 = 0x59;
/// Push the array `0x0a` onto the stack.
pub const OP_10: u8 = 0x5a;
/// Push the array `0x0b` onto the stack.
pub const OP_11: u8 = 0x5b;
/// Push the array `0x0c` onto the stack.
pub const OP_12: u8 = 0x5c;
/// Push the array `0x0d` onto the stack.
pub const OP_13: u8 = 0x5d;
/// Push the array `0x0e` onto the stack.
pub const OP_14: u8 = 0x5e;
/// Push the array `0x0f` onto the stack.
pub const OP_15: u8 = 0x5f;
/// Push the array `0x10` onto the stack.
pub const OP_16: u8 = 0x60;
/// Does nothing.
pub const OP_NOP: u8 = 0x61;
/// Fail the script if executed (reserved opcode).
pub const OP_VER: u8 = 0x62;
/// Pop and execute the next statements if a nonzero element was popped.
pub const OP_IF: u8 = 0x63;
/// Pop and execute the next statements if a zero element was popped.
pub const OP_NOTIF: u8 = 0x64;
/// Fail the script if executed (reserved opcode).
pub const OP_VERIF: u8 = 0x65;
/// Fail the script if executed (reserved opcode).
pub const OP_VERNOTIF: u8 = 0x66;
/// Execute statements if those after the previous OP_IF were not, and
/// vice-versa. If there is no previous OP_IF, fail the script.
pub const OP_ELSE: u8 = 0x67;
/// Close the innermost OP_IF/OP_NOTIF block.
pub const OP_ENDIF: u8 = 0x68;
/// If the top value is zero or the stack is empty, fail; otherwise, pop the
/// stack.
pub const OP_VERIFY: u8 = 0x69;
/// Fail the script immediately.
pub const OP_RETURN: u8 = 0x6a;
/// Pop one element from the main stack onto the alt stack.
pub const OP_TOALTSTACK: u8 = 0x6b;
/// Pop one element from the alt stack onto the main stack.
pub const OP_FROMALTSTACK: u8 = 0x6c;
/// Drops the top two stack items.
pub const OP_2DROP: u8 = 0x6d;
/// Duplicates the top two stack items as AB -> ABAB.
pub const OP_2DUP: u8 = 0x6e;
/// Duplicates the top three stack items as ABC -> ABCABC.
pub const OP_3DUP: u8 = 0x6f;
/// Copies the two stack items of items two spaces back to the front, as xxAB
/// -> ABxxAB.
pub const OP_2OVER: u8 = 0x70;
/// Moves the two stack items four spaces back to the front, as xxxxAB ->
/// ABxxxx.
pub const OP_2ROT: u8 = 0x71;
/// Swaps the top two pairs, as ABCD -> CDAB.
pub const OP_2SWAP: u8 = 0x72;
/// Duplicate the top stack element unless it is zero.
pub const OP_IFDUP: u8 = 0x73;
/// Push the current number of stack items onto the stack.
pub const OP_DEPTH: u8 = 0x74;
/// Drops the top stack item.
pub const OP_DROP: u8 = 0x75;
/// Duplicates the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Drops the second-to-top stack item.
pub const OP_NIP: u8 = 0x77;
/// Copies the second-to-top stack item, as xA -> AxA.
pub const OP_OVER: u8 = 0x78;
/// Pop the top stack element as N. Copy the Nth stack element to the top.
pub const OP_PICK: u8 = 0x79;
/// Pop the top stack element as N. Move the Nth stack element to the top.
pub const OP_ROLL: u8 = 0x7a;
/// Rotate the top three stack items, as [top next1 next2] -> [next2 top
/// next1].
pub const OP_ROT: u8 = 0x7b;
/// Swap the top two stack items.
pub const OP_SWAP: u8 = 0x7c;
/// Copy the top stack item to before the second item, as [top next] -> [top
/// next top].
pub const OP_TUCK: u8 = 0x7d;
/// Pop the top two items; push their concatenation.
pub const OP_CAT: u8 = 0x7e;
/// Pop the top two items; split the second at the index given by the top;
/// push both halves.
pub const OP_SPLIT: u8 = 0x7f;
/// Pop the top two items; re-encode the second as a byte sequence of the
/// length given by the top.
pub const OP_NUM2BIN: u8 = 0x80;
/// Pop the top item; push it re-encoded as a minimal script number.
pub const OP_BIN2NUM: u8 = 0x81;
/// Pushes the length of the top stack item onto the stack.
pub const OP_SIZE: u8 = 0x82;
/// Disabled opcode; fail the script if executed.
pub const OP_INVERT: u8 = 0x83;
/// Pop the top two items; push their bitwise AND (equal lengths required).
pub const OP_AND: u8 = 0x84;
/// Pop the top two items; push their bitwise OR (equal lengths required).
pub const OP_OR: u8 = 0x85;
/// Pop the top two items; push their bitwise XOR (equal lengths required).
pub const OP_XOR: u8 = 0x86;
/// Pushes 1 if the inputs are exactly equal, 0 otherwise.
pub const OP_EQUAL: u8 = 0x87;
/// Returns success if the inputs are exactly equal, failure otherwise.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// Fail the script if executed (reserved opcode).
pub const OP_RESERVED1: u8 = 0x89;
/// Fail the script if executed (reserved opcode).
pub const OP_RESERVED2: u8 = 0x8a;
/// Increment the top stack element in place.
pub const OP_1ADD: u8 = 0x8b;
/// Decrement the top stack element in place.
pub const OP_1SUB: u8 = 0x8c;
/// Disabled opcode; fail the script if executed.
pub const OP_2MUL: u8 = 0x8d;
/// Disabled opcode; fail the script if executed.
pub const OP_2DIV: u8 = 0x8e;
/// Multiply the top stack item by -1 in place.
pub const OP_NEGATE: u8 = 0x8f;
/// Absolute value the top stack item in place.
pub const OP_ABS: u8 = 0x90;
/// Map 0 to 1 and everything else to 0, in place.
pub const OP_NOT: u8 = 0x91;
/// Map 0 to 0 and everything else to 1, in place.
pub const OP_0NOTEQUAL: u8 = 0x92;
/// Pop two stack items and push their sum.
pub const OP_ADD: u8 = 0x93;
/// Pop two stack items and push the second minus the top.
pub const OP_SUB: u8 = 0x94;
/// Disabled opcode; fail the script if executed.
pub const OP_MUL: u8 = 0x95;
/// Pop two stack items and push the second divided by the top.
pub const OP_DIV: u8 = 0x96;
/// Pop two stack items and push the remainder of dividing the second by the
/// top.
pub const OP_MOD: u8 = 0x97;
/// Disabled opcode; fail the script if executed.
pub const OP_LSHIFT: u8 = 0x98;
/// Disabled opcode; fail the script if executed.
pub const OP_RSHIFT: u8 = 0x99;
/// Pop the top two stack items and push 1 if both are nonzero, else push 0.
pub const OP_BOOLAND: u8 = 0x9a;
/// Pop the top two stack items and push 1 if either is nonzero, else push 0.
pub const OP_BOOLOR: u8 = 0x9b;
/// Pop the top two stack items and push 1 if both are numerically equal, else
/// push 0.
pub const OP_NUMEQUAL: u8 = 0x9c;
/// Pop the top two stack items and return success if both are numerically
/// equal, else return failure.
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
/// Pop the top two stack items and push 0 if both are numerically equal, else
/// push 1.
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
/// Pop the top two items; push 1 if the second is less than the top, 0
/// otherwise.
pub const OP_LESSTHAN: u8 = 0x9f;
/// Pop the top two items; push 1 if the second is greater than the top, 0
/// otherwise.
pub const OP_GREATERTHAN: u8 = 0xa0;
/// Pop the top two items; push 1 if the second is <= the top, 0 otherwise.
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
/// Pop the top two items; push 1 if the second is >= the top, 0 otherwise.
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
/// Pop the top two items; push the smaller.
pub const OP_MIN: u8 = 0xa3;
/// Pop the top two items; push the larger.
pub const OP_MAX: u8 = 0xa4;
/// Pop the top three items; if the top is >= the second and < the third, push
/// 1, otherwise push 0.
pub const OP_WITHIN: u8 = 0xa5;
/// Pop the top stack item and push its RIPEMD160 hash.
pub const OP_RIPEMD160: u8 = 0xa6;
/// Pop the top stack item and push its SHA1 hash.
pub const OP_SHA1: u8 = 0xa7;
/// Pop the top stack item and push its SHA256 hash.
pub const OP_SHA256: u8 = 0xa8;
/// Pop the top stack item and push its RIPEMD(SHA256) hash.
pub const OP_HASH160: u8 = 0xa9;
/// Pop the top stack item and push its SHA256(SHA256) hash.
pub const OP_HASH256: u8 = 0xaa;
/// Ignore this and everything preceding when deciding what to sign when
/// signature-checking.
pub const OP_CODESEPARATOR: u8 = 0xab;
/// <https://en.bitcoin.it/wiki/OP_CHECKSIG> pushing 1/0 for success/failure.
pub const OP_CHECKSIG: u8 = 0xac;
/// <https://en.bitcoin.it/wiki/OP_CHECKSIG> returning success/failure.
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
/// Pop N, N pubkeys, M, M signatures, a dummy (due to bug in reference code),
/// and verify that all M signatures are valid. Push 1 for 'all valid', 0
/// otherwise.
pub const OP_CHECKMULTISIG: u8 = 0xae;
/// Like the above but return success/failure.
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;
/// Does nothing (upgradable no-op).
pub const OP_NOP1: u8 = 0xb0;
/// <https://github.com/bitcoin/bips/blob/master/bip-0065.mediawiki>
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
/// <https://github.com/bitcoin/bips/blob/master/bip-0112.mediawiki>
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
/// Does nothing (upgradable no-op).
pub const OP_NOP4: u8 = 0xb3;
/// Does nothing (upgradable no-op).
pub const OP_NOP5: u8 = 0xb4;
/// Does nothing (upgradable no-op).
pub const OP_NOP6: u8 = 0xb5;
/// Does nothing (upgradable no-op).
pub const OP_NOP7: u8 = 0xb6;
/// Does nothing (upgradable no-op).
pub const OP_NOP8: u8 = 0xb7;
/// Does nothing (upgradable no-op).
pub const OP_NOP9: u8 = 0xb8;
/// Does nothing (upgradable no-op).
pub const OP_NOP10: u8 = 0xb9;
/// Pop a pubkey, a message and a signature; push 1 if the signature covers
/// the SHA256 of the message, 0 otherwise.
pub const OP_CHECKDATASIG: u8 = 0xba;
/// Like the above but return success/failure.
pub const OP_CHECKDATASIGVERIFY: u8 = 0xbb;
/// First codepoint carrying no meaning under the BCH 2019 rule set; this and
/// every greater opcode fails the script if executed.
pub const OP_FIRST_UNDEFINED: u8 = 0xbc;

/// Detects opcodes which carry an inline data payload.
#[inline]
pub const fn is_data_push(opcode: u8) -> bool { opcode <= OP_PUSHDATA4 }

/// Detects opcodes permitted inside push-only bytecode (unlocking scripts):
/// data pushes plus the number-pushing opcodes through [`OP_16`].
#[inline]
pub const fn is_push(opcode: u8) -> bool { opcode <= OP_16 }

/// Canonical name of an opcode under the BCH 2019 rule set. Codepoints past
/// [`OP_CHECKDATASIGVERIFY`] carry no name and return `None`.
pub fn opcode_name(opcode: u8) -> Option<&'static str> {
    let name = match opcode {
        OP_0 => "OP_0",
        0x01..=0x4b => PUSHBYTES_NAMES[opcode as usize - 1],
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_RESERVED => "OP_RESERVED",
        OP_1 => "OP_1",
        OP_2 => "OP_2",
        OP_3 => "OP_3",
        OP_4 => "OP_4",
        OP_5 => "OP_5",
        OP_6 => "OP_6",
        OP_7 => "OP_7",
        OP_8 => "OP_8",
        OP_9 => "OP_9",
        OP_10 => "OP_10",
        OP_11 => "OP_11",
        OP_12 => "OP_12",
        OP_13 => "OP_13",
        OP_14 => "OP_14",
        OP_15 => "OP_15",
        OP_16 => "OP_16",
        OP_NOP => "OP_NOP",
        OP_VER => "OP_VER",
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
        OP_VERIF => "OP_VERIF",
        OP_VERNOTIF => "OP_VERNOTIF",
        OP_ELSE => "OP_ELSE",
        OP_ENDIF => "OP_ENDIF",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_TOALTSTACK => "OP_TOALTSTACK",
        OP_FROMALTSTACK => "OP_FROMALTSTACK",
        OP_2DROP => "OP_2DROP",
        OP_2DUP => "OP_2DUP",
        OP_3DUP => "OP_3DUP",
        OP_2OVER => "OP_2OVER",
        OP_2ROT => "OP_2ROT",
        OP_2SWAP => "OP_2SWAP",
        OP_IFDUP => "OP_IFDUP",
        OP_DEPTH => "OP_DEPTH",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_NIP => "OP_NIP",
        OP_OVER => "OP_OVER",
        OP_PICK => "OP_PICK",
        OP_ROLL => "OP_ROLL",
        OP_ROT => "OP_ROT",
        OP_SWAP => "OP_SWAP",
        OP_TUCK => "OP_TUCK",
        OP_CAT => "OP_CAT",
        OP_SPLIT => "OP_SPLIT",
        OP_NUM2BIN => "OP_NUM2BIN",
        OP_BIN2NUM => "OP_BIN2NUM",
        OP_SIZE => "OP_SIZE",
        OP_INVERT => "OP_INVERT",
        OP_AND => "OP_AND",
        OP_OR => "OP_OR",
        OP_XOR => "OP_XOR",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_RESERVED1 => "OP_RESERVED1",
        OP_RESERVED2 => "OP_RESERVED2",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_2MUL => "OP_2MUL",
        OP_2DIV => "OP_2DIV",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_0NOTEQUAL => "OP_0NOTEQUAL",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_MUL => "OP_MUL",
        OP_DIV => "OP_DIV",
        OP_MOD => "OP_MOD",
        OP_LSHIFT => "OP_LSHIFT",
        OP_RSHIFT => "OP_RSHIFT",
        OP_BOOLAND => "OP_BOOLAND",
        OP_BOOLOR => "OP_BOOLOR",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_NUMEQUALVERIFY => "OP_NUMEQUALVERIFY",
        OP_NUMNOTEQUAL => "OP_NUMNOTEQUAL",
        OP_LESSTHAN => "OP_LESSTHAN",
        OP_GREATERTHAN => "OP_GREATERTHAN",
        OP_LESSTHANOREQUAL => "OP_LESSTHANOREQUAL",
        OP_GREATERTHANOREQUAL => "OP_GREATERTHANOREQUAL",
        OP_MIN => "OP_MIN",
        OP_MAX => "OP_MAX",
        OP_WITHIN => "OP_WITHIN",
        OP_RIPEMD160 => "OP_RIPEMD160",
        OP_SHA1 => "OP_SHA1",
        OP_SHA256 => "OP_SHA256",
        OP_HASH160 => "OP_HASH160",
        OP_HASH256 => "OP_HASH256",
        OP_CODESEPARATOR => "OP_CODESEPARATOR",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "OP_CHECKMULTISIGVERIFY",
        OP_NOP1 => "OP_NOP1",
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_CHECKSEQUENCEVERIFY => "OP_CHECKSEQUENCEVERIFY",
        OP_NOP4 => "OP_NOP4",
        OP_NOP5 => "OP_NOP5",
        OP_NOP6 => "OP_NOP6",
        OP_NOP7 => "OP_NOP7",
        OP_NOP8 => "OP_NOP8",
        OP_NOP9 => "OP_NOP9",
        OP_NOP10 => "OP_NOP10",
        OP_CHECKDATASIG => "OP_CHECKDATASIG",
        OP_CHECKDATASIGVERIFY => "OP_CHECKDATASIGVERIFY",
        _ => return None,
    };
    Some(name)
}

const PUSHBYTES_NAMES: [&str; 75] = [
    "OP_PUSHBYTES_1",
    "OP_PUSHBYTES_2",
    "OP_PUSHBYTES_3",
    "OP_PUSHBYTES_4",
    "OP_PUSHBYTES_5",
    "OP_PUSHBYTES_6",
    "OP_PUSHBYTES_7",
    "OP_PUSHBYTES_8",
    "OP_PUSHBYTES_9",
    "OP_PUSHBYTES_10",
    "OP_PUSHBYTES_11",
    "OP_PUSHBYTES_12",
    "OP_PUSHBYTES_13",
    "OP_PUSHBYTES_14",
    "OP_PUSHBYTES_15",
    "OP_PUSHBYTES_16",
    "OP_PUSHBYTES_17",
    "OP_PUSHBYTES_18",
    "OP_PUSHBYTES_19",
    "OP_PUSHBYTES_20",
    "OP_PUSHBYTES_21",
    "OP_PUSHBYTES_22",
    "OP_PUSHBYTES_23",
    "OP_PUSHBYTES_24",
    "OP_PUSHBYTES_25",
    "OP_PUSHBYTES_26",
    "OP_PUSHBYTES_27",
    "OP_PUSHBYTES_28",
    "OP_PUSHBYTES_29",
    "OP_PUSHBYTES_30",
    "OP_PUSHBYTES_31",
    "OP_PUSHBYTES_32",
    "OP_PUSHBYTES_33",
    "OP_PUSHBYTES_34",
    "OP_PUSHBYTES_35",
    "OP_PUSHBYTES_36",
    "OP_PUSHBYTES_37",
    "OP_PUSHBYTES_38",
    "OP_PUSHBYTES_39",
    "OP_PUSHBYTES_40",
    "OP_PUSHBYTES_41",
    "OP_PUSHBYTES_42",
    "OP_PUSHBYTES_43",
    "OP_PUSHBYTES_44",
    "OP_PUSHBYTES_45",
    "OP_PUSHBYTES_46",
    "OP_PUSHBYTES_47",
    "OP_PUSHBYTES_48",
    "OP_PUSHBYTES_49",
    "OP_PUSHBYTES_50",
    "OP_PUSHBYTES_51",
    "OP_PUSHBYTES_52",
    "OP_PUSHBYTES_53",
    "OP_PUSHBYTES_54",
    "OP_PUSHBYTES_55",
    "OP_PUSHBYTES_56",
    "OP_PUSHBYTES_57",
    "OP_PUSHBYTES_58",
    "OP_PUSHBYTES_59",
    "OP_PUSHBYTES_60",
    "OP_PUSHBYTES_61",
    "OP_PUSHBYTES_62",
    "OP_PUSHBYTES_63",
    "OP_PUSHBYTES_64",
    "OP_PUSHBYTES_65",
    "OP_PUSHBYTES_66",
    "OP_PUSHBYTES_67",
    "OP_PUSHBYTES_68",
    "OP_PUSHBYTES_69",
    "OP_PUSHBYTES_70",
    "OP_PUSHBYTES_71",
    "OP_PUSHBYTES_72",
    "OP_PUSHBYTES_73",
    "OP_PUSHBYTES_74",
    "OP_PUSHBYTES_75",
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_cover_rule_set() {
        for opcode in 0x00..OP_FIRST_UNDEFINED {
            assert!(opcode_name(opcode).is_some(), "opcode 0x{opcode:02x} must carry a name");
        }
        for opcode in OP_FIRST_UNDEFINED..=0xff {
            assert!(opcode_name(opcode).is_none());
        }
    }

    #[test]
    fn pushbytes_names_match_codepoints() {
        assert_eq!(opcode_name(0x01), Some("OP_PUSHBYTES_1"));
        assert_eq!(opcode_name(OP_PUSHBYTES_20), Some("OP_PUSHBYTES_20"));
        assert_eq!(opcode_name(OP_PUSHBYTES_75), Some("OP_PUSHBYTES_75"));
    }

    #[test]
    fn push_classification() {
        assert!(is_data_push(OP_0));
        assert!(is_data_push(OP_PUSHDATA4));
        assert!(!is_data_push(OP_1NEGATE));
        assert!(is_push(OP_16));
        assert!(!is_push(OP_NOP));
        assert!(!is_push(OP_ADD));
    }
}
