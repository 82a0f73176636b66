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

use std::fmt::{self, Display, Formatter};

use amplify::hex::ToHex;

use crate::opcodes::*;

/// A single parsed script instruction.
///
/// Only data-push opcodes (`0x00..=0x4e`) carry an inline payload; a stream
/// whose final declared payload overruns the available bytes ends with a
/// single [`Instruction::MalformedPush`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Instruction {
    /// An operation without an inline payload.
    Op(u8),

    /// A data push together with its payload.
    Push {
        /// The push opcode (`OP_0`, `OP_PUSHBYTES_1..75` or
        /// `OP_PUSHDATA1/2/4`).
        opcode: u8,
        /// The pushed payload.
        data: Vec<u8>,
    },

    /// A trailing data push whose payload (or length field) was cut short.
    MalformedPush {
        /// The push opcode.
        opcode: u8,
        /// Payload length the stream declared (or, for a truncated length
        /// field, the full length-field width in bytes).
        expected: usize,
        /// The bytes which were actually present.
        data: Vec<u8>,
    },
}

impl Instruction {
    /// Constructs a well-formed data push, choosing the opcode implied by the
    /// payload length. Use [`encode_data_push`] for the minimal *number*
    /// encodings as well.
    pub fn data_push(data: Vec<u8>) -> Self {
        let opcode = match data.len() {
            len if len <= OP_PUSHBYTES_75 as usize => len as u8,
            len if len <= 0xff => OP_PUSHDATA1,
            len if len <= 0xffff => OP_PUSHDATA2,
            _ => OP_PUSHDATA4,
        };
        Instruction::Push { opcode, data }
    }

    #[inline]
    pub fn opcode(&self) -> u8 {
        match *self {
            Instruction::Op(opcode) |
            Instruction::Push { opcode, .. } |
            Instruction::MalformedPush { opcode, .. } => opcode,
        }
    }

    #[inline]
    pub fn is_malformed(&self) -> bool { matches!(self, Instruction::MalformedPush { .. }) }

    /// The stack item this instruction pushes, if it is any kind of push:
    /// inline payloads for data pushes, the constant encodings for
    /// `OP_1NEGATE` and `OP_1..OP_16`.
    pub fn pushed_data(&self) -> Option<Vec<u8>> {
        match self {
            Instruction::Push { data, .. } => Some(data.clone()),
            Instruction::Op(OP_1NEGATE) => Some(vec![0x81]),
            Instruction::Op(opcode) if (OP_1..=OP_16).contains(opcode) => {
                Some(vec![opcode - OP_1 + 1])
            }
            _ => None,
        }
    }

    /// Byte length of the serialized instruction, including opcode and length
    /// field.
    pub fn serialized_len(&self) -> usize {
        match self {
            Instruction::Op(_) => 1,
            Instruction::Push { opcode, data } => 1 + length_field_len(*opcode) + data.len(),
            Instruction::MalformedPush { data, .. } => 1 + data.len(),
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Op(opcode) => match opcode_name(*opcode) {
                Some(name) => f.write_str(name),
                None => write!(f, "OP_UNKNOWN_{opcode}"),
            },
            Instruction::Push { opcode, data } => {
                let name = opcode_name(*opcode).expect("push opcodes are always named");
                if data.is_empty() {
                    f.write_str(name)
                } else {
                    write!(f, "{name} 0x{}", data.to_hex())
                }
            }
            Instruction::MalformedPush {
                opcode,
                expected,
                data,
            } => {
                let name = opcode_name(*opcode).expect("push opcodes are always named");
                write!(f, "{name} 0x{} [{expected} bytes expected]", data.to_hex())
            }
        }
    }
}

const fn length_field_len(opcode: u8) -> usize {
    match opcode {
        OP_PUSHDATA1 => 1,
        OP_PUSHDATA2 => 2,
        OP_PUSHDATA4 => 4,
        _ => 0,
    }
}

/// Parses bytecode into the instruction list executed by the virtual machine.
///
/// Parsing never fails: a final declared payload overrunning the stream is
/// returned as a single trailing [`Instruction::MalformedPush`].
pub fn parse_bytecode(bytecode: &[u8]) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut cursor = 0usize;
    while cursor < bytecode.len() {
        let opcode = bytecode[cursor];
        cursor += 1;
        if !is_data_push(opcode) {
            instructions.push(Instruction::Op(opcode));
            continue;
        }
        let field = length_field_len(opcode);
        let length = if field == 0 {
            opcode as usize
        } else if bytecode.len() - cursor < field {
            instructions.push(Instruction::MalformedPush {
                opcode,
                expected: field,
                data: bytecode[cursor..].to_vec(),
            });
            return instructions;
        } else {
            let mut length = 0usize;
            for offset in (0..field).rev() {
                length = length << 8 | bytecode[cursor + offset] as usize;
            }
            cursor += field;
            length
        };
        if bytecode.len() - cursor < length {
            instructions.push(Instruction::MalformedPush {
                opcode,
                expected: length,
                data: bytecode[cursor..].to_vec(),
            });
            return instructions;
        }
        instructions.push(Instruction::Push {
            opcode,
            data: bytecode[cursor..cursor + length].to_vec(),
        });
        cursor += length;
    }
    instructions
}

/// Detects whether an instruction list ends with an incomplete push.
#[inline]
pub fn instructions_are_malformed(instructions: &[Instruction]) -> bool {
    instructions.last().map_or(false, Instruction::is_malformed)
}

/// Serializes instructions back into bytecode; the byte-exact inverse of
/// [`parse_bytecode`] for well-formed lists.
pub fn serialize_instructions(instructions: &[Instruction]) -> Vec<u8> {
    let mut bytecode = Vec::with_capacity(instructions.iter().map(Instruction::serialized_len).sum());
    for instruction in instructions {
        match instruction {
            Instruction::Op(opcode) => bytecode.push(*opcode),
            Instruction::Push { opcode, data } => {
                bytecode.push(*opcode);
                let field = length_field_len(*opcode);
                let mut length = data.len();
                for _ in 0..field {
                    bytecode.push((length & 0xff) as u8);
                    length >>= 8;
                }
                bytecode.extend_from_slice(data);
            }
            Instruction::MalformedPush { opcode, data, .. } => {
                bytecode.push(*opcode);
                bytecode.extend_from_slice(data);
            }
        }
    }
    bytecode
}

/// Encodes a payload as the unique minimal data push: empty payloads become
/// `OP_0`, single bytes `1..=16` become `OP_1..OP_16`, then
/// `OP_PUSHBYTES_1..75` and `OP_PUSHDATA1/2/4` by length.
pub fn encode_data_push(data: &[u8]) -> Vec<u8> {
    match data.len() {
        0 => vec![OP_0],
        1 if (0x01..=0x10).contains(&data[0]) => vec![OP_1 + data[0] - 1],
        len if len <= OP_PUSHBYTES_75 as usize => {
            let mut bytecode = Vec::with_capacity(1 + len);
            bytecode.push(len as u8);
            bytecode.extend_from_slice(data);
            bytecode
        }
        len if len <= 0xff => {
            let mut bytecode = Vec::with_capacity(2 + len);
            bytecode.push(OP_PUSHDATA1);
            bytecode.push(len as u8);
            bytecode.extend_from_slice(data);
            bytecode
        }
        len if len <= 0xffff => {
            let mut bytecode = Vec::with_capacity(3 + len);
            bytecode.push(OP_PUSHDATA2);
            bytecode.extend_from_slice(&(len as u16).to_le_bytes());
            bytecode.extend_from_slice(data);
            bytecode
        }
        len => {
            let mut bytecode = Vec::with_capacity(5 + len);
            bytecode.push(OP_PUSHDATA4);
            bytecode.extend_from_slice(&(len as u32).to_le_bytes());
            bytecode.extend_from_slice(data);
            bytecode
        }
    }
}

/// Detects whether a data push uses the minimal opcode for its payload
/// (consensus rule under the minimal-encoding flag).
pub fn push_is_minimal(opcode: u8, data: &[u8]) -> bool {
    match data.len() {
        0 => opcode == OP_0,
        1 if (0x01..=0x10).contains(&data[0]) => false,
        len if len <= OP_PUSHBYTES_75 as usize => opcode as usize == len,
        len if len <= 0xff => opcode == OP_PUSHDATA1,
        len if len <= 0xffff => opcode == OP_PUSHDATA2,
        _ => opcode == OP_PUSHDATA4,
    }
}

/// Pretty-prints bytecode for diagnostics, including malformed tails.
pub fn disassemble_bytecode(bytecode: &[u8]) -> String {
    parse_bytecode(bytecode)
        .iter()
        .map(Instruction::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use amplify::hex::FromHex;

    use super::*;

    #[test]
    fn parse_simple_ops() {
        let instructions = parse_bytecode(&[OP_DUP, OP_HASH160, OP_EQUALVERIFY]);
        assert_eq!(instructions, vec![
            Instruction::Op(OP_DUP),
            Instruction::Op(OP_HASH160),
            Instruction::Op(OP_EQUALVERIFY),
        ]);
        assert!(!instructions_are_malformed(&instructions));
    }

    #[test]
    fn parse_pushes() {
        let bytecode = Vec::<u8>::from_hex("0301020355").unwrap();
        let instructions = parse_bytecode(&bytecode);
        assert_eq!(instructions, vec![
            Instruction::Push {
                opcode: 0x03,
                data: vec![0x01, 0x02, 0x03],
            },
            Instruction::Op(OP_5),
        ]);
        assert_eq!(serialize_instructions(&instructions), bytecode);
    }

    #[test]
    fn parse_pushdata() {
        let mut bytecode = vec![OP_PUSHDATA1, 0x04];
        bytecode.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let instructions = parse_bytecode(&bytecode);
        assert_eq!(instructions, vec![Instruction::Push {
            opcode: OP_PUSHDATA1,
            data: vec![0xde, 0xad, 0xbe, 0xef],
        }]);
        assert_eq!(serialize_instructions(&instructions), bytecode);
    }

    #[test]
    fn malformed_tail() {
        let instructions = parse_bytecode(&[OP_DUP, 0x03, 0x01]);
        assert!(instructions_are_malformed(&instructions));
        assert_eq!(instructions[1], Instruction::MalformedPush {
            opcode: 0x03,
            expected: 3,
            data: vec![0x01],
        });

        // A PUSHDATA2 with a truncated length field is also malformed.
        let instructions = parse_bytecode(&[OP_PUSHDATA2, 0xff]);
        assert!(instructions_are_malformed(&instructions));
    }

    #[test]
    fn data_push_minimality() {
        assert_eq!(encode_data_push(&[]), vec![OP_0]);
        assert_eq!(encode_data_push(&[0x01]), vec![OP_1]);
        assert_eq!(encode_data_push(&[0x10]), vec![OP_16]);
        assert_eq!(encode_data_push(&[0x11]), vec![0x01, 0x11]);
        assert_eq!(encode_data_push(&[0x00]), vec![0x01, 0x00]);
        let long = vec![0xab; 76];
        let encoded = encode_data_push(&long);
        assert_eq!(encoded[0], OP_PUSHDATA1);
        assert_eq!(encoded[1], 76);
        let very_long = vec![0xab; 256];
        let encoded = encode_data_push(&very_long);
        assert_eq!(&encoded[..3], &[OP_PUSHDATA2, 0x00, 0x01]);
    }

    #[test]
    fn encode_parse_roundtrip() {
        for payload in [vec![], vec![0x00], vec![0x42], vec![0xab; 75], vec![0xcd; 300]] {
            let instructions = parse_bytecode(&encode_data_push(&payload));
            assert_eq!(instructions.len(), 1);
            assert_eq!(instructions[0].pushed_data().unwrap(), payload);
        }
        // Single bytes 1..=16 encode to number-push opcodes.
        let instructions = parse_bytecode(&encode_data_push(&[0x07]));
        assert_eq!(instructions, vec![Instruction::Op(OP_7)]);
        assert_eq!(instructions[0].pushed_data().unwrap(), vec![0x07]);
    }

    #[test]
    fn disassembly() {
        let bytecode = Vec::<u8>::from_hex("76a9140102030405060708090a0b0c0d0e0f101112131487")
            .unwrap();
        assert_eq!(
            disassemble_bytecode(&bytecode),
            "OP_DUP OP_HASH160 OP_PUSHBYTES_20 \
             0x0102030405060708090a0b0c0d0e0f1011121314 OP_EQUAL"
        );
        assert_eq!(disassemble_bytecode(&[0x03, 0x01]), "OP_PUSHBYTES_3 0x01 [3 bytes expected]");
        assert_eq!(disassemble_bytecode(&[0xff]), "OP_UNKNOWN_255");
    }
}
