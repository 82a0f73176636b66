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

use crate::VmError;

/// Maximum byte length of a script number consumed by arithmetic and flow
/// operations. Longer operands fail the evaluation; results of arithmetic may
/// still re-encode past this length.
pub const MAX_SCRIPT_NUMBER_LENGTH: usize = 4;

/// An integer in Bitcoin's sign-magnitude little-endian stack encoding.
///
/// Zero encodes to an empty array; the most significant bit of the top byte
/// carries the sign, with an extra `0x00`/`0x80` byte appended when the
/// magnitude already occupies that bit.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, Default, From)]
#[display(inner)]
pub struct ScriptNum(i64);

impl ScriptNum {
    /// Zero, encoding to an empty stack item.
    pub const ZERO: Self = ScriptNum(0);

    #[inline]
    pub const fn new(value: i64) -> Self { ScriptNum(value) }

    /// Decodes a stack item with the consensus operand length limit of
    /// [`MAX_SCRIPT_NUMBER_LENGTH`] bytes.
    #[inline]
    pub fn from_bytes(bytes: &[u8], require_minimal: bool) -> Result<Self, VmError> {
        Self::from_bytes_limited(bytes, require_minimal, MAX_SCRIPT_NUMBER_LENGTH)
    }

    /// Decodes a stack item into a script number.
    ///
    /// Fails when the item is longer than `max_len` bytes, or, under
    /// `require_minimal`, when the encoding carries an unnecessary top byte.
    pub fn from_bytes_limited(
        bytes: &[u8],
        require_minimal: bool,
        max_len: usize,
    ) -> Result<Self, VmError> {
        if bytes.len() > max_len {
            return Err(VmError::ExceededMaximumScriptNumberLength);
        }
        let Some((&last, rest)) = bytes.split_last() else {
            return Ok(ScriptNum::ZERO);
        };
        if require_minimal && last & 0x7f == 0 {
            // The top byte carries only a sign; it is required exactly when
            // the preceding byte would otherwise flip the sign itself.
            if rest.last().map_or(true, |byte| byte & 0x80 == 0) {
                return Err(VmError::RequiresMinimalScriptNumberEncoding);
            }
        }
        let mut magnitude = (last & 0x7f) as i64;
        for &byte in rest.iter().rev() {
            magnitude = magnitude << 8 | byte as i64;
        }
        if last & 0x80 != 0 {
            Ok(ScriptNum(-magnitude))
        } else {
            Ok(ScriptNum(magnitude))
        }
    }

    /// Encodes into the unique minimal stack encoding.
    pub fn to_bytes(self) -> Vec<u8> {
        if self.0 == 0 {
            return vec![];
        }
        let negative = self.0 < 0;
        let mut magnitude = self.0.unsigned_abs();
        let mut bytes = Vec::with_capacity(9);
        while magnitude > 0 {
            bytes.push((magnitude & 0xff) as u8);
            magnitude >>= 8;
        }
        let sign = if negative { 0x80 } else { 0x00 };
        if bytes.last().expect("nonzero magnitude") & 0x80 != 0 {
            bytes.push(sign);
        } else {
            *bytes.last_mut().expect("nonzero magnitude") |= sign;
        }
        bytes
    }

    #[inline]
    pub const fn into_i64(self) -> i64 { self.0 }

    /// Converts into a non-negative `usize` index; negative values error.
    pub fn into_index(self) -> Result<usize, VmError> {
        usize::try_from(self.0).map_err(|_| VmError::InvalidStackIndex)
    }
}

impl From<ScriptNum> for i64 {
    fn from(num: ScriptNum) -> Self { num.0 }
}

impl From<bool> for ScriptNum {
    fn from(flag: bool) -> Self { ScriptNum(flag as i64) }
}

/// Boolean cast applied by flow control and the final verification predicate:
/// an item is truthy unless every byte is zero, modulo an optional negative
/// sign bit (`0x80`) in the last position.
pub fn item_is_truthy(item: &[u8]) -> bool {
    for (index, byte) in item.iter().enumerate() {
        if *byte != 0 {
            return !(index == item.len() - 1 && *byte == 0x80);
        }
    }
    false
}

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip(value: i64, encoding: &[u8]) {
        assert_eq!(ScriptNum::new(value).to_bytes(), encoding);
        assert_eq!(
            ScriptNum::from_bytes_limited(encoding, true, 9).unwrap(),
            ScriptNum::new(value)
        );
    }

    #[test]
    fn minimal_encodings() {
        roundtrip(0, &[]);
        roundtrip(1, &[0x01]);
        roundtrip(-1, &[0x81]);
        roundtrip(16, &[0x10]);
        roundtrip(127, &[0x7f]);
        roundtrip(128, &[0x80, 0x00]);
        roundtrip(-128, &[0x80, 0x80]);
        roundtrip(255, &[0xff, 0x00]);
        roundtrip(256, &[0x00, 0x01]);
        roundtrip(-256, &[0x00, 0x81]);
        roundtrip(0x7fffffff, &[0xff, 0xff, 0xff, 0x7f]);
        roundtrip(-0x7fffffff, &[0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn non_minimal_encodings() {
        assert_eq!(
            ScriptNum::from_bytes(&[0x01, 0x00], true),
            Err(VmError::RequiresMinimalScriptNumberEncoding)
        );
        assert_eq!(
            ScriptNum::from_bytes(&[0x00], true),
            Err(VmError::RequiresMinimalScriptNumberEncoding)
        );
        assert_eq!(ScriptNum::from_bytes(&[0x01, 0x00], false).unwrap().into_i64(), 1);
        assert_eq!(ScriptNum::from_bytes(&[0x00], false).unwrap().into_i64(), 0);
        // A bare sign byte atop a sign-bit-carrying byte remains minimal.
        assert_eq!(ScriptNum::from_bytes(&[0x80, 0x80], true).unwrap().into_i64(), -128);
    }

    #[test]
    fn operand_length_limit() {
        assert_eq!(
            ScriptNum::from_bytes(&[0x01, 0x02, 0x03, 0x04, 0x05], false),
            Err(VmError::ExceededMaximumScriptNumberLength)
        );
        assert!(ScriptNum::from_bytes(&[0x01, 0x02, 0x03, 0x04], false).is_ok());
    }

    #[test]
    fn truthiness() {
        assert!(!item_is_truthy(&[]));
        assert!(!item_is_truthy(&[0x00]));
        assert!(!item_is_truthy(&[0x00, 0x00]));
        assert!(!item_is_truthy(&[0x00, 0x80]));
        assert!(item_is_truthy(&[0x01]));
        assert!(item_is_truthy(&[0x80, 0x01]));
        assert!(item_is_truthy(&[0x00, 0x01, 0x00]));
    }
}
