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

use amplify::confinement::{Confined, U32};
use amplify::{confinement, Bytes20, Wrapper};

use crate::digest::{Digest, Ripemd160, Sha256};
use crate::opcodes::*;
use crate::LIB_NAME_BITAUTH;

/// Maximum length of the unlocking, locking and redeem bytecode accepted for
/// evaluation.
pub const MAX_BYTECODE_LENGTH: usize = 10_000;

/// Byte vectors of script length, bounded by consensus far below the 32-bit
/// confinement applied here.
pub type ScriptByteArray = Confined<Vec<u8>, 0, U32>;

#[derive(Wrapper, WrapperMut, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Debug, From)]
#[wrapper(Deref, AsSlice, Hex)]
#[wrapper_mut(DerefMut, AsSliceMut)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
pub struct ScriptBytes(ScriptByteArray);

impl TryFrom<Vec<u8>> for ScriptBytes {
    type Error = confinement::Error;
    fn try_from(script_bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Confined::try_from(script_bytes).map(Self)
    }
}

impl ScriptBytes {
    /// Constructs script object assuming the script length is less than 4GB.
    /// Panics otherwise.
    #[inline]
    pub fn from_unsafe(script_bytes: Vec<u8>) -> Self {
        Self(Confined::try_from(script_bytes).expect("script exceeding 4GB"))
    }

    /// Adds instructions to push some arbitrary data onto the stack.
    ///
    /// ## Panics
    ///
    /// The method panics if `data` length is greater or equal to
    /// 0x100000000.
    pub fn push_slice(&mut self, data: &[u8]) {
        // Start with a PUSH opcode
        match data.len() as u64 {
            n if n < OP_PUSHDATA1 as u64 => {
                self.push(n as u8);
            }
            n if n < 0x100 => {
                self.push(OP_PUSHDATA1);
                self.push(n as u8);
            }
            n if n < 0x10000 => {
                self.push(OP_PUSHDATA2);
                self.push((n % 0x100) as u8);
                self.push((n / 0x100) as u8);
            }
            n if n < 0x100000000 => {
                self.push(OP_PUSHDATA4);
                self.push((n % 0x100) as u8);
                self.push(((n / 0x100) % 0x100) as u8);
                self.push(((n / 0x10000) % 0x100) as u8);
                self.push((n / 0x1000000) as u8);
            }
            _ => panic!("tried to put a 4bn+ sized object into a script!"),
        }
        // Then push the raw bytes
        self.extend(data);
    }

    #[inline]
    pub(crate) fn push(&mut self, data: u8) { self.0.push(data).expect("script exceeds 4GB") }

    #[inline]
    pub(crate) fn extend(&mut self, data: &[u8]) {
        self.0
            .extend(data.iter().copied())
            .expect("script exceeds 4GB")
    }
}

/// Unlocking bytecode (`scriptSig`), spent alongside the input which carries
/// it. Under the BCH rule set it must consist of push operations only.
#[derive(Wrapper, WrapperMut, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, From, Default)]
#[wrapper(Deref, AsSlice, Hex)]
#[wrapper_mut(DerefMut, AsSliceMut)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct UnlockingBytecode(#[from] ScriptBytes);

impl TryFrom<Vec<u8>> for UnlockingBytecode {
    type Error = confinement::Error;
    fn try_from(script_bytes: Vec<u8>) -> Result<Self, Self::Error> {
        ScriptBytes::try_from(script_bytes).map(Self)
    }
}

impl UnlockingBytecode {
    #[inline]
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(ScriptBytes::from(Confined::with_capacity(capacity)))
    }

    /// Constructs script object assuming the script length is less than 4GB.
    /// Panics otherwise.
    #[inline]
    pub fn from_unsafe(script_bytes: Vec<u8>) -> Self {
        Self(ScriptBytes::from_unsafe(script_bytes))
    }

    /// Adds a data push to the script.
    #[inline]
    pub fn push_slice(&mut self, data: &[u8]) { self.0.push_slice(data) }

    /// Adds a single opcode to the script.
    #[inline]
    pub fn push_opcode(&mut self, op_code: u8) { self.0.push(op_code) }

    #[inline]
    pub fn as_script_bytes(&self) -> &ScriptBytes { &self.0 }
}

/// Locking bytecode (`scriptPubkey`), defining the conditions under which an
/// output may be spent.
#[derive(Wrapper, WrapperMut, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, From, Default)]
#[wrapper(Deref, AsSlice, Hex)]
#[wrapper_mut(DerefMut, AsSliceMut)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct LockingBytecode(#[from] ScriptBytes);

impl TryFrom<Vec<u8>> for LockingBytecode {
    type Error = confinement::Error;
    fn try_from(script_bytes: Vec<u8>) -> Result<Self, Self::Error> {
        ScriptBytes::try_from(script_bytes).map(Self)
    }
}

impl LockingBytecode {
    #[inline]
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(ScriptBytes::from(Confined::with_capacity(capacity)))
    }

    /// Constructs script object assuming the script length is less than 4GB.
    /// Panics otherwise.
    #[inline]
    pub fn from_unsafe(script_bytes: Vec<u8>) -> Self {
        Self(ScriptBytes::from_unsafe(script_bytes))
    }

    pub fn p2pkh(hash: impl Into<[u8; 20]>) -> Self {
        let mut script = Self::with_capacity(25);
        script.push_opcode(OP_DUP);
        script.push_opcode(OP_HASH160);
        script.push_slice(&hash.into());
        script.push_opcode(OP_EQUALVERIFY);
        script.push_opcode(OP_CHECKSIG);
        script
    }

    pub fn p2sh(hash: impl Into<[u8; 20]>) -> Self {
        let mut script = Self::with_capacity(23);
        script.push_opcode(OP_HASH160);
        script.push_slice(&hash.into());
        script.push_opcode(OP_EQUAL);
        script
    }

    /// Checks whether the locking bytecode is a P2PKH output.
    #[inline]
    pub fn is_p2pkh(&self) -> bool {
        self.0.len() == 25 &&
            self.0[0] == OP_DUP &&
            self.0[1] == OP_HASH160 &&
            self.0[2] == OP_PUSHBYTES_20 &&
            self.0[23] == OP_EQUALVERIFY &&
            self.0[24] == OP_CHECKSIG
    }

    /// Checks whether the locking bytecode matches the exact P2SH template
    /// `OP_HASH160 OP_PUSHBYTES_20 <20 bytes> OP_EQUAL`, which triggers the
    /// redeem-script evaluation path.
    #[inline]
    pub fn is_p2sh(&self) -> bool {
        self.0.len() == 23 &&
            self.0[0] == OP_HASH160 &&
            self.0[1] == OP_PUSHBYTES_20 &&
            self.0[22] == OP_EQUAL
    }

    /// Adds a data push to the script.
    #[inline]
    pub fn push_slice(&mut self, data: &[u8]) { self.0.push_slice(data) }

    /// Adds a single opcode to the script.
    #[inline]
    pub fn push_opcode(&mut self, op_code: u8) { self.0.push(op_code) }

    #[inline]
    pub fn as_script_bytes(&self) -> &ScriptBytes { &self.0 }
}

/// Redeem bytecode: the top unlocking-stack item re-evaluated as a script by
/// the P2SH path.
#[derive(Wrapper, WrapperMut, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, From, Default)]
#[wrapper(Deref, AsSlice, Hex)]
#[wrapper_mut(DerefMut, AsSliceMut)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct RedeemBytecode(#[from] ScriptBytes);

impl TryFrom<Vec<u8>> for RedeemBytecode {
    type Error = confinement::Error;
    fn try_from(script_bytes: Vec<u8>) -> Result<Self, Self::Error> {
        ScriptBytes::try_from(script_bytes).map(Self)
    }
}

impl RedeemBytecode {
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Constructs script object assuming the script length is less than 4GB.
    /// Panics otherwise.
    #[inline]
    pub fn from_unsafe(script_bytes: Vec<u8>) -> Self {
        Self(ScriptBytes::from_unsafe(script_bytes))
    }

    /// Adds a data push to the script.
    #[inline]
    pub fn push_slice(&mut self, data: &[u8]) { self.0.push_slice(data) }

    /// Adds a single opcode to the script.
    #[inline]
    pub fn push_opcode(&mut self, op_code: u8) { self.0.push(op_code) }

    /// The locking bytecode committing to this redeem script.
    pub fn to_locking_bytecode(&self) -> LockingBytecode {
        LockingBytecode::p2sh(ScriptHash::from(self))
    }

    #[inline]
    pub fn as_script_bytes(&self) -> &ScriptBytes { &self.0 }
}

/// HASH160 (RIPEMD160 of SHA256) of a redeem script, committed to by a P2SH
/// locking bytecode.
#[derive(Wrapper, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, From)]
#[wrapper(Index, RangeOps, AsSlice, BorrowSlice, Hex, Display, FromStr)]
#[derive(StrictType, StrictDumb, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct ScriptHash(
    #[from]
    #[from([u8; 20])]
    pub Bytes20,
);

impl From<ScriptHash> for [u8; 20] {
    fn from(value: ScriptHash) -> Self { value.0.into_inner() }
}

impl From<&RedeemBytecode> for ScriptHash {
    fn from(redeem_script: &RedeemBytecode) -> Self {
        let mut engine = Sha256::default();
        engine.input(redeem_script.as_slice());
        let mut engine2 = Ripemd160::default();
        engine2.input(&engine.finish());
        Self(engine2.finish().into())
    }
}

/// Detects the witness-program shape exempted from P2SH redeem evaluation
/// (SegWit recovery): a version push (`OP_0` or `OP_1..OP_16`) followed by a
/// single direct push covering the entire remainder, with a total length of
/// 4 to 42 bytes.
pub fn is_witness_program(bytecode: &[u8]) -> bool {
    // A redeemScript as defined in BIP16 which consists of a 1-byte push
    // opcode (for 0 to 16) followed by a data push between 2 and 40 bytes
    // gets a special meaning: the first push is the "version byte" and the
    // pushed byte vector the "witness program".
    let script_len = bytecode.len();
    if !(4..=42).contains(&script_len) {
        return false;
    }
    let version = bytecode[0];
    let push_opbyte = bytecode[1]; // Second byte push opcode 2-40 bytes
    (version == OP_0 || (OP_1..=OP_16).contains(&version)) &&
        script_len - 2 == push_opbyte as usize
}

#[cfg(feature = "serde")]
mod _serde {
    use amplify::hex::{FromHex, ToHex};
    use serde::{Deserialize, Serialize};
    use serde_crate::de::Error;
    use serde_crate::{Deserializer, Serializer};

    use super::*;

    impl Serialize for ScriptBytes {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.to_hex())
            } else {
                serializer.serialize_bytes(self.as_slice())
            }
        }
    }

    impl<'de> Deserialize<'de> for ScriptBytes {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de> {
            if deserializer.is_human_readable() {
                String::deserialize(deserializer).and_then(|string| {
                    Self::from_hex(&string).map_err(|_| D::Error::custom("wrong hex data"))
                })
            } else {
                let bytes = Vec::<u8>::deserialize(deserializer)?;
                ScriptBytes::try_from(bytes)
                    .map_err(|_| D::Error::custom("invalid script length exceeding 4GB"))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn p2sh_template() {
        let locking = LockingBytecode::p2sh([0x11; 20]);
        assert!(locking.is_p2sh());
        assert!(!locking.is_p2pkh());
        assert_eq!(locking.len(), 23);
        assert_eq!(locking[0], OP_HASH160);
        assert_eq!(locking[1], OP_PUSHBYTES_20);
        assert_eq!(locking[22], OP_EQUAL);

        let mut nearly = locking.to_vec();
        nearly.push(OP_NOP);
        assert!(!LockingBytecode::from_unsafe(nearly).is_p2sh());
    }

    #[test]
    fn p2pkh_template() {
        let locking = LockingBytecode::p2pkh([0x22; 20]);
        assert!(locking.is_p2pkh());
        assert!(!locking.is_p2sh());
    }

    #[test]
    fn redeem_script_commitment() {
        let mut redeem = RedeemBytecode::new();
        redeem.push_opcode(OP_1);
        let locking = redeem.to_locking_bytecode();
        assert!(locking.is_p2sh());
        assert_eq!(&locking[2..22], AsRef::<[u8]>::as_ref(&ScriptHash::from(&redeem)));
    }

    #[test]
    fn witness_program_shapes() {
        let mut v0 = vec![OP_0, 0x14];
        v0.extend_from_slice(&[0u8; 20]);
        assert!(is_witness_program(&v0));

        let mut v1 = vec![OP_1, 0x20];
        v1.extend_from_slice(&[0u8; 32]);
        assert!(is_witness_program(&v1));

        let minimal = [OP_0, 0x02, 0xaa, 0xbb];
        assert!(is_witness_program(&minimal));

        // Too short, too long, wrong version byte, wrong length byte.
        assert!(!is_witness_program(&[OP_0, 0x01, 0xaa]));
        let mut oversized = vec![OP_0, 0x29];
        oversized.extend_from_slice(&[0u8; 41]);
        assert!(!is_witness_program(&oversized));
        let mut bad_version = vec![OP_NOP, 0x14];
        bad_version.extend_from_slice(&[0u8; 20]);
        assert!(!is_witness_program(&bad_version));
        let mut bad_length = vec![OP_0, 0x15];
        bad_length.extend_from_slice(&[0u8; 20]);
        assert!(!is_witness_program(&bad_length));
    }
}
