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

use std::iter;

use secp256k1::{ecdsa, schnorr, Message, PublicKey, SECP256K1};

/// The BCH fork identifier bit which every transaction sighash type must
/// carry.
pub const SIGHASH_FORKID: u8 = 0x40;
/// The bit electing to sign only the input carrying the signature.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// A signature-encoding error.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum SigError {
    /// empty signature.
    EmptySignature,

    /// invalid signature DER encoding.
    DerEncoding,

    /// invalid Schnorr signature.
    SchnorrEncoding,

    /// non-standard sighash type value {0:#04x}.
    SighashType(u8),

    /// invalid public key encoding.
    PublicKeyEncoding,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[repr(u8)]
pub enum SighashFlag {
    /// 0x1: Sign all outputs.
    #[default]
    All = 0x01,
    /// 0x2: Sign no outputs --- anyone can choose the destination.
    None = 0x02,
    /// 0x3: Sign the output whose index matches this input's index.
    Single = 0x03,
}

/// Sighash type under the BCH rule set: a base flag, the optional
/// anyone-can-pay bit and the mandatory fork identifier.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct SighashType {
    pub flag: SighashFlag,
    pub anyone_can_pay: bool,
}

impl Default for SighashType {
    fn default() -> Self { Self::all() }
}

impl SighashType {
    pub const fn all() -> Self {
        SighashType {
            flag: SighashFlag::All,
            anyone_can_pay: false,
        }
    }
    pub const fn none() -> Self {
        SighashType {
            flag: SighashFlag::None,
            anyone_can_pay: false,
        }
    }
    pub const fn single() -> Self {
        SighashType {
            flag: SighashFlag::Single,
            anyone_can_pay: false,
        }
    }

    pub const fn all_anyone_can_pay() -> Self {
        SighashType {
            flag: SighashFlag::All,
            anyone_can_pay: true,
        }
    }
    pub const fn none_anyone_can_pay() -> Self {
        SighashType {
            flag: SighashFlag::None,
            anyone_can_pay: true,
        }
    }
    pub const fn single_anyone_can_pay() -> Self {
        SighashType {
            flag: SighashFlag::Single,
            anyone_can_pay: true,
        }
    }

    /// Parses a consensus sighash byte, requiring a standard base flag and
    /// the BCH fork identifier bit.
    pub fn from_consensus_u8(n: u8) -> Result<SighashType, SigError> {
        if n & SIGHASH_FORKID == 0 {
            return Err(SigError::SighashType(n));
        }
        let flag = match n & !(SIGHASH_ANYONECANPAY | SIGHASH_FORKID) {
            0x01 => SighashFlag::All,
            0x02 => SighashFlag::None,
            0x03 => SighashFlag::Single,
            _ => return Err(SigError::SighashType(n)),
        };
        Ok(SighashType {
            flag,
            anyone_can_pay: n & SIGHASH_ANYONECANPAY != 0,
        })
    }

    /// Serializes into the consensus sighash byte, fork identifier included.
    pub const fn to_consensus_u8(self) -> u8 {
        let mask = (self.anyone_can_pay as u8) << 7;
        self.flag as u8 | SIGHASH_FORKID | mask
    }

    /// The 4-byte little-endian form appended to the signing serialization.
    pub const fn to_consensus_u32(self) -> u32 { self.to_consensus_u8() as u32 }
}

/// A transaction signature consumed by `OP_CHECKSIG` and `OP_CHECKMULTISIG`:
/// either a DER-encoded ECDSA signature or a 64-byte Schnorr signature,
/// always followed by the sighash byte.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TxSignature {
    /// The underlying signature.
    pub sig: Sig,
    /// The corresponding hash type.
    pub sighash_type: SighashType,
}

/// Signature scheme dispatch: under BCH rules 65-byte transaction signatures
/// (64 + sighash byte) are Schnorr, everything else is DER ECDSA.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Sig {
    Ecdsa(ecdsa::Signature),
    Schnorr(schnorr::Signature),
}

impl TxSignature {
    /// Deserializes from the stack item consumed by signature-checking
    /// operations, dispatching on length per the BCH Schnorr rule.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SigError> {
        let (hash_ty, sig) = bytes.split_last().ok_or(SigError::EmptySignature)?;
        let sighash_type = SighashType::from_consensus_u8(*hash_ty)?;
        let sig = if sig.len() == 64 {
            Sig::Schnorr(schnorr::Signature::from_slice(sig).map_err(|_| SigError::SchnorrEncoding)?)
        } else {
            Sig::Ecdsa(ecdsa::Signature::from_der(sig).map_err(|_| SigError::DerEncoding)?)
        };
        Ok(TxSignature { sig, sighash_type })
    }

    #[inline]
    pub fn is_schnorr(&self) -> bool { matches!(self.sig, Sig::Schnorr(_)) }

    /// Serializes back into the stack encoding.
    pub fn to_vec(self) -> Vec<u8> {
        let bytes: Vec<u8> = match self.sig {
            Sig::Ecdsa(sig) => sig.serialize_der().to_vec(),
            Sig::Schnorr(sig) => sig[..].to_vec(),
        };
        bytes
            .into_iter()
            .chain(iter::once(self.sighash_type.to_consensus_u8()))
            .collect()
    }

    /// Verifies over a 32-byte message digest; delegates all elliptic-curve
    /// work to the secp256k1 collaborator.
    pub fn verify(&self, digest: [u8; 32], pubkey: &PublicKey) -> bool {
        verify_with(self.sig, digest, pubkey)
    }
}

/// A data signature consumed by `OP_CHECKDATASIG`: same scheme dispatch as
/// [`TxSignature`], with a bare 64-byte length meaning Schnorr, and no
/// sighash byte.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DataSignature(pub Sig);

impl DataSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SigError> {
        if bytes.is_empty() {
            return Err(SigError::EmptySignature);
        }
        let sig = if bytes.len() == 64 {
            Sig::Schnorr(
                schnorr::Signature::from_slice(bytes).map_err(|_| SigError::SchnorrEncoding)?,
            )
        } else {
            Sig::Ecdsa(ecdsa::Signature::from_der(bytes).map_err(|_| SigError::DerEncoding)?)
        };
        Ok(DataSignature(sig))
    }

    /// Verifies over a 32-byte message digest.
    pub fn verify(&self, digest: [u8; 32], pubkey: &PublicKey) -> bool {
        verify_with(self.0, digest, pubkey)
    }
}

/// Parses and validates a public key stack item (33-byte compressed or
/// 65-byte uncompressed point encoding).
pub fn parse_pubkey(bytes: &[u8]) -> Result<PublicKey, SigError> {
    PublicKey::from_slice(bytes).map_err(|_| SigError::PublicKeyEncoding)
}

fn verify_with(sig: Sig, digest: [u8; 32], pubkey: &PublicKey) -> bool {
    match sig {
        // The underlying library rejects non-normalized (high-S) signatures,
        // which matches the low-S requirement of the rule set.
        Sig::Ecdsa(sig) => SECP256K1
            .verify_ecdsa(&Message::from_digest(digest), &sig, pubkey)
            .is_ok(),
        Sig::Schnorr(sig) => {
            let (xonly, _parity) = pubkey.x_only_public_key();
            SECP256K1
                .verify_schnorr(&sig, &Message::from_digest(digest), &xonly)
                .is_ok()
        }
    }
}

#[cfg(test)]
mod test {
    use secp256k1::{Keypair, SecretKey};

    use super::*;

    fn test_key() -> SecretKey {
        SecretKey::from_slice(&[0xcd; 32]).unwrap()
    }

    #[test]
    fn sighash_byte_roundtrip() {
        for sighash_type in [
            SighashType::all(),
            SighashType::none(),
            SighashType::single(),
            SighashType::all_anyone_can_pay(),
            SighashType::none_anyone_can_pay(),
            SighashType::single_anyone_can_pay(),
        ] {
            let byte = sighash_type.to_consensus_u8();
            assert_ne!(byte & SIGHASH_FORKID, 0);
            assert_eq!(SighashType::from_consensus_u8(byte).unwrap(), sighash_type);
        }
        assert_eq!(SighashType::all().to_consensus_u8(), 0x41);
        assert_eq!(SighashType::all_anyone_can_pay().to_consensus_u8(), 0xc1);
    }

    #[test]
    fn forkid_is_mandatory() {
        assert_eq!(SighashType::from_consensus_u8(0x01), Err(SigError::SighashType(0x01)));
        assert_eq!(SighashType::from_consensus_u8(0x44), Err(SigError::SighashType(0x44)));
        assert!(SighashType::from_consensus_u8(0x41).is_ok());
    }

    #[test]
    fn ecdsa_signature_roundtrip() {
        let secret = test_key();
        let pubkey = secret.public_key(SECP256K1);
        let digest = [0x42u8; 32];
        let sig = SECP256K1.sign_ecdsa(&Message::from_digest(digest), &secret);
        let encoded = TxSignature {
            sig: Sig::Ecdsa(sig),
            sighash_type: SighashType::all(),
        }
        .to_vec();

        let decoded = TxSignature::from_bytes(&encoded).unwrap();
        assert!(!decoded.is_schnorr());
        assert_eq!(decoded.sighash_type, SighashType::all());
        assert!(decoded.verify(digest, &pubkey));
        assert!(!decoded.verify([0x43u8; 32], &pubkey));
    }

    #[test]
    fn schnorr_signature_roundtrip() {
        let keypair = Keypair::from_secret_key(SECP256K1, &test_key());
        let pubkey = keypair.public_key();
        let digest = [0x42u8; 32];
        let sig = SECP256K1.sign_schnorr_no_aux_rand(&Message::from_digest(digest), &keypair);
        let mut encoded = sig[..].to_vec();
        encoded.push(SighashType::all().to_consensus_u8());
        assert_eq!(encoded.len(), 65);

        let decoded = TxSignature::from_bytes(&encoded).unwrap();
        assert!(decoded.is_schnorr());
        assert!(decoded.verify(digest, &pubkey));
    }

    #[test]
    fn empty_signature_errors() {
        assert_eq!(TxSignature::from_bytes(&[]), Err(SigError::EmptySignature));
        assert_eq!(DataSignature::from_bytes(&[]), Err(SigError::EmptySignature));
    }

    #[test]
    fn pubkey_validation() {
        let pubkey = test_key().public_key(SECP256K1);
        assert!(parse_pubkey(&pubkey.serialize()).is_ok());
        assert!(parse_pubkey(&pubkey.serialize_uncompressed()).is_ok());
        assert_eq!(parse_pubkey(&[0x02; 33]), Err(SigError::PublicKeyEncoding));
        assert_eq!(parse_pubkey(&[]), Err(SigError::PublicKeyEncoding));
    }
}
