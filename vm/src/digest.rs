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

//! Hash collaborators used by the crypto opcodes and the signing
//! serialization.
//!
//! The virtual machine never implements hashing itself: every digest goes
//! through the [`Digest`] seam (init via [`Default`], update via
//! [`Digest::input`], finalization via [`Digest::finish`]) backed by the
//! `bitcoin_hashes` crate.

use bitcoin_hashes::{ripemd160, sha1, sha256, Hash, HashEngine};

/// Incremental digest contract shared by all hash collaborators.
pub trait Digest: Default {
    /// The fixed-length digest value.
    type Output: Copy + AsRef<[u8]> + Into<Vec<u8>>;

    /// Feeds more input into the digest state.
    fn input(&mut self, data: &[u8]);

    /// Finalizes the state into a digest.
    fn finish(self) -> Self::Output;

    /// One-shot digest of `data`.
    fn hash(data: &[u8]) -> Self::Output {
        let mut engine = Self::default();
        engine.input(data);
        engine.finish()
    }
}

/// SHA-256 collaborator (`OP_SHA256`, `OP_HASH160`, `OP_HASH256`, signing
/// serialization digests).
#[derive(Clone, Default)]
pub struct Sha256(sha256::HashEngine);

impl Digest for Sha256 {
    type Output = [u8; 32];

    #[inline]
    fn input(&mut self, data: &[u8]) { self.0.input(data) }

    #[inline]
    fn finish(self) -> [u8; 32] { sha256::Hash::from_engine(self.0).to_byte_array() }
}

/// SHA-1 collaborator (`OP_SHA1`).
#[derive(Clone, Default)]
pub struct Sha1(sha1::HashEngine);

impl Digest for Sha1 {
    type Output = [u8; 20];

    #[inline]
    fn input(&mut self, data: &[u8]) { self.0.input(data) }

    #[inline]
    fn finish(self) -> [u8; 20] { sha1::Hash::from_engine(self.0).to_byte_array() }
}

/// RIPEMD-160 collaborator (`OP_RIPEMD160`, `OP_HASH160`).
#[derive(Clone, Default)]
pub struct Ripemd160(ripemd160::HashEngine);

impl Digest for Ripemd160 {
    type Output = [u8; 20];

    #[inline]
    fn input(&mut self, data: &[u8]) { self.0.input(data) }

    #[inline]
    fn finish(self) -> [u8; 20] { ripemd160::Hash::from_engine(self.0).to_byte_array() }
}

/// RIPEMD160 of SHA256 (`OP_HASH160`).
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut engine = Ripemd160::default();
    engine.input(&Sha256::hash(data));
    engine.finish()
}

/// Double SHA256 (`OP_HASH256`, transaction and sighash digests).
pub fn hash256(data: &[u8]) -> [u8; 32] {
    let mut engine = Sha256::default();
    engine.input(&Sha256::hash(data));
    engine.finish()
}
