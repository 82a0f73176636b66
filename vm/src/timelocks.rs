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

use crate::LIB_NAME_BITAUTH;

/// The Threshold for deciding whether a lock time value is a height or a time
/// (see [Bitcoin Core]).
///
/// `LockTime` values _below_ the threshold are interpreted as block heights,
/// values _above_ (or equal to) the threshold are interpreted as block times
/// (UNIX timestamp, seconds since epoch).
///
/// [Bitcoin Core]: https://github.com/bitcoin/bitcoin/blob/9ccaee1d5e2e4b79b0a7c29aadb41b97e4741332/src/script/script.h#L39
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Transaction `nLockTime` value, read by `OP_CHECKLOCKTIMEVERIFY`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct LockTime(u32);

impl LockTime {
    /// Zero time lock
    pub const ZERO: Self = Self(0);

    /// Creates absolute time lock with the given block height.
    ///
    /// Block height must be strictly less than `0x1DCD6500`, otherwise
    /// `None` is returned.
    #[inline]
    pub const fn from_height(height: u32) -> Option<Self> {
        if height < LOCKTIME_THRESHOLD {
            Some(Self(height))
        } else {
            None
        }
    }

    /// Creates absolute time lock with the given UNIX timestamp value.
    ///
    /// Timestamp value must be greater or equal to `0x1DCD6500`, otherwise
    /// `None` is returned.
    #[inline]
    pub const fn from_unix_timestamp(timestamp: u32) -> Option<Self> {
        if timestamp < LOCKTIME_THRESHOLD {
            None
        } else {
            Some(Self(timestamp))
        }
    }

    /// Converts into full u32 representation of `nLockTime` value as it is
    /// serialized in bitcoin transaction.
    #[inline]
    pub const fn from_consensus_u32(lock_time: u32) -> Self { LockTime(lock_time) }

    #[inline]
    pub const fn to_consensus_u32(&self) -> u32 { self.0 }

    #[inline]
    pub const fn into_consensus_u32(self) -> u32 { self.0 }

    /// Checks if the absolute timelock provided by the `nLockTime` value
    /// specifies height-based lock
    #[inline]
    pub const fn is_height_based(self) -> bool { self.0 < LOCKTIME_THRESHOLD }

    /// Checks if the absolute timelock provided by the `nLockTime` value
    /// specifies time-based lock
    #[inline]
    pub const fn is_time_based(self) -> bool { !self.is_height_based() }

    /// Checks whether a lock requirement of `other` is satisfied by this
    /// transaction-level value: both must use the same units and the
    /// requirement must not exceed the transaction value.
    #[inline]
    pub const fn satisfies(self, other: LockTime) -> bool {
        self.is_height_based() == other.is_height_based() && other.0 <= self.0
    }
}

/// Transaction input `nSequence` value, read by `OP_CHECKSEQUENCEVERIFY`
/// under the BIP68 relative-locktime interpretation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_BITAUTH)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct SeqNo(u32);

impl SeqNo {
    /// Bit flag disabling the relative-locktime meaning of a sequence value.
    pub const DISABLE_FLAG: u32 = 1 << 31;
    /// Bit flag switching the relative-locktime units from blocks to
    /// 512-second intervals.
    pub const TYPE_FLAG: u32 = 1 << 22;
    /// Mask extracting the relative-locktime value.
    pub const VALUE_MASK: u32 = 0xFFFF;
    /// The final sequence number, which also opts the input out of absolute
    /// locktime enforcement.
    pub const FINAL: Self = SeqNo(0xFFFFFFFF);

    #[inline]
    pub const fn from_consensus_u32(seq_no: u32) -> Self { SeqNo(seq_no) }

    #[inline]
    pub const fn to_consensus_u32(&self) -> u32 { self.0 }

    /// Detects whether relative locktime is disabled for this input.
    #[inline]
    pub const fn is_relative_disabled(self) -> bool { self.0 & Self::DISABLE_FLAG != 0 }

    /// Detects whether the input is final, which disables absolute locktime
    /// enforcement for the transaction.
    #[inline]
    pub const fn is_final(self) -> bool { self.0 == Self::FINAL.0 }

    /// Checks whether a relative lock requirement encoded in `other` (in
    /// sequence format) is satisfied by this input-level value: same units,
    /// requirement not exceeding the input value.
    pub const fn satisfies(self, other: SeqNo) -> bool {
        if self.is_relative_disabled() {
            return false;
        }
        self.0 & Self::TYPE_FLAG == other.0 & Self::TYPE_FLAG &&
            other.0 & Self::VALUE_MASK <= self.0 & Self::VALUE_MASK
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn locktime_units() {
        assert!(LockTime::from_height(100).unwrap().is_height_based());
        assert!(LockTime::from_height(LOCKTIME_THRESHOLD).is_none());
        assert!(LockTime::from_unix_timestamp(1_600_000_000).unwrap().is_time_based());
        assert!(LockTime::from_unix_timestamp(100).is_none());
    }

    #[test]
    fn locktime_satisfaction() {
        let tx_lock = LockTime::from_consensus_u32(600_000);
        assert!(tx_lock.satisfies(LockTime::from_consensus_u32(599_999)));
        assert!(tx_lock.satisfies(LockTime::from_consensus_u32(600_000)));
        assert!(!tx_lock.satisfies(LockTime::from_consensus_u32(600_001)));
        // Mismatched units never satisfy.
        assert!(!tx_lock.satisfies(LockTime::from_consensus_u32(1_600_000_000)));
    }

    #[test]
    fn sequence_satisfaction() {
        let input = SeqNo::from_consensus_u32(10);
        assert!(input.satisfies(SeqNo::from_consensus_u32(5)));
        assert!(input.satisfies(SeqNo::from_consensus_u32(10)));
        assert!(!input.satisfies(SeqNo::from_consensus_u32(11)));
        // Unit mismatch: time-based requirement against block-based input.
        assert!(!input.satisfies(SeqNo::from_consensus_u32(SeqNo::TYPE_FLAG | 5)));
        // Disabled input never satisfies.
        assert!(!SeqNo::from_consensus_u32(SeqNo::DISABLE_FLAG | 10)
            .satisfies(SeqNo::from_consensus_u32(5)));
        assert!(SeqNo::FINAL.is_final());
    }
}
