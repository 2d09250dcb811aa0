// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use crate::field::ScalarField;
use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest amount of a staking bid.
pub const V_MIN: u64 = 50_000;
/// Largest amount of a staking bid.
pub const V_MAX: u64 = 250_000;

/// How the bid commitment relates to the public bid list.
///
/// In both rules the whole list, in order, is bound into the proof
/// challenge: a proof never verifies against a different list.
///
/// The commitment `Z` is published next to the proof, so whoever holds the
/// list can locate the bidder's entry with or without the proof. The proof
/// adds no information about the position: its encoding depends on neither
/// the position nor the length of the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MembershipRule {
    /// The list must be non-empty and contain the bid commitment.
    #[default]
    Inclusion,
    /// The list is only echoed back and may be empty, as in single-bidder
    /// rounds. Comparing it against the round list is left to the caller.
    EchoOnly,
}

impl MembershipRule {
    pub const fn tag(self) -> u8 {
        match self {
            Self::Inclusion => 0,
            Self::EchoOnly => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, Error> {
        match tag {
            0 => Ok(Self::Inclusion),
            1 => Ok(Self::EchoOnly),
            _ => Err(Error::UnknownMembership(tag)),
        }
    }

    /// Checks `commitment` against `public_list` under this rule.
    pub fn check<F: ScalarField>(
        self,
        commitment: &F,
        public_list: &[F],
    ) -> Result<(), Error> {
        match self {
            Self::EchoOnly => Ok(()),
            Self::Inclusion if public_list.is_empty() => {
                Err(Error::EmptyBidList)
            }
            Self::Inclusion if !public_list.contains(commitment) => {
                Err(Error::CommitmentNotListed)
            }
            Self::Inclusion => Ok(()),
        }
    }
}

/// Inclusive bounds on the amount of a bid.
///
/// The proof shows `amount - min` and `max - amount` are both sums of
/// [`AmountRange::bits`] bits, without revealing the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Bounds", into = "Bounds"))]
pub struct AmountRange {
    min: u64,
    max: u64,
}

impl Default for AmountRange {
    fn default() -> Self {
        Self {
            min: 1,
            max: u32::MAX as u64,
        }
    }
}

impl AmountRange {
    /// Amounts of staking bids, `[V_MIN, V_MAX]`.
    pub const STAKE: Self = Self {
        min: V_MIN,
        max: V_MAX,
    };

    pub fn new(min: u64, max: u64) -> Result<Self, Error> {
        if min > max {
            return Err(Error::InvalidAmountRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Number of bits needed for `max - min`.
    pub fn bits(&self) -> usize {
        (u64::BITS - (self.max - self.min).leading_zeros()) as usize
    }

    /// The integer value of `amount`, if it lies within the range.
    pub fn check<F: ScalarField>(&self, amount: &F) -> Result<u64, Error> {
        match amount.to_u64() {
            Some(value) if (self.min..=self.max).contains(&value) => Ok(value),
            _ => Err(Error::AmountOutOfRange {
                min: self.min,
                max: self.max,
            }),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct Bounds {
    min: u64,
    max: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<Bounds> for AmountRange {
    type Error = Error;

    fn try_from(bounds: Bounds) -> Result<Self, Error> {
        Self::new(bounds.min, bounds.max)
    }
}

#[cfg(feature = "serde")]
impl From<AmountRange> for Bounds {
    fn from(range: AmountRange) -> Self {
        Self {
            min: range.min,
            max: range.max,
        }
    }
}

/// Protocol parameters shared by the prover and the verifier of a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    #[cfg_attr(feature = "serde", serde(default))]
    pub membership: MembershipRule,
    #[cfg_attr(feature = "serde", serde(default))]
    pub amounts: AmountRange,
}

impl Config {
    /// Parameters for `membership` with the default [`AmountRange`].
    pub fn new(membership: MembershipRule) -> Self {
        Self {
            membership,
            amounts: AmountRange::default(),
        }
    }

    pub fn with_amounts(self, amounts: AmountRange) -> Self {
        Self { amounts, ..self }
    }
}
