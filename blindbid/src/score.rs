// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Score of a bid for a given round seed.
//!
//! Every seed draws a secret weight `y` for the bid: a 32 bit integer whose
//! bit `i` is set iff `nonce + s_i` is a square, with `s_i` hashed from the
//! seed. The score is the integer
//!
//! ```text
//! Q = ⌊amount·2^32 / y⌋·2^128 + t
//! ```
//!
//! where the tie-break `t` is the low 128 bits of a hash of the seed and the
//! bid commitment `Z`. Scores compare as integers: the level
//! `⌊amount·2^32 / y⌋` grows linearly with the amount, while `y` is known
//! to the bidder only and changes with every seed.

use crate::commitment::commit;
use crate::field::{ScalarField, SCALAR_SIZE};
use crate::group::Group;
use crate::hash::Hasher;
use crate::Error;

/// Number of bits of the score weight.
pub const WEIGHT_BITS: usize = 32;

const TIE_SIZE: usize = 16;

const WEIGHT_DOMAIN: &[u8] = b"dusk-blindbid:score-weight";
const TIE_DOMAIN: &[u8] = b"dusk-blindbid:score-tie";

/// Public offsets `s_i` of the weight bits for the round `seed`.
pub fn weight_offsets<F: ScalarField>(seed: &F) -> Vec<F> {
    let seed = seed.encode();
    (0..WEIGHT_BITS as u64)
        .map(|i| Hasher::digest(WEIGHT_DOMAIN, &[&seed, &i.to_le_bytes()]))
        .collect()
}

/// Secret weight `y` of a bid for a round. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weight {
    bits: [bool; WEIGHT_BITS],
}

impl Weight {
    pub fn derive<F: ScalarField>(nonce: &F, seed: &F) -> Result<Self, Error> {
        let mut bits = [false; WEIGHT_BITS];

        for (bit, offset) in bits.iter_mut().zip(weight_offsets(seed)) {
            let input = *nonce + offset;
            if input == F::zero() {
                return Err(Error::Degenerate("score weight input"));
            }
            *bit = input.is_square();
        }

        let weight = Self { bits };
        if weight.value() == 0 {
            return Err(Error::Degenerate("score weight"));
        }
        Ok(weight)
    }

    /// Bits of the weight, least significant first.
    pub fn bits(&self) -> &[bool; WEIGHT_BITS] {
        &self.bits
    }

    pub fn value(&self) -> u64 {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit)
            .map(|(i, _)| 1u64 << i)
            .sum()
    }
}

/// `amount·2^32 = level·y + remainder` with `remainder < y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Division {
    pub level: u128,
    pub remainder: u64,
}

impl Division {
    pub fn of(amount: u64, weight: &Weight) -> Self {
        let dividend = u128::from(amount) << WEIGHT_BITS;
        let divisor = u128::from(weight.value());

        Self {
            level: dividend / divisor,
            remainder: (dividend % divisor) as u64,
        }
    }
}

/// Tie-break `t` of the bid committed to by `commitment` for the round
/// `seed`.
pub fn tiebreak<F: ScalarField>(seed: &F, commitment: &F) -> u128 {
    let digest = Hasher::new(TIE_DOMAIN)
        .chain_update(seed.encode())
        .chain_update(commitment.encode())
        .finalize_wide();

    let mut bytes = [0u8; TIE_SIZE];
    bytes.copy_from_slice(&digest[..TIE_SIZE]);
    u128::from_le_bytes(bytes)
}

/// `level·2^128 + tie`
pub fn compose<F: ScalarField>(level: u128, tie: u128) -> F {
    let shift = F::from_u128(1 << 64);
    F::from_u128(level) * shift * shift + F::from_u128(tie)
}

/// Splits a score into `(level, tie)`.
///
/// The pairs order lexicographically as their scores do as integers.
pub fn split<F: ScalarField>(score: &F) -> (u128, u128) {
    let bytes: [u8; SCALAR_SIZE] = score.encode();
    let mut tie = [0u8; TIE_SIZE];
    let mut level = [0u8; TIE_SIZE];
    tie.copy_from_slice(&bytes[..TIE_SIZE]);
    level.copy_from_slice(&bytes[TIE_SIZE..]);

    (u128::from_le_bytes(level), u128::from_le_bytes(tie))
}

/// Score `Q` of the bid `(amount, nonce)` for the round `seed`.
///
/// The amount must be an integer below `2^64`.
pub fn score<G: Group>(
    amount: &G::Scalar,
    nonce: &G::Scalar,
    seed: &G::Scalar,
) -> Result<G::Scalar, Error> {
    let value = amount.to_u64().ok_or(Error::AmountOutOfRange {
        min: 0,
        max: u64::MAX,
    })?;
    let weight = Weight::derive(nonce, seed)?;
    let division = Division::of(value, &weight);
    let tie = tiebreak(seed, &commit::<G>(amount, nonce));

    Ok(compose(division.level, tie))
}
