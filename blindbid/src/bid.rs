// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use core::fmt;

use rand::{CryptoRng, RngCore};

use crate::field::ScalarField;
use crate::group::Group;
use crate::{commitment, score, Error};

/// The secret side of a blind bid: the amount and the nonce blinding it.
///
/// A bid is owned by its bidder only and is never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Bid<F> {
    amount: F,
    nonce: F,
}

impl<F: ScalarField> Bid<F> {
    /// Bid of `amount` blinded by `nonce`.
    pub fn new(amount: F, nonce: F) -> Self {
        Self { amount, nonce }
    }

    /// Bid of `amount` blinded by a fresh random nonce.
    pub fn random<R: RngCore + CryptoRng>(
        rng: &mut R,
        amount: F,
    ) -> Result<Self, Error> {
        Ok(Self::new(amount, F::random(rng)?))
    }

    /// The secret amount `d`.
    pub fn amount(&self) -> &F {
        &self.amount
    }

    /// The secret nonce `k`.
    pub fn nonce(&self) -> &F {
        &self.nonce
    }

    /// Public commitment of the bid.
    pub fn commitment<G: Group<Scalar = F>>(&self) -> F {
        commitment::commit::<G>(&self.amount, &self.nonce)
    }

    /// Score of the bid for the round `seed`.
    pub fn score<G: Group<Scalar = F>>(&self, seed: &F) -> Result<F, Error> {
        score::score::<G>(&self.amount, &self.nonce, seed)
    }
}

impl<F> fmt::Debug for Bid<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bid").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dusk_jubjub::{JubJubExtended, JubJubScalar};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn debug_is_redacted() {
        let bid = Bid::new(
            JubJubScalar::from(123_456u64),
            JubJubScalar::from(42u64),
        );
        assert_eq!(format!("{bid:?}"), "Bid { .. }");
    }

    #[test]
    fn random_nonces_hide_equal_amounts() {
        let rng = &mut StdRng::seed_from_u64(0xbeef);
        let amount = JubJubScalar::from(100_000u64);

        let a = Bid::random(rng, amount).unwrap();
        let b = Bid::random(rng, amount).unwrap();

        assert_eq!(a.amount(), b.amount());
        assert_ne!(a.nonce(), b.nonce());
        assert_ne!(
            a.commitment::<JubJubExtended>(),
            b.commitment::<JubJubExtended>()
        );
    }
}
