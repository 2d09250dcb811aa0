// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use crate::config::{AmountRange, MembershipRule};
use crate::field::ScalarField;
use crate::group::Group;
use crate::hash::Hasher;
use crate::proof::PROOF_VERSION;
use crate::range::weighted_sum;
use crate::score::WEIGHT_BITS;

const PROTOCOL_LABEL: &[u8] = b"dusk-blindbid:proof-of-blind-bid";

/// Fiat-Shamir transcript of a proof of blind bid.
pub(crate) struct Transcript {
    hasher: Hasher,
}

impl Transcript {
    pub fn new(label: &[u8]) -> Self {
        Self {
            hasher: Hasher::new(label),
        }
    }

    pub fn append_message(&mut self, label: &[u8], message: &[u8]) {
        self.hasher.update(label);
        self.hasher.update(message);
    }

    pub fn append_u64(&mut self, label: &[u8], n: u64) {
        self.append_message(label, &n.to_le_bytes());
    }

    pub fn append_scalar<F: ScalarField>(&mut self, label: &[u8], s: &F) {
        self.append_message(label, &s.encode());
    }

    pub fn append_point<G: Group>(&mut self, label: &[u8], p: &G) {
        self.append_message(label, &p.encode());
    }

    pub fn append_points<G: Group>(&mut self, label: &[u8], points: &[G]) {
        for p in points {
            self.append_point(label, p);
        }
    }

    pub fn append_scalars<F: ScalarField>(
        &mut self,
        label: &[u8],
        list: &[F],
    ) {
        self.append_u64(label, list.len() as u64);
        for s in list {
            self.append_scalar(b"entry", s);
        }
    }

    pub fn challenge_scalar<F: ScalarField>(mut self, label: &[u8]) -> F {
        self.hasher.update(label);
        self.hasher.finalize()
    }
}

/// Public inputs of a proof of blind bid.
pub(crate) struct Statement<'a, G: Group> {
    pub membership: MembershipRule,
    pub amounts: AmountRange,
    pub seed: &'a G::Scalar,
    pub public_list: &'a [G::Scalar],
    pub commitment: &'a G::Scalar,
    pub score: &'a G::Scalar,
}

/// Commitment and first messages of one bit proof.
pub(crate) struct BitMessages<G> {
    pub commitment: G,
    pub first: [G; 2],
}

/// Commitments and first messages of one weight bit proof.
pub(crate) struct WeightBitMessages<G> {
    pub commitment: G,
    pub root_commitment: G,
    pub first: [[G; 3]; 2],
}

/// Every point the prover sends before the challenge, in transcript order.
pub(crate) struct Messages<G> {
    /// `C = amount·G + nonce·H`
    pub commitment_point: G,
    /// `K = nonce·G + κ·H`
    pub nonce_point: G,
    pub opening: [G; 2],
    pub weight: Vec<WeightBitMessages<G>>,
    pub remainder: Vec<BitMessages<G>>,
    pub gap: Vec<BitMessages<G>>,
    pub lower: Vec<BitMessages<G>>,
    pub upper: Vec<BitMessages<G>>,
    pub links: [G; 4],
}

impl<G: Group> Statement<'_, G> {
    /// Challenge binding the statement to all of the prover's messages.
    pub fn challenge(&self, messages: &Messages<G>) -> G::Scalar {
        let mut transcript = Transcript::new(PROTOCOL_LABEL);

        transcript.append_message(b"version", &[PROOF_VERSION]);
        transcript.append_message(b"membership", &[self.membership.tag()]);
        transcript.append_u64(b"amount-min", self.amounts.min());
        transcript.append_u64(b"amount-max", self.amounts.max());
        transcript.append_scalar(b"seed", self.seed);
        transcript.append_scalars(b"public-list", self.public_list);
        transcript.append_scalar(b"commitment", self.commitment);
        transcript.append_scalar(b"score", self.score);

        transcript
            .append_point(b"commitment-point", &messages.commitment_point);
        transcript.append_point(b"nonce-point", &messages.nonce_point);
        transcript.append_points(b"t-opening", &messages.opening);

        for bit in &messages.weight {
            transcript.append_point(b"weight-bit", &bit.commitment);
            transcript.append_point(b"weight-root", &bit.root_commitment);
            for first in &bit.first {
                transcript.append_points(b"t-weight", first);
            }
        }

        for (label, bits) in [
            (&b"remainder"[..], &messages.remainder),
            (&b"gap"[..], &messages.gap),
            (&b"lower"[..], &messages.lower),
            (&b"upper"[..], &messages.upper),
        ] {
            transcript.append_u64(label, bits.len() as u64);
            for bit in bits {
                transcript.append_point(b"bit", &bit.commitment);
                transcript.append_points(b"t-bit", &bit.first);
            }
        }

        transcript.append_points(b"t-links", &messages.links);

        transcript.challenge_scalar(b"challenge")
    }
}

/// Bit commitments of every range in the proof, least significant first.
pub(crate) struct BitCommitments<'a, G> {
    pub weight: &'a [G],
    pub remainder: &'a [G],
    pub gap: &'a [G],
    pub lower: &'a [G],
    pub upper: &'a [G],
}

impl<G: Group> BitCommitments<'_, G> {
    /// The four points whose logarithms relative to `H` tie the committed
    /// values together:
    ///
    /// - `2^32·C - level·Y - R`, so `amount·2^32 = level·y + remainder`
    /// - `Y - R - G - D`, so `remainder + gap < y`
    /// - `C - min·G - E`, so `amount ≥ min`
    /// - `max·G - C - F`, so `amount ≤ max`
    ///
    /// where `Y, R, D, E, F` are the weighted sums of the bit commitments.
    pub fn link_targets(
        &self,
        commitment_point: &G,
        level: u128,
        amounts: &AmountRange,
    ) -> [G; 4] {
        let g = G::generator();
        let weight = weighted_sum(self.weight.iter());
        let remainder = weighted_sum(self.remainder.iter());
        let gap = weighted_sum(self.gap.iter());
        let lower = weighted_sum(self.lower.iter());
        let upper = weighted_sum(self.upper.iter());

        let shift = G::Scalar::from_u64(1 << WEIGHT_BITS);
        let level = G::Scalar::from_u128(level);
        let min = G::Scalar::from_u64(amounts.min());
        let max = G::Scalar::from_u64(amounts.max());

        [
            commitment_point.scale(&shift) - weight.scale(&level) - remainder,
            weight - remainder - g - gap,
            *commitment_point - g.scale(&min) - lower,
            g.scale(&max) - *commitment_point - upper,
        ]
    }
}
