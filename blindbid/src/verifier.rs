// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use core::marker::PhantomData;

use thiserror::Error;
use tracing::debug;

use crate::commitment::commitment_of;
use crate::config::Config;
use crate::field::{ScalarField, SCALAR_SIZE};
use crate::group::Group;
use crate::proof::Proof;
use crate::prover::ProverOutput;
use crate::range::BitProof;
use crate::score::{split, tiebreak, weight_offsets};
use crate::transcript::{
    BitCommitments, BitMessages, Messages, Statement, WeightBitMessages,
};

/// Reasons a proof is rejected. Only ever logged, callers get `false`.
#[derive(Debug, Error)]
enum Rejection {
    #[error("malformed input: {0}")]
    Malformed(#[from] crate::Error),
    #[error("proof built under {found:?}, expected {expected:?}")]
    Membership {
        expected: crate::MembershipRule,
        found: crate::MembershipRule,
    },
    #[error("proof covers {found} amount bits, expected {expected}")]
    AmountBits { expected: usize, found: usize },
    #[error("commitment does not open to the proven point")]
    Commitment,
    #[error("score tie-break does not match the commitment")]
    Score,
    #[error("challenge mismatch")]
    Challenge,
}

/// Verifies proofs of blind bid.
#[derive(Debug, Clone, Copy)]
pub struct BlindBidVerifier<G> {
    config: Config,
    _group: PhantomData<G>,
}

impl<G: Group> Default for BlindBidVerifier<G> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<G: Group> BlindBidVerifier<G> {
    /// A verifier accepting only proofs built under `config`.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            _group: PhantomData,
        }
    }

    /// Parameters every accepted proof must be bound to.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks that `proof` establishes `score` as the score of the bid
    /// committed to by `commitment`, for the round `seed` and its
    /// `public_list`.
    ///
    /// Malformed input of any kind is a rejection, never an error.
    pub fn verify(
        &self,
        proof: &[u8],
        seed: &[u8; SCALAR_SIZE],
        public_list: &[G::Scalar],
        score: &[u8; SCALAR_SIZE],
        commitment: &[u8; SCALAR_SIZE],
    ) -> bool {
        match self.check(proof, seed, public_list, score, commitment) {
            Ok(()) => true,
            Err(rejection) => {
                debug!(event = "blind bid rejected", reason = %rejection);
                false
            }
        }
    }

    /// Verifies a [`ProverOutput`] for the round `seed`.
    pub fn verify_output(
        &self,
        output: &ProverOutput<G>,
        seed: &G::Scalar,
    ) -> bool {
        self.verify(
            &output.proof,
            &seed.encode(),
            &output.public_list,
            &output.score.encode(),
            &output.commitment.encode(),
        )
    }

    fn check(
        &self,
        proof: &[u8],
        seed: &[u8; SCALAR_SIZE],
        public_list: &[G::Scalar],
        score: &[u8; SCALAR_SIZE],
        commitment: &[u8; SCALAR_SIZE],
    ) -> Result<(), Rejection> {
        let proof = Proof::<G>::from_slice(proof)?;
        let seed = G::Scalar::decode(seed)?;
        let score = G::Scalar::decode(score)?;
        let commitment = G::Scalar::decode(commitment)?;

        let Config {
            membership,
            amounts,
        } = self.config;
        if proof.membership != membership {
            return Err(Rejection::Membership {
                expected: membership,
                found: proof.membership,
            });
        }
        if proof.amount_bits() != amounts.bits() {
            return Err(Rejection::AmountBits {
                expected: amounts.bits(),
                found: proof.amount_bits(),
            });
        }
        membership.check(&commitment, public_list)?;

        if commitment_of(&proof.commitment_point) != commitment {
            return Err(Rejection::Commitment);
        }
        let (level, tie) = split(&score);
        if tie != tiebreak(&seed, &commitment) {
            return Err(Rejection::Score);
        }

        let (g, h) = (G::generator(), G::blinding_generator());
        let c = proof.challenge;
        let (c_point, k_point) = (proof.commitment_point, proof.nonce_point);
        let [z_amount, z_nonce, z_kappa] = &proof.opening;

        let non_residue = G::Scalar::non_residue();
        let weight = proof
            .weight
            .iter()
            .zip(weight_offsets(&seed))
            .map(|(bit, offset)| WeightBitMessages {
                commitment: bit.commitment,
                root_commitment: bit.root_commitment,
                first: bit.first_messages(
                    k_point + g.scale(&offset),
                    &non_residue,
                    &c,
                ),
            })
            .collect();

        let weight_points: Vec<G> =
            proof.weight.iter().map(|b| b.commitment).collect();
        let remainder = commitments(&proof.remainder);
        let gap = commitments(&proof.gap);
        let lower = commitments(&proof.lower);
        let upper = commitments(&proof.upper);
        let targets = BitCommitments {
            weight: &weight_points,
            remainder: &remainder,
            gap: &gap,
            lower: &lower,
            upper: &upper,
        }
        .link_targets(&c_point, level, &amounts);

        let messages = Messages {
            commitment_point: c_point,
            nonce_point: k_point,
            opening: [
                G::combine(z_amount, &g, z_nonce, &h) - c_point.scale(&c),
                G::combine(z_nonce, &g, z_kappa, &h) - k_point.scale(&c),
            ],
            weight,
            remainder: bit_messages(&proof.remainder, &c),
            gap: bit_messages(&proof.gap, &c),
            lower: bit_messages(&proof.lower, &c),
            upper: bit_messages(&proof.upper, &c),
            links: [0, 1, 2, 3].map(|i| {
                h.scale(&proof.links[i]) - targets[i].scale(&c)
            }),
        };

        let statement = Statement {
            membership,
            amounts,
            seed: &seed,
            public_list,
            commitment: &commitment,
            score: &score,
        };

        if statement.challenge(&messages) != c {
            return Err(Rejection::Challenge);
        }
        Ok(())
    }
}

fn commitments<G: Group>(bits: &[BitProof<G>]) -> Vec<G> {
    bits.iter().map(|b| b.commitment).collect()
}

fn bit_messages<G: Group>(
    bits: &[BitProof<G>],
    challenge: &G::Scalar,
) -> Vec<BitMessages<G>> {
    bits.iter()
        .map(|b| BitMessages {
            commitment: b.commitment,
            first: b.first_messages(challenge),
        })
        .collect()
}
