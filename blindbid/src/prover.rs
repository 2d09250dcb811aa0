// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use core::marker::PhantomData;

use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::bid::Bid;
use crate::commitment::{commitment_of, commitment_point};
use crate::config::Config;
use crate::field::ScalarField;
use crate::group::Group;
use crate::proof::Proof;
use crate::range::{decompose, weighted_scalar_sum, BitProof, BitProver};
use crate::score::{
    compose, tiebreak, weight_offsets, Division, Weight, WEIGHT_BITS,
};
use crate::transcript::{
    BitMessages, Messages, Statement, WeightBitMessages,
};
use crate::weight::WeightBitProver;
use crate::Error;

/// Everything a bidder publishes for a round.
#[derive(Debug, Clone, PartialEq)]
pub struct ProverOutput<G: Group> {
    /// Encoded [`Proof`].
    pub proof: Vec<u8>,
    /// Score `Q` of the bid.
    pub score: G::Scalar,
    /// Public commitment `Z` of the bid.
    pub commitment: G::Scalar,
    /// The public bid list, echoed back unchanged.
    pub public_list: Vec<G::Scalar>,
}

/// Builds proofs of blind bid.
#[derive(Debug, Clone, Copy)]
pub struct BlindBidProver<G> {
    config: Config,
    _group: PhantomData<G>,
}

impl<G: Group> Default for BlindBidProver<G> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<G: Group> BlindBidProver<G> {
    /// A prover for rounds run under `config`.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            _group: PhantomData,
        }
    }

    /// Parameters every proof of this prover is bound to.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Computes the score of `bid` for the round `seed` and proves it
    /// against `public_list`.
    ///
    /// Fails with an [`ErrorKind::InputShape`] error when the list does not
    /// satisfy the configured membership rule or the amount is out of range,
    /// and with an [`ErrorKind::ProofConstruction`] error when the bid is
    /// degenerate or entropy is unavailable. Nothing is returned on failure.
    ///
    /// [`ErrorKind::InputShape`]: crate::ErrorKind::InputShape
    /// [`ErrorKind::ProofConstruction`]: crate::ErrorKind::ProofConstruction
    pub fn prove<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        bid: &Bid<G::Scalar>,
        seed: G::Scalar,
        public_list: Vec<G::Scalar>,
    ) -> Result<ProverOutput<G>, Error> {
        let Config {
            membership,
            amounts,
        } = self.config;
        let (amount, nonce) = (bid.amount(), bid.nonce());
        let (g, h) = (G::generator(), G::blinding_generator());

        let c_point = commitment_point::<G>(amount, nonce);
        let commitment = commitment_of(&c_point);
        membership.check(&commitment, &public_list)?;

        if c_point == G::identity() {
            return Err(Error::Degenerate("bid commitment"));
        }
        let value = amounts.check(amount)?;

        let weight = Weight::derive(nonce, &seed)?;
        let division = Division::of(value, &weight);
        let score = compose(division.level, tiebreak(&seed, &commitment));

        let kappa = G::Scalar::random(rng)?;
        let k_point = G::combine(nonce, &g, &kappa, &h);
        if k_point == G::identity() {
            return Err(Error::Degenerate("nonce commitment"));
        }

        let non_residue = G::Scalar::non_residue();
        let weight_bits = weight_offsets(&seed)
            .iter()
            .map(|offset| {
                WeightBitProver::new(
                    rng,
                    &(*nonce + *offset),
                    &kappa,
                    k_point + g.scale(offset),
                    &non_residue,
                )
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let gap = weight.value() - 1 - division.remainder;
        let remainder_bits =
            decompose::<G, _>(rng, division.remainder, WEIGHT_BITS)?;
        let gap_bits = decompose::<G, _>(rng, gap, WEIGHT_BITS)?;
        let lower_bits =
            decompose::<G, _>(rng, value - amounts.min(), amounts.bits())?;
        let upper_bits =
            decompose::<G, _>(rng, amounts.max() - value, amounts.bits())?;

        // Logarithms relative to H of the link targets.
        let eta = weighted_scalar_sum(weight_bits.iter().map(|b| b.blinding()));
        let rho = blinding(&remainder_bits);
        let level = G::Scalar::from_u128(division.level);
        let shift = G::Scalar::from_u64(1 << WEIGHT_BITS);
        let witnesses = [
            shift * *nonce - level * eta - rho,
            eta - rho - blinding(&gap_bits),
            *nonce - blinding(&lower_bits),
            -*nonce - blinding(&upper_bits),
        ];

        let opening_nonces = [
            G::Scalar::random(rng)?,
            G::Scalar::random(rng)?,
            G::Scalar::random(rng)?,
        ];
        let link_nonces = [
            G::Scalar::random(rng)?,
            G::Scalar::random(rng)?,
            G::Scalar::random(rng)?,
            G::Scalar::random(rng)?,
        ];
        let [a_amount, a_nonce, a_kappa] = &opening_nonces;

        let messages = Messages {
            commitment_point: c_point,
            nonce_point: k_point,
            opening: [
                G::combine(a_amount, &g, a_nonce, &h),
                G::combine(a_nonce, &g, a_kappa, &h),
            ],
            weight: weight_bits
                .iter()
                .map(|b| WeightBitMessages {
                    commitment: *b.commitment(),
                    root_commitment: *b.root_commitment(),
                    first: *b.first_messages(),
                })
                .collect(),
            remainder: bit_messages(&remainder_bits),
            gap: bit_messages(&gap_bits),
            lower: bit_messages(&lower_bits),
            upper: bit_messages(&upper_bits),
            links: link_nonces.map(|a| h.scale(&a)),
        };

        let statement = Statement {
            membership,
            amounts,
            seed: &seed,
            public_list: &public_list,
            commitment: &commitment,
            score: &score,
        };
        let challenge = statement.challenge(&messages);
        if challenge == G::Scalar::zero() {
            return Err(Error::Degenerate("challenge"));
        }

        let secrets = [*amount, *nonce, kappa];
        let proof = Proof {
            membership,
            commitment_point: c_point,
            nonce_point: k_point,
            challenge,
            opening: [0, 1, 2]
                .map(|i| opening_nonces[i] + challenge * secrets[i]),
            weight: weight_bits.iter().map(|b| b.respond(&challenge)).collect(),
            remainder: respond(&remainder_bits, &challenge),
            gap: respond(&gap_bits, &challenge),
            lower: respond(&lower_bits, &challenge),
            upper: respond(&upper_bits, &challenge),
            links: [0, 1, 2, 3]
                .map(|i| link_nonces[i] + challenge * witnesses[i]),
        };

        debug!(
            event = "blind bid proven",
            ?membership,
            list_len = public_list.len(),
            amount_bits = amounts.bits(),
        );

        Ok(ProverOutput {
            proof: proof.to_bytes(),
            score,
            commitment,
            public_list,
        })
    }
}

/// `Σ 2^j·β_j`, the blinding of the value the bits commit to.
fn blinding<G: Group>(bits: &[BitProver<G>]) -> G::Scalar {
    weighted_scalar_sum(bits.iter().map(|b| b.blinding()))
}

fn respond<G: Group>(
    bits: &[BitProver<G>],
    challenge: &G::Scalar,
) -> Vec<BitProof<G>> {
    bits.iter().map(|b| b.respond(challenge)).collect()
}

fn bit_messages<G: Group>(bits: &[BitProver<G>]) -> Vec<BitMessages<G>> {
    bits.iter()
        .map(|b| BitMessages {
            commitment: *b.commitment(),
            first: *b.first_messages(),
        })
        .collect()
}
