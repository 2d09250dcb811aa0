// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Range proofs by bit decomposition.
//!
//! A value `v < 2^n` is committed bit by bit as `B_j = b_j·G + β_j·H`. Each
//! `B_j` carries an OR proof that it opens to either zero or one: the branch
//! of the actual bit is a Schnorr proof of `β_j` relative to `H`, the other
//! branch is simulated. The two branch challenges sum up to the challenge of
//! the whole proof.
//!
//! `Σ 2^j·B_j` is then a commitment to `v` with blinding `Σ 2^j·β_j`.

use rand::{CryptoRng, RngCore};

use crate::field::{ScalarField, SCALAR_SIZE};
use crate::group::{Group, POINT_SIZE};
use crate::Error;

/// Size in bytes of an encoded [`BitProof`].
pub const BIT_PROOF_SIZE: usize = POINT_SIZE + 3 * SCALAR_SIZE;

/// Proof that `commitment` opens to either zero or one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitProof<G: Group> {
    pub(crate) commitment: G,
    /// Challenge of the zero branch.
    pub(crate) challenge: G::Scalar,
    pub(crate) responses: [G::Scalar; 2],
}

impl<G: Group> BitProof<G> {
    pub fn commitment(&self) -> &G {
        &self.commitment
    }

    /// The first messages `(T_0, T_1)` of both branches, as implied by the
    /// responses under the proof `challenge`.
    pub(crate) fn first_messages(&self, challenge: &G::Scalar) -> [G; 2] {
        let challenges = [self.challenge, *challenge - self.challenge];
        let targets = targets(&self.commitment);

        [0, 1].map(|branch| {
            G::blinding_generator().scale(&self.responses[branch])
                - targets[branch].scale(&challenges[branch])
        })
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.commitment.encode());
        buf.extend_from_slice(&self.challenge.encode());
        for response in &self.responses {
            buf.extend_from_slice(&response.encode());
        }
    }
}

/// `B` and `B - G`, the points each branch proves a logarithm of.
fn targets<G: Group>(commitment: &G) -> [G; 2] {
    [*commitment, *commitment - G::generator()]
}

/// Prover side of a [`BitProof`], between its first message and the
/// challenge.
pub(crate) struct BitProver<G: Group> {
    bit: bool,
    blinding: G::Scalar,
    commitment: G,
    nonce: G::Scalar,
    simulated_challenge: G::Scalar,
    simulated_response: G::Scalar,
    first_messages: [G; 2],
}

impl<G: Group> BitProver<G> {
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        bit: bool,
    ) -> Result<Self, Error> {
        let h = G::blinding_generator();

        let blinding = G::Scalar::random(rng)?;
        let commitment = match bit {
            true => G::generator() + h.scale(&blinding),
            false => h.scale(&blinding),
        };

        let nonce = G::Scalar::random(rng)?;
        let simulated_challenge = G::Scalar::random(rng)?;
        let simulated_response = G::Scalar::random(rng)?;

        let (real, fake) = branches(bit);
        let mut first_messages = [G::identity(); 2];
        first_messages[real] = h.scale(&nonce);
        first_messages[fake] = h.scale(&simulated_response)
            - targets(&commitment)[fake].scale(&simulated_challenge);

        Ok(Self {
            bit,
            blinding,
            commitment,
            nonce,
            simulated_challenge,
            simulated_response,
            first_messages,
        })
    }

    pub fn commitment(&self) -> &G {
        &self.commitment
    }

    pub fn blinding(&self) -> &G::Scalar {
        &self.blinding
    }

    pub fn first_messages(&self) -> &[G; 2] {
        &self.first_messages
    }

    pub fn respond(&self, challenge: &G::Scalar) -> BitProof<G> {
        let (real, fake) = branches(self.bit);

        let mut challenges = [G::Scalar::zero(); 2];
        challenges[fake] = self.simulated_challenge;
        challenges[real] = *challenge - self.simulated_challenge;

        let mut responses = [G::Scalar::zero(); 2];
        responses[fake] = self.simulated_response;
        responses[real] = self.nonce + challenges[real] * self.blinding;

        BitProof {
            commitment: self.commitment,
            challenge: challenges[0],
            responses,
        }
    }
}

/// Indices of the proven and of the simulated branch.
fn branches(bit: bool) -> (usize, usize) {
    match bit {
        true => (1, 0),
        false => (0, 1),
    }
}

/// Bit provers for the `bits` lowest bits of `value`, least significant
/// first.
pub(crate) fn decompose<G: Group, R: RngCore + CryptoRng>(
    rng: &mut R,
    value: u64,
    bits: usize,
) -> Result<Vec<BitProver<G>>, Error> {
    (0..bits)
        .map(|j| BitProver::new(rng, (value >> j) & 1 == 1))
        .collect()
}

/// `Σ 2^j·P_j` over points given least significant first.
pub fn weighted_sum<'a, G: Group>(
    points: impl DoubleEndedIterator<Item = &'a G>,
) -> G {
    points.rev().fold(G::identity(), |acc, p| acc + acc + *p)
}

/// `Σ 2^j·s_j` over scalars given least significant first.
pub fn weighted_scalar_sum<'a, F: ScalarField>(
    scalars: impl DoubleEndedIterator<Item = &'a F>,
) -> F {
    scalars.rev().fold(F::zero(), |acc, s| acc + acc + *s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dusk_jubjub::{JubJubExtended, JubJubScalar};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Point = JubJubExtended;

    fn g() -> Point {
        <Point as Group>::generator()
    }

    fn h() -> Point {
        <Point as Group>::blinding_generator()
    }

    #[test]
    fn bit_proofs_recompute_their_first_messages() {
        let rng = &mut StdRng::seed_from_u64(0xbeef);
        let challenge = JubJubScalar::from(0xc0ffeeu64);

        for bit in [false, true] {
            let prover = BitProver::<Point>::new(rng, bit).unwrap();
            let proof = prover.respond(&challenge);

            assert_eq!(
                proof.first_messages(&challenge),
                *prover.first_messages()
            );
            let other = challenge + JubJubScalar::from(1u64);
            assert_ne!(proof.first_messages(&other), *prover.first_messages());
        }
    }

    #[test]
    fn commitments_open_to_the_bit() {
        let rng = &mut StdRng::seed_from_u64(0xbeef);

        for bit in [false, true] {
            let prover = BitProver::<Point>::new(rng, bit).unwrap();
            let opening = match bit {
                true => g() + h() * *prover.blinding(),
                false => h() * *prover.blinding(),
            };
            assert_eq!(*prover.commitment(), opening);
        }
    }

    #[test]
    fn non_bits_cannot_be_proven() {
        let rng = &mut StdRng::seed_from_u64(0xbeef);
        let challenge = JubJubScalar::from(99u64);

        // Claiming a commitment to two with the blinding of a real bit.
        let prover = BitProver::<Point>::new(rng, true).unwrap();
        let mut proof = prover.respond(&challenge);
        proof.commitment = proof.commitment + g();

        assert_ne!(proof.first_messages(&challenge), *prover.first_messages());
    }

    #[test]
    fn decomposition_commits_to_the_value() {
        let rng = &mut StdRng::seed_from_u64(0xbeef);
        let value = 0b1011_0110u64;

        let provers = decompose::<Point, _>(rng, value, 10).unwrap();
        assert_eq!(provers.len(), 10);

        let sum = weighted_sum(provers.iter().map(|p| p.commitment()));
        let blinding =
            weighted_scalar_sum(provers.iter().map(|p| p.blinding()));
        assert_eq!(
            sum,
            g() * JubJubScalar::from(value) + h() * blinding
        );
    }

    #[test]
    fn weighted_sums() {
        let scalars: Vec<JubJubScalar> =
            [3u64, 0, 5].iter().map(|n| JubJubScalar::from(*n)).collect();
        assert_eq!(
            weighted_scalar_sum(scalars.iter()),
            JubJubScalar::from(3 + 5 * 4u64)
        );

        let points = [g(), h(), g()];
        assert_eq!(
            weighted_sum(points.iter()),
            g() * JubJubScalar::from(5u64) + h() * JubJubScalar::from(2u64)
        );
        assert_eq!(
            weighted_sum::<Point>([].iter()),
            <Point as Group>::identity()
        );
    }
}
