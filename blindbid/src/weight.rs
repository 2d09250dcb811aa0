// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Proofs of the secret score weight.
//!
//! Bit `i` of the weight is one iff `a_i = nonce + s_i` is a square.
//! Given the commitment `A_i = a_i·G + κ·H`, the bit commitment
//! `B_i = b_i·G + β_i·H` and a commitment `W_i = w_i·G + ω_i·H` to a root,
//! the bidder proves one of
//!
//! - `b_i = 1`: `B_i - G = β_i·H` and `A_i = w_i·W_i + τ_i·H`
//! - `b_i = 0`: `B_i = β_i·H` and `ν·A_i = w_i·W_i + τ_i·H`
//!
//! each together with the opening of `W_i`, where `ν` is a fixed
//! non-residue. Both right hand sides commit to `w_i²`, so the first branch
//! holds only for squares and the second only for non-squares.

use rand::{CryptoRng, RngCore};

use crate::field::{ScalarField, SCALAR_SIZE};
use crate::group::{Group, POINT_SIZE};
use crate::Error;

/// Size in bytes of an encoded [`WeightBitProof`].
pub const WEIGHT_BIT_PROOF_SIZE: usize = 2 * POINT_SIZE + 9 * SCALAR_SIZE;

/// Witnesses `(β, w, ω, τ)` of one branch.
type Witness<F> = [F; 4];

/// Proof of one bit of the score weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightBitProof<G: Group> {
    pub(crate) commitment: G,
    pub(crate) root_commitment: G,
    /// Challenge of the non-residue branch.
    pub(crate) challenge: G::Scalar,
    pub(crate) responses: [Witness<G::Scalar>; 2],
}

/// Public points of a weight bit, shared by both branches.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WeightBitStatement<G: Group> {
    /// `A_i`
    pub input: G,
    /// `ν·A_i`
    pub scaled_input: G,
    /// `B_i`
    pub commitment: G,
    /// `W_i`
    pub root_commitment: G,
}

impl<G: Group> WeightBitStatement<G> {
    /// `input` is `A_i`, `non_residue` is `ν`.
    pub fn new(
        input: G,
        non_residue: &G::Scalar,
        commitment: G,
        root_commitment: G,
    ) -> Self {
        Self {
            input,
            scaled_input: input.scale(non_residue),
            commitment,
            root_commitment,
        }
    }

    /// The points the branch for `bit` proves representations of.
    fn targets(&self, bit: usize) -> [G; 3] {
        match bit {
            1 => [
                self.commitment - G::generator(),
                self.root_commitment,
                self.input,
            ],
            _ => [self.commitment, self.root_commitment, self.scaled_input],
        }
    }

    /// `(β·H, w·G + ω·H, w·W + τ·H)`
    fn image(&self, witness: &Witness<G::Scalar>) -> [G; 3] {
        let [beta, root, root_blinding, tau] = witness;
        let h = G::blinding_generator();

        [
            h.scale(beta),
            G::combine(root, &G::generator(), root_blinding, &h),
            G::combine(root, &self.root_commitment, tau, &h),
        ]
    }

    /// `image(z) - c·targets`, the first message of a branch.
    fn first_message(
        &self,
        bit: usize,
        response: &Witness<G::Scalar>,
        challenge: &G::Scalar,
    ) -> [G; 3] {
        let image = self.image(response);
        let targets = self.targets(bit);
        [0, 1, 2].map(|j| image[j] - targets[j].scale(challenge))
    }
}

impl<G: Group> WeightBitProof<G> {
    pub fn commitment(&self) -> &G {
        &self.commitment
    }

    pub fn root_commitment(&self) -> &G {
        &self.root_commitment
    }

    /// First messages of both branches as implied by the responses under the
    /// proof `challenge`, for the bit with the given public `input` `A_i`.
    pub(crate) fn first_messages(
        &self,
        input: G,
        non_residue: &G::Scalar,
        challenge: &G::Scalar,
    ) -> [[G; 3]; 2] {
        let statement = WeightBitStatement::new(
            input,
            non_residue,
            self.commitment,
            self.root_commitment,
        );
        let challenges = [self.challenge, *challenge - self.challenge];

        [0, 1].map(|bit| {
            statement.first_message(
                bit,
                &self.responses[bit],
                &challenges[bit],
            )
        })
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.commitment.encode());
        buf.extend_from_slice(&self.root_commitment.encode());
        buf.extend_from_slice(&self.challenge.encode());
        for response in self.responses.iter().flatten() {
            buf.extend_from_slice(&response.encode());
        }
    }
}

/// Prover side of a [`WeightBitProof`], between its first message and the
/// challenge.
pub(crate) struct WeightBitProver<G: Group> {
    bit: bool,
    statement: WeightBitStatement<G>,
    blinding: G::Scalar,
    witness: Witness<G::Scalar>,
    nonces: Witness<G::Scalar>,
    simulated_challenge: G::Scalar,
    simulated_response: Witness<G::Scalar>,
    first_messages: [[G; 3]; 2],
}

impl<G: Group> WeightBitProver<G> {
    /// Starts proving the weight bit of `input = a_i`, committed as `A_i`
    /// with blinding `input_blinding`.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        input: &G::Scalar,
        input_blinding: &G::Scalar,
        input_point: G,
        non_residue: &G::Scalar,
    ) -> Result<Self, Error> {
        let bit = input.is_square();
        let (square, blinding_factor) = match bit {
            true => (*input, G::Scalar::one()),
            false => (*non_residue * *input, *non_residue),
        };
        let root = square
            .square_root()
            .ok_or(Error::Degenerate("score weight root"))?;

        let h = G::blinding_generator();
        let beta = G::Scalar::random(rng)?;
        let root_blinding = G::Scalar::random(rng)?;

        let commitment = match bit {
            true => G::generator() + h.scale(&beta),
            false => h.scale(&beta),
        };
        let root_commitment =
            G::combine(&root, &G::generator(), &root_blinding, &h);
        let statement = WeightBitStatement::new(
            input_point,
            non_residue,
            commitment,
            root_commitment,
        );

        // A_i (or ν·A_i) = w·W + (κ' - w·ω)·H with κ' its blinding.
        let tau = blinding_factor * *input_blinding - root * root_blinding;
        let witness = [beta, root, root_blinding, tau];

        let nonces = random_witness(rng)?;
        let simulated_challenge = G::Scalar::random(rng)?;
        let simulated_response = random_witness(rng)?;

        let (real, fake) = (bit as usize, !bit as usize);
        let mut first_messages = [[G::identity(); 3]; 2];
        first_messages[real] = statement.image(&nonces);
        first_messages[fake] = statement.first_message(
            fake,
            &simulated_response,
            &simulated_challenge,
        );

        Ok(Self {
            bit,
            statement,
            blinding: beta,
            witness,
            nonces,
            simulated_challenge,
            simulated_response,
            first_messages,
        })
    }

    pub fn bit(&self) -> bool {
        self.bit
    }

    pub fn commitment(&self) -> &G {
        &self.statement.commitment
    }

    pub fn root_commitment(&self) -> &G {
        &self.statement.root_commitment
    }

    pub fn blinding(&self) -> &G::Scalar {
        &self.blinding
    }

    pub fn first_messages(&self) -> &[[G; 3]; 2] {
        &self.first_messages
    }

    pub fn respond(&self, challenge: &G::Scalar) -> WeightBitProof<G> {
        let (real, fake) = (self.bit as usize, !self.bit as usize);

        let mut challenges = [G::Scalar::zero(); 2];
        challenges[fake] = self.simulated_challenge;
        challenges[real] = *challenge - self.simulated_challenge;

        let mut responses = [[G::Scalar::zero(); 4]; 2];
        responses[fake] = self.simulated_response;
        responses[real] = [0, 1, 2, 3].map(|j| {
            self.nonces[j] + challenges[real] * self.witness[j]
        });

        WeightBitProof {
            commitment: self.statement.commitment,
            root_commitment: self.statement.root_commitment,
            challenge: challenges[0],
            responses,
        }
    }
}

fn random_witness<F: ScalarField, R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<Witness<F>, Error> {
    Ok([F::random(rng)?, F::random(rng)?, F::random(rng)?, F::random(rng)?])
}
