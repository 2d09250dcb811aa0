// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! # Dusk Blind Bid
//!
//! Proof of Blind Bid for the Dusk Network block generator lottery.
//!
//! A bidder commits to a secret amount `d` with a secret nonce `k`. For every
//! round `seed` the bid gets a score `Q`, and the bidder publishes `Q`
//! together with the public commitment `Z` and a proof that both were
//! derived from the same `(d, k)`. Anyone can check the proof without
//! learning `d` or `k`.
//!
//! Scores compare as integers and grow linearly with the amount, scaled by a
//! secret per-round weight. The proof also bounds the amount within the
//! configured [`AmountRange`].
//!
//! ```
//! use dusk_blindbid::Scalar;
//!
//! let mut rng = rand::rngs::OsRng;
//! let (d, k) = (Scalar::from(1_000u64), Scalar::from(42u64));
//! let seed = Scalar::from(7u64);
//! let list = vec![dusk_blindbid::commit(&d, &k)];
//!
//! let (proof, q, z, list) =
//!     dusk_blindbid::prove(&mut rng, d, k, seed, list).unwrap();
//!
//! assert!(dusk_blindbid::verify(&proof, &seed, &list, &q, &z));
//! ```

#![deny(clippy::all)]

pub mod bid;
pub mod commitment;
pub mod config;
pub mod field;
pub mod group;
pub mod hash;
pub mod proof;
pub mod prover;
pub mod range;
pub mod score;
pub mod verifier;
pub mod weight;

mod error;
mod transcript;

pub use bid::Bid;
pub use config::{AmountRange, Config, MembershipRule, V_MAX, V_MIN};
pub use error::{Error, ErrorKind};
pub use field::ScalarField;
pub use group::Group;
pub use proof::{proof_size, Proof, PROOF_SIZE, PROOF_VERSION};
pub use prover::{BlindBidProver, ProverOutput};
pub use verifier::BlindBidVerifier;

use dusk_jubjub::{JubJubExtended, JubJubScalar};
use rand::{CryptoRng, RngCore};

/// Scalar field of the JubJub curve.
pub type Scalar = JubJubScalar;
/// Prime-order subgroup of the JubJub curve.
pub type Point = JubJubExtended;

/// [`BlindBidProver`] over the JubJub curve.
pub type Prover = BlindBidProver<Point>;
/// [`BlindBidVerifier`] over the JubJub curve.
pub type Verifier = BlindBidVerifier<Point>;

/// Public commitment `Z` of the bid `(d, k)`.
pub fn commit(d: &Scalar, k: &Scalar) -> Scalar {
    commitment::commit::<Point>(d, k)
}

/// Score `Q` of the bid `(d, k)` for the round `seed`. `d` must be an
/// integer below `2^64`.
pub fn score(d: &Scalar, k: &Scalar, seed: &Scalar) -> Result<Scalar, Error> {
    score::score::<Point>(d, k, seed)
}

/// Proves the bid `(d, k)` for the round `seed` under the default
/// [`Config`], returning `(proof, Q, Z, public_list)`.
pub fn prove<R: RngCore + CryptoRng>(
    rng: &mut R,
    d: Scalar,
    k: Scalar,
    seed: Scalar,
    public_list: Vec<Scalar>,
) -> Result<(Vec<u8>, Scalar, Scalar, Vec<Scalar>), Error> {
    let bid = Bid::new(d, k);
    let out = Prover::default().prove(rng, &bid, seed, public_list)?;
    Ok((out.proof, out.score, out.commitment, out.public_list))
}

/// Verifies a proof produced by [`prove`] under the default [`Config`].
pub fn verify(
    proof: &[u8],
    seed: &Scalar,
    public_list: &[Scalar],
    score: &Scalar,
    commitment: &Scalar,
) -> bool {
    Verifier::default().verify(
        proof,
        &seed.encode(),
        public_list,
        &score.encode(),
        &commitment.encode(),
    )
}
