// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Commitment to the secret amount and nonce of a bid.
//!
//! The commitment point is the Pedersen commitment
//! `C = amount·G + nonce·H`, where `H` has an unknown discrete logarithm
//! relative to `G`. The public commitment `Z` is the hash of `C`, a scalar
//! that can be placed in the public bid list of a round.

use crate::group::Group;
use crate::hash::Hasher;

const COMMITMENT_DOMAIN: &[u8] = b"dusk-blindbid:commitment";

/// `amount·G + nonce·H`
pub fn commitment_point<G: Group>(
    amount: &G::Scalar,
    nonce: &G::Scalar,
) -> G {
    G::combine(amount, &G::generator(), nonce, &G::blinding_generator())
}

/// Public commitment of a commitment point.
pub fn commitment_of<G: Group>(point: &G) -> G::Scalar {
    Hasher::digest(COMMITMENT_DOMAIN, &[&point.encode()])
}

/// Public commitment `Z` of the bid `(amount, nonce)`.
pub fn commit<G: Group>(
    amount: &G::Scalar,
    nonce: &G::Scalar,
) -> G::Scalar {
    commitment_of(&commitment_point::<G>(amount, nonce))
}
