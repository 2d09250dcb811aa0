// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use blake2b_simd::{Params, State};

use crate::field::{ScalarField, WIDE_SIZE};

/// Domain separated Blake2b-512 hasher, reducing its output into a scalar
/// field.
///
/// Every input is length-prefixed, so the concatenation of two inputs never
/// collides with a different split of the same bytes.
pub struct Hasher {
    state: State,
}

impl Hasher {
    /// Create a new hasher bound to the given domain.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Hasher {
            state: Params::new().hash_length(WIDE_SIZE).to_state(),
        };
        hasher.update(domain);
        hasher
    }

    /// Process one length-prefixed input.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        self.state.update(&(data.len() as u64).to_le_bytes());
        self.state.update(data);
    }

    /// Process input data in a chained manner.
    pub fn chain_update(self, data: impl AsRef<[u8]>) -> Self {
        let mut hasher = self;
        hasher.update(data);
        hasher
    }

    /// Retrieve the raw 64 byte digest.
    pub fn finalize_wide(&self) -> [u8; WIDE_SIZE] {
        *self.state.finalize().as_array()
    }

    /// Retrieve the digest reduced into the scalar field `F`.
    pub fn finalize<F: ScalarField>(&self) -> F {
        F::from_wide(&self.finalize_wide())
    }

    /// Hash the given inputs under `domain` into a scalar.
    pub fn digest<F: ScalarField>(domain: &[u8], inputs: &[&[u8]]) -> F {
        let mut hasher = Hasher::new(domain);
        for input in inputs {
            hasher.update(input);
        }
        hasher.finalize()
    }
}
