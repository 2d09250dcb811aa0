// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Prime-order group abstraction used by the commitments and the proof.

use core::fmt::Debug;
use core::ops::{Add, Sub};

use dusk_bytes::Serializable;
use dusk_jubjub::{
    JubJubAffine, JubJubExtended, JubJubScalar, GENERATOR_EXTENDED,
    GENERATOR_NUMS_EXTENDED,
};

use crate::field::ScalarField;
use crate::Error;

/// Size in bytes of an encoded group element.
pub const POINT_SIZE: usize = 32;

/// A prime-order group with a canonical 32 byte encoding.
pub trait Group:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
{
    type Scalar: ScalarField;

    /// Base point the bid amount is committed on.
    fn generator() -> Self;

    /// Base point the bid nonce is committed on. Its discrete logarithm
    /// relative to [`Group::generator`] is unknown.
    fn blinding_generator() -> Self;

    fn identity() -> Self;

    fn scale(&self, scalar: &Self::Scalar) -> Self;

    fn encode(&self) -> [u8; POINT_SIZE];

    /// Decodes a canonical encoding of an element of the prime-order
    /// subgroup.
    fn decode(bytes: &[u8; POINT_SIZE]) -> Result<Self, Error>;

    /// `a·P + b·Q`
    fn combine(
        a: &Self::Scalar,
        p: &Self,
        b: &Self::Scalar,
        q: &Self,
    ) -> Self {
        p.scale(a) + q.scale(b)
    }
}

impl Group for JubJubExtended {
    type Scalar = JubJubScalar;

    fn generator() -> Self {
        GENERATOR_EXTENDED
    }

    fn blinding_generator() -> Self {
        GENERATOR_NUMS_EXTENDED
    }

    fn identity() -> Self {
        JubJubExtended::identity()
    }

    fn scale(&self, scalar: &JubJubScalar) -> Self {
        *self * *scalar
    }

    fn encode(&self) -> [u8; POINT_SIZE] {
        <JubJubAffine as Serializable<POINT_SIZE>>::to_bytes(
            &JubJubAffine::from(*self),
        )
    }

    fn decode(bytes: &[u8; POINT_SIZE]) -> Result<Self, Error> {
        let affine =
            <JubJubAffine as Serializable<POINT_SIZE>>::from_bytes(bytes)
                .map_err(|_| Error::InvalidPoint)?;
        let point = JubJubExtended::from(affine);

        if point.encode() != *bytes || !bool::from(point.is_torsion_free()) {
            return Err(Error::InvalidPoint);
        }
        Ok(point)
    }
}
