// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Scalar field abstraction consumed by the blind bid protocol.

use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

use dusk_bytes::Serializable;
use dusk_jubjub::JubJubScalar;
use ff::Field;
use rand::{CryptoRng, RngCore};

use crate::Error;

/// Size in bytes of an encoded scalar.
pub const SCALAR_SIZE: usize = 32;

/// Size in bytes of the uniform input reduced by [`ScalarField::from_wide`].
pub const WIDE_SIZE: usize = 64;

/// Arithmetic over a prime-order scalar field with a canonical, fixed-width
/// little-endian encoding.
pub trait ScalarField:
    Copy
    + Debug
    + Eq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;

    fn one() -> Self;

    fn from_u64(n: u64) -> Self;

    /// Multiplicative inverse, `None` for zero.
    fn inverse(&self) -> Option<Self>;

    /// A square root, `None` for quadratic non-residues.
    fn square_root(&self) -> Option<Self>;

    /// Canonical little-endian encoding.
    fn encode(&self) -> [u8; SCALAR_SIZE];

    /// Decodes a canonical encoding, rejecting any value not below the
    /// field modulus.
    fn decode(bytes: &[u8; SCALAR_SIZE]) -> Result<Self, Error>;

    /// Reduces 64 uniformly distributed bytes into the field.
    fn from_wide(bytes: &[u8; WIDE_SIZE]) -> Self;

    fn from_u128(n: u128) -> Self {
        let shift = Self::from_u64(1 << 32);
        Self::from_u64((n >> 64) as u64) * shift * shift
            + Self::from_u64(n as u64)
    }

    /// The value as an integer, `None` if it does not fit 64 bits.
    fn to_u64(&self) -> Option<u64> {
        let bytes = self.encode();
        let (low, high) = bytes.split_at(8);
        if high.iter().any(|b| *b != 0) {
            return None;
        }
        let mut low_bytes = [0u8; 8];
        low_bytes.copy_from_slice(low);
        Some(u64::from_le_bytes(low_bytes))
    }

    fn is_square(&self) -> bool {
        self.square_root().is_some()
    }

    /// The smallest integer above one that has no square root.
    fn non_residue() -> Self {
        let mut n = Self::one() + Self::one();
        while n.is_square() {
            n = n + Self::one();
        }
        n
    }

    fn decode_slice(bytes: &[u8]) -> Result<Self, Error> {
        let array: &[u8; SCALAR_SIZE] =
            bytes.try_into().map_err(|_| Error::InvalidScalarLength {
                expected: SCALAR_SIZE,
                found: bytes.len(),
            })?;
        Self::decode(array)
    }

    /// Samples a uniformly random scalar.
    ///
    /// A failing entropy source is reported as [`Error::Entropy`] instead of
    /// panicking.
    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, Error> {
        let mut wide = [0u8; WIDE_SIZE];
        rng.try_fill_bytes(&mut wide)?;
        Ok(Self::from_wide(&wide))
    }
}

impl ScalarField for JubJubScalar {
    fn zero() -> Self {
        <JubJubScalar as Field>::ZERO
    }

    fn one() -> Self {
        <JubJubScalar as Field>::ONE
    }

    fn from_u64(n: u64) -> Self {
        JubJubScalar::from(n)
    }

    fn inverse(&self) -> Option<Self> {
        Option::from(Field::invert(self))
    }

    fn square_root(&self) -> Option<Self> {
        Option::from(Field::sqrt(self))
    }

    fn encode(&self) -> [u8; SCALAR_SIZE] {
        <JubJubScalar as Serializable<SCALAR_SIZE>>::to_bytes(self)
    }

    fn decode(bytes: &[u8; SCALAR_SIZE]) -> Result<Self, Error> {
        let scalar =
            <JubJubScalar as Serializable<SCALAR_SIZE>>::from_bytes(bytes)
                .map_err(|_| Error::NonCanonicalScalar)?;

        // Only the unique encoding of a value is accepted.
        if scalar.encode() != *bytes {
            return Err(Error::NonCanonicalScalar);
        }
        Ok(scalar)
    }

    fn from_wide(bytes: &[u8; WIDE_SIZE]) -> Self {
        JubJubScalar::from_bytes_wide(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Little-endian encoding of the order of the JubJub prime subgroup.
    const ORDER: [u8; 32] = [
        0xb7, 0x2c, 0xf7, 0xd6, 0x5e, 0x0e, 0x97, 0xd0, 0x82, 0x10, 0xc8, 0xcc,
        0x93, 0x20, 0x68, 0xa6, 0x00, 0x3b, 0x34, 0x01, 0x01, 0x3b, 0x67, 0x06,
        0xa9, 0xaf, 0x33, 0x65, 0xea, 0xb4, 0x7d, 0x0e,
    ];

    #[test]
    fn canonical_roundtrip() {
        let rng = &mut StdRng::seed_from_u64(0xbeef);

        for _ in 0..64 {
            let s =
                <JubJubScalar as ScalarField>::random(rng).expect("entropy");
            let bytes = s.encode();
            let decoded = JubJubScalar::decode(&bytes).expect("canonical");
            assert_eq!(decoded, s);
            assert_eq!(decoded.encode(), bytes);
        }
    }

    #[test]
    fn largest_value_is_order_minus_one() {
        let mut minus_one = ORDER;
        minus_one[0] -= 1;

        let s = JubJubScalar::decode(&minus_one).expect("canonical");
        assert_eq!(s, -JubJubScalar::one());
        assert_eq!(s.encode(), minus_one);
    }

    #[test]
    fn rejects_values_not_below_order() {
        let mut order_plus_one = ORDER;
        order_plus_one[0] += 1;

        for bytes in [ORDER, order_plus_one, [0xff; 32]] {
            let err = JubJubScalar::decode(&bytes)
                .expect_err("values >= order must be rejected");
            assert_eq!(err.kind(), ErrorKind::Decoding);
        }
    }

    #[test]
    fn rejects_wrong_lengths() {
        for len in [0, 31, 33, 64] {
            let bytes = vec![0u8; len];
            match JubJubScalar::decode_slice(&bytes) {
                Err(Error::InvalidScalarLength { expected, found }) => {
                    assert_eq!(expected, SCALAR_SIZE);
                    assert_eq!(found, len);
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
        assert_eq!(
            JubJubScalar::decode_slice(&[0u8; 32]).expect("zero"),
            JubJubScalar::zero()
        );
    }

    #[test]
    fn inverse() {
        let rng = &mut StdRng::seed_from_u64(0xcafe);

        assert!(JubJubScalar::zero().inverse().is_none());

        let s =
            <JubJubScalar as ScalarField>::random(rng).expect("entropy");
        let inv = s.inverse().expect("non-zero scalar");
        assert_eq!(s * inv, JubJubScalar::one());
    }

    #[test]
    fn integers() {
        let n = u64::MAX - 7;
        assert_eq!(JubJubScalar::from_u64(n).to_u64(), Some(n));
        assert_eq!((-JubJubScalar::one()).to_u64(), None);

        let wide = (u128::from(u64::MAX) << 64) | 3;
        let expected = JubJubScalar::from_u64(u64::MAX)
            * JubJubScalar::from_u64(1 << 32)
            * JubJubScalar::from_u64(1 << 32)
            + JubJubScalar::from_u64(3);
        assert_eq!(JubJubScalar::from_u128(wide), expected);
        assert_eq!(JubJubScalar::from_u128(5).to_u64(), Some(5));
    }

    #[test]
    fn square_roots() {
        let rng = &mut StdRng::seed_from_u64(0xf00d);

        for _ in 0..16 {
            let s =
                <JubJubScalar as ScalarField>::random(rng).expect("entropy");
            let root = (s * s).square_root().expect("squares have roots");
            assert!(root == s || root == -s);
        }

        let nu = JubJubScalar::non_residue();
        assert!(!nu.is_square());
        assert!(nu.to_u64().expect("small") > 1);

        // The product of a square and a non-residue is a non-residue.
        let s = JubJubScalar::from_u64(12_345);
        assert!(!(s * s * nu).is_square());
    }

    #[test]
    fn entropy_failure_is_an_error() {
        struct Broken;

        impl RngCore for Broken {
            fn next_u32(&mut self) -> u32 {
                unreachable!()
            }
            fn next_u64(&mut self) -> u64 {
                unreachable!()
            }
            fn fill_bytes(&mut self, _: &mut [u8]) {
                unreachable!()
            }
            fn try_fill_bytes(
                &mut self,
                _: &mut [u8],
            ) -> Result<(), rand::Error> {
                Err(rand::Error::new("no entropy"))
            }
        }
        impl CryptoRng for Broken {}

        let err = <JubJubScalar as ScalarField>::random(&mut Broken)
            .expect_err("must fail");
        assert!(matches!(err, Error::Entropy(_)));
        assert_eq!(err.kind(), ErrorKind::ProofConstruction);
    }
}
