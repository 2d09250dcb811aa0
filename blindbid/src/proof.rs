// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use crate::config::{AmountRange, MembershipRule};
use crate::field::{ScalarField, SCALAR_SIZE};
use crate::group::{Group, POINT_SIZE};
use crate::range::{BitProof, BIT_PROOF_SIZE};
use crate::score::WEIGHT_BITS;
use crate::weight::{WeightBitProof, WEIGHT_BIT_PROOF_SIZE};
use crate::Error;

/// Version of the proof encoding produced by this crate.
pub const PROOF_VERSION: u8 = 2;

/// Version, membership tag and amount bits.
const HEADER_SIZE: usize = 3;

/// Widest amount range a proof can cover.
const MAX_AMOUNT_BITS: u8 = 64;

/// Size in bytes of an encoded [`Proof`] whose amount range spans
/// `amount_bits` bits.
pub const fn proof_size(amount_bits: usize) -> usize {
    HEADER_SIZE
        + 2 * POINT_SIZE
        + 4 * SCALAR_SIZE
        + WEIGHT_BITS * WEIGHT_BIT_PROOF_SIZE
        + (2 * WEIGHT_BITS + 2 * amount_bits) * BIT_PROOF_SIZE
        + 4 * SCALAR_SIZE
}

/// Size in bytes of an encoded [`Proof`] for the default [`AmountRange`].
pub const PROOF_SIZE: usize = proof_size(32);

/// Proof of blind bid.
///
/// Attests knowledge of a bid `(amount, nonce)` opening the commitment point
/// `C = amount·G + nonce·H` such that
///
/// - the nonce commitment `K = nonce·G + κ·H` holds the same nonce,
/// - every weight bit is the quadratic character of `nonce + s_i`,
/// - `amount·2^32 = level·y + remainder` with `remainder < y`, where the
///   level is read from the score,
/// - the amount lies within the configured [`AmountRange`].
///
/// All parts share one Fiat-Shamir challenge. Encoded as
///
/// ```text
/// version ‖ membership tag ‖ amount bits ‖ C ‖ K ‖ c ‖ opening
///   ‖ weight bits ‖ remainder bits ‖ gap bits ‖ lower bits ‖ upper bits
///   ‖ links
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Proof<G: Group> {
    pub(crate) membership: MembershipRule,
    pub(crate) commitment_point: G,
    pub(crate) nonce_point: G,
    pub(crate) challenge: G::Scalar,
    /// Responses for `(amount, nonce, κ)`.
    pub(crate) opening: [G::Scalar; 3],
    pub(crate) weight: Vec<WeightBitProof<G>>,
    pub(crate) remainder: Vec<BitProof<G>>,
    pub(crate) gap: Vec<BitProof<G>>,
    pub(crate) lower: Vec<BitProof<G>>,
    pub(crate) upper: Vec<BitProof<G>>,
    pub(crate) links: [G::Scalar; 4],
}

impl<G: Group> Proof<G> {
    /// Membership rule the proof was built under.
    pub fn membership(&self) -> MembershipRule {
        self.membership
    }

    /// Commitment point `C`, whose hash is the public commitment `Z`.
    pub fn commitment_point(&self) -> &G {
        &self.commitment_point
    }

    /// Number of bits the amount range proofs decompose into, see
    /// [`AmountRange::bits`].
    pub fn amount_bits(&self) -> usize {
        self.lower.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(proof_size(self.amount_bits()));

        buf.push(PROOF_VERSION);
        buf.push(self.membership.tag());
        buf.push(self.amount_bits() as u8);
        buf.extend_from_slice(&self.commitment_point.encode());
        buf.extend_from_slice(&self.nonce_point.encode());
        buf.extend_from_slice(&self.challenge.encode());
        for response in &self.opening {
            buf.extend_from_slice(&response.encode());
        }
        for bit in &self.weight {
            bit.write(&mut buf);
        }
        for bits in [&self.remainder, &self.gap, &self.lower, &self.upper] {
            for bit in bits {
                bit.write(&mut buf);
            }
        }
        for response in &self.links {
            buf.extend_from_slice(&response.encode());
        }

        buf
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::InvalidProofLength {
                expected: PROOF_SIZE,
                found: bytes.len(),
            });
        }
        if bytes[0] != PROOF_VERSION {
            return Err(Error::UnsupportedVersion(bytes[0]));
        }
        let membership = MembershipRule::from_tag(bytes[1])?;
        if bytes[2] > MAX_AMOUNT_BITS {
            return Err(Error::UnsupportedRangeBits(bytes[2]));
        }
        let amount_bits = bytes[2] as usize;

        let expected = proof_size(amount_bits);
        if bytes.len() != expected {
            return Err(Error::InvalidProofLength {
                expected,
                found: bytes.len(),
            });
        }

        let mut reader = &bytes[HEADER_SIZE..];
        let commitment_point = read_nonzero_point(&mut reader)?;
        let nonce_point = read_nonzero_point(&mut reader)?;
        let challenge = read_scalar(&mut reader)?;
        let opening = read_scalars(&mut reader)?;

        let weight = (0..WEIGHT_BITS)
            .map(|_| read_weight_bit(&mut reader))
            .collect::<Result<_, _>>()?;
        let mut bits = |n: usize| -> Result<Vec<BitProof<G>>, Error> {
            (0..n).map(|_| read_bit(&mut reader)).collect()
        };
        let remainder = bits(WEIGHT_BITS)?;
        let gap = bits(WEIGHT_BITS)?;
        let lower = bits(amount_bits)?;
        let upper = bits(amount_bits)?;
        let links = read_scalars(&mut reader)?;

        Ok(Self {
            membership,
            commitment_point,
            nonce_point,
            challenge,
            opening,
            weight,
            remainder,
            gap,
            lower,
            upper,
            links,
        })
    }
}

fn read_point<G: Group>(reader: &mut &[u8]) -> Result<G, Error> {
    let (head, tail) = reader.split_at(POINT_SIZE);
    *reader = tail;

    let mut bytes = [0u8; POINT_SIZE];
    bytes.copy_from_slice(head);
    G::decode(&bytes)
}

/// `C` and `K` are never the identity for a valid bid.
fn read_nonzero_point<G: Group>(reader: &mut &[u8]) -> Result<G, Error> {
    let point = read_point::<G>(reader)?;
    if point == G::identity() {
        return Err(Error::InvalidPoint);
    }
    Ok(point)
}

fn read_scalar<F: ScalarField>(reader: &mut &[u8]) -> Result<F, Error> {
    let (head, tail) = reader.split_at(SCALAR_SIZE);
    *reader = tail;
    F::decode_slice(head)
}

fn read_scalars<F: ScalarField, const N: usize>(
    reader: &mut &[u8],
) -> Result<[F; N], Error> {
    let mut scalars = [F::zero(); N];
    for s in scalars.iter_mut() {
        *s = read_scalar(reader)?;
    }
    Ok(scalars)
}

fn read_bit<G: Group>(reader: &mut &[u8]) -> Result<BitProof<G>, Error> {
    Ok(BitProof {
        commitment: read_point(reader)?,
        challenge: read_scalar(reader)?,
        responses: read_scalars(reader)?,
    })
}

fn read_weight_bit<G: Group>(
    reader: &mut &[u8],
) -> Result<WeightBitProof<G>, Error> {
    Ok(WeightBitProof {
        commitment: read_point(reader)?,
        root_commitment: read_point(reader)?,
        challenge: read_scalar(reader)?,
        responses: [read_scalars(reader)?, read_scalars(reader)?],
    })
}

impl AmountRange {
    /// Size in bytes of the proofs of bids within this range.
    pub fn proof_size(&self) -> usize {
        proof_size(self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use dusk_jubjub::{JubJubExtended, JubJubScalar};

    type Point = JubJubExtended;

    fn scalar(n: u64) -> JubJubScalar {
        JubJubScalar::from(n)
    }

    fn bit(n: u64) -> BitProof<Point> {
        BitProof {
            commitment: <Point as Group>::blinding_generator(),
            challenge: scalar(n),
            responses: [scalar(n + 1), scalar(n + 2)],
        }
    }

    fn sample(amount_bits: usize) -> Proof<Point> {
        let g = <Point as Group>::generator();
        let h = <Point as Group>::blinding_generator();
        let weight_bit = WeightBitProof {
            commitment: g,
            root_commitment: <Point as Group>::identity(),
            challenge: scalar(11),
            responses: [[scalar(12); 4], [scalar(13); 4]],
        };

        Proof {
            membership: MembershipRule::EchoOnly,
            commitment_point: g,
            nonce_point: h,
            challenge: scalar(3),
            opening: [scalar(5), scalar(6), scalar(7)],
            weight: vec![weight_bit; WEIGHT_BITS],
            remainder: vec![bit(20); WEIGHT_BITS],
            gap: vec![bit(30); WEIGHT_BITS],
            lower: vec![bit(40); amount_bits],
            upper: vec![bit(50); amount_bits],
            links: [scalar(60), scalar(61), scalar(62), scalar(63)],
        }
    }

    #[test]
    fn layout() {
        let proof = sample(32);
        let bytes = proof.to_bytes();

        assert_eq!(bytes.len(), PROOF_SIZE);
        assert_eq!(bytes.len(), AmountRange::default().proof_size());
        assert_eq!(bytes[0], PROOF_VERSION);
        assert_eq!(bytes[1], MembershipRule::EchoOnly.tag());
        assert_eq!(bytes[2], 32);
        assert_eq!(&bytes[3..35], &proof.commitment_point.encode()[..]);
        assert_eq!(bytes[67], 3);
        assert_eq!(bytes[99], 5);
        assert_eq!(bytes[163], 7);
        // The first weight bit follows the opening responses.
        assert_eq!(bytes[195 + 2 * POINT_SIZE], 11);
        assert_eq!(bytes[bytes.len() - SCALAR_SIZE], 63);

        assert_eq!(Proof::from_slice(&bytes).unwrap(), proof);
    }

    #[test]
    fn size_follows_the_amount_range() {
        let stake = sample(AmountRange::STAKE.bits());
        let bytes = stake.to_bytes();

        assert_eq!(bytes.len(), AmountRange::STAKE.proof_size());
        assert!(bytes.len() < PROOF_SIZE);
        assert_eq!(Proof::from_slice(&bytes).unwrap(), stake);
    }

    #[test]
    fn rejects_malformed_encodings() {
        let bytes = sample(32).to_bytes();

        let mut short = bytes.clone();
        short.pop();
        let mut long = bytes.clone();
        long.push(0);
        let mut version = bytes.clone();
        version[0] = PROOF_VERSION + 1;
        let mut tag = bytes.clone();
        tag[1] = 0xff;
        let mut range = bytes.clone();
        range[2] = 65;
        let mut other_range = bytes.clone();
        other_range[2] = 31;
        let mut identity = bytes.clone();
        identity[3..35]
            .copy_from_slice(&<Point as Group>::identity().encode());
        let mut scalar = bytes.clone();
        scalar[67..99].copy_from_slice(&[0xff; 32]);
        let mut point = bytes.clone();
        point[195..227].copy_from_slice(&[0xff; 32]);

        for malformed in [
            vec![],
            bytes[..2].to_vec(),
            short,
            long,
            version,
            tag,
            range,
            other_range,
            identity,
            scalar,
            point,
        ] {
            let err = Proof::<Point>::from_slice(&malformed)
                .expect_err("malformed proof");
            assert_eq!(err.kind(), ErrorKind::Decoding);
        }
    }
}
