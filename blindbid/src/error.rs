// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use thiserror::Error;

/// Broad classes of [`Error`], letting callers tell malformed input apart
/// from a structurally invalid call and from a failed proof construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Some bytes are not a canonical encoding of the expected object.
    Decoding,
    /// The call itself is invalid, e.g. an empty public bid list.
    InputShape,
    /// The inputs are well formed but no valid proof can be built.
    ProofConstruction,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid scalar length: expected {expected} bytes, found {found}")]
    InvalidScalarLength { expected: usize, found: usize },
    #[error("Scalar is not canonically encoded")]
    NonCanonicalScalar,
    #[error("Bytes are not a canonical prime-order group element")]
    InvalidPoint,
    #[error("Invalid proof length: expected {expected} bytes, found {found}")]
    InvalidProofLength { expected: usize, found: usize },
    #[error("Unsupported proof version {0}")]
    UnsupportedVersion(u8),
    #[error("Unknown membership rule tag {0}")]
    UnknownMembership(u8),
    #[error("Range proofs of {0} bits are not supported")]
    UnsupportedRangeBits(u8),
    #[error("The public bid list is empty")]
    EmptyBidList,
    #[error("The bid commitment is not part of the public bid list")]
    CommitmentNotListed,
    #[error("The bid amount is outside of [{min}, {max}]")]
    AmountOutOfRange { min: u64, max: u64 },
    #[error("Invalid amount range: minimum {min} above maximum {max}")]
    InvalidAmountRange { min: u64, max: u64 },
    #[error("Degenerate {0}")]
    Degenerate(&'static str),
    #[error("Entropy source failure: {0}")]
    Entropy(rand::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidScalarLength { .. }
            | Self::NonCanonicalScalar
            | Self::InvalidPoint
            | Self::InvalidProofLength { .. }
            | Self::UnsupportedVersion(_)
            | Self::UnknownMembership(_)
            | Self::UnsupportedRangeBits(_) => ErrorKind::Decoding,
            Self::EmptyBidList
            | Self::CommitmentNotListed
            | Self::AmountOutOfRange { .. }
            | Self::InvalidAmountRange { .. } => ErrorKind::InputShape,
            Self::Degenerate(_) | Self::Entropy(_) => {
                ErrorKind::ProofConstruction
            }
        }
    }
}

impl From<rand::Error> for Error {
    fn from(e: rand::Error) -> Self {
        Self::Entropy(e)
    }
}
