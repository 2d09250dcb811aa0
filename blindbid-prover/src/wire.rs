// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Framed request/response protocol of the prover service.
//!
//! Every message travels in a frame `len: u32 LE ‖ body`. Scalars are 32
//! bytes little-endian, lists are a `u32 LE` count followed by the entries
//! and byte strings are a `u32 LE` length followed by the bytes.

use std::io::{self, Read, Write};

use dusk_blindbid::{Scalar, ScalarField};

/// Largest frame body accepted by the service.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

const PROVE: u8 = 0x01;
const VERIFY: u8 = 0x02;

const STATUS_OK: u8 = 0;
const STATUS_ERR: u8 = 1;

pub trait Serializable {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()>;
    fn read<R: Read>(r: &mut R) -> io::Result<Self>
    where
        Self: Sized;

    fn read_bytes<R: Read, const N: usize>(r: &mut R) -> io::Result<[u8; N]> {
        let mut buffer = [0u8; N];
        r.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
        let byte: [u8; 1] = Self::read_bytes(r)?;
        Ok(byte[0])
    }

    fn read_u32_le<R: Read>(r: &mut R) -> io::Result<u32> {
        let data = Self::read_bytes(r)?;
        Ok(u32::from_le_bytes(data))
    }

    /// Writes length-prefixed fields
    fn write_var_le_bytes32<W: Write>(w: &mut W, buf: &[u8]) -> io::Result<()> {
        let len = u32::try_from(buf.len()).map_err(invalid_data)?;
        w.write_all(&len.to_le_bytes())?;
        w.write_all(buf)?;
        Ok(())
    }

    /// Reads length-prefixed fields
    fn read_var_le_bytes32<R: Read>(r: &mut R) -> io::Result<Vec<u8>> {
        let len = Self::read_u32_le(r)? as usize;

        let mut buf = vec![];
        r.by_ref().take(len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        Ok(buf)
    }

    fn read_scalar<R: Read>(r: &mut R) -> io::Result<Scalar> {
        let bytes = Self::read_bytes(r)?;
        Scalar::decode(&bytes).map_err(invalid_data)
    }

    fn write_scalars<W: Write>(w: &mut W, list: &[Scalar]) -> io::Result<()> {
        let len = u32::try_from(list.len()).map_err(invalid_data)?;
        w.write_all(&len.to_le_bytes())?;
        for scalar in list {
            w.write_all(&scalar.encode())?;
        }
        Ok(())
    }

    fn read_scalars<R: Read>(r: &mut R) -> io::Result<Vec<Scalar>> {
        let len = Self::read_u32_le(r)? as usize;

        // The count is untrusted, the entries have to be there.
        let mut list = Vec::with_capacity(len.min(MAX_FRAME_LEN / 32));
        for _ in 0..len {
            list.push(Self::read_scalar(r)?);
        }
        Ok(list)
    }
}

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Prove {
        amount: Scalar,
        nonce: Scalar,
        seed: Scalar,
        public_list: Vec<Scalar>,
    },
    Verify {
        proof: Vec<u8>,
        seed: [u8; 32],
        public_list: Vec<Scalar>,
        score: [u8; 32],
        commitment: [u8; 32],
    },
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Prove { .. } => "prove",
            Self::Verify { .. } => "verify",
        }
    }

    /// Decodes a whole frame body, rejecting trailing bytes.
    pub fn from_body(mut body: &[u8]) -> io::Result<Self> {
        let request = Self::read(&mut body)?;
        if !body.is_empty() {
            return Err(invalid_data("trailing bytes after request"));
        }
        Ok(request)
    }
}

impl Serializable for Request {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Self::Prove {
                amount,
                nonce,
                seed,
                public_list,
            } => {
                w.write_all(&[PROVE])?;
                w.write_all(&amount.encode())?;
                w.write_all(&nonce.encode())?;
                w.write_all(&seed.encode())?;
                Self::write_scalars(w, public_list)
            }
            Self::Verify {
                proof,
                seed,
                public_list,
                score,
                commitment,
            } => {
                w.write_all(&[VERIFY])?;
                Self::write_var_le_bytes32(w, proof)?;
                w.write_all(seed)?;
                Self::write_scalars(w, public_list)?;
                w.write_all(score)?;
                w.write_all(commitment)
            }
        }
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        match Self::read_u8(r)? {
            PROVE => Ok(Self::Prove {
                amount: Self::read_scalar(r)?,
                nonce: Self::read_scalar(r)?,
                seed: Self::read_scalar(r)?,
                public_list: Self::read_scalars(r)?,
            }),
            VERIFY => Ok(Self::Verify {
                proof: Self::read_var_le_bytes32(r)?,
                seed: Self::read_bytes(r)?,
                public_list: Self::read_scalars(r)?,
                score: Self::read_bytes(r)?,
                commitment: Self::read_bytes(r)?,
            }),
            kind => Err(invalid_data(format!("unknown request {kind:#04x}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Proven {
        proof: Vec<u8>,
        score: Scalar,
        commitment: Scalar,
        public_list: Vec<Scalar>,
    },
    Verified(bool),
    Failed(String),
}

impl Serializable for Response {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Self::Proven {
                proof,
                score,
                commitment,
                public_list,
            } => {
                w.write_all(&[STATUS_OK, PROVE])?;
                Self::write_var_le_bytes32(w, proof)?;
                w.write_all(&score.encode())?;
                w.write_all(&commitment.encode())?;
                Self::write_scalars(w, public_list)
            }
            Self::Verified(valid) => {
                w.write_all(&[STATUS_OK, VERIFY, *valid as u8])
            }
            Self::Failed(message) => {
                w.write_all(&[STATUS_ERR])?;
                Self::write_var_le_bytes32(w, message.as_bytes())
            }
        }
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        match Self::read_u8(r)? {
            STATUS_OK => match Self::read_u8(r)? {
                PROVE => Ok(Self::Proven {
                    proof: Self::read_var_le_bytes32(r)?,
                    score: Self::read_scalar(r)?,
                    commitment: Self::read_scalar(r)?,
                    public_list: Self::read_scalars(r)?,
                }),
                VERIFY => match Self::read_u8(r)? {
                    0 => Ok(Self::Verified(false)),
                    1 => Ok(Self::Verified(true)),
                    b => Err(invalid_data(format!("invalid boolean {b}"))),
                },
                kind => {
                    Err(invalid_data(format!("unknown response {kind:#04x}")))
                }
            },
            STATUS_ERR => {
                let message = Self::read_var_le_bytes32(r)?;
                String::from_utf8(message)
                    .map(Self::Failed)
                    .map_err(invalid_data)
            }
            status => Err(invalid_data(format!("invalid status {status}"))),
        }
    }
}

/// A frame read from the input stream.
#[derive(Debug, PartialEq)]
pub enum Frame {
    Body(Vec<u8>),
    /// The body was longer than [`MAX_FRAME_LEN`] and has been skipped.
    Oversized(usize),
}

/// Reads the next frame, `None` on a clean end of input.
pub fn read_frame<R: Read>(r: &mut R) -> io::Result<Option<Frame>> {
    let mut len = [0u8; 4];
    let mut filled = 0;
    while filled < len.len() {
        match r.read(&mut len[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    let len = u32::from_le_bytes(len) as usize;

    if len > MAX_FRAME_LEN {
        let mut body = r.by_ref().take(len as u64);
        let skipped = io::copy(&mut body, &mut io::sink())?;
        if skipped as usize != len {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        return Ok(Some(Frame::Oversized(len)));
    }

    let mut body = vec![0u8; len];
    r.read_exact(&mut body)?;
    Ok(Some(Frame::Body(body)))
}

pub fn write_frame<W: Write>(w: &mut W, body: &[u8]) -> io::Result<()> {
    let len = u32::try_from(body.len()).map_err(invalid_data)?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(n: u64) -> Scalar {
        Scalar::from(n)
    }

    fn body<T: Serializable>(value: &T) -> Vec<u8> {
        let mut buf = vec![];
        value.write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn prove_request_layout() {
        let request = Request::Prove {
            amount: scalar(1),
            nonce: scalar(2),
            seed: scalar(3),
            public_list: vec![scalar(4), scalar(5)],
        };
        let bytes = body(&request);

        assert_eq!(bytes.len(), 1 + 3 * 32 + 4 + 2 * 32);
        assert_eq!(bytes[0], PROVE);
        assert_eq!(bytes[1], 1);
        assert_eq!(bytes[33], 2);
        assert_eq!(bytes[65], 3);
        assert_eq!(&bytes[97..101], &2u32.to_le_bytes());
        assert_eq!(bytes[101], 4);

        assert_eq!(Request::from_body(&bytes).unwrap(), request);
    }

    #[test]
    fn verify_request_keeps_raw_bytes() {
        let request = Request::Verify {
            proof: vec![7; 10],
            seed: [0xff; 32],
            public_list: vec![],
            score: [1; 32],
            commitment: [2; 32],
        };
        let bytes = body(&request);

        assert_eq!(bytes.len(), 1 + 4 + 10 + 32 + 4 + 32 + 32);
        assert_eq!(Request::from_body(&bytes).unwrap(), request);
    }

    #[test]
    fn rejects_malformed_requests() {
        let mut trailing = body(&Request::Prove {
            amount: scalar(1),
            nonce: scalar(1),
            seed: scalar(1),
            public_list: vec![],
        });
        trailing.push(0);

        let mut non_canonical = vec![PROVE];
        non_canonical.extend_from_slice(&[0xff; 32]);

        // A count promising more entries than present.
        let mut short_list = vec![PROVE];
        short_list.extend_from_slice(&[0; 96]);
        short_list.extend_from_slice(&u32::MAX.to_le_bytes());

        for malformed in [
            vec![],
            vec![0x7f],
            trailing,
            non_canonical,
            short_list,
        ] {
            assert!(Request::from_body(&malformed).is_err());
        }
    }

    #[test]
    fn responses() {
        for response in [
            Response::Verified(true),
            Response::Verified(false),
            Response::Failed("The public bid list is empty".into()),
            Response::Failed(String::new()),
        ] {
            let bytes = body(&response);
            assert_eq!(Response::read(&mut &bytes[..]).unwrap(), response);
        }

        let verified = body(&Response::Verified(true));
        assert_eq!(verified, [STATUS_OK, VERIFY, 1]);

        let response = Response::Proven {
            proof: vec![1, 2, 3],
            score: scalar(8),
            commitment: scalar(9),
            public_list: vec![scalar(9)],
        };
        let bytes = body(&response);
        assert_eq!(&bytes[..2], &[STATUS_OK, PROVE]);
        assert_eq!(Response::read(&mut &bytes[..]).unwrap(), response);

        assert!(Response::read(&mut &[STATUS_OK, 0x7f][..]).is_err());
        assert!(Response::read(&mut &[STATUS_OK, VERIFY, 2][..]).is_err());
    }

    #[test]
    fn frames() {
        let mut stream = vec![];
        write_frame(&mut stream, b"abc").unwrap();
        write_frame(&mut stream, b"").unwrap();

        let r = &mut &stream[..];
        assert_eq!(read_frame(r).unwrap(), Some(Frame::Body(b"abc".to_vec())));
        assert_eq!(read_frame(r).unwrap(), Some(Frame::Body(vec![])));
        assert_eq!(read_frame(r).unwrap(), None);

        let partial = [1u8, 0];
        assert!(read_frame(&mut &partial[..]).is_err());
    }

    #[test]
    fn oversized_frames_are_skipped() {
        let len = MAX_FRAME_LEN + 1;
        let mut stream = (len as u32).to_le_bytes().to_vec();
        stream.resize(4 + len, 0);
        write_frame(&mut stream, b"next").unwrap();

        let r = &mut &stream[..];
        assert_eq!(read_frame(r).unwrap(), Some(Frame::Oversized(len)));
        assert_eq!(read_frame(r).unwrap(), Some(Frame::Body(b"next".to_vec())));
    }
}
