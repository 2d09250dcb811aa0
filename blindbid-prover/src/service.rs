// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io::{self, Read, Write};

use dusk_blindbid::{Bid, Config, Prover, Verifier};
use rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

use crate::wire::{
    read_frame, write_frame, Frame, Request, Response, Serializable,
    MAX_FRAME_LEN,
};

/// Answers prove and verify requests of one input stream.
pub struct Service<R> {
    prover: Prover,
    verifier: Verifier,
    rng: R,
}

impl<R: RngCore + CryptoRng> Service<R> {
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            prover: Prover::new(config),
            verifier: Verifier::new(config),
            rng,
        }
    }

    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Prove {
                amount,
                nonce,
                seed,
                public_list,
            } => {
                let bid = Bid::new(amount, nonce);
                match self.prover.prove(&mut self.rng, &bid, seed, public_list)
                {
                    Ok(out) => Response::Proven {
                        proof: out.proof,
                        score: out.score,
                        commitment: out.commitment,
                        public_list: out.public_list,
                    },
                    Err(e) => {
                        warn!(event = "prove failed", kind = ?e.kind(), %e);
                        Response::Failed(e.to_string())
                    }
                }
            }
            Request::Verify {
                proof,
                seed,
                public_list,
                score,
                commitment,
            } => Response::Verified(self.verifier.verify(
                &proof,
                &seed,
                &public_list,
                &score,
                &commitment,
            )),
        }
    }

    /// Serves requests until the input ends, returning how many frames were
    /// answered. Transport errors end the loop.
    pub fn serve<I: Read, O: Write>(
        &mut self,
        input: &mut I,
        output: &mut O,
    ) -> io::Result<usize> {
        let config = self.prover.config();
        info!(
            event = "serving",
            membership = ?config.membership,
            amounts = ?config.amounts
        );

        let mut served = 0;
        while let Some(frame) = read_frame(input)? {
            let response = match frame {
                Frame::Body(body) => match Request::from_body(&body) {
                    Ok(request) => {
                        debug!(event = "request", kind = request.kind());
                        self.handle(request)
                    }
                    Err(e) => {
                        warn!(event = "invalid request", %e);
                        Response::Failed(format!("Invalid request: {e}"))
                    }
                },
                Frame::Oversized(len) => {
                    warn!(event = "oversized request", len);
                    Response::Failed(format!(
                        "Request of {len} bytes exceeds {MAX_FRAME_LEN}"
                    ))
                }
            };

            let mut body = vec![];
            response.write(&mut body)?;
            write_frame(output, &body)?;
            output.flush()?;
            served += 1;
        }

        info!(event = "input closed", served);
        Ok(served)
    }
}
