// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

mod args;
mod config;
mod log;
mod service;
mod wire;

use std::io::{self, BufWriter};

use clap::Parser;
use rand::rngs::OsRng;

use crate::args::Args;
use crate::config::Config;
use crate::log::Log;
use crate::service::Service;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::try_from(&args)?;

    Log::new(config.log_level()?, config.log_filter(), config.log_type()?)
        .register()?;

    let mut service = Service::new(config.protocol, OsRng);
    service.serve(&mut io::stdin().lock(), &mut BufWriter::new(io::stdout()))?;

    Ok(())
}
