// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use criterion::{criterion_group, criterion_main, Criterion};
use dusk_blindbid::{Scalar, ScalarField};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LIST_LEN: usize = 64;

fn blindbid(c: &mut Criterion) {
    let rng = &mut StdRng::seed_from_u64(0xbeef);
    let d = Scalar::from(rng.gen_range(1..=u32::MAX as u64));
    let mut random = || <Scalar as ScalarField>::random(rng).unwrap();

    let (k, seed) = (random(), random());
    let mut list: Vec<Scalar> = (0..LIST_LEN).map(|_| random()).collect();
    list[LIST_LEN / 2] = dusk_blindbid::commit(&d, &k);

    c.bench_function("score", |b| {
        b.iter(|| dusk_blindbid::score(&d, &k, &seed).unwrap())
    });

    let rng = &mut StdRng::seed_from_u64(0xdead);
    c.bench_function(&format!("prove_{LIST_LEN}"), |b| {
        b.iter(|| {
            dusk_blindbid::prove(rng, d, k, seed, list.clone()).unwrap()
        })
    });

    let (proof, q, z, list) =
        dusk_blindbid::prove(rng, d, k, seed, list).unwrap();
    c.bench_function(&format!("verify_{LIST_LEN}"), |b| {
        b.iter(|| {
            assert!(dusk_blindbid::verify(&proof, &seed, &list, &q, &z))
        })
    });
}

criterion_group!(benches, blindbid);
criterion_main!(benches);
