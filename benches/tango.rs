// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use keysync::{Diff, NoopHandler};
use std::hint::black_box;
use tango_bench::{IntoBenchmarks, benchmark_fn, tango_benchmarks, tango_main};

#[derive(Clone)]
struct Submitted {
    user_id: u64,
    role_id: u64,
}

#[derive(Clone)]
struct Stored {
    #[allow(dead_code)]
    id: u64,
    user_id: u64,
    role_id: u64,
}

/// `n` submitted and `n` stored associations, half of which share a key.
fn half_overlapping(n: u64) -> (Vec<Submitted>, Vec<Stored>) {
    let submitted = (0..n)
        .map(|i| Submitted {
            user_id: i % 64,
            role_id: i,
        })
        .collect();
    let stored = (n / 2..n + n / 2)
        .map(|i| Stored {
            id: i,
            user_id: i % 64,
            role_id: i,
        })
        .collect();
    (submitted, stored)
}

fn diff_benchmarks() -> impl IntoBenchmarks {
    let small: &'static _ = Box::leak(Box::new(half_overlapping(16)));
    let big: &'static _ = Box::leak(Box::new(half_overlapping(4096)));
    [
        benchmark_fn("diff::compute::small", move |b| {
            b.iter(move || {
                let (submitted, stored) = black_box(small);
                Diff::compute(
                    submitted.iter(),
                    stored.iter(),
                    |s| (s.user_id, s.role_id),
                    |t| (t.user_id, t.role_id),
                )
            })
        }),
        benchmark_fn("diff::compute::big", move |b| {
            b.iter(move || {
                let (submitted, stored) = black_box(big);
                Diff::compute(
                    submitted.iter(),
                    stored.iter(),
                    |s| (s.user_id, s.role_id),
                    |t| (t.user_id, t.role_id),
                )
            })
        }),
        benchmark_fn("diff::compute_and_apply::big", move |b| {
            b.iter(move || {
                let (submitted, stored) = black_box(big).clone();
                Diff::compute(
                    submitted,
                    stored,
                    |s| (s.user_id, s.role_id),
                    |t| (t.user_id, t.role_id),
                )
                .apply(NoopHandler)
            })
        }),
    ]
}

tango_benchmarks!(diff_benchmarks());
tango_main!();
