// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

/// Reads `USD_MCP_BENCH_<suffix>` and clamps it into `range`.
fn knob<T>(suffix: &str, default: T, range: std::ops::RangeInclusive<T>) -> T
where
    T: FromStr + Ord + Copy,
{
    std::env::var(format!("USD_MCP_BENCH_{suffix}"))
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
        .clamp(*range.start(), *range.end())
}

/// Criterion config shared by all benches, with a pprof flamegraph per benchmark.
pub fn criterion() -> Criterion {
    let frequency: i32 = knob("PROFILE_FREQ", 100, 1..=1000);
    let samples: usize = knob("SAMPLES", 50, 10..=200);
    let warmup: u64 = knob("WARMUP_SECS", 2, 1..=60);
    let measurement: u64 = knob("MEASUREMENT_SECS", 4, 1..=120);

    Criterion::default()
        .sample_size(samples)
        .warm_up_time(Duration::from_secs(warmup))
        .measurement_time(Duration::from_secs(measurement))
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
