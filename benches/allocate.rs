// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use arranger::layout::allocate;
use arranger::{ArrangementCore, ArrangerConfig, Extent, Plan, Point, Rect, Signature};

#[derive(Debug, Clone)]
struct BenchPlan {
    id: u64,
    extent: Extent,
}

impl Plan for BenchPlan {
    type Identity = u64;

    fn identity(&self) -> u64 {
        self.id
    }

    fn signature(&self) -> Signature {
        Signature::subroutine(format!("routine{}", self.id), 1)
    }

    fn extent(&self) -> Option<Extent> {
        Some(self.extent)
    }

    fn location(&self) -> Option<&str> {
        None
    }

    fn set_location(&mut self, _location: &str) {}

    fn is_dirty(&self) -> bool {
        false
    }

    fn content_eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Deterministic spread of diagram sizes.
fn extent_for(n: u64) -> Extent {
    let n = n as i32;
    Extent::new(80 + (n * 37) % 160, 40 + (n * 53) % 220)
}

fn plans(count: u64) -> Vec<BenchPlan> {
    (0..count).map(|id| BenchPlan { id, extent: extent_for(id) }).collect()
}

fn config() -> ArrangerConfig {
    ArrangerConfig { canvas_width: Some(1600), ..ArrangerConfig::default() }
}

// Benchmark identity (keep stable):
// - Group names: `layout.allocate`, `ops.insert`, `ops.rearrange`
// - Case IDs are the pool sizes.
fn benches_allocate(c: &mut Criterion) {
    const SIZES: [u64; 4] = [10, 50, 100, 200];

    {
        let mut group = c.benchmark_group("layout.allocate");
        for size in SIZES {
            let mut obstacles: Vec<Rect> = Vec::new();
            for id in 0..size {
                let extent = extent_for(id);
                let position = allocate(obstacles.iter().copied(), extent, 10, Some(1600));
                obstacles.push(Rect::at(position, extent).with_leading_margin(10));
            }
            group.throughput(Throughput::Elements(size));
            group.bench_function(size.to_string(), |b| {
                b.iter(|| {
                    allocate(
                        black_box(obstacles.iter().copied()),
                        black_box(Extent::new(120, 150)),
                        10,
                        Some(1600),
                    )
                })
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("ops.insert");
        for size in SIZES {
            let pool = plans(size);
            group.throughput(Throughput::Elements(size));
            group.bench_function(size.to_string(), |b| {
                b.iter_batched(
                    || pool.clone(),
                    |pool| {
                        let mut core = ArrangementCore::new(config());
                        for plan in pool {
                            black_box(core.insert(plan, None, None));
                        }
                        core
                    },
                    BatchSize::SmallInput,
                )
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("ops.rearrange");
        for size in SIZES {
            let mut core = ArrangementCore::new(config());
            for (n, plan) in plans(size).into_iter().enumerate() {
                let n = n as i32;
                core.insert(plan, Some(Point::new((n * 97) % 1500, (n * 61) % 900)), None);
            }
            group.throughput(Throughput::Elements(size));
            group.bench_function(size.to_string(), |b| b.iter(|| core.rearrange()));
        }
        group.finish();
    }
}

criterion_group!(benches, benches_allocate);
criterion_main!(benches);
