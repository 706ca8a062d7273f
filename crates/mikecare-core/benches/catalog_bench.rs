//! # Catalog Benchmarks
//!
//! Performance benchmarks for plan resolution and journal filtering.
//!
//! Run with: `cargo bench -p mikecare-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mikecare_core::journal::{self, CategoryFilter, JournalEntry};
use mikecare_core::{CategoryId, SolutionCatalog, StepProgress, completion_ratio};
use mikecare_core::progress::plan_steps;
use std::hint::black_box;

/// Repeat the sample entries until there are `size` of them.
fn journal_of(size: usize) -> Vec<JournalEntry> {
    journal::sample_entries()
        .iter()
        .cycle()
        .take(size)
        .cloned()
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_resolve(c: &mut Criterion) {
    let catalog = SolutionCatalog::builtin();
    let mut group = c.benchmark_group("resolve");

    group.bench_function("typed", |b| {
        b.iter(|| {
            for id in CategoryId::ALL {
                black_box(catalog.plan_for(black_box(id)));
            }
        });
    });
    group.bench_function("raw_known", |b| {
        b.iter(|| black_box(catalog.resolve(black_box("financial"))));
    });
    group.bench_function("raw_fallback", |b| {
        b.iter(|| black_box(catalog.resolve(black_box("astrology"))));
    });

    group.finish();
}

fn bench_journal_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("journal_filter");

    for size in [3, 300, 3000].iter() {
        let entries = journal_of(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| {
                black_box(journal::filter(
                    entries,
                    black_box("stress"),
                    CategoryFilter::Only(CategoryId::Work),
                ))
            });
        });
    }

    group.finish();
}

fn bench_progress(c: &mut Criterion) {
    let plan = SolutionCatalog::builtin().plan_for(CategoryId::Work);
    let steps = plan_steps(plan);

    c.bench_function("toggle_all_and_ratio", |b| {
        b.iter(|| {
            let mut progress = StepProgress::new();
            for step in &steps {
                progress.toggle(*step);
            }
            black_box(completion_ratio(&progress, plan.total_steps()))
        });
    });
}

criterion_group!(benches, bench_resolve, bench_journal_filter, bench_progress);
criterion_main!(benches);
