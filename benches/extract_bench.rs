// benches/extract_bench.rs
//! Benchmarks for the reference extractors.
//!
//! The extractor re-runs over the whole history on every page load, so
//! its cost grows with the number of pages a user has scrolled through.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use infinite_list::{flatten, unique_by, unique_sorted_by, CursorPage, GithubUser};

/// `pages` pages of `per_page` users; consecutive pages overlap by a quarter.
fn history(pages: usize, per_page: usize) -> Vec<CursorPage<GithubUser>> {
    let step = per_page - per_page / 4;
    (0..pages)
        .map(|page| {
            let start = (page * step) as u64;
            let users: Vec<GithubUser> = (start..start + per_page as u64)
                .rev()
                .map(|id| GithubUser {
                    id,
                    login: format!("user{}", id),
                    html_url: None,
                    avatar_url: None,
                    account_type: None,
                })
                .collect();
            CursorPage::new(users, start + per_page as u64 - 1)
        })
        .collect()
}

fn bench_extractors(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for pages in [1, 10, 50] {
        let history = history(pages, 30);

        group.bench_with_input(BenchmarkId::new("flatten", pages), &history, |b, h| {
            b.iter(|| flatten(black_box(h.as_slice())))
        });
        group.bench_with_input(
            BenchmarkId::new("unique_sorted_by", pages),
            &history,
            |b, h| b.iter(|| unique_sorted_by(black_box(h.as_slice()), |user| user.id)),
        );
        group.bench_with_input(BenchmarkId::new("unique_by", pages), &history, |b, h| {
            b.iter(|| unique_by(black_box(h.as_slice()), |user| user.id))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extractors);
criterion_main!(benches);
