// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Benchmarks for balance computation and settlement.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Balance folding throughput by expense count
//! - Settlement scaling with number of participants
//! - Parallel recomputation over a shared book

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use expense_ledger_rs::{
    BalanceMap, ExpenseBook, ExpenseRecord, Money, ParticipantId, Roster, compute_balances,
    settle,
};
use rayon::prelude::*;

// =============================================================================
// Helper Functions
// =============================================================================

fn make_roster(size: usize) -> Roster {
    Roster::new((0..size).map(|i| format!("p{i:04}")))
}

/// `count` expenses, each paid by one member and split over a window of the
/// next few members.
fn make_expenses(roster: &Roster, count: usize) -> Vec<ExpenseRecord> {
    let members: Vec<&ParticipantId> = roster.iter().collect();
    (0..count)
        .map(|i| {
            let payer = members[i % members.len()];
            let width = 1 + i % 5;
            let participants = (0..width).map(|k| members[(i + k) % members.len()].clone());
            ExpenseRecord::new(
                i.to_string(),
                Money::from_cents(1_000 + (i as i64 * 37) % 9_000),
                payer.clone(),
                participants,
            )
        })
        .collect()
}

/// A closed balance map: alternating creditors and debtors of uneven size.
fn make_balances(size: usize) -> BalanceMap {
    let mut residue = 0i64;
    let mut entries: Vec<(ParticipantId, Money)> = (1..size)
        .map(|i| {
            let cents = if i % 2 == 0 { 100 * i as i64 } else { -70 * i as i64 };
            residue += cents;
            (ParticipantId::from(format!("p{i:04}")), Money::from_cents(cents))
        })
        .collect();
    entries.push((ParticipantId::from("p0000"), Money::from_cents(-residue)));
    entries.into_iter().collect()
}

// =============================================================================
// Balance Benchmarks
// =============================================================================

fn bench_compute_balances(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_balances");
    let roster = make_roster(20);

    for count in [100, 1_000, 10_000].iter() {
        let expenses = make_expenses(&roster, *count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &expenses, |b, expenses| {
            b.iter(|| compute_balances(&roster, black_box(expenses)).unwrap())
        });
    }
    group.finish();
}

// =============================================================================
// Settlement Benchmarks
// =============================================================================

fn bench_settle_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle_scaling");

    for size in [10, 100, 1_000].iter() {
        let balances = make_balances(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &balances, |b, balances| {
            b.iter(|| settle(black_box(balances)))
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let roster = make_roster(8);
    let expenses = make_expenses(&roster, 500);

    c.bench_function("balances_then_settle", |b| {
        b.iter(|| {
            let balances = compute_balances(&roster, black_box(&expenses)).unwrap();
            settle(&balances)
        })
    });
}

// =============================================================================
// Parallel Benchmarks
// =============================================================================

fn bench_parallel_readers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_readers");
    let roster = make_roster(12);
    let mut book = ExpenseBook::new(roster.clone());
    for expense in make_expenses(&roster, 1_000) {
        book.add(expense).unwrap();
    }
    let book = book.into_shared();

    for readers in [1, 4, 16].iter() {
        group.throughput(Throughput::Elements(*readers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(readers), readers, |b, &readers| {
            b.iter(|| {
                (0..readers).into_par_iter().for_each(|_| {
                    black_box(book.read().settlement().unwrap());
                });
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compute_balances,
    bench_settle_scaling,
    bench_end_to_end,
    bench_parallel_readers,
);
criterion_main!(benches);
