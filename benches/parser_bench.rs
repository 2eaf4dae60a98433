//! Parser throughput: reports per second for the bundled fixtures and a
//! synthetic many-player report.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use crsplit::parallel::{parse_reports_parallel, ReportFile, WorkerPool};
use crsplit::report::{normalize_payload, parse_combat_report};
use crsplit::settlement::settle;

const CLASSIC_EN: &str = include_str!("../tests/fixtures/reports/classic_en.txt");
const SUMMARY_EN: &str = include_str!("../tests/fixtures/reports/summary_en.txt");
const ENVELOPE_XML: &str = include_str!("../tests/fixtures/reports/envelope.xml");

fn synthetic_report(players: usize) -> String {
    let units = ["Light Fighter", "Cruiser", "Battleship", "Recycler", "Incrociatore da Battaglia"];
    let mut before = String::new();
    let mut after = String::from("After the battle...\n");
    for p in 0..players {
        before.push_str(&format!("Attacker Player{p} [TAG] from Colony (1:{p}:3)\n"));
        after.push_str(&format!("Attacker Player{p} [TAG] from Colony (1:{p}:3)\n"));
        for (i, unit) in units.iter().enumerate() {
            let qty = 1_000 * (i + 1) + p;
            before.push_str(&format!("{unit} {qty}\n"));
            after.push_str(&format!("{unit} {} ( -{} )\n", qty / 2, qty - qty / 2));
        }
    }
    before.push('\n');
    before.push_str(&after);
    before.push_str("The attacker has won the battle!\n");
    before
}

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Elements(1));

    group.bench_function("classic_en", |b| b.iter(|| parse_combat_report(black_box(CLASSIC_EN))));
    group.bench_function("summary_en", |b| b.iter(|| parse_combat_report(black_box(SUMMARY_EN))));
    group.bench_function("envelope_xml", |b| {
        b.iter(|| parse_combat_report(&normalize_payload(black_box(ENVELOPE_XML))))
    });

    let large = synthetic_report(50);
    group.bench_function("synthetic_50_players", |b| b.iter(|| parse_combat_report(black_box(&large))));
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let files: Vec<ReportFile> = (0..64)
        .map(|i| ReportFile {
            name: format!("report-{i:03}.txt"),
            contents: synthetic_report(8),
        })
        .collect();

    let mut group = c.benchmark_group("batch");
    group.throughput(Throughput::Elements(files.len() as u64));
    group.sample_size(20);
    group.bench_function("parallel_64_reports", |b| {
        let pool = WorkerPool::default();
        b.iter(|| parse_reports_parallel(black_box(&files), &pool))
    });
    group.finish();
}

fn bench_solver(c: &mut Criterion) {
    let balances: Vec<(String, f64)> = (0..40)
        .map(|i| {
            let amount = if i % 2 == 0 { 1_000.0 * i as f64 } else { -1_000.0 * (i - 1) as f64 };
            (format!("P{i}"), amount)
        })
        .collect();
    c.bench_function("settle_40_players", |b| b.iter(|| settle(black_box(&balances), 0.5)));
}

criterion_group!(benches, bench_parser, bench_batch, bench_solver);
criterion_main!(benches);
