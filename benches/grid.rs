//! Benchmarks for the grid hot paths: range enumeration, frame building and
//! column inference.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sheetgrid::analysis::{analyze_sheet, infer_column_type};
use sheetgrid::collab::{CellStore, LocalBoxFuture};
use sheetgrid::config::GridConfig;
use sheetgrid::error::Result;
use sheetgrid::grid::GridView;
use sheetgrid::selection::range_between;
use sheetgrid::types::{CellUpdate, CellValue, Sheet};

struct NullStore;

impl CellStore for NullStore {
    fn update_cell(&self, _cell_id: &str, _value: &CellValue) -> Result<()> {
        Ok(())
    }

    fn bulk_update_cells(&self, _updates: Vec<CellUpdate>) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

/// A sheet with `rows` rows of id / amount / date / note columns.
fn sample_sheet(rows: u32) -> Sheet {
    let mut sheet = Sheet::new("bench", "Bench", rows, 26);
    sheet.set_value("A1", "Id");
    sheet.set_value("B1", "Amount");
    sheet.set_value("C1", "Date");
    sheet.set_value("D1", "Note");
    for row in 2..=rows {
        sheet.set_value(format!("A{row}"), f64::from(row));
        sheet.set_value(format!("B{row}"), f64::from(row) * 1.25);
        sheet.set_value(format!("C{row}"), format!("2024-01-{:02}", row % 28 + 1));
        sheet.set_value(format!("D{row}"), format!("note {row}"));
    }
    sheet
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_between");
    for (a, b) in [("A1", "Z10"), ("A1", "Z100"), ("A1", "Z1000")] {
        let cells = range_between(a, b).len();
        group.throughput(Throughput::Elements(cells as u64));
        group.bench_with_input(BenchmarkId::from_parameter(b), &(a, b), |bench, (a, b)| {
            bench.iter(|| range_between(black_box(a), black_box(b)));
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut grid = GridView::new(sample_sheet(10_000), GridConfig::default(), Rc::new(NullStore))
        .expect("default config is valid");
    grid.resize(1280.0, 900.0);
    grid.select_range("B10", "D400");

    c.bench_function("frame_scroll_10k_rows", |b| {
        let mut top = 0.0_f32;
        b.iter(|| {
            top = (top + 480.0) % 200_000.0;
            grid.on_scroll(0.0, top);
            black_box(grid.frame())
        });
    });
}

fn bench_inference(c: &mut Criterion) {
    let numbers: Vec<String> = (0..10_000).map(|n| (n as f64 * 0.5).to_string()).collect();
    let dates: Vec<String> = (0..10_000)
        .map(|n| format!("2023-{:02}-{:02}", n % 12 + 1, n % 28 + 1))
        .collect();

    c.bench_function("infer_numbers_10k", |b| {
        b.iter(|| infer_column_type(black_box(&numbers)));
    });
    c.bench_function("infer_dates_10k", |b| {
        b.iter(|| infer_column_type(black_box(&dates)));
    });

    let sheet = sample_sheet(5_000);
    c.bench_function("analyze_sheet_5k_rows", |b| {
        b.iter(|| analyze_sheet(black_box(&sheet)));
    });
}

criterion_group!(benches, bench_range, bench_frame, bench_inference);
criterion_main!(benches);
