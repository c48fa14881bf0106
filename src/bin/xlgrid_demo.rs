//! Demo host for xlgrid - a monthly salary ledger with frozen panes
//!
//! Usage:
//!   xlgrid_demo                              # Visible cells at offset 0,0 as JSON
//!   xlgrid_demo --scroll 120,300             # Scroll before querying
//!   xlgrid_demo --viewport 375x667           # Viewport size (default 375x667)
//!   xlgrid_demo --start 2017-10              # Most recent month shown
//!
//! Set `RUST_LOG=xlgrid=debug` to see layout passes.

#![allow(clippy::exit)]

use std::env;
use std::io::{self, Write};
use std::process;
use std::rc::Rc;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use xlgrid::layout::{GridLayoutEngine, LabelWidths};
use xlgrid::types::Size;

const SALARY: i64 = 2000;
const TOP_LEFT: &str = "My Salary Control";
const TOP_LABELS: [&str; 5] = ["Salary", "Bills", "Shopping", "Parties", "Total"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_SHOWN: u32 = 13;
const CELL_PADDING: f32 = 30.0;
const ROW_HEIGHT: f32 = 70.0;

struct Options {
    scroll: (f32, f32),
    viewport: Size,
    start: (i32, u32),
}

fn parse_pair(value: &str, sep: char) -> Option<(f32, f32)> {
    let (a, b) = value.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_month(value: &str) -> Option<(i32, u32)> {
    let (year, month) = value.split_once('-')?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year.parse().ok()?, month - 1))
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        scroll: (0.0, 0.0),
        viewport: Size::new(375.0, 667.0),
        start: (2017, 9),
    };
    let mut args = env::args().skip(1);
    while let Some(flag) = args.next() {
        let value = args
            .next()
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--scroll" => {
                options.scroll =
                    parse_pair(&value, ',').ok_or_else(|| format!("bad --scroll {value}"))?;
            }
            "--viewport" => {
                let (w, h) =
                    parse_pair(&value, 'x').ok_or_else(|| format!("bad --viewport {value}"))?;
                options.viewport = Size::new(w, h);
            }
            "--start" => {
                options.start =
                    parse_month(&value).ok_or_else(|| format!("bad --start {value}"))?;
            }
            other => return Err(format!("unknown flag {other}")),
        }
    }
    Ok(options)
}

/// "Oct-2017", counting back `back` months from `start`
fn month_label(start: (i32, u32), back: u32) -> String {
    let (year, month) = start;
    let total = i64::from(year) * 12 + i64::from(month) - i64::from(back);
    let year = total.div_euclid(12);
    let month = usize::try_from(total.rem_euclid(12)).unwrap_or(0);
    let name = MONTH_NAMES.get(month).copied().unwrap_or("???");
    format!("{name}-{year}")
}

fn format_currency(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}${grouped}.00")
}

/// Small deterministic generator so every run prints the same ledger
struct Lcg(u64);

impl Lcg {
    fn next_below(&mut self, bound: u64) -> i64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        i64::try_from((self.0 >> 33) % bound).unwrap_or(0)
    }
}

/// One row per month: salary, three expenses, and what is left
fn ledger(months: usize) -> Vec<[i64; 5]> {
    let mut rng = Lcg(0x5eed);
    (0..months)
        .map(|_| {
            let bills = rng.next_below(2000);
            let shopping = rng.next_below(2000);
            let parties = rng.next_below(2000);
            [
                SALARY,
                bills,
                shopping,
                parties,
                SALARY - bills - shopping - parties,
            ]
        })
        .collect()
}

/// Display text of every cell, row-major, header row and month column included
fn cell_texts(months: &[String], values: &[[i64; 5]]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(months.len() + 1);
    let mut header = vec![TOP_LEFT.to_string()];
    header.extend(TOP_LABELS.iter().map(|s| (*s).to_string()));
    rows.push(header);
    for (month, row_values) in months.iter().zip(values) {
        let mut row = vec![month.clone()];
        row.extend(row_values.iter().map(|v| format_currency(*v)));
        rows.push(row);
    }
    rows
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: xlgrid_demo [--scroll X,Y] [--viewport WxH] [--start YYYY-MM]");
            process::exit(1);
        }
    };

    let months: Vec<String> = (0..MONTHS_SHOWN)
        .map(|back| month_label(options.start, back))
        .collect();
    let values = ledger(months.len());
    let texts = cell_texts(&months, &values);

    let column_count = texts.first().map_or(0, Vec::len);
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); column_count];
    for row in &texts {
        for (column, text) in row.iter().enumerate() {
            if let Some(labels) = columns.get_mut(column) {
                labels.push(text.clone());
            }
        }
    }
    let delegate = Rc::new(LabelWidths::new(columns, CELL_PADDING, ROW_HEIGHT));

    let mut engine = GridLayoutEngine::default();
    engine.set_delegate(&delegate);
    let row_lengths: Vec<usize> = texts.iter().map(Vec::len).collect();
    if let Err(e) = engine.set_grid_from_row_lengths(&row_lengths) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    if let Err(e) = engine.relayout() {
        eprintln!("Error laying out grid: {e}");
        process::exit(1);
    }

    let offset = xlgrid::ViewportOffset::new(options.scroll.0, options.scroll.1)
        .clamped(engine.content_extent(), options.viewport);
    engine.set_viewport_offset(offset.x, offset.y);
    if let Err(e) = engine.relayout() {
        eprintln!("Error laying out grid: {e}");
        process::exit(1);
    }

    let visible: Vec<_> = engine
        .visible_cells(options.viewport)
        .into_iter()
        .map(|cell| {
            let text = texts
                .get(cell.row)
                .and_then(|row| row.get(cell.column))
                .cloned()
                .unwrap_or_default();
            json!({
                "row": cell.row,
                "column": cell.column,
                "frame": cell.frame,
                "tier": cell.tier,
                "text": text,
            })
        })
        .collect();

    let output = json!({
        "contentExtent": engine.content_extent(),
        "offset": offset,
        "columnWidths": engine.column_widths(),
        "visible": visible,
    });

    let json = match serde_json::to_string_pretty(&output) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {e}");
            process::exit(1);
        }
    };
    let mut stdout = io::stdout();
    if let Err(e) = writeln!(stdout, "{json}") {
        eprintln!("Error writing output: {e}");
        process::exit(1);
    }
}
