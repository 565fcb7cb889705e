//! report-runner: headless report runner for the reallocation dashboard.
//!
//! Usage:
//!   report-runner --db data.db --report client-bridge --mode relative
//!   report-runner --data-dir ./Data --report detailed-bridge --client Acme --base Base --revised Revised
//!   report-runner --data-dir ./Data --save-db data.db --report clients

use anyhow::{bail, Context, Result};
use realloc_core::{
    impact::{margin_impact_bars, revenue_impact_bars},
    source::{csv_files, SqliteSource},
    AnchorMode, DatasetStore, RawTable, ReportConfig, ReportEngine,
};
use serde::Serialize;
use std::env;
use std::path::Path;

const REPORTS: &[&str] = &[
    "summary",
    "clients",
    "scenarios",
    "volume-trend",
    "revenue-trend",
    "margin-trend",
    "client-bridge",
    "category-bridge",
    "detailed-bridge",
    "impact",
];

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let report = string_arg(&args, "--report").unwrap_or("summary");
    let source = data_source(&args)?;
    let mode = anchor_mode(&args)?;

    let config = match string_arg(&args, "--config") {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };

    let store = match source {
        Source::Db(db) => SqliteSource::open(db)?.load_store(&config.schema)?,
        Source::CsvDir { dir, save_db } => {
            if let Some(target) = save_db {
                save_csv_to_db(Path::new(dir), target, &config)?;
            }
            csv_files::load_dir(Path::new(dir), &config.schema)?
        }
    };

    let engine = ReportEngine::new(&store, &config);
    let client = || {
        string_arg(&args, "--client").context("--client <name> is required for this report")
    };

    match report {
        "summary" => print_summary(&store, &engine)?,
        "clients" => emit(&store.client_names())?,
        "scenarios" => emit(&store.scenarios())?,
        "volume-trend" => emit(&engine.volume_trend(client()?)?)?,
        "revenue-trend" => emit(&engine.revenue_trend(client()?)?)?,
        "margin-trend" => emit(&engine.margin_trend(client()?)?)?,
        "client-bridge" => emit(&engine.client_waterfall(mode)?)?,
        "category-bridge" => emit(&engine.category_waterfall()?)?,
        "detailed-bridge" => {
            let base = string_arg(&args, "--base").unwrap_or(&config.scenarios.base);
            let revised = string_arg(&args, "--revised").unwrap_or(&config.scenarios.revised);
            emit(&engine.detailed_waterfall(client()?, base, revised)?)?
        }
        "impact" => {
            #[derive(Serialize)]
            struct ImpactReport {
                rows: Vec<realloc_core::impact::ClientImpact>,
                revenue_bars: Vec<realloc_core::impact::BarPoint>,
                margin_bars: Vec<realloc_core::impact::BarPoint>,
            }
            let rows = engine.impact_by_client()?;
            emit(&ImpactReport {
                revenue_bars: revenue_impact_bars(&rows),
                margin_bars: margin_impact_bars(&rows),
                rows,
            })?
        }
        other => bail!("unknown report '{other}'; expected one of {}", REPORTS.join(", ")),
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum Source<'a> {
    Db(&'a str),
    CsvDir {
        dir: &'a str,
        save_db: Option<&'a str>,
    },
}

fn data_source(args: &[String]) -> Result<Source<'_>> {
    let save_db = string_arg(args, "--save-db");
    match (string_arg(args, "--db"), string_arg(args, "--data-dir")) {
        (Some(_), None) if save_db.is_some() => {
            bail!("--save-db only applies to --data-dir; --db already reads from a database")
        }
        (Some(db), None) => Ok(Source::Db(db)),
        (None, Some(dir)) => Ok(Source::CsvDir { dir, save_db }),
        _ => bail!("exactly one of --db <file> or --data-dir <dir> is required"),
    }
}

fn anchor_mode(args: &[String]) -> Result<AnchorMode> {
    match string_arg(args, "--mode") {
        Some(raw) => raw.parse().map_err(anyhow::Error::msg),
        None => Ok(AnchorMode::Relative),
    }
}

/// Stage the CSV tables into a SQLite file, replacing any tables there.
fn save_csv_to_db(dir: &Path, target: &str, config: &ReportConfig) -> Result<()> {
    let schema = &config.schema;
    let tables: Vec<RawTable> = [
        &schema.customers.table,
        &schema.prices.table,
        &schema.categories.table,
        &schema.volumes.table,
    ]
    .into_iter()
    .map(|t| csv_files::read_table(&dir.join(format!("{t}.csv")), t))
    .collect::<Result<_, _>>()?;

    let source = SqliteSource::open(target)?;
    for table in &tables {
        source.import(table)?;
    }
    log::info!("saved {} table(s) to {target}", tables.len());
    Ok(())
}

fn emit<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(store: &DatasetStore, engine: &ReportEngine) -> Result<()> {
    let stats = store.load_stats();
    let bridge = engine.client_bridge()?;
    let scenarios = &engine.config().scenarios;

    println!("=== DATASET ===");
    println!("  customers:  {} ({} dropped)", stats.customers, stats.dropped_customers);
    println!("  prices:     {} ({} dropped)", stats.prices, stats.dropped_prices);
    println!("  categories: {} ({} dropped)", stats.categories, stats.dropped_categories);
    println!("  volumes:    {} ({} dropped)", stats.volumes, stats.dropped_volumes);
    println!("  scenarios:  {}", store.scenarios().join(", "));

    println!();
    println!("=== BRIDGE {} -> {} ===", scenarios.base, scenarios.revised);
    println!("  {:<24} {:>14} {:>14} {:>14}", "client", "base", "revised", "impact");
    for row in &bridge.rows {
        println!(
            "  {:<24} {:>14.1} {:>14.1} {:>14.1}",
            row.label, row.base_total, row.revised_total, row.impact
        );
    }
    println!(
        "  {:<24} {:>14.1} {:>14.1} {:>14.1}",
        "TOTAL",
        bridge.base_total,
        bridge.revised_total,
        bridge.total_impact()
    );
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
