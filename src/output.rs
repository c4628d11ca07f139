// src/output.rs
//! CSV Export for the Report Layer
//!
//! On-disk contract consumed by downstream reporting:
//! - `{prefix}_metrics.csv`: `Metric,Value` rows from [`RiskMetrics::entries`]
//! - `{prefix}_percentiles.csv`: the explicit percentile table — the report
//!   generator reads these values instead of recomputing percentiles with a
//!   different rule
//! - `{prefix}_returns_sample.csv`: a bounded random sample of
//!   (return, final value) pairs for plotting, capped at
//!   [`RETURNS_SAMPLE_CAP`] rows regardless of the total simulation count
//! - `{prefix}_summary.csv`: run timestamp, path count, elapsed time and
//!   throughput

use crate::mc::engine::SimulationResult;
use crate::metrics::PercentileRow;
use crate::rng::RngFactory;
use bitflags::bitflags;
use chrono::Local;
use std::fs::File;
use std::io::{self, Write};

/// Maximum rows written to the returns sample file
pub const RETURNS_SAMPLE_CAP: usize = 100_000;

bitflags! {
    /// Selects which export artifacts to produce
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExportConfig: u32 {
        const METRICS        = 1 << 0;
        const PERCENTILES    = 1 << 1;
        const RETURNS_SAMPLE = 1 << 2;
        const SUMMARY        = 1 << 3;
        const ALL = Self::METRICS.bits()
            | Self::PERCENTILES.bits()
            | Self::RETURNS_SAMPLE.bits()
            | Self::SUMMARY.bits();
    }
}

pub fn write_metrics_csv(filename: &str, result: &SimulationResult) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "Metric,Value")?;
    for (name, value) in result.metrics.entries() {
        writeln!(file, "{},{:.6}", name, value)?;
    }
    Ok(())
}

pub fn write_percentiles_csv(filename: &str, table: &[PercentileRow]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "Percentile,Return,Value")?;
    for row in table {
        writeln!(
            file,
            "{}%,{:.2}%,{}",
            row.percentile,
            row.value * 100.0,
            row.value
        )?;
    }
    Ok(())
}

/// Write a seeded random sample of (return, final value) pairs
///
/// Sampling is without replacement and deterministic for a given factory
/// seed; the sample size is `min(cap, n_simulations)`.
pub fn write_returns_sample_csv(
    filename: &str,
    result: &SimulationResult,
    factory: &RngFactory,
    cap: usize,
) -> io::Result<()> {
    let n = result.returns.len();
    let sample_size = cap.min(n);
    let mut rng = factory.aux_rng();
    let indices = rand::seq::index::sample(&mut rng, n, sample_size);

    let mut file = File::create(filename)?;
    writeln!(file, "Return,Final_Value")?;
    for idx in indices.iter() {
        writeln!(file, "{},{}", result.returns[idx], result.final_values[idx])?;
    }
    Ok(())
}

pub fn write_summary_csv(filename: &str, result: &SimulationResult) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "timestamp,{}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file, "n_simulations,{}", result.final_values.len())?;
    writeln!(file, "initial_value,{}", result.initial_value)?;
    writeln!(file, "elapsed_secs,{:.3}", result.elapsed_secs)?;
    writeln!(file, "paths_per_sec,{:.0}", result.paths_per_sec)?;
    Ok(())
}

/// Export the selected artifacts, returning the filenames written
pub fn export_results(
    prefix: &str,
    result: &SimulationResult,
    factory: &RngFactory,
    config: ExportConfig,
) -> io::Result<Vec<String>> {
    let mut written = Vec::new();

    if config.contains(ExportConfig::METRICS) {
        let filename = format!("{}_metrics.csv", prefix);
        write_metrics_csv(&filename, result)?;
        written.push(filename);
    }

    if config.contains(ExportConfig::PERCENTILES) {
        let filename = format!("{}_percentiles.csv", prefix);
        write_percentiles_csv(&filename, &result.metrics.percentile_table())?;
        written.push(filename);
    }

    if config.contains(ExportConfig::RETURNS_SAMPLE) {
        let filename = format!("{}_returns_sample.csv", prefix);
        write_returns_sample_csv(&filename, result, factory, RETURNS_SAMPLE_CAP)?;
        written.push(filename);
    }

    if config.contains(ExportConfig::SUMMARY) {
        let filename = format!("{}_summary.csv", prefix);
        write_summary_csv(&filename, result)?;
        written.push(filename);
    }

    Ok(written)
}
