//! Console and CSV output for the plotting collaborator.

use crate::decay::DensityCurve;
use crate::sweep::Sweep;
use serde::Serialize;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Serialize)]
struct SweepRow {
    samples: usize,
    mean_value: f64,
    rejection: f64,
    mean_value_partitioned: f64,
    rejection_partitioned: f64,
    reference: f64,
}

#[derive(Serialize)]
struct CurveRow {
    energy: f64,
    density: f64,
}

/// Write the sweep as CSV, one row per sample count.
///
/// # Errors
///
/// Returns [`ReportError`] when serialisation or the underlying writer fails.
pub fn write_sweep_csv<W: io::Write>(sweep: &Sweep, writer: W) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in sweep.records() {
        csv.serialize(SweepRow {
            samples: record.samples,
            mean_value: record.mean_value,
            rejection: record.rejection,
            mean_value_partitioned: record.mean_value_partitioned,
            rejection_partitioned: record.rejection_partitioned,
            reference: sweep.reference_lifetime,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the density curve as `energy,density` CSV.
///
/// # Errors
///
/// Returns [`ReportError`] when serialisation or the underlying writer fails.
pub fn write_curve_csv<W: io::Write>(curve: &DensityCurve, writer: W) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for (&energy, &density) in curve.energies.iter().zip(&curve.densities) {
        csv.serialize(CurveRow { energy, density })?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the sweep CSV to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ReportError`] when the file cannot be created or written.
pub fn save_sweep(sweep: &Sweep, path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    write_sweep_csv(sweep, file)
}

/// Write the density curve CSV to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ReportError`] when the file cannot be created or written.
pub fn save_curve(curve: &DensityCurve, path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    write_curve_csv(curve, file)
}

/// Render the sweep as a fixed-width console table.
pub fn format_table(sweep: &Sweep) -> String {
    let mut out = format!(
        "{:>10} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
        "samples", "mean-value", "rejection", "mean-value/k", "rejection/k", "reference"
    );
    for record in sweep.records() {
        out.push_str(&format!(
            "{:>10} {:>14.4} {:>14.4} {:>14.4} {:>14.4} {:>14.4}\n",
            record.samples,
            record.mean_value,
            record.rejection,
            record.mean_value_partitioned,
            record.rejection_partitioned,
            sweep.reference_lifetime
        ));
    }
    out
}

/// Errors raised while exporting results.
#[derive(Debug, Error)]
pub enum ReportError {
    /// CSV serialisation failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The output could not be opened or flushed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
