//! Artifact export: equity curve and order tape as CSV, report and full
//! result as JSON.
//!
//! All writers take any `io::Write` so tests can target memory; `save_artifacts`
//! lays the files out under one directory per run.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use barsim_core::domain::{EquityPoint, Order};

use crate::runner::{BacktestResult, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported schema version {found} (max supported: {max})")]
    SchemaVersion { found: u32, max: u32 },
}

/// Files written by [`save_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub result_json: PathBuf,
    pub report_json: PathBuf,
    pub equity_csv: PathBuf,
    pub orders_csv: PathBuf,
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: timestamp, equity
pub fn write_equity_csv<W: Write>(writer: W, curve: &[EquityPoint]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "equity"])?;
    for p in curve {
        wtr.write_record([p.timestamp.to_rfc3339(), format!("{:.6}", p.equity)])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Columns: id, timestamp, symbol, side, type, quantity, price, commission, status
pub fn write_orders_csv<W: Write>(writer: W, orders: &[Order]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "id",
        "timestamp",
        "symbol",
        "side",
        "type",
        "quantity",
        "price",
        "commission",
        "status",
    ])?;
    for o in orders {
        wtr.write_record([
            o.id.to_string(),
            o.timestamp.to_rfc3339(),
            o.symbol.clone(),
            o.side.to_string(),
            format!("{:?}", o.order_type),
            format!("{:.8}", o.quantity),
            format!("{:.6}", o.price),
            format!("{:.6}", o.commission()),
            format!("{:?}", o.status),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

// ─── JSON export ────────────────────────────────────────────────────

/// Pretty JSON of the performance report alone.
pub fn write_report_json<W: Write>(mut writer: W, result: &BacktestResult) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, &result.report)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Pretty JSON of the whole result.
pub fn export_json(result: &BacktestResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Deserialize a result, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult, ExportError> {
    let result: BacktestResult = serde_json::from_str(json)?;
    if result.schema_version > SCHEMA_VERSION {
        return Err(ExportError::SchemaVersion {
            found: result.schema_version,
            max: SCHEMA_VERSION,
        });
    }
    Ok(result)
}

// ─── Directory layout ───────────────────────────────────────────────

/// Write all artifacts under `<root>/<run_id>/`.
pub fn save_artifacts(root: &Path, result: &BacktestResult) -> Result<ArtifactPaths, ExportError> {
    let dir = root.join(&result.run_id);
    fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
        path: dir.clone(),
        source,
    })?;

    let paths = ArtifactPaths {
        result_json: dir.join("result.json"),
        report_json: dir.join("report.json"),
        equity_csv: dir.join("equity.csv"),
        orders_csv: dir.join("orders.csv"),
        dir,
    };

    write_report_json(create(&paths.report_json)?, result)?;
    write_equity_csv(create(&paths.equity_csv)?, &result.equity_curve)?;
    write_orders_csv(create(&paths.orders_csv)?, &result.orders)?;
    let mut out = create(&paths.result_json)?;
    out.write_all(export_json(result)?.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|source| ExportError::Io {
            path: paths.result_json.clone(),
            source,
        })?;

    Ok(paths)
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}
