// src/export/mod.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, StringArray, UInt32Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
    sync::Arc,
};
use tracing::info;

use crate::score::LeaderboardEntry;

/// Arrow schema for the leaderboard, one row per owner in rank order.
pub fn leaderboard_schema() -> Schema {
    Schema::new(vec![
        Field::new("rank", DataType::UInt32, false),
        Field::new("owner", DataType::Utf8, false),
        Field::new("championships", DataType::UInt32, false),
        Field::new("championship_years", DataType::Utf8, false),
        Field::new("championship_points", DataType::Float64, false),
        Field::new("seasons", DataType::UInt32, false),
        Field::new("total_wins", DataType::Float64, false),
        Field::new("total_losses", DataType::Float64, false),
        Field::new("games", DataType::Float64, false),
        Field::new("win_rate", DataType::Float64, false),
        Field::new("total_points_for", DataType::Float64, false),
        Field::new("total_points_against", DataType::Float64, false),
        Field::new("point_differential", DataType::Float64, false),
        Field::new("total_transactions", DataType::Float64, false),
        Field::new("legacy_score", DataType::Float64, false),
        Field::new("dynasty_index", DataType::Float64, false),
        Field::new("points_for_per_transaction", DataType::Float64, false),
    ])
}

fn f64_col(entries: &[LeaderboardEntry], f: impl Fn(&LeaderboardEntry) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(entries.iter().map(f)))
}

/// Build the leaderboard as a single record batch.
pub fn leaderboard_batch(entries: &[LeaderboardEntry]) -> Result<RecordBatch> {
    let schema = Arc::new(leaderboard_schema());
    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from_iter_values(1..=entries.len() as u32)),
        Arc::new(StringArray::from_iter_values(
            entries.iter().map(|e| e.owner()),
        )),
        Arc::new(UInt32Array::from_iter_values(
            entries.iter().map(|e| e.summary.championships),
        )),
        Arc::new(StringArray::from_iter_values(
            entries.iter().map(|e| e.summary.championship_years_display()),
        )),
        f64_col(entries, |e| e.summary.championship_points),
        Arc::new(UInt32Array::from_iter_values(
            entries.iter().map(|e| e.summary.seasons),
        )),
        f64_col(entries, |e| e.summary.total_wins),
        f64_col(entries, |e| e.summary.total_losses),
        f64_col(entries, |e| e.summary.games),
        f64_col(entries, |e| e.summary.win_rate),
        f64_col(entries, |e| e.summary.total_points_for),
        f64_col(entries, |e| e.summary.total_points_against),
        f64_col(entries, |e| e.summary.point_differential),
        f64_col(entries, |e| e.summary.total_transactions),
        f64_col(entries, |e| e.legacy_score),
        f64_col(entries, |e| e.dynasty_index),
        f64_col(entries, |e| e.points_for_per_transaction),
    ];
    RecordBatch::try_new(schema, columns).context("building leaderboard record batch")
}

/// Write the leaderboard to a Snappy-compressed Parquet file.
/// Goes through a `.tmp` sibling and renames, so readers never see half a file.
pub fn write_leaderboard_parquet(path: &Path, entries: &[LeaderboardEntry]) -> Result<()> {
    ensure_parent(path)?;
    let batch = leaderboard_batch(entries)?;
    let tmp = path.with_extension("parquet.tmp");

    let file = File::create(&tmp).with_context(|| format!("creating {:?}", &tmp))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))
        .context("creating Arrow writer for leaderboard")?;
    writer.write(&batch).context("writing leaderboard batch")?;
    writer.close().context("closing leaderboard writer")?;
    fs::rename(&tmp, path).with_context(|| format!("moving {:?} into place", &tmp))?;

    info!(path = %path.display(), owners = entries.len(), "wrote leaderboard parquet");
    Ok(())
}

#[derive(Serialize)]
struct LeaderboardCsvRow<'a> {
    rank: usize,
    owner: &'a str,
    championships: u32,
    championship_years: String,
    championship_points: f64,
    total_wins: f64,
    total_losses: f64,
    win_rate: String,
    total_points_for: String,
    total_points_against: String,
    point_differential: String,
    total_transactions: f64,
    legacy_score: String,
    dynasty_index: String,
    points_for_per_transaction: String,
}

/// Write the leaderboard as CSV, rounded the same way the terminal table is.
pub fn write_leaderboard_csv(path: &Path, entries: &[LeaderboardEntry]) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("creating CSV {:?}", path))?;
    for (i, e) in entries.iter().enumerate() {
        let s = &e.summary;
        wtr.serialize(LeaderboardCsvRow {
            rank: i + 1,
            owner: &s.owner,
            championships: s.championships,
            championship_years: s.championship_years_display(),
            championship_points: s.championship_points,
            total_wins: s.total_wins,
            total_losses: s.total_losses,
            win_rate: format!("{:.3}", s.win_rate),
            total_points_for: format!("{:.1}", s.total_points_for),
            total_points_against: format!("{:.1}", s.total_points_against),
            point_differential: format!("{:.1}", s.point_differential),
            total_transactions: s.total_transactions,
            legacy_score: format!("{:.1}", e.legacy_score),
            dynasty_index: format!("{:.1}", e.dynasty_index),
            points_for_per_transaction: format!("{:.1}", e.points_for_per_transaction),
        })?;
    }
    wtr.flush().context("flushing leaderboard CSV")?;
    info!(path = %path.display(), owners = entries.len(), "wrote leaderboard csv");
    Ok(())
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {:?}", parent))?;
    }
    Ok(())
}
