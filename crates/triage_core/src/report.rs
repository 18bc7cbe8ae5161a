use crate::batch::{ImageReport, Outcome, Summary};
use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub const CSV_HEADERS: [&str; 10] = [
    "file",
    "status",
    "category",
    "width",
    "height",
    "unique_colors",
    "mean_brightness",
    "variance",
    "common_ratio",
    "error",
];

/// Export the reports to CSV, one row per image, headers as in [`CSV_HEADERS`].
///
/// Failed rows leave the statistic columns empty and carry the error text.
pub fn export_csv(rows: &[ImageReport], path: impl AsRef<Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADERS)?;

    for report in rows {
        let file = report.file.to_string_lossy();
        match &report.outcome {
            Outcome::Classified { category, stats } => {
                let width = stats.width.to_string();
                let height = stats.height.to_string();
                let unique_colors = stats.unique_colors.to_string();
                let brightness = format!("{:.3}", stats.mean_brightness);
                let variance = format!("{:.3}", stats.variance);
                let common_ratio = format!("{:.4}", stats.common_ratio);
                wtr.write_record([
                    file.as_ref(),
                    "classified",
                    category.as_str(),
                    width.as_str(),
                    height.as_str(),
                    unique_colors.as_str(),
                    brightness.as_str(),
                    variance.as_str(),
                    common_ratio.as_str(),
                    "",
                ])?;
            }
            Outcome::Failed { message } => {
                wtr.write_record([
                    file.as_ref(),
                    "failed",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    images: &'a [ImageReport],
}

/// Export the summary and all reports as pretty-printed JSON.
pub fn export_json(rows: &[ImageReport], path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    let report = JsonReport {
        summary: Summary::from_reports(rows),
        images: rows,
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
    Ok(())
}
