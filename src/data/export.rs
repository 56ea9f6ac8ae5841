use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::Record;

/// Write the selection to `path`.  Dispatch by extension (`.csv` / `.json`).
pub fn export_file(path: &Path, columns: &[String], records: &[Record]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = match ext.as_str() {
        "csv" | "json" => std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?,
        other => bail!("Unsupported export extension: .{other}"),
    };

    if ext == "csv" {
        write_csv(file, columns, records)
    } else {
        write_json(file, records)
    }
}

/// CSV with the given column order, values as shown in the raw-data table.
pub fn write_csv<W: Write>(out: W, columns: &[String], records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(columns).context("writing CSV header")?;
    for rec in records {
        writer
            .write_record(columns.iter().map(|c| rec.cell(c)))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Records-oriented JSON array, readable by the JSON loader.
pub fn write_json<W: Write>(out: W, records: &[Record]) -> Result<()> {
    serde_json::to_writer_pretty(out, records).context("writing JSON")
}
