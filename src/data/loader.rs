use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, Record, REQUIRED_COLUMNS};

/// Where the penguins table is published.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/allisonhorst/palmerpenguins/main/inst/extdata/penguins.csv";

/// Tokens read as missing, mirroring the pandas `read_csv` defaults.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Errors and sources
// ---------------------------------------------------------------------------

/// The dataset could not be fetched, read or parsed.
#[derive(Debug, Error)]
#[error("dataset unavailable from {origin}: {reason:#}")]
pub struct DataUnavailable {
    pub origin: String,
    reason: anyhow::Error,
}

impl DataUnavailable {
    pub fn new(origin: impl Into<String>, reason: anyhow::Error) -> Self {
        Self {
            origin: origin.into(),
            reason,
        }
    }

    /// Underlying failure with its context chain.
    pub fn reason(&self) -> &anyhow::Error {
        &self.reason
    }
}

/// A location the dataset can be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean the dataset from `source`.
pub fn load(source: &DataSource, timeout: Duration) -> Result<Dataset, DataUnavailable> {
    let result = match source {
        DataSource::Url(url) => fetch(url, timeout).and_then(|body| read_csv(body.as_slice())),
        DataSource::File(path) => load_file(path),
    };

    match result {
        Ok(dataset) => {
            if dataset.is_empty() {
                log::warn!("Every row from {source} had a missing value");
            } else {
                log::info!("Loaded {} penguins from {source}", dataset.len());
            }
            Ok(dataset)
        }
        Err(e) => {
            log::error!("Failed to load {source}: {e:#}");
            Err(DataUnavailable::new(source.to_string(), e))
        }
    }
}

/// Load a table from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one penguin per line
/// * `.json`    – `[{ "species": "Adelie", "island": ..., ... }, ...]`
/// * `.parquet` – flat columns, nulls count as missing
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    log::debug!("GET {url}");
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let response = agent
        .get(url)
        .call()
        .map_err(|e| anyhow::anyhow!("GET {url} failed: {e}"))?;

    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .context("reading response body")?;
    log::debug!("Fetched {} bytes", body.len());
    Ok(body)
}

// ---------------------------------------------------------------------------
// RawTable – cells before cleaning
// ---------------------------------------------------------------------------

/// Source cells before cleaning; `None` marks a missing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Drop every row with a missing cell, then type the survivors.
    ///
    /// An empty result is a valid, empty dataset.
    pub fn into_dataset(self) -> Result<Dataset> {
        let layout = ColumnLayout::resolve(&self.columns)?;
        let total = self.rows.len();

        let records = self
            .rows
            .into_iter()
            .enumerate()
            .filter_map(|(row_no, cells)| complete(cells).map(|cells| (row_no, cells)))
            .map(|(row_no, cells)| layout.record(&self.columns, cells, row_no))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let dropped = total - records.len();
        if dropped > 0 {
            log::debug!("Dropped {dropped} of {total} rows with missing values");
        }

        Ok(Dataset::from_records(records, self.columns))
    }
}

fn complete(cells: Vec<Option<String>>) -> Option<Vec<String>> {
    cells.into_iter().collect()
}

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

/// Positions of the required columns within a source header.
struct ColumnLayout {
    species: usize,
    island: usize,
    sex: usize,
    bill_length_mm: usize,
    bill_depth_mm: usize,
    body_mass_g: usize,
}

impl ColumnLayout {
    fn resolve(columns: &[String]) -> Result<Self> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .with_context(|| format!("source missing '{name}' column"))
        };
        Ok(Self {
            species: find("species")?,
            island: find("island")?,
            sex: find("sex")?,
            bill_length_mm: find("bill_length_mm")?,
            bill_depth_mm: find("bill_depth_mm")?,
            body_mass_g: find("body_mass_g")?,
        })
    }

    /// Type a complete row. `Ok(None)` when a measurement spells NaN in a
    /// form the token list misses (`NAN`, `+nan`, ...); infinities are errors.
    fn record(
        &self,
        columns: &[String],
        cells: Vec<String>,
        row_no: usize,
    ) -> Result<Option<Record>> {
        let number = |idx: usize| -> Result<f64> {
            let cell = &cells[idx];
            let value = cell.trim().parse::<f64>().with_context(|| {
                format!("Row {row_no}, {}: '{cell}' is not a number", columns[idx])
            })?;
            if value.is_infinite() {
                bail!("Row {row_no}, {}: '{cell}' is not a finite number", columns[idx]);
            }
            Ok(value)
        };
        let bill_length_mm = number(self.bill_length_mm)?;
        let bill_depth_mm = number(self.bill_depth_mm)?;
        let body_mass_g = number(self.body_mass_g)?;
        if [bill_length_mm, bill_depth_mm, body_mass_g].iter().any(|v| v.is_nan()) {
            return Ok(None);
        }

        let extra = columns
            .iter()
            .zip(cells.iter())
            .filter(|(name, _)| !REQUIRED_COLUMNS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect::<BTreeMap<_, _>>();

        Ok(Some(Record {
            species: cells[self.species].clone(),
            island: cells[self.island].clone(),
            sex: cells[self.sex].clone(),
            bill_length_mm,
            bill_depth_mm,
            body_mass_g,
            extra,
        }))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one penguin per line.
/// Short rows are padded with missing cells.
pub fn read_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = (0..columns.len())
            .map(|i| record.get(i).filter(|c| !is_missing(c)).map(str::to_string))
            .collect();
        rows.push(cells);
    }

    RawTable { columns, rows }.into_dataset()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "species": "Adelie", "island": "Torgersen", "bill_length_mm": 39.1, ... },
///   ...
/// ]
/// ```
///
/// `null` and absent keys count as missing.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

pub fn read_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).and_then(json_cell))
                .collect()
        })
        .collect();

    RawTable { columns, rows }.into_dataset()
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nulls and float NaNs count as missing.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    RawTable { columns, rows }.into_dataset()
}

/// Text of a single Arrow cell, `None` when null or NaN.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => {
            let v = col.as_primitive::<Float32Type>().value(row);
            if v.is_nan() {
                return Ok(None);
            }
            v.to_string()
        }
        DataType::Float64 => {
            let v = col.as_primitive::<Float64Type>().value(row);
            if v.is_nan() {
                return Ok(None);
            }
            v.to_string()
        }
        _ => array_value_to_string(col, row)
            .with_context(|| format!("formatting {:?} cell", col.data_type()))?,
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use pretty_assertions::assert_eq;

    use super::*;

    const PENGUINS_CSV: &str = "\
species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year
Adelie,Torgersen,39.1,18.7,181,3750,male,2007
Adelie,Torgersen,39.5,17.4,186,3800,female,2007
Adelie,Torgersen,NA,NA,NA,NA,NA,2007
Adelie,Torgersen,36.7,19.3,193,3450,female,2007
Gentoo,Biscoe,44.5,14.3,216,4100,NA,2007
Gentoo,Biscoe,46.1,13.2,211,4500,female,2007
";

    #[test]
    fn csv_rows_with_missing_values_are_dropped() {
        let ds = read_csv(PENGUINS_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        assert!(ds.records.iter().all(|r| r.sex != "NA"));
        assert_eq!(
            ds.records.iter().map(|r| r.body_mass_g).collect::<Vec<_>>(),
            vec![3750.0, 3800.0, 3450.0, 4500.0]
        );
    }

    #[test]
    fn csv_keeps_extra_columns_in_source_order() {
        let ds = read_csv(PENGUINS_CSV.as_bytes()).unwrap();
        assert_eq!(
            ds.column_names,
            vec![
                "species",
                "island",
                "bill_length_mm",
                "bill_depth_mm",
                "flipper_length_mm",
                "body_mass_g",
                "sex",
                "year"
            ]
        );
        let first = &ds.records[0];
        assert_eq!(first.extra.get("flipper_length_mm").map(String::as_str), Some("181"));
        assert_eq!(first.extra.get("year").map(String::as_str), Some("2007"));
    }

    #[test]
    fn missing_value_in_extra_column_drops_row() {
        let csv = "species,island,sex,bill_length_mm,bill_depth_mm,body_mass_g,year\n\
                   Adelie,Dream,male,39.0,18.0,3700,\n\
                   Adelie,Dream,male,40.0,18.5,3900,2008\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].body_mass_g, 3900.0);
    }

    #[test]
    fn all_rows_incomplete_yields_empty_dataset() {
        let csv = "species,island,sex,bill_length_mm,bill_depth_mm,body_mass_g\n\
                   Adelie,Dream,NA,39.0,18.0,3700\n\
                   Gentoo,Biscoe,,46.0,14.0,5000\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.mass_bounds(), None);
    }

    #[test]
    fn short_rows_count_as_missing() {
        let csv = "species,island,sex,bill_length_mm,bill_depth_mm,body_mass_g\n\
                   Adelie,Dream,male,39.0,18.0\n\
                   Adelie,Dream,male,39.0,18.0,3700\n";
        assert_eq!(read_csv(csv.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv = "species,island,sex,bill_length_mm,bill_depth_mm\nAdelie,Dream,male,39.0,18.0\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("body_mass_g"));
    }

    #[test]
    fn non_numeric_measurement_is_an_error() {
        let csv = "species,island,sex,bill_length_mm,bill_depth_mm,body_mass_g\n\
                   Adelie,Dream,male,long,18.0,3700\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("'long' is not a number"));
    }

    #[test]
    fn json_nulls_and_absent_keys_are_missing() {
        let json = r#"[
            {"species": "Adelie", "island": "Dream", "sex": "male",
             "bill_length_mm": 39.0, "bill_depth_mm": 18.0, "body_mass_g": 3700},
            {"species": "Adelie", "island": "Dream", "sex": null,
             "bill_length_mm": 40.0, "bill_depth_mm": 18.2, "body_mass_g": 3800},
            {"species": "Gentoo", "island": "Biscoe",
             "bill_length_mm": 46.0, "bill_depth_mm": 14.0, "body_mass_g": 5000}
        ]"#;
        let ds = read_json(json).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].bill_length_mm, 39.0);
        assert_eq!(ds.records[0].body_mass_g, 3700.0);
    }

    #[test]
    fn json_keeps_source_column_order() {
        let json = r#"[
            {"species": "Adelie", "island": "Dream", "bill_length_mm": 39.0,
             "bill_depth_mm": 18.0, "body_mass_g": 3700, "sex": "male", "year": 2008}
        ]"#;
        let ds = read_json(json).unwrap();
        assert_eq!(
            ds.column_names,
            vec!["species", "island", "bill_length_mm", "bill_depth_mm", "body_mass_g", "sex", "year"]
        );
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(read_json(r#"{"species": "Adelie"}"#).is_err());
        assert!(read_json(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("penguins.csv");
        std::fs::write(&csv_path, PENGUINS_CSV).unwrap();
        assert_eq!(load_file(&csv_path).unwrap().len(), 4);

        let txt_path = dir.path().join("penguins.txt");
        std::fs::write(&txt_path, PENGUINS_CSV).unwrap();
        let err = load_file(&txt_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn parquet_nulls_and_nans_are_missing() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, false),
            Field::new("island", DataType::Utf8, false),
            Field::new("sex", DataType::Utf8, true),
            Field::new("bill_length_mm", DataType::Float64, true),
            Field::new("bill_depth_mm", DataType::Float64, true),
            Field::new("body_mass_g", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Adelie", "Adelie", "Gentoo"])),
                Arc::new(StringArray::from(vec!["Dream", "Dream", "Biscoe"])),
                Arc::new(StringArray::from(vec![Some("male"), None, Some("female")])),
                Arc::new(Float64Array::from(vec![39.0, 40.0, f64::NAN])),
                Arc::new(Float64Array::from(vec![18.0, 18.2, 14.0])),
                Arc::new(Int64Array::from(vec![3700, 3800, 5000])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("penguins.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].species, "Adelie");
        assert_eq!(ds.records[0].body_mass_g, 3700.0);
    }

    #[test]
    fn unreadable_file_source_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::File(dir.path().join("absent.csv"));
        let err = load(&source, Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.origin, source.to_string());
        assert!(err.to_string().starts_with("dataset unavailable from"));
    }

    #[test]
    fn nan_spellings_outside_token_list_drop_the_row() {
        let csv = "species,island,sex,bill_length_mm,bill_depth_mm,body_mass_g\n\
                   Adelie,Dream,male,NAN,18.0,3700\n\
                   Adelie,Dream,male,39.0,+nan,3700\n\
                   Adelie,Dream,female,38.0,17.5,3400\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert!(ds.records[0].bill_length_mm.is_finite());
        assert_eq!(ds.mass_bounds(), Some((3400.0, 3400.0)));
    }

    #[test]
    fn infinite_measurement_is_an_error() {
        for cell in ["inf", "-Infinity", "INF"] {
            let csv = format!(
                "species,island,sex,bill_length_mm,bill_depth_mm,body_mass_g\n\
                 Adelie,Dream,male,39.0,18.0,{cell}\n"
            );
            let err = read_csv(csv.as_bytes()).unwrap_err();
            assert!(format!("{err:#}").contains("is not a finite number"), "{cell}");
        }
    }

    #[test]
    fn unreachable_url_is_data_unavailable() {
        let url = "http://127.0.0.1:1/penguins.csv";
        let source = DataSource::Url(url.to_string());
        let err = load(&source, Duration::from_millis(500)).unwrap_err();
        assert_eq!(err.origin, url);
        assert!(format!("{:#}", err.reason()).contains(&format!("GET {url} failed")));
    }
}
