use crate::core::{Sample, Session};
use super::LoadError;

const TIME_NAMES: &[&str] = &["t", "t_ms", "time", "timestamp"];
const W0_NAMES: &[&str] = &["w0"];
const W1_NAMES: &[&str] = &["w1"];
const W2_NAMES: &[&str] = &["w2"];
const W3_NAMES: &[&str] = &["w3"];
const CX_NAMES: &[&str] = &["cx", "com_x"];
const CY_NAMES: &[&str] = &["cy", "com_y"];

/// Column indices of a sample CSV header
struct Columns {
    time: usize,
    weights: [usize; 4],
    cx: usize,
    cy: usize,
}

/// Load samples from CSV exported by the recorder
///
/// Expects a header naming the columns; names are matched case-insensitively:
/// - t (or t_ms, time, timestamp): milliseconds since session start
/// - w0..w3: sensor readings in grams
/// - cx, cy (or com_x, com_y): normalized center-of-pressure offsets
pub fn parse_csv(data: &[u8]) -> Result<Session, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = rdr.headers()?.clone();
    let columns = detect_columns(&headers)?;

    let mut samples = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // Row numbers are 1-based and skip the header
        let row = row + 2;

        let field = |idx: usize, column: &'static str| -> Result<f64, LoadError> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse::<f64>().map_err(|_| LoadError::BadValue {
                row,
                column,
                value: raw.to_string(),
            })
        };

        samples.push(Sample::new(
            field(columns.time, "t")?,
            [
                field(columns.weights[0], "w0")?,
                field(columns.weights[1], "w1")?,
                field(columns.weights[2], "w2")?,
                field(columns.weights[3], "w3")?,
            ],
            field(columns.cx, "cx")?,
            field(columns.cy, "cy")?,
        ));
    }

    Ok(Session::from_samples(samples))
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> Result<Columns, LoadError> {
    Ok(Columns {
        time: find_column(headers, TIME_NAMES)?,
        weights: [
            find_column(headers, W0_NAMES)?,
            find_column(headers, W1_NAMES)?,
            find_column(headers, W2_NAMES)?,
            find_column(headers, W3_NAMES)?,
        ],
        cx: find_column(headers, CX_NAMES)?,
        cy: find_column(headers, CY_NAMES)?,
    })
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &'static [&'static str]) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|header| {
            let header_lower = header.to_lowercase();
            names.iter().any(|&name| header_lower == name)
        })
        .ok_or(LoadError::MissingColumn(names))
}
