pub mod csv;
pub mod http;
pub mod json;

pub use self::csv::parse_csv;
pub use self::http::fetch_session;
pub use self::json::parse_json;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::Session;

/// Errors raised while fetching a recorded session
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid sample CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("could not find a column named any of {0:?}")]
    MissingColumn(&'static [&'static str]),
    #[error("row {row}: bad value {value:?} in column '{column}'")]
    BadValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unrecognized session format")]
    UnknownFormat,
}

/// Where the session history comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    pub fn describe(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Url(url) => url.clone(),
        }
    }
}

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of a payload by peeking at its content
pub fn detect_format(data: &[u8]) -> InputFormat {
    let first = data.iter().copied().find(|b| !b.is_ascii_whitespace());
    match first {
        Some(b'[') | Some(b'{') => InputFormat::Json,
        Some(_) if is_csv(data) => InputFormat::Csv,
        _ => InputFormat::Unknown,
    }
}

fn is_csv(data: &[u8]) -> bool {
    // Header line with several comma separated names in the first 500 bytes
    let sample = &data[..data.len().min(500)];
    match std::str::from_utf8(sample) {
        Ok(text) => text
            .lines()
            .take(5)
            .any(|line| line.chars().filter(|&c| c == ',').count() >= 2),
        // Truncation may have split a multi-byte character
        Err(e) => std::str::from_utf8(&sample[..e.valid_up_to()])
            .map(|text| text.lines().take(5).any(|line| line.matches(',').count() >= 2))
            .unwrap_or(false),
    }
}

/// Parse a session payload, auto-detecting its format
pub fn parse_session(data: &[u8]) -> Result<Session, LoadError> {
    let session = match detect_format(data) {
        InputFormat::Json => parse_json(data)?,
        InputFormat::Csv => parse_csv(data)?,
        InputFormat::Unknown => return Err(LoadError::UnknownFormat),
    };
    Ok(normalize(session))
}

/// Load a session from a file on disk
pub fn load_file(path: &Path) -> Result<Session, LoadError> {
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_session(&data)
}

/// Perform the single read for a session, whatever its source
pub fn load(source: &Source) -> Result<Session, LoadError> {
    let session = match source {
        Source::File(path) => load_file(path)?,
        Source::Url(url) => fetch_session(url)?,
    };
    info!("Loaded {} samples from {}", session.samples.len(), source.describe());
    Ok(session)
}

/// Enforce timestamp ordering and flag suspicious readings.
///
/// Recorded data is never rejected here; rendering clamps whatever is left.
fn normalize(mut session: Session) -> Session {
    let out_of_order = session
        .samples
        .windows(2)
        .filter(|pair| pair[1].t < pair[0].t)
        .count();
    if out_of_order > 0 {
        warn!("{} samples are out of timestamp order, sorting", out_of_order);
        session.samples.sort_by(|a, b| a.t.total_cmp(&b.t));
    }

    let negative = session
        .samples
        .iter()
        .filter(|s| s.weights().iter().any(|w| *w < 0.0))
        .count();
    if negative > 0 {
        warn!("{} samples contain negative weight readings", negative);
    }

    let off_board = session
        .samples
        .iter()
        .filter(|s| !(-1.0..=1.0).contains(&s.cx) || !(-1.0..=1.0).contains(&s.cy))
        .count();
    if off_board > 0 {
        warn!("{} samples have normalized coordinates outside [-1, 1]", off_board);
    }

    session
}
