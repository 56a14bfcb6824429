use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, NaiveDateTime, Utc};

use super::board::BoardDimensions;
use super::sample::Sample;

/// Descriptive metadata shipped alongside a recorded session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "user_name")]
    pub user: Option<String>,
    #[serde(default, alias = "platform_name")]
    pub platform: Option<String>,
    /// Accepts RFC 3339 or "YYYY-MM-DD HH:MM:SS"; anything else is dropped
    #[serde(default, deserialize_with = "deserialize_started_at")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    #[serde(default)]
    pub board_width_cm: Option<f64>,
    #[serde(default)]
    pub board_height_cm: Option<f64>,
}

fn deserialize_started_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// A loaded recording: metadata plus the full ordered sample history
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub info: SessionInfo,
    pub samples: Vec<Sample>,
}

impl Session {
    pub fn new(info: SessionInfo, samples: Vec<Sample>) -> Self {
        Self { info, samples }
    }

    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self::new(SessionInfo::default(), samples)
    }

    /// Board size recorded with the session, or `fallback` when absent or invalid
    pub fn board(&self, fallback: BoardDimensions) -> BoardDimensions {
        match (self.info.board_width_cm, self.info.board_height_cm) {
            (Some(w), Some(h)) if BoardDimensions::new(w, h).is_valid() => BoardDimensions::new(w, h),
            _ => fallback,
        }
    }

    /// Recorded duration in seconds, derived from timestamps when not stored
    pub fn duration_secs(&self) -> f64 {
        if let Some(duration) = self.info.duration_sec {
            return duration;
        }
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => ((last.t - first.t) / 1000.0).max(0.0),
            _ => 0.0,
        }
    }

    pub fn title(&self) -> String {
        match self.info.id {
            Some(id) => format!("Session #{}", id),
            None => "Session".to_string(),
        }
    }

    /// One-line summary for the header bar
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(user) = &self.info.user {
            parts.push(user.clone());
        }
        if let Some(platform) = &self.info.platform {
            parts.push(platform.clone());
        }
        if let Some(started) = self.info.started_at {
            parts.push(started.format("%Y-%m-%d %H:%M:%S").to_string());
        }
        parts.push(format!("{} samples", self.samples.len()));
        parts.push(format!("{:.1}s", self.duration_secs()));
        parts.join("  |  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_prefers_session_dimensions() {
        let mut session = Session::from_samples(Vec::new());
        assert_eq!(session.board(BoardDimensions::default()), BoardDimensions::default());

        session.info.board_width_cm = Some(60.0);
        session.info.board_height_cm = Some(40.0);
        assert_eq!(session.board(BoardDimensions::default()), BoardDimensions::new(60.0, 40.0));

        session.info.board_height_cm = Some(0.0);
        assert_eq!(session.board(BoardDimensions::default()), BoardDimensions::default());
    }

    #[test]
    fn test_duration_from_timestamps() {
        let session = Session::from_samples(vec![
            Sample::new(500.0, [0.0; 4], 0.0, 0.0),
            Sample::new(2500.0, [0.0; 4], 0.0, 0.0),
        ]);
        assert_eq!(session.duration_secs(), 2.0);
    }

    #[test]
    fn test_started_at_formats() {
        let info: SessionInfo = serde_json::from_str(r#"{"started_at": "2024-03-01 10:15:00"}"#).unwrap();
        assert!(info.started_at.is_some());

        let info: SessionInfo = serde_json::from_str(r#"{"started_at": "2024-03-01T10:15:00Z"}"#).unwrap();
        assert!(info.started_at.is_some());

        let info: SessionInfo = serde_json::from_str(r#"{"started_at": "yesterday"}"#).unwrap();
        assert!(info.started_at.is_none());
    }

    #[test]
    fn test_summary_lists_metadata() {
        let mut session = Session::from_samples(vec![Sample::new(0.0, [0.0; 4], 0.0, 0.0)]);
        session.info.user = Some("Alice".to_string());
        session.info.duration_sec = Some(12.0);
        assert_eq!(session.summary(), "Alice  |  1 samples  |  12.0s");
    }
}
