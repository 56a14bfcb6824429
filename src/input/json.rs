use serde::Deserialize;

use crate::core::{Sample, Session, SessionInfo};
use super::LoadError;

/// Accepted JSON layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum SessionDocument {
    /// Bare array, as served by the dashboard's samples endpoint
    Samples(Vec<Sample>),
    /// Metadata plus samples
    Full {
        #[serde(default)]
        session: SessionInfo,
        samples: Vec<Sample>,
    },
}

/// Parse a JSON session payload
pub fn parse_json(data: &[u8]) -> Result<Session, LoadError> {
    let document: SessionDocument = serde_json::from_slice(data)?;
    Ok(match document {
        SessionDocument::Samples(samples) => Session::from_samples(samples),
        SessionDocument::Full { session, samples } => Session::new(session, samples),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let data = br#"[{"t": 0, "w0": 1, "w1": 2, "w2": 3, "w3": 4, "cx": 0.1, "cy": 0.2}]"#;
        let session = parse_json(data).unwrap();
        assert_eq!(session.samples.len(), 1);
        assert_eq!(session.info, SessionInfo::default());
    }

    #[test]
    fn test_empty_array_is_valid() {
        let session = parse_json(b"[]").unwrap();
        assert!(session.samples.is_empty());
    }

    #[test]
    fn test_document_with_metadata() {
        let data = br#"{
            "session": {
                "id": 7,
                "user_name": "Bob",
                "platform_name": "Lab board",
                "board_width_cm": 60,
                "board_height_cm": 40
            },
            "samples": [
                {"t": 0, "w0": 1, "w1": 2, "w2": 3, "w3": 4, "cx": 0.1, "cy": 0.2},
                {"t": 16, "w0": 1, "w1": 2, "w2": 3, "w3": 4, "cx": 0.1, "cy": 0.2}
            ]
        }"#;
        let session = parse_json(data).unwrap();
        assert_eq!(session.info.id, Some(7));
        assert_eq!(session.info.user.as_deref(), Some("Bob"));
        assert_eq!(session.info.board_width_cm, Some(60.0));
        assert_eq!(session.samples.len(), 2);
        assert_eq!(session.title(), "Session #7");
    }

    #[test]
    fn test_document_without_metadata() {
        let session = parse_json(br#"{"samples": []}"#).unwrap();
        assert!(session.samples.is_empty());
        assert_eq!(session.info.id, None);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_json(b"[{\"t\": 0"), Err(LoadError::Json(_))));
    }
}
