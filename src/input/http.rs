use std::time::Duration;
use tracing::debug;

use crate::core::Session;
use super::{parse_session, LoadError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch a session history with one blocking GET
///
/// The endpoint may return either the bare sample array or a full session
/// document; both are handled by [`parse_session`].
pub fn fetch_session(url: &str) -> Result<Session, LoadError> {
    let http_err = |source| LoadError::Http {
        url: url.to_string(),
        source,
    };

    debug!("Fetching session from {}", url);
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(http_err)?;

    let body = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(http_err)?;

    debug!("Received {} bytes", body.len());
    parse_session(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_host_is_http_error() {
        // Port 9 (discard) on localhost is closed on any sane test machine
        let err = fetch_session("http://127.0.0.1:9/api/session/1/samples").unwrap_err();
        assert!(matches!(err, LoadError::Http { .. }));
        assert!(err.to_string().contains("127.0.0.1:9"));
    }

    #[test]
    fn test_invalid_url_is_http_error() {
        let err = fetch_session("not a url").unwrap_err();
        assert!(matches!(err, LoadError::Http { .. }));
    }
}
