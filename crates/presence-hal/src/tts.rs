//! [`TtsStatusClient`] – playback-status probe for the speech server.
//!
//! Polls `GET {base_url}/status` and reads the `is_playing` flag.  Every
//! failure mode (non-200, timeout, refused connection, malformed JSON) is
//! reported as "not playing".

use std::time::Duration;

use presence_types::PresenceError;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::playback::PlaybackStatusSource;

/// Default timeout for a single status poll.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(1);

/// Raw shape of the `/status` JSON response.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub is_playing: bool,
}

/// Blocking HTTP client for the speech server's status endpoint.
pub struct TtsStatusClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl TtsStatusClient {
    /// Create a client for the speech server at `base_url`
    /// (e.g. `"http://localhost:5001"`).
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::Transport`] if the HTTP client cannot be
    /// built (TLS backend initialisation failure).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PresenceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PresenceError::Transport(format!("failed to build status client: {e}")))?;
        Ok(Self {
            url: status_url(base_url),
            client,
        })
    }

    /// Fetch and decode the status document.
    ///
    /// # Errors
    ///
    /// [`PresenceError::Transport`] when the request fails or times out,
    /// [`PresenceError::BadResponse`] for a non-200 status or an undecodable
    /// body.
    pub fn fetch(&self) -> Result<StatusResponse, PresenceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| PresenceError::Transport(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(PresenceError::BadResponse(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json::<StatusResponse>()
            .map_err(|e| PresenceError::BadResponse(e.to_string()))
    }
}

impl PlaybackStatusSource for TtsStatusClient {
    fn is_playing(&mut self) -> bool {
        match self.fetch() {
            Ok(status) => {
                debug!(is_playing = status.is_playing, "playback status");
                status.is_playing
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "playback status check failed; assuming playback ended");
                false
            }
        }
    }
}

fn status_url(base_url: &str) -> String {
    format!("{}/status", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canned::serve_once;

    #[test]
    fn status_url_appends_path() {
        assert_eq!(status_url("http://localhost:5001"), "http://localhost:5001/status");
        assert_eq!(status_url("http://localhost:5001/"), "http://localhost:5001/status");
    }

    #[test]
    fn missing_flag_means_not_playing() {
        let status: StatusResponse = serde_json::from_str("{}").unwrap();
        assert!(!status.is_playing);

        let status: StatusResponse =
            serde_json::from_str(r#"{"is_playing": true, "queue": 2}"#).unwrap();
        assert!(status.is_playing);
    }

    #[test]
    fn unreachable_server_reads_as_not_playing() {
        // Port 9 (discard) is not served on loopback; the connect is refused.
        let mut client =
            TtsStatusClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        assert!(client.fetch().is_err());
        assert!(!client.is_playing());
    }

    fn poll(status: &str, body: &str) -> (bool, String) {
        let (base_url, server) = serve_once(status, body);
        let mut client = TtsStatusClient::new(&base_url, Duration::from_secs(2)).unwrap();
        let playing = client.is_playing();
        (playing, server.join().unwrap())
    }

    #[test]
    fn playing_flag_is_read_from_status_endpoint() {
        let (playing, request) = poll("200 OK", r#"{"is_playing": true}"#);
        assert!(playing);
        assert_eq!(request, "GET /status HTTP/1.1");
    }

    #[test]
    fn status_without_flag_reads_as_not_playing() {
        assert!(!poll("200 OK", "{}").0);
    }

    #[test]
    fn error_status_reads_as_not_playing() {
        assert!(!poll("503 Service Unavailable", r#"{"is_playing": true}"#).0);
    }

    #[test]
    fn malformed_status_reads_as_not_playing() {
        assert!(!poll("200 OK", "<html>busy</html>").0);
        assert!(!poll("200 OK", r#"{"is_playing": "yes"}"#).0);
    }
}
