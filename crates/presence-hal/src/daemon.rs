//! [`DaemonClient`] – move-play requests against the robot daemon.
//!
//! Issues `POST {base_url}/api/move/play/recorded-move-dataset/{dataset}/{move}`
//! and reads the `uuid` the daemon assigns to the running move.

use std::time::Duration;

use presence_types::{MoveId, PresenceError, TriggerResult};
use serde::Deserialize;
use tracing::{info, warn};

use crate::move_trigger::MoveTrigger;

/// Default timeout for a single move-play request.
pub const TRIGGER_TIMEOUT: Duration = Duration::from_secs(2);

/// Raw shape of the move-play JSON response.
#[derive(Debug, Deserialize)]
struct PlayResponse {
    #[serde(default)]
    uuid: Option<String>,
}

/// Blocking HTTP client for the movement daemon.
pub struct DaemonClient {
    base_url: String,
    dataset: String,
    client: reqwest::blocking::Client,
}

impl DaemonClient {
    /// Create a client for the daemon at `base_url` (e.g.
    /// `"http://localhost:8100"`) playing moves from `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::Transport`] if the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: impl Into<String>,
        dataset: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PresenceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PresenceError::Transport(format!("failed to build daemon client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            dataset: dataset.into(),
            client,
        })
    }

    /// Endpoint that plays `emotion` from the configured dataset.
    pub fn play_url(&self, emotion: &MoveId) -> String {
        format!(
            "{}/api/move/play/recorded-move-dataset/{}/{}",
            self.base_url, self.dataset, emotion
        )
    }

    /// Ask the daemon to play `emotion`, returning the uuid it assigned.
    ///
    /// # Errors
    ///
    /// [`PresenceError::Transport`] when the request fails or times out,
    /// [`PresenceError::BadResponse`] for a non-200 status or an undecodable
    /// body.
    pub fn play(&self, emotion: &MoveId) -> Result<Option<String>, PresenceError> {
        let response = self
            .client
            .post(self.play_url(emotion))
            .send()
            .map_err(|e| PresenceError::Transport(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(PresenceError::BadResponse(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: PlayResponse = response
            .json()
            .map_err(|e| PresenceError::BadResponse(e.to_string()))?;
        Ok(body.uuid)
    }
}

impl MoveTrigger for DaemonClient {
    fn trigger(&mut self, emotion: &MoveId) -> TriggerResult {
        match self.play(emotion) {
            Ok(uuid) => {
                let result = TriggerResult::accepted(uuid);
                info!(emotion = %emotion, uuid = %result.move_id, "move triggered");
                result
            }
            Err(e) => {
                warn!(emotion = %emotion, error = %e, "failed to trigger move");
                TriggerResult::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canned::serve_once;
    use presence_types::DEFAULT_DATASET;

    #[test]
    fn play_url_embeds_dataset_and_move() {
        let client =
            DaemonClient::new("http://localhost:8100/", DEFAULT_DATASET, TRIGGER_TIMEOUT).unwrap();
        assert_eq!(
            client.play_url(&MoveId::new("cheerful1")),
            "http://localhost:8100/api/move/play/recorded-move-dataset/pollen-robotics/reachy-mini-emotions-library/cheerful1"
        );
    }

    #[test]
    fn response_without_uuid_decodes() {
        let body: PlayResponse = serde_json::from_str("{}").unwrap();
        assert!(body.uuid.is_none());
        let body: PlayResponse = serde_json::from_str(r#"{"uuid":"1f2e"}"#).unwrap();
        assert_eq!(body.uuid.as_deref(), Some("1f2e"));
    }

    #[test]
    fn unreachable_daemon_is_a_failed_trigger() {
        let mut client =
            DaemonClient::new("http://127.0.0.1:9", DEFAULT_DATASET, Duration::from_millis(200))
                .unwrap();
        let result = client.trigger(&MoveId::new("yes1"));
        assert!(!result.success);
        assert_eq!(result.move_id, presence_types::UNKNOWN_MOVE_ID);
    }

    fn play(status: &str, body: &str) -> (TriggerResult, String) {
        let (base_url, server) = serve_once(status, body);
        let mut client =
            DaemonClient::new(&base_url, DEFAULT_DATASET, Duration::from_secs(2)).unwrap();
        let result = client.trigger(&MoveId::new("dance1"));
        (result, server.join().unwrap())
    }

    #[test]
    fn accepted_move_carries_daemon_uuid() {
        let (result, request) = play("200 OK", r#"{"uuid": "abc"}"#);
        assert_eq!(result, TriggerResult::accepted(Some("abc".into())));
        assert_eq!(
            request,
            "POST /api/move/play/recorded-move-dataset/pollen-robotics/reachy-mini-emotions-library/dance1 HTTP/1.1"
        );
    }

    #[test]
    fn accepted_move_without_uuid_is_unknown() {
        let (result, _) = play("200 OK", "{}");
        assert!(result.success);
        assert_eq!(result.move_id, presence_types::UNKNOWN_MOVE_ID);
    }

    #[test]
    fn error_status_is_a_failed_trigger() {
        let (result, _) = play("500 Internal Server Error", r#"{"uuid": "abc"}"#);
        assert_eq!(result, TriggerResult::failed());
    }

    #[test]
    fn malformed_body_is_a_failed_trigger() {
        let (result, _) = play("200 OK", "not json");
        assert_eq!(result, TriggerResult::failed());
    }
}
