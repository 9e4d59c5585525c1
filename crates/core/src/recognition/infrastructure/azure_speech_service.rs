use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use serde::Deserialize;

use crate::recognition::domain::session_error::SessionError;
use crate::recognition::domain::session_event::SessionEvent;
use crate::recognition::domain::speech_service::{RecognizerHandle, SpeechService};
use crate::shared::constants::{DEFAULT_LOCALE, TICKS_PER_MILLISECOND};
use crate::shared::credentials::Credentials;

const API_VERSION: &str = "2024-11-15";

/// Azure Speech-to-Text adapter over the REST transcription endpoint.
///
/// Uploads the waveform for the configured region and replays the returned
/// phrase list as an ordered event stream: one `Recognized` per phrase, then
/// `SessionStopped`. Any transport or HTTP failure surfaces as a single
/// `Canceled` event carrying the reason. Delivery runs on its own thread;
/// `stop` on the handle halts it at the next phrase boundary.
pub struct AzureSpeechService {
    locale: String,
    endpoint_override: Option<String>,
}

impl AzureSpeechService {
    pub fn new() -> Self {
        Self::with_locale(DEFAULT_LOCALE)
    }

    pub fn with_locale(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            endpoint_override: None,
        }
    }

    /// Point the adapter at a non-default endpoint (self-hosted gateways,
    /// tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    fn endpoint(&self, region: &str) -> String {
        match &self.endpoint_override {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{region}.api.cognitive.microsoft.com/speechtotext/transcriptions:transcribe?api-version={API_VERSION}"
            ),
        }
    }
}

impl Default for AzureSpeechService {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechService for AzureSpeechService {
    fn start_continuous(
        &self,
        audio_path: &Path,
        credentials: &Credentials,
        events: Sender<SessionEvent>,
    ) -> Result<Box<dyn RecognizerHandle>, SessionError> {
        let audio = std::fs::read(audio_path).map_err(|e| SessionError::Init(Box::new(e)))?;

        let request = TranscribeRequest {
            endpoint: self.endpoint(&credentials.region),
            key: credentials.subscription_key.clone(),
            locale: self.locale.clone(),
        };

        let stopped = Arc::new(AtomicBool::new(false));
        let delivery_stopped = stopped.clone();

        thread::spawn(move || match request.send(audio) {
            Ok(response) => {
                log::debug!("service returned {} phrases", response.phrases.len());
                for phrase in response.phrases {
                    if delivery_stopped.load(Ordering::Relaxed) {
                        return;
                    }
                    let event = SessionEvent::Recognized {
                        text: phrase.text,
                        offset_ticks: phrase.offset_milliseconds * TICKS_PER_MILLISECOND,
                    };
                    if events.send(event).is_err() {
                        return;
                    }
                }
                let _ = events.send(SessionEvent::SessionStopped);
            }
            Err(reason) => {
                let _ = events.send(SessionEvent::Canceled(reason));
            }
        });

        Ok(Box::new(AzureRecognizerHandle { stopped }))
    }
}

struct AzureRecognizerHandle {
    stopped: Arc<AtomicBool>,
}

impl RecognizerHandle for AzureRecognizerHandle {
    fn stop(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}

struct TranscribeRequest {
    endpoint: String,
    key: String,
    locale: String,
}

impl TranscribeRequest {
    fn send(&self, audio: Vec<u8>) -> Result<TranscribeResponse, String> {
        let definition = serde_json::json!({ "locales": [self.locale] }).to_string();

        let part = reqwest::blocking::multipart::Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| e.to_string())?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("audio", part)
            .text("definition", definition);

        // No client-side timeout: the session's terminal wait is unbounded
        // by contract; callers add their own.
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| e.to_string())?;

        let response = client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .multipart(form)
            .send()
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(format!("service rejected the request ({status}): {body}"));
        }

        response
            .json::<TranscribeResponse>()
            .map_err(|e| format!("malformed service response: {e}"))
    }
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    phrases: Vec<TranscribedPhrase>,
}

#[derive(Debug, Deserialize)]
struct TranscribedPhrase {
    #[serde(rename = "offsetMilliseconds", default)]
    offset_milliseconds: u64,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_endpoint_includes_region_and_api_version() {
        let service = AzureSpeechService::new();
        let endpoint = service.endpoint("westeurope");
        assert!(endpoint.contains("westeurope.api.cognitive.microsoft.com"));
        assert!(endpoint.contains(API_VERSION));
    }

    #[test]
    fn test_endpoint_override_wins() {
        let service = AzureSpeechService::new().with_endpoint("http://localhost:9000/stt");
        assert_eq!(service.endpoint("westeurope"), "http://localhost:9000/stt");
    }

    #[test]
    fn test_phrase_offsets_convert_to_ticks() {
        let json = r#"{
            "durationMilliseconds": 10000,
            "phrases": [
                {"offsetMilliseconds": 1000, "text": "Hello world"},
                {"offsetMilliseconds": 5000, "text": "Goodbye now"}
            ]
        }"#;
        let response: TranscribeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.phrases.len(), 2);
        assert_eq!(
            response.phrases[0].offset_milliseconds * TICKS_PER_MILLISECOND,
            10_000_000
        );
        assert_eq!(response.phrases[1].text, "Goodbye now");
    }

    #[test]
    fn test_response_without_phrases_parses_empty() {
        let response: TranscribeResponse = serde_json::from_str("{}").unwrap();
        assert!(response.phrases.is_empty());
    }

    #[test]
    fn test_missing_audio_file_is_init_error() {
        let service = AzureSpeechService::new();
        let (tx, _rx) = crossbeam_channel::bounded(4);
        let result = service.start_continuous(
            Path::new("/nonexistent/audio.wav"),
            &Credentials::new("key", "region"),
            tx,
        );
        assert!(matches!(result, Err(SessionError::Init(_))));
    }

    #[test]
    fn test_unreachable_endpoint_emits_canceled() {
        let mut audio = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        audio.write_all(b"RIFF....WAVE").unwrap();

        let service = AzureSpeechService::new()
            .with_endpoint("http://invalid.nonexistent.example.com/transcribe");
        let (tx, rx) = crossbeam_channel::bounded(4);
        let _handle = service
            .start_continuous(audio.path(), &Credentials::new("key", "region"), tx)
            .unwrap();

        match rx.recv_timeout(Duration::from_secs(30)) {
            Ok(SessionEvent::Canceled(_)) => {}
            other => panic!("expected Canceled event, got {other:?}"),
        }
    }
}
