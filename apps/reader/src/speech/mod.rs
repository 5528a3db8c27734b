//! Speech synthesis client and audio-payload resolution.
//!
//! The synthesis service answers in one of three shapes: raw audio bytes,
//! a JSON body carrying base64 audio, or a JSON body carrying a URL to fetch.
//! A body that does not parse as JSON is taken as raw audio whatever its
//! content type. `extract_audio_source` applies a fixed, ordered rule table
//! to the JSON shapes; `resolve_audio` turns any source into bytes.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;

pub const DEFAULT_SPEECH_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation";
pub const SPEECH_MODEL: &str = "qwen3-tts-flash";
pub const SPEECH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("no usable audio data in synthesis response")]
    NoAudio,

    #[error("invalid base64 audio payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::NoAudio | SpeechError::InvalidEncoding(_) => {
                AppError::Decode(err.to_string())
            }
            SpeechError::Api { status, .. } => AppError::Upstream {
                service: "speech",
                status: Some(status),
                message: err.to_string(),
            },
            SpeechError::Http(ref e) => AppError::Upstream {
                service: "speech",
                status: e.status().map(|s| s.as_u16()),
                message: err.to_string(),
            },
            SpeechError::Timeout(_) => AppError::Upstream {
                service: "speech",
                status: None,
                message: err.to_string(),
            },
        }
    }
}

/// Voice settings for one synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub voice: String,
    pub language: String,
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: "Elias".to_string(),
            language: "Chinese".to_string(),
            rate: 0.8,
        }
    }
}

/// Where the audio for a synthesis response lives.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    Inline(Bytes),
    Encoded(String),
    Location(String),
}

#[derive(Debug, Clone, Copy)]
enum SourceShape {
    Encoded,
    Location,
}

/// Extraction rules, tried in order. First non-empty string wins.
const EXTRACTION_RULES: &[(&str, SourceShape)] = &[
    ("/output/audio/data", SourceShape::Encoded),
    ("/output/audio/url", SourceShape::Location),
    ("/audio/data", SourceShape::Encoded),
    ("/audio/url", SourceShape::Location),
    ("/data", SourceShape::Encoded),
    ("/url", SourceShape::Location),
];

/// Applies `EXTRACTION_RULES` to a JSON synthesis response.
pub fn extract_audio_source(body: &Value) -> Result<AudioSource, SpeechError> {
    for (pointer, shape) in EXTRACTION_RULES {
        let Some(found) = body.pointer(pointer).and_then(Value::as_str) else {
            continue;
        };
        if found.trim().is_empty() {
            continue;
        }
        return Ok(match shape {
            SourceShape::Encoded => AudioSource::Encoded(found.to_string()),
            SourceShape::Location => AudioSource::Location(found.to_string()),
        });
    }
    Err(SpeechError::NoAudio)
}

/// Classifies a successful synthesis body. Empty is `NoAudio`, JSON goes
/// through `extract_audio_source`, anything else is the audio itself.
pub fn classify_body(body: Bytes) -> Result<AudioSource, SpeechError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SpeechError::NoAudio);
    }
    match serde_json::from_slice::<Value>(&body) {
        Ok(json) => extract_audio_source(&json),
        Err(_) => Ok(AudioSource::Inline(body)),
    }
}

pub fn decode_base64_audio(encoded: &str) -> Result<Bytes, SpeechError> {
    let decoded = general_purpose::STANDARD.decode(encoded.trim())?;
    if decoded.is_empty() {
        return Err(SpeechError::NoAudio);
    }
    Ok(Bytes::from(decoded))
}

/// Speech-synthesis collaborator. Returns the finished audio payload.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Bytes, SpeechError>;
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    model: &'a str,
    input: SynthesisInput<'a>,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
    voice: &'a str,
    language_type: &'a str,
    rate: f32,
}

#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    api_key: String,
    url: String,
}

impl SpeechClient {
    pub fn new(api_key: String, url: String) -> Result<Self, SpeechError> {
        Ok(Self {
            client: Client::builder().timeout(SPEECH_TIMEOUT).build()?,
            api_key,
            url,
        })
    }

    async fn request_source(
        &self,
        text: &str,
        voice: &VoiceSettings,
    ) -> Result<AudioSource, SpeechError> {
        let body = SynthesisRequest {
            model: SPEECH_MODEL,
            input: SynthesisInput {
                text,
                voice: &voice.voice,
                language_type: &voice.language,
                rate: voice.rate,
            },
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(timeout_or_http)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Speech API returned {}: {}", status, message);
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let is_audio = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("audio/") || ct == "application/octet-stream");

        let body = response.bytes().await?;
        if is_audio && !body.is_empty() {
            return Ok(AudioSource::Inline(body));
        }
        classify_body(body)
    }

    async fn fetch(&self, url: &str) -> Result<Bytes, SpeechError> {
        let response = self.client.get(url).send().await.map_err(timeout_or_http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message: format!("audio download failed from {url}"),
            });
        }
        Ok(response.bytes().await?)
    }

    /// Turns any `AudioSource` into a non-empty payload.
    pub async fn resolve_audio(&self, source: AudioSource) -> Result<Bytes, SpeechError> {
        let bytes = match source {
            AudioSource::Inline(bytes) => bytes,
            AudioSource::Encoded(encoded) => decode_base64_audio(&encoded)?,
            AudioSource::Location(url) => {
                debug!("Fetching synthesized audio from {}", url);
                self.fetch(&url).await?
            }
        };
        if bytes.is_empty() {
            return Err(SpeechError::NoAudio);
        }
        Ok(bytes)
    }
}

fn timeout_or_http(e: reqwest::Error) -> SpeechError {
    if e.is_timeout() {
        SpeechError::Timeout(SPEECH_TIMEOUT)
    } else {
        SpeechError::Http(e)
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechClient {
    async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Bytes, SpeechError> {
        let source = self.request_source(text, voice).await?;
        let audio = self.resolve_audio(source).await?;
        debug!(bytes = audio.len(), "speech synthesis complete");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const MP3_HEADER: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x0f";

    /// Answers a single HTTP request with the given status, extra headers and body.
    async fn serve_once(status: &'static str, headers: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let head = format!(
                "HTTP/1.1 {status}\r\n{headers}Content-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn client_for(url: String) -> SpeechClient {
        SpeechClient::new("test-key".to_string(), url).unwrap()
    }

    #[test]
    fn test_classify_raw_bytes_as_inline() {
        let source = classify_body(Bytes::from_static(MP3_HEADER)).unwrap();
        assert_eq!(source, AudioSource::Inline(Bytes::from_static(MP3_HEADER)));
    }

    #[test]
    fn test_classify_json_uses_extraction_rules() {
        let body = Bytes::from(json!({"output": {"audio": {"data": "SUQz"}}}).to_string());
        assert_eq!(
            classify_body(body).unwrap(),
            AudioSource::Encoded("SUQz".to_string())
        );
    }

    #[test]
    fn test_classify_empty_body_is_no_audio() {
        assert!(matches!(classify_body(Bytes::new()), Err(SpeechError::NoAudio)));
        assert!(matches!(
            classify_body(Bytes::from_static(b"  \n")),
            Err(SpeechError::NoAudio)
        ));
    }

    #[tokio::test]
    async fn test_raw_audio_without_content_type_is_accepted() {
        let url = serve_once("200 OK", "", MP3_HEADER.to_vec()).await;
        let audio = client_for(url)
            .synthesize("你好。", &VoiceSettings::default())
            .await
            .unwrap();
        assert_eq!(&audio[..], MP3_HEADER);
    }

    #[tokio::test]
    async fn test_audio_content_type_is_accepted() {
        let url = serve_once("200 OK", "Content-Type: audio/mpeg\r\n", MP3_HEADER.to_vec()).await;
        let audio = client_for(url)
            .synthesize("你好。", &VoiceSettings::default())
            .await
            .unwrap();
        assert_eq!(&audio[..], MP3_HEADER);
    }

    #[tokio::test]
    async fn test_json_body_with_encoded_audio() {
        let body = json!({"output": {"audio": {"data": "SUQzBAA="}}}).to_string();
        let url = serve_once("200 OK", "Content-Type: application/json\r\n", body.into_bytes()).await;
        let audio = client_for(url)
            .synthesize("你好。", &VoiceSettings::default())
            .await
            .unwrap();
        assert_eq!(&audio[..], b"ID3\x04\x00");
    }

    #[tokio::test]
    async fn test_json_body_without_audio_is_no_audio() {
        let body = json!({"output": {"finish_reason": "stop"}}).to_string();
        let url = serve_once("200 OK", "Content-Type: application/json\r\n", body.into_bytes()).await;
        let err = client_for(url)
            .synthesize("你好。", &VoiceSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::NoAudio));
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let url = serve_once("503 Service Unavailable", "", b"busy".to_vec()).await;
        let err = client_for(url)
            .synthesize("你好。", &VoiceSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_resolve_inline_passes_bytes_through() {
        let client = client_for(DEFAULT_SPEECH_URL.to_string());
        let audio = client
            .resolve_audio(AudioSource::Inline(Bytes::from_static(MP3_HEADER)))
            .await
            .unwrap();
        assert_eq!(&audio[..], MP3_HEADER);
    }

    #[tokio::test]
    async fn test_resolve_empty_inline_is_no_audio() {
        let client = client_for(DEFAULT_SPEECH_URL.to_string());
        let err = client
            .resolve_audio(AudioSource::Inline(Bytes::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::NoAudio));
    }

    #[tokio::test]
    async fn test_resolve_encoded_decodes_base64() {
        let client = client_for(DEFAULT_SPEECH_URL.to_string());
        let audio = client
            .resolve_audio(AudioSource::Encoded("SUQzBAA=".to_string()))
            .await
            .unwrap();
        assert_eq!(&audio[..], b"ID3\x04\x00");
    }

    #[tokio::test]
    async fn test_resolve_location_fetches_audio() {
        let url = serve_once("200 OK", "Content-Type: audio/mpeg\r\n", MP3_HEADER.to_vec()).await;
        let client = client_for(DEFAULT_SPEECH_URL.to_string());
        let audio = client
            .resolve_audio(AudioSource::Location(url))
            .await
            .unwrap();
        assert_eq!(&audio[..], MP3_HEADER);
    }

    #[tokio::test]
    async fn test_resolve_location_with_empty_download_is_no_audio() {
        let url = serve_once("200 OK", "", Vec::new()).await;
        let client = client_for(DEFAULT_SPEECH_URL.to_string());
        let err = client
            .resolve_audio(AudioSource::Location(url))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::NoAudio));
    }

    #[tokio::test]
    async fn test_resolve_location_failure_is_api_error() {
        let url = serve_once("404 Not Found", "", Vec::new()).await;
        let client = client_for(DEFAULT_SPEECH_URL.to_string());
        let err = client
            .resolve_audio(AudioSource::Location(url))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::Api { status: 404, .. }));
    }

    #[test]
    fn test_extracts_location_from_service_shape() {
        let body = json!({"output": {"audio": {"url": "https://cdn.example/a.mp3", "data": ""}}});
        assert_eq!(
            extract_audio_source(&body).unwrap(),
            AudioSource::Location("https://cdn.example/a.mp3".to_string())
        );
    }

    #[test]
    fn test_encoded_payload_takes_precedence_over_location() {
        let body = json!({"output": {"audio": {"url": "https://cdn.example/a.mp3", "data": "SUQz"}}});
        assert_eq!(
            extract_audio_source(&body).unwrap(),
            AudioSource::Encoded("SUQz".to_string())
        );
    }

    #[test]
    fn test_extracts_flat_shapes() {
        assert_eq!(
            extract_audio_source(&json!({"data": "SUQz"})).unwrap(),
            AudioSource::Encoded("SUQz".to_string())
        );
        assert_eq!(
            extract_audio_source(&json!({"audio": {"url": "u"}})).unwrap(),
            AudioSource::Location("u".to_string())
        );
    }

    #[test]
    fn test_missing_payload_and_location_is_no_audio() {
        let body = json!({"output": {"finish_reason": "stop"}, "request_id": "abc"});
        let err = extract_audio_source(&body).unwrap_err();
        assert!(matches!(err, SpeechError::NoAudio));

        let app: AppError = err.into();
        assert!(matches!(app, AppError::Decode(_)));
        assert!(app.to_string().contains("no usable audio data"));
    }

    #[test]
    fn test_non_string_fields_are_ignored() {
        let body = json!({"output": {"audio": {"url": 42, "data": null}}});
        assert!(matches!(extract_audio_source(&body), Err(SpeechError::NoAudio)));
    }

    #[test]
    fn test_decode_base64_audio() {
        let bytes = decode_base64_audio("SUQzBAA=").unwrap();
        assert_eq!(&bytes[..], b"ID3\x04\x00");
    }

    #[test]
    fn test_invalid_base64_is_decode_error() {
        let err = decode_base64_audio("not base64!!").unwrap_err();
        let app: AppError = err.into();
        assert!(matches!(app, AppError::Decode(_)));
    }

    #[test]
    fn test_api_failure_is_upstream() {
        let app: AppError = SpeechError::Api {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(
            app,
            AppError::Upstream {
                service: "speech",
                status: Some(500),
                ..
            }
        ));
    }

    #[test]
    fn test_default_voice() {
        let voice = VoiceSettings::default();
        assert_eq!(voice.voice, "Elias");
        assert_eq!(voice.language, "Chinese");
        assert_eq!(voice.rate, 0.8);
    }
}
