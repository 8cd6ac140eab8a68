//! HTTP result provider.
//!
//! Posts the prompt and the file (base64 encoded) as JSON to a configured
//! endpoint and expects `{ "result": "..." }` back.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use promptdrop_core::{ProviderError, ResultProvider, StagedFile};
use serde::{Deserialize, Serialize};

/// Longest error body kept in [`ProviderError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Request body sent to the endpoint.
#[derive(Debug, Serialize)]
struct ResultRequest<'a> {
    prompt: &'a str,
    file_name: &'a str,
    mime_type: &'a str,
    data: String,
}

/// Response body expected from the endpoint.
#[derive(Debug, Deserialize)]
struct ResultResponse {
    result: String,
}

/// [`ResultProvider`] backed by a JSON HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpResultProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpResultProvider {
    /// Create a provider posting to `endpoint`.
    ///
    /// Relative endpoints are resolved against the page origin, since the
    /// browser fetch backend only accepts absolute URLs.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        let origin = page_origin();
        Self {
            client: reqwest::Client::new(),
            endpoint: resolve_endpoint(endpoint, origin.as_deref()),
        }
    }

    /// Absolute URL requests go to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait(?Send)]
impl ResultProvider for HttpResultProvider {
    async fn get_result(&self, prompt: &str, file: &StagedFile) -> Result<String, ProviderError> {
        let body = ResultRequest {
            prompt,
            file_name: &file.name,
            mime_type: &file.mime,
            data: STANDARD.encode(&file.bytes),
        };
        tracing::info!(endpoint = %self.endpoint, file = %file.name, "requesting result");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(text, MAX_ERROR_BODY),
            });
        }

        let parsed: ResultResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(parsed.result)
    }
}

/// The current page's origin, when running in a browser.
#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
const fn page_origin() -> Option<String> {
    None
}

/// Make `endpoint` absolute using `origin` when it is relative.
fn resolve_endpoint(endpoint: &str, origin: Option<&str>) -> String {
    let endpoint = endpoint.trim();
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_owned();
    }
    let Some(origin) = origin else {
        return endpoint.to_owned();
    };
    let origin = origin.trim_end_matches('/');
    let path = endpoint.trim_start_matches('/');
    format!("{origin}/{path}")
}

/// Cut `text` to at most `max` bytes on a character boundary.
fn truncate(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn relative_endpoint_joins_origin() {
        assert_eq!(
            resolve_endpoint("/api/result", Some("https://example.org/")),
            "https://example.org/api/result"
        );
        assert_eq!(
            resolve_endpoint("api/result", Some("http://localhost:8080")),
            "http://localhost:8080/api/result"
        );
    }

    #[test]
    fn absolute_endpoint_is_kept() {
        assert_eq!(
            resolve_endpoint("https://ai.example/describe", Some("http://localhost")),
            "https://ai.example/describe"
        );
    }

    #[test]
    fn no_origin_keeps_endpoint() {
        assert_eq!(resolve_endpoint("/api/result", None), "/api/result");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo".into(), 2), "h");
        assert_eq!(truncate("short".into(), 10), "short");
    }

    #[test]
    fn request_body_shape() {
        let file = StagedFile::new("cat.png", "image/png", b"abc".to_vec());
        let body = ResultRequest {
            prompt: "describe this image",
            file_name: &file.name,
            mime_type: &file.mime,
            data: STANDARD.encode(&file.bytes),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["prompt"], "describe this image");
        assert_eq!(json["file_name"], "cat.png");
        assert_eq!(json["mime_type"], "image/png");
        assert_eq!(json["data"], "YWJj");
    }

    #[test]
    fn response_body_shape() {
        let parsed: ResultResponse = serde_json::from_str(r#"{"result": "a cat"}"#).unwrap();
        assert_eq!(parsed.result, "a cat");
    }
}
