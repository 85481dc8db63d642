//! Thin client for the local Ollama API.
//!
//! Endpoints, all relative to the configured base URL (trailing slash
//! stripped):
//! - `POST {base}/api/generate` — synchronous text generation (`stream=false`)
//! - `GET  {base}/api/tags`     — list installed models
//! - `GET  {base}/api/version`  — backend liveness/version
//!
//! Each generation call owns a timeout (floored at
//! [`MIN_REQUEST_TIMEOUT_MS`](crate::config::assist_config::MIN_REQUEST_TIMEOUT_MS))
//! composed with the caller's [`CancellationToken`]: whichever fires first
//! aborts the in-flight request exactly once. Cancellation is reported as
//! [`AssistError::Cancelled`] so callers can tell "the editor moved on"
//! apart from a genuine failure. No call is ever retried automatically.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::config::assist_config::AssistConfig;
use crate::error_handler::{AssistError, Result, make_snippet, validate_http_endpoint};

/// Description of one installed model, from `/api/tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Model identifier (e.g., `qwen2.5-coder:7b`).
    pub name: String,
    /// Model family, when the backend reports it.
    pub family: Option<String>,
    /// Parameter size label (e.g., `7B`), when reported.
    pub parameter_size: Option<String>,
}

/// Reusable client over one configured backend.
///
/// Holds a single `reqwest` client and pre-joined endpoint URLs. Requests
/// are independent and stateless; the service itself carries no per-call
/// state and is cheap to share behind an `Arc`.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: AssistConfig,
    timeout: Duration,
    url_generate: String,
    url_tags: String,
    url_version: String,
}

impl OllamaService {
    /// Creates a new service from the given config.
    ///
    /// # Errors
    /// - [`AssistError::Config`] if `cfg.base_url` lacks an HTTP scheme
    /// - [`AssistError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: AssistConfig) -> Result<Self> {
        validate_http_endpoint("base_url", cfg.base_url.trim())?;

        let timeout = cfg.effective_timeout();
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = cfg.base_url.trim().trim_end_matches('/').to_string();
        let url_generate = format!("{base}/api/generate");
        let url_tags = format!("{base}/api/tags");
        let url_version = format!("{base}/api/version");

        Ok(Self {
            client,
            cfg,
            timeout,
            url_generate,
            url_tags,
            url_version,
        })
    }

    /// The configuration this service was built from.
    pub fn config(&self) -> &AssistConfig {
        &self.cfg
    }

    /// Performs a **non-streaming** generation request via `/api/generate`.
    ///
    /// A missing or empty `response` field is a valid "no suggestion"
    /// success and returns an empty string, never an error.
    ///
    /// # Errors
    /// - [`AssistError::Cancelled`] if `cancel` fires first
    /// - [`AssistError::Timeout`] if the request exceeds the effective timeout
    /// - [`AssistError::HttpStatus`] for non-2xx responses (snippet ≤ 500 chars)
    /// - [`AssistError::Transport`] for client/network errors
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<String> {
        let body = GenerateRequest::from_cfg(&self.cfg, prompt);

        debug!("POST {}", self.url_generate);
        let fut = async {
            let resp = self
                .client
                .post(&self.url_generate)
                .json(&body)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| self.map_transport(e))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let url = self.url_generate.clone();
                let text = resp.text().await.unwrap_or_default();
                return Err(AssistError::HttpStatus {
                    status,
                    url,
                    snippet: make_snippet(&text),
                });
            }

            let out: GenerateResponse = resp
                .json()
                .await
                .map_err(|e| AssistError::Decode(format!("serde error: {e}; ensure `stream=false` is used")))?;

            Ok(out.response.unwrap_or_default())
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(AssistError::Cancelled),
            res = fut => res,
        }
    }

    /// Lists installed models via `/api/tags`.
    ///
    /// # Errors
    /// - [`AssistError::EmptyModelList`] when the backend is reachable but
    ///   reports an empty list (nothing installed)
    /// - [`AssistError::HttpStatus`] / [`AssistError::Transport`] otherwise
    #[instrument(skip_all)]
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        debug!("GET {}", self.url_tags);
        let resp = self
            .client
            .get(&self.url_tags)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_tags.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(AssistError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| AssistError::Decode(format!("unexpected /api/tags payload: {e}")))?;

        let models: Vec<ModelInfo> = tags
            .models
            .into_iter()
            .map(|m| {
                let details = m.details.unwrap_or_default();
                ModelInfo {
                    name: m.name,
                    family: details.family,
                    parameter_size: details.parameter_size,
                }
            })
            .collect();

        if models.is_empty() {
            return Err(AssistError::EmptyModelList {
                url: self.url_tags.clone(),
            });
        }
        Ok(models)
    }

    /// Fetches the backend version via `/api/version`.
    ///
    /// # Errors
    /// - [`AssistError::Decode`] when the `version` field is missing
    /// - [`AssistError::HttpStatus`] / [`AssistError::Transport`] otherwise
    #[instrument(skip_all)]
    pub async fn fetch_version(&self) -> Result<String> {
        debug!("GET {}", self.url_version);
        let resp = self
            .client
            .get(&self.url_version)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_version.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(AssistError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: VersionResponse = resp
            .json()
            .await
            .map_err(|e| AssistError::Decode(format!("unexpected /api/version payload: {e}")))?;

        out.version
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AssistError::Decode("missing `version` field in /api/version".into()))
    }

    fn map_transport(&self, e: reqwest::Error) -> AssistError {
        if e.is_timeout() {
            AssistError::Timeout(self.timeout)
        } else {
            AssistError::Transport(e)
        }
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a request from config and prompt.
    fn from_cfg(cfg: &'a AssistConfig, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: cfg.temperature,
                num_predict: cfg.max_tokens,
            },
        }
    }
}

/// Subset of Ollama `options` this client sets.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Response body for `/api/generate`.
///
/// `response` is optional: its absence means "no suggestion", not a failure.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Response body for `/api/tags`.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
    details: Option<TagDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct TagDetails {
    family: Option<String>,
    parameter_size: Option<String>,
}

/// Response body for `/api/version`.
#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_non_streaming_flag_and_options() {
        let cfg = AssistConfig {
            model: "m".into(),
            temperature: 0.5,
            max_tokens: 64,
            ..AssistConfig::default()
        };
        let body = GenerateRequest::from_cfg(&cfg, "p");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 64);
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let cfg = AssistConfig {
            base_url: "http://localhost:11434/".into(),
            ..AssistConfig::default()
        };
        let svc = OllamaService::new(cfg).unwrap();
        assert_eq!(svc.url_generate, "http://localhost:11434/api/generate");
        assert_eq!(svc.url_version, "http://localhost:11434/api/version");
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let cfg = AssistConfig {
            base_url: "localhost:11434".into(),
            ..AssistConfig::default()
        };
        assert!(matches!(
            OllamaService::new(cfg),
            Err(AssistError::Config(_))
        ));
    }
}
