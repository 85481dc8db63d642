use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default backend endpoint (local Ollama).
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default code-oriented model identifier.
pub const DEFAULT_MODEL: &str = "qwen2.5-coder:7b";

/// Minimum enforced request timeout. A misconfigured near-zero timeout would
/// otherwise starve every request.
pub const MIN_REQUEST_TIMEOUT_MS: u64 = 1_000;

/// Configuration for the code assist client.
///
/// Hosts usually persist these options in their own settings store and hand
/// a fully resolved struct to [`CodeAssist`](crate::modes::CodeAssist).
/// Every field has a typed default; see [`AssistConfig::default`].
///
/// # Fields
///
/// - `base_url`: Backend base URL; a trailing slash is stripped at use.
/// - `model`: Model identifier sent with every generation request.
/// - `temperature`: Sampling temperature (0.0 = deterministic).
/// - `max_tokens`: Maximum number of tokens to generate (`num_predict`).
/// - `request_timeout_ms`: Per-request timeout; floored at
///   [`MIN_REQUEST_TIMEOUT_MS`] when applied.
/// - `max_prefix_chars`: Character budget for context before the cursor.
/// - `max_suffix_chars`: Character budget for context after the cursor.
/// - `enabled`: Gates only the automatic inline-completion mode.
/// - `log_prompts`: Gates whether instruction text is echoed to debug logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Backend base URL (e.g., `http://localhost:11434`).
    pub base_url: String,

    /// Model identifier string (e.g., `qwen2.5-coder:7b`).
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Character budget for the prefix window.
    pub max_prefix_chars: usize,

    /// Character budget for the suffix window.
    pub max_suffix_chars: usize,

    /// Whether automatic inline completion is active.
    pub enabled: bool,

    /// Whether user instruction text may appear in debug logs.
    pub log_prompts: bool,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 128,
            request_timeout_ms: 20_000,
            max_prefix_chars: 4_000,
            max_suffix_chars: 1_000,
            enabled: true,
            log_prompts: true,
        }
    }
}

impl AssistConfig {
    /// Effective per-request timeout with the minimum floor applied.
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(MIN_REQUEST_TIMEOUT_MS))
    }
}
