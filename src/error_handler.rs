//! Unified error handling for `ai-code-assist`.
//!
//! A single top-level error type [`AssistError`] covers the whole library,
//! with configuration problems grouped in [`ConfigError`]. Small helpers for
//! reading/validating environment variables are provided and return the
//! unified [`Result<T>`] alias.
//!
//! All messages include the prefix `[AI Code Assist]` to simplify attribution
//! in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AssistError>;

/// Maximum number of characters of an upstream response body kept for
/// diagnostics.
pub const SNIPPET_MAX_CHARS: usize = 500;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-code-assist` crate.
///
/// [`AssistError::Cancelled`] is special: it means the caller (or an editor
/// host on its behalf) abandoned an in-flight request. It must never be
/// surfaced to the user as a failure; hosts are expected to swallow it.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AssistError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (e.g., connection refused).
    #[error("[AI Code Assist] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI Code Assist] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (at most [`SNIPPET_MAX_CHARS`]).
        snippet: String,
    },

    /// The backend is reachable but reports no installed models.
    #[error("[AI Code Assist] backend at {url} is reachable but has no models installed")]
    EmptyModelList {
        /// Request URL.
        url: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[AI Code Assist] decode error: {0}")]
    Decode(String),

    /// Operation exceeded the configured timeout.
    #[error("[AI Code Assist] request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller's cancellation token fired while the request was in flight.
    #[error("[AI Code Assist] request cancelled by caller")]
    Cancelled,
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (ports, limits, timeouts).
    #[error("[AI Code Assist] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `ASSIST_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI Code Assist] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `ASSIST_BASE_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI Code Assist] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty or invalid.
    #[error("[AI Code Assist] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Helpers                                                                   */
/* ------------------------------------------------------------------------- */

/// Truncates an upstream response body to a short diagnostic snippet.
///
/// Keeps at most [`SNIPPET_MAX_CHARS`] characters and trims surrounding
/// whitespace so one-line log records stay readable.
pub fn make_snippet(body: &str) -> String {
    body.trim().chars().take(SNIPPET_MAX_CHARS).collect()
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a
/// valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u32>().map(Some).map_err(|_| {
            AssistError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a
/// valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            AssistError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `usize` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a
/// valid `usize`.
pub fn env_opt_usize(name: &'static str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<usize>().map(Some).map_err(|_| {
            AssistError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected usize",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `f32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a
/// valid `f32`.
pub fn env_opt_f32(name: &'static str) -> Result<Option<f32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<f32>().map(Some).map_err(|_| {
            AssistError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected f32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional boolean from env (`Ok(None)` if unset/empty).
///
/// Accepts `true`/`false` and `1`/`0`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] for any other value.
pub fn env_opt_bool(name: &'static str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => match v.trim() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidFormat {
                var: name,
                reason: "expected true/false or 1/0",
            }
            .into()),
        },
        _ => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start
/// with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// Useful for parameters like `temperature` (e.g., `0.0..=2.0`).
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`
/// or not finite.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_bounded_and_trimmed() {
        let long = format!("  {}  ", "x".repeat(2 * SNIPPET_MAX_CHARS));
        let s = make_snippet(&long);
        assert_eq!(s.chars().count(), SNIPPET_MAX_CHARS);
        assert!(!s.starts_with(' '));
    }

    #[test]
    fn cancelled_message_names_the_caller() {
        let msg = AssistError::Cancelled.to_string();
        assert!(msg.contains("cancelled"));
    }
}
