//! Editor-facing client for a local code-generation backend (Ollama wire
//! protocol).
//!
//! The core is the per-request pipeline: extract a bounded context window
//! around the cursor or selection, render a mode-specific prompt, run a
//! non-streaming generation call under a timeout plus caller cancellation,
//! and sanitize the raw model text before the host splices it into a live
//! document.
//!
//! Public surface:
//! - [`CodeAssist`] — facade with one operation per interaction mode
//!   (inline completion, prompt-to-code, preview, replace selection)
//! - [`OllamaService`] — the underlying HTTP client (`/api/generate`,
//!   `/api/tags`, `/api/version`)
//! - [`HealthService`] — cached backend liveness with periodic refresh
//! - [`SourceDocument`] — the read-only capability set a host must provide
//!
//! The host editor owns all UI, command wiring, config persistence, and the
//! application of returned edits; nothing here mutates a document.
//!
//! # Example
//! ```no_run
//! use ai_code_assist::{AssistConfig, CodeAssist, LineBuffer, Position};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), ai_code_assist::AssistError> {
//! let assist = CodeAssist::new(AssistConfig::default())?;
//! let doc = LineBuffer::from_text("fn main() {\n    \n}\n");
//! let cancel = CancellationToken::new();
//!
//! if let Some(item) = assist
//!     .inline_completion(&doc, "rust", Position::new(1, 4), &cancel)
//!     .await?
//! {
//!     println!("suggestion at {:?}: {}", item.position, item.text);
//! }
//! # Ok(()) }
//! ```

pub mod config;
pub mod context;
pub mod error_handler;
pub mod health_service;
pub mod modes;
pub mod prompt;
pub mod sanitize;
pub mod services;
pub mod telemetry;

pub use config::assist_config::AssistConfig;
pub use config::default_config::config_from_env;
pub use context::{LineBuffer, Position, SourceDocument, TextContext, extract};
pub use error_handler::{AssistError, ConfigError, Result};
pub use health_service::{HealthService, HealthState, HealthStatus};
pub use modes::{CodeAssist, InlineCompletion};
pub use prompt::{InteractionMode, build_prompt};
pub use sanitize::sanitize;
pub use services::ollama_service::{ModelInfo, OllamaService};
