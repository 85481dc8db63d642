//! Orchestration of the four interaction modes.
//!
//! Each mode is the same linear pipeline: extract context, build the prompt,
//! invoke the backend under the caller's cancellation scope, sanitize the
//! result. A failed or suppressed result yields `Ok(None)` or an error and
//! never a partial edit; applying the returned text (insert, replace, or
//! preview) is the host's job.
//!
//! Failures are logged here as a single line (mode, truncated message) and
//! propagated. Hosts must swallow [`AssistError::Cancelled`] silently and
//! should surface other errors only for explicitly user-invoked actions;
//! the passive inline-completion path is expected to fail silently.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::assist_config::AssistConfig;
use crate::context::{self, Position, SourceDocument};
use crate::error_handler::{AssistError, Result, make_snippet};
use crate::prompt::{InteractionMode, build_prompt};
use crate::sanitize::sanitize;
use crate::services::ollama_service::OllamaService;
use crate::telemetry::instruction_field;

/// One inline suggestion, anchored at an empty range at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCompletion {
    /// Sanitized text to show as a ghost suggestion.
    pub text: String,
    /// Cursor position the suggestion is anchored at.
    pub position: Position,
}

/// Facade owning the configuration and the backend client.
///
/// Construct once per configured backend and share behind an `Arc`; every
/// call is independent, and each request runs under its own cancellation
/// scope supplied by the caller. Stale-result discarding (e.g., when the
/// user kept typing) is the host's responsibility.
pub struct CodeAssist {
    cfg: AssistConfig,
    svc: Arc<OllamaService>,
}

impl CodeAssist {
    /// Creates the facade from a resolved configuration.
    ///
    /// # Errors
    /// Propagates [`OllamaService::new`] validation failures.
    pub fn new(cfg: AssistConfig) -> Result<Self> {
        let svc = Arc::new(OllamaService::new(cfg.clone())?);
        Ok(Self { cfg, svc })
    }

    /// The configuration this facade was built from.
    pub fn config(&self) -> &AssistConfig {
        &self.cfg
    }

    /// Shared handle to the underlying backend client (e.g., for a
    /// [`HealthService`](crate::health_service::HealthService)).
    pub fn service(&self) -> Arc<OllamaService> {
        Arc::clone(&self.svc)
    }

    /// Automatic fill-in-the-middle completion at `position`.
    ///
    /// Returns `Ok(None)` when completion is disabled, the surrounding
    /// context is empty, or the model produced nothing usable.
    pub async fn inline_completion(
        &self,
        doc: &dyn SourceDocument,
        language: &str,
        position: Position,
        cancel: &CancellationToken,
    ) -> Result<Option<InlineCompletion>> {
        if !self.cfg.enabled {
            return Ok(None);
        }

        let text = self
            .run_pipeline(
                InteractionMode::Inline,
                doc,
                language,
                position,
                position,
                None,
                cancel,
            )
            .await?;
        Ok(text.map(|text| InlineCompletion { text, position }))
    }

    /// Generates code from `instruction` for insertion at `position`.
    ///
    /// Returns `Ok(None)` for an empty instruction (no request is sent) or
    /// a suppressed result.
    pub async fn prompt_insert(
        &self,
        doc: &dyn SourceDocument,
        language: &str,
        position: Position,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        self.run_pipeline(
            InteractionMode::PromptInsert,
            doc,
            language,
            position,
            position,
            Some(instruction),
            cancel,
        )
        .await
    }

    /// Like [`prompt_insert`](Self::prompt_insert), but the host shows the
    /// result in a read-only preview instead of editing the document.
    pub async fn prompt_preview(
        &self,
        doc: &dyn SourceDocument,
        language: &str,
        position: Position,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        self.run_pipeline(
            InteractionMode::PromptPreview,
            doc,
            language,
            position,
            position,
            Some(instruction),
            cancel,
        )
        .await
    }

    /// Transforms the selection `[start, end)` according to `instruction`,
    /// returning the replacement text.
    ///
    /// Returns `Ok(None)` when the selection or the instruction is empty
    /// (no request is sent) or when the result is suppressed.
    pub async fn replace_selection(
        &self,
        doc: &dyn SourceDocument,
        language: &str,
        start: Position,
        end: Position,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        self.run_pipeline(
            InteractionMode::PromptReplace,
            doc,
            language,
            start,
            end,
            Some(instruction),
            cancel,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_pipeline(
        &self,
        mode: InteractionMode,
        doc: &dyn SourceDocument,
        language: &str,
        anchor_start: Position,
        anchor_end: Position,
        instruction: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let ctx = context::extract(
            doc,
            anchor_start,
            anchor_end,
            self.cfg.max_prefix_chars,
            self.cfg.max_suffix_chars,
        );
        if mode == InteractionMode::Inline && ctx.is_empty() {
            return Ok(None);
        }

        // The selected text goes into its own prompt block; it is never part
        // of prefix/suffix.
        let selection = match mode {
            InteractionMode::PromptReplace => Some(doc.text_range(anchor_start, anchor_end)),
            _ => None,
        };

        let Some(prompt) = build_prompt(mode, &ctx, language, instruction, selection.as_deref())
        else {
            debug!(mode = mode.label(), "required input missing, not sending a request");
            return Ok(None);
        };

        debug!(
            mode = mode.label(),
            language,
            instruction = instruction_field(self.cfg.log_prompts, instruction),
            "requesting generation"
        );

        let raw = match self.svc.generate(&prompt, cancel).await {
            Ok(raw) => raw,
            Err(AssistError::Cancelled) => {
                debug!(mode = mode.label(), "request cancelled");
                return Err(AssistError::Cancelled);
            }
            Err(err) => {
                warn!(
                    mode = mode.label(),
                    error = %make_snippet(&err.to_string()),
                    "generation failed"
                );
                return Err(err);
            }
        };

        let cleaned = sanitize(&raw, &ctx.suffix);
        if cleaned.is_empty() {
            debug!(mode = mode.label(), "empty suggestion suppressed");
            return Ok(None);
        }
        Ok(Some(cleaned))
    }
}
