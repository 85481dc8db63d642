//! Log output for editor hosts.
//!
//! The crate emits `tracing` events from every operation. Hosts that run
//! their own subscriber only need [`TARGET_PREFIX`] to route or filter this
//! crate's records; hosts without one can compose [`layer`] into a registry.
//!
//! Instruction text in log records is privacy-gated: the interaction modes
//! log [`instruction_field`], which honors the `log_prompts` option.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, filter, fmt};

/// Crate target prefix; all events carry targets under this module path.
pub const TARGET_PREFIX: &str = "ai_code_assist";

/// Placeholder logged in place of instruction text when `log_prompts` is off.
pub const REDACTED: &str = "<redacted>";

/// Instruction text as it may appear in a log record.
///
/// Returns the instruction itself only when the host enabled `log_prompts`;
/// otherwise a fixed placeholder, so the record shape stays stable either way.
pub fn instruction_field<'a>(log_prompts: bool, instruction: Option<&'a str>) -> &'a str {
    if log_prompts {
        instruction.unwrap_or("")
    } else {
        REDACTED
    }
}

/// RFC3339 UTC timer via `chrono`, e.g. `2026-08-25T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct Rfc3339Utc;

impl FormatTime for Rfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        // No fractional seconds, Z-suffix.
        let s = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Compact one-line formatting layer rendering ONLY this crate's events.
///
/// The per-event filter matches on [`TARGET_PREFIX`], leaving other crates'
/// records to the host's own layers. ANSI colors only when stdout is a
/// terminal.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let only_this_crate = filter::filter_fn(|meta| meta.target().starts_with(TARGET_PREFIX));

    fmt::layer()
        .compact()
        .with_timer(Rfc3339Utc)
        .with_target(true)
        .with_ansi(io::stdout().is_terminal())
        .with_filter(only_this_crate)
}
