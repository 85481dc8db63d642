//! Suggestion post-processing: make raw model output safe to splice into a
//! live document.
//!
//! Steps, in order, each idempotent on its own output:
//! 1. strip a leading fenced-code opening line (``` plus optional language tag)
//! 2. strip a trailing fenced-code closing line (the newline before it stays)
//! 3. drop one trailing character equal to the suffix's first character
//! 4. collapse all-whitespace output to the empty string
//!
//! An empty return value means "suppress; do not apply anything". The
//! function is pure and never panics; anything it does not recognize passes
//! through unchanged.

/// Cleans `raw` model output for insertion ahead of `suffix`.
///
/// `suffix` is the document text immediately after the insertion point; its
/// first character drives the duplicate-boundary heuristic. The heuristic is
/// deliberately the simple documented one (drop a single echoed character),
/// not a full overlap detection.
pub fn sanitize(raw: &str, suffix: &str) -> String {
    let mut out = strip_leading_fence(raw).to_string();
    if let Some(stripped) = strip_trailing_fence(&out) {
        out = stripped;
    }

    // Avoid a visually duplicated boundary character when the model echoes
    // the start of the suffix.
    if let Some(first) = suffix.chars().next() {
        if out.ends_with(first) {
            out.pop();
        }
    }

    if out.trim().is_empty() {
        return String::new();
    }
    out
}

/// Removes a leading line of the form ```` ```lang ```` (tag optional).
/// The opening marker only counts when terminated by a newline.
fn strip_leading_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let Some(nl) = rest.find('\n') else {
        return s;
    };
    if rest[..nl].chars().all(|c| c.is_ascii_alphabetic()) {
        &rest[nl + 1..]
    } else {
        s
    }
}

/// Removes a trailing ```` ``` ```` line plus any whitespace after it.
/// The closing marker only counts when preceded by a newline; a bare
/// ```` ``` ```` with nothing before it is not a closing fence. Returns
/// `None` when no closing marker is present.
fn strip_trailing_fence(s: &str) -> Option<String> {
    let trimmed = s.trim_end();
    let head = trimmed.strip_suffix("```")?;
    if head.ends_with('\n') {
        Some(head.to_string())
    } else {
        None
    }
}
