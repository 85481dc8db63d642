//! Bounded context-window extraction around a cursor or selection.
//!
//! The extractor reads a document through the [`SourceDocument`] capability
//! trait, so the core stays testable without a real editor host. Extraction
//! is a pure function of its inputs: no I/O, no shared state.
//!
//! Windows are bounded twice. A line span keeps scans cheap even in huge
//! files ([`PREFIX_LINE_SPAN`] lines above the anchor, [`SUFFIX_LINE_SPAN`]
//! below), and a character budget clamps the final strings. The prefix keeps
//! its *tail* (the text nearest the cursor, the most relevant context for
//! completion); the suffix keeps its *head*.

/// Line floor for the prefix window: scans start no more than this many
/// lines above the anchor.
pub const PREFIX_LINE_SPAN: usize = 2_000;

/// Line ceiling for the suffix window: scans end no more than this many
/// lines below the anchor.
pub const SUFFIX_LINE_SPAN: usize = 200;

/// Zero-based position in a document, measured in lines and characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based character offset within the line.
    pub character: usize,
}

impl Position {
    /// Creates a position at the given line and character.
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Read-only capability set an editor host must provide for extraction.
///
/// Positions are interpreted in characters, not bytes; implementations must
/// stay consistent between [`line_len`](SourceDocument::line_len) and
/// [`text_range`](SourceDocument::text_range).
pub trait SourceDocument {
    /// Number of lines in the document (at least 1 for an empty document).
    fn line_count(&self) -> usize;

    /// Length of the given line in characters, excluding the line break.
    fn line_len(&self, line: usize) -> usize;

    /// Text between two positions, with `\n` joining lines.
    fn text_range(&self, start: Position, end: Position) -> String;
}

/// Bounded prefix/suffix text around a single reference position (or a
/// selection's start/end for replace mode).
///
/// Constructed fresh per request and discarded once the prompt is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextContext {
    /// Text before the anchor, clamped to the prefix budget (tail kept).
    pub prefix: String,
    /// Text after the anchor, clamped to the suffix budget (head kept).
    pub suffix: String,
}

impl TextContext {
    /// True when both windows came back empty, i.e. there is nothing to
    /// anchor a completion on.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

/// Extracts the bounded context around `[anchor_start, anchor_end]`.
///
/// For single-cursor modes pass the same position twice; for replace mode
/// pass the selection's start and end (the selected text itself is never
/// merged into prefix/suffix).
pub fn extract(
    doc: &dyn SourceDocument,
    anchor_start: Position,
    anchor_end: Position,
    max_prefix_chars: usize,
    max_suffix_chars: usize,
) -> TextContext {
    let floor = anchor_start.line.saturating_sub(PREFIX_LINE_SPAN);
    let mut prefix = doc.text_range(Position::new(floor, 0), anchor_start);
    let prefix_chars = prefix.chars().count();
    if prefix_chars > max_prefix_chars {
        // Keep the last `max_prefix_chars` characters.
        prefix = prefix.chars().skip(prefix_chars - max_prefix_chars).collect();
    }

    let last_line = doc.line_count().saturating_sub(1);
    let ceiling = (anchor_end.line + SUFFIX_LINE_SPAN).min(last_line);
    let end = Position::new(ceiling, doc.line_len(ceiling));
    let mut suffix = doc.text_range(anchor_end, end);
    if suffix.chars().count() > max_suffix_chars {
        suffix = suffix.chars().take(max_suffix_chars).collect();
    }

    TextContext { prefix, suffix }
}

/// In-memory [`SourceDocument`] backed by a line vector.
///
/// Convenient for hosts that hold plain text, and for tests. Follows the
/// usual editor convention: text ending in `\n` has a trailing empty line.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Splits `text` on `\n` into a line buffer.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len().saturating_sub(1));
        let character = pos.character.min(self.lines[line].chars().count());
        Position::new(line, character)
    }

    fn line_slice(&self, line: usize, from: usize, to: usize) -> String {
        self.lines[line].chars().skip(from).take(to.saturating_sub(from)).collect()
    }
}

impl SourceDocument for LineBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    fn text_range(&self, start: Position, end: Position) -> String {
        let start = self.clamp(start);
        let end = self.clamp(end);
        if end <= start {
            return String::new();
        }
        if start.line == end.line {
            return self.line_slice(start.line, start.character, end.character);
        }

        let mut out = self.line_slice(start.line, start.character, self.line_len(start.line));
        for line in start.line + 1..end.line {
            out.push('\n');
            out.push_str(&self.lines[line]);
        }
        out.push('\n');
        out.push_str(&self.line_slice(end.line, 0, end.character));
        out
    }
}
