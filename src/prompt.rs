//! Prompt templates for the four interaction modes.
//!
//! Rendering is pure string assembly in a fixed section order: role line,
//! task line, optional instruction block, optional selection block (replace
//! mode only), prefix block, suffix block, trailing code-only directive.
//! Dynamic values are inserted verbatim between [`BLOCK_DELIMITER`] lines.
//! Content that legitimately contains the delimiter will confuse the model;
//! this is a known limitation, accepted over silently mangling the text.

use crate::context::TextContext;

/// Delimiter line fencing every dynamic block.
pub const BLOCK_DELIMITER: &str = "\"\"\"";

/// The four ways a host can drive the assist pipeline.
///
/// The mode selects the prompt template and the result consumer; context
/// extraction is unaffected except that [`PromptReplace`] anchors the prefix
/// at the selection start and the suffix at the selection end.
///
/// [`PromptReplace`]: InteractionMode::PromptReplace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// Automatic fill-in-the-middle completion at the cursor.
    Inline,
    /// User instruction, result inserted at the cursor.
    PromptInsert,
    /// User instruction, result shown in a read-only preview.
    PromptPreview,
    /// User instruction transforming the current selection.
    PromptReplace,
}

impl InteractionMode {
    /// Short label for log records.
    pub fn label(self) -> &'static str {
        match self {
            InteractionMode::Inline => "inline",
            InteractionMode::PromptInsert => "prompt-insert",
            InteractionMode::PromptPreview => "prompt-preview",
            InteractionMode::PromptReplace => "prompt-replace",
        }
    }
}

/// Renders the prompt for `mode`, or `None` when the mode's required inputs
/// are missing (empty instruction for the prompt modes, empty selection for
/// replace). A `None` means "send nothing", not an error.
pub fn build_prompt(
    mode: InteractionMode,
    ctx: &TextContext,
    language: &str,
    instruction: Option<&str>,
    selection: Option<&str>,
) -> Option<String> {
    let instruction = instruction.map(str::trim).filter(|s| !s.is_empty());
    let selection = selection.filter(|s| !s.is_empty());

    match mode {
        InteractionMode::Inline => Some(render_inline(ctx, language)),
        InteractionMode::PromptInsert => {
            instruction.map(|q| render_prompt_to_code(ctx, language, q, InsertTarget::AtCursor))
        }
        InteractionMode::PromptPreview => {
            instruction.map(|q| render_prompt_to_code(ctx, language, q, InsertTarget::Preview))
        }
        InteractionMode::PromptReplace => match (instruction, selection) {
            (Some(q), Some(sel)) => Some(render_replace(ctx, language, q, sel)),
            _ => None,
        },
    }
}

enum InsertTarget {
    AtCursor,
    Preview,
}

fn push_block(out: &mut String, label: &str, body: &str) {
    out.push_str(label);
    out.push('\n');
    out.push_str(BLOCK_DELIMITER);
    out.push('\n');
    out.push_str(body);
    out.push('\n');
    out.push_str(BLOCK_DELIMITER);
    out.push('\n');
}

fn render_inline(ctx: &TextContext, language: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "You are an assistant that completes code in {language}.\n"
    ));
    out.push_str(
        "Task: complete the following code at the marked point, without explanations, \
         only the code that continues.\n",
    );
    push_block(&mut out, "Prefix:", &ctx.prefix);
    push_block(&mut out, "Suffix:", &ctx.suffix);
    out.push_str("Answer (only the code missing between prefix and suffix):");
    out
}

fn render_prompt_to_code(
    ctx: &TextContext,
    language: &str,
    instruction: &str,
    target: InsertTarget,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "You are an assistant that writes code in {language}.\n"
    ));
    push_block(&mut out, "User instructions:", instruction);
    push_block(&mut out, "Context (prefix):", &ctx.prefix);
    push_block(&mut out, "Context (suffix):", &ctx.suffix);
    out.push_str(match target {
        InsertTarget::AtCursor => "Respond ONLY with code to insert at the current position.",
        InsertTarget::Preview => "Respond ONLY with code.",
    });
    out
}

fn render_replace(ctx: &TextContext, language: &str, instruction: &str, selection: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "You are an assistant that edits code in {language}.\n"
    ));
    out.push_str("Task: transform or replace the selection according to the user instructions.\n");
    push_block(&mut out, "User instructions:", instruction);
    push_block(&mut out, "Current selection:", selection);
    push_block(&mut out, "Context (prefix):", &ctx.prefix);
    push_block(&mut out, "Context (suffix):", &ctx.suffix);
    out.push_str("Respond ONLY with the final code that replaces the selection.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TextContext {
        TextContext {
            prefix: "let a = 1;\n".into(),
            suffix: "\nprintln!(\"{a}\");".into(),
        }
    }

    #[test]
    fn inline_prompt_sections_appear_in_order() {
        let p = build_prompt(InteractionMode::Inline, &ctx(), "rust", None, None).unwrap();
        let role = p.find("completes code in rust").unwrap();
        let prefix = p.find("Prefix:").unwrap();
        let suffix = p.find("Suffix:").unwrap();
        let directive = p.find("only the code missing between prefix and suffix").unwrap();
        assert!(role < prefix && prefix < suffix && suffix < directive);
        assert!(p.contains("let a = 1;"));
    }

    #[test]
    fn insert_prompt_requires_instruction() {
        assert!(build_prompt(InteractionMode::PromptInsert, &ctx(), "rust", None, None).is_none());
        assert!(
            build_prompt(InteractionMode::PromptInsert, &ctx(), "rust", Some("   "), None)
                .is_none()
        );

        let p = build_prompt(
            InteractionMode::PromptInsert,
            &ctx(),
            "rust",
            Some("add a counter"),
            None,
        )
        .unwrap();
        assert!(p.contains("User instructions:"));
        assert!(p.contains("add a counter"));
        assert!(p.ends_with("insert at the current position."));
    }

    #[test]
    fn preview_prompt_ends_with_plain_code_directive() {
        let p = build_prompt(
            InteractionMode::PromptPreview,
            &ctx(),
            "python",
            Some("sketch a parser"),
            None,
        )
        .unwrap();
        assert!(p.ends_with("Respond ONLY with code."));
    }

    #[test]
    fn replace_prompt_requires_instruction_and_selection() {
        let missing_sel =
            build_prompt(InteractionMode::PromptReplace, &ctx(), "go", Some("refactor"), None);
        assert!(missing_sel.is_none());
        let missing_instr =
            build_prompt(InteractionMode::PromptReplace, &ctx(), "go", None, Some("x := 1"));
        assert!(missing_instr.is_none());

        let p = build_prompt(
            InteractionMode::PromptReplace,
            &ctx(),
            "go",
            Some("use a map"),
            Some("x := 1"),
        )
        .unwrap();
        let instr = p.find("User instructions:").unwrap();
        let sel = p.find("Current selection:").unwrap();
        let prefix = p.find("Context (prefix):").unwrap();
        assert!(instr < sel && sel < prefix);
        assert!(p.ends_with("replaces the selection."));
    }

    #[test]
    fn blocks_are_fenced_by_delimiters() {
        let p = build_prompt(InteractionMode::Inline, &ctx(), "rust", None, None).unwrap();
        assert_eq!(p.matches(BLOCK_DELIMITER).count(), 4);
    }
}
