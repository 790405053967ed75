//! Chat message markup: fenced code blocks, inline code spans and line breaks.

use std::sync::OnceLock;

use regex::Regex;

/// Inline run inside a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    LineBreak,
}

/// Display block of a rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Code {
        /// Normalized language tag (`js` becomes `javascript`), `None` for generic fences
        language: Option<String>,
        code: String,
    },
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"```(?:([A-Za-z0-9_+#.-]+)?[ \t]*\n)?([\s\S]*?)```")
            .expect("fence pattern is valid")
    })
}

fn inline_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"`([^`]+)`").expect("inline code pattern is valid")
    })
}

/// Convert raw message text into display blocks.
pub fn render(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    for caps in fence_re().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        push_paragraph(&mut blocks, &content[cursor..whole.start()]);

        let language = caps.get(1).map(|m| normalize_language(m.as_str()));
        let code = caps.get(2).map_or("", |m| m.as_str());
        blocks.push(Block::Code {
            language,
            code: code.strip_suffix('\n').unwrap_or(code).to_string(),
        });
        cursor = whole.end();
    }

    push_paragraph(&mut blocks, &content[cursor..]);
    blocks
}

fn normalize_language(tag: &str) -> String {
    let tag = tag.to_ascii_lowercase();
    match tag.as_str() {
        "js" => "javascript".to_string(),
        _ => tag,
    }
}

fn push_paragraph(blocks: &mut Vec<Block>, text: &str) {
    if text.is_empty() {
        return;
    }

    let mut inlines = Vec::new();
    let mut cursor = 0;
    for caps in inline_code_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut inlines, &text[cursor..whole.start()]);
        inlines.push(Inline::Code(caps[1].to_string()));
        cursor = whole.end();
    }
    push_text(&mut inlines, &text[cursor..]);

    if !inlines.is_empty() {
        blocks.push(Block::Paragraph(inlines));
    }
}

fn push_text(inlines: &mut Vec<Inline>, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            inlines.push(Inline::LineBreak);
        }
        if !line.is_empty() {
            inlines.push(Inline::Text(line.to_string()));
        }
    }
}

/// Code blocks of a rendered message, in order
pub fn code_blocks(blocks: &[Block]) -> impl Iterator<Item = (Option<&str>, &str)> {
    blocks.iter().filter_map(|b| match b {
        Block::Code { language, code } => Some((language.as_deref(), code.as_str())),
        Block::Paragraph(_) => None,
    })
}
