//! Escaping for Telegram message markup.
//!
//! The two dialects are not interchangeable: legacy Markdown text must go
//! through [`escape_markdown`], MarkdownV2 text through
//! [`escape_markdown_v2`].

const MARKDOWN_V2_SPECIAL: &str = "_*[]()~`>#+-=|{}.!";

/// Escape text for legacy Markdown.
///
/// Backticks cannot be escaped inside legacy code spans, so they become
/// apostrophes.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '`' => out.push('\''),
            '*' | '_' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text for MarkdownV2.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_V2_SPECIAL.contains(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
