//! Slash-command detection for incoming chat text.

/// Commands the bot answers. Anything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// `/c`: split a bill and reply with a QR code.
    Split,
    /// `/help` and `/start`.
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashInvocation {
    pub command: SlashCommand,
    /// Whitespace-separated arguments after the command.
    pub args: Vec<String>,
}

/// Strip BOM, zero-width and direction marks, and map slash look-alikes to `/`.
fn normalize(text: &str) -> String {
    let invisibles = [
        '\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}', '\u{200e}', '\u{200f}',
        '\u{202a}', '\u{202b}', '\u{202c}', '\u{202d}', '\u{202e}',
    ];
    let stripped: String = text.chars().filter(|c| !invisibles.contains(c)).collect();
    let trimmed = stripped.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some('\u{ff0f}' | '\u{2044}' | '\u{2215}') => format!("/{}", chars.as_str()),
        _ => trimmed.to_string(),
    }
}

/// Split argument text on whitespace. Quotes and `#` are ordinary
/// characters; the bill parser rejoins content words with single spaces.
fn tokenize(rest: &str) -> Vec<String> {
    rest.split_whitespace().map(str::to_string).collect()
}

/// Parse a slash command from raw message text.
///
/// `/c@other_bot` is rejected when `bot_username` is known and differs.
pub fn parse(text: &str, bot_username: Option<&str>) -> Option<SlashInvocation> {
    let t = normalize(text);
    let body = t.strip_prefix('/')?;
    let (head, rest) = match body.find(char::is_whitespace) {
        Some(pos) => (&body[..pos], &body[pos..]),
        None => (body, ""),
    };
    let (name, mention) = match head.split_once('@') {
        Some((name, mention)) => (name, Some(mention)),
        None => (head, None),
    };
    if let (Some(mention), Some(me)) = (mention, bot_username) {
        if !mention.eq_ignore_ascii_case(me.trim_start_matches('@')) {
            return None;
        }
    }
    let command = match name.to_lowercase().as_str() {
        "c" => SlashCommand::Split,
        "help" | "start" => SlashCommand::Help,
        _ => return None,
    };
    Some(SlashInvocation {
        command,
        args: tokenize(rest.trim()),
    })
}
