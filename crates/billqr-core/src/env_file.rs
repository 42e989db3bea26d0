//! `.env` support so the bot can be configured the same way as the
//! deployment scripts that start it (`TELEGRAM_BOT_TOKEN=...`,
//! `DEFAULT_STK=...`).

use std::collections::HashMap;
use std::path::Path;

/// Parse dotenv text into a map.
///
/// Accepts `KEY=value` and `export KEY=value`, single or double quoted
/// values, blank lines and `#` comments. For unquoted values a ` #` starts a
/// trailing comment. A repeated key keeps its last value.
pub fn parse_env(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_assignment)
        .collect()
}

fn parse_assignment(line: &str) -> Option<(String, String)> {
    let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key.to_string(), parse_value(value.trim())))
}

fn parse_value(raw: &str) -> String {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return raw[1..raw.len() - 1].to_string();
        }
    }
    match raw.find(" #") {
        Some(pos) => raw[..pos].trim_end().to_string(),
        None => raw.to_string(),
    }
}

/// Read a dotenv file. A missing file yields an empty map.
pub fn read_env_file(path: &Path) -> std::io::Result<HashMap<String, String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(parse_env(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e),
    }
}
