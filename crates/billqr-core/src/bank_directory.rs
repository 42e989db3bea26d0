//! Local bank registry.
//!
//! One bank per line, `key,bin[,display_code]`. Lines without a comma are
//! split with shell quoting rules so a display code may contain spaces. In
//! that form an unquoted word starting with `#` begins a trailing comment;
//! a display code starting with `#` must be quoted or use the comma form:
//!
//! ```text
//! # key  bin     display code
//! vcb,970436,Vietcombank
//! mb 970422 "MB Bank"
//! ```

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankEntry {
    /// Lowercase lookup key.
    pub key: String,
    /// Settlement BIN used in the QR path.
    pub bin: String,
    /// Name shown to users in the confirmation message.
    pub display_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct BankDirectory {
    entries: HashMap<String, BankEntry>,
}

/// Comma form keeps every character; shell form drops `# ...` tails.
fn split_fields(line: &str) -> Option<Vec<String>> {
    if line.contains(',') {
        return Some(line.split(',').map(|p| p.trim().to_string()).collect());
    }
    shlex::split(line)
}

fn parse_entry(fields: &[String]) -> Option<BankEntry> {
    if fields.len() < 2 {
        return None;
    }
    let key = fields[0].to_lowercase();
    let display_code = fields
        .get(2)
        .cloned()
        .unwrap_or_else(|| key.to_uppercase());
    Some(BankEntry {
        bin: fields[1].clone(),
        display_code,
        key,
    })
}

impl BankDirectory {
    /// Parse registry text. Later lines override earlier ones with the same key.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(fields) = split_fields(line) else {
                warn!("Bank directory line {} has unbalanced quotes, skipped", idx + 1);
                continue;
            };
            match parse_entry(&fields) {
                Some(entry) => {
                    entries.insert(entry.key.clone(), entry);
                }
                None => {
                    warn!("Bank directory line {} needs at least key and bin, skipped", idx + 1);
                }
            }
        }
        Self { entries }
    }

    /// Read the registry from disk. A missing file is an empty directory.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Bank directory {} not found, no banks available", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&BankEntry> {
        self.entries.get(&key.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
