//! Transfer-content folding for QR payloads.
//!
//! Banks only accept a small ASCII alphabet in the `addInfo` field, so free
//! text like `Nguyễn Văn A ăn cơm` is reduced to `NGUYEN VAN A AN COM`.

use unicode_normalization::UnicodeNormalization;

pub const DEFAULT_CONTENT_LIMIT: usize = 25;

fn is_kept(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == ' ' || ch == '-'
}

/// Fold `text` into `[A-Z0-9 -]`, collapse whitespace and cut to `limit`
/// characters.
///
/// Diacritics are stripped through NFKD; characters with no ASCII base
/// (e.g. `đ`, emoji) are dropped. The cut is a hard character cutoff and may
/// split a word.
pub fn normalize_qr_content(text: &str, limit: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let folded: String = text
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| is_kept(*c))
        .collect();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .take(limit)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vietnamese_name() {
        assert_eq!(normalize_qr_content("Nguyễn Văn A", 25), "NGUYEN VAN A");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_qr_content("", 25), "");
        assert_eq!(normalize_qr_content("   ", 25), "");
    }

    #[test]
    fn test_drops_symbols_and_collapses_spaces() {
        assert_eq!(
            normalize_qr_content("  tra  sua!!! (2 ly) #team-a ", 25),
            "TRA SUA 2 LY TEAM-A"
        );
        assert_eq!(normalize_qr_content("an\tcom\ntrua", 25), "ANCOMTRUA");
    }

    #[test]
    fn test_characters_without_ascii_base_are_dropped() {
        assert_eq!(normalize_qr_content("Đi chợ 🛒", 25), "I CHO");
        assert_eq!(normalize_qr_content("日本", 25), "");
    }

    #[test]
    fn test_compatibility_forms_fold() {
        assert_eq!(normalize_qr_content("ＡＢＣ １２３", 25), "ABC 123");
    }

    #[test]
    fn test_truncates_by_character_count() {
        let input = "abcdefghij klmnopqrst uvwxyzabcd efghijklm";
        assert_eq!(input.chars().count(), 42);
        let out = normalize_qr_content(input, 25);
        assert_eq!(out, "ABCDEFGHIJ KLMNOPQRST UVW");
        assert_eq!(out.chars().count(), 25);
    }

    #[test]
    fn test_truncation_trims_trailing_space() {
        assert_eq!(normalize_qr_content("abcd efgh", 5), "ABCD");
    }

    #[test]
    fn test_custom_limit() {
        assert_eq!(normalize_qr_content("chuyen tien an trua", 6), "CHUYEN");
        assert_eq!(normalize_qr_content("chuyen", 0), "");
    }
}
