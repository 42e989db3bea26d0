//! Argument parsing for `/c`.
//!
//! Two accepted shapes:
//!
//! ```text
//! /c <bank> <account> <amount> [people] [content...]
//! /c <amount> [people] [content...]          (configured default bank/account)
//! ```
//!
//! The token after the amount is taken as the people count only if it parses
//! as a positive integer; otherwise it starts the content.

use crate::amount::parse_positive_int;
use crate::error::BillError;

/// Fallback bank and account used when the first token is not a bank key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseDefaults {
    pub default_account: Option<String>,
    pub default_bank: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercase bank key. Empty when no default bank is configured.
    pub bank_key: String,
    /// Empty when no default account is configured.
    pub account: String,
    pub amount_expression: String,
    pub people_count: u64,
    pub content: String,
}

fn is_bank_key(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

/// Consume an optional people count at the head of `rest`.
///
/// Returns the count (1 when absent) and the tokens left for content.
fn take_people_count<S: AsRef<str>>(rest: &[S]) -> (u64, &[S]) {
    match rest.first().and_then(|t| parse_positive_int(t.as_ref())) {
        Some(people) => (people, &rest[1..]),
        None => (1, rest),
    }
}

/// Split raw `/c` arguments into their fields.
///
/// Only the argument count is validated here; the amount expression is
/// checked later by [`crate::amount::parse_amount`].
pub fn parse_command<S: AsRef<str>>(
    args: &[S],
    defaults: &ParseDefaults,
) -> Result<ParsedCommand, BillError> {
    let Some(first) = args.first().map(|t| t.as_ref()) else {
        return Err(BillError::NoArguments);
    };

    let (bank_key, account, amount_expression, rest) = if is_bank_key(first) {
        if args.len() < 3 {
            return Err(BillError::IncompleteBankForm);
        }
        (
            first.to_lowercase(),
            args[1].as_ref().to_string(),
            args[2].as_ref().to_string(),
            &args[3..],
        )
    } else {
        (
            defaults.default_bank.clone().unwrap_or_default(),
            defaults.default_account.clone().unwrap_or_default(),
            first.to_string(),
            &args[1..],
        )
    };

    let (people_count, rest) = take_people_count(rest);
    let content = rest
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    Ok(ParsedCommand {
        bank_key,
        account,
        amount_expression,
        people_count,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ParseDefaults {
        ParseDefaults {
            default_account: Some("0011223344".into()),
            default_bank: Some("mb".into()),
        }
    }

    #[test]
    fn test_default_bank_with_content() {
        let parsed = parse_command(&["100k", "hiep an com"], &defaults()).unwrap();
        assert_eq!(parsed.bank_key, "mb");
        assert_eq!(parsed.account, "0011223344");
        assert_eq!(parsed.amount_expression, "100k");
        assert_eq!(parsed.people_count, 1);
        assert_eq!(parsed.content, "hiep an com");
    }

    #[test]
    fn test_default_bank_with_people_and_content() {
        let parsed = parse_command(&["100k", "3", "hiep an com"], &defaults()).unwrap();
        assert_eq!(parsed.amount_expression, "100k");
        assert_eq!(parsed.people_count, 3);
        assert_eq!(parsed.content, "hiep an com");
    }

    #[test]
    fn test_explicit_bank() {
        let args = ["vcb", "0123456789", "150000", "Nguyen", "Van", "A"];
        let parsed = parse_command(&args, &defaults()).unwrap();
        assert_eq!(parsed.bank_key, "vcb");
        assert_eq!(parsed.account, "0123456789");
        assert_eq!(parsed.amount_expression, "150000");
        assert_eq!(parsed.people_count, 1);
        assert_eq!(parsed.content, "Nguyen Van A");

        let quoted = parse_command(&["vcb", "0123456789", "150000", "Nguyen Van A"], &defaults()).unwrap();
        assert_eq!(quoted, parsed);
    }

    #[test]
    fn test_explicit_bank_key_is_lowercased() {
        let parsed = parse_command(&["VCB", "0123", "50k", "2"], &defaults()).unwrap();
        assert_eq!(parsed.bank_key, "vcb");
        assert_eq!(parsed.people_count, 2);
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn test_non_numeric_people_token_becomes_content() {
        let parsed = parse_command(&["100k", "0", "tra", "sua"], &defaults()).unwrap();
        assert_eq!(parsed.people_count, 1);
        assert_eq!(parsed.content, "0 tra sua");
    }

    #[test]
    fn test_only_one_token_of_lookahead() {
        let parsed = parse_command(&["100k", "2", "3", "ban"], &defaults()).unwrap();
        assert_eq!(parsed.people_count, 2);
        assert_eq!(parsed.content, "3 ban");
    }

    #[test]
    fn test_empty_args_is_usage_error() {
        let args: [&str; 0] = [];
        assert_eq!(parse_command(&args, &defaults()), Err(BillError::NoArguments));
    }

    #[test]
    fn test_explicit_bank_requires_three_tokens() {
        assert_eq!(
            parse_command(&["vcb", "0123"], &defaults()),
            Err(BillError::IncompleteBankForm)
        );
        assert_eq!(
            parse_command(&["vcb"], &defaults()),
            Err(BillError::IncompleteBankForm)
        );
    }

    #[test]
    fn test_missing_defaults_leave_fields_empty() {
        let parsed = parse_command(&["100k"], &ParseDefaults::default()).unwrap();
        assert_eq!(parsed.bank_key, "");
        assert_eq!(parsed.account, "");
        assert_eq!(parsed.amount_expression, "100k");
    }

    #[test]
    fn test_invalid_amount_is_not_rejected_by_parser() {
        let parsed = parse_command(&["vcb", "0123", "abc", "com"], &defaults()).unwrap();
        assert_eq!(parsed.amount_expression, "abc");
        assert_eq!(parsed.content, "com");
    }

    #[test]
    fn test_owned_string_args() {
        let args: Vec<String> = vec!["200k".into(), "4".into()];
        let parsed = parse_command(&args, &defaults()).unwrap();
        assert_eq!(parsed.people_count, 4);
    }
}
