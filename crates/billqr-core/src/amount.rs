//! Monetary amount parsing for `/c` arguments.
//!
//! Amounts are whole units of the local currency. Users may write grouping
//! separators (`150,000`, `150_000`) and the `k` shorthand (`150k`).

const GROUPING_SEPARATORS: [char; 2] = [',', '_'];
const THOUSAND: u64 = 1000;

/// Parse a strictly positive integer. Zero, negatives, decimals and
/// anything non-numeric yield `None`.
pub fn parse_positive_int(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|v| *v > 0)
}

fn strip_grouping(raw: &str) -> String {
    raw.chars()
        .filter(|c| !GROUPING_SEPARATORS.contains(c))
        .collect()
}

/// Parse an amount expression such as `150000`, `150,000` or `150k`.
pub fn parse_amount(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(base) = raw.strip_suffix(['k', 'K']) {
        return parse_positive_int(&strip_grouping(base))?.checked_mul(THOUSAND);
    }
    parse_positive_int(&strip_grouping(raw))
}

/// Share of `total` for each of `people` payers.
///
/// Floor division: the remainder is dropped, not redistributed, so
/// `per_person * people` may be less than `total`. `people` of zero is
/// treated as one payer.
pub fn split_evenly(total: u64, people: u64) -> u64 {
    total / people.max(1)
}
