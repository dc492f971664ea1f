//! Display formatting for market values.
//!
//! All functions here are pure: the same input always renders to the same
//! bytes, so refresh cycles that resolve identical numbers produce identical
//! output.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::state::snapshot::MarketSnapshot;

/// The token trades far below one cent, so prices keep ten fractional digits.
pub const PRICE_FRACTION_DIGITS: u32 = 10;

const COMPACT_FRACTION_DIGITS: u32 = 2;
const COMPACT_SUFFIXES: [&str; 4] = ["K", "M", "B", "T"];

/// Display strings for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSnapshot {
    pub price: String,
    pub market_cap: String,
    pub holders: String,
}

impl From<&MarketSnapshot> for FormattedSnapshot {
    fn from(snap: &MarketSnapshot) -> Self {
        Self {
            price: format_price(snap.price),
            market_cap: format_compact_usd(snap.market_cap),
            holders: format_count(snap.holder_count),
        }
    }
}

/// `0.000000768` -> `$0.0000007680`
pub fn format_price(price: Decimal) -> String {
    format_usd(price, PRICE_FRACTION_DIGITS)
}

/// Compact notation with two fixed decimals: `7_680_000` -> `$7.68M`.
///
/// A value that rounds up to 1000 of one unit is promoted to the next, so
/// `999_999` renders as `$1.00M` rather than `$1000.00K`.
pub fn format_compact_usd(value: Decimal) -> String {
    let thousand = Decimal::ONE_THOUSAND;
    let mut scaled = value.abs();
    let mut suffix = "";

    for next in COMPACT_SUFFIXES {
        if round_half_up(scaled, COMPACT_FRACTION_DIGITS) < thousand {
            break;
        }
        scaled /= thousand;
        suffix = next;
    }

    let body = fixed(scaled, COMPACT_FRACTION_DIGITS);
    format!("{}${body}{suffix}", sign(value))
}

/// `2485` -> `2,485`
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Abbreviates a contract address the way the banner shows it:
/// `DmQ6ZD1H...EdGmoon` style, first and last eight characters.
pub fn short_address(address: &str) -> String {
    const KEEP: usize = 8;

    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= KEEP * 2 + 3 {
        return address.to_string();
    }
    let head: String = chars[..KEEP].iter().collect();
    let tail: String = chars[chars.len() - KEEP..].iter().collect();
    format!("{head}...{tail}")
}

fn format_usd(value: Decimal, fraction_digits: u32) -> String {
    let body = fixed(value.abs(), fraction_digits);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };

    let mut out = format!("{}${}", sign(value), group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds, then pads to exactly `dp` fractional digits.
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_up(value, dp);
    rounded.rescale(dp);
    rounded.to_string()
}

fn sign(value: Decimal) -> &'static str {
    if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
