//! Normalization of raw ledger payloads into [`TradeEvent`]s.
//!
//! Two jobs live here:
//! - ticker decoding: hex bytes to a printable symbol, NUL padding stripped,
//!   falling back to the raw representation on any failure (a malformed
//!   ticker must not block the rest of the batch);
//! - fixed-point display scaling: unscaled integer strings to human-scale
//!   decimal strings by pure string arithmetic. Display values are for logs
//!   only; persisted amounts always stay in the original unscaled form.
//!
//! No floating point anywhere, no width limit on the integer strings.

use std::fmt;

use chrono::{DateTime, Utc};
use sbr_schemas::{TradeEvent, TradeKind};

use crate::payload::RawEventEnvelope;

/// Implied decimal places of the quote-currency amount.
pub const USDC_DECIMALS: u32 = 6;
/// Implied decimal places of asset amounts.
pub const ASSET_DECIMALS: u32 = 18;
/// Implied decimal places of prices.
pub const PRICE_DECIMALS: u32 = 18;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Per-event normalization failure. Skips the event; never aborts the batch.
#[derive(Debug, PartialEq, Eq)]
pub enum NormalizeError {
    EmptyField { field: &'static str },
    NotDigits { field: &'static str, raw: String },
    BadTimestamp { raw: String },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::EmptyField { field } => write!(f, "field '{field}' is empty"),
            NormalizeError::NotDigits { field, raw } => {
                write!(f, "field '{field}' is not an unsigned integer: '{raw}'")
            }
            NormalizeError::BadTimestamp { raw } => {
                write!(f, "timestamp out of range: '{raw}'")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

// ---------------------------------------------------------------------------
// Ticker decoding
// ---------------------------------------------------------------------------

/// Decode a raw ticker representation to a printable symbol.
///
/// Accepts `0x`-prefixed or bare hex; the decoded bytes must be UTF-8 and
/// printable ASCII after trailing NUL bytes are stripped. Anything else
/// (odd length, non-hex characters, unprintable bytes) returns the raw
/// input with trailing NULs stripped, so a malformed symbol still flows
/// through (and later fails the supported-set match) instead of failing
/// ingestion.
pub fn decode_ticker(raw: &str) -> String {
    let stripped = raw.strip_prefix("0x").unwrap_or(raw);

    if let Some(decoded) = try_decode_hex_symbol(stripped) {
        return decoded;
    }

    raw.trim_end_matches('\0').to_string()
}

fn try_decode_hex_symbol(s: &str) -> Option<String> {
    if s.is_empty() || s.len() % 2 != 0 {
        return None;
    }
    let bytes = hex::decode(s).ok()?;
    let text = std::str::from_utf8(&bytes).ok()?;
    let text = text.trim_end_matches('\0');
    if text.is_empty() || !text.bytes().all(|b| (0x20..0x7f).contains(&b)) {
        return None;
    }
    Some(text.to_string())
}

// ---------------------------------------------------------------------------
// Fixed-point display scaling
// ---------------------------------------------------------------------------

/// Convert an unscaled integer string to a human-scale decimal string.
///
/// `scale_for_display("1500000", 6)` is `"1.5"`; `scale_for_display("42", 18)`
/// is `"0.000000000000000042"`. Pure string arithmetic: left-pad, split at
/// the implied point, trim trailing fractional zeros. Works for any width.
pub fn scale_for_display(raw: &str, decimals: u32) -> Result<String, NormalizeError> {
    let digits = require_digits("amount", raw)?;

    if decimals == 0 {
        return Ok(digits.to_string());
    }

    let decimals = decimals as usize;
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits.to_string()
    };

    let split = padded.len() - decimals;
    let int_part = &padded[..split];
    let frac_part = padded[split..].trim_end_matches('0');

    if frac_part.is_empty() {
        Ok(int_part.to_string())
    } else {
        Ok(format!("{int_part}.{frac_part}"))
    }
}

/// Validate an unsigned decimal-integer string, normalizing leading zeros.
fn require_digits<'a>(
    field: &'static str,
    raw: &'a str,
) -> Result<&'a str, NormalizeError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(NormalizeError::EmptyField { field });
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NormalizeError::NotDigits {
            field,
            raw: raw.to_string(),
        });
    }
    let trimmed = s.trim_start_matches('0');
    Ok(if trimmed.is_empty() { "0" } else { trimmed })
}

// ---------------------------------------------------------------------------
// Event normalization
// ---------------------------------------------------------------------------

/// Build a [`TradeEvent`] from one raw envelope.
///
/// Validates the string-encoded integers and the timestamp; ticker decoding
/// is total and cannot fail. Amount fields are carried through in their
/// exact raw form (leading zeros normalized away); scaling happens only in
/// log lines.
pub fn normalize_event(
    kind: TradeKind,
    raw: &RawEventEnvelope,
) -> Result<TradeEvent, NormalizeError> {
    let sequence_number = require_digits("sequence_number", &raw.sequence_number)?.to_string();
    let ledger_version = require_digits("version", &raw.version)?.to_string();
    let usdc_amount = require_digits("usdc_amount", &raw.data.usdc_amount)?.to_string();
    let asset_amount = require_digits("asset_amount", &raw.data.asset_amount)?.to_string();
    let price = require_digits("avg_price", &raw.data.avg_price)?.to_string();

    let occurred_at = parse_timestamp_us(&raw.data.timestamp_us)?;

    if raw.data.user.trim().is_empty() {
        return Err(NormalizeError::EmptyField { field: "user" });
    }

    Ok(TradeEvent {
        kind,
        account_address: raw.data.user.trim().to_string(),
        sequence_number,
        ticker_raw: raw.data.ticker.clone(),
        ticker: decode_ticker(&raw.data.ticker),
        usdc_amount,
        asset_amount,
        price,
        ledger_version,
        occurred_at,
    })
}

fn parse_timestamp_us(raw: &str) -> Result<DateTime<Utc>, NormalizeError> {
    let digits = require_digits("timestamp_us", raw)?;
    let us: i64 = digits.parse().map_err(|_| NormalizeError::BadTimestamp {
        raw: raw.to_string(),
    })?;
    DateTime::from_timestamp_micros(us).ok_or(NormalizeError::BadTimestamp {
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
