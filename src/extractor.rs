// Transaction Extractor - best-effort parsing of wallet notification text
// into {amount, merchant}. Amount is mandatory, merchant is heuristic.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Merchant label used when no merchant pattern matches.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Extraction result, before an id and split decision are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    pub amount: f64,
    pub merchant: String,
    /// Stamped at extraction time.
    pub timestamp: DateTime<Utc>,
    /// Input text, verbatim.
    pub raw_notification: String,
}

// ============================================================================
// CAPABILITY TRAIT
// ============================================================================

/// Extracts a transaction from raw notification text.
///
/// There is no format guarantee upstream; vendors change notification
/// wording at will. Keeping extraction behind this trait lets a structured
/// payload parser replace the regex heuristics without touching
/// classification or storage.
pub trait NotificationExtractor: Send + Sync {
    /// Parse `text` into a transaction, or `None` when no amount is found.
    ///
    /// A `None` here is a valid no-match outcome, not an error.
    fn extract(&self, text: &str) -> Option<ParsedTransaction>;
}

// ============================================================================
// REGEX EXTRACTOR (default)
// ============================================================================

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Optional currency symbol, digits, optional decimal fraction.
    // The sign is never captured, so amounts are always non-negative.
    RE.get_or_init(|| Regex::new(r"\$?(\d+\.?\d*)").expect("invalid amount regex"))
}

fn merchant_at_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "at <word>": one non-whitespace run after the word "at", so a
    // trailing merchant with nothing after it still matches.
    RE.get_or_init(|| Regex::new(r"(?i)\bat\s+(\S+)").expect("invalid merchant regex"))
}

fn merchant_charged_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "<text> charged": everything before the word "charged".
    RE.get_or_init(|| Regex::new(r"(?i)(.+?)\s+charged").expect("invalid merchant regex"))
}

/// Default extractor: regex heuristics matching the wallet notification
/// wording observed in the wild.
///
/// Merchant patterns are tried in a fixed order, "at <word>" first, then
/// "<text> charged"; the first match wins. When neither matches the
/// merchant falls back to `UNKNOWN_MERCHANT`.
#[derive(Debug, Default)]
pub struct RegexExtractor;

impl RegexExtractor {
    pub fn new() -> Self {
        RegexExtractor
    }
}

impl NotificationExtractor for RegexExtractor {
    fn extract(&self, text: &str) -> Option<ParsedTransaction> {
        // Amount is the only hard requirement
        let caps = amount_re().captures(text)?;
        let amount: f64 = caps.get(1)?.as_str().parse().ok()?;

        let merchant = merchant_at_re()
            .captures(text)
            .or_else(|| merchant_charged_re().captures(text))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string());

        Some(ParsedTransaction {
            amount,
            merchant,
            timestamp: Utc::now(),
            raw_notification: text.to_string(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<ParsedTransaction> {
        RegexExtractor::new().extract(text)
    }

    #[test]
    fn test_no_amount_returns_none() {
        assert!(extract("Google Wallet is ready to use").is_none());
        assert!(extract("").is_none());
        assert!(extract("paid at Starbucks").is_none());
    }

    #[test]
    fn test_amount_with_currency_symbol() {
        let parsed = extract("You spent $12.34 today").unwrap();
        assert_eq!(parsed.amount, 12.34);
    }

    #[test]
    fn test_amount_without_currency_symbol() {
        let parsed = extract("12.34 debited from your account").unwrap();
        assert_eq!(parsed.amount, 12.34);
    }

    #[test]
    fn test_whole_dollar_amount() {
        let parsed = extract("Payment of $25.00 at Target using Google Wallet").unwrap();
        assert_eq!(parsed.amount, 25.00);
        assert_eq!(parsed.merchant, "Target");
    }

    #[test]
    fn test_starbucks_sample() {
        let parsed = extract("You paid $15.67 at Starbucks with Google Pay").unwrap();
        assert_eq!(parsed.amount, 15.67);
        assert_eq!(parsed.merchant, "Starbucks");
    }

    #[test]
    fn test_mcdonalds_sample() {
        // Trailing merchant: "at" pattern still wins over "charged"
        let parsed = extract("Google Pay: $8.50 charged at McDonald's").unwrap();
        assert_eq!(parsed.amount, 8.50);
        assert_eq!(parsed.merchant, "McDonald's");
    }

    #[test]
    fn test_at_pattern_takes_precedence_over_charged() {
        // Both patterns could match; "at" is tried first
        let parsed = extract("Acme charged $5.00 at Kiosk").unwrap();
        assert_eq!(parsed.merchant, "Kiosk");
    }

    #[test]
    fn test_charged_pattern_when_at_absent() {
        let parsed = extract("Starbucks charged $4.75").unwrap();
        assert_eq!(parsed.merchant, "Starbucks");
    }

    #[test]
    fn test_unknown_merchant_sentinel() {
        let parsed = extract("You spent $9.99 with Google Pay").unwrap();
        assert_eq!(parsed.merchant, UNKNOWN_MERCHANT);
    }

    #[test]
    fn test_at_inside_word_does_not_match() {
        // "at" must be a standalone word
        let parsed = extract("Rebate of $3.00 issued").unwrap();
        assert_eq!(parsed.merchant, UNKNOWN_MERCHANT);
    }

    #[test]
    fn test_first_amount_wins() {
        let parsed = extract("You paid $15.67 at Starbucks, balance 120.00").unwrap();
        assert_eq!(parsed.amount, 15.67);
    }

    #[test]
    fn test_raw_notification_kept_verbatim() {
        let text = "You spent $12.34 at Subway with Google Pay";
        let parsed = extract(text).unwrap();
        assert_eq!(parsed.raw_notification, text);
        assert_eq!(parsed.merchant, "Subway");
    }

    #[test]
    fn test_integer_amount() {
        let parsed = extract("Sent 20 dollars to a friend").unwrap();
        assert_eq!(parsed.amount, 20.0);
    }

    #[test]
    fn test_extractor_is_object_safe() {
        let boxed: Box<dyn NotificationExtractor> = Box::new(RegexExtractor::new());
        assert!(boxed.extract("$1.00 at Kiosk").is_some());
    }
}
