//! Input validation for CLI arguments: range tokens, wallet addresses,
//! trading pairs, order filters and result limits.

use crate::error::AnalyticsError;
use crate::range::TimeRange;

pub const MAX_PAIR_LENGTH: usize = 23;
pub const MAX_TOP_WALLETS: u32 = 100;

/// Base58 alphabet used by Solana addresses (no 0, O, I, l).
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, AnalyticsError> {
    if input.len() > max_len {
        return Err(AnalyticsError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(AnalyticsError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a time-range token. Unknown tokens are an error, never a default.
pub fn validate_range(input: &str) -> Result<TimeRange, AnalyticsError> {
    input.parse()
}

/// Validate a Solana address: 32-44 base58 characters.
pub fn validate_address(input: &str) -> Result<String, AnalyticsError> {
    let trimmed = input.trim();
    if !(32..=44).contains(&trimmed.len()) {
        return Err(AnalyticsError::InvalidInput(format!(
            "invalid wallet address '{}': expected 32-44 base58 characters",
            trimmed
        )));
    }
    if let Some(bad) = trimmed.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
        return Err(AnalyticsError::InvalidInput(format!(
            "invalid wallet address '{}': '{}' is not a base58 character",
            trimmed, bad
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a trading pair like `sol/usdc`, returning it uppercased (`SOL/USDC`).
pub fn validate_pair(input: &str) -> Result<String, AnalyticsError> {
    let upper = sanitize_text(input, MAX_PAIR_LENGTH)?.to_uppercase();
    let valid = match upper.split_once('/') {
        Some((a, b)) => {
            let token = |t: &str| !t.is_empty() && t.chars().all(|c| c.is_ascii_alphanumeric());
            token(a) && token(b)
        }
        None => false,
    };
    if !valid {
        return Err(AnalyticsError::InvalidInput(format!(
            "invalid pair '{}'. Expected BASE/QUOTE (e.g., SOL/USDC)",
            input.trim()
        )));
    }
    Ok(upper)
}

/// Validate an order status: open, filled, canceled (or cancelled).
pub fn validate_status(input: &str) -> Result<String, AnalyticsError> {
    match input.trim().to_lowercase().as_str() {
        "open" => Ok("open".to_string()),
        "filled" => Ok("filled".to_string()),
        "canceled" | "cancelled" => Ok("canceled".to_string()),
        _ => Err(AnalyticsError::InvalidInput(format!(
            "unknown order status '{}'. Valid values: open, filled, canceled",
            input
        ))),
    }
}

/// Validate an order side: buy or sell.
pub fn validate_side(input: &str) -> Result<String, AnalyticsError> {
    match input.trim().to_lowercase().as_str() {
        "buy" => Ok("buy".to_string()),
        "sell" => Ok("sell".to_string()),
        _ => Err(AnalyticsError::InvalidInput(format!(
            "unknown order side '{}'. Valid values: buy, sell",
            input
        ))),
    }
}

/// Validate a leaderboard size (must be 1..=100).
pub fn validate_limit(limit: u32) -> Result<u32, AnalyticsError> {
    if !(1..=MAX_TOP_WALLETS).contains(&limit) {
        return Err(AnalyticsError::InvalidInput(format!(
            "limit must be between 1 and {}, got {}",
            MAX_TOP_WALLETS, limit
        )));
    }
    Ok(limit)
}

/// Validate a top-N count for entity tables (must be >= 1).
pub fn validate_top(top: usize) -> Result<usize, AnalyticsError> {
    if top == 0 {
        return Err(AnalyticsError::InvalidInput("top must be >= 1".to_string()));
    }
    Ok(top)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Range --

    #[test]
    fn range_valid() {
        assert_eq!(validate_range("30d").unwrap(), TimeRange::Last30Days);
    }

    #[test]
    fn range_decade_rejected() {
        assert!(matches!(
            validate_range("decade"),
            Err(AnalyticsError::InvalidRange(_))
        ));
    }

    // -- Address --

    #[test]
    fn address_valid() {
        let addr = "9j6dHYVg6jkWX2Ejp1i6M4HkzRqKtVdWfLNE9ZUhsUxM";
        assert_eq!(validate_address(&format!(" {addr} ")).unwrap(), addr);
    }

    #[test]
    fn address_too_short() {
        assert!(validate_address("abc").is_err());
    }

    #[test]
    fn address_bad_character() {
        let err = validate_address("0j6dHYVg6jkWX2Ejp1i6M4HkzRqKtVdWfLNE9ZUhsUxM").unwrap_err();
        assert!(err.to_string().contains("'0'"));
    }

    // -- Pair --

    #[test]
    fn pair_uppercased() {
        assert_eq!(validate_pair("sol/usdc").unwrap(), "SOL/USDC");
    }

    #[test]
    fn pair_missing_quote() {
        assert!(validate_pair("SOL/").is_err());
        assert!(validate_pair("SOL").is_err());
        assert!(validate_pair("SOL/USDC/ETH").is_err());
    }

    #[test]
    fn pair_empty() {
        assert!(validate_pair("   ").is_err());
    }

    // -- Status / side --

    #[test]
    fn status_normalized() {
        assert_eq!(validate_status("FILLED").unwrap(), "filled");
        assert_eq!(validate_status("cancelled").unwrap(), "canceled");
        assert!(validate_status("pending").is_err());
    }

    #[test]
    fn side_valid() {
        assert_eq!(validate_side(" Sell ").unwrap(), "sell");
        assert!(validate_side("short").is_err());
    }

    // -- Limits --

    #[test]
    fn limit_bounds() {
        assert!(validate_limit(0).is_err());
        assert_eq!(validate_limit(1).unwrap(), 1);
        assert_eq!(validate_limit(100).unwrap(), 100);
        assert!(validate_limit(101).is_err());
    }

    #[test]
    fn top_must_be_positive() {
        assert!(matches!(
            validate_top(0),
            Err(AnalyticsError::InvalidInput(msg)) if msg == "top must be >= 1"
        ));
        assert_eq!(validate_top(5).unwrap(), 5);
    }

    // -- Sanitization --

    #[test]
    fn sanitize_strips_control_chars() {
        assert_eq!(sanitize_text("a\u{0}b\n", 10).unwrap(), "ab");
    }

    #[test]
    fn sanitize_length_limit() {
        assert!(sanitize_text(&"x".repeat(11), 10).is_err());
    }
}
