//! Display formatting for raw ledger values: wallet addresses, hex currency
//! codes, basis-point fees and weights.

/// Shorten a wallet address for table display. Addresses of 12 characters or
/// fewer are shown as-is, longer ones as `first6...last6`.
pub fn format_address(address: &str) -> String {
    if address.len() <= 12 {
        address.to_string()
    } else {
        format!("{}...{}", &address[..6], &address[address.len() - 6..])
    }
}

/// Decode a ledger currency code for display. Standard 3-character codes are
/// returned unchanged; 40-character hex codes are decoded to their printable
/// ASCII content with zero padding trimmed. An empty code reads "Unknown".
pub fn format_currency_code(code: &str) -> String {
    if code.is_empty() {
        return "Unknown".to_string();
    }
    if code.len() == 40 && code.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut decoded = String::new();
        let bytes = code.as_bytes();
        for pair in bytes.chunks(2) {
            let hex = std::str::from_utf8(pair).unwrap_or("");
            if let Ok(byte) = u8::from_str_radix(hex, 16) {
                if byte > 32 && byte < 127 {
                    decoded.push(byte as char);
                }
            }
        }
        let decoded = decoded.trim().to_string();
        if !decoded.is_empty() {
            return decoded;
        }
    }
    code.to_string()
}

/// Basis points to percent. One rule for every fee and weight field: a basis
/// point is 1/100 of a percent, so a trading fee of 500 reads as 5%.
pub fn bps_to_percent(bps: u32) -> f64 {
    bps as f64 / 100.0
}

/// Thousands-grouped integer rendering for token amounts and supplies.
pub fn group_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let whole = value.abs().trunc() as u64;
    let digits = whole.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

/// USD amount with two decimals and grouping.
pub fn format_usd(value: f64) -> String {
    let whole = group_thousands(value);
    let cents = (value.abs().fract() * 100.0).round() as u64;
    format!("${whole}.{:02}", cents.min(99))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_addresses_pass_through() {
        assert_eq!(format_address("rShort12345"), "rShort12345");
        assert_eq!(format_address(""), "");
        // Exactly 12 characters is the boundary for passing through.
        assert_eq!(format_address("123456789012"), "123456789012");
    }

    #[test]
    fn long_addresses_truncate_to_ends() {
        assert_eq!(
            format_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"),
            "rHb9CJ...wdtyTh"
        );
    }

    #[test]
    fn hex_currency_codes_decode() {
        // "RLUSD" padded to the 160-bit code the ledger stores.
        let code = "524C555344000000000000000000000000000000";
        assert_eq!(format_currency_code(code), "RLUSD");
        assert_eq!(format_currency_code("TECH"), "TECH");
        assert_eq!(format_currency_code(""), "Unknown");
    }

    #[test]
    fn bps_conversion_is_uniform() {
        assert_eq!(bps_to_percent(500), 5.0);
        assert_eq!(bps_to_percent(0), 0.0);
        assert_eq!(bps_to_percent(10_000), 100.0);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(10_000_000.0), "10,000,000");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(format_usd(1_875_000.5), "$1,875,000.50");
    }
}
