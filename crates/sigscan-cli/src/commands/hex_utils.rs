//! Hex address, offset and byte-string parsing.

use anyhow::{Result, anyhow, bail};

/// Parse a hex address string (with or without 0x prefix).
pub fn parse_hex_address(s: &str) -> Result<u64> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| anyhow!("Invalid hex address '{}': {}", s, e))
}

/// Parse a signed hex offset such as `7`, `0x10` or `-0x4`.
pub fn parse_hex_offset(s: &str) -> Result<i64> {
    let s = s.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = parse_hex_address(rest)?;
    let value = i64::try_from(magnitude).map_err(|_| anyhow!("Offset out of range: {}", s))?;
    Ok(if negative { -value } else { value })
}

/// Parse a run of hex bytes, spaced (`"55 8B EC"`) or packed (`"558BEC"`).
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>> {
    let digits: String = s.split_whitespace().collect();
    if digits.is_empty() {
        bail!("No bytes given");
    }
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        bail!("Invalid hex digit '{}' in '{}'", c, s);
    }
    if digits.len() % 2 != 0 {
        bail!("Odd number of hex digits in '{}'", s);
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| anyhow!("Invalid hex byte {}: {}", &digits[i..i + 2], e))
        })
        .collect()
}

/// Format an address as a hex string with 0x prefix.
pub fn format_hex_address(addr: u64) -> String {
    format!("0x{:X}", addr)
}
