//! Numeric argument parsing.

use anyhow::Result;

/// Parse a hex address string (with or without 0x prefix).
pub fn parse_hex_address(s: &str) -> Result<u64> {
    let s = s.trim();
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(s, 16).map_err(|e| anyhow::anyhow!("Invalid hex address: {}", e))
}

/// Parse an offset given either in decimal or as `0x`-prefixed hex.
pub fn parse_offset(s: &str) -> Result<u64> {
    let s = s.trim();
    if s.starts_with("0x") || s.starts_with("0X") {
        parse_hex_address(s)
    } else {
        s.parse::<u64>()
            .map_err(|e| anyhow::anyhow!("Invalid offset {:?}: {}", s, e))
    }
}
