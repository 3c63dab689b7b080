//! 数值与地址列表解析

use log::warn;
use tlbsim_core::{SimError, SimResult, VirtAddr};

/// Parse an unsigned number.
///
/// `0x`/`0X` is hexadecimal, `0b`/`0B` binary, any other leading `0` octal,
/// everything else decimal.
pub fn parse_num(s: &str) -> SimResult<u64> {
    let s = s.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (bin, 2)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    // from_str_radix 接受前导 '+'
    if digits.starts_with(['+', '-']) {
        return Err(SimError::invalid_number(format!("{}: unexpected sign", s)));
    }
    u64::from_str_radix(digits, radix).map_err(|err| SimError::invalid_number(format!("{}: {}", s, err)))
}

/// Parse a comma-separated address list. Empty items are skipped; zero or
/// malformed addresses are rejected.
pub fn parse_addrs(list: &str) -> SimResult<Vec<VirtAddr>> {
    let mut addrs = Vec::new();
    for item in list.split(',') {
        let item = item.trim();
        if item.is_empty() {
            warn!("Invalid address: <empty>. Skipped.");
            continue;
        }
        match parse_num(item) {
            Ok(0) | Err(_) => return Err(SimError::invalid_address(item)),
            Ok(addr) => addrs.push(addr),
        }
    }
    Ok(addrs)
}

/// Hex, comma separated; `<empty>` for an empty list
pub fn format_addrs(addrs: &[VirtAddr]) -> String {
    if addrs.is_empty() {
        return "<empty>".to_string();
    }
    addrs
        .iter()
        .map(|addr| format!("{:#x}", addr))
        .collect::<Vec<_>>()
        .join(",")
}
