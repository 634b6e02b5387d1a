// src/format.rs
//
// Display helpers for amounts, addresses and deadlines.

use chrono::{DateTime, Utc};

use crate::solana::LAMPORTS_PER_SOL;

/// Format a raw token amount as a decimal with thousands separators,
/// two fractional digits.
pub fn format_token_amount(raw: u64, decimals: u8) -> String {
    format_amount(raw as f64 / 10f64.powi(decimals as i32), 2)
}

/// Format lamports as SOL, four fractional digits.
pub fn format_sol(lamports: u64) -> String {
    format_amount(lamports as f64 / LAMPORTS_PER_SOL as f64, 4)
}

pub fn format_amount(value: f64, places: usize) -> String {
    let rendered = format!("{:.*}", places, value);
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0
            && digits[i - 1].is_ascii_digit()
            && ch.is_ascii_digit()
            && (digits.len() - i) % 3 == 0
        {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

/// Shorten a wallet address to its first and last four characters.
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 8 {
        return address.to_string();
    }
    format!("{}...{}", &address[..4], &address[address.len() - 4..])
}

/// Human-readable time left until a deadline: "3d 4h", "2h 15m", "42m",
/// or "Ended" once passed.
pub fn time_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = end - now;
    if remaining.num_seconds() <= 0 {
        return "Ended".to_string();
    }

    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
