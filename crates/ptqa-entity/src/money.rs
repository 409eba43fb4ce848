//! Rupiah amounts.
//!
//! Amounts are whole rupiah stored as `i64`. Rows written by older clients
//! hold amounts as strings or floats, so deserialization is lenient.

use serde::{Deserialize, Deserializer};

/// Format an amount with Indonesian digit grouping, e.g. `Rp 250.000`.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Deserialize an amount given as a number, a numeric string, or null (zero).
pub fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Integer(i64),
        Float(f64),
        Text(String),
        Missing(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Integer(n) => Ok(n),
        Raw::Float(f) => Ok(f.round() as i64),
        Raw::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<f64>()
                .map(|f| f.round() as i64)
                .map_err(|_| serde::de::Error::custom(format!("invalid amount: '{s}'")))
        }
        Raw::Missing(()) => Ok(0),
    }
}
