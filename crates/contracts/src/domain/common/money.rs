use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Currency amount stored in minor units (two decimal places).
///
/// The backend sends totals as JSON numbers; they are rounded to the nearest
/// minor unit on the way in so that line totals computed on the client never
/// accumulate float error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Round a float amount to two places. Non-finite values are rejected.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Self((value * 100.0).round() as i64))
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse an amount as rendered on a page, e.g. `"14.99 ₺"`, `"1 234,50"`
    /// or `"₺1,234.50"`.
    ///
    /// When both `.` and `,` occur, the one appearing last is the decimal
    /// separator and the other is a thousands separator.
    pub fn parse(text: &str) -> Option<Self> {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
            .collect();
        if !cleaned.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }

        let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
            (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => cleaned.replace(',', ""),
            (None, Some(_)) => cleaned.replace(',', "."),
            _ => cleaned,
        };

        normalized.parse::<f64>().ok().and_then(Self::from_f64)
    }

    /// Line total for `quantity` units at this unit price
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMoney {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match RawMoney::deserialize(deserializer)? {
            RawMoney::Number(value) => Money::from_f64(value),
            RawMoney::Text(text) => Money::parse(&text),
        };
        parsed.ok_or_else(|| serde::de::Error::custom("invalid money amount"))
    }
}
