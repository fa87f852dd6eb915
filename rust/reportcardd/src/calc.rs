use crate::model::Subject;
use serde::{Deserialize, Serialize};

/// 1-decimal rounding used for the overall average:
/// `floor(10*x + 0.5) / 10`, so exact halves round toward +inf.
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedAverage {
    pub weighted_sum: f64,
    pub coefficient_sum: f64,
    /// Rounded to one decimal. `None` when the coefficients sum to zero.
    pub value: Option<f64>,
}

/// Weighted average of `average` over every subject, weighted by
/// `coefficient`. Exam and homework scores are never consulted.
pub fn weighted_average(subjects: &[Subject]) -> WeightedAverage {
    let mut weighted_sum = 0.0;
    let mut coefficient_sum = 0.0;
    for s in subjects {
        weighted_sum += s.average * s.coefficient;
        coefficient_sum += s.coefficient;
    }

    let value = if coefficient_sum == 0.0 {
        None
    } else {
        Some(round_off_1_decimal(weighted_sum / coefficient_sum))
    };

    WeightedAverage {
        weighted_sum,
        coefficient_sum,
        value,
    }
}

/// Display-only per-subject total.
pub fn subject_total(subject: &Subject) -> f64 {
    subject.coefficient * subject.average
}

/// Digits used when formatting the per-subject total column.
///
/// On the wire this is `"adaptive"` or a bare integer `0..=6`, the same
/// form the `--total-digits` flag takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalDigits {
    /// 0 decimals when the subject average is whole, 1 otherwise.
    Adaptive,
    Fixed(u8),
}

impl Default for TotalDigits {
    fn default() -> Self {
        Self::Adaptive
    }
}

pub const MAX_TOTAL_DIGITS: u8 = 6;

impl TotalDigits {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "adaptive" => Some(Self::Adaptive),
            other => other.parse::<u8>().ok().filter(|d| *d <= MAX_TOTAL_DIGITS).map(Self::Fixed),
        }
    }

    pub fn digits_for(self, subject: &Subject) -> usize {
        match self {
            Self::Adaptive => {
                if subject.average.fract() == 0.0 {
                    0
                } else {
                    1
                }
            }
            Self::Fixed(d) => d as usize,
        }
    }
}

impl Serialize for TotalDigits {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Adaptive => serializer.serialize_str("adaptive"),
            Self::Fixed(d) => serializer.serialize_u8(*d),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalDigitsRepr {
    Mode(String),
    Digits(u64),
}

impl<'de> Deserialize<'de> for TotalDigits {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let digits = match TotalDigitsRepr::deserialize(deserializer)? {
            TotalDigitsRepr::Mode(s) if s == "adaptive" => return Ok(Self::Adaptive),
            TotalDigitsRepr::Mode(_) => None,
            TotalDigitsRepr::Digits(d) => u8::try_from(d).ok().filter(|d| *d <= MAX_TOTAL_DIGITS),
        };
        digits
            .map(Self::Fixed)
            .ok_or_else(|| serde::de::Error::custom("totalDigits must be \"adaptive\" or 0..=6"))
    }
}

pub fn format_total(subject: &Subject, digits: TotalDigits) -> String {
    format_fixed(subject_total(subject), digits.digits_for(subject))
}

/// Fixed-point formatting that rounds exact halves away from zero.
pub fn format_fixed(x: f64, digits: usize) -> String {
    if !x.is_finite() {
        return format_number(x);
    }
    let scale = 10f64.powi(digits as i32);
    let rounded = (x * scale).round() / scale;
    format!("{:.*}", digits, rounded)
}

/// Plain display of a scalar: `15`, `10.5`, `NaN`, `Infinity`.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        if x > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if x == 0.0 {
        "0".to_string()
    } else {
        format!("{}", x)
    }
}
