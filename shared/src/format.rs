//! Display helpers for quantities and location labels

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::PATH_SEPARATOR;

/// Format a quantity for display: `1'234,567.89`.
///
/// Two decimals; groups of three digits separated by `,`, with every second
/// separator (millions, trillions) written as `'`. A `.00` fraction is dropped.
pub fn format_quantity(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            // separators counted from the right: 1st ',', 2nd '\'', ...
            let from_right = remaining / 3;
            grouped.push(if from_right % 2 == 0 { '\'' } else { ',' });
        }
        grouped.push(*digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    if fraction == "00" {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// One segment of a location label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSegment {
    pub text: String,
    /// The last segment, i.e. the location itself
    pub current: bool,
}

/// Split `"Planta 1 > Pasillo 3"` into its display segments
pub fn label_segments(label: &str) -> Vec<LabelSegment> {
    let parts: Vec<&str> = label
        .split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let last = parts.len().saturating_sub(1);

    parts
        .into_iter()
        .enumerate()
        .map(|(i, text)| LabelSegment {
            text: text.to_string(),
            current: i == last,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_small_values() {
        assert_eq!(format_quantity(dec("0")), "0");
        assert_eq!(format_quantity(dec("12")), "12");
        assert_eq!(format_quantity(dec("2.5")), "2.50");
        assert_eq!(format_quantity(dec("999.999")), "1,000");
    }

    #[test]
    fn test_format_thousands_and_millions() {
        assert_eq!(format_quantity(dec("1000")), "1,000");
        assert_eq!(format_quantity(dec("1000000")), "1'000,000");
        assert_eq!(format_quantity(dec("1234567.891")), "1'234,567.89");
        assert_eq!(format_quantity(dec("100000000")), "100'000,000");
        assert_eq!(format_quantity(dec("1000000000")), "1,000'000,000");
    }

    #[test]
    fn test_label_segments() {
        let segments = label_segments("Planta 1 > Pasillo 3 > Estante B");
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Planta 1", "Pasillo 3", "Estante B"]);
        assert!(segments[2].current);
        assert!(!segments[0].current);

        assert_eq!(label_segments("General").len(), 1);
        assert!(label_segments("").is_empty());
    }
}
