pub mod flatten;
pub mod property_map;

pub use flatten::{flatten_properties, AfeDetail};
pub use property_map::{FieldKind, PropertyField, PROPERTY_FIELDS};

/// Convert a stored decimal string into a float.
///
/// `None`, blank text, unparsable text and non-finite values all yield `None`;
/// a missing value never turns into `0.0` or NaN.
pub fn parse_decimal(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::debug!("Ignoring non-numeric property value {:?}", text);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_text() {
        assert_eq!(parse_decimal(Some("1250000.50")), Some(1_250_000.5));
        assert_eq!(parse_decimal(Some(" 37.5 ")), Some(37.5));
        assert_eq!(parse_decimal(Some("-12")), Some(-12.0));
        assert_eq!(parse_decimal(Some("0")), Some(0.0));
    }

    #[test]
    fn missing_values_stay_missing() {
        assert_eq!(parse_decimal(None), None);
        assert_eq!(parse_decimal(Some("")), None);
        assert_eq!(parse_decimal(Some("   ")), None);
    }

    #[test]
    fn garbage_and_non_finite_become_none() {
        assert_eq!(parse_decimal(Some("n/a")), None);
        assert_eq!(parse_decimal(Some("NaN")), None);
        assert_eq!(parse_decimal(Some("inf")), None);
    }
}
