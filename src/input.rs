//! Text input validation.
//!
//! Turns the raw strings a front end collects into a [`RequestFrame`].
//! Every failure is `InvalidParameters` naming the offending field.

use crate::error::{CurvewireError, Result};
use crate::protocol::{FunctionKind, RequestFrame};

/// Unparsed request fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestForm {
    /// Wire name (`"Bessel function"`) or selector index (`"2"`).
    pub function: String,
    pub range_start: String,
    pub range_end: String,
    pub num_points: String,
    /// Only read for the Bessel function.
    pub order: String,
}

impl RequestForm {
    pub fn parse(&self) -> Result<RequestFrame> {
        let kind = parse_function(&self.function)?;
        let range_start = parse_field::<f64>("range start", &self.range_start)?;
        let range_end = parse_field::<f64>("range end", &self.range_end)?;
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(CurvewireError::InvalidParameters(
                "range bounds must be finite".to_string(),
            ));
        }
        let num_points = parse_field::<i32>("number of points", &self.num_points)?;
        let order = if kind.requires_order() {
            Some(parse_field::<i32>("order", &self.order)?)
        } else {
            None
        };

        RequestFrame::new(kind, range_start, range_end, num_points, order)
    }
}

fn parse_function(text: &str) -> Result<FunctionKind> {
    let text = text.trim();
    if let Ok(index) = text.parse::<usize>() {
        return FunctionKind::from_index(index).ok_or_else(|| {
            CurvewireError::InvalidParameters(format!("no function at index {}", index))
        });
    }
    text.parse()
}

fn parse_field<T: std::str::FromStr>(name: &str, text: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| CurvewireError::InvalidParameters(format!("{}: {:?} is not a number", name, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(function: &str, start: &str, end: &str, points: &str, order: &str) -> RequestForm {
        RequestForm {
            function: function.to_string(),
            range_start: start.to_string(),
            range_end: end.to_string(),
            num_points: points.to_string(),
            order: order.to_string(),
        }
    }

    #[test]
    fn test_parse_by_name() {
        let req = form("Cosine integral", " -2.5", "4", "1000 ", "").parse().unwrap();
        assert_eq!(req.kind(), FunctionKind::CosineIntegral);
        assert_eq!(req.range_start(), -2.5);
        assert_eq!(req.range_end(), 4.0);
        assert_eq!(req.num_points(), 1000);
        assert_eq!(req.order(), None);
    }

    #[test]
    fn test_parse_by_index() {
        let req = form("2", "0", "10", "50", "3").parse().unwrap();
        assert_eq!(req.kind(), FunctionKind::BesselFunction);
        assert_eq!(req.order(), Some(3));
    }

    #[test]
    fn test_order_ignored_for_non_bessel() {
        let req = form("Fresnel integral S", "0", "1", "5", "junk").parse().unwrap();
        assert_eq!(req.order(), None);
    }

    #[test]
    fn test_invalid_fields() {
        let cases = [
            form("Tangent", "0", "1", "5", ""),
            form("7", "0", "1", "5", ""),
            form("0", "abc", "1", "5", ""),
            form("0", "0", "", "5", ""),
            form("0", "0", "1", "5.5", ""),
            form("0", "0", "inf", "5", ""),
            form("Bessel function", "0", "1", "5", ""),
        ];
        for case in cases {
            assert!(
                matches!(case.parse(), Err(CurvewireError::InvalidParameters(_))),
                "{:?}",
                case
            );
        }
    }

    #[test]
    fn test_error_names_field() {
        let err = form("0", "0", "1", "many", "").parse().unwrap_err();
        assert!(err.to_string().contains("number of points"));
    }
}
