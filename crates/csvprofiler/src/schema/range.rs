//! Inclusive int, float and date ranges (`range(a:b)`).

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ProfilerError, Result};

/// Date layouts accepted in field values, tried in order.
static DATE_LAYOUTS: Lazy<Vec<(DateOrder, Regex)>> = Lazy::new(|| {
    vec![
        (
            DateOrder::Ymd,
            Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})$").expect("valid date pattern"),
        ),
        (
            DateOrder::Mdy,
            Regex::new(r"^([0-9]{1,2})[-/]([0-9]{1,2})[-/]([0-9]{4})$")
                .expect("valid date pattern"),
        ),
        (
            DateOrder::Ymd,
            Regex::new(r"^([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})$")
                .expect("valid date pattern"),
        ),
    ]
});

#[derive(Debug, Clone, Copy)]
enum DateOrder {
    Ymd,
    Mdy,
}

/// How values of a range are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Int,
    Float,
    Date,
}

/// Bounds of a range, typed by [`ValueType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RangeBounds {
    Int { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Date { min: NaiveDate, max: NaiveDate },
}

/// An inclusive range test as written in a param file or rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// The text the range was parsed from, e.g. `range(1:99)`.
    pub label: String,
    pub bounds: RangeBounds,
}

impl RangeSpec {
    /// Parses `range(a:b)`.
    ///
    /// Integer bounds give an int range, a `.` in either bound a float range,
    /// and `dYYYYMMDD` bounds a date range.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let inner = text
            .strip_prefix("range(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ProfilerError::config(format!("malformed range '{text}'")))?;
        let (lo, hi) = inner
            .split_once(':')
            .map(|(lo, hi)| (lo.trim(), hi.trim()))
            .ok_or_else(|| ProfilerError::config(format!("range '{text}' needs 'min:max'")))?;
        if lo.is_empty() || hi.is_empty() {
            return Err(ProfilerError::config(format!(
                "range '{text}' needs both bounds"
            )));
        }

        let bad = |what: &str| ProfilerError::config(format!("range '{text}': {what}"));

        let bounds = if lo.starts_with('d') || hi.starts_with('d') {
            let min = parse_date_bound(lo).ok_or_else(|| bad("date bounds are dYYYYMMDD"))?;
            let max = parse_date_bound(hi).ok_or_else(|| bad("date bounds are dYYYYMMDD"))?;
            RangeBounds::Date { min, max }
        } else if lo.contains('.') || hi.contains('.') {
            let min = lo.parse::<f64>().map_err(|_| bad("invalid float bound"))?;
            let max = hi.parse::<f64>().map_err(|_| bad("invalid float bound"))?;
            if !min.is_finite() || !max.is_finite() {
                return Err(bad("float bounds must be finite"));
            }
            RangeBounds::Float { min, max }
        } else {
            let min = lo.parse::<i64>().map_err(|_| bad("invalid integer bound"))?;
            let max = hi.parse::<i64>().map_err(|_| bad("invalid integer bound"))?;
            RangeBounds::Int { min, max }
        };

        let ordered = match &bounds {
            RangeBounds::Int { min, max } => min <= max,
            RangeBounds::Float { min, max } => min <= max,
            RangeBounds::Date { min, max } => min <= max,
        };
        if !ordered {
            return Err(bad("minimum is greater than maximum"));
        }

        Ok(Self {
            label: text.to_string(),
            bounds,
        })
    }

    pub fn value_type(&self) -> ValueType {
        match self.bounds {
            RangeBounds::Int { .. } => ValueType::Int,
            RangeBounds::Float { .. } => ValueType::Float,
            RangeBounds::Date { .. } => ValueType::Date,
        }
    }

    /// Returns true if `value` parses as the range's type and lies within
    /// the bounds, inclusive.
    pub fn contains(&self, value: &str) -> bool {
        match &self.bounds {
            RangeBounds::Int { min, max } => value
                .parse::<i64>()
                .map(|v| *min <= v && v <= *max)
                .unwrap_or(false),
            RangeBounds::Float { min, max } => value
                .parse::<f64>()
                .map(|v| *min <= v && v <= *max)
                .unwrap_or(false),
            RangeBounds::Date { min, max } => parse_date(value)
                .map(|v| *min <= v && v <= *max)
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn parse_date_bound(bound: &str) -> Option<NaiveDate> {
    let digits = bound.strip_prefix('d')?;
    if digits.len() != 8 {
        return None;
    }
    parse_date(digits)
}

/// Parses a field value as a date (`YYYYMMDD`, `M/D/YYYY`, `YYYY-M-D`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    for (order, re) in DATE_LAYOUTS.iter() {
        let Some(caps) = re.captures(value) else {
            continue;
        };
        let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let (year, month, day) = match order {
            DateOrder::Ymd => (part(1)?, part(2)?, part(3)?),
            DateOrder::Mdy => (part(3)?, part(1)?, part(2)?),
        };
        return NaiveDate::from_ymd_opt(year as i32, month, day);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_range_boundaries() {
        let range = RangeSpec::parse("range(1:99)").unwrap();
        assert_eq!(range.value_type(), ValueType::Int);
        assert!(range.contains("1"));
        assert!(range.contains("99"));
        assert!(!range.contains("0"));
        assert!(!range.contains("100"));
        assert!(!range.contains("5.5"));
        assert!(!range.contains("abc"));
    }

    #[test]
    fn test_float_range() {
        let range = RangeSpec::parse("range(0.5:2)").unwrap();
        assert_eq!(range.value_type(), ValueType::Float);
        assert!(range.contains("0.5"));
        assert!(range.contains("2"));
        assert!(range.contains("1.25"));
        assert!(!range.contains("2.01"));
        assert!(!range.contains("NaN"));
    }

    #[test]
    fn test_date_range_layouts() {
        let range = RangeSpec::parse("range(d19900101:d20200101)").unwrap();
        assert_eq!(range.value_type(), ValueType::Date);
        assert!(range.contains("19900101"));
        assert!(range.contains("20200101"));
        assert!(range.contains("7/4/2001"));
        assert!(range.contains("7-4-2001"));
        assert!(range.contains("2001-7-4"));
        assert!(range.contains("2001/07/04"));
        assert!(!range.contains("20200102"));
        assert!(!range.contains("2001-02-30"));
        assert!(!range.contains("July 4 2001"));
    }

    #[test]
    fn test_malformed_ranges() {
        for text in [
            "range(1-99)",
            "range(:5)",
            "range(1:99",
            "range(a:b)",
            "range(9:1)",
            "range(d1990:d2000)",
        ] {
            assert!(RangeSpec::parse(text).is_err(), "{text}");
        }
    }

    #[test]
    fn test_display_keeps_label() {
        let range = RangeSpec::parse("range(1.0:2.0)").unwrap();
        assert_eq!(range.to_string(), "range(1.0:2.0)");
    }
}
