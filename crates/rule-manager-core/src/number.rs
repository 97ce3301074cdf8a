//! Numeric literals parsed at the text boundary (CLI arguments)

use crate::error::RuleError;
use crate::evaluate::evaluate_rule;
use std::fmt;
use std::str::FromStr;

/// A parsed numeric literal.
///
/// Integers stay integers so that `10` displays as `10`; anything with a
/// fraction or exponent becomes a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
}

impl Number {
    /// Value as `f64` (lossy above 2^53 for integers)
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Check whether this number meets or exceeds `threshold`.
    ///
    /// Exact for every operand pair: an integer is never rounded through
    /// `f64` when compared with a float. NaN on either side yields `false`.
    pub fn meets(&self, threshold: &Number) -> bool {
        match (*self, *threshold) {
            (Number::Int(v), Number::Int(t)) => evaluate_rule(v, t),
            (Number::Float(v), Number::Float(t)) => evaluate_rule(v, t),
            (Number::Int(v), Number::Float(t)) => int_meets_float(v, t),
            (Number::Float(v), Number::Int(t)) => float_meets_int(v, t),
        }
    }
}

// 2^63, the first float above i64::MAX
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// `v >= t` without rounding `v`: for integers, `v >= t` iff `v >= ceil(t)`.
fn int_meets_float(v: i64, t: f64) -> bool {
    if t.is_nan() || t >= I64_BOUND {
        return false;
    }
    if t < -I64_BOUND {
        return true;
    }
    evaluate_rule(v, t.ceil() as i64)
}

/// `v >= t` without rounding `t`: for integers, `v >= t` iff `floor(v) >= t`.
fn float_meets_int(v: f64, t: i64) -> bool {
    if v.is_nan() || v < -I64_BOUND {
        return false;
    }
    if v >= I64_BOUND {
        return true;
    }
    evaluate_rule(v.floor() as i64, t)
}

impl FromStr for Number {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(Number::Int(i));
        }
        trimmed
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|_| RuleError::InvalidNumber(s.to_string()))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{}", i),
            // keep a trailing ".0" so whole floats read as floats
            Number::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{:.1}", v)
            }
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!("10".parse::<Number>().unwrap(), Number::Int(10));
        assert_eq!(" -7 ".parse::<Number>().unwrap(), Number::Int(-7));
    }

    #[test]
    fn test_parse_float() {
        assert_eq!("2.5".parse::<Number>().unwrap(), Number::Float(2.5));
        assert_eq!("1e3".parse::<Number>().unwrap(), Number::Float(1000.0));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = "ten".parse::<Number>().unwrap_err();
        assert!(matches!(err, RuleError::InvalidNumber(ref s) if s == "ten"));
        assert!("".parse::<Number>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::Int(10).to_string(), "10");
        assert_eq!(Number::Float(10.0).to_string(), "10.0");
        assert_eq!(Number::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_meets_mixed_operands() {
        assert!(Number::Int(10).meets(&Number::Int(7)));
        assert!(Number::Int(5).meets(&Number::Float(5.0)));
        assert!(!Number::Float(4.99).meets(&Number::Int(5)));
        assert!(!Number::Float(f64::NAN).meets(&Number::Int(0)));
        assert!(!Number::Int(0).meets(&Number::Float(f64::NAN)));
        assert!(Number::Int(3).meets(&Number::Float(2.5)));
        assert!(!Number::Int(2).meets(&Number::Float(2.5)));
        assert!(Number::Float(-2.5).meets(&Number::Int(-3)));
    }

    #[test]
    fn test_meets_is_exact_beyond_f64_precision() {
        // 2^53 + 3 and 2^53 + 4 collapse to the same f64
        let value: Number = "9007199254740995".parse().unwrap();
        let threshold: Number = "9007199254740996.0".parse().unwrap();
        assert!(!value.meets(&threshold));
        assert!(threshold.meets(&value));

        let threshold = Number::Int(9_007_199_254_740_997);
        assert!(!Number::Float(9_007_199_254_740_996.0).meets(&threshold));
    }

    #[test]
    fn test_meets_floats_outside_i64_range() {
        assert!(!Number::Int(i64::MAX).meets(&Number::Float(1e19)));
        assert!(Number::Int(i64::MIN).meets(&Number::Float(-1e19)));
        assert!(Number::Float(1e19).meets(&Number::Int(i64::MAX)));
        assert!(!Number::Float(-1e19).meets(&Number::Int(i64::MIN)));
        assert!(Number::Int(i64::MIN).meets(&Number::Float(-9_223_372_036_854_775_808.0)));
        assert!(!Number::Int(0).meets(&Number::Float(f64::INFINITY)));
        assert!(Number::Float(f64::INFINITY).meets(&Number::Int(i64::MAX)));
    }
}
