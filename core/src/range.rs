#![deny(missing_docs)]

//! # Numeric Ranges
//!
//! Converts YANG decimal literals to floating values and merges declared
//! sub-ranges into the effective bounds emitted as `minimum`/`maximum`
//! (or `minLength`/`maxLength` for string lengths).
//!
//! Several sub-ranges are merged into their convex hull: `1..10 | 20..30`
//! yields `1..30`. Values falling in the gap between sub-ranges are therefore
//! accepted by the emitted schema.

use crate::error::{AppError, AppResult};
use crate::tree::TypeKind;
use std::fmt;
use std::str::FromStr;

/// Largest number of fraction digits allowed by `decimal64`.
pub const MAX_FRACTION_DIGITS: u8 = 18;

/// A YANG numeric literal: `value / 10^fraction_digits`, negated when `negative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decimal {
    /// Unsigned magnitude with the decimal point removed.
    pub value: u64,
    /// Number of digits after the decimal point.
    pub fraction_digits: u8,
    /// Sign.
    pub negative: bool,
}

impl Decimal {
    /// Builds a literal from its parts.
    pub fn new(value: u64, fraction_digits: u8, negative: bool) -> Self {
        Self {
            value,
            fraction_digits,
            negative,
        }
    }

    /// Builds an integral literal. Every `i64`, `i64::MIN` included, is exact.
    pub fn from_i64(value: i64) -> Self {
        Self {
            value: value.unsigned_abs(),
            fraction_digits: 0,
            negative: value < 0,
        }
    }

    /// Floating value of the literal. See [`decimal_to_float`].
    pub fn to_f64(self) -> f64 {
        decimal_to_float(self)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.value.to_string();
        let scale = usize::from(self.fraction_digits);
        if self.negative && self.value != 0 {
            write!(f, "-")?;
        }
        if scale == 0 {
            return write!(f, "{}", digits);
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

impl FromStr for Decimal {
    type Err = AppError;

    /// Parses `-12.5`, `+3`, `0.001`. Exponents are not YANG syntax and are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |detail: &str| AppError::MalformedRange {
            node: s.to_string(),
            detail: detail.to_string(),
        };

        let text = s.trim();
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() || (unsigned.contains('.') && frac_part.is_empty()) {
            return Err(malformed("expected a decimal number"));
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed("expected a decimal number"));
        }
        if frac_part.len() > usize::from(MAX_FRACTION_DIGITS) {
            return Err(malformed("too many fraction digits"));
        }

        let value = format!("{}{}", int_part, frac_part)
            .parse::<u64>()
            .map_err(|_| malformed("value out of range"))?;
        Ok(Decimal {
            value,
            fraction_digits: frac_part.len() as u8,
            negative,
        })
    }
}

/// Converts a literal to `f64`.
///
/// The magnitude is divided by an exact power of ten, so every literal whose
/// decimal value is representable comes out as the nearest double
/// (`12345` with 2 fraction digits is `123.45`).
pub fn decimal_to_float(literal: Decimal) -> f64 {
    if literal.value == 0 {
        return 0.0;
    }
    let magnitude = literal.value as f64 / 10f64.powi(i32::from(literal.fraction_digits));
    if literal.negative {
        -magnitude
    } else {
        magnitude
    }
}

/// One declared interval. `None` stands for the YANG `min`/`max` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubRange {
    /// Lower bound, `None` for `min`.
    pub min: Option<Decimal>,
    /// Upper bound, `None` for `max`.
    pub max: Option<Decimal>,
}

impl SubRange {
    /// `min..max` with explicit bounds.
    pub fn between(min: Decimal, max: Decimal) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// A single value, `v..v`.
    pub fn exact(value: Decimal) -> Self {
        Self::between(value, value)
    }
}

impl fmt::Display for SubRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.min {
            Some(d) => write!(f, "{}", d)?,
            None => write!(f, "min")?,
        }
        write!(f, "..")?;
        match self.max {
            Some(d) => write!(f, "{}", d),
            None => write!(f, "max"),
        }
    }
}

/// Parses a YANG range/length expression such as `"min..10 | 20..100"`.
pub fn parse_range_expr(expr: &str) -> AppResult<Vec<SubRange>> {
    let mut parts = Vec::new();
    for part in expr.split('|') {
        let part = part.trim();
        if part.is_empty() {
            return Err(AppError::MalformedRange {
                node: expr.to_string(),
                detail: "empty sub-range".into(),
            });
        }
        let sub = match part.split_once("..") {
            Some((lo, hi)) => SubRange {
                min: parse_bound(lo, "min")?,
                max: parse_bound(hi, "max")?,
            },
            None => {
                let bound = parse_bound(part, "")?;
                SubRange {
                    min: bound,
                    max: bound,
                }
            }
        };
        parts.push(sub);
    }
    Ok(parts)
}

fn parse_bound(text: &str, keyword: &str) -> AppResult<Option<Decimal>> {
    let text = text.trim();
    if text == "min" || text == "max" {
        if keyword.is_empty() || text == keyword {
            return Ok(None);
        }
        return Err(AppError::MalformedRange {
            node: text.to_string(),
            detail: format!("'{}' used where '{}' is expected", text, keyword),
        });
    }
    text.parse::<Decimal>().map(Some)
}

/// Effective inclusive bounds. `None` means "not emitted".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectiveRange {
    /// Lower bound.
    pub min: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
}

/// Value domain of a numeric kind; `None` when unbounded for our purposes.
fn domain(kind: TypeKind) -> (Option<f64>, Option<f64>) {
    match kind {
        TypeKind::Int8 => (Some(i8::MIN as f64), Some(i8::MAX as f64)),
        TypeKind::Int16 => (Some(i16::MIN as f64), Some(i16::MAX as f64)),
        TypeKind::Int32 => (Some(i32::MIN as f64), Some(i32::MAX as f64)),
        TypeKind::Int64 => (Some(i64::MIN as f64), Some(i64::MAX as f64)),
        TypeKind::Uint8 => (Some(0.0), Some(u8::MAX as f64)),
        TypeKind::Uint16 => (Some(0.0), Some(u16::MAX as f64)),
        TypeKind::Uint32 => (Some(0.0), Some(u32::MAX as f64)),
        TypeKind::Uint64 => (Some(0.0), Some(u64::MAX as f64)),
        _ => (None, None),
    }
}

/// Bounds that the emitted integer format already implies and are dropped.
///
/// Unsigned minimums (`0`) and the limits of the narrow widths are kept.
fn implied_bounds(kind: TypeKind) -> (Option<f64>, Option<f64>) {
    match kind {
        TypeKind::Int32 => (Some(i32::MIN as f64), Some(i32::MAX as f64)),
        TypeKind::Int64 => (Some(i64::MIN as f64), Some(i64::MAX as f64)),
        TypeKind::Uint32 => (None, Some(u32::MAX as f64)),
        TypeKind::Uint64 => (None, Some(u64::MAX as f64)),
        _ => (None, None),
    }
}

/// Merges `subranges` of a numeric `kind` into one inclusive interval.
///
/// Absent sub-range bounds are clamped to the kind's domain. A sub-range with
/// `min > max` is rejected.
pub fn effective_range(subranges: &[SubRange], kind: TypeKind) -> AppResult<EffectiveRange> {
    if subranges.is_empty() {
        return Ok(EffectiveRange::default());
    }

    let (domain_min, domain_max) = domain(kind);
    let mut lo = Hull::default();
    let mut hi = Hull::default();
    for sub in subranges {
        let min = sub.min.map(decimal_to_float).or(domain_min);
        let max = sub.max.map(decimal_to_float).or(domain_max);
        if let (Some(a), Some(b)) = (min, max) {
            if a > b {
                return Err(AppError::MalformedRange {
                    node: sub.to_string(),
                    detail: "lower bound exceeds upper bound".into(),
                });
            }
        }
        lo.widen(min, f64::min);
        hi.widen(max, f64::max);
    }

    let (implied_min, implied_max) = implied_bounds(kind);
    Ok(EffectiveRange {
        min: lo.value().filter(|v| Some(*v) != implied_min),
        max: hi.value().filter(|v| Some(*v) != implied_max),
    })
}

/// Merges `length` sub-ranges into `(minLength, maxLength)`.
///
/// A zero minimum and an unbounded maximum are not emitted. Bounds must be
/// non-negative integers.
pub fn effective_length(subranges: &[SubRange]) -> AppResult<(Option<u64>, Option<u64>)> {
    if subranges.is_empty() {
        return Ok((None, None));
    }

    let mut lo: Option<u64> = None;
    let mut hi: Option<u64> = Some(0);
    for sub in subranges {
        let min = match sub.min {
            Some(d) => length_bound(d, sub)?,
            None => 0,
        };
        let max = sub.max.map(|d| length_bound(d, sub)).transpose()?;
        if let Some(max) = max {
            if min > max {
                return Err(AppError::MalformedRange {
                    node: sub.to_string(),
                    detail: "lower bound exceeds upper bound".into(),
                });
            }
        }
        lo = Some(lo.map_or(min, |cur| cur.min(min)));
        hi = match (hi, max) {
            (Some(cur), Some(max)) => Some(cur.max(max)),
            _ => None,
        };
    }

    Ok((lo.filter(|v| *v != 0), hi))
}

fn length_bound(d: Decimal, sub: &SubRange) -> AppResult<u64> {
    if d.value != 0 && (d.negative || d.fraction_digits != 0) {
        return Err(AppError::MalformedRange {
            node: sub.to_string(),
            detail: "length bounds must be non-negative integers".into(),
        });
    }
    Ok(d.value)
}

/// Running min or max that turns unbounded once any contributor is unbounded.
#[derive(Default)]
struct Hull {
    value: Option<f64>,
    unbounded: bool,
}

impl Hull {
    fn widen(&mut self, candidate: Option<f64>, pick: fn(f64, f64) -> f64) {
        match candidate {
            Some(v) => self.value = Some(self.value.map_or(v, |cur| pick(cur, v))),
            None => self.unbounded = true,
        }
    }

    fn value(&self) -> Option<f64> {
        if self.unbounded {
            None
        } else {
            self.value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Decimal {
        Decimal::from_i64(v)
    }

    #[test]
    fn test_integral_literal_extremes() {
        let min = Decimal::from_i64(i64::MIN);
        assert_eq!(min, Decimal::new(9_223_372_036_854_775_808, 0, true));
        assert_eq!(min.to_string(), "-9223372036854775808");
        assert_eq!(min, "-9223372036854775808".parse().unwrap());

        let max = Decimal::from_i64(i64::MAX);
        assert_eq!(max, Decimal::new(i64::MAX as u64, 0, false));
        assert_eq!(Decimal::from_i64(0), Decimal::new(0, 0, false));
    }

    #[test]
    fn test_float_from_decimal() {
        assert_eq!(decimal_to_float(Decimal::new(12345, 0, false)), 12345.0);
        assert_eq!(decimal_to_float(Decimal::new(12345, 2, false)), 123.45);
        assert_eq!(decimal_to_float(Decimal::new(12345, 2, true)), -123.45);
        assert_eq!(decimal_to_float(Decimal::new(12345, 0, true)), -12345.0);
        assert_eq!(decimal_to_float(Decimal::new(0, 3, true)), 0.0);
    }

    #[test]
    fn test_scaling_is_monotonic_in_value() {
        let mut previous = f64::NEG_INFINITY;
        for value in (0..2000u64).step_by(7) {
            let current = decimal_to_float(Decimal::new(value, 3, false));
            assert!(current > previous);
            previous = current;
        }
    }

    #[test]
    fn test_parse_decimal_literals() {
        assert_eq!("-123.45".parse::<Decimal>().unwrap(), Decimal::new(12345, 2, true));
        assert_eq!("+7".parse::<Decimal>().unwrap(), Decimal::new(7, 0, false));
        assert_eq!("0.001".parse::<Decimal>().unwrap(), Decimal::new(1, 3, false));
        for bad in ["", "-", "1.", ".5", "1e3", "ten", "1.2.3"] {
            assert!(bad.parse::<Decimal>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_decimal_display_round_trips_text() {
        for text in ["-123.45", "0.001", "42", "-2.01"] {
            assert_eq!(text.parse::<Decimal>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_parse_range_expression() {
        let parts = parse_range_expr("min..10 | 20..100").unwrap();
        assert_eq!(
            parts,
            vec![
                SubRange { min: None, max: Some(int(10)) },
                SubRange::between(int(20), int(100)),
            ]
        );
        assert_eq!(parse_range_expr("5").unwrap(), vec![SubRange::exact(int(5))]);
        assert_eq!(
            parse_range_expr("-1.5..-0.5").unwrap(),
            vec![SubRange::between(
                Decimal::new(15, 1, true),
                Decimal::new(5, 1, true)
            )]
        );
        assert!(parse_range_expr("1..10 |").is_err());
        assert!(parse_range_expr("max..10").is_err());
    }

    // min..10 | 20..100
    #[test]
    fn test_range_double_uint16() {
        let range = vec![
            SubRange { min: None, max: Some(int(10)) },
            SubRange::between(int(20), int(100)),
        ];
        let eff = effective_range(&range, TypeKind::Uint16).unwrap();
        assert_eq!(eff.min, Some(0.0));
        assert_eq!(eff.max, Some(100.0));
    }

    // min..10 | 20..65535: narrow widths keep their upper limit
    #[test]
    fn test_range_double_uint16_full_max() {
        let range = vec![
            SubRange { min: None, max: Some(int(10)) },
            SubRange::between(int(20), int(65535)),
        ];
        let eff = effective_range(&range, TypeKind::Uint16).unwrap();
        assert_eq!(eff.min, Some(0.0));
        assert_eq!(eff.max, Some(65535.0));
    }

    #[test]
    fn test_range_decimal() {
        let range = vec![SubRange::between(
            Decimal::new(201, 2, true),
            Decimal::new(2005, 2, false),
        )];
        let eff = effective_range(&range, TypeKind::Decimal64).unwrap();
        assert_eq!(eff.min, Some(-2.01));
        assert_eq!(eff.max, Some(20.05));
    }

    #[test]
    fn test_range_min_max_int32_omitted() {
        let range = vec![SubRange::between(
            int(i32::MIN as i64),
            int(i32::MAX as i64),
        )];
        let eff = effective_range(&range, TypeKind::Int32).unwrap();
        assert_eq!(eff, EffectiveRange { min: None, max: None });
    }

    #[test]
    fn test_range_min_max_int64_omitted() {
        let range = vec![SubRange::between(
            int(i64::MIN as i64),
            int(i64::MAX as i64),
        )];
        let eff = effective_range(&range, TypeKind::Int64).unwrap();
        assert_eq!(eff, EffectiveRange { min: None, max: None });
    }

    #[test]
    fn test_range_min_max_uint32_keeps_zero() {
        let range = vec![SubRange::between(int(0), int(u32::MAX as i64))];
        let eff = effective_range(&range, TypeKind::Uint32).unwrap();
        assert_eq!(eff.min, Some(0.0));
        assert_eq!(eff.max, None);
    }

    #[test]
    fn test_range_keywords_clamp_to_domain() {
        let range = vec![SubRange { min: None, max: None }];
        let eff = effective_range(&range, TypeKind::Int8).unwrap();
        assert_eq!(eff.min, Some(-128.0));
        assert_eq!(eff.max, Some(127.0));

        let eff = effective_range(&range, TypeKind::Int32).unwrap();
        assert_eq!(eff, EffectiveRange::default());

        // decimal64 has no fixed domain here, keywords stay open
        let range = vec![SubRange { min: None, max: Some(int(5)) }];
        let eff = effective_range(&range, TypeKind::Decimal64).unwrap();
        assert_eq!(eff.min, None);
        assert_eq!(eff.max, Some(5.0));
    }

    #[test]
    fn test_empty_range_has_no_bounds() {
        let eff = effective_range(&[], TypeKind::Uint8).unwrap();
        assert_eq!(eff, EffectiveRange::default());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let range = vec![SubRange::between(int(20), int(10))];
        let err = effective_range(&range, TypeKind::Int16).unwrap_err();
        match err {
            AppError::MalformedRange { node, .. } => assert_eq!(node, "20..10"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_effective_length() {
        let length = vec![SubRange::between(int(20), int(30))];
        assert_eq!(effective_length(&length).unwrap(), (Some(20), Some(30)));

        let length = vec![
            SubRange::between(int(0), int(4)),
            SubRange { min: Some(int(8)), max: None },
        ];
        assert_eq!(effective_length(&length).unwrap(), (None, None));

        let length = vec![SubRange::between(Decimal::new(15, 1, false), int(3))];
        assert!(effective_length(&length).is_err());
    }
}
