//! Leaf type descriptors: primitive kinds, range numbers and constraint sets.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;

use crate::TreeError;

/// YANG built-in type of a leaf or leaf-list, after typedef resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum TypeKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal64,
    String,
    Boolean,
    Binary,
    Empty,
    Enumeration,
    Identityref,
    Union,
    Leafref,
    Bits,
    InstanceIdentifier,
}

impl TypeKind {
    /// YANG keyword for this kind (e.g. `uint32`, `instance-identifier`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Decimal64 => "decimal64",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Binary => "binary",
            Self::Empty => "empty",
            Self::Enumeration => "enumeration",
            Self::Identityref => "identityref",
            Self::Union => "union",
            Self::Leafref => "leafref",
            Self::Bits => "bits",
            Self::InstanceIdentifier => "instance-identifier",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An exact YANG range bound: `value × 10^-fraction_digits`, with sign.
///
/// Kept unscaled so `18446744073709551615` and `-9223372036854775808` survive
/// the hand-off intact. Ordering and equality compare exact values, so `2`
/// and `2.000` are equal.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(try_from = "NumberRepr")]
pub struct Number {
    /// Unsigned magnitude.
    pub value: u64,
    /// Number of decimal digits after the point (decimal64 only).
    pub fraction_digits: u8,
    /// Sign.
    pub negative: bool,
}

impl Number {
    /// A whole number.
    #[must_use]
    pub fn int(n: i128) -> Self {
        Self {
            value: u64::try_from(n.unsigned_abs()).unwrap_or(u64::MAX),
            fraction_digits: 0,
            negative: n < 0,
        }
    }

    /// The exact integer value, if the number has no fractional part.
    #[must_use]
    pub fn to_integer(self) -> Option<i128> {
        let Some(divisor) = 10u64.checked_pow(u32::from(self.fraction_digits)) else {
            return (self.value == 0).then_some(0);
        };
        if self.value % divisor != 0 {
            return None;
        }
        let magnitude = i128::from(self.value / divisor);
        Some(if self.negative { -magnitude } else { magnitude })
    }

    /// Signed value scaled to `digits` fraction digits, if it fits.
    fn scaled(self, digits: u8) -> Option<i128> {
        let shift = u32::from(digits.checked_sub(self.fraction_digits)?);
        let magnitude = i128::from(self.value).checked_mul(10i128.checked_pow(shift)?)?;
        Some(if self.negative { -magnitude } else { magnitude })
    }

    /// Floating-point value of the bound (approximate for wide integers).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        let sign = if self.negative { -1.0 } else { 1.0 };
        sign * self.value as f64 / 10f64.powi(i32::from(self.fraction_digits))
    }

    fn parse(text: &str) -> Result<Self, TreeError> {
        let invalid = || TreeError::InvalidNumber(text.to_string());
        let trimmed = text.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let value = format!("{whole}{fraction}").parse::<u64>().map_err(|_| invalid())?;
        let fraction_digits = u8::try_from(fraction.len()).map_err(|_| invalid())?;
        Ok(Self {
            value,
            fraction_digits,
            negative: negative && value != 0,
        })
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let digits = self.value.to_string();
        let fraction = usize::from(self.fraction_digits);
        if fraction == 0 {
            return f.write_str(&digits);
        }
        let padded = format!("{digits:0>width$}", width = fraction + 1);
        let (whole, part) = padded.split_at(padded.len() - fraction);
        write!(f, "{whole}.{part}")
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let digits = self.fraction_digits.max(other.fraction_digits);
        match (self.scaled(digits), other.scaled(digits)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

/// Accepted spellings of a range bound in a tree description.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl TryFrom<NumberRepr> for Number {
    type Error = TreeError;

    fn try_from(repr: NumberRepr) -> Result<Self, Self::Error> {
        match repr {
            NumberRepr::Unsigned(n) => Ok(Self::int(i128::from(n))),
            NumberRepr::Signed(n) => Ok(Self::int(i128::from(n))),
            NumberRepr::Float(f) => Self::parse(&f.to_string()),
            NumberRepr::Text(s) => Self::parse(&s),
        }
    }
}

/// One `min..max` part of a range or length statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Interval {
    /// Lower bound (inclusive).
    pub min: Number,
    /// Upper bound (inclusive).
    pub max: Number,
}

/// A YANG range/length statement: one or more disjoint intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct YangRange(pub Vec<Interval>);

impl YangRange {
    /// Iterate over the intervals in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.0.iter()
    }
}

/// Resolved type of a leaf or leaf-list.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafType {
    /// Built-in kind.
    pub kind: TypeKind,
    /// Declared type name (typedef name or built-in keyword), used in messages.
    pub name: String,
    /// `length` statement (string, binary).
    pub length: Option<YangRange>,
    /// `range` statement (numeric kinds).
    pub range: Option<YangRange>,
    /// `pattern` statements in declaration order.
    pub patterns: Vec<String>,
    /// `default` statement, unparsed.
    pub default: Option<String>,
    /// Enum names or identities derived from the identityref base.
    pub enum_values: Vec<String>,
    /// leafref `path` expression.
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_parses_decimal_text() {
        let n = Number::parse("-12.50").unwrap();
        assert_eq!(n.value, 1250);
        assert_eq!(n.fraction_digits, 2);
        assert!(n.negative);
        assert!((n.as_f64() + 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn number_rejects_garbage() {
        assert!(Number::parse("max").is_err());
        assert!(Number::parse("1..2").is_err());
        assert!(Number::parse("").is_err());
    }

    #[test]
    fn number_keeps_u64_max_exact() {
        let n: Number = serde_yaml_ng::from_str("18446744073709551615").unwrap();
        assert_eq!(n.value, u64::MAX);
        assert!(!n.negative);
    }

    #[test]
    fn number_keeps_i64_min() {
        let n: Number = serde_yaml_ng::from_str("-9223372036854775808").unwrap();
        assert!(n.negative);
        #[allow(clippy::cast_precision_loss)]
        let expected = i64::MIN as f64;
        assert!((n.as_f64() - expected).abs() < 1.0);
    }

    #[test]
    fn ordering_is_exact_near_u64_max() {
        let max = Number::int(i128::from(u64::MAX));
        let below: Number = serde_yaml_ng::from_str("18446744073709551000").unwrap();
        assert!(below < max);
        assert_ne!(below, max);
        assert_eq!(below.to_integer(), Some(18_446_744_073_709_551_000));
    }

    #[test]
    fn decimals_compare_by_value() {
        let two = Number::parse("2.000").unwrap();
        assert_eq!(two, Number::int(2));
        assert_eq!(two.to_integer(), Some(2));
        assert!(Number::parse("0.001").unwrap() < Number::parse("0.01").unwrap());
        assert!(Number::parse("-1.5").unwrap() < Number::int(-1));
        assert_eq!(Number::parse("0.001").unwrap().to_integer(), None);
    }

    #[test]
    fn display_keeps_decimal_text() {
        assert_eq!(Number::parse("-12.50").unwrap().to_string(), "-12.50");
        assert_eq!(Number::parse("0.001").unwrap().to_string(), "0.001");
        assert_eq!(Number::int(i128::from(u64::MAX)).to_string(), "18446744073709551615");
    }

    #[test]
    fn negative_zero_is_zero() {
        let n = Number::parse("-0").unwrap();
        assert!(!n.negative);
    }

    #[test]
    fn type_kind_keywords() {
        let kind: TypeKind = serde_yaml_ng::from_str("instance-identifier").unwrap();
        assert_eq!(kind, TypeKind::InstanceIdentifier);
        assert_eq!(TypeKind::Uint64.to_string(), "uint64");
    }
}
