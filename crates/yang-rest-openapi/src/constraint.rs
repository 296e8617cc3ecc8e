//! Leaf type → scalar schema translation.
//!
//! - Width selection per YANG kind
//! - `length` → `minLength`/`maxLength`, `range` → `minimum`/`maximum`
//! - Sentinel bounds (e.g. `int32` min/max) are left to the format width
//! - Defaults parsed into the exact width of the leaf type
//! - Enumeration and identity names → sorted `enum`

use std::fmt::Display;
use std::str::FromStr;

use yang_rest_core::{LeafType, NodeId, Number, SchemaTree, TypeKind, YangRange};

use crate::document::{Bound, DefaultValue, Schema};
use crate::error::{Error, Result};
use crate::extensions::LEAFREF_EXTENSION;
use crate::leafref;

/// Build the scalar schema of a leaf (without title, description or required).
///
/// # Errors
///
/// - [`Error::UnhandledType`] for `bits` and `instance-identifier`
/// - [`Error::InvalidDefault`] when a numeric default does not fit its width
/// - [`Error::EmptyRange`] for a `range`/`length` with no intervals
pub(crate) fn leaf_schema(
    tree: &SchemaTree,
    leaf: NodeId,
    ty: &LeafType,
    path: &str,
) -> Result<Schema> {
    let schema = match ty.kind {
        TypeKind::String => {
            let mut s = Schema::string();
            apply_length(&mut s, ty, path)?;
            // Only one pattern fits in a schema; the first one wins.
            s.pattern = ty.patterns.first().cloned();
            s.default = string_default(ty);
            s
        }
        TypeKind::Union => Schema {
            default: string_default(ty),
            ..Schema::string()
        },
        TypeKind::Leafref => {
            let mut s = match leafref::resolve_kind(tree, leaf) {
                TypeKind::Int8 | TypeKind::Int16 | TypeKind::Uint8 | TypeKind::Uint16 => {
                    Schema::integer()
                }
                TypeKind::Int32 | TypeKind::Uint32 => Schema::int32(),
                TypeKind::Int64 | TypeKind::Uint64 => Schema::int64(),
                _ => Schema::string(),
            };
            s.default = string_default(ty);
            if let Some(expr) = &ty.path {
                s.set_extension(LEAFREF_EXTENSION, expr.as_str());
            }
            s
        }
        TypeKind::Enumeration | TypeKind::Identityref => {
            let mut values = ty.enum_values.clone();
            values.sort();
            Schema {
                enum_values: values,
                ..Schema::string()
            }
        }
        TypeKind::Boolean => Schema {
            default: match ty.default.as_deref() {
                Some("true") => Some(DefaultValue::Bool(true)),
                Some("false") => Some(DefaultValue::Bool(false)),
                _ => None,
            },
            ..Schema::boolean()
        },
        TypeKind::Int8
        | TypeKind::Int16
        | TypeKind::Int32
        | TypeKind::Int64
        | TypeKind::Uint8
        | TypeKind::Uint16
        | TypeKind::Uint32
        | TypeKind::Uint64
        | TypeKind::Decimal64 => {
            let mut s = match ty.kind {
                TypeKind::Int32 | TypeKind::Uint32 => Schema::int32(),
                TypeKind::Int64 | TypeKind::Uint64 => Schema::int64(),
                TypeKind::Decimal64 => Schema::float64(),
                _ => Schema::integer(),
            };
            s.default = numeric_default(ty, path)?;
            if let Some(range) = &ty.range {
                let (min, max) = range_bounds(range, ty.kind, path)?;
                s.minimum = min.map(bound);
                s.maximum = max.map(bound);
            }
            s
        }
        TypeKind::Binary => {
            let mut s = Schema::bytes();
            apply_length(&mut s, ty, path)?;
            s.default = string_default(ty);
            s
        }
        TypeKind::Empty => Schema {
            max_length: Some(0),
            ..Schema::string()
        },
        TypeKind::Bits | TypeKind::InstanceIdentifier => {
            return Err(Error::UnhandledType {
                path: path.to_string(),
                type_name: format!("{} ({})", ty.kind, ty.name),
            });
        }
    };
    Ok(schema)
}

fn string_default(ty: &LeafType) -> Option<DefaultValue> {
    ty.default.clone().map(DefaultValue::String)
}

fn apply_length(schema: &mut Schema, ty: &LeafType, path: &str) -> Result<()> {
    if let Some(length) = &ty.length {
        let (min, max) = range_bounds(length, ty.kind, path)?;
        schema.min_length = min.map(|n| length_bound(n, path)).transpose()?;
        schema.max_length = max.map(|n| length_bound(n, path)).transpose()?;
    }
    Ok(())
}

fn length_bound(n: Number, path: &str) -> Result<u64> {
    n.to_integer()
        .and_then(|i| u64::try_from(i).ok())
        .ok_or_else(|| Error::InvalidLength {
            path: path.to_string(),
            bound: n.to_string(),
        })
}

/// Emitted form of a range bound; whole numbers stay exact.
#[allow(clippy::cast_precision_loss)]
fn bound(n: Number) -> Bound {
    match n.to_integer() {
        Some(i) if i < 0 => i64::try_from(i).map_or(Bound::Decimal(n.as_f64()), Bound::Signed),
        Some(i) => u64::try_from(i).map_or(Bound::Decimal(n.as_f64()), Bound::Unsigned),
        None => Bound::Decimal(n.as_f64()),
    }
}

/// Lowest value the target width already enforces, if any.
fn width_min(kind: TypeKind) -> Option<Number> {
    match kind {
        TypeKind::Int32 => Some(Number::int(i32::MIN.into())),
        TypeKind::Int64 => Some(Number::int(i64::MIN.into())),
        _ => None,
    }
}

/// Highest value the target width already enforces, if any.
///
/// `uint32` maps to `int32` and `uint64` to `int64`; their maxima are still
/// treated as "no bound" and left to the implementation. An unrestricted
/// string or binary length is written as `u64::MAX`.
fn width_max(kind: TypeKind) -> Option<Number> {
    match kind {
        TypeKind::Int32 => Some(Number::int(i32::MAX.into())),
        TypeKind::Int64 => Some(Number::int(i64::MAX.into())),
        TypeKind::Uint32 => Some(Number::int(u32::MAX.into())),
        TypeKind::Uint64 | TypeKind::String | TypeKind::Binary => {
            Some(Number::int(u64::MAX.into()))
        }
        _ => None,
    }
}

/// Collapse a multi-interval range into one overall `[min, max]`.
///
/// A bound equal to the width sentinel of `kind` is returned as `None`.
/// Comparison is exact, so a bound one below a sentinel is kept.
///
/// # Errors
///
/// Returns [`Error::EmptyRange`] if `range` has no intervals.
pub(crate) fn range_bounds(
    range: &YangRange,
    kind: TypeKind,
    path: &str,
) -> Result<(Option<Number>, Option<Number>)> {
    let min = range.iter().map(|i| i.min).min();
    let max = range.iter().map(|i| i.max).max();
    let (Some(min), Some(max)) = (min, max) else {
        return Err(Error::EmptyRange {
            path: path.to_string(),
        });
    };

    let min = (width_min(kind) != Some(min)).then_some(min);
    let max = (width_max(kind) != Some(max)).then_some(max);
    Ok((min, max))
}

/// Parse a numeric default into the exact width of the leaf type.
fn numeric_default(ty: &LeafType, path: &str) -> Result<Option<DefaultValue>> {
    let Some(value) = ty.default.as_deref() else {
        return Ok(None);
    };

    let parsed = match ty.kind {
        TypeKind::Int8 => parse(value, ty.kind, path).map(DefaultValue::Int8)?,
        TypeKind::Uint8 => parse(value, ty.kind, path).map(DefaultValue::Uint8)?,
        TypeKind::Int16 => parse(value, ty.kind, path).map(DefaultValue::Int16)?,
        TypeKind::Uint16 => parse(value, ty.kind, path).map(DefaultValue::Uint16)?,
        TypeKind::Int32 => parse(value, ty.kind, path).map(DefaultValue::Int32)?,
        TypeKind::Uint32 => parse(value, ty.kind, path).map(DefaultValue::Uint32)?,
        TypeKind::Int64 => parse(value, ty.kind, path).map(DefaultValue::Int64)?,
        TypeKind::Uint64 => parse(value, ty.kind, path).map(DefaultValue::Uint64)?,
        TypeKind::Decimal64 => parse(value, ty.kind, path).map(DefaultValue::Float64)?,
        _ => return Ok(None),
    };
    Ok(Some(parsed))
}

fn parse<T>(value: &str, kind: TypeKind, path: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| Error::InvalidDefault {
        path: path.to_string(),
        value: value.to_string(),
        kind: kind.as_str(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SchemaType;
    use indoc::formatdoc;
    use pretty_assertions::assert_eq;
    use yang_rest_core::{Interval, NodeSpec};

    /// Build `Device/leaf` with the given inline type and translate it.
    fn translate(type_yaml: &str) -> Result<Schema> {
        let yaml = formatdoc! {"
            name: Device
            children:
              - name: leaf
                kind: leaf
                type: {type_yaml}
        ", type_yaml = type_yaml};
        let spec: NodeSpec = serde_yaml_ng::from_str(&yaml).unwrap();
        let tree = SchemaTree::from_spec(&spec).unwrap();
        let leaf = tree.child(tree.root(), "leaf").unwrap();
        let ty = tree.node(leaf).kind.leaf_type().unwrap();
        leaf_schema(&tree, leaf, ty, "/leaf")
    }

    fn range(bounds: &[(i128, i128)]) -> YangRange {
        YangRange(
            bounds
                .iter()
                .map(|&(min, max)| Interval {
                    min: Number::int(min),
                    max: Number::int(max),
                })
                .collect(),
        )
    }

    #[test]
    fn int32_full_range_has_no_bounds() {
        let s = translate("{ kind: int32, range: [{ min: -2147483648, max: 2147483647 }] }")
            .unwrap();
        assert_eq!(s.format.as_deref(), Some("int32"));
        assert_eq!(s.minimum, None);
        assert_eq!(s.maximum, None);
    }

    #[test]
    fn exact_bounds_are_kept() {
        let s = translate("{ kind: int32, range: [{ min: -10, max: 100 }] }").unwrap();
        assert_eq!(s.minimum, Some(Bound::Signed(-10)));
        assert_eq!(s.maximum, Some(Bound::Unsigned(100)));
    }

    #[test]
    fn disjoint_ranges_merge() {
        let (min, max) = range_bounds(&range(&[(10, 20), (-5, 0), (30, 40)]), TypeKind::Int16, "/x")
            .unwrap();
        assert_eq!(min, Some(Number::int(-5)));
        assert_eq!(max, Some(Number::int(40)));
    }

    #[test]
    fn sentinel_on_one_side_only() {
        let (min, max) = range_bounds(
            &range(&[(i128::from(i64::MIN), -1), (1, 10)]),
            TypeKind::Int64,
            "/x",
        )
        .unwrap();
        assert_eq!(min, None);
        assert_eq!(max, Some(Number::int(10)));

        let (min, max) =
            range_bounds(&range(&[(0, i128::from(u32::MAX))]), TypeKind::Uint32, "/x").unwrap();
        assert_eq!(min, Some(Number::int(0)));
        assert_eq!(max, None);
    }

    #[test]
    fn narrow_widths_keep_extremes() {
        let (min, max) = range_bounds(&range(&[(-128, 127)]), TypeKind::Int8, "/x").unwrap();
        assert_eq!(min, Some(Number::int(-128)));
        assert_eq!(max, Some(Number::int(127)));
    }

    #[test]
    fn uint64_sentinel_is_exact() {
        let s = translate("{ kind: uint64, range: [{ min: 0, max: 18446744073709551615 }] }")
            .unwrap();
        assert_eq!(s.format.as_deref(), Some("int64"));
        assert_eq!(s.minimum, Some(Bound::Unsigned(0)));
        assert_eq!(s.maximum, None);

        let s = translate("{ kind: uint64, range: [{ min: 0, max: 18446744073709551000 }] }")
            .unwrap();
        assert_eq!(s.maximum, Some(Bound::Unsigned(18_446_744_073_709_551_000)));
    }

    #[test]
    fn wide_integer_bounds_are_not_rounded() {
        let s = translate(
            "{ kind: int64, range: [{ min: -9007199254740993, max: 9007199254740993 }] }",
        )
        .unwrap();
        assert_eq!(s.minimum, Some(Bound::Signed(-9_007_199_254_740_993)));
        assert_eq!(s.maximum, Some(Bound::Unsigned(9_007_199_254_740_993)));

        let s = translate("{ kind: int64, range: [{ min: -9223372036854775807, max: 0 }] }")
            .unwrap();
        assert_eq!(s.minimum, Some(Bound::Signed(-9_223_372_036_854_775_807)));
    }

    #[test]
    fn decimal_bounds() {
        let s = translate("{ kind: decimal64, range: [{ min: '-0.5', max: '2.000' }] }").unwrap();
        assert_eq!(s.minimum, Some(Bound::Decimal(-0.5)));
        assert_eq!(s.maximum, Some(Bound::Unsigned(2)));
    }

    #[test]
    fn empty_range_is_an_error() {
        let err = range_bounds(&YangRange::default(), TypeKind::Int8, "/x").unwrap_err();
        assert!(matches!(err, Error::EmptyRange { ref path } if path == "/x"));
    }

    #[test]
    fn string_length_and_first_pattern() {
        let s = translate(
            "{ kind: string, length: [{ min: 5, max: 10 }], pattern: ['[a-z]+', '[0-9]+'], default: abcde }",
        )
        .unwrap();
        assert_eq!(s.min_length, Some(5));
        assert_eq!(s.max_length, Some(10));
        assert_eq!(s.pattern.as_deref(), Some("[a-z]+"));
        assert_eq!(s.default, Some(DefaultValue::String("abcde".to_string())));
    }

    #[test]
    fn unbounded_string_length_is_omitted() {
        let s = translate("{ kind: string, length: [{ min: 1, max: 18446744073709551615 }] }")
            .unwrap();
        assert_eq!(s.min_length, Some(1));
        assert_eq!(s.max_length, None);
    }

    #[test]
    fn unbounded_binary_length_is_omitted() {
        let s = translate("{ kind: binary, length: [{ min: 0, max: 18446744073709551615 }] }")
            .unwrap();
        assert_eq!(s.min_length, Some(0));
        assert_eq!(s.max_length, None);

        let s = translate("{ kind: binary, length: [{ min: 0, max: 18446744073709551614 }] }")
            .unwrap();
        assert_eq!(s.max_length, Some(18_446_744_073_709_551_614));
    }

    #[test]
    fn fractional_length_is_an_error() {
        let err = translate("{ kind: string, length: [{ min: '0.5', max: 4 }] }").unwrap_err();
        assert!(matches!(err, Error::InvalidLength { ref bound, .. } if bound == "0.5"));
    }

    #[test]
    fn binary_is_byte_string() {
        let s = translate("{ kind: binary, length: [{ min: 0, max: 64 }] }").unwrap();
        assert_eq!(s.schema_type, Some(SchemaType::String));
        assert_eq!(s.format.as_deref(), Some("byte"));
        assert_eq!(s.max_length, Some(64));
    }

    #[test]
    fn numeric_defaults_are_width_sized() {
        let s = translate("{ kind: uint8, default: 200 }").unwrap();
        assert_eq!(s.default, Some(DefaultValue::Uint8(200)));
        let s = translate("{ kind: int64, default: -5 }").unwrap();
        assert_eq!(s.default, Some(DefaultValue::Int64(-5)));
        let s = translate("{ kind: decimal64, default: '2.5' }").unwrap();
        assert_eq!(s.default, Some(DefaultValue::Float64(2.5)));
        assert_eq!(s.format.as_deref(), Some("double"));
    }

    #[test]
    fn out_of_width_default_is_an_error() {
        let err = translate("{ kind: uint8, default: 300 }").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDefault { ref value, kind: "uint8", .. } if value == "300"
        ));
    }

    #[test]
    fn boolean_default() {
        let s = translate("{ kind: boolean, default: true }").unwrap();
        assert_eq!(s.default, Some(DefaultValue::Bool(true)));
        let s = translate("{ kind: boolean, default: maybe }").unwrap();
        assert_eq!(s.default, None);
    }

    #[test]
    fn enum_values_are_sorted() {
        let s = translate("{ kind: identityref, enum: [zeta, alpha, mid] }").unwrap();
        assert_eq!(s.enum_values, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn empty_type_has_zero_max_length() {
        let s = translate("{ kind: empty }").unwrap();
        assert_eq!(s.max_length, Some(0));
    }

    #[test]
    fn bits_are_unhandled() {
        let err = translate("{ kind: bits, name: flags }").unwrap_err();
        assert_eq!(err.to_string(), "unhandled leaf type bits (flags) at '/leaf'");
    }

    #[test]
    fn unresolved_leafref_is_a_string() {
        let s = translate("{ kind: leafref, path: ../nowhere }").unwrap();
        assert_eq!(s.schema_type, Some(SchemaType::String));
        assert_eq!(s.extensions["x-leafref"], "../nowhere");
    }
}
