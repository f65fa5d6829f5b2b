//! Numeric coercion between boxed values and the canonical `f64` form.
//!
//! Arithmetic and ordering nodes widen their operands to `f64`, operate in
//! that domain, and narrow the result back to the base operand's runtime
//! type. Feeding a non-numeric value to either direction is an explicit
//! [`Error::UnsupportedNumericType`], never a sentinel.

use crate::error::Error;
use crate::value::{Value, ValueKind, ValueType};

/// Widens a boxed numeric value to the canonical `f64` representation.
pub fn to_canonical(value: &Value) -> Result<f64, Error> {
    match value.kind() {
        ValueKind::Int8(v) => Ok(*v as f64),
        ValueKind::Int16(v) => Ok(*v as f64),
        ValueKind::Int32(v) => Ok(*v as f64),
        ValueKind::Int64(v) => Ok(*v as f64),
        ValueKind::Float32(v) => Ok(*v as f64),
        ValueKind::Float64(v) => Ok(*v),
        _ => Err(Error::UnsupportedNumericType(value.type_of())),
    }
}

/// Narrows a canonical `f64` back to the requested numeric representation.
///
/// Integer targets truncate toward zero into the 64-bit integer domain
/// (saturating at the `i64` bounds, with NaN mapping to zero) and then wrap
/// modulo 2^width into the target width.
pub fn from_canonical(value: f64, target: ValueType) -> Result<Value, Error> {
    let wide = value as i64;
    match target {
        ValueType::Int8 => Ok(Value::from(wide as i8)),
        ValueType::Int16 => Ok(Value::from(wide as i16)),
        ValueType::Int32 => Ok(Value::from(wide as i32)),
        ValueType::Int64 => Ok(Value::from(wide)),
        ValueType::Float32 => Ok(Value::from(value as f32)),
        ValueType::Float64 => Ok(Value::from(value)),
        _ => Err(Error::UnsupportedNumericType(target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(Value::from(5_i8), 5.0)]
    #[case(Value::from(-12_i16), -12.0)]
    #[case(Value::from(1_000_000_i32), 1_000_000.0)]
    #[case(Value::from(1_i64 << 40), (1_i64 << 40) as f64)]
    #[case(Value::from(1.5_f32), 1.5)]
    #[case(Value::from(-0.25_f64), -0.25)]
    fn test_to_canonical_widens(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(to_canonical(&value).unwrap(), expected);
    }

    #[rstest]
    #[case(Value::from(true), ValueType::Bool)]
    #[case(Value::from("5"), ValueType::String)]
    #[case(Value::none(), ValueType::None)]
    fn test_to_canonical_rejects_non_numeric(#[case] value: Value, #[case] got: ValueType) {
        assert!(matches!(
            to_canonical(&value),
            Err(Error::UnsupportedNumericType(t)) if t == got
        ));
    }

    #[rstest]
    #[case(300.7, ValueType::Int64, Value::from(300_i64))]
    #[case(-300.7, ValueType::Int64, Value::from(-300_i64))]
    #[case(f64::NAN, ValueType::Int64, Value::from(0_i64))]
    #[case(1e300, ValueType::Int64, Value::from(i64::MAX))]
    #[case(300.7, ValueType::Int32, Value::from(300_i32))]
    #[case(39_000_000_000.0, ValueType::Int32, Value::from(39_000_000_000_i64 as i32))]
    #[case(70_000.5, ValueType::Int16, Value::from(4_464_i16))]
    #[case(300.7, ValueType::Int8, Value::from(44_i8))]
    #[case(-300.7, ValueType::Int8, Value::from(-44_i8))]
    #[case(1.5, ValueType::Float32, Value::from(1.5_f32))]
    #[case(1.5, ValueType::Float64, Value::from(1.5_f64))]
    fn test_from_canonical_narrows(
        #[case] value: f64,
        #[case] target: ValueType,
        #[case] expected: Value,
    ) {
        assert_eq!(from_canonical(value, target).unwrap(), expected);
    }

    #[test]
    fn test_from_canonical_preserves_infinity() {
        let inf = from_canonical(f64::INFINITY, ValueType::Float64).unwrap();
        assert_eq!(inf.as_f64(), Some(f64::INFINITY));
    }

    #[rstest]
    #[case(ValueType::Bool)]
    #[case(ValueType::String)]
    #[case(ValueType::Object)]
    #[case(ValueType::None)]
    fn test_from_canonical_rejects_non_numeric(#[case] target: ValueType) {
        assert!(matches!(
            from_canonical(1.0, target),
            Err(Error::UnsupportedNumericType(t)) if t == target
        ));
    }
}
