//! Value types for stash
//!
//! This module defines:
//! - Value: Unified enum for all storable data types
//! - ValueMap: String-keyed map of values, the shape of one store instance
//! - ValueTag: The closed discriminant set
//!
//! ## Canonical Value Model (Frozen)
//!
//! The Value enum has exactly 10 variants:
//! - Null, Bool, I32, U32, I64, U64, F64, String, Array, Object
//!
//! ### Type Rules
//!
//! - Ten tags only; the set is closed and dispatch is by tag
//! - No implicit coercions: `I32(1) != U32(1) != F64(1.0)`
//! - F64 uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Arrays preserve order; Object keys are unique, order not significant
//! - Containers own their children exclusively, so cycles cannot exist

use crate::error::StoreError;
use std::collections::HashMap;
use std::fmt;

/// String-keyed map of values.
///
/// This is both the in-memory shape of one store instance and the payload
/// of an `Object` value.
pub type ValueMap = HashMap<String, Value>;

/// Discriminant of the [`Value`] union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    /// Null value
    Null,
    /// Boolean
    Bool,
    /// 32-bit signed integer
    I32,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit signed integer
    I64,
    /// 64-bit unsigned integer
    U64,
    /// 64-bit IEEE-754 float
    F64,
    /// UTF-8 string
    String,
    /// Ordered array of values
    Array,
    /// String-keyed object
    Object,
}

impl ValueTag {
    /// Get the tag name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueTag::Null => "Null",
            ValueTag::Bool => "Bool",
            ValueTag::I32 => "I32",
            ValueTag::U32 => "U32",
            ValueTag::I64 => "I64",
            ValueTag::U64 => "U64",
            ValueTag::F64 => "F64",
            ValueTag::String => "String",
            ValueTag::Array => "Array",
            ValueTag::Object => "Object",
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical stash value type
///
/// Every stored value satisfies exactly one tag. The caller's declared
/// type determines the stored tag on write, and tags are preserved
/// through serialization — reading back never widens or narrows.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit signed integer
    I32(i32),
    /// 32-bit unsigned integer
    U32(u32),
    /// 64-bit signed integer
    I64(i64),
    /// 64-bit unsigned integer
    U64(u64),
    /// 64-bit floating point (IEEE-754)
    F64(f64),
    /// UTF-8 string
    String(String),
    /// Array of values (order preserved)
    Array(Vec<Value>),
    /// Object with string keys
    Object(ValueMap),
}

// Custom PartialEq: type-strict structural equality with IEEE-754 float
// semantics. Different tags are never equal, even for the same numeral.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            _ => false,
        }
    }
}

impl Value {
    /// Get the tag of this value
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Null => ValueTag::Null,
            Value::Bool(_) => ValueTag::Bool,
            Value::I32(_) => ValueTag::I32,
            Value::U32(_) => ValueTag::U32,
            Value::I64(_) => ValueTag::I64,
            Value::U64(_) => ValueTag::U64,
            Value::F64(_) => ValueTag::F64,
            Value::String(_) => ValueTag::String,
            Value::Array(_) => ValueTag::Array,
            Value::Object(_) => ValueTag::Object,
        }
    }

    /// Get the tag name as a string
    pub fn type_name(&self) -> &'static str {
        self.tag().as_str()
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a boolean value
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if this is an object value
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i32 if this is an I32 value
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as u32 if this is a U32 value
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as i64 if this is an I64 value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as u64 if this is a U64 value
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as f64 if this is an F64 value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &ValueMap if this is an Object value
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::I32(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::U32(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::I64(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::U64(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::F64(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<ValueMap> for Value {
    fn from(o: ValueMap) -> Self {
        Value::Object(o)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// ============================================================================
// TryFrom implementations for typed reads
//
// These back `KvStore::get_value_as::<T>()`; a tag disagreement surfaces
// as TypeMismatch rather than coercing.
// ============================================================================

macro_rules! impl_try_from_value {
    ($to:ty, $variant:ident) => {
        impl TryFrom<&Value> for $to {
            type Error = StoreError;
            fn try_from(value: &Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(inner) => Ok(inner.clone()),
                    other => Err(StoreError::type_mismatch(ValueTag::$variant, other.tag())),
                }
            }
        }
    };
}

impl_try_from_value!(bool, Bool);
impl_try_from_value!(i32, I32);
impl_try_from_value!(u32, U32);
impl_try_from_value!(i64, I64);
impl_try_from_value!(u64, U64);
impl_try_from_value!(f64, F64);
impl_try_from_value!(String, String);
impl_try_from_value!(Vec<Value>, Array);
impl_try_from_value!(ValueMap, Object);

impl TryFrom<&Value> for () {
    type Error = StoreError;
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(()),
            other => Err(StoreError::type_mismatch(ValueTag::Null, other.tag())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_tags_cover_all_variants() {
        assert_eq!(Value::Null.tag(), ValueTag::Null);
        assert_eq!(Value::Bool(true).tag(), ValueTag::Bool);
        assert_eq!(Value::I32(1).tag(), ValueTag::I32);
        assert_eq!(Value::U32(1).tag(), ValueTag::U32);
        assert_eq!(Value::I64(1).tag(), ValueTag::I64);
        assert_eq!(Value::U64(1).tag(), ValueTag::U64);
        assert_eq!(Value::F64(1.0).tag(), ValueTag::F64);
        assert_eq!(Value::String("".into()).tag(), ValueTag::String);
        assert_eq!(Value::Array(vec![]).tag(), ValueTag::Array);
        assert_eq!(Value::Object(ValueMap::new()).tag(), ValueTag::Object);
    }

    // Different tags are NEVER equal, even for the same numeral.
    #[test]
    fn test_numeric_tags_not_coerced() {
        assert_ne!(Value::I32(1), Value::U32(1));
        assert_ne!(Value::I32(1), Value::I64(1));
        assert_ne!(Value::I32(1), Value::F64(1.0));
        assert_ne!(Value::U64(1), Value::I64(1));
    }

    #[test]
    fn test_nan_not_equal_nan() {
        assert_ne!(Value::F64(f64::NAN), Value::F64(f64::NAN));
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        assert_eq!(Value::F64(-0.0), Value::F64(0.0));
    }

    #[test]
    fn test_array_order_significant() {
        let a = Value::Array(vec![Value::I32(1), Value::I32(2)]);
        let b = Value::Array(vec![Value::I32(2), Value::I32(1)]);
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn test_object_order_not_significant() {
        let mut left = ValueMap::new();
        left.insert("a".into(), Value::I32(1));
        left.insert("b".into(), Value::from("x"));

        let mut right = ValueMap::new();
        right.insert("b".into(), Value::from("x"));
        right.insert("a".into(), Value::I32(1));

        assert_eq!(Value::Object(left), Value::Object(right));
    }

    #[test]
    fn test_deep_equality_nested() {
        let make = || {
            let mut inner = ValueMap::new();
            inner.insert("list".into(), Value::Array(vec![Value::U64(9), Value::Null]));
            Value::Object(inner)
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::I32(-5).as_i32(), Some(-5));
        assert_eq!(Value::U32(5).as_u32(), Some(5));
        assert_eq!(Value::I64(-9).as_i64(), Some(-9));
        assert_eq!(Value::U64(9).as_u64(), Some(9));
        assert_eq!(Value::F64(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert!(Value::Null.is_null());
        // Accessors do not coerce across tags.
        assert_eq!(Value::I32(1).as_u32(), None);
        assert_eq!(Value::F64(1.0).as_i64(), None);
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7_i32), Value::I32(7));
        assert_eq!(Value::from(7_u32), Value::U32(7));
        assert_eq!(Value::from(7_i64), Value::I64(7));
        assert_eq!(Value::from(7_u64), Value::U64(7));
        assert_eq!(Value::from(7.0_f64), Value::F64(7.0));
        assert_eq!(Value::from("s"), Value::String("s".into()));
        assert_eq!(Value::from(()), Value::Null);
    }

    #[test]
    fn test_try_from_success() {
        assert_eq!(i32::try_from(&Value::I32(3)).unwrap(), 3);
        assert_eq!(String::try_from(&Value::from("v")).unwrap(), "v");
        assert_eq!(<()>::try_from(&Value::Null).unwrap(), ());
        let arr = Vec::<Value>::try_from(&Value::Array(vec![Value::Bool(false)])).unwrap();
        assert_eq!(arr, vec![Value::Bool(false)]);
    }

    #[test]
    fn test_try_from_mismatch() {
        let err = f64::try_from(&Value::I32(1)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);
        match err {
            StoreError::TypeMismatch { expected, actual } => {
                assert_eq!(expected, ValueTag::F64);
                assert_eq!(actual, ValueTag::I32);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
