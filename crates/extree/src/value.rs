use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::Shared;

/// An opaque object supplied by the host, carried through the tree by
/// reference. `as_any` lets host code recover the concrete type on the far
/// side of a callable or executor boundary.
pub trait HostObject: fmt::Debug + fmt::Display {
    fn as_any(&self) -> &dyn Any;
}

/// Runtime type tag for [`Value`], also used as the declared type of
/// parameters and variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Bool,
    String,
    Object,
    None,
}

impl ValueType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Int8
                | ValueType::Int16
                | ValueType::Int32
                | ValueType::Int64
                | ValueType::Float32
                | ValueType::Float64
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Int8 => "int8",
            ValueType::Int16 => "int16",
            ValueType::Int32 => "int32",
            ValueType::Int64 => "int64",
            ValueType::Float32 => "float32",
            ValueType::Float64 => "float64",
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Object => "object",
            ValueType::None => "none",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    String(String),
    Object(Shared<dyn HostObject>),
    None,
}

/// A boxed runtime value with reference semantics.
///
/// Cloning a `Value` bumps a refcount and preserves identity, so a constant
/// node evaluated twice yields the *same* value both times, while two
/// independently constructed values are distinct even when structurally
/// equal. Identity is what [`Value::ref_eq`] compares; `PartialEq` compares
/// structurally and exists for host code and tests.
#[derive(Debug, Clone)]
pub struct Value(Shared<ValueKind>);

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Value(Shared::new(kind))
    }

    /// The absent value, produced by blocks and conditionals.
    pub fn none() -> Self {
        Value::new(ValueKind::None)
    }

    /// Boxes a host object.
    pub fn object(object: impl HostObject + 'static) -> Self {
        Value::new(ValueKind::Object(Shared::new(object)))
    }

    pub fn kind(&self) -> &ValueKind {
        &self.0
    }

    pub fn type_of(&self) -> ValueType {
        match &*self.0 {
            ValueKind::Int8(_) => ValueType::Int8,
            ValueKind::Int16(_) => ValueType::Int16,
            ValueKind::Int32(_) => ValueType::Int32,
            ValueKind::Int64(_) => ValueType::Int64,
            ValueKind::Float32(_) => ValueType::Float32,
            ValueKind::Float64(_) => ValueType::Float64,
            ValueKind::Bool(_) => ValueType::Bool,
            ValueKind::String(_) => ValueType::String,
            ValueKind::Object(_) => ValueType::Object,
            ValueKind::None => ValueType::None,
        }
    }

    /// Identity comparison: two values are identical when they share the same
    /// box. `none` is identical to `none` by definition.
    pub fn ref_eq(&self, other: &Value) -> bool {
        if matches!((&*self.0, &*other.0), (ValueKind::None, ValueKind::None)) {
            return true;
        }
        Shared::ptr_eq(&self.0, &other.0)
    }

    /// Order-independent hash of the value's content; host objects hash by
    /// identity.
    pub fn hash_code(&self) -> i64 {
        let mut hasher = FxHasher::default();
        std::mem::discriminant(&*self.0).hash(&mut hasher);
        match &*self.0 {
            ValueKind::Int8(v) => v.hash(&mut hasher),
            ValueKind::Int16(v) => v.hash(&mut hasher),
            ValueKind::Int32(v) => v.hash(&mut hasher),
            ValueKind::Int64(v) => v.hash(&mut hasher),
            ValueKind::Float32(v) => v.to_bits().hash(&mut hasher),
            ValueKind::Float64(v) => v.to_bits().hash(&mut hasher),
            ValueKind::Bool(v) => v.hash(&mut hasher),
            ValueKind::String(s) => s.hash(&mut hasher),
            ValueKind::Object(o) => (Shared::as_ptr(o) as *const () as usize).hash(&mut hasher),
            ValueKind::None => {}
        }
        hasher.finish() as i64
    }

    pub fn is_none(&self) -> bool {
        matches!(&*self.0, ValueKind::None)
    }

    pub fn as_i8(&self) -> Option<i8> {
        match &*self.0 {
            ValueKind::Int8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match &*self.0 {
            ValueKind::Int16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match &*self.0 {
            ValueKind::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match &*self.0 {
            ValueKind::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match &*self.0 {
            ValueKind::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match &*self.0 {
            ValueKind::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &*self.0 {
            ValueKind::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &*self.0 {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Shared<dyn HostObject>> {
        match &*self.0 {
            ValueKind::Object(o) => Some(o),
            _ => None,
        }
    }
}

// Structural equality, for host code and tests. The language's own `equal_to`
// node compares identity instead (see `Value::ref_eq`).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (&*self.0, &*other.0) {
            (ValueKind::Int8(a), ValueKind::Int8(b)) => a == b,
            (ValueKind::Int16(a), ValueKind::Int16(b)) => a == b,
            (ValueKind::Int32(a), ValueKind::Int32(b)) => a == b,
            (ValueKind::Int64(a), ValueKind::Int64(b)) => a == b,
            (ValueKind::Float32(a), ValueKind::Float32(b)) => a == b,
            (ValueKind::Float64(a), ValueKind::Float64(b)) => a == b,
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (ValueKind::String(a), ValueKind::String(b)) => a == b,
            (ValueKind::Object(a), ValueKind::Object(b)) => Shared::ptr_eq(a, b),
            (ValueKind::None, ValueKind::None) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Int8(v) => write!(f, "{}", v),
            ValueKind::Int16(v) => write!(f, "{}", v),
            ValueKind::Int32(v) => write!(f, "{}", v),
            ValueKind::Int64(v) => write!(f, "{}", v),
            ValueKind::Float32(v) => write!(f, "{}", v),
            ValueKind::Float64(v) => write!(f, "{}", v),
            ValueKind::Bool(v) => write!(f, "{}", v),
            ValueKind::String(s) => write!(f, "{}", s),
            ValueKind::Object(o) => write!(f, "{}", o),
            ValueKind::None => Ok(()),
        }
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::new(ValueKind::Int8(v))
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::new(ValueKind::Int16(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::new(ValueKind::Int32(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::new(ValueKind::Int64(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::new(ValueKind::Float32(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::new(ValueKind::Float64(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::new(ValueKind::Bool(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new(ValueKind::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new(ValueKind::String(s))
    }
}

impl From<Shared<dyn HostObject>> for Value {
    fn from(o: Shared<dyn HostObject>) -> Self {
        Value::new(ValueKind::Object(o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Probe(u32);

    impl fmt::Display for Probe {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "probe({})", self.0)
        }
    }

    impl HostObject for Probe {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_clone_preserves_identity() {
        let value = Value::from(5_i32);
        let cloned = value.clone();
        assert!(value.ref_eq(&cloned));
    }

    #[test]
    fn test_distinct_boxes_are_not_identical() {
        let a = Value::from(5_i32);
        let b = Value::from(5_i32);
        assert!(!a.ref_eq(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_none_is_identical_to_none() {
        assert!(Value::none().ref_eq(&Value::none()));
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::from(1_i8).type_of(), ValueType::Int8);
        assert_eq!(Value::from(1_i64).type_of(), ValueType::Int64);
        assert_eq!(Value::from(1.0_f32).type_of(), ValueType::Float32);
        assert_eq!(Value::from(true).type_of(), ValueType::Bool);
        assert_eq!(Value::from("a").type_of(), ValueType::String);
        assert_eq!(Value::none().type_of(), ValueType::None);
        assert_eq!(Value::object(Probe(1)).type_of(), ValueType::Object);
    }

    #[test]
    fn test_hash_code_is_stable_and_kind_sensitive() {
        let a = Value::from(5_i32);
        let b = Value::from(5_i32);
        assert_eq!(a.hash_code(), a.hash_code());
        assert_eq!(a.hash_code(), b.hash_code());
        // Same bits, different kind.
        assert_ne!(Value::from(5_i32).hash_code(), Value::from(5_i64).hash_code());
    }

    #[test]
    fn test_object_hashes_by_identity() {
        let object = Value::object(Probe(7));
        assert_eq!(object.hash_code(), object.clone().hash_code());
        assert_ne!(object.hash_code(), Value::object(Probe(7)).hash_code());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(42_i32).to_string(), "42");
        assert_eq!(Value::from(1.5_f64).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::object(Probe(3)).to_string(), "probe(3)");
        assert_eq!(Value::none().to_string(), "");
    }
}
