//! Bridges to host-supplied operations.
//!
//! A [`Callable`] stands in for a bound host method: the handle is resolved
//! once when the tree is built and invoked with already-evaluated values, so
//! nothing is looked up at evaluation time. An [`ExternalExecutable`] is the
//! looser contract used by the external-executor node: evaluate, delegate,
//! propagate.

use std::fmt;

use itertools::Itertools;

use crate::error::HostError;
use crate::value::{Value, ValueType};

/// A host operation invocable from an expression tree.
pub trait Callable: fmt::Debug {
    fn name(&self) -> &str;

    /// Declared parameter types, informational to the host; the interpreter
    /// does not re-validate arguments against them.
    fn parameter_types(&self) -> &[ValueType];

    fn invoke(&self, receiver: Option<Value>, args: &[Value]) -> Result<Value, HostError>;
}

/// An externally supplied executable unit bound to a specific executor
/// instance. Result and failure modes are defined entirely by the host.
pub trait ExternalExecutable: fmt::Debug {
    fn invoke(&self, executor: Value) -> Result<Value, HostError>;
}

/// Closure-backed [`Callable`].
pub struct HostFn {
    name: String,
    parameter_types: Vec<ValueType>,
    #[allow(clippy::type_complexity)]
    f: Box<dyn Fn(Option<Value>, &[Value]) -> Result<Value, HostError>>,
}

impl HostFn {
    pub fn new(
        name: impl Into<String>,
        parameter_types: impl Into<Vec<ValueType>>,
        f: impl Fn(Option<Value>, &[Value]) -> Result<Value, HostError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            parameter_types: parameter_types.into(),
            f: Box::new(f),
        }
    }
}

impl Callable for HostFn {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameter_types(&self) -> &[ValueType] {
        &self.parameter_types
    }

    fn invoke(&self, receiver: Option<Value>, args: &[Value]) -> Result<Value, HostError> {
        (self.f)(receiver, args)
    }
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFn")
            .field("name", &self.name)
            .field("parameter_types", &self.parameter_types)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.name,
            self.parameter_types.iter().map(|t| t.name()).join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_fn_invoke() {
        let double = HostFn::new("double", [ValueType::Int32], |_, args| {
            let n = args[0].as_i32().ok_or("expected int32")?;
            Ok(Value::from(n * 2))
        });

        let result = double.invoke(None, &[Value::from(21_i32)]).unwrap();
        assert_eq!(result.as_i32(), Some(42));
    }

    #[test]
    fn test_host_fn_receives_receiver() {
        let echo = HostFn::new("echo", Vec::new(), |receiver, _| {
            Ok(receiver.unwrap_or_else(Value::none))
        });

        let receiver = Value::from("self");
        let result = echo.invoke(Some(receiver.clone()), &[]).unwrap();
        assert!(result.ref_eq(&receiver));
    }

    #[test]
    fn test_display_renders_signature() {
        let f = HostFn::new("mix", [ValueType::Int32, ValueType::Bool], |_, _| {
            Ok(Value::none())
        });
        assert_eq!(f.to_string(), "mix(int32, bool)");
    }
}
