//! Compile-once, invoke-many execution of a built tree.

use crate::error::Error;
use crate::eval::env::Env;
use crate::eval::{SharedEnv, eval};
use crate::expr::{Expr, Param};
use crate::value::Value;
use crate::{Shared, SharedCell};

/// A compiled, reusable unit pairing declared parameters with a return
/// expression. Holds no per-call state, so invocations are independent of
/// each other.
#[derive(Debug, Clone)]
pub struct Executable {
    return_expr: Expr,
    params: Vec<Param>,
}

/// Captures the return expression and the ordered parameter list. Nothing is
/// evaluated until [`Executable::invoke`].
pub fn compile(return_expr: Expr, params: impl IntoIterator<Item = Param>) -> Executable {
    Executable {
        return_expr,
        params: params.into_iter().collect(),
    }
}

impl Executable {
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Validates the arguments, seeds a fresh root environment with the
    /// parameter bindings, and evaluates the return expression against it.
    ///
    /// Arguments must match the declared parameter types exactly; the bound
    /// values keep their identity, so the tree observes the exact arguments
    /// passed here.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, Error> {
        if args.len() != self.params.len() {
            return Err(Error::ArityMismatch {
                expected: self.params.len(),
                got: args.len(),
            });
        }
        for (index, (param, arg)) in self.params.iter().zip(args).enumerate() {
            if arg.type_of() != param.value_type() {
                return Err(Error::ArgumentTypeMismatch {
                    index,
                    expected: param.value_type(),
                    got: arg.type_of(),
                });
            }
        }

        let root: SharedEnv = Shared::new(SharedCell::new(Env::default()));
        {
            let mut env = root.borrow_mut();
            for (param, arg) in self.params.iter().zip(args) {
                env.define(param.label(), arg.clone());
            }
        }
        eval(&self.return_expr, &root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use crate::host::{Callable, ExternalExecutable, HostFn};
    use crate::value::{HostObject, ValueType};
    use std::any::Any;
    use std::fmt;

    #[test]
    fn test_parameter_binding_yields_exact_argument() {
        let p = parameter(ValueType::Int32);
        let identity = compile(ret(p.expr()), [p]);

        let arg = Value::from(7_i32);
        let result = identity.invoke(std::slice::from_ref(&arg)).unwrap();
        assert!(result.ref_eq(&arg));
    }

    #[test]
    fn test_set_then_get_in_one_invocation() {
        // set(x, 5) yields 5 and binds x in the root scope, so the later
        // get(x) term sees it: 5 + 5.
        let x = variable(ValueType::Int32);
        let exe = compile(ret(add(set(&x, constant(5_i32)), [get(&x)])), []);
        assert_eq!(exe.invoke(&[]).unwrap().as_i32(), Some(10));
    }

    #[test]
    fn test_block_local_bindings_do_not_leak() {
        let x = variable(ValueType::Int32);
        let exe = compile(
            ret(block([block([set(&x, constant(5_i32))]), get(&x)])),
            [],
        );
        assert!(matches!(
            exe.invoke(&[]),
            Err(Error::UndefinedVariable(label)) if label == x.label()
        ));
    }

    #[test]
    fn test_nested_blocks_read_root_bindings() {
        // A recorder callable smuggles the observed value out of the block.
        let seen = Shared::new(SharedCell::new(Vec::new()));
        let sink = Shared::clone(&seen);
        let recorder: Shared<dyn Callable> =
            Shared::new(HostFn::new("record", [ValueType::Int32], move |_, args| {
                sink.borrow_mut().push(args[0].clone());
                Ok(Value::none())
            }));

        let p = parameter(ValueType::Int32);
        let exe = compile(
            ret(block([block([call(recorder, None, [p.expr()])])])),
            [p],
        );
        exe.invoke(&[Value::from(5_i32)]).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_i32(), Some(5));
    }

    #[test]
    fn test_arity_mismatch() {
        let p = parameter(ValueType::Int32);
        let exe = compile(ret(p.expr()), [p]);
        assert!(matches!(
            exe.invoke(&[]),
            Err(Error::ArityMismatch {
                expected: 1,
                got: 0,
            })
        ));
    }

    #[test]
    fn test_argument_type_mismatch() {
        let p = parameter(ValueType::Int32);
        let exe = compile(ret(p.expr()), [p]);
        assert!(matches!(
            exe.invoke(&[Value::from(1_i64)]),
            Err(Error::ArgumentTypeMismatch {
                index: 0,
                expected: ValueType::Int32,
                got: ValueType::Int64,
            })
        ));
    }

    #[test]
    fn test_repeat_invocations_are_independent() {
        let x = variable(ValueType::Int32);
        let p = parameter(ValueType::Int32);
        let exe = compile(
            ret(add(set(&x, p.expr()), [constant(1_i32)])),
            [p],
        );

        let first = exe.invoke(&[Value::from(41_i32)]).unwrap();
        let second = exe.invoke(&[Value::from(41_i32)]).unwrap();
        assert_eq!(first.as_i32(), Some(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_host_callable_errors_are_wrapped() {
        let failing: Shared<dyn Callable> = Shared::new(HostFn::new(
            "explode",
            Vec::new(),
            |_, _| Err("boom".into()),
        ));
        let exe = compile(ret(call(failing, None, [])), []);

        match exe.invoke(&[]) {
            Err(Error::HostInvocation { name, source }) => {
                assert_eq!(name, "explode");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("expected host invocation error, got {:?}", other),
        }
    }

    #[derive(Debug)]
    struct Simulator {
        shots: u32,
    }

    impl fmt::Display for Simulator {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "simulator")
        }
    }

    impl HostObject for Simulator {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct RunProgram;

    impl ExternalExecutable for RunProgram {
        fn invoke(&self, executor: Value) -> Result<Value, crate::error::HostError> {
            let object = executor.as_object().ok_or("expected an executor object")?;
            let simulator = object
                .as_any()
                .downcast_ref::<Simulator>()
                .ok_or("expected a simulator")?;
            Ok(Value::from(simulator.shots as i32))
        }
    }

    #[test]
    fn test_external_executor_delegation() {
        let p = parameter(ValueType::Object);
        let unit: Shared<dyn ExternalExecutable> = Shared::new(RunProgram);
        let exe = compile(ret(external(unit, p.expr(), [])), [p]);

        let result = exe.invoke(&[Value::object(Simulator { shots: 1024 })]).unwrap();
        assert_eq!(result.as_i32(), Some(1024));
    }

    #[test]
    fn test_external_executor_errors_are_wrapped() {
        let p = parameter(ValueType::Int32);
        let unit: Shared<dyn ExternalExecutable> = Shared::new(RunProgram);
        let exe = compile(ret(external(unit, p.expr(), [])), [p]);

        assert!(matches!(
            exe.invoke(&[Value::from(1_i32)]),
            Err(Error::ExternalExecutor(_))
        ));
    }
}
