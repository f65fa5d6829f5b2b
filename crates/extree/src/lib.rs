//! `extree` is an embeddable expression-tree interpreter: programs are
//! assembled programmatically as trees of typed expression nodes, compiled
//! once into a reusable [`Executable`], and invoked repeatedly with different
//! argument bindings. There is no parser and no source text, only a builder
//! surface and a compile/invoke contract.
//!
//! ## Examples
//!
//! ```
//! use extree::builder::{add, parameter, ret};
//! use extree::{Value, ValueType, compile};
//!
//! // (a, b) -> a + b
//! let a = parameter(ValueType::Int32);
//! let b = parameter(ValueType::Int32);
//! let sum = compile(ret(add(a.expr(), [b.expr()])), [a, b]);
//!
//! let result = sum.invoke(&[Value::from(2_i32), Value::from(3_i32)]).unwrap();
//! assert_eq!(result.as_i32(), Some(5));
//!
//! // The compiled unit is reusable; each invocation is independent.
//! let result = sum.invoke(&[Value::from(40_i32), Value::from(2_i32)]).unwrap();
//! assert_eq!(result.as_i32(), Some(42));
//! ```
//!
//! Variables, blocks, and conditionals follow lexical scoping: a block runs
//! in a fresh child scope that can read (but never rebind) its ancestors.
//!
//! ```
//! use extree::builder::{add, block, constant, get, ret, set, variable};
//! use extree::{ValueType, compile};
//!
//! // set(x, 5) binds x in the invocation's root scope and yields 5; the
//! // later get(x) term sees the binding: 5 + 5.
//! let x = variable(ValueType::Int32);
//! let exe = compile(ret(add(set(&x, constant(5_i32)), [get(&x)])), []);
//! assert_eq!(exe.invoke(&[]).unwrap().as_i32(), Some(10));
//!
//! // A block runs in a child scope and always yields the absent value.
//! let scoped = compile(ret(block([set(&x, constant(2_i32)), get(&x)])), []);
//! assert!(scoped.invoke(&[]).unwrap().is_none());
//! ```

pub mod builder;
mod error;
mod eval;
mod exec;
mod expr;
mod host;
mod label;
mod number;
mod value;

/// Shared ownership handle used throughout the crate.
pub type Shared<T> = std::rc::Rc<T>;
/// Interior-mutability cell paired with [`Shared`] for environment frames.
pub type SharedCell<T> = std::cell::RefCell<T>;
pub(crate) type Weak<T> = std::rc::Weak<T>;

pub use error::{Error, HostError};
pub use exec::{Executable, compile};
pub use expr::{ArithOp, CompareOp, Comparison, Expr, ObjectOp, Param, Var};
pub use host::{Callable, ExternalExecutable, HostFn};
pub use label::Label;
pub use number::{from_canonical, to_canonical};
pub use value::{HostObject, Value, ValueKind, ValueType};
