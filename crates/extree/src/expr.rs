//! The expression node taxonomy.
//!
//! Nodes are immutable after construction and carry no evaluation state, so a
//! tree (or any subtree) can be shared and evaluated any number of times.
//! Trees are assembled through the factories in [`crate::builder`].

use crate::host::{Callable, ExternalExecutable};
use crate::label::Label;
use crate::value::{Value, ValueType};
use crate::Shared;

/// Comparison predicate applied by a [`Expr::Compare`] node.
///
/// `IsTrue`/`NotIsTrue` are unary truthiness checks over a bool operand,
/// `EqualTo`/`NotEqualTo` compare identity (not structure), and
/// `GreaterThan`/`LessThan` order operands in the canonical numeric domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    IsTrue,
    NotIsTrue,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    LessThan,
}

/// Unary host-object operation applied by a [`Expr::Object`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectOp {
    HashCode,
    Stringify,
    Not,
}

/// Numeric operation applied by a [`Expr::Arith`] node. `Increment` and
/// `Decrement` take no terms, `Mod` takes exactly one, the rest fold
/// left-to-right over any number of terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Increment,
    Decrement,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// One node of an expression tree.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Yields the captured value unchanged on every evaluation.
    Constant(Value),
    /// Reads a parameter binding from the environment.
    Parameter(Label),
    /// Reads a variable binding from the environment.
    Get(Label),
    /// Evaluates `value`, writes it into the local frame, yields it.
    Set { label: Label, value: Box<Expr> },
    /// Applies a comparison predicate; `rhs` is absent for truthiness checks.
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Option<Box<Expr>>,
    },
    /// Applies a unary host-object operation to the evaluated instance;
    /// `args` are evaluated for effect before dispatch.
    Object {
        op: ObjectOp,
        instance: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Folds an arithmetic operation over `base` and `terms`, narrowing the
    /// result back to the base operand's runtime type.
    Arith {
        op: ArithOp,
        base: Box<Expr>,
        terms: Vec<Expr>,
    },
    /// Evaluates sub-expressions in order for effect, in a fresh child
    /// scope; always yields `none`.
    Block(Vec<Expr>),
    /// Evaluates `cond` in the caller's scope; on `true` runs `then` with
    /// the Block contract. Yields `none` either way.
    If { cond: Box<Expr>, then: Vec<Expr> },
    /// Invokes a host callable with an optional receiver and evaluated
    /// arguments.
    Call {
        callable: Shared<dyn Callable>,
        instance: Option<Box<Expr>>,
        args: Vec<Expr>,
    },
    /// Evaluates `args` for effect, then delegates to an external executable
    /// unit bound to the evaluated `executor` instance.
    External {
        unit: Shared<dyn ExternalExecutable>,
        executor: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Evaluates and yields its sub-expression; the designated top node of a
    /// compiled tree.
    Return(Box<Expr>),
}

/// A generic variable reference, usable with `get` and `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Var {
    pub(crate) label: Label,
    pub(crate) value_type: ValueType,
}

impl Var {
    pub fn label(&self) -> Label {
        self.label
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

/// A formal parameter reference, bound once per invocation and read-only to
/// the tree: there is deliberately no `set` path for parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub(crate) label: Label,
    pub(crate) value_type: ValueType,
}

impl Param {
    pub fn label(&self) -> Label {
        self.label
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The expression reading this parameter's bound argument.
    pub fn expr(&self) -> Expr {
        Expr::Parameter(self.label)
    }
}

/// An expression statically known to yield a bool, as produced by the
/// comparison factories. `if_block` only accepts these.
#[derive(Debug, Clone)]
pub struct Comparison(pub(crate) Expr);

impl From<Comparison> for Expr {
    fn from(comparison: Comparison) -> Self {
        comparison.0
    }
}
