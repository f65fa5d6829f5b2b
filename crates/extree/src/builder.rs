//! Factories for assembling expression trees.
//!
//! One free function per node kind, consumed bottom-up: leaves first
//! (constants, parameters, variables), composed upward into arithmetic,
//! comparisons, blocks and conditionals, finally wrapped in [`ret`] and
//! handed to [`crate::compile`].

use crate::expr::{ArithOp, CompareOp, Comparison, Expr, ObjectOp, Param, Var};
use crate::host::{Callable, ExternalExecutable};
use crate::label::Label;
use crate::value::{Value, ValueType};
use crate::Shared;

/// A node yielding a fixed value on every evaluation.
pub fn constant(value: impl Into<Value>) -> Expr {
    Expr::Constant(value.into())
}

/// Declares a formal parameter of the given type, with a fresh unique label.
pub fn parameter(value_type: ValueType) -> Param {
    Param {
        label: Label::fresh(),
        value_type,
    }
}

/// Declares a variable of the given type, with a fresh unique label.
pub fn variable(value_type: ValueType) -> Var {
    Var {
        label: Label::fresh(),
        value_type,
    }
}

/// Reads the variable's current binding.
pub fn get(var: &Var) -> Expr {
    Expr::Get(var.label)
}

/// Evaluates `value`, binds it to the variable in the local scope, and
/// yields the written value: assignment is an expression.
pub fn set(var: &Var, value: Expr) -> Expr {
    Expr::Set {
        label: var.label,
        value: Box::new(value),
    }
}

fn unary_compare(op: CompareOp, operand: Expr) -> Comparison {
    Comparison(Expr::Compare {
        op,
        lhs: Box::new(operand),
        rhs: None,
    })
}

fn binary_compare(op: CompareOp, lhs: Expr, rhs: Expr) -> Comparison {
    Comparison(Expr::Compare {
        op,
        lhs: Box::new(lhs),
        rhs: Some(Box::new(rhs)),
    })
}

/// True when the operand evaluates to `true`; the operand must be a bool.
pub fn is_true(operand: Expr) -> Comparison {
    unary_compare(CompareOp::IsTrue, operand)
}

/// True when the operand evaluates to `false`; the operand must be a bool.
pub fn not_is_true(operand: Expr) -> Comparison {
    unary_compare(CompareOp::NotIsTrue, operand)
}

/// Identity comparison: true only when both operands are the same boxed
/// value, never by structural equality.
pub fn equal_to(lhs: Expr, rhs: Expr) -> Comparison {
    binary_compare(CompareOp::EqualTo, lhs, rhs)
}

/// Negated identity comparison.
pub fn not_equal_to(lhs: Expr, rhs: Expr) -> Comparison {
    binary_compare(CompareOp::NotEqualTo, lhs, rhs)
}

/// Numeric ordering after coercing both operands to the canonical form.
pub fn greater_than(lhs: Expr, rhs: Expr) -> Comparison {
    binary_compare(CompareOp::GreaterThan, lhs, rhs)
}

/// Numeric ordering after coercing both operands to the canonical form.
pub fn less_than(lhs: Expr, rhs: Expr) -> Comparison {
    binary_compare(CompareOp::LessThan, lhs, rhs)
}

fn object_op(op: ObjectOp, instance: Expr) -> Expr {
    Expr::Object {
        op,
        instance: Box::new(instance),
        args: Vec::new(),
    }
}

/// Hashes the evaluated instance (host objects hash by identity).
pub fn hash_code(instance: Expr) -> Expr {
    object_op(ObjectOp::HashCode, instance)
}

/// Renders the evaluated instance to a string value.
pub fn stringify(instance: Expr) -> Expr {
    object_op(ObjectOp::Stringify, instance)
}

/// Boolean negation; the instance must evaluate to a bool.
pub fn not(instance: Expr) -> Expr {
    object_op(ObjectOp::Not, instance)
}

fn arith(op: ArithOp, base: Expr, terms: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Arith {
        op,
        base: Box::new(base),
        terms: terms.into_iter().collect(),
    }
}

/// Adds one to the base operand.
pub fn increment(base: Expr) -> Expr {
    arith(ArithOp::Increment, base, std::iter::empty())
}

/// Subtracts one from the base operand.
pub fn decrement(base: Expr) -> Expr {
    arith(ArithOp::Decrement, base, std::iter::empty())
}

/// Left-to-right sum of the base operand and the terms.
pub fn add(base: Expr, terms: impl IntoIterator<Item = Expr>) -> Expr {
    arith(ArithOp::Add, base, terms)
}

/// Left-to-right difference of the base operand and the terms.
pub fn sub(base: Expr, terms: impl IntoIterator<Item = Expr>) -> Expr {
    arith(ArithOp::Sub, base, terms)
}

/// Left-to-right product of the base operand and the terms.
pub fn mul(base: Expr, terms: impl IntoIterator<Item = Expr>) -> Expr {
    arith(ArithOp::Mul, base, terms)
}

/// Left-to-right quotient of the base operand and the terms. Division by
/// zero follows floating-point semantics in the canonical domain.
pub fn div(base: Expr, terms: impl IntoIterator<Item = Expr>) -> Expr {
    arith(ArithOp::Div, base, terms)
}

/// Remainder of the base operand by the divisor; strictly binary.
pub fn modulo(base: Expr, divisor: Expr) -> Expr {
    arith(ArithOp::Mod, base, [divisor])
}

/// An ordered sequence of sub-expressions evaluated for effect in a fresh
/// child scope; yields `none`.
pub fn block(body: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Block(body.into_iter().collect())
}

/// Runs `then` with the Block contract when `cond` holds; yields `none`
/// either way.
pub fn if_block(cond: Comparison, then: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::If {
        cond: Box::new(cond.into()),
        then: then.into_iter().collect(),
    }
}

/// Invokes a host callable with an optional receiver and evaluated
/// arguments.
pub fn call(
    callable: Shared<dyn Callable>,
    instance: Option<Expr>,
    args: impl IntoIterator<Item = Expr>,
) -> Expr {
    Expr::Call {
        callable,
        instance: instance.map(Box::new),
        args: args.into_iter().collect(),
    }
}

/// Evaluates `args` for effect, then delegates to the external executable
/// unit bound to the evaluated `executor` instance.
pub fn external(
    unit: Shared<dyn ExternalExecutable>,
    executor: Expr,
    args: impl IntoIterator<Item = Expr>,
) -> Expr {
    Expr::External {
        unit,
        executor: Box::new(executor),
        args: args.into_iter().collect(),
    }
}

/// Marks the logical exit point of a compiled tree.
pub fn ret(value: Expr) -> Expr {
    Expr::Return(Box::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_get_distinct_labels() {
        let a = variable(ValueType::Int32);
        let b = variable(ValueType::Int32);
        let p = parameter(ValueType::Int32);
        assert_ne!(a.label(), b.label());
        assert_ne!(a.label(), p.label());
    }

    #[test]
    fn test_modulo_is_binary() {
        let expr = modulo(constant(7_i32), constant(3_i32));
        match expr {
            Expr::Arith { op, terms, .. } => {
                assert_eq!(op, ArithOp::Mod);
                assert_eq!(terms.len(), 1);
            }
            other => panic!("expected arith node, got {:?}", other),
        }
    }

    #[test]
    fn test_comparison_converts_to_expr() {
        let expr: Expr = greater_than(constant(5_i32), constant(3_i32)).into();
        assert!(matches!(
            expr,
            Expr::Compare {
                op: CompareOp::GreaterThan,
                ..
            }
        ));
    }
}
