//! Recursive tree evaluation.
//!
//! Evaluation is a synchronous walk with no state outside the environment
//! chain: evaluated child results are staged in per-call stack buffers, so a
//! shared node can be evaluated reentrantly. The first failure aborts the
//! whole invocation.

pub(crate) mod env;

use smallvec::SmallVec;

use crate::error::Error;
use crate::expr::{ArithOp, CompareOp, Expr, ObjectOp};
use crate::number::{from_canonical, to_canonical};
use crate::value::{Value, ValueType};
use crate::{Shared, SharedCell};

use env::Env;

pub(crate) type SharedEnv = Shared<SharedCell<Env>>;

pub(crate) fn eval(expr: &Expr, env: &SharedEnv) -> Result<Value, Error> {
    match expr {
        Expr::Constant(value) => Ok(value.clone()),
        Expr::Parameter(label) | Expr::Get(label) => {
            env.borrow().resolve(*label).map_err(Error::from)
        }
        Expr::Set { label, value } => {
            let value = eval(value, env)?;
            env.borrow_mut().define(*label, value.clone());
            Ok(value)
        }
        Expr::Compare { op, lhs, rhs } => eval_compare(*op, lhs, rhs.as_deref(), env),
        Expr::Object { op, instance, args } => eval_object(*op, instance, args, env),
        Expr::Arith { op, base, terms } => eval_arith(*op, base, terms, env),
        Expr::Block(body) => eval_block(body, env),
        Expr::If { cond, then } => {
            let cond = eval(cond, env)?;
            if expect_bool(&cond)? {
                eval_block(then, env)
            } else {
                Ok(Value::none())
            }
        }
        Expr::Call {
            callable,
            instance,
            args,
        } => {
            let receiver = match instance {
                Some(instance) => Some(eval(instance, env)?),
                None => None,
            };
            let mut staged: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len());
            for arg in args {
                staged.push(eval(arg, env)?);
            }
            callable
                .invoke(receiver, &staged)
                .map_err(|source| Error::HostInvocation {
                    name: callable.name().to_string(),
                    source,
                })
        }
        Expr::External {
            unit,
            executor,
            args,
        } => {
            for arg in args {
                eval(arg, env)?;
            }
            let executor = eval(executor, env)?;
            unit.invoke(executor).map_err(Error::ExternalExecutor)
        }
        Expr::Return(inner) => eval(inner, env),
    }
}

fn expect_bool(value: &Value) -> Result<bool, Error> {
    value.as_bool().ok_or_else(|| Error::TypeMismatch {
        expected: ValueType::Bool,
        got: value.type_of(),
    })
}

fn eval_compare(
    op: CompareOp,
    lhs: &Expr,
    rhs: Option<&Expr>,
    env: &SharedEnv,
) -> Result<Value, Error> {
    let lhs = eval(lhs, env)?;
    // A missing second operand compares as `none`, the absent value.
    let rhs = match rhs {
        Some(rhs) => eval(rhs, env)?,
        None => Value::none(),
    };

    let result = match op {
        CompareOp::IsTrue => expect_bool(&lhs)?,
        CompareOp::NotIsTrue => !expect_bool(&lhs)?,
        CompareOp::EqualTo => lhs.ref_eq(&rhs),
        CompareOp::NotEqualTo => !lhs.ref_eq(&rhs),
        CompareOp::GreaterThan => to_canonical(&lhs)? > to_canonical(&rhs)?,
        CompareOp::LessThan => to_canonical(&lhs)? < to_canonical(&rhs)?,
    };
    Ok(Value::from(result))
}

fn eval_object(
    op: ObjectOp,
    instance: &Expr,
    args: &[Expr],
    env: &SharedEnv,
) -> Result<Value, Error> {
    let instance = eval(instance, env)?;
    // The three object operations are unary; arguments are still evaluated
    // for effect before dispatch.
    for arg in args {
        eval(arg, env)?;
    }

    match op {
        ObjectOp::HashCode => Ok(Value::from(instance.hash_code())),
        ObjectOp::Stringify => Ok(Value::from(instance.to_string())),
        ObjectOp::Not => Ok(Value::from(!expect_bool(&instance)?)),
    }
}

fn eval_arith(op: ArithOp, base: &Expr, terms: &[Expr], env: &SharedEnv) -> Result<Value, Error> {
    let base = eval(base, env)?;
    let target = base.type_of();

    // Evaluate every term before coercing any of them, so side effects run
    // even when an earlier term turns out to be non-numeric.
    let mut staged: SmallVec<[Value; 4]> = SmallVec::with_capacity(terms.len());
    for term in terms {
        staged.push(eval(term, env)?);
    }

    let mut acc = to_canonical(&base)?;
    match op {
        ArithOp::Increment => acc += 1.0,
        ArithOp::Decrement => acc -= 1.0,
        _ => {
            for term in &staged {
                let operand = to_canonical(term)?;
                acc = match op {
                    ArithOp::Add => acc + operand,
                    ArithOp::Sub => acc - operand,
                    ArithOp::Mul => acc * operand,
                    ArithOp::Div => acc / operand,
                    ArithOp::Mod => acc % operand,
                    ArithOp::Increment | ArithOp::Decrement => acc,
                };
            }
        }
    }

    from_canonical(acc, target)
}

fn eval_block(body: &[Expr], env: &SharedEnv) -> Result<Value, Error> {
    // A fresh child scope whose parent is the enclosing frame; bindings made
    // here are invisible once the block exits.
    let child: SharedEnv = Shared::new(SharedCell::new(Env::with_parent(Shared::downgrade(env))));
    for expr in body {
        eval(expr, &child)?;
    }
    Ok(Value::none())
}
