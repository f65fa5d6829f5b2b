use miette::Diagnostic;
use thiserror::Error;

use crate::{Label, ValueType};

/// Errors raised by host callables and external executors, opaque to the
/// interpreter.
pub type HostError = Box<dyn std::error::Error + 'static>;

/// Everything that can go wrong while invoking a compiled tree.
///
/// The first failure aborts the invocation and is surfaced to the caller
/// untouched; the interpreter never retries, logs, or returns partial
/// results.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("expected {expected} arguments, got {got}")]
    #[diagnostic(code(extree::arity_mismatch))]
    ArityMismatch { expected: usize, got: usize },

    #[error("argument {index} has type {got}, expected {expected}")]
    #[diagnostic(code(extree::argument_type_mismatch))]
    ArgumentTypeMismatch {
        index: usize,
        expected: ValueType,
        got: ValueType,
    },

    #[error("undefined variable \"{0}\"")]
    #[diagnostic(code(extree::undefined_variable))]
    UndefinedVariable(Label),

    #[error("expected a {expected} value, got {got}")]
    #[diagnostic(code(extree::type_mismatch))]
    TypeMismatch { expected: ValueType, got: ValueType },

    #[error("{0} is not a numeric type")]
    #[diagnostic(code(extree::unsupported_numeric_type))]
    UnsupportedNumericType(ValueType),

    #[error("host callable \"{name}\" failed")]
    #[diagnostic(code(extree::host_invocation))]
    HostInvocation {
        name: String,
        #[source]
        source: HostError,
    },

    #[error("external executor failed")]
    #[diagnostic(code(extree::external_executor))]
    ExternalExecutor(#[source] HostError),
}
