use rustc_hash::{FxBuildHasher, FxHashMap};
use thiserror::Error;

use crate::error::Error;
use crate::label::Label;
use crate::value::Value;
use crate::{SharedCell, Weak};

#[derive(Error, Debug, PartialEq)]
pub enum EnvError {
    #[error("no binding for \"{0}\"")]
    Undefined(Label),
}

impl From<EnvError> for Error {
    fn from(err: EnvError) -> Self {
        match err {
            EnvError::Undefined(label) => Error::UndefinedVariable(label),
        }
    }
}

/// One scope frame: local bindings plus an optional link to the enclosing
/// frame. `define` always writes locally, so inner scopes shadow outer ones
/// and can never rebind them; `resolve` walks the parent chain to arbitrary
/// depth.
#[derive(Debug, Clone, Default)]
pub struct Env {
    bindings: FxHashMap<Label, Value>,
    parent: Option<Weak<SharedCell<Env>>>,
}

impl Env {
    pub fn with_parent(parent: Weak<SharedCell<Env>>) -> Self {
        Self {
            bindings: FxHashMap::with_capacity_and_hasher(16, FxBuildHasher),
            parent: Some(parent),
        }
    }

    #[inline(always)]
    pub fn define(&mut self, label: Label, value: Value) {
        self.bindings.insert(label, value);
    }

    pub fn resolve(&self, label: Label) -> Result<Value, EnvError> {
        match self.bindings.get(&label) {
            Some(value) => Ok(value.clone()),
            None => match self.parent.as_ref().and_then(|parent| parent.upgrade()) {
                Some(parent_env) => parent_env.borrow().resolve(label),
                None => Err(EnvError::Undefined(label)),
            },
        }
    }

    /// Removes all local bindings; the parent chain is untouched.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
