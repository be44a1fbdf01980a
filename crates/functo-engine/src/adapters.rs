//! Typed adapters over [`FunctionalValue`]
//!
//! Each adapter exposes the vocabulary of one functional interface and
//! converts the engine's [`Value`] results into plain Rust types.

use std::sync::Arc;

use functo_core::{FromValue, Object, Value};
use parking_lot::Mutex;

use crate::error::FunctoResult;
use crate::functor::FunctionalValue;

macro_rules! adapter_common {
    ($ty:ident) => {
        impl $ty {
            /// Underlying functional value
            pub fn functor(&self) -> &FunctionalValue {
                &self.inner
            }
        }

        impl From<$ty> for FunctionalValue {
            fn from(adapter: $ty) -> Self {
                adapter.inner
            }
        }
    };
}

/// `T -> V`
#[derive(Debug, Clone)]
pub struct Function {
    inner: FunctionalValue,
}

impl Function {
    pub(crate) fn new(inner: FunctionalValue) -> Self {
        Self { inner }
    }

    /// Apply to `target`
    pub fn apply(&self, target: &mut Object) -> FunctoResult<Value> {
        self.inner.apply(target)
    }

    /// Apply and convert the result
    pub fn apply_as<T: FromValue>(&self, target: &mut Object) -> FunctoResult<T> {
        let value = self.inner.apply(target)?;
        Ok(T::from_value(&value)?)
    }

    /// Apply to a possibly absent target
    pub fn apply_nullable(&self, target: Option<&mut Object>) -> FunctoResult<Value> {
        self.inner.apply_nullable(target)
    }
}

adapter_common!(Function);

/// `T -> bool`
#[derive(Debug, Clone)]
pub struct Predicate {
    inner: FunctionalValue,
}

impl Predicate {
    pub(crate) fn new(inner: FunctionalValue) -> Self {
        Self { inner }
    }

    /// Evaluate against `target`
    pub fn test(&self, target: &mut Object) -> FunctoResult<bool> {
        let value = self.inner.apply(target)?;
        Ok(bool::from_value(&value)?)
    }
}

adapter_common!(Predicate);

/// `T -> bool` under the filter vocabulary
#[derive(Debug, Clone)]
pub struct Filter {
    inner: FunctionalValue,
}

impl Filter {
    pub(crate) fn new(inner: FunctionalValue) -> Self {
        Self { inner }
    }

    /// Whether `target` passes the filter
    pub fn accept(&self, target: &mut Object) -> FunctoResult<bool> {
        let value = self.inner.apply(target)?;
        Ok(bool::from_value(&value)?)
    }

    /// Keep the elements that pass
    ///
    /// No element is removed if any evaluation fails.
    pub fn retain(&self, targets: &mut Vec<Object>) -> FunctoResult<()> {
        let mut verdicts = Vec::with_capacity(targets.len());
        for target in targets.iter_mut() {
            verdicts.push(self.accept(target)?);
        }
        let mut verdicts = verdicts.into_iter();
        targets.retain(|_| verdicts.next().unwrap_or(false));
        Ok(())
    }
}

adapter_common!(Filter);

/// `T -> ()`
#[derive(Debug, Clone)]
pub struct Command {
    inner: FunctionalValue,
}

impl Command {
    pub(crate) fn new(inner: FunctionalValue) -> Self {
        Self { inner }
    }

    /// Run against `target`
    pub fn execute(&self, target: &mut Object) -> FunctoResult<()> {
        self.inner.apply(target).map(drop)
    }

    /// Bind to a target
    pub fn bind(&self, target: Arc<Mutex<Object>>) -> Runnable {
        self.inner.bind(target)
    }
}

adapter_common!(Command);

/// `() -> ()` against a bound target
#[derive(Debug, Clone)]
pub struct Runnable {
    inner: FunctionalValue,
    target: Arc<Mutex<Object>>,
}

impl Runnable {
    pub(crate) fn new(inner: FunctionalValue, target: Arc<Mutex<Object>>) -> Self {
        Self { inner, target }
    }

    /// Run against the bound target
    pub fn run(&self) -> FunctoResult<()> {
        let mut target = self.target.lock();
        self.inner.apply(&mut target).map(drop)
    }

    /// Bound target
    pub fn target(&self) -> &Arc<Mutex<Object>> {
        &self.target
    }
}

adapter_common!(Runnable);
