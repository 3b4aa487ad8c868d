//! Native method storage and callable trait.

use std::fmt;
use std::sync::Arc;

use crate::TypeHash;
use crate::error::NativeError;

use super::CallContext;

/// Type-erased method body.
///
/// This wraps any callable that implements [`NativeCallable`], so bodies of
/// different classes are stored uniformly in method tables. The callable is
/// shared through an `Arc`: merging a derived class's table clones the
/// inherited entries without copying the bodies.
pub struct NativeFn {
    /// Method hash (owner class + method name) of the declaring class
    pub id: TypeHash,
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    /// Create a new NativeFn from a callable with a specific ID.
    pub fn new<F>(id: TypeHash, f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self {
            id,
            inner: Arc::new(f),
        }
    }

    /// Call this method body with the given context.
    pub fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError> {
        self.inner.call(ctx)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Clone for NativeFn {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Trait for callable method bodies.
///
/// The `call` method receives a [`CallContext`] that provides access to the
/// receiver, the bound arguments and the result slots.
pub trait NativeCallable {
    /// Call this function with the given context.
    fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&mut CallContext) -> Result<(), NativeError>,
{
    fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError> {
        (self)(ctx)
    }
}
