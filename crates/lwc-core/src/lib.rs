//! Core types for the lwc component registry.
//!
//! This crate holds everything a component implementation needs without
//! pulling in the registry itself: dynamic values, generational instance
//! handles, the per-call context and the error hierarchy.

pub mod convert;
pub mod error;
pub mod runtime;
pub mod type_hash;

pub use convert::{FromDynamic, IntoDynamic};
pub use error::{
    BindError, ConversionError, DispatchError, LoadError, LwcError, NativeError,
    RegistrationError,
};
pub use runtime::{CallContext, Dynamic, NativeCallable, NativeFn, ObjectHandle, ObjectHeap};
pub use type_hash::TypeHash;
