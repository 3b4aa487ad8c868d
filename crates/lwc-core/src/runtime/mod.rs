//! Instance storage and method execution context.
//!
//! ## Key Types
//!
//! - [`Dynamic`]: Runtime value type for arguments and results
//! - [`ObjectHandle`] / [`ObjectHeap`]: Generational, non-owning instance handles
//! - [`NativeFn`]: Type-erased method body
//! - [`CallContext`]: Bridge between the dispatcher and a method body

mod call_context;
mod dynamic;
mod native_fn;
mod object_heap;

pub use call_context::CallContext;
pub use dynamic::Dynamic;
pub use native_fn::{NativeCallable, NativeFn};
pub use object_heap::{ObjectHandle, ObjectHeap};
