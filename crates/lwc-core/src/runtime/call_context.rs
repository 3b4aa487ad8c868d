//! Call context bridging the dispatcher and component method bodies.

use std::any::Any;
use std::fmt;
use std::io::Write;

use crate::TypeHash;
use crate::convert::{FromDynamic, IntoDynamic};
use crate::error::NativeError;

use super::{Dynamic, ObjectHandle, ObjectHeap};

/// Context for a single method invocation.
///
/// The dispatcher binds caller arguments into one slot per declared
/// parameter (declaration order, `out`/`return` slots start as
/// [`Dynamic::Void`]) and hands the slots to the method body through this
/// context. After the body returns, the dispatcher reads the `return` and
/// `out` slots back to assemble the call result.
///
/// ## Typed Argument Access
///
/// ```ignore
/// let idx: i64 = ctx.arg(0)?;
/// let obj: ObjectHandle = ctx.arg(1)?;
/// ```
///
/// ## Results
///
/// ```ignore
/// ctx.set_return(list.len());
/// ctx.set_out(0, width)?;
/// ```
pub struct CallContext<'vm> {
    /// Receiver of the call
    this: ObjectHandle,
    /// One slot per declared parameter
    slots: &'vm mut [Dynamic],
    /// Index of the `return` parameter, if declared
    return_index: Option<usize>,
    /// Instance storage, for the receiver and object arguments
    heap: &'vm mut ObjectHeap,
    /// Diagnostic side channel
    output: &'vm mut dyn Write,
}

impl<'vm> CallContext<'vm> {
    /// Create a new call context.
    ///
    /// # Arguments
    ///
    /// * `this` - The receiver instance
    /// * `slots` - The bound parameter slots
    /// * `return_index` - Position of the `return` parameter among the slots
    /// * `heap` - Instance storage
    /// * `output` - Side channel for diagnostic operations
    pub fn new(
        this: ObjectHandle,
        slots: &'vm mut [Dynamic],
        return_index: Option<usize>,
        heap: &'vm mut ObjectHeap,
        output: &'vm mut dyn Write,
    ) -> Self {
        Self {
            this,
            slots,
            return_index,
            heap,
            output,
        }
    }

    /// The receiver handle.
    pub fn this_handle(&self) -> ObjectHandle {
        self.this
    }

    /// Get the number of parameter slots.
    pub fn arg_count(&self) -> usize {
        self.slots.len()
    }

    /// Get a raw reference to a parameter slot.
    pub fn arg_slot(&self, index: usize) -> Result<&Dynamic, NativeError> {
        self.slots
            .get(index)
            .ok_or(NativeError::ArgumentIndexOutOfBounds {
                index,
                count: self.slots.len(),
            })
    }

    /// Get a typed argument value.
    ///
    /// This uses the `FromDynamic` trait to convert the slot value to the
    /// requested type, with bounds checking for narrow integers.
    pub fn arg<T: FromDynamic>(&self, index: usize) -> Result<T, NativeError> {
        let slot = self.arg_slot(index)?;
        T::from_dynamic(slot).map_err(NativeError::Conversion)
    }

    /// Write an `out` (or `inout`) slot.
    pub fn set_out<T: IntoDynamic>(&mut self, index: usize, value: T) -> Result<(), NativeError> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(NativeError::ArgumentIndexOutOfBounds { index, count })?;
        *slot = value.into_dynamic();
        Ok(())
    }

    /// Set the primary return value.
    ///
    /// Ignored when the method declares no `return` parameter.
    pub fn set_return<T: IntoDynamic>(&mut self, value: T) {
        if let Some(index) = self.return_index
            && let Some(slot) = self.slots.get_mut(index)
        {
            *slot = value.into_dynamic();
        }
    }

    /// Get an immutable reference to the receiver state.
    pub fn this<T: Any>(&self) -> Result<&T, NativeError> {
        self.heap.get::<T>(self.this).ok_or_else(|| {
            NativeError::invalid_this(format!(
                "instance type mismatch or destroyed instance for {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Get a mutable reference to the receiver state.
    pub fn this_mut<T: Any>(&mut self) -> Result<&mut T, NativeError> {
        self.heap.get_mut::<T>(self.this).ok_or_else(|| {
            NativeError::invalid_this(format!(
                "instance type mismatch or destroyed instance for {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Read the state of another instance passed as an argument.
    pub fn object<T: Any>(&self, handle: ObjectHandle) -> Result<&T, NativeError> {
        if !self.heap.contains(handle) {
            return Err(NativeError::StaleHandle {
                index: handle.index,
            });
        }
        self.heap.get::<T>(handle).ok_or_else(|| {
            NativeError::other(format!(
                "object is not a {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Create a new instance of `class` owned by the caller.
    ///
    /// The state type must be the one the class's methods expect.
    pub fn allocate<T: Any + Send + Sync>(&mut self, class: TypeHash, state: T) -> ObjectHandle {
        self.heap.allocate(class, Box::new(state))
    }

    /// Get access to the instance heap.
    pub fn heap(&self) -> &ObjectHeap {
        &*self.heap
    }

    /// The diagnostic side channel.
    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }
}

impl fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("this", &self.this)
            .field("arg_count", &self.arg_count())
            .field("return_index", &self.return_index)
            .finish()
    }
}
