//! Conversion traits between Rust values and [`Dynamic`] slots.
//!
//! - [`FromDynamic`]: Extract a Rust value from a bound argument slot
//! - [`IntoDynamic`]: Store a Rust value into an `out` or `return` slot
//!
//! ## Supported Types
//!
//! - Integers: `i32`, `i64`, `u32`, `usize`
//! - Reals: `f64` (also accepts integer slots)
//! - `bool`, `String`, `()`
//! - Objects: [`ObjectHandle`], `Option<ObjectHandle>` (null maps to `None`)
//! - Arrays: `Vec<T>` for any `T` above
//!
//! ```ignore
//! let index: i64 = i64::from_dynamic(&Dynamic::Int(3))?;
//! let slot = vec![1i64, 2, 3].into_dynamic();
//! ```

use crate::error::ConversionError;
use crate::runtime::{Dynamic, ObjectHandle};

/// Extract a value from a Dynamic slot.
pub trait FromDynamic: Sized {
    /// Extract a value from the given slot.
    ///
    /// Returns a `ConversionError` if the slot holds an incompatible type.
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError>;
}

/// Convert a value into a Dynamic slot.
pub trait IntoDynamic {
    /// Convert this value into a Dynamic slot.
    fn into_dynamic(self) -> Dynamic;
}

fn mismatch(expected: &'static str, slot: &Dynamic) -> ConversionError {
    ConversionError::TypeMismatch {
        expected,
        actual: slot.type_name(),
    }
}

// ============================================================================
// Integers
// ============================================================================

impl FromDynamic for i64 {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        slot.as_int().ok_or_else(|| mismatch("int", slot))
    }
}

impl IntoDynamic for i64 {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Int(self)
    }
}

macro_rules! impl_narrow_int {
    ($($ty:ty),*) => {
        $(
            impl FromDynamic for $ty {
                fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
                    let value = i64::from_dynamic(slot)?;
                    <$ty>::try_from(value).map_err(|_| ConversionError::IntegerOverflow {
                        value,
                        target_type: stringify!($ty),
                    })
                }
            }

            impl IntoDynamic for $ty {
                fn into_dynamic(self) -> Dynamic {
                    Dynamic::Int(self as i64)
                }
            }
        )*
    };
}

impl_narrow_int!(i32, u32, usize);

// ============================================================================
// Reals
// ============================================================================

impl FromDynamic for f64 {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Float(v) => Ok(*v),
            Dynamic::Int(v) => Ok(*v as f64),
            _ => Err(mismatch("real", slot)),
        }
    }
}

impl IntoDynamic for f64 {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Float(self)
    }
}

// ============================================================================
// Bool, String, unit
// ============================================================================

impl FromDynamic for bool {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Bool(v) => Ok(*v),
            _ => Err(mismatch("bool", slot)),
        }
    }
}

impl IntoDynamic for bool {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Bool(self)
    }
}

impl FromDynamic for String {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::String(s) => Ok(s.clone()),
            _ => Err(mismatch("string", slot)),
        }
    }
}

impl IntoDynamic for String {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self)
    }
}

impl IntoDynamic for &str {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self.to_string())
    }
}

impl FromDynamic for () {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Void => Ok(()),
            _ => Err(mismatch("void", slot)),
        }
    }
}

impl IntoDynamic for () {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Void
    }
}

impl FromDynamic for Dynamic {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        Ok(slot.clone())
    }
}

impl IntoDynamic for Dynamic {
    fn into_dynamic(self) -> Dynamic {
        self
    }
}

// ============================================================================
// Objects
// ============================================================================

impl FromDynamic for ObjectHandle {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Object(handle) => Ok(*handle),
            Dynamic::NullHandle => Err(ConversionError::NullHandle {
                target_type: "object",
            }),
            _ => Err(mismatch("object", slot)),
        }
    }
}

impl IntoDynamic for ObjectHandle {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Object(self)
    }
}

impl FromDynamic for Option<ObjectHandle> {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::NullHandle => Ok(None),
            other => ObjectHandle::from_dynamic(other).map(Some),
        }
    }
}

impl IntoDynamic for Option<ObjectHandle> {
    fn into_dynamic(self) -> Dynamic {
        self.map_or(Dynamic::NullHandle, Dynamic::Object)
    }
}

// ============================================================================
// Arrays
// ============================================================================

impl<T: FromDynamic> FromDynamic for Vec<T> {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    T::from_dynamic(item).map_err(|source| ConversionError::Element {
                        index,
                        source: Box::new(source),
                    })
                })
                .collect(),
            _ => Err(mismatch("array", slot)),
        }
    }
}

impl<T: IntoDynamic> IntoDynamic for Vec<T> {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Array(self.into_iter().map(IntoDynamic::into_dynamic).collect())
    }
}
