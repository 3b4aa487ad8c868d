//! Runtime value type for method arguments and results.

use std::fmt;

use super::ObjectHandle;

/// A dynamic value passed across the dispatch boundary.
///
/// Every argument, default value and result slot is a `Dynamic`. Objects are
/// never stored inline: `Object` carries a non-owning [`ObjectHandle`] whose
/// target lives in the registry's heap.
#[derive(Clone, PartialEq)]
pub enum Dynamic {
    /// Void/empty (unset result slot)
    Void,
    /// Boolean value
    Bool(bool),
    /// Integer value (int and long are both stored as i64)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value (owned)
    String(String),
    /// Handle to a live component instance
    Object(ObjectHandle),
    /// Array of values
    Array(Vec<Dynamic>),
    /// Null handle, also the empty marker for role-based retrieval
    NullHandle,
}

impl Dynamic {
    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Void => "void",
            Dynamic::Bool(_) => "bool",
            Dynamic::Int(_) => "int",
            Dynamic::Float(_) => "real",
            Dynamic::String(_) => "string",
            Dynamic::Object(_) => "object",
            Dynamic::Array(_) => "array",
            Dynamic::NullHandle => "null",
        }
    }

    /// Check if this value is void.
    pub fn is_void(&self) -> bool {
        matches!(self, Dynamic::Void)
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::NullHandle)
    }

    /// The object handle, if this is an object value.
    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            Dynamic::Object(handle) => Some(*handle),
            _ => None,
        }
    }

    /// The integer, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Dynamic::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for Dynamic {
    fn from(value: bool) -> Self {
        Dynamic::Bool(value)
    }
}

impl From<i64> for Dynamic {
    fn from(value: i64) -> Self {
        Dynamic::Int(value)
    }
}

impl From<i32> for Dynamic {
    fn from(value: i32) -> Self {
        Dynamic::Int(value as i64)
    }
}

impl From<f64> for Dynamic {
    fn from(value: f64) -> Self {
        Dynamic::Float(value)
    }
}

impl From<String> for Dynamic {
    fn from(value: String) -> Self {
        Dynamic::String(value)
    }
}

impl From<&str> for Dynamic {
    fn from(value: &str) -> Self {
        Dynamic::String(value.to_string())
    }
}

impl From<ObjectHandle> for Dynamic {
    fn from(value: ObjectHandle) -> Self {
        Dynamic::Object(value)
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Void => write!(f, "Void"),
            Dynamic::Bool(v) => write!(f, "Bool({})", v),
            Dynamic::Int(v) => write!(f, "Int({})", v),
            Dynamic::Float(v) => write!(f, "Float({})", v),
            Dynamic::String(s) => write!(f, "String({:?})", s),
            Dynamic::Object(h) => write!(f, "Object({:?})", h),
            Dynamic::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Dynamic::NullHandle => write!(f, "NullHandle"),
        }
    }
}

impl fmt::Display for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Void => write!(f, "void"),
            Dynamic::Bool(v) => write!(f, "{}", v),
            Dynamic::Int(v) => write!(f, "{}", v),
            Dynamic::Float(v) => write!(f, "{}", v),
            Dynamic::String(s) => write!(f, "{:?}", s),
            Dynamic::Object(h) => write!(f, "<object {}:{}>", h.index, h.generation),
            Dynamic::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Dynamic::NullHandle => write!(f, "null"),
        }
    }
}
