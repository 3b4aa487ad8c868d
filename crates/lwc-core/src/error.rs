//! Unified error types for the component registry.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LwcError (top-level wrapper)
//! ├── RegistrationError - class/method registration errors
//! ├── DispatchError     - invocation errors (unknown type/operation, binding,
//! │   │                   invalid instance, component failure)
//! │   ├── BindError     - arguments do not satisfy a method descriptor
//! │   └── NativeError   - raised by component code (range errors, ...)
//! │       └── ConversionError - value conversion failures
//! └── LoadError         - module path scanning and module loading
//! ```
//!
//! Component code raises [`NativeError`] directly; the dispatch layer raises
//! everything else before component code runs.

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors that can occur when converting between Rust and dynamic values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Type mismatch during conversion
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Attempted to convert a null handle to a non-nullable type
    #[error("null handle cannot be converted to {target_type}")]
    NullHandle { target_type: &'static str },

    /// Integer overflow during conversion
    #[error("integer overflow: value {value} does not fit in {target_type}")]
    IntegerOverflow { value: i64, target_type: &'static str },

    /// Float conversion error
    #[error("float conversion error: value {value} cannot be represented as {target_type}")]
    FloatConversion {
        value: f64,
        target_type: &'static str,
    },

    /// Array element conversion failure
    #[error("array element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ConversionError>,
    },
}

// ============================================================================
// Native (component) Errors
// ============================================================================

/// Errors raised while a component method body executes.
#[derive(Debug, Error)]
pub enum NativeError {
    /// Error converting arguments or results
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Position outside `[0, size)` for a positional operation
    #[error("{operation}: invalid index {index} in list of size {size}")]
    IndexOutOfRange {
        operation: &'static str,
        index: i64,
        size: usize,
    },

    /// Invalid `this` reference for method call
    #[error("invalid 'this' reference: {message}")]
    InvalidThis { message: String },

    /// Argument slot index out of bounds
    #[error("argument index {index} out of bounds (method has {count} arguments)")]
    ArgumentIndexOutOfBounds { index: usize, count: usize },

    /// Stale object handle passed as an argument
    #[error("stale object handle: object at index {index} has been destroyed")]
    StaleHandle { index: u32 },

    /// Writing to the side channel failed
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Generic native error
    #[error("native error: {message}")]
    Other { message: String },
}

impl NativeError {
    /// Create an "invalid this" error with a message.
    pub fn invalid_this(message: impl Into<String>) -> Self {
        NativeError::InvalidThis {
            message: message.into(),
        }
    }

    /// Create a generic native error.
    pub fn other(message: impl Into<String>) -> Self {
        NativeError::Other {
            message: message.into(),
        }
    }

    /// Check if this is a range error.
    pub fn is_range(&self) -> bool {
        matches!(self, NativeError::IndexOutOfRange { .. })
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while registering classes and building method tables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A referenced type (usually a base class) was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A method with this name is already in the table and overriding is off.
    #[error("method already defined: \"{0}\"")]
    DuplicateMethod(String),

    /// The parameter list of a method is invalid.
    #[error("invalid parameter list for method \"{method}\": {reason}")]
    InvalidMethod { method: String, reason: String },

    /// A raw declaration code could not be decoded.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),
}

// ============================================================================
// Binding Errors
// ============================================================================

/// Supplied arguments do not satisfy a method descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// More positional arguments than caller-supplied parameters.
    #[error("method \"{method}\" takes at most {expected} positional arguments ({got} given)")]
    TooManyArguments {
        method: String,
        expected: usize,
        got: usize,
    },

    /// A required parameter received no value.
    #[error("method \"{method}\" expects {expected} arguments (missing \"{parameter}\")")]
    MissingArgument {
        method: String,
        expected: usize,
        parameter: String,
    },

    /// A named argument does not match any parameter.
    #[error("method \"{method}\" has no keyword argument \"{name}\"")]
    UnknownKeyword { method: String, name: String },

    /// A named argument targets a parameter that was already filled.
    #[error("method \"{method}\" keyword argument \"{name}\" is set twice")]
    DuplicateKeyword { method: String, name: String },

    /// A value has the wrong type for its parameter.
    #[error("in method \"{method}\": argument {index} type mismatch (expected {expected}, got {actual})")]
    TypeMismatch {
        method: String,
        index: usize,
        expected: String,
        actual: &'static str,
    },
}

// ============================================================================
// Dispatch Errors
// ============================================================================

/// Errors reported by `invoke` and the registry lifecycle calls.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The type name is not registered.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The method table of the instance has no such operation.
    #[error("type \"{type_name}\" has no method \"{method}\"")]
    UnknownOperation { type_name: String, method: String },

    /// Argument binding failed.
    #[error(transparent)]
    Binding(#[from] BindError),

    /// The handle refers to a destroyed (or never created) instance.
    #[error("invalid instance: object at index {index} is not alive")]
    InvalidInstance { index: u32 },

    /// The component raised an error while executing.
    #[error("in method \"{method}\": {source}")]
    Native {
        method: String,
        #[source]
        source: NativeError,
    },
}

impl DispatchError {
    /// The component error, if the failure came from component code.
    pub fn native(&self) -> Option<&NativeError> {
        match self {
            DispatchError::Native { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Check if this is a range error raised by a component.
    pub fn is_range(&self) -> bool {
        self.native().is_some_and(NativeError::is_range)
    }
}

// ============================================================================
// Load Errors
// ============================================================================

/// Errors raised while scanning module paths and loading modules.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a module path failed.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The loader claimed the file but does not provide such a module.
    #[error("no module named \"{name}\" ({})", path.display())]
    UnknownModule { name: String, path: PathBuf },

    /// Registering the classes of a loaded module failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for all registry operations.
#[derive(Debug, Error)]
pub enum LwcError {
    /// A registration error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A dispatch error.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A load error.
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl LwcError {
    /// Check if this is a registration error.
    pub fn is_registration(&self) -> bool {
        matches!(self, LwcError::Registration(_))
    }

    /// Check if this is a dispatch error.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, LwcError::Dispatch(_))
    }

    /// Check if this is a load error.
    pub fn is_load(&self) -> bool {
        matches!(self, LwcError::Load(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_type_mismatch() {
        let err = ConversionError::TypeMismatch {
            expected: "int",
            actual: "string",
        };
        assert_eq!(err.to_string(), "type mismatch: expected int, got string");
    }

    #[test]
    fn conversion_error_element() {
        let err = ConversionError::Element {
            index: 2,
            source: Box::new(ConversionError::NullHandle {
                target_type: "object",
            }),
        };
        assert!(err.to_string().contains("array element 2"));
        assert!(err.to_string().contains("null handle"));
    }

    #[test]
    fn range_error_names_operation_index_and_size() {
        let err = NativeError::IndexOutOfRange {
            operation: "erase",
            index: 5,
            size: 3,
        };
        assert_eq!(err.to_string(), "erase: invalid index 5 in list of size 3");
        assert!(err.is_range());
    }

    #[test]
    fn native_error_from_conversion() {
        let native: NativeError = ConversionError::NullHandle {
            target_type: "object",
        }
        .into();
        assert!(matches!(native, NativeError::Conversion(_)));
        assert!(!native.is_range());
    }

    #[test]
    fn native_error_helpers() {
        assert!(
            NativeError::invalid_this("no receiver")
                .to_string()
                .contains("no receiver")
        );
        assert!(NativeError::other("boom").to_string().contains("boom"));
    }

    #[test]
    fn registration_error_display() {
        let err = RegistrationError::DuplicateMethod("push".into());
        assert_eq!(err.to_string(), "method already defined: \"push\"");
    }

    #[test]
    fn bind_error_display() {
        let err = BindError::DuplicateKeyword {
            method: "printInt".into(),
            name: "indent".into(),
        };
        assert_eq!(
            err.to_string(),
            "method \"printInt\" keyword argument \"indent\" is set twice"
        );
    }

    #[test]
    fn dispatch_error_wraps_native() {
        let err = DispatchError::Native {
            method: "at".into(),
            source: NativeError::IndexOutOfRange {
                operation: "at",
                index: -1,
                size: 0,
            },
        };
        assert!(err.is_range());
        assert!(err.to_string().starts_with("in method \"at\""));

        let unknown = DispatchError::UnknownOperation {
            type_name: "pytest.ObjectList".into(),
            method: "clear".into(),
        };
        assert!(!unknown.is_range());
        assert!(unknown.native().is_none());
    }

    #[test]
    fn unified_error_kinds() {
        let err: LwcError = RegistrationError::DuplicateType("test.Box".into()).into();
        assert!(err.is_registration());

        let err: LwcError = DispatchError::UnknownType("nope".into()).into();
        assert!(err.is_dispatch());

        let err: LwcError = LoadError::UnknownModule {
            name: "nope".into(),
            path: PathBuf::from("nope.lwcm"),
        }
        .into();
        assert!(err.is_load());
    }
}
