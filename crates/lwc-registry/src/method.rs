//! Method descriptors and registered methods.

use std::fmt;
use std::fmt::Write as _;

use lwc_core::{NativeFn, RegistrationError};

use crate::argument::{ArgType, Argument, Direction};

/// Declarative metadata for one exposed operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodDescriptor {
    params: Vec<Argument>,
    doc: Option<String>,
}

impl MethodDescriptor {
    /// Hard upper bound on declared parameters.
    pub const MAX_ARGUMENTS: usize = 16;

    pub fn new(params: Vec<Argument>) -> Self {
        Self { params, doc: None }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn params(&self) -> &[Argument] {
        &self.params
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Position of the `return` parameter, if any.
    pub fn return_index(&self) -> Option<usize> {
        self.params
            .iter()
            .position(|p| p.direction == Direction::Return)
    }

    /// Whether parameter `index` carries the length of an array parameter.
    ///
    /// Such parameters are derived during binding and never supplied by callers.
    pub fn is_size_param(&self, index: usize) -> bool {
        self.params.iter().any(|p| p.size_arg == Some(index))
    }

    /// Indices of the parameters a caller supplies, in declaration order.
    pub fn caller_params(&self) -> Vec<usize> {
        self.params
            .iter()
            .enumerate()
            .filter(|(i, p)| p.direction.is_input() && !self.is_size_param(*i))
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of the reported out values, in declaration order.
    pub fn output_params(&self) -> Vec<usize> {
        self.params
            .iter()
            .enumerate()
            .filter(|(i, p)| p.direction.is_output() && !self.is_size_param(*i))
            .map(|(i, _)| i)
            .collect()
    }

    /// Check the parameter list for structural errors.
    pub fn validate(&self, method: &str, max_arguments: usize) -> Result<(), RegistrationError> {
        let invalid = |reason: String| RegistrationError::InvalidMethod {
            method: method.to_string(),
            reason,
        };

        let limit = max_arguments.min(Self::MAX_ARGUMENTS);
        if self.params.len() > limit {
            return Err(invalid(format!(
                "{} arguments declared, at most {} allowed",
                self.params.len(),
                limit
            )));
        }

        let returns = self
            .params
            .iter()
            .filter(|p| p.direction == Direction::Return)
            .count();
        if returns > 1 {
            return Err(invalid(format!("{} return arguments declared", returns)));
        }

        for (index, param) in self.params.iter().enumerate() {
            if let Some(size_arg) = param.size_arg {
                let Some(size) = self.params.get(size_arg).filter(|_| size_arg != index) else {
                    return Err(invalid(format!(
                        "array argument {} refers to missing size argument {}",
                        index, size_arg
                    )));
                };
                if size.ty != ArgType::Int || size.array {
                    return Err(invalid(format!(
                        "size argument {} of array argument {} must be a plain int",
                        size_arg, index
                    )));
                }
                if size.direction != param.direction {
                    return Err(invalid(format!(
                        "size argument {} has direction {}, array argument {} has {}",
                        size_arg, size.direction, index, param.direction
                    )));
                }
            }

            if let Some(default) = &param.default {
                if param.direction != Direction::In || self.is_size_param(index) {
                    return Err(invalid(format!(
                        "argument {} has a default but is not a caller-supplied [in] argument",
                        index
                    )));
                }
                if let Err(actual) = param.coerce(default.clone(), true) {
                    return Err(invalid(format!(
                        "default of argument {} is {}, expected {}",
                        index,
                        actual,
                        param.type_label()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Multi-line description: one line per parameter, then the documentation.
    pub fn doc_string(&self, indent: &str) -> String {
        let mut out = String::new();
        for (index, param) in self.params.iter().enumerate() {
            let _ = writeln!(out, "{indent}@{index} {param}");
        }
        if let Some(doc) = &self.doc {
            for line in doc.lines() {
                let _ = writeln!(out, "{indent}{line}");
            }
        }
        out
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

/// A method as stored in a table: its descriptor plus the body.
#[derive(Debug, Clone)]
pub struct Method {
    pub descriptor: MethodDescriptor,
    pub native: NativeFn,
}

impl Method {
    pub fn new(descriptor: MethodDescriptor, native: NativeFn) -> Self {
        Self { descriptor, native }
    }
}
