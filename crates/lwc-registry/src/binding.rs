//! Argument binding and result assembly.
//!
//! [`bind`] turns caller arguments into one slot per declared parameter. It
//! is pure and independent of the method body, so binding rules can be
//! tested without instances.

use lwc_core::{BindError, Dynamic};

use crate::method::MethodDescriptor;

/// Slots ready to be handed to a method body.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCall {
    /// One value per declared parameter; `out` and `return` slots start as `Void`.
    pub slots: Vec<Dynamic>,
    pub return_index: Option<usize>,
}

/// Bind positional and named arguments to a descriptor.
///
/// Positional arguments fill caller-supplied parameters in declaration
/// order, named arguments match parameter names, omitted optional
/// parameters take their default. Array size parameters are filled from the
/// bound array length.
pub fn bind(
    method: &str,
    descriptor: &MethodDescriptor,
    positional: &[Dynamic],
    named: &[(&str, Dynamic)],
    implicit_conversions: bool,
) -> Result<BoundCall, BindError> {
    let params = descriptor.params();
    let callable = descriptor.caller_params();

    if positional.len() > callable.len() {
        return Err(BindError::TooManyArguments {
            method: method.to_string(),
            expected: callable.len(),
            got: positional.len(),
        });
    }

    let mut slots = vec![Dynamic::Void; params.len()];
    let mut filled = vec![false; params.len()];

    let coerce = |index: usize, value: &Dynamic| {
        params[index]
            .coerce(value.clone(), implicit_conversions)
            .map_err(|actual| BindError::TypeMismatch {
                method: method.to_string(),
                index,
                expected: params[index].type_label(),
                actual,
            })
    };

    for (&index, value) in callable.iter().zip(positional) {
        slots[index] = coerce(index, value)?;
        filled[index] = true;
    }

    for (name, value) in named {
        let index = callable
            .iter()
            .copied()
            .find(|&i| params[i].name.as_deref() == Some(*name))
            .ok_or_else(|| BindError::UnknownKeyword {
                method: method.to_string(),
                name: name.to_string(),
            })?;
        if filled[index] {
            return Err(BindError::DuplicateKeyword {
                method: method.to_string(),
                name: name.to_string(),
            });
        }
        slots[index] = coerce(index, value)?;
        filled[index] = true;
    }

    for &index in &callable {
        if filled[index] {
            continue;
        }
        match &params[index].default {
            Some(default) => slots[index] = default.clone(),
            None => {
                return Err(BindError::MissingArgument {
                    method: method.to_string(),
                    expected: callable.len(),
                    parameter: params[index]
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("@{}", index)),
                });
            }
        }
    }

    for (index, param) in params.iter().enumerate() {
        if let Some(size_arg) = param.size_arg
            && param.direction.is_input()
            && let Dynamic::Array(items) = &slots[index]
        {
            slots[size_arg] = Dynamic::Int(items.len() as i64);
        }
    }

    log::trace!("bound {} argument(s) for \"{}\"", slots.len(), method);

    Ok(BoundCall {
        slots,
        return_index: descriptor.return_index(),
    })
}

/// Outcome of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult {
    /// The `return` slot, or `Void` if the method declares none.
    pub value: Dynamic,
    /// Whether the method declares a `return` parameter.
    pub has_return: bool,
    /// `out` and `inout` slots in declaration order.
    pub outs: Vec<Dynamic>,
}

impl CallResult {
    /// Collect the result slots after the method body ran.
    pub fn collect(descriptor: &MethodDescriptor, mut slots: Vec<Dynamic>) -> Self {
        let return_index = descriptor.return_index();
        let value = return_index
            .map(|i| std::mem::replace(&mut slots[i], Dynamic::Void))
            .unwrap_or(Dynamic::Void);
        let outs = descriptor
            .output_params()
            .into_iter()
            .map(|i| std::mem::replace(&mut slots[i], Dynamic::Void))
            .collect();
        Self {
            value,
            has_return: return_index.is_some(),
            outs,
        }
    }

    /// Collapse into a single value.
    ///
    /// The return value when there are no out values, the only out value when
    /// no return is declared, `Void` when there is neither, and an array
    /// (declared return value first, even if unset) otherwise.
    pub fn into_value(self) -> Dynamic {
        let CallResult {
            value,
            has_return,
            mut outs,
        } = self;
        match (has_return, outs.len()) {
            (_, 0) => value,
            (false, 1) => outs.remove(0),
            (false, _) => Dynamic::Array(outs),
            (true, _) => {
                outs.insert(0, value);
                Dynamic::Array(outs)
            }
        }
    }
}
