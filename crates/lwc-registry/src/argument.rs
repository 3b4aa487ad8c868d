//! Parameter model for method descriptors.
//!
//! A parameter is a small record: a [`Direction`], an [`ArgType`], optional
//! array information, an optional name (for keyword binding) and an optional
//! default value.

use std::fmt;

use lwc_core::{Dynamic, RegistrationError};
use num_enum::TryFromPrimitive;

/// Data flow direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum Direction {
    /// Supplied by the caller.
    In = 0,
    /// Result slot written by the method.
    Out = 1,
    /// Supplied by the caller and reported back as a result.
    InOut = 2,
    /// The primary result value.
    Return = 3,
}

impl Direction {
    /// Whether the caller supplies a value for this direction.
    pub fn is_input(self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }

    /// Whether this direction is reported back as an out value.
    pub fn is_output(self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
            Direction::Return => "return",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum ArgType {
    Bool = 0,
    Int = 1,
    Long = 2,
    Real = 3,
    String = 4,
    Object = 5,
}

impl ArgType {
    pub fn as_str(self) -> &'static str {
        match self {
            ArgType::Bool => "bool",
            ArgType::Int => "int",
            ArgType::Long => "long",
            ArgType::Real => "real",
            ArgType::String => "string",
            ArgType::Object => "object",
        }
    }

    /// Convert a scalar value to this type.
    ///
    /// With `implicit` set, integers and reals convert into each other (reals
    /// truncate toward zero). On failure returns the type name of the value.
    pub fn coerce(self, value: Dynamic, implicit: bool) -> Result<Dynamic, &'static str> {
        match (self, value) {
            (ArgType::Bool, value @ Dynamic::Bool(_)) => Ok(value),
            (ArgType::Int | ArgType::Long, value @ Dynamic::Int(_)) => Ok(value),
            (ArgType::Int | ArgType::Long, Dynamic::Float(v)) if implicit && v.is_finite() => {
                Ok(Dynamic::Int(v as i64))
            }
            (ArgType::Real, value @ Dynamic::Float(_)) => Ok(value),
            (ArgType::Real, Dynamic::Int(v)) if implicit => Ok(Dynamic::Float(v as f64)),
            (ArgType::String, value @ Dynamic::String(_)) => Ok(value),
            (ArgType::Object, value @ (Dynamic::Object(_) | Dynamic::NullHandle)) => Ok(value),
            (_, other) => Err(other.type_name()),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared parameter of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub direction: Direction,
    pub ty: ArgType,
    /// Whether the parameter is an array of `ty`.
    pub array: bool,
    /// For arrays: index of the `int` parameter carrying the array length.
    pub size_arg: Option<usize>,
    /// Name used for keyword binding.
    pub name: Option<String>,
    /// Value substituted when the caller omits the parameter.
    pub default: Option<Dynamic>,
}

impl Argument {
    pub fn new(direction: Direction, ty: ArgType) -> Self {
        Self {
            direction,
            ty,
            array: false,
            size_arg: None,
            name: None,
            default: None,
        }
    }

    pub fn input(ty: ArgType) -> Self {
        Self::new(Direction::In, ty)
    }

    pub fn output(ty: ArgType) -> Self {
        Self::new(Direction::Out, ty)
    }

    pub fn inout(ty: ArgType) -> Self {
        Self::new(Direction::InOut, ty)
    }

    pub fn ret(ty: ArgType) -> Self {
        Self::new(Direction::Return, ty)
    }

    /// Decode a parameter from raw direction and type codes.
    pub fn from_raw(direction: u8, ty: u8) -> Result<Self, RegistrationError> {
        let direction = Direction::try_from(direction).map_err(|e| {
            RegistrationError::InvalidDeclaration(format!("unknown direction code {}", e.number))
        })?;
        let ty = ArgType::try_from(ty).map_err(|e| {
            RegistrationError::InvalidDeclaration(format!("unknown type code {}", e.number))
        })?;
        Ok(Self::new(direction, ty))
    }

    /// Set the keyword name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Make the parameter optional with the given default.
    pub fn with_default(mut self, value: impl Into<Dynamic>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Make the parameter an array without a length parameter.
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Make the parameter an array whose length is carried by parameter `size_arg`.
    pub fn array_sized_by(mut self, size_arg: usize) -> Self {
        self.array = true;
        self.size_arg = Some(size_arg);
        self
    }

    /// Whether callers may omit this parameter.
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Convert a caller value to this parameter's declared type.
    ///
    /// Arrays are checked element-wise.
    pub fn coerce(&self, value: Dynamic, implicit: bool) -> Result<Dynamic, &'static str> {
        if !self.array {
            return self.ty.coerce(value, implicit);
        }
        match value {
            Dynamic::Array(items) => items
                .into_iter()
                .map(|item| self.ty.coerce(item, implicit))
                .collect::<Result<Vec<_>, _>>()
                .map(Dynamic::Array),
            other => Err(other.type_name()),
        }
    }

    /// Type as rendered in signatures, e.g. `int` or `object[]`.
    pub fn type_label(&self) -> String {
        if self.array {
            format!("{}[]", self.ty)
        } else {
            self.ty.to_string()
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.direction, self.type_label())?;
        if let Some(size_arg) = self.size_arg {
            write!(f, " (size @{})", size_arg)?;
        }
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}
