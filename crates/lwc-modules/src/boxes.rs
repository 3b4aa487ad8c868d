//! Box components (`test` module).
//!
//! `test.DoubleBox` overrides every setter of `test.Box` to store twice the
//! given value and inherits the getters unchanged.

use lwc_core::{CallContext, NativeError, RegistrationError, TypeHash};
use lwc_registry::{ArgType, Argument, ClassBuilder, ClassEntry, MethodDescriptor, StaticModule};

pub const MODULE_NAME: &str = "test";
pub const BOX: &str = "test.Box";
pub const DOUBLE_BOX: &str = "test.DoubleBox";

/// Position and size of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        }
    }
}

type Field = fn(&mut Geometry) -> &mut i64;

fn x(g: &mut Geometry) -> &mut i64 {
    &mut g.x
}

fn y(g: &mut Geometry) -> &mut i64 {
    &mut g.y
}

fn width(g: &mut Geometry) -> &mut i64 {
    &mut g.width
}

fn height(g: &mut Geometry) -> &mut i64 {
    &mut g.height
}

/// Setter name, getter name and field of each coordinate.
const FIELDS: [(&str, &str, Field); 4] = [
    ("setX", "getX", x),
    ("setY", "getY", y),
    ("setWidth", "getWidth", width),
    ("setHeight", "getHeight", height),
];

fn setter(field: Field, factor: i64) -> impl Fn(&mut CallContext) -> Result<(), NativeError> {
    move |ctx: &mut CallContext| {
        let value: i64 = ctx.arg(0)?;
        *field(ctx.this_mut::<Geometry>()?) = factor * value;
        Ok(())
    }
}

fn getter(field: Field) -> impl Fn(&mut CallContext) -> Result<(), NativeError> {
    move |ctx: &mut CallContext| {
        let value = *field(ctx.this_mut::<Geometry>()?);
        ctx.set_out(0, value)
    }
}

fn to_box(ctx: &mut CallContext) -> Result<(), NativeError> {
    let geometry = *ctx.this::<Geometry>()?;
    let copy = ctx.allocate(TypeHash::from_name(BOX), geometry);
    ctx.set_out(0, copy)
}

fn set_descriptor() -> MethodDescriptor {
    MethodDescriptor::new(vec![Argument::input(ArgType::Int)])
}

pub fn box_class() -> Result<ClassEntry, RegistrationError> {
    let mut builder = ClassBuilder::<Geometry>::new(BOX).description("Axis aligned box");
    for (set_name, get_name, field) in FIELDS {
        builder = builder
            .method(set_name, set_descriptor(), setter(field, 1))?
            .method(
                get_name,
                MethodDescriptor::new(vec![Argument::output(ArgType::Int)]),
                getter(field),
            )?;
    }
    Ok(builder.build())
}

pub fn double_box_class() -> Result<ClassEntry, RegistrationError> {
    let mut builder = ClassBuilder::<Geometry>::new(DOUBLE_BOX)
        .description("Box whose setters store twice the given value")
        .derives(BOX);
    for (set_name, _, field) in FIELDS {
        builder = builder.method(set_name, set_descriptor(), setter(field, 2))?;
    }
    Ok(builder
        .method(
            "toBox",
            MethodDescriptor::new(vec![Argument::output(ArgType::Object)])
                .with_doc("New test.Box with the same geometry, owned by the caller."),
            to_box,
        )?
        .build())
}

pub fn module() -> Result<StaticModule, RegistrationError> {
    Ok(StaticModule::new(
        MODULE_NAME,
        vec![box_class()?, double_box_class()?],
    ))
}
