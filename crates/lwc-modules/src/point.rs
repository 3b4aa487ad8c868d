//! Point components (`rbtest` module).

use lwc_core::{CallContext, NativeError, ObjectHandle, RegistrationError};
use lwc_registry::{ArgType, Argument, ClassBuilder, ClassEntry, MethodDescriptor, StaticModule};

pub const MODULE_NAME: &str = "rbtest";
pub const POINT: &str = "rbtest.Point";
pub const POINT2: &str = "rbtest.Point2";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn dot(&self, rhs: &Point) -> f64 {
        (self.x * rhs.x + self.y * rhs.y) as f64
    }
}

fn get_x(ctx: &mut CallContext) -> Result<(), NativeError> {
    let x = ctx.this::<Point>()?.x;
    ctx.set_return(x);
    Ok(())
}

fn get_y(ctx: &mut CallContext) -> Result<(), NativeError> {
    let y = ctx.this::<Point>()?.y;
    ctx.set_return(y);
    Ok(())
}

fn set_x(ctx: &mut CallContext) -> Result<(), NativeError> {
    let x: i64 = ctx.arg(0)?;
    ctx.this_mut::<Point>()?.x = x;
    Ok(())
}

fn set_y(ctx: &mut CallContext) -> Result<(), NativeError> {
    let y: i64 = ctx.arg(0)?;
    ctx.this_mut::<Point>()?.y = y;
    Ok(())
}

fn set(ctx: &mut CallContext) -> Result<(), NativeError> {
    let x: i64 = ctx.arg(0)?;
    let y: i64 = ctx.arg(1)?;
    *ctx.this_mut::<Point>()? = Point { x, y };
    Ok(())
}

fn dot(ctx: &mut CallContext) -> Result<(), NativeError> {
    let rhs: ObjectHandle = ctx.arg(0)?;
    let value = ctx.this::<Point>()?.dot(ctx.object::<Point>(rhs)?);
    ctx.set_out(1, value)
}

pub fn point_class() -> Result<ClassEntry, RegistrationError> {
    let coordinate = || Argument::input(ArgType::Long);
    Ok(ClassBuilder::<Point>::new(POINT)
        .method(
            "getX",
            MethodDescriptor::new(vec![Argument::ret(ArgType::Long)]),
            get_x,
        )?
        .method(
            "getY",
            MethodDescriptor::new(vec![Argument::ret(ArgType::Long)]),
            get_y,
        )?
        .method(
            "set",
            MethodDescriptor::new(vec![coordinate().named("x"), coordinate().named("y")]),
            set,
        )?
        .method("setX", MethodDescriptor::new(vec![coordinate()]), set_x)?
        .method("setY", MethodDescriptor::new(vec![coordinate()]), set_y)?
        .build())
}

pub fn point2_class() -> Result<ClassEntry, RegistrationError> {
    Ok(ClassBuilder::<Point>::new(POINT2)
        .derives(POINT)
        .method(
            "dot",
            MethodDescriptor::new(vec![
                Argument::input(ArgType::Object).named("rhs"),
                Argument::output(ArgType::Real),
            ])
            .with_doc("Dot product with another point."),
            dot,
        )?
        .build())
}

pub fn module() -> Result<StaticModule, RegistrationError> {
    Ok(StaticModule::new(
        MODULE_NAME,
        vec![point_class()?, point2_class()?],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product() {
        let a = Point { x: 2, y: 3 };
        let b = Point { x: -1, y: 4 };
        assert_eq!(a.dot(&b), 10.0);
        assert_eq!(Point::default().dot(&a), 0.0);
    }

    #[test]
    fn point2_extends_point() {
        let class = point2_class().unwrap();
        assert_eq!(class.base(), Some(POINT));
        assert_eq!(
            class.methods().lookup("dot").unwrap().descriptor.to_string(),
            "([in] object rhs, [out] real)"
        );
        assert_eq!(point_class().unwrap().methods().len(), 5);
    }
}
