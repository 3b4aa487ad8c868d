//! Object list components (`pytest` module).
//!
//! `pytest.ObjectList` holds an ordered sequence of non-owning object
//! handles. Positional operations (`at`, `set`, `erase`) reject indices
//! outside `[0, size)`; role-based retrieval (`first`, `last`) returns a null
//! handle on an empty list instead of failing, and `pop` on an empty list
//! does nothing.
//!
//! `pytest.ObjectList2` derives from it and adds `clear`.

use std::io::Write;

use lwc_core::{CallContext, NativeError, ObjectHandle, RegistrationError};
use lwc_registry::{ArgType, Argument, ClassBuilder, ClassEntry, MethodDescriptor, StaticModule};

pub const MODULE_NAME: &str = "pytest";
pub const OBJECT_LIST: &str = "pytest.ObjectList";
pub const OBJECT_LIST2: &str = "pytest.ObjectList2";

/// Instance state shared by both list classes.
///
/// A `None` element is a null reference pushed by the caller; it is stored
/// and handed back like any other element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectList {
    elements: Vec<Option<ObjectHandle>>,
}

impl ObjectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, obj: impl Into<Option<ObjectHandle>>) {
        self.elements.push(obj.into());
    }

    fn check(&self, operation: &'static str, index: i64) -> Result<usize, NativeError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.elements.len())
            .ok_or(NativeError::IndexOutOfRange {
                operation,
                index,
                size: self.elements.len(),
            })
    }

    pub fn at(&self, index: i64) -> Result<Option<ObjectHandle>, NativeError> {
        let i = self.check("at", index)?;
        Ok(self.elements[i])
    }

    pub fn set(
        &mut self,
        index: i64,
        obj: impl Into<Option<ObjectHandle>>,
    ) -> Result<(), NativeError> {
        let i = self.check("set", index)?;
        self.elements[i] = obj.into();
        Ok(())
    }

    /// First element; `None` when the list is empty or the element is null.
    pub fn first(&self) -> Option<ObjectHandle> {
        self.elements.first().copied().flatten()
    }

    /// Last element; `None` when the list is empty or the element is null.
    pub fn last(&self) -> Option<ObjectHandle> {
        self.elements.last().copied().flatten()
    }

    pub fn erase(&mut self, index: i64) -> Result<Option<ObjectHandle>, NativeError> {
        let i = self.check("erase", index)?;
        Ok(self.elements.remove(i))
    }

    /// Remove the last element. The outer `None` means the list was empty.
    pub fn pop(&mut self) -> Option<Option<ObjectHandle>> {
        self.elements.pop()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<ObjectHandle>> + '_ {
        self.elements.iter().copied()
    }
}

// ============================================================================
// Method bodies
// ============================================================================

fn size(ctx: &mut CallContext) -> Result<(), NativeError> {
    let len = ctx.this::<ObjectList>()?.len();
    ctx.set_return(len);
    Ok(())
}

fn push(ctx: &mut CallContext) -> Result<(), NativeError> {
    let obj: Option<ObjectHandle> = ctx.arg(0)?;
    ctx.this_mut::<ObjectList>()?.push(obj);
    Ok(())
}

fn at(ctx: &mut CallContext) -> Result<(), NativeError> {
    let index: i64 = ctx.arg(0)?;
    let obj = ctx.this::<ObjectList>()?.at(index)?;
    ctx.set_return(obj);
    Ok(())
}

fn set(ctx: &mut CallContext) -> Result<(), NativeError> {
    let index: i64 = ctx.arg(0)?;
    let obj: Option<ObjectHandle> = ctx.arg(1)?;
    ctx.this_mut::<ObjectList>()?.set(index, obj)
}

fn first(ctx: &mut CallContext) -> Result<(), NativeError> {
    let obj = ctx.this::<ObjectList>()?.first();
    ctx.set_return(obj);
    Ok(())
}

fn last(ctx: &mut CallContext) -> Result<(), NativeError> {
    let obj = ctx.this::<ObjectList>()?.last();
    ctx.set_return(obj);
    Ok(())
}

fn erase(ctx: &mut CallContext) -> Result<(), NativeError> {
    let index: i64 = ctx.arg(0)?;
    ctx.this_mut::<ObjectList>()?.erase(index)?;
    Ok(())
}

fn pop(ctx: &mut CallContext) -> Result<(), NativeError> {
    ctx.this_mut::<ObjectList>()?.pop();
    Ok(())
}

fn print_int(ctx: &mut CallContext) -> Result<(), NativeError> {
    let value: i64 = ctx.arg(0)?;
    let indent: String = ctx.arg(1)?;
    writeln!(ctx.output(), "{}{}", indent, value)?;
    Ok(())
}

fn clear(ctx: &mut CallContext) -> Result<(), NativeError> {
    ctx.this_mut::<ObjectList>()?.clear();
    Ok(())
}

// ============================================================================
// Classes
// ============================================================================

fn index_param() -> Argument {
    Argument::input(ArgType::Int).named("idx")
}

fn object_param() -> Argument {
    Argument::input(ArgType::Object).named("obj")
}

pub fn object_list_class() -> Result<ClassEntry, RegistrationError> {
    Ok(ClassBuilder::<ObjectList>::new(OBJECT_LIST)
        .description("Ordered list of object references")
        .method(
            "size",
            MethodDescriptor::new(vec![Argument::ret(ArgType::Int)])
                .with_doc("Number of elements."),
            size,
        )?
        .method(
            "push",
            MethodDescriptor::new(vec![object_param()]).with_doc("Append an object."),
            push,
        )?
        .method(
            "at",
            MethodDescriptor::new(vec![index_param(), Argument::ret(ArgType::Object)])
                .with_doc("Object at position idx."),
            at,
        )?
        .method(
            "set",
            MethodDescriptor::new(vec![index_param(), object_param()])
                .with_doc("Replace the object at position idx."),
            set,
        )?
        .method(
            "first",
            MethodDescriptor::new(vec![Argument::ret(ArgType::Object)])
                .with_doc("First object, null when the list is empty."),
            first,
        )?
        .method(
            "last",
            MethodDescriptor::new(vec![Argument::ret(ArgType::Object)])
                .with_doc("Last object, null when the list is empty."),
            last,
        )?
        .method(
            "erase",
            MethodDescriptor::new(vec![index_param()])
                .with_doc("Remove the object at position idx."),
            erase,
        )?
        .method(
            "pop",
            MethodDescriptor::default().with_doc("Remove the last object, if any."),
            pop,
        )?
        .method(
            "printInt",
            MethodDescriptor::new(vec![
                Argument::input(ArgType::Int).named("value"),
                Argument::input(ArgType::String)
                    .named("indent")
                    .with_default(""),
            ])
            .with_doc("Write indent followed by value to the output."),
            print_int,
        )?
        .build())
}

pub fn object_list2_class() -> Result<ClassEntry, RegistrationError> {
    Ok(ClassBuilder::<ObjectList>::new(OBJECT_LIST2)
        .description("Object list that can be cleared in one call")
        .derives(OBJECT_LIST)
        .method(
            "clear",
            MethodDescriptor::default().with_doc("Remove every object."),
            clear,
        )?
        .build())
}

pub fn module() -> Result<StaticModule, RegistrationError> {
    Ok(StaticModule::new(
        MODULE_NAME,
        vec![object_list_class()?, object_list2_class()?],
    ))
}
