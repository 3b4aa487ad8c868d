//! Component class entries and the fluent builder that produces them.
//!
//! # Example
//!
//! ```ignore
//! let class = ClassBuilder::<Counter>::new("demo.Counter")
//!     .description("A counter")
//!     .method(
//!         "add",
//!         MethodDescriptor::new(vec![Argument::input(ArgType::Int)]),
//!         |ctx: &mut CallContext| {
//!             let step: i64 = ctx.arg(0)?;
//!             ctx.this_mut::<Counter>()?.value += step;
//!             Ok(())
//!         },
//!     )?
//!     .build();
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use lwc_core::{NativeCallable, NativeFn, RegistrationError, TypeHash};

use crate::method::{Method, MethodDescriptor};
use crate::table::MethodTable;

/// Produces the initial state of a new instance.
pub type Constructor = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// A registered (or registrable) component class.
///
/// The method table stored here holds only the class's own methods; the
/// registry merges it with the base class's effective table at registration.
#[derive(Clone)]
pub struct ClassEntry {
    name: String,
    hash: TypeHash,
    description: Option<String>,
    base: Option<String>,
    methods: MethodTable,
    constructor: Constructor,
}

impl ClassEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_hash(&self) -> TypeHash {
        self.hash
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Name of the base class, if this class derives from one.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// The class's own methods.
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Create fresh instance state.
    pub fn construct(&self) -> Box<dyn Any + Send + Sync> {
        (self.constructor)()
    }
}

impl fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassEntry")
            .field("name", &self.name)
            .field("hash", &self.hash)
            .field("base", &self.base)
            .field("methods", &self.methods.names())
            .finish_non_exhaustive()
    }
}

/// Builder for a component class whose instances hold a `T`.
///
/// A derived class passes its base name to [`derives`](Self::derives) and
/// keeps the base's state type, so inherited bodies see the state they
/// expect.
pub struct ClassBuilder<T> {
    name: String,
    hash: TypeHash,
    description: Option<String>,
    base: Option<String>,
    methods: MethodTable,
    constructor: Constructor,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ClassBuilder<T>
where
    T: Default + Any + Send + Sync,
{
    /// Start a class whose instances start as `T::default()`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            hash: TypeHash::from_name(&name),
            name,
            description: None,
            base: None,
            methods: MethodTable::new(),
            constructor: Arc::new(|| Box::new(T::default()) as Box<dyn Any + Send + Sync>),
            _marker: PhantomData,
        }
    }
}

impl<T> ClassBuilder<T>
where
    T: Any + Send + Sync,
{
    /// Replace the default constructor.
    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor = Arc::new(move || Box::new(f()) as Box<dyn Any + Send + Sync>);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Declare the base class.
    pub fn derives(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add a method; defining the same name twice is an error.
    pub fn method<F>(
        self,
        name: &str,
        descriptor: MethodDescriptor,
        f: F,
    ) -> Result<Self, RegistrationError>
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        self.add_method(name, descriptor, f, false)
    }

    /// Add a method, replacing an earlier definition of the same name.
    pub fn replace_method<F>(
        self,
        name: &str,
        descriptor: MethodDescriptor,
        f: F,
    ) -> Result<Self, RegistrationError>
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        self.add_method(name, descriptor, f, true)
    }

    fn add_method<F>(
        mut self,
        name: &str,
        descriptor: MethodDescriptor,
        f: F,
        allow_override: bool,
    ) -> Result<Self, RegistrationError>
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        let native = NativeFn::new(TypeHash::from_method(self.hash, name), f);
        self.methods
            .add(name, Method::new(descriptor, native), allow_override)?;
        Ok(self)
    }

    pub fn build(self) -> ClassEntry {
        ClassEntry {
            name: self.name,
            hash: self.hash,
            description: self.description,
            base: self.base,
            methods: self.methods,
            constructor: self.constructor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{ArgType, Argument};
    use lwc_core::CallContext;

    #[derive(Default)]
    struct Counter {
        value: i64,
    }

    fn add_descriptor() -> MethodDescriptor {
        MethodDescriptor::new(vec![Argument::input(ArgType::Int)])
    }

    fn add(ctx: &mut CallContext) -> Result<(), lwc_core::NativeError> {
        let step: i64 = ctx.arg(0)?;
        ctx.this_mut::<Counter>()?.value += step;
        Ok(())
    }

    #[test]
    fn builds_entry() {
        let class = ClassBuilder::<Counter>::new("demo.Counter")
            .description("A counter")
            .method("add", add_descriptor(), add)
            .unwrap()
            .build();

        assert_eq!(class.name(), "demo.Counter");
        assert_eq!(class.type_hash(), TypeHash::from_name("demo.Counter"));
        assert_eq!(class.description(), Some("A counter"));
        assert_eq!(class.base(), None);
        assert_eq!(class.methods().names(), vec!["add"]);
        assert_eq!(
            class.methods().lookup("add").unwrap().native.id,
            TypeHash::from_method(class.type_hash(), "add")
        );
    }

    #[test]
    fn duplicate_method_is_rejected() {
        let result = ClassBuilder::<Counter>::new("demo.Counter")
            .method("add", add_descriptor(), add)
            .and_then(|b| b.method("add", add_descriptor(), add));
        assert!(matches!(result, Err(RegistrationError::DuplicateMethod(name)) if name == "add"));
    }

    #[test]
    fn replace_method_overrides() {
        let class = ClassBuilder::<Counter>::new("demo.Counter")
            .method("add", add_descriptor(), add)
            .and_then(|b| b.replace_method("add", MethodDescriptor::default(), add))
            .unwrap()
            .build();
        assert!(class.methods().lookup("add").unwrap().descriptor.params().is_empty());
    }

    #[test]
    fn constructors() {
        let default = ClassBuilder::<Counter>::new("demo.Counter").build();
        let state = default.construct();
        assert_eq!(state.downcast_ref::<Counter>().map(|c| c.value), Some(0));

        let custom = ClassBuilder::<Counter>::new("demo.Counter")
            .constructor(|| Counter { value: 7 })
            .derives("demo.Base")
            .build();
        let state = custom.construct();
        assert_eq!(state.downcast_ref::<Counter>().map(|c| c.value), Some(7));
        assert_eq!(custom.base(), Some("demo.Base"));
        assert!(format!("{:?}", custom).contains("demo.Base"));
    }
}
