//! Lightweight component registry with descriptor-driven method dispatch.
//!
//! Component classes publish a table of method descriptors; the
//! [`Registry`] discovers classes by name, creates and destroys instances,
//! and routes every call through the effective (inheritance-merged) table:
//!
//! ```
//! use lwc::prelude::*;
//!
//! let mut registry = lwc::initialize(RegistryConfig::new()).unwrap();
//! let list = registry.create("pytest.ObjectList2").unwrap();
//! let item = registry.create("test.Box").unwrap();
//!
//! registry.call(list, "push", &[Dynamic::Object(item)]).unwrap();
//! assert_eq!(registry.call(list, "size", &[]).unwrap(), Dynamic::Int(1));
//!
//! registry.destroy(list).unwrap();
//! registry.destroy(item).unwrap();
//! ```

pub use lwc_core as core;
pub use lwc_modules as modules;
pub use lwc_registry as registry;

pub use lwc_core::{
    BindError, CallContext, ConversionError, DispatchError, Dynamic, LoadError, LwcError,
    NativeError, ObjectHandle, RegistrationError, TypeHash,
};
pub use lwc_registry::{
    ArgType, Argument, CallResult, ClassBuilder, ClassEntry, Direction, Loader, MethodDescriptor,
    MethodTable, Module, Registry, RegistryConfig, RegistryProperty, StaticModule,
};

/// Create a registry with the built-in modules available.
///
/// The [`BuiltinLoader`] is always installed. When `config` names module
/// paths only the modules found there are registered; otherwise every
/// built-in module is.
///
/// [`BuiltinLoader`]: lwc_modules::BuiltinLoader
pub fn initialize(config: RegistryConfig) -> Result<Registry, LwcError> {
    let mut registry = Registry::with_config(config);
    registry.add_loader(Box::new(lwc_modules::BuiltinLoader::new()));
    if registry.config().module_paths().is_empty() {
        lwc_modules::register_builtins(&mut registry)?;
    } else {
        registry.load_configured_paths()?;
    }
    log::debug!(
        "initialized {} registry with {} types",
        registry.config().language(),
        registry.num_types()
    );
    Ok(registry)
}

pub mod prelude {
    pub use lwc_core::{
        CallContext, DispatchError, Dynamic, FromDynamic, IntoDynamic, LwcError, NativeError,
        ObjectHandle,
    };
    pub use lwc_registry::{
        ArgType, Argument, CallResult, ClassBuilder, Direction, MethodDescriptor, Registry,
        RegistryConfig,
    };
}
