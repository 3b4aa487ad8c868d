//! Method descriptors, method tables and the component registry.
//!
//! Component classes describe each operation with a [`MethodDescriptor`]
//! and register through a [`Module`]. The [`Registry`] merges every class's
//! table with its base class's once, creates instances, and routes
//! [`Registry::invoke`] calls: operation lookup, argument [`bind`]ing, then
//! the method body.

pub mod argument;
pub mod binding;
pub mod class;
pub mod config;
pub mod loader;
pub mod method;
pub mod module;
pub mod registry;
pub mod table;

pub use argument::{ArgType, Argument, Direction};
pub use binding::{BoundCall, CallResult, bind};
pub use class::{ClassBuilder, ClassEntry, Constructor};
pub use config::{MODULE_PATH_ENV, RegistryConfig, RegistryProperty};
pub use loader::Loader;
pub use method::{Method, MethodDescriptor};
pub use module::{Module, StaticModule};
pub use registry::{CapturedOutput, Registry};
pub use table::MethodTable;
