//! Registry - component type discovery, instance lifecycle and dispatch.
//!
//! [`Registry`] owns every registered class together with its effective
//! (merged) method table, the heap of live instances and the side channel
//! diagnostic methods write to.
//!
//! # Storage Model
//!
//! - **Classes**: stored by type name; a reverse index maps the class
//!   [`TypeHash`] carried by every [`ObjectHandle`] back to the name.
//! - **Effective tables**: merged once when a class is registered and never
//!   rebuilt, so a class's operations are stable for its lifetime.
//! - **Instances**: generational slots in an [`ObjectHeap`]. Handles are
//!   non-owning; using one after `destroy` is an invalid-instance error.
//!
//! # Thread Safety
//!
//! `Registry` is not synchronized. Calls run to completion one at a time;
//! hosts that share a registry between threads wrap it in a lock.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use lwc_core::{
    CallContext, DispatchError, Dynamic, LoadError, ObjectHandle, ObjectHeap, RegistrationError,
    TypeHash,
};
use rustc_hash::FxHashMap;

use crate::binding::{CallResult, bind};
use crate::class::ClassEntry;
use crate::config::{RegistryConfig, RegistryProperty};
use crate::loader::Loader;
use crate::module::Module;
use crate::table::MethodTable;

struct RegisteredClass {
    entry: ClassEntry,
    /// Own methods merged over the base class's effective table
    effective: MethodTable,
}

/// The component registry.
pub struct Registry {
    config: RegistryConfig,

    // === Types ===
    classes: FxHashMap<String, RegisteredClass>,
    hash_to_name: FxHashMap<TypeHash, String>,
    /// Type names kept sorted for index-based discovery
    sorted_names: Vec<String>,
    modules: Vec<String>,

    // === Instances ===
    heap: ObjectHeap,

    // === Loading ===
    loaders: Vec<Box<dyn Loader>>,

    output: Box<dyn Write + Send>,
}

impl Registry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry.
    ///
    /// Module paths in the configuration are scanned by
    /// [`load_configured_paths`](Self::load_configured_paths) once loaders
    /// are installed.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            classes: FxHashMap::default(),
            hash_to_name: FxHashMap::default(),
            sorted_names: Vec::new(),
            modules: Vec::new(),
            heap: ObjectHeap::new(),
            loaders: Vec::new(),
            output: Box::new(io::stdout()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Redirect the side channel, returning the previous one.
    pub fn set_output(&mut self, output: Box<dyn Write + Send>) -> Box<dyn Write + Send> {
        std::mem::replace(&mut self.output, output)
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register every class a module exports.
    ///
    /// Classes are checked in module order, so a base class must precede the
    /// classes deriving from it (or already be registered). Nothing is
    /// registered unless every class passes. Returns the number of classes
    /// registered.
    pub fn register_module(&mut self, module: &dyn Module) -> Result<usize, RegistrationError> {
        let mut staged: Vec<RegisteredClass> = Vec::with_capacity(module.type_count());
        for index in 0..module.type_count() {
            let Some(class) = module.type_class(index) else {
                break;
            };
            let prepared = self.prepare_class(class.clone(), &staged)?;
            staged.push(prepared);
        }

        let registered = staged.len();
        for class in staged {
            self.commit_class(class);
        }
        self.modules.push(module.name().to_string());
        log::debug!(
            "registered module \"{}\" ({} types)",
            module.name(),
            registered
        );
        Ok(registered)
    }

    /// Register a single class.
    ///
    /// Fails when the name is taken, when the base class is unknown, or when
    /// a method declares more parameters than the configured maximum.
    pub fn register_class(&mut self, entry: ClassEntry) -> Result<(), RegistrationError> {
        let class = self.prepare_class(entry, &[])?;
        self.commit_class(class);
        Ok(())
    }

    /// Check a class against the registry and the classes staged before it,
    /// and build its effective method table.
    fn prepare_class(
        &self,
        entry: ClassEntry,
        staged: &[RegisteredClass],
    ) -> Result<RegisteredClass, RegistrationError> {
        let name = entry.name();
        let staged_class = |n: &str| staged.iter().find(|c| c.entry.name() == n);
        if self.classes.contains_key(name) || staged_class(name).is_some() {
            return Err(RegistrationError::DuplicateType(name.to_string()));
        }

        let max_arguments = self.config.property(RegistryProperty::MaxArguments);
        for (method, descriptor) in entry.methods().describe() {
            descriptor.validate(method, max_arguments)?;
        }

        let effective = match entry.base() {
            Some(base) => {
                let parent = self
                    .classes
                    .get(base)
                    .or_else(|| staged_class(base))
                    .ok_or_else(|| RegistrationError::TypeNotFound(base.to_string()))?;
                MethodTable::merge(&parent.effective, entry.methods())
            }
            None => entry.methods().clone(),
        };

        Ok(RegisteredClass { entry, effective })
    }

    fn commit_class(&mut self, class: RegisteredClass) {
        let name = class.entry.name().to_string();
        log::debug!(
            "registered type \"{}\" ({} methods{})",
            name,
            class.effective.len(),
            class
                .entry
                .base()
                .map(|b| format!(", derives {}", b))
                .unwrap_or_default()
        );

        if let Err(slot) = self.sorted_names.binary_search(&name) {
            self.sorted_names.insert(slot, name.clone());
        }
        self.hash_to_name.insert(class.entry.type_hash(), name.clone());
        self.classes.insert(name, class);
    }

    // ==========================================================================
    // Discovery
    // ==========================================================================

    pub fn num_types(&self) -> usize {
        self.sorted_names.len()
    }

    /// Type name at `index` in sorted order.
    pub fn type_name(&self, index: usize) -> Option<&str> {
        self.sorted_names.get(index).map(String::as_str)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sorted_names.iter().map(String::as_str)
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Names of the registered modules, in registration order.
    pub fn module_names(&self) -> &[String] {
        &self.modules
    }

    /// Effective method table of a type.
    pub fn methods(&self, name: &str) -> Option<&MethodTable> {
        self.classes.get(name).map(|c| &c.effective)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.classes.get(name).and_then(|c| c.entry.description())
    }

    /// Base class of a type.
    pub fn base_type(&self, name: &str) -> Option<&str> {
        self.classes.get(name).and_then(|c| c.entry.base())
    }

    /// Human-readable documentation of a type and all its operations.
    pub fn doc_string(&self, name: &str, indent: &str) -> Option<String> {
        let class = self.classes.get(name)?;
        let mut out = format!("{indent}{name}\n");
        if let Some(description) = class.entry.description() {
            out.push_str(&format!("{indent}    {description}\n"));
        }
        out.push_str(&class.effective.doc_string(&format!("{indent}    ")));
        Some(out)
    }

    // ==========================================================================
    // Lifecycle
    // ==========================================================================

    /// Create an instance of a registered type.
    pub fn create(&mut self, name: &str) -> Result<ObjectHandle, DispatchError> {
        let class = self
            .classes
            .get(name)
            .ok_or_else(|| DispatchError::UnknownType(name.to_string()))?;
        let handle = self
            .heap
            .allocate(class.entry.type_hash(), class.entry.construct());
        log::debug!(
            "created {} at {}:{}",
            name,
            handle.index,
            handle.generation
        );
        Ok(handle)
    }

    /// Destroy an instance.
    ///
    /// Objects referenced by the instance are not destroyed.
    pub fn destroy(&mut self, handle: ObjectHandle) -> Result<(), DispatchError> {
        if !self.heap.free(handle) {
            return Err(DispatchError::InvalidInstance {
                index: handle.index,
            });
        }
        log::debug!("destroyed {}:{}", handle.index, handle.generation);
        Ok(())
    }

    pub fn is_alive(&self, handle: ObjectHandle) -> bool {
        self.heap.contains(handle)
    }

    /// Type name of a live instance.
    pub fn type_name_of(&self, handle: ObjectHandle) -> Option<&str> {
        if !self.heap.contains(handle) {
            return None;
        }
        self.hash_to_name.get(&handle.class).map(String::as_str)
    }

    pub fn live_instances(&self) -> usize {
        self.heap.len()
    }

    // ==========================================================================
    // Dispatch
    // ==========================================================================

    /// Invoke an operation on an instance.
    ///
    /// The instance is checked first, then the operation name, then the
    /// arguments; the method body only runs once all three succeed. Errors
    /// raised by the body are returned unchanged inside
    /// [`DispatchError::Native`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn invoke(
        &mut self,
        handle: ObjectHandle,
        method: &str,
        positional: &[Dynamic],
        named: &[(&str, Dynamic)],
    ) -> Result<CallResult, DispatchError> {
        if !self.heap.contains(handle) {
            return Err(DispatchError::InvalidInstance {
                index: handle.index,
            });
        }

        let type_name = self
            .hash_to_name
            .get(&handle.class)
            .ok_or_else(|| DispatchError::UnknownType(handle.class.to_string()))?;
        let class = self
            .classes
            .get(type_name)
            .ok_or_else(|| DispatchError::UnknownType(type_name.clone()))?;
        let entry = class
            .effective
            .lookup(method)
            .ok_or_else(|| DispatchError::UnknownOperation {
                type_name: type_name.clone(),
                method: method.to_string(),
            })?;

        let bound = bind(
            method,
            &entry.descriptor,
            positional,
            named,
            self.config.flag(RegistryProperty::AllowImplicitConversions),
        )?;

        log::debug!("invoke {}.{} on {}:{}", type_name, method, handle.index, handle.generation);

        let mut slots = bound.slots;
        let mut ctx = CallContext::new(
            handle,
            &mut slots,
            bound.return_index,
            &mut self.heap,
            &mut *self.output,
        );
        entry
            .native
            .call(&mut ctx)
            .map_err(|source| DispatchError::Native {
                method: method.to_string(),
                source,
            })?;

        Ok(CallResult::collect(&entry.descriptor, slots))
    }

    /// Invoke an operation and collapse the result to a single value.
    pub fn call(
        &mut self,
        handle: ObjectHandle,
        method: &str,
        positional: &[Dynamic],
    ) -> Result<Dynamic, DispatchError> {
        self.invoke(handle, method, positional, &[])
            .map(CallResult::into_value)
    }

    // ==========================================================================
    // Module paths
    // ==========================================================================

    pub fn add_loader(&mut self, loader: Box<dyn Loader>) {
        log::debug!("added loader \"{}\"", loader.name());
        self.loaders.push(loader);
    }

    /// Scan a directory and register the modules found in it.
    ///
    /// Files are visited in name order and handed to the first loader that
    /// claims them. Unclaimed files are skipped; a file that fails to load or
    /// register is logged and skipped. Returns the number of types
    /// registered.
    pub fn add_module_path(&mut self, dir: impl AsRef<Path>) -> Result<usize, LoadError> {
        let dir = dir.as_ref();
        let io_error = |source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_error)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io_error)?;
        files.retain(|path| path.is_file());
        files.sort();

        let mut registered = 0;
        for path in files {
            let Some(loader) = self.loaders.iter().find(|l| l.can_load(&path)) else {
                log::debug!("no loader for {}", path.display());
                continue;
            };
            let loader_name = loader.name().to_string();
            let module = match loader.load(&path) {
                Ok(module) => module,
                Err(err) => {
                    log::warn!("{} failed to load {}: {}", loader_name, path.display(), err);
                    continue;
                }
            };
            match self.register_module(module.as_ref()) {
                Ok(count) => registered += count,
                Err(err) => log::warn!("cannot register {}: {}", path.display(), err),
            }
        }
        Ok(registered)
    }

    /// Scan every module path named in the configuration.
    pub fn load_configured_paths(&mut self) -> Result<usize, LoadError> {
        let paths = self.config.module_paths().to_vec();
        let mut registered = 0;
        for path in paths {
            registered += self.add_module_path(path)?;
        }
        Ok(registered)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.sorted_names)
            .field("modules", &self.modules)
            .field("heap", &self.heap)
            .field("loaders", &self.loaders.len())
            .finish_non_exhaustive()
    }
}

/// In-memory side channel whose contents can be read while installed.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        if let Ok(mut b) = self.buffer.lock() {
            b.clear();
        }
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut b = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("output buffer poisoned"))?;
        b.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
