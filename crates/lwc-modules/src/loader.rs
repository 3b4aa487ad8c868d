//! Loader serving the built-in modules from module paths.
//!
//! A module path entry `pytest.lwcm` makes the `pytest` module available;
//! the file content is ignored.

use std::path::Path;

use lwc_core::LoadError;
use lwc_registry::{Loader, Module};

use crate::{boxes, objlist, point};

/// File extension claimed by [`BuiltinLoader`].
pub const MODULE_EXTENSION: &str = "lwcm";

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLoader;

impl BuiltinLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for BuiltinLoader {
    fn name(&self) -> &str {
        "builtin"
    }

    fn can_load(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == MODULE_EXTENSION)
    }

    fn load(&self, path: &Path) -> Result<Box<dyn Module>, LoadError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let module = match stem {
            objlist::MODULE_NAME => objlist::module()?,
            boxes::MODULE_NAME => boxes::module()?,
            point::MODULE_NAME => point::module()?,
            _ => {
                return Err(LoadError::UnknownModule {
                    name: stem.to_string(),
                    path: path.to_path_buf(),
                });
            }
        };
        log::debug!("loaded module \"{}\" from {}", stem, path.display());
        Ok(Box::new(module))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_by_extension() {
        let loader = BuiltinLoader::new();
        assert!(loader.can_load(Path::new("/mods/pytest.lwcm")));
        assert!(loader.can_load(Path::new("other.lwcm")));
        assert!(!loader.can_load(Path::new("pytest.py")));
        assert!(!loader.can_load(Path::new("lwcm")));
    }

    #[test]
    fn loads_known_modules() {
        let loader = BuiltinLoader::new();
        let module = loader.load(Path::new("rbtest.lwcm")).unwrap();
        assert_eq!(module.name(), "rbtest");
        assert_eq!(module.type_count(), 2);
        assert_eq!(loader.load(Path::new("test.lwcm")).unwrap().type_name(0), Some("test.Box"));
    }

    #[test]
    fn rejects_unknown_modules() {
        let loader = BuiltinLoader::new();
        assert!(matches!(
            loader.load(Path::new("luatest.lwcm")),
            Err(LoadError::UnknownModule { name, .. }) if name == "luatest"
        ));
    }
}
