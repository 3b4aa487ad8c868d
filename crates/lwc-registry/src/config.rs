//! Registry configuration.

use std::env;
use std::path::PathBuf;

use rustc_hash::FxHashMap;

/// Environment variable holding a path list of module directories.
pub const MODULE_PATH_ENV: &str = "LWC_MODULE_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryProperty {
    /// Upper bound on declared parameters per method.
    MaxArguments,
    /// Integers and reals convert into each other during binding.
    AllowImplicitConversions,
}

impl RegistryProperty {
    pub fn default_value(&self) -> usize {
        match self {
            RegistryProperty::MaxArguments => 16,
            RegistryProperty::AllowImplicitConversions => 1,
        }
    }
}

/// Settings consumed when a registry is created.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    properties: FxHashMap<RegistryProperty, usize>,
    language: String,
    module_paths: Vec<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            properties: FxHashMap::default(),
            language: "rust".to_string(),
            module_paths: Vec::new(),
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration plus module paths from `LWC_MODULE_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(paths) = env::var_os(MODULE_PATH_ENV) {
            config
                .module_paths
                .extend(env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
        }
        config
    }

    pub fn with_property(mut self, property: RegistryProperty, value: usize) -> Self {
        self.properties.insert(property, value);
        self
    }

    /// Label of the host language that owns the registry.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_paths.push(path.into());
        self
    }

    pub fn property(&self, property: RegistryProperty) -> usize {
        self.properties
            .get(&property)
            .copied()
            .unwrap_or_else(|| property.default_value())
    }

    pub fn flag(&self, property: RegistryProperty) -> bool {
        self.property(property) != 0
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn module_paths(&self) -> &[PathBuf] {
        &self.module_paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RegistryConfig::new();
        assert_eq!(config.property(RegistryProperty::MaxArguments), 16);
        assert!(config.flag(RegistryProperty::AllowImplicitConversions));
        assert_eq!(config.language(), "rust");
        assert!(config.module_paths().is_empty());
    }

    #[test]
    fn overrides() {
        let config = RegistryConfig::new()
            .with_property(RegistryProperty::AllowImplicitConversions, 0)
            .with_property(RegistryProperty::MaxArguments, 4)
            .with_language("python")
            .with_module_path("/opt/lwc/modules");
        assert!(!config.flag(RegistryProperty::AllowImplicitConversions));
        assert_eq!(config.property(RegistryProperty::MaxArguments), 4);
        assert_eq!(config.language(), "python");
        assert_eq!(config.module_paths(), &[PathBuf::from("/opt/lwc/modules")]);
    }
}
