//! Module-init contract.
//!
//! A module exports a fixed, index-addressable list of component classes.
//! Lookups past the last class yield `None`.

use crate::class::ClassEntry;

/// A collection of component classes registered together.
pub trait Module: Send {
    /// Module name, e.g. `pytest`.
    fn name(&self) -> &str;

    /// Number of exported classes.
    fn type_count(&self) -> usize;

    /// Type name of the class at `index`.
    fn type_name(&self, index: usize) -> Option<&str>;

    /// The class at `index`.
    fn type_class(&self, index: usize) -> Option<&ClassEntry>;
}

/// A module backed by a vector of classes.
///
/// Base classes must come before the classes that derive from them.
#[derive(Debug, Clone)]
pub struct StaticModule {
    name: String,
    classes: Vec<ClassEntry>,
}

impl StaticModule {
    pub fn new(name: impl Into<String>, classes: Vec<ClassEntry>) -> Self {
        Self {
            name: name.into(),
            classes,
        }
    }
}

impl Module for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_count(&self) -> usize {
        self.classes.len()
    }

    fn type_name(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(ClassEntry::name)
    }

    fn type_class(&self, index: usize) -> Option<&ClassEntry> {
        self.classes.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassBuilder;

    #[test]
    fn index_addressable_enumeration() {
        let module = StaticModule::new(
            "demo",
            vec![
                ClassBuilder::<()>::new("demo.A").build(),
                ClassBuilder::<()>::new("demo.B").derives("demo.A").build(),
            ],
        );
        assert_eq!(module.name(), "demo");
        assert_eq!(module.type_count(), 2);
        assert_eq!(module.type_name(1), Some("demo.B"));
        assert_eq!(module.type_class(0).map(ClassEntry::name), Some("demo.A"));
        assert_eq!(module.type_name(2), None);
        assert!(module.type_class(2).is_none());
    }
}
