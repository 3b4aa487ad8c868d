//! Per-class method tables and inheritance merging.
//!
//! A [`MethodTable`] maps operation names to [`Method`]s. Entries keep their
//! insertion order so introspection output is stable. A derived class's
//! effective table is built once with [`MethodTable::merge`]: inherited
//! entries first, in the parent's order, own entries replacing same-named
//! inherited ones in place, new own entries appended.

use std::fmt;

use lwc_core::RegistrationError;
use rustc_hash::FxHashMap;

use crate::method::{Method, MethodDescriptor};

/// Name-indexed, insertion-ordered method storage.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    entries: Vec<(String, Method)>,
    index: FxHashMap<String, usize>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method.
    ///
    /// The descriptor is validated first. An existing name is replaced in
    /// place when `allow_override` is set and rejected otherwise.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        method: Method,
        allow_override: bool,
    ) -> Result<(), RegistrationError> {
        let name = name.into();
        method
            .descriptor
            .validate(&name, MethodDescriptor::MAX_ARGUMENTS)?;

        match self.index.get(&name) {
            Some(&slot) if allow_override => {
                self.entries[slot].1 = method;
                Ok(())
            }
            Some(_) => Err(RegistrationError::DuplicateMethod(name)),
            None => {
                self.insert_new(name, method);
                Ok(())
            }
        }
    }

    fn insert_new(&mut self, name: String, method: Method) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, method));
    }

    /// Build the effective table of a derived class.
    pub fn merge(parent: &MethodTable, own: &MethodTable) -> MethodTable {
        let mut merged = parent.clone();
        for (name, method) in &own.entries {
            match merged.index.get(name) {
                Some(&slot) => merged.entries[slot].1 = method.clone(),
                None => merged.insert_new(name.clone(), method.clone()),
            }
        }
        merged
    }

    pub fn lookup(&self, name: &str) -> Option<&Method> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Enumerate `(name, descriptor)` pairs in table order.
    pub fn describe(&self) -> impl Iterator<Item = (&str, &MethodDescriptor)> + '_ {
        self.entries
            .iter()
            .map(|(name, method)| (name.as_str(), &method.descriptor))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full documentation: each signature followed by its parameter lines.
    pub fn doc_string(&self, indent: &str) -> String {
        let nested = format!("{indent}    ");
        let mut out = String::new();
        for (name, descriptor) in self.describe() {
            out.push_str(indent);
            out.push_str(name);
            out.push('\n');
            out.push_str(&descriptor.doc_string(&nested));
        }
        out
    }
}

impl fmt::Display for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, descriptor) in self.describe() {
            writeln!(f, "{}{}", name, descriptor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{ArgType, Argument};
    use lwc_core::{CallContext, NativeFn, TypeHash};

    fn method(params: Vec<Argument>, tag: &str) -> Method {
        Method::new(
            MethodDescriptor::new(params),
            NativeFn::new(TypeHash::from_name(tag), |_: &mut CallContext| Ok(())),
        )
    }

    fn table(entries: &[(&str, &str)]) -> MethodTable {
        let mut table = MethodTable::new();
        for (name, tag) in entries {
            table.add(*name, method(vec![], tag), false).unwrap();
        }
        table
    }

    #[test]
    fn add_and_lookup() {
        let mut t = MethodTable::new();
        t.add("size", method(vec![Argument::ret(ArgType::Int)], "size"), false)
            .unwrap();
        assert!(t.contains("size"));
        assert_eq!(t.len(), 1);
        assert!(t.lookup("size").is_some());
        assert!(t.lookup("clear").is_none());
    }

    #[test]
    fn duplicate_without_override_fails() {
        let mut t = table(&[("push", "a")]);
        let err = t.add("push", method(vec![], "b"), false).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateMethod("push".into()));
        assert_eq!(t.lookup("push").unwrap().native.id, TypeHash::from_name("a"));
    }

    #[test]
    fn duplicate_with_override_replaces_in_place() {
        let mut t = table(&[("push", "a"), ("pop", "a")]);
        t.add("push", method(vec![], "b"), true).unwrap();
        assert_eq!(t.names(), vec!["push", "pop"]);
        assert_eq!(t.lookup("push").unwrap().native.id, TypeHash::from_name("b"));
    }

    #[test]
    fn invalid_descriptor_is_rejected() {
        let mut t = MethodTable::new();
        let bad = method(vec![Argument::input(ArgType::Int).array_sized_by(3)], "x");
        assert!(matches!(
            t.add("bad", bad, false),
            Err(RegistrationError::InvalidMethod { .. })
        ));
        assert!(t.is_empty());
    }

    #[test]
    fn merge_appends_and_overrides() {
        let parent = table(&[("size", "p"), ("push", "p"), ("pop", "p")]);
        let own = table(&[("clear", "c"), ("push", "c")]);

        let merged = MethodTable::merge(&parent, &own);

        assert_eq!(merged.names(), vec!["size", "push", "pop", "clear"]);
        assert_eq!(
            merged.lookup("push").unwrap().native.id,
            TypeHash::from_name("c")
        );
        assert_eq!(
            merged.lookup("size").unwrap().native.id,
            TypeHash::from_name("p")
        );
        // Inputs are untouched
        assert_eq!(parent.len(), 3);
        assert_eq!(own.len(), 2);
    }

    #[test]
    fn merge_with_empty_tables() {
        let parent = table(&[("size", "p")]);
        let empty = MethodTable::new();
        assert_eq!(MethodTable::merge(&parent, &empty).names(), vec!["size"]);
        assert_eq!(MethodTable::merge(&empty, &parent).names(), vec!["size"]);
    }

    #[test]
    fn display_lists_signatures() {
        let mut t = MethodTable::new();
        t.add("at", method(vec![Argument::input(ArgType::Int), Argument::ret(ArgType::Object)], "at"), false)
            .unwrap();
        t.add("pop", method(vec![], "pop"), false).unwrap();
        assert_eq!(t.to_string(), "at([in] int, [return] object)\npop()\n");
        assert_eq!(
            t.doc_string(""),
            "at\n    @0 [in] int\n    @1 [return] object\npop\n"
        );
    }
}
