//! Deterministic hash-based identity for component types and their methods.
//!
//! [`TypeHash`] is a 64-bit hash computed from a registered type name (for
//! classes) or from the owning class plus method name (for methods). The same
//! name always yields the same hash, so handles can carry their class identity
//! without holding a reference into the registry.
//!
//! # Examples
//!
//! ```
//! use lwc_core::TypeHash;
//!
//! let list = TypeHash::from_name("pytest.ObjectList");
//! assert_eq!(list, TypeHash::from_name("pytest.ObjectList"));
//!
//! let push = TypeHash::from_method(list, "push");
//! assert_ne!(push, TypeHash::from_method(list, "pop"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
///
/// Types and methods sharing a name still produce distinct hashes.
pub mod hash_constants {
    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method hashes
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;
}

/// A deterministic 64-bit hash identifying a component type or method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a registered type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a method hash from the owning type and the method name.
    ///
    /// The owner takes part in the hash, so an override in a derived class
    /// and the inherited method it replaces hash differently.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str) -> Self {
        let name_hash = xxh64(name.as_bytes(), 0);
        TypeHash(hash_constants::METHOD ^ owner.0.rotate_left(17) ^ name_hash)
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
