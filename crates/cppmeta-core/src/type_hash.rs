//! Deterministic 64-bit fingerprints of internal names.
//!
//! Every symbol carries the [`TypeHash`] of its qualified internal name so
//! downstream consumers can key generated code by a stable integer. Hashes are
//! computed with XXHash64, mixed with a per-domain constant so that a
//! namespace and a class spelled the same way do not collide.

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain mixing constants.
pub mod hash_domains {
    /// Named entities (namespaces, classes, enums, typedefs, objects).
    pub const ENTITY: u64 = 0x2fac10b63a6cc57c;
    /// Function overloads; mixed with the signature's mangled form.
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;
    /// Template instances; mixed with the instance key.
    pub const INSTANCE: u64 = 0x7d3c8b4a92e15f6d;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Hash of a qualified entity name such as `ns::Widget`.
    #[inline]
    pub fn from_name(qualified: &str) -> Self {
        TypeHash(hash_domains::ENTITY ^ xxh64(qualified.as_bytes(), 0))
    }

    /// Hash of one function overload: its qualified name plus mangled signature.
    pub fn from_function(qualified: &str, signature: &str) -> Self {
        let name = xxh64(qualified.as_bytes(), 0);
        let sig = xxh64(signature.as_bytes(), name);
        TypeHash(hash_domains::FUNCTION ^ sig)
    }

    /// Hash of a template instance from its enclosing scope path and instance key.
    pub fn from_instance(scope_path: &str, key: &str) -> Self {
        let scope = xxh64(scope_path.as_bytes(), 0);
        TypeHash(hash_domains::INSTANCE ^ xxh64(key.as_bytes(), scope))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
