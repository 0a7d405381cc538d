//! Core vocabulary shared by the cppmeta crates.
//!
//! - [`Span`]: source locations
//! - [`SemaError`]: the engine's error taxonomy
//! - [`TypeHash`]: deterministic fingerprints of internal names
//! - [`DeclFlags`], [`CvQualifiers`], [`Primitive`]: decl-specifier vocabulary
//! - [`ConstValue`]: results of constant evaluation

mod error;
mod flags;
mod span;
mod type_hash;
mod value;

pub use error::{CppMetaError, ErrorCategory, SemaError, SemaResult};
pub use flags::{CvQualifiers, DeclFlags, Primitive};
pub use span::Span;
pub use type_hash::{TypeHash, hash_domains};
pub use value::ConstValue;
