//! Symbols, scopes and the symbol table.
//!
//! - [`SymbolKind`] / [`LookupMask`]: what a symbol denotes, and which kinds a lookup accepts
//! - [`Symbol`] / [`SymbolData`]: a named entity with its kind-specific payload
//! - [`Scope`]: a name map linked to its enclosing scope
//! - [`SymbolTable`]: the arena that owns both, with redeclaration and lookup

mod dump;
mod kind;
mod scope;
mod symbol;
mod table;

pub use kind::{LookupMask, SymbolKind};
pub use scope::{Scope, ScopeId, ScopeKind};
pub use symbol::{
    BaseClass, ClassData, EnumData, FunctionData, InstanceOrigin, ObjectData, Symbol, SymbolData,
    SymbolId, TemplateData, TemplateParamData, TemplatedEntity,
};
pub use table::{Declared, SymbolTable, source_name};
