//! cppmeta semantic engine
//!
//! Dependent-name resolution and class template instantiation for a C++
//! subset: classes, enums, functions, objects, namespaces and class
//! templates.
//!
//! ## Architecture
//!
//! - The grammar builds [`ast::Node`] trees with names already bound to
//!   symbols and drives a [`SemaContext`] through its declaration methods
//! - Types are canonicalized in a [`TypeIdGraph`]: equal types are one node
//! - Template bodies are stored as dependent patterns and substituted on
//!   [`SemaContext::instantiate`]; instances are memoized by their bound
//!   arguments
//!
//! ## Modules
//!
//! - [`ast`]: syntax nodes, substitution and constant evaluation
//! - [`config`]: session limits and policies
//! - [`context`]: the session state
//! - [`symbols`]: symbols, scopes and the symbol table
//! - [`template`]: template parameters, arguments, binding and instantiation
//! - [`type_id`]: the canonicalizing type-id graph and type mangling

pub mod ast;
pub mod config;
pub mod context;
mod declare;
mod resolve;
pub mod symbols;
pub mod template;
pub mod type_id;

pub use ast::{EvalResult, Node, Substitute};
pub use config::SemaConfig;
pub use context::SemaContext;
pub use declare::EnumeratorDecl;
pub use symbols::{LookupMask, Symbol, SymbolData, SymbolId, SymbolKind, SymbolTable};
pub use template::{
    ParamKind, TemplateArgument, TemplateArguments, TemplateParam, TemplateParamList,
    display_name, instance_key,
};
pub use type_id::{TypeIdGraph, TypeIdRef};

// Re-export the shared vocabulary for convenience
pub use cppmeta_core::{
    ConstValue, CvQualifiers, DeclFlags, ErrorCategory, Primitive, SemaError, SemaResult, Span,
};
