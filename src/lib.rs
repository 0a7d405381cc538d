//! cppmeta
//!
//! Dependent-name resolution and class template instantiation for a C++
//! subset. The engine lives in [`cppmeta_sema`]; the shared vocabulary
//! (spans, errors, flags, constants) in [`cppmeta_core`].
//!
//! ```
//! use cppmeta::prelude::*;
//! use cppmeta::ast::ClassKey;
//!
//! let mut ctx = SemaContext::new();
//! let params = TemplateParamList::new(vec![TemplateParam::type_param("T", Span::at(1, 10))]);
//! ctx.begin_template(params, Span::at(1, 1)).unwrap();
//! let holder = ctx.declare_class("Holder", ClassKey::Struct, Span::at(1, 23)).unwrap();
//! let holder = ctx.end_template(Span::at(1, 30)).unwrap();
//!
//! let int = Node::primitive_type(DeclFlags::INT, Span::at(2, 8));
//! let instance = ctx.instantiate(holder, &[int], Span::at(2, 1)).unwrap();
//! assert_eq!(ctx.symbol(instance).name(), "Holder<int>");
//! ```

pub use cppmeta_sema::*;

pub mod prelude {
    pub use cppmeta_core::{
        ConstValue, CppMetaError, CvQualifiers, DeclFlags, ErrorCategory, Primitive, SemaError,
        SemaResult, Span,
    };
    pub use cppmeta_sema::{
        EnumeratorDecl, LookupMask, Node, SemaConfig, SemaContext, Substitute, SymbolId,
        SymbolKind, TemplateArgument, TemplateArguments, TemplateParam, TemplateParamList,
        TypeIdGraph, TypeIdRef,
    };
}
