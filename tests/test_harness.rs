//! Test harness shared by the integration tests.
//!
//! Builds declarations the way a grammar would drive the engine, with one
//! source line per declaration so error spans are easy to check.

#![allow(dead_code)]

use cppmeta::ast::{
    Access, BaseSpecifier, ClassKey, ClassSpecifier, DeclSpecifiers, DeclaratorNode, DeclaratorOp,
};
use cppmeta::prelude::*;

/// A session plus a line counter for spans.
pub struct Session {
    pub ctx: SemaContext,
    line: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(SemaConfig::default())
    }

    pub fn with_config(config: SemaConfig) -> Self {
        Self {
            ctx: SemaContext::with_config(config),
            line: 0,
        }
    }

    /// Span of the next source line.
    pub fn next_span(&mut self) -> Span {
        self.line += 1;
        Span::at(self.line, 1)
    }

    /// `struct name {};`
    pub fn class(&mut self, name: &str) -> SymbolId {
        let span = self.next_span();
        let symbol = self
            .ctx
            .declare_class(name, ClassKey::Struct, span)
            .unwrap_or_else(|e| panic!("declaring {name}: {e}"));
        self.ctx
            .define_class(symbol, ClassSpecifier::new(ClassKey::Struct, name, span))
            .unwrap_or_else(|e| panic!("defining {name}: {e}"));
        symbol
    }

    /// `struct name;`
    pub fn forward_class(&mut self, name: &str) -> SymbolId {
        let span = self.next_span();
        self.ctx
            .declare_class(name, ClassKey::Struct, span)
            .unwrap_or_else(|e| panic!("declaring {name}: {e}"))
    }

    /// `template<params> struct name;`
    pub fn declare_class_template(
        &mut self,
        name: &str,
        params: Vec<TemplateParam>,
    ) -> SemaResult<SymbolId> {
        let span = self.next_span();
        self.ctx.begin_template(TemplateParamList::new(params), span)?;
        self.ctx.declare_class(name, ClassKey::Struct, span)?;
        self.ctx.end_template(span)
    }

    /// `template<params> struct name { body };`
    ///
    /// `body` receives the template symbol so the pattern can name its own
    /// template.
    pub fn define_class_template(
        &mut self,
        name: &str,
        params: Vec<TemplateParam>,
        body: impl FnOnce(SymbolId, ClassSpecifier) -> ClassSpecifier,
    ) -> SemaResult<SymbolId> {
        let span = self.next_span();
        self.ctx.begin_template(TemplateParamList::new(params), span)?;
        let template = self.ctx.declare_class(name, ClassKey::Struct, span)?;
        let spec = body(template, ClassSpecifier::new(ClassKey::Struct, name, span));
        self.ctx.define_class(template, spec)?;
        self.ctx.end_template(span)
    }

    pub fn instantiate(&mut self, template: SymbolId, args: Vec<Node>) -> SemaResult<SymbolId> {
        let span = self.next_span();
        self.ctx.instantiate(template, &args, span)
    }

    pub fn typedef(&mut self, name: &str, specifiers: DeclSpecifiers, ops: Vec<DeclaratorOp>) -> SymbolId {
        let span = self.next_span();
        let declarator = declarator(name, ops, span);
        self.ctx
            .declare_typedef(name, &specifiers, Some(&declarator), span)
            .unwrap_or_else(|e| panic!("declaring typedef {name}: {e}"))
    }

    pub fn dump(&self) -> String {
        self.ctx.dump()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Node builders
// ============================================================================

pub fn span() -> Span {
    Span::at(100, 1)
}

pub fn int() -> Node {
    Node::primitive_type(DeclFlags::INT, span())
}

pub fn prim(flags: DeclFlags) -> Node {
    Node::primitive_type(flags, span())
}

pub fn value(v: i64) -> Node {
    Node::int(v, span())
}

/// A name already bound to `symbol`.
pub fn named(ctx: &SemaContext, symbol: SymbolId) -> Node {
    Node::name(ctx.symbol(symbol).name(), symbol, span())
}

pub fn type_param(name: &str) -> TemplateParam {
    TemplateParam::type_param(name, span())
}

pub fn value_param(name: &str, ty: Primitive) -> TemplateParam {
    TemplateParam::non_type(name, ty, span())
}

pub fn dependent(name: &str, index: usize) -> Node {
    Node::dependent_type(name, index, span())
}

/// `inner*`
pub fn pointer_to(inner: Node) -> Node {
    Node::type_id(
        DeclSpecifiers::named(inner),
        DeclaratorNode::chain(vec![DeclaratorOp::Pointer(CvQualifiers::empty())], span()),
        span(),
    )
}

/// `const inner`
pub fn const_of(inner: Node) -> Node {
    Node::type_id(
        DeclSpecifiers::named(inner).with_flags(DeclFlags::CONST),
        None,
        span(),
    )
}

/// A declarator naming `name` after applying `ops` in order.
pub fn declarator(name: &str, ops: Vec<DeclaratorOp>, span: Span) -> DeclaratorNode {
    let mut parts = ops;
    parts.push(DeclaratorOp::Id(name.to_string()));
    DeclaratorNode::chain(parts, span).unwrap_or_else(|| DeclaratorNode::id(name, span))
}

pub fn public_base(name: Node) -> BaseSpecifier {
    BaseSpecifier::new(Access::Public, name, span())
}

pub fn public_pack_base(pattern: Node) -> BaseSpecifier {
    BaseSpecifier::pack_expansion(Access::Public, pattern, span())
}

/// The bases of a class, as symbols in declaration order.
pub fn bases_of(ctx: &SemaContext, class: SymbolId) -> Vec<SymbolId> {
    ctx.symbol(class)
        .as_class()
        .map(|data| data.bases.iter().map(|b| b.symbol).collect())
        .unwrap_or_default()
}

/// The bound arguments of an instance.
pub fn arguments_of(ctx: &SemaContext, instance: SymbolId) -> TemplateArguments {
    ctx.symbol(instance)
        .as_class()
        .and_then(|data| data.instance_of.as_ref())
        .map(|origin| origin.arguments.clone())
        .unwrap_or_else(|| panic!("{} is not an instance", ctx.symbol(instance).name()))
}
