//! SemaContext - the state of one analysis session.
//!
//! The context owns the symbol table, the type-id graph and the
//! configuration, and tracks the scope declarations currently go into. Every
//! operation of the engine takes it explicitly as `&mut SemaContext`.

use cppmeta_core::{SemaError, SemaResult, Span};

use crate::config::SemaConfig;
use crate::symbols::{LookupMask, ScopeId, Symbol, SymbolId, SymbolTable};
use crate::type_id::{TypeIdGraph, TypeIdRef};

/// Session state for declaring, resolving and instantiating entities.
#[derive(Debug, Clone)]
pub struct SemaContext {
    pub(crate) table: SymbolTable,
    pub(crate) types: TypeIdGraph,
    config: SemaConfig,
    pub(crate) current: ScopeId,
    /// Nesting of instantiations currently being populated.
    pub(crate) depth: usize,
}

impl SemaContext {
    pub fn new() -> Self {
        Self::with_config(SemaConfig::default())
    }

    pub fn with_config(config: SemaConfig) -> Self {
        let table = SymbolTable::new();
        let current = table.global_scope();
        Self {
            table,
            types: TypeIdGraph::new(),
            config,
            current,
            depth: 0,
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn types(&self) -> &TypeIdGraph {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeIdGraph {
        &mut self.types
    }

    pub fn config(&self) -> &SemaConfig {
        &self.config
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.table.symbol(id)
    }

    /// Hand the finished symbol graph to a downstream consumer.
    pub fn into_parts(self) -> (SymbolTable, TypeIdGraph) {
        (self.table, self.types)
    }

    // ========================================================================
    // Scope cursor
    // ========================================================================

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn global_scope(&self) -> ScopeId {
        self.table.global_scope()
    }

    /// Make `scope` the target of subsequent declarations.
    pub fn enter_scope(&mut self, scope: ScopeId) {
        self.current = scope;
    }

    /// Return to the enclosing scope, which becomes current.
    pub fn leave_scope(&mut self, span: Span) -> SemaResult<ScopeId> {
        let enclosing = self
            .table
            .scope(self.current)
            .enclosing()
            .ok_or_else(|| SemaError::internal("cannot leave the global scope", span))?;
        self.current = enclosing;
        Ok(enclosing)
    }

    // ========================================================================
    // Lookup from the current scope
    // ========================================================================

    pub fn lookup(&self, name: &str, mask: LookupMask) -> Option<SymbolId> {
        self.table.lookup(self.current, name, mask)
    }

    pub fn lookup_path(&self, path: &[&str], mask: LookupMask) -> Option<SymbolId> {
        self.table.lookup_path(self.current, path, mask)
    }

    /// Like [`lookup`](Self::lookup), failing with [`SemaError::UnknownName`].
    pub fn require(&self, name: &str, mask: LookupMask, span: Span) -> SemaResult<SymbolId> {
        self.lookup(name, mask).ok_or_else(|| SemaError::UnknownName {
            name: name.to_string(),
            span,
        })
    }

    // ========================================================================
    // Text forms
    // ========================================================================

    pub fn qualified_name(&self, id: SymbolId) -> String {
        self.table.qualified_name(id)
    }

    pub fn type_display(&self, id: TypeIdRef) -> String {
        self.types.display(id, &self.table)
    }

    pub fn type_mangle(&self, id: TypeIdRef) -> String {
        self.types.mangle(id, &self.table)
    }

    pub fn dump(&self) -> String {
        self.table.dump(&self.types)
    }
}

impl Default for SemaContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_global_scope() {
        let ctx = SemaContext::new();
        assert_eq!(ctx.current_scope(), ctx.global_scope());
        assert!(ctx.table().is_empty());
        assert!(ctx.types().is_empty());
        assert_eq!(ctx.config(), &SemaConfig::default());
    }

    #[test]
    fn cannot_leave_global_scope() {
        let mut ctx = SemaContext::new();
        let err = ctx.leave_scope(Span::at(9, 1)).unwrap_err();
        assert!(matches!(err, SemaError::Internal { .. }));
        assert_eq!(ctx.current_scope(), ctx.global_scope());
    }

    #[test]
    fn require_reports_unknown_names() {
        let ctx = SemaContext::new();
        let err = ctx.require("missing", LookupMask::ANY, Span::at(1, 4)).unwrap_err();
        assert_eq!(err.to_string(), "at 1:4: unknown name 'missing'");
    }
}
