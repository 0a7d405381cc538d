//! Scopes: name maps with a link to their enclosing scope.

use rustc_hash::FxHashMap;

use super::SymbolId;
use crate::template::TemplateParamList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        ScopeId(index as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Namespace,
    Class,
    Enum,
    /// Template parameters; owned by the template once its entity is declared.
    Template,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    kind: ScopeKind,
    owner: Option<SymbolId>,
    enclosing: Option<ScopeId>,
    names: FxHashMap<String, Vec<SymbolId>>,
    declared: Vec<SymbolId>,
    /// Parameters of a template scope that has no owner yet.
    pending_params: Option<TemplateParamList>,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, owner: Option<SymbolId>, enclosing: Option<ScopeId>) -> Self {
        Self {
            kind,
            owner,
            enclosing,
            names: FxHashMap::default(),
            declared: Vec::new(),
            pending_params: None,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The symbol this scope belongs to; `None` for the global scope and for
    /// a template parameter scope whose entity has not been declared yet.
    pub fn owner(&self) -> Option<SymbolId> {
        self.owner
    }

    pub fn enclosing(&self) -> Option<ScopeId> {
        self.enclosing
    }

    /// Symbols registered under `name` in this scope only.
    pub fn get(&self, name: &str) -> &[SymbolId] {
        self.names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Symbols declared in this scope, in declaration order.
    pub fn declared(&self) -> &[SymbolId] {
        &self.declared
    }

    pub fn pending_params(&self) -> Option<&TemplateParamList> {
        self.pending_params.as_ref()
    }

    /// A template parameter scope still waiting for its entity.
    pub fn is_unowned_template(&self) -> bool {
        self.kind == ScopeKind::Template && self.owner.is_none()
    }

    pub(crate) fn insert(&mut self, name: &str, symbol: SymbolId) {
        self.names.entry(name.to_string()).or_default().push(symbol);
        self.declared.push(symbol);
    }

    /// Register an extra name for a symbol without listing it as a declaration.
    pub(crate) fn alias(&mut self, name: &str, symbol: SymbolId) {
        let entry = self.names.entry(name.to_string()).or_default();
        if !entry.contains(&symbol) {
            entry.push(symbol);
        }
    }

    pub(crate) fn set_owner(&mut self, owner: SymbolId) {
        self.owner = Some(owner);
    }

    pub(crate) fn set_pending_params(&mut self, params: TemplateParamList) {
        self.pending_params = Some(params);
    }

    pub(crate) fn clear_pending_params(&mut self) {
        self.pending_params = None;
    }
}
