//! The symbol table: an arena of symbols and scopes.
//!
//! Symbols and scopes refer to each other by index ([`SymbolId`],
//! [`ScopeId`]); a scope's link to its enclosing scope is just another index,
//! so the hierarchy has no ownership cycles.
//!
//! # Redeclaration
//!
//! [`SymbolTable::declare_or_redeclare`] either returns the existing symbol
//! of a compatible kind or creates a new one. While the target scope is a
//! template parameter scope that has no owner yet, the declaration is
//! redirected to the enclosing scope and produces (or merges into) a
//! template symbol instead.

use cppmeta_core::{DeclFlags, SemaError, SemaResult, Span, TypeHash};
use tracing::{debug, trace};

use super::{
    ClassData, FunctionData, InstanceOrigin, LookupMask, Scope, ScopeId, ScopeKind, Symbol,
    SymbolData, SymbolId, SymbolKind, TemplateData, TemplatedEntity,
};
use crate::ast::ClassKey;
use crate::type_id::TypeIdRef;

/// Outcome of a declaration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declared {
    pub symbol: SymbolId,
    /// `false` when an existing declaration was returned.
    pub is_new: bool,
}

/// `<length><name>`, the internal form of an identifier.
pub fn source_name(name: &str) -> String {
    format!("{}{}", name.len(), name)
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    global: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope::new(ScopeKind::Namespace, None, None)],
            global: ScopeId::from_index(0),
        }
    }

    pub fn global_scope(&self) -> ScopeId {
        self.global
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::from_index(i), s))
    }

    /// Symbols declared in `scope`, in declaration order.
    pub fn members_of(&self, scope: ScopeId) -> &[SymbolId] {
        self.scope(scope).declared()
    }

    // ========================================================================
    // Scope and symbol creation
    // ========================================================================

    pub(crate) fn new_scope(
        &mut self,
        kind: ScopeKind,
        owner: Option<SymbolId>,
        enclosing: ScopeId,
    ) -> ScopeId {
        let id = ScopeId::from_index(self.scopes.len());
        self.scopes.push(Scope::new(kind, owner, Some(enclosing)));
        id
    }

    fn push_symbol(&mut self, scope: ScopeId, key: &str, symbol: Symbol) -> SymbolId {
        let id = SymbolId::from_index(self.symbols.len());
        trace!(
            name = symbol.name(),
            kind = %symbol.kind(),
            mangled = symbol.mangled_name(),
            "new symbol"
        );
        self.symbols.push(symbol);
        self.scope_mut(scope).insert(key, id);
        id
    }

    /// Build an ordinary named symbol declared in `scope`.
    fn entity_symbol(&self, scope: ScopeId, name: &str, data: SymbolData, span: Span) -> Symbol {
        let hash = TypeHash::from_name(&self.qualify(scope, name));
        Symbol::new(name.to_string(), source_name(name), hash, scope, data, span)
    }

    /// Insert a symbol under its own name without any redeclaration checks.
    pub(crate) fn insert_entity(
        &mut self,
        scope: ScopeId,
        name: &str,
        data: SymbolData,
        span: Span,
    ) -> SymbolId {
        let symbol = self.entity_symbol(scope, name, data, span);
        self.push_symbol(scope, name, symbol)
    }

    /// Make `symbol` visible under `name` in `scope` as well.
    pub(crate) fn alias(&mut self, scope: ScopeId, name: &str, symbol: SymbolId) {
        self.scope_mut(scope).alias(name, symbol);
    }

    /// Declare `name` in `scope`, or return the existing declaration.
    ///
    /// An existing symbol whose kind is in `mask` is a redeclaration of the
    /// same entity and is returned as is; any other existing symbol makes
    /// this a [`SemaError::DifferentKind`] error. `payload` builds the data
    /// of a new symbol and must match `kind`. Namespaces, classes and enums
    /// get a scope of their own.
    ///
    /// Inside a template parameter scope without an owner, the request is
    /// redirected to the enclosing scope and declares a template.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn declare_or_redeclare(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        mask: LookupMask,
        span: Span,
        payload: impl FnOnce() -> SymbolData,
    ) -> SemaResult<Declared> {
        if self.scope(scope).is_unowned_template() {
            return self.declare_template(scope, name, kind, span);
        }
        match kind {
            SymbolKind::Function => {
                return Err(SemaError::internal(
                    format!("function '{name}' must be declared as an overload"),
                    span,
                ));
            }
            SymbolKind::Template => {
                return Err(SemaError::internal(
                    format!("template '{name}' must be declared from its parameter scope"),
                    span,
                ));
            }
            _ => {}
        }

        if let Some(&existing) = self.scope(scope).get(name).first() {
            let found = self.symbol(existing).kind();
            if mask.accepts(found) {
                debug!(name, kind = %found, "redeclaration");
                return Ok(Declared {
                    symbol: existing,
                    is_new: false,
                });
            }
            return Err(SemaError::DifferentKind {
                name: name.to_string(),
                existing: found.as_str().to_string(),
                requested: kind.as_str().to_string(),
                span,
            });
        }

        let data = payload();
        if data.kind() != kind {
            return Err(SemaError::internal(
                format!("payload for '{name}' is a {} but a {kind} was requested", data.kind()),
                span,
            ));
        }
        let id = self.insert_entity(scope, name, data, span);
        let scope_kind = match kind {
            SymbolKind::Namespace => Some(ScopeKind::Namespace),
            SymbolKind::Class => Some(ScopeKind::Class),
            SymbolKind::Enum => Some(ScopeKind::Enum),
            _ => None,
        };
        if let Some(scope_kind) = scope_kind {
            let own = self.new_scope(scope_kind, Some(id), scope);
            self.symbol_mut(id).set_scope(own);
        }
        Ok(Declared {
            symbol: id,
            is_new: true,
        })
    }

    /// Redirected declaration from an unowned template parameter scope.
    pub(crate) fn declare_template(
        &mut self,
        param_scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        span: Span,
    ) -> SemaResult<Declared> {
        let entity = match kind {
            SymbolKind::Class => TemplatedEntity::Class(ClassKey::Class),
            SymbolKind::Typedef => TemplatedEntity::Typedef,
            SymbolKind::Object => TemplatedEntity::Object,
            SymbolKind::Function => return Err(SemaError::unsupported("function templates", span)),
            other => {
                return Err(SemaError::unsupported(format!("{other} templates"), span));
            }
        };
        let enclosing = self.scope(param_scope).enclosing().ok_or_else(|| {
            SemaError::internal("template parameter scope has no enclosing scope", span)
        })?;
        let params = self
            .scope(param_scope)
            .pending_params()
            .cloned()
            .unwrap_or_default();

        if let Some(&existing) = self.scope(enclosing).get(name).first() {
            let found = self.symbol(existing);
            let Some(template) = found.as_template() else {
                return Err(SemaError::DifferentKind {
                    name: name.to_string(),
                    existing: found.kind().as_str().to_string(),
                    requested: "template".to_string(),
                    span,
                });
            };
            if template.entity.kind() != kind {
                return Err(SemaError::DifferentKind {
                    name: name.to_string(),
                    existing: format!("{} template", template.entity.as_str()),
                    requested: format!("{kind} template"),
                    span,
                });
            }
            let template_scope = found.scope().ok_or_else(|| {
                SemaError::internal(format!("template '{name}' has no parameter scope"), span)
            })?;

            let data = self.template_data_mut(existing, span)?;
            data.params.merge(params, name, span)?;
            data.params.check_trailing_defaults(name, span)?;
            self.alias_template_params(param_scope, template_scope);
            self.scope_mut(param_scope).clear_pending_params();
            debug!(template = name, "merged template redeclaration");
            return Ok(Declared {
                symbol: existing,
                is_new: false,
            });
        }

        params.check_trailing_defaults(name, span)?;
        let data = SymbolData::Template(TemplateData {
            params,
            entity,
            pattern: None,
            entity_defined: false,
        });
        let id = self.insert_entity(enclosing, name, data, span);
        self.symbol_mut(id).set_scope(param_scope);
        let scope = self.scope_mut(param_scope);
        scope.set_owner(id);
        scope.clear_pending_params();
        debug!(template = name, entity = entity.as_str(), "declared template");
        Ok(Declared {
            symbol: id,
            is_new: true,
        })
    }

    /// Make the parameter names of a redeclaration visible in the template's scope.
    fn alias_template_params(&mut self, from: ScopeId, to: ScopeId) {
        let index_of = |table: &SymbolTable, id: SymbolId| match table.symbol(id).data() {
            SymbolData::TemplateParam(param) => Some(param.index),
            _ => None,
        };
        let aliases: Vec<(String, SymbolId)> = self
            .scope(from)
            .declared()
            .iter()
            .filter_map(|&new| {
                let index = index_of(self, new)?;
                let target = self
                    .scope(to)
                    .declared()
                    .iter()
                    .copied()
                    .find(|&old| index_of(self, old) == Some(index))?;
                Some((self.symbol(new).name().to_string(), target))
            })
            .collect();
        for (name, target) in aliases {
            if !name.is_empty() {
                self.alias(to, &name, target);
            }
        }
    }

    /// Declare one function overload.
    ///
    /// Functions may share a name only with other functions. A declaration
    /// with the same type as an existing overload is a redeclaration; one
    /// with the same parameter signature but a different type is an error.
    pub fn declare_function_overload(
        &mut self,
        scope: ScopeId,
        name: &str,
        type_id: TypeIdRef,
        signature: &str,
        flags: DeclFlags,
        span: Span,
    ) -> SemaResult<Declared> {
        if self.scope(scope).is_unowned_template() {
            return Err(SemaError::unsupported("function templates", span));
        }

        for &existing in self.scope(scope).get(name) {
            match self.symbol(existing).data() {
                SymbolData::Function(f) if f.type_id == type_id => {
                    return Ok(Declared {
                        symbol: existing,
                        is_new: false,
                    });
                }
                SymbolData::Function(f) if f.signature == signature => {
                    return Err(SemaError::Redefinition {
                        name: name.to_string(),
                        span,
                    });
                }
                SymbolData::Function(_) => {}
                other => {
                    return Err(SemaError::DifferentKind {
                        name: name.to_string(),
                        existing: other.kind().as_str().to_string(),
                        requested: SymbolKind::Function.as_str().to_string(),
                        span,
                    });
                }
            }
        }

        let qualified = self.qualify(scope, name);
        let symbol = Symbol::new(
            name.to_string(),
            format!("{}{}", source_name(name), signature),
            TypeHash::from_function(&qualified, signature),
            scope,
            SymbolData::Function(FunctionData {
                type_id,
                flags,
                signature: signature.to_string(),
            }),
            span,
        );
        let id = self.push_symbol(scope, name, symbol);
        Ok(Declared {
            symbol: id,
            is_new: true,
        })
    }

    /// Declare a class template instance under its instance key.
    ///
    /// The instance is registered in `owner_scope` under `key`, so a later
    /// lookup of the same key finds it; `display` is its human-readable name.
    pub(crate) fn declare_instance(
        &mut self,
        owner_scope: ScopeId,
        key: &str,
        display: &str,
        class_key: ClassKey,
        origin: InstanceOrigin,
        span: Span,
    ) -> SymbolId {
        let hash = TypeHash::from_instance(&self.scope_path(owner_scope), key);
        let mut data = ClassData::new(class_key);
        data.instance_of = Some(origin);
        let symbol = Symbol::new(
            display.to_string(),
            key.to_string(),
            hash,
            owner_scope,
            SymbolData::Class(data),
            span,
        );
        let id = self.push_symbol(owner_scope, key, symbol);
        let own = self.new_scope(ScopeKind::Class, Some(id), owner_scope);
        self.symbol_mut(id).set_scope(own);
        id
    }

    pub(crate) fn template_data_mut(
        &mut self,
        id: SymbolId,
        span: Span,
    ) -> SemaResult<&mut TemplateData> {
        let symbol = self.symbol_mut(id);
        let name = symbol.name().to_string();
        match symbol.data_mut() {
            SymbolData::Template(data) => Ok(data),
            _ => Err(SemaError::NotATemplate { name, span }),
        }
    }

    pub(crate) fn class_data_mut(&mut self, id: SymbolId, span: Span) -> SemaResult<&mut ClassData> {
        let symbol = self.symbol_mut(id);
        let name = symbol.name().to_string();
        match symbol.data_mut() {
            SymbolData::Class(data) => Ok(data),
            _ => Err(SemaError::NotAClass { name, span }),
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Unqualified lookup: search `scope`, then each enclosing scope.
    pub fn lookup(&self, scope: ScopeId, name: &str, mask: LookupMask) -> Option<SymbolId> {
        std::iter::successors(Some(scope), |&s| self.scope(s).enclosing())
            .find_map(|s| self.lookup_qualified(s, name, mask))
    }

    /// Lookup in `scope` only.
    pub fn lookup_qualified(&self, scope: ScopeId, name: &str, mask: LookupMask) -> Option<SymbolId> {
        self.scope(scope)
            .get(name)
            .iter()
            .copied()
            .find(|&id| mask.accepts(self.symbol(id).kind()))
    }

    /// Lookup of `a::b::c` starting from `scope`.
    pub fn lookup_path(&self, scope: ScopeId, path: &[&str], mask: LookupMask) -> Option<SymbolId> {
        let (last, prefix) = path.split_last()?;
        let mut current = scope;
        for (i, segment) in prefix.iter().enumerate() {
            let found = if i == 0 {
                self.lookup(current, segment, LookupMask::SCOPE)?
            } else {
                self.lookup_qualified(current, segment, LookupMask::SCOPE)?
            };
            current = self.symbol(found).scope()?;
        }
        if prefix.is_empty() {
            self.lookup(current, last, mask)
        } else {
            self.lookup_qualified(current, last, mask)
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Owners of the scopes from the global scope down to `scope`.
    ///
    /// Template parameter scopes do not contribute.
    fn owner_chain(&self, scope: ScopeId) -> Vec<SymbolId> {
        let mut chain: Vec<SymbolId> = std::iter::successors(Some(scope), |&s| self.scope(s).enclosing())
            .filter(|&s| self.scope(s).kind() != ScopeKind::Template)
            .filter_map(|s| self.scope(s).owner())
            .collect();
        chain.reverse();
        chain
    }

    /// `a::B` for the scope owned by `B` in namespace `a`; empty for the global scope.
    pub fn scope_path(&self, scope: ScopeId) -> String {
        self.owner_chain(scope)
            .iter()
            .map(|&id| self.symbol(id).name())
            .collect::<Vec<_>>()
            .join("::")
    }

    fn qualify(&self, scope: ScopeId, name: &str) -> String {
        let prefix = self.scope_path(scope);
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}::{name}")
        }
    }

    /// Fully qualified display name of a symbol.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let symbol = self.symbol(id);
        self.qualify(symbol.enclosing(), symbol.name())
    }

    /// Internal name including enclosing namespaces and classes: `N3app6WidgetE`.
    pub fn nested_mangled_name(&self, id: SymbolId) -> String {
        let symbol = self.symbol(id);
        let chain = self.owner_chain(symbol.enclosing());
        if chain.is_empty() {
            return symbol.mangled_name().to_string();
        }
        let mut out = String::from("N");
        for owner in chain {
            out.push_str(self.symbol(owner).mangled_name());
        }
        out.push_str(symbol.mangled_name());
        out.push('E');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::symbols::TemplateParamData;
    use crate::template::{ParamKind, TemplateParam, TemplateParamList};
    use crate::type_id::TypeIdGraph;
    use cppmeta_core::{CvQualifiers, Primitive};

    fn span() -> Span {
        Span::at(2, 1)
    }

    fn class_payload() -> SymbolData {
        SymbolData::Class(ClassData::new(ClassKey::Struct))
    }

    fn declare_class(table: &mut SymbolTable, scope: ScopeId, name: &str) -> SemaResult<Declared> {
        table.declare_or_redeclare(scope, name, SymbolKind::Class, LookupMask::CLASS, span(), class_payload)
    }

    /// Open a template parameter scope the way the session does.
    fn template_scope(table: &mut SymbolTable, enclosing: ScopeId, params: Vec<TemplateParam>) -> ScopeId {
        let scope = table.new_scope(ScopeKind::Template, None, enclosing);
        for (index, param) in params.iter().enumerate() {
            table.insert_entity(
                scope,
                &param.name,
                SymbolData::TemplateParam(TemplateParamData {
                    index,
                    kind: param.kind,
                    is_pack: param.is_pack,
                }),
                param.span,
            );
        }
        table.scope_mut(scope).set_pending_params(TemplateParamList::new(params));
        scope
    }

    #[test]
    fn redeclaring_same_kind_returns_existing() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let first = declare_class(&mut table, global, "Widget").unwrap();
        let second = declare_class(&mut table, global, "Widget").unwrap();
        assert!(first.is_new);
        assert!(!second.is_new);
        assert_eq!(first.symbol, second.symbol);
        assert!(table.symbol(first.symbol).scope().is_some());
    }

    #[test]
    fn redeclaring_as_different_kind_fails() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        declare_class(&mut table, global, "Widget").unwrap();
        let err = table
            .declare_or_redeclare(global, "Widget", SymbolKind::Namespace, LookupMask::NAMESPACE, span(), || {
                SymbolData::Namespace
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "at 2:1: 'Widget' redeclared as different kind of symbol (class vs namespace)"
        );
    }

    #[test]
    fn functions_overload_but_do_not_mix_with_objects() {
        let mut table = SymbolTable::new();
        let mut graph = TypeIdGraph::new();
        let global = table.global_scope();
        let int = graph.primitive(Primitive::Int, CvQualifiers::empty());
        let double = graph.primitive(Primitive::Double, CvQualifiers::empty());
        let void = graph.primitive(Primitive::Void, CvQualifiers::empty());
        let f_int = graph.walk_to_function(void, &[int], false, CvQualifiers::empty());
        let f_double = graph.walk_to_function(void, &[double], false, CvQualifiers::empty());
        let g_int = graph.walk_to_function(int, &[int], false, CvQualifiers::empty());

        let a = table
            .declare_function_overload(global, "f", f_int, "Fvi", DeclFlags::empty(), span())
            .unwrap();
        let b = table
            .declare_function_overload(global, "f", f_double, "Fvd", DeclFlags::empty(), span())
            .unwrap();
        let again = table
            .declare_function_overload(global, "f", f_int, "Fvi", DeclFlags::empty(), span())
            .unwrap();
        assert!(a.is_new && b.is_new && !again.is_new);
        assert_ne!(a.symbol, b.symbol);
        assert_eq!(a.symbol, again.symbol);
        assert_ne!(table.symbol(a.symbol).hash(), table.symbol(b.symbol).hash());

        // Same parameters, different return type.
        assert!(matches!(
            table.declare_function_overload(global, "f", g_int, "Fvi", DeclFlags::empty(), span()),
            Err(SemaError::Redefinition { .. })
        ));

        let err = declare_class(&mut table, global, "f").unwrap_err();
        assert!(matches!(err, SemaError::DifferentKind { .. }));

        declare_class(&mut table, global, "Thing").unwrap();
        let err = table
            .declare_function_overload(global, "Thing", f_int, "Fvi", DeclFlags::empty(), span())
            .unwrap_err();
        assert!(matches!(err, SemaError::DifferentKind { .. }));
    }

    #[test]
    fn template_scope_redirects_to_enclosing() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let params = template_scope(&mut table, global, vec![TemplateParam::type_param("T", span())]);

        let declared = declare_class(&mut table, params, "Box").unwrap();
        assert!(declared.is_new);
        let symbol = table.symbol(declared.symbol);
        assert_eq!(symbol.kind(), SymbolKind::Template);
        assert_eq!(symbol.enclosing(), global);
        assert_eq!(symbol.scope(), Some(params));
        assert_eq!(table.scope(params).owner(), Some(declared.symbol));
        assert_eq!(symbol.as_template().map(|t| t.params.len()), Some(1));
        assert_eq!(table.lookup(global, "Box", LookupMask::TEMPLATE), Some(declared.symbol));
        assert_eq!(table.lookup_qualified(params, "Box", LookupMask::ANY), None);
    }

    #[test]
    fn template_redeclaration_merges_defaults_and_aliases_names() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let first = template_scope(
            &mut table,
            global,
            vec![
                TemplateParam::type_param("T", span()),
                TemplateParam::non_type("N", Primitive::Int, span()),
            ],
        );
        let template = declare_class(&mut table, first, "Array").unwrap().symbol;

        let second = template_scope(
            &mut table,
            global,
            vec![
                TemplateParam::type_param("U", span()),
                TemplateParam::non_type("M", Primitive::Int, span()).with_default(Node::int(16, span())),
            ],
        );
        let merged = declare_class(&mut table, second, "Array").unwrap();
        assert_eq!(merged.symbol, template);
        assert!(!merged.is_new);

        let data = table.symbol(template).as_template().unwrap();
        assert_eq!(data.params.get(1).and_then(|p| p.default.clone()), Some(Node::int(16, span())));

        let t = table.lookup_qualified(first, "T", LookupMask::TEMPLATE_PARAM);
        let u = table.lookup_qualified(first, "U", LookupMask::TEMPLATE_PARAM);
        assert!(t.is_some());
        assert_eq!(t, u);
    }

    #[test]
    fn template_redeclaration_with_other_shape_fails() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let first = template_scope(&mut table, global, vec![TemplateParam::type_param("T", span())]);
        declare_class(&mut table, first, "Box").unwrap();
        let second = template_scope(
            &mut table,
            global,
            vec![TemplateParam::non_type("N", Primitive::Int, span())],
        );
        assert!(matches!(
            declare_class(&mut table, second, "Box"),
            Err(SemaError::TemplateParamMismatch { .. })
        ));
    }

    #[test]
    fn template_over_plain_class_fails() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        declare_class(&mut table, global, "Box").unwrap();
        let params = template_scope(&mut table, global, vec![TemplateParam::type_param("T", span())]);
        assert!(matches!(
            declare_class(&mut table, params, "Box"),
            Err(SemaError::DifferentKind { .. })
        ));
    }

    #[test]
    fn function_templates_are_unsupported() {
        let mut table = SymbolTable::new();
        let mut graph = TypeIdGraph::new();
        let global = table.global_scope();
        let void = graph.primitive(Primitive::Void, CvQualifiers::empty());
        let f = graph.walk_to_function(void, &[], false, CvQualifiers::empty());
        let params = template_scope(&mut table, global, vec![TemplateParam::type_param("T", span())]);
        let err = table
            .declare_function_overload(params, "f", f, "Fvv", DeclFlags::empty(), span())
            .unwrap_err();
        assert_eq!(err.category(), cppmeta_core::ErrorCategory::Unsupported);
    }

    #[test]
    fn lookup_walks_enclosing_scopes() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let ns = table
            .declare_or_redeclare(global, "app", SymbolKind::Namespace, LookupMask::NAMESPACE, span(), || {
                SymbolData::Namespace
            })
            .unwrap()
            .symbol;
        let ns_scope = table.symbol(ns).scope().unwrap();
        let outer = declare_class(&mut table, global, "Outer").unwrap().symbol;
        let widget = declare_class(&mut table, ns_scope, "Widget").unwrap().symbol;

        assert_eq!(table.lookup(ns_scope, "Outer", LookupMask::CLASS), Some(outer));
        assert_eq!(table.lookup(global, "Widget", LookupMask::CLASS), None);
        assert_eq!(table.lookup_path(global, &["app", "Widget"], LookupMask::CLASS), Some(widget));
        assert_eq!(table.qualified_name(widget), "app::Widget");
        assert_eq!(table.nested_mangled_name(widget), "N3app6WidgetE");
        assert_eq!(table.nested_mangled_name(outer), "5Outer");
        assert_eq!(table.members_of(ns_scope), &[widget]);
    }

    #[test]
    fn template_params_do_not_qualify_names() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let params = template_scope(&mut table, global, vec![TemplateParam::type_param("T", span())]);
        let t = table.lookup_qualified(params, "T", LookupMask::TEMPLATE_PARAM).unwrap();
        assert_eq!(table.qualified_name(t), "T");
        assert!(matches!(
            table.symbol(t).data(),
            SymbolData::TemplateParam(TemplateParamData {
                index: 0,
                kind: ParamKind::Type,
                is_pack: false
            })
        ));
    }
}
