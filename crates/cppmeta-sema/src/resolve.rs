//! Type resolution: from decl-specifiers and declarators to canonical type-ids.

use cppmeta_core::{SemaError, SemaResult, Span};

use crate::ast::{BaseSpecifier, DeclSpecifiers, DeclaratorNode, DeclaratorOp, Node, ParameterNode};
use crate::context::SemaContext;
use crate::symbols::{BaseClass, SymbolData, SymbolId, SymbolKind};
use crate::type_id::TypeIdRef;

impl SemaContext {
    /// Canonical type-id of a decl-specifier sequence with an optional declarator.
    ///
    /// The base comes from the named type in `specifiers` or from its
    /// fundamental type keywords; the declarator's parts are then applied in
    /// order, each walking one edge of the type-id graph.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_type_id(
        &mut self,
        specifiers: &DeclSpecifiers,
        declarator: Option<&DeclaratorNode>,
        span: Span,
    ) -> SemaResult<TypeIdRef> {
        let base = match &specifiers.type_name {
            Some(name) => {
                if specifiers.flags.has_type_specifier() {
                    return Err(SemaError::InvalidTypeSpecifier {
                        detail: format!("'{name}' combined with fundamental type specifiers"),
                        span,
                    });
                }
                let named = self.resolve_type_node(name)?;
                self.types.add_cv(named, specifiers.flags.cv())
            }
            None => self.types.get_base_node(specifiers.flags, span)?,
        };
        match declarator {
            Some(declarator) => self.apply_declarator(base, declarator),
            None => Ok(base),
        }
    }

    fn apply_declarator(&mut self, base: TypeIdRef, declarator: &DeclaratorNode) -> SemaResult<TypeIdRef> {
        let mut current = base;
        for part in declarator.parts() {
            let invalid = |detail: &str| SemaError::InvalidTypeSpecifier {
                detail: detail.to_string(),
                span: part.span,
            };
            current = match &part.op {
                DeclaratorOp::Id(_) => current,
                DeclaratorOp::Pointer(cv) => {
                    if self.types.is_reference(current) {
                        return Err(invalid("pointer to reference"));
                    }
                    self.types.walk_to_pointer(current, *cv)
                }
                DeclaratorOp::LvalueRef | DeclaratorOp::RvalueRef if self.types.is_void(current) => {
                    return Err(invalid("reference to void"));
                }
                DeclaratorOp::LvalueRef => self.types.walk_to_ref(current),
                DeclaratorOp::RvalueRef => self.types.walk_to_rvref(current),
                DeclaratorOp::Array(bound) => {
                    if self.types.is_reference(current) {
                        return Err(invalid("array of references"));
                    }
                    if self.types.is_function(current) {
                        return Err(invalid("array of functions"));
                    }
                    if self.types.is_void(current) {
                        return Err(invalid("array of void"));
                    }
                    let bound = match bound {
                        Some(expr) => Some(self.array_bound(expr)?),
                        None => None,
                    };
                    self.types.walk_to_array(current, bound)
                }
                DeclaratorOp::Function { params, variadic, cv } => {
                    if self.types.is_array(current) {
                        return Err(invalid("function returning an array"));
                    }
                    if self.types.is_function(current) {
                        return Err(invalid("function returning a function"));
                    }
                    let params = self.resolve_parameters(params)?;
                    self.types.walk_to_function(current, &params, *variadic, *cv)
                }
            };
        }
        Ok(current)
    }

    fn array_bound(&self, expr: &Node) -> SemaResult<u64> {
        let value = expr.evaluate(&self.table)?;
        value.as_u64().ok_or_else(|| {
            SemaError::not_constant(
                format!("array bound {value} is not a non-negative integer"),
                expr.span(),
            )
        })
    }

    /// Adjusted parameter types; a lone unnamed `void` means no parameters.
    fn resolve_parameters(&mut self, params: &[ParameterNode]) -> SemaResult<Vec<TypeIdRef>> {
        let mut types = Vec::with_capacity(params.len());
        for param in params {
            let ty = self.resolve_type_id(&param.specifiers, param.declarator.as_ref(), param.span)?;
            if self.types.is_void(ty) {
                if params.len() == 1 && param.declarator.is_none() {
                    return Ok(Vec::new());
                }
                return Err(SemaError::InvalidTypeSpecifier {
                    detail: "parameter of type 'void'".to_string(),
                    span: param.span,
                });
            }
            types.push(self.types.adjust_parameter(ty));
        }
        Ok(types)
    }

    /// Type-id of a node used in type position.
    pub fn resolve_type_node(&mut self, node: &Node) -> SemaResult<TypeIdRef> {
        match node {
            Node::TypeId(n) => self.resolve_type_id(&n.specifiers, n.declarator.as_ref(), n.span),
            Node::ResolvedType(n) => Ok(n.type_id),
            Node::Paren(n) => self.resolve_type_node(&n.inner),
            Node::Name(n) => match self.table.symbol(n.symbol).data() {
                SymbolData::Class(_) | SymbolData::Enum(_) => Ok(self.type_of_symbol(n.symbol)),
                // Typedefs are transparent.
                SymbolData::Typedef(target) => Ok(*target),
                SymbolData::TemplateParam(_) => Err(SemaError::DependentType {
                    name: n.name.clone(),
                    span: n.span,
                }),
                _ => Err(SemaError::NotAType {
                    name: n.name.clone(),
                    span: n.span,
                }),
            },
            Node::TemplateId(n) => {
                let instance = self.instantiate(n.template, &n.arguments, n.span)?;
                Ok(self.type_of_symbol(instance))
            }
            Node::DependentTypeName(n) | Node::DependentNonTypeName(n) => Err(SemaError::DependentType {
                name: n.name.clone(),
                span: n.span,
            }),
            other => Err(SemaError::NotAType {
                name: other.to_string(),
                span: other.span(),
            }),
        }
    }

    /// The unqualified type-id of a class or enum symbol, cached on the symbol.
    pub fn type_of_symbol(&mut self, symbol: SymbolId) -> TypeIdRef {
        if let Some(id) = self.table.symbol(symbol).type_id() {
            return id;
        }
        let id = self.types.symbol_type(symbol, Default::default());
        self.table.symbol_mut(symbol).set_type_id(id);
        id
    }

    /// The class a base-specifier name denotes.
    pub fn resolve_class_name(&mut self, node: &Node) -> SemaResult<SymbolId> {
        let not_a_class = || SemaError::NotAClass {
            name: node.to_string(),
            span: node.span(),
        };
        let ty = match self.resolve_type_node(node) {
            Ok(ty) => ty,
            Err(SemaError::NotAType { .. }) => return Err(not_a_class()),
            Err(err) => return Err(err),
        };
        let ty = self.types.strip_top_level_cv(ty);
        self.types
            .symbol_of(ty)
            .filter(|&symbol| self.table.symbol(symbol).kind() == SymbolKind::Class)
            .ok_or_else(not_a_class)
    }

    /// Resolve a base-specifier and append it to the bases of `class`.
    pub(crate) fn register_base(&mut self, class: SymbolId, base: &BaseSpecifier) -> SemaResult<()> {
        if base.is_pack_expansion {
            return Err(SemaError::pack(
                format!("'{base}' outside of a class template"),
                base.span,
            ));
        }
        let target = self.resolve_class_name(&base.name)?;
        let incomplete = target == class
            || (self.config().require_complete_bases && !self.table.symbol(target).is_defined());
        if incomplete {
            return Err(SemaError::IncompleteBase {
                name: self.table.qualified_name(target),
                span: base.span,
            });
        }
        self.table.class_data_mut(class, base.span)?.bases.push(BaseClass {
            symbol: target,
            access: base.access,
            is_virtual: base.is_virtual,
        });
        Ok(())
    }
}
