//! Class template instantiation.
//!
//! Instances are memoized by their instance key: they are registered under
//! the key in the scope that declares the template, so instantiating the
//! same template with the same bound arguments always yields the same
//! symbol.

use cppmeta_core::{SemaError, SemaResult, Span};
use tracing::debug;

use super::key::{display_name, instance_key};
use super::TemplateArguments;
use crate::ast::{ClassSpecifier, Node, Substitute, expand_bases};
use crate::context::SemaContext;
use crate::symbols::{InstanceOrigin, LookupMask, SymbolId, TemplatedEntity};

impl SemaContext {
    /// Instantiate `template` with the argument list `args`.
    ///
    /// Returns the cached instance when one exists for the same bound
    /// arguments. Otherwise a new class symbol is declared next to the
    /// template; if the template was defined at this point its base list and
    /// member specification are substituted into the instance, which then
    /// counts as defined. Member declarations are stored in their resolved
    /// form but are not declared as symbols of the instance's scope.
    ///
    /// Nested instantiations, whether reached from a base list or from a
    /// default argument, count towards `max_instantiation_depth`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn instantiate(&mut self, template: SymbolId, args: &[Node], span: Span) -> SemaResult<SymbolId> {
        let max_depth = self.config().max_instantiation_depth;
        if self.depth >= max_depth {
            return Err(SemaError::InstantiationDepthExceeded {
                template: self.table.symbol(template).name().to_string(),
                depth: max_depth,
                span,
            });
        }
        self.depth += 1;
        let instance = self.instantiate_nested(template, args, span);
        self.depth -= 1;
        instance
    }

    fn instantiate_nested(&mut self, template: SymbolId, args: &[Node], span: Span) -> SemaResult<SymbolId> {
        // 1. The name must denote a template
        let symbol = self.table.symbol(template);
        let Some(data) = symbol.as_template() else {
            return Err(SemaError::NotATemplate {
                name: symbol.name().to_string(),
                span,
            });
        };

        // Clone data we need before mutable borrow
        let template_name = symbol.name().to_string();
        let template_mangled = symbol.mangled_name().to_string();
        let owner_scope = symbol.enclosing();
        let entity = data.entity;
        let pattern = if data.entity_defined {
            data.pattern.clone()
        } else {
            None
        };

        // 2. Bind arguments and compute the cache key
        let (bound, sources) = self.bind_with_sources(template, args, span)?;
        let key = instance_key(&template_mangled, &bound, &self.types, &self.table);

        // 3. Memo lookup
        if let Some(existing) = self.table.lookup_qualified(owner_scope, &key, LookupMask::CLASS) {
            debug!(template = %template_name, key = %key, "instantiation cache hit");
            return Ok(existing);
        }

        // 4. Only class templates can be instantiated
        let TemplatedEntity::Class(class_key) = entity else {
            return Err(SemaError::UnsupportedTemplateEntity {
                name: template_name,
                entity: entity.as_str().to_string(),
                span,
            });
        };

        // 5. Register the instance before populating it, so references to
        //    the same instance from its own bases hit the memo
        let instance_name = display_name(&template_name, &sources);
        let origin = InstanceOrigin {
            template,
            arguments: bound.clone(),
        };
        let instance = self
            .table
            .declare_instance(owner_scope, &key, &instance_name, class_key, origin, span);
        debug!(instance = %instance_name, key = %key, "instantiation cache miss");

        // 6. Substitute the pattern
        let Some(pattern) = pattern else {
            return Ok(instance);
        };
        self.populate_instance(instance, &pattern, &bound)?;
        self.table.symbol_mut(instance).set_defined();
        Ok(instance)
    }

    fn populate_instance(
        &mut self,
        instance: SymbolId,
        pattern: &ClassSpecifier,
        args: &TemplateArguments,
    ) -> SemaResult<()> {
        for base in expand_bases(&pattern.bases, args)? {
            self.register_base(instance, &base)?;
        }

        let members = pattern
            .members
            .iter()
            .map(|member| member.resolve_dependent(args))
            .collect::<SemaResult<Vec<_>>>()?;
        let class = self.table.class_data_mut(instance, pattern.span)?;
        class.key = pattern.key;
        class.members = members;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Access, BaseSpecifier, ClassKey};
    use crate::template::{TemplateParam, TemplateParamList};
    use crate::SemaConfig;
    use cppmeta_core::{ConstValue, DeclFlags, Primitive};

    fn span() -> Span {
        Span::at(20, 1)
    }

    fn class(ctx: &mut SemaContext, name: &str) -> SymbolId {
        let symbol = ctx.declare_class(name, ClassKey::Struct, span()).unwrap();
        ctx.define_class(symbol, ClassSpecifier::new(ClassKey::Struct, name, span()))
            .unwrap();
        symbol
    }

    fn template(ctx: &mut SemaContext, name: &str, params: Vec<TemplateParam>, body: Option<ClassSpecifier>) -> SymbolId {
        ctx.begin_template(TemplateParamList::new(params), span()).unwrap();
        let symbol = ctx.declare_class(name, ClassKey::Struct, span()).unwrap();
        if let Some(body) = body {
            ctx.define_class(symbol, body).unwrap();
        }
        ctx.end_template(span()).unwrap()
    }

    fn int() -> Node {
        Node::primitive_type(DeclFlags::INT, span())
    }

    #[test]
    fn same_arguments_same_instance() {
        let mut ctx = SemaContext::new();
        let holder = template(
            &mut ctx,
            "Holder",
            vec![TemplateParam::type_param("T", span())],
            Some(ClassSpecifier::new(ClassKey::Struct, "Holder", span())),
        );
        let first = ctx.instantiate(holder, &[int()], span()).unwrap();
        let signed_int = Node::primitive_type(DeclFlags::SIGNED | DeclFlags::INT, span());
        let second = ctx.instantiate(holder, &[signed_int], span()).unwrap();
        assert_eq!(first, second);
        assert_eq!(ctx.symbol(first).name(), "Holder<int>");
        assert_eq!(ctx.symbol(first).mangled_name(), "6HolderIiE");
        assert!(ctx.symbol(first).is_defined());

        let other = ctx
            .instantiate(holder, &[Node::primitive_type(DeclFlags::CHAR, span())], span())
            .unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn undefined_templates_give_incomplete_instances() {
        let mut ctx = SemaContext::new();
        let fwd = template(&mut ctx, "Fwd", vec![TemplateParam::type_param("T", span())], None);
        let instance = ctx.instantiate(fwd, &[int()], span()).unwrap();
        assert!(!ctx.symbol(instance).is_defined());
        let origin = ctx.symbol(instance).as_class().and_then(|c| c.instance_of.clone()).unwrap();
        assert_eq!(origin.template, fwd);
        assert_eq!(origin.arguments.len(), 1);
    }

    #[test]
    fn non_type_arguments_are_converted() {
        let mut ctx = SemaContext::new();
        let array = template(
            &mut ctx,
            "Array",
            vec![
                TemplateParam::type_param("T", span()),
                TemplateParam::non_type("N", Primitive::UnsignedInt, span()),
            ],
            Some(ClassSpecifier::new(ClassKey::Struct, "Array", span())),
        );
        let instance = ctx.instantiate(array, &[int(), Node::int(4, span())], span()).unwrap();
        let origin = ctx.symbol(instance).as_class().and_then(|c| c.instance_of.clone()).unwrap();
        assert_eq!(origin.arguments.get(1).and_then(|a| a.as_value()), Some(ConstValue::UInt(4)));
        assert_eq!(ctx.symbol(instance).name(), "Array<int, 4>");
    }

    #[test]
    fn self_derivation_is_an_incomplete_base() {
        let mut ctx = SemaContext::new();
        let params = vec![TemplateParam::type_param("T", span())];
        ctx.begin_template(TemplateParamList::new(params), span()).unwrap();
        let looped = ctx.declare_class("Loop", ClassKey::Struct, span()).unwrap();
        let body = ClassSpecifier::new(ClassKey::Struct, "Loop", span()).with_base(BaseSpecifier::new(
            Access::Public,
            Node::template_id(looped, "Loop", vec![Node::dependent_type("T", 0, span())], span()),
            span(),
        ));
        ctx.define_class(looped, body).unwrap();
        ctx.end_template(span()).unwrap();

        let err = ctx.instantiate(looped, &[int()], span()).unwrap_err();
        assert!(matches!(err, SemaError::IncompleteBase { .. }), "{err}");
    }

    #[test]
    fn runaway_recursion_hits_the_depth_limit() {
        let mut ctx = SemaContext::with_config(SemaConfig::new().with_max_instantiation_depth(8));
        let params = vec![TemplateParam::type_param("T", span())];
        ctx.begin_template(TemplateParamList::new(params), span()).unwrap();
        let grow = ctx.declare_class("Grow", ClassKey::Struct, span()).unwrap();
        // struct Grow : Grow<T*> {}
        let pointer = Node::type_id(
            crate::ast::DeclSpecifiers::named(Node::dependent_type("T", 0, span())),
            crate::ast::DeclaratorNode::chain(
                vec![crate::ast::DeclaratorOp::Pointer(Default::default())],
                span(),
            ),
            span(),
        );
        let body = ClassSpecifier::new(ClassKey::Struct, "Grow", span()).with_base(BaseSpecifier::new(
            Access::Public,
            Node::template_id(grow, "Grow", vec![pointer], span()),
            span(),
        ));
        ctx.define_class(grow, body).unwrap();
        ctx.end_template(span()).unwrap();

        let err = ctx.instantiate(grow, &[int()], span()).unwrap_err();
        assert!(matches!(err, SemaError::InstantiationDepthExceeded { depth: 8, .. }), "{err}");
    }

    #[test]
    fn only_class_templates_instantiate() {
        let mut ctx = SemaContext::new();
        let a = class(&mut ctx, "A");
        let err = ctx.instantiate(a, &[], span()).unwrap_err();
        assert!(matches!(err, SemaError::NotATemplate { .. }));

        ctx.begin_template(
            TemplateParamList::new(vec![TemplateParam::type_param("T", span())]),
            span(),
        )
        .unwrap();
        let alias = ctx
            .declare_typedef(
                "Ptr",
                &crate::ast::DeclSpecifiers::named(Node::dependent_type("T", 0, span())),
                None,
                span(),
            )
            .unwrap();
        ctx.end_template(span()).unwrap();
        let err = ctx.instantiate(alias, &[int()], span()).unwrap_err();
        assert!(matches!(err, SemaError::UnsupportedTemplateEntity { .. }));
    }
}
