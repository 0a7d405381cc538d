//! Substitution of template arguments into dependent trees.
//!
//! [`Substitute::resolve_dependent`] never mutates its input. Leaves that do
//! not depend on template parameters are copied; dependent names are
//! replaced by the bound argument; every interior node is rebuilt from its
//! resolved children. The result exclusively owns all of its children.
//!
//! Pack expansions are handled by the node that owns the expanded list
//! (a template-id's argument list, a class's base list), through
//! [`expand_pack`]: the pattern is substituted once per pack element, with
//! the pack slot narrowed to that single element.

use cppmeta_core::{SemaError, SemaResult, Span};

use super::{
    BaseSpecifier, BinaryNode, ClassSpecifier, ConditionalNode, DeclSpecifiers, DeclaratorNode,
    DeclaratorOp, DependentName, MemberNode, Node, ParameterNode, ParenNode, StaticAssertNode,
    TemplateIdNode, TypeIdNode, UnaryNode,
};
use crate::template::{TemplateArgument, TemplateArguments};

/// The substitution protocol shared by every node type.
pub trait Substitute: Sized {
    /// Push the parameter index of every dependent name reachable from `self`.
    fn collect_param_refs(&self, out: &mut Vec<usize>);

    /// Build a new tree with every dependent name replaced by its argument.
    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self>;

    /// Whether any dependent name is reachable from `self`.
    fn is_dependent(&self) -> bool {
        let mut refs = Vec::new();
        self.collect_param_refs(&mut refs);
        !refs.is_empty()
    }
}

impl<T: Substitute> Substitute for Box<T> {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        self.as_ref().collect_param_refs(out);
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        Ok(Box::new(self.as_ref().resolve_dependent(args)?))
    }
}

fn resolve_opt<T: Substitute>(value: &Option<T>, args: &TemplateArguments) -> SemaResult<Option<T>> {
    value.as_ref().map(|v| v.resolve_dependent(args)).transpose()
}

fn resolve_all<T: Substitute>(values: &[T], args: &TemplateArguments) -> SemaResult<Vec<T>> {
    values.iter().map(|v| v.resolve_dependent(args)).collect()
}

fn bound<'a>(args: &'a TemplateArguments, name: &DependentName) -> SemaResult<&'a TemplateArgument> {
    args.get(name.param_index)
        .ok_or(SemaError::ParamIndexOutOfRange {
            index: name.param_index,
            len: args.len(),
            span: name.span,
        })
}

fn unexpanded(name: &DependentName) -> SemaError {
    SemaError::pack(
        format!("parameter pack '{}' is used without '...'", name.name),
        name.span,
    )
}

/// Substitute `pattern` once per element of the packs it mentions.
///
/// Every pack referenced by the pattern must have the same length. A pattern
/// that mentions no pack is an error.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn expand_pack<T: Substitute>(
    pattern: &T,
    args: &TemplateArguments,
    span: Span,
) -> SemaResult<Vec<T>> {
    let mut refs = Vec::new();
    pattern.collect_param_refs(&mut refs);
    refs.sort_unstable();
    refs.dedup();

    let mut packs = Vec::new();
    let mut len: Option<usize> = None;
    for index in refs {
        let arg = args.get(index).ok_or(SemaError::ParamIndexOutOfRange {
            index,
            len: args.len(),
            span,
        })?;
        if let Some(elements) = arg.pack_elements() {
            match len {
                Some(n) if n != elements.len() => {
                    return Err(SemaError::pack(
                        format!("mismatched argument pack lengths ({n} vs {})", elements.len()),
                        span,
                    ));
                }
                _ => len = Some(elements.len()),
            }
            packs.push(index);
        }
    }

    let len = len.ok_or_else(|| {
        SemaError::pack("pattern does not contain a parameter pack", span)
    })?;
    (0..len)
        .map(|element| pattern.resolve_dependent(&args.with_pack_element(&packs, element)))
        .collect()
}

/// Resolve a base-specifier list, expanding `Bases...` entries in place.
pub fn expand_bases(
    bases: &[BaseSpecifier],
    args: &TemplateArguments,
) -> SemaResult<Vec<BaseSpecifier>> {
    let mut resolved = Vec::with_capacity(bases.len());
    for base in bases {
        if base.is_pack_expansion {
            let pattern = BaseSpecifier {
                is_pack_expansion: false,
                ..base.clone()
            };
            resolved.extend(expand_pack(&pattern, args, base.span)?);
        } else {
            resolved.push(base.resolve_dependent(args)?);
        }
    }
    Ok(resolved)
}

impl Substitute for Node {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        match self {
            Node::Literal(_) | Node::Name(_) | Node::ResolvedType(_) => {}
            Node::DependentTypeName(n) | Node::DependentNonTypeName(n) => out.push(n.param_index),
            Node::Unary(n) => n.operand.collect_param_refs(out),
            Node::Binary(n) => {
                n.lhs.collect_param_refs(out);
                n.rhs.collect_param_refs(out);
            }
            Node::Conditional(n) => {
                n.condition.collect_param_refs(out);
                n.then_branch.collect_param_refs(out);
                n.else_branch.collect_param_refs(out);
            }
            Node::Paren(n) => n.inner.collect_param_refs(out),
            Node::TypeId(n) => n.collect_param_refs(out),
            Node::TemplateId(n) => n.collect_param_refs(out),
            Node::PackExpansion(n) => n.pattern.collect_param_refs(out),
            Node::BaseSpecifier(n) => n.collect_param_refs(out),
            Node::Member(n) => n.collect_param_refs(out),
            Node::StaticAssert(n) => n.collect_param_refs(out),
            Node::ClassSpecifier(n) => n.collect_param_refs(out),
        }
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        Ok(match self {
            Node::Literal(_) | Node::Name(_) | Node::ResolvedType(_) => self.clone(),
            Node::DependentTypeName(n) => match bound(args, n)? {
                TemplateArgument::Type { type_id, text } => {
                    Node::resolved_type(*type_id, text.clone(), n.span)
                }
                TemplateArgument::Value(_) => {
                    return Err(SemaError::internal(
                        format!("type parameter '{}' is bound to a value", n.name),
                        n.span,
                    ));
                }
                TemplateArgument::Pack { .. } => return Err(unexpanded(n)),
            },
            Node::DependentNonTypeName(n) => match bound(args, n)? {
                TemplateArgument::Value(value) => Node::literal(*value, n.span),
                TemplateArgument::Type { .. } => {
                    return Err(SemaError::internal(
                        format!("non-type parameter '{}' is bound to a type", n.name),
                        n.span,
                    ));
                }
                TemplateArgument::Pack { .. } => return Err(unexpanded(n)),
            },
            Node::Unary(n) => Node::Unary(UnaryNode {
                op: n.op,
                operand: n.operand.resolve_dependent(args)?,
                span: n.span,
            }),
            Node::Binary(n) => Node::Binary(BinaryNode {
                op: n.op,
                lhs: n.lhs.resolve_dependent(args)?,
                rhs: n.rhs.resolve_dependent(args)?,
                span: n.span,
            }),
            Node::Conditional(n) => Node::Conditional(ConditionalNode {
                condition: n.condition.resolve_dependent(args)?,
                then_branch: n.then_branch.resolve_dependent(args)?,
                else_branch: n.else_branch.resolve_dependent(args)?,
                span: n.span,
            }),
            Node::Paren(n) => Node::Paren(ParenNode {
                inner: n.inner.resolve_dependent(args)?,
                span: n.span,
            }),
            Node::TypeId(n) => Node::TypeId(n.resolve_dependent(args)?),
            Node::TemplateId(n) => Node::TemplateId(n.resolve_dependent(args)?),
            Node::PackExpansion(n) => {
                return Err(SemaError::internal(
                    "pack expansion reached outside of the list that owns it",
                    n.span,
                ));
            }
            Node::BaseSpecifier(n) => Node::BaseSpecifier(n.resolve_dependent(args)?),
            Node::Member(n) => Node::Member(n.resolve_dependent(args)?),
            Node::StaticAssert(n) => Node::StaticAssert(n.resolve_dependent(args)?),
            Node::ClassSpecifier(n) => Node::ClassSpecifier(n.resolve_dependent(args)?),
        })
    }
}

impl Substitute for DeclSpecifiers {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        if let Some(name) = &self.type_name {
            name.collect_param_refs(out);
        }
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        Ok(DeclSpecifiers {
            flags: self.flags,
            type_name: resolve_opt(&self.type_name, args)?,
        })
    }
}

impl Substitute for DeclaratorNode {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        match &self.op {
            DeclaratorOp::Array(Some(bound)) => bound.collect_param_refs(out),
            DeclaratorOp::Function { params, .. } => {
                params.iter().for_each(|p| p.collect_param_refs(out));
            }
            _ => {}
        }
        if let Some(next) = &self.next {
            next.collect_param_refs(out);
        }
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        let op = match &self.op {
            DeclaratorOp::Array(bound) => DeclaratorOp::Array(resolve_opt(bound, args)?),
            DeclaratorOp::Function {
                params,
                variadic,
                cv,
            } => DeclaratorOp::Function {
                params: resolve_all(params, args)?,
                variadic: *variadic,
                cv: *cv,
            },
            other => other.clone(),
        };
        Ok(DeclaratorNode {
            op,
            next: resolve_opt(&self.next, args)?,
            span: self.span,
        })
    }
}

impl Substitute for ParameterNode {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        self.specifiers.collect_param_refs(out);
        if let Some(declarator) = &self.declarator {
            declarator.collect_param_refs(out);
        }
        if let Some(default) = &self.default {
            default.collect_param_refs(out);
        }
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        Ok(ParameterNode {
            specifiers: self.specifiers.resolve_dependent(args)?,
            declarator: resolve_opt(&self.declarator, args)?,
            default: resolve_opt(&self.default, args)?,
            span: self.span,
        })
    }
}

impl Substitute for TypeIdNode {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        self.specifiers.collect_param_refs(out);
        if let Some(declarator) = &self.declarator {
            declarator.collect_param_refs(out);
        }
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        Ok(TypeIdNode {
            specifiers: self.specifiers.resolve_dependent(args)?,
            declarator: resolve_opt(&self.declarator, args)?,
            span: self.span,
        })
    }
}

impl Substitute for TemplateIdNode {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        self.arguments.iter().for_each(|a| a.collect_param_refs(out));
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        let mut arguments = Vec::with_capacity(self.arguments.len());
        for arg in &self.arguments {
            match arg {
                Node::PackExpansion(expansion) => {
                    arguments.extend(expand_pack(expansion.pattern.as_ref(), args, expansion.span)?);
                }
                other => arguments.push(other.resolve_dependent(args)?),
            }
        }
        Ok(TemplateIdNode {
            template: self.template,
            name: self.name.clone(),
            arguments,
            span: self.span,
        })
    }
}

impl Substitute for BaseSpecifier {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        self.name.collect_param_refs(out);
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        if self.is_pack_expansion {
            return Err(SemaError::internal(
                "pack-expansion base specifier must be expanded by its class",
                self.span,
            ));
        }
        Ok(BaseSpecifier {
            access: self.access,
            is_virtual: self.is_virtual,
            name: self.name.resolve_dependent(args)?,
            is_pack_expansion: false,
            span: self.span,
        })
    }
}

impl Substitute for MemberNode {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        self.specifiers.collect_param_refs(out);
        if let Some(declarator) = &self.declarator {
            declarator.collect_param_refs(out);
        }
        if let Some(width) = &self.bit_width {
            width.collect_param_refs(out);
        }
        if let Some(init) = &self.initializer {
            init.collect_param_refs(out);
        }
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        Ok(MemberNode {
            access: self.access,
            specifiers: self.specifiers.resolve_dependent(args)?,
            declarator: resolve_opt(&self.declarator, args)?,
            bit_width: resolve_opt(&self.bit_width, args)?,
            initializer: resolve_opt(&self.initializer, args)?,
            span: self.span,
        })
    }
}

impl Substitute for StaticAssertNode {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        self.condition.collect_param_refs(out);
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        Ok(StaticAssertNode {
            condition: self.condition.resolve_dependent(args)?,
            message: self.message.clone(),
            span: self.span,
        })
    }
}

impl Substitute for ClassSpecifier {
    fn collect_param_refs(&self, out: &mut Vec<usize>) {
        self.bases.iter().for_each(|b| b.collect_param_refs(out));
        self.members.iter().for_each(|m| m.collect_param_refs(out));
    }

    fn resolve_dependent(&self, args: &TemplateArguments) -> SemaResult<Self> {
        Ok(ClassSpecifier {
            key: self.key,
            name: self.name.clone(),
            bases: expand_bases(&self.bases, args)?,
            members: resolve_all(&self.members, args)?,
            span: self.span,
        })
    }
}
