//! Binding supplied template arguments to a template's parameters.

use cppmeta_core::{ConstValue, Primitive, SemaError, SemaResult, Span};

use super::{ParamKind, TemplateArgument, TemplateArguments, TemplateParam};
use crate::ast::{Node, Substitute};
use crate::context::SemaContext;
use crate::symbols::{SymbolData, SymbolId};

impl SemaContext {
    /// Bind `supplied` to the parameters of `template`.
    ///
    /// Arguments bind positionally; type arguments lose their top-level cv
    /// qualifiers. A parameter pack absorbs every remaining
    /// argument (possibly none) into one [`TemplateArgument::Pack`]. A
    /// parameter left without an argument takes its default, which is first
    /// substituted with the arguments bound before it.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn bind_arguments(
        &mut self,
        template: SymbolId,
        supplied: &[Node],
        span: Span,
    ) -> SemaResult<TemplateArguments> {
        self.bind_with_sources(template, supplied, span).map(|(args, _)| args)
    }

    /// [`bind_arguments`](Self::bind_arguments), plus the source form of
    /// every bound argument with pack elements flattened. Defaulted
    /// arguments contribute their substituted default.
    pub(crate) fn bind_with_sources(
        &mut self,
        template: SymbolId,
        supplied: &[Node],
        span: Span,
    ) -> SemaResult<(TemplateArguments, Vec<String>)> {
        let symbol = self.table.symbol(template);
        let Some(data) = symbol.as_template() else {
            return Err(SemaError::NotATemplate {
                name: symbol.name().to_string(),
                span,
            });
        };

        // Clone data we need before mutable borrow
        let name = symbol.name().to_string();
        let params = data.params.clone();

        if let Some(expansion) = supplied.iter().find(|arg| matches!(arg, Node::PackExpansion(_))) {
            return Err(SemaError::pack(
                format!("'{expansion}' expands a pack outside of a template"),
                expansion.span(),
            ));
        }
        if params.pack_index().is_none() && supplied.len() > params.len() {
            return Err(SemaError::TooManyTemplateArguments {
                template: name,
                expected: params.len(),
                got: supplied.len(),
                span,
            });
        }

        let mut args = TemplateArguments::default();
        let mut sources = Vec::with_capacity(supplied.len());
        for (index, param) in params.iter().enumerate() {
            // 1. A pack takes everything that is left
            if param.is_pack {
                let rest = supplied.get(index..).unwrap_or(&[]);
                let elements = rest
                    .iter()
                    .enumerate()
                    .map(|(offset, arg)| self.bind_one(&name, index + offset, param, arg))
                    .collect::<SemaResult<Vec<_>>>()?;
                sources.extend(rest.iter().map(ToString::to_string));
                args.push(TemplateArgument::Pack {
                    kind: param.kind,
                    elements,
                });
                continue;
            }

            // 2. Positional argument
            if let Some(arg) = supplied.get(index) {
                let bound = self.bind_one(&name, index, param, arg)?;
                sources.push(arg.to_string());
                args.push(bound);
                continue;
            }

            // 3. Default, which may mention earlier parameters
            let Some(default) = &param.default else {
                return Err(SemaError::TooFewTemplateArguments {
                    template: name,
                    expected: params.required_count(),
                    got: supplied.len(),
                    span,
                });
            };
            let resolved = default.resolve_dependent(&args)?;
            let bound = self.bind_one(&name, index, param, &resolved)?;
            sources.push(resolved.to_string());
            args.push(bound);
        }
        Ok((args, sources))
    }

    fn bind_one(
        &mut self,
        template: &str,
        index: usize,
        param: &TemplateParam,
        arg: &Node,
    ) -> SemaResult<TemplateArgument> {
        let is_type = self.is_type_argument(arg);
        match param.kind {
            ParamKind::Type => {
                if !is_type {
                    return Err(SemaError::ArgumentKindMismatch {
                        template: template.to_string(),
                        index,
                        expected: ParamKind::Type.as_str(),
                        span: arg.span(),
                    });
                }
                let resolved = self.resolve_type_node(arg)?;
                let type_id = self.types.strip_top_level_cv(resolved);
                Ok(TemplateArgument::type_arg(type_id, self.type_display(type_id)))
            }
            ParamKind::NonType => {
                if is_type {
                    return Err(SemaError::ArgumentKindMismatch {
                        template: template.to_string(),
                        index,
                        expected: ParamKind::NonType.as_str(),
                        span: arg.span(),
                    });
                }
                let value = arg.evaluate(&self.table)?;
                let value = match param.value_type {
                    Some(prim) => convert_constant(value, prim, arg.span())?,
                    None => value,
                };
                Ok(TemplateArgument::Value(value))
            }
        }
    }

    /// Whether an argument denotes a type rather than a value.
    fn is_type_argument(&self, arg: &Node) -> bool {
        if arg.is_type_syntax() {
            return true;
        }
        match arg {
            Node::Name(name) => match self.table.symbol(name.symbol).data() {
                SymbolData::Class(_) | SymbolData::Enum(_) | SymbolData::Typedef(_) => true,
                SymbolData::TemplateParam(param) => param.kind == ParamKind::Type,
                _ => false,
            },
            Node::Paren(paren) => self.is_type_argument(&paren.inner),
            _ => false,
        }
    }
}

/// Convert a constant to the declared type of the entity receiving it.
///
/// Integral targets reject floating values and values outside the target's
/// range; `bool` takes the truth value.
pub(crate) fn convert_constant(value: ConstValue, target: Primitive, span: Span) -> SemaResult<ConstValue> {
    let out_of_range = || SemaError::not_constant(format!("{value} does not fit in '{target}'"), span);
    match target {
        Primitive::Void => Err(SemaError::InvalidTypeSpecifier {
            detail: "constant of type 'void'".to_string(),
            span,
        }),
        Primitive::Bool => Ok(ConstValue::Bool(value.is_truthy())),
        Primitive::Float | Primitive::Double | Primitive::LongDouble => {
            Ok(ConstValue::float(value.as_f64()))
        }
        _ if !value.is_integral() => Err(SemaError::not_constant(
            format!("{value} is not an integral constant"),
            span,
        )),
        _ => {
            let (min, max) = target.integral_range().ok_or_else(out_of_range)?;
            let wide = value
                .as_i128()
                .filter(|v| (min..=max).contains(v))
                .ok_or_else(out_of_range)?;
            let converted = if target.is_unsigned() {
                u64::try_from(wide).ok().map(ConstValue::UInt)
            } else {
                i64::try_from(wide).ok().map(ConstValue::Int)
            };
            converted.ok_or_else(out_of_range)
        }
    }
}
