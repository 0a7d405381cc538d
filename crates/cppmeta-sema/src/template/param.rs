//! Template parameters and parameter lists.

use cppmeta_core::{Primitive, SemaError, SemaResult, Span};
use std::fmt;

use crate::ast::Node;

/// Whether a parameter (or argument) is a type or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Type,
    NonType,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Type => "type",
            ParamKind::NonType => "non-type",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One template parameter.
///
/// A default argument is kept as a (possibly dependent) tree; it may refer to
/// earlier parameters by index and is resolved during binding.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateParam {
    pub name: String,
    pub kind: ParamKind,
    /// Declared type of a non-type parameter, when it is a fundamental type.
    pub value_type: Option<Primitive>,
    pub is_pack: bool,
    pub default: Option<Node>,
    pub span: Span,
}

impl TemplateParam {
    /// `class Name` / `typename Name`.
    pub fn type_param(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Type,
            value_type: None,
            is_pack: false,
            default: None,
            span,
        }
    }

    /// `int Name`, `bool Name`, ...
    pub fn non_type(name: impl Into<String>, value_type: Primitive, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::NonType,
            value_type: Some(value_type),
            is_pack: false,
            default: None,
            span,
        }
    }

    pub fn pack(mut self) -> Self {
        self.is_pack = true;
        self
    }

    pub fn with_default(mut self, default: Node) -> Self {
        self.default = Some(default);
        self
    }

    /// Same kind, declared type and pack-ness.
    fn same_shape(&self, other: &TemplateParam) -> bool {
        self.kind == other.kind && self.value_type == other.value_type && self.is_pack == other.is_pack
    }
}

/// The ordered parameter list of a template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateParamList {
    params: Vec<TemplateParam>,
}

impl TemplateParamList {
    pub fn new(params: Vec<TemplateParam>) -> Self {
        Self { params }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TemplateParam> {
        self.params.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateParam> {
        self.params.iter()
    }

    /// Index of the parameter pack, if the list has one.
    pub fn pack_index(&self) -> Option<usize> {
        self.params.iter().position(|p| p.is_pack)
    }

    /// Number of parameters an argument list must supply at minimum.
    pub fn required_count(&self) -> usize {
        self.params
            .iter()
            .filter(|p| !p.is_pack && p.default.is_none())
            .count()
    }

    /// Check the shape rules of a single declaration's parameter list.
    ///
    /// A pack must be the last parameter and cannot have a default.
    pub fn validate(&self) -> SemaResult<()> {
        for (i, param) in self.params.iter().enumerate() {
            if param.is_pack && i + 1 != self.params.len() {
                return Err(SemaError::pack(
                    format!("template parameter pack '{}' must be the last template parameter", param.name),
                    param.span,
                ));
            }
            if param.is_pack && param.default.is_some() {
                return Err(SemaError::pack(
                    format!("template parameter pack '{}' cannot have a default argument", param.name),
                    param.span,
                ));
            }
        }
        Ok(())
    }

    /// Check that every parameter after a defaulted one is defaulted too.
    pub fn check_trailing_defaults(&self, template: &str, span: Span) -> SemaResult<()> {
        let mut seen_default = false;
        for (i, param) in self.params.iter().enumerate() {
            if param.default.is_some() {
                seen_default = true;
            } else if seen_default && !param.is_pack {
                return Err(SemaError::TemplateParamMismatch {
                    name: template.to_string(),
                    detail: format!("parameter {i} has no default argument after a defaulted parameter"),
                    span,
                });
            }
        }
        Ok(())
    }

    /// Merge the parameter list of a redeclaration into this one.
    ///
    /// Both lists must have the same length and positionally matching kinds
    /// and pack flags. Defaults are combined, but at most one declaration may
    /// supply a default for any given position. Nothing is changed unless the
    /// whole merge succeeds.
    pub fn merge(&mut self, incoming: TemplateParamList, template: &str, span: Span) -> SemaResult<()> {
        if self.params.len() != incoming.params.len() {
            return Err(SemaError::TemplateParamMismatch {
                name: template.to_string(),
                detail: format!(
                    "expected {} parameter(s), found {}",
                    self.params.len(),
                    incoming.params.len()
                ),
                span,
            });
        }

        for (i, (existing, new)) in self.params.iter().zip(&incoming.params).enumerate() {
            if !existing.same_shape(new) {
                return Err(SemaError::TemplateParamMismatch {
                    name: template.to_string(),
                    detail: format!("parameter {i} differs in kind or pack-ness"),
                    span: new.span,
                });
            }
            if existing.default.is_some() && new.default.is_some() {
                return Err(SemaError::DefaultRedefinition {
                    name: template.to_string(),
                    index: i,
                    span: new.span,
                });
            }
        }

        for (existing, new) in self.params.iter_mut().zip(incoming.params) {
            if existing.default.is_none() {
                existing.default = new.default;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TemplateParamList {
    type Item = &'a TemplateParam;
    type IntoIter = std::slice::Iter<'a, TemplateParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
