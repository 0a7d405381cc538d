//! Bound template arguments.

use cppmeta_core::ConstValue;
use std::fmt;

use super::ParamKind;
use crate::type_id::TypeIdRef;

/// One bound argument.
///
/// Type arguments compare by canonical type-id only; `text` is the spelling
/// used for display and does not take part in identity.
#[derive(Debug, Clone)]
pub enum TemplateArgument {
    Type { type_id: TypeIdRef, text: String },
    Value(ConstValue),
    /// Everything a parameter pack absorbed, in order.
    Pack {
        kind: ParamKind,
        elements: Vec<TemplateArgument>,
    },
}

impl TemplateArgument {
    pub fn type_arg(type_id: TypeIdRef, text: impl Into<String>) -> Self {
        TemplateArgument::Type {
            type_id,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            TemplateArgument::Type { .. } => ParamKind::Type,
            TemplateArgument::Value(_) => ParamKind::NonType,
            TemplateArgument::Pack { kind, .. } => *kind,
        }
    }

    pub fn as_type(&self) -> Option<TypeIdRef> {
        match self {
            TemplateArgument::Type { type_id, .. } => Some(*type_id),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<ConstValue> {
        match self {
            TemplateArgument::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn pack_elements(&self) -> Option<&[TemplateArgument]> {
        match self {
            TemplateArgument::Pack { elements, .. } => Some(elements),
            _ => None,
        }
    }
}

impl PartialEq for TemplateArgument {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TemplateArgument::Type { type_id: a, .. }, TemplateArgument::Type { type_id: b, .. }) => {
                a == b
            }
            (TemplateArgument::Value(a), TemplateArgument::Value(b)) => a == b,
            (
                TemplateArgument::Pack {
                    kind: ka,
                    elements: ea,
                },
                TemplateArgument::Pack {
                    kind: kb,
                    elements: eb,
                },
            ) => ka == kb && ea == eb,
            _ => false,
        }
    }
}

impl fmt::Display for TemplateArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateArgument::Type { text, .. } => f.write_str(text),
            TemplateArgument::Value(v) => write!(f, "{v}"),
            TemplateArgument::Pack { elements, .. } => {
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                Ok(())
            }
        }
    }
}

/// The ordered argument vector of one instantiation, indexed by parameter position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateArguments {
    args: Vec<TemplateArgument>,
}

impl TemplateArguments {
    pub fn new(args: Vec<TemplateArgument>) -> Self {
        Self { args }
    }

    pub fn push(&mut self, arg: TemplateArgument) {
        self.args.push(arg);
    }

    pub fn get(&self, index: usize) -> Option<&TemplateArgument> {
        self.args.get(index)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateArgument> {
        self.args.iter()
    }

    pub fn as_slice(&self) -> &[TemplateArgument] {
        &self.args
    }

    /// A copy in which every listed pack slot is replaced by its `element`-th element.
    ///
    /// Used to substitute one repetition of a pack-expansion pattern.
    pub fn with_pack_element(&self, packs: &[usize], element: usize) -> Self {
        let mut args = self.args.clone();
        for &slot in packs {
            let replacement = args
                .get(slot)
                .and_then(TemplateArgument::pack_elements)
                .and_then(|elements| elements.get(element))
                .cloned();
            if let Some(replacement) = replacement {
                args[slot] = replacement;
            }
        }
        Self { args }
    }
}

impl From<Vec<TemplateArgument>> for TemplateArguments {
    fn from(args: Vec<TemplateArgument>) -> Self {
        Self::new(args)
    }
}

impl<'a> IntoIterator for &'a TemplateArguments {
    type Item = &'a TemplateArgument;
    type IntoIter = std::slice::Iter<'a, TemplateArgument>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}
