//! Symbol kinds and lookup masks.

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// What a symbol denotes.
///
/// The discriminant doubles as the bit position of the kind in a
/// [`LookupMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SymbolKind {
    Namespace = 0,
    Class = 1,
    Enum = 2,
    Enumerator = 3,
    Typedef = 4,
    Function = 5,
    Object = 6,
    Template = 7,
    TemplateParam = 8,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Class => "class",
            SymbolKind::Enum => "enum",
            SymbolKind::Enumerator => "enumerator",
            SymbolKind::Typedef => "typedef",
            SymbolKind::Function => "function",
            SymbolKind::Object => "object",
            SymbolKind::Template => "template",
            SymbolKind::TemplateParam => "template parameter",
        }
    }

    /// The single-kind mask for this kind.
    pub fn mask(self) -> LookupMask {
        LookupMask::from_bits_truncate(1 << u8::from(self))
    }

    /// Whether a symbol of this kind can open a scope of its own.
    pub fn has_scope(self) -> bool {
        matches!(
            self,
            SymbolKind::Namespace | SymbolKind::Class | SymbolKind::Enum | SymbolKind::Template
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Set of symbol kinds a lookup accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LookupMask: u16 {
        const NAMESPACE      = 1 << 0;
        const CLASS          = 1 << 1;
        const ENUM           = 1 << 2;
        const ENUMERATOR     = 1 << 3;
        const TYPEDEF        = 1 << 4;
        const FUNCTION       = 1 << 5;
        const OBJECT         = 1 << 6;
        const TEMPLATE       = 1 << 7;
        const TEMPLATE_PARAM = 1 << 8;

        /// Anything usable as a type name.
        const TYPE = Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::TYPEDEF.bits()
            | Self::TEMPLATE_PARAM.bits();
        /// Anything usable in an expression.
        const VALUE = Self::ENUMERATOR.bits()
            | Self::FUNCTION.bits()
            | Self::OBJECT.bits()
            | Self::TEMPLATE_PARAM.bits();
        /// Anything a nested-name-specifier may name.
        const SCOPE = Self::NAMESPACE.bits() | Self::CLASS.bits() | Self::ENUM.bits();
        const ANY = u16::MAX >> 7;
    }
}

impl LookupMask {
    #[inline]
    pub fn accepts(self, kind: SymbolKind) -> bool {
        self.contains(kind.mask())
    }

    /// The kinds in this mask, in discriminant order.
    pub fn kinds(self) -> impl Iterator<Item = SymbolKind> {
        (0u8..16)
            .filter(move |bit| self.bits() & (1 << bit) != 0)
            .filter_map(|bit| SymbolKind::try_from(bit).ok())
    }
}

impl fmt::Display for LookupMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            f.write_str(kind.as_str())?;
        }
        Ok(())
    }
}
