//! Declaration-specifier flags and canonical primitive types.
//!
//! The grammar accumulates every keyword of a decl-specifier sequence into a
//! [`DeclFlags`] set (`long` seen twice sets [`DeclFlags::LONG_LONG`]). The
//! type-id graph keys primitive base nodes by the [`Primitive`] those flags
//! normalize to, so `signed int`, `int` and `signed` share one node.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Keywords seen in a decl-specifier sequence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeclFlags: u32 {
        // cv-qualifiers
        const CONST        = 1 << 0;
        const VOLATILE     = 1 << 1;

        // simple type specifiers
        const VOID         = 1 << 2;
        const BOOL         = 1 << 3;
        const CHAR         = 1 << 4;
        const WCHAR        = 1 << 5;
        const CHAR16       = 1 << 6;
        const CHAR32       = 1 << 7;
        const SHORT        = 1 << 8;
        const INT          = 1 << 9;
        const LONG         = 1 << 10;
        const LONG_LONG    = 1 << 11;
        const SIGNED       = 1 << 12;
        const UNSIGNED     = 1 << 13;
        const FLOAT        = 1 << 14;
        const DOUBLE       = 1 << 15;

        // storage class and function specifiers
        const STATIC       = 1 << 16;
        const EXTERN       = 1 << 17;
        const MUTABLE      = 1 << 18;
        const THREAD_LOCAL = 1 << 19;
        const INLINE       = 1 << 20;
        const VIRTUAL      = 1 << 21;
        const EXPLICIT     = 1 << 22;
        const CONSTEXPR    = 1 << 23;
        const FRIEND       = 1 << 24;
        const TYPEDEF      = 1 << 25;

        const CV = Self::CONST.bits() | Self::VOLATILE.bits();
        const TYPE_SPECIFIERS = Self::VOID.bits()
            | Self::BOOL.bits()
            | Self::CHAR.bits()
            | Self::WCHAR.bits()
            | Self::CHAR16.bits()
            | Self::CHAR32.bits()
            | Self::SHORT.bits()
            | Self::INT.bits()
            | Self::LONG.bits()
            | Self::LONG_LONG.bits()
            | Self::SIGNED.bits()
            | Self::UNSIGNED.bits()
            | Self::FLOAT.bits()
            | Self::DOUBLE.bits();
    }
}

bitflags! {
    /// cv-qualification of a type-id node or declarator operator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
    pub struct CvQualifiers: u8 {
        const CONST    = 1 << 0;
        const VOLATILE = 1 << 1;
    }
}

impl DeclFlags {
    /// The cv-qualifiers among these flags.
    pub fn cv(self) -> CvQualifiers {
        let mut cv = CvQualifiers::empty();
        if self.contains(DeclFlags::CONST) {
            cv |= CvQualifiers::CONST;
        }
        if self.contains(DeclFlags::VOLATILE) {
            cv |= CvQualifiers::VOLATILE;
        }
        cv
    }

    /// Whether any simple type specifier keyword is present.
    pub fn has_type_specifier(self) -> bool {
        self.intersects(DeclFlags::TYPE_SPECIFIERS)
    }
}

impl CvQualifiers {
    /// Itanium-style encoding (`V` before `K`).
    pub fn mangle(self) -> &'static str {
        match (
            self.contains(CvQualifiers::VOLATILE),
            self.contains(CvQualifiers::CONST),
        ) {
            (true, true) => "VK",
            (true, false) => "V",
            (false, true) => "K",
            (false, false) => "",
        }
    }
}

impl fmt::Display for CvQualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (
            self.contains(CvQualifiers::CONST),
            self.contains(CvQualifiers::VOLATILE),
        ) {
            (true, true) => f.write_str("const volatile"),
            (true, false) => f.write_str("const"),
            (false, true) => f.write_str("volatile"),
            (false, false) => Ok(()),
        }
    }
}

/// A fundamental type after normalization of its specifier keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Void,
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    WChar,
    Char16,
    Char32,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
}

impl Primitive {
    /// Normalize a decl-specifier flag set.
    ///
    /// Non-type flags (cv, storage class) are ignored. Returns a description
    /// of the problem when the keywords do not form a fundamental type.
    pub fn from_flags(flags: DeclFlags) -> Result<Primitive, String> {
        let ty = flags & DeclFlags::TYPE_SPECIFIERS;
        if ty.is_empty() {
            return Err("missing type specifier".to_string());
        }

        let exact = |only: DeclFlags, p: Primitive| if ty == only { Some(p) } else { None };
        let simple = exact(DeclFlags::VOID, Primitive::Void)
            .or_else(|| exact(DeclFlags::BOOL, Primitive::Bool))
            .or_else(|| exact(DeclFlags::FLOAT, Primitive::Float))
            .or_else(|| exact(DeclFlags::DOUBLE, Primitive::Double))
            .or_else(|| exact(DeclFlags::DOUBLE | DeclFlags::LONG, Primitive::LongDouble))
            .or_else(|| exact(DeclFlags::WCHAR, Primitive::WChar))
            .or_else(|| exact(DeclFlags::CHAR16, Primitive::Char16))
            .or_else(|| exact(DeclFlags::CHAR32, Primitive::Char32));
        if let Some(p) = simple {
            return Ok(p);
        }

        let signed = ty.contains(DeclFlags::SIGNED);
        let unsigned = ty.contains(DeclFlags::UNSIGNED);
        if signed && unsigned {
            return Err("both 'signed' and 'unsigned' specified".to_string());
        }
        let sign = DeclFlags::SIGNED | DeclFlags::UNSIGNED;

        if ty.contains(DeclFlags::CHAR) {
            if !(ty - sign - DeclFlags::CHAR).is_empty() {
                return Err(format!("invalid combination with 'char': {ty:?}"));
            }
            return Ok(if signed {
                Primitive::SignedChar
            } else if unsigned {
                Primitive::UnsignedChar
            } else {
                Primitive::Char
            });
        }

        let sizes = DeclFlags::SHORT | DeclFlags::LONG | DeclFlags::LONG_LONG;
        let rest = ty - sign - sizes - DeclFlags::INT;
        if !rest.is_empty() {
            return Err(format!("invalid combination of type specifiers: {ty:?}"));
        }

        let size = ty & sizes;
        let p = if size.is_empty() {
            if unsigned { Primitive::UnsignedInt } else { Primitive::Int }
        } else if size == DeclFlags::SHORT {
            if unsigned { Primitive::UnsignedShort } else { Primitive::Short }
        } else if size == DeclFlags::LONG {
            if unsigned { Primitive::UnsignedLong } else { Primitive::Long }
        } else if size.contains(DeclFlags::LONG_LONG) && !size.contains(DeclFlags::SHORT) {
            if unsigned { Primitive::UnsignedLongLong } else { Primitive::LongLong }
        } else {
            return Err(format!("conflicting size specifiers: {size:?}"));
        };
        Ok(p)
    }

    /// Spelling used in display names.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::SignedChar => "signed char",
            Primitive::UnsignedChar => "unsigned char",
            Primitive::WChar => "wchar_t",
            Primitive::Char16 => "char16_t",
            Primitive::Char32 => "char32_t",
            Primitive::Short => "short",
            Primitive::UnsignedShort => "unsigned short",
            Primitive::Int => "int",
            Primitive::UnsignedInt => "unsigned int",
            Primitive::Long => "long",
            Primitive::UnsignedLong => "unsigned long",
            Primitive::LongLong => "long long",
            Primitive::UnsignedLongLong => "unsigned long long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::LongDouble => "long double",
        }
    }

    /// Itanium builtin-type code.
    pub fn mangle(self) -> &'static str {
        match self {
            Primitive::Void => "v",
            Primitive::Bool => "b",
            Primitive::Char => "c",
            Primitive::SignedChar => "a",
            Primitive::UnsignedChar => "h",
            Primitive::WChar => "w",
            Primitive::Char16 => "Ds",
            Primitive::Char32 => "Di",
            Primitive::Short => "s",
            Primitive::UnsignedShort => "t",
            Primitive::Int => "i",
            Primitive::UnsignedInt => "j",
            Primitive::Long => "l",
            Primitive::UnsignedLong => "m",
            Primitive::LongLong => "x",
            Primitive::UnsignedLongLong => "y",
            Primitive::Float => "f",
            Primitive::Double => "d",
            Primitive::LongDouble => "e",
        }
    }

    pub fn is_integral(self) -> bool {
        !matches!(
            self,
            Primitive::Void | Primitive::Float | Primitive::Double | Primitive::LongDouble
        )
    }

    /// Inclusive range of an integral type on an LP64 target.
    pub fn integral_range(self) -> Option<(i128, i128)> {
        fn signed(bits: u32) -> Option<(i128, i128)> {
            Some((-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1))
        }
        fn unsigned(bits: u32) -> Option<(i128, i128)> {
            Some((0, (1i128 << bits) - 1))
        }
        match self {
            Primitive::Bool => Some((0, 1)),
            Primitive::Char | Primitive::SignedChar => signed(8),
            Primitive::UnsignedChar => unsigned(8),
            Primitive::Short => signed(16),
            Primitive::UnsignedShort | Primitive::Char16 => unsigned(16),
            Primitive::Int | Primitive::WChar => signed(32),
            Primitive::UnsignedInt | Primitive::Char32 => unsigned(32),
            Primitive::Long | Primitive::LongLong => signed(64),
            Primitive::UnsignedLong | Primitive::UnsignedLongLong => unsigned(64),
            Primitive::Void | Primitive::Float | Primitive::Double | Primitive::LongDouble => None,
        }
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Primitive::Bool
                | Primitive::UnsignedChar
                | Primitive::UnsignedShort
                | Primitive::UnsignedInt
                | Primitive::UnsignedLong
                | Primitive::UnsignedLongLong
                | Primitive::Char16
                | Primitive::Char32
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_spellings_normalize() {
        let int = Ok(Primitive::Int);
        assert_eq!(Primitive::from_flags(DeclFlags::INT), int);
        assert_eq!(Primitive::from_flags(DeclFlags::SIGNED), int);
        assert_eq!(Primitive::from_flags(DeclFlags::SIGNED | DeclFlags::INT), int);
        assert_eq!(
            Primitive::from_flags(DeclFlags::UNSIGNED),
            Ok(Primitive::UnsignedInt)
        );
        assert_eq!(
            Primitive::from_flags(DeclFlags::LONG | DeclFlags::INT),
            Ok(Primitive::Long)
        );
        assert_eq!(
            Primitive::from_flags(DeclFlags::UNSIGNED | DeclFlags::LONG_LONG),
            Ok(Primitive::UnsignedLongLong)
        );
    }

    #[test]
    fn char_signedness_is_distinct() {
        assert_eq!(Primitive::from_flags(DeclFlags::CHAR), Ok(Primitive::Char));
        assert_eq!(
            Primitive::from_flags(DeclFlags::CHAR | DeclFlags::SIGNED),
            Ok(Primitive::SignedChar)
        );
        assert_eq!(
            Primitive::from_flags(DeclFlags::CHAR | DeclFlags::UNSIGNED),
            Ok(Primitive::UnsignedChar)
        );
    }

    #[test]
    fn cv_and_storage_are_ignored() {
        let flags = DeclFlags::CONST | DeclFlags::STATIC | DeclFlags::DOUBLE;
        assert_eq!(Primitive::from_flags(flags), Ok(Primitive::Double));
        assert_eq!(flags.cv(), CvQualifiers::CONST);
    }

    #[test]
    fn invalid_combinations() {
        assert!(Primitive::from_flags(DeclFlags::empty()).is_err());
        assert!(Primitive::from_flags(DeclFlags::SIGNED | DeclFlags::UNSIGNED).is_err());
        assert!(Primitive::from_flags(DeclFlags::FLOAT | DeclFlags::UNSIGNED).is_err());
        assert!(Primitive::from_flags(DeclFlags::SHORT | DeclFlags::LONG).is_err());
        assert!(Primitive::from_flags(DeclFlags::CHAR | DeclFlags::INT).is_err());
    }

    #[test]
    fn integral_ranges_follow_width_and_sign() {
        assert_eq!(Primitive::UnsignedChar.integral_range(), Some((0, 255)));
        assert_eq!(Primitive::Char.integral_range(), Some((-128, 127)));
        assert_eq!(Primitive::Short.integral_range(), Some((-32768, 32767)));
        assert_eq!(Primitive::Char16.integral_range(), Some((0, 65535)));
        assert_eq!(Primitive::Char32.integral_range(), Some((0, u32::MAX as i128)));
        assert_eq!(Primitive::WChar.integral_range(), Some((i32::MIN as i128, i32::MAX as i128)));
        assert_eq!(Primitive::Long.integral_range(), Some((i64::MIN as i128, i64::MAX as i128)));
        assert_eq!(Primitive::UnsignedLongLong.integral_range(), Some((0, u64::MAX as i128)));
        assert_eq!(Primitive::Double.integral_range(), None);
    }

    #[test]
    fn cv_mangling_order() {
        assert_eq!(CvQualifiers::CONST.mangle(), "K");
        assert_eq!((CvQualifiers::CONST | CvQualifiers::VOLATILE).mangle(), "VK");
        assert_eq!(CvQualifiers::empty().mangle(), "");
    }
}
