//! Source locations attached to syntax nodes, symbols and errors.

use std::fmt;

/// Position of a construct in a header, as the grammar reported it.
///
/// Lines and columns are 1-based; `len` is the byte length of the construct
/// on its first line. A default span (`0:0`) marks synthesized nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub line: u32,
    pub col: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Zero-length span at a position.
    #[inline]
    pub fn at(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this span was synthesized rather than read from source.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    /// Span starting at `self` and reaching the end of `other`.
    ///
    /// Spans on different lines keep `self`'s start and only its length.
    pub fn to(self, other: Span) -> Span {
        if self.line != other.line || other.col < self.col {
            return self;
        }
        let end = (other.col + other.len).max(self.col + self.len);
        Span::new(self.line, self.col, end - self.col)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            f.write_str("<synthesized>")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_extends_on_same_line() {
        let a = Span::new(3, 5, 3);
        let b = Span::new(3, 12, 4);
        assert_eq!(a.to(b), Span::new(3, 5, 11));
    }

    #[test]
    fn to_keeps_start_across_lines() {
        let a = Span::new(3, 5, 3);
        let b = Span::new(4, 1, 4);
        assert_eq!(a.to(b), a);
    }

    #[test]
    fn synthetic_display() {
        assert_eq!(Span::default().to_string(), "<synthesized>");
        assert_eq!(Span::at(7, 2).to_string(), "7:2");
    }
}
