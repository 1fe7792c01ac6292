use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SrcPos {
    pub pos: usize,
    pub line_pos: usize,
    pub line: usize,
}

impl fmt::Display for SrcPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.line_pos)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SrcSpan {
    pub start: SrcPos,
    pub end: SrcPos,
}

impl fmt::Display for SrcSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A value paired with the source region it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Span<T> {
    pub src_span: SrcSpan,
    pub kind: T,
}

impl<T> Span<T> {
    pub fn new(src_span: SrcSpan, kind: T) -> Self {
        Span { src_span, kind }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Span<U> {
        Span {
            src_span: self.src_span,
            kind: f(self.kind),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Span<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.src_span, self.kind)
    }
}
