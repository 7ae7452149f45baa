//! Defines a [`Span`] which is used to represent a region in the template
//! source code.

use std::ops::{Index, Range};

/// A byte range in the template source.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub m: usize,
    pub n: usize,
}

impl Index<Span> for str {
    type Output = str;

    fn index(&self, span: Span) -> &Self::Output {
        let Span { m, n } = span;
        &self[m..n]
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Self {
            m: r.start,
            n: r.end,
        }
    }
}

impl std::fmt::Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&(self.m..self.n), f)
    }
}
