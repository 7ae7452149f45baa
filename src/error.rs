use std::cmp::max;
use std::fmt;
use std::io;

use unicode_width::UnicodeWidthStr;

use crate::types::span::Span;

/// An error that can occur when compiling or rendering a template.
pub struct Error {
    kind: ErrorKind,
}

#[derive(Debug)]
enum ErrorKind {
    /// The template failed to compile, or its program is corrupt.
    InvalidTemplate {
        msg: String,
        pretty: Option<Pretty>,
    },
    /// A library render referred to a name that is not in the library.
    TemplateNotFound { name: String },
    /// Reading a template file failed.
    Io(io::Error),
    /// Converting render input into a value failed.
    #[cfg(feature = "serde")]
    Serialize(String),
}

/// The context needed to underline the offending template source.
#[derive(Debug)]
struct Pretty {
    source: String,
    span: Span,
}

impl Error {
    pub(crate) fn compile(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self {
            kind: ErrorKind::InvalidTemplate {
                msg: msg.into(),
                pretty: Some(Pretty {
                    source: source.to_string(),
                    span: span.into(),
                }),
            },
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidTemplate {
                msg: msg.into(),
                pretty: None,
            },
        }
    }

    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::TemplateNotFound { name: name.into() },
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn ser(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Serialize(msg.into()),
        }
    }

    /// Returns `true` if this error was caused by an invalid template.
    pub fn is_invalid_template(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidTemplate { .. })
    }

    /// Returns `true` if this error was caused by a missing template name.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::TemplateNotFound { .. })
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self {
            kind: ErrorKind::Io(err),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::ser(msg.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InvalidTemplate {
                msg,
                pretty: Some(pretty),
            } => fmt_pretty(msg, &pretty.source, pretty.span, f),
            kind => f.debug_struct("Error").field("kind", kind).finish(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InvalidTemplate {
                msg,
                pretty: Some(pretty),
            } => fmt_pretty(msg, &pretty.source, pretty.span, f),
            ErrorKind::InvalidTemplate { msg, pretty: None } => write!(f, "{msg}"),
            ErrorKind::TemplateNotFound { name } => write!(f, "template `{name}` not found"),
            ErrorKind::Io(_) => write!(f, "io error"),
            #[cfg(feature = "serde")]
            ErrorKind::Serialize(msg) => write!(f, "{msg}"),
        }
    }
}

fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, span.m);
    let width = max(1, source[span].width());
    let code = lines
        .get(line)
        .copied()
        .unwrap_or_else(|| lines.last().copied().unwrap_or(""));

    let num = (line + 1).to_string();
    let pad = num.width();
    let pipe = "|";
    let underline = "^".repeat(width);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = line.width() + 1;
        if n + len > offset {
            return (i, offset - n);
        }
        n += len;
    }
    (
        lines.len().saturating_sub(1),
        lines.last().map(|l| l.width()).unwrap_or(0),
    )
}
