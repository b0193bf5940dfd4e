use backtrace::Backtrace;
use std::fmt::{Debug, Display, Formatter};

pub struct Error(pub(crate) Box<Inner>);

impl Error {
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.0.kind
    }

    #[inline]
    pub fn is_syntax(&self) -> bool {
        matches!(self.0.kind, ErrorKind::Syntax(_))
    }

    #[inline]
    pub fn is_parse(&self) -> bool {
        matches!(self.0.kind, ErrorKind::Parse(_))
    }

    /// A schema or annotation misuse error.
    #[cold]
    #[inline(never)]
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::from(ErrorKind::Syntax(msg.into()))
    }

    /// A malformed wire data error.
    #[cold]
    #[inline(never)]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::from(ErrorKind::Parse(msg.into()))
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn truncated() -> Self {
        Self::from(ErrorKind::Parse("unexpected end of input".into()))
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Error(Box::new(Inner::from(kind)))
    }
}

impl Debug for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0.kind)?;
        let mut backtrace = self.0.backtrace.clone();
        backtrace.resolve();
        writeln!(f, "{backtrace:?}")
    }
}

impl std::error::Error for Error {}

#[derive(Debug)]
pub(crate) struct Inner {
    pub(crate) kind: ErrorKind,
    pub(crate) backtrace: Backtrace,
}

impl From<ErrorKind> for Inner {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::new_unresolved(),
        }
    }
}

/// The two failure classes: schema misuse and malformed wire data.
#[derive(Debug)]
pub enum ErrorKind {
    Syntax(String),
    Parse(String),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax(msg) => write!(f, "syntax error: {msg}"),
            ErrorKind::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}
