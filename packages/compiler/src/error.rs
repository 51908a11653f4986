//! Compile Errors
//!
//! All analyzer failures are compile-time errors. Messages are built
//! incrementally while unwinding: the innermost site emits `": <reason>"`,
//! walker frames prepend the element they were visiting and the file driver
//! prepends the source path. Line numbers are not tracked.

use thiserror::Error;

/// Cause category for a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed source markup.
    Parse,
    /// A micro-grammar rejected the body of a compiler attribute.
    AttributeParse,
    /// A required attribute is absent or empty.
    MissingAttribute,
    /// An element appears in a place or shape the language forbids.
    Structural,
    /// An unknown component, alias, handler, form value or parameter name.
    NameResolution,
    /// Argument count does not match the target's parameter count.
    Arity,
    /// A type outside the set permitted at this site.
    TypeRestriction,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{msg}")]
pub struct Error {
    pub kind: ErrorKind,
    msg: String,
}

impl Error {
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Error {
            kind,
            msg: msg.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Error::new(ErrorKind::Parse, msg)
    }

    pub fn attribute_parse(msg: impl Into<String>) -> Self {
        Error::new(ErrorKind::AttributeParse, msg)
    }

    pub fn missing_attribute(msg: impl Into<String>) -> Self {
        Error::new(ErrorKind::MissingAttribute, msg)
    }

    pub fn structural(msg: impl Into<String>) -> Self {
        Error::new(ErrorKind::Structural, msg)
    }

    pub fn name_resolution(msg: impl Into<String>) -> Self {
        Error::new(ErrorKind::NameResolution, msg)
    }

    pub fn arity(msg: impl Into<String>) -> Self {
        Error::new(ErrorKind::Arity, msg)
    }

    pub fn type_restriction(msg: impl Into<String>) -> Self {
        Error::new(ErrorKind::TypeRestriction, msg)
    }

    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Prepend an arbitrary context string to the message.
    pub fn prefixed(mut self, context: &str) -> Self {
        self.msg = format!("{}{}", context, self.msg);
        self
    }

    /// Prepend the element a walker frame was visiting when the error
    /// surfaced.
    pub fn in_element(mut self, name: &str) -> Self {
        if self.msg.starts_with(':') {
            self.msg = format!("<{}>{}", name, self.msg);
        } else {
            self.msg = format!("<{}>: {}", name, self.msg);
        }
        self
    }

    /// Prepend the source file path at the outermost driver frame.
    pub fn in_file(mut self, path: &str) -> Self {
        if self.msg.starts_with(':') {
            self.msg = format!("{}{}", path, self.msg);
        } else {
            self.msg = format!("{}: {}", path, self.msg);
        }
        self
    }
}

pub type Result<T> = std::result::Result<T, Error>;
