//! Askew Compiler Core
//!
//! Compile-time component compiler for `.askew` sources: HTML-like files
//! declaring reusable UI components plus `.asite` site skeletons. This crate
//! is the semantic analyzer and IR builder: it walks parsed DOM trees
//! enriched with `a:*` elements and attributes, validates and normalizes
//! them, and produces a fully-resolved IR of templates, bindings, event
//! captures, embeds and control blocks. Code emission over the IR is a
//! separate stage; nothing in here runs at page load time.

pub mod attributes;
pub mod components;
pub mod dom;
pub mod error;
pub mod ir;
pub mod parsers;
pub mod project;
pub mod symbols;
pub mod units;
pub mod walker;

pub use error::{Error, ErrorKind, Result};

#[cfg(test)]
mod analyzer_spec;
