//! Attribute Micro-Grammars
//!
//! Hand-written recursive-descent parsers for the small languages living in
//! compiler attributes: bound values, assignments, bindings, captures,
//! handler signatures, field lists, loop headers, argument lists and import
//! declarations. Each returns typed values from the IR; none of them touch
//! the DOM.

mod arguments;
mod assignments;
mod bindings;
mod bound;
mod captures;
mod control;
mod fields;
mod imports;
mod scanner;
mod signatures;

pub use arguments::analyse_arguments;
pub use assignments::parse_assignments;
pub use bindings::parse_bindings;
pub use bound::{parse_bound, BoundContext};
pub use captures::parse_captures;
pub use control::{parse_for, ForLoop};
pub use fields::parse_fields;
pub use imports::parse_imports;
pub use scanner::Scanner;
pub use signatures::{parse_handlers, parse_params, RawHandler};
