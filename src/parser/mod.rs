//! Source location bookkeeping shared by the AST and error reporting.
//!
//! Lexing and parsing a query document into an [`ast::Document`](crate::ast::Document)
//! is an external collaborator's job (see the crate-level docs); this module
//! only keeps the small amount of machinery needed to attach `line`/`column`
//! information to AST nodes and, from there, to the `locations` array of a
//! response error.

mod utils;

pub use self::utils::{SourcePosition, Span, Spanning};
