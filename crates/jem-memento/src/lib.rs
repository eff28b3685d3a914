//! Handle identifiers ("mementos") for elements of a Java model.
//!
//! A memento is a compact, escaped string naming one element: project, package fragment root,
//! package, compilation unit or class file, and any member below them. This crate provides:
//! - Escaping of the reserved sigil characters.
//! - A [`HandlePath`] value describing an element independent of any live model.
//! - [`encode`] producing the canonical memento of a path.
//! - [`decode`] reconstructing an element against a caller-supplied model, tolerating stale and
//!   truncated input.

#![forbid(unsafe_code)]

mod decode;
mod encode;
mod error;
mod escape;
mod model;
mod node;
mod occurrence;
mod path;
mod sigil;
mod tokenizer;

pub use decode::{decode, parse, try_parse, ChildFactory, Decoder, Element, RootResolver};
pub use encode::encode;
pub use error::{MementoError, PathError, Result};
pub use escape::{escape, escape_into, unescape};
pub use model::InMemoryModel;
pub use node::{
    ClasspathAttribute, LambdaExpression, LambdaMethod, LambdaParameter, LocalVariable, Node,
    NodeKind, RootKind, RootSegment,
};
pub use occurrence::assign_occurrences;
pub use path::HandlePath;
pub use sigil::{is_reserved, Sigil, ESCAPE};
pub use tokenizer::{MementoTokenizer, Token};
