//! Wrappers over a TypeScript syntax tree that survive text edits.
//!
//! A [`Project`] owns source files. Every node handed out is a [`Node`], one
//! per underlying parse node, and keeps its identity across edits that do
//! not touch it. Edits go through the typed wrappers in [`ast`].

pub mod ast;
mod cache;
mod comments;
mod error;
mod manipulation;
mod node;
pub mod printers;
mod project;
pub mod settings;
pub mod structures;
mod symbol;
pub mod text;
mod types;
mod writer;

pub use ast::*;
pub use error::{Error, ErrorCategory, Result};
pub use morph_check::SymbolFlags;
pub use morph_syntax::SyntaxKind;
pub use node::Node;
pub use project::{CreateSourceFileOptions, Project};
pub use settings::{IndentationText, ManipulationSettings, NewLineKind, QuoteKind};
pub use symbol::Symbol;
pub use types::{Signature, Type};
pub use writer::CodeWriter;
