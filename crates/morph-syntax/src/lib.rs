//! Immutable, parent-linked syntax tree for the TypeScript declaration subset.
//!
//! Trivia is attached as *leading* trivia of the following token, so a node has
//! a full start (`pos`, trivia included) and a trimmed start. Trailing trivia of
//! a file belongs to its `EOF` token.

mod builder;
mod ptr;
mod syntax_kind;
mod syntax_set;
mod tree;
mod trivia;

/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
/// Position-independent pointer to a node of some tree.
pub use ptr::SyntaxNodePtr;
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Tree storage and borrowed node handles.
pub use tree::{NodeIndex, SyntaxNode, SyntaxTree, TriviaIter};
/// Trivia pieces attached to tokens.
pub use trivia::{TriviaPiece, TriviaPieceKind};
