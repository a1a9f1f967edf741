//! Trivia pieces attached to tokens.

use text_size::TextSize;

use crate::SyntaxKind;

/// Kinds of trivia stored in front of tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    Newline,
    SingleLineComment,
    MultiLineComment,
}

impl TriviaPieceKind {
    /// The kind a comment piece has once it is lifted out of trivia.
    pub fn comment_kind(self) -> Option<SyntaxKind> {
        match self {
            Self::SingleLineComment => Some(SyntaxKind::SINGLE_LINE_COMMENT),
            Self::MultiLineComment => Some(SyntaxKind::MULTI_LINE_COMMENT),
            Self::Whitespace | Self::Newline => None,
        }
    }
}

/// A run of trivia, measured in bytes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub len: TextSize,
}

impl TriviaPiece {
    pub fn new(kind: TriviaPieceKind, len: TextSize) -> Self {
        Self { kind, len }
    }
}
