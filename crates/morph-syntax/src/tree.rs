//! Arena-backed syntax tree and the borrowed handles used to walk it.

use std::fmt;
use std::iter::successors;

use text_size::{TextRange, TextSize};

use crate::{SyntaxKind, TriviaPiece};

/// Index of a node (or token) inside one `SyntaxTree`.
///
/// Nodes are stored in preorder, so comparing indices compares document order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct NodeIndex(u32);

impl NodeIndex {
    pub const ROOT: Self = Self(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index.try_into().expect("syntax tree too large"))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) depth: u32,
    pub(crate) full_start: TextSize,
    pub(crate) start: TextSize,
    pub(crate) end: TextSize,
    pub(crate) children: (u32, u32),
    pub(crate) trivia: (u32, u32),
}

/// Owned syntax tree for a single source text.
pub struct SyntaxTree {
    pub(crate) text: Box<str>,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) children: Vec<NodeIndex>,
    pub(crate) trivia: Vec<TriviaPiece>,
}

impl SyntaxTree {
    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        self.node(NodeIndex::ROOT)
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, index }
    }

    /// Returns the node at `index` if the tree has one.
    pub fn get(&self, index: NodeIndex) -> Option<SyntaxNode<'_>> {
        (index.index() < self.nodes.len()).then(|| self.node(index))
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of nodes, tokens included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates every node and token in document order.
    pub fn preorder(&self) -> impl Iterator<Item = SyntaxNode<'_>> + '_ {
        (0..self.nodes.len()).map(|index| self.node(NodeIndex::new(index)))
    }

    #[inline]
    fn data(&self, index: NodeIndex) -> &NodeData {
        &self.nodes[index.index()]
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("text_len", &self.text.len())
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree,
    index: NodeIndex,
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxNode<'_> {}

impl<'a> SyntaxNode<'a> {
    #[inline]
    fn data(self) -> &'a NodeData {
        self.tree.data(self.index)
    }

    #[inline]
    pub fn tree(self) -> &'a SyntaxTree {
        self.tree
    }

    #[inline]
    pub fn index(self) -> NodeIndex {
        self.index
    }

    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.data().kind
    }

    #[inline]
    pub fn is_token(self) -> bool {
        self.kind().is_token()
    }

    /// Number of ancestors; the root has depth zero.
    #[inline]
    pub fn depth(self) -> u32 {
        self.data().depth
    }

    /// Returns the range including leading trivia.
    #[inline]
    pub fn text_range(self) -> TextRange {
        let data = self.data();
        TextRange::new(data.full_start, data.end)
    }

    /// Returns the range excluding leading trivia.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        let data = self.data();
        TextRange::new(data.start, data.end)
    }

    /// Returns the text including leading trivia.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the text excluding leading trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    #[inline]
    pub fn parent(self) -> Option<Self> {
        Some(self.tree.node(self.data().parent?))
    }

    /// Returns an iterator of ancestors, starting with this node.
    pub fn ancestors(self) -> impl Iterator<Item = Self> + Clone {
        successors(Some(self), |node| node.parent())
    }

    fn child_slice(self) -> &'a [NodeIndex] {
        let (start, len) = self.data().children;
        &self.tree.children[start as usize..(start + len) as usize]
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator + Clone {
        let tree = self.tree;
        self.child_slice().iter().map(move |&index| tree.node(index))
    }

    pub fn first_child(self) -> Option<Self> {
        self.children().next()
    }

    pub fn last_child(self) -> Option<Self> {
        self.children().next_back()
    }

    /// Position of this node among its parent's children.
    pub fn sibling_index(self) -> usize {
        match self.parent() {
            Some(parent) => parent
                .child_slice()
                .iter()
                .position(|&index| index == self.index)
                .unwrap_or_default(),
            None => 0,
        }
    }

    pub fn next_sibling(self) -> Option<Self> {
        let parent = self.parent()?;
        let slice = parent.child_slice();
        slice.get(self.sibling_index() + 1).map(|&index| self.tree.node(index))
    }

    pub fn prev_sibling(self) -> Option<Self> {
        let parent = self.parent()?;
        let position = self.sibling_index().checked_sub(1)?;
        Some(self.tree.node(parent.child_slice()[position]))
    }

    /// First direct child of the given kind.
    pub fn child(self, kind: SyntaxKind) -> Option<Self> {
        self.children().find(|child| child.kind() == kind)
    }

    pub fn children_of_kind(self, kind: SyntaxKind) -> impl Iterator<Item = Self> + Clone {
        self.children().filter(move |child| child.kind() == kind)
    }

    /// All nodes below this one in document order, excluding `self`.
    pub fn descendants(self) -> impl Iterator<Item = Self> + Clone {
        let tree = self.tree;
        let depth = self.depth();
        tree.nodes[self.index.index() + 1..]
            .iter()
            .take_while(move |data| data.depth > depth)
            .enumerate()
            .map(move |(offset, _)| tree.node(NodeIndex::new(self.index.index() + 1 + offset)))
    }

    /// The first token spanned by this node, if it spans any.
    pub fn first_token(self) -> Option<Self> {
        if self.is_token() {
            return Some(self);
        }
        self.children().find_map(Self::first_token)
    }

    pub fn last_token(self) -> Option<Self> {
        if self.is_token() {
            return Some(self);
        }
        self.children().rev().find_map(Self::last_token)
    }

    /// Leading trivia of the first token, with absolute ranges.
    pub fn leading_trivia(self) -> TriviaIter<'a> {
        match self.first_token() {
            Some(token) => {
                let data = token.data();
                let (start, len) = data.trivia;
                TriviaIter {
                    pieces: &self.tree.trivia[start as usize..(start + len) as usize],
                    offset: data.full_start,
                }
            }
            None => TriviaIter { pieces: &[], offset: self.data().full_start },
        }
    }

    /// Innermost node whose trimmed range contains `range`.
    pub fn covering_node(self, range: TextRange) -> Self {
        let mut node = self;
        'descend: loop {
            for child in node.children() {
                let child_range = child.trimmed_range();
                if child_range.contains_range(range) {
                    node = child;
                    continue 'descend;
                }
            }
            return node;
        }
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for node in std::iter::once(*self).chain(self.descendants()) {
                let depth = (node.depth() - self.depth()) as usize;
                write!(f, "{:indent$}", "", indent = depth * 2)?;
                if node.is_token() {
                    writeln!(f, "{:?}@{:?} {:?}", node.kind(), node.text_range(), node.text_trimmed())?;
                } else {
                    writeln!(f, "{:?}@{:?}", node.kind(), node.text_range())?;
                }
            }
            Ok(())
        } else {
            write!(f, "{:?}@{:?}", self.kind(), self.text_range())
        }
    }
}

/// Iterator over the trivia pieces in front of a token, with absolute ranges.
#[derive(Clone)]
pub struct TriviaIter<'a> {
    pieces: &'a [TriviaPiece],
    offset: TextSize,
}

impl Iterator for TriviaIter<'_> {
    type Item = (TriviaPiece, TextRange);

    fn next(&mut self) -> Option<Self::Item> {
        let (&piece, rest) = self.pieces.split_first()?;
        self.pieces = rest;
        let range = TextRange::at(self.offset, piece.len);
        self.offset = range.end();
        Some((piece, range))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pieces.len(), Some(self.pieces.len()))
    }
}

impl ExactSizeIterator for TriviaIter<'_> {}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use text_size::TextSize;

    use crate::SyntaxKind::*;
    use crate::{Builder, TriviaPiece, TriviaPieceKind};

    fn piece(kind: TriviaPieceKind, len: u32) -> TriviaPiece {
        TriviaPiece::new(kind, TextSize::new(len))
    }

    // "//a\nclass A {}"
    fn small_tree() -> crate::SyntaxTree {
        let mut builder = Builder::new("//a\nclass A {}");
        builder.start_node(SOURCE_FILE);
        builder.start_node(CLASS_DECLARATION);
        builder.token(
            &[piece(TriviaPieceKind::SingleLineComment, 3), piece(TriviaPieceKind::Newline, 1)],
            CLASS_KW,
            TextSize::new(5),
        );
        builder.token(&[piece(TriviaPieceKind::Whitespace, 1)], IDENTIFIER, 1.into());
        builder.token(&[piece(TriviaPieceKind::Whitespace, 1)], OPEN_BRACE, 1.into());
        builder.token(&[], CLOSE_BRACE, 1.into());
        builder.finish_node();
        builder.token(&[], EOF, 0.into());
        builder.finish_node();
        builder.finish()
    }

    #[test]
    fn dump() {
        let tree = small_tree();
        expect![[r#"
            SOURCE_FILE@0..14
              CLASS_DECLARATION@0..14
                CLASS_KW@0..9 "class"
                IDENTIFIER@9..11 "A"
                OPEN_BRACE@11..13 "{"
                CLOSE_BRACE@13..14 "}"
              EOF@14..14 ""
        "#]]
        .assert_eq(&format!("{:#?}", tree.root()));
    }

    #[test]
    fn positions_follow_leading_trivia() {
        let tree = small_tree();
        let class = tree.root().child(CLASS_DECLARATION).unwrap();
        assert_eq!(u32::from(class.text_range().start()), 0);
        assert_eq!(u32::from(class.trimmed_range().start()), 4);
        assert_eq!(class.text_trimmed(), "class A {}");

        let trivia = class.leading_trivia().map(|(piece, _)| piece.kind).collect::<Vec<_>>();
        assert_eq!(trivia, [TriviaPieceKind::SingleLineComment, TriviaPieceKind::Newline]);
    }

    #[test]
    fn navigation() {
        let tree = small_tree();
        let class = tree.root().first_child().unwrap();
        let name = class.child(IDENTIFIER).unwrap();
        assert_eq!(name.parent(), Some(class));
        assert_eq!(name.sibling_index(), 1);
        assert_eq!(name.next_sibling().map(|n| n.kind()), Some(OPEN_BRACE));
        assert_eq!(name.prev_sibling().map(|n| n.kind()), Some(CLASS_KW));
        assert_eq!(class.descendants().count(), 4);
        assert_eq!(name.ancestors().count(), 3);
        assert_eq!(tree.root().covering_node(name.trimmed_range()), name);
        assert_eq!(class.last_token().map(|n| n.kind()), Some(CLOSE_BRACE));
    }
}
