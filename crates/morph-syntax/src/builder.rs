//! Incremental builder for the immutable syntax tree.

use text_size::TextSize;

use crate::tree::NodeData;
use crate::{NodeIndex, SyntaxKind, SyntaxTree, TriviaPiece};

struct Opened {
    node: NodeIndex,
    children: Vec<NodeIndex>,
    has_token: bool,
}

/// Builds a `SyntaxTree` from parser events.
pub struct Builder {
    text: Box<str>,
    nodes: Vec<NodeData>,
    children: Vec<NodeIndex>,
    trivia: Vec<TriviaPiece>,

    children_pool: Vec<Vec<NodeIndex>>,
    opened: Vec<Opened>,
    offset: TextSize,
    last_token_end: TextSize,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 64;
const DEFAULT_CHILDREN_LEN: usize = 8;

impl Builder {
    pub fn new(text: &str) -> Self {
        let estimated = text.len() / 4 + 1;
        Self {
            text: text.into(),
            nodes: Vec::with_capacity(estimated),
            children: Vec::with_capacity(estimated),
            trivia: Vec::with_capacity(estimated / 2),
            children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            offset: TextSize::new(0),
            last_token_end: TextSize::new(0),
        }
    }

    fn new_children_vec(&mut self) -> Vec<NodeIndex> {
        self.children_pool.pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN))
    }

    fn push(&mut self, kind: SyntaxKind, full_start: TextSize, start: TextSize) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        let parent = self.opened.last_mut().map(|opened| {
            opened.children.push(index);
            opened.node
        });
        self.nodes.push(NodeData {
            kind,
            parent,
            depth: self.opened.len() as u32,
            full_start,
            start,
            end: start,
            children: (0, 0),
            trivia: (0, 0),
        });
        index
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        let node = self.push(kind, self.offset, self.offset);
        let children = self.new_children_vec();
        self.opened.push(Opened { node, children, has_token: false });
    }

    /// Finishes the most recently started node.
    pub fn finish_node(&mut self) {
        let Opened { node, mut children, has_token } =
            self.opened.pop().expect("no opened nodes?");
        let data = &mut self.nodes[node.index()];
        if has_token {
            data.end = self.last_token_end;
        }
        data.children = (self.children.len() as u32, children.len() as u32);
        self.children.append(&mut children);
        self.children_pool.push(children);
    }

    /// Adds a token preceded by its leading trivia.
    pub fn token(&mut self, leading_trivia: &[TriviaPiece], kind: SyntaxKind, len: TextSize) {
        assert!(!self.opened.is_empty(), "tokens must be added inside a node");

        let full_start = self.offset;
        let trivia_len = leading_trivia.iter().fold(TextSize::new(0), |len, piece| len + piece.len);
        let start = full_start + trivia_len;
        let end = start + len;
        assert!(self.text.is_char_boundary(usize::from(end)));

        let token = self.push(kind, full_start, start);
        let data = &mut self.nodes[token.index()];
        data.end = end;
        data.trivia = (self.trivia.len() as u32, leading_trivia.len() as u32);
        self.trivia.extend_from_slice(leading_trivia);

        for opened in self.opened.iter_mut().rev() {
            if opened.has_token {
                break;
            }
            opened.has_token = true;
            self.nodes[opened.node.index()].start = start;
        }

        self.offset = end;
        self.last_token_end = end;
    }

    /// Completes the tree. All nodes must be finished and all text consumed.
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes left in the builder");
        debug_assert_eq!(self.offset, TextSize::of(&*self.text), "the tree must cover the whole text");

        SyntaxTree {
            text: std::mem::take(&mut self.text),
            nodes: std::mem::take(&mut self.nodes),
            children: std::mem::take(&mut self.children),
            trivia: std::mem::take(&mut self.trivia),
        }
    }
}
