use text_size::TextRange;

use crate::{SyntaxKind, SyntaxNode, SyntaxTree};

/// A position-independent reference to a node: its kind and trimmed range.
///
/// Two trees parsed from texts that agree around a node produce equal pointers
/// for the corresponding nodes, which is what wrapper reconciliation keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxNodePtr {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl SyntaxNodePtr {
    pub fn new(node: SyntaxNode<'_>) -> Self {
        Self { kind: node.kind(), range: node.trimmed_range() }
    }

    /// Shifts or resizes the pointed-at range.
    pub fn with_range(self, range: TextRange) -> Self {
        Self { range, ..self }
    }

    /// Finds the outermost node of the same kind covering exactly this range.
    pub fn try_to_node(self, tree: &SyntaxTree) -> Option<SyntaxNode<'_>> {
        let covering = tree.root().covering_node(self.range);
        covering
            .ancestors()
            .take_while(|node| node.trimmed_range() == self.range)
            .filter(|node| node.kind() == self.kind)
            .last()
    }
}
