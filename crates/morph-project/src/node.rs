use std::fmt;
use std::hash::{Hash, Hasher};

use morph_inputs::File;
use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::{NodeIndex, SyntaxNode};
use text_size::{TextRange, TextSize};

use crate::ast::{AstNode, NodeVariant, SourceFile};
use crate::cache::{NodeId, SlotState};
use crate::comments::{ExtendedChild, extended_children};
use crate::error::{Error, OrNotFound as _, Result};
use crate::manipulation::Splice;
use crate::project::Project;
use crate::symbol::Symbol;
use crate::text::indentation_at;
use crate::types::{Signature, Type};

/// The wrapper of one syntax node or comment range.
///
/// Wrappers are handles: copies compare equal, and there is at most one live
/// wrapper per node. After an edit the wrapper either follows its node into
/// the new tree or is forgotten, and every fallible method of a forgotten
/// wrapper fails with [`Error::InvalidatedNode`].
#[derive(Clone, Copy)]
pub struct Node<'p> {
    project: &'p Project,
    id: NodeId,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.project, other.project) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Node");
        debug.field("kind", &self.kind());
        match self.range() {
            Ok(range) => debug.field("range", &range),
            Err(_) => debug.field("forgotten", &true),
        };
        debug.finish()
    }
}

impl<'p> Node<'p> {
    pub(crate) fn new(project: &'p Project, id: NodeId) -> Self {
        Self { project, id }
    }

    pub fn project(self) -> &'p Project {
        self.project
    }

    pub fn kind(self) -> SyntaxKind {
        self.project.cache.borrow().slot(self.id).kind
    }

    pub fn is_forgotten(self) -> bool {
        self.state() == SlotState::Forgotten
    }

    pub fn is_comment(self) -> bool {
        matches!(self.state(), SlotState::Comment { .. })
    }

    pub(crate) fn id(self) -> NodeId {
        self.id
    }

    pub(crate) fn file(self) -> File {
        self.project.cache.borrow().slot(self.id).file
    }

    fn state(self) -> SlotState {
        self.project.cache.borrow().slot(self.id).state
    }

    pub(crate) fn invalidated(self) -> Error {
        Error::InvalidatedNode { kind: self.kind() }
    }

    /// The node's index in the current tree of its file.
    pub(crate) fn index(self) -> Result<NodeIndex> {
        match self.state() {
            SlotState::Live(index) => Ok(index),
            SlotState::Comment { .. } => {
                Err(Error::invalid(format!("a {:?} range is not a syntax node", self.kind())))
            }
            SlotState::Forgotten => Err(self.invalidated()),
        }
    }

    /// Runs `f` on the underlying node. No project state is borrowed while
    /// `f` runs.
    pub(crate) fn with_syntax<R>(self, f: impl FnOnce(SyntaxNode<'_>) -> R) -> Result<R> {
        let index = self.index()?;
        let tree = self.project.tree_of(self.file()).ok_or_else(|| self.invalidated())?;
        Ok(f(tree.node(index)))
    }

    pub(crate) fn wrap_index(self, index: NodeIndex) -> Result<Node<'p>> {
        self.project.wrap(self.file(), index).ok_or_else(|| self.invalidated())
    }

    pub(crate) fn wrap_child(self, child: ExtendedChild) -> Result<Node<'p>> {
        match child {
            ExtendedChild::Node { index, .. } => self.wrap_index(index),
            ExtendedChild::Comment { kind, range, .. } => {
                let file = self.file();
                let id = self.project.cache.borrow_mut().get_or_create_comment(
                    file,
                    self.id,
                    kind,
                    range,
                );
                let id = id.ok_or_else(|| self.invalidated())?;
                Ok(Node::new(self.project, id))
            }
        }
    }

    /// The range without leading trivia.
    pub fn range(self) -> Result<TextRange> {
        match self.state() {
            SlotState::Live(_) => self.with_syntax(|node| node.trimmed_range()),
            SlotState::Comment { range, .. } => Ok(range),
            SlotState::Forgotten => Err(self.invalidated()),
        }
    }

    /// The range including leading trivia. For a comment range it starts
    /// where the previous sibling ends.
    pub fn full_range(self) -> Result<TextRange> {
        match self.state() {
            SlotState::Live(_) => self.with_syntax(|node| node.text_range()),
            SlotState::Comment { parent, range } => {
                let full_range = Node::new(self.project, parent).with_syntax(|parent| {
                    extended_children(parent).into_iter().find_map(|child| match child {
                        ExtendedChild::Comment { range: comment, full_range, .. }
                            if comment == range =>
                        {
                            Some(full_range)
                        }
                        _ => None,
                    })
                })?;
                Ok(full_range.unwrap_or(range))
            }
            SlotState::Forgotten => Err(self.invalidated()),
        }
    }

    pub fn pos(self) -> Result<TextSize> {
        Ok(self.full_range()?.start())
    }

    pub fn start(self) -> Result<TextSize> {
        Ok(self.range()?.start())
    }

    pub fn end(self) -> Result<TextSize> {
        Ok(self.range()?.end())
    }

    pub fn text(self) -> Result<String> {
        let range = self.range()?;
        self.slice(range)
    }

    pub fn full_text(self) -> Result<String> {
        let range = self.full_range()?;
        self.slice(range)
    }

    fn slice(self, range: TextRange) -> Result<String> {
        let tree = self.project.tree_of(self.file()).ok_or_else(|| self.invalidated())?;
        Ok(tree.text()[range].to_owned())
    }

    pub fn parent(self) -> Result<Option<Node<'p>>> {
        match self.state() {
            SlotState::Comment { parent, .. } => Ok(Some(Node::new(self.project, parent))),
            _ => {
                let parent = self.with_syntax(|node| node.parent().map(SyntaxNode::index))?;
                parent.map(|index| self.wrap_index(index)).transpose()
            }
        }
    }

    pub fn parent_or_err(self) -> Result<Node<'p>> {
        self.parent().or_not_found(|| format!("Expected to find the parent of {:?}.", self.kind()))
    }

    /// Child nodes and tokens. Comment ranges have none.
    pub fn children(self) -> Result<Vec<Node<'p>>> {
        if self.is_comment() {
            return Ok(Vec::new());
        }
        let children =
            self.with_syntax(|node| node.children().map(SyntaxNode::index).collect::<Vec<_>>())?;
        children.into_iter().map(|index| self.wrap_index(index)).collect()
    }

    /// Children with the comments standing between them as comment ranges.
    pub fn children_with_comments(self) -> Result<Vec<Node<'p>>> {
        if self.is_comment() {
            return Ok(Vec::new());
        }
        let cached = self.project.cache.borrow().cached_children(self.id).map(<[_]>::to_vec);
        if let Some(children) = cached {
            return Ok(children.into_iter().map(|id| Node::new(self.project, id)).collect());
        }

        let children = self
            .with_syntax(extended_children)?
            .into_iter()
            .map(|child| self.wrap_child(child))
            .collect::<Result<Vec<_>>>()?;
        let ids = children.iter().map(|child| child.id).collect();
        self.project.cache.borrow_mut().set_children(self.id, ids);
        Ok(children)
    }

    pub fn first_child_by_kind(self, kind: SyntaxKind) -> Result<Option<Node<'p>>> {
        let child = self.with_syntax(|node| node.child(kind).map(SyntaxNode::index))?;
        child.map(|index| self.wrap_index(index)).transpose()
    }

    pub fn first_child_by_kind_or_err(self, kind: SyntaxKind) -> Result<Node<'p>> {
        self.first_child_by_kind(kind)
            .or_not_found(|| format!("Expected to find a child of kind {kind:?}."))
    }

    /// Parent, grandparent and so on up to the source file.
    pub fn ancestors(self) -> Result<Vec<Node<'p>>> {
        let mut ancestors = Vec::new();
        let mut node = self;
        while let Some(parent) = node.parent()? {
            ancestors.push(parent);
            node = parent;
        }
        Ok(ancestors)
    }

    pub fn first_ancestor_by_kind(self, kind: SyntaxKind) -> Result<Option<Node<'p>>> {
        Ok(self.ancestors()?.into_iter().find(|ancestor| ancestor.kind() == kind))
    }

    pub fn first_ancestor_by_kind_or_err(self, kind: SyntaxKind) -> Result<Node<'p>> {
        self.first_ancestor_by_kind(kind)
            .or_not_found(|| format!("Expected to find an ancestor of kind {kind:?}."))
    }

    /// Every node below this one, in document order.
    pub fn descendants(self) -> Result<Vec<Node<'p>>> {
        if self.is_comment() {
            return Ok(Vec::new());
        }
        let descendants = self
            .with_syntax(|node| node.descendants().map(SyntaxNode::index).collect::<Vec<_>>())?;
        descendants.into_iter().map(|index| self.wrap_index(index)).collect()
    }

    pub fn source_file(self) -> Result<SourceFile<'p>> {
        if self.is_forgotten() {
            return Err(self.invalidated());
        }
        let root = self.wrap_index(NodeIndex::ROOT)?;
        Ok(SourceFile::new(root))
    }

    /// The whitespace starting the line this node starts on.
    pub fn indentation_text(self) -> Result<String> {
        let start = self.start()?;
        let tree = self.project.tree_of(self.file()).ok_or_else(|| self.invalidated())?;
        Ok(indentation_at(tree.text(), start).to_owned())
    }

    /// The indentation of this node's children.
    pub fn child_indentation_text(self) -> Result<String> {
        let indentation = self.project.manipulation_settings().indentation;
        Ok(self.indentation_text()? + indentation.as_str())
    }

    /// Replaces the text of this node and returns the wrapper of whatever
    /// node now spans the new text.
    ///
    /// When the new text parses to a node of the same kind at the same range
    /// the wrapper is kept; otherwise this wrapper is forgotten.
    pub fn replace_with_text(self, text: &str) -> Result<Node<'p>> {
        let range = self.range()?;
        if self.is_comment() {
            return Err(Error::invalid("comment ranges can only be removed"));
        }
        self.replace_range(range, text)?;

        let new_range = TextRange::at(range.start(), TextSize::of(text.trim_end()));
        let tree = self.project.tree_of(self.file()).ok_or_else(|| self.invalidated())?;
        let index = tree
            .root()
            .covering_node(new_range)
            .ancestors()
            .take_while(|node| node.trimmed_range() == new_range)
            .last()
            .map(SyntaxNode::index);
        index
            .or_not_found(|| format!("Expected to find a node spanning {new_range:?}."))
            .and_then(|index| self.wrap_index(index))
    }

    pub(crate) fn replace_range(self, range: TextRange, text: &str) -> Result<()> {
        self.edit(vec![Splice::replace(range, text)])
    }

    pub(crate) fn edit(self, splices: Vec<Splice>) -> Result<()> {
        if self.is_forgotten() {
            return Err(self.invalidated());
        }
        self.project.apply_splices(self.file(), splices)
    }

    /// Inside a `.d.ts` file, a `declare` declaration or an interface.
    pub(crate) fn is_ambient(self) -> Result<bool> {
        if self.project.path_of(self.file()).as_str().ends_with(".d.ts") {
            return Ok(true);
        }
        self.with_syntax(|node| {
            node.ancestors().any(|node| {
                node.kind() == INTERFACE_DECLARATION
                    || morph_check::names::has_modifier(node, DECLARE_KW)
            })
        })
    }

    pub fn symbol(self) -> Result<Option<Symbol<'p>>> {
        let index = self.index()?;
        let file = self.file();
        let symbol = self.project.with_program(|program| program.symbol_of_node(file, index));
        Ok(symbol.map(|symbol| Symbol::wrap(self.project, symbol)))
    }

    pub fn symbol_or_err(self) -> Result<Symbol<'p>> {
        self.symbol().or_not_found(|| format!("Expected to find a symbol for {:?}.", self.kind()))
    }

    /// The type of the node: declared for declarations, written for type
    /// nodes, inferred from literals for initializers.
    pub fn type_of(self) -> Result<Type<'p>> {
        let index = self.index()?;
        let file = self.file();
        let ty = self.project.with_program(|program| program.type_of_node(file, index));
        Ok(Type::wrap(self.project, ty))
    }

    /// The signature of a function, method, constructor or accessor.
    pub fn signature(self) -> Result<Option<Signature<'p>>> {
        let index = self.index()?;
        let file = self.file();
        let has_signature =
            self.project.with_program(|program| program.signature(file, index).is_some());
        Ok(has_signature.then(|| Signature::new(self)))
    }

    pub fn cast<N: AstNode<'p>>(self) -> Option<N> {
        N::cast(self)
    }

    /// The typed wrapper for this node's kind.
    pub fn variant(self) -> NodeVariant<'p> {
        NodeVariant::new(self)
    }
}
