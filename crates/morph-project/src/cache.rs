//! One wrapper per syntax node.
//!
//! Wrappers are slots in an arena. A live slot points at a node of its
//! file's current tree; after every reparse the slots are reconciled against
//! the new tree by kind and trimmed range, and the ones without a
//! counterpart are forgotten for good.

use la_arena::{Arena, Idx};
use morph_inputs::File;
use morph_syntax::{NodeIndex, SyntaxKind, SyntaxNodePtr, SyntaxTree};
use rustc_hash::{FxHashMap, FxHashSet};
use text_size::{TextRange, TextSize};
use triomphe::Arc;

pub(crate) type NodeId = Idx<NodeSlot>;

#[derive(Debug)]
pub(crate) struct NodeSlot {
    pub(crate) file: File,
    pub(crate) kind: SyntaxKind,
    pub(crate) state: SlotState,
    /// Comment-extended children, valid for one generation of the file.
    pub(crate) children: Option<(u32, Vec<NodeId>)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotState {
    Live(NodeIndex),
    Comment { parent: NodeId, range: TextRange },
    Forgotten,
}

pub(crate) struct FileState {
    pub(crate) tree: Arc<SyntaxTree>,
    pub(crate) generation: u32,
    nodes: FxHashMap<NodeIndex, NodeId>,
    comments: FxHashMap<TextRange, NodeId>,
}

/// A replacement of `range` in the old text by `new_len` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextEdit {
    pub(crate) range: TextRange,
    pub(crate) new_len: TextSize,
}

impl TextEdit {
    /// Where `range` ends up after the edit, or `None` when the edit
    /// overlaps it without strictly containing it.
    pub(crate) fn map(self, range: TextRange) -> Option<TextRange> {
        let edit = self.range;
        let shift = |offset: TextSize| offset - edit.len() + self.new_len;

        if range == edit && !edit.is_empty() {
            None
        } else if range.end() <= edit.start() {
            Some(range)
        } else if range.start() >= edit.end() {
            Some(TextRange::new(shift(range.start()), shift(range.end())))
        } else if range.start() <= edit.start() && edit.end() <= range.end() {
            Some(TextRange::new(range.start(), shift(range.end())))
        } else {
            None
        }
    }

    /// Like [`map`](Self::map), but an insertion touching either end of
    /// `range` becomes part of it, as when a modifier is prepended.
    pub(crate) fn map_growing(self, range: TextRange) -> Option<TextRange> {
        let edit = self.range;
        if edit.is_empty() && (edit.start() == range.start() || edit.start() == range.end()) {
            return Some(TextRange::new(range.start(), range.end() + self.new_len));
        }
        self.map(range)
    }
}

/// Maps `range` through edits given in old coordinates, sorted back to front
/// as [`sort_edits`] leaves them.
pub(crate) fn map_through(edits: &[TextEdit], range: TextRange) -> Option<TextRange> {
    edits.iter().try_fold(range, |range, edit| edit.map(range))
}

pub(crate) fn map_through_growing(edits: &[TextEdit], range: TextRange) -> Option<TextRange> {
    edits.iter().try_fold(range, |range, edit| edit.map_growing(range))
}

/// Orders edits so that applying them one by one keeps the remaining
/// offsets valid: descending start, and a removal before an insertion at
/// the same offset.
pub(crate) fn sort_edits(edits: &mut [TextEdit]) {
    edits.sort_by(|a, b| {
        b.range.start().cmp(&a.range.start()).then(b.range.end().cmp(&a.range.end()))
    });
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReconcileStats {
    pub(crate) reused: usize,
    pub(crate) forgotten: usize,
}

/// Wrapper slots of every file in a project.
///
/// Slots are never reclaimed. A forgotten slot stays in the arena so that
/// handles still held by callers keep reporting themselves as forgotten;
/// the arena grows by the wrappers each edit replaces.
#[derive(Default)]
pub(crate) struct NodeCache {
    slots: Arena<NodeSlot>,
    files: FxHashMap<File, FileState>,
}

impl NodeCache {
    pub(crate) fn add_file(&mut self, file: File, tree: Arc<SyntaxTree>) {
        let state = FileState {
            tree,
            generation: 0,
            nodes: FxHashMap::default(),
            comments: FxHashMap::default(),
        };
        self.files.insert(file, state);
    }

    /// Forgets every wrapper of `file`. Returns how many were live.
    pub(crate) fn remove_file(&mut self, file: File) -> usize {
        let Some(state) = self.files.remove(&file) else { return 0 };
        let ids = state.nodes.values().chain(state.comments.values()).copied().collect::<Vec<_>>();
        for &id in &ids {
            self.slots[id].state = SlotState::Forgotten;
            self.slots[id].children = None;
        }
        ids.len()
    }

    pub(crate) fn file(&self, file: File) -> Option<&FileState> {
        self.files.get(&file)
    }

    pub(crate) fn tree(&self, file: File) -> Option<Arc<SyntaxTree>> {
        self.files.get(&file).map(|state| Arc::clone(&state.tree))
    }

    pub(crate) fn slot(&self, id: NodeId) -> &NodeSlot {
        &self.slots[id]
    }

    pub(crate) fn get_or_create(&mut self, file: File, index: NodeIndex) -> Option<NodeId> {
        let state = self.files.get_mut(&file)?;
        if let Some(&id) = state.nodes.get(&index) {
            return Some(id);
        }

        let kind = state.tree.get(index)?.kind();
        let id = self.slots.alloc(NodeSlot {
            file,
            kind,
            state: SlotState::Live(index),
            children: None,
        });
        state.nodes.insert(index, id);
        Some(id)
    }

    pub(crate) fn get_or_create_comment(
        &mut self,
        file: File,
        parent: NodeId,
        kind: SyntaxKind,
        range: TextRange,
    ) -> Option<NodeId> {
        let state = self.files.get_mut(&file)?;
        if let Some(&id) = state.comments.get(&range) {
            return Some(id);
        }

        let id = self.slots.alloc(NodeSlot {
            file,
            kind,
            state: SlotState::Comment { parent, range },
            children: None,
        });
        state.comments.insert(range, id);
        Some(id)
    }

    pub(crate) fn cached_children(&self, id: NodeId) -> Option<&[NodeId]> {
        let slot = &self.slots[id];
        let generation = self.files.get(&slot.file)?.generation;
        match &slot.children {
            Some((cached, children)) if *cached == generation => Some(children),
            _ => None,
        }
    }

    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        let slot = &self.slots[id];
        let Some(state) = self.files.get(&slot.file) else { return };
        let generation = state.generation;
        self.slots[id].children = Some((generation, children));
    }

    fn forget(&mut self, id: NodeId) {
        let slot = &mut self.slots[id];
        let previous = std::mem::replace(&mut slot.state, SlotState::Forgotten);
        slot.children = None;

        let Some(state) = self.files.get_mut(&slot.file) else { return };
        match previous {
            SlotState::Live(index) => {
                state.nodes.remove(&index);
            }
            SlotState::Comment { range, .. } => {
                state.comments.remove(&range);
            }
            SlotState::Forgotten => {}
        }
    }

    /// Forgets the wrappers of `file` whose nodes overlap `range` without
    /// strictly containing it. Returns how many were forgotten.
    pub(crate) fn forget_in_range(&mut self, file: File, range: TextRange) -> usize {
        let Some(state) = self.files.get(&file) else { return 0 };
        let probe = TextEdit { range, new_len: range.len() };

        let mut doomed = state
            .nodes
            .iter()
            .filter(|&(&index, _)| index != NodeIndex::ROOT)
            .filter(|&(&index, _)| probe.map(state.tree.node(index).trimmed_range()).is_none())
            .map(|(_, &id)| id)
            .collect::<Vec<_>>();
        doomed.extend(
            state
                .comments
                .iter()
                .filter(|&(&comment, _)| probe.map(comment).is_none())
                .map(|(_, &id)| id),
        );

        for &id in &doomed {
            self.forget(id);
        }
        doomed.len()
    }

    /// Re-points the wrappers of `file` at `new_tree`, which was parsed from
    /// the old text with `edits` applied.
    ///
    /// Old nodes are visited by depth, then document order, and each takes
    /// the first unclaimed new node of the same kind at its mapped range.
    /// A node that found none tries again with insertions at its edges
    /// counted as its own text.
    pub(crate) fn reconcile(
        &mut self,
        file: File,
        edits: &[TextEdit],
        new_tree: Arc<SyntaxTree>,
    ) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let Some(state) = self.files.get_mut(&file) else { return stats };
        let old_tree = std::mem::replace(&mut state.tree, Arc::clone(&new_tree));
        state.generation += 1;

        let mut candidates = FxHashMap::<SyntaxNodePtr, Vec<NodeIndex>>::default();
        let mut comment_ranges = FxHashSet::default();
        for node in new_tree.preorder() {
            candidates.entry(SyntaxNodePtr::new(node)).or_default().push(node.index());
            if node.is_token() {
                for (piece, range) in node.leading_trivia() {
                    if let Some(kind) = piece.kind.comment_kind() {
                        comment_ranges.insert((kind, range));
                    }
                }
            }
        }
        for indices in candidates.values_mut() {
            indices.reverse();
        }

        let mut old_nodes = std::mem::take(&mut state.nodes).into_iter().collect::<Vec<_>>();
        old_nodes.sort_by_key(|&(index, _)| (old_tree.node(index).depth(), index));

        let mut nodes = FxHashMap::default();
        for (index, id) in old_nodes {
            let new_index = if index == NodeIndex::ROOT {
                Some(NodeIndex::ROOT)
            } else {
                let old = SyntaxNodePtr::new(old_tree.node(index));
                let mut claim = |range: Option<TextRange>| {
                    range
                        .and_then(|range| candidates.get_mut(&old.with_range(range)))
                        .and_then(Vec::pop)
                };
                claim(map_through(edits, old.range))
                    .or_else(|| claim(map_through_growing(edits, old.range)))
            };

            match new_index {
                Some(new_index) => {
                    self.slots[id].state = SlotState::Live(new_index);
                    nodes.insert(new_index, id);
                    stats.reused += 1;
                }
                None => {
                    self.slots[id].state = SlotState::Forgotten;
                    stats.forgotten += 1;
                }
            }
            self.slots[id].children = None;
        }

        let old_comments = std::mem::take(&mut state.comments);
        let mut comments = FxHashMap::default();
        for (range, id) in old_comments {
            let SlotState::Comment { parent, .. } = self.slots[id].state else { continue };
            let parent_live = matches!(self.slots[parent].state, SlotState::Live(_));
            let kind = self.slots[id].kind;
            let mapped = map_through(edits, range)
                .filter(|&range| parent_live && comment_ranges.contains(&(kind, range)));

            match mapped {
                Some(range) => {
                    self.slots[id].state = SlotState::Comment { parent, range };
                    comments.insert(range, id);
                    stats.reused += 1;
                }
                None => {
                    self.slots[id].state = SlotState::Forgotten;
                    stats.forgotten += 1;
                }
            }
        }

        state.nodes = nodes;
        state.comments = comments;
        stats
    }

    /// Live wrappers of `file`, comments included.
    pub(crate) fn live_count(&self, file: File) -> usize {
        self.files.get(&file).map_or(0, |state| state.nodes.len() + state.comments.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    fn insert(at: u32, len: u32) -> TextEdit {
        TextEdit { range: range(at, at), new_len: len.into() }
    }

    #[test]
    fn ranges_map_around_edits() {
        let edit = TextEdit { range: range(10, 14), new_len: 6.into() };
        assert_eq!(edit.map(range(0, 10)), Some(range(0, 10)));
        assert_eq!(edit.map(range(14, 20)), Some(range(16, 22)));
        assert_eq!(edit.map(range(5, 20)), Some(range(5, 22)));
        assert_eq!(edit.map(range(10, 20)), Some(range(10, 22)));
        assert_eq!(edit.map(range(10, 14)), None);
        assert_eq!(edit.map(range(11, 13)), None);
        assert_eq!(edit.map(range(12, 20)), None);
    }

    #[test]
    fn insertions_shift_what_starts_at_them() {
        assert_eq!(insert(10, 3).map(range(10, 12)), Some(range(13, 15)));
        assert_eq!(insert(10, 3).map(range(4, 10)), Some(range(4, 10)));
        assert_eq!(insert(10, 3).map(range(4, 12)), Some(range(4, 15)));
    }

    #[test]
    fn growing_takes_in_insertions_at_the_edges() {
        assert_eq!(insert(10, 7).map_growing(range(10, 20)), Some(range(10, 27)));
        assert_eq!(insert(20, 1).map_growing(range(10, 20)), Some(range(10, 21)));
        assert_eq!(insert(30, 1).map_growing(range(10, 20)), Some(range(10, 20)));
    }

    #[test]
    fn edits_apply_back_to_front() {
        let mut edits = [TextEdit { range: range(5, 8), new_len: 0.into() }, insert(20, 2)];
        sort_edits(&mut edits);
        assert_eq!(edits[0], insert(20, 2));
        assert_eq!(map_through(&edits, range(25, 30)), Some(range(24, 29)));
        assert_eq!(map_through(&edits, range(0, 30)), Some(range(0, 29)));
        assert_eq!(map_through(&edits, range(6, 30)), None);
    }

    #[test]
    fn removal_precedes_insertion_at_the_same_offset() {
        let mut edits = [insert(5, 4), TextEdit { range: range(5, 8), new_len: 0.into() }];
        sort_edits(&mut edits);
        assert_eq!(edits[1], insert(5, 4));
        assert_eq!(map_through(&edits, range(8, 10)), Some(range(9, 11)));
    }
}
