//! Splicing text into a file and keeping wrappers pointed at the new tree.

use std::ops::Range;

use morph_errors::Diagnostic;
use morph_inputs::File;
use morph_parse::FileParse as _;
use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::{NodeIndex, SyntaxNode};
use salsa::Setter as _;
use text_size::{TextRange, TextSize};

use crate::cache::{TextEdit, map_through, map_through_growing, sort_edits};
use crate::comments::{ExtendedChild, extended_children};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::project::Project;
use crate::text::{
    attached_start, blank_line_policy, indent_text, indentation_at, statement_removal_range,
    statement_needs_blank_line,
};

/// Replacement of `range` in the current text by `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Splice {
    pub(crate) range: TextRange,
    pub(crate) text: String,
}

impl Splice {
    pub(crate) fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self { range: TextRange::empty(offset), text: text.into() }
    }

    pub(crate) fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self { range, text: text.into() }
    }

    pub(crate) fn remove(range: TextRange) -> Self {
        Self { range, text: String::new() }
    }
}

impl Project {
    /// Applies `splices` to `file` as one change, reparses it, and reconciles
    /// its wrappers against the new tree.
    ///
    /// Fails without touching anything when a splice is out of bounds, when
    /// two splices overlap, or when the result has parse errors the old text
    /// did not have.
    pub(crate) fn apply_splices(&self, file: File, mut splices: Vec<Splice>) -> Result<()> {
        if !self.contains(file) {
            return Err(Error::FileNotFound { path: self.path_of(file) });
        }
        let path = self.path_of(file);
        let old_text = self.text_of(file);

        for splice in &splices {
            let Range { start, end } = Range::<usize>::from(splice.range);
            if end > old_text.len()
                || !old_text.is_char_boundary(start)
                || !old_text.is_char_boundary(end)
            {
                return Err(Error::invalid(format!(
                    "{:?} is not a valid range of `{path}`",
                    splice.range
                )));
            }
        }

        splices.sort_by(|a, b| {
            (b.range.start(), b.range.end()).cmp(&(a.range.start(), a.range.end()))
        });
        if splices.windows(2).any(|pair| pair[1].range.end() > pair[0].range.start()) {
            return Err(Error::invalid("overlapping edits can not be applied together"));
        }

        let mut new_text = old_text.clone();
        for splice in &splices {
            tracing::debug!(
                file = %path,
                range = ?splice.range,
                inserted = splice.text.len(),
                "applying edit"
            );
            new_text.replace_range(Range::<usize>::from(splice.range), &splice.text);
        }

        let mut edits = splices
            .iter()
            .map(|splice| TextEdit { range: splice.range, new_len: TextSize::of(&splice.text) })
            .collect::<Vec<_>>();
        sort_edits(&mut edits);

        let old_diagnostics = file.parse(&*self.db.borrow()).diagnostics().to_vec();
        file.set_text(&mut *self.db.borrow_mut()).to(new_text);

        let (tree, introduced) = {
            let db = self.db.borrow();
            let parse = file.parse(&*db);
            let introduced = introduced_diagnostic(&edits, &old_diagnostics, parse.diagnostics());
            (parse.shared_tree(), introduced)
        };

        if let Some(diagnostic) = introduced {
            file.set_text(&mut *self.db.borrow_mut()).to(old_text);
            return Err(Error::invalid(format!(
                "the edit would leave `{path}` with a syntax error: {diagnostic}"
            )));
        }

        let mut cache = self.cache.borrow_mut();
        let mut forgotten = 0;
        for edit in &edits {
            forgotten += cache.forget_in_range(file, edit.range);
        }
        let stats = cache.reconcile(file, &edits, tree);
        let live = cache.live_count(file);
        drop(cache);
        self.bump_generation();

        tracing::trace!(
            file = %path,
            reused = stats.reused,
            forgotten = forgotten + stats.forgotten,
            live,
            "reconciled wrappers"
        );
        Ok(())
    }
}

/// The first diagnostic of `new` that no diagnostic of `old` accounts for.
///
/// An old diagnostic accounts for a new one with the same message at the
/// range it maps to through `edits`. An empty range sitting where text was
/// inserted may also have moved to the end of that text.
fn introduced_diagnostic(
    edits: &[TextEdit],
    old: &[Diagnostic],
    new: &[Diagnostic],
) -> Option<Diagnostic> {
    let mut claimed = vec![false; old.len()];
    let moved_to = |range: TextRange, target: TextRange| {
        map_through(edits, range) == Some(target)
            || (range.is_empty()
                && map_through_growing(edits, range).map(|grown| TextRange::empty(grown.end()))
                    == Some(target))
    };

    new.iter()
        .find(|diagnostic| {
            let counterpart = old.iter().enumerate().position(|(i, previous)| {
                !claimed[i]
                    && previous.message() == diagnostic.message()
                    && moved_to(previous.range(), diagnostic.range())
            });
            match counterpart {
                Some(i) => {
                    claimed[i] = true;
                    false
                }
                None => true,
            }
        })
        .cloned()
}

/// The ordered children of a container that insertions index into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemList {
    /// Statements and comments of a source file or a namespace body.
    Statements,
    /// Members and comments between the braces of a class.
    ClassMembers,
    /// Signatures and comments between the braces of an interface.
    TypeMembers,
    /// The comma-separated members of an enum.
    EnumMembers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListItem {
    pub(crate) child: ExtendedChild,
    pub(crate) kind: SyntaxKind,
    /// From the first attached comment to the end of the item.
    pub(crate) range: TextRange,
}

impl ItemList {
    fn commas(self) -> bool {
        self == ItemList::EnumMembers
    }

    pub(crate) fn items(self, container: SyntaxNode<'_>) -> Vec<ListItem> {
        let text = container.tree().text();
        let braced = container.kind() != SOURCE_FILE;
        let mut inside = !braced;

        let mut items = Vec::new();
        for child in extended_children(container) {
            let item = match child {
                ExtendedChild::Comment { kind, range, .. } => {
                    ListItem { child, kind, range }
                }
                ExtendedChild::Node { index, full_range } => {
                    let node = container.tree().node(index);
                    let range = node.trimmed_range();
                    let start = attached_start(text, full_range, range.start());
                    ListItem { child, kind: node.kind(), range: TextRange::new(start, range.end()) }
                }
            };

            match item.kind {
                OPEN_BRACE if braced && !inside => inside = true,
                CLOSE_BRACE | EOF => break,
                kind if inside && self.accepts(kind) => items.push(item),
                _ => {}
            }
        }
        items
    }

    fn accepts(self, kind: SyntaxKind) -> bool {
        match self {
            ItemList::Statements => kind != EOF,
            ItemList::ClassMembers => kind.is_class_member() || kind.is_comment(),
            ItemList::TypeMembers => kind.is_type_member() || kind.is_comment(),
            ItemList::EnumMembers => kind == ENUM_MEMBER,
        }
    }
}

/// Where a list lives in the text and how its items are laid out.
pub(crate) struct ListLayout<'a> {
    pub(crate) text: &'a str,
    /// Replaced wholesale when the list is empty.
    pub(crate) open: TextSize,
    pub(crate) close: TextSize,
    pub(crate) braces: bool,
    pub(crate) commas: bool,
    pub(crate) indent: &'a str,
    pub(crate) parent_indent: &'a str,
    pub(crate) newline: &'a str,
}

impl ListLayout<'_> {
    /// The splice inserting `fragments` as items `index..` of `items`, or
    /// `None` when `index` is past the end.
    pub(crate) fn insertion(
        &self,
        items: &[(SyntaxKind, TextRange)],
        index: usize,
        kind: SyntaxKind,
        fragments: &[String],
        needs_blank: &dyn Fn(SyntaxKind) -> bool,
    ) -> Option<Splice> {
        if index > items.len() {
            return None;
        }

        let nl = self.newline;
        let indent = self.indent;
        let spacing = blank_line_policy(
            index.checked_sub(1).map(|previous| items[previous].0),
            items.get(index).map(|&(kind, _)| kind),
            kind,
            needs_blank,
        );
        let comma = if self.commas { "," } else { "" };
        let separator = if spacing.separator_newline {
            format!("{comma}{nl}{indent}")
        } else {
            format!("{comma}{nl}{nl}{indent}")
        };
        let body = fragments
            .iter()
            .map(|fragment| indent_text(fragment, indent, nl))
            .collect::<Vec<_>>()
            .join(&separator);

        if items.is_empty() {
            let range = TextRange::new(self.open, self.close);
            let text = if self.braces {
                format!("{nl}{indent}{body}{nl}{}", self.parent_indent)
            } else {
                format!("{body}{nl}")
            };
            return Some(Splice::replace(range, text));
        }

        if index == 0 {
            let blank = if spacing.blank_after { nl } else { "" };
            let text = format!("{body}{comma}{nl}{blank}{indent}");
            return Some(Splice::insert(items[0].1.start(), text));
        }

        let previous = items[index - 1].1;
        let blank = if spacing.blank_before { nl } else { "" };
        let (offset, mut text) = match self.comma_after(previous.end()) {
            Some(comma_end) => (comma_end, format!("{nl}{blank}{indent}{body},")),
            None if self.commas => (previous.end(), format!(",{nl}{blank}{indent}{body}")),
            None => (previous.end(), format!("{nl}{blank}{indent}{body}")),
        };
        if let Some(&(_, next)) = items.get(index) {
            let gap = &self.text[TextRange::new(previous.end(), next.start())];
            if spacing.blank_after && gap.matches('\n').count() < 2 {
                text.push_str(nl);
            }
        }
        Some(Splice::insert(offset, text))
    }

    fn comma_after(&self, offset: TextSize) -> Option<TextSize> {
        if !self.commas {
            return None;
        }
        let rest = &self.text[usize::from(offset)..];
        let trimmed = rest.trim_start();
        trimmed.starts_with(',').then(|| offset + TextSize::of(&rest[..rest.len() - trimmed.len() + 1]))
    }
}

impl<'p> Node<'p> {
    /// Wrappers for the items of `list` in this container.
    pub(crate) fn list_items(self, list: ItemList) -> Result<Vec<Node<'p>>> {
        let items = self.with_syntax(|container| list.items(container))?;
        items.into_iter().map(|item| self.wrap_child(item.child)).collect()
    }

    /// Inserts `fragments` as items `index..` of `list`, removing the
    /// `replaced` items in the same change, and returns the new items.
    pub(crate) fn insert_items(
        self,
        list: ItemList,
        index: usize,
        kind: SyntaxKind,
        fragments: &[String],
        replaced: &[Node<'p>],
    ) -> Result<Vec<Node<'p>>> {
        if fragments.is_empty() {
            return Ok(Vec::new());
        }
        let replaced =
            replaced.iter().map(|node| node.index()).collect::<Result<Vec<NodeIndex>>>()?;
        let settings = self.project().manipulation_settings();
        let is_ambient = self.is_ambient()?;

        let splices = self.with_syntax(|container| -> Result<Vec<Splice>> {
            let text = container.tree().text();
            let all = list.items(container);
            let (removed, items): (Vec<&ListItem>, Vec<&ListItem>) = all.iter().partition(|item| {
                matches!(item.child, ExtendedChild::Node { index, .. } if replaced.contains(&index))
            });
            let items = items.iter().map(|item| (item.kind, item.range)).collect::<Vec<_>>();

            let (open, close, braces) = match container.kind() {
                SOURCE_FILE => (TextSize::new(0), TextSize::of(text), false),
                _ => {
                    let open = container.child(OPEN_BRACE);
                    let close = container.child(CLOSE_BRACE);
                    let (Some(open), Some(close)) = (open, close) else {
                        return Err(Error::invalid(format!("{:?} has no body", container.kind())));
                    };
                    (open.trimmed_range().end(), close.trimmed_range().start(), true)
                }
            };
            let parent_indent = indentation_at(text, container.trimmed_range().start());
            let indent = if braces {
                format!("{parent_indent}{}", settings.indentation.as_str())
            } else {
                String::new()
            };

            let layout = ListLayout {
                text,
                open,
                close,
                braces,
                commas: list.commas(),
                indent: &indent,
                parent_indent,
                newline: settings.new_line.as_str(),
            };
            let needs_blank = |kind: SyntaxKind| match list {
                ItemList::Statements => statement_needs_blank_line(kind),
                ItemList::ClassMembers => !is_ambient && kind.is_bodied_member(),
                ItemList::TypeMembers | ItemList::EnumMembers => false,
            };
            let insertion = layout
                .insertion(&items, index, kind, fragments, &needs_blank)
                .ok_or(Error::IndexOutOfRange { index, len: items.len() })?;

            // With nothing left in the list the insertion rewrites the whole
            // body, removed items included.
            let mut splices = if items.is_empty() {
                Vec::new()
            } else {
                removed
                    .iter()
                    .map(|item| Splice::remove(statement_removal_range(text, item.range)))
                    .collect::<Vec<_>>()
            };
            splices.push(insertion);
            Ok(splices)
        })??;

        self.project().apply_splices(self.file(), splices)?;

        let items = self.list_items(list)?;
        let inserted = items.get(index..index + fragments.len()).ok_or_else(|| {
            Error::InvariantViolation {
                message: format!("the inserted {kind:?} items were not found after reparsing"),
            }
        })?;
        Ok(inserted.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};
    use morph_parse::parse_text;

    use super::*;

    #[track_caller]
    fn check(text: &str, list: ItemList, index: usize, kind: SyntaxKind, fragments: &[&str], expect: Expect) {
        let parse = parse_text(text);
        let root = parse.tree().root();
        let container = match list {
            ItemList::Statements => root,
            _ => root.descendants().find(|node| {
                matches!(node.kind(), CLASS_DECLARATION | INTERFACE_DECLARATION | ENUM_DECLARATION)
            }).unwrap(),
        };
        let items = list.items(container).iter().map(|item| (item.kind, item.range)).collect::<Vec<_>>();
        let (open, close, braces) = match (container.child(OPEN_BRACE), container.child(CLOSE_BRACE)) {
            (Some(open), Some(close)) => (open.trimmed_range().end(), close.trimmed_range().start(), true),
            _ => (0.into(), TextSize::of(text), false),
        };
        let parent_indent = indentation_at(text, container.trimmed_range().start());
        let indent = if braces { format!("{parent_indent}    ") } else { String::new() };
        let layout = ListLayout {
            text,
            open,
            close,
            braces,
            commas: list == ItemList::EnumMembers,
            indent: &indent,
            parent_indent,
            newline: "\n",
        };
        let fragments = fragments.iter().map(|&fragment| fragment.to_owned()).collect::<Vec<_>>();
        let needs_blank = |kind: SyntaxKind| match list {
            ItemList::Statements => statement_needs_blank_line(kind),
            ItemList::ClassMembers => kind.is_bodied_member(),
            _ => false,
        };
        let splice = layout.insertion(&items, index, kind, &fragments, &needs_blank).unwrap();

        let mut actual = text.to_owned();
        actual.replace_range(Range::<usize>::from(splice.range), &splice.text);
        expect.assert_eq(&actual);
    }

    #[test]
    fn into_empty_bodies() {
        check(
            "class A {}\n",
            ItemList::ClassMembers,
            0,
            PROPERTY_DECLARATION,
            &["x: number;", "y: number;"],
            expect![[r#"
                class A {
                    x: number;
                    y: number;
                }
            "#]],
        );
        check(
            "namespace N {\n    class A {\n    }\n}\n",
            ItemList::ClassMembers,
            0,
            METHOD_DECLARATION,
            &["m() {\n    return 1;\n}"],
            expect![[r#"
                namespace N {
                    class A {
                        m() {
                            return 1;
                        }
                    }
                }
            "#]],
        );
        check("", ItemList::Statements, 0, CLASS_DECLARATION, &["class A {}"], expect![[r#"
            class A {}
        "#]]);
    }

    #[test]
    fn bodied_members_get_blank_lines() {
        let text = "class A {\n    a: string;\n    b: string;\n}";
        check(
            text,
            ItemList::ClassMembers,
            1,
            METHOD_DECLARATION,
            &["m() {\n}"],
            expect![[r#"
                class A {
                    a: string;

                    m() {
                    }

                    b: string;
                }"#]],
        );
        check(
            text,
            ItemList::ClassMembers,
            2,
            PROPERTY_DECLARATION,
            &["c: string;"],
            expect![[r#"
                class A {
                    a: string;
                    b: string;
                    c: string;
                }"#]],
        );
    }

    #[test]
    fn first_item_keeps_its_js_doc() {
        check(
            "/** A */\nclass A {}\n",
            ItemList::Statements,
            0,
            INTERFACE_DECLARATION,
            &["interface I {}"],
            expect![[r#"
                interface I {}

                /** A */
                class A {}
            "#]],
        );
    }

    #[test]
    fn detached_comments_are_items() {
        let text = "// header\n\nclass A {}\n";
        check(
            text,
            ItemList::Statements,
            1,
            TYPE_ALIAS_DECLARATION,
            &["type T = string;"],
            expect![[r#"
                // header
                type T = string;

                class A {}
            "#]],
        );
    }

    #[test]
    fn enum_members_are_comma_separated() {
        check(
            "enum E {\n    A,\n    B\n}",
            ItemList::EnumMembers,
            2,
            ENUM_MEMBER,
            &["C = 3", "D"],
            expect![[r#"
                enum E {
                    A,
                    B,
                    C = 3,
                    D
                }"#]],
        );
        check(
            "enum E {\n    A,\n    B,\n}",
            ItemList::EnumMembers,
            1,
            ENUM_MEMBER,
            &["C"],
            expect![[r#"
                enum E {
                    A,
                    C,
                    B,
                }"#]],
        );
        check(
            "enum E {\n    A\n}",
            ItemList::EnumMembers,
            0,
            ENUM_MEMBER,
            &["Z"],
            expect![[r#"
                enum E {
                    Z,
                    A
                }"#]],
        );
    }

    #[test]
    fn out_of_range_index() {
        let parse = parse_text("class A {}");
        let class = parse.tree().root().first_child().unwrap();
        assert_eq!(ItemList::ClassMembers.items(class), Vec::new());

        let layout = ListLayout {
            text: "class A {}",
            open: 9.into(),
            close: 9.into(),
            braces: true,
            commas: false,
            indent: "    ",
            parent_indent: "",
            newline: "\n",
        };
        let fragments = ["x;".to_owned()];
        assert_eq!(layout.insertion(&[], 1, PROPERTY_DECLARATION, &fragments, &|_| false), None);
    }
}
