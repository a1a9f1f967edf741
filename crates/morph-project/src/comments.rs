//! Comments as children.
//!
//! The tree keeps comments in token trivia. This module lifts the ones that
//! stand on their own into the child sequence of a node, so they can be
//! listed, addressed and removed like statements and members.

use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::{NodeIndex, SyntaxNode, TriviaPiece, TriviaPieceKind};
use text_size::TextRange;

/// A child of a node, or a comment standing between its children.
///
/// Full ranges of consecutive items are contiguous and together cover the
/// parent's full range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtendedChild {
    Node { index: NodeIndex, full_range: TextRange },
    Comment { kind: SyntaxKind, range: TextRange, full_range: TextRange },
}

impl ExtendedChild {
    #[cfg(test)]
    pub(crate) fn full_range(self) -> TextRange {
        match self {
            Self::Node { full_range, .. } | Self::Comment { full_range, .. } => full_range,
        }
    }
}

pub(crate) fn extended_children(parent: SyntaxNode<'_>) -> Vec<ExtendedChild> {
    let text = parent.tree().text();
    let mut cursor = parent.text_range().start();
    // Comments in front of the parent's first token belong to the grandparent.
    let own_start =
        if parent.kind() == SOURCE_FILE { cursor } else { parent.trimmed_range().start() };

    let mut children = Vec::new();
    for child in parent.children() {
        let closing = matches!(child.kind(), CLOSE_BRACE | EOF);
        let trivia = child.leading_trivia().collect::<Vec<_>>();

        for (position, &(piece, range)) in trivia.iter().enumerate() {
            let Some(kind) = piece.kind.comment_kind() else { continue };
            if range.start() < own_start {
                continue;
            }
            if !closing && is_attached(text, range, &trivia[position + 1..]) {
                continue;
            }

            children.push(ExtendedChild::Comment {
                kind,
                range,
                full_range: TextRange::new(cursor, range.end()),
            });
            cursor = range.end();
        }

        let end = child.text_range().end();
        children.push(ExtendedChild::Node {
            index: child.index(),
            full_range: TextRange::new(cursor, end),
        });
        cursor = end;
    }

    children
}

/// A comment belongs to the following child when nothing but spaces
/// separates them, or when it is one of that child's JSDocs: only JSDocs
/// follow it and no blank line does.
fn is_attached(
    text: &str,
    comment: TextRange,
    rest: &[(TriviaPiece, TextRange)],
) -> bool {
    if !rest.iter().any(|(piece, _)| piece.kind == TriviaPieceKind::Newline) {
        return true;
    }
    if !is_js_doc(&text[comment]) {
        return false;
    }

    let mut after_newline = false;
    for &(piece, range) in rest {
        match piece.kind {
            TriviaPieceKind::Newline if after_newline => return false,
            TriviaPieceKind::Newline => after_newline = true,
            TriviaPieceKind::Whitespace => {}
            TriviaPieceKind::SingleLineComment | TriviaPieceKind::MultiLineComment => {
                if !is_js_doc(&text[range]) {
                    return false;
                }
                after_newline = false;
            }
        }
    }
    true
}

/// The comments in front of `node` that belong to it, in source order.
pub(crate) fn attached_comments(node: SyntaxNode<'_>) -> Vec<(SyntaxKind, TextRange)> {
    let text = node.tree().text();
    let trivia = node.leading_trivia().collect::<Vec<_>>();
    trivia
        .iter()
        .enumerate()
        .filter_map(|(position, &(piece, range))| {
            let kind = piece.kind.comment_kind()?;
            is_attached(text, range, &trivia[position + 1..]).then_some((kind, range))
        })
        .collect()
}

pub(crate) fn is_js_doc(comment: &str) -> bool {
    comment.starts_with("/**") && comment != "/**/"
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use expect_test::{Expect, expect};
    use morph_parse::parse_text;

    use super::*;

    #[track_caller]
    fn check(text: &str, container: SyntaxKind, expect: Expect) {
        let parse = parse_text(text);
        let tree = parse.tree();
        let container = tree.preorder().find(|node| node.kind() == container).unwrap();

        let mut actual = String::new();
        let mut covered = String::new();
        for child in extended_children(container) {
            covered.push_str(&text[child.full_range()]);
            match child {
                ExtendedChild::Node { index, .. } => {
                    let node = tree.node(index);
                    writeln!(actual, "{:?} {:?}", node.kind(), node.text_trimmed()).unwrap();
                }
                ExtendedChild::Comment { kind, range, .. } => {
                    writeln!(actual, "{kind:?} {:?}", &text[range]).unwrap();
                }
            }
        }

        assert_eq!(covered, container.text());
        expect.assert_eq(&actual);
    }

    #[test]
    fn statements() {
        check(
            "//a\nclass Test {} //b\n/*c*/\n/*d*/interface Interface {}\n//e",
            SOURCE_FILE,
            expect![[r#"
                SINGLE_LINE_COMMENT "//a"
                CLASS_DECLARATION "class Test {}"
                SINGLE_LINE_COMMENT "//b"
                MULTI_LINE_COMMENT "/*c*/"
                INTERFACE_DECLARATION "interface Interface {}"
                SINGLE_LINE_COMMENT "//e"
                EOF ""
            "#]],
        );
    }

    #[test]
    fn js_docs_stay_with_their_declaration() {
        check(
            "/** doc */\nclass A {}\n/** detached */\n\n// plain\nclass B {}",
            SOURCE_FILE,
            expect![[r#"
                CLASS_DECLARATION "class A {}"
                MULTI_LINE_COMMENT "/** detached */"
                SINGLE_LINE_COMMENT "// plain"
                CLASS_DECLARATION "class B {}"
                EOF ""
            "#]],
        );
    }

    #[test]
    fn blank_lines_detach_js_docs() {
        check(
            "/** one */\n/** two */\nclass A {}\n/** loose */\n\nclass B {}",
            SOURCE_FILE,
            expect![[r#"
                CLASS_DECLARATION "class A {}"
                MULTI_LINE_COMMENT "/** loose */"
                CLASS_DECLARATION "class B {}"
                EOF ""
            "#]],
        );
    }

    #[test]
    fn class_members() {
        check(
            "// outside\nclass A {\n    // first\n    x: string;\n    /** doc */\n    m(): void;\n    // last\n}",
            CLASS_DECLARATION,
            expect![[r#"
                CLASS_KW "class"
                IDENTIFIER "A"
                OPEN_BRACE "{"
                SINGLE_LINE_COMMENT "// first"
                PROPERTY_DECLARATION "x: string;"
                METHOD_DECLARATION "m(): void;"
                SINGLE_LINE_COMMENT "// last"
                CLOSE_BRACE "}"
            "#]],
        );
    }
}
