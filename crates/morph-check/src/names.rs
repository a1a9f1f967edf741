//! Reading names and modifiers off declaration nodes.

use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxNode;

/// The token naming a declaration, if it has one.
pub fn name_token(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    match node.kind() {
        IMPORT_SPECIFIER | EXPORT_SPECIFIER => node.children_of_kind(IDENTIFIER).last(),
        IMPORT_CLAUSE => node.child(IDENTIFIER),
        NAMESPACE_IMPORT | NAMESPACE_EXPORT_DECLARATION => node.child(IDENTIFIER),
        IMPORT_DECLARATION | EXPORT_DECLARATION => None,
        _ => node
            .children()
            .take_while(|child| child.is_token())
            .find(|child| matches!(child.kind(), IDENTIFIER | STRING_LITERAL | NUMERIC_LITERAL)),
    }
}

/// The declared name, with quotes removed from string-literal member names.
/// Module names keep their quotes, as in `declare module "fs"`.
pub fn declaration_name(node: SyntaxNode<'_>) -> Option<&str> {
    let token = name_token(node)?;
    let text = token.text_trimmed();
    if token.kind() == STRING_LITERAL && node.kind() != MODULE_DECLARATION {
        return Some(unquote(text));
    }
    Some(text)
}

pub fn has_modifier(node: SyntaxNode<'_>, modifier: SyntaxKind) -> bool {
    node.children().take_while(|child| child.is_token()).any(|child| child.kind() == modifier)
}

pub fn modifiers(node: SyntaxNode<'_>) -> impl Iterator<Item = SyntaxNode<'_>> + '_ {
    node.children().take_while(|child| child.is_token()).filter(|child| child.kind().is_modifier())
}

/// The unquoted module specifier of an import or re-export.
pub fn module_specifier(node: SyntaxNode<'_>) -> Option<&str> {
    node.child(STRING_LITERAL).map(|literal| unquote(literal.text_trimmed()))
}

pub fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'' | '`')), Some(close)) if open == close && text.len() >= 2 => {
            &text[1..text.len() - 1]
        }
        (Some('"' | '\'' | '`'), _) => &text[1..],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let parse = morph_parse::parse_text(
            "export declare class A {}\nimport { B as C } from './b';\nclass { 'quoted': 1 }",
        );
        let root = parse.tree().root();
        let mut statements = root.children();

        let class = statements.next().unwrap();
        assert_eq!(declaration_name(class), Some("A"));
        assert!(has_modifier(class, EXPORT_KW));
        assert!(has_modifier(class, DECLARE_KW));
        assert_eq!(modifiers(class).count(), 2);

        let import = statements.next().unwrap();
        assert_eq!(module_specifier(import), Some("./b"));
        let specifier = import.descendants().find(|node| node.kind() == IMPORT_SPECIFIER).unwrap();
        assert_eq!(declaration_name(specifier), Some("C"));

        let anonymous = statements.next().unwrap();
        assert_eq!(declaration_name(anonymous), None);
        let property = anonymous.child(PROPERTY_DECLARATION).unwrap();
        assert_eq!(declaration_name(property), Some("quoted"));
    }

    #[test]
    fn unquoting() {
        assert_eq!(unquote("\"a\""), "a");
        assert_eq!(unquote("'b'"), "b");
        assert_eq!(unquote("'unterminated"), "unterminated");
        assert_eq!(unquote("plain"), "plain");
    }
}
