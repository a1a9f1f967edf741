//! Expressions are kept opaque: a balanced run of tokens wrapped in one
//! `EXPRESSION` node. Nothing downstream looks inside them.

use morph_syntax::SyntaxKind::{self, *};

use super::items;
use crate::parser::{CompletedMarker, Parser};

pub(crate) fn expression(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if at_expression_end(p.peek_kind()) {
        p.error("expected an expression");
        return None;
    }

    let m = p.start();
    let mut depth = 0u32;
    let mut prev = None;

    loop {
        let kind = p.peek_kind();
        if kind == EOF {
            break;
        }

        if depth == 0 {
            if at_expression_end(kind) {
                break;
            }
            if p.has_newline_before() && prev.is_some_and(ends_expression) && !continues(kind) {
                break;
            }
        }

        match kind {
            OPEN_BRACE | OPEN_PAREN | OPEN_BRACKET => depth += 1,
            CLOSE_BRACE | CLOSE_PAREN | CLOSE_BRACKET => depth = depth.saturating_sub(1),
            _ => {}
        }

        prev = Some(kind);
        p.advance();
    }

    Some(m.complete(p, EXPRESSION))
}

fn at_expression_end(kind: SyntaxKind) -> bool {
    matches!(kind, SEMICOLON | COMMA | CLOSE_PAREN | CLOSE_BRACKET | CLOSE_BRACE | EOF)
}

fn ends_expression(kind: SyntaxKind) -> bool {
    !matches!(
        kind,
        OPERATOR
            | EQUALS
            | EQUALS_GREATER_THAN
            | DOT
            | QUESTION
            | COLON
            | BAR
            | AMPERSAND
            | ASTERISK
            | LESS_THAN
            | OPEN_BRACE
            | OPEN_PAREN
            | OPEN_BRACKET
            | NEW_KW
            | RETURN_KW
    )
}

fn continues(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        DOT | OPERATOR | QUESTION | EQUALS | EQUALS_GREATER_THAN | BAR | AMPERSAND | AS_KW
    )
}

pub(crate) fn block(p: &mut Parser<'_>) {
    if !p.at(OPEN_BRACE) {
        p.error("expected a block");
        return;
    }

    let m = p.start();
    p.advance();

    while !matches!(p.peek_kind(), CLOSE_BRACE | EOF) {
        items::statement(p);
    }

    p.expect(CLOSE_BRACE);
    m.complete(p, BLOCK);
}

/// A body or, for overloads and ambient declarations, a `;` or nothing.
pub(crate) fn optional_body(p: &mut Parser<'_>) {
    if p.at(OPEN_BRACE) {
        block(p);
    } else {
        p.eat(SEMICOLON);
    }
}
