use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxSet;

use super::{entity_name, parameter_list, type_argument_list, type_parameter_list};
use crate::parser::{CompletedMarker, Parser};

pub(crate) const TYPE_FIRST: SyntaxSet = SyntaxSet::new([
    IDENTIFIER,
    STRING_LITERAL,
    NUMERIC_LITERAL,
    OPEN_BRACE,
    OPEN_BRACKET,
    OPEN_PAREN,
    LESS_THAN,
    BAR,
    AMPERSAND,
    NEW_KW,
]);

pub(crate) fn type_(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(p, BAR, UNION_TYPE, |p| binary(p, AMPERSAND, INTERSECTION_TYPE, postfix))
}

/// `A | B | C` as one flat node; a leading operator is allowed, as in
/// multi-line unions.
fn binary(
    p: &mut Parser<'_>,
    operator: SyntaxKind,
    kind: SyntaxKind,
    operand: fn(&mut Parser<'_>) -> Option<CompletedMarker>,
) -> Option<CompletedMarker> {
    if p.at(operator) {
        let m = p.start();
        p.advance();
        operand(p);
        while p.eat(operator) {
            operand(p);
        }
        return Some(m.complete(p, kind));
    }

    let lhs = operand(p)?;
    if !p.at(operator) {
        return Some(lhs);
    }

    let m = lhs.precede(p);
    while p.eat(operator) {
        operand(p);
    }
    Some(m.complete(p, kind))
}

fn postfix(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = primary(p)?;

    while p.at(OPEN_BRACKET) && p.nth(1) == CLOSE_BRACKET && !p.has_newline_before() {
        let m = lhs.precede(p);
        p.advance();
        p.advance();
        lhs = m.complete(p, ARRAY_TYPE);
    }

    Some(lhs)
}

fn primary(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let kind = p.peek_kind();
    match kind {
        _ if kind.is_type_keyword() => {
            let m = p.start();
            p.advance();
            Some(m.complete(p, KEYWORD_TYPE))
        }
        STRING_LITERAL | NUMERIC_LITERAL | TRUE_KW | FALSE_KW => {
            let m = p.start();
            p.advance();
            Some(m.complete(p, LITERAL_TYPE))
        }
        OPERATOR if p.nth_text(0) == "-" && p.nth(1) == NUMERIC_LITERAL => {
            let m = p.start();
            p.advance();
            p.advance();
            Some(m.complete(p, LITERAL_TYPE))
        }
        OPEN_BRACE => Some(type_literal(p)),
        OPEN_BRACKET => Some(tuple(p)),
        OPEN_PAREN if at_function_type(p) => Some(function_type(p)),
        LESS_THAN | NEW_KW => Some(function_type(p)),
        OPEN_PAREN => {
            let m = p.start();
            p.advance();
            type_(p);
            p.expect(CLOSE_PAREN);
            Some(m.complete(p, PARENTHESIZED_TYPE))
        }
        _ if kind.is_identifier_like() => {
            let m = p.start();
            entity_name(p);
            if !p.has_newline_before() {
                type_argument_list(p);
            }
            Some(m.complete(p, TYPE_REFERENCE))
        }
        _ => {
            p.error("expected a type");
            None
        }
    }
}

/// Distinguishes `(a: T) => U` from `(T)`.
fn at_function_type(p: &Parser<'_>) -> bool {
    match p.nth(1) {
        CLOSE_PAREN | DOT_DOT_DOT => true,
        kind if kind.is_identifier_like() => match p.nth(2) {
            COLON | COMMA | QUESTION | EQUALS => true,
            CLOSE_PAREN => p.nth(3) == EQUALS_GREATER_THAN,
            _ => false,
        },
        _ => false,
    }
}

fn function_type(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.eat(NEW_KW);
    type_parameter_list(p);
    parameter_list(p);
    if p.expect(EQUALS_GREATER_THAN) {
        type_(p);
    }
    m.complete(p, FUNCTION_TYPE)
}

fn tuple(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    super::delimited(
        p,
        OPEN_BRACKET,
        CLOSE_BRACKET,
        COMMA,
        "expected an element type",
        &TYPE_FIRST,
        |p| type_(p).is_some(),
    );
    m.complete(p, TUPLE_TYPE)
}

fn type_literal(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    super::items::type_members(p);
    m.complete(p, TYPE_LITERAL)
}
