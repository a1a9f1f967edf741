use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxSet;

use crate::parser::Parser;

pub(crate) mod exprs;
pub(crate) mod items;
pub(crate) mod types;

/// Parses a declaration name, remapping contextual keywords to `IDENTIFIER`.
pub(crate) fn name(p: &mut Parser<'_>, recovery: &SyntaxSet) -> bool {
    if p.peek_kind().is_identifier_like() {
        p.advance_remap(IDENTIFIER);
        return true;
    }
    p.error_recover("expected an identifier", recovery);
    false
}

/// Names of members and enum members may also be string or numeric literals.
pub(crate) fn property_name(p: &mut Parser<'_>) -> bool {
    match p.peek_kind() {
        STRING_LITERAL | NUMERIC_LITERAL => {
            p.advance();
            true
        }
        kind if kind.is_identifier_like() => {
            p.advance_remap(IDENTIFIER);
            true
        }
        _ => false,
    }
}

pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    unexpected_delim_message: &'static str,
    first_set: &SyntaxSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            let m = p.start();
            p.error(unexpected_delim_message);
            p.advance();
            m.complete(p, ERROR);
            continue;
        }

        if !parser(p) {
            break;
        }

        if !p.eat(delim) {
            if first_set.contains(p.peek_kind()) {
                p.expect(delim);
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}

/// Whether the current modifier keyword is used as a modifier rather than
/// as a name, as in `static readonly x` versus `readonly: boolean`.
pub(crate) fn at_modifier(p: &Parser<'_>) -> bool {
    p.peek_kind().is_modifier() && {
        let next = p.nth(1);
        next.is_identifier_like()
            || matches!(next, STRING_LITERAL | NUMERIC_LITERAL | OPEN_BRACKET | ASTERISK)
    }
}

pub(crate) fn modifiers(p: &mut Parser<'_>) -> bool {
    let mut any = false;
    while at_modifier(p) {
        p.advance();
        any = true;
    }
    any
}

/// `A` or `A.B.C`, the latter as left-nested `QUALIFIED_NAME` nodes.
pub(crate) fn entity_name(p: &mut Parser<'_>) -> bool {
    if !p.peek_kind().is_identifier_like() {
        return false;
    }

    if p.nth(1) != DOT {
        p.advance_remap(IDENTIFIER);
        return true;
    }

    let m = p.start();
    p.advance_remap(IDENTIFIER);
    p.advance();
    name(p, &SyntaxSet::EMPTY);
    let mut lhs = m.complete(p, QUALIFIED_NAME);

    while p.at(DOT) {
        let m = lhs.precede(p);
        p.advance();
        name(p, &SyntaxSet::EMPTY);
        lhs = m.complete(p, QUALIFIED_NAME);
    }

    true
}

pub(crate) fn type_parameter_list(p: &mut Parser<'_>) {
    if !p.at(LESS_THAN) {
        return;
    }

    let m = p.start();
    delimited(
        p,
        LESS_THAN,
        GREATER_THAN,
        COMMA,
        "expected a type parameter",
        &TYPE_PARAMETER_FIRST,
        type_parameter,
    );
    m.complete(p, TYPE_PARAMETER_LIST);
}

const TYPE_PARAMETER_FIRST: SyntaxSet = SyntaxSet::new([IDENTIFIER, CONST_KW]);

fn type_parameter(p: &mut Parser<'_>) -> bool {
    if !p.peek_kind().is_identifier_like() {
        return false;
    }

    let m = p.start();
    if p.at(CONST_KW) && p.nth(1).is_identifier_like() {
        p.advance();
    }
    p.advance_remap(IDENTIFIER);
    if p.eat(EXTENDS_KW) {
        types::type_(p);
    }
    if p.eat(EQUALS) {
        types::type_(p);
    }
    m.complete(p, TYPE_PARAMETER);
    true
}

pub(crate) fn type_argument_list(p: &mut Parser<'_>) {
    if !p.at(LESS_THAN) {
        return;
    }

    let m = p.start();
    delimited(
        p,
        LESS_THAN,
        GREATER_THAN,
        COMMA,
        "expected a type argument",
        &types::TYPE_FIRST,
        |p| types::type_(p).is_some(),
    );
    m.complete(p, TYPE_ARGUMENT_LIST);
}

pub(crate) fn parameter_list(p: &mut Parser<'_>) {
    if !p.at(OPEN_PAREN) {
        p.error("expected parameters");
        return;
    }

    let m = p.start();
    delimited(
        p,
        OPEN_PAREN,
        CLOSE_PAREN,
        COMMA,
        "expected a parameter",
        &PARAMETER_FIRST,
        parameter,
    );
    m.complete(p, PARAMETER_LIST);
}

const PARAMETER_FIRST: SyntaxSet =
    SyntaxSet::new([IDENTIFIER, DOT_DOT_DOT, PUBLIC_KW, PRIVATE_KW, PROTECTED_KW, READONLY_KW]);

fn parameter(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    modifiers(p);
    p.eat(DOT_DOT_DOT);

    if !p.peek_kind().is_identifier_like() {
        p.error("expected a parameter name");
        m.abandon(p);
        return false;
    }
    p.advance_remap(IDENTIFIER);
    p.eat(QUESTION);

    if p.eat(COLON) {
        types::type_(p);
    }
    if p.eat(EQUALS) {
        exprs::expression(p);
    }

    m.complete(p, PARAMETER);
    true
}

/// `: Type` after a declaration, if present.
pub(crate) fn type_annotation(p: &mut Parser<'_>) {
    if p.eat(COLON) {
        types::type_(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_parameter_first_covers_identifiers() {
        assert!(TYPE_PARAMETER_FIRST.contains(IDENTIFIER));
        assert!(!TYPE_PARAMETER_FIRST.contains(COMMA));
    }
}
