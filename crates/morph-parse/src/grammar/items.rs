use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxSet;

use super::exprs::{self, block, optional_body};
use super::{
    at_modifier, delimited, entity_name, modifiers, name, parameter_list, property_name,
    type_annotation, type_argument_list, type_parameter_list, types,
};
use crate::parser::{Marker, Parser};

pub(crate) fn source_file(p: &mut Parser<'_>) {
    let m = p.start();

    while !p.at(EOF) {
        statement(p);
    }

    p.finish_eof();
    m.complete(p, SOURCE_FILE);
}

const DECLARATION_RECOVERY: SyntaxSet = SyntaxSet::new([SEMICOLON, OPEN_BRACE, CLOSE_BRACE]);

pub(crate) fn statement(p: &mut Parser<'_>) {
    let m = p.start();

    if p.at(EXPORT_KW) {
        match p.nth(1) {
            OPEN_BRACE | ASTERISK => return export_declaration(p, m),
            TYPE_KW if matches!(p.nth(2), OPEN_BRACE | ASTERISK) => {
                return export_declaration(p, m);
            }
            EQUALS => return export_assignment(p, m),
            DEFAULT_KW if !starts_default_declaration(p.nth(2)) => {
                return export_assignment(p, m);
            }
            AS_KW if p.nth(2) == NAMESPACE_KW => return namespace_export(p, m),
            _ => {}
        }
    }

    let has_modifiers = modifiers(p);

    match p.peek_kind() {
        CLASS_KW => class_declaration(p, m),
        INTERFACE_KW if p.nth(1).is_identifier_like() => interface_declaration(p, m),
        FUNCTION_KW => function_declaration(p, m),
        NAMESPACE_KW | MODULE_KW if matches!(p.nth(1), IDENTIFIER | STRING_LITERAL) => {
            module_declaration(p, m)
        }
        ENUM_KW => enum_declaration(p, m),
        CONST_KW if p.nth(1) == ENUM_KW => {
            p.advance();
            enum_declaration(p, m)
        }
        TYPE_KW if p.nth(1).is_identifier_like() => type_alias(p, m),
        VAR_KW | LET_KW | CONST_KW => variable_statement(p, m),
        IMPORT_KW if !has_modifiers => import_declaration(p, m),
        RETURN_KW if !has_modifiers => {
            p.advance();
            if !p.at(SEMICOLON) && !p.at(CLOSE_BRACE) && !p.has_newline_before() {
                exprs::expression(p);
            }
            p.eat(SEMICOLON);
            m.complete(p, RETURN_STATEMENT);
        }
        SEMICOLON if !has_modifiers => {
            p.advance();
            m.complete(p, EMPTY_STATEMENT);
        }
        OPEN_BRACE if !has_modifiers => {
            m.abandon(p);
            block(p);
        }
        _ if has_modifiers => {
            p.error("expected a declaration");
            m.complete(p, ERROR);
        }
        _ => {
            if exprs::expression(p).is_none() {
                m.abandon(p);
                p.error_and_bump("expected a statement");
                return;
            }
            p.eat(SEMICOLON);
            m.complete(p, EXPRESSION_STATEMENT);
        }
    }
}

fn starts_default_declaration(kind: SyntaxKind) -> bool {
    matches!(kind, CLASS_KW | FUNCTION_KW | INTERFACE_KW | ABSTRACT_KW | ASYNC_KW)
}

fn class_declaration(p: &mut Parser<'_>, m: Marker) {
    p.advance();

    if p.peek_kind().is_identifier_like() && !matches!(p.peek_kind(), EXTENDS_KW | IMPLEMENTS_KW) {
        p.advance_remap(IDENTIFIER);
    }
    type_parameter_list(p);
    heritage_clauses(p);

    if p.at(OPEN_BRACE) {
        p.advance();
        while !matches!(p.peek_kind(), CLOSE_BRACE | EOF) {
            class_member(p);
        }
        p.expect(CLOSE_BRACE);
    } else {
        p.error("expected `{`");
    }

    m.complete(p, CLASS_DECLARATION);
}

fn heritage_clauses(p: &mut Parser<'_>) {
    while matches!(p.peek_kind(), EXTENDS_KW | IMPLEMENTS_KW) {
        let m = p.start();
        p.advance();
        loop {
            expression_with_type_arguments(p);
            if !p.eat(COMMA) {
                break;
            }
        }
        m.complete(p, HERITAGE_CLAUSE);
    }
}

fn expression_with_type_arguments(p: &mut Parser<'_>) {
    let m = p.start();
    if !entity_name(p) {
        p.error("expected a type name");
    }
    type_argument_list(p);
    m.complete(p, EXPRESSION_WITH_TYPE_ARGUMENTS);
}

fn class_member(p: &mut Parser<'_>) {
    if p.at(SEMICOLON) {
        let m = p.start();
        p.advance();
        m.complete(p, SEMICOLON_CLASS_ELEMENT);
        return;
    }

    let m = p.start();
    modifiers(p);

    match p.peek_kind() {
        CONSTRUCTOR_KW if p.nth(1) == OPEN_PAREN => {
            p.advance();
            parameter_list(p);
            optional_body(p);
            m.complete(p, CONSTRUCTOR);
        }
        kind @ (GET_KW | SET_KW) if at_accessor_name(p) => {
            p.advance();
            property_name(p);
            parameter_list(p);
            type_annotation(p);
            optional_body(p);
            m.complete(p, if kind == GET_KW { GET_ACCESSOR } else { SET_ACCESSOR });
        }
        _ => {
            p.eat(ASTERISK);
            if !property_name(p) {
                m.abandon(p);
                p.error_and_bump("expected a class member");
                return;
            }

            if p.at(QUESTION) || p.at(EXCLAMATION) {
                p.advance();
            }

            if matches!(p.peek_kind(), OPEN_PAREN | LESS_THAN) {
                type_parameter_list(p);
                parameter_list(p);
                type_annotation(p);
                optional_body(p);
                m.complete(p, METHOD_DECLARATION);
            } else {
                type_annotation(p);
                if p.eat(EQUALS) {
                    exprs::expression(p);
                }
                p.eat(SEMICOLON);
                m.complete(p, PROPERTY_DECLARATION);
            }
        }
    }
}

fn at_accessor_name(p: &Parser<'_>) -> bool {
    let next = p.nth(1);
    next.is_identifier_like() || matches!(next, STRING_LITERAL | NUMERIC_LITERAL)
}

fn interface_declaration(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p, &DECLARATION_RECOVERY);
    type_parameter_list(p);
    heritage_clauses(p);
    type_members(p);
    m.complete(p, INTERFACE_DECLARATION);
}

/// `{ a: T; b(): U }`, shared by interfaces and type literals.
pub(crate) fn type_members(p: &mut Parser<'_>) {
    if !p.at(OPEN_BRACE) {
        p.error("expected `{`");
        return;
    }

    p.advance();
    while !matches!(p.peek_kind(), CLOSE_BRACE | EOF) {
        type_member(p);
    }
    p.expect(CLOSE_BRACE);
}

fn type_member(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(READONLY_KW) && at_modifier(p) {
        p.advance();
    }

    if !property_name(p) {
        m.abandon(p);
        p.error_and_bump("expected a property or method signature");
        return;
    }
    p.eat(QUESTION);

    let kind = if matches!(p.peek_kind(), OPEN_PAREN | LESS_THAN) {
        type_parameter_list(p);
        parameter_list(p);
        type_annotation(p);
        METHOD_SIGNATURE
    } else {
        type_annotation(p);
        PROPERTY_SIGNATURE
    };

    if !p.eat(SEMICOLON) {
        p.eat(COMMA);
    }
    m.complete(p, kind);
}

fn function_declaration(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    p.eat(ASTERISK);
    if p.peek_kind().is_identifier_like() {
        p.advance_remap(IDENTIFIER);
    }
    type_parameter_list(p);
    parameter_list(p);
    type_annotation(p);
    optional_body(p);
    m.complete(p, FUNCTION_DECLARATION);
}

fn module_declaration(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    module_rest(p, m);
}

/// Name and body; `namespace A.B {}` nests `B` as the body of `A`.
fn module_rest(p: &mut Parser<'_>, m: Marker) {
    if p.at(STRING_LITERAL) {
        p.advance();
    } else {
        name(p, &DECLARATION_RECOVERY);
    }

    if p.eat(DOT) {
        let inner = p.start();
        module_rest(p, inner);
    } else if p.at(OPEN_BRACE) {
        let block = p.start();
        p.advance();
        while !matches!(p.peek_kind(), CLOSE_BRACE | EOF) {
            statement(p);
        }
        p.expect(CLOSE_BRACE);
        block.complete(p, MODULE_BLOCK);
    } else {
        p.eat(SEMICOLON);
    }

    m.complete(p, MODULE_DECLARATION);
}

fn enum_declaration(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p, &DECLARATION_RECOVERY);

    if p.at(OPEN_BRACE) {
        delimited(
            p,
            OPEN_BRACE,
            CLOSE_BRACE,
            COMMA,
            "expected an enum member",
            &SyntaxSet::new([IDENTIFIER, STRING_LITERAL]),
            enum_member,
        );
    } else {
        p.error("expected `{`");
    }

    m.complete(p, ENUM_DECLARATION);
}

fn enum_member(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    if !property_name(p) {
        m.abandon(p);
        p.error("expected an enum member");
        return false;
    }
    if p.eat(EQUALS) {
        exprs::expression(p);
    }
    m.complete(p, ENUM_MEMBER);
    true
}

fn type_alias(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p, &DECLARATION_RECOVERY);
    type_parameter_list(p);
    if p.expect(EQUALS) {
        types::type_(p);
    }
    p.eat(SEMICOLON);
    m.complete(p, TYPE_ALIAS_DECLARATION);
}

fn variable_statement(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    loop {
        variable_declaration(p);
        if !p.eat(COMMA) {
            break;
        }
    }
    p.eat(SEMICOLON);
    m.complete(p, VARIABLE_STATEMENT);
}

fn variable_declaration(p: &mut Parser<'_>) {
    let m = p.start();
    name(p, &SyntaxSet::new([COMMA, SEMICOLON, EQUALS, COLON]));
    p.eat(EXCLAMATION);
    type_annotation(p);
    if p.eat(EQUALS) {
        exprs::expression(p);
    }
    m.complete(p, VARIABLE_DECLARATION);
}

fn import_declaration(p: &mut Parser<'_>, m: Marker) {
    p.advance();

    if !p.at(STRING_LITERAL) {
        import_clause(p);
        p.expect(FROM_KW);
    }
    p.expect(STRING_LITERAL);
    p.eat(SEMICOLON);
    m.complete(p, IMPORT_DECLARATION);
}

fn import_clause(p: &mut Parser<'_>) {
    let m = p.start();

    if p.at(TYPE_KW) && p.nth(1) != FROM_KW && p.nth(1) != COMMA {
        p.advance();
    }

    let mut expect_bindings = true;
    if p.peek_kind().is_identifier_like() && !p.at(FROM_KW) {
        p.advance_remap(IDENTIFIER);
        expect_bindings = p.eat(COMMA);
    }

    if expect_bindings {
        match p.peek_kind() {
            OPEN_BRACE => {
                let list = p.start();
                delimited(
                    p,
                    OPEN_BRACE,
                    CLOSE_BRACE,
                    COMMA,
                    "expected an import specifier",
                    &SyntaxSet::new([IDENTIFIER]),
                    |p| specifier(p, IMPORT_SPECIFIER),
                );
                list.complete(p, NAMED_IMPORTS);
            }
            ASTERISK => {
                let namespace = p.start();
                p.advance();
                p.expect(AS_KW);
                name(p, &SyntaxSet::new([FROM_KW]));
                namespace.complete(p, NAMESPACE_IMPORT);
            }
            _ => p.error("expected import bindings"),
        }
    }

    m.complete(p, IMPORT_CLAUSE);
}

/// `name` or `name as alias`, optionally prefixed with `type`.
fn specifier(p: &mut Parser<'_>, kind: SyntaxKind) -> bool {
    if !p.peek_kind().is_identifier_like() {
        return false;
    }

    let m = p.start();
    if p.at(TYPE_KW) && p.nth(1).is_identifier_like() && p.nth(1) != AS_KW {
        p.advance();
    }
    p.advance_remap(IDENTIFIER);
    if p.eat(AS_KW) {
        name(p, &SyntaxSet::new([COMMA, CLOSE_BRACE]));
    }
    m.complete(p, kind);
    true
}

fn export_declaration(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    if p.at(TYPE_KW) {
        p.advance();
    }

    if p.at(ASTERISK) {
        p.advance();
        if p.eat(AS_KW) {
            name(p, &SyntaxSet::new([FROM_KW]));
        }
        p.expect(FROM_KW);
        p.expect(STRING_LITERAL);
    } else {
        let list = p.start();
        delimited(
            p,
            OPEN_BRACE,
            CLOSE_BRACE,
            COMMA,
            "expected an export specifier",
            &SyntaxSet::new([IDENTIFIER]),
            |p| specifier(p, EXPORT_SPECIFIER),
        );
        list.complete(p, NAMED_EXPORTS);
        if p.eat(FROM_KW) {
            p.expect(STRING_LITERAL);
        }
    }

    p.eat(SEMICOLON);
    m.complete(p, EXPORT_DECLARATION);
}

/// `export default expr;` and `export = expr;`
fn export_assignment(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    p.advance();
    exprs::expression(p);
    p.eat(SEMICOLON);
    m.complete(p, EXPORT_DECLARATION);
}

fn namespace_export(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    p.advance();
    p.advance();
    name(p, &SyntaxSet::new([SEMICOLON]));
    p.eat(SEMICOLON);
    m.complete(p, NAMESPACE_EXPORT_DECLARATION);
}
