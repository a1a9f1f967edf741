use std::fmt::Write as _;

use expect_test::{Expect, expect};

use crate::parse_text;

#[track_caller]
fn check(text: &str, expect: Expect) {
    let parse = parse_text(text);
    let root = parse.tree().root();
    assert_eq!(root.text(), text, "the tree must cover the whole text");

    let mut actual = String::new();
    for node in parse.tree().preorder().filter(|node| !node.is_token()) {
        let indent = node.depth() as usize * 2;
        writeln!(actual, "{:indent$}{:?}", "", node.kind()).unwrap();
    }
    for diagnostic in parse.diagnostics() {
        writeln!(actual, "error: {}", diagnostic.message()).unwrap();
    }

    expect.assert_eq(&actual);
}

#[test]
fn class_members() {
    check(
        r#"class A extends B<T> implements C, D.E {
    x: number = 1;
    constructor(private y: string) {}
    get z(): T { return this.x }
    m?(): void;
}"#,
        expect![[r#"
            SOURCE_FILE
              CLASS_DECLARATION
                HERITAGE_CLAUSE
                  EXPRESSION_WITH_TYPE_ARGUMENTS
                    TYPE_ARGUMENT_LIST
                      TYPE_REFERENCE
                HERITAGE_CLAUSE
                  EXPRESSION_WITH_TYPE_ARGUMENTS
                  EXPRESSION_WITH_TYPE_ARGUMENTS
                    QUALIFIED_NAME
                PROPERTY_DECLARATION
                  KEYWORD_TYPE
                  EXPRESSION
                CONSTRUCTOR
                  PARAMETER_LIST
                    PARAMETER
                      KEYWORD_TYPE
                  BLOCK
                GET_ACCESSOR
                  PARAMETER_LIST
                  TYPE_REFERENCE
                  BLOCK
                    RETURN_STATEMENT
                      EXPRESSION
                METHOD_DECLARATION
                  PARAMETER_LIST
                  KEYWORD_TYPE
        "#]],
    );
}

#[test]
fn module_statements() {
    check(
        r#"import { A as B, type C } from "./a";
import * as ns from "./b";
export { B };
export as namespace Lib;
namespace N.M { export enum E { X = 1, Y } }
type T<U> = U[] | "a" | (() => void);
const x: number = 1, y = 2;
"#,
        expect![[r#"
            SOURCE_FILE
              IMPORT_DECLARATION
                IMPORT_CLAUSE
                  NAMED_IMPORTS
                    IMPORT_SPECIFIER
                    IMPORT_SPECIFIER
              IMPORT_DECLARATION
                IMPORT_CLAUSE
                  NAMESPACE_IMPORT
              EXPORT_DECLARATION
                NAMED_EXPORTS
                  EXPORT_SPECIFIER
              NAMESPACE_EXPORT_DECLARATION
              MODULE_DECLARATION
                MODULE_DECLARATION
                  MODULE_BLOCK
                    ENUM_DECLARATION
                      ENUM_MEMBER
                        EXPRESSION
                      ENUM_MEMBER
              TYPE_ALIAS_DECLARATION
                TYPE_PARAMETER_LIST
                  TYPE_PARAMETER
                UNION_TYPE
                  ARRAY_TYPE
                    TYPE_REFERENCE
                  LITERAL_TYPE
                  PARENTHESIZED_TYPE
                    FUNCTION_TYPE
                      PARAMETER_LIST
                      KEYWORD_TYPE
              VARIABLE_STATEMENT
                VARIABLE_DECLARATION
                  KEYWORD_TYPE
                  EXPRESSION
                VARIABLE_DECLARATION
                  EXPRESSION
        "#]],
    );
}

#[test]
fn statements_without_semicolons() {
    check(
        r#"function f(a?: string, ...rest: number[]): void {
    this.x = 1
    this.y = a
    return
}"#,
        expect![[r#"
            SOURCE_FILE
              FUNCTION_DECLARATION
                PARAMETER_LIST
                  PARAMETER
                    KEYWORD_TYPE
                  PARAMETER
                    ARRAY_TYPE
                      KEYWORD_TYPE
                KEYWORD_TYPE
                BLOCK
                  EXPRESSION_STATEMENT
                    EXPRESSION
                  EXPRESSION_STATEMENT
                    EXPRESSION
                  RETURN_STATEMENT
        "#]],
    );
}

#[test]
fn missing_type() {
    check(
        "class A { x: }",
        expect![[r#"
            SOURCE_FILE
              CLASS_DECLARATION
                PROPERTY_DECLARATION
            error: expected a type
        "#]],
    );
}

#[test]
fn unexpected_class_member() {
    check(
        "class A { ) }",
        expect![[r#"
            SOURCE_FILE
              CLASS_DECLARATION
                ERROR
            error: expected a class member
        "#]],
    );
}

#[test]
fn trivia_belongs_to_the_next_token() {
    let text = "//a\nclass Test {} //b\n/*c*/\n/*d*/interface Interface {}\n//e";
    let parse = parse_text(text);
    assert!(parse.diagnostics().is_empty());

    let root = parse.tree().root();
    let children = root.children().map(|child| format!("{child:?}")).collect::<Vec<_>>();
    assert_eq!(children, [
        "CLASS_DECLARATION@0..17",
        "INTERFACE_DECLARATION@17..55",
        "EOF@55..59"
    ]);

    let eof = root.last_child().unwrap();
    assert_eq!(eof.text(), "\n//e");
    assert_eq!(eof.trimmed_range().start(), eof.text_range().end());
}

#[test]
fn garbage_is_covered() {
    for text in ["}}}", "class", "import {", "export as", "class A extends {}", "enum E { , }", "let = 1"] {
        let parse = parse_text(text);
        assert_eq!(parse.tree().root().text(), text);
        assert!(parse.has_errors(), "expected errors for {text:?}");
    }
}
