use expect_test::{Expect, expect};
use morph_project::structures::{ConstructorStructure, ParameterStructure, PropertyStructure};
use morph_project::{
    AstNode as _, CreateSourceFileOptions, Error, ErrorCategory, ModifierableNode as _,
    NamedNode as _, Project, RemovableNode as _, SourceFile, StatementedNode as _,
};
use text_size::TextSize;

#[track_caller]
fn check(text: &str, edit: impl FnOnce(SourceFile<'_>), expect: Expect) {
    let project = Project::new();
    let file = project.create_source_file("/test.ts", text, CreateSourceFileOptions::default()).unwrap();
    edit(file);
    expect.assert_eq(&file.full_text().unwrap());
}

#[test]
fn one_wrapper_per_node() {
    let project = Project::new();
    let file = project
        .create_source_file("/test.ts", "class A {\n    x: string;\n}\n", CreateSourceFileOptions::default())
        .unwrap();

    let class = file.class_or_err("A").unwrap();
    assert_eq!(class, file.classes().unwrap()[0]);
    assert_eq!(class.syntax(), file.statements().unwrap()[0]);

    let property = class.properties().unwrap()[0];
    assert_eq!(property.syntax().parent().unwrap(), Some(class.syntax()));
    assert_eq!(property.syntax().source_file().unwrap(), file);
    assert_eq!(project.source_file("/test.ts"), Some(file));
}

#[test]
fn insertion_between_same_kind_siblings_gets_a_fresh_wrapper() {
    check(
        "class A {\n    a: string;\n    b: string;\n}",
        |file| {
            let class = file.class_or_err("A").unwrap();
            let [a, b] = class.properties().unwrap()[..] else { panic!("two properties") };
            let b_start = b.syntax().start().unwrap();

            let x = class.insert_properties(1, &[PropertyStructure::new("x").with_type("string")]).unwrap()[0];

            assert_eq!(class.properties().unwrap(), [a, x, b]);
            assert_ne!(x, a);
            assert_ne!(x, b);
            assert_eq!(a.syntax().text().unwrap(), "a: string;");
            assert_eq!(b.syntax().text().unwrap(), "b: string;");
            assert_eq!(b.syntax().start().unwrap(), b_start + TextSize::of("\n    x: string;"));
        },
        expect![[r#"
            class A {
                a: string;
                x: string;
                b: string;
            }"#]],
    );
}

#[test]
fn edits_leave_other_wrappers_alone() {
    check(
        "class A {}\nclass B {}\nclass C {}\n",
        |file| {
            let [a, b, c] = file.classes().unwrap()[..] else { panic!("three classes") };
            let name = b.name_node().unwrap().unwrap();

            b.set_name("Renamed").unwrap();

            assert!(name.is_forgotten());
            assert!(!b.syntax().is_forgotten());
            assert_eq!(b.name().unwrap(), "Renamed");
            assert_eq!(a.syntax().text().unwrap(), "class A {}");
            assert_eq!(c.syntax().text().unwrap(), "class C {}");
            assert_eq!(file.classes().unwrap(), [a, b, c]);
        },
        expect![[r#"
            class A {}
            class Renamed {}
            class C {}
        "#]],
    );
}

#[test]
fn toggling_modifiers_keeps_the_wrapper() {
    check(
        "class A {}",
        |file| {
            let class = file.class_or_err("A").unwrap();
            class.set_is_exported(true).unwrap();
            assert_eq!(class.syntax().text().unwrap(), "export class A {}");
            class.set_is_default_export(true).unwrap();
            assert!(class.is_default_export().unwrap());
            assert_eq!(file.classes().unwrap(), [class]);

            class.set_is_exported(false).unwrap();
            assert!(!class.is_exported().unwrap());
            assert_eq!(file.classes().unwrap(), [class]);
        },
        expect!["class A {}"],
    );
}

#[test]
fn out_of_range_insertions_change_nothing() {
    let text = "class A {\n    a: string;\n}";
    check(
        text,
        |file| {
            let class = file.class_or_err("A").unwrap();
            let before = class.properties().unwrap();

            let error = class.insert_properties(3, &[PropertyStructure::new("x")]).unwrap_err();
            assert!(matches!(error, Error::IndexOutOfRange { index: 3, len: 1 }));
            assert_eq!(error.category(), ErrorCategory::InvalidManipulationRequest);
            assert_eq!(class.properties().unwrap(), before);
        },
        expect![[r#"
            class A {
                a: string;
            }"#]],
    );
}

#[test]
fn edits_introducing_syntax_errors_are_rejected() {
    check(
        "class A {}\n",
        |file| {
            let class = file.class_or_err("A").unwrap();
            let error = class.syntax().replace_with_text("class A {").unwrap_err();
            assert_eq!(error.category(), ErrorCategory::InvalidManipulationRequest);
            assert!(!class.syntax().is_forgotten());
            assert!(file.diagnostics().unwrap().is_empty());
        },
        expect![[r#"
            class A {}
        "#]],
    );
}

#[test]
fn trading_one_syntax_error_for_another_is_rejected() {
    check(
        "class A extends {}\nclass B {}",
        |file| {
            let before = file.diagnostics().unwrap();
            let error = file
                .syntax()
                .replace_with_text("class A extends X {}\nclass B extends {}")
                .unwrap_err();
            assert_eq!(error.category(), ErrorCategory::InvalidManipulationRequest);
            assert!(error.to_string().contains("37..38"), "{error}");
            assert_eq!(file.diagnostics().unwrap(), before);
        },
        expect!["class A extends {}\nclass B {}"],
    );
}

#[test]
fn existing_syntax_errors_do_not_block_other_edits() {
    let project = Project::new();
    let file = project
        .create_source_file(
            "/test.ts",
            "class A extends {}\nclass B {}",
            CreateSourceFileOptions::default(),
        )
        .unwrap();
    let before = file.diagnostics().unwrap();

    let class = file.class_or_err("B").unwrap();
    class.add_property(&PropertyStructure::new("x").with_type("string")).unwrap();
    assert_eq!(class.property_or_err("x").unwrap().name().unwrap(), "x");
    assert_eq!(file.diagnostics().unwrap().len(), before.len());
}

#[test]
fn adding_a_constructor_replaces_the_implementation() {
    check(
        "class A {\n    constructor(a: string) {\n    }\n}",
        |file| {
            let class = file.class_or_err("A").unwrap();
            let old = class.constructors().unwrap()[0];

            let new = class
                .add_constructor(
                    &ConstructorStructure::new()
                        .parameter(ParameterStructure::new("b").with_type("number")),
                )
                .unwrap();

            assert!(old.syntax().is_forgotten());
            assert_ne!(new, old);
            assert_eq!(class.constructors().unwrap(), [new]);
            assert_eq!(
                old.syntax().text().unwrap_err().category(),
                ErrorCategory::InvalidatedNodeAccess
            );
        },
        expect![[r#"
            class A {
                constructor(b: number) {
                }
            }"#]],
    );
}

#[test]
fn replace_with_text_returns_the_new_node() {
    check(
        "class A {}\nclass B {}\n",
        |file| {
            let [a, b] = file.classes().unwrap()[..] else { panic!("two classes") };
            let replaced = a.syntax().replace_with_text("interface A {}").unwrap();

            assert!(a.syntax().is_forgotten());
            assert!(file.interface("A").unwrap().is_some_and(|interface| interface.syntax() == replaced));
            assert_eq!(file.classes().unwrap(), [b]);
        },
        expect![[r#"
            interface A {}
            class B {}
        "#]],
    );
}

#[test]
fn forgotten_wrappers_stay_forgotten_across_edits() {
    let project = Project::new();
    let file = project
        .create_source_file("/test.ts", "class A {}\nclass B {}\n", CreateSourceFileOptions::default())
        .unwrap();
    let a = file.class_or_err("A").unwrap();
    let b = file.class_or_err("B").unwrap();

    a.remove().unwrap();
    for i in 0..3 {
        file.insert_statements(0, &format!("const c{i} = {i};")).unwrap();
    }

    assert!(a.syntax().is_forgotten());
    assert_eq!(a.name().unwrap_err().category(), ErrorCategory::InvalidatedNodeAccess);
    assert_eq!(b.name().unwrap(), "B");
    assert_eq!(file.classes().unwrap(), [b]);
}
