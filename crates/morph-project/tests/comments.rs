use morph_project::structures::PropertyStructure;
use morph_project::{
    AstNode as _, CommentRange, CreateSourceFileOptions, JsDocableNode as _, NamedNode as _,
    NodeVariant, Project, RemovableNode as _, StatementedNode as _, SyntaxKind,
};

#[test]
fn comments_between_statements_are_nodes() {
    let project = Project::new();
    let file = project
        .create_source_file(
            "/test.ts",
            "// header\n\nclass A {}\n// tail\n",
            CreateSourceFileOptions::default(),
        )
        .unwrap();

    let items = file.statements_with_comments().unwrap();
    let kinds = items.iter().map(|item| item.kind()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [SyntaxKind::SINGLE_LINE_COMMENT, SyntaxKind::CLASS_DECLARATION, SyntaxKind::SINGLE_LINE_COMMENT]
    );
    assert_eq!(file.statements_with_comments().unwrap(), items);

    let [header, class, tail] = items[..] else { panic!("three items") };
    assert!(header.is_comment());
    assert!(!class.is_comment());
    assert_eq!(header.text().unwrap(), "// header");
    assert_eq!(tail.text().unwrap(), "// tail");
    assert!(header.symbol().is_err());
    let NodeVariant::Comment(header) = header.variant() else { panic!("a comment") };
    assert!(!header.is_js_doc().unwrap());

    file.class_or_err("A").unwrap().set_name("Bee").unwrap();
    assert!(!tail.is_forgotten());
    assert_eq!(tail.text().unwrap(), "// tail");

    header.remove().unwrap();
    assert!(header.syntax().is_forgotten());
    assert_eq!(file.full_text().unwrap(), "class Bee {}\n// tail\n");
}

#[test]
fn class_members_with_comments() {
    let project = Project::new();
    let file = project
        .create_source_file(
            "/test.ts",
            "class A {\n    // first\n    x: string;\n    /** doc */\n    y: number;\n}",
            CreateSourceFileOptions::default(),
        )
        .unwrap();
    let class = file.class_or_err("A").unwrap();

    let members = class.members_with_comments().unwrap();
    let kinds = members.iter().map(|member| member.kind()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [SyntaxKind::SINGLE_LINE_COMMENT, SyntaxKind::PROPERTY_DECLARATION, SyntaxKind::PROPERTY_DECLARATION]
    );
    assert_eq!(class.members().unwrap().len(), 2);

    let y = class.property_or_err("y").unwrap();
    let docs = y.js_docs().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].text().unwrap(), "/** doc */");
    assert!(docs[0].is_js_doc().unwrap());
}

#[test]
fn js_docs_are_added_and_removed() {
    let project = Project::new();
    let file = project
        .create_source_file("/test.ts", "/** Doc */\nclass A {}", CreateSourceFileOptions::default())
        .unwrap();
    let class = file.class_or_err("A").unwrap();
    assert_eq!(file.statements_with_comments().unwrap(), [class.syntax()]);

    let added: CommentRange<'_> = class.add_js_doc("More").unwrap();
    assert_eq!(added.text().unwrap(), "/**\n * More\n */");
    assert_eq!(file.full_text().unwrap(), "/** Doc */\n/**\n * More\n */\nclass A {}");
    assert_eq!(class.js_docs().unwrap().len(), 2);
    assert_eq!(file.classes().unwrap(), [class]);

    class.remove_js_docs().unwrap();
    assert!(added.syntax().is_forgotten());
    assert_eq!(file.full_text().unwrap(), "class A {}");
}

#[test]
fn file_children_interleave_comments() {
    let text = "//a\nclass Test {} //b\n/*c*/\n/*d*/interface Interface {}\n//e";
    let project = Project::new();
    let file = project.create_source_file("/test.ts", text, CreateSourceFileOptions::default()).unwrap();

    let children = file.syntax().children_with_comments().unwrap();
    let kinds = children.iter().map(|child| child.kind()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            SyntaxKind::SINGLE_LINE_COMMENT,
            SyntaxKind::CLASS_DECLARATION,
            SyntaxKind::SINGLE_LINE_COMMENT,
            SyntaxKind::MULTI_LINE_COMMENT,
            SyntaxKind::INTERFACE_DECLARATION,
            SyntaxKind::SINGLE_LINE_COMMENT,
            SyntaxKind::EOF,
        ]
    );
    assert_eq!(file.syntax().children_with_comments().unwrap(), children);
    assert_eq!(children[2].text().unwrap(), "//b");
    assert_eq!(children[5].text().unwrap(), "//e");
}

#[test]
fn members_are_added_next_to_comments() {
    let project = Project::new();
    let file = project
        .create_source_file(
            "/test.ts",
            "class A {\n    // note\n    a: string;\n}\n",
            CreateSourceFileOptions::default(),
        )
        .unwrap();
    let class = file.class_or_err("A").unwrap();
    let note = class.members_with_comments().unwrap()[0];
    assert!(note.is_comment());

    class.add_property(&PropertyStructure::new("b").with_type("number")).unwrap();
    assert_eq!(class.property_or_err("b").unwrap().name().unwrap(), "b");
    assert!(!note.is_forgotten());
    assert_eq!(note.text().unwrap(), "// note");
    assert!(file.full_text().unwrap().contains("    a: string;\n    b: number;\n}"));
}
