use morph_project::structures::PropertyStructure;
use morph_project::{
    AstNode as _, CreateSourceFileOptions, ErrorCategory, Project, RemovableNode as _,
    StatementedNode as _, SymbolFlags,
};

fn project() -> Project {
    let project = Project::new();
    let options = CreateSourceFileOptions::default();
    project
        .create_source_file(
            "/src/a.ts",
            "export class A {\n    x: string;\n    m(a: number): string;\n}\nexport class B extends A {}\n",
            options,
        )
        .unwrap();
    project
        .create_source_file("/src/b.ts", "import { A as Renamed } from \"./a\";\n", options)
        .unwrap();
    project
}

#[test]
fn symbols_of_declarations() {
    let project = project();
    let file = project.source_file_or_err("/src/a.ts").unwrap();
    let class = file.class_or_err("A").unwrap();

    let symbol = class.syntax().symbol_or_err().unwrap();
    assert_eq!(symbol, class.syntax().symbol_or_err().unwrap());
    assert_eq!(symbol.name(), "A");
    assert!(symbol.has_flags(SymbolFlags::CLASS));
    assert!(!symbol.is_alias());
    assert_eq!(symbol.value_declaration_or_err().unwrap(), class.syntax());
    assert_eq!(symbol.declarations().unwrap(), [class.syntax()]);
    assert_eq!(symbol.fully_qualified_name().unwrap(), "\"/src/a\".A");

    let members =
        symbol.members().unwrap().into_iter().map(|member| member.name()).collect::<Vec<_>>();
    assert_eq!(members, ["x", "m"]);
    assert_eq!(symbol.member_by_name_or_err("x").unwrap().name(), "x");
    assert_eq!(
        symbol.member_by_name_or_err("y").unwrap_err().to_string(),
        "Expected to find member with name: y"
    );

    let module = file.symbol().unwrap();
    let exports =
        module.exports().unwrap().into_iter().map(|export| export.name()).collect::<Vec<_>>();
    assert_eq!(exports, ["A", "B"]);
    assert_eq!(module.export_by_name_or_err("A").unwrap(), symbol);
}

#[test]
fn aliases_resolve_across_files() {
    let project = project();
    let class = project.source_file_or_err("/src/a.ts").unwrap().class_or_err("A").unwrap();
    let file = project.source_file_or_err("/src/b.ts").unwrap();
    let import = file.import_declarations().unwrap()[0];
    let specifier = import.named_import_or_err("A").unwrap();

    let alias = specifier.syntax().symbol_or_err().unwrap();
    assert!(alias.is_alias());
    assert_eq!(alias.name(), "Renamed");
    assert_eq!(alias.aliased_symbol_or_err().unwrap(), class.syntax().symbol_or_err().unwrap());
    let target = import.module_specifier_source_file().unwrap().unwrap();
    assert_eq!(target.base_name().unwrap(), "a.ts");
}

#[test]
fn types_and_signatures() {
    let project = project();
    let file = project.source_file_or_err("/src/a.ts").unwrap();
    let a = file.class_or_err("A").unwrap();
    let b = file.class_or_err("B").unwrap();

    let x = a.property_or_err("x").unwrap().syntax().type_of().unwrap();
    assert_eq!(x.text(), "string");
    assert!(x.is_primitive());

    let signature = a.method_or_err("m").unwrap().syntax().signature().unwrap().unwrap();
    assert_eq!(signature.return_type().unwrap(), x);
    let parameters =
        signature.parameters().unwrap().into_iter().map(|p| p.name()).collect::<Vec<_>>();
    assert_eq!(parameters, ["a"]);

    assert!(b.syntax().type_of().unwrap().is_class());
    assert_eq!(b.base_class_or_err().unwrap(), a);
    assert_eq!(a.base_class().unwrap(), None);
}

#[test]
fn symbols_follow_their_declarations_across_edits() {
    let project = project();
    let file = project.source_file_or_err("/src/a.ts").unwrap();
    let class = file.class_or_err("A").unwrap();
    let symbol = class.syntax().symbol_or_err().unwrap();

    class.add_property(&PropertyStructure::new("y").with_type("number")).unwrap();
    assert_eq!(symbol.member_by_name_or_err("y").unwrap().name(), "y");

    file.insert_statements(0, "const before = 1;").unwrap();
    let declaration = symbol.value_declaration_or_err().unwrap();
    assert_eq!(declaration, class.syntax());
    assert_eq!(file.statements().unwrap()[1], declaration);

    let b = file.class_or_err("B").unwrap();
    let stale = b.syntax().symbol_or_err().unwrap();
    b.remove().unwrap();
    let error = stale.members().unwrap_err();
    assert_eq!(error.category(), ErrorCategory::InvalidatedNodeAccess);
}
