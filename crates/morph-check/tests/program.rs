use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use morph_check::{ModuleResolver, Program, SymbolFlags, SymbolRef, TypeData};
use morph_inputs::File;
use morph_parse::FileParse as _;
use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxNode;

struct Files {
    db: salsa::DatabaseImpl,
    files: IndexMap<Utf8PathBuf, File>,
}

impl Files {
    fn new(sources: &[(&str, &str)]) -> Self {
        let db = salsa::DatabaseImpl::new();
        let files = sources
            .iter()
            .map(|&(path, text)| {
                let path = Utf8PathBuf::from(path);
                (path.clone(), File::new(&db, path, text.to_owned()))
            })
            .collect();
        Self { db, files }
    }

    fn program(&self) -> Program<'_> {
        Program::new(&self.db, self)
    }

    fn file(&self, path: &str) -> File {
        self.files[Utf8Path::new(path)]
    }

    /// The first node of `kind` whose trimmed text starts with `prefix`.
    fn find(&self, path: &str, kind: SyntaxKind, prefix: &str) -> SyntaxNode<'_> {
        let tree = self.file(path).parse(&self.db).tree();
        tree.preorder()
            .find(|node| node.kind() == kind && node.text_trimmed().starts_with(prefix))
            .unwrap_or_else(|| panic!("no {kind:?} starting with {prefix:?}"))
    }

    fn symbol(&self, path: &str, kind: SyntaxKind, prefix: &str) -> SymbolRef {
        let node = self.find(path, kind, prefix);
        self.program().symbol_of_node(self.file(path), node.index()).expect("symbol")
    }
}

impl ModuleResolver for Files {
    fn file_at(&self, path: &Utf8Path) -> Option<File> {
        self.files.get(path).copied()
    }
}

#[test]
fn declarations_merge() {
    let files = Files::new(&[(
        "/src/a.ts",
        "interface A { x: string; }\ninterface A { y: number; }\nnamespace A { export const z = 1; }",
    )]);
    let program = files.program();
    let symbol = files.symbol("/src/a.ts", INTERFACE_DECLARATION, "interface A { x");
    let data = program.data(symbol);

    assert_eq!(data.declarations.len(), 3);
    assert!(data.flags.contains(SymbolFlags::INTERFACE | SymbolFlags::NAMESPACE));
    let members =
        program.members(symbol).into_iter().map(|m| program.data(m).name.clone()).collect::<Vec<_>>();
    assert_eq!(members, ["x", "y"]);
    assert!(program.export_by_name(symbol, "z").is_some());
}

#[test]
fn imports_resolve_across_files() {
    let files = Files::new(&[
        ("/src/a.ts", "export class Base {}\nexport default interface Shape {}"),
        ("/src/b.ts", "export * from \"./a\";"),
        (
            "/src/c.ts",
            "import { Base } from \"./b\";\nimport Shape from \"./a\";\nimport * as ns from \"./a\";\nclass Derived extends Base {}",
        ),
    ]);
    let program = files.program();

    let base = files.symbol("/src/a.ts", CLASS_DECLARATION, "export class Base");
    let import = files.symbol("/src/c.ts", IMPORT_SPECIFIER, "Base");
    assert!(program.data(import).is_alias());
    assert_eq!(program.resolve_alias(import), Some(base));

    let shape = files.symbol("/src/a.ts", INTERFACE_DECLARATION, "export default");
    let default = files.symbol("/src/c.ts", IMPORT_CLAUSE, "Shape");
    assert_eq!(program.resolve_alias(default), Some(shape));

    let namespace = files.symbol("/src/c.ts", NAMESPACE_IMPORT, "* as ns");
    let module = program.resolve_alias(namespace).expect("module");
    assert_eq!(module, program.module_symbol(files.file("/src/a.ts")));

    let heritage = files.find("/src/c.ts", EXPRESSION_WITH_TYPE_ARGUMENTS, "Base");
    let referenced = program.symbol_of_node(files.file("/src/c.ts"), heritage.index());
    assert_eq!(referenced.and_then(|s| program.resolve_alias(s)), Some(base));

    let derived = files.symbol("/src/c.ts", CLASS_DECLARATION, "class Derived");
    assert_eq!(program.base_types(derived), [TypeData::Class { symbol: base, arguments: vec![] }]);
}

#[test]
fn star_exports_are_listed_once() {
    let files = Files::new(&[
        ("/src/a.ts", "export class A {}\nexport const shared = 1;"),
        ("/src/index.ts", "export const shared = 2;\nexport * from \"./a\";"),
    ]);
    let program = files.program();
    let module = program.module_symbol(files.file("/src/index.ts"));
    let names = program
        .exports(module)
        .into_iter()
        .map(|export| program.data(export).name.clone())
        .collect::<Vec<_>>();
    assert_eq!(names, ["shared", "A"]);
}

#[test]
fn unresolved_modules_stay_aliases() {
    let files = Files::new(&[("/src/a.ts", "import { X } from \"./missing\";\nimport fs from \"fs\";")]);
    let program = files.program();
    let import = files.symbol("/src/a.ts", IMPORT_SPECIFIER, "X");
    assert_eq!(program.resolve_alias(import), None);
    assert_eq!(program.resolve_module(files.file("/src/a.ts"), "fs"), None);
}

#[test]
fn fully_qualified_names() {
    let files = Files::new(&[(
        "/src/a.ts",
        "export namespace Outer { export class Inner { method(): void; } }\nclass Hidden {}",
    )]);
    let program = files.program();

    let inner = files.symbol("/src/a.ts", CLASS_DECLARATION, "export class Inner");
    assert_eq!(program.fully_qualified_name(inner), "\"/src/a\".Outer.Inner");

    let method = files.symbol("/src/a.ts", METHOD_DECLARATION, "method");
    assert_eq!(program.fully_qualified_name(method), "\"/src/a\".Outer.Inner.method");

    let hidden = files.symbol("/src/a.ts", CLASS_DECLARATION, "class Hidden");
    assert_eq!(program.fully_qualified_name(hidden), "Hidden");
}

#[test]
fn declared_types_render() {
    let files = Files::new(&[(
        "/src/a.ts",
        "class Box<T> { value: T; items: Array<string>; pair: [number, boolean]; \
         either: string | null; count = 5; get size(): number; }\n\
         type Id = string;\nlet id: Id;",
    )]);
    let program = files.program();
    let file = files.file("/src/a.ts");
    let text = |kind, prefix| {
        let node = files.find("/src/a.ts", kind, prefix);
        program.type_text(&program.type_of_node(file, node.index()))
    };

    assert_eq!(text(PROPERTY_DECLARATION, "value"), "T");
    assert_eq!(text(PROPERTY_DECLARATION, "items"), "string[]");
    assert_eq!(text(PROPERTY_DECLARATION, "pair"), "[number, boolean]");
    assert_eq!(text(PROPERTY_DECLARATION, "either"), "string | null");
    assert_eq!(text(PROPERTY_DECLARATION, "count"), "number");
    assert_eq!(text(GET_ACCESSOR, "get size"), "number");
    assert_eq!(text(VARIABLE_DECLARATION, "id"), "string");
    assert_eq!(text(CLASS_DECLARATION, "class Box"), "Box");
}

#[test]
fn signatures() {
    let files = Files::new(&[(
        "/src/a.ts",
        "class Point { constructor(x: number, y: number); move(dx: number): Point; }",
    )]);
    let program = files.program();
    let file = files.file("/src/a.ts");

    let method = files.find("/src/a.ts", METHOD_DECLARATION, "move");
    let signature = program.signature(file, method.index()).expect("signature");
    assert_eq!(signature.parameters.len(), 1);
    assert_eq!(program.data(signature.parameters[0]).name, "dx");
    assert_eq!(program.type_text(&signature.return_type), "Point");

    let constructor = files.find("/src/a.ts", CONSTRUCTOR, "constructor");
    let signature = program.signature(file, constructor.index()).expect("signature");
    assert_eq!(signature.parameters.len(), 2);
    assert_eq!(program.type_text(&signature.return_type), "Point");
    assert_eq!(
        program.type_text(&program.type_of_node(file, method.index())),
        "(dx: number) => Point"
    );
}

#[test]
fn alias_cycles_terminate() {
    let files = Files::new(&[
        ("/src/a.ts", "export { B as A } from \"./b\";"),
        ("/src/b.ts", "export { A as B } from \"./a\";"),
    ]);
    let program = files.program();
    let alias = files.symbol("/src/a.ts", EXPORT_SPECIFIER, "B as A");
    assert_eq!(program.resolve_alias(alias), None);
    assert!(program.declared_type(alias).symbol().is_none());
}
