use std::slice;

use morph_check::names;
use morph_syntax::SyntaxKind::*;
use morph_syntax::{NodeIndex, SyntaxNode};
use text_size::TextRange;

use super::{
    NamedNode, RemovableNode, SourceFile, children_of, insert_comma_items, is_sole_item,
    remove_comma_item, single,
};
use crate::error::{Error, OrNotFound as _, Result};
use crate::manipulation::Splice;
use crate::node::Node;
use crate::structures::ImportSpecifierStructure;
use crate::writer::CodeWriter;

ast_node! {
    ImportDeclaration => IMPORT_DECLARATION;
    ImportSpecifier => IMPORT_SPECIFIER;
    /// `export as namespace Lib;`
    NamespaceExportDeclaration => NAMESPACE_EXPORT_DECLARATION;
}

impl<'p> RemovableNode<'p> for ImportDeclaration<'p> {}

fn specifier_text(structure: &ImportSpecifierStructure) -> String {
    match &structure.alias {
        Some(alias) => format!("{} as {alias}", structure.name),
        None => structure.name.clone(),
    }
}

impl<'p> ImportDeclaration<'p> {
    /// The string literal after `from`, quotes included.
    pub fn module_specifier(self) -> Result<Node<'p>> {
        self.0.first_child_by_kind_or_err(STRING_LITERAL)
    }

    /// The module specifier without its quotes.
    pub fn module_specifier_value(self) -> Result<String> {
        self.0.with_syntax(|syntax| names::module_specifier(syntax).unwrap_or_default().to_owned())
    }

    /// Replaces the module specifier, quoted in the configured style.
    pub fn set_module_specifier(self, specifier: &str) -> Result<()> {
        let mut writer = CodeWriter::new(self.0.project().manipulation_settings());
        writer.quote(specifier);
        let range = self.module_specifier()?.range()?;
        self.0.replace_range(range, &writer.into_text())
    }

    /// The file the specifier resolves to among the project's files.
    pub fn module_specifier_source_file(self) -> Result<Option<SourceFile<'p>>> {
        let specifier = self.module_specifier_value()?;
        let project = self.0.project();
        let from = self.0.file();
        let file = project.with_program(|program| program.resolve_module(from, &specifier));
        Ok(file.and_then(|file| project.wrap(file, NodeIndex::ROOT)).map(SourceFile::new))
    }

    fn clause(self) -> Result<Option<Node<'p>>> {
        self.0.first_child_by_kind(IMPORT_CLAUSE)
    }

    /// The name in `import A from "m"`.
    pub fn default_import(self) -> Result<Option<Node<'p>>> {
        match self.clause()? {
            Some(clause) => clause.first_child_by_kind(IDENTIFIER),
            None => Ok(None),
        }
    }

    /// The name in `import * as ns from "m"`.
    pub fn namespace_import(self) -> Result<Option<Node<'p>>> {
        let Some(clause) = self.clause()? else { return Ok(None) };
        match clause.first_child_by_kind(NAMESPACE_IMPORT)? {
            Some(namespace) => namespace.first_child_by_kind(IDENTIFIER),
            None => Ok(None),
        }
    }

    fn named_imports_list(self) -> Result<Option<Node<'p>>> {
        match self.clause()? {
            Some(clause) => clause.first_child_by_kind(NAMED_IMPORTS),
            None => Ok(None),
        }
    }

    pub fn named_imports(self) -> Result<Vec<ImportSpecifier<'p>>> {
        match self.named_imports_list()? {
            Some(list) => children_of(list),
            None => Ok(Vec::new()),
        }
    }

    /// Inserts specifiers into the `{ }` list, creating it after the default
    /// import, or in front of the specifier of a bare `import "m";`.
    pub fn insert_named_imports(
        self,
        index: usize,
        structures: &[ImportSpecifierStructure],
    ) -> Result<Vec<ImportSpecifier<'p>>> {
        let texts = structures.iter().map(specifier_text).collect::<Vec<_>>();
        if let Some(list) = self.named_imports_list()? {
            return insert_comma_items(list, OPEN_BRACE, IMPORT_SPECIFIER, index, &texts);
        }
        if index > 0 {
            return Err(Error::IndexOutOfRange { index, len: 0 });
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if self.namespace_import()?.is_some() {
            return Err(Error::invalid(
                "named imports can not be added to a namespace import",
            ));
        }

        let named = format!("{{ {} }}", texts.join(", "));
        let splice = match self.default_import()? {
            Some(default_import) => Splice::insert(default_import.end()?, format!(", {named}")),
            None => Splice::insert(self.module_specifier()?.start()?, format!("{named} from ")),
        };
        self.0.edit(vec![splice])?;
        self.named_imports()
    }

    pub fn add_named_import(
        self,
        structure: &ImportSpecifierStructure,
    ) -> Result<ImportSpecifier<'p>> {
        let index = self.named_imports()?.len();
        single(self.insert_named_imports(index, slice::from_ref(structure))?)
    }

    pub fn named_import(self, name: &str) -> Result<Option<ImportSpecifier<'p>>> {
        for specifier in self.named_imports()? {
            if specifier.name()? == name {
                return Ok(Some(specifier));
            }
        }
        Ok(None)
    }

    pub fn named_import_or_err(self, name: &str) -> Result<ImportSpecifier<'p>> {
        self.named_import(name)
            .or_not_found(|| format!("Expected to find named import named '{name}'."))
    }
}

/// The imported name and, after `as`, the local alias.
fn specifier_names(syntax: SyntaxNode<'_>) -> (Option<SyntaxNode<'_>>, Option<SyntaxNode<'_>>) {
    let name = syntax.child(IDENTIFIER);
    let alias = syntax.child(AS_KW).and_then(|as_kw| {
        syntax.children().skip_while(|&child| child != as_kw).find(|child| child.kind() == IDENTIFIER)
    });
    (name, alias)
}

impl<'p> ImportSpecifier<'p> {
    /// The exported name being imported.
    pub fn name(self) -> Result<String> {
        self.0.with_syntax(|syntax| {
            specifier_names(syntax).0.map(|name| name.text_trimmed().to_owned()).unwrap_or_default()
        })
    }

    pub fn set_name(self, name: &str) -> Result<()> {
        let range = self
            .0
            .with_syntax(|syntax| specifier_names(syntax).0.map(|token| token.trimmed_range()))?
            .or_not_found(|| "Expected to find the name of the import specifier.".to_owned())?;
        self.0.replace_range(range, name)
    }

    pub fn alias(self) -> Result<Option<String>> {
        self.0.with_syntax(|syntax| {
            specifier_names(syntax).1.map(|alias| alias.text_trimmed().to_owned())
        })
    }

    /// Sets the local name after `as`; an empty alias removes it.
    pub fn set_alias(self, alias: &str) -> Result<()> {
        if alias.is_empty() {
            return self.remove_alias();
        }
        let (name, existing) = self.0.with_syntax(|syntax| {
            let (name, alias) = specifier_names(syntax);
            (name.map(|name| name.trimmed_range()), alias.map(|alias| alias.trimmed_range()))
        })?;
        match (existing, name) {
            (Some(existing), _) => self.0.replace_range(existing, alias),
            (None, Some(name)) => self.0.edit(vec![Splice::insert(name.end(), format!(" as {alias}"))]),
            (None, None) => Err(Error::not_found("Expected to find the name of the import specifier.")),
        }
    }

    pub fn remove_alias(self) -> Result<()> {
        let range = self.0.with_syntax(|syntax| {
            let (name, alias) = specifier_names(syntax);
            Some(TextRange::new(name?.trimmed_range().end(), alias?.trimmed_range().end()))
        })?;
        match range {
            Some(range) => self.0.edit(vec![Splice::remove(range)]),
            None => Ok(()),
        }
    }

    pub fn import_declaration(self) -> Result<ImportDeclaration<'p>> {
        self.0
            .first_ancestor_by_kind_or_err(IMPORT_DECLARATION)
            .map(ImportDeclaration)
    }
}

impl<'p> RemovableNode<'p> for ImportSpecifier<'p> {
    /// The last specifier takes the `{ }` with it, and the whole declaration
    /// when there is no default import either.
    fn remove(self) -> Result<()> {
        if !is_sole_item(self.0)? {
            return remove_comma_item(self.0);
        }
        let declaration = self.import_declaration()?;
        let Some(default_import) = declaration.default_import()? else {
            return declaration.remove();
        };
        let list = self.0.parent_or_err()?;
        let range = TextRange::new(default_import.end()?, list.end()?);
        declaration.0.edit(vec![Splice::remove(range)])
    }
}

impl<'p> NamedNode<'p> for NamespaceExportDeclaration<'p> {}
impl<'p> RemovableNode<'p> for NamespaceExportDeclaration<'p> {}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;
    use crate::ast::StatementedNode as _;
    use crate::project::{CreateSourceFileOptions, Project};
    use crate::settings::{ManipulationSettings, QuoteKind};
    use crate::structures::ImportStructure;

    #[track_caller]
    fn check(text: &str, edit: impl FnOnce(ImportDeclaration<'_>), expect: Expect) {
        let project = Project::new();
        let file = project
            .create_source_file("/test.ts", text, CreateSourceFileOptions::default())
            .unwrap();
        edit(file.import_declarations().unwrap()[0]);
        expect.assert_eq(&file.full_text().unwrap());
    }

    #[test]
    fn named_imports() {
        check(
            "import A from \"./a\";",
            |import| {
                import.add_named_import(&ImportSpecifierStructure::new("B")).unwrap();
                import
                    .add_named_import(&ImportSpecifierStructure::new("C").with_alias("D"))
                    .unwrap();
            },
            expect![[r#"import A, { B, C as D } from "./a";"#]],
        );
        check(
            "import \"./a\";",
            |import| {
                import.add_named_import(&ImportSpecifierStructure::new("B")).unwrap();
            },
            expect![[r#"import { B } from "./a";"#]],
        );
    }

    #[test]
    fn removing_specifiers() {
        check(
            "import A, { B } from \"./a\";",
            |import| import.named_import_or_err("B").unwrap().remove().unwrap(),
            expect![[r#"import A from "./a";"#]],
        );
        check(
            "import { B, C } from \"./a\";",
            |import| import.named_import_or_err("B").unwrap().remove().unwrap(),
            expect![[r#"import { C } from "./a";"#]],
        );
        check(
            "import { B } from \"./a\";\nclass X {}\n",
            |import| import.named_import_or_err("B").unwrap().remove().unwrap(),
            expect![[r#"
                class X {}
            "#]],
        );
    }

    #[test]
    fn aliases() {
        check(
            "import { B, C as D } from \"./a\";",
            |import| {
                let b = import.named_import_or_err("B").unwrap();
                b.set_alias("E").unwrap();
                assert_eq!(b.alias().unwrap().as_deref(), Some("E"));
                import.named_import_or_err("C").unwrap().remove_alias().unwrap();
            },
            expect![[r#"import { B as E, C } from "./a";"#]],
        );
    }

    #[test]
    fn module_specifiers() {
        let project = Project::with_settings(ManipulationSettings {
            quote: QuoteKind::Single,
            ..ManipulationSettings::default()
        });
        let options = CreateSourceFileOptions::default();
        let target = project.create_source_file("/b.ts", "export class B {}", options).unwrap();
        let file = project.create_source_file("/main.ts", "", options).unwrap();

        let import = file
            .add_import_declaration(
                &ImportStructure::new("./a").named_import(ImportSpecifierStructure::new("B")),
            )
            .unwrap();
        assert_eq!(import.module_specifier_source_file().unwrap(), None);

        import.set_module_specifier("./b").unwrap();
        assert_eq!(import.module_specifier_value().unwrap(), "./b");
        assert_eq!(import.module_specifier_source_file().unwrap(), Some(target));
        assert_eq!(file.full_text().unwrap(), "import { B } from './b';\n");
    }
}
