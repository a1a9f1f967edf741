use camino::Utf8PathBuf;
use morph_errors::Diagnostic;
use morph_inputs::LineCol;
use morph_parse::FileParse as _;
use text_size::TextSize;

use super::StatementedNode;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::symbol::Symbol;

ast_node! {
    /// The root of one file.
    SourceFile => SOURCE_FILE;
}

impl<'p> StatementedNode<'p> for SourceFile<'p> {
    fn statements_container(self) -> Result<Node<'p>> {
        Ok(self.0)
    }
}

impl<'p> SourceFile<'p> {
    pub(crate) fn new(node: Node<'p>) -> Self {
        Self(node)
    }

    fn live(self) -> Result<()> {
        if self.0.is_forgotten() {
            return Err(self.0.invalidated());
        }
        Ok(())
    }

    pub fn file_path(self) -> Result<Utf8PathBuf> {
        self.live()?;
        Ok(self.0.project().path_of(self.0.file()))
    }

    /// The file name without its directory.
    pub fn base_name(self) -> Result<String> {
        let path = self.file_path()?;
        Ok(path.file_name().unwrap_or_default().to_owned())
    }

    pub fn is_declaration_file(self) -> Result<bool> {
        Ok(self.file_path()?.as_str().ends_with(".d.ts"))
    }

    /// The whole text of the file, trivia included.
    pub fn full_text(self) -> Result<String> {
        self.0.full_text()
    }

    /// Parse errors in the current text.
    pub fn diagnostics(self) -> Result<Vec<Diagnostic>> {
        self.live()?;
        let file = self.0.file();
        let db = self.0.project().db.borrow();
        Ok(file.parse(&*db).diagnostics().to_vec())
    }

    /// Zero-based line and column of `offset`.
    pub fn line_and_column_at(self, offset: TextSize) -> Result<LineCol> {
        self.live()?;
        let file = self.0.file();
        let db = self.0.project().db.borrow();
        let line_index = file.line_index(&*db);
        line_index.try_line_col(offset).ok_or(Error::IndexOutOfRange {
            index: offset.into(),
            len: line_index.len().into(),
        })
    }

    /// The module symbol, whose exports are the file's exported declarations.
    pub fn symbol(self) -> Result<Symbol<'p>> {
        self.live()?;
        let project = self.0.project();
        let file = self.0.file();
        let module = project.with_program(|program| program.module_symbol(file));
        Ok(Symbol::wrap(project, module))
    }

    /// Writes the text to the file's path, creating missing directories.
    pub fn save(self) -> Result<()> {
        let path = self.file_path()?;
        let text = self.full_text()?;
        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|source| Error::Io { path: parent.to_owned(), source })?;
            }
        }
        std::fs::write(&path, text).map_err(|source| Error::Io { path: path.clone(), source })?;
        tracing::debug!(%path, "saved source file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{CreateSourceFileOptions, Project};

    #[test]
    fn paths() {
        let project = Project::new();
        let file = project
            .create_source_file("/lib/types.d.ts", "declare class A {}", CreateSourceFileOptions::default())
            .unwrap();
        assert_eq!(file.file_path().unwrap(), "/lib/types.d.ts");
        assert_eq!(file.base_name().unwrap(), "types.d.ts");
        assert!(file.is_declaration_file().unwrap());
    }

    #[test]
    fn line_and_column() {
        let project = Project::new();
        let file = project
            .create_source_file("/a.ts", "class A {}\ninterface B {}", CreateSourceFileOptions::default())
            .unwrap();
        let position = file.line_and_column_at(TextSize::new(11)).unwrap();
        assert_eq!((position.line, position.col), (1, 0));
        assert!(file.line_and_column_at(TextSize::new(100)).is_err());
    }

    #[test]
    fn diagnostics_of_broken_text() {
        let project = Project::new();
        let file = project
            .create_source_file("/a.ts", "class A {", CreateSourceFileOptions::default())
            .unwrap();
        let diagnostics = file.diagnostics().unwrap();
        assert!(!diagnostics.is_empty());

        let clean = project
            .create_source_file("/b.ts", "class A {}", CreateSourceFileOptions::default())
            .unwrap();
        assert!(clean.diagnostics().unwrap().is_empty());
    }

    #[test]
    fn save_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("nested/a.ts")).unwrap();
        let project = Project::new();
        let file = project
            .create_source_file(path.clone(), "class A {}\n", CreateSourceFileOptions::default())
            .unwrap();
        file.save().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "class A {}\n");
    }
}
