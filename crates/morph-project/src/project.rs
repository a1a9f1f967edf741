use std::cell::{Cell, RefCell};

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use morph_check::{ModuleResolver, Program};
use morph_inputs::File;
use morph_parse::FileParse as _;
use morph_syntax::{NodeIndex, SyntaxTree};
use salsa::DatabaseImpl;
use triomphe::Arc;

use crate::ast::SourceFile;
use crate::cache::NodeCache;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::settings::ManipulationSettings;
use crate::symbol::SymbolCache;
use crate::types::TypeCache;

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateSourceFileOptions {
    /// Replace the text of an existing file instead of failing.
    pub overwrite: bool,
}

/// A set of source files and the wrappers handed out for them.
///
/// A project is single-threaded: every method takes `&self`, mutation goes
/// through interior cells, and the type is neither `Send` nor `Sync`.
pub struct Project {
    pub(crate) db: RefCell<DatabaseImpl>,
    files: RefCell<IndexMap<Utf8PathBuf, File>>,
    pub(crate) cache: RefCell<NodeCache>,
    pub(crate) symbols: RefCell<SymbolCache>,
    pub(crate) types: RefCell<TypeCache>,
    /// Bumped whenever the checker's view of the files changes.
    generation: Cell<u64>,
    settings: Cell<ManipulationSettings>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Self {
        Self::with_settings(ManipulationSettings::default())
    }

    pub fn with_settings(settings: ManipulationSettings) -> Self {
        Self {
            db: RefCell::new(DatabaseImpl::new()),
            files: RefCell::default(),
            cache: RefCell::default(),
            symbols: RefCell::default(),
            types: RefCell::default(),
            generation: Cell::new(0),
            settings: Cell::new(settings),
        }
    }

    pub fn manipulation_settings(&self) -> ManipulationSettings {
        self.settings.get()
    }

    pub fn set_manipulation_settings(&self, settings: ManipulationSettings) {
        self.settings.set(settings);
    }

    pub fn create_source_file(
        &self,
        path: impl Into<Utf8PathBuf>,
        text: &str,
        options: CreateSourceFileOptions,
    ) -> Result<SourceFile<'_>> {
        let path = path.into();
        if self.files.borrow().contains_key(&path) {
            if !options.overwrite {
                return Err(Error::FileAlreadyExists { path });
            }
            self.remove_source_file(&path)?;
        }
        self.add_file(path, text.to_owned())
    }

    /// Reads `path` from disk, or returns the file if it was added before.
    pub fn add_source_file_at_path(&self, path: impl AsRef<Utf8Path>) -> Result<SourceFile<'_>> {
        let path = path.as_ref();
        if let Some(source_file) = self.source_file(path) {
            return Ok(source_file);
        }

        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.to_owned(), source })?;
        self.add_file(path.to_owned(), text)
    }

    fn add_file(&self, path: Utf8PathBuf, text: String) -> Result<SourceFile<'_>> {
        tracing::debug!(%path, len = text.len(), "adding source file");

        let file = File::new(&*self.db.borrow(), path.clone(), text);
        let tree = file.parse(&*self.db.borrow()).shared_tree();
        self.cache.borrow_mut().add_file(file, tree);
        self.files.borrow_mut().insert(path, file);
        self.bump_generation();

        let root = self.root(file).ok_or_else(|| Error::InvariantViolation {
            message: format!("the tree of `{}` has no root", self.path_of(file)),
        })?;
        Ok(SourceFile::new(root))
    }

    pub fn source_file(&self, path: impl AsRef<Utf8Path>) -> Option<SourceFile<'_>> {
        let file = self.files.borrow().get(path.as_ref()).copied()?;
        self.root(file).map(SourceFile::new)
    }

    pub fn source_file_or_err(&self, path: impl AsRef<Utf8Path>) -> Result<SourceFile<'_>> {
        let path = path.as_ref();
        self.source_file(path).ok_or_else(|| Error::FileNotFound { path: path.to_owned() })
    }

    pub fn source_files(&self) -> Vec<SourceFile<'_>> {
        let files = self.files.borrow().values().copied().collect::<Vec<_>>();
        files.into_iter().filter_map(|file| self.root(file)).map(SourceFile::new).collect()
    }

    /// Drops the file from the project. Every wrapper of it is forgotten.
    pub fn remove_source_file(&self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let path = path.as_ref();
        let file = self
            .files
            .borrow_mut()
            .shift_remove(path)
            .ok_or_else(|| Error::FileNotFound { path: path.to_owned() })?;

        let forgotten = self.cache.borrow_mut().remove_file(file);
        self.bump_generation();
        tracing::debug!(%path, forgotten, "removed source file");
        Ok(())
    }

    /// Writes every file to disk.
    pub fn save(&self) -> Result<()> {
        for source_file in self.source_files() {
            source_file.save()?;
        }
        Ok(())
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub(crate) fn bump_generation(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    pub(crate) fn path_of(&self, file: File) -> Utf8PathBuf {
        file.path(&*self.db.borrow()).clone()
    }

    pub(crate) fn text_of(&self, file: File) -> String {
        file.text(&*self.db.borrow()).to_owned()
    }

    pub(crate) fn tree_of(&self, file: File) -> Option<Arc<SyntaxTree>> {
        self.cache.borrow().tree(file)
    }

    pub(crate) fn contains(&self, file: File) -> bool {
        self.cache.borrow().file(file).is_some()
    }

    /// The one wrapper of the node at `index`, created on first use.
    pub(crate) fn wrap(&self, file: File, index: NodeIndex) -> Option<Node<'_>> {
        let id = self.cache.borrow_mut().get_or_create(file, index)?;
        Some(Node::new(self, id))
    }

    fn root(&self, file: File) -> Option<Node<'_>> {
        self.wrap(file, NodeIndex::ROOT)
    }

    pub(crate) fn with_program<R>(&self, f: impl FnOnce(&Program<'_>) -> R) -> R {
        let db = self.db.borrow();
        let files = self.files.borrow();
        let resolver = FileMap(&files);
        f(&Program::new(&*db, &resolver))
    }
}

struct FileMap<'a>(&'a IndexMap<Utf8PathBuf, File>);

impl ModuleResolver for FileMap<'_> {
    fn file_at(&self, path: &Utf8Path) -> Option<File> {
        self.0.get(path).copied()
    }
}
