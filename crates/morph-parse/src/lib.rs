//! Parser for the TypeScript declaration subset.
//!
//! The parser never fails: malformed input produces `ERROR` nodes and
//! diagnostics, and the resulting tree always spans the whole text.

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

use morph_errors::Diagnostic;
use morph_inputs::File;
use morph_syntax::SyntaxTree;
use triomphe::Arc;

/// The result of parsing one text.
#[derive(Debug, Clone)]
pub struct Parse {
    tree: Arc<SyntaxTree>,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// A shared handle to the tree, kept alive across reparses by its holders.
    pub fn shared_tree(&self) -> Arc<SyntaxTree> {
        Arc::clone(&self.tree)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

unsafe impl salsa::Update for Parse {
    unsafe fn maybe_update(old_pointer: *mut Self, new_value: Self) -> bool {
        let old = unsafe { &mut *old_pointer };

        if old.tree.text() == new_value.tree.text() {
            return false;
        }

        *old = new_value;
        true
    }
}

pub fn parse_text(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::items::source_file(&mut parser);
    let (tree, diagnostics) = parser.build_tree();
    Parse { tree: Arc::new(tree), diagnostics }
}

pub trait FileParse {
    fn parse(self, db: &dyn salsa::Database) -> &Parse;
}

#[salsa::tracked]
impl FileParse for File {
    #[salsa::tracked(returns(ref), no_eq)]
    fn parse(self, db: &dyn salsa::Database) -> Parse {
        parse_text(self.text(db))
    }
}
