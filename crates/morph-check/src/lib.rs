//! Symbols and types of TypeScript declaration files.
//!
//! Binding is per file and cached by salsa; everything that crosses file
//! boundaries goes through [`Program`].

mod binder;
pub mod names;
mod program;
mod symbols;
mod ty;

use morph_inputs::File;
use morph_parse::FileParse as _;

pub use crate::program::{ModuleResolver, Program, SignatureData, SymbolRef};
pub use crate::symbols::{AliasTarget, FileSymbols, SymbolData, SymbolFlags, SymbolId};
pub use crate::ty::TypeData;

pub trait FileBind {
    fn bind(self, db: &dyn salsa::Database) -> &FileSymbols;
}

#[salsa::tracked]
impl FileBind for File {
    #[salsa::tracked(returns(ref))]
    fn bind(self, db: &dyn salsa::Database) -> FileSymbols {
        binder::bind(self.parse(db).tree(), module_name(self.path(db)))
    }
}

/// `"/src/a"` for `/src/a.ts` and `/src/a.d.ts`.
pub fn module_name(path: &camino::Utf8Path) -> String {
    let path = path.as_str();
    let stem = path
        .strip_suffix(".d.ts")
        .or_else(|| path.strip_suffix(".ts"))
        .unwrap_or(path);
    format!("\"{stem}\"")
}

#[cfg(test)]
mod tests {
    use camino::Utf8Path;

    use super::*;

    #[test]
    fn module_names_drop_extensions() {
        assert_eq!(module_name(Utf8Path::new("/src/a.ts")), "\"/src/a\"");
        assert_eq!(module_name(Utf8Path::new("/src/lib.d.ts")), "\"/src/lib\"");
        assert_eq!(module_name(Utf8Path::new("notes.txt")), "\"notes.txt\"");
    }
}
