//! Wrappers for the checker's symbols.
//!
//! A symbol wrapper captures the wrappers of its declarations when it is
//! created, so an edit made afterwards can not leave them unreachable. It
//! belongs to one checker generation; once the files change, lookups on it
//! go through the symbol its first surviving declaration now declares.

use std::fmt;
use std::hash::{Hash, Hasher};

use la_arena::{Arena, Idx};
use morph_check::{SymbolFlags, SymbolRef};
use rustc_hash::FxHashMap;

use crate::cache::NodeId;
use crate::error::{Error, OrNotFound as _, Result};
use crate::node::Node;
use crate::project::Project;
use crate::types::Type;

pub(crate) struct SymbolSlot {
    generation: u64,
    symbol: SymbolRef,
    name: String,
    flags: SymbolFlags,
    declarations: Vec<NodeId>,
    value_declaration: Option<NodeId>,
}

/// Symbol wrappers, one slot per symbol per generation it was asked for in.
///
/// Slots of older generations are kept for stale wrappers to re-resolve
/// through, so the arena grows with every generation that sees a lookup.
#[derive(Default)]
pub(crate) struct SymbolCache {
    slots: Arena<SymbolSlot>,
    generation: u64,
    current: FxHashMap<SymbolRef, Idx<SymbolSlot>>,
}

#[derive(Clone, Copy)]
pub struct Symbol<'p> {
    project: &'p Project,
    id: Idx<SymbolSlot>,
}

impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.project, other.project) && self.id == other.id
    }
}

impl Eq for Symbol<'_> {}

impl Hash for Symbol<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Symbol").field(&self.name()).finish()
    }
}

impl<'p> Symbol<'p> {
    /// The one wrapper of `symbol` in the current generation.
    pub(crate) fn wrap(project: &'p Project, symbol: SymbolRef) -> Self {
        let generation = project.generation();
        {
            let mut cache = project.symbols.borrow_mut();
            if cache.generation != generation {
                cache.current.clear();
                cache.generation = generation;
            }
            if let Some(&id) = cache.current.get(&symbol) {
                return Self { project, id };
            }
        }

        let (name, flags, declarations, value_declaration) = project.with_program(|program| {
            let data = program.data(symbol);
            (data.name.clone(), data.flags, data.declarations.clone(), data.value_declaration)
        });
        let wrap = |index| project.wrap(symbol.file, index).map(Node::id);
        let declarations = declarations.into_iter().filter_map(wrap).collect();
        let value_declaration = value_declaration.and_then(wrap);

        let mut cache = project.symbols.borrow_mut();
        let id = cache.slots.alloc(SymbolSlot {
            generation,
            symbol,
            name,
            flags,
            declarations,
            value_declaration,
        });
        cache.current.insert(symbol, id);
        Self { project, id }
    }

    fn slot<R>(self, f: impl FnOnce(&SymbolSlot) -> R) -> R {
        f(&self.project.symbols.borrow().slots[self.id])
    }

    pub fn name(self) -> String {
        self.slot(|slot| slot.name.clone())
    }

    pub fn flags(self) -> SymbolFlags {
        self.slot(|slot| slot.flags)
    }

    pub fn has_flags(self, flags: SymbolFlags) -> bool {
        self.flags().contains(flags)
    }

    pub fn is_alias(self) -> bool {
        self.has_flags(SymbolFlags::ALIAS)
    }

    /// The checker's handle for this symbol, re-resolved when the files
    /// changed since the wrapper was made.
    fn current(self) -> Result<SymbolRef> {
        let (generation, symbol, declarations) =
            self.slot(|slot| (slot.generation, slot.symbol, slot.declarations.clone()));
        if generation == self.project.generation() {
            return Ok(symbol);
        }

        for id in declarations {
            let declaration = Node::new(self.project, id);
            if declaration.is_forgotten() || declaration.is_comment() {
                continue;
            }
            let (file, index) = (declaration.file(), declaration.index()?);
            let resolved = self.project.with_program(|program| {
                let declared = program.symbols(file).symbol_of_declaration(index)?;
                Some(SymbolRef { file, id: declared })
            });
            if let Some(resolved) = resolved {
                return Ok(resolved);
            }
        }
        tracing::debug!(name = %self.name(), "symbol has no surviving declaration");
        Err(Error::StaleSymbol { name: self.name() })
    }

    /// This symbol's wrapper in the current generation.
    fn refreshed(self) -> Result<Symbol<'p>> {
        Ok(Symbol::wrap(self.project, self.current()?))
    }

    fn wrap_all(self, symbols: Vec<SymbolRef>) -> Vec<Symbol<'p>> {
        symbols.into_iter().map(|symbol| Symbol::wrap(self.project, symbol)).collect()
    }

    pub fn value_declaration(self) -> Result<Option<Node<'p>>> {
        let Some(id) = self.slot(|slot| slot.value_declaration) else { return Ok(None) };
        let declaration = Node::new(self.project, id);
        if !declaration.is_forgotten() {
            return Ok(Some(declaration));
        }

        let refreshed = self.refreshed()?;
        let declaration = refreshed.slot(|slot| slot.value_declaration);
        Ok(declaration.map(|id| Node::new(self.project, id)))
    }

    pub fn value_declaration_or_err(self) -> Result<Node<'p>> {
        self.value_declaration().or_not_found(|| {
            format!("Expected to find the value declaration of symbol '{}'.", self.name())
        })
    }

    pub fn declarations(self) -> Result<Vec<Node<'p>>> {
        let declarations = self.slot(|slot| slot.declarations.clone());
        let declarations =
            declarations.into_iter().map(|id| Node::new(self.project, id)).collect::<Vec<_>>();
        if declarations.iter().all(|declaration| !declaration.is_forgotten()) {
            return Ok(declarations);
        }

        let refreshed = self.refreshed()?;
        let declarations = refreshed.slot(|slot| slot.declarations.clone());
        Ok(declarations.into_iter().map(|id| Node::new(self.project, id)).collect())
    }

    /// The symbol an import or re-export refers to, following chains of
    /// aliases. `None` for symbols that are not aliases or do not resolve.
    pub fn aliased_symbol(self) -> Result<Option<Symbol<'p>>> {
        if !self.is_alias() {
            return Ok(None);
        }
        let symbol = self.current()?;
        let aliased = self
            .project
            .with_program(|program| program.resolve_alias(symbol))
            .filter(|&aliased| aliased != symbol);
        Ok(aliased.map(|aliased| Symbol::wrap(self.project, aliased)))
    }

    pub fn aliased_symbol_or_err(self) -> Result<Symbol<'p>> {
        self.aliased_symbol().or_not_found(|| "Expected to find an aliased symbol.".to_owned())
    }

    pub fn export_by_name(self, name: &str) -> Result<Option<Symbol<'p>>> {
        let symbol = self.current()?;
        let export = self.project.with_program(|program| program.export_by_name(symbol, name));
        Ok(export.map(|export| Symbol::wrap(self.project, export)))
    }

    pub fn export_by_name_or_err(self, name: &str) -> Result<Symbol<'p>> {
        self.export_by_name(name)
            .or_not_found(|| format!("Expected to find export with name: {name}"))
    }

    /// Exports, including those re-exported through `export *`.
    pub fn exports(self) -> Result<Vec<Symbol<'p>>> {
        let symbol = self.current()?;
        Ok(self.wrap_all(self.project.with_program(|program| program.exports(symbol))))
    }

    pub fn global_export_by_name(self, name: &str) -> Result<Option<Symbol<'p>>> {
        let symbol = self.current()?;
        let export =
            self.project.with_program(|program| program.global_export_by_name(symbol, name));
        Ok(export.map(|export| Symbol::wrap(self.project, export)))
    }

    pub fn global_export_by_name_or_err(self, name: &str) -> Result<Symbol<'p>> {
        self.global_export_by_name(name)
            .or_not_found(|| format!("Expected to find global export with name: {name}"))
    }

    pub fn global_exports(self) -> Result<Vec<Symbol<'p>>> {
        let symbol = self.current()?;
        Ok(self.wrap_all(self.project.with_program(|program| program.global_exports(symbol))))
    }

    /// Looks up an instance member of a class or interface.
    pub fn member_by_name(self, name: &str) -> Result<Option<Symbol<'p>>> {
        let symbol = self.current()?;
        let member = self.project.with_program(|program| program.member_by_name(symbol, name));
        Ok(member.map(|member| Symbol::wrap(self.project, member)))
    }

    pub fn member_by_name_or_err(self, name: &str) -> Result<Symbol<'p>> {
        self.member_by_name(name)
            .or_not_found(|| format!("Expected to find member with name: {name}"))
    }

    pub fn members(self) -> Result<Vec<Symbol<'p>>> {
        let symbol = self.current()?;
        Ok(self.wrap_all(self.project.with_program(|program| program.members(symbol))))
    }

    pub fn declared_type(self) -> Result<Type<'p>> {
        let symbol = self.current()?;
        let ty = self.project.with_program(|program| program.declared_type(symbol));
        Ok(Type::wrap(self.project, ty))
    }

    /// The dotted name from the file's module, such as `"/src/a".Outer.Inner`.
    pub fn fully_qualified_name(self) -> Result<String> {
        let symbol = self.current()?;
        Ok(self.project.with_program(|program| program.fully_qualified_name(symbol)))
    }
}
