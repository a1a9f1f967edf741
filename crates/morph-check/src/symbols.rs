use bitflags::bitflags;
use la_arena::{Arena, Idx};
use morph_syntax::NodeIndex;
use rustc_hash::FxHashMap;

pub(crate) type FxIndexMap<K, V> =
    indexmap::IndexMap<K, V, std::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

pub type SymbolId = Idx<SymbolData>;

bitflags! {
    /// What a symbol declares. Merged declarations union their flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct SymbolFlags: u32 {
        const VARIABLE = 1 << 0;
        const PROPERTY = 1 << 1;
        const ENUM_MEMBER = 1 << 2;
        const FUNCTION = 1 << 3;
        const CLASS = 1 << 4;
        const INTERFACE = 1 << 5;
        const ENUM = 1 << 6;
        const NAMESPACE = 1 << 7;
        const METHOD = 1 << 8;
        const CONSTRUCTOR = 1 << 9;
        const GET_ACCESSOR = 1 << 10;
        const SET_ACCESSOR = 1 << 11;
        const TYPE_PARAMETER = 1 << 12;
        const TYPE_ALIAS = 1 << 13;
        const ALIAS = 1 << 14;
        const PARAMETER = 1 << 15;
        /// The symbol of a whole source file.
        const MODULE = 1 << 16;

        const ACCESSOR = Self::GET_ACCESSOR.bits() | Self::SET_ACCESSOR.bits();
        const VALUE = Self::VARIABLE.bits()
            | Self::PROPERTY.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::NAMESPACE.bits()
            | Self::METHOD.bits()
            | Self::CONSTRUCTOR.bits()
            | Self::ACCESSOR.bits()
            | Self::PARAMETER.bits();
        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::ENUM.bits()
            | Self::TYPE_ALIAS.bits()
            | Self::TYPE_PARAMETER.bits();
    }
}

/// Where an alias symbol points. Module specifiers are resolved lazily.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AliasTarget {
    /// `import { name } from "m"` or `export { name } from "m"`.
    Import { module: String, name: String },
    /// `import name from "m"`.
    ImportDefault { module: String },
    /// `import * as ns from "m"`.
    ImportNamespace { module: String },
    /// `export { name as other }` for a declaration of the same scope.
    Local { name: String },
    /// `export as namespace X`, targeting the file's own module symbol.
    Module,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolData {
    pub name: String,
    pub flags: SymbolFlags,
    pub declarations: Vec<NodeIndex>,
    pub value_declaration: Option<NodeIndex>,
    pub parent: Option<SymbolId>,
    pub alias: Option<AliasTarget>,
    pub(crate) exports: FxIndexMap<String, SymbolId>,
    pub(crate) members: FxIndexMap<String, SymbolId>,
    pub(crate) locals: FxIndexMap<String, SymbolId>,
    pub(crate) global_exports: FxIndexMap<String, SymbolId>,
}

impl SymbolData {
    pub(crate) fn new(name: String, flags: SymbolFlags, parent: Option<SymbolId>) -> Self {
        Self {
            name,
            flags,
            declarations: Vec::new(),
            value_declaration: None,
            parent,
            alias: None,
            exports: FxIndexMap::default(),
            members: FxIndexMap::default(),
            locals: FxIndexMap::default(),
            global_exports: FxIndexMap::default(),
        }
    }

    pub fn is_alias(&self) -> bool {
        self.flags.contains(SymbolFlags::ALIAS)
    }

    pub fn exports(&self) -> impl Iterator<Item = (&str, SymbolId)> + '_ {
        self.exports.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn export(&self, name: &str) -> Option<SymbolId> {
        self.exports.get(name).copied()
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, SymbolId)> + '_ {
        self.members.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn member(&self, name: &str) -> Option<SymbolId> {
        self.members.get(name).copied()
    }

    pub fn local(&self, name: &str) -> Option<SymbolId> {
        self.locals.get(name).copied()
    }

    pub fn global_exports(&self) -> impl Iterator<Item = (&str, SymbolId)> + '_ {
        self.global_exports.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn global_export(&self, name: &str) -> Option<SymbolId> {
        self.global_exports.get(name).copied()
    }
}

/// The symbol tables of one file.
#[derive(Debug, PartialEq, Eq)]
pub struct FileSymbols {
    pub(crate) arena: Arena<SymbolData>,
    pub(crate) module: SymbolId,
    pub(crate) node_symbols: FxHashMap<NodeIndex, SymbolId>,
    /// Module specifiers of `export * from "m"`.
    pub(crate) star_exports: Vec<String>,
}

impl FileSymbols {
    pub fn module(&self) -> SymbolId {
        self.module
    }

    pub fn symbol(&self, id: SymbolId) -> &SymbolData {
        &self.arena[id]
    }

    /// The symbol declared by a declaration node.
    pub fn symbol_of_declaration(&self, node: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    pub fn star_exports(&self) -> &[String] {
        &self.star_exports
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
