//! Builds the symbol tables of one file.

use la_arena::Arena;
use morph_syntax::SyntaxKind::*;
use morph_syntax::{NodeIndex, SyntaxNode, SyntaxTree};
use rustc_hash::FxHashMap;

use crate::names::{declaration_name, has_modifier, module_specifier};
use crate::symbols::{AliasTarget, FileSymbols, FxIndexMap, SymbolData, SymbolFlags, SymbolId};

#[derive(Clone, Copy)]
enum Table {
    Locals,
    Exports,
    Members,
    GlobalExports,
}

struct Binder {
    arena: Arena<SymbolData>,
    module: SymbolId,
    node_symbols: FxHashMap<NodeIndex, SymbolId>,
    star_exports: Vec<String>,
}

pub(crate) fn bind(tree: &SyntaxTree, module_name: String) -> FileSymbols {
    let root = tree.root();
    let mut arena = Arena::default();
    let module = arena.alloc(SymbolData::new(module_name, SymbolFlags::MODULE, None));
    arena[module].declarations.push(root.index());

    let mut binder =
        Binder { arena, module, node_symbols: FxHashMap::default(), star_exports: Vec::new() };
    binder.node_symbols.insert(root.index(), module);
    binder.statements(root, module);
    binder.parameters(root);

    tracing::trace!(symbols = binder.arena.len(), "bound file");

    FileSymbols {
        arena: binder.arena,
        module,
        node_symbols: binder.node_symbols,
        star_exports: binder.star_exports,
    }
}

impl Binder {
    fn table(&mut self, scope: SymbolId, table: Table) -> &mut FxIndexMap<String, SymbolId> {
        let data = &mut self.arena[scope];
        match table {
            Table::Locals => &mut data.locals,
            Table::Exports => &mut data.exports,
            Table::Members => &mut data.members,
            Table::GlobalExports => &mut data.global_exports,
        }
    }

    /// Adds a declaration to `table`, merging with an existing same-name symbol.
    fn declare(
        &mut self,
        scope: SymbolId,
        table: Table,
        name: &str,
        flags: SymbolFlags,
        node: SyntaxNode<'_>,
    ) -> SymbolId {
        let existing = self.table(scope, table).get(name).copied();
        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.arena.alloc(SymbolData::new(name.to_owned(), flags, Some(scope)));
                self.table(scope, table).insert(name.to_owned(), id);
                id
            }
        };

        let data = &mut self.arena[id];
        data.flags |= flags;
        data.declarations.push(node.index());
        if data.value_declaration.is_none() && flags.intersects(SymbolFlags::VALUE) {
            data.value_declaration = Some(node.index());
        }
        self.node_symbols.insert(node.index(), id);
        id
    }

    fn alias(
        &mut self,
        scope: SymbolId,
        table: Table,
        name: &str,
        node: SyntaxNode<'_>,
        target: AliasTarget,
    ) {
        let id = self.declare(scope, table, name, SymbolFlags::ALIAS, node);
        self.arena[id].alias = Some(target);
    }

    fn statements(&mut self, container: SyntaxNode<'_>, scope: SymbolId) {
        for statement in container.children() {
            self.statement(statement, scope);
        }
    }

    fn statement(&mut self, node: SyntaxNode<'_>, scope: SymbolId) {
        let flags = match node.kind() {
            CLASS_DECLARATION => SymbolFlags::CLASS,
            INTERFACE_DECLARATION => SymbolFlags::INTERFACE,
            FUNCTION_DECLARATION => SymbolFlags::FUNCTION,
            ENUM_DECLARATION => SymbolFlags::ENUM,
            TYPE_ALIAS_DECLARATION => SymbolFlags::TYPE_ALIAS,
            MODULE_DECLARATION => SymbolFlags::NAMESPACE,
            VARIABLE_STATEMENT => return self.variables(node, scope),
            IMPORT_DECLARATION => return self.import(node, scope),
            EXPORT_DECLARATION => return self.export(node, scope),
            NAMESPACE_EXPORT_DECLARATION => {
                if let Some(name) = declaration_name(node) {
                    let module = self.module;
                    self.alias(module, Table::GlobalExports, name, node, AliasTarget::Module);
                }
                return;
            }
            _ => return,
        };

        let is_default = has_modifier(node, DEFAULT_KW);
        let name = match declaration_name(node) {
            Some(name) => name,
            None if is_default => "default",
            None => return,
        };

        let id = self.declare(scope, Table::Locals, name, flags, node);
        if has_modifier(node, EXPORT_KW) {
            let exported = if is_default { "default" } else { name };
            self.table(scope, Table::Exports).insert(exported.to_owned(), id);
        }

        match node.kind() {
            CLASS_DECLARATION => self.class_members(node, id),
            INTERFACE_DECLARATION => self.type_members(node, id),
            ENUM_DECLARATION => {
                for member in node.children_of_kind(ENUM_MEMBER) {
                    if let Some(name) = declaration_name(member) {
                        self.declare(id, Table::Exports, name, SymbolFlags::ENUM_MEMBER, member);
                    }
                }
            }
            MODULE_DECLARATION => self.module_body(node, id),
            _ => {}
        }
    }

    fn variables(&mut self, statement: SyntaxNode<'_>, scope: SymbolId) {
        let exported = has_modifier(statement, EXPORT_KW);
        for declaration in statement.children_of_kind(VARIABLE_DECLARATION) {
            let Some(name) = declaration_name(declaration) else { continue };
            let id = self.declare(scope, Table::Locals, name, SymbolFlags::VARIABLE, declaration);
            if exported {
                self.table(scope, Table::Exports).insert(name.to_owned(), id);
            }
        }
    }

    /// `namespace A.B {}` declares `B` as an implicit export of `A`.
    fn module_body(&mut self, node: SyntaxNode<'_>, id: SymbolId) {
        if let Some(inner) = node.child(MODULE_DECLARATION) {
            let Some(name) = declaration_name(inner) else { return };
            let inner_id = self.declare(id, Table::Locals, name, SymbolFlags::NAMESPACE, inner);
            self.table(id, Table::Exports).insert(name.to_owned(), inner_id);
            self.module_body(inner, inner_id);
        } else if let Some(block) = node.child(MODULE_BLOCK) {
            self.statements(block, id);
        }
    }

    fn class_members(&mut self, class: SyntaxNode<'_>, id: SymbolId) {
        for member in class.children() {
            let flags = match member.kind() {
                PROPERTY_DECLARATION => SymbolFlags::PROPERTY,
                METHOD_DECLARATION => SymbolFlags::METHOD,
                GET_ACCESSOR => SymbolFlags::GET_ACCESSOR,
                SET_ACCESSOR => SymbolFlags::SET_ACCESSOR,
                CONSTRUCTOR => {
                    self.declare(
                        id,
                        Table::Members,
                        "__constructor",
                        SymbolFlags::CONSTRUCTOR,
                        member,
                    );
                    self.parameter_properties(member, id);
                    continue;
                }
                _ => continue,
            };

            let Some(name) = declaration_name(member) else { continue };
            let table =
                if has_modifier(member, STATIC_KW) { Table::Exports } else { Table::Members };
            self.declare(id, table, name, flags, member);
        }
    }

    /// `constructor(private x: T)` also declares the instance property `x`.
    fn parameter_properties(&mut self, constructor: SyntaxNode<'_>, class: SymbolId) {
        let Some(list) = constructor.child(PARAMETER_LIST) else { return };
        for parameter in list.children_of_kind(PARAMETER) {
            if crate::names::modifiers(parameter).next().is_none() {
                continue;
            }
            if let Some(name) = declaration_name(parameter) {
                self.declare(class, Table::Members, name, SymbolFlags::PROPERTY, parameter);
            }
        }
    }

    fn type_members(&mut self, node: SyntaxNode<'_>, id: SymbolId) {
        for member in node.children() {
            let flags = match member.kind() {
                PROPERTY_SIGNATURE => SymbolFlags::PROPERTY,
                METHOD_SIGNATURE => SymbolFlags::METHOD,
                _ => continue,
            };
            if let Some(name) = declaration_name(member) {
                self.declare(id, Table::Members, name, flags, member);
            }
        }
    }

    fn import(&mut self, node: SyntaxNode<'_>, scope: SymbolId) {
        let Some(module) = module_specifier(node) else { return };
        let Some(clause) = node.child(IMPORT_CLAUSE) else { return };

        if let Some(default) = clause.child(IDENTIFIER) {
            let target = AliasTarget::ImportDefault { module: module.to_owned() };
            self.alias(scope, Table::Locals, default.text_trimmed(), clause, target);
        }

        if let Some(named) = clause.child(NAMED_IMPORTS) {
            for specifier in named.children_of_kind(IMPORT_SPECIFIER) {
                let mut names = specifier.children_of_kind(IDENTIFIER);
                let Some(imported) = names.next() else { continue };
                let local = names.last().unwrap_or(imported);
                let target = AliasTarget::Import {
                    module: module.to_owned(),
                    name: imported.text_trimmed().to_owned(),
                };
                self.alias(scope, Table::Locals, local.text_trimmed(), specifier, target);
            }
        }

        if let Some(namespace) = clause.child(NAMESPACE_IMPORT) {
            let Some(name) = namespace.child(IDENTIFIER) else { return };
            let target = AliasTarget::ImportNamespace { module: module.to_owned() };
            self.alias(scope, Table::Locals, name.text_trimmed(), namespace, target);
        }
    }

    fn export(&mut self, node: SyntaxNode<'_>, scope: SymbolId) {
        let module = module_specifier(node);

        if let Some(named) = node.child(NAMED_EXPORTS) {
            for specifier in named.children_of_kind(EXPORT_SPECIFIER) {
                let mut names = specifier.children_of_kind(IDENTIFIER);
                let Some(local) = names.next() else { continue };
                let exported = names.last().unwrap_or(local);
                let name = local.text_trimmed().to_owned();
                let target = match module {
                    Some(module) => AliasTarget::Import { module: module.to_owned(), name },
                    None => AliasTarget::Local { name },
                };
                self.alias(scope, Table::Exports, exported.text_trimmed(), specifier, target);
            }
        } else if node.child(ASTERISK).is_some() {
            let Some(module) = module else { return };
            match node.child(IDENTIFIER) {
                Some(name) => {
                    let target = AliasTarget::ImportNamespace { module: module.to_owned() };
                    self.alias(scope, Table::Exports, name.text_trimmed(), node, target);
                }
                None => self.star_exports.push(module.to_owned()),
            }
        } else if let Some(expression) = node.child(EXPRESSION) {
            let text = expression.text_trimmed();
            let is_identifier = text.chars().all(|c| c == '_' || c == '$' || c.is_alphanumeric());
            if !is_identifier {
                return;
            }
            let exported = if node.child(DEFAULT_KW).is_some() { "default" } else { "export=" };
            let target = AliasTarget::Local { name: text.to_owned() };
            self.alias(scope, Table::Exports, exported, node, target);
        }
    }

    /// Parameters and type parameters get symbols owned by their declaration.
    fn parameters(&mut self, root: SyntaxNode<'_>) {
        for node in root.descendants() {
            let flags = match node.kind() {
                PARAMETER => SymbolFlags::PARAMETER,
                TYPE_PARAMETER => SymbolFlags::TYPE_PARAMETER,
                _ => continue,
            };
            if self.node_symbols.contains_key(&node.index()) {
                continue;
            }
            let Some(name) = declaration_name(node) else { continue };

            let owner = node
                .parent()
                .and_then(|list| list.parent())
                .and_then(|owner| self.node_symbols.get(&owner.index()).copied());
            let mut data = SymbolData::new(name.to_owned(), flags, owner);
            data.declarations.push(node.index());
            if flags == SymbolFlags::PARAMETER {
                data.value_declaration = Some(node.index());
            }
            let id = self.arena.alloc(data);
            self.node_symbols.insert(node.index(), id);
        }
    }
}
