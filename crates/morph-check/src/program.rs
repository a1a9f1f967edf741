//! Cross-file queries: module resolution, alias chains, names and types.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use morph_inputs::File;
use morph_parse::FileParse as _;
use morph_syntax::SyntaxKind::*;
use morph_syntax::{NodeIndex, SyntaxNode, SyntaxTree};
use salsa::Database;

use crate::names::{declaration_name, name_token};
use crate::symbols::{AliasTarget, FileSymbols, SymbolData, SymbolFlags, SymbolId};
use crate::ty::TypeData;
use crate::FileBind as _;

const MAX_ALIAS_DEPTH: usize = 64;
const MAX_TYPE_DEPTH: usize = 32;

/// A symbol of some file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    pub file: File,
    pub id: SymbolId,
}

/// Maps resolved module paths to the files that hold them.
pub trait ModuleResolver {
    fn file_at(&self, path: &Utf8Path) -> Option<File>;
}

/// The parameters and return type of one function-like declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureData {
    pub parameters: Vec<SymbolRef>,
    pub return_type: TypeData,
}

#[derive(Clone, Copy)]
pub struct Program<'a> {
    db: &'a dyn Database,
    resolver: &'a dyn ModuleResolver,
}

impl<'a> Program<'a> {
    pub fn new(db: &'a dyn Database, resolver: &'a dyn ModuleResolver) -> Self {
        Self { db, resolver }
    }

    pub fn tree(&self, file: File) -> &'a SyntaxTree {
        file.parse(self.db).tree()
    }

    pub fn symbols(&self, file: File) -> &'a FileSymbols {
        file.bind(self.db)
    }

    pub fn data(&self, symbol: SymbolRef) -> &'a SymbolData {
        self.symbols(symbol.file).symbol(symbol.id)
    }

    pub fn module_symbol(&self, file: File) -> SymbolRef {
        SymbolRef { file, id: self.symbols(file).module() }
    }

    fn wrap(file: File, id: SymbolId) -> SymbolRef {
        SymbolRef { file, id }
    }

    /// The symbol declared by `node`, or the one a name at `node` refers to.
    pub fn symbol_of_node(&self, file: File, node: NodeIndex) -> Option<SymbolRef> {
        let symbols = self.symbols(file);
        if let Some(id) = symbols.symbol_of_declaration(node) {
            return Some(Self::wrap(file, id));
        }

        let syntax = self.tree(file).get(node)?;
        match syntax.kind() {
            IDENTIFIER => {
                let parent = syntax.parent()?;
                if name_token(parent) == Some(syntax) {
                    if let Some(id) = symbols.symbol_of_declaration(parent.index()) {
                        return Some(Self::wrap(file, id));
                    }
                }
                if parent.kind() == QUALIFIED_NAME && parent.first_child() != Some(syntax) {
                    return self.resolve_entity(file, parent);
                }
                self.resolve_name(file, syntax, syntax.text_trimmed())
            }
            QUALIFIED_NAME => self.resolve_entity(file, syntax),
            EXPRESSION_WITH_TYPE_ARGUMENTS | TYPE_REFERENCE => {
                let entity = syntax
                    .children()
                    .find(|child| matches!(child.kind(), IDENTIFIER | QUALIFIED_NAME))?;
                self.resolve_entity(file, entity)
            }
            _ => None,
        }
    }

    fn resolve_entity(&self, file: File, entity: SyntaxNode<'_>) -> Option<SymbolRef> {
        match entity.kind() {
            IDENTIFIER => self.resolve_name(file, entity, entity.text_trimmed()),
            QUALIFIED_NAME => {
                let left = entity.first_child()?;
                let right = entity.children_of_kind(IDENTIFIER).last()?;
                if right == left {
                    return None;
                }
                let container = self.resolve_entity(file, left)?;
                let container = self.resolve_alias(container).unwrap_or(container);
                self.export_by_name(container, right.text_trimmed())
            }
            _ => None,
        }
    }

    /// Looks `name` up from `at` outwards: type parameters, enclosing
    /// namespaces, then the file.
    pub fn resolve_name(&self, file: File, at: SyntaxNode<'_>, name: &str) -> Option<SymbolRef> {
        let symbols = self.symbols(file);

        for ancestor in at.ancestors() {
            if let Some(list) = ancestor.child(TYPE_PARAMETER_LIST) {
                let parameter = list
                    .children_of_kind(TYPE_PARAMETER)
                    .find(|parameter| declaration_name(*parameter) == Some(name));
                if let Some(id) = parameter.and_then(|p| symbols.symbol_of_declaration(p.index()))
                {
                    return Some(Self::wrap(file, id));
                }
            }

            if matches!(ancestor.kind(), MODULE_DECLARATION | SOURCE_FILE) {
                let Some(scope) = symbols.symbol_of_declaration(ancestor.index()) else {
                    continue;
                };
                let scope = symbols.symbol(scope);
                if let Some(id) = scope.local(name).or_else(|| scope.export(name)) {
                    return Some(Self::wrap(file, id));
                }
            }
        }

        None
    }

    /// Resolves a relative module specifier against the importing file.
    pub fn resolve_module(&self, from: File, specifier: &str) -> Option<File> {
        if !specifier.starts_with("./") && !specifier.starts_with("../") {
            return None;
        }

        let base = from.path(self.db).parent().unwrap_or_else(|| Utf8Path::new(""));
        let path = normalize(&base.join(specifier));

        if path.extension() == Some("ts") {
            return self.resolver.file_at(&path);
        }

        [
            format!("{path}.ts"),
            format!("{path}.d.ts"),
            format!("{path}/index.ts"),
            format!("{path}/index.d.ts"),
        ]
        .into_iter()
        .find_map(|candidate| self.resolver.file_at(Utf8Path::new(&candidate)))
    }

    /// Follows an alias chain to the symbol it finally denotes. Returns the
    /// symbol itself when it is not an alias.
    pub fn resolve_alias(&self, symbol: SymbolRef) -> Option<SymbolRef> {
        let mut current = symbol;
        for _ in 0..MAX_ALIAS_DEPTH {
            let data = self.data(current);
            let Some(target) = &data.alias else {
                return Some(current);
            };
            current = self.alias_step(current, data, target)?;
        }

        tracing::debug!(name = %self.data(symbol).name, "alias chain too deep");
        None
    }

    fn alias_step(
        &self,
        symbol: SymbolRef,
        data: &SymbolData,
        target: &AliasTarget,
    ) -> Option<SymbolRef> {
        match target {
            AliasTarget::Import { module, name } => {
                let file = self.resolve_module(symbol.file, module)?;
                self.module_export(file, name, 0)
            }
            AliasTarget::ImportDefault { module } => {
                let file = self.resolve_module(symbol.file, module)?;
                self.module_export(file, "default", 0)
            }
            AliasTarget::ImportNamespace { module } => {
                let file = self.resolve_module(symbol.file, module)?;
                Some(self.module_symbol(file))
            }
            AliasTarget::Local { name } => {
                let scope = self.symbols(symbol.file).symbol(data.parent?);
                let id = scope.local(name)?;
                (id != symbol.id).then_some(Self::wrap(symbol.file, id))
            }
            AliasTarget::Module => Some(self.module_symbol(symbol.file)),
        }
    }

    fn module_export(&self, file: File, name: &str, depth: usize) -> Option<SymbolRef> {
        let symbols = self.symbols(file);
        if let Some(id) = symbols.symbol(symbols.module()).export(name) {
            return Some(Self::wrap(file, id));
        }
        if depth >= MAX_ALIAS_DEPTH || name == "default" {
            return None;
        }
        symbols.star_exports().iter().find_map(|module| {
            let target = self.resolve_module(file, module)?;
            self.module_export(target, name, depth + 1)
        })
    }

    pub fn export_by_name(&self, symbol: SymbolRef, name: &str) -> Option<SymbolRef> {
        let data = self.data(symbol);
        if data.flags.contains(SymbolFlags::MODULE) {
            return self.module_export(symbol.file, name, 0);
        }
        data.export(name).map(|id| Self::wrap(symbol.file, id))
    }

    pub fn exports(&self, symbol: SymbolRef) -> Vec<SymbolRef> {
        let data = self.data(symbol);
        let mut exports =
            data.exports().map(|(_, id)| Self::wrap(symbol.file, id)).collect::<Vec<_>>();

        if data.flags.contains(SymbolFlags::MODULE) {
            for module in self.symbols(symbol.file).star_exports() {
                let Some(file) = self.resolve_module(symbol.file, module) else { continue };
                let target = self.module_symbol(file);
                for export in self.exports(target) {
                    let name = &self.data(export).name;
                    if name != "default" && data.export(name).is_none() {
                        exports.push(export);
                    }
                }
            }
        }

        exports
    }

    pub fn member_by_name(&self, symbol: SymbolRef, name: &str) -> Option<SymbolRef> {
        self.data(symbol).member(name).map(|id| Self::wrap(symbol.file, id))
    }

    pub fn members(&self, symbol: SymbolRef) -> Vec<SymbolRef> {
        self.data(symbol).members().map(|(_, id)| Self::wrap(symbol.file, id)).collect()
    }

    pub fn global_export_by_name(&self, symbol: SymbolRef, name: &str) -> Option<SymbolRef> {
        self.data(symbol).global_export(name).map(|id| Self::wrap(symbol.file, id))
    }

    pub fn global_exports(&self, symbol: SymbolRef) -> Vec<SymbolRef> {
        self.data(symbol).global_exports().map(|(_, id)| Self::wrap(symbol.file, id)).collect()
    }

    /// `"/path/to/file".Outer.Inner` for exported symbols, `Name` otherwise.
    pub fn fully_qualified_name(&self, symbol: SymbolRef) -> String {
        let symbols = self.symbols(symbol.file);
        let mut id = symbol.id;
        let mut parts = vec![symbols.symbol(id).name.as_str()];

        while let Some(parent) = symbols.symbol(id).parent {
            let parent_data = symbols.symbol(parent);
            let reachable = parent_data.exports().any(|(_, export)| export == id)
                || parent_data.members().any(|(_, member)| member == id);
            if !reachable {
                break;
            }
            parts.push(parent_data.name.as_str());
            id = parent;
        }

        parts.reverse();
        parts.join(".")
    }

    pub fn declared_type(&self, symbol: SymbolRef) -> TypeData {
        self.declared_type_at(symbol, 0)
    }

    fn declared_type_at(&self, symbol: SymbolRef, depth: usize) -> TypeData {
        if depth > MAX_TYPE_DEPTH {
            return TypeData::Any;
        }

        let data = self.data(symbol);
        let flags = data.flags;

        if flags.contains(SymbolFlags::ALIAS) {
            return match self.resolve_alias(symbol) {
                Some(target) if target != symbol => self.declared_type_at(target, depth + 1),
                _ => TypeData::Unresolved(data.name.clone()),
            };
        }
        if flags.contains(SymbolFlags::CLASS) {
            return TypeData::Class { symbol, arguments: Vec::new() };
        }
        if flags.contains(SymbolFlags::INTERFACE) {
            return TypeData::Interface { symbol, arguments: Vec::new() };
        }
        if flags.contains(SymbolFlags::ENUM) {
            return TypeData::Enum(symbol);
        }
        if flags.contains(SymbolFlags::TYPE_PARAMETER) {
            return TypeData::TypeParameter(symbol);
        }
        if flags.intersects(SymbolFlags::NAMESPACE | SymbolFlags::MODULE) {
            return TypeData::Namespace(symbol);
        }

        let tree = self.tree(symbol.file);
        if flags.contains(SymbolFlags::TYPE_ALIAS) {
            let aliased = data
                .declarations
                .first()
                .and_then(|&node| tree.get(node))
                .and_then(|node| node.children().find(|child| child.kind().is_type()));
            return match aliased {
                Some(node) => self.type_from_node(symbol.file, node, depth + 1),
                None => TypeData::Any,
            };
        }

        match data.value_declaration.or_else(|| data.declarations.first().copied()) {
            Some(node) => self.type_of_node(symbol.file, node),
            None => TypeData::Any,
        }
    }

    /// The type of a declaration, type node or name.
    pub fn type_of_node(&self, file: File, node: NodeIndex) -> TypeData {
        let Some(syntax) = self.tree(file).get(node) else {
            return TypeData::Any;
        };

        match syntax.kind() {
            CLASS_DECLARATION | INTERFACE_DECLARATION | ENUM_DECLARATION
            | TYPE_ALIAS_DECLARATION | MODULE_DECLARATION | TYPE_PARAMETER | SOURCE_FILE => {
                match self.symbol_of_node(file, node) {
                    Some(symbol) => self.declared_type(symbol),
                    None => TypeData::Any,
                }
            }
            PROPERTY_DECLARATION | PARAMETER | VARIABLE_DECLARATION | PROPERTY_SIGNATURE
            | GET_ACCESSOR => {
                if let Some(annotation) = syntax.children().find(|child| child.kind().is_type()) {
                    return self.type_from_node(file, annotation, 0);
                }
                match syntax.child(EXPRESSION) {
                    Some(initializer) => self.type_of_initializer(file, initializer),
                    None => TypeData::Any,
                }
            }
            SET_ACCESSOR => syntax
                .child(PARAMETER_LIST)
                .and_then(|list| list.child(PARAMETER))
                .map_or(TypeData::Any, |parameter| self.type_of_node(file, parameter.index())),
            FUNCTION_DECLARATION | METHOD_DECLARATION | METHOD_SIGNATURE | CONSTRUCTOR => {
                TypeData::Function { file, node }
            }
            ENUM_MEMBER => syntax
                .parent()
                .and_then(|parent| self.symbol_of_node(file, parent.index()))
                .map_or(TypeData::Any, TypeData::Enum),
            IDENTIFIER | QUALIFIED_NAME | EXPRESSION_WITH_TYPE_ARGUMENTS => {
                match self.symbol_of_node(file, node) {
                    Some(symbol) => self.declared_type(symbol),
                    None => TypeData::Unresolved(syntax.text_trimmed().to_owned()),
                }
            }
            kind if kind.is_type() => self.type_from_node(file, syntax, 0),
            _ => TypeData::Any,
        }
    }

    fn type_of_initializer(&self, file: File, initializer: SyntaxNode<'_>) -> TypeData {
        let mut tokens = initializer.children();
        match (tokens.next().map(SyntaxNode::kind), tokens.len()) {
            (Some(NUMERIC_LITERAL), 0) => TypeData::Number,
            (Some(STRING_LITERAL), 0) => TypeData::String,
            (Some(TRUE_KW | FALSE_KW), 0) => TypeData::Boolean,
            (Some(NEW_KW), _) => {
                let Some(name) = tokens.next().filter(|token| token.kind() == IDENTIFIER) else {
                    return TypeData::Any;
                };
                match self.resolve_name(file, name, name.text_trimmed()) {
                    Some(symbol) => self.declared_type(symbol),
                    None => TypeData::Unresolved(name.text_trimmed().to_owned()),
                }
            }
            _ => TypeData::Any,
        }
    }

    fn type_from_node(&self, file: File, node: SyntaxNode<'_>, depth: usize) -> TypeData {
        if depth > MAX_TYPE_DEPTH {
            return TypeData::Any;
        }
        let types = |node: SyntaxNode<'_>| {
            node.children()
                .filter(|child| child.kind().is_type())
                .map(|child| self.type_from_node(file, child, depth + 1))
                .collect::<Vec<_>>()
        };

        match node.kind() {
            KEYWORD_TYPE => match node.first_child().map(SyntaxNode::kind) {
                Some(ANY_KW) => TypeData::Any,
                Some(UNKNOWN_KW) => TypeData::Unknown,
                Some(NEVER_KW) => TypeData::Never,
                Some(VOID_KW) => TypeData::Void,
                Some(UNDEFINED_KW) => TypeData::Undefined,
                Some(NULL_KW) => TypeData::Null,
                Some(STRING_KW) => TypeData::String,
                Some(NUMBER_KW) => TypeData::Number,
                Some(BOOLEAN_KW) => TypeData::Boolean,
                Some(OBJECT_KW) => TypeData::Object,
                Some(THIS_KW) => TypeData::This,
                _ => TypeData::Any,
            },
            LITERAL_TYPE => TypeData::Literal(node.text_trimmed().to_owned()),
            ARRAY_TYPE => match node.children().find(|child| child.kind().is_type()) {
                Some(element) => {
                    TypeData::Array(Box::new(self.type_from_node(file, element, depth + 1)))
                }
                None => TypeData::Any,
            },
            UNION_TYPE => TypeData::Union(types(node)),
            INTERSECTION_TYPE => TypeData::Intersection(types(node)),
            TUPLE_TYPE => TypeData::Tuple(types(node)),
            PARENTHESIZED_TYPE => types(node).pop().unwrap_or(TypeData::Any),
            FUNCTION_TYPE => TypeData::Function { file, node: node.index() },
            TYPE_LITERAL => TypeData::ObjectLiteral { file, node: node.index() },
            TYPE_REFERENCE | EXPRESSION_WITH_TYPE_ARGUMENTS => {
                self.reference_type(file, node, depth)
            }
            _ => TypeData::Any,
        }
    }

    fn reference_type(&self, file: File, node: SyntaxNode<'_>, depth: usize) -> TypeData {
        let Some(entity) =
            node.children().find(|child| matches!(child.kind(), IDENTIFIER | QUALIFIED_NAME))
        else {
            return TypeData::Any;
        };
        let arguments = node
            .child(TYPE_ARGUMENT_LIST)
            .map(|list| {
                list.children()
                    .filter(|child| child.kind().is_type())
                    .map(|child| self.type_from_node(file, child, depth + 1))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let resolved = self
            .resolve_entity(file, entity)
            .and_then(|symbol| self.resolve_alias(symbol));
        let Some(symbol) = resolved else {
            if entity.text_trimmed() == "Array" && arguments.len() == 1 {
                return TypeData::Array(Box::new(arguments.into_iter().next().unwrap_or(TypeData::Any)));
            }
            return TypeData::Unresolved(entity.text_trimmed().to_owned());
        };

        let flags = self.data(symbol).flags;
        if flags.contains(SymbolFlags::CLASS) {
            TypeData::Class { symbol, arguments }
        } else if flags.contains(SymbolFlags::INTERFACE) {
            TypeData::Interface { symbol, arguments }
        } else {
            self.declared_type_at(symbol, depth + 1)
        }
    }

    /// Types named in the `extends` clauses of a class or interface.
    pub fn base_types(&self, symbol: SymbolRef) -> Vec<TypeData> {
        let symbol = self.resolve_alias(symbol).unwrap_or(symbol);
        let tree = self.tree(symbol.file);

        self.data(symbol)
            .declarations
            .iter()
            .filter_map(|&node| tree.get(node))
            .filter(|node| matches!(node.kind(), CLASS_DECLARATION | INTERFACE_DECLARATION))
            .flat_map(|node| node.children_of_kind(HERITAGE_CLAUSE))
            .filter(|clause| clause.first_child().map(SyntaxNode::kind) == Some(EXTENDS_KW))
            .flat_map(|clause| clause.children_of_kind(EXPRESSION_WITH_TYPE_ARGUMENTS))
            .map(|expression| self.reference_type(symbol.file, expression, 0))
            .collect()
    }

    /// The signature of a function-like declaration or function type.
    pub fn signature(&self, file: File, node: NodeIndex) -> Option<SignatureData> {
        let syntax = self.tree(file).get(node)?;
        if !matches!(
            syntax.kind(),
            FUNCTION_DECLARATION
                | METHOD_DECLARATION
                | METHOD_SIGNATURE
                | CONSTRUCTOR
                | GET_ACCESSOR
                | SET_ACCESSOR
                | FUNCTION_TYPE
        ) {
            return None;
        }

        let symbols = self.symbols(file);
        let parameters = syntax
            .child(PARAMETER_LIST)
            .into_iter()
            .flat_map(|list| list.children_of_kind(PARAMETER))
            .filter_map(|parameter| symbols.symbol_of_declaration(parameter.index()))
            .map(|id| Self::wrap(file, id))
            .collect();

        let return_type = match syntax.children().find(|child| child.kind().is_type()) {
            Some(annotation) => self.type_from_node(file, annotation, 0),
            None if syntax.kind() == CONSTRUCTOR => syntax
                .parent()
                .and_then(|class| self.symbol_of_node(file, class.index()))
                .map_or(TypeData::Any, |class| self.declared_type(class)),
            None if syntax.kind() == SET_ACCESSOR => TypeData::Void,
            None => TypeData::Any,
        };

        Some(SignatureData { parameters, return_type })
    }

    /// Renders a type the way it would be written in source.
    pub fn type_text(&self, ty: &TypeData) -> String {
        let join = |types: &[TypeData], separator: &str| {
            types.iter().map(|ty| self.type_text(ty)).collect::<Vec<_>>().join(separator)
        };
        let generic = |symbol: SymbolRef, arguments: &[TypeData]| {
            let name = &self.data(symbol).name;
            if arguments.is_empty() {
                name.clone()
            } else {
                format!("{name}<{}>", join(arguments, ", "))
            }
        };

        match ty {
            TypeData::Any => "any".to_owned(),
            TypeData::Unknown => "unknown".to_owned(),
            TypeData::Never => "never".to_owned(),
            TypeData::Void => "void".to_owned(),
            TypeData::Undefined => "undefined".to_owned(),
            TypeData::Null => "null".to_owned(),
            TypeData::String => "string".to_owned(),
            TypeData::Number => "number".to_owned(),
            TypeData::Boolean => "boolean".to_owned(),
            TypeData::Object => "object".to_owned(),
            TypeData::This => "this".to_owned(),
            TypeData::Literal(text) | TypeData::Unresolved(text) => text.clone(),
            TypeData::Class { symbol, arguments } | TypeData::Interface { symbol, arguments } => {
                generic(*symbol, arguments)
            }
            TypeData::Enum(symbol) | TypeData::TypeParameter(symbol) => {
                self.data(*symbol).name.clone()
            }
            TypeData::Namespace(symbol) => format!("typeof {}", self.data(*symbol).name),
            TypeData::Array(element) => match **element {
                TypeData::Union(_) | TypeData::Intersection(_) | TypeData::Function { .. } => {
                    format!("({})[]", self.type_text(element))
                }
                _ => format!("{}[]", self.type_text(element)),
            },
            TypeData::Tuple(types) => format!("[{}]", join(types, ", ")),
            TypeData::Union(types) => join(types, " | "),
            TypeData::Intersection(types) => join(types, " & "),
            TypeData::Function { file, node } => self.function_text(*file, *node),
            TypeData::ObjectLiteral { file, node } => self
                .tree(*file)
                .get(*node)
                .map_or_else(|| "{}".to_owned(), |node| node.text_trimmed().to_owned()),
        }
    }

    fn function_text(&self, file: File, node: NodeIndex) -> String {
        let Some(syntax) = self.tree(file).get(node) else {
            return "Function".to_owned();
        };
        if syntax.kind() == FUNCTION_TYPE {
            return syntax.text_trimmed().to_owned();
        }

        let parameters = syntax
            .child(PARAMETER_LIST)
            .into_iter()
            .flat_map(|list| list.children_of_kind(PARAMETER))
            .map(|parameter| parameter.text_trimmed())
            .collect::<Vec<_>>()
            .join(", ");
        let return_type = self
            .signature(file, node)
            .map_or_else(|| "any".to_owned(), |signature| self.type_text(&signature.return_type));
        format!("({parameters}) => {return_type}")
    }
}

fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                normalized.pop();
            }
            component => normalized.push(component.as_str()),
        }
    }
    normalized
}
