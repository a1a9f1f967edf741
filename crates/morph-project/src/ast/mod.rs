//! Typed wrappers over [`Node`], one per syntax kind, and the capability
//! traits they share.
//!
//! A typed wrapper is a [`Node`] whose kind has been checked. It adds no
//! state of its own, so it compares, hashes and invalidates exactly like the
//! node it wraps.

use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxNode;
use text_size::TextRange;

use crate::error::{Error, Result};
use crate::manipulation::{ItemList, Splice};
use crate::node::Node;
use crate::printers::StructurePrinter;
use crate::text::{comma_list_insertion, comma_list_removal};

pub trait AstNode<'p>: Copy {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(node: Node<'p>) -> Option<Self>;

    fn syntax(self) -> Node<'p>;
}

macro_rules! ast_node {
    ($($(#[$attr:meta])* $name:ident => $($kind:ident)|+;)*) => {$(
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name<'p>(pub(crate) crate::node::Node<'p>);

        impl<'p> crate::ast::AstNode<'p> for $name<'p> {
            fn can_cast(kind: morph_syntax::SyntaxKind) -> bool {
                matches!(kind, $(morph_syntax::SyntaxKind::$kind)|+)
            }

            fn cast(node: crate::node::Node<'p>) -> Option<Self> {
                Self::can_cast(node.kind()).then_some(Self(node))
            }

            fn syntax(self) -> crate::node::Node<'p> {
                self.0
            }
        }
    )*};
}

mod class;
mod declarations;
mod imports;
mod interface;
mod parts;
mod source_file;
mod traits;

pub use self::class::{
    ClassDeclaration, ConstructorDeclaration, GetAccessorDeclaration, MethodDeclaration,
    PropertyDeclaration, SetAccessorDeclaration,
};
pub use self::declarations::{
    EnumDeclaration, EnumMember, FunctionDeclaration, NamespaceDeclaration, TypeAliasDeclaration,
    VariableDeclaration, VariableDeclarationKind, VariableStatement,
};
pub use self::imports::{ImportDeclaration, ImportSpecifier, NamespaceExportDeclaration};
pub use self::interface::{InterfaceDeclaration, MethodSignature, PropertySignature};
pub use self::parts::{
    CommentRange, ExpressionWithTypeArguments, HeritageClause, ParameterDeclaration,
    TypeParameterDeclaration,
};
pub use self::source_file::SourceFile;
pub use self::traits::{
    BodiedNode, HeritageClauseableNode, ImplementsClauseableNode, InitializerExpressionableNode,
    JsDocableNode, ModifierableNode, NamedNode, ParameteredNode, RemovableNode, ReturnTypedNode,
    StatementedNode, TypeParameteredNode, TypedNode,
};

/// A node dispatched on its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeVariant<'p> {
    SourceFile(SourceFile<'p>),
    Class(ClassDeclaration<'p>),
    Constructor(ConstructorDeclaration<'p>),
    Method(MethodDeclaration<'p>),
    Property(PropertyDeclaration<'p>),
    GetAccessor(GetAccessorDeclaration<'p>),
    SetAccessor(SetAccessorDeclaration<'p>),
    Interface(InterfaceDeclaration<'p>),
    PropertySignature(PropertySignature<'p>),
    MethodSignature(MethodSignature<'p>),
    Function(FunctionDeclaration<'p>),
    Namespace(NamespaceDeclaration<'p>),
    Enum(EnumDeclaration<'p>),
    EnumMember(EnumMember<'p>),
    TypeAlias(TypeAliasDeclaration<'p>),
    VariableStatement(VariableStatement<'p>),
    VariableDeclaration(VariableDeclaration<'p>),
    Import(ImportDeclaration<'p>),
    ImportSpecifier(ImportSpecifier<'p>),
    NamespaceExport(NamespaceExportDeclaration<'p>),
    HeritageClause(HeritageClause<'p>),
    ExpressionWithTypeArguments(ExpressionWithTypeArguments<'p>),
    TypeParameter(TypeParameterDeclaration<'p>),
    Parameter(ParameterDeclaration<'p>),
    Comment(CommentRange<'p>),
    Other(Node<'p>),
}

impl<'p> NodeVariant<'p> {
    pub(crate) fn new(node: Node<'p>) -> Self {
        match node.kind() {
            SOURCE_FILE => Self::SourceFile(SourceFile(node)),
            CLASS_DECLARATION => Self::Class(ClassDeclaration(node)),
            CONSTRUCTOR => Self::Constructor(ConstructorDeclaration(node)),
            METHOD_DECLARATION => Self::Method(MethodDeclaration(node)),
            PROPERTY_DECLARATION => Self::Property(PropertyDeclaration(node)),
            GET_ACCESSOR => Self::GetAccessor(GetAccessorDeclaration(node)),
            SET_ACCESSOR => Self::SetAccessor(SetAccessorDeclaration(node)),
            INTERFACE_DECLARATION => Self::Interface(InterfaceDeclaration(node)),
            PROPERTY_SIGNATURE => Self::PropertySignature(PropertySignature(node)),
            METHOD_SIGNATURE => Self::MethodSignature(MethodSignature(node)),
            FUNCTION_DECLARATION => Self::Function(FunctionDeclaration(node)),
            MODULE_DECLARATION => Self::Namespace(NamespaceDeclaration(node)),
            ENUM_DECLARATION => Self::Enum(EnumDeclaration(node)),
            ENUM_MEMBER => Self::EnumMember(EnumMember(node)),
            TYPE_ALIAS_DECLARATION => Self::TypeAlias(TypeAliasDeclaration(node)),
            VARIABLE_STATEMENT => Self::VariableStatement(VariableStatement(node)),
            VARIABLE_DECLARATION => Self::VariableDeclaration(VariableDeclaration(node)),
            IMPORT_DECLARATION => Self::Import(ImportDeclaration(node)),
            IMPORT_SPECIFIER => Self::ImportSpecifier(ImportSpecifier(node)),
            NAMESPACE_EXPORT_DECLARATION => Self::NamespaceExport(NamespaceExportDeclaration(node)),
            HERITAGE_CLAUSE => Self::HeritageClause(HeritageClause(node)),
            EXPRESSION_WITH_TYPE_ARGUMENTS => {
                Self::ExpressionWithTypeArguments(ExpressionWithTypeArguments(node))
            }
            TYPE_PARAMETER => Self::TypeParameter(TypeParameterDeclaration(node)),
            PARAMETER => Self::Parameter(ParameterDeclaration(node)),
            SINGLE_LINE_COMMENT | MULTI_LINE_COMMENT => Self::Comment(CommentRange(node)),
            _ => Self::Other(node),
        }
    }

    pub fn syntax(self) -> Node<'p> {
        match self {
            Self::SourceFile(it) => it.syntax(),
            Self::Class(it) => it.syntax(),
            Self::Constructor(it) => it.syntax(),
            Self::Method(it) => it.syntax(),
            Self::Property(it) => it.syntax(),
            Self::GetAccessor(it) => it.syntax(),
            Self::SetAccessor(it) => it.syntax(),
            Self::Interface(it) => it.syntax(),
            Self::PropertySignature(it) => it.syntax(),
            Self::MethodSignature(it) => it.syntax(),
            Self::Function(it) => it.syntax(),
            Self::Namespace(it) => it.syntax(),
            Self::Enum(it) => it.syntax(),
            Self::EnumMember(it) => it.syntax(),
            Self::TypeAlias(it) => it.syntax(),
            Self::VariableStatement(it) => it.syntax(),
            Self::VariableDeclaration(it) => it.syntax(),
            Self::Import(it) => it.syntax(),
            Self::ImportSpecifier(it) => it.syntax(),
            Self::NamespaceExport(it) => it.syntax(),
            Self::HeritageClause(it) => it.syntax(),
            Self::ExpressionWithTypeArguments(it) => it.syntax(),
            Self::TypeParameter(it) => it.syntax(),
            Self::Parameter(it) => it.syntax(),
            Self::Comment(it) => it.syntax(),
            Self::Other(node) => node,
        }
    }
}

/// The children of `node` that cast to `N`.
pub(crate) fn children_of<'p, N: AstNode<'p>>(node: Node<'p>) -> Result<Vec<N>> {
    Ok(node.children()?.into_iter().filter_map(N::cast).collect())
}

/// The children of the `list` child of `node` that cast to `N`; empty when
/// there is no such list.
pub(crate) fn list_children<'p, N: AstNode<'p>>(
    node: Node<'p>,
    list: SyntaxKind,
) -> Result<Vec<N>> {
    match node.first_child_by_kind(list)? {
        Some(list) => children_of(list),
        None => Ok(Vec::new()),
    }
}

pub(crate) fn find_named<'p, N: NamedNode<'p>>(items: Vec<N>, name: &str) -> Result<Option<N>> {
    for item in items {
        if item.name()? == name {
            return Ok(Some(item));
        }
    }
    Ok(None)
}

/// Inserts `texts` as the `kind` items `index..` of the comma-separated
/// `list`, right after `open` when the list is empty, and returns them.
pub(crate) fn insert_comma_items<'p, N: AstNode<'p>>(
    list: Node<'p>,
    open: SyntaxKind,
    kind: SyntaxKind,
    index: usize,
    texts: &[String],
) -> Result<Vec<N>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let (items, open_end) = list.with_syntax(|list| {
        let items = item_ranges(list, kind);
        (items, list.child(open).map(|open| open.trimmed_range().end()))
    })?;
    let len = items.len();
    let open_end =
        open_end.ok_or_else(|| Error::invalid(format!("{:?} has no {open:?}", list.kind())))?;
    let (offset, text) = comma_list_insertion(open_end, &items, index, texts)
        .ok_or(Error::IndexOutOfRange { index, len })?;
    list.edit(vec![Splice::insert(offset, text)])?;

    let items = children_of::<N>(list)?;
    items.get(index..index + texts.len()).map(<[N]>::to_vec).ok_or_else(|| {
        Error::InvariantViolation {
            message: format!("the inserted {kind:?} items were not found after reparsing"),
        }
    })
}

/// Removes `item` from the comma-separated list it is part of, together
/// with one adjacent comma.
pub(crate) fn remove_comma_item(item: Node<'_>) -> Result<()> {
    let range = item.with_syntax(|syntax| {
        let parent = syntax.parent()?;
        let siblings = parent.children_of_kind(syntax.kind());
        let position = siblings.clone().position(|sibling| sibling == syntax)?;
        let items = siblings.map(SyntaxNode::trimmed_range).collect::<Vec<_>>();
        comma_list_removal(syntax.tree().text(), &items, position)
    })?;
    let range = range.ok_or_else(|| Error::invalid("the node is not part of a list"))?;
    item.edit(vec![Splice::remove(range)])
}

fn item_ranges(list: SyntaxNode<'_>, kind: SyntaxKind) -> Vec<TextRange> {
    list.children_of_kind(kind).map(SyntaxNode::trimmed_range).collect()
}

/// Whether `item` is the only `kind` child of its parent.
pub(crate) fn is_sole_item(item: Node<'_>) -> Result<bool> {
    item.with_syntax(|syntax| {
        syntax.parent().is_some_and(|parent| parent.children_of_kind(syntax.kind()).count() == 1)
    })
}

/// The source text of the keyword `kind`, as in `readonly` for `READONLY_KW`.
pub(crate) fn keyword_text(kind: SyntaxKind) -> String {
    format!("{kind:?}").trim_end_matches("_KW").to_ascii_lowercase()
}

/// The only item of a one-item insertion.
pub(crate) fn single<T>(items: Vec<T>) -> Result<T> {
    items.into_iter().next().ok_or_else(|| Error::InvariantViolation {
        message: "the inserted node was not found after reparsing".to_owned(),
    })
}

pub(crate) fn cast_all<'p, N: AstNode<'p>>(nodes: Vec<Node<'p>>) -> Result<Vec<N>> {
    nodes
        .into_iter()
        .map(|node| {
            N::cast(node).ok_or_else(|| Error::InvariantViolation {
                message: format!("the inserted text parsed as {:?}", node.kind()),
            })
        })
        .collect()
}

/// Prints `structures` and inserts them as items `index..` of `list`.
pub(crate) fn insert_printed<'p, S, N: AstNode<'p>>(
    container: Node<'p>,
    list: ItemList,
    index: usize,
    kind: SyntaxKind,
    structures: &[S],
    printer: impl StructurePrinter<S>,
) -> Result<Vec<N>> {
    let settings = container.project().manipulation_settings();
    let fragments =
        structures.iter().map(|structure| printer.print(settings, structure)).collect::<Vec<_>>();
    cast_all(container.insert_items(list, index, kind, &fragments, &[])?)
}
