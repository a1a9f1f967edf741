use std::slice;

use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxNode;

use super::{
    AstNode, BodiedNode, InitializerExpressionableNode, JsDocableNode, ModifierableNode,
    NamedNode, ParameteredNode, RemovableNode, ReturnTypedNode, StatementedNode,
    TypeParameteredNode, TypedNode, children_of, find_named, insert_printed, is_sole_item,
    remove_comma_item, single,
};
use crate::error::{Error, OrNotFound as _, Result};
use crate::manipulation::ItemList;
use crate::node::Node;
use crate::printers::EnumMemberPrinter;
use crate::structures::EnumMemberStructure;

ast_node! {
    FunctionDeclaration => FUNCTION_DECLARATION;
    /// `namespace A.B {}` or `module "m" {}`; the outermost declaration of a
    /// dotted name.
    NamespaceDeclaration => MODULE_DECLARATION;
    EnumDeclaration => ENUM_DECLARATION;
    EnumMember => ENUM_MEMBER;
    TypeAliasDeclaration => TYPE_ALIAS_DECLARATION;
    VariableStatement => VARIABLE_STATEMENT;
    VariableDeclaration => VARIABLE_DECLARATION;
}

impl<'p> NamedNode<'p> for FunctionDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for FunctionDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for FunctionDeclaration<'p> {}
impl<'p> TypeParameteredNode<'p> for FunctionDeclaration<'p> {}
impl<'p> ParameteredNode<'p> for FunctionDeclaration<'p> {}
impl<'p> ReturnTypedNode<'p> for FunctionDeclaration<'p> {}
impl<'p> BodiedNode<'p> for FunctionDeclaration<'p> {}
impl<'p> RemovableNode<'p> for FunctionDeclaration<'p> {}

impl<'p> StatementedNode<'p> for FunctionDeclaration<'p> {
    fn statements_container(self) -> Result<Node<'p>> {
        self.body()?.or_not_found(|| {
            format!("Expected to find the body of function {}.", self.name().unwrap_or_default())
        })
    }
}

impl<'p> NamedNode<'p> for NamespaceDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for NamespaceDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for NamespaceDeclaration<'p> {}
impl<'p> RemovableNode<'p> for NamespaceDeclaration<'p> {}

/// The body of the innermost declaration of a dotted name.
fn module_block(syntax: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    let mut declaration = syntax;
    loop {
        if let Some(block) = declaration.child(MODULE_BLOCK) {
            return Some(block);
        }
        declaration = declaration.child(MODULE_DECLARATION)?;
    }
}

impl<'p> StatementedNode<'p> for NamespaceDeclaration<'p> {
    fn statements_container(self) -> Result<Node<'p>> {
        let block = self.0.with_syntax(|syntax| module_block(syntax).map(SyntaxNode::index))?;
        block.map(|index| self.0.wrap_index(index)).transpose().or_not_found(|| {
            format!("Expected to find the body of namespace {}.", self.name().unwrap_or_default())
        })
    }
}

impl NamespaceDeclaration<'_> {
    /// The dotted name, as in `A.B` for `namespace A.B {}`.
    pub fn full_name(self) -> Result<String> {
        self.0.with_syntax(|syntax| {
            let mut parts = Vec::new();
            let mut declaration = Some(syntax);
            while let Some(current) = declaration {
                if let Some(name) = morph_check::names::declaration_name(current) {
                    parts.push(name.to_owned());
                }
                declaration = current.child(MODULE_DECLARATION);
            }
            parts.join(".")
        })
    }

    /// Whether it is written with `namespace` rather than `module`.
    pub fn has_namespace_keyword(self) -> Result<bool> {
        self.0.with_syntax(|syntax| syntax.child(NAMESPACE_KW).is_some())
    }
}

impl<'p> NamedNode<'p> for EnumDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for EnumDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for EnumDeclaration<'p> {}
impl<'p> RemovableNode<'p> for EnumDeclaration<'p> {}

impl<'p> EnumDeclaration<'p> {
    pub fn members(self) -> Result<Vec<EnumMember<'p>>> {
        children_of(self.0)
    }

    pub fn member(self, name: &str) -> Result<Option<EnumMember<'p>>> {
        find_named(self.members()?, name)
    }

    pub fn member_or_err(self, name: &str) -> Result<EnumMember<'p>> {
        self.member(name).or_not_found(|| format!("Expected to find enum member named '{name}'."))
    }

    /// Inserts members at `index`, one per line with commas between them.
    pub fn insert_members(
        self,
        index: usize,
        structures: &[EnumMemberStructure],
    ) -> Result<Vec<EnumMember<'p>>> {
        insert_printed(self.0, ItemList::EnumMembers, index, ENUM_MEMBER, structures, EnumMemberPrinter)
    }

    pub fn add_member(self, structure: &EnumMemberStructure) -> Result<EnumMember<'p>> {
        let index = self.members()?.len();
        single(self.insert_members(index, slice::from_ref(structure))?)
    }

    pub fn is_const_enum(self) -> Result<bool> {
        self.0.with_syntax(|syntax| syntax.child(CONST_KW).is_some())
    }
}

impl<'p> NamedNode<'p> for EnumMember<'p> {}
impl<'p> JsDocableNode<'p> for EnumMember<'p> {}
impl<'p> InitializerExpressionableNode<'p> for EnumMember<'p> {}

impl<'p> RemovableNode<'p> for EnumMember<'p> {
    /// Removes the member and one of the commas next to it.
    fn remove(self) -> Result<()> {
        remove_comma_item(self.0)
    }
}

impl<'p> NamedNode<'p> for TypeAliasDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for TypeAliasDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for TypeAliasDeclaration<'p> {}
impl<'p> TypeParameteredNode<'p> for TypeAliasDeclaration<'p> {}
impl<'p> TypedNode<'p> for TypeAliasDeclaration<'p> {}
impl<'p> RemovableNode<'p> for TypeAliasDeclaration<'p> {}

/// The keyword starting a variable statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableDeclarationKind {
    Var,
    Let,
    Const,
}

impl VariableDeclarationKind {
    fn from_kind(kind: SyntaxKind) -> Option<Self> {
        match kind {
            VAR_KW => Some(Self::Var),
            LET_KW => Some(Self::Let),
            CONST_KW => Some(Self::Const),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

impl<'p> ModifierableNode<'p> for VariableStatement<'p> {}
impl<'p> JsDocableNode<'p> for VariableStatement<'p> {}
impl<'p> RemovableNode<'p> for VariableStatement<'p> {}

impl<'p> VariableStatement<'p> {
    pub fn declarations(self) -> Result<Vec<VariableDeclaration<'p>>> {
        children_of(self.0)
    }

    pub fn declaration_kind(self) -> Result<VariableDeclarationKind> {
        let kind = self.0.with_syntax(|syntax| {
            syntax.children().find_map(|child| VariableDeclarationKind::from_kind(child.kind()))
        })?;
        kind.ok_or_else(|| Error::InvariantViolation {
            message: "variable statement without `var`, `let` or `const`".to_owned(),
        })
    }

    pub fn set_declaration_kind(self, kind: VariableDeclarationKind) -> Result<()> {
        let keyword = self.0.with_syntax(|syntax| {
            syntax
                .children()
                .find(|child| VariableDeclarationKind::from_kind(child.kind()).is_some())
                .map(|keyword| keyword.trimmed_range())
        })?;
        let range = keyword.or_not_found(|| "Expected to find the declaration keyword.".to_owned())?;
        self.0.replace_range(range, kind.as_str())
    }
}

impl<'p> NamedNode<'p> for VariableDeclaration<'p> {}
impl<'p> TypedNode<'p> for VariableDeclaration<'p> {}
impl<'p> InitializerExpressionableNode<'p> for VariableDeclaration<'p> {}

impl<'p> VariableDeclaration<'p> {
    pub fn variable_statement(self) -> Result<Option<VariableStatement<'p>>> {
        Ok(self.0.parent()?.and_then(VariableStatement::cast))
    }
}

impl<'p> RemovableNode<'p> for VariableDeclaration<'p> {
    /// A sole declaration takes its statement with it.
    fn remove(self) -> Result<()> {
        if is_sole_item(self.0)? {
            if let Some(statement) = self.variable_statement()? {
                return statement.remove();
            }
        }
        remove_comma_item(self.0)
    }
}
