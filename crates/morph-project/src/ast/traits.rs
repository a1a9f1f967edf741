//! Capabilities shared by several kinds of declarations.
//!
//! Every trait is implemented by the typed wrappers whose syntax has the
//! matching part, and every method has a default body working on
//! [`AstNode::syntax`].

use std::slice;

use morph_check::names;
use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxNode;
use text_size::{TextRange, TextSize};

use super::{
    AstNode, ClassDeclaration, CommentRange, EnumDeclaration, ExpressionWithTypeArguments,
    FunctionDeclaration, HeritageClause, ImportDeclaration, InterfaceDeclaration,
    NamespaceDeclaration, ParameterDeclaration, TypeAliasDeclaration, TypeParameterDeclaration,
    VariableDeclaration, VariableStatement, children_of, find_named, insert_comma_items,
    insert_printed, keyword_text, list_children, single,
};
use crate::comments::{ExtendedChild, attached_comments, is_js_doc};
use crate::error::{Error, OrNotFound as _, Result};
use crate::manipulation::{ItemList, Splice};
use crate::node::Node;
use crate::printers::{
    ClassPrinter, EnumPrinter, FunctionPrinter, ImportPrinter, InterfacePrinter, JsDocPrinter,
    ParameterPrinter, StructurePrinter as _, TypeParameterPrinter,
};
use crate::structures::{
    ClassStructure, EnumStructure, FunctionStructure, ImportStructure, InterfaceStructure,
    ParameterStructure, Scope, TypeParameterStructure,
};
use crate::text::{dedent_text, indent_text, statement_removal_range};
use crate::types::Type;
use crate::writer::CodeWriter;

pub trait NamedNode<'p>: AstNode<'p> {
    fn name_node(self) -> Result<Option<Node<'p>>> {
        let node = self.syntax();
        let token = node.with_syntax(|syntax| names::name_token(syntax).map(SyntaxNode::index))?;
        token.map(|index| node.wrap_index(index)).transpose()
    }

    /// The declared name; empty for anonymous declarations.
    fn name(self) -> Result<String> {
        self.syntax()
            .with_syntax(|syntax| names::declaration_name(syntax).unwrap_or_default().to_owned())
    }

    /// Replaces the name token. References to the old name are left alone.
    fn set_name(self, name: &str) -> Result<()> {
        let node = self.syntax();
        let range = node
            .with_syntax(|syntax| names::name_token(syntax).map(SyntaxNode::trimmed_range))?
            .or_not_found(|| format!("Expected to find the name of {:?}.", node.kind()))?;
        node.replace_range(range, name)
    }
}

/// The order modifiers are written in.
const MODIFIER_ORDER: [SyntaxKind; 11] = [
    EXPORT_KW,
    DEFAULT_KW,
    DECLARE_KW,
    PUBLIC_KW,
    PROTECTED_KW,
    PRIVATE_KW,
    STATIC_KW,
    ABSTRACT_KW,
    OVERRIDE_KW,
    READONLY_KW,
    ASYNC_KW,
];

fn modifier_rank(kind: SyntaxKind) -> usize {
    MODIFIER_ORDER.iter().position(|&modifier| modifier == kind).unwrap_or(MODIFIER_ORDER.len())
}

fn modifier_splice(syntax: SyntaxNode<'_>, kind: SyntaxKind, value: bool) -> Option<Splice> {
    let existing = names::modifiers(syntax).find(|token| token.kind() == kind);
    match (existing, value) {
        (Some(token), false) => {
            let range = token.trimmed_range();
            let end = token.next_sibling().map_or(range.end(), |next| next.trimmed_range().start());
            Some(Splice::remove(TextRange::new(range.start(), end)))
        }
        (None, true) => {
            let rank = modifier_rank(kind);
            let before = syntax.children().find(|child| {
                !child.kind().is_modifier() || modifier_rank(child.kind()) > rank
            })?;
            Some(Splice::insert(before.trimmed_range().start(), format!("{} ", keyword_text(kind))))
        }
        _ => None,
    }
}

pub trait ModifierableNode<'p>: AstNode<'p> {
    fn modifiers(self) -> Result<Vec<Node<'p>>> {
        let node = self.syntax();
        let tokens = node.with_syntax(|syntax| {
            names::modifiers(syntax).map(SyntaxNode::index).collect::<Vec<_>>()
        })?;
        tokens.into_iter().map(|index| node.wrap_index(index)).collect()
    }

    fn has_modifier(self, kind: SyntaxKind) -> Result<bool> {
        self.syntax().with_syntax(|syntax| names::has_modifier(syntax, kind))
    }

    /// Adds or removes the modifier `kind`, keeping modifiers in their
    /// conventional order.
    fn toggle_modifier(self, kind: SyntaxKind, value: bool) -> Result<()> {
        if !kind.is_modifier() {
            return Err(Error::invalid(format!("{kind:?} is not a modifier")));
        }
        let node = self.syntax();
        match node.with_syntax(|syntax| modifier_splice(syntax, kind, value))? {
            Some(splice) => node.edit(vec![splice]),
            None => Ok(()),
        }
    }

    fn is_exported(self) -> Result<bool> {
        self.has_modifier(EXPORT_KW)
    }

    /// Unexporting also drops `default`.
    fn set_is_exported(self, value: bool) -> Result<()> {
        if !value {
            self.toggle_modifier(DEFAULT_KW, false)?;
        }
        self.toggle_modifier(EXPORT_KW, value)
    }

    fn is_default_export(self) -> Result<bool> {
        Ok(self.has_modifier(EXPORT_KW)? && self.has_modifier(DEFAULT_KW)?)
    }

    fn set_is_default_export(self, value: bool) -> Result<()> {
        if value {
            self.toggle_modifier(EXPORT_KW, true)?;
        }
        self.toggle_modifier(DEFAULT_KW, value)
    }

    fn has_declare_keyword(self) -> Result<bool> {
        self.has_modifier(DECLARE_KW)
    }

    fn set_has_declare_keyword(self, value: bool) -> Result<()> {
        self.toggle_modifier(DECLARE_KW, value)
    }

    fn is_static(self) -> Result<bool> {
        self.has_modifier(STATIC_KW)
    }

    fn set_is_static(self, value: bool) -> Result<()> {
        self.toggle_modifier(STATIC_KW, value)
    }

    fn is_abstract(self) -> Result<bool> {
        self.has_modifier(ABSTRACT_KW)
    }

    fn set_is_abstract(self, value: bool) -> Result<()> {
        self.toggle_modifier(ABSTRACT_KW, value)
    }

    fn is_readonly(self) -> Result<bool> {
        self.has_modifier(READONLY_KW)
    }

    fn set_is_readonly(self, value: bool) -> Result<()> {
        self.toggle_modifier(READONLY_KW, value)
    }

    fn is_async(self) -> Result<bool> {
        self.has_modifier(ASYNC_KW)
    }

    fn set_is_async(self, value: bool) -> Result<()> {
        self.toggle_modifier(ASYNC_KW, value)
    }

    /// The written scope keyword. Members without one are public.
    fn scope(self) -> Result<Option<Scope>> {
        self.syntax().with_syntax(|syntax| {
            names::modifiers(syntax).find_map(|token| Scope::from_kind(token.kind()))
        })
    }

    /// Replaces the scope keyword; `None` removes it.
    fn set_scope(self, scope: Option<Scope>) -> Result<()> {
        for kind in [PUBLIC_KW, PROTECTED_KW, PRIVATE_KW] {
            if scope.map(Scope::kind) != Some(kind) {
                self.toggle_modifier(kind, false)?;
            }
        }
        match scope {
            Some(scope) => self.toggle_modifier(scope.kind(), true),
            None => Ok(()),
        }
    }
}

pub trait JsDocableNode<'p>: AstNode<'p> {
    /// The `/** */` comments directly in front of the declaration.
    fn js_docs(self) -> Result<Vec<CommentRange<'p>>> {
        let node = self.syntax();
        let docs = node.with_syntax(|syntax| {
            let text = syntax.tree().text();
            attached_comments(syntax)
                .into_iter()
                .filter(|&(_, range)| is_js_doc(&text[range]))
                .collect::<Vec<_>>()
        })?;
        docs.into_iter()
            .map(|(kind, range)| {
                node.wrap_child(ExtendedChild::Comment { kind, range, full_range: range })
                    .map(CommentRange)
            })
            .collect()
    }

    /// Adds a JSDoc right in front of the declaration, after existing ones.
    fn add_js_doc(self, description: &str) -> Result<CommentRange<'p>> {
        let node = self.syntax();
        let settings = node.project().manipulation_settings();
        let newline = settings.new_line.as_str();
        let indentation = node.indentation_text()?;

        let docs = [description.to_owned()];
        let doc = JsDocPrinter.print(settings, &docs[..]);
        let text = format!("{}{newline}{indentation}", indent_text(&doc, &indentation, newline));
        node.edit(vec![Splice::insert(node.start()?, text)])?;

        self.js_docs()?.pop().or_not_found(|| "Expected to find the added JSDoc.".to_owned())
    }

    fn remove_js_docs(self) -> Result<()> {
        let node = self.syntax();
        let Some(first) = self.js_docs()?.first().copied() else { return Ok(()) };
        let range = TextRange::new(first.syntax().start()?, node.start()?);
        node.edit(vec![Splice::remove(range)])
    }
}

pub trait TypeParameteredNode<'p>: AstNode<'p> {
    fn type_parameters(self) -> Result<Vec<TypeParameterDeclaration<'p>>> {
        list_children(self.syntax(), TYPE_PARAMETER_LIST)
    }

    fn type_parameter(self, name: &str) -> Result<Option<TypeParameterDeclaration<'p>>> {
        find_named(self.type_parameters()?, name)
    }

    fn type_parameter_or_err(self, name: &str) -> Result<TypeParameterDeclaration<'p>> {
        self.type_parameter(name)
            .or_not_found(|| format!("Expected to find type parameter named '{name}'."))
    }

    /// Inserts type parameters, creating the `<...>` list after the name
    /// when there is none.
    fn insert_type_parameters(
        self,
        index: usize,
        structures: &[TypeParameterStructure],
    ) -> Result<Vec<TypeParameterDeclaration<'p>>> {
        let node = self.syntax();
        let settings = node.project().manipulation_settings();
        let texts = structures
            .iter()
            .map(|structure| TypeParameterPrinter.print(settings, structure))
            .collect::<Vec<_>>();

        if let Some(list) = node.first_child_by_kind(TYPE_PARAMETER_LIST)? {
            return insert_comma_items(list, LESS_THAN, TYPE_PARAMETER, index, &texts);
        }
        if index > 0 {
            return Err(Error::IndexOutOfRange { index, len: 0 });
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let offset = node
            .with_syntax(|syntax| names::name_token(syntax).map(|name| name.trimmed_range().end()))?
            .or_not_found(|| format!("Expected to find the name of {:?}.", node.kind()))?;
        node.edit(vec![Splice::insert(offset, format!("<{}>", texts.join(", ")))])?;
        self.type_parameters()
    }

    fn add_type_parameter(
        self,
        structure: &TypeParameterStructure,
    ) -> Result<TypeParameterDeclaration<'p>> {
        let index = self.type_parameters()?.len();
        single(self.insert_type_parameters(index, slice::from_ref(structure))?)
    }
}

pub trait ParameteredNode<'p>: AstNode<'p> {
    fn parameters(self) -> Result<Vec<ParameterDeclaration<'p>>> {
        list_children(self.syntax(), PARAMETER_LIST)
    }

    fn parameter(self, name: &str) -> Result<Option<ParameterDeclaration<'p>>> {
        find_named(self.parameters()?, name)
    }

    fn parameter_or_err(self, name: &str) -> Result<ParameterDeclaration<'p>> {
        self.parameter(name)
            .or_not_found(|| format!("Expected to find parameter named '{name}'."))
    }

    fn insert_parameters(
        self,
        index: usize,
        structures: &[ParameterStructure],
    ) -> Result<Vec<ParameterDeclaration<'p>>> {
        let node = self.syntax();
        let settings = node.project().manipulation_settings();
        let texts = structures
            .iter()
            .map(|structure| ParameterPrinter.print(settings, structure))
            .collect::<Vec<_>>();
        let list = node.first_child_by_kind_or_err(PARAMETER_LIST)?;
        insert_comma_items(list, OPEN_PAREN, PARAMETER, index, &texts)
    }

    fn add_parameter(self, structure: &ParameterStructure) -> Result<ParameterDeclaration<'p>> {
        let index = self.parameters()?.len();
        single(self.insert_parameters(index, slice::from_ref(structure))?)
    }
}

/// End of the name of a binding, after its `?` or `!`.
fn binding_name_end(syntax: SyntaxNode<'_>) -> Option<TextSize> {
    let name = names::name_token(syntax)?;
    let mut end = name.trimmed_range().end();
    let mut next = name.next_sibling();
    while let Some(token) = next.filter(|token| matches!(token.kind(), QUESTION | EXCLAMATION)) {
        end = token.trimmed_range().end();
        next = token.next_sibling();
    }
    Some(end)
}

fn type_child(syntax: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    syntax.children().find(|child| child.kind().is_type())
}

fn wrap_type_child(node: Node<'_>) -> Result<Option<Node<'_>>> {
    let index = node.with_syntax(|syntax| type_child(syntax).map(SyntaxNode::index))?;
    index.map(|index| node.wrap_index(index)).transpose()
}

/// From the end of the token before `token` to the end of `last`.
fn clause_range(syntax: SyntaxNode<'_>, token: SyntaxKind, last: SyntaxNode<'_>) -> Option<TextRange> {
    let token = syntax.child(token)?;
    let start = token
        .prev_sibling()
        .map_or(token.trimmed_range().start(), |previous| previous.trimmed_range().end());
    Some(TextRange::new(start, last.trimmed_range().end()))
}

pub trait TypedNode<'p>: AstNode<'p> {
    fn type_node(self) -> Result<Option<Node<'p>>> {
        wrap_type_child(self.syntax())
    }

    fn type_text(self) -> Result<Option<String>> {
        self.type_node()?.map(Node::text).transpose()
    }

    fn set_type(self, text: &str) -> Result<()> {
        let node = self.syntax();
        if let Some(type_node) = self.type_node()? {
            return node.replace_range(type_node.range()?, text);
        }
        let offset = node
            .with_syntax(binding_name_end)?
            .or_not_found(|| format!("Expected to find the name of {:?}.", node.kind()))?;
        node.edit(vec![Splice::insert(offset, format!(": {text}"))])
    }

    fn remove_type(self) -> Result<()> {
        let node = self.syntax();
        if node.kind() == TYPE_ALIAS_DECLARATION {
            return Err(Error::invalid("the type of a type alias can not be removed"));
        }
        let range = node.with_syntax(|syntax| clause_range(syntax, COLON, type_child(syntax)?))?;
        match range {
            Some(range) => node.edit(vec![Splice::remove(range)]),
            None => Ok(()),
        }
    }
}

pub trait InitializerExpressionableNode<'p>: AstNode<'p> {
    fn initializer(self) -> Result<Option<Node<'p>>> {
        self.syntax().first_child_by_kind(EXPRESSION)
    }

    fn initializer_text(self) -> Result<Option<String>> {
        self.initializer()?.map(Node::text).transpose()
    }

    fn set_initializer(self, text: &str) -> Result<()> {
        let node = self.syntax();
        if let Some(initializer) = self.initializer()? {
            return node.replace_range(initializer.range()?, text);
        }
        let offset = node
            .with_syntax(|syntax| match type_child(syntax) {
                Some(annotation) => Some(annotation.trimmed_range().end()),
                None => binding_name_end(syntax),
            })?
            .or_not_found(|| format!("Expected to find the name of {:?}.", node.kind()))?;
        node.edit(vec![Splice::insert(offset, format!(" = {text}"))])
    }

    fn remove_initializer(self) -> Result<()> {
        let node = self.syntax();
        let range =
            node.with_syntax(|syntax| clause_range(syntax, EQUALS, syntax.child(EXPRESSION)?))?;
        match range {
            Some(range) => node.edit(vec![Splice::remove(range)]),
            None => Ok(()),
        }
    }
}

pub trait ReturnTypedNode<'p>: AstNode<'p> {
    fn return_type_node(self) -> Result<Option<Node<'p>>> {
        wrap_type_child(self.syntax())
    }

    /// The written return type, or what the checker makes of the
    /// declaration when there is none.
    fn return_type(self) -> Result<Type<'p>> {
        let node = self.syntax();
        match node.signature()? {
            Some(signature) => signature.return_type(),
            None => node.type_of(),
        }
    }

    fn set_return_type(self, text: &str) -> Result<()> {
        let node = self.syntax();
        if let Some(type_node) = self.return_type_node()? {
            return node.replace_range(type_node.range()?, text);
        }
        let parameters = node.first_child_by_kind_or_err(PARAMETER_LIST)?;
        node.edit(vec![Splice::insert(parameters.end()?, format!(": {text}"))])
    }

    fn remove_return_type(self) -> Result<()> {
        let node = self.syntax();
        let range = node.with_syntax(|syntax| {
            let parameters = syntax.child(PARAMETER_LIST)?;
            let annotation = type_child(syntax)?;
            Some(TextRange::new(parameters.trimmed_range().end(), annotation.trimmed_range().end()))
        })?;
        match range {
            Some(range) => node.edit(vec![Splice::remove(range)]),
            None => Ok(()),
        }
    }
}

pub trait BodiedNode<'p>: AstNode<'p> {
    fn body(self) -> Result<Option<Node<'p>>> {
        self.syntax().first_child_by_kind(BLOCK)
    }

    fn has_body(self) -> Result<bool> {
        Ok(self.body()?.is_some())
    }

    /// The text between the braces, without the body's indentation.
    fn body_text(self) -> Result<Option<String>> {
        let Some(body) = self.body()? else { return Ok(None) };
        let indentation = body.child_indentation_text()?;
        let inner = body.with_syntax(|block| {
            let open = block.child(OPEN_BRACE)?.trimmed_range().end();
            let close = block.child(CLOSE_BRACE)?.trimmed_range().start();
            Some(block.tree().text()[TextRange::new(open, close)].to_owned())
        })?;
        Ok(inner.map(|inner| dedent_text(&inner, &indentation)))
    }

    /// Replaces the body, or gives a body to a declaration ending in `;`.
    fn set_body_text(self, text: &str) -> Result<()> {
        let node = self.syntax();
        let settings = node.project().manipulation_settings();
        let newline = settings.new_line.as_str();
        let indentation = node.indentation_text()?;
        let child_indentation = node.child_indentation_text()?;

        let text = text.trim();
        let block = if text.is_empty() {
            format!("{{{newline}{indentation}}}")
        } else {
            let body = indent_text(text, &child_indentation, newline);
            format!("{{{newline}{child_indentation}{body}{newline}{indentation}}}")
        };

        let splice = node.with_syntax(|syntax| {
            if let Some(body) = syntax.child(BLOCK) {
                return Splice::replace(body.trimmed_range(), block);
            }
            match syntax.last_child().filter(|last| last.kind() == SEMICOLON) {
                Some(semicolon) => Splice::replace(semicolon.trimmed_range(), format!(" {block}")),
                None => Splice::insert(syntax.trimmed_range().end(), format!(" {block}")),
            }
        })?;
        node.edit(vec![splice])
    }
}

pub trait HeritageClauseableNode<'p>: AstNode<'p> {
    fn heritage_clauses(self) -> Result<Vec<HeritageClause<'p>>> {
        children_of(self.syntax())
    }

    /// The `extends` or `implements` clause.
    fn heritage_clause_by_kind(self, token: SyntaxKind) -> Result<Option<HeritageClause<'p>>> {
        for clause in self.heritage_clauses()? {
            if clause.token_kind()? == token {
                return Ok(Some(clause));
            }
        }
        Ok(None)
    }

    fn heritage_clause_by_kind_or_err(self, token: SyntaxKind) -> Result<HeritageClause<'p>> {
        self.heritage_clause_by_kind(token).or_not_found(|| {
            format!("Expected to find a heritage clause of kind {}.", keyword_text(token))
        })
    }
}

/// Where a new `token` clause goes: after the name and type parameters,
/// and for `implements` after the `extends` clause.
fn heritage_anchor(syntax: SyntaxNode<'_>, token: SyntaxKind) -> Option<TextSize> {
    let mut anchor = None;
    for child in syntax.children() {
        match child.kind() {
            OPEN_BRACE => break,
            CLASS_KW | INTERFACE_KW | IDENTIFIER | TYPE_PARAMETER_LIST => {
                anchor = Some(child.trimmed_range().end());
            }
            HERITAGE_CLAUSE if token == IMPLEMENTS_KW => anchor = Some(child.trimmed_range().end()),
            _ => {}
        }
    }
    anchor
}

/// Inserts `texts` into the `token` clause of `node`, creating the clause
/// when there is none.
pub(crate) fn insert_heritage_types<'p>(
    node: Node<'p>,
    token: SyntaxKind,
    index: usize,
    texts: &[String],
) -> Result<Vec<ExpressionWithTypeArguments<'p>>> {
    let clauses = children_of::<HeritageClause<'p>>(node)?;
    for clause in clauses {
        if clause.token_kind()? == token {
            return insert_comma_items(
                clause.syntax(),
                token,
                EXPRESSION_WITH_TYPE_ARGUMENTS,
                index,
                texts,
            );
        }
    }

    if index > 0 {
        return Err(Error::IndexOutOfRange { index, len: 0 });
    }
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let offset = node
        .with_syntax(|syntax| heritage_anchor(syntax, token))?
        .or_not_found(|| format!("Expected to find the name of {:?}.", node.kind()))?;
    let text = format!(" {} {}", keyword_text(token), texts.join(", "));
    node.edit(vec![Splice::insert(offset, text)])?;

    for clause in children_of::<HeritageClause<'p>>(node)? {
        if clause.token_kind()? == token {
            return clause.types();
        }
    }
    Err(Error::InvariantViolation {
        message: format!("the inserted {} clause was not found", keyword_text(token)),
    })
}

pub trait ImplementsClauseableNode<'p>: HeritageClauseableNode<'p> {
    fn implements(self) -> Result<Vec<ExpressionWithTypeArguments<'p>>> {
        match self.heritage_clause_by_kind(IMPLEMENTS_KW)? {
            Some(clause) => clause.types(),
            None => Ok(Vec::new()),
        }
    }

    fn insert_implements(
        self,
        index: usize,
        texts: &[String],
    ) -> Result<Vec<ExpressionWithTypeArguments<'p>>> {
        insert_heritage_types(self.syntax(), IMPLEMENTS_KW, index, texts)
    }

    fn add_implements(self, text: &str) -> Result<ExpressionWithTypeArguments<'p>> {
        let index = self.implements()?.len();
        single(self.insert_implements(index, &[text.to_owned()])?)
    }

    /// Removes the `index`th implemented type, and the clause with the last one.
    fn remove_implements(self, index: usize) -> Result<()> {
        let implements = self.implements()?;
        let expression = implements
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange { index, len: implements.len() })?;
        expression.remove()
    }
}

macro_rules! statement_queries {
    ($($all:ident, $one:ident, $one_or_err:ident: $ty:ident, $what:literal;)*) => {$(
        fn $all(self) -> Result<Vec<$ty<'p>>> {
            Ok(self.statements()?.into_iter().filter_map($ty::cast).collect())
        }

        fn $one(self, name: &str) -> Result<Option<$ty<'p>>> {
            find_named(self.$all()?, name)
        }

        fn $one_or_err(self, name: &str) -> Result<$ty<'p>> {
            self.$one(name)
                .or_not_found(|| format!("Expected to find {} named '{name}'.", $what))
        }
    )*};
}

pub trait StatementedNode<'p>: AstNode<'p> {
    /// The node whose children are the statements: the file itself or a
    /// body block.
    fn statements_container(self) -> Result<Node<'p>>;

    /// Statements with the comments standing between them.
    fn statements_with_comments(self) -> Result<Vec<Node<'p>>> {
        self.statements_container()?.list_items(ItemList::Statements)
    }

    fn statements(self) -> Result<Vec<Node<'p>>> {
        let items = self.statements_with_comments()?;
        Ok(items.into_iter().filter(|item| !item.is_comment()).collect())
    }

    /// Inserts `text` at `index` of the statements with comments and
    /// returns what it parsed to.
    fn insert_statements(self, index: usize, text: &str) -> Result<Vec<Node<'p>>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let container = self.statements_container()?;
        let before = container.list_items(ItemList::Statements)?.len();
        container.insert_items(
            ItemList::Statements,
            index,
            EXPRESSION_STATEMENT,
            &[text.trim().to_owned()],
            &[],
        )?;
        let items = container.list_items(ItemList::Statements)?;
        let inserted = items.len().saturating_sub(before);
        Ok(items[index..index + inserted].to_vec())
    }

    fn add_statements(self, text: &str) -> Result<Vec<Node<'p>>> {
        let index = self.statements_with_comments()?.len();
        self.insert_statements(index, text)
    }

    statement_queries! {
        classes, class, class_or_err: ClassDeclaration, "class";
        interfaces, interface, interface_or_err: InterfaceDeclaration, "interface";
        functions, function, function_or_err: FunctionDeclaration, "function";
        enums, enum_, enum_or_err: EnumDeclaration, "enum";
        namespaces, namespace, namespace_or_err: NamespaceDeclaration, "namespace";
        type_aliases, type_alias, type_alias_or_err: TypeAliasDeclaration, "type alias";
    }

    fn variable_statements(self) -> Result<Vec<VariableStatement<'p>>> {
        Ok(self.statements()?.into_iter().filter_map(VariableStatement::cast).collect())
    }

    fn variable_declaration(self, name: &str) -> Result<Option<VariableDeclaration<'p>>> {
        for statement in self.variable_statements()? {
            if let Some(declaration) = find_named(statement.declarations()?, name)? {
                return Ok(Some(declaration));
            }
        }
        Ok(None)
    }

    fn variable_declaration_or_err(self, name: &str) -> Result<VariableDeclaration<'p>> {
        self.variable_declaration(name)
            .or_not_found(|| format!("Expected to find variable declaration named '{name}'."))
    }

    fn import_declarations(self) -> Result<Vec<ImportDeclaration<'p>>> {
        Ok(self.statements()?.into_iter().filter_map(ImportDeclaration::cast).collect())
    }

    /// The import of `module_specifier`, written without quotes.
    fn import_declaration(self, module_specifier: &str) -> Result<Option<ImportDeclaration<'p>>> {
        for import in self.import_declarations()? {
            if import.module_specifier_value()? == module_specifier {
                return Ok(Some(import));
            }
        }
        Ok(None)
    }

    fn import_declaration_or_err(self, module_specifier: &str) -> Result<ImportDeclaration<'p>> {
        self.import_declaration(module_specifier).or_not_found(|| {
            format!("Expected to find import declaration with module specifier '{module_specifier}'.")
        })
    }

    fn insert_classes(
        self,
        index: usize,
        structures: &[ClassStructure],
    ) -> Result<Vec<ClassDeclaration<'p>>> {
        let container = self.statements_container()?;
        insert_printed(
            container,
            ItemList::Statements,
            index,
            CLASS_DECLARATION,
            structures,
            ClassPrinter,
        )
    }

    fn add_class(self, structure: &ClassStructure) -> Result<ClassDeclaration<'p>> {
        let index = self.statements_with_comments()?.len();
        single(self.insert_classes(index, slice::from_ref(structure))?)
    }

    fn insert_interfaces(
        self,
        index: usize,
        structures: &[InterfaceStructure],
    ) -> Result<Vec<InterfaceDeclaration<'p>>> {
        let container = self.statements_container()?;
        insert_printed(
            container,
            ItemList::Statements,
            index,
            INTERFACE_DECLARATION,
            structures,
            InterfacePrinter,
        )
    }

    fn add_interface(self, structure: &InterfaceStructure) -> Result<InterfaceDeclaration<'p>> {
        let index = self.statements_with_comments()?.len();
        single(self.insert_interfaces(index, slice::from_ref(structure))?)
    }

    fn insert_functions(
        self,
        index: usize,
        structures: &[FunctionStructure],
    ) -> Result<Vec<FunctionDeclaration<'p>>> {
        let container = self.statements_container()?;
        let printer = FunctionPrinter { is_ambient: container.is_ambient()? };
        insert_printed(
            container,
            ItemList::Statements,
            index,
            FUNCTION_DECLARATION,
            structures,
            printer,
        )
    }

    fn add_function(self, structure: &FunctionStructure) -> Result<FunctionDeclaration<'p>> {
        let index = self.statements_with_comments()?.len();
        single(self.insert_functions(index, slice::from_ref(structure))?)
    }

    fn insert_enums(
        self,
        index: usize,
        structures: &[EnumStructure],
    ) -> Result<Vec<EnumDeclaration<'p>>> {
        let container = self.statements_container()?;
        insert_printed(
            container,
            ItemList::Statements,
            index,
            ENUM_DECLARATION,
            structures,
            EnumPrinter,
        )
    }

    fn add_enum(self, structure: &EnumStructure) -> Result<EnumDeclaration<'p>> {
        let index = self.statements_with_comments()?.len();
        single(self.insert_enums(index, slice::from_ref(structure))?)
    }

    /// Inserts an empty `namespace name {}`.
    fn insert_namespace(self, index: usize, name: &str) -> Result<NamespaceDeclaration<'p>> {
        let container = self.statements_container()?;
        let mut writer = CodeWriter::new(container.project().manipulation_settings());
        writer.write("namespace ").write(name).block(|_| {});
        let fragments = [writer.into_text()];
        let nodes = container.insert_items(
            ItemList::Statements,
            index,
            MODULE_DECLARATION,
            &fragments,
            &[],
        )?;
        single(super::cast_all(nodes)?)
    }

    fn add_namespace(self, name: &str) -> Result<NamespaceDeclaration<'p>> {
        let index = self.statements_with_comments()?.len();
        self.insert_namespace(index, name)
    }

    fn insert_import_declarations(
        self,
        index: usize,
        structures: &[ImportStructure],
    ) -> Result<Vec<ImportDeclaration<'p>>> {
        let container = self.statements_container()?;
        insert_printed(
            container,
            ItemList::Statements,
            index,
            IMPORT_DECLARATION,
            structures,
            ImportPrinter,
        )
    }

    /// Adds imports after the last existing one, or at the top.
    fn add_import_declarations(
        self,
        structures: &[ImportStructure],
    ) -> Result<Vec<ImportDeclaration<'p>>> {
        let items = self.statements_with_comments()?;
        let index = items
            .iter()
            .rposition(|item| item.kind() == IMPORT_DECLARATION)
            .map_or(0, |last| last + 1);
        self.insert_import_declarations(index, structures)
    }

    fn add_import_declaration(self, structure: &ImportStructure) -> Result<ImportDeclaration<'p>> {
        single(self.add_import_declarations(slice::from_ref(structure))?)
    }
}

pub trait RemovableNode<'p>: AstNode<'p> {
    /// Removes the node with its attached comments and the line it stood on.
    fn remove(self) -> Result<()> {
        let node = self.syntax();
        let range = node.with_syntax(|syntax| {
            let range = syntax.trimmed_range();
            let start = attached_comments(syntax)
                .first()
                .map_or(range.start(), |&(_, comment)| comment.start());
            statement_removal_range(syntax.tree().text(), TextRange::new(start, range.end()))
        })?;
        node.edit(vec![Splice::remove(range)])
    }
}
