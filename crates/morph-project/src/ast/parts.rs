use morph_check::names;
use morph_syntax::SyntaxKind::{self, *};
use morph_syntax::SyntaxNode;
use text_size::TextRange;

use super::{
    AstNode, InitializerExpressionableNode, ModifierableNode, NamedNode, RemovableNode, TypedNode,
    children_of, is_sole_item, remove_comma_item,
};
use crate::comments::is_js_doc;
use crate::error::{Error, Result};
use crate::manipulation::Splice;
use crate::node::Node;
use crate::text::statement_removal_range;

ast_node! {
    /// `extends A, B` or `implements C`.
    HeritageClause => HERITAGE_CLAUSE;
    ExpressionWithTypeArguments => EXPRESSION_WITH_TYPE_ARGUMENTS;
    TypeParameterDeclaration => TYPE_PARAMETER;
    ParameterDeclaration => PARAMETER;
    /// A comment standing between statements or members, or a JSDoc.
    CommentRange => SINGLE_LINE_COMMENT | MULTI_LINE_COMMENT;
}

/// From the end of whatever precedes `syntax` to its own end.
fn with_leading_gap(syntax: SyntaxNode<'_>) -> TextRange {
    let range = syntax.trimmed_range();
    let start = syntax.prev_sibling().map_or(range.start(), |previous| previous.trimmed_range().end());
    TextRange::new(start, range.end())
}

impl<'p> HeritageClause<'p> {
    /// `EXTENDS_KW` or `IMPLEMENTS_KW`.
    pub fn token_kind(self) -> Result<SyntaxKind> {
        let kind = self.0.with_syntax(|syntax| syntax.first_child().map(|token| token.kind()))?;
        kind.ok_or_else(|| Error::InvariantViolation {
            message: "heritage clause without a keyword".to_owned(),
        })
    }

    pub fn types(self) -> Result<Vec<ExpressionWithTypeArguments<'p>>> {
        children_of(self.0)
    }

    /// Removes the `index`th type; removing the last one removes the clause.
    pub fn remove_expression(self, index: usize) -> Result<()> {
        let types = self.types()?;
        let expression =
            types.get(index).ok_or(Error::IndexOutOfRange { index, len: types.len() })?;
        if types.len() > 1 {
            return remove_comma_item(expression.0);
        }
        let range = self.0.with_syntax(with_leading_gap)?;
        self.0.edit(vec![Splice::remove(range)])
    }
}

impl<'p> ExpressionWithTypeArguments<'p> {
    /// The expression without its type arguments, as `Base` in `Base<T>`.
    pub fn expression_text(self) -> Result<String> {
        self.0.with_syntax(|syntax| {
            let end = syntax
                .child(TYPE_ARGUMENT_LIST)
                .map_or(syntax.trimmed_range().end(), |list| list.trimmed_range().start());
            let range = TextRange::new(syntax.trimmed_range().start(), end);
            syntax.tree().text()[range].trim_end().to_owned()
        })
    }

    pub fn type_arguments(self) -> Result<Vec<Node<'p>>> {
        let Some(list) = self.0.first_child_by_kind(TYPE_ARGUMENT_LIST)? else {
            return Ok(Vec::new());
        };
        let types = list.children()?;
        Ok(types.into_iter().filter(|child| child.kind().is_type()).collect())
    }

    pub fn heritage_clause(self) -> Result<Option<HeritageClause<'p>>> {
        Ok(self.0.parent()?.and_then(HeritageClause::cast))
    }
}

impl<'p> RemovableNode<'p> for ExpressionWithTypeArguments<'p> {
    fn remove(self) -> Result<()> {
        let clause = self
            .heritage_clause()?
            .ok_or_else(|| Error::invalid("the expression is not part of a heritage clause"))?;
        let index = clause.types()?.iter().position(|&other| other == self).unwrap_or_default();
        clause.remove_expression(index)
    }
}

impl<'p> NamedNode<'p> for TypeParameterDeclaration<'p> {}

/// The type after `token` among the children of `syntax`.
fn type_after(syntax: SyntaxNode<'_>, token: SyntaxKind) -> Option<SyntaxNode<'_>> {
    syntax
        .children()
        .skip_while(|child| child.kind() != token)
        .find(|child| child.kind().is_type())
}

impl<'p> TypeParameterDeclaration<'p> {
    /// The type after `extends`.
    pub fn constraint(self) -> Result<Option<Node<'p>>> {
        let index = self.0.with_syntax(|syntax| type_after(syntax, EXTENDS_KW).map(SyntaxNode::index))?;
        index.map(|index| self.0.wrap_index(index)).transpose()
    }

    /// The type after `=`.
    pub fn default(self) -> Result<Option<Node<'p>>> {
        let index = self.0.with_syntax(|syntax| type_after(syntax, EQUALS).map(SyntaxNode::index))?;
        index.map(|index| self.0.wrap_index(index)).transpose()
    }

    pub fn set_constraint(self, text: &str) -> Result<()> {
        if let Some(constraint) = self.constraint()? {
            return self.0.replace_range(constraint.range()?, text);
        }
        let end = self
            .0
            .with_syntax(|syntax| syntax.child(IDENTIFIER).map(|name| name.trimmed_range().end()))?
            .ok_or_else(|| Error::not_found("Expected to find the name of the type parameter."))?;
        self.0.edit(vec![Splice::insert(end, format!(" extends {text}"))])
    }
}

impl<'p> RemovableNode<'p> for TypeParameterDeclaration<'p> {
    /// The last type parameter takes the `<>` with it.
    fn remove(self) -> Result<()> {
        if !is_sole_item(self.0)? {
            return remove_comma_item(self.0);
        }
        let list = self.0.parent_or_err()?;
        list.edit(vec![Splice::remove(list.range()?)])
    }
}

impl<'p> NamedNode<'p> for ParameterDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for ParameterDeclaration<'p> {}
impl<'p> TypedNode<'p> for ParameterDeclaration<'p> {}
impl<'p> InitializerExpressionableNode<'p> for ParameterDeclaration<'p> {}

impl<'p> RemovableNode<'p> for ParameterDeclaration<'p> {
    fn remove(self) -> Result<()> {
        remove_comma_item(self.0)
    }
}

impl ParameterDeclaration<'_> {
    pub fn is_rest(self) -> Result<bool> {
        self.0.with_syntax(|syntax| syntax.child(DOT_DOT_DOT).is_some())
    }

    /// Marked with `?`, given a default or a rest parameter.
    pub fn is_optional(self) -> Result<bool> {
        self.0.with_syntax(|syntax| {
            syntax.child(QUESTION).is_some()
                || syntax.child(EXPRESSION).is_some()
                || syntax.child(DOT_DOT_DOT).is_some()
        })
    }

    /// A constructor parameter that also declares a property.
    pub fn is_parameter_property(self) -> Result<bool> {
        self.0.with_syntax(|syntax| {
            names::modifiers(syntax).any(|modifier| {
                matches!(modifier.kind(), PUBLIC_KW | PROTECTED_KW | PRIVATE_KW | READONLY_KW)
            })
        })
    }
}

impl CommentRange<'_> {
    pub fn text(self) -> Result<String> {
        self.0.text()
    }

    /// `SINGLE_LINE_COMMENT` or `MULTI_LINE_COMMENT`.
    pub fn kind(self) -> SyntaxKind {
        self.0.kind()
    }

    pub fn is_js_doc(self) -> Result<bool> {
        Ok(is_js_doc(&self.text()?))
    }
}

impl<'p> RemovableNode<'p> for CommentRange<'p> {
    fn remove(self) -> Result<()> {
        let range = self.0.range()?;
        let text = self.0.source_file()?.syntax().full_text()?;
        self.0.edit(vec![Splice::remove(statement_removal_range(&text, range))])
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;
    use crate::ast::{
        ClassDeclaration, ImplementsClauseableNode as _, ParameteredNode as _,
        StatementedNode as _, TypeParameteredNode as _,
    };
    use crate::project::{CreateSourceFileOptions, Project};

    #[track_caller]
    fn check(text: &str, edit: impl FnOnce(ClassDeclaration<'_>), expect: Expect) {
        let project = Project::new();
        let file = project
            .create_source_file("/test.ts", text, CreateSourceFileOptions::default())
            .unwrap();
        edit(file.classes().unwrap()[0]);
        expect.assert_eq(&file.full_text().unwrap());
    }

    #[test]
    fn implements_clause() {
        check(
            "class A implements B, C<D> {}",
            |class| {
                let implements = class.implements().unwrap();
                assert_eq!(implements[1].expression_text().unwrap(), "C");
                assert_eq!(implements[1].type_arguments().unwrap().len(), 1);
                class.remove_implements(0).unwrap();
            },
            expect!["class A implements C<D> {}"],
        );
        check(
            "class A extends B implements C {}",
            |class| class.remove_implements(0).unwrap(),
            expect!["class A extends B {}"],
        );
        check(
            "class A extends B {}",
            |class| {
                class.add_implements("I").unwrap();
            },
            expect!["class A extends B implements I {}"],
        );
    }

    #[test]
    fn type_parameters() {
        check(
            "class A<T, U> {}",
            |class| {
                let t = class.type_parameter_or_err("T").unwrap();
                t.set_constraint("object").unwrap();
                class.type_parameter_or_err("U").unwrap().remove().unwrap();
            },
            expect!["class A<T extends object> {}"],
        );
        check(
            "class A<T> {}",
            |class| class.type_parameter_or_err("T").unwrap().remove().unwrap(),
            expect!["class A {}"],
        );
    }

    #[test]
    fn parameters() {
        let project = Project::new();
        let file = project
            .create_source_file(
                "/test.ts",
                "class A {\n    constructor(private readonly a: string, b?: number, ...c: any[]) {}\n}",
                CreateSourceFileOptions::default(),
            )
            .unwrap();
        let constructor = file.class_or_err("A").unwrap().constructors().unwrap()[0];
        let flags = constructor
            .parameters()
            .unwrap()
            .into_iter()
            .map(|parameter| {
                (
                    parameter.name().unwrap(),
                    parameter.is_parameter_property().unwrap(),
                    parameter.is_optional().unwrap(),
                    parameter.is_rest().unwrap(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            flags,
            [
                ("a".to_owned(), true, false, false),
                ("b".to_owned(), false, true, false),
                ("c".to_owned(), false, true, true),
            ]
        );
    }
}
