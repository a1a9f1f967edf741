use std::slice;

use morph_syntax::SyntaxKind::*;

use super::traits::insert_heritage_types;
use super::{
    AstNode, ExpressionWithTypeArguments, HeritageClauseableNode, JsDocableNode,
    ModifierableNode, NamedNode, ParameteredNode, RemovableNode, ReturnTypedNode,
    TypeParameteredNode, TypedNode, find_named, insert_printed, single,
};
use crate::error::{Error, OrNotFound as _, Result};
use crate::manipulation::ItemList;
use crate::node::Node;
use crate::printers::{MethodSignaturePrinter, PropertySignaturePrinter};
use crate::structures::{MethodSignatureStructure, PropertySignatureStructure};
use crate::types::Type;

ast_node! {
    InterfaceDeclaration => INTERFACE_DECLARATION;
    PropertySignature => PROPERTY_SIGNATURE;
    MethodSignature => METHOD_SIGNATURE;
}

impl<'p> NamedNode<'p> for InterfaceDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for InterfaceDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for InterfaceDeclaration<'p> {}
impl<'p> TypeParameteredNode<'p> for InterfaceDeclaration<'p> {}
impl<'p> HeritageClauseableNode<'p> for InterfaceDeclaration<'p> {}
impl<'p> RemovableNode<'p> for InterfaceDeclaration<'p> {}

impl<'p> InterfaceDeclaration<'p> {
    /// The types after `extends`.
    pub fn extends(self) -> Result<Vec<ExpressionWithTypeArguments<'p>>> {
        match self.heritage_clause_by_kind(EXTENDS_KW)? {
            Some(clause) => clause.types(),
            None => Ok(Vec::new()),
        }
    }

    pub fn insert_extends(
        self,
        index: usize,
        texts: &[String],
    ) -> Result<Vec<ExpressionWithTypeArguments<'p>>> {
        insert_heritage_types(self.0, EXTENDS_KW, index, texts)
    }

    pub fn add_extends(self, text: &str) -> Result<ExpressionWithTypeArguments<'p>> {
        let index = self.extends()?.len();
        single(self.insert_extends(index, &[text.to_owned()])?)
    }

    /// Removes the `index`th extended type, and the clause with the last one.
    pub fn remove_extends(self, index: usize) -> Result<()> {
        let extends = self.extends()?;
        let expression = extends
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange { index, len: extends.len() })?;
        expression.remove()
    }

    pub fn members_with_comments(self) -> Result<Vec<Node<'p>>> {
        self.0.list_items(ItemList::TypeMembers)
    }

    fn end_index(self) -> Result<usize> {
        Ok(self.members_with_comments()?.len())
    }

    pub fn properties(self) -> Result<Vec<PropertySignature<'p>>> {
        let members = self.members_with_comments()?;
        Ok(members.into_iter().filter_map(PropertySignature::cast).collect())
    }

    pub fn insert_properties(
        self,
        index: usize,
        structures: &[PropertySignatureStructure],
    ) -> Result<Vec<PropertySignature<'p>>> {
        insert_printed(
            self.0,
            ItemList::TypeMembers,
            index,
            PROPERTY_SIGNATURE,
            structures,
            PropertySignaturePrinter,
        )
    }

    pub fn add_property(self, structure: &PropertySignatureStructure) -> Result<PropertySignature<'p>> {
        single(self.insert_properties(self.end_index()?, slice::from_ref(structure))?)
    }

    pub fn property(self, name: &str) -> Result<Option<PropertySignature<'p>>> {
        find_named(self.properties()?, name)
    }

    pub fn property_or_err(self, name: &str) -> Result<PropertySignature<'p>> {
        self.property(name)
            .or_not_found(|| format!("Expected to find interface property named '{name}'."))
    }

    pub fn methods(self) -> Result<Vec<MethodSignature<'p>>> {
        let members = self.members_with_comments()?;
        Ok(members.into_iter().filter_map(MethodSignature::cast).collect())
    }

    pub fn insert_methods(
        self,
        index: usize,
        structures: &[MethodSignatureStructure],
    ) -> Result<Vec<MethodSignature<'p>>> {
        insert_printed(
            self.0,
            ItemList::TypeMembers,
            index,
            METHOD_SIGNATURE,
            structures,
            MethodSignaturePrinter,
        )
    }

    pub fn add_method(self, structure: &MethodSignatureStructure) -> Result<MethodSignature<'p>> {
        single(self.insert_methods(self.end_index()?, slice::from_ref(structure))?)
    }

    pub fn method(self, name: &str) -> Result<Option<MethodSignature<'p>>> {
        find_named(self.methods()?, name)
    }

    pub fn method_or_err(self, name: &str) -> Result<MethodSignature<'p>> {
        self.method(name)
            .or_not_found(|| format!("Expected to find interface method named '{name}'."))
    }

    pub fn base_types(self) -> Result<Vec<Type<'p>>> {
        self.0.type_of()?.base_types()
    }
}

impl<'p> NamedNode<'p> for PropertySignature<'p> {}
impl<'p> ModifierableNode<'p> for PropertySignature<'p> {}
impl<'p> JsDocableNode<'p> for PropertySignature<'p> {}
impl<'p> TypedNode<'p> for PropertySignature<'p> {}
impl<'p> RemovableNode<'p> for PropertySignature<'p> {}

impl PropertySignature<'_> {
    pub fn is_optional(self) -> Result<bool> {
        self.0.with_syntax(|syntax| syntax.child(QUESTION).is_some())
    }
}

impl<'p> NamedNode<'p> for MethodSignature<'p> {}
impl<'p> JsDocableNode<'p> for MethodSignature<'p> {}
impl<'p> TypeParameteredNode<'p> for MethodSignature<'p> {}
impl<'p> ParameteredNode<'p> for MethodSignature<'p> {}
impl<'p> ReturnTypedNode<'p> for MethodSignature<'p> {}
impl<'p> RemovableNode<'p> for MethodSignature<'p> {}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;
    use crate::ast::StatementedNode as _;
    use crate::project::{CreateSourceFileOptions, Project};

    #[track_caller]
    fn check(text: &str, edit: impl FnOnce(InterfaceDeclaration<'_>), expect: Expect) {
        let project = Project::new();
        let file = project
            .create_source_file("/test.ts", text, CreateSourceFileOptions::default())
            .unwrap();
        edit(file.interfaces().unwrap()[0]);
        expect.assert_eq(&file.full_text().unwrap());
    }

    #[test]
    fn extends_list() {
        check(
            "interface I {}",
            |interface| {
                interface.add_extends("A").unwrap();
                interface.add_extends("B<string>").unwrap();
            },
            expect!["interface I extends A, B<string> {}"],
        );
        check(
            "interface I extends A, B {}",
            |interface| interface.remove_extends(0).unwrap(),
            expect!["interface I extends B {}"],
        );
        check(
            "interface I<T> extends A {}",
            |interface| interface.remove_extends(0).unwrap(),
            expect!["interface I<T> {}"],
        );
    }

    #[test]
    fn members() {
        check(
            "interface I {\n    a: string;\n}",
            |interface| {
                let method = interface
                    .add_method(&MethodSignatureStructure::new("run").with_return_type("void"))
                    .unwrap();
                assert_eq!(method.name().unwrap(), "run");
                interface
                    .insert_properties(0, &[PropertySignatureStructure::new("z").optional()])
                    .unwrap();
                assert!(interface.property_or_err("z").unwrap().is_optional().unwrap());
            },
            expect![[r#"
                interface I {
                    z?;
                    a: string;
                    run(): void;
                }"#]],
        );
    }

    #[test]
    fn missing_members() {
        let project = Project::new();
        let file = project
            .create_source_file("/test.ts", "interface I { a(): void }", CreateSourceFileOptions::default())
            .unwrap();
        let interface = file.interface_or_err("I").unwrap();
        assert!(interface.property("a").unwrap().is_none());
        assert_eq!(
            interface.method_or_err("b").unwrap_err().to_string(),
            "Expected to find interface method named 'b'."
        );
    }
}
