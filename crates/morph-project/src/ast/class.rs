use morph_check::names;
use morph_syntax::SyntaxKind::*;
use morph_syntax::SyntaxNode;

use super::traits::insert_heritage_types;
use super::{
    AstNode, BodiedNode, ExpressionWithTypeArguments, HeritageClauseableNode,
    ImplementsClauseableNode, InitializerExpressionableNode, JsDocableNode, ModifierableNode,
    NamedNode, ParameterDeclaration, ParameteredNode, RemovableNode, ReturnTypedNode,
    TypeParameteredNode, TypedNode, cast_all, find_named, insert_printed, single,
};
use crate::error::{Error, OrNotFound as _, Result};
use crate::manipulation::ItemList;
use crate::node::Node;
use crate::printers::{
    ConstructorPrinter, GetAccessorPrinter, MethodPrinter, PropertyPrinter, SetAccessorPrinter,
    StructurePrinter as _,
};
use crate::structures::{
    ConstructorStructure, GetAccessorStructure, MethodStructure, PropertyStructure,
    SetAccessorStructure,
};
use crate::types::Type;

ast_node! {
    ClassDeclaration => CLASS_DECLARATION;
    ConstructorDeclaration => CONSTRUCTOR;
    MethodDeclaration => METHOD_DECLARATION;
    PropertyDeclaration => PROPERTY_DECLARATION;
    GetAccessorDeclaration => GET_ACCESSOR;
    SetAccessorDeclaration => SET_ACCESSOR;
}

impl<'p> NamedNode<'p> for ClassDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for ClassDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for ClassDeclaration<'p> {}
impl<'p> TypeParameteredNode<'p> for ClassDeclaration<'p> {}
impl<'p> HeritageClauseableNode<'p> for ClassDeclaration<'p> {}
impl<'p> ImplementsClauseableNode<'p> for ClassDeclaration<'p> {}
impl<'p> RemovableNode<'p> for ClassDeclaration<'p> {}

fn is_static(node: Node<'_>) -> Result<bool> {
    node.with_syntax(|syntax| names::has_modifier(syntax, STATIC_KW))
}

fn member_name(node: Node<'_>) -> Result<String> {
    node.with_syntax(|syntax| names::declaration_name(syntax).unwrap_or_default().to_owned())
}

fn first_named<'p>(nodes: Vec<Node<'p>>, name: &str) -> Result<Option<Node<'p>>> {
    for node in nodes {
        if member_name(node)? == name {
            return Ok(Some(node));
        }
    }
    Ok(None)
}

fn is_property_like(node: Node<'_>) -> bool {
    matches!(node.kind(), PROPERTY_DECLARATION | GET_ACCESSOR | SET_ACCESSOR | PARAMETER)
}

impl<'p> ClassDeclaration<'p> {
    /// The expression after `extends`.
    pub fn extends(self) -> Result<Option<ExpressionWithTypeArguments<'p>>> {
        match self.heritage_clause_by_kind(EXTENDS_KW)? {
            Some(clause) => Ok(clause.types()?.first().copied()),
            None => Ok(None),
        }
    }

    pub fn extends_or_err(self) -> Result<ExpressionWithTypeArguments<'p>> {
        self.extends().or_not_found(|| {
            format!(
                "Expected to find the extends expression for the class {}.",
                self.name().unwrap_or_default()
            )
        })
    }

    /// Replaces the extended expression, adding an `extends` clause when
    /// there is none.
    pub fn set_extends(self, text: &str) -> Result<ExpressionWithTypeArguments<'p>> {
        if let Some(extends) = self.extends()? {
            let node = extends.syntax().replace_with_text(text)?;
            return ExpressionWithTypeArguments::cast(node)
                .or_not_found(|| format!("Expected `{text}` to parse as an extends expression."));
        }
        single(insert_heritage_types(self.0, EXTENDS_KW, 0, &[text.to_owned()])?)
    }

    pub fn remove_extends(self) -> Result<()> {
        match self.heritage_clause_by_kind(EXTENDS_KW)? {
            Some(clause) => clause.remove_expression(0),
            None => Ok(()),
        }
    }

    /// Members and comments between the braces.
    pub fn members_with_comments(self) -> Result<Vec<Node<'p>>> {
        self.0.list_items(ItemList::ClassMembers)
    }

    fn body_members(self) -> Result<Vec<Node<'p>>> {
        let items = self.members_with_comments()?;
        Ok(items
            .into_iter()
            .filter(|item| !item.is_comment() && item.kind() != SEMICOLON_CLASS_ELEMENT)
            .collect())
    }

    /// The body members, with the parameter properties of the implementation
    /// constructor right after it.
    pub fn members(self) -> Result<Vec<Node<'p>>> {
        let mut members = Vec::new();
        for member in self.body_members()? {
            members.push(member);
            let Some(constructor) = ConstructorDeclaration::cast(member) else { continue };
            if !constructor.is_implementation()? {
                continue;
            }
            for parameter in constructor.parameters()? {
                if parameter.is_parameter_property()? {
                    members.push(parameter.syntax());
                }
            }
        }
        Ok(members)
    }

    fn instance_members(self) -> Result<Vec<Node<'p>>> {
        let mut members = Vec::new();
        for member in self.members()? {
            if member.kind() != CONSTRUCTOR && (member.kind() == PARAMETER || !is_static(member)?) {
                members.push(member);
            }
        }
        Ok(members)
    }

    fn static_members(self) -> Result<Vec<Node<'p>>> {
        let mut members = Vec::new();
        for member in self.members()? {
            if !matches!(member.kind(), CONSTRUCTOR | PARAMETER) && is_static(member)? {
                members.push(member);
            }
        }
        Ok(members)
    }

    /// Implementations first, then overloads.
    pub fn constructors(self) -> Result<Vec<ConstructorDeclaration<'p>>> {
        let mut implementations = Vec::new();
        let mut overloads = Vec::new();
        for constructor in self.body_members()?.into_iter().filter_map(ConstructorDeclaration::cast) {
            if constructor.is_implementation()? {
                implementations.push(constructor);
            } else {
                overloads.push(constructor);
            }
        }
        implementations.extend(overloads);
        Ok(implementations)
    }

    fn implementation_constructors(self) -> Result<Vec<ConstructorDeclaration<'p>>> {
        let mut implementations = Vec::new();
        for constructor in self.constructors()? {
            if constructor.is_implementation()? {
                implementations.push(constructor);
            }
        }
        Ok(implementations)
    }

    /// Inserts a constructor at `index` of the members with comments,
    /// replacing the implementation constructor in the same edit.
    ///
    /// `index` counts the members that remain after that removal.
    pub fn insert_constructor(
        self,
        index: usize,
        structure: &ConstructorStructure,
    ) -> Result<ConstructorDeclaration<'p>> {
        let settings = self.0.project().manipulation_settings();
        let printer = ConstructorPrinter { is_ambient: self.0.is_ambient()? };
        let fragments = [printer.print(settings, structure)];
        let replaced = self
            .implementation_constructors()?
            .into_iter()
            .map(ConstructorDeclaration::syntax)
            .collect::<Vec<_>>();

        let inserted =
            self.0.insert_items(ItemList::ClassMembers, index, CONSTRUCTOR, &fragments, &replaced)?;

        let implementations = self.implementation_constructors()?.len();
        if implementations > 1 {
            return Err(Error::InvariantViolation {
                message: format!(
                    "class {} has {implementations} implementation constructors",
                    self.name()?
                ),
            });
        }
        single(cast_all(inserted)?)
    }

    pub fn add_constructor(
        self,
        structure: &ConstructorStructure,
    ) -> Result<ConstructorDeclaration<'p>> {
        let remaining = self.members_with_comments()?.len()
            - self.implementation_constructors()?.len();
        self.insert_constructor(remaining, structure)
    }

    fn end_index(self) -> Result<usize> {
        Ok(self.members_with_comments()?.len())
    }

    pub fn properties(self) -> Result<Vec<PropertyDeclaration<'p>>> {
        Ok(self.body_members()?.into_iter().filter_map(PropertyDeclaration::cast).collect())
    }

    pub fn insert_properties(
        self,
        index: usize,
        structures: &[PropertyStructure],
    ) -> Result<Vec<PropertyDeclaration<'p>>> {
        insert_printed(
            self.0,
            ItemList::ClassMembers,
            index,
            PROPERTY_DECLARATION,
            structures,
            PropertyPrinter,
        )
    }

    pub fn add_property(self, structure: &PropertyStructure) -> Result<PropertyDeclaration<'p>> {
        single(self.insert_properties(self.end_index()?, std::slice::from_ref(structure))?)
    }

    pub fn methods(self) -> Result<Vec<MethodDeclaration<'p>>> {
        Ok(self.body_members()?.into_iter().filter_map(MethodDeclaration::cast).collect())
    }

    pub fn insert_methods(
        self,
        index: usize,
        structures: &[MethodStructure],
    ) -> Result<Vec<MethodDeclaration<'p>>> {
        let printer = MethodPrinter { is_ambient: self.0.is_ambient()? };
        insert_printed(
            self.0,
            ItemList::ClassMembers,
            index,
            METHOD_DECLARATION,
            structures,
            printer,
        )
    }

    pub fn add_method(self, structure: &MethodStructure) -> Result<MethodDeclaration<'p>> {
        single(self.insert_methods(self.end_index()?, std::slice::from_ref(structure))?)
    }

    pub fn get_accessors(self) -> Result<Vec<GetAccessorDeclaration<'p>>> {
        Ok(self.body_members()?.into_iter().filter_map(GetAccessorDeclaration::cast).collect())
    }

    pub fn insert_get_accessors(
        self,
        index: usize,
        structures: &[GetAccessorStructure],
    ) -> Result<Vec<GetAccessorDeclaration<'p>>> {
        let printer = GetAccessorPrinter { is_ambient: self.0.is_ambient()? };
        insert_printed(self.0, ItemList::ClassMembers, index, GET_ACCESSOR, structures, printer)
    }

    pub fn add_get_accessor(
        self,
        structure: &GetAccessorStructure,
    ) -> Result<GetAccessorDeclaration<'p>> {
        single(self.insert_get_accessors(self.end_index()?, std::slice::from_ref(structure))?)
    }

    pub fn set_accessors(self) -> Result<Vec<SetAccessorDeclaration<'p>>> {
        Ok(self.body_members()?.into_iter().filter_map(SetAccessorDeclaration::cast).collect())
    }

    pub fn insert_set_accessors(
        self,
        index: usize,
        structures: &[SetAccessorStructure],
    ) -> Result<Vec<SetAccessorDeclaration<'p>>> {
        let printer = SetAccessorPrinter { is_ambient: self.0.is_ambient()? };
        insert_printed(self.0, ItemList::ClassMembers, index, SET_ACCESSOR, structures, printer)
    }

    pub fn add_set_accessor(
        self,
        structure: &SetAccessorStructure,
    ) -> Result<SetAccessorDeclaration<'p>> {
        single(self.insert_set_accessors(self.end_index()?, std::slice::from_ref(structure))?)
    }

    /// A property, accessor or parameter property that is not static.
    pub fn instance_property(self, name: &str) -> Result<Option<Node<'p>>> {
        let properties = self.instance_members()?.into_iter().filter(|&member| is_property_like(member));
        first_named(properties.collect(), name)
    }

    pub fn instance_property_or_err(self, name: &str) -> Result<Node<'p>> {
        self.instance_property(name)
            .or_not_found(|| format!("Expected to find class instance property named '{name}'."))
    }

    pub fn static_property(self, name: &str) -> Result<Option<Node<'p>>> {
        let properties = self.static_members()?.into_iter().filter(|&member| is_property_like(member));
        first_named(properties.collect(), name)
    }

    pub fn static_property_or_err(self, name: &str) -> Result<Node<'p>> {
        self.static_property(name)
            .or_not_found(|| format!("Expected to find class static property named '{name}'."))
    }

    pub fn instance_method(self, name: &str) -> Result<Option<MethodDeclaration<'p>>> {
        let methods = self.instance_members()?.into_iter().filter_map(MethodDeclaration::cast);
        find_named(methods.collect(), name)
    }

    pub fn instance_method_or_err(self, name: &str) -> Result<MethodDeclaration<'p>> {
        self.instance_method(name)
            .or_not_found(|| format!("Expected to find class instance method named '{name}'."))
    }

    pub fn static_method(self, name: &str) -> Result<Option<MethodDeclaration<'p>>> {
        let methods = self.static_members()?.into_iter().filter_map(MethodDeclaration::cast);
        find_named(methods.collect(), name)
    }

    pub fn static_method_or_err(self, name: &str) -> Result<MethodDeclaration<'p>> {
        self.static_method(name)
            .or_not_found(|| format!("Expected to find class static method named '{name}'."))
    }

    pub fn property(self, name: &str) -> Result<Option<PropertyDeclaration<'p>>> {
        find_named(self.properties()?, name)
    }

    pub fn property_or_err(self, name: &str) -> Result<PropertyDeclaration<'p>> {
        self.property(name)
            .or_not_found(|| format!("Expected to find property named '{name}'."))
    }

    pub fn method(self, name: &str) -> Result<Option<MethodDeclaration<'p>>> {
        find_named(self.methods()?, name)
    }

    pub fn method_or_err(self, name: &str) -> Result<MethodDeclaration<'p>> {
        self.method(name).or_not_found(|| format!("Expected to find method named '{name}'."))
    }

    pub fn get_accessor(self, name: &str) -> Result<Option<GetAccessorDeclaration<'p>>> {
        find_named(self.get_accessors()?, name)
    }

    pub fn get_accessor_or_err(self, name: &str) -> Result<GetAccessorDeclaration<'p>> {
        self.get_accessor(name)
            .or_not_found(|| format!("Expected to find get accessor named '{name}'."))
    }

    pub fn set_accessor(self, name: &str) -> Result<Option<SetAccessorDeclaration<'p>>> {
        find_named(self.set_accessors()?, name)
    }

    pub fn set_accessor_or_err(self, name: &str) -> Result<SetAccessorDeclaration<'p>> {
        self.set_accessor(name)
            .or_not_found(|| format!("Expected to find set accessor named '{name}'."))
    }

    pub fn base_types(self) -> Result<Vec<Type<'p>>> {
        self.0.type_of()?.base_types()
    }

    /// The class this one extends, when the base type resolves to exactly
    /// one class declaration.
    pub fn base_class(self) -> Result<Option<ClassDeclaration<'p>>> {
        let mut classes = Vec::new();
        for base in self.base_types()? {
            let Some(symbol) = base.symbol()? else { continue };
            classes.extend(symbol.declarations()?.into_iter().filter_map(ClassDeclaration::cast));
        }
        Ok(match classes.as_slice() {
            [class] => Some(*class),
            _ => None,
        })
    }

    pub fn base_class_or_err(self) -> Result<ClassDeclaration<'p>> {
        self.base_class().or_not_found(|| {
            format!("Expected to find the base class of {}.", self.name().unwrap_or_default())
        })
    }
}

impl<'p> ModifierableNode<'p> for ConstructorDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for ConstructorDeclaration<'p> {}
impl<'p> ParameteredNode<'p> for ConstructorDeclaration<'p> {}
impl<'p> BodiedNode<'p> for ConstructorDeclaration<'p> {}
impl<'p> RemovableNode<'p> for ConstructorDeclaration<'p> {}

impl<'p> ConstructorDeclaration<'p> {
    /// Whether this constructor has a body rather than being an overload.
    pub fn is_implementation(self) -> Result<bool> {
        self.has_body()
    }

    /// The parameters that also declare properties, such as
    /// `private readonly x: number`.
    pub fn parameter_properties(self) -> Result<Vec<ParameterDeclaration<'p>>> {
        let mut properties = Vec::new();
        for parameter in self.parameters()? {
            if parameter.is_parameter_property()? {
                properties.push(parameter);
            }
        }
        Ok(properties)
    }
}

impl<'p> NamedNode<'p> for MethodDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for MethodDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for MethodDeclaration<'p> {}
impl<'p> TypeParameteredNode<'p> for MethodDeclaration<'p> {}
impl<'p> ParameteredNode<'p> for MethodDeclaration<'p> {}
impl<'p> ReturnTypedNode<'p> for MethodDeclaration<'p> {}
impl<'p> BodiedNode<'p> for MethodDeclaration<'p> {}
impl<'p> RemovableNode<'p> for MethodDeclaration<'p> {}

impl<'p> NamedNode<'p> for PropertyDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for PropertyDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for PropertyDeclaration<'p> {}
impl<'p> TypedNode<'p> for PropertyDeclaration<'p> {}
impl<'p> InitializerExpressionableNode<'p> for PropertyDeclaration<'p> {}
impl<'p> RemovableNode<'p> for PropertyDeclaration<'p> {}

impl PropertyDeclaration<'_> {
    pub fn is_optional(self) -> Result<bool> {
        self.0.with_syntax(|syntax| syntax.child(QUESTION).is_some())
    }
}

impl<'p> NamedNode<'p> for GetAccessorDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for GetAccessorDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for GetAccessorDeclaration<'p> {}
impl<'p> ReturnTypedNode<'p> for GetAccessorDeclaration<'p> {}
impl<'p> BodiedNode<'p> for GetAccessorDeclaration<'p> {}
impl<'p> RemovableNode<'p> for GetAccessorDeclaration<'p> {}

/// The accessor of `kind` in the same class with the same name and
/// staticness as `accessor`.
fn paired_accessor<'p>(accessor: Node<'p>) -> Result<Option<Node<'p>>> {
    let kind = match accessor.kind() {
        GET_ACCESSOR => SET_ACCESSOR,
        _ => GET_ACCESSOR,
    };
    let index = accessor.with_syntax(|syntax| {
        let name = names::declaration_name(syntax)?;
        let is_static = names::has_modifier(syntax, STATIC_KW);
        syntax
            .parent()?
            .children_of_kind(kind)
            .find(|&other| {
                names::declaration_name(other) == Some(name)
                    && names::has_modifier(other, STATIC_KW) == is_static
            })
            .map(SyntaxNode::index)
    })?;
    index.map(|index| accessor.wrap_index(index)).transpose()
}

impl<'p> GetAccessorDeclaration<'p> {
    pub fn set_accessor(self) -> Result<Option<SetAccessorDeclaration<'p>>> {
        Ok(paired_accessor(self.0)?.and_then(SetAccessorDeclaration::cast))
    }
}

impl<'p> NamedNode<'p> for SetAccessorDeclaration<'p> {}
impl<'p> ModifierableNode<'p> for SetAccessorDeclaration<'p> {}
impl<'p> JsDocableNode<'p> for SetAccessorDeclaration<'p> {}
impl<'p> ParameteredNode<'p> for SetAccessorDeclaration<'p> {}
impl<'p> BodiedNode<'p> for SetAccessorDeclaration<'p> {}
impl<'p> RemovableNode<'p> for SetAccessorDeclaration<'p> {}

impl<'p> SetAccessorDeclaration<'p> {
    pub fn get_accessor(self) -> Result<Option<GetAccessorDeclaration<'p>>> {
        Ok(paired_accessor(self.0)?.and_then(GetAccessorDeclaration::cast))
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;
    use crate::ast::StatementedNode as _;
    use crate::project::{CreateSourceFileOptions, Project};

    #[track_caller]
    fn check(text: &str, edit: impl FnOnce(ClassDeclaration<'_>), expect: Expect) {
        let project = Project::new();
        let file = project
            .create_source_file("/test.ts", text, CreateSourceFileOptions::default())
            .unwrap();
        let class = file.classes().unwrap()[0];
        edit(class);
        expect.assert_eq(&file.full_text().unwrap());
    }

    #[test]
    fn remove_extends() {
        check("class A extends B {}", |class| class.remove_extends().unwrap(), expect!["class A {}"]);
        check(
            "class A extends B implements C {}",
            |class| class.remove_extends().unwrap(),
            expect!["class A implements C {}"],
        );
    }

    #[test]
    fn set_extends() {
        check(
            "class A<T> implements C {}",
            |class| {
                let extends = class.set_extends("Base<T>").unwrap();
                assert_eq!(extends.syntax().text().unwrap(), "Base<T>");
            },
            expect!["class A<T> extends Base<T> implements C {}"],
        );
        check(
            "class A extends B {}",
            |class| {
                class.set_extends("C").unwrap();
            },
            expect!["class A extends C {}"],
        );
    }

    #[test]
    fn members_include_parameter_properties() {
        let project = Project::new();
        let file = project
            .create_source_file(
                "/test.ts",
                "class A {\n    static s = 1;\n    constructor(private x: number, y: string) {}\n    m() {}\n}",
                CreateSourceFileOptions::default(),
            )
            .unwrap();
        let class = file.class_or_err("A").unwrap();
        let kinds = class.members().unwrap().iter().map(|member| member.kind()).collect::<Vec<_>>();
        assert_eq!(kinds, [PROPERTY_DECLARATION, CONSTRUCTOR, PARAMETER, METHOD_DECLARATION]);

        assert_eq!(class.instance_property_or_err("x").unwrap().kind(), PARAMETER);
        assert!(class.instance_property("s").unwrap().is_none());
        assert_eq!(class.static_property_or_err("s").unwrap().kind(), PROPERTY_DECLARATION);
        assert_eq!(class.instance_method_or_err("m").unwrap().name().unwrap(), "m");
        assert_eq!(
            class.static_method_or_err("m").unwrap_err().to_string(),
            "Expected to find class static method named 'm'."
        );
    }

    #[test]
    fn add_members() {
        check(
            "class A {\n    x = 1;\n}",
            |class| {
                class.add_method(&MethodStructure::new("run").with_return_type("void")).unwrap();
                class.insert_properties(0, &[PropertyStructure::new("y").with_type("string")]).unwrap();
            },
            expect![[r#"
                class A {
                    y: string;
                    x = 1;

                    run(): void {
                    }
                }"#]],
        );
    }

    #[test]
    fn constructors_put_implementations_first() {
        let project = Project::new();
        let file = project
            .create_source_file(
                "/test.ts",
                "class A {\n    constructor(x: number);\n    constructor(x: any) {}\n}",
                CreateSourceFileOptions::default(),
            )
            .unwrap();
        let class = file.class_or_err("A").unwrap();
        let implementations = class
            .constructors()
            .unwrap()
            .into_iter()
            .map(|constructor| constructor.is_implementation().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(implementations, [true, false]);
    }

    #[test]
    fn accessor_pairs() {
        let project = Project::new();
        let file = project
            .create_source_file(
                "/test.ts",
                "class A {\n    get x() { return 1; }\n    set x(value) {}\n    static set x(value) {}\n}",
                CreateSourceFileOptions::default(),
            )
            .unwrap();
        let class = file.class_or_err("A").unwrap();
        let getter = class.get_accessor_or_err("x").unwrap();
        let setter = getter.set_accessor().unwrap().unwrap();
        assert_eq!(setter, class.set_accessors().unwrap()[0]);
        assert_eq!(setter.get_accessor().unwrap(), Some(getter));
    }
}
