//! Plain descriptions of declarations, printed into source text by
//! [`printers`](crate::printers).
//!
//! Every structure implements `Default`; the `new` constructors take the
//! required name and the `with_*` methods fill in the rest.

use morph_syntax::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Public,
    Protected,
    Private,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Public => "public",
            Scope::Protected => "protected",
            Scope::Private => "private",
        }
    }

    pub(crate) fn from_kind(kind: SyntaxKind) -> Option<Self> {
        match kind {
            SyntaxKind::PUBLIC_KW => Some(Scope::Public),
            SyntaxKind::PROTECTED_KW => Some(Scope::Protected),
            SyntaxKind::PRIVATE_KW => Some(Scope::Private),
            _ => None,
        }
    }

    pub(crate) fn kind(self) -> SyntaxKind {
        match self {
            Scope::Public => SyntaxKind::PUBLIC_KW,
            Scope::Protected => SyntaxKind::PROTECTED_KW,
            Scope::Private => SyntaxKind::PRIVATE_KW,
        }
    }
}

macro_rules! with {
    ($($method:ident: $field:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $method(mut self, value: impl Into<$ty>) -> Self {
                self.$field = value.into();
                self
            }
        )*
    };
}

macro_rules! flag {
    ($($method:ident: $field:ident),* $(,)?) => {
        $(
            pub fn $method(mut self) -> Self {
                self.$field = true;
                self
            }
        )*
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeParameterStructure {
    pub name: String,
    pub constraint: Option<String>,
    pub default: Option<String>,
}

impl TypeParameterStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterStructure {
    pub name: String,
    pub type_: Option<String>,
    pub initializer: Option<String>,
    pub is_optional: bool,
    pub is_rest: bool,
    pub is_readonly: bool,
    /// Turns the parameter into a parameter property.
    pub scope: Option<Scope>,
}

impl ParameterStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    flag!(optional: is_optional, rest: is_rest, readonly: is_readonly);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub type_: Option<String>,
    pub initializer: Option<String>,
    pub scope: Option<Scope>,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_abstract: bool,
    pub is_optional: bool,
}

impl PropertyStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(static_: is_static, readonly: is_readonly, abstract_: is_abstract, optional: is_optional);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub scope: Option<Scope>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_async: bool,
    pub type_parameters: Vec<TypeParameterStructure>,
    pub parameters: Vec<ParameterStructure>,
    pub return_type: Option<String>,
    /// Body lines; ignored for abstract and ambient methods.
    pub statements: Vec<String>,
}

impl MethodStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn parameter(mut self, parameter: ParameterStructure) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn type_parameter(mut self, type_parameter: TypeParameterStructure) -> Self {
        self.type_parameters.push(type_parameter);
        self
    }

    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(static_: is_static, abstract_: is_abstract, async_: is_async);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructorStructure {
    pub docs: Vec<String>,
    pub scope: Option<Scope>,
    pub parameters: Vec<ParameterStructure>,
    pub statements: Vec<String>,
}

impl ConstructorStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn parameter(mut self, parameter: ParameterStructure) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    with!(with_docs: docs: Vec<String>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetAccessorStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub scope: Option<Scope>,
    pub is_static: bool,
    pub return_type: Option<String>,
    pub statements: Vec<String>,
}

impl GetAccessorStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(static_: is_static);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetAccessorStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub scope: Option<Scope>,
    pub is_static: bool,
    pub parameters: Vec<ParameterStructure>,
    pub statements: Vec<String>,
}

impl SetAccessorStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn parameter(mut self, parameter: ParameterStructure) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(static_: is_static);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub is_exported: bool,
    pub is_default_export: bool,
    pub has_declare_keyword: bool,
    pub is_abstract: bool,
    pub type_parameters: Vec<TypeParameterStructure>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub ctors: Vec<ConstructorStructure>,
    pub properties: Vec<PropertyStructure>,
    pub get_accessors: Vec<GetAccessorStructure>,
    pub set_accessors: Vec<SetAccessorStructure>,
    pub methods: Vec<MethodStructure>,
}

impl ClassStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_extends(mut self, extends: impl Into<String>) -> Self {
        self.extends = Some(extends.into());
        self
    }

    pub fn implements(mut self, implements: impl Into<String>) -> Self {
        self.implements.push(implements.into());
        self
    }

    pub fn type_parameter(mut self, type_parameter: TypeParameterStructure) -> Self {
        self.type_parameters.push(type_parameter);
        self
    }

    pub fn ctor(mut self, ctor: ConstructorStructure) -> Self {
        self.ctors.push(ctor);
        self
    }

    pub fn property(mut self, property: PropertyStructure) -> Self {
        self.properties.push(property);
        self
    }

    pub fn get_accessor(mut self, accessor: GetAccessorStructure) -> Self {
        self.get_accessors.push(accessor);
        self
    }

    pub fn set_accessor(mut self, accessor: SetAccessorStructure) -> Self {
        self.set_accessors.push(accessor);
        self
    }

    pub fn method(mut self, method: MethodStructure) -> Self {
        self.methods.push(method);
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(
        exported: is_exported,
        default_export: is_default_export,
        declare: has_declare_keyword,
        abstract_: is_abstract,
    );
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySignatureStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub type_: Option<String>,
    pub is_optional: bool,
    pub is_readonly: bool,
}

impl PropertySignatureStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(optional: is_optional, readonly: is_readonly);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSignatureStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub type_parameters: Vec<TypeParameterStructure>,
    pub parameters: Vec<ParameterStructure>,
    pub return_type: Option<String>,
}

impl MethodSignatureStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn parameter(mut self, parameter: ParameterStructure) -> Self {
        self.parameters.push(parameter);
        self
    }

    with!(with_docs: docs: Vec<String>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub is_exported: bool,
    pub has_declare_keyword: bool,
    pub type_parameters: Vec<TypeParameterStructure>,
    pub extends: Vec<String>,
    pub properties: Vec<PropertySignatureStructure>,
    pub methods: Vec<MethodSignatureStructure>,
}

impl InterfaceStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn extends(mut self, extends: impl Into<String>) -> Self {
        self.extends.push(extends.into());
        self
    }

    pub fn property(mut self, property: PropertySignatureStructure) -> Self {
        self.properties.push(property);
        self
    }

    pub fn method(mut self, method: MethodSignatureStructure) -> Self {
        self.methods.push(method);
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(exported: is_exported, declare: has_declare_keyword);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub is_exported: bool,
    pub is_default_export: bool,
    pub has_declare_keyword: bool,
    pub is_async: bool,
    pub type_parameters: Vec<TypeParameterStructure>,
    pub parameters: Vec<ParameterStructure>,
    pub return_type: Option<String>,
    pub statements: Vec<String>,
}

impl FunctionStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn parameter(mut self, parameter: ParameterStructure) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn type_parameter(mut self, type_parameter: TypeParameterStructure) -> Self {
        self.type_parameters.push(type_parameter);
        self
    }

    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(
        exported: is_exported,
        default_export: is_default_export,
        declare: has_declare_keyword,
        async_: is_async,
    );
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumMemberStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub initializer: Option<String>,
}

impl EnumMemberStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    with!(with_docs: docs: Vec<String>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumStructure {
    pub name: String,
    pub docs: Vec<String>,
    pub is_exported: bool,
    pub has_declare_keyword: bool,
    pub is_const: bool,
    pub members: Vec<EnumMemberStructure>,
}

impl EnumStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn member(mut self, member: EnumMemberStructure) -> Self {
        self.members.push(member);
        self
    }

    with!(with_docs: docs: Vec<String>);
    flag!(exported: is_exported, declare: has_declare_keyword, const_: is_const);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSpecifierStructure {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportSpecifierStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), alias: None }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStructure {
    pub module_specifier: String,
    pub default_import: Option<String>,
    pub namespace_import: Option<String>,
    pub named_imports: Vec<ImportSpecifierStructure>,
}

impl ImportStructure {
    pub fn new(module_specifier: impl Into<String>) -> Self {
        Self { module_specifier: module_specifier.into(), ..Self::default() }
    }

    pub fn with_default_import(mut self, name: impl Into<String>) -> Self {
        self.default_import = Some(name.into());
        self
    }

    pub fn with_namespace_import(mut self, name: impl Into<String>) -> Self {
        self.namespace_import = Some(name.into());
        self
    }

    pub fn named_import(mut self, specifier: ImportSpecifierStructure) -> Self {
        self.named_imports.push(specifier);
        self
    }
}
