use morph_inputs::File;
use morph_syntax::NodeIndex;

use crate::SymbolRef;

/// A resolved type. Equal values denote the same type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    Object,
    This,
    /// A string, numeric or boolean literal type, as written.
    Literal(String),
    Class { symbol: SymbolRef, arguments: Vec<TypeData> },
    Interface { symbol: SymbolRef, arguments: Vec<TypeData> },
    Enum(SymbolRef),
    TypeParameter(SymbolRef),
    /// The value side of a namespace or module.
    Namespace(SymbolRef),
    Array(Box<TypeData>),
    Tuple(Vec<TypeData>),
    Union(Vec<TypeData>),
    Intersection(Vec<TypeData>),
    /// A function type or the type of a function-like declaration.
    Function { file: File, node: NodeIndex },
    /// An anonymous `{ ... }` type literal.
    ObjectLiteral { file: File, node: NodeIndex },
    /// A reference to a name that does not resolve.
    Unresolved(String),
}

impl TypeData {
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Number
                | Self::Boolean
                | Self::Void
                | Self::Undefined
                | Self::Null
                | Self::Literal(_)
        )
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, Self::Interface { .. })
    }

    /// The symbol a named type refers to.
    pub fn symbol(&self) -> Option<SymbolRef> {
        match self {
            Self::Class { symbol, .. }
            | Self::Interface { symbol, .. }
            | Self::Enum(symbol)
            | Self::TypeParameter(symbol)
            | Self::Namespace(symbol) => Some(*symbol),
            _ => None,
        }
    }

    pub fn array_element(&self) -> Option<&Self> {
        match self {
            Self::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn union_members(&self) -> &[Self] {
        match self {
            Self::Union(types) => types,
            _ => &[],
        }
    }
}
