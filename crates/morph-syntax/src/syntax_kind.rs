use crate::SyntaxSet;

/// Every token and node kind of the tree.
///
/// Tokens come first and end with `EOF`, so `is_token` is a single comparison.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    OPEN_BRACE,
    CLOSE_BRACE,
    OPEN_PAREN,
    CLOSE_PAREN,
    OPEN_BRACKET,
    CLOSE_BRACKET,
    LESS_THAN,
    GREATER_THAN,
    SEMICOLON,
    COMMA,
    COLON,
    DOT,
    DOT_DOT_DOT,
    EQUALS,
    EQUALS_GREATER_THAN,
    QUESTION,
    EXCLAMATION,
    BAR,
    AMPERSAND,
    AT,
    ASTERISK,
    OPERATOR,

    IDENTIFIER,
    STRING_LITERAL,
    NUMERIC_LITERAL,

    ABSTRACT_KW,
    ANY_KW,
    AS_KW,
    ASYNC_KW,
    BOOLEAN_KW,
    CLASS_KW,
    CONST_KW,
    CONSTRUCTOR_KW,
    DECLARE_KW,
    DEFAULT_KW,
    ENUM_KW,
    EXPORT_KW,
    EXTENDS_KW,
    FALSE_KW,
    FROM_KW,
    FUNCTION_KW,
    GET_KW,
    IMPLEMENTS_KW,
    IMPORT_KW,
    INTERFACE_KW,
    LET_KW,
    MODULE_KW,
    NAMESPACE_KW,
    NEVER_KW,
    NEW_KW,
    NULL_KW,
    NUMBER_KW,
    OBJECT_KW,
    OVERRIDE_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    RETURN_KW,
    SET_KW,
    STATIC_KW,
    STRING_KW,
    THIS_KW,
    TRUE_KW,
    TYPE_KW,
    UNDEFINED_KW,
    UNKNOWN_KW,
    VAR_KW,
    VOID_KW,

    WHITESPACE,
    NEWLINE,
    SINGLE_LINE_COMMENT,
    MULTI_LINE_COMMENT,

    UNKNOWN,
    EOF,

    SOURCE_FILE,
    CLASS_DECLARATION,
    INTERFACE_DECLARATION,
    FUNCTION_DECLARATION,
    MODULE_DECLARATION,
    MODULE_BLOCK,
    ENUM_DECLARATION,
    ENUM_MEMBER,
    TYPE_ALIAS_DECLARATION,
    VARIABLE_STATEMENT,
    VARIABLE_DECLARATION,
    IMPORT_DECLARATION,
    IMPORT_CLAUSE,
    NAMED_IMPORTS,
    IMPORT_SPECIFIER,
    NAMESPACE_IMPORT,
    EXPORT_DECLARATION,
    NAMED_EXPORTS,
    EXPORT_SPECIFIER,
    NAMESPACE_EXPORT_DECLARATION,
    EXPRESSION_STATEMENT,
    RETURN_STATEMENT,
    EMPTY_STATEMENT,
    BLOCK,
    CONSTRUCTOR,
    METHOD_DECLARATION,
    PROPERTY_DECLARATION,
    GET_ACCESSOR,
    SET_ACCESSOR,
    SEMICOLON_CLASS_ELEMENT,
    PROPERTY_SIGNATURE,
    METHOD_SIGNATURE,
    PARAMETER_LIST,
    PARAMETER,
    TYPE_PARAMETER_LIST,
    TYPE_PARAMETER,
    TYPE_ARGUMENT_LIST,
    HERITAGE_CLAUSE,
    EXPRESSION_WITH_TYPE_ARGUMENTS,
    QUALIFIED_NAME,
    TYPE_REFERENCE,
    KEYWORD_TYPE,
    ARRAY_TYPE,
    UNION_TYPE,
    INTERSECTION_TYPE,
    LITERAL_TYPE,
    FUNCTION_TYPE,
    TYPE_LITERAL,
    PARENTHESIZED_TYPE,
    TUPLE_TYPE,
    EXPRESSION,
    ERROR,
    TOMBSTONE,
}

use SyntaxKind::*;

const MODIFIERS: SyntaxSet = SyntaxSet::new([
    ABSTRACT_KW,
    ASYNC_KW,
    DECLARE_KW,
    DEFAULT_KW,
    EXPORT_KW,
    OVERRIDE_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    STATIC_KW,
]);

const CLASS_MEMBERS: SyntaxSet = SyntaxSet::new([
    CONSTRUCTOR,
    METHOD_DECLARATION,
    PROPERTY_DECLARATION,
    GET_ACCESSOR,
    SET_ACCESSOR,
    SEMICOLON_CLASS_ELEMENT,
]);

const STATEMENTS: SyntaxSet = SyntaxSet::new([
    CLASS_DECLARATION,
    INTERFACE_DECLARATION,
    FUNCTION_DECLARATION,
    MODULE_DECLARATION,
    ENUM_DECLARATION,
    TYPE_ALIAS_DECLARATION,
    VARIABLE_STATEMENT,
    IMPORT_DECLARATION,
    EXPORT_DECLARATION,
    NAMESPACE_EXPORT_DECLARATION,
    EXPRESSION_STATEMENT,
    RETURN_STATEMENT,
    EMPTY_STATEMENT,
    BLOCK,
]);

const TYPES: SyntaxSet = SyntaxSet::new([
    TYPE_REFERENCE,
    KEYWORD_TYPE,
    ARRAY_TYPE,
    UNION_TYPE,
    INTERSECTION_TYPE,
    LITERAL_TYPE,
    FUNCTION_TYPE,
    TYPE_LITERAL,
    PARENTHESIZED_TYPE,
    TUPLE_TYPE,
]);

impl SyntaxKind {
    #[inline]
    pub fn is_token(self) -> bool {
        self <= EOF
    }

    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | NEWLINE | SINGLE_LINE_COMMENT | MULTI_LINE_COMMENT)
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, SINGLE_LINE_COMMENT | MULTI_LINE_COMMENT)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (ABSTRACT_KW..=VOID_KW).contains(&self)
    }

    /// Identifiers and every keyword; keywords are valid property names.
    #[inline]
    pub fn is_identifier_like(self) -> bool {
        self == IDENTIFIER || self.is_keyword()
    }

    pub fn is_modifier(self) -> bool {
        MODIFIERS.contains(self)
    }

    pub fn is_class_member(self) -> bool {
        CLASS_MEMBERS.contains(self)
    }

    pub fn is_type_member(self) -> bool {
        matches!(self, PROPERTY_SIGNATURE | METHOD_SIGNATURE)
    }

    pub fn is_statement(self) -> bool {
        STATEMENTS.contains(self)
    }

    pub fn is_type(self) -> bool {
        TYPES.contains(self)
    }

    /// Members that carry a `{ ... }` body when implemented.
    pub fn is_bodied_member(self) -> bool {
        matches!(
            self,
            CONSTRUCTOR | METHOD_DECLARATION | GET_ACCESSOR | SET_ACCESSOR | FUNCTION_DECLARATION
        )
    }

    /// Keywords written as the type of a binding, such as `string` in `x: string`.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            ANY_KW
                | BOOLEAN_KW
                | NEVER_KW
                | NULL_KW
                | NUMBER_KW
                | OBJECT_KW
                | STRING_KW
                | UNDEFINED_KW
                | UNKNOWN_KW
                | VOID_KW
                | THIS_KW
        )
    }

    pub fn from_keyword(ident: &str) -> Option<Self> {
        let kind = match ident {
            "abstract" => ABSTRACT_KW,
            "any" => ANY_KW,
            "as" => AS_KW,
            "async" => ASYNC_KW,
            "boolean" => BOOLEAN_KW,
            "class" => CLASS_KW,
            "const" => CONST_KW,
            "constructor" => CONSTRUCTOR_KW,
            "declare" => DECLARE_KW,
            "default" => DEFAULT_KW,
            "enum" => ENUM_KW,
            "export" => EXPORT_KW,
            "extends" => EXTENDS_KW,
            "false" => FALSE_KW,
            "from" => FROM_KW,
            "function" => FUNCTION_KW,
            "get" => GET_KW,
            "implements" => IMPLEMENTS_KW,
            "import" => IMPORT_KW,
            "interface" => INTERFACE_KW,
            "let" => LET_KW,
            "module" => MODULE_KW,
            "namespace" => NAMESPACE_KW,
            "never" => NEVER_KW,
            "new" => NEW_KW,
            "null" => NULL_KW,
            "number" => NUMBER_KW,
            "object" => OBJECT_KW,
            "override" => OVERRIDE_KW,
            "private" => PRIVATE_KW,
            "protected" => PROTECTED_KW,
            "public" => PUBLIC_KW,
            "readonly" => READONLY_KW,
            "return" => RETURN_KW,
            "set" => SET_KW,
            "static" => STATIC_KW,
            "string" => STRING_KW,
            "this" => THIS_KW,
            "true" => TRUE_KW,
            "type" => TYPE_KW,
            "undefined" => UNDEFINED_KW,
            "unknown" => UNKNOWN_KW,
            "var" => VAR_KW,
            "void" => VOID_KW,
            _ => return None,
        };
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::SyntaxKind::*;
    use super::*;

    #[test]
    fn token_and_node_kinds_are_partitioned() {
        assert!(OPEN_BRACE.is_token());
        assert!(MULTI_LINE_COMMENT.is_token());
        assert!(EOF.is_token());
        assert!(!SOURCE_FILE.is_token());
        assert!(!TOMBSTONE.is_token());
    }

    #[test]
    fn keywords_round_trip_through_lookup() {
        for kind in [CLASS_KW, CONSTRUCTOR_KW, VOID_KW, ABSTRACT_KW] {
            let text = format!("{kind:?}").trim_end_matches("_KW").to_ascii_lowercase();
            assert_eq!(SyntaxKind::from_keyword(&text), Some(kind));
            assert!(kind.is_keyword());
        }
        assert_eq!(SyntaxKind::from_keyword("Test"), None);
    }

    #[test]
    fn member_and_statement_sets() {
        assert!(METHOD_DECLARATION.is_class_member());
        assert!(!PROPERTY_SIGNATURE.is_class_member());
        assert!(PROPERTY_SIGNATURE.is_type_member());
        assert!(CLASS_DECLARATION.is_statement());
        assert!(STATIC_KW.is_modifier());
        assert!(!CLASS_KW.is_modifier());
    }
}
