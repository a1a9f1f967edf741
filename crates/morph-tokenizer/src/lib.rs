//! Tokenizer for the TypeScript declaration subset.
//!
//! Tokens are materialized up front; trivia is attached to the token that
//! follows it, and the trailing trivia of the text belongs to `EOF`.

mod cursor;

use cursor::{Cursor, EOF_CHAR};
pub use morph_syntax::SyntaxKind;
use morph_syntax::SyntaxKind::*;
use morph_syntax::{TriviaPiece, TriviaPieceKind};
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
    leading: (u32, u32),
}

/// The token stream of one text, always terminated by an `EOF` token.
#[derive(Debug)]
pub struct Tokens {
    tokens: Vec<Token>,
    trivia: Vec<TriviaPiece>,
}

impl Tokens {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the token at `index`, or `EOF` past the end.
    pub fn token(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub fn kind(&self, index: usize) -> SyntaxKind {
        self.token(index).kind
    }

    pub fn leading_trivia(&self, index: usize) -> &[TriviaPiece] {
        let (start, len) = self.token(index).leading;
        &self.trivia[start as usize..(start + len) as usize]
    }

    /// Whether a line break separates this token from the previous one.
    pub fn has_newline_before(&self, index: usize) -> bool {
        self.leading_trivia(index).iter().any(|piece| piece.kind == TriviaPieceKind::Newline)
    }
}

pub fn tokenize(text: &str) -> Tokens {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::with_capacity(text.len() / 4 + 1);

    loop {
        let trivia_start = tokenizer.trivia.len();
        tokenizer.trivia();
        let leading = (trivia_start as u32, (tokenizer.trivia.len() - trivia_start) as u32);
        let (kind, range) = tokenizer.syntax_kind();
        tokens.push(Token { kind, range, leading });
        if kind == EOF {
            break;
        }
    }

    Tokens { tokens, trivia: tokenizer.trivia }
}

/// Scans the trivia at the start of `text`, stopping at the first real token.
pub fn scan_trivia(text: &str) -> Vec<TriviaPiece> {
    let mut tokenizer = Tokenizer::new(text);
    tokenizer.trivia();
    tokenizer.trivia
}

struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    trivia: Vec<TriviaPiece>,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, cursor: Cursor::new(text), trivia: Vec::new() }
    }

    fn offset(&self) -> TextSize {
        TextSize::of(self.text) - self.cursor.remaining()
    }

    fn range(&self) -> TextRange {
        let len = self.cursor.pos_within_token();
        TextRange::at(self.offset() - len, len)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    fn trivia(&mut self) {
        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '\n' => {
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '\r' => {
                    self.cursor.advance();
                    self.cursor.eat('\n');
                    TriviaPieceKind::Newline
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPieceKind::SingleLineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    while !self.cursor.is_eof() {
                        if self.cursor.advance() == '*' && self.cursor.eat('/') {
                            break;
                        }
                    }
                    TriviaPieceKind::MultiLineComment
                }
                c if is_inline_whitespace(c) => {
                    self.cursor.advance_while(is_inline_whitespace);
                    TriviaPieceKind::Whitespace
                }
                _ => break,
            };

            self.trivia.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
        }
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange) {
        if self.cursor.is_eof() {
            return (EOF, TextRange::empty(self.offset()));
        }

        let kind = match self.cursor.advance() {
            '{' => OPEN_BRACE,
            '}' => CLOSE_BRACE,
            '(' => OPEN_PAREN,
            ')' => CLOSE_PAREN,
            '[' => OPEN_BRACKET,
            ']' => CLOSE_BRACKET,
            '<' => LESS_THAN,
            '>' => GREATER_THAN,
            ';' => SEMICOLON,
            ',' => COMMA,
            ':' => COLON,
            '@' => AT,
            '*' => ASTERISK,
            '?' => QUESTION,
            '.' if self.cursor.peek() == '.' && self.cursor.second() == '.' => {
                self.cursor.advance();
                self.cursor.advance();
                DOT_DOT_DOT
            }
            '.' if self.cursor.peek().is_ascii_digit() => {
                self.digits(false);
                NUMERIC_LITERAL
            }
            '.' => DOT,
            '=' => match self.cursor.peek() {
                '>' => {
                    self.cursor.advance();
                    EQUALS_GREATER_THAN
                }
                '=' => {
                    self.cursor.advance_while(|c| c == '=');
                    OPERATOR
                }
                _ => EQUALS,
            },
            '!' if self.cursor.matches('=') => {
                self.cursor.advance_while(|c| c == '=');
                OPERATOR
            }
            '!' => EXCLAMATION,
            '|' if self.cursor.matches('|') => {
                self.cursor.advance();
                OPERATOR
            }
            '|' => BAR,
            '&' if self.cursor.matches('&') => {
                self.cursor.advance();
                OPERATOR
            }
            '&' => AMPERSAND,
            quote @ ('"' | '\'' | '`') => {
                self.string(quote);
                STRING_LITERAL
            }
            first_char @ '0'..='9' => {
                self.number(first_char);
                NUMERIC_LITERAL
            }
            '#' if is_identifier_start(self.cursor.peek()) => {
                self.cursor.advance_while(is_identifier_continue);
                IDENTIFIER
            }
            c if is_identifier_start(c) => {
                self.cursor.advance_while(is_identifier_continue);
                SyntaxKind::from_keyword(self.text()).unwrap_or(IDENTIFIER)
            }
            c if is_operator(c) => OPERATOR,
            _ => UNKNOWN,
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();
        (kind, range)
    }

    fn string(&mut self, quote: char) {
        loop {
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => return,
                '\\' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                '\n' | '\r' if quote != '`' => return,
                c => {
                    self.cursor.advance();
                    if c == quote {
                        return;
                    }
                }
            }
        }
    }

    fn number(&mut self, c: char) {
        if c == '0' {
            match self.cursor.peek() {
                'b' | 'B' | 'o' | 'O' => {
                    self.cursor.advance();
                    self.digits(false);
                    return;
                }
                'x' | 'X' => {
                    self.cursor.advance();
                    self.digits(true);
                    return;
                }
                _ => {}
            }
        }

        self.digits(false);

        if self.cursor.matches('.') && self.cursor.second() != '.' {
            self.cursor.advance();
            self.digits(false);
        }

        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.cursor.advance();
            if self.cursor.matches('-') || self.cursor.matches('+') {
                self.cursor.advance();
            }
            self.digits(false);
        }

        if self.cursor.matches('n') {
            self.cursor.advance();
        }
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }
}

fn is_inline_whitespace(c: char) -> bool {
    c != '\n' && c != '\r' && c != EOF_CHAR && c.is_whitespace()
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '/' | '%' | '^' | '~')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let tokens = tokenize(text);
        (0..tokens.len()).map(|index| tokens.kind(index)).collect()
    }

    fn token_texts(text: &str) -> Vec<&str> {
        let tokens = tokenize(text);
        (0..tokens.len() - 1).map(|index| &text[tokens.token(index).range]).collect()
    }

    #[test]
    fn class_header() {
        assert_eq!(
            kinds("export class A extends B<T> {}"),
            [
                EXPORT_KW,
                CLASS_KW,
                IDENTIFIER,
                EXTENDS_KW,
                IDENTIFIER,
                LESS_THAN,
                IDENTIFIER,
                GREATER_THAN,
                OPEN_BRACE,
                CLOSE_BRACE,
                EOF
            ]
        );
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            kinds("(...a?: string) => x!; a | b & c"),
            [
                OPEN_PAREN,
                DOT_DOT_DOT,
                IDENTIFIER,
                QUESTION,
                COLON,
                STRING_KW,
                CLOSE_PAREN,
                EQUALS_GREATER_THAN,
                IDENTIFIER,
                EXCLAMATION,
                SEMICOLON,
                IDENTIFIER,
                BAR,
                IDENTIFIER,
                AMPERSAND,
                IDENTIFIER,
                EOF
            ]
        );
        assert_eq!(kinds("a === b"), [IDENTIFIER, OPERATOR, IDENTIFIER, EOF]);
        assert_eq!(kinds("a || b"), [IDENTIFIER, OPERATOR, IDENTIFIER, EOF]);
    }

    #[test]
    fn literals() {
        assert_eq!(token_texts(r#"'a' "b\"c" `d` 1.5e3 0x1F 10n"#), [
            "'a'",
            r#""b\"c""#,
            "`d`",
            "1.5e3",
            "0x1F",
            "10n"
        ]);
        assert!(kinds(r#"'a' "b""#).iter().take(2).all(|&kind| kind == STRING_LITERAL));
    }

    #[test]
    fn unterminated_string_stops_at_line_end() {
        assert_eq!(token_texts("'abc\nx"), ["'abc", "x"]);
    }

    #[test]
    fn trivia_is_leading() {
        let text = "//a\nclass /* b */ A {} //c\n";
        let tokens = tokenize(text);

        let class_trivia =
            tokens.leading_trivia(0).iter().map(|piece| piece.kind).collect::<Vec<_>>();
        assert_eq!(class_trivia, [TriviaPieceKind::SingleLineComment, TriviaPieceKind::Newline]);

        let name_trivia =
            tokens.leading_trivia(1).iter().map(|piece| piece.kind).collect::<Vec<_>>();
        assert_eq!(name_trivia, [
            TriviaPieceKind::Whitespace,
            TriviaPieceKind::MultiLineComment,
            TriviaPieceKind::Whitespace
        ]);

        let eof = tokens.len() - 1;
        assert_eq!(tokens.kind(eof), EOF);
        assert_eq!(tokens.token(eof).range, TextRange::empty(TextSize::of(text)));
        assert!(tokens.has_newline_before(eof));
        assert!(!tokens.has_newline_before(1));
    }

    #[test]
    fn crlf_is_one_newline() {
        let pieces = scan_trivia("\r\n  // x\r\nclass");
        let kinds = pieces.iter().map(|piece| piece.kind).collect::<Vec<_>>();
        assert_eq!(kinds, [
            TriviaPieceKind::Newline,
            TriviaPieceKind::Whitespace,
            TriviaPieceKind::SingleLineComment,
            TriviaPieceKind::Newline
        ]);
        assert_eq!(u32::from(pieces[0].len), 2);
    }

    #[test]
    fn unterminated_block_comment_runs_to_end() {
        let pieces = scan_trivia("/* never closed");
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].kind, TriviaPieceKind::MultiLineComment);
        assert_eq!(u32::from(pieces[0].len), 15);
    }

    #[test]
    fn private_names_are_identifiers() {
        assert_eq!(kinds("#secret"), [IDENTIFIER, EOF]);
    }
}
