use drop_bomb::DropBomb;
use morph_errors::Diagnostic;
use morph_syntax::{Builder, SyntaxKind, SyntaxSet, SyntaxTree};
use morph_tokenizer::Tokens;

pub(crate) struct Parser<'t> {
    text: &'t str,
    tokens: Tokens,
    pos: usize,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(text: &'t str) -> Self {
        Self {
            text,
            tokens: morph_tokenizer::tokenize(text),
            pos: 0,
            events: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens.kind(self.pos + n)
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'t str {
        &self.text[self.tokens.token(self.pos + n).range]
    }

    pub(crate) fn has_newline_before(&self) -> bool {
        self.tokens.has_newline_before(self.pos)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    pub(crate) fn advance(&mut self) {
        let kind = self.peek_kind();
        self.advance_remap(kind);
    }

    /// Consumes the current token, recording it with `kind` instead of its own
    /// kind. Used for contextual keywords in name position.
    pub(crate) fn advance_remap(&mut self, kind: SyntaxKind) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        self.events.push(Event::Token { kind, index: self.pos });
        self.pos += 1;
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.advance();
        true
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {}", describe(kind)));
        false
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = self.tokens.token(self.pos).range;
        self.diagnostics.push(Diagnostic::error(message, range));
    }

    pub(crate) fn error_and_bump(&mut self, message: &str) {
        let m = self.start();
        self.error(message);
        self.advance();
        m.complete(self, SyntaxKind::ERROR);
    }

    /// Reports an error, skipping the current token unless it belongs to
    /// `recovery` or closes a block.
    pub(crate) fn error_recover(&mut self, message: &str, recovery: &SyntaxSet) {
        if self.at_set(recovery)
            || matches!(self.peek_kind(), SyntaxKind::OPEN_BRACE | SyntaxKind::CLOSE_BRACE)
        {
            self.error(message);
            return;
        }
        self.error_and_bump(message);
    }

    /// Records the `EOF` token, which owns the trailing trivia of the text.
    pub(crate) fn finish_eof(&mut self) {
        debug_assert!(self.at(SyntaxKind::EOF));
        self.events.push(Event::Token { kind: SyntaxKind::EOF, index: self.pos });
    }

    pub(crate) fn build_tree(self) -> (SyntaxTree, Vec<Diagnostic>) {
        let Parser { text, tokens, pos: _, mut events, diagnostics } = self;
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token { kind, index } => {
                    let token = tokens.token(index);
                    builder.token(tokens.leading_trivia(index), kind, token.range.len());
                }
            }
        }

        (builder.finish(), diagnostics)
    }
}

fn describe(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;

    match kind {
        OPEN_BRACE => "`{`",
        CLOSE_BRACE => "`}`",
        OPEN_PAREN => "`(`",
        CLOSE_PAREN => "`)`",
        OPEN_BRACKET => "`[`",
        CLOSE_BRACKET => "`]`",
        LESS_THAN => "`<`",
        GREATER_THAN => "`>`",
        SEMICOLON => "`;`",
        COMMA => "`,`",
        COLON => "`:`",
        EQUALS => "`=`",
        EQUALS_GREATER_THAN => "`=>`",
        IDENTIFIER => "an identifier",
        STRING_LITERAL => "a string literal",
        AS_KW => "`as`",
        FROM_KW => "`from`",
        NAMESPACE_KW => "`namespace`",
        EOF => "end of file",
        _ => "a token",
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token { kind: SyntaxKind, index: usize },
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Self::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Self {
        Self { position: pos, bomb: DropBomb::new("Marker must be either completed or abandoned") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }

    /// Drops the marker without creating a node.
    pub(crate) fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();

        let idx = self.position as usize;
        if idx == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None }) => {}
                _ => unreachable!(),
            }
        }
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        Self { pos }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
