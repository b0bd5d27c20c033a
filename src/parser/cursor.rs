use std::collections::VecDeque;

use crate::{lexer::tokens::Token, CodePosition};

/// A snapshot of a cursor, used to undo speculative parses.
#[derive(Debug, Clone)]
pub struct CursorState {
    pos: usize,
    injected: VecDeque<Token>,
    last_position: CodePosition,
}

/// Index based cursor over an immutable token list.
///
/// Tokens produced while parsing (e.g. the parts of a split `&name` identifier)
/// are injected in front of the remaining tokens instead of mutating the list.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
    injected: VecDeque<Token>,
    last_position: CodePosition,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenCursor {
            tokens,
            pos: 0,
            injected: VecDeque::new(),
            last_position: CodePosition::EMPTY,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> Option<&Token> {
        self.nth_token(0)
    }

    /// Returns the token `n` positions ahead of the current one.
    pub fn nth_token(&self, n: usize) -> Option<&Token> {
        if n < self.injected.len() {
            return self.injected.get(n);
        }

        self.tokens.get(self.pos + n - self.injected.len())
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Option<Token> {
        let token = match self.injected.pop_front() {
            Some(token) => Some(token),
            None => {
                let token = self.tokens.get(self.pos).cloned();
                if token.is_some() {
                    self.pos += 1;
                }
                token
            }
        };

        if let Some(token) = &token {
            self.last_position = token.position;
        }
        token
    }

    /// Puts `tokens` in front of the remaining tokens, keeping their order.
    pub fn inject(&mut self, tokens: Vec<Token>) {
        for token in tokens.into_iter().rev() {
            self.injected.push_front(token);
        }
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token().is_some()
    }

    pub fn save(&self) -> CursorState {
        CursorState {
            pos: self.pos,
            injected: self.injected.clone(),
            last_position: self.last_position,
        }
    }

    pub fn restore(&mut self, state: CursorState) {
        self.pos = state.pos;
        self.injected = state.injected;
        self.last_position = state.last_position;
    }

    /// Position of the most recently consumed token.
    pub fn last_position(&self) -> CodePosition {
        self.last_position
    }
}
