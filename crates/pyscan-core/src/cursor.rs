//! Token cursor handed to rules.

use crate::lexer::Lexer;
use crate::token::{Token, TokenType};
use crate::types::{Recovery, RecoveryKind};
use tracing::debug;

/// Kind of block opened by an indented header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A function body (`def` on the header line).
    Function,
    /// A conditional branch (`if`, `elif` or `else` header).
    Conditional,
    /// Any other block.
    Other,
}

impl BlockKind {
    /// Classifies the first significant token of a line.
    fn from_line_head(token: &Token<'_>) -> Self {
        match token.kind {
            TokenType::Def => Self::Function,
            TokenType::If => Self::Conditional,
            TokenType::Identifier if matches!(token.text, "elif" | "else") => Self::Conditional,
            _ => Self::Other,
        }
    }
}

/// Single-token lookahead over a [`Lexer`].
///
/// The cursor owns its lexer exclusively. While advancing it keeps a block
/// stack in step with the `Indent`/`Dedent` markers, labelling every block
/// with the kind of the header line that opened it, so rules can ask how
/// deeply the current token is nested.
#[derive(Debug)]
pub struct TokenCursor<'src> {
    lexer: Lexer<'src>,
    current: Token<'src>,
    consumed: usize,
    held: bool,
    blocks: Vec<BlockKind>,
    /// Header kind of the line being scanned.
    line_head: Option<BlockKind>,
    /// Header kind of the last non-blank line, consumed by the next `Indent`.
    opener: Option<BlockKind>,
    recoveries: Vec<Recovery>,
}

impl<'src> TokenCursor<'src> {
    /// Creates a cursor positioned on the first token of `lexer`.
    #[must_use]
    pub fn new(lexer: Lexer<'src>) -> Self {
        let mut cursor = Self {
            lexer,
            current: Token::new(TokenType::EndOfInput, "", 1, 1),
            consumed: 0,
            held: false,
            blocks: Vec::new(),
            line_head: None,
            opener: None,
            recoveries: Vec::new(),
        };
        cursor.advance();
        cursor
    }

    /// Returns the lookahead token.
    #[must_use]
    pub fn current(&self) -> &Token<'src> {
        &self.current
    }

    /// Returns true once the lookahead is `EndOfInput`.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.current.kind == TokenType::EndOfInput
    }

    /// Number of tokens pulled from the lexer so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.consumed
    }

    /// Pulls the next token into the lookahead slot.
    ///
    /// At `EndOfInput` this is a no-op apart from the position counter.
    pub fn advance(&mut self) {
        let token = self.lexer.next_token();
        self.consumed += 1;
        self.track(&token);
        self.recoveries.extend(self.lexer.take_recoveries());
        self.current = token;
    }

    /// Advances while the lookahead is not one of `stops` and not `EndOfInput`.
    pub fn advance_until(&mut self, stops: &[TokenType]) {
        while !self.at_end() && !stops.contains(&self.current.kind) {
            self.advance();
        }
    }

    /// Asks the drive loop to dispatch the lookahead again instead of
    /// skipping it.
    ///
    /// Only honored when the calling rule has consumed at least one token.
    pub fn hold(&mut self) {
        self.held = true;
    }

    /// Clears and returns the hold flag.
    pub(crate) fn take_hold(&mut self) -> bool {
        std::mem::take(&mut self.held)
    }

    /// Records a locally recovered malformed construct at the lookahead.
    pub fn record_recovery(&mut self, kind: RecoveryKind) {
        let recovery = Recovery::new(kind, self.current.line, self.current.column);
        debug!(%recovery, "recovered from malformed construct");
        self.recoveries.push(recovery);
    }

    /// Number of blocks of any kind enclosing the lookahead, counted from
    /// the innermost enclosing function body (or the top level).
    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        self.blocks
            .iter()
            .rev()
            .take_while(|kind| **kind != BlockKind::Function)
            .count()
    }

    /// Like [`nesting_depth`](Self::nesting_depth), counting only
    /// `Conditional` blocks.
    #[must_use]
    pub fn conditional_depth(&self) -> usize {
        self.blocks
            .iter()
            .rev()
            .take_while(|kind| **kind != BlockKind::Function)
            .filter(|kind| **kind == BlockKind::Conditional)
            .count()
    }

    /// Kinds of the currently open blocks, outermost first.
    #[must_use]
    pub fn blocks(&self) -> &[BlockKind] {
        &self.blocks
    }

    /// Consumes the cursor, returning every recovery recorded during the scan.
    #[must_use]
    pub fn into_recoveries(self) -> Vec<Recovery> {
        self.recoveries
    }

    fn track(&mut self, token: &Token<'_>) {
        match token.kind {
            TokenType::Newline => {
                if let Some(head) = self.line_head.take() {
                    self.opener = Some(head);
                }
            }
            TokenType::Indent => {
                let kind = self.opener.take().unwrap_or(BlockKind::Other);
                self.blocks.push(kind);
            }
            TokenType::Dedent => {
                self.blocks.pop();
            }
            TokenType::EndOfInput => {}
            TokenType::Def => {
                // `async def`, decorated one-liners: `def` anywhere marks a function header.
                self.line_head = Some(BlockKind::Function);
            }
            _ => {
                if self.line_head.is_none() {
                    self.line_head = Some(BlockKind::from_line_head(token));
                }
            }
        }
    }
}
