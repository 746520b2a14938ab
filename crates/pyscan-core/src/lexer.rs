//! Indentation-aware, pull-based lexer.
//!
//! Tokens are produced on demand by [`Lexer::next_token`]. Block structure
//! is reported through `Indent` and `Dedent` markers computed from an
//! indentation stack:
//!
//! - a line indented deeper than the top of the stack pushes its width
//!   and yields one `Indent`
//! - a shallower line pops every wider entry, yielding one `Dedent` per pop
//! - blank and comment-only lines never touch the stack
//! - inside `()`, `[]` and `{}` line breaks are joined and not measured
//! - a dedent to a width no open block uses resumes at the enclosing block
//!   and keeps the line's width as an unmarked level, so its siblings stay
//!   in one block without an extra `Indent`
//!
//! A bracket still open when a line starting with `def` or `class` at
//! column 1 is reached, or at end of input, is abandoned and recorded as
//! [`RecoveryKind::UnclosedBracket`].
//!
//! Classification is byte-based and ASCII-only: identifiers are
//! `[A-Za-z_][A-Za-z0-9_]*`.

use crate::token::{Token, TokenType};
use crate::types::{Recovery, RecoveryKind};
use tracing::{debug, trace};

/// Column width a tab expands to unless configured otherwise.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Pull-based lexer over an in-memory source buffer.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: usize,
    column: usize,
    indent_stack: Vec<usize>,
    /// Widths on the stack that were pushed without an `Indent`.
    unmarked: Vec<usize>,
    tab_width: usize,
    at_line_start: bool,
    bracket_depth: usize,
    /// Line of the outermost open bracket.
    bracket_line: usize,
    pending_dedents: usize,
    finished: bool,
    recoveries: Vec<Recovery>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer with the default tab width.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_tab_width(source, DEFAULT_TAB_WIDTH)
    }

    /// Creates a lexer expanding tabs to the next multiple of `tab_width`.
    ///
    /// A width of zero is treated as one.
    #[must_use]
    pub fn with_tab_width(source: &'src str, tab_width: usize) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            indent_stack: vec![0],
            unmarked: Vec::new(),
            tab_width: tab_width.max(1),
            at_line_start: true,
            bracket_depth: 0,
            bracket_line: 0,
            pending_dedents: 0,
            finished: false,
            recoveries: Vec::new(),
        }
    }

    /// Returns the number of currently open indented blocks, counting only
    /// those announced with an `Indent`.
    #[must_use]
    pub fn indent_depth(&self) -> usize {
        self.indent_stack.len() - 1 - self.unmarked.len()
    }

    /// Returns every width on the indentation stack, outermost (always 0)
    /// first.
    #[must_use]
    pub fn indent_stack(&self) -> &[usize] {
        &self.indent_stack
    }

    /// Returns the recoveries recorded so far.
    #[must_use]
    pub fn recoveries(&self) -> &[Recovery] {
        &self.recoveries
    }

    /// Removes and returns the recoveries recorded so far.
    pub fn take_recoveries(&mut self) -> Vec<Recovery> {
        std::mem::take(&mut self.recoveries)
    }

    /// Collects every token up to and including `EndOfInput`.
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            tokens.push(token);
            if token.kind == TokenType::EndOfInput {
                return tokens;
            }
        }
    }

    /// Returns the next token.
    ///
    /// Once `EndOfInput` has been returned, every later call returns
    /// `EndOfInput` again.
    pub fn next_token(&mut self) -> Token<'src> {
        if self.finished {
            return self.marker(TokenType::EndOfInput);
        }

        loop {
            if self.pending_dedents > 0 {
                self.pending_dedents -= 1;
                return self.marker(TokenType::Dedent);
            }

            if self.at_line_start {
                self.at_line_start = false;
                if let Some(token) = self.measure_indentation() {
                    return token;
                }
                continue;
            }

            self.skip_trivia();

            let Some(byte) = self.peek() else {
                if self.bracket_depth > 0 {
                    self.abandon_brackets();
                }
                // Close every block still open before ending the stream.
                while self.indent_stack.len() > 1 {
                    if self.pop_level() {
                        return self.marker(TokenType::Dedent);
                    }
                }
                self.finished = true;
                return self.marker(TokenType::EndOfInput);
            };

            if byte == b'\n' {
                let token = self.single(TokenType::Newline);
                if self.bracket_depth > 0 {
                    if !self.at_statement_keyword() {
                        continue;
                    }
                    self.abandon_brackets();
                }
                self.at_line_start = true;
                return token;
            }

            return self.lex_token(byte);
        }
    }

    fn lex_token(&mut self, byte: u8) -> Token<'src> {
        match byte {
            b if is_letter(b) => self.word(),
            b if b.is_ascii_digit() => self.number(),
            b'"' | b'\'' => self.string(byte),
            b':' => self.single(TokenType::Colon),
            b'(' | b'[' | b'{' => {
                if self.bracket_depth == 0 {
                    self.bracket_line = self.line;
                }
                self.bracket_depth += 1;
                self.single(TokenType::Symbol)
            }
            b')' | b']' | b'}' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                self.single(TokenType::Symbol)
            }
            _ => self.symbol(),
        }
    }

    /// Measures leading whitespace and compares it with the stack top.
    fn measure_indentation(&mut self) -> Option<Token<'src>> {
        let start = self.pos;
        let mut width = 0;

        while let Some(byte) = self.peek() {
            match byte {
                b' ' => width += 1,
                b'\t' => width += self.tab_width - width % self.tab_width,
                b'\x0c' => width = 0,
                b'\r' => {}
                _ => break,
            }
            self.bump();
        }

        if matches!(self.peek(), None | Some(b'\n' | b'#')) {
            return None;
        }

        let top = self.current_indent();

        if width > top {
            self.indent_stack.push(width);
            trace!(line = self.line, width, "indent");
            return Some(Token::new(
                TokenType::Indent,
                &self.source[start..self.pos],
                self.line,
                self.column,
            ));
        }

        if width < top {
            let mut closed = 0;
            while self.current_indent() > width {
                if self.pop_level() {
                    closed += 1;
                }
            }

            let resumed_at = self.current_indent();
            if resumed_at != width {
                self.recover(RecoveryKind::InconsistentDedent { width, resumed_at });
                self.indent_stack.push(width);
                self.unmarked.push(width);
            }

            trace!(line = self.line, width, closed, "dedent");
            if closed == 0 {
                return None;
            }
            self.pending_dedents = closed - 1;
            return Some(self.marker(TokenType::Dedent));
        }

        None
    }

    fn skip_trivia(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' | b'\x0c' => self.bump(),
                b'#' => {
                    while self.peek().is_some_and(|b| b != b'\n') {
                        self.bump();
                    }
                }
                b'\\' if self.peek_at(1) == Some(b'\n') => self.bump_n(2),
                b'\\' if self.peek_at(1) == Some(b'\r') && self.peek_at(2) == Some(b'\n') => {
                    self.bump_n(3);
                }
                _ => break,
            }
        }
    }

    fn word(&mut self) -> Token<'src> {
        let (start, line, column) = (self.pos, self.line, self.column);
        while self.peek().is_some_and(|b| is_letter(b) || b.is_ascii_digit()) {
            self.bump();
        }
        let text = &self.source[start..self.pos];
        Token::new(TokenType::from_word(text), text, line, column)
    }

    fn number(&mut self) -> Token<'src> {
        let (start, line, column) = (self.pos, self.line, self.column);
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
        {
            self.bump();
        }
        Token::new(
            TokenType::Number,
            &self.source[start..self.pos],
            line,
            column,
        )
    }

    fn string(&mut self, quote: u8) -> Token<'src> {
        let (start, line, column) = (self.pos, self.line, self.column);

        if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
            self.bump_n(3);
            loop {
                match self.peek() {
                    None => break,
                    Some(b'\\') => self.bump_n(2),
                    Some(b)
                        if b == quote
                            && self.peek_at(1) == Some(quote)
                            && self.peek_at(2) == Some(quote) =>
                    {
                        self.bump_n(3);
                        break;
                    }
                    Some(_) => self.bump(),
                }
            }
        } else {
            self.bump();
            loop {
                match self.peek() {
                    None | Some(b'\n') => break,
                    Some(b'\\') => self.bump_n(2),
                    Some(b) if b == quote => {
                        self.bump();
                        break;
                    }
                    Some(_) => self.bump(),
                }
            }
        }

        Token::new(
            TokenType::String,
            &self.source[start..self.pos],
            line,
            column,
        )
    }

    /// Consumes one full character as a `Symbol`.
    fn symbol(&mut self) -> Token<'src> {
        let (start, line, column) = (self.pos, self.line, self.column);
        let len = self
            .source
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .map_or(1, char::len_utf8);
        self.bump_n(len);
        Token::new(
            TokenType::Symbol,
            &self.source[start..self.pos],
            line,
            column,
        )
    }

    fn single(&mut self, kind: TokenType) -> Token<'src> {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.bump();
        Token::new(kind, &self.source[start..self.pos], line, column)
    }

    fn marker(&self, kind: TokenType) -> Token<'src> {
        Token::new(kind, "", self.line, self.column)
    }

    fn recover(&mut self, kind: RecoveryKind) {
        let recovery = Recovery::new(kind, self.line, self.column);
        debug!(%recovery, "recovered from malformed layout");
        self.recoveries.push(recovery);
    }

    /// Gives up on every open bracket so line structure is measured again.
    fn abandon_brackets(&mut self) {
        self.bracket_depth = 0;
        self.recover(RecoveryKind::UnclosedBracket {
            opened_at: self.bracket_line,
        });
    }

    /// True if the position starts a `def` or `class` statement at column 1.
    /// Neither can appear inside brackets, so an open bracket there is stale.
    fn at_statement_keyword(&self) -> bool {
        let rest = self.bytes.get(self.pos..).unwrap_or_default();
        ["def", "class"].iter().any(|keyword| {
            rest.starts_with(keyword.as_bytes())
                && rest
                    .get(keyword.len())
                    .map_or(true, |b| !is_letter(*b) && !b.is_ascii_digit())
        })
    }

    /// Pops the top level. Returns true if it was announced with an `Indent`.
    fn pop_level(&mut self) -> bool {
        let width = self.indent_stack.pop();
        if width.is_some() && width == self.unmarked.last().copied() {
            self.unmarked.pop();
            return false;
        }
        true
    }

    fn current_indent(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    /// Advances one byte, keeping line and character column current.
    fn bump(&mut self) {
        let Some(byte) = self.peek() else {
            return;
        };
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if byte & 0xC0 != 0x80 {
            self.column += 1;
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    /// Yields tokens up to, but not including, `EndOfInput`.
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenType::EndOfInput).then_some(token)
    }
}

fn is_letter(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenType::*;

    fn kinds(source: &str) -> Vec<TokenType> {
        Lexer::new(source).tokenize().iter().map(|t| t.kind).collect()
    }

    fn count(source: &str, kind: TokenType) -> usize {
        kinds(source).into_iter().filter(|k| *k == kind).count()
    }

    #[test]
    fn empty_source_is_end_of_input() {
        assert_eq!(kinds(""), vec![EndOfInput]);
    }

    #[test]
    fn end_of_input_is_idempotent() {
        let mut lexer = Lexer::new("if x:\n    y\n");
        while lexer.next_token().kind != EndOfInput {}
        for _ in 0..5 {
            assert_eq!(lexer.next_token().kind, EndOfInput);
        }
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn maximal_munch_keeps_keyword_prefixed_words_whole() {
        let tokens = Lexer::new("definitely = 1").tokenize();
        assert_eq!(tokens[0].kind, Identifier);
        assert_eq!(tokens[0].text, "definitely");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![Identifier, Symbol, Number, EndOfInput]
        );
        assert_eq!(kinds("iffy if_ if"), vec![Identifier, Identifier, If, EndOfInput]);
    }

    #[test]
    fn uppercase_letters_and_underscores_are_identifier_characters() {
        let tokens = Lexer::new("MaxValue_2 _Private").tokenize();
        assert_eq!(tokens[0].text, "MaxValue_2");
        assert_eq!(tokens[1].text, "_Private");
        assert_eq!(tokens[1].kind, Identifier);
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = Lexer::new("def  foo(a):\n  x").tokenize();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 6));
        let newline = tokens.iter().find(|t| t.kind == Newline).map(|t| (t.line, t.column));
        assert_eq!(newline, Some((1, 13)));
        let x = tokens.iter().find(|t| t.text == "x").map(|t| (t.line, t.column));
        assert_eq!(x, Some((2, 3)));
    }

    #[test]
    fn emits_indent_and_dedent_around_blocks() {
        assert_eq!(
            kinds("if a:\n    b\nc\n"),
            vec![
                If, Identifier, Colon, Newline, Indent, Identifier, Newline, Dedent, Identifier,
                Newline, EndOfInput
            ]
        );
    }

    #[test]
    fn end_of_input_closes_open_blocks() {
        assert_eq!(
            kinds("if a:\n    if b:\n        c"),
            vec![
                If, Identifier, Colon, Newline, Indent, If, Identifier, Colon, Newline, Indent,
                Identifier, Dedent, Dedent, EndOfInput
            ]
        );
    }

    #[test]
    fn one_dedent_per_closed_block() {
        let source = "if a:\n  if b:\n    if c:\n      d\ne\n";
        let tokens = kinds(source);
        let e = tokens.iter().rposition(|k| *k == Identifier);
        assert_eq!(e.map(|i| &tokens[i - 3..i]), Some(&[Dedent, Dedent, Dedent][..]));
    }

    #[test]
    fn blank_and_comment_lines_do_not_change_indentation() {
        assert_eq!(
            kinds("if a:\n\n    # note\n    b\n"),
            vec![
                If, Identifier, Colon, Newline, Newline, Newline, Indent, Identifier, Newline,
                Dedent, EndOfInput
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("x # def f(a, b):\n"), vec![Identifier, Newline, EndOfInput]);
    }

    #[test]
    fn tabs_expand_to_the_next_tab_stop() {
        // A tab and eight spaces are the same block.
        assert_eq!(count("if a:\n\tb\n        c\n", Indent), 1);
        assert_eq!(count("if a:\n\tb\n        c\n", Dedent), 1);

        let lexer = Lexer::with_tab_width("if a:\n\tb\n    c\n", 4);
        let tokens = lexer.tokenize();
        assert_eq!(tokens.iter().filter(|t| t.kind == Indent).count(), 1);

        // Two spaces then a tab still reach column 8.
        assert_eq!(count("if a:\n  \tb\n        c\n", Indent), 1);
    }

    #[test]
    fn inconsistent_dedent_resyncs_to_enclosing_width() {
        let mut lexer = Lexer::new("if a:\n    b\n  c\n");
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            tokens.push(token.kind);
            if token.kind == EndOfInput {
                break;
            }
        }

        assert_eq!(
            tokens,
            vec![
                If, Identifier, Colon, Newline, Indent, Identifier, Newline, Dedent, Identifier,
                Newline, EndOfInput
            ]
        );
        assert_eq!(
            lexer.recoveries(),
            &[Recovery::new(
                RecoveryKind::InconsistentDedent {
                    width: 2,
                    resumed_at: 0
                },
                3,
                3
            )]
        );
        assert_eq!(lexer.indent_depth(), 0);
    }

    #[test]
    fn take_recoveries_drains() {
        let mut lexer = Lexer::new("if a:\n        b\n    c\n");
        while lexer.next_token().kind != EndOfInput {}
        assert_eq!(lexer.take_recoveries().len(), 1);
        assert!(lexer.recoveries().is_empty());
    }

    #[test]
    fn misaligned_siblings_share_one_block() {
        let mut lexer = Lexer::new("if a:\n        b\n    c\n    d\ne\n");
        let tokens: Vec<TokenType> = lexer.by_ref().map(|t| t.kind).collect();

        assert_eq!(
            tokens,
            vec![
                If, Identifier, Colon, Newline, Indent, Identifier, Newline, Dedent, Identifier,
                Newline, Identifier, Newline, Identifier, Newline
            ]
        );
        assert_eq!(lexer.recoveries().len(), 1);
        assert_eq!(lexer.indent_depth(), 0);
        assert_eq!(lexer.indent_stack(), &[0]);
    }

    #[test]
    fn deeper_line_under_misaligned_level_still_indents() {
        let source = "if a:\n        b\n    if c:\n        d\ne\n";
        assert_eq!(count(source, Indent), 2);
        assert_eq!(count(source, Dedent), 2);
    }

    #[test]
    fn unclosed_bracket_resyncs_at_next_def() {
        let mut lexer = Lexer::new("x = foo(1\ndef g(a):\n    if a:\n        pass\n");
        let tokens: Vec<Token<'_>> = lexer.by_ref().collect();

        let kinds: Vec<TokenType> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds.iter().filter(|k| **k == Indent).count(), 2);
        assert_eq!(kinds.iter().filter(|k| **k == Dedent).count(), 2);
        let def = tokens.iter().find(|t| t.kind == Def).map(|t| (t.line, t.column));
        assert_eq!(def, Some((2, 1)));
        assert_eq!(
            lexer.recoveries(),
            &[Recovery::new(RecoveryKind::UnclosedBracket { opened_at: 1 }, 2, 1)]
        );
    }

    #[test]
    fn unclosed_bracket_is_recorded_at_end_of_input() {
        let mut lexer = Lexer::new("x = [1,\n  2,\n");
        while lexer.next_token().kind != EndOfInput {}
        assert_eq!(
            lexer.recoveries(),
            &[Recovery::new(RecoveryKind::UnclosedBracket { opened_at: 1 }, 3, 1)]
        );
    }

    #[test]
    fn keyword_prefix_inside_brackets_keeps_joining() {
        // `default` only starts with the keyword.
        let mut lexer = Lexer::new("f(a,\ndefault=1)\n");
        assert_eq!(count("f(a,\ndefault=1)\n", Newline), 1);
        while lexer.next_token().kind != EndOfInput {}
        assert!(lexer.recoveries().is_empty());
    }

    #[test]
    fn newlines_inside_brackets_are_joined() {
        assert_eq!(
            kinds("def f(a,\n      b):\n    pass\n"),
            vec![
                Def, Identifier, Symbol, Identifier, Symbol, Identifier, Symbol, Colon, Newline,
                Indent, Identifier, Newline, Dedent, EndOfInput
            ]
        );
    }

    #[test]
    fn backslash_joins_lines() {
        assert_eq!(
            kinds("x = a \\\n    + b\n"),
            vec![Identifier, Symbol, Identifier, Symbol, Identifier, Newline, EndOfInput]
        );
    }

    #[test]
    fn backslash_joins_crlf_lines() {
        assert_eq!(
            kinds("x = a \\\r\n    + b\r\n"),
            vec![Identifier, Symbol, Identifier, Symbol, Identifier, Newline, EndOfInput]
        );
    }

    #[test]
    fn string_literals_hide_keywords() {
        assert_eq!(
            kinds("x = 'def if:'\n"),
            vec![Identifier, Symbol, String, Newline, EndOfInput]
        );
        let tokens = Lexer::new(r#"s = "a \" b""#).tokenize();
        assert_eq!(tokens[2].text, r#""a \" b""#);
    }

    #[test]
    fn triple_quoted_strings_span_lines() {
        let tokens = Lexer::new("s = \"\"\"a\ndef b:\n\"\"\"\nif c:\n    d\n").tokenize();
        assert_eq!(tokens[2].kind, String);
        assert_eq!(tokens[2].text, "\"\"\"a\ndef b:\n\"\"\"");
        assert!(tokens.iter().all(|t| t.kind != Def));

        let if_token = tokens.iter().find(|t| t.kind == If).map(|t| t.line);
        assert_eq!(if_token, Some(4));
    }

    #[test]
    fn unterminated_string_stops_at_line_end() {
        assert_eq!(
            kinds("x = 'oops\ny\n"),
            vec![Identifier, Symbol, String, Newline, Identifier, Newline, EndOfInput]
        );
    }

    #[test]
    fn non_ascii_characters_become_symbols() {
        let tokens = Lexer::new("é = 1").tokenize();
        assert_eq!(tokens[0].kind, Symbol);
        assert_eq!(tokens[0].text, "é");
        assert_eq!(tokens[1].column, 3);
    }

    #[test]
    fn indent_and_dedent_balance() {
        let sources = [
            "def f(a):\n    if a:\n        if b:\n            pass\n    return a\n",
            "class C:\n    def m(self):\n        pass\n\n    def n(self):\n        if x:\n            y\n",
            "if a:\n\tif b:\n\t\tc\n\td\ne\n",
            "x = 1\n",
            "if a:\n    b",
        ];
        for source in sources {
            assert_eq!(count(source, Indent), count(source, Dedent), "{source:?}");
        }
    }

    #[test]
    fn renders_token_stream() {
        let rendered = Lexer::new("def f(a):\n    if a:\n        pass\n")
            .tokenize()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        insta::assert_snapshot!(rendered, @"Def(def) Identifier(f) Symbol(() Identifier(a) Symbol()) Colon(:) Newline Indent If(if) Identifier(a) Colon(:) Newline Indent Identifier(pass) Newline Dedent Dedent EndOfInput");
    }
}
