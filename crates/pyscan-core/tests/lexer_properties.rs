//! Integration test: stream-level properties of the lexer, observed through
//! the public API only.

use pyscan_core::{Lexer, RecoveryKind, TokenType};

fn count(source: &str, kind: TokenType) -> usize {
    Lexer::new(source).filter(|t| t.kind == kind).count()
}

// ── End of stream ──

#[test]
fn end_of_input_repeats_forever() {
    for source in ["", "x", "def f(a):\n    if a:\n        pass", "\n\n\n"] {
        let mut lexer = Lexer::new(source);
        let mut guard = 0;
        while lexer.next_token().kind != TokenType::EndOfInput {
            guard += 1;
            assert!(guard < 1_000, "lexer did not terminate on {source:?}");
        }
        for _ in 0..3 {
            assert_eq!(lexer.next_token().kind, TokenType::EndOfInput);
        }
    }
}

#[test]
fn cursor_never_moves_backward() {
    let source = "def f(a, b):\n    if a:\n        return b\n    return a\n";
    let mut last = (0, 0);
    for token in Lexer::new(source) {
        let here = (token.line, token.column);
        assert!(here >= last, "{token:?} went backward from {last:?}");
        last = here;
    }
}

// ── Indentation ──

#[test]
fn well_formed_nesting_balances_indent_and_dedent() {
    let source = "\
class Shape:
    def area(self):
        if self.kind:
            if self.sides:
                return 1

        return 0

    def name(self):
        return 'shape'

def main():
    pass
";
    assert_eq!(count(source, TokenType::Indent), 6);
    assert_eq!(count(source, TokenType::Dedent), 6);
}

#[test]
fn depth_returns_to_zero_at_end() {
    let mut lexer = Lexer::new("if a:\n    if b:\n        c\n");
    while lexer.next_token().kind != TokenType::EndOfInput {}
    assert_eq!(lexer.indent_depth(), 0);
    assert_eq!(lexer.indent_stack(), &[0]);
}

#[test]
fn mismatched_dedent_is_recorded_not_fatal() {
    let mut lexer = Lexer::new("def f():\n        a\n    b\nc\n");
    let tokens: Vec<TokenType> = lexer.by_ref().map(|t| t.kind).collect();

    assert!(tokens.contains(&TokenType::Identifier));
    assert_eq!(lexer.recoveries().len(), 1);
    assert_eq!(
        lexer.recoveries()[0].kind,
        RecoveryKind::InconsistentDedent {
            width: 4,
            resumed_at: 0
        }
    );
    let indents = tokens.iter().filter(|k| **k == TokenType::Indent).count();
    let dedents = tokens.iter().filter(|k| **k == TokenType::Dedent).count();
    assert_eq!(indents, dedents);
}
