//! Token model produced by the [`Lexer`](crate::Lexer).

use serde::{Deserialize, Serialize};

/// Classification of a lexical unit.
///
/// `Indent` and `Dedent` are structural markers derived from comparing
/// indentation widths; they have no literal character of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// The `def` keyword.
    Def,
    /// The `if` keyword.
    If,
    /// A word that is not a keyword.
    Identifier,
    /// `:`
    Colon,
    /// A run of digits.
    Number,
    /// A quoted string literal, single- or triple-quoted.
    String,
    /// Any other single character.
    Symbol,
    /// A block opened by deeper indentation.
    Indent,
    /// A block closed by shallower indentation.
    Dedent,
    /// A significant line break.
    Newline,
    /// End of the source buffer. Terminal.
    EndOfInput,
}

impl TokenType {
    /// Classifies a maximal word run against the keyword set.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        match word {
            "def" => Self::Def,
            "if" => Self::If,
            _ => Self::Identifier,
        }
    }

    /// Returns true for tokens that carry no source characters.
    #[must_use]
    pub fn is_marker(self) -> bool {
        matches!(self, Self::Indent | Self::Dedent | Self::EndOfInput)
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Def => "Def",
            Self::If => "If",
            Self::Identifier => "Identifier",
            Self::Colon => "Colon",
            Self::Number => "Number",
            Self::String => "String",
            Self::Symbol => "Symbol",
            Self::Indent => "Indent",
            Self::Dedent => "Dedent",
            Self::Newline => "Newline",
            Self::EndOfInput => "EndOfInput",
        };
        f.write_str(name)
    }
}

/// A position-annotated slice of the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Token classification.
    pub kind: TokenType,
    /// Source text (empty for `Dedent` and `EndOfInput`).
    pub text: &'src str,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl<'src> Token<'src> {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenType, text: &'src str, line: usize, column: usize) -> Self {
        Self {
            kind,
            text,
            line,
            column,
        }
    }

    /// Returns true if this token has the given type.
    #[must_use]
    pub fn is(&self, kind: TokenType) -> bool {
        self.kind == kind
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind.is_marker() || self.kind == TokenType::Newline {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_keywords_after_munch() {
        assert_eq!(TokenType::from_word("def"), TokenType::Def);
        assert_eq!(TokenType::from_word("if"), TokenType::If);
        assert_eq!(TokenType::from_word("definitely"), TokenType::Identifier);
        assert_eq!(TokenType::from_word("iffy"), TokenType::Identifier);
        assert_eq!(TokenType::from_word("Def"), TokenType::Identifier);
    }

    #[test]
    fn display_omits_text_for_markers() {
        assert_eq!(Token::new(TokenType::Dedent, "", 3, 1).to_string(), "Dedent");
        assert_eq!(Token::new(TokenType::Newline, "\n", 1, 5).to_string(), "Newline");
        assert_eq!(
            Token::new(TokenType::Identifier, "spam", 1, 1).to_string(),
            "Identifier(spam)"
        );
    }
}
