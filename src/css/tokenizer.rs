//! logos-based stylesheet tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins
//! 2. For equal length matches, earlier-defined variants win
//!
//! Our ordering ensures:
//! - `{self.onClick}` matches [`Token::Binding`], not `BraceOpen` + idents
//!   (a binding contains no whitespace, which is what separates it from a
//!   declaration block opener)
//! - `pack-fill` matches a single [`Token::Ident`]

use logos::Logos;

/// Stylesheet token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// Data-binding expression used as a declaration value: `{self.items.0}`.
    #[regex(r"\{[a-zA-Z_][a-zA-Z0-9_.]*\}")]
    Binding,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Number: integer or float, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: property names, selector names, keyword values.
    /// Hyphens are allowed so `pack-fill` and `text-anchor` lex as one token.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    // ── Single-character punctuation ─────────────────────────────────

    /// `{`
    #[token("{")]
    BraceOpen,

    /// `}`
    #[token("}")]
    BraceClose,

    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,

    /// `#`
    #[token("#")]
    Hash,

    /// `*`
    #[token("*")]
    Star,

    /// `>`
    #[token(">")]
    GreaterThan,
}

/// Tokenize a stylesheet string into `(Token, text)` pairs.
///
/// Tokens that fail to lex are skipped.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}
