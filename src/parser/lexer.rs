//! Lexer for brace templates using logos
//!
//! Only the markers are tokens; everything between them is a single text run.
//! Whether a `{` starts a placeholder or an escape is decided by the grammar.

use logos::Logos;

use super::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[regex(r"[^{}]+", |lex| lex.slice().to_string())]
    Text(String),
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
