//! Parsers for brace and percent templates

pub mod ast;
mod field;
mod grammar;
pub mod lexer;
mod percent;

pub use ast::*;
pub use grammar::parse;
pub use percent::{parse_percent, Directive, PercentToken};
