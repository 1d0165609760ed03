//! Percent-style templates: `%s`, `%-10r`, `%(name).3s`, `%%`
//!
//! Directives are lexed with logos and lowered onto the same [`Template`] model the
//! brace syntax uses, so both render through one code path.

use logos::Logos;

use crate::error::RenderError;
use crate::parser::ast::{
    Align, Conversion, Field, FormatSpec, Placeholder, Span, Syntax, Template, TemplateBuilder,
    MAX_SPEC_NUMBER,
};

/// A single `%` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// `%(key)s` reads a named binding, otherwise the next positional one
    pub key: Option<String>,
    /// `-` flag
    pub left: bool,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub conversion: Conversion,
}

impl Directive {
    /// Parse the text of one directive, `%` included
    fn parse(slice: &str) -> Option<Directive> {
        let mut rest = slice.strip_prefix('%')?;

        let mut key = None;
        if let Some(after) = rest.strip_prefix('(') {
            let close = after.find(')')?;
            key = Some(after[..close].to_string());
            rest = &after[close + 1..];
        }

        let left = rest.starts_with('-');
        if left {
            rest = &rest[1..];
        }

        let (width, after_width) = split_number(rest);
        rest = after_width;

        let mut precision = None;
        if let Some(after) = rest.strip_prefix('.') {
            let (digits, after_digits) = split_number(after);
            precision = digits;
            rest = after_digits;
        }

        let mut chars = rest.chars();
        let flag = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        Some(Directive {
            key,
            left,
            width,
            precision,
            conversion: Conversion::from_flag(flag)?,
        })
    }
}

/// Split leading ASCII digits off `s`, saturating at `usize::MAX`
fn split_number(s: &str) -> (Option<usize>, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return (None, s);
    }
    let n = s[..end].parse().unwrap_or(usize::MAX);
    (Some(n), &s[end..])
}

fn check_bound(value: Option<usize>, what: &str, span: &Span) -> Result<(), RenderError> {
    match value {
        Some(n) if n > MAX_SPEC_NUMBER => Err(RenderError::malformed(
            span.clone(),
            format!("{} in '%' directive is too large (at most {})", what, MAX_SPEC_NUMBER),
        )),
        _ => Ok(()),
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum PercentToken {
    #[token("%%")]
    Escaped,

    #[regex(r"%(\([^)]*\))?-?[0-9]*(\.[0-9]+)?[sra]", |lex| Directive::parse(lex.slice()))]
    Directive(Directive),

    #[regex(r"[^%]+", |lex| lex.slice().to_string())]
    Text(String),
}

/// Parse percent-style template source into a [`Template`]
pub fn parse_percent(input: &str) -> Result<Template, RenderError> {
    let mut builder = TemplateBuilder::new(Syntax::Percent);
    let mut next_index = 0;

    for (token, span) in PercentToken::lexer(input).spanned() {
        match token {
            Ok(PercentToken::Text(text)) => builder.push_str(&text),
            Ok(PercentToken::Escaped) => builder.push_char('%'),
            Ok(PercentToken::Directive(directive)) => {
                check_bound(directive.width, "width", &span)?;
                check_bound(directive.precision, "precision", &span)?;
                let placeholder = match directive.key {
                    Some(key) => Placeholder::Named(key),
                    None => {
                        next_index += 1;
                        Placeholder::Positional(next_index - 1)
                    }
                };
                builder.push_field(Field {
                    placeholder,
                    accessors: Vec::new(),
                    conversion: Some(directive.conversion),
                    spec: FormatSpec {
                        fill: None,
                        align: Some(if directive.left { Align::Left } else { Align::Right }),
                        zero: false,
                        width: directive.width,
                        precision: directive.precision,
                    },
                    span,
                });
            }
            Err(()) => {
                return Err(RenderError::malformed(
                    span,
                    "incomplete or unsupported '%' directive; write '%%' for a literal percent sign",
                ));
            }
        }
    }

    Ok(builder.finish())
}
