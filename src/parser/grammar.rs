//! Brace template parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::RenderError;
use crate::parser::ast::{Field, Placeholder, Span, Syntax, Template, TemplateBuilder};
use crate::parser::field::{parse_field, ArgName};
use crate::parser::lexer::Token;

/// How a placeholder ended
#[derive(Debug, Clone, PartialEq)]
enum Close {
    Closed,
    /// Another `{` appeared before the closing `}`
    Nested(Span),
    /// Input ended first
    Missing,
}

/// Token-level structure before placeholder bodies are parsed
#[derive(Debug, Clone, PartialEq)]
enum RawSegment {
    Text(String),
    Escaped(char),
    Field {
        body: Option<(String, Span)>,
        close: Close,
        span: Span,
    },
    StrayClose(Span),
}

/// Numbering mode seen so far; `{}` and `{0}` cannot be mixed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Unset,
    Auto(usize),
    Manual,
}

/// Parse brace template source into a [`Template`]
pub fn parse(input: &str) -> Result<Template, RenderError> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let raw = segments_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => RenderError::from(err),
            None => RenderError::malformed(0..len, "template could not be parsed"),
        })?;

    build_template(raw)
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn segments_parser<'a, I>() -> impl Parser<'a, I, Vec<RawSegment>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let text = select! {
        Token::Text(s) => RawSegment::Text(s),
    };

    // Doubled markers are escapes wherever a placeholder is not open
    let escaped_open = just(Token::LBrace)
        .then(just(Token::LBrace))
        .to(RawSegment::Escaped('{'));
    let escaped_close = just(Token::RBrace)
        .then(just(Token::RBrace))
        .to(RawSegment::Escaped('}'));

    let body = select! {
        Token::Text(s) => s,
    }
    .map_with(|s, e| (s, span_range(&e.span())));

    // A placeholder ends at the first '}'
    let close = choice((
        just(Token::RBrace).to(Close::Closed),
        just(Token::LBrace).map_with(|_, e| Close::Nested(span_range(&e.span()))),
        end().to(Close::Missing),
    ));

    let field = just(Token::LBrace)
        .ignore_then(body.or_not())
        .then(close)
        .map_with(|(body, close), e| RawSegment::Field {
            body,
            close,
            span: span_range(&e.span()),
        });

    let stray_close =
        just(Token::RBrace).map_with(|_, e| RawSegment::StrayClose(span_range(&e.span())));

    choice((text, escaped_open, escaped_close, field, stray_close))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

fn build_template(raw: Vec<RawSegment>) -> Result<Template, RenderError> {
    let mut builder = TemplateBuilder::new(Syntax::Brace);
    let mut numbering = Numbering::Unset;

    for segment in raw {
        match segment {
            RawSegment::Text(text) => builder.push_str(&text),
            RawSegment::Escaped(c) => builder.push_char(c),
            RawSegment::StrayClose(span) => {
                return Err(RenderError::malformed(
                    span,
                    "single '}' outside a placeholder; write '}}' for a literal brace",
                ));
            }
            RawSegment::Field { body, close, span } => {
                match close {
                    Close::Closed => {}
                    Close::Nested(inner) => {
                        return Err(RenderError::malformed(
                            inner,
                            "'{' inside a placeholder; nested placeholders are not supported",
                        ));
                    }
                    Close::Missing => {
                        return Err(RenderError::malformed(span, "'{' is never closed"));
                    }
                }

                let (text, offset) = match body {
                    Some((text, body_span)) => (text, body_span.start),
                    None => (String::new(), span.start + 1),
                };
                let parsed = parse_field(&text, offset)?;
                let placeholder = assign_number(parsed.arg, &mut numbering, &span)?;

                builder.push_field(Field {
                    placeholder,
                    accessors: parsed.accessors,
                    conversion: parsed.conversion,
                    spec: parsed.spec,
                    span,
                });
            }
        }
    }

    Ok(builder.finish())
}

fn assign_number(
    arg: ArgName,
    numbering: &mut Numbering,
    span: &Span,
) -> Result<Placeholder, RenderError> {
    match arg {
        ArgName::Name(name) => Ok(Placeholder::Named(name)),
        ArgName::Auto => match *numbering {
            Numbering::Manual => Err(RenderError::malformed(
                span.clone(),
                "cannot switch from manual field numbering to automatic numbering",
            )),
            Numbering::Unset => {
                *numbering = Numbering::Auto(1);
                Ok(Placeholder::Positional(0))
            }
            Numbering::Auto(next) => {
                *numbering = Numbering::Auto(next + 1);
                Ok(Placeholder::Positional(next))
            }
        },
        ArgName::Index(index) => match *numbering {
            Numbering::Auto(_) => Err(RenderError::malformed(
                span.clone(),
                "cannot switch from automatic field numbering to manual numbering",
            )),
            _ => {
                *numbering = Numbering::Manual;
                Ok(Placeholder::Positional(index))
            }
        },
    }
}
