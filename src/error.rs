//! Error types for parsing and rendering templates

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors reported by a render call
///
/// Both kinds carry the span of the offending part of the template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A placeholder refers to something the bindings do not provide
    #[error("missing binding for `{placeholder}`: {message}")]
    MissingBinding {
        placeholder: String,
        span: Span,
        message: String,
    },

    /// The template itself is not well formed
    #[error("malformed template at {span:?}: {message}")]
    MalformedTemplate { span: Span, message: String },
}

impl RenderError {
    pub fn malformed(span: Span, message: impl Into<String>) -> Self {
        RenderError::MalformedTemplate {
            span,
            message: message.into(),
        }
    }

    pub fn missing(placeholder: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        RenderError::MissingBinding {
            placeholder: placeholder.into(),
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            RenderError::MissingBinding { span, .. } | RenderError::MalformedTemplate { span, .. } => {
                span
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RenderError::MissingBinding { message, .. }
            | RenderError::MalformedTemplate { message, .. } => message,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        self.format_with(source, filename, true)
    }

    /// Like [`RenderError::format`] but without ANSI colors
    pub fn format_plain(&self, source: &str, filename: &str) -> String {
        self.format_with(source, filename, false)
    }

    fn format_with(&self, source: &str, filename: &str, color: bool) -> String {
        let title = match self {
            RenderError::MissingBinding { placeholder, .. } => {
                format!("missing binding for `{}`", placeholder)
            }
            RenderError::MalformedTemplate { .. } => "malformed template".to_string(),
        };
        let span = self.span().clone();

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(color))
            .with_message(title)
            .with_label(
                Label::new((filename, span))
                    .with_message(self.message())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match (written, String::from_utf8(buf)) {
            (Ok(()), Ok(report)) => report,
            _ => format!("{}: {}\n", filename, self),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::parser::lexer::Token>> for RenderError {
    fn from(err: chumsky::error::Rich<'a, crate::parser::lexer::Token>) -> Self {
        use crate::parser::lexer::Token;
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::Custom(msg) => msg.to_string(),
            _ => match err.found() {
                Some(Token::LBrace) => "unexpected '{'".to_string(),
                Some(Token::RBrace) => "unexpected '}'".to_string(),
                Some(Token::Text(text)) => format!("unexpected text {:?}", text),
                None => "unexpected end of template".to_string(),
            },
        };

        RenderError::malformed(err.span().into_range(), message)
    }
}

/// Convert an error from the placeholder parser, whose spans are relative to the
/// placeholder body starting at `offset`
pub(crate) fn from_field_error(err: chumsky::error::Rich<'_, char>, offset: usize) -> RenderError {
    use chumsky::error::RichReason;

    let message = match err.reason() {
        RichReason::Custom(msg) => msg.to_string(),
        _ => match err.found() {
            Some(c) => format!("unexpected '{}' in placeholder", c),
            None => "unexpected end of placeholder".to_string(),
        },
    };

    let span = err.span().into_range();
    RenderError::malformed(offset + span.start..offset + span.end, message)
}
