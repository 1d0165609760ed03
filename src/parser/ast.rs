//! Parsed template model shared by the brace and percent syntaxes

use std::fmt;

use crate::error::RenderError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Template syntax selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Syntax {
    /// `{name}`, `{0}`, `{}` fields with `{{`/`}}` escapes
    #[default]
    Brace,
    /// `%s`, `%(name)s` directives with `%%` escapes
    Percent,
}

/// What a placeholder refers to in the bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Named(String),
    Positional(usize),
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Named(name) => f.write_str(name),
            Placeholder::Positional(index) => write!(f, "{}", index),
        }
    }
}

/// A step applied to a bound value before conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// `.name`
    Attr(String),
    /// `[name]`
    Key(String),
    /// `[3]`
    Index(usize),
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Attr(name) => write!(f, ".{}", name),
            Accessor::Key(key) => write!(f, "[{}]", key),
            Accessor::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Which text form of the value is substituted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `!s`
    Display,
    /// `!r`
    Debug,
    /// `!a`
    Ascii,
}

impl Conversion {
    pub fn from_flag(flag: char) -> Option<Self> {
        match flag {
            's' => Some(Conversion::Display),
            'r' => Some(Conversion::Debug),
            'a' => Some(Conversion::Ascii),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits
    AfterSign,
}

/// Largest width or precision a format spec accepts
pub const MAX_SPEC_NUMBER: usize = u16::MAX as usize;

/// `[[fill]align][0][width][.precision]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub fill: Option<char>,
    pub align: Option<Align>,
    pub zero: bool,
    pub width: Option<usize>,
    pub precision: Option<usize>,
}

/// A placeholder together with how its value is turned into text
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub placeholder: Placeholder,
    pub accessors: Vec<Accessor>,
    pub conversion: Option<Conversion>,
    pub spec: FormatSpec,
    /// Location of the whole placeholder, markers included
    pub span: Span,
}

impl Field {
    /// The reference as written, e.g. `comedian[name]` or `0.age`
    pub fn reference(&self) -> String {
        let mut out = self.placeholder.to_string();
        for accessor in &self.accessors {
            out.push_str(&accessor.to_string());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed template, ready to render against any number of binding sets
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    syntax: Syntax,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a brace-syntax template
    ///
    /// # Example
    ///
    /// ```rust
    /// use bracefmt::{Bindings, Template};
    ///
    /// let template = Template::parse("Hello, {1}. You are {0}.").unwrap();
    /// let bindings = Bindings::new().with_arg(74).with_arg("Eric");
    /// assert_eq!(template.render(&bindings).unwrap(), "Hello, Eric. You are 74.");
    /// ```
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        Self::parse_with(source, Syntax::Brace)
    }

    /// Parse a template written in the given syntax
    pub fn parse_with(source: &str, syntax: Syntax) -> Result<Self, RenderError> {
        let template = match syntax {
            Syntax::Brace => super::grammar::parse(source)?,
            Syntax::Percent => super::percent::parse_percent(source)?,
        };
        tracing::debug!(
            ?syntax,
            fields = template.fields().count(),
            "parsed template"
        );
        Ok(template)
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(field) => Some(field),
            Segment::Literal(_) => None,
        })
    }

    /// True if the template contains no placeholders
    pub fn is_literal(&self) -> bool {
        self.fields().next().is_none()
    }
}

/// Accumulates segments, merging adjacent literal text
#[derive(Debug)]
pub(crate) struct TemplateBuilder {
    syntax: Syntax,
    segments: Vec<Segment>,
    literal: String,
}

impl TemplateBuilder {
    pub(crate) fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            segments: Vec::new(),
            literal: String::new(),
        }
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.literal.push_str(text);
    }

    pub(crate) fn push_char(&mut self, c: char) {
        self.literal.push(c);
    }

    pub(crate) fn push_field(&mut self, field: Field) {
        self.flush();
        self.segments.push(Segment::Field(field));
    }

    pub(crate) fn finish(mut self) -> Template {
        self.flush();
        Template {
            syntax: self.syntax,
            segments: self.segments,
        }
    }

    fn flush(&mut self) {
        if !self.literal.is_empty() {
            let text = std::mem::take(&mut self.literal);
            self.segments.push(Segment::Literal(text));
        }
    }
}
