//! Parser for the inside of a brace placeholder
//!
//! ```text
//! field      := arg_name accessor* ["!" conversion] [":" spec]
//! accessor   := "." attr | "[" key "]"
//! spec       := [[fill] align] ["0"] [width] ["." precision]
//! ```

use chumsky::prelude::*;

use crate::error::{from_field_error, RenderError};
use crate::parser::ast::{Accessor, Align, Conversion, FormatSpec, Span, MAX_SPEC_NUMBER};

/// The argument part of a placeholder before numbering is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArgName {
    /// `{}`
    Auto,
    Index(usize),
    Name(String),
}

/// A placeholder body as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldBody {
    pub arg: ArgName,
    pub accessors: Vec<Accessor>,
    pub conversion: Option<Conversion>,
    pub spec: FormatSpec,
}

/// Parse a placeholder body; `offset` is its position in the template
pub(crate) fn parse_field(body: &str, offset: usize) -> Result<FieldBody, RenderError> {
    let (((arg, accessors), flag), spec) = field_parser()
        .parse(body)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => from_field_error(err, offset),
            None => RenderError::malformed(offset..offset + body.len(), "invalid placeholder"),
        })?;

    let conversion = match flag {
        Some((flag, span)) => Some(Conversion::from_flag(flag).ok_or_else(|| {
            RenderError::malformed(
                offset + span.start..offset + span.end,
                format!("unknown conversion flag '!{}'", flag),
            )
        })?),
        None => None,
    };

    let spec = match spec {
        Some(raw) => raw.into_spec(offset)?,
        None => FormatSpec::default(),
    };

    Ok(FieldBody {
        arg,
        accessors,
        conversion,
        spec,
    })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Digits as written, with their span in the placeholder body
type RawNumber = (String, Span);

/// A format spec whose width and precision are not yet range checked
#[derive(Debug, Clone)]
struct RawSpec {
    fill: Option<char>,
    align: Option<Align>,
    zero: bool,
    width: Option<RawNumber>,
    precision: Option<RawNumber>,
}

impl RawSpec {
    fn into_spec(self, offset: usize) -> Result<FormatSpec, RenderError> {
        Ok(FormatSpec {
            fill: self.fill,
            align: self.align,
            zero: self.zero,
            width: self.width.map(|n| bounded(n, offset, "width")).transpose()?,
            precision: self.precision.map(|n| bounded(n, offset, "precision")).transpose()?,
        })
    }
}

fn bounded((digits, span): RawNumber, offset: usize, what: &str) -> Result<usize, RenderError> {
    digits
        .parse::<usize>()
        .ok()
        .filter(|n| *n <= MAX_SPEC_NUMBER)
        .ok_or_else(|| {
            RenderError::malformed(
                offset + span.start..offset + span.end,
                format!("{} {} is too large (at most {})", what, digits, MAX_SPEC_NUMBER),
            )
        })
}

/// Parser output before the conversion flag and spec numbers are checked
type RawField = (((ArgName, Vec<Accessor>), Option<(char, Span)>), Option<RawSpec>);

fn field_parser<'a>() -> impl Parser<'a, &'a str, RawField, extra::Err<Rich<'a, char>>> {
    let number = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map_with(|digits: String, e| {
            let span: SimpleSpan = e.span();
            (digits, span.into_range())
        });

    let arg = none_of(".[!:")
        .repeated()
        .collect::<String>()
        .map(|name: String| {
            if name.is_empty() {
                ArgName::Auto
            } else if is_digits(&name) {
                name.parse().map_or(ArgName::Name(name), ArgName::Index)
            } else {
                ArgName::Name(name)
            }
        });

    let attr = just('.')
        .ignore_then(none_of(".[!:").repeated().at_least(1).collect::<String>())
        .map(Accessor::Attr);

    let item = none_of("]")
        .repeated()
        .at_least(1)
        .collect::<String>()
        .delimited_by(just('['), just(']'))
        .map(|key: String| {
            if is_digits(&key) {
                key.parse().map_or(Accessor::Key(key), Accessor::Index)
            } else {
                Accessor::Key(key)
            }
        });

    let conversion = just('!').ignore_then(any().map_with(|flag: char, e| {
        let span: SimpleSpan = e.span();
        (flag, span.into_range())
    }));

    let align = one_of("<>^=").map(|c: char| match c {
        '<' => Align::Left,
        '>' => Align::Right,
        '^' => Align::Center,
        _ => Align::AfterSign,
    });

    let fill_align = any()
        .then(align.clone())
        .map(|(fill, align)| (Some(fill), align))
        .or(align.map(|align| (None, align)));

    let spec = fill_align
        .or_not()
        .then(just('0').or_not())
        .then(number.clone().or_not())
        .then(just('.').ignore_then(number).or_not())
        .map(|(((fill_align, zero), width), precision)| RawSpec {
            fill: fill_align.and_then(|(fill, _)| fill),
            align: fill_align.map(|(_, align)| align),
            zero: zero.is_some(),
            width,
            precision,
        });

    arg.then(attr.or(item).repeated().collect::<Vec<_>>())
        .then(conversion.or_not())
        .then(just(':').ignore_then(spec).or_not())
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> FieldBody {
        parse_field(body, 0).expect("Should parse")
    }

    #[test]
    fn test_arg_names() {
        assert_eq!(parse("").arg, ArgName::Auto);
        assert_eq!(parse("1").arg, ArgName::Index(1));
        assert_eq!(parse("name").arg, ArgName::Name("name".to_string()));
        assert_eq!(parse("70+4").arg, ArgName::Name("70+4".to_string()));
    }

    #[test]
    fn test_accessor_chain() {
        let body = parse("comedian[name].first[0]");
        assert_eq!(body.arg, ArgName::Name("comedian".to_string()));
        assert_eq!(
            body.accessors,
            vec![
                Accessor::Key("name".to_string()),
                Accessor::Attr("first".to_string()),
                Accessor::Index(0),
            ]
        );
    }

    #[test]
    fn test_conversion_flags() {
        assert_eq!(parse("x!r").conversion, Some(Conversion::Debug));
        assert_eq!(parse("x!s").conversion, Some(Conversion::Display));
        assert_eq!(parse("!a").conversion, Some(Conversion::Ascii));
        assert_eq!(parse("x").conversion, None);
    }

    #[test]
    fn test_unknown_conversion_flag() {
        let err = parse_field("x!z", 5).unwrap_err();
        assert_eq!(err, RenderError::malformed(7..8, "unknown conversion flag '!z'"));
    }

    #[test]
    fn test_spec_width_and_alignment() {
        let spec = parse("name:>10").spec;
        assert_eq!(spec.align, Some(Align::Right));
        assert_eq!(spec.fill, None);
        assert_eq!(spec.width, Some(10));

        let spec = parse("name:*^7").spec;
        assert_eq!(spec.fill, Some('*'));
        assert_eq!(spec.align, Some(Align::Center));
        assert_eq!(spec.width, Some(7));
    }

    #[test]
    fn test_spec_zero_and_precision() {
        let spec = parse("0:05.2").spec;
        assert!(spec.zero);
        assert_eq!(spec.width, Some(5));
        assert_eq!(spec.precision, Some(2));

        let spec = parse(":.3").spec;
        assert_eq!(spec.width, None);
        assert_eq!(spec.precision, Some(3));
    }

    #[test]
    fn test_fill_can_be_an_align_character() {
        let spec = parse(":<>4").spec;
        assert_eq!(spec.fill, Some('<'));
        assert_eq!(spec.align, Some(Align::Right));
        assert_eq!(spec.width, Some(4));
    }

    #[test]
    fn test_empty_spec_is_default() {
        assert_eq!(parse("name:").spec, FormatSpec::default());
    }

    #[test]
    fn test_conversion_before_spec() {
        let body = parse("name!r:>12");
        assert_eq!(body.conversion, Some(Conversion::Debug));
        assert_eq!(body.spec.width, Some(12));
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let err = parse_field("name:abc", 0).unwrap_err();
        assert!(matches!(err, RenderError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_explicit_after_sign_alignment() {
        let spec = parse("age:*=6").spec;
        assert_eq!(spec.fill, Some('*'));
        assert_eq!(spec.align, Some(Align::AfterSign));

        let spec = parse("name:=6").spec;
        assert_eq!(spec.fill, None);
        assert_eq!(spec.align, Some(Align::AfterSign));
        assert_eq!(spec.width, Some(6));
    }

    #[test]
    fn test_largest_width_and_precision_are_accepted() {
        let spec = parse("x:65535.65535").spec;
        assert_eq!(spec.width, Some(MAX_SPEC_NUMBER));
        assert_eq!(spec.precision, Some(MAX_SPEC_NUMBER));
    }

    #[test]
    fn test_oversized_width_is_rejected_at_its_digits() {
        let err = parse_field("x:18446744073709551615", 1).unwrap_err();
        assert_eq!(
            err,
            RenderError::malformed(
                3..23,
                "width 18446744073709551615 is too large (at most 65535)"
            )
        );
    }

    #[test]
    fn test_oversized_precision_is_rejected_at_its_digits() {
        let err = parse_field("f:.70000", 1).unwrap_err();
        assert_eq!(
            err,
            RenderError::malformed(4..9, "precision 70000 is too large (at most 65535)")
        );
    }

    #[test]
    fn test_empty_attribute_is_rejected() {
        assert!(parse_field("name.", 0).is_err());
        assert!(parse_field("name[]", 0).is_err());
        assert!(parse_field("name[0", 0).is_err());
    }
}
