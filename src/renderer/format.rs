//! Turning a resolved value into text according to a field's conversion and spec

use crate::parser::ast::{Align, Conversion, FormatSpec};
use crate::value::Value;

/// Convert and pad a value
pub(crate) fn format_value(value: &Value, conversion: Option<Conversion>, spec: &FormatSpec) -> String {
    let text = match conversion {
        None => match value {
            Value::Float(f) => match spec.precision {
                Some(precision) if f.is_finite() => format!("{:.*}", precision, f),
                _ => value.display_text(),
            },
            Value::Int(_) => value.display_text(),
            _ => truncate(value.display_text(), spec.precision),
        },
        Some(Conversion::Display) => truncate(value.display_text(), spec.precision),
        Some(Conversion::Debug) => truncate(value.debug_text(), spec.precision),
        Some(Conversion::Ascii) => truncate(value.ascii_text(), spec.precision),
    };

    let numeric = conversion.is_none() && value.is_number();
    pad(text, spec, numeric)
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(precision) if text.chars().count() > precision => text.chars().take(precision).collect(),
        _ => text,
    }
}

fn pad(text: String, spec: &FormatSpec, numeric: bool) -> String {
    let Some(width) = spec.width else {
        return text;
    };
    let len = text.chars().count();
    if len >= width {
        return text;
    }

    let fill = spec.fill.unwrap_or(if spec.zero { '0' } else { ' ' });
    let align = spec.align.unwrap_or(match (numeric, spec.zero) {
        (true, true) => Align::AfterSign,
        (true, false) => Align::Right,
        (false, _) => Align::Left,
    });
    let padding = width - len;
    let run = |n: usize| fill.to_string().repeat(n);

    match align {
        Align::Left => text + &run(padding),
        Align::Right => run(padding) + &text,
        Align::Center => {
            let before = padding / 2;
            run(before) + &text + &run(padding - before)
        }
        Align::AfterSign => {
            let sign_len = if numeric && (text.starts_with('-') || text.starts_with('+')) {
                1
            } else {
                0
            };
            let (sign, digits) = text.split_at(sign_len);
            format!("{}{}{}", sign, run(padding), digits)
        }
    }
}
