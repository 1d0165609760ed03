//! Looking up a field's reference in the bindings

use std::borrow::Cow;

use crate::bindings::Bindings;
use crate::error::RenderError;
use crate::parser::ast::{Accessor, Field, Placeholder};
use crate::value::Value;

/// Resolve the value a field refers to, applying its accessors in order
pub(crate) fn resolve<'b>(field: &Field, bindings: &'b Bindings) -> Result<Cow<'b, Value>, RenderError> {
    let mut current = match &field.placeholder {
        Placeholder::Named(name) => bindings.get(name).map(Cow::Borrowed).ok_or_else(|| {
            missing(field, format!("no value is bound to `{}`", name))
        })?,
        Placeholder::Positional(index) => bindings.arg(*index).map(Cow::Borrowed).ok_or_else(|| {
            missing(
                field,
                format!(
                    "positional argument {} is out of range ({} given)",
                    index,
                    bindings.positional_len()
                ),
            )
        })?,
    };

    for accessor in &field.accessors {
        let kind = current.kind();
        current = step(current, accessor).ok_or_else(|| {
            missing(field, format!("{} has no {}", kind, describe(accessor)))
        })?;
    }

    tracing::trace!(placeholder = %field.reference(), kind = current.kind(), "resolved placeholder");
    Ok(current)
}

fn step<'b>(value: Cow<'b, Value>, accessor: &Accessor) -> Option<Cow<'b, Value>> {
    match value {
        Cow::Borrowed(value) => value.lookup(accessor),
        Cow::Owned(value) => {
            let found = value.lookup(accessor)?.into_owned();
            Some(Cow::Owned(found))
        }
    }
}

fn describe(accessor: &Accessor) -> String {
    match accessor {
        Accessor::Attr(name) => format!("attribute `{}`", name),
        Accessor::Key(key) => format!("key `{}`", key),
        Accessor::Index(index) => format!("item {}", index),
    }
}

fn missing(field: &Field, message: String) -> RenderError {
    RenderError::missing(field.reference(), field.span.clone(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::FormatSpec;
    use std::collections::BTreeMap;

    fn field(placeholder: Placeholder, accessors: Vec<Accessor>) -> Field {
        Field {
            placeholder,
            accessors,
            conversion: None,
            spec: FormatSpec::default(),
            span: 4..10,
        }
    }

    fn comedian() -> Value {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("Eric Idle"));
        map.insert("age".to_string(), Value::from(74));
        map.insert("films".to_string(), Value::from(vec!["Life of Brian"]));
        Value::Map(map)
    }

    #[test]
    fn test_resolve_named_and_positional() {
        let bindings = Bindings::new().with_arg("first").with("name", "Eric");

        let named = field(Placeholder::Named("name".to_string()), vec![]);
        assert_eq!(*resolve(&named, &bindings).unwrap(), Value::from("Eric"));

        let positional = field(Placeholder::Positional(0), vec![]);
        assert_eq!(*resolve(&positional, &bindings).unwrap(), Value::from("first"));
    }

    #[test]
    fn test_missing_name() {
        let bindings = Bindings::new();
        let f = field(Placeholder::Named("missing".to_string()), vec![]);
        let err = resolve(&f, &bindings).unwrap_err();
        assert_eq!(
            err,
            RenderError::missing("missing", 4..10, "no value is bound to `missing`")
        );
    }

    #[test]
    fn test_positional_out_of_range() {
        let bindings = Bindings::new().with_arg(1).with_arg(2);
        let f = field(Placeholder::Positional(2), vec![]);
        let err = resolve(&f, &bindings).unwrap_err();
        assert_eq!(err.message(), "positional argument 2 is out of range (2 given)");
    }

    #[test]
    fn test_accessor_chain() {
        let bindings = Bindings::new().with("comedian", comedian());
        let f = field(
            Placeholder::Named("comedian".to_string()),
            vec![Accessor::Key("films".to_string()), Accessor::Index(0)],
        );
        assert_eq!(*resolve(&f, &bindings).unwrap(), Value::from("Life of Brian"));
    }

    #[test]
    fn test_accessor_miss_names_the_step() {
        let bindings = Bindings::new().with("comedian", comedian());
        let f = field(
            Placeholder::Named("comedian".to_string()),
            vec![Accessor::Attr("height".to_string())],
        );
        let err = resolve(&f, &bindings).unwrap_err();
        assert_eq!(
            err,
            RenderError::missing("comedian.height", 4..10, "map has no attribute `height`")
        );
    }

    #[test]
    fn test_accessor_on_scalar() {
        let bindings = Bindings::new().with("age", 74);
        let f = field(Placeholder::Named("age".to_string()), vec![Accessor::Index(0)]);
        let err = resolve(&f, &bindings).unwrap_err();
        assert_eq!(err.message(), "integer has no item 0");
    }
}
