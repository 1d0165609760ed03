//! bracefmt - render text templates with named and positional placeholders
//!
//! This library provides a parser and renderer for brace templates
//! (`"Hello, {name}."`) and percent templates (`"Hello, %s."`).
//!
//! # Example
//!
//! ```rust
//! use bracefmt::{render, Bindings};
//!
//! let bindings = Bindings::new().with("name", "Eric").with("age", 74);
//! let text = render("Hello, {name}. You are {age}.", &bindings).unwrap();
//! assert_eq!(text, "Hello, Eric. You are 74.");
//! ```

pub mod bindings;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod value;

pub use bindings::{Bindings, BindingsError};
pub use error::RenderError;
pub use parser::{Placeholder, Syntax, Template};
pub use renderer::{render_template, RenderConfig};
pub use value::{TextForm, Value};

/// Render brace-syntax template source with the given bindings
///
/// This is the main entry point for the library. It parses the source and
/// substitutes every placeholder in one go.
///
/// # Example
///
/// ```rust
/// use bracefmt::{render, Bindings, RenderError};
///
/// let text = render("{{70+4}}", &Bindings::new()).unwrap();
/// assert_eq!(text, "{70+4}");
///
/// let err = render("{missing}", &Bindings::new()).unwrap_err();
/// assert!(matches!(err, RenderError::MissingBinding { .. }));
/// ```
pub fn render(source: &str, bindings: &Bindings) -> Result<String, RenderError> {
    render_with_config(source, bindings, &RenderConfig::default())
}

/// Render template source with custom configuration
///
/// # Example
///
/// ```rust
/// use bracefmt::{render_with_config, Bindings, RenderConfig, Syntax};
///
/// let config = RenderConfig::new().with_syntax(Syntax::Percent);
/// let bindings = Bindings::new().with_arg("Eric").with_arg(74);
///
/// let text = render_with_config("Hello, %s. You are %s.", &bindings, &config).unwrap();
/// assert_eq!(text, "Hello, Eric. You are 74.");
/// ```
pub fn render_with_config(
    source: &str,
    bindings: &Bindings,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let template = Template::parse_with(source, config.syntax)?;
    template.render(bindings)
}
