//! Renderer that substitutes bound values into a parsed template
//!
//! Rendering is a single pass over the template's segments. Output is only
//! returned once every placeholder has resolved.

pub mod config;
mod format;
mod resolve;

pub use config::RenderConfig;

use crate::bindings::Bindings;
use crate::error::RenderError;
use crate::parser::ast::{Segment, Template};

/// Render a parsed template against a set of bindings
pub fn render_template(template: &Template, bindings: &Bindings) -> Result<String, RenderError> {
    let mut out = String::new();

    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Field(field) => {
                let value = resolve::resolve(field, bindings)?;
                out.push_str(&format::format_value(&value, field.conversion, &field.spec));
            }
        }
    }

    tracing::debug!(len = out.len(), "rendered template");
    Ok(out)
}

impl Template {
    /// Render this template against a set of bindings
    pub fn render(&self, bindings: &Bindings) -> Result<String, RenderError> {
        render_template(self, bindings)
    }
}
