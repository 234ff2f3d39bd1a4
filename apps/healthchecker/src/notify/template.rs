//! Placeholder substitution for notification bodies.
//!
//! Recognised placeholders are `{{FailingService}}` and
//! `{{FailingServiceDescription}}`. The dotted form (`{{.FailingService}}`)
//! and surrounding whitespace are accepted as well.

use tracing::warn;

use crate::error::describe_chain;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Values available to a notification template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub failing_service: String,
    pub failing_service_description: String,
}

impl ErrorReport {
    pub fn new(failing_service: impl Into<String>, cause: &dyn std::error::Error) -> Self {
        Self { failing_service: failing_service.into(), failing_service_description: describe_chain(cause) }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "FailingService" => Some(&self.failing_service),
            "FailingServiceDescription" => Some(&self.failing_service_description),
            _ => None,
        }
    }
}

/// Substitute every placeholder in `text` with the matching report field.
///
/// When a placeholder does not name a known field, or a `{{` is never
/// closed, `text` is returned unchanged.
pub fn replace_variables(text: &str, report: &ErrorReport) -> String {
    match render(text, report) {
        Ok(rendered) => rendered,
        Err(placeholder) => {
            warn!("Cannot render notification template, unknown placeholder {placeholder:?}; sending it as is");
            text.to_string()
        }
    }
}

fn render<'a>(text: &'a str, report: &ErrorReport) -> Result<String, &'a str> {
    let mut rendered = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        rendered.push_str(&rest[..start]);

        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            return Err(&rest[start..]);
        };

        let placeholder = &rest[start..start + OPEN.len() + end + CLOSE.len()];
        let name = after_open[..end].trim();
        let name = name.strip_prefix('.').unwrap_or(name);

        rendered.push_str(report.field(name).ok_or(placeholder)?);
        rest = &after_open[end + CLOSE.len()..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}
