//! Template interpolation for config files
//!
//! Handles `{{ env.NAME }}` placeholders so credentials can stay out of the
//! config file itself.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ env.NAME }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\.([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}").unwrap()
});

/// Render a template, resolving `env.*` variables through `lookup`
pub fn render<F>(template: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for caps in TEMPLATE_REGEX.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let scope = &caps[1];
        let name = &caps[2];

        if scope != "env" {
            return Err(Error::template(format!(
                "Unknown template scope '{scope}' in '{}'",
                whole.as_str()
            )));
        }

        let value = lookup(name).ok_or_else(|| {
            Error::template(format!("Undefined environment variable: {name}"))
        })?;

        result.push_str(&template[last..whole.start()]);
        result.push_str(&value);
        last = whole.end();
    }

    result.push_str(&template[last..]);
    Ok(result)
}

/// Render a template against the process environment
pub fn render_env(template: &str) -> Result<String> {
    render(template, |name| std::env::var(name).ok())
}

/// Check if a string contains template variables
pub fn has_template(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}
