//! `{name}`-style template rendering.
//!
//! Substitution is strict: a placeholder with no matching parameter is rendered as
//! a visible `[?name]` marker instead of being dropped. `{{` and `}}` produce literal
//! braces; any other brace that does not form a placeholder is copied verbatim.

use std::collections::BTreeMap;

/// Shown when no template exists for a code. Deliberately not localized.
pub const GENERIC_FALLBACK_MESSAGE: &str = "An unexpected error occurred.";

/// Render the marker used for a placeholder without a parameter.
pub fn missing_param_marker(name: &str) -> String {
    format!("[?{name}]")
}

fn is_placeholder_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Substitute `{name}` placeholders in `template` from `params`.
pub fn render(template: &str, params: Option<&BTreeMap<String, String>>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        // tail starts with a single '{'
        match tail[1..].find('}') {
            Some(end) if is_placeholder(&tail[1..1 + end]) => {
                let name = &tail[1..1 + end];
                match params.and_then(|p| p.get(name)) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&missing_param_marker(name)),
                }
                rest = &tail[end + 2..];
            }
            _ => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_placeholder_char)
}

/// Names of all placeholders referenced by `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            rest = &tail[2..];
            continue;
        }
        match tail[1..].find('}') {
            Some(end) if is_placeholder(&tail[1..1 + end]) => {
                names.push(tail[1..1 + end].to_string());
                rest = &tail[end + 2..];
            }
            _ => rest = &tail[1..],
        }
    }

    names
}
