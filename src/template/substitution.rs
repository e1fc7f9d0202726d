//! Placeholder substitution engine for message templates

use super::types::{Placeholder, TemplateBindings};

/// Render `template` by replacing every bound placeholder token.
///
/// Matching is literal and case-sensitive. The template is scanned once, so
/// substituted values are never themselves rescanned. Unknown tokens and
/// recognized placeholders without a binding are copied verbatim.
///
/// An empty template renders to an empty string; choosing a fallback template
/// is the caller's job.
pub fn render(template: &str, bindings: &TemplateBindings) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match match_placeholder(candidate, bindings) {
            Some((token_len, value)) => {
                result.push_str(value);
                rest = &candidate[token_len..];
            }
            None => {
                result.push('{');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

fn match_placeholder<'a>(
    candidate: &str,
    bindings: &'a TemplateBindings,
) -> Option<(usize, &'a str)> {
    Placeholder::ALL.iter().find_map(|placeholder| {
        let token = placeholder.token();
        if candidate.starts_with(token) {
            bindings.get(*placeholder).map(|value| (token.len(), value))
        } else {
            None
        }
    })
}
