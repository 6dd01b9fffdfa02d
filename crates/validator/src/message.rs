//! Message resolution
//!
//! Turns a [`RuleFailure`] into the text a user sees. The template is picked
//! by precedence (record override, then engine default) and its `%s` markers
//! are filled positionally with the field name, the rule parameter and the
//! field value.

use std::collections::HashMap;

use crate::error::RuleFailure;
use crate::record::MessageOverrides;

/// Placeholder marker in message templates.
pub const PLACEHOLDER: &str = "%s";

/// Most markers a template may carry and still be substituted.
const MAX_PLACEHOLDERS: usize = 3;

/// Normalizes a declared field name to snake case.
///
/// Word boundaries are a lower-to-upper transition (`userName`) and the end
/// of an acronym followed by a word (`HTMLBody`).
///
/// ```rust
/// use zero_validator::message::to_snake_case;
///
/// assert_eq!(to_snake_case("UserName"), "user_name");
/// assert_eq!(to_snake_case("ID"), "id");
/// assert_eq!(to_snake_case("HTMLBody"), "html_body");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Fills the `%s` markers of `template`.
///
/// With one marker the field name goes in; with two, field then parameter;
/// with three, field, parameter, then value. Templates with no markers or
/// more than three are returned as they are.
pub fn render(template: &str, field: &str, param: &str, value: &str) -> String {
    let markers = template.matches(PLACEHOLDER).count();
    if markers == 0 || markers > MAX_PLACEHOLDERS {
        return template.to_owned();
    }

    let args = [field, param, value];
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    for arg in &args[..markers] {
        // `markers` was counted on the same text, so the split always succeeds.
        let Some((head, tail)) = rest.split_once(PLACEHOLDER) else {
            break;
        };
        out.push_str(head);
        out.push_str(arg);
        rest = tail;
    }
    out.push_str(rest);
    out
}

/// Picks and renders the message for one failure.
///
/// Returns `None` when neither the record nor the engine has a template for
/// the rule; the caller drops such failures.
pub(crate) fn resolve(
    failure: &RuleFailure,
    overrides: &MessageOverrides,
    defaults: &HashMap<String, String>,
) -> Option<(String, String)> {
    let key = to_snake_case(&failure.field);
    let template = overrides
        .get(&format!("{key}.{}", failure.rule))
        .or_else(|| defaults.get(&failure.rule))?;

    let field = failure.field.to_lowercase();
    let message = render(template, &field, &failure.param, &failure.value);
    Some((key, message))
}

// ============================================================================
// TESTS
// ============================================================================
