//! String content rules
//!
//! These rules only look at string values; any other kind passes.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::FieldValue;
use crate::registry::FieldContext;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url pattern compiles")
});

static NUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").expect("numeric pattern compiles"));

/// Applies `check` to string values and passes everything else.
fn on_str(ctx: &FieldContext<'_>, check: impl FnOnce(&str) -> bool) -> bool {
    ctx.value().as_str().is_none_or(check)
}

/// Non-empty and every character in the class.
fn all_chars(s: &str, class: impl Fn(char) -> bool) -> bool {
    !s.is_empty() && s.chars().all(class)
}

/// Only ASCII characters; the empty string passes.
pub fn ascii(ctx: &FieldContext<'_>) -> bool {
    on_str(ctx, |s| s.is_ascii())
}

/// Non-empty, ASCII letters only.
pub fn alpha(ctx: &FieldContext<'_>) -> bool {
    on_str(ctx, |s| all_chars(s, |c| c.is_ascii_alphabetic()))
}

/// Non-empty, ASCII letters and digits only.
pub fn alphanum(ctx: &FieldContext<'_>) -> bool {
    on_str(ctx, |s| all_chars(s, |c| c.is_ascii_alphanumeric()))
}

/// An optionally signed integer or decimal number.
pub fn numeric(ctx: &FieldContext<'_>) -> bool {
    on_str(ctx, |s| NUMERIC_REGEX.is_match(s))
}

/// Non-empty hex digits, with an optional `0x` prefix.
pub fn hexadecimal(ctx: &FieldContext<'_>) -> bool {
    on_str(ctx, |s| {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        all_chars(digits, |c| c.is_ascii_hexdigit())
    })
}

/// A syntactically valid email address.
pub fn email(ctx: &FieldContext<'_>) -> bool {
    on_str(ctx, |s| EMAIL_REGEX.is_match(s))
}

/// An `http` or `https` URL.
pub fn url(ctx: &FieldContext<'_>) -> bool {
    on_str(ctx, |s| URL_REGEX.is_match(s))
}

/// Contains the parameter as a substring.
pub fn contains(ctx: &FieldContext<'_>) -> bool {
    on_str(ctx, |s| s.contains(ctx.param()))
}

/// Value is one of the space-separated parameters.
///
/// Strings match by text and numbers by value; other kinds pass.
pub fn oneof(ctx: &FieldContext<'_>) -> bool {
    let mut options = ctx.param().split_whitespace();
    match ctx.value() {
        FieldValue::Str(s) => options.any(|option| option == s),
        FieldValue::Int(n) => options.any(|option| option.parse::<i64>().is_ok_and(|v| v == n)),
        FieldValue::Uint(n) => options.any(|option| option.parse::<u64>().is_ok_and(|v| v == n)),
        FieldValue::Float(n) => options.any(|option| option.parse::<f64>().is_ok_and(|v| v == n)),
        _ => true,
    }
}
