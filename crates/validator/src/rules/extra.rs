//! Ready-made custom rules
//!
//! These are not loaded by [`Engine::new`](crate::Engine::new). Opt in with
//! [`register`]:
//!
//! ```rust
//! use zero_validator::{Engine, rules};
//!
//! let mut engine = Engine::new("valid");
//! rules::extra::register(&mut engine);
//! assert!(engine.has_rule("objectid"));
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::engine::Engine;
use crate::registry::{FieldContext, RuleDef};

static OBJECT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("objectid pattern compiles"));

static HTML_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"</?\w+((\s+\w+(\s*=\s*(?:".*?"|'.*?'|[\^'">\s]+))?)+\s*|\s*)/?>"#)
        .expect("html pattern compiles")
});

/// Default message of [`objectid`].
pub const OBJECT_ID_MESSAGE: &str = "%s must be a valid objectid";

/// Default message of [`html`].
pub const HTML_MESSAGE: &str = "%s must contain valid html";

/// A 24-digit hexadecimal document identifier.
pub fn objectid(ctx: &FieldContext<'_>) -> bool {
    ctx.value()
        .as_str()
        .is_none_or(|s| OBJECT_ID_REGEX.is_match(s))
}

/// Text containing at least one HTML tag.
pub fn html(ctx: &FieldContext<'_>) -> bool {
    ctx.value().as_str().is_none_or(|s| HTML_REGEX.is_match(s))
}

/// Adds `objectid` and `html` with their default messages.
pub fn register(engine: &mut Engine) {
    engine.add_rules([
        ("objectid", RuleDef::new(OBJECT_ID_MESSAGE, objectid)),
        ("html", RuleDef::new(HTML_MESSAGE, html)),
    ]);
}
