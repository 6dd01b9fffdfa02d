//! Built-in rules
//!
//! Every built-in is a plain function over [`FieldContext`], registered
//! under its tag name exactly the way a custom rule would be.
//!
//! | rule | applies to | fails when |
//! |---|---|---|
//! | `required` | all | value is its type's zero value |
//! | `len`, `min`, `max` | strings, numbers, collections | size or value is not `==`, `>=`, `<=` the parameter |
//! | `eq`, `ne` | strings, numbers, collections, bools | value (or size) differs / matches |
//! | `gt`, `gte`, `lt`, `lte` | numbers | comparison with the parameter fails |
//! | `oneof` | strings, numbers | value is not one of the space-separated parameters |
//! | `ascii`, `alpha`, `alphanum`, `numeric`, `hexadecimal` | strings | a character is outside the class |
//! | `email`, `url` | strings | the text does not look like one |
//! | `contains` | strings | the parameter is not a substring |
//!
//! A rule that does not apply to a value's kind, or whose parameter does not
//! parse, passes.

pub mod extra;
mod size;
mod string;

use std::collections::HashMap;

use crate::registry::{FieldContext, RuleDef, RuleRegistry};

pub use size::{eq, gt, gte, len, lt, lte, max, min, ne};
pub use string::{alpha, alphanum, ascii, contains, email, hexadecimal, numeric, oneof, url};

/// Built-in rule: fails iff the value is its type's zero value.
pub fn required(ctx: &FieldContext<'_>) -> bool {
    !ctx.value().is_zero()
}

type BuiltinRule = fn(&FieldContext<'_>) -> bool;

const BUILTINS: &[(&str, BuiltinRule, &str)] = &[
    ("required", required, "%s is required"),
    ("len", len, "%s must have size %s"),
    ("min", min, "%s must have minimum size %s"),
    ("max", max, "%s must have maximum size %s"),
    ("eq", eq, "%s must be equal to %s"),
    ("ne", ne, "%s must not be equal to %s"),
    ("gt", gt, "%s must be greater than %s"),
    ("gte", gte, "%s must be greater than or equal to %s"),
    ("lt", lt, "%s must be less than %s"),
    ("lte", lte, "%s must be less than or equal to %s"),
    ("oneof", oneof, "%s must be one of [%s]"),
    ("ascii", ascii, "%s must contain only ascii characters"),
    ("alpha", alpha, "%s must contain only letters"),
    ("alphanum", alphanum, "%s must contain only letters and digits"),
    ("numeric", numeric, "%s must be a valid numeric value"),
    ("hexadecimal", hexadecimal, "%s must be a valid hexadecimal"),
    ("email", email, "%s must be a valid email address"),
    ("url", url, "%s must be a valid url"),
    ("contains", contains, "%s must contain %s"),
];

/// Registers every built-in rule with its default message.
pub(crate) fn register_builtins(registry: &mut RuleRegistry) {
    for &(name, rule, message) in BUILTINS {
        registry.register_def(name, RuleDef::new(message, rule));
    }
}

/// Default messages of the built-in rules.
pub fn default_messages() -> HashMap<String, String> {
    BUILTINS
        .iter()
        .map(|&(name, _, message)| (name.to_owned(), message.to_owned()))
        .collect()
}
