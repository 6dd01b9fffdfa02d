//! Rule registry
//!
//! Maps rule names to rule functions and rule names to default message
//! templates. Built-in and custom rules share one table: the evaluator does
//! not know which is which.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::record::{FieldValue, Kind, Record};

/// A rule function: returns `true` when the field passes.
pub type RuleFn = Arc<dyn Fn(&FieldContext<'_>) -> bool + Send + Sync>;

// ============================================================================
// FIELD CONTEXT
// ============================================================================

/// Everything a rule may look at while checking one field.
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    top: &'a dyn Record,
    parent: &'a dyn Record,
    field: &'a str,
    value: FieldValue<'a>,
    param: &'a str,
}

impl<'a> FieldContext<'a> {
    /// Builds a context. `parent` is the record that declares the field,
    /// which differs from `top` for fields of an embedded record.
    pub fn new(
        top: &'a dyn Record,
        parent: &'a dyn Record,
        field: &'a str,
        value: FieldValue<'a>,
        param: &'a str,
    ) -> Self {
        Self {
            top,
            parent,
            field,
            value,
            param,
        }
    }

    /// The record passed to `validate`.
    pub fn top(&self) -> &'a dyn Record {
        self.top
    }

    /// The record that declares this field.
    pub fn parent(&self) -> &'a dyn Record {
        self.parent
    }

    /// Declared field name.
    pub fn field_name(&self) -> &'a str {
        self.field
    }

    /// The field's runtime value.
    pub fn value(&self) -> FieldValue<'a> {
        self.value
    }

    /// The value's type category.
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    /// Raw rule parameter.
    pub fn param(&self) -> &'a str {
        self.param
    }

    /// Rule parameter parsed as `T`, or `None` if it does not parse.
    pub fn param_as<T: FromStr>(&self) -> Option<T> {
        self.param.trim().parse().ok()
    }
}

impl fmt::Debug for FieldContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldContext")
            .field("field", &self.field)
            .field("value", &self.value)
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// A rule function together with its default message.
#[derive(Clone)]
pub struct RuleDef {
    /// Default message template for the rule.
    pub message: String,
    /// The predicate.
    pub rule: RuleFn,
}

impl RuleDef {
    /// Creates a definition from a closure or function.
    pub fn new<F>(message: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            rule: Arc::new(rule),
        }
    }
}

impl fmt::Debug for RuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDef")
            .field("message", &self.message)
            .field("rule", &"<function>")
            .finish()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Registry of rule functions and default messages.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleFn>,
    messages: HashMap<String, String>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `rule` under `name`, replacing any previous rule.
    pub fn register(&mut self, name: impl Into<String>, rule: RuleFn) {
        self.rules.insert(name.into(), rule);
    }

    /// Stores the default message for `name`, replacing any previous one.
    pub fn register_message(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(name.into(), template.into());
    }

    /// Stores a rule and its default message together.
    pub fn register_def(&mut self, name: impl Into<String>, def: RuleDef) {
        let name = name.into();
        self.messages.insert(name.clone(), def.message);
        self.rules.insert(name, def.rule);
    }

    /// Replaces the whole default-message table.
    pub fn replace_messages(&mut self, messages: HashMap<String, String>) {
        self.messages = messages;
    }

    /// Looks up a rule function.
    pub fn rule(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name)
    }

    /// Looks up a default message.
    pub fn message(&self, name: &str) -> Option<&str> {
        self.messages.get(name).map(String::as_str)
    }

    /// The full default-message table.
    pub fn messages(&self) -> &HashMap<String, String> {
        &self.messages
    }

    /// Returns true if a rule is registered under `name`.
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_names())
            .field("messages", &self.messages.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    struct Empty;

    impl Record for Empty {
        fn fields(&self) -> Vec<Field<'_>> {
            Vec::new()
        }
    }

    fn check(registry: &RuleRegistry, name: &str, value: FieldValue<'_>, param: &str) -> bool {
        let ctx = FieldContext::new(&Empty, &Empty, "Field", value, param);
        (registry.rule(name).unwrap())(&ctx)
    }

    #[test]
    fn register_overwrites_previous_rule() {
        let mut registry = RuleRegistry::new();
        registry.register("flag", Arc::new(|_: &FieldContext<'_>| false));
        assert!(!check(&registry, "flag", FieldValue::Bool(true), ""));

        registry.register("flag", Arc::new(|_: &FieldContext<'_>| true));
        assert!(check(&registry, "flag", FieldValue::Bool(true), ""));
        assert_eq!(registry.rule_names(), ["flag"]);
    }

    #[test]
    fn register_def_sets_rule_and_message() {
        let mut registry = RuleRegistry::new();
        registry.register_def(
            "even",
            RuleDef::new("%s must be even", |ctx: &FieldContext<'_>| {
                matches!(ctx.value(), FieldValue::Int(n) if n % 2 == 0)
            }),
        );

        assert!(registry.has_rule("even"));
        assert_eq!(registry.message("even"), Some("%s must be even"));
        assert!(check(&registry, "even", FieldValue::Int(4), ""));
        assert!(!check(&registry, "even", FieldValue::Int(3), ""));
    }

    #[test]
    fn replace_messages_drops_old_table() {
        let mut registry = RuleRegistry::new();
        registry.register_message("required", "%s is required");
        registry.replace_messages(HashMap::from([("min".to_owned(), "%s too small".to_owned())]));

        assert_eq!(registry.message("required"), None);
        assert_eq!(registry.message("min"), Some("%s too small"));
    }

    #[test]
    fn context_parses_params() {
        let ctx = FieldContext::new(&Empty, &Empty, "Age", FieldValue::Int(17), " 18 ");
        assert_eq!(ctx.param_as::<i64>(), Some(18));
        assert_eq!(ctx.param_as::<bool>(), None);
        assert_eq!(ctx.kind(), Kind::Int);
        assert_eq!(ctx.field_name(), "Age");
    }
}
