//! The validation engine
//!
//! [`Engine`] ties the pieces together: the walker lists a record's fields,
//! the tag cache turns each field's tag into rule invocations, the registry
//! supplies the rule functions, and the message resolver turns failures into
//! the [`FieldErrors`] map.
//!
//! Setup takes `&mut self` and validation takes `&self`, so once an engine is
//! shared (for example behind an `Arc`) it can no longer be reconfigured.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::{DEFAULT_TAG_CACHE_CAPACITY, EngineConfig};
use crate::error::{FieldErrors, Result, RuleFailure};
use crate::message;
use crate::record::Record;
use crate::registry::{FieldContext, RuleDef, RuleFn, RuleRegistry};
use crate::rules;
use crate::tag::{TagCache, parse_tag};
use crate::walker::walk;

/// Validation engine: rule registry, default messages and the tag key.
pub struct Engine {
    tag_name: String,
    registry: RuleRegistry,
    tags: TagCache,
}

impl Engine {
    /// Creates an engine that reads rule tags under `tag_name`, with every
    /// built-in rule and its default message loaded.
    ///
    /// ```rust
    /// use zero_validator::Engine;
    ///
    /// let engine = Engine::new("valid");
    /// assert!(engine.has_rule("required"));
    /// assert_eq!(engine.default_message("required"), Some("%s is required"));
    /// ```
    pub fn new(tag_name: impl Into<String>) -> Self {
        let mut registry = RuleRegistry::new();
        rules::register_builtins(&mut registry);
        Self::with_registry(tag_name.into(), registry, DEFAULT_TAG_CACHE_CAPACITY)
    }

    /// Creates an engine from a configuration.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let mut registry = RuleRegistry::new();
        if config.builtin_rules {
            rules::register_builtins(&mut registry);
        }
        for (rule, template) in config.default_messages {
            registry.register_message(rule, template);
        }

        tracing::debug!(
            tag_name = %config.tag_name,
            builtin_rules = config.builtin_rules,
            tag_cache_capacity = config.tag_cache_capacity,
            "Engine configured"
        );
        Ok(Self::with_registry(
            config.tag_name,
            registry,
            config.tag_cache_capacity,
        ))
    }

    fn with_registry(tag_name: String, registry: RuleRegistry, tag_cache_capacity: usize) -> Self {
        Self {
            tag_name,
            registry,
            tags: TagCache::with_capacity(tag_cache_capacity),
        }
    }

    /// Tag key this engine reads rule strings from.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Stores a rule under `name`, replacing any previous rule of that name.
    pub fn register<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(rule = %name, "Registered rule");
        self.registry.register(name, Arc::new(rule));
    }

    /// Stores the default message for `name`, replacing any previous one.
    pub fn register_default_message(
        &mut self,
        name: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.registry.register_message(name, template);
    }

    /// Stores a rule and its default message together.
    pub fn add_rule<F>(&mut self, name: impl Into<String>, rule: F, message: impl Into<String>)
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.add_rules([(name.into(), RuleDef::new(message, rule))]);
    }

    /// Stores a batch of rules with their default messages.
    pub fn add_rules<I, N>(&mut self, rules: I)
    where
        I: IntoIterator<Item = (N, RuleDef)>,
        N: Into<String>,
    {
        for (name, def) in rules {
            let name = name.into();
            tracing::debug!(rule = %name, "Registered rule");
            self.registry.register_def(name, def);
        }
    }

    /// Stores a batch of rules without touching default messages.
    pub fn register_rules<I, N>(&mut self, rules: I)
    where
        I: IntoIterator<Item = (N, RuleFn)>,
        N: Into<String>,
    {
        for (name, rule) in rules {
            let name = name.into();
            tracing::debug!(rule = %name, "Registered rule");
            self.registry.register(name, rule);
        }
    }

    /// Sets one default message. Same as [`Engine::register_default_message`].
    pub fn set_default_message(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.register_default_message(name, template);
    }

    /// Replaces the whole default-message table.
    ///
    /// Rules left out of `messages` have no default afterwards, so their
    /// failures are dropped unless the record overrides them.
    pub fn set_default_messages(&mut self, messages: HashMap<String, String>) {
        self.registry.replace_messages(messages);
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Returns true if a rule is registered under `name`.
    pub fn has_rule(&self, name: &str) -> bool {
        self.registry.has_rule(name)
    }

    /// Registered rule names, sorted.
    pub fn rule_names(&self) -> Vec<&str> {
        self.registry.rule_names()
    }

    /// Default message for `name`, if any.
    pub fn default_message(&self, name: &str) -> Option<&str> {
        self.registry.message(name)
    }

    /// The full default-message table.
    pub fn default_messages(&self) -> &HashMap<String, String> {
        self.registry.messages()
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Validates `record`.
    ///
    /// Returns the field error map and `true` iff the map is empty. Failures
    /// for which neither the record nor the engine has a message are dropped,
    /// see [`Engine::failures`] for the raw list.
    ///
    /// ```rust
    /// use zero_validator::{Engine, Field, Record};
    ///
    /// struct User {
    ///     name: String,
    /// }
    ///
    /// impl Record for User {
    ///     fn fields(&self) -> Vec<Field<'_>> {
    ///         vec![Field::new("Name", &self.name).tag("valid", "required,min=3")]
    ///     }
    /// }
    ///
    /// let engine = Engine::new("valid");
    /// let (errors, ok) = engine.validate(&User { name: "al".into() });
    /// assert!(!ok);
    /// assert_eq!(errors.get("name").unwrap(), ["name must have minimum size 3"]);
    /// ```
    pub fn validate<R: Record + ?Sized>(&self, record: &R) -> (FieldErrors, bool) {
        let failures = self.failures(record);
        let overrides = record.messages();
        let defaults = self.registry.messages();

        let mut errors = FieldErrors::new();
        for failure in &failures {
            match message::resolve(failure, &overrides, defaults) {
                Some((field, text)) => errors.push(field, text),
                None => tracing::debug!(
                    field = %failure.field,
                    rule = %failure.rule,
                    "No message for failed rule, dropping it"
                ),
            }
        }

        let valid = errors.is_empty();
        tracing::trace!(
            failures = failures.len(),
            fields = errors.len(),
            valid,
            "Validated record"
        );
        (errors, valid)
    }

    /// Runs every rule on `record` and returns the failures in evaluation
    /// order, before any message is resolved.
    pub fn failures<R: Record + ?Sized>(&self, record: &R) -> Vec<RuleFailure> {
        let top: &dyn Record = &record;
        let mut failures = Vec::new();

        for field in walk(top, &self.tag_name) {
            let (invocations, dropped) = self.tags.get_or_parse(field.tag);
            if dropped {
                tracing::warn!(
                    field = field.name,
                    tag = field.tag,
                    "Malformed rule tag, skipping entries without a rule name"
                );
            }

            for invocation in invocations.iter() {
                let Some(rule) = self.registry.rule(invocation.name()) else {
                    tracing::debug!(
                        field = field.name,
                        rule = invocation.name(),
                        "Unknown rule, treating as passed"
                    );
                    continue;
                };

                let ctx = FieldContext::new(
                    top,
                    field.parent,
                    field.name,
                    field.value,
                    invocation.param(),
                );
                if !rule(&ctx) {
                    failures.push(RuleFailure {
                        field: field.name.to_owned(),
                        rule: invocation.name().to_owned(),
                        param: invocation.param().to_owned(),
                        value: field.value.to_string(),
                    });
                }
            }
        }
        failures
    }

    /// Parses every rule tag of `record` strictly.
    ///
    /// Meant for setup time: `validate` skips malformed tag entries, this
    /// reports the first one as [`Error::MalformedTag`](crate::Error::MalformedTag).
    pub fn check_tags<R: Record + ?Sized>(&self, record: &R) -> Result<()> {
        let top: &dyn Record = &record;
        for field in walk(top, &self.tag_name) {
            parse_tag(field.tag)?;
        }
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TAG_NAME)
    }
}

impl Clone for Engine {
    fn clone(&self) -> Self {
        Self::with_registry(
            self.tag_name.clone(),
            self.registry.clone(),
            self.tags.capacity(),
        )
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("tag_name", &self.tag_name)
            .field("registry", &self.registry)
            .field("cached_tags", &self.tags.len())
            .field("tag_cache_capacity", &self.tags.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, FieldSource, MessageOverrides};
    use pretty_assertions::assert_eq;

    struct User {
        name: String,
        age: u32,
    }

    impl Record for User {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("Name", &self.name).tag("valid", "required,min=3"),
                Field::new("Age", &self.age).tag("valid", "gte=18"),
            ]
        }

        fn messages(&self) -> MessageOverrides {
            MessageOverrides::from([
                ("name.min".to_owned(), "%s must be at least %s characters".to_owned()),
                ("age.gte".to_owned(), "%s must be at least %s".to_owned()),
            ])
        }
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn failures_keep_evaluation_order() {
        let engine = Engine::new("valid");
        let failures = engine.failures(&User {
            name: String::new(),
            age: 17,
        });

        let rules: Vec<_> = failures
            .iter()
            .map(|f| (f.field.as_str(), f.rule.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            rules,
            [("Name", "required", ""), ("Name", "min", ""), ("Age", "gte", "17")]
        );
    }

    #[test]
    fn validate_uses_record_overrides() {
        let engine = Engine::new("valid");
        let (errors, ok) = engine.validate(&User {
            name: "ok".into(),
            age: 17,
        });

        assert!(!ok);
        assert_eq!(
            errors,
            FieldErrors::from([
                ("name", vec!["name must be at least 3 characters"]),
                ("age", vec!["age must be at least 18"]),
            ])
        );
    }

    #[test]
    fn rules_see_parent_and_top() {
        let mut engine = Engine::new("valid");
        engine.add_rule(
            "match_name",
            |ctx: &FieldContext<'_>| {
                let name = ctx
                    .parent()
                    .fields()
                    .into_iter()
                    .find(|f| f.name() == "Name")
                    .map(|f| f.source());
                match name {
                    Some(FieldSource::Value(expected)) => expected == ctx.value(),
                    _ => true,
                }
            },
            "%s must match the name",
        );

        struct Pair {
            name: String,
            confirm: String,
        }

        impl Record for Pair {
            fn fields(&self) -> Vec<Field<'_>> {
                vec![
                    Field::new("Name", &self.name),
                    Field::new("Confirm", &self.confirm).tag("valid", "match_name"),
                ]
            }
        }

        let (_, ok) = engine.validate(&Pair {
            name: "a".into(),
            confirm: "a".into(),
        });
        assert!(ok);

        let (errors, ok) = engine.validate(&Pair {
            name: "a".into(),
            confirm: "b".into(),
        });
        assert!(!ok);
        assert_eq!(errors.get("confirm").unwrap(), ["confirm must match the name"]);
    }

    #[test]
    fn clone_keeps_registry_but_not_cache() {
        let mut engine = Engine::new("valid");
        engine.register("always", |_: &FieldContext<'_>| true);
        let _ = engine.validate(&User {
            name: "bob".into(),
            age: 30,
        });

        let cloned = engine.clone();
        assert!(cloned.has_rule("always"));
        assert_eq!(cloned.tags.len(), 0);
        assert_eq!(engine.tags.len(), 2);
    }

    #[test]
    fn runtime_tags_do_not_grow_the_cache_without_bound() {
        struct Bounded {
            tag: String,
            value: u32,
        }

        impl Record for Bounded {
            fn fields(&self) -> Vec<Field<'_>> {
                vec![Field::new("Value", &self.value).tag("valid", &self.tag)]
            }
        }

        let engine = Engine::from_config(EngineConfig::default().with_tag_cache_capacity(8))
            .unwrap();
        for i in 0..100 {
            let (_, ok) = engine.validate(&Bounded {
                tag: format!("max={i}"),
                value: 50,
            });
            assert_eq!(ok, i >= 50);
        }

        assert_eq!(engine.tags.len(), 8);
        assert_eq!(engine.clone().tags.capacity(), 8);
        assert_eq!(Engine::new("valid").tags.capacity(), DEFAULT_TAG_CACHE_CAPACITY);
    }
}
