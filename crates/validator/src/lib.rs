//! # zero-validator
//!
//! Tag-driven validation of structs with per-field, human-readable messages.
//!
//! ## Quick Start
//!
//! ```rust
//! use zero_validator::prelude::*;
//!
//! #[derive(Record)]
//! #[record(messages)]
//! struct User {
//!     #[tag(valid = "required,min=3")]
//!     name: String,
//!     #[tag(valid = "gte=18")]
//!     age: u32,
//! }
//!
//! impl FieldMessages for User {
//!     fn field_messages(&self) -> MessageOverrides {
//!         MessageOverrides::from([("age.gte".into(), "%s must be at least %s".into())])
//!     }
//! }
//!
//! let engine = Engine::new("valid");
//! let (errors, ok) = engine.validate(&User { name: String::new(), age: 17 });
//!
//! assert!(!ok);
//! assert_eq!(errors.get("name").unwrap(), ["name is required", "name must have minimum size 3"]);
//! assert_eq!(errors.get("age").unwrap(), ["age must be at least 18"]);
//! ```
//!
//! ## Pipeline
//!
//! 1. The walker lists the record's fields through [`Record::fields`]
//!    (embedded records are flattened one level).
//! 2. [`tag`] splits each field's tag (`required,min=3`) into rule invocations.
//! 3. The [`Engine`] runs every rule through its [`RuleRegistry`]; nothing
//!    short-circuits.
//! 4. [`message`] picks a template for each failure (record override first,
//!    then the engine default) and fills its `%s` markers.
//!
//! Failures with no template at all are dropped from the map; use
//! [`Engine::failures`] to see them.
//!
//! ## Custom rules
//!
//! ```rust
//! use zero_validator::{Engine, FieldContext};
//!
//! let mut engine = Engine::new("valid");
//! engine.add_rule(
//!     "even",
//!     |ctx: &FieldContext<'_>| ctx.value().as_f64().is_none_or(|n| n % 2.0 == 0.0),
//!     "%s must be even",
//! );
//! assert!(engine.has_rule("even"));
//! ```

// Lets `#[derive(Record)]` output name `::zero_validator` inside this crate too.
extern crate self as zero_validator;

pub mod config;
pub mod engine;
pub mod error;
pub mod message;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod rules;
pub mod tag;
mod walker;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Error, FieldErrors, Result, RuleFailure};
pub use record::{
    AsFieldValue, Field, FieldMessages, FieldSource, FieldValue, Kind, MessageOverrides, Record,
};
pub use registry::{FieldContext, RuleDef, RuleFn, RuleRegistry};
pub use tag::{RuleInvocation, parse_tag};

#[cfg(feature = "derive")]
pub use zero_validator_macros::Record;
