//! Prelude module for convenient imports.
//!
//! `use zero_validator::prelude::*;` brings in the engine, the record
//! capability and the derive macro.

pub use crate::config::EngineConfig;
pub use crate::engine::Engine;
pub use crate::error::{Error, FieldErrors, RuleFailure};
pub use crate::record::{
    AsFieldValue, Field, FieldMessages, FieldValue, Kind, MessageOverrides, Record,
};
pub use crate::registry::{FieldContext, RuleDef};

#[cfg(feature = "derive")]
pub use zero_validator_macros::Record;
