//! Basic usage example for zero-validator

use zero_validator::prelude::*;
use zero_validator::rules;

#[derive(Record)]
#[record(messages)]
struct SignUp {
    #[tag(valid = "required,min=3,max=32,alphanum")]
    username: String,

    #[tag(valid = "required,email")]
    email: String,

    #[tag(valid = "gte=18")]
    age: u8,

    #[tag(valid = "objectid")]
    invited_by: Option<String>,
}

impl FieldMessages for SignUp {
    fn field_messages(&self) -> MessageOverrides {
        MessageOverrides::from([("age.gte".into(), "%s must be at least %s years old".into())])
    }
}

fn main() {
    let mut engine = Engine::new("valid");
    rules::extra::register(&mut engine);

    let valid = SignUp {
        username: "ada".into(),
        email: "ada@example.com".into(),
        age: 36,
        invited_by: None,
    };
    match engine.validate(&valid) {
        (_, true) => println!("✓ sign-up is valid"),
        (errors, false) => println!("✗ {errors}"),
    }

    let invalid = SignUp {
        username: "a!".into(),
        email: "not-an-email".into(),
        age: 16,
        invited_by: Some("nobody".into()),
    };
    let (errors, ok) = engine.validate(&invalid);
    println!("valid: {ok}");
    println!("{errors}");
    match serde_json::to_string_pretty(&errors) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("✗ could not serialize errors: {e}"),
    }
}
