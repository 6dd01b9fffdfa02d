//! Struct walker: flattens a record into the fields the evaluator checks.

use crate::record::{FieldSource, FieldValue, Record};

/// Embedding levels that are flattened into the top record.
const MAX_EMBED_DEPTH: usize = 1;

/// One field ready for evaluation.
#[derive(Clone, Copy)]
pub(crate) struct WalkedField<'a> {
    /// Declared field name.
    pub(crate) name: &'a str,
    /// Rule tag for the engine's tag key; empty when absent.
    pub(crate) tag: &'a str,
    pub(crate) value: FieldValue<'a>,
    /// Record that declares the field: the top record or an embedded one.
    pub(crate) parent: &'a dyn Record,
}

/// Lists the fields of `record` in declaration order, reading tags under
/// `tag_key`. Embedded records contribute their fields in place.
pub(crate) fn walk<'a>(record: &'a dyn Record, tag_key: &str) -> Vec<WalkedField<'a>> {
    let mut out = Vec::new();
    walk_into(record, tag_key, 0, &mut out);
    out
}

fn walk_into<'a>(
    record: &'a dyn Record,
    tag_key: &str,
    depth: usize,
    out: &mut Vec<WalkedField<'a>>,
) {
    for field in record.fields() {
        match field.source() {
            FieldSource::Value(value) => out.push(WalkedField {
                name: field.name(),
                tag: field.tag_value(tag_key).unwrap_or_default(),
                value,
                parent: record,
            }),
            FieldSource::Embedded(inner) if depth < MAX_EMBED_DEPTH => {
                walk_into(inner, tag_key, depth + 1, out);
            }
            FieldSource::Embedded(_) => {
                tracing::trace!(field = field.name(), depth, "Skipping deeply embedded record");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    struct Base {
        id: String,
    }

    impl Record for Base {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![Field::new("ID", &self.id).tag("valid", "required")]
        }
    }

    struct Post {
        base: Base,
        title: String,
        body: Option<String>,
    }

    impl Record for Post {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::embedded("Base", &self.base),
                Field::new("Title", &self.title).tag("valid", "required,min=3"),
                Field::new("Body", &self.body).tag("json", "body"),
            ]
        }
    }

    struct Wrapper {
        post: Post,
        note: String,
    }

    impl Record for Wrapper {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::embedded("Post", &self.post),
                Field::new("Note", &self.note).tag("valid", "max=10"),
            ]
        }
    }

    fn post() -> Post {
        Post {
            base: Base { id: "abc".into() },
            title: "t".into(),
            body: None,
        }
    }

    #[test]
    fn flattens_embedded_fields_in_place() {
        let post = post();
        let fields = walk(&post, "valid");
        let names: Vec<_> = fields.iter().map(|f| (f.name, f.tag)).collect();
        assert_eq!(
            names,
            [("ID", "required"), ("Title", "required,min=3"), ("Body", "")]
        );
        assert_eq!(fields[2].value, FieldValue::Nil);
    }

    #[test]
    fn reads_only_the_configured_key() {
        let post = post();
        let fields = walk(&post, "json");
        let tags: Vec<_> = fields.iter().map(|f| f.tag).collect();
        assert_eq!(tags, ["", "", "body"]);
    }

    #[test]
    fn embeds_below_the_first_level_are_skipped() {
        let wrapper = Wrapper {
            post: post(),
            note: "n".into(),
        };
        let names: Vec<_> = walk(&wrapper, "valid").iter().map(|f| f.name).collect();
        assert_eq!(names, ["Title", "Body", "Note"]);
    }
}
