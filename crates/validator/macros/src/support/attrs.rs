use syn::ext::IdentExt;
use syn::{Attribute, LitStr, Result};

/// Struct-level `#[record(...)]` options.
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    /// `#[record(messages)]`: delegate `Record::messages` to `FieldMessages`.
    pub messages: bool,
}

/// How a field is reported to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    /// A plain value checked by rules.
    #[default]
    Value,
    /// An embedded record, flattened into the parent.
    Embed,
    /// An opaque struct value.
    Nested,
    /// Not reported at all.
    Skip,
}

/// Field-level attributes.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub mode: FieldMode,
    pub rename: Option<LitStr>,
    /// `(key, tag string)` pairs in declaration order.
    pub tags: Vec<(String, LitStr)>,
}

pub fn parse_container(attrs: &[Attribute]) -> Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("messages") {
                out.messages = true;
                Ok(())
            } else {
                Err(meta.error("unknown `record` attribute, expected `messages`"))
            }
        })?;
    }
    Ok(out)
}

pub fn parse_field(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut out = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("record") {
            attr.parse_nested_meta(|meta| {
                let mode = if meta.path.is_ident("embed") {
                    FieldMode::Embed
                } else if meta.path.is_ident("nested") {
                    FieldMode::Nested
                } else if meta.path.is_ident("skip") {
                    FieldMode::Skip
                } else if meta.path.is_ident("rename") {
                    out.rename = Some(meta.value()?.parse()?);
                    return Ok(());
                } else {
                    return Err(meta.error(
                        "unknown `record` attribute, expected `embed`, `nested`, `skip` or `rename`",
                    ));
                };

                if out.mode != FieldMode::Value && out.mode != mode {
                    return Err(meta.error("`embed`, `nested` and `skip` are mutually exclusive"));
                }
                out.mode = mode;
                Ok(())
            })?;
        } else if attr.path().is_ident("tag") {
            attr.parse_nested_meta(|meta| {
                let key = meta
                    .path
                    .get_ident()
                    .ok_or_else(|| meta.error("tag keys must be plain identifiers"))?
                    .unraw()
                    .to_string();
                let value: LitStr = meta.value()?.parse()?;

                if out.tags.iter().any(|(k, _)| *k == key) {
                    return Err(meta.error(format!("duplicate tag key `{key}`")));
                }
                out.tags.push((key, value));
                Ok(())
            })?;
        }
    }

    Ok(out)
}
