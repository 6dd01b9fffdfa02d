//! Size and comparison rules
//!
//! "Size" depends on the kind: character count for strings, the value itself
//! for numbers, element count for collections and maps. Sizes and integers
//! are compared against the parameter as `i128`, so a negative parameter is a
//! valid bound for unsigned values too. Floats compare as `f64`.

use std::cmp::Ordering;

use crate::record::FieldValue;
use crate::registry::FieldContext;

/// Compares the value's size against the parameter.
fn compare_size(ctx: &FieldContext<'_>) -> Option<Ordering> {
    match ctx.value() {
        FieldValue::Str(s) => compare_wide(s.chars().count() as i128, ctx),
        FieldValue::Collection(len) | FieldValue::Map(len) => compare_wide(len as i128, ctx),
        _ => compare_number(ctx),
    }
}

/// Compares a numeric value against the parameter; `None` for other kinds.
fn compare_number(ctx: &FieldContext<'_>) -> Option<Ordering> {
    match ctx.value() {
        FieldValue::Int(n) => compare_wide(i128::from(n), ctx),
        FieldValue::Uint(n) => compare_wide(i128::from(n), ctx),
        FieldValue::Float(n) => n.partial_cmp(&ctx.param_as::<f64>()?),
        _ => None,
    }
}

fn compare_wide(n: i128, ctx: &FieldContext<'_>) -> Option<Ordering> {
    Some(n.cmp(&ctx.param_as::<i128>()?))
}

/// Equality with the parameter, by text, value or size.
fn equals_param(ctx: &FieldContext<'_>) -> Option<bool> {
    match ctx.value() {
        FieldValue::Str(s) => Some(s == ctx.param()),
        FieldValue::Bool(b) => Some(b == ctx.param_as::<bool>()?),
        _ => compare_size(ctx).map(Ordering::is_eq),
    }
}

/// Size or value equals the parameter.
pub fn len(ctx: &FieldContext<'_>) -> bool {
    compare_size(ctx).is_none_or(Ordering::is_eq)
}

/// Size or value is at least the parameter.
pub fn min(ctx: &FieldContext<'_>) -> bool {
    compare_size(ctx).is_none_or(Ordering::is_ge)
}

/// Size or value is at most the parameter.
pub fn max(ctx: &FieldContext<'_>) -> bool {
    compare_size(ctx).is_none_or(Ordering::is_le)
}

/// Text, boolean, size or value equals the parameter.
pub fn eq(ctx: &FieldContext<'_>) -> bool {
    equals_param(ctx).unwrap_or(true)
}

/// Text, boolean, size or value differs from the parameter.
pub fn ne(ctx: &FieldContext<'_>) -> bool {
    equals_param(ctx).is_none_or(|equal| !equal)
}

/// Number is greater than the parameter.
pub fn gt(ctx: &FieldContext<'_>) -> bool {
    compare_number(ctx).is_none_or(Ordering::is_gt)
}

/// Number is at least the parameter.
pub fn gte(ctx: &FieldContext<'_>) -> bool {
    compare_number(ctx).is_none_or(Ordering::is_ge)
}

/// Number is less than the parameter.
pub fn lt(ctx: &FieldContext<'_>) -> bool {
    compare_number(ctx).is_none_or(Ordering::is_lt)
}

/// Number is at most the parameter.
pub fn lte(ctx: &FieldContext<'_>) -> bool {
    compare_number(ctx).is_none_or(Ordering::is_le)
}
