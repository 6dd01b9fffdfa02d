//! Tag parser
//!
//! A rule tag is a small textual language: rules separated by `,`, each rule
//! optionally followed by `=` and a parameter.
//!
//! ```text
//! required,min=3,max=64
//! ```
//!
//! Only the first `=` splits name from parameter, so `oneof=a=b` has the
//! parameter `a=b`. The empty tag and the tag `-` carry no rules.
//!
//! The evaluator only ever sees [`RuleInvocation`]s, never tag text.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Separator between rules.
pub const RULE_SEPARATOR: char = ',';

/// Separator between a rule name and its parameter.
pub const PARAM_SEPARATOR: char = '=';

/// Tag value meaning "this field has no rules".
pub const SKIP_TAG: &str = "-";

// ============================================================================
// RULE INVOCATION
// ============================================================================

/// One rule attached to a field: a rule name and its parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleInvocation {
    name: String,
    param: String,
}

impl RuleInvocation {
    /// Creates an invocation. An empty `param` means "no parameter".
    pub fn new(name: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
        }
    }

    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule parameter; empty when the tag entry had none.
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Returns true if the tag entry carried a parameter.
    pub fn has_param(&self) -> bool {
        !self.param.is_empty()
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parses a rule tag, rejecting entries without a rule name.
///
/// # Examples
///
/// ```rust
/// use zero_validator::tag::parse_tag;
///
/// let rules = parse_tag("required,min=3").unwrap();
/// assert_eq!(rules[0].name(), "required");
/// assert_eq!(rules[1].param(), "3");
/// assert!(parse_tag("required,,min=3").is_err());
/// ```
pub fn parse_tag(tag: &str) -> Result<Vec<RuleInvocation>> {
    let mut rules = Vec::new();
    for entry in entries(tag) {
        rules.push(parse_entry(entry).ok_or_else(|| {
            Error::malformed_tag(tag, format!("entry `{entry}` has no rule name"))
        })?);
    }
    Ok(rules)
}

/// Parses a rule tag, dropping entries without a rule name.
///
/// Returns the rules that did parse and whether anything was dropped.
pub(crate) fn parse_tag_lenient(tag: &str) -> (Vec<RuleInvocation>, bool) {
    let mut dropped = false;
    let rules = entries(tag)
        .filter_map(|entry| {
            let rule = parse_entry(entry);
            dropped |= rule.is_none();
            rule
        })
        .collect();
    (rules, dropped)
}

fn entries(tag: &str) -> impl Iterator<Item = &str> {
    let tag = tag.trim();
    let body = if tag == SKIP_TAG { "" } else { tag };
    // `split` on an empty string still yields one empty item.
    body.split(RULE_SEPARATOR)
        .filter(move |_| !body.is_empty())
}

fn parse_entry(entry: &str) -> Option<RuleInvocation> {
    let (name, param) = match entry.split_once(PARAM_SEPARATOR) {
        Some((name, param)) => (name.trim(), param),
        None => (entry.trim(), ""),
    };
    if name.is_empty() {
        return None;
    }
    Some(RuleInvocation::new(name, param))
}

// ============================================================================
// CACHE
// ============================================================================

/// Parsed tags keyed by their source text.
///
/// Tags are static per field declaration, so each distinct tag is parsed
/// once, on first use. Malformed tags are reported (by the caller) once,
/// at the moment they enter the cache.
///
/// The cache holds at most `capacity` tags. Past that, new tags are parsed
/// on every call and never stored.
#[derive(Debug)]
pub(crate) struct TagCache {
    parsed: RwLock<HashMap<String, Arc<[RuleInvocation]>>>,
    capacity: usize,
}

impl TagCache {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            parsed: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Returns the parsed rules for `tag`, parsing and caching on a miss.
    ///
    /// The boolean is `true` only for the call that first parsed a tag that
    /// had malformed entries, or for every call once the tag cannot be cached.
    pub(crate) fn get_or_parse(&self, tag: &str) -> (Arc<[RuleInvocation]>, bool) {
        if let Some(rules) = self.parsed.read().get(tag) {
            return (Arc::clone(rules), false);
        }

        let (rules, dropped) = parse_tag_lenient(tag);
        let rules: Arc<[RuleInvocation]> = rules.into();
        let mut parsed = self.parsed.write();
        if let Some(cached) = parsed.get(tag) {
            // Another caller won the race.
            return (Arc::clone(cached), false);
        }
        if parsed.len() < self.capacity {
            parsed.insert(tag.to_owned(), Arc::clone(&rules));
        }
        (rules, dropped)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.parsed.read().len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn names(rules: &[RuleInvocation]) -> Vec<(&str, &str)> {
        rules.iter().map(|r| (r.name(), r.param())).collect()
    }

    #[test]
    fn splits_rules_and_params_in_order() {
        let rules = parse_tag("required,min=3,max=64").unwrap();
        assert_eq!(
            names(&rules),
            [("required", ""), ("min", "3"), ("max", "64")]
        );
        assert!(!rules[0].has_param());
        assert!(rules[1].has_param());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("-")]
    fn empty_tags_have_no_rules(#[case] tag: &str) {
        assert!(parse_tag(tag).unwrap().is_empty());
    }

    #[test]
    fn only_first_equals_splits() {
        let rules = parse_tag("oneof=a=b").unwrap();
        assert_eq!(names(&rules), [("oneof", "a=b")]);
    }

    #[test]
    fn trims_rule_names() {
        let rules = parse_tag(" required , min=3").unwrap();
        assert_eq!(names(&rules), [("required", ""), ("min", "3")]);
    }

    #[test]
    fn unknown_names_are_kept() {
        let rules = parse_tag("requird").unwrap();
        assert_eq!(names(&rules), [("requird", "")]);
    }

    #[rstest]
    #[case("required,,min=3")]
    #[case("=3")]
    #[case("required,")]
    fn rejects_entries_without_a_name(#[case] tag: &str) {
        let err = parse_tag(tag).unwrap_err();
        assert_eq!(err.code(), "TAG_MALFORMED");
    }

    #[test]
    fn lenient_parse_drops_bad_entries() {
        let (rules, dropped) = parse_tag_lenient("required,,min=3");
        assert!(dropped);
        assert_eq!(names(&rules), [("required", ""), ("min", "3")]);
    }

    #[test]
    fn cache_parses_each_tag_once() {
        let cache = TagCache::with_capacity(4);
        let (first, dropped) = cache.get_or_parse("required,,min=3");
        assert!(dropped);
        let (second, dropped_again) = cache.get_or_parse("required,,min=3");
        assert!(!dropped_again);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_stops_growing_at_capacity() {
        let cache = TagCache::with_capacity(2);
        for i in 0..10 {
            let (rules, _) = cache.get_or_parse(&format!("max={i}"));
            assert_eq!(names(&rules), [("max", i.to_string().as_str())]);
        }
        assert_eq!(cache.len(), 2);

        let (first, _) = cache.get_or_parse("max=0");
        let (again, _) = cache.get_or_parse("max=0");
        assert!(Arc::ptr_eq(&first, &again));

        let (uncached, _) = cache.get_or_parse("max=9");
        let (reparsed, _) = cache.get_or_parse("max=9");
        assert!(!Arc::ptr_eq(&uncached, &reparsed));
    }

    #[test]
    fn uncached_malformed_tags_report_every_time() {
        let cache = TagCache::with_capacity(0);
        assert!(cache.get_or_parse("required,,min=3").1);
        assert!(cache.get_or_parse("required,,min=3").1);
        assert_eq!(cache.len(), 0);
    }
}
