//! String specifications for elements and nodes.
//!
//! Grammar:
//!
//! ```text
//! element := "{" list "}" | list
//! list    := index ("," index)*
//! node    := ("{" list "}")+
//! ```
//!
//! e.g. `0,1` or `{0,1}` for an element, `{0}{1,2}` for a node. Node
//! braces are mandatory.

use crate::error::{PidError, Result};

use super::SourceSet;

/// Parse an element specification into its member-set.
pub fn parse_element_spec(spec: &str) -> Result<SourceSet> {
    let trimmed = spec.trim();
    let inner = match (trimmed.strip_prefix('{'), trimmed.ends_with('}')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => trimmed,
        _ => return Err(PidError::malformed(spec, "unbalanced braces")),
    };
    parse_index_list(spec, inner)
}

/// Parse a node specification into its canonical (sorted, deduplicated)
/// list of member-sets.
pub fn parse_node_spec(spec: &str) -> Result<Vec<SourceSet>> {
    let trimmed = spec.trim();
    if !trimmed.starts_with('{') || !trimmed.ends_with('}') || trimmed.len() < 2 {
        return Err(PidError::malformed(
            spec,
            "node must start and end with curly braces",
        ));
    }
    let inner = &trimmed[1..trimmed.len() - 1];

    let mut sets = Vec::new();
    for part in inner.split("}{") {
        sets.push(parse_index_list(spec, part)?);
    }
    Ok(canonicalize(sets))
}

/// Sort member-sets into canonical order and drop duplicates.
pub fn canonicalize(mut sets: Vec<SourceSet>) -> Vec<SourceSet> {
    sets.sort_by(|a, b| a.canonical_cmp(b));
    sets.dedup();
    sets
}

fn parse_index_list(spec: &str, list: &str) -> Result<SourceSet> {
    if list.trim().is_empty() {
        return Err(PidError::malformed(spec, "empty elements are not allowed"));
    }
    let mut set = SourceSet::empty();
    for token in list.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(PidError::malformed(spec, "empty source index"));
        }
        if token.contains(['{', '}']) {
            return Err(PidError::malformed(spec, "misplaced curly brace"));
        }
        let index: usize = token
            .parse()
            .map_err(|_| PidError::malformed(spec, format!("'{}' is not a source index", token)))?;
        if !set.insert(index) {
            return Err(PidError::malformed(spec, format!("source index {} too large", index)));
        }
    }
    Ok(set)
}
