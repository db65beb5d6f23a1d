// ABOUTME: Morphological variant expansion for pantry terms
// ABOUTME: Pure, total expansion of one normalized term into plural/spelling variants
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Term expansion
//!
//! `expand` turns one user-supplied ingredient word or phrase into the set of
//! variants that are tested against ingredient lines: the term itself,
//! underscore/space alternations, and a fixed sequence of plural heuristics.
//! The rules are non-exclusive: every rule that applies contributes its
//! variant. Some rules are lossy ("ses" and "es" both strip the same suffix),
//! which is deliberate: over-generating variants costs a few extra substring
//! probes, under-generating loses matches.

use std::collections::BTreeSet;

/// Expand one term into its morphological variants.
///
/// Pure, deterministic and total: any input yields a (possibly empty) set.
/// Blank input yields the empty set. The input is re-normalized defensively
/// (trim + lowercase) so callers can pass raw strings.
#[must_use]
pub fn expand(term: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let t = term.trim().to_lowercase();
    if t.is_empty() {
        return out;
    }

    out.insert(t.clone());
    out.insert(t.replace(['_', '-'], " "));
    out.insert(t.replace(' ', "_"));

    if let Some(stem) = t.strip_suffix("ies") {
        out.insert(format!("{stem}y"));
    }
    if t.ends_with("ses") {
        out.insert(t[..t.len() - 2].to_string());
    }
    if let Some(stem) = t.strip_suffix("es") {
        out.insert(stem.to_string());
    }
    if let Some(stem) = t.strip_suffix('s') {
        out.insert(stem.to_string());
    }
    out.insert(format!("{t}s"));
    if let Some(stem) = t.strip_suffix('y') {
        out.insert(format!("{stem}ies"));
    }
    if t.ends_with('o') {
        out.insert(format!("{t}es"));
    }

    out
}

/// Expand a list of terms into the deduplicated union of per-term expansions.
#[must_use]
pub fn expand_all<I, S>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = BTreeSet::new();
    for term in terms {
        out.extend(expand(term.as_ref()));
    }
    out
}
