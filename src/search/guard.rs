// ABOUTME: Context guard deciding whether an ingredient line really contains a variant
// ABOUTME: Suppresses substring matches disqualified by continuation phrases like " powder"
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Context guard
//!
//! A naive substring test would let "garlic" match "garlic powder" and
//! "chicken" match "chicken broth". The guard rejects a line when it contains
//! the variant followed by any disqualifying continuation phrase.
//!
//! Known edge case, preserved deliberately: the disqualification is line-wide,
//! not anchored to the matched occurrence. A line such as
//! "chicken thigh in chicken broth" fails the guard for "chicken" even though
//! the first occurrence is a clean match. MUST and OPTIONAL matching use the
//! guard; EXCLUDE matching is intentionally broad and does not.

/// Continuation phrases that disqualify a variant occurrence
pub const DISALLOWED_FOLLOW: [&str; 10] = [
    " powder",
    " broth",
    " stock",
    " bouillon",
    " extract",
    " seasoning",
    " sauce",
    " mix",
    " gravy",
    " condensed",
];

/// Context-guarded containment: true iff the lowercased line contains the
/// variant and does not contain the variant followed by a disqualifier
/// anywhere in the line.
#[must_use]
pub fn line_matches_guarded(line: &str, variant: &str) -> bool {
    let line = line.to_lowercase();
    if !line.contains(variant) {
        return false;
    }
    !DISALLOWED_FOLLOW
        .iter()
        .any(|follow| line.contains(&format!("{variant}{follow}")))
}

/// Broad containment with no guard, used for EXCLUDE matching.
#[must_use]
pub fn line_matches_broad(line: &str, variant: &str) -> bool {
    line.to_lowercase().contains(variant)
}
