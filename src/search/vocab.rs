// ABOUTME: Forgivable pantry staples, descriptive modifiers and allowed-vocabulary assembly
// ABOUTME: Fixed word lists that keep common tokens out of the missing-penalty count
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Allowed vocabulary
//!
//! The missing penalty counts a recipe's tokens that fall outside the allowed
//! vocabulary: the expansions of the user's MUST and OPTIONAL terms, plus two
//! fixed lists. Forgivable staples are assumed always available (salt, oil,
//! flour and friends) and descriptive modifiers are prep/size/color words that
//! never name an ingredient on their own. Neither list counts as a match;
//! they just do not penalize.

use super::expand::expand_all;
use std::collections::BTreeSet;

/// Pantry staples assumed always available
pub const FORGIVABLE: [&str; 31] = [
    "salt",
    "pepper",
    "olive",
    "oil",
    "vegetable",
    "butter",
    "sugar",
    "garlic",
    "onion",
    "vinegar",
    "soy",
    "sauce",
    "ketchup",
    "mustard",
    "mayonnaise",
    "lemon",
    "lime",
    "water",
    "stock",
    "broth",
    "flour",
    "baking",
    "powder",
    "soda",
    "tomato",
    "paste",
    "vanilla",
    "extract",
    "cocoa",
    "yeast",
    "honey",
];

/// Descriptive modifiers: prep, size and color words
pub const MODIFIERS: [&str; 24] = [
    "fresh",
    "dried",
    "ground",
    "large",
    "small",
    "medium",
    "chopped",
    "minced",
    "diced",
    "sliced",
    "shredded",
    "grated",
    "peeled",
    "seeded",
    "boneless",
    "skinless",
    "red",
    "yellow",
    "green",
    "brown",
    "semi",
    "sweet",
    "all",
    "purpose",
];

/// Build the allowed vocabulary for a request: the union of MUST and OPTIONAL
/// expansions with the forgivable staples and modifiers. Tokens outside this
/// set count toward the missing penalty.
#[must_use]
pub fn allowed_vocabulary(must: &[String], optional: &[String]) -> BTreeSet<String> {
    let mut allowed = expand_all(must.iter().chain(optional.iter()));
    allowed.extend(FORGIVABLE.iter().map(ToString::to_string));
    allowed.extend(MODIFIERS.iter().map(ToString::to_string));
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staples_and_modifiers_are_allowed() {
        let allowed = allowed_vocabulary(&[], &[]);
        assert!(allowed.contains("salt"));
        assert!(allowed.contains("honey"));
        assert!(allowed.contains("fresh"));
        assert!(allowed.contains("purpose"));
    }

    #[test]
    fn test_term_expansions_are_allowed() {
        let allowed = allowed_vocabulary(&["tomato".into()], &["basil".into()]);
        assert!(allowed.contains("tomatoes"));
        assert!(allowed.contains("basil"));
        assert!(allowed.contains("basils"));
    }

    #[test]
    fn test_unrelated_tokens_are_not_allowed() {
        let allowed = allowed_vocabulary(&["chicken".into()], &[]);
        assert!(!allowed.contains("saffron"));
        assert!(!allowed.contains("anchovy"));
    }

    #[test]
    fn test_lists_contain_no_duplicates() {
        let mut seen = BTreeSet::new();
        for word in FORGIVABLE.iter().chain(MODIFIERS.iter()) {
            assert!(seen.insert(*word), "duplicate vocabulary word {word}");
        }
    }
}
