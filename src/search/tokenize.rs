// ABOUTME: Tokenization of ingredient text into lowercase alphabetic words
// ABOUTME: Also provides the naive splitting fallbacks for raw ingredient and step blobs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tokenization and text splitting
//!
//! Tokens are lowercase ASCII-alphabetic runs. Underscores and hyphens are
//! separators, so `all_purpose-flour` yields `all`, `purpose`, `flour`.

/// Tokenize a piece of ingredient text into lowercase alphabetic words.
///
/// Non-letter characters (digits, punctuation, unicode symbols) separate
/// tokens and are discarded. Deduplication is the caller's concern: a recipe's
/// token set is the union over its lines.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphabetic() {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Split a raw delimited/bulleted ingredients blob into candidate lines.
///
/// Splits on newlines, bullets, semicolons and commas, trimming and discarding
/// empty fragments. Used when a recipe carries only a free-text blob, or when
/// a structured blob fails to parse.
#[must_use]
pub fn split_blob(raw: &str) -> Vec<String> {
    raw.split(['\n', '\u{2022}', ';', ','])
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Split a raw ingredients blob for display in the detail endpoint.
///
/// Prefers newline splitting when the blob contains newlines; otherwise falls
/// back to bullets, semicolons and commas. Commas inside a line-per-row blob
/// are usually quantity punctuation, not separators, hence the preference.
#[must_use]
pub fn split_blob_for_display(raw: &str) -> Vec<String> {
    let fragments: Vec<&str> = if raw.contains('\n') {
        raw.split('\n').collect()
    } else {
        raw.split(['\u{2022}', ';', ',']).collect()
    };
    fragments
        .into_iter()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Split a raw steps blob into instruction steps.
///
/// Splits on newline runs and on sentence boundaries (a period followed by
/// whitespace). The trailing period of each sentence is dropped with the
/// boundary, matching how step arrays are usually stored.
#[must_use]
pub fn split_steps(raw: &str) -> Vec<String> {
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        let boundary = ch == '\n' || (ch == '.' && chars.peek().is_some_and(|c| c.is_whitespace()));
        if boundary {
            let step = current.trim();
            if !step.is_empty() {
                steps.push(step.to_owned());
            }
            current.clear();
        } else {
            current.push(ch);
        }
    }
    let step = current.trim();
    if !step.is_empty() {
        steps.push(step.to_owned());
    }
    steps
}
