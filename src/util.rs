//! Helpers for whitespace-separated character identifier strings
//!
//! TEI `who` attributes and the `onstage`/`speaker` columns all carry
//! identifiers such as `#Theseus_MND`, separated by arbitrary whitespace.

use std::collections::BTreeSet;
use std::path::Path;

/// Split an identifier string into a sorted, deduplicated list.
pub fn character_string_to_sorted_list(characters: &str) -> Vec<String> {
    string_to_set(characters).into_iter().collect()
}

/// Split an identifier string into a set.
pub fn string_to_set(characters: &str) -> BTreeSet<String> {
    characters.split_whitespace().map(str::to_string).collect()
}

/// Sort and join identifiers with single spaces.
pub fn sort_join_strings<I, S>(identifiers: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = identifiers
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    sorted.sort();
    sorted.join(" ")
}

/// Canonical form of an identifier string: split, dedupe, sort, rejoin.
pub fn normalize_characters(characters: &str) -> String {
    sort_join_strings(string_to_set(characters))
}

/// Extract the character name from an identifier of shape `#Name_PLAY`.
pub fn name_from_identifier(identifier: &str) -> String {
    identifier
        .split('_')
        .next()
        .unwrap_or_default()
        .replace('#', "")
}

/// File stem of `path`; unless `full`, only the part before the first `_`.
///
/// `a-midsummer-nights-dream_TEIsimple_FolgerShakespeare.xml` yields
/// `a-midsummer-nights-dream`.
pub fn filename_base(path: &Path, full: bool) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    if full {
        stem
    } else {
        stem.split('_').next().unwrap_or_default().to_string()
    }
}
