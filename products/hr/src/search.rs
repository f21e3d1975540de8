//! Tokenizing and result merging for the name searches.

use std::collections::HashSet;

use crate::Employee;

/// Splits free-text input on single spaces and drops trailing empty tokens.
///
/// Interior and leading empty tokens are kept: `"John  Doe"` yields
/// `["John", "", "Doe"]` and `" Doe"` yields `["", "Doe"]`.
pub(crate) fn split_terms(input: &str) -> Vec<&str> {
    let mut terms: Vec<&str> = input.split(' ').collect();
    while terms.last().is_some_and(|term| term.is_empty()) {
        terms.pop();
    }
    terms
}

/// Splits a full name on its first whitespace run. The remainder, trimmed,
/// is the last name, so `"Mary Ann Smith"` gives `("Mary", "Ann Smith")`.
pub(crate) fn split_full_name(full_name: &str) -> Option<(&str, &str)> {
    let (first, last) = full_name.trim().split_once(char::is_whitespace)?;
    let last = last.trim();
    if first.is_empty() || last.is_empty() {
        return None;
    }
    Some((first, last))
}

/// Drops structurally equal repeats. The surviving order is not part of the
/// search contract.
pub(crate) fn dedupe(records: Vec<Employee>) -> Vec<Employee> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}
