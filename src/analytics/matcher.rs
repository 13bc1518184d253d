//! Customer identity resolution and allowed-customer matching.

use std::collections::HashSet;

use crate::records::Quotation;

/// Which heuristics [`matches_allowed_with`] may use beyond exact and token
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    /// Allow the normalized and raw substring rules. These accept short
    /// entries inside unrelated names, e.g. `ace` inside `Pacer Lines`.
    pub substring: bool,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self { substring: true }
    }
}

/// The first non-blank of `customer`, `inquirySnapshot.customer`,
/// `customerName`, `customerCode`; empty when none is set.
pub fn resolve_customer_identity(quote: &Quotation) -> String {
    [
        quote.customer.as_deref(),
        quote.inquiry_snapshot.as_ref().and_then(|s| s.customer.as_deref()),
        quote.customer_name.as_deref(),
        quote.customer_code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|name| !name.is_empty())
    .unwrap_or_default()
    .to_string()
}

pub fn matches_allowed<S: AsRef<str>>(quote: &Quotation, allowed: &[S]) -> bool {
    matches_allowed_with(quote, allowed, MatchRules::default())
}

/// Whether the quotation's customer is one of `allowed`.
///
/// An entry matches on case-insensitive equality, on sharing any
/// alphanumeric token, or (with `rules.substring`) when the candidate
/// contains the entry either with punctuation stripped or verbatim.
pub fn matches_allowed_with<S: AsRef<str>>(quote: &Quotation, allowed: &[S], rules: MatchRules) -> bool {
    let candidate = resolve_customer_identity(quote).to_lowercase();
    if candidate.is_empty() {
        return false;
    }
    let candidate_tokens = tokens(&candidate);
    let candidate_compact = compact(&candidate);

    allowed
        .iter()
        .map(|entry| entry.as_ref().trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .any(|entry| {
            if entry == candidate {
                return true;
            }
            if tokens(&entry).iter().any(|t| candidate_tokens.contains(t)) {
                return true;
            }
            if !rules.substring {
                return false;
            }
            let entry_compact = compact(&entry);
            (!entry_compact.is_empty() && candidate_compact.contains(&entry_compact))
                || candidate.contains(&entry)
        })
}

fn tokens(s: &str) -> HashSet<&str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

fn compact(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect()
}
