//! Term predicates and final query assembly.
//!
//! Each search term becomes an OR across the enabled search keys. Terms are
//! then folded left to right: `OR t` replaces the last predicate with
//! `OR(last, t)`, while `AND t` (or no connective) appends `t`. The folded
//! list and the filter predicate are AND-ed into the query predicate.

use super::filters::build_filter_predicate;
use super::params::{SearchKey, SearchParams};
use super::predicate::{Field, Predicate, Value};
use super::tokenizer::{tokenize, Connective, Token};

/// Predicate true when `token` matches any of `keys`.
pub fn term_predicate(token: &Token, keys: &[SearchKey]) -> Predicate {
    let fields = keys.iter().flat_map(|key| match key {
        SearchKey::ProductName => &[Field::ProductName][..],
        SearchKey::BusinessName => &[Field::BusinessName][..],
        SearchKey::Address => &[Field::AddressCity, Field::AddressCountry][..],
    });

    Predicate::any(fields.map(|&field| {
        if token.is_full_match() {
            Predicate::equals(field, Value::Text(token.term().to_string()))
        } else {
            Predicate::contains(field, token.term())
        }
    }))
}

/// Fold term predicates per their connectives.
pub fn fold_terms(tokens: &[Token], keys: &[SearchKey]) -> Vec<Predicate> {
    let mut folded: Vec<Predicate> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let predicate = term_predicate(token, keys);
        match (token.connective, folded.pop()) {
            (Some(Connective::Or), Some(last)) => {
                folded.push(Predicate::any([last, predicate]));
            }
            (_, last) => {
                folded.extend(last);
                folded.push(predicate);
            }
        }
    }

    folded
}

/// Build the full query predicate for a normalized search.
///
/// At most `max_terms` terms are used; the rest are dropped with a warning.
pub fn build_listing_predicate(params: &SearchParams, max_terms: usize) -> Predicate {
    let mut tokens = tokenize(&params.query);
    if tokens.len() > max_terms {
        tracing::warn!(
            terms = tokens.len(),
            max_terms,
            "Search query has too many terms, extra terms ignored"
        );
        tokens.truncate(max_terms);
    }

    let search = Predicate::all(fold_terms(&tokens, &params.search_keys));
    let filters = build_filter_predicate(params);

    tracing::debug!(
        terms = tokens.len(),
        search = %search,
        filters = %filters,
        "Assembled listing search predicate"
    );

    Predicate::all([search, filters])
}
