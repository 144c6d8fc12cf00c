//! Predicate matching over in-memory collections.
//!
//! Used wherever the remote API only exposes a list endpoint and the
//! reconciler must locate one entity client-side. Predicates are plain
//! closures; selector types build them from whichever attributes the
//! caller actually specified (unspecified attributes always match).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("given filter does not match any item")]
    NoResults,

    #[error("given filter applies to more than one result")]
    AmbiguousResults,
}

/// All items the predicate holds for, in input order. Never mutates, never
/// allocates beyond the result vector; calling twice yields the same result.
pub fn find<T, P>(predicate: P, items: &[T]) -> Vec<&T>
where
    P: Fn(&T) -> bool,
{
    items.iter().filter(|item| predicate(item)).collect()
}

/// Exactly one match or an error.
///
/// More than one match is an error rather than a first-wins pick: a lookup
/// that is used as a stable identity must stay deterministic even when the
/// API reorders its collection.
pub fn find_one<T, P>(predicate: P, items: &[T]) -> Result<&T, FilterError>
where
    P: Fn(&T) -> bool,
{
    let mut matches = items.iter().filter(|item| predicate(item));

    let first = matches.next().ok_or(FilterError::NoResults)?;
    if matches.next().is_some() {
        return Err(FilterError::AmbiguousResults);
    }

    Ok(first)
}
