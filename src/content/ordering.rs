//! Ordering of pages in navigation and of sections within a page.

use std::collections::HashSet;

use thiserror::Error;

/// Why a submitted page order was rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderingError {
    #[error("page {0} is listed more than once")]
    Duplicate(i32),

    #[error("page {0} does not exist")]
    Unknown(i32),

    #[error("order must list every page ({0} missing)")]
    Missing(usize),
}

/// Order value for the next section given the current maximum.
pub fn next_order(current_max: Option<i32>) -> i32 {
    current_max.map_or(1, |max| max + 1)
}

/// A submitted page order must be a permutation of the existing page ids.
pub fn validate_page_order(submitted: &[i32], existing: &[i32]) -> Result<(), OrderingError> {
    let existing: HashSet<i32> = existing.iter().copied().collect();
    let mut seen: HashSet<i32> = HashSet::with_capacity(submitted.len());

    for id in submitted {
        if !seen.insert(*id) {
            return Err(OrderingError::Duplicate(*id));
        }
        if !existing.contains(id) {
            return Err(OrderingError::Unknown(*id));
        }
    }

    let missing = existing.len() - seen.len();
    if missing > 0 {
        return Err(OrderingError::Missing(missing));
    }

    Ok(())
}
