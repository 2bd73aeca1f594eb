//! Fuzzy name matching between scanned text and known items.
//!
//! A candidate matches when, compared case-insensitively, its name equals the
//! query, is contained in the query, or contains the query. The first matching
//! candidate in input order wins; there is no similarity ranking, so
//! "Milk" and "Almond Milk" resolve to whichever comes first.

use crate::item::InventoryItem;

/// Index of the first candidate matching `query`, if any.
///
/// Blank queries never match. Candidates with blank names are skipped, since
/// an empty name is a substring of everything.
pub fn find_match_index(query: &str, candidates: &[InventoryItem]) -> Option<usize> {
    if query.trim().is_empty() {
        return None;
    }
    let query = query.to_lowercase();

    candidates.iter().position(|candidate| {
        if candidate.name().trim().is_empty() {
            return false;
        }
        let name = candidate.name().to_lowercase();
        name == query || query.contains(&name) || name.contains(&query)
    })
}

/// First candidate matching `query`, if any. See [`find_match_index`].
pub fn find_match<'a>(query: &str, candidates: &'a [InventoryItem]) -> Option<&'a InventoryItem> {
    find_match_index(query, candidates).map(|i| &candidates[i])
}
