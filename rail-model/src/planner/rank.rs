//! Tie-breaking between equally quick paths.
//!
//! Only consulted when two paths reach the same point at exactly the same
//! total time. Total time itself is never affected.

use std::cmp::Ordering;

use crate::domain::ChangeId;
use crate::network::Network;

/// Compare two equally quick paths by the changes they use.
///
/// Paths are ranked by:
/// 1. Registered preferences (a path using the preferred change of a
///    preference beats one using its alternative)
/// 2. Number of changes (fewer is better)
///
/// Returns `Ordering::Less` if `candidate` should replace `incumbent`.
/// `Equal` means neither is better and the incumbent stays.
pub fn compare_tied(network: &Network, candidate: &[ChangeId], incumbent: &[ChangeId]) -> Ordering {
    let candidate_favoured = favours(network, candidate, incumbent);
    let incumbent_favoured = favours(network, incumbent, candidate);

    match (candidate_favoured, incumbent_favoured) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // No preference applies, or they pull both ways
        _ => candidate.len().cmp(&incumbent.len()),
    }
}

/// True if some change in `ours` is preferred over some change in `theirs`.
fn favours(network: &Network, ours: &[ChangeId], theirs: &[ChangeId]) -> bool {
    ours.iter()
        .any(|a| theirs.iter().any(|b| network.is_preferred(*a, *b)))
}
