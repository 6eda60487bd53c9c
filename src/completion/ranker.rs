/*!
 * Prefix ranking
 *
 * Orders candidates by how many leading bytes they share with the typed
 * prefix. This is a closeness heuristic, not a filter: candidates sharing
 * nothing are kept and simply sort last.
 */

use std::cmp::Reverse;

/// Number of leading bytes `candidate` and `prefix` have in common.
pub fn shared_prefix_len(candidate: &str, prefix: &str) -> usize {
    candidate
        .bytes()
        .zip(prefix.bytes())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Candidates sorted by descending shared prefix length.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank<T: AsRef<str> + Clone>(candidates: &[T], prefix: &str) -> Vec<T> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by_key(|c| Reverse(shared_prefix_len(c.as_ref(), prefix)));
    ranked
}
