//! Unique-leader selection shared by vote tallies and forecast distances.

use std::cmp::Reverse;

/// Key of the single entry holding the maximum value.
///
/// Returns None when the input is empty or the maximum is shared. The result
/// does not depend on input order.
pub fn unique_max<K, V: Ord + Copy>(entries: impl IntoIterator<Item = (K, V)>) -> Option<K> {
    let entries: Vec<(K, V)> = entries.into_iter().collect();
    let best = entries.iter().map(|(_, value)| *value).max()?;

    let mut leaders = entries.into_iter().filter(|(_, value)| *value == best);
    let (leader, _) = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some(leader)
}

/// Key of the single entry holding the minimum value.
pub fn unique_min<K, V: Ord + Copy>(entries: impl IntoIterator<Item = (K, V)>) -> Option<K> {
    unique_max(entries.into_iter().map(|(key, value)| (key, Reverse(value))))
}
