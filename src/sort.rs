//! Ordering rules: ranked key sorting and name-based sequence sorting.
//!
//! A [`RankTable`] maps a field name to a sort priority. Sorting a mapping's
//! pair list by `(rank, key name)` gives every structural block a canonical
//! field order: ranked keys appear in table order, and keys absent from the
//! table share the [`UNRANKED`] sentinel rank, which places them after all
//! ranked keys in alphabetical order. Both sorts are stable and idempotent,
//! which is what makes the formatter's output diff-stable across re-runs.
//!
//! Tables are plain ordered maps passed per call, never global state, so the
//! sorters can be exercised with arbitrary tables in tests.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::node::Node;

/// An explicit field-name → priority table.
pub type RankTable = IndexMap<String, u32>;

/// Rank assigned to any key absent from the table. Greater than every
/// explicit rank, so unknown fields always sort last.
pub const UNRANKED: u32 = 1000;

/// Builds a [`RankTable`](crate::sort::RankTable) from `"key" => rank` entries.
///
/// ```rust
/// use tekfmt::rank_table;
///
/// let table = rank_table! {
///     "name" => 1,
///     "image" => 2,
/// };
/// assert_eq!(table.get("image"), Some(&2));
/// ```
#[macro_export]
macro_rules! rank_table {
    ($($key:literal => $rank:expr),* $(,)?) => {{
        let mut table = $crate::sort::RankTable::new();
        $(table.insert(($key).to_string(), $rank);)*
        table
    }};
}

/// Reorders a mapping's pairs in place by `(rank, key name)` ascending.
///
/// The sort is stable, adds or removes nothing, and moves the original
/// nodes. Sorting an already sorted list is a no-op.
pub fn ranked_pair_sort(pairs: &mut [(Node, Node)], rank: &RankTable) {
    pairs.sort_by(|(k1, _), (k2, _)| compare_keys(k1, k2, rank));
}

fn compare_keys(k1: &Node, k2: &Node, rank: &RankTable) -> Ordering {
    let n1 = k1.scalar_value().unwrap_or("");
    let n2 = k2.scalar_value().unwrap_or("");
    rank_of(n1, rank)
        .cmp(&rank_of(n2, rank))
        .then_with(|| n1.cmp(n2))
}

fn rank_of(name: &str, rank: &RankTable) -> u32 {
    rank.get(name).copied().unwrap_or(UNRANKED)
}

/// Applies [`ranked_pair_sort`] to a mapping node (descending through a
/// document). Non-mapping nodes are left alone.
pub fn ranked_key_sort(node: &mut Node, rank: &RankTable) {
    if let Some(pairs) = node.entries_mut() {
        ranked_pair_sort(pairs, rank);
    }
}

/// Sorts the sequence stored under `key` in `parent` by each element's
/// `name` field (missing names sort first, as the empty string), then
/// rank-sorts every element's own pairs with `rank`.
///
/// Absent or non-sequence fields are a no-op, not an error.
pub fn sort_by_name(parent: &mut Node, key: &str, rank: &RankTable) {
    let Some(found) = parent.find_mut(key) else {
        return;
    };
    let Some(items) = found.items_mut() else {
        return;
    };

    items.sort_by(|a, b| element_name(a).cmp(element_name(b)));

    for item in items {
        if let Some(pairs) = item.entries_mut() {
            ranked_pair_sort(pairs, rank);
        }
    }
}

fn element_name(node: &Node) -> &str {
    node.find("name").and_then(Node::scalar_value).unwrap_or("")
}

/// Recursive baseline sort: every mapping anywhere in the tree gets the
/// empty rank table, i.e. pure alphabetical key order. The targeted tables
/// applied afterwards override the blocks they own.
pub fn sort_everything(node: &mut Node) {
    match node {
        Node::Document(root) => sort_everything(root),
        Node::Mapping(pairs) => {
            ranked_pair_sort(pairs, &RankTable::new());
            for (_, value) in pairs.iter_mut() {
                sort_everything(value);
            }
        }
        Node::Sequence(items) => {
            for item in items {
                sort_everything(item);
            }
        }
        Node::Scalar(_) => {}
    }
}
