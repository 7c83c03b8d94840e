//! Bounded breadth-first walk over a member's binary subtree.
//!
//! The commission engine walks with the tier cap as budget; reporting walks
//! with an unlimited budget to size teams. Both share this traversal, so the
//! visiting order seen by payouts and by reports is always the same.

use super::{index, Network, NetworkError};
use crate::domain::{Member, MemberId};
use std::collections::VecDeque;

impl Network {
    /// Visit descendants of `root` breadth-first, left before right.
    ///
    /// `root` sits at depth 0 and is not visited; its children are at depth 1.
    /// The walk stops after `max_nodes` descendants have been visited, so
    /// deeper or later nodes are skipped once the budget is spent. Returns
    /// the number of visited descendants.
    pub fn walk_descendants<F>(
        &self,
        root: MemberId,
        max_nodes: usize,
        mut visit: F,
    ) -> Result<usize, NetworkError>
    where
        F: FnMut(&Member, u32),
    {
        let start = self.get(root)?;
        let mut queue: VecDeque<(MemberId, u32)> = start.children().map(|c| (c, 1)).collect();
        let mut visited = 0;

        while visited < max_nodes {
            let Some((id, depth)) = queue.pop_front() else {
                break;
            };
            let node = &self.members[index(id)];
            visit(node, depth);
            visited += 1;
            queue.extend(node.children().map(|c| (c, depth + 1)));
        }

        Ok(visited)
    }

    /// Count of every member below `id` in the binary tree.
    pub fn subtree_size(&self, id: MemberId) -> Result<usize, NetworkError> {
        self.walk_descendants(id, usize::MAX, |_, _| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tier;

    fn id(n: u64) -> MemberId {
        MemberId::new(n)
    }

    fn perfect_tree(levels: u32) -> Network {
        let mut network = Network::with_root("root", Tier::new(500));
        let size = (1u64 << (levels + 1)) - 1;
        for _ in 1..size {
            network.register("m", Tier::new(100), Some(id(1)));
        }
        network
    }

    #[test]
    fn test_visits_in_breadth_first_order_with_depths() {
        let network = perfect_tree(2);
        let mut seen = Vec::new();
        let visited = network
            .walk_descendants(id(1), usize::MAX, |m, depth| seen.push((m.id.as_u64(), depth)))
            .unwrap();

        assert_eq!(visited, 6);
        assert_eq!(
            seen,
            vec![(2, 1), (3, 1), (4, 2), (5, 2), (6, 2), (7, 2)]
        );
    }

    #[test]
    fn test_budget_truncates_walk() {
        let network = perfect_tree(3);
        let mut seen = Vec::new();
        let visited = network
            .walk_descendants(id(1), 4, |m, _| seen.push(m.id.as_u64()))
            .unwrap();

        assert_eq!(visited, 4);
        assert_eq!(seen, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_zero_budget_visits_nothing() {
        let network = perfect_tree(1);
        let visited = network.walk_descendants(id(1), 0, |_, _| {}).unwrap();
        assert_eq!(visited, 0);
    }

    #[test]
    fn test_subtree_size() {
        let network = perfect_tree(3);
        assert_eq!(network.subtree_size(id(1)).unwrap(), 14);
        assert_eq!(network.subtree_size(id(2)).unwrap(), 6);
        assert_eq!(network.subtree_size(id(15)).unwrap(), 0);
        assert!(network.subtree_size(id(16)).is_err());
    }
}
