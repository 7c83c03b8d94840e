//! Sponsor-relative breadth-first placement.

use super::{index, Network};
use crate::domain::MemberId;
use std::collections::VecDeque;

/// Which child slot of a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// An empty child slot in the binary tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub parent: MemberId,
    pub side: Side,
}

impl Network {
    /// Shallowest, leftmost empty slot in `start`'s subtree.
    ///
    /// Nodes are dequeued in breadth-first order; each one offers its left
    /// slot, then its right slot, before its children are enqueued (left
    /// first). `start` must be a member of the network.
    pub(crate) fn open_slot_under(&self, start: MemberId) -> Slot {
        let mut queue = VecDeque::from([start]);

        while let Some(id) = queue.pop_front() {
            let node = &self.members[index(id)];
            match (node.left, node.right) {
                (None, _) => {
                    return Slot {
                        parent: id,
                        side: Side::Left,
                    }
                }
                (Some(_), None) => {
                    return Slot {
                        parent: id,
                        side: Side::Right,
                    }
                }
                (Some(left), Some(right)) => {
                    queue.push_back(left);
                    queue.push_back(right);
                }
            }
        }

        // A finite tree always has a node with a free slot.
        unreachable!("subtree of {start} has no open slot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tier;

    fn id(n: u64) -> MemberId {
        MemberId::new(n)
    }

    fn network_of(size: u64) -> Network {
        let mut network = Network::with_root("root", Tier::new(500));
        for _ in 1..size {
            network.register("m", Tier::new(100), Some(id(1)));
        }
        network
    }

    #[test]
    fn test_fills_level_by_level_left_first() {
        let network = network_of(7);
        let root = network.get(id(1)).unwrap();
        assert_eq!((root.left, root.right), (Some(id(2)), Some(id(3))));

        let two = network.get(id(2)).unwrap();
        assert_eq!((two.left, two.right), (Some(id(4)), Some(id(5))));

        let three = network.get(id(3)).unwrap();
        assert_eq!((three.left, three.right), (Some(id(6)), Some(id(7))));
    }

    #[test]
    fn test_open_slot_on_full_level_goes_to_leftmost_leaf() {
        let network = network_of(7);
        assert_eq!(
            network.open_slot_under(id(1)),
            Slot {
                parent: id(4),
                side: Side::Left
            }
        );
    }

    #[test]
    fn test_search_stays_inside_sponsor_subtree() {
        let mut network = network_of(3);
        // Sponsor 3 has an empty subtree even though 2 is shallower on the left.
        let placed = network.register("x", Tier::new(100), Some(id(3)));
        assert_eq!(network.get(id(3)).unwrap().left, Some(placed));
        assert_eq!(network.get(id(2)).unwrap().left, None);
    }
}
