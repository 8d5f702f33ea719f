use std::ops::BitAnd;

use accurate::sum::NaiveSum;
use accurate::traits::*;
use fixedbitset::FixedBitSet;

use super::tree_impl::{Tree, TreeError};
use super::{EdgeLength, NodeId};

/// The path from a node up to the root of a [`Tree`], stored as a set of
/// node ids. A node is a member of the path if its branch to its parent is
/// part of the path, so the starting node is a member and the root never is.
///
/// Paths borrow the tree they were built from, and two paths from the same
/// tree can be intersected with `&` to get the portion they share:
/// ```
/// use treecov::tree::{RootPath, Tree};
///
/// let tree = Tree::from_newick("(b:1,(d:3,e:4)c:2)a;").unwrap();
///
/// let to_d = RootPath::from_node(&tree, &tree.get_by_name("d").unwrap().id).unwrap();
/// let to_e = RootPath::from_node(&tree, &tree.get_by_name("e").unwrap().id).unwrap();
///
/// let shared = &to_d & &to_e;
/// assert_eq!(shared.get_length(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct RootPath<'a> {
    tree: &'a Tree,
    members: FixedBitSet,
}

impl<'a> RootPath<'a> {
    /// Builds the path from the specified node up to the root of the tree.
    pub fn from_node(tree: &'a Tree, node: &NodeId) -> Result<Self, TreeError> {
        let mut members = FixedBitSet::with_capacity(tree.size());

        let mut current = *node;
        while let Some(parent) = tree.get(&current)?.parent {
            members.insert(current);
            current = parent;
        }

        Ok(Self { tree, members })
    }

    /// Checks if the branch above the specified node is part of the path
    pub fn contains(&self, node: &NodeId) -> bool {
        self.members.contains(*node)
    }

    /// Returns the number of branches in the path
    pub fn len(&self) -> usize {
        self.members.count_ones(..)
    }

    /// Checks if the path has no branches, which is the case for the path
    /// from the root to itself
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the sum of the branch lengths along the path. Branches
    /// without a length count as 0.
    pub fn get_length(&self) -> EdgeLength {
        let mut length = NaiveSum::zero();
        for id in self.members.ones() {
            length += self.tree.get(&id).unwrap().parent_edge.unwrap_or(0.0);
        }

        length.sum()
    }
}

impl<'a> BitAnd for &RootPath<'a> {
    type Output = RootPath<'a>;

    /// Intersects two root paths of the same tree. The result contains the
    /// branches both paths share, i.e. the path from the root down to the
    /// common ancestor of the two starting nodes.
    fn bitand(self, rhs: Self) -> Self::Output {
        RootPath {
            tree: self.tree,
            members: &self.members & &rhs.members,
        }
    }
}

#[cfg(test)]
mod tests {

    use core::f64;

    use super::*;

    fn path_to<'a>(tree: &'a Tree, name: &str) -> RootPath<'a> {
        let id = tree.get_by_name(name).unwrap().id;
        RootPath::from_node(tree, &id).unwrap()
    }

    #[test]
    fn members_exclude_root() {
        let tree = Tree::from_newick("((A,(C,E)D)B,((H)I)G)F;").unwrap();
        let id = tree.get_by_name("E").unwrap().id;
        let path = RootPath::from_node(&tree, &id).unwrap();

        // E and its ancestors D and B are in the path, the root F is not
        assert_eq!(path.len(), 3);
        for name in ["E", "D", "B"] {
            assert!(path.contains(&tree.get_by_name(name).unwrap().id));
        }
        for name in ["F", "A", "C", "G", "I", "H"] {
            assert!(!path.contains(&tree.get_by_name(name).unwrap().id));
        }
    }

    #[test]
    fn root_path_is_empty() {
        let tree = Tree::from_newick("(b:1,(d:3,e:4)c:2)a;").unwrap();
        let root = tree.get_root().unwrap();
        let path = RootPath::from_node(&tree, &root).unwrap();

        assert!(path.is_empty());
        assert_eq!(path.get_length(), 0.0);
    }

    #[test]
    fn length_sums_branches() {
        let tree = Tree::from_newick("(b:1,(d:3,e:4)c:2)a;").unwrap();

        let test_cases = vec![("b", 1.0), ("c", 2.0), ("d", 5.0), ("e", 6.0)];

        for (name, length) in test_cases {
            let id = tree.get_by_name(name).unwrap().id;
            let path = RootPath::from_node(&tree, &id).unwrap();
            assert!((path.get_length() - length).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn missing_lengths_count_as_zero() {
        let tree = Tree::from_newick("(b,(d:3)c:2)a;").unwrap();

        let to_b = tree.get_by_name("b").unwrap().id;
        let path = RootPath::from_node(&tree, &to_b).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.get_length(), 0.0);

        let to_d = tree.get_by_name("d").unwrap().id;
        let path = RootPath::from_node(&tree, &to_d).unwrap();
        assert_eq!(path.get_length(), 5.0);
    }

    #[test]
    fn overlap_is_shared_prefix() {
        let tree = Tree::from_newick("(b:1,(d:3,e:4)c:2)a;").unwrap();

        let to_b = path_to(&tree, "b");
        let to_d = path_to(&tree, "d");
        let to_e = path_to(&tree, "e");

        // d and e share the branch above c
        let shared = &to_d & &to_e;
        assert_eq!(shared.len(), 1);
        assert!(shared.contains(&tree.get_by_name("c").unwrap().id));
        assert_eq!(shared.get_length(), 2.0);

        // b branches off at the root, so there is no shared branch
        let disjoint = &to_b & &to_d;
        assert!(disjoint.is_empty());
        assert_eq!(disjoint.get_length(), 0.0);

        // A path intersected with itself is unchanged
        let full = &to_d & &to_d;
        assert_eq!(full.len(), to_d.len());
        assert_eq!(full.get_length(), 5.0);
    }
}
