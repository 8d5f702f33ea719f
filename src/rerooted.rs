//! Validate and reroot phylogenetic trees for covariance computation
//!

use std::collections::HashSet;

use crate::covariance::CovarianceMatrix;
use crate::tree::{EdgeLength, NewickParseError, NodeId, RootPath, Tree, TreeError};

/// A tree that has been validated and rerooted for covariance computation.
///
/// A valid tree has at least one leaf, and its leaves carry the names
/// `"0"` to `"k-1"` where `k` is the number of leaves, each exactly once.
/// The tree is rerooted at the node named `"0"` and each remaining leaf
/// gets a slot in a table of [`RootPath`] objects: slot `i` holds the path
/// of the leaf named `i + 1`. The covariance between two leaves is the
/// length their root paths share.
///
/// # Example
/// ```
/// use treecov::rerooted::RerootedTree;
///
/// let rerooted = RerootedTree::from_newick("(0:1,(1:1,2:2)a:1)r;").unwrap();
///
/// assert_eq!(rerooted.rk(), 2);
/// assert_eq!(
///     rerooted.tree().to_newick().unwrap(),
///     "(((1:1,2:2)a:1)r:1)0;"
/// );
///
/// let matrix = rerooted.covariance_matrix().unwrap();
/// assert_eq!(*matrix.get(0, 0).unwrap(), 3.0);
/// assert_eq!(*matrix.get(1, 0).unwrap(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct RerootedTree {
    /// Dimension of the covariance matrix, one less than the number of leaves
    rk: usize,
    /// The tree, rerooted at the leaf named "0"
    tree: Tree,
    /// Leaf ids indexed by slot, slot i holds the leaf named i + 1
    leaves: Vec<NodeId>,
}

impl RerootedTree {
    /// Validates the leaf names of a tree and builds a rerooted copy of it.
    /// The input tree is left untouched.
    pub fn from_tree(tree: &Tree) -> Result<Self, TreeError> {
        let leaf_names = tree.get_leaf_names();
        if leaf_names.is_empty() {
            return Err(TreeError::IsEmpty);
        }

        let names: Vec<String> = leaf_names
            .into_iter()
            .collect::<Option<_>>()
            .ok_or(TreeError::UnnamedLeaves)?;

        if !tree.has_unique_tip_names()? {
            return Err(TreeError::DuplicateLeafNames);
        }

        let set: HashSet<_> = names.iter().map(|name| name.as_str()).collect();
        for index in 0..names.len() {
            let name = index.to_string();
            if !set.contains(name.as_str()) {
                return Err(TreeError::MissingLeaf(name));
            }
        }

        let rk = names.len() - 1;

        let root = tree.get_root()?;
        let origin = tree
            .find_first(&root, |node| node.name.as_deref() == Some("0"))?
            .ok_or_else(|| TreeError::MissingLeaf("0".to_string()))?;
        let rerooted = tree.reroot(&origin)?;

        let new_root = rerooted.get_root()?;
        let mut leaves = Vec::with_capacity(rk);
        for index in 1..=rk {
            let name = index.to_string();
            let id = rerooted
                .find_first(&new_root, |node| node.name.as_deref() == Some(name.as_str()))?
                .ok_or(TreeError::MissingLeaf(name))?;
            leaves.push(id);
        }

        Ok(Self {
            rk,
            tree: rerooted,
            leaves,
        })
    }

    /// Parses a newick string and builds a rerooted tree from it
    pub fn from_newick(newick: &str) -> Result<Self, NewickParseError> {
        let tree = Tree::from_newick(newick)?;
        Ok(Self::from_tree(&tree)?)
    }

    /// Returns the dimension of the covariance matrix, which is one less
    /// than the number of leaves in the tree
    pub fn rk(&self) -> usize {
        self.rk
    }

    /// Returns the tree, rerooted at the leaf named "0"
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns the root path of the leaf in the specified slot. Slot `i`
    /// holds the path of the leaf named `i + 1`.
    pub fn get_path(&self, index: usize) -> Result<RootPath<'_>, TreeError> {
        let leaf = self
            .leaves
            .get(index)
            .ok_or(TreeError::PathNotFound(index))?;

        RootPath::from_node(&self.tree, leaf)
    }

    /// Returns the overlap of the root paths in two slots, i.e. the portion
    /// of the two paths that runs from the root down to the common ancestor
    /// of the two leaves
    pub fn get_overlap(&self, i: usize, j: usize) -> Result<RootPath<'_>, TreeError> {
        let path_i = self.get_path(i)?;
        let path_j = self.get_path(j)?;

        Ok(&path_i & &path_j)
    }

    /// Fills the covariance matrix of the tree: entry `(i, j)` is the
    /// length shared by the root paths of the leaves in slots `i` and `j`,
    /// so the diagonal holds the full root path length of each leaf.
    pub fn covariance_matrix(&self) -> Result<CovarianceMatrix<EdgeLength>, TreeError> {
        let mut matrix = CovarianceMatrix::new_with_size(self.rk);

        for i in 0..self.rk {
            for j in 0..=i {
                let overlap = self.get_overlap(i, j)?;
                matrix.set(i, j, overlap.get_length())?;
            }
        }
        matrix.copy_lower_to_upper();

        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {

    use core::f64;

    use itertools::Itertools;

    use super::*;

    const NESTED: &str = "(0:1,(1:1,2:2)a:1)r;";
    const NESTED_MATRIX: &str = "2 2
3e0\t2e0
2e0\t4e0
";

    const STAR: &str = "(0:1,1:2,2:3)r;";
    const STAR_MATRIX: &str = "2 2
3e0\t1e0
1e0\t4e0
";

    #[test]
    fn reroots_at_leaf_zero() {
        let rerooted = RerootedTree::from_newick(NESTED).unwrap();

        assert_eq!(rerooted.rk(), 2);
        assert_eq!(
            rerooted.tree().to_newick().unwrap(),
            "(((1:1,2:2)a:1)r:1)0;"
        );
    }

    #[test]
    fn input_tree_is_untouched() {
        let tree = Tree::from_newick(NESTED).unwrap();
        let _ = RerootedTree::from_tree(&tree).unwrap();

        assert_eq!(tree.to_newick().unwrap(), NESTED);
    }

    #[test]
    fn nested_tree_matrix() {
        let rerooted = RerootedTree::from_newick(NESTED).unwrap();
        let matrix = rerooted.covariance_matrix().unwrap();

        assert_eq!(NESTED_MATRIX, matrix.to_string());
    }

    #[test]
    fn star_tree_matrix() {
        let rerooted = RerootedTree::from_newick(STAR).unwrap();
        let matrix = rerooted.covariance_matrix().unwrap();

        assert_eq!(STAR_MATRIX, matrix.to_string());
    }

    #[test]
    fn single_leaf_tree() {
        let rerooted = RerootedTree::from_newick("0;").unwrap();

        assert_eq!(rerooted.rk(), 0);
        assert_eq!(rerooted.covariance_matrix().unwrap().to_string(), "0 0\n");
    }

    #[test]
    fn validation_errors() {
        let test_cases = vec![
            (";", TreeError::UnnamedLeaves),
            ("(0,:1)r;", TreeError::UnnamedLeaves),
            ("(0,0)r;", TreeError::DuplicateLeafNames),
            ("(a,b)c;", TreeError::MissingLeaf("0".into())),
            ("(1,2)0;", TreeError::MissingLeaf("0".into())),
            ("(0,2)r;", TreeError::MissingLeaf("1".into())),
        ];

        for (newick, expected) in test_cases {
            let err = match RerootedTree::from_newick(newick).unwrap_err() {
                NewickParseError::TreeError(e) => e,
                other => panic!("Error for {newick} should be a TreeError, not: {other}"),
            };

            match (&err, &expected) {
                (TreeError::UnnamedLeaves, TreeError::UnnamedLeaves) => {}
                (TreeError::DuplicateLeafNames, TreeError::DuplicateLeafNames) => {}
                (TreeError::MissingLeaf(name), TreeError::MissingLeaf(missing)) => {
                    assert_eq!(name, missing, "wrong leaf reported for {newick}")
                }
                _ => panic!("Error for {newick} should be {expected}, not: {err}"),
            }
        }
    }

    #[test]
    fn empty_tree_is_an_error() {
        let tree = Tree::new();
        let err = RerootedTree::from_tree(&tree).unwrap_err();
        assert!(matches!(err, TreeError::IsEmpty));
    }

    #[test]
    fn path_slots_match_leaf_names() {
        let rerooted = RerootedTree::from_newick("((1:0.5,2:1.5)a:1,(3:2,0:1)b:1)r;").unwrap();

        assert_eq!(rerooted.rk(), 3);
        for slot in 0..3 {
            let path = rerooted.get_path(slot).unwrap();
            let name = (slot + 1).to_string();
            let leaf = rerooted.tree().get_by_name(&name).unwrap();
            assert!(path.contains(&leaf.id));
        }

        let err = rerooted.get_path(3).unwrap_err();
        assert!(matches!(err, TreeError::PathNotFound(3)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let rerooted = RerootedTree::from_newick("((1:0.5,2:1.5)a:1,(3:2,0:1)b:1)r;").unwrap();

        for pair in (0..rerooted.rk()).combinations(2) {
            let (i, j) = (pair[0], pair[1]);
            let forward = rerooted.get_overlap(i, j).unwrap().get_length();
            let backward = rerooted.get_overlap(j, i).unwrap().get_length();
            assert!((forward - backward).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn diagonal_holds_root_path_lengths() {
        let rerooted = RerootedTree::from_newick("((1:0.5,2:1.5)a:1,(3:2,0:1)b:1)r;").unwrap();
        let matrix = rerooted.covariance_matrix().unwrap();

        for slot in 0..rerooted.rk() {
            let length = rerooted.get_path(slot).unwrap().get_length();
            assert!((matrix.get(slot, slot).unwrap() - length).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn matrix_recovers_leaf_distances() {
        let newick = "((1:0.5,2:1.5)a:1,(3:2,0:1)b:1)r;";
        let tree = Tree::from_newick(newick).unwrap();
        let rerooted = RerootedTree::from_tree(&tree).unwrap();
        let matrix = rerooted.covariance_matrix().unwrap();

        // The distance between two leaves in the input tree can be read
        // back out of the covariance matrix
        for pair in (0..rerooted.rk()).combinations(2) {
            let (i, j) = (pair[0], pair[1]);

            let covariance = matrix.get(i, j).unwrap();
            let from_matrix =
                matrix.get(i, i).unwrap() + matrix.get(j, j).unwrap() - 2.0 * covariance;

            let leaf_i = tree.get_by_name(&(i + 1).to_string()).unwrap().id;
            let leaf_j = tree.get_by_name(&(j + 1).to_string()).unwrap().id;
            let (distance, _) = tree.get_distance(&leaf_i, &leaf_j).unwrap();

            assert!((from_matrix - distance.unwrap()).abs() < f64::EPSILON);
        }
    }
}
