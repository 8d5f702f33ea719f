use itertools::Itertools;
use ptree::{print_tree, TreeBuilder};
use std::collections::HashSet;
use std::iter::zip;
use std::{fs, path::Path};

use thiserror::Error;

use super::node::{Node, NodeError};
use super::{EdgeLength, NodeId};
use crate::covariance::MatrixError;
use crate::scanner::{ScanError, Scanner};

/// Errors that can occur when reading, writing and manipulating [`Tree`] structs.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The tree is empty and we are trying to do something that requires
    /// at least one node
    #[error("This tree is empty.")]
    IsEmpty,
    /// No root node was found in the tree and we are trying to do something
    /// that requires a root node
    #[error("No root node found")]
    RootNotFound,
    /// Some of the leaves in the tree have no name
    #[error("All your leaf nodes must be named.")]
    UnnamedLeaves,
    /// Some of the leaves in the tree share the same name
    #[error("Your leaf names must be unique.")]
    DuplicateLeafNames,
    /// A node with a specific name is missing from the tree
    #[error("There is no node named '{0}' in the tree")]
    MissingLeaf(String),
    /// Some branches of the tree have no length
    #[error("The tree must have all branch lengths.")]
    MissingBranchLengths,
    /// The requested node with index [`NodeId`] does not exist in the tree
    #[error("There is no node with index: {0}")]
    NodeNotFound(NodeId),
    /// There is no root path registered for the requested leaf index
    #[error("There is no root path for leaf index: {0}")]
    PathNotFound(usize),
    /// There was a [`std::io::Error`] when writing the tree to a file
    #[error("Error writing tree to file")]
    IoError(#[from] std::io::Error),
    /// There was a [`NodeError`] when operating on a node
    #[error("Could not operate on Node")]
    NodeError(#[from] NodeError),
    /// There was a [`MatrixError`] when filling the covariance matrix
    #[error("Could not convert to matrix")]
    MatrixError(#[from] MatrixError),
}

/// Errors that can occur when parsing newick files.
#[derive(Error, Debug)]
pub enum NewickParseError {
    /// A subtree is missing its closing bracket
    #[error("Missing a closing bracket.")]
    UnclosedBracket(#[source] ScanError),
    /// The newick string is missing a final semi-colon
    #[error("The tree is missing a semi colon at the end.")]
    NoClosingSemicolon(#[source] ScanError),
    /// There is residual text after the final semi-colon
    #[error("Unexpected text after the closing semi colon: '{0}'")]
    TrailingCharacters(String),
    /// There was a [`ScanError`] when reading a branch length
    #[error("Could not parse a branch length")]
    ScanError(#[from] ScanError),
    /// There was a [`TreeError`] when building a tree from the newick string
    #[error("Problem with building the tree.")]
    TreeError(#[from] TreeError),
    /// There was a [`std::io::Error`] when reading a newick file
    #[error("Problem reading file")]
    IoError(#[from] std::io::Error),
}

/// The characters that end a name token in a newick string
const NEWICK_DELIMITERS: &[char] = &[';', ':', '(', ')', ','];

/// A phylogenetic tree
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

/// Base methods to add and get [`Node`] objects to and from the [`Tree`].
///
/// ----
/// ----
impl Tree {
    /// Create a new empty Tree object
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    // ############################
    // # ADDING AND GETTING NODES #
    // ############################

    /// Add a new node to the tree.
    pub fn add(&mut self, node: Node) -> NodeId {
        let idx = self.nodes.len();
        let mut node = node;
        node.set_id(idx);
        self.nodes.push(node);

        idx
    }

    /// Add a child to one of the tree's nodes.
    ///
    /// # Example
    /// ```
    /// use treecov::tree::{Tree, Node};
    ///
    /// // Create the tree and add a root node
    /// let mut tree = Tree::new();
    /// let root_id = tree.add(Node::new());
    ///
    /// // Add children to the root
    /// let left = tree.add_child(Node::new(), root_id, None).unwrap();
    /// let right = tree.add_child(Node::new(), root_id, Some(0.1)).unwrap();
    ///
    /// assert_eq!(tree.get(&root_id).unwrap().children.len(), 2);
    ///
    /// // If an edge length is specified then it is set in the child
    /// assert_eq!(tree.get(&left).unwrap().parent_edge, None);
    /// assert_eq!(tree.get(&right).unwrap().parent_edge, Some(0.1));
    /// ```
    pub fn add_child(
        &mut self,
        node: Node,
        parent: NodeId,
        edge: Option<EdgeLength>,
    ) -> Result<NodeId, TreeError> {
        if parent >= self.nodes.len() {
            return Err(TreeError::NodeNotFound(parent));
        }

        let mut node = node;
        node.set_parent(parent, edge);

        let id = self.add(node);
        self.get_mut(&parent)?.add_child(id);

        Ok(id)
    }

    /// Get a reference to a specific Node of the tree
    pub fn get(&self, id: &NodeId) -> Result<&Node, TreeError> {
        if *id >= self.nodes.len() {
            return Err(TreeError::NodeNotFound(*id));
        }

        Ok(&self.nodes[*id])
    }

    /// Get a mutable reference to a specific Node of the tree
    pub fn get_mut(&mut self, id: &NodeId) -> Result<&mut Node, TreeError> {
        if *id >= self.nodes.len() {
            return Err(TreeError::NodeNotFound(*id));
        }

        Ok(&mut self.nodes[*id])
    }

    /// Get a reference to a node in the tree by name.
    /// Note that this does not check for name unicity, if several nodes
    /// match a name this function will return the first match in post-order.
    /// If you want to find all nodes matching a name in a given tree,
    /// use [`Tree::search_nodes`].
    /// ```
    /// use treecov::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root_idx = tree.add(Node::new_named("root"));
    /// let child_idx = tree.add_child(Node::new_named("child"), root_idx, None).unwrap();
    ///
    /// assert_eq!(tree.get_by_name("child"), Some(tree.get(&child_idx).unwrap()));
    /// ```
    pub fn get_by_name(&self, name: &str) -> Option<&Node> {
        let root = self.get_root().ok()?;
        let id = self
            .find_first(&root, |node| node.name.as_deref() == Some(name))
            .ok()??;

        self.get(&id).ok()
    }

    /// Search nodes in the tree with a closure.
    /// ```
    /// use treecov::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root_idx = tree.add(Node::new_named("root"));
    /// let mut indices = vec![];
    ///
    /// for name in ["A", "B", "A"] {
    ///     let idx = tree.add_child(Node::new_named(name), root_idx, None).unwrap();
    ///     if name == "A" { indices.push(idx) }
    /// }
    ///
    /// let found = tree.search_nodes(|node| node.name == Some("A".into()));
    /// assert_eq!(found, indices);
    /// ```
    pub fn search_nodes(&self, cond: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| cond(node))
            .map(|node| node.id)
            .collect()
    }

    /// Find the first node matching a predicate, searching the subtree
    /// below `root` in post-order so that deeper nodes win over their
    /// ancestors.
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("((X)A,(X)B)R;").unwrap();
    /// let root = tree.get_root().unwrap();
    ///
    /// let found = tree
    ///     .find_first(&root, |node| node.name.as_deref() == Some("X"))
    ///     .unwrap();
    /// assert_eq!(found, Some(2));
    /// ```
    pub fn find_first(
        &self,
        root: &NodeId,
        predicate: impl Fn(&Node) -> bool,
    ) -> Result<Option<NodeId>, TreeError> {
        for id in self.postorder(root)? {
            if predicate(self.get(&id)?) {
                return Ok(Some(id));
            }
        }

        Ok(None)
    }

    /// Gets the root node. In the case of unrooted trees this node is a
    /// "virtual root" that has exactly 3 children.
    pub fn get_root(&self) -> Result<NodeId, TreeError> {
        self.nodes
            .iter()
            .filter(|&node| node.parent.is_none())
            .map(|node| node.id)
            .next()
            .ok_or(TreeError::RootNotFound)
    }

    /// Returns a [`Vec`] containing the Node IDs of leaf nodes of the tree
    /// ```
    /// use treecov::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root_idx = tree.add(Node::new());
    /// let left = tree.add_child(Node::new(), root_idx, None).unwrap();
    /// let right = tree.add_child(Node::new(), root_idx, None).unwrap();
    ///
    /// assert_eq!(tree.get_leaves(), vec![left, right]);
    /// ```
    pub fn get_leaves(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|&node| node.is_tip())
            .map(|node| node.id)
            .collect()
    }

    /// Returns a [`Vec`] containing the Names of the leaf nodes of the tree
    /// ```
    /// use treecov::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root_idx = tree.add(Node::new());
    /// let _ = tree.add_child(Node::new_named("left"), root_idx, None).unwrap();
    /// let _ = tree.add_child(Node::new_named("right"), root_idx, None).unwrap();
    ///
    /// let names: Vec<_> = tree.get_leaf_names()
    ///     .into_iter()
    ///     .flatten()
    ///     .collect();
    /// assert_eq!(names, vec!["left", "right"]);
    /// ```
    pub fn get_leaf_names(&self) -> Vec<Option<String>> {
        self.get_leaves()
            .iter()
            .map(|leaf_id| self.get(leaf_id).unwrap().name.clone())
            .collect()
    }

    /// Gets the node ids of all the nodes in the subtree rooted at the specified node
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("(A:0.1,B:0.2,(C:0.3,D:0.4)E:0.5)F;").unwrap();
    /// let sub_root = tree.get_by_name("E").unwrap();
    /// let subtree: Vec<_> = tree.get_subtree(&sub_root.id)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|id| tree.get(id).unwrap().name.clone())
    ///     .flatten()
    ///     .collect();
    ///
    /// assert_eq!(subtree, vec!["E", "C", "D"])
    /// ```
    pub fn get_subtree(&self, root: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut indices = vec![*root];

        for child in self.get(root)?.children.iter() {
            indices.extend(self.get_subtree(child)?);
        }

        Ok(indices)
    }

    /// Gets the node ids of all the leaves in the subtree rooted at the specified node
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("(A:0.1,B:0.2,(C:0.3,D:0.4)E:0.5)F;").unwrap();
    /// let sub_root = tree.get_by_name("E").unwrap();
    /// let sub_leaves: Vec<_> = tree.get_subtree_leaves(&sub_root.id)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|id| tree.get(id).unwrap().name.clone())
    ///     .flatten()
    ///     .collect();
    ///
    /// assert_eq!(sub_leaves, vec!["C", "D"])
    /// ```
    pub fn get_subtree_leaves(&self, root: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        Ok(self
            .get_subtree(root)?
            .into_iter()
            .filter(|id| self.get(id).unwrap().is_tip())
            .collect())
    }
}

/// Methods to traverse the [`Tree`]
///
/// ----
/// ----
impl Tree {
    // ###################
    // # TREE TRAVERSALS #
    // ###################

    /// Returns a vector containing node ids in the same order as the
    /// [preorder](https://en.wikipedia.org/wiki/Tree_traversal#Pre-order,_NLR) tree traversal
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("((A,(C,E)D)B,((H)I)G)F;").unwrap();
    /// let preorder: Vec<_> = tree.preorder(&tree.get_root().unwrap())
    ///     .unwrap()
    ///     .iter()
    ///     .map(|id| tree.get(id).unwrap().name.clone())
    ///     .flatten()
    ///     .collect();
    ///
    /// assert_eq!(preorder, vec!["F", "B", "A", "D", "C", "E", "G", "I", "H"])
    /// ```
    pub fn preorder(&self, root: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut indices = vec![*root];
        for child in self.get(root)?.children.iter() {
            indices.extend(self.preorder(child)?)
        }

        Ok(indices)
    }

    /// Returns a vector containing node ids in the same order as the
    /// [postorder](https://en.wikipedia.org/wiki/Tree_traversal#Post-order,_LRN) tree traversal
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("((A,(C,E)D)B,((H)I)G)F;").unwrap();
    /// let postorder: Vec<_> = tree.postorder(&tree.get_root().unwrap())
    ///     .unwrap()
    ///     .iter()
    ///     .map(|id| tree.get(id).unwrap().name.clone())
    ///     .flatten()
    ///     .collect();
    ///
    /// assert_eq!(postorder, vec!["A", "C", "E", "D", "B", "H", "I", "G", "F"])
    /// ```
    pub fn postorder(&self, root: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut indices = vec![];
        for child in self.get(root)?.children.iter() {
            indices.extend(self.postorder(child)?)
        }
        indices.push(*root);

        Ok(indices)
    }
}

/// Methods that compute characteristics and measures to describe the [`Tree`]
///
/// ----
/// ----
impl Tree {
    // #######################################
    // # GETTING CHARACTERISTICS OF THE TREE #
    // #######################################

    /// Check if the tree is Binary
    pub fn is_binary(&self) -> Result<bool, TreeError> {
        for node in self.nodes.iter() {
            // Root of the tree
            if node.parent.is_none() {
                if self.is_rooted()? && node.children.len() > 2 {
                    return Ok(false);
                // The virtual root of unrooted trees can have up to 3 children
                } else if !self.is_rooted()? && node.children.len() > 3 {
                    return Ok(false);
                }
            } else if node.parent.is_some() && node.children.len() > 2 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Checks if the tree is rooted (i.e. the root node exists and has exactly 2 children)
    pub fn is_rooted(&self) -> Result<bool, TreeError> {
        let root_id = self.get_root()?;

        Ok(!self.nodes.is_empty() && self.get(&root_id)?.children.len() == 2)
    }

    /// Checks if all the tips have unique names (This check assumes that all tips have a name)
    pub fn has_unique_tip_names(&self) -> Result<bool, TreeError> {
        let mut names = HashSet::new();
        for name in self.get_leaf_names() {
            if let Some(name) = name {
                names.insert(name);
            } else {
                return Err(TreeError::UnnamedLeaves);
            }
        }

        Ok(names.len() == self.n_leaves())
    }

    /// Returns the number of nodes in the tree
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves in the tree
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|&node| node.is_tip()).count()
    }

    /// Returns the height of the tree
    /// (i.e. the number of edges or branch length sum from the root to the deepest tip)
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("((A:0.1,B:0.2)G:0.1,(C:0.3,D:0.4)E:0.5)F;").unwrap();
    /// assert_eq!(tree.height().unwrap(), 0.9);
    ///
    /// let tree_no_brlen = Tree::from_newick("((A,B)G,(C,D)E)F;").unwrap();
    /// assert_eq!(tree_no_brlen.height().unwrap(), 2.);
    /// ```
    pub fn height(&self) -> Result<EdgeLength, TreeError> {
        let root = self.get_root()?;

        self.get_leaves()
            .iter()
            .map(|leaf| {
                let (edge_sum, num_edges) = self.get_distance(&root, leaf).unwrap();
                match edge_sum {
                    Some(height) => height,
                    None => num_edges as f64,
                }
            })
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or(TreeError::IsEmpty)
    }

    /// Returns the diameter of the tree
    /// (i.e. longest tip to tip distance)
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("(A:0.1,B:0.2,(C:0.3,D:0.4)E:0.5)F;").unwrap();
    /// assert_eq!(tree.diameter().unwrap(), 1.1);
    ///
    /// let tree_no_brlen = Tree::from_newick("(A,B,(C,D)E)F;").unwrap();
    /// assert_eq!(tree_no_brlen.diameter().unwrap(), 3.);
    /// ```
    pub fn diameter(&self) -> Result<EdgeLength, TreeError> {
        self.get_leaves()
            .iter()
            .combinations(2)
            .map(|pair| {
                let (edge_sum, num_edges) = self.get_distance(pair[0], pair[1]).unwrap();
                match edge_sum {
                    Some(height) => height,
                    None => num_edges as f64,
                }
            })
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or(TreeError::IsEmpty)
    }

    /// Returns the length of the tree
    /// (i.e. the sum of branch lengths)
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("(A:0.1,B:0.2,(C:0.3,D:0.4)E:0.5)F;").unwrap();
    /// assert_eq!(tree.length().unwrap(), 1.5);
    /// ```
    pub fn length(&self) -> Result<EdgeLength, TreeError> {
        let s = self
            .nodes
            .iter()
            .filter(|n| !n.is_root())
            .map(|n| n.parent_edge)
            .collect::<Option<Vec<_>>>();
        match s {
            Some(v) => Ok(v.iter().sum()),
            None => Err(TreeError::MissingBranchLengths),
        }
    }
}

/// Methods to find paths in the [`Tree`]
///
/// ----
/// ----
impl Tree {
    // ##########################
    // # FIND PATHS IN THE TREE #
    // ##########################

    /// Returns the path from the node to the root
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("((A,(C,E)D)B,((H)I)G)F;").unwrap();
    /// let path: Vec<_> = tree.get_path_from_root(&5)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|id| tree.get(id).unwrap().name.clone())
    ///     .flatten()
    ///     .collect();
    ///
    /// assert_eq!(path, vec!["F", "B", "D", "E"])
    /// ```
    pub fn get_path_from_root(&self, node: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut path = vec![];
        let mut current_node = *node;
        loop {
            path.push(current_node);
            match self.get(&current_node)?.parent {
                Some(parent) => current_node = parent,
                None => break,
            }
        }

        Ok(path.into_iter().rev().collect())
    }

    /// Gets the most recent common ancestor between two tree nodes
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("((A,(C,E)D)B,((H)I)G)F;").unwrap();
    /// let ancestor = tree.get_common_ancestor(
    ///     &tree.get_by_name("A").unwrap().id,
    ///     &tree.get_by_name("D").unwrap().id,
    /// ).unwrap();
    ///
    /// assert_eq!(tree.get(&ancestor).unwrap().name, Some("B".to_owned()))
    /// ```
    pub fn get_common_ancestor(
        &self,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<usize, TreeError> {
        if source == target {
            return Ok(*source);
        }
        let root_to_source = self.get_path_from_root(source)?;
        let root_to_target = self.get_path_from_root(target)?;

        let cursor = zip(root_to_source.iter(), root_to_target.iter())
            .enumerate()
            .filter(|(_, (s, t))| s != t)
            .map(|(idx, _)| idx)
            .next()
            .unwrap_or_else(|| {
                // One node is a child of the other
                root_to_source.len().min(root_to_target.len())
            });

        Ok(root_to_source[cursor - 1])
    }

    /// Gets the distance between 2 nodes, returns the sum of branch lengths (if all
    /// branches in the path have lengths) and the number of edges in the path.
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("((A,(C,E)D)B,((H)I)G)F;").unwrap();
    /// let (sum_edge_lengths, num_edges) = tree.get_distance(
    ///     &tree.get_by_name("A").unwrap().id,
    ///     &tree.get_by_name("I").unwrap().id,
    /// ).unwrap();
    ///
    /// assert_eq!(num_edges, 4);
    /// assert!(sum_edge_lengths.is_none());
    /// ```
    pub fn get_distance(
        &self,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<(Option<f64>, usize), TreeError> {
        let mut dist = 0.0;
        let mut branches = 0;
        let mut all_dists = true;

        if source == target {
            return Ok((Some(0.0), 0));
        }

        let root_to_source = self.get_path_from_root(source)?;
        let root_to_target = self.get_path_from_root(target)?;

        let cursor = zip(root_to_source.iter(), root_to_target.iter())
            .enumerate()
            .filter(|(_, (s, t))| s != t)
            .map(|(idx, _)| idx)
            .next()
            .unwrap_or_else(|| {
                // One node is a child of the other
                root_to_source.len().min(root_to_target.len())
            });

        for list in [root_to_source, root_to_target] {
            for node in list.iter().skip(cursor) {
                if let Some(d) = self.get(node)?.parent_edge {
                    dist += d;
                } else {
                    all_dists = false;
                }
                branches += 1;
            }
        }

        if all_dists {
            Ok((Some(dist), branches))
        } else {
            Ok((None, branches))
        }
    }
}

/// Methods to reroot the [`Tree`]
///
/// ----
/// ----
impl Tree {
    // ###################
    // # REROOT THE TREE #
    // ###################

    /// Build a copy of the tree rooted at the specified node. The original
    /// tree is untouched and every node of the copy keeps its id.
    ///
    /// The directionality of the edges between the new root and the old one
    /// is reversed: each ancestor of the new root becomes a child of its
    /// former child and takes over the length of the reversed edge. The new
    /// root inherits the branch length the old root had, if any, so that a
    /// basal edge stays anchored to whichever node is the root.
    ///
    /// # Example
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let tree = Tree::from_newick("(b:1,(d:3,e:4)c:2)a;").unwrap();
    /// let node = tree.get_by_name("b").unwrap().id;
    ///
    /// let rerooted = tree.reroot(&node).unwrap();
    ///
    /// assert_eq!(rerooted.to_newick().unwrap(), "(((d:3,e:4)c:2)a:1)b;");
    /// // Node ids are preserved
    /// assert_eq!(rerooted.get(&node).unwrap().name.as_deref(), Some("b"));
    /// ```
    pub fn reroot(&self, node: &NodeId) -> Result<Tree, TreeError> {
        let mut chain = self.get_path_from_root(node)?;
        chain.reverse();

        let old_root = chain[chain.len() - 1];
        let mut rerooted = self.clone();

        // Reverse the edges along the chain, one parent-child pair at a
        // time. The reversed edge keeps its length, which moves it from the
        // old child to the old parent.
        for pair in chain.windows(2) {
            let (child, parent) = (pair[0], pair[1]);
            let edge = self.get(&child)?.parent_edge;

            let old_parent = rerooted.get_mut(&parent)?;
            old_parent.remove_child(&child)?;
            old_parent.set_parent(child, edge);

            rerooted.get_mut(&child)?.add_child(parent);
        }

        let root_edge = self.get(&old_root)?.parent_edge;
        let new_root = rerooted.get_mut(node)?;
        new_root.parent = None;
        new_root.parent_edge = root_edge;

        Ok(rerooted)
    }
}

/// Methods to read and write [`Tree`] objects to and from files or strings
///
/// ----
/// ----
impl Tree {
    // ########################
    // # READ AND WRITE TREES #
    // ########################

    /// Generate newick representation of tree
    fn to_newick_impl(&self, root: &NodeId) -> Result<String, TreeError> {
        let root = self.get(root)?;
        if root.children.is_empty() {
            Ok(root.to_newick())
        } else {
            Ok("(".to_string()
                + &(root
                    .children
                    .iter()
                    .map(|child_idx| self.to_newick_impl(child_idx).unwrap()))
                .collect::<Vec<String>>()
                .join(",")
                + ")"
                + &(root.to_newick()))
        }
    }

    /// Writes the tree as a newick formatted string
    /// # Example
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let newick = "(A:0.1,B:0.2,(C:0.3,D:0.4)E:0.5)F:0.6;";
    /// let tree = Tree::from_newick(newick).unwrap();
    ///
    /// assert_eq!(tree.to_newick().unwrap(), newick);
    /// ```
    pub fn to_newick(&self) -> Result<String, TreeError> {
        let root = self.get_root()?;
        Ok(self.to_newick_impl(&root)? + ";")
    }

    /// Parse a subtree of the newick string: the children in brackets if
    /// there are any, then the name and the branch length, both optional.
    fn parse_subtree(
        &mut self,
        scanner: &mut Scanner,
        parent: Option<NodeId>,
    ) -> Result<NodeId, NewickParseError> {
        let id = match parent {
            None => self.add(Node::new()),
            Some(parent) => self.add_child(Node::new(), parent, None)?,
        };

        if scanner.try_char('(') {
            loop {
                self.parse_subtree(scanner, Some(id))?;
                if !scanner.try_char(',') {
                    break;
                }
            }
            if let Err(e) = scanner.expect(')') {
                return Err(NewickParseError::UnclosedBracket(e));
            }
        }

        let name = scanner.read_token(Some(NEWICK_DELIMITERS));
        let name = name.trim();
        if !name.is_empty() {
            self.get_mut(&id)?.set_name(name.to_string());
        }

        if scanner.try_char(':') {
            let length = scanner.read_real::<EdgeLength>()?;
            self.get_mut(&id)?.parent_edge = Some(length);
        }

        Ok(id)
    }

    /// Read a newick formatted string and build a [`Tree`] struct from it.
    /// Node ids are assigned in the order the nodes are encountered, so the
    /// root gets id 0 and ids increase in pre-order.
    /// # Example
    /// ```
    /// use treecov::tree::Tree;
    ///
    /// let newick = "(A:0.1,B:0.2,(C:0.3,D:0.4)E:0.5)F;";
    /// let tree = Tree::from_newick(newick).unwrap();
    ///
    /// assert_eq!(tree.size(), 6);
    /// assert_eq!(tree.n_leaves(), 4);
    /// assert_eq!(tree.is_rooted().unwrap(), false);
    /// ```
    pub fn from_newick(newick: &str) -> Result<Self, NewickParseError> {
        let mut scanner = Scanner::new(newick);
        let mut tree = Tree::new();

        tree.parse_subtree(&mut scanner, None)?;

        if let Err(e) = scanner.expect(';') {
            return Err(NewickParseError::NoClosingSemicolon(e));
        }

        scanner.skip_whitespace();
        if !scanner.is_end_of_data() {
            return Err(NewickParseError::TrailingCharacters(
                scanner.read_token(None),
            ));
        }

        Ok(tree)
    }

    /// Writes the tree to a newick file
    pub fn to_file(&self, path: &Path) -> Result<(), TreeError> {
        match fs::write(path, self.to_newick()?) {
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates a tree from a newick file
    pub fn from_file(path: &Path) -> Result<Self, NewickParseError> {
        let newick_string = fs::read_to_string(path)?;
        Self::from_newick(&newick_string)
    }

    /// Recursive function that adds node representation to a printable tree builder
    fn print_nodes(
        &self,
        root_idx: &NodeId,
        output_tree: &mut TreeBuilder,
        debug: bool,
    ) -> Result<(), TreeError> {
        let root = self.get(root_idx)?;
        let label = if debug {
            format!("{root:?}")
        } else {
            format!("{root}")
        };

        if root.children.is_empty() {
            output_tree.add_empty_child(label);
        } else {
            output_tree.begin_child(label);
            for child_idx in root.children.iter() {
                self.print_nodes(child_idx, output_tree, debug)?;
            }
            output_tree.end_child();
        }

        Ok(())
    }

    /// Print a debug view of the tree to the console
    pub fn print_debug(&self) -> Result<(), TreeError> {
        let root = self.get_root()?;
        let mut builder = TreeBuilder::new(format!("{:?}", self.get(&root)?));
        for child_idx in self.get(&root)?.children.iter() {
            self.print_nodes(child_idx, &mut builder, true)?;
        }
        let tree = builder.build();
        print_tree(&tree)?;
        Ok(())
    }

    /// Print the tree to the console
    pub fn print(&self) -> Result<(), TreeError> {
        let root = self.get_root()?;
        let mut builder = TreeBuilder::new(format!("{}", self.get(&root)?));
        for child_idx in self.get(&root)?.children.iter() {
            self.print_nodes(child_idx, &mut builder, false)?;
        }
        let tree = builder.build();
        print_tree(&tree)?;
        Ok(())
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
