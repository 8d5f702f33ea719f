//! Convert phylogenetic trees to covariance matrices.
//!
//! A tree whose `k` leaves are named `0` to `k-1` describes the shared drift
//! history of `k` populations: two populations covary by the amount of
//! branch length their histories have in common. This crate parses such
//! trees from newick strings, reroots them at the leaf named `0` and fills
//! the `(k-1) x (k-1)` covariance matrix of the remaining leaves. It can
//! also generate random input trees.

use std::collections::VecDeque;
use std::io::{Read, Write};

use clap::ValueEnum;
use rand::prelude::*;
use thiserror::Error;

use distr::{Distr, Sampler};
use rerooted::RerootedTree;
use tree::{EdgeLength, NewickParseError, Node, Tree, TreeError};

pub mod covariance;
pub mod distr;
pub mod rerooted;
pub mod scanner;
pub mod tree;

/// Errors that can occur when converting a newick stream to a covariance matrix.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input is not a valid newick tree
    #[error("Could not parse the input tree")]
    ParseError(#[from] NewickParseError),
    /// The tree cannot be rerooted for covariance computation
    #[error("Could not compute the covariance matrix")]
    TreeError(#[from] TreeError),
    /// There was a [`std::io::Error`] on one of the streams
    #[error("Error reading or writing a stream")]
    IoError(#[from] std::io::Error),
}

/// Available tree shapes for random generation
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TreeShape {
    /// A random binary topology
    Random,
    /// A single chain of internal nodes, each carrying one leaf
    Caterpillar,
}

/// Reads a newick tree from the input stream and writes its covariance
/// matrix to the output stream. The leaves of the tree must be named `0` to
/// `k-1`, the matrix covers the leaves `1` to `k-1` after rerooting the
/// tree at the leaf named `0`.
///
/// # Example
/// ```
/// use std::io::Cursor;
///
/// let mut input = Cursor::new("(0:1,(1:1,2:2)a:1)r;");
/// let mut output = Vec::new();
///
/// treecov::convert(&mut input, &mut output).unwrap();
///
/// assert_eq!(
///     String::from_utf8(output).unwrap(),
///     "2 2\n3e0\t2e0\n2e0\t4e0\n"
/// );
/// ```
pub fn convert<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(), ConvertError> {
    let mut newick = String::new();
    input.read_to_string(&mut newick)?;

    let rerooted = RerootedTree::from_newick(&newick)?;
    let matrix = rerooted.covariance_matrix()?;

    write!(output, "{matrix}")?;

    Ok(())
}

/// Generates a random binary tree of a given size, with the leaves named
/// `0` to `n_leaves - 1` so the output can be fed to [`convert`]. Branch
/// lengths are drawn from the chosen distribution.
/// ```
/// use treecov::{distr::Distr, generate_tree};
///
/// let tree = generate_tree(8, true, Distr::Uniform).unwrap();
///
/// assert_eq!(tree.n_leaves(), 8);
/// assert!(tree.is_binary().unwrap());
/// ```
pub fn generate_tree(
    n_leaves: usize,
    brlens: bool,
    sampler_type: Distr,
) -> Result<Tree, TreeError> {
    let mut tree = Tree::new();
    let mut rng = thread_rng();

    let sampler = Sampler::new(sampler_type);

    let mut next_deq = VecDeque::new();
    next_deq.push_back(tree.add(Node::new()));

    for _ in 0..(n_leaves - 1) {
        let parent_id = if rng.gen_bool(0.5) {
            next_deq.pop_front()
        } else {
            next_deq.pop_back()
        }
        .unwrap();
        let l1: Option<EdgeLength> = if brlens {
            Some(sampler.sample(&mut rng))
        } else {
            None
        };
        let l2: Option<EdgeLength> = if brlens {
            Some(sampler.sample(&mut rng))
        } else {
            None
        };
        next_deq.push_back(tree.add_child(Node::new(), parent_id, l1)?);
        next_deq.push_back(tree.add_child(Node::new(), parent_id, l2)?);
    }

    for (i, id) in next_deq.iter().enumerate() {
        tree.get_mut(id)?.set_name(i.to_string());
    }

    Ok(tree)
}

/// Generates a caterpillar tree by hanging one leaf off every node of a
/// chain of internal nodes. Leaves are named `0` to `n_leaves - 1` and
/// branch lengths are uniformly distributed.
pub fn generate_caterpillar(n_leaves: usize, brlens: bool) -> Result<Tree, TreeError> {
    let mut tree = Tree::new();
    let mut rng = thread_rng();

    let mut parent = tree.add(Node::new());
    for i in 1..n_leaves {
        let parent_bkp = parent;
        let l1: Option<EdgeLength> = if brlens { Some(rng.gen()) } else { None };
        let l2: Option<EdgeLength> = if brlens { Some(rng.gen()) } else { None };
        if i == n_leaves - 1 {
            // Adding the last two tips
            tree.add_child(Node::new_named(&(i - 1).to_string()), parent, l1)?;
            tree.add_child(Node::new_named(&i.to_string()), parent, l2)?;
        } else {
            // Adding the next internal node and its tip
            parent = tree.add_child(Node::new(), parent, l1)?;
            tree.add_child(Node::new_named(&(i - 1).to_string()), parent_bkp, l2)?;
        }
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {

    use std::io::Cursor;

    use itertools::Itertools;

    use super::*;

    #[test]
    fn convert_writes_matrix() {
        let mut input = Cursor::new("(0:1,(1:1,2:2)a:1)r;");
        let mut output = Vec::new();

        convert(&mut input, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "2 2\n3e0\t2e0\n2e0\t4e0\n"
        );
    }

    #[test]
    fn convert_accepts_surrounding_whitespace() {
        let mut input = Cursor::new("\n  (0:1,1:2)r;\n");
        let mut output = Vec::new();

        convert(&mut input, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "1 1\n3e0\n");
    }

    #[test]
    fn convert_rejects_bad_input() {
        let mut output = Vec::new();

        let err = convert(&mut Cursor::new("((a,b)c"), &mut output).unwrap_err();
        assert!(matches!(err, ConvertError::ParseError(_)));

        let err = convert(&mut Cursor::new("(a,b)c;"), &mut output).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ParseError(NewickParseError::TreeError(TreeError::MissingLeaf(_)))
        ));
    }

    #[test]
    fn generated_trees_are_convertible() {
        for size in [2, 5, 16, 100] {
            let tree = generate_tree(size, true, Distr::Uniform).unwrap();
            assert_eq!(tree.n_leaves(), size);

            let rerooted = RerootedTree::from_tree(&tree).unwrap();
            assert_eq!(rerooted.rk(), size - 1);
        }
    }

    #[test]
    fn generated_leaves_are_numbered() {
        let tree = generate_tree(10, false, Distr::Uniform).unwrap();

        let names: Vec<_> = tree
            .get_leaf_names()
            .into_iter()
            .flatten()
            .sorted()
            .collect();
        let expected: Vec<_> = (0..10).map(|i| i.to_string()).sorted().collect();

        assert_eq!(names, expected);
    }

    #[test]
    fn generated_trees_are_binary() {
        for distr in [Distr::Uniform, Distr::Exponential, Distr::Gamma] {
            let tree = generate_tree(32, true, distr).unwrap();
            assert!(tree.is_binary().unwrap());
            assert!(tree.is_rooted().unwrap());
        }
    }

    #[test]
    fn caterpillar_trees_are_convertible() {
        for size in [2, 4, 9] {
            let tree = generate_caterpillar(size, true).unwrap();
            assert_eq!(tree.n_leaves(), size);

            let rerooted = RerootedTree::from_tree(&tree).unwrap();
            assert_eq!(rerooted.rk(), size - 1);
        }
    }
}
