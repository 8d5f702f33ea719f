//! Build and manipulate phylogenetic trees.
//!
//! This module defines the essential structs to represent phylogenetic trees:
//!  - The [`Node`] struct that represents a node of a phylogenetic tree.
//!  - The [`Tree`] struct that holds a collection of [`Node`] objects.
//!  - The [`RootPath`] struct that represents the chain of edges between
//!    a node and the root of its tree.
//!

/// A module to draw phylogenetic trees
pub mod draw;
mod node;
mod path;
mod tree_impl;

pub use self::node::{Node, NodeError};
pub use self::path::RootPath;
pub use self::tree_impl::{NewickParseError, Tree, TreeError};

/// A type that represents Identifiers of [`Node`] objects
/// within phylogenetic [`Tree`] object.
pub type NodeId = usize;

/// A type that represents branch lengths between [`Node`] objects
/// within phylogenetic [`Tree`] object.
pub type EdgeLength = f64;
