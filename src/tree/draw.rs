use serde::Serialize;

use super::node::NodeError;
use super::tree_impl::{Tree, TreeError};

/// A straight branch between the positions of a node and its parent
#[derive(Debug, Clone, Serialize)]
pub struct Branch {
    pub xstart: f64,
    pub ystart: f64,
    pub xend: f64,
    pub yend: f64,
}

impl Branch {
    fn rescale(&mut self, factor: f64) {
        self.xstart *= factor;
        self.ystart *= factor;
        self.xend *= factor;
        self.yend *= factor;
    }
}

/// The position and label of a single node in the layout
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

impl Node {
    fn rescale(&mut self, factor: f64) {
        self.x *= factor;
        self.y *= factor;
    }
}

/// A tree laid out in the plane, ready to be drawn
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub branches: Vec<Branch>,
    pub nodes: Vec<Node>,
}

impl Layout {
    /// Scales all the coordinates of the layout by a fixed factor
    pub fn rescale(&mut self, factor: f64) {
        for branch in self.branches.iter_mut() {
            branch.rescale(factor);
        }
        for node in self.nodes.iter_mut() {
            node.rescale(factor);
        }
    }
}

/// Embeds the tree in the plane with a radial layout. Each node splits its
/// angular range equally among its children and each branch is drawn with
/// its actual length, pointing at the angle assigned to the child below it.
/// The root sits at the origin with the full circle as its range.
///
/// Negative branch lengths are drawn with length 0, missing branch lengths
/// are an error.
pub fn radial_layout(tree: &Tree) -> Result<Layout, TreeError> {
    let root = tree.get_root()?;
    let traversal = tree.preorder(&root)?;

    let mut angles = vec![0.0; tree.size()];
    let mut ranges = vec![0.0; tree.size()];
    let mut xs = vec![0.0; tree.size()];
    let mut ys = vec![0.0; tree.size()];

    ranges[root] = std::f64::consts::TAU;

    for id in traversal.iter() {
        let node = tree.get(id)?;
        let count = node.children.len() as f64;

        for (rank, child) in node.children.iter().enumerate() {
            angles[*child] =
                angles[*id] + ranges[*id] * ((0.5 + rank as f64) / count) - ranges[*id] / 2.0;
            ranges[*child] = ranges[*id] / count;
        }
    }

    let mut branches = vec![];
    let mut nodes = vec![];

    for id in traversal.iter().filter(|id| **id != root) {
        let node = tree.get(id)?;
        let parent = node.parent.ok_or(NodeError::HasNoParent(*id))?;
        let length = node
            .parent_edge
            .ok_or(TreeError::MissingBranchLengths)?
            .max(0.0);

        xs[*id] = xs[parent] + length * angles[*id].cos();
        ys[*id] = ys[parent] + length * angles[*id].sin();

        branches.push(Branch {
            xstart: xs[parent],
            ystart: ys[parent],
            xend: xs[*id],
            yend: ys[*id],
        });
        nodes.push(Node {
            x: xs[*id],
            y: ys[*id],
            label: node.name.clone().unwrap_or_default(),
        });
    }

    Ok(Layout { branches, nodes })
}

#[cfg(test)]
mod tests {

    use super::*;

    fn euclidean(branch: &Branch) -> f64 {
        ((branch.xend - branch.xstart).powi(2) + (branch.yend - branch.ystart).powi(2)).sqrt()
    }

    #[test]
    fn one_branch_and_label_per_non_root_node() {
        let tree = Tree::from_newick("(A:1,B:1,(C:1,D:1)E:1)F;").unwrap();
        let layout = radial_layout(&tree).unwrap();

        assert_eq!(layout.branches.len(), 5);
        assert_eq!(layout.nodes.len(), 5);

        let labels: Vec<_> = layout.nodes.iter().map(|n| n.label.clone()).collect();
        assert_eq!(labels, vec!["A", "B", "E", "C", "D"]);
    }

    #[test]
    fn branches_keep_their_lengths() {
        let tree = Tree::from_newick("(A:1,B:2,(C:0.5,D:3)E:1.5)F;").unwrap();
        let layout = radial_layout(&tree).unwrap();

        for (branch, expected) in layout.branches.iter().zip([1.0, 2.0, 1.5, 0.5, 3.0]) {
            assert!((euclidean(branch) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn children_split_the_circle() {
        let tree = Tree::from_newick("(A:1,B:1)R;").unwrap();
        let layout = radial_layout(&tree).unwrap();

        // Two children of the root get opposite quarter-circle angles,
        // landing them at (0,-1) and (0,1)
        let a = &layout.nodes[0];
        assert!(a.x.abs() < 1e-12 && (a.y + 1.0).abs() < 1e-12);

        let b = &layout.nodes[1];
        assert!(b.x.abs() < 1e-12 && (b.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_lengths_are_clamped() {
        let tree = Tree::from_newick("(A:-1,B:1)R;").unwrap();
        let layout = radial_layout(&tree).unwrap();

        assert!(euclidean(&layout.branches[0]) < 1e-12);
    }

    #[test]
    fn missing_lengths_are_an_error() {
        let tree = Tree::from_newick("(A,B:1)R;").unwrap();
        let err = radial_layout(&tree).unwrap_err();
        assert!(matches!(err, TreeError::MissingBranchLengths));
    }

    #[test]
    fn rescale_scales_all_coordinates() {
        let tree = Tree::from_newick("(A:1,B:2)R;").unwrap();
        let mut layout = radial_layout(&tree).unwrap();

        layout.rescale(10.0);

        for (branch, expected) in layout.branches.iter().zip([10.0, 20.0]) {
            assert!((euclidean(branch) - expected).abs() < 1e-9);
        }
    }
}
