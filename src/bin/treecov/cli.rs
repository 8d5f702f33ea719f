use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use treecov::distr::Distr;
use treecov::TreeShape;

/// A command line tool to convert phylogenetic trees to covariance matrices
#[derive(Parser, Debug)]
pub struct Args {
    #[command(subcommand)]
    /// The command to execute
    pub command: Commands,
}

/// The available commands in the `treecov` tool
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a newick tree to a covariance matrix
    ///
    /// The leaves of the tree must be named 0 to k-1, where k is the number
    /// of leaves. The tree is rerooted at the leaf named 0 and the
    /// covariance of two remaining leaves is the branch length their paths
    /// to the new root share.
    Convert {
        /// Input newick file of the tree, stdin if missing
        tree: Option<PathBuf>,

        /// File to save the matrix to, stdout if missing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reroot a tree at the named node
    Reroot {
        /// Input newick file of the tree
        tree: PathBuf,

        /// Name of the node to reroot at
        node: String,

        /// File to save the tree to, stdout if missing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate random tree(s) with numbered leaves
    Generate {
        /// Number of tips in the generated tree
        #[arg(short, long, default_value_t = 20)]
        tips: usize,

        /// Generate branch lengths
        #[arg(short, long)]
        branch_lengths: bool,

        /// Output file (directory if generating multiple trees)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of trees to generate
        #[arg(short = 'n', long)]
        trees: Option<usize>,

        /// Shape of the generated tree
        #[arg(value_enum, short, long, default_value_t = TreeShape::Random)]
        shape: TreeShape,

        /// Distribution of branch lengths
        #[arg(value_enum, short, long, default_value_t = Distr::Uniform)]
        distribution: Distr,
    },

    /// Get statistics about trees
    Stats {
        /// Input newick files of the trees
        trees: Vec<PathBuf>,

        /// Print each tree to the terminal
        #[arg(short, long)]
        print: bool,
    },

    /// Draw a tree to an SVG file
    Draw {
        /// The phylogenetic tree
        tree: PathBuf,

        /// Width of the SVG
        #[arg(long, default_value_t = 1000.)]
        width: f64,

        /// Height of the SVG
        #[arg(long, default_value_t = 1000.)]
        height: f64,

        /// Percentage of padding around the drawing
        #[arg(short, long, default_value_t = 5.)]
        padding: f64,

        /// Do not draw a white background
        #[arg(long)]
        transparent: bool,

        /// File to save the SVG to, stdout if missing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
