#![warn(missing_docs)]
//! The `treecov` binary is a command line tool, using the `[treecov]` crate.
//! It converts phylogenetic trees with numbered leaves into the covariance
//! matrices used by admixture models, and bundles a few helpers to reroot,
//! generate, inspect and draw such trees.

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::ProgressIterator;
use serde::Serialize;
use std::{
    fmt::Display,
    fs::File,
    io,
    io::{BufWriter, Read, Write},
    path::Path,
};
use tinytemplate::TinyTemplate;
use treecov::{
    distr::Distr,
    generate_caterpillar, generate_tree,
    tree::{
        draw::{self, Layout, Node},
        Tree, TreeError,
    },
    TreeShape,
};

/// contains the struct representing the command line arguments
/// parsed by [`clap`] and used to execute this binary
pub mod cli;

fn print_stats_header(name: bool) {
    if name {
        println!("filename\theight\tdiameter\tlength\tnodes\ttips\trooted\tbinary")
    } else {
        println!("height\tdiameter\tlength\tnodes\ttips\trooted\tbinary")
    }
}

fn to_repr<T, E>(res: Result<T, E>) -> String
where
    T: Display,
{
    res.map_or_else(|_| "-".into(), |v| format!("{v}"))
}

fn print_stats(path: &Path, name: bool, print: bool) {
    let tree = Tree::from_file(path).unwrap();

    let name = if name {
        format!("{:?}\t", path)
    } else {
        "".into()
    };

    println!(
        "{name}{}\t{}\t{}\t{}\t{}\t{}\t{}",
        to_repr(tree.height()),
        to_repr(tree.diameter()),
        to_repr(tree.length()),
        tree.size(),
        tree.n_leaves(),
        to_repr(tree.is_rooted()),
        to_repr(tree.is_binary()),
    );

    if print {
        tree.print().unwrap()
    }
}

fn main() {
    match cli::Args::parse().command {
        cli::Commands::Convert { tree, output } => {
            let mut reader: Box<dyn Read> = match tree {
                Some(path) => Box::new(File::open(&path).unwrap()),
                None => Box::new(io::stdin()),
            };
            let mut writer = BufWriter::new(match output {
                Some(path) => Box::new(File::create(&path).unwrap()) as Box<dyn Write>,
                None => Box::new(io::stdout()) as Box<dyn Write>,
            });

            treecov::convert(&mut reader, &mut writer).unwrap();
        }
        cli::Commands::Reroot { tree, node, output } => {
            let tree = Tree::from_file(&tree).unwrap();
            let id = tree
                .get_by_name(&node)
                .unwrap_or_else(|| panic!("No node named {node} in the tree"))
                .id;

            let rerooted = tree.reroot(&id).unwrap();

            if let Some(path) = output {
                rerooted.to_file(&path).unwrap();
            } else {
                println!("{}", rerooted.to_newick().unwrap());
            }
        }
        cli::Commands::Generate {
            tips,
            branch_lengths,
            output,
            trees,
            shape,
            distribution,
        } => {
            let generate = |tips: usize,
                            brlens: bool,
                            distr: Distr,
                            shape: TreeShape|
             -> Result<Tree, TreeError> {
                match shape {
                    TreeShape::Random => generate_tree(tips, brlens, distr),
                    TreeShape::Caterpillar => generate_caterpillar(tips, brlens),
                }
            };

            if let Some(ntrees) = trees {
                // Create output directory if it's missing
                assert!(
                    output.is_some(),
                    "If you are generating multiple trees you must specify an output directory"
                );
                let output = output.unwrap();
                std::fs::create_dir_all(&output).unwrap();

                for i in (0..ntrees).progress() {
                    let output = output.join(format!("{}_{tips}_tips.nwk", i + 1));
                    let random = generate(tips, branch_lengths, distribution, shape).unwrap();
                    random.to_file(&output).unwrap()
                }
            } else {
                let random = generate(tips, branch_lengths, distribution, shape).unwrap();
                if let Some(output) = output {
                    random.to_file(&output).unwrap()
                } else {
                    println!("{}", random.to_newick().unwrap())
                }
            }
        }
        cli::Commands::Stats { trees, print } => {
            let print_name = trees.len() > 1;
            print_stats_header(print_name);
            for tree in trees {
                print_stats(&tree, print_name, print)
            }
        }
        cli::Commands::Draw {
            tree,
            width,
            height,
            transparent,
            padding,
            output,
        } => {
            let tree = Tree::from_file(&tree).unwrap();
            let mut layout = draw::radial_layout(&tree).unwrap();

            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for Node { x, y, label: _ } in layout.nodes.iter() {
                let i = x.min(*y);
                let a = x.max(*y);

                min = min.min(i);
                max = max.max(a);
            }

            let scale = width.min(height) / (max - min + 1.);
            layout.rescale(scale);
            let padding_scale = (100. - padding) / 100.;

            let ctx = Context {
                xmin: -(width / 2.0) as i32,
                ymin: -(height / 2.0) as i32,
                width: width as i32,
                height: height as i32,
                scale: padding_scale,
                transparent,
                layout,
            };

            let mut writer = BufWriter::new(match output {
                Some(path) => Box::new(File::create(&path).unwrap()) as Box<dyn Write>,
                None => Box::new(io::stdout()) as Box<dyn Write>,
            });

            let mut tt = TinyTemplate::new();
            tt.add_template("svg", SVG).unwrap();
            writer
                .write_all(tt.render("svg", &ctx).unwrap().as_bytes())
                .unwrap();
        }
        cli::Commands::Completion { shell } => {
            let mut cmd = cli::Args::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }
}

#[derive(Serialize)]
struct Context {
    xmin: i32,
    ymin: i32,
    width: i32,
    height: i32,
    scale: f64,
    transparent: bool,
    layout: Layout,
}

static SVG : &str =  "\
<?xml version=\"1.0\" standalone=\"no\"?>
<svg viewBox=\"{xmin} {ymin} {width} {height}\" width='100%' height='100%' xmlns='http://www.w3.org/2000/svg'>
    {{ if not transparent }}
    <rect fill=\"white\" x=\"{xmin}\" y=\"{ymin}\" width=\"100%\" height=\"100%\"/>
    {{ endif }}
    <g transform=\"scale({scale})\">
    {{ for branch in layout.branches }}
        <path stroke=\"black\" stroke-width=\"1\" fill=\"none\" d=\"M {branch.xstart} {branch.ystart} L {branch.xend} {branch.yend}\"/>
    {{ endfor }}
    {{ for node in layout.nodes }}
        {{ if node.label }}
        <text x=\"{node.x}\" y=\"{node.y}\" class=\"small\" font-size=\"2px\">{node.label}</text>
        {{ endif }}
    {{ endfor }}
    </g>
</svg>
";
