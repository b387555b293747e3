//! CLI entry point for jsondir

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use jsondir::{OutputConfig, TreeBuilder, WalkerConfig, write_json};

#[derive(Parser, Debug)]
#[command(name = "jsondir")]
#[command(about = "Display directory structure in JSON format")]
#[command(version)]
struct Args {
    /// The files or directories to display
    #[arg(default_value = ".", value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Include all files, including hidden ones
    #[arg(short, long)]
    all: bool,

    /// Nest full records for subdirectories instead of listing names
    #[arg(short = 'R', long = "recursive")]
    recursive: bool,

    /// Descend only N levels deep (with --recursive)
    #[arg(short = 'L', long = "level", requires = "recursive")]
    level: Option<usize>,

    /// Ignore entries matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// Number of parallel workers for recursive traversal
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Spaces per indentation level
    #[arg(long = "indent", default_value = "4")]
    indent: usize,

    /// Emit one compact JSON object per line
    #[arg(long = "compact")]
    compact: bool,

    /// Log skipped entries and other diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let builder = TreeBuilder::new(WalkerConfig {
        include_hidden: args.all,
        recursive: args.recursive,
        max_depth: args.level,
        ignore_patterns: args.ignore.clone(),
        parallel_workers: args.jobs,
    });
    let output_config = OutputConfig {
        indent: args.indent,
        compact: args.compact,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for path in &args.files {
        match builder.build(path) {
            Ok(info) => exit_on_write_error(write_json(&mut out, &info, &output_config)),
            Err(e) => {
                // Keep stdout and stderr in input order
                exit_on_write_error(out.flush());
                eprintln!("jsondir: {}", e);
                failed = true;
            }
        }
    }

    exit_on_write_error(out.flush());

    if failed {
        process::exit(1);
    }
}

fn exit_on_write_error(result: io::Result<()>) {
    if let Err(e) = result {
        eprintln!("jsondir: error writing output: {}", e);
        process::exit(1);
    }
}
