//! CLI structure and `clap` parsing (spec §4.8/§6: "CLI entry points" are a
//! contract-only external collaborator — this is the thin surface that
//! satisfies it without growing UX beyond `compile`/`run`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "canvas", about = "Canvas reactive pipeline framework: compiler and runtime CLI", version)]
pub struct Cli {
    /// Emit DEBUG-level tracing instead of INFO.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Compiler Phase Driver (C6) over a module directory and
    /// write its generated artifacts.
    Compile {
        /// Directory containing the pipeline configuration search path.
        #[arg(long)]
        module_dir: PathBuf,
        /// Directory generated artifacts are written under.
        #[arg(long)]
        output_dir: PathBuf,
        /// Logical module name used in generated package paths. Falls back
        /// to `module.name` from a layered `canvas.toml`/`CANVAS_*`
        /// options source when omitted.
        #[arg(long)]
        module_name: Option<String>,
        /// Explicit descriptor-set file, bypassing directory search. Falls
        /// back to `descriptor.file` from the layered options source.
        #[arg(long)]
        descriptor_file: Option<PathBuf>,
        /// Directory to search for a descriptor set. Falls back to
        /// `descriptor.path` from the layered options source.
        #[arg(long)]
        descriptor_dir: Option<PathBuf>,
        /// Comma-separated fully-qualified service names the descriptor
        /// set must declare.
        #[arg(long, value_delimiter = ',')]
        required_service: Vec<String>,
    },
    /// Start the runtime orchestrator shell against a previously compiled
    /// module, waiting for a shutdown signal (SIGINT/SIGTERM).
    Run {
        /// Directory holding a prior `compile` run's `order.json`.
        #[arg(long)]
        module_dir: PathBuf,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
