use crate::args::bind_args;
use crate::compiler::{Compiler, Options};
use crate::graph::ResourceGraph;
use crate::package::{resolve_package_path, Package};
use crate::render::render_graph;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Show verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a blueprint package and print its resource graph
    #[command(
        override_usage = "blueprint eval [BLUEPRINT] [-- [ARGS]...]",
        long_about = "Evaluate a blueprint package and print its resource graph.\n\n\
            The graph holds the resources a deployment of the package would manage, \
            with an edge from each resource to the resources it depends on. \
            Evaluating does not touch the target environment.\n\n\
            By default the package is found by searching the current directory and \
            its parents. A path to a package file or directory can be given instead. \
            Anything after `--` is passed to the package entrypoint as arguments."
    )]
    Eval {
        #[arg(help = "Path to the blueprint package, or '-' for the current one")]
        blueprint: Option<String>,

        #[arg(
            last = true,
            allow_hyphen_values = true,
            help = "Arguments for the package entrypoint"
        )]
        args: Vec<String>,
    },
}

pub struct Evaluator {
    cwd: PathBuf,
}

impl Evaluator {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(env::current_dir()?))
    }

    /// Compiles the requested package with `pack_args` bound as its entrypoint
    /// arguments. `None` means no package could be read; that is not an error.
    pub fn evaluate(
        &self,
        blueprint: Option<&str>,
        pack_args: &[String],
    ) -> Result<Option<ResourceGraph>> {
        let args = bind_args(pack_args)?;
        debug!("Entrypoint arguments: {}", serde_json::to_string(&args)?);
        let options = Options::default().with_args(args);

        let graph = match blueprint {
            None | Some("-") => Compiler::discover(&self.cwd, options)?.compile()?,
            Some(path) => {
                let package_path = resolve_package_path(&self.cwd.join(path));
                let package = match Package::load(&package_path) {
                    Ok(package) => package,
                    Err(e) => {
                        warn!("{:#}", anyhow::Error::from(e));
                        return Ok(None);
                    }
                };
                let base_dir = package_path.parent().unwrap_or(Path::new("."));
                Compiler::new(base_dir, options).compile_package(&package)?
            }
        };

        Ok(Some(graph))
    }
}

/// One-line report for an error that ends the process, causes included.
pub fn diagnostic(err: &anyhow::Error) -> String {
    format!("error: {err:#}")
}

pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Eval { blueprint, args } => {
            let evaluator = Evaluator::from_env()?;
            if let Some(graph) = evaluator.evaluate(blueprint.as_deref(), &args)? {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                render_graph(&graph, &mut out)?;
                out.flush()?;
            }
        }
    }

    Ok(())
}
