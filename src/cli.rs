use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use crate::error;
use crate::output::OutputMode;
use crate::source::go::config::{CURRENT_PACKAGE, GO_COMMAND, GO_COMMAND_ENV};
use crate::source::{GoListSource, GraphSource, PackageSource};
use crate::walk::WalkOptions;

/// Exit status for malformed invocations.
pub const USAGE_EXIT_CODE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "deplist")]
#[command(version)]
#[command(
    about = "List the transitive non-standard dependencies of a Go package",
    long_about = "List the transitive non-standard dependencies of a Go package.\n\n\
                  PKG is the name of a Go package (e.g. github.com/cespare/deplist). \
                  PKG is optional; if no package name is given, the package in the \
                  current directory is used. Passing more than one package is a usage error."
)]
pub struct Args {
    /// Package to inspect
    #[arg(value_name = "PKG", default_value = CURRENT_PACKAGE)]
    pub package: String,

    /// Include test dependencies of PKG
    #[arg(short = 't', long = "tests")]
    pub tests: bool,

    /// Include only packages which match this prefix
    #[arg(short, long, value_name = "PREFIX", default_value = "")]
    pub prefix: String,

    /// Include PKG in output
    #[arg(long, alias = "include_input_pkg")]
    pub include_input_pkg: bool,

    /// List all packages as a comma-separated list on one line
    #[arg(long)]
    pub oneline: bool,

    /// Additional import paths to skip. Can be specified multiple times.
    #[arg(short, long, value_name = "PKG")]
    pub ignore: Vec<String>,

    /// Read package metadata from a JSON or YAML graph file instead of `go list`
    #[arg(long, value_name = "FILE")]
    pub graph: Option<PathBuf>,

    /// Go executable used to resolve packages
    #[arg(long, value_name = "PATH", env = GO_COMMAND_ENV, default_value = GO_COMMAND)]
    pub go: PathBuf,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref graph) = self.graph {
            if !graph.is_file() {
                anyhow::bail!("Graph file does not exist: {}", graph.display());
            }
        }
        Ok(())
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.oneline {
            OutputMode::OneLine
        } else {
            OutputMode::Lines
        }
    }

    /// Builds walk options rooted at the process working directory.
    pub fn walk_options(&self) -> error::Result<WalkOptions> {
        let options = WalkOptions::from_current_dir()?
            .include_tests(self.tests)
            .prefix(self.prefix.clone())
            .ignore(self.ignore.iter().cloned());
        Ok(options)
    }

    pub fn package_source(&self) -> error::Result<Box<dyn PackageSource>> {
        match self.graph {
            Some(ref path) => {
                let graph = GraphSource::load(path)?;
                debug!(path = %path.display(), packages = graph.len(), "using graph file");
                Ok(Box::new(graph))
            }
            None => {
                let source = GoListSource::new(&self.go);
                debug!(go = %source.go().display(), "using go list");
                Ok(Box::new(source))
            }
        }
    }
}
