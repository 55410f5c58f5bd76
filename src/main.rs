use std::io::Write;
use std::process;

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use deplist::cli::{self, Args};
use deplist::logging::{self, Verbosity};
use deplist::output::list_dependencies;
use tracing::info;

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            process::exit(cli::USAGE_EXIT_CODE);
        }
        Err(err) => err.exit(),
    };
    args.validate().context("Invalid arguments")?;

    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    let options = args.walk_options()?;
    let source = args
        .package_source()
        .context("Failed to set up package source")?;

    info!(package = %args.package, dir = %options.working_dir.display(), "finding dependencies");
    let report = list_dependencies(
        source.as_ref(),
        &options,
        &args.package,
        args.include_input_pkg,
    )
    .with_context(|| format!("Failed to list dependencies of {}", args.package))?;
    info!(count = report.len(), "found dependencies");

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.render(args.output_mode()).as_bytes())
        .context("Failed to write output")?;
    stdout.flush().context("Failed to write output")?;

    Ok(())
}
