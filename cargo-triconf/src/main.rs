//! CLI entrypoint for `cargo-triconf`.

use std::io::Write;
use std::process::ExitCode;

use cargo_triconf::app::{self, Options};
use cargo_triconf::cli::Cargo;
use cargo_triconf::error::GenerateError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let Cargo::Triconf(args) = Cargo::parse();
    match run(&args.into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(options: &Options) -> Result<(), GenerateError> {
    let outputs = app::run(options)?;
    if !options.is_dry_run {
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    for package in outputs {
        for (name, text) in package.artifacts {
            let path = package.dir.join(&name);
            writeln!(stdout, "// ==> {path} <==\n{text}")
                .map_err(|err| GenerateError::io(path, err))?;
        }
    }
    Ok(())
}
