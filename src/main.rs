use anyhow::Result;
use clap::Parser;
use sortc::{options::Options, Context};
use std::{io::Write, path::PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Specification file
    #[clap(value_parser)]
    input: PathBuf,

    /// Output header, or pass "-" to write to stdout
    #[clap(value_parser)]
    output: clio::Output,

    /// Report every compiled or skipped file
    #[clap(short, long)]
    verbose: bool,

    /// Dump the tokens and syntax tree of every file
    #[clap(short, long)]
    debug: bool,

    /// Disable colored diagnostics
    #[clap(long)]
    no_color: bool,

    /// Path prefix of the generated library headers
    #[clap(long, default_value = "mcrl2/data")]
    include_prefix: String,
}

fn main() -> Result<()> {
    let mut args = Cli::parse();

    let options = Options {
        verbose: args.verbose,
        debug: args.debug,
        color: !args.no_color,
        include_prefix: args.include_prefix,
    };
    let mut context = Context::new().set_options(options);

    let compiled = match context.compile_file(&args.input) {
        Ok(compiled) => compiled,
        Err(err) => anyhow::bail!("{}", err),
    };
    args.output.write_all(compiled.code.as_bytes())?;

    Ok(())
}
