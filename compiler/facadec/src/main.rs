//! Facade Compiler CLI

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use facadec::facade_emit::EmitOptions;
use facadec::CompileError;

#[derive(Parser)]
#[command(name = "facadec")]
#[command(about = "Generate Rust facade clients from an interface-definition document.", long_about = None)]
struct Cli {
    /// Interface-definition document (JSON).
    #[arg(short, long, default_value = "schemas.json")]
    schema: PathBuf,

    /// Where the generated Rust source is written.
    #[arg(short, long, default_value = "client.rs")]
    output: PathBuf,

    /// Leave doc comments out of the generated code.
    #[arg(long)]
    no_docs: bool,

    /// Path of the runtime crate in the generated code.
    #[arg(long, value_name = "PATH", default_value = "facade_rt")]
    runtime: String,

    /// Print facades and operations instead of writing code.
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    facadec::init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<(), CompileError> {
    let schema = facadec::compile_path(&cli.schema)?;
    if cli.list {
        print!("{}", facadec::list(&schema));
        return Ok(());
    }
    let options = EmitOptions {
        doc_comments: !cli.no_docs,
        runtime_crate: cli.runtime.clone(),
    };
    facadec::generate(&schema, &options, &cli.output)?;
    eprintln!(
        "wrote {} facade(s) to {}",
        schema.facades().len(),
        cli.output.display()
    );
    Ok(())
}

fn report(err: &CompileError) {
    eprintln!("error: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
