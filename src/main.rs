use std::{fs, path::PathBuf, process, time::Instant};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use inkwell::context::Context;
use log::info;

use paracl::{
    ast::dump::dump_program,
    check_source,
    compiler::compiler::{compile, Compiler},
    errors::errors::{Error, ErrorTip},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Textual LLVM IR
    Ir,
    /// Native object file for the host
    Obj,
}

/// Compiles a ParaCL source file to LLVM IR or a native object file
#[derive(Parser, Debug)]
#[command(name = "paracl")]
#[command(version)]
struct Cli {
    /// Input source file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (IR goes to stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// What to emit
    #[arg(long, value_enum, default_value_t = Emit::Ir)]
    emit: Emit,

    /// Print the typed AST before emitting
    #[arg(long)]
    dump_ast: bool,

    /// Name of the LLVM module (defaults to the input file stem)
    #[arg(long, value_name = "NAME")]
    module_name: Option<String>,
}

fn display_error(error: &Error) {
    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
}

fn emit(cli: &Cli, compiled: &Compiler) -> anyhow::Result<()> {
    match (cli.emit, &cli.output) {
        (Emit::Ir, None) => print!("{}", compiled.print_module()),
        (Emit::Ir, Some(path)) => compiled
            .save_module_to_file(path)
            .map_err(|error| anyhow::anyhow!("{}", error))?,
        (Emit::Obj, output) => {
            let path = match output {
                Some(path) => path.clone(),
                None => cli.input.with_extension("o"),
            };
            compiled
                .write_object_file(&path)
                .map_err(|error| anyhow::anyhow!("{}", error))?;
            info!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let module_name = match &cli.module_name {
        Some(name) => name.clone(),
        None => cli
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("main")),
    };

    let (program, type_checker) = match check_source(&source) {
        Ok(checked) => checked,
        Err(error) => {
            display_error(&error);
            process::exit(1);
        }
    };

    if cli.dump_ast {
        print!("{}", dump_program(&program, Some(&type_checker.types)));
    }

    let context = Context::create();
    let compile_start = Instant::now();
    let compiled = match compile(program, type_checker, &module_name, &context) {
        Ok(compiled) => compiled,
        Err(error) => {
            display_error(&error);
            process::exit(1);
        }
    };
    info!("Compiled in {:?}", compile_start.elapsed());

    emit(&cli, &compiled)?;
    info!("Total time: {:?}", start.elapsed());

    Ok(())
}
