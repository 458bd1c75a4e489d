use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::{ArgAction, Parser, ValueEnum};
use fracta::{
    compiler::compiler::{backend_for, CodegenError},
    errors::{errors::CompileError, report::Diagnostics},
    lexer::lexer::scan_all,
    pipeline::{compile_sources, Source},
};
use log::{debug, info, LevelFilter};
use thiserror::Error;

/// Front end of the Fracta compiler: checks a package and emits its tree.
#[derive(Parser, Debug)]
#[command(name = "fracta", version, long_about = None)]
struct Cli {
    /// Source files of the package
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Package name, defaults to the stem of the first file
    #[arg(short, long)]
    package: Option<String>,

    /// What to write once the package checks
    #[arg(short, long, value_enum, default_value_t = Emit::Tree)]
    emit: Emit,

    /// Output file, stdout when missing
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// More logging, repeat for more detail (RUST_LOG applies otherwise)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Tree,
    Json,
    Llvm,
}

impl Emit {
    fn id(&self) -> &'static str {
        match self {
            Emit::Tokens => "tokens",
            Emit::Tree => "tree",
            Emit::Json => "json",
            Emit::Llvm => "llvm",
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    #[error("failed to create {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("{0} lexical diagnostic(s)")]
    Tokens(usize),
}

fn setup_logging(verbose: u8) {
    let mut builder = if verbose == 0 {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
    } else {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(match verbose {
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        });
        builder
    };

    builder.format_timestamp(None).init();
}

fn open_sink(output: &Option<PathBuf>) -> Result<Box<dyn Write>, CliError> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::Output {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn emit_tokens(cli: &Cli, sources: &[Source]) -> Result<(), CliError> {
    let mut sink = open_sink(&cli.output)?;
    let mut diagnostics = Diagnostics::new();

    for source in sources {
        let (tokens, lexical) = scan_all(source.text.clone(), Some(source.name.clone()));
        for token in &tokens {
            writeln!(sink, "{}", token)?;
        }
        diagnostics.extend(lexical);
    }

    sink.flush()?;

    if diagnostics.has_errors() {
        eprint!("{}", diagnostics.render(sources));
        return Err(CliError::Tokens(diagnostics.len()));
    }

    Ok(())
}

fn run(cli: &Cli, sources: &[Source]) -> Result<(), CliError> {
    if cli.emit == Emit::Tokens {
        return emit_tokens(cli, sources);
    }

    let package = match &cli.package {
        Some(package) => package.clone(),
        None => cli.files[0]
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("main")),
    };

    let mut backend = backend_for(cli.emit.id(), &package)?;

    let start = Instant::now();
    let programs = compile_sources(&package, sources)?;
    info!("checked package {} in {:?}", package, start.elapsed());

    let mut sink = open_sink(&cli.output)?;
    backend.generate(&programs, &mut sink)?;
    sink.flush()?;

    debug!("{} backend finished in {:?}", backend.name(), start.elapsed());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut sources = vec![];
    for path in &cli.files {
        match Source::read(path) {
            Ok(source) => sources.push(source),
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    match run(&cli, &sources) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let CliError::Compile(compile) = &err {
                let diagnostics = Diagnostics::from(compile.diagnostics().to_vec());
                eprint!("{}", diagnostics.render(&sources));
            }
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
