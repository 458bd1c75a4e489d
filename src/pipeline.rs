//! The front end as one call: lexer, parser and analyzer over a package.
//!
//! Every stage runs over all of the package's sources before the next one
//! starts, and the first stage that reports anything stops the pipeline with
//! all of that stage's diagnostics.

use std::{fs, path::Path, rc::Rc};

use log::{debug, info};

use crate::{
    ast::ast::Program,
    errors::errors::{CompileError, Diagnostic},
    lexer::lexer::scan_all,
    parser::parser::parse,
    type_checker::type_checker::analyze,
};

/// A named source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new(name: &str, text: &str) -> Self {
        Source {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    /// Reads a source file. The path as given becomes the source name.
    pub fn read(path: &Path) -> Result<Self, CompileError> {
        let text = fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Source {
            name: path.to_string_lossy().into_owned(),
            text,
        })
    }
}

/// Compiles every source of one package and returns the checked programs,
/// in the order the sources were given.
pub fn compile_sources(package: &str, sources: &[Source]) -> Result<Vec<Program>, CompileError> {
    let mut streams = vec![];
    let mut diagnostics: Vec<Diagnostic> = vec![];

    for source in sources {
        let (tokens, lexical) = scan_all(source.text.clone(), Some(source.name.clone()));
        diagnostics.extend(lexical);
        streams.push((Rc::new(source.name.clone()), tokens));
    }

    if !diagnostics.is_empty() {
        return Err(CompileError::Lexing(diagnostics));
    }

    let mut programs = vec![];

    for (file, tokens) in streams {
        let (program, syntactic) = parse(tokens, file);
        diagnostics.extend(syntactic);
        programs.push(program);
    }

    if !diagnostics.is_empty() {
        return Err(CompileError::Parsing(diagnostics));
    }

    let (programs, semantic) = analyze(package, programs)?;

    if !semantic.is_empty() {
        return Err(CompileError::Analysis(semantic));
    }

    info!("package {}: {} program(s) checked", package, programs.len());

    Ok(programs)
}

pub fn compile_source(package: &str, name: &str, source: &str) -> Result<Vec<Program>, CompileError> {
    compile_sources(package, &[Source::new(name, source)])
}

pub fn compile_file(package: &str, path: &Path) -> Result<Vec<Program>, CompileError> {
    let source = Source::read(path)?;
    debug!("read {} byte(s) from {}", source.text.len(), source.name);

    compile_sources(package, &[source])
}
