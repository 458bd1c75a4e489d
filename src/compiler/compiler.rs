//! The code generation boundary.
//!
//! A backend receives the checked programs of one package and writes its
//! output to a sink. Backends are looked up by name with [`backend_for`].

use std::io::{self, Write};

use thiserror::Error;

use crate::ast::ast::Program;

use super::{json::JsonGenerator, tree::TreeGenerator};

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("{construct} is not supported by the {backend} backend")]
    Unsupported {
        backend: &'static str,
        construct: String,
    },
    #[error("unknown backend {id:?}, available: {}", available_backends().join(", "))]
    UnknownBackend { id: String },
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize the tree: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("llvm: {0}")]
    Llvm(String),
}

/// Turns checked programs into some output.
pub trait CodeGenerator {
    /// The name the backend is registered under.
    fn name(&self) -> &'static str;

    fn generate(&mut self, programs: &[Program], sink: &mut dyn Write) -> Result<(), CodegenError>;

    fn generate_to_string(&mut self, programs: &[Program]) -> Result<String, CodegenError> {
        let mut buffer = vec![];
        self.generate(programs, &mut buffer)?;

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

pub fn available_backends() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut backends = vec!["tree", "json"];

    #[cfg(feature = "llvm")]
    backends.push("llvm");

    backends
}

/// Creates the backend registered as `id`. `module` names the output unit.
pub fn backend_for(id: &str, module: &str) -> Result<Box<dyn CodeGenerator>, CodegenError> {
    match id {
        "tree" => Ok(Box::new(TreeGenerator::new(module))),
        "json" => Ok(Box::new(JsonGenerator::new(module))),
        #[cfg(feature = "llvm")]
        "llvm" => Ok(Box::new(super::llvm::LlvmGenerator::new(module))),
        other => Err(CodegenError::UnknownBackend {
            id: other.to_string(),
        }),
    }
}
