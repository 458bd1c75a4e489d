use std::io::Write;

use serde::Serialize;

use crate::ast::ast::Program;

use super::compiler::{CodeGenerator, CodegenError};

#[derive(Serialize)]
struct Document<'a> {
    module: &'a str,
    programs: &'a [Program],
}

/// Writes the checked programs, tokens and inferred types included, as one
/// pretty-printed JSON document.
pub struct JsonGenerator {
    module: String,
}

impl JsonGenerator {
    pub fn new(module: &str) -> Self {
        JsonGenerator {
            module: module.to_string(),
        }
    }
}

impl CodeGenerator for JsonGenerator {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&mut self, programs: &[Program], sink: &mut dyn Write) -> Result<(), CodegenError> {
        let document = Document {
            module: &self.module,
            programs,
        };

        serde_json::to_writer_pretty(&mut *sink, &document)?;
        writeln!(sink)?;
        Ok(())
    }
}
