//! Typst rendering engine.
//!
//! Writes Typst source to a temporary directory, invokes the compiler, and
//! reads back the output PDF.

use std::fs;
use std::process::Command;
use tempfile::{tempdir, TempDir};

use super::RenderError;

const DEFAULT_TYPST_BINARY: &str = "typst";
const SOURCE_FILE: &str = "report.typ";
const OUTPUT_FILE: &str = "report.pdf";

/// Engine for compiling Typst sources to PDF with the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: String,
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TYPST_BINARY)
    }
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Compile a complete Typst source string and return the PDF bytes.
    pub fn compile(&self, typst_source: &str) -> Result<Vec<u8>, RenderError> {
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        let typ_path = temp_dir.path().join(SOURCE_FILE);

        fs::write(&typ_path, typst_source).map_err(RenderError::WriteTypst)?;

        self.compile_in(&temp_dir)
    }

    fn compile_in(&self, temp_dir: &TempDir) -> Result<Vec<u8>, RenderError> {
        let typ_path = temp_dir.path().join(SOURCE_FILE);
        let output_path = temp_dir.path().join(OUTPUT_FILE);

        let output = Command::new(&self.binary)
            .arg("compile")
            .arg(&typ_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .output()
            .map_err(RenderError::TypstIo)?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!("typst compile failed ({}): {}", code, stderr);
            return Err(RenderError::TypstExit { code, stderr });
        }

        fs::read(&output_path).map_err(RenderError::ReadPdf)
    }
}
