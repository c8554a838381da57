mod cjk;
mod config;
mod docx;
mod error;
mod model;
pub mod mutator;
mod package;
mod processor;
pub mod walker;

pub use cjk::{contains_cjk, is_cjk_char};
pub use config::{DEFAULT_FONT, FONT_ENV_VAR, FontName};
pub use error::Error;
pub use model::{Document, HeaderFooterKind, Section};
pub use package::Package;
pub use processor::{process, process_with};

use std::path::Path;

pub fn convert_file(input: &Path, output: &Path, font: &FontName) -> Result<usize, Error> {
    let mut doc = Document::open(input)?;
    let modified = process_with(&mut doc, font)?;
    doc.save(output)?;
    Ok(modified)
}
