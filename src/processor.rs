use crate::cjk::contains_cjk;
use crate::config::FontName;
use crate::error::Error;
use crate::model::Document;
use crate::mutator::{Edits, apply_splices, set_east_asian_font};
use crate::walker::{DocumentView, all_text_paragraphs};

/// Validate `font_name`, then set it unchanged as the East Asian font of
/// every CJK-bearing run. Returns the number of runs modified.
pub fn process(doc: &mut Document, font_name: &str) -> Result<usize, Error> {
    let font = FontName::new(font_name)?;
    process_with(doc, &font)
}

/// All edits are collected before any part is rewritten, so on error the
/// document is left exactly as it was.
pub fn process_with(doc: &mut Document, font: &FontName) -> Result<usize, Error> {
    let (modified, edits) = collect_edits(doc, font)?;

    let mut rewritten = Vec::new();
    for (part, splices) in edits.into_parts() {
        let source = doc.package.part_text(&part)?;
        let count = splices.len();
        let text = apply_splices(&part, source, splices)?;
        log::debug!("{part}: {count} run(s) updated");
        rewritten.push((part, text));
    }
    for (part, text) in rewritten {
        doc.package.set_part(&part, text.into_bytes());
    }

    log::info!("set East Asian font {font} on {modified} run(s)");
    Ok(modified)
}

fn collect_edits(doc: &Document, font: &FontName) -> Result<(usize, Edits), Error> {
    let view = DocumentView::parse(doc)?;
    let mut edits = Edits::default();
    let mut modified = 0;

    for paragraph in all_text_paragraphs(&view) {
        for run in paragraph.runs() {
            let text = run.text();
            if text.is_empty() || !contains_cjk(&text) {
                continue;
            }
            set_east_asian_font(&run, font, &mut edits)?;
            modified += 1;
        }
    }
    debug_assert_eq!(edits.len(), modified, "one splice per modified run");
    Ok((modified, edits))
}
