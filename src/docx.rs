use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;
use crate::model::{Document, HeaderFooterKind, Section};
use crate::package::Package;

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const DEFAULT_MAIN_PART: &str = "word/document.xml";

pub(crate) fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WML_NS)
}

pub(crate) fn wml<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children().find(|n| is_wml(*n, name))
}

struct Relationship {
    rel_type: String,
    target: String,
}

/// `word/document.xml` -> `word/_rels/document.xml.rels`
fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(source_part: &str, target: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let relative = match target.strip_prefix('/') {
        Some(absolute) => absolute,
        None => {
            if let Some((dir, _)) = source_part.rsplit_once('/') {
                segments.extend(dir.split('/').filter(|s| !s.is_empty()));
            }
            target
        }
    };
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Internal relationships of `source_part`, keyed by id. A part without a
/// `.rels` companion simply has none.
fn relationships(
    package: &Package,
    source_part: &str,
) -> Result<HashMap<String, Relationship>, Error> {
    let mut rels = HashMap::new();
    let path = rels_path(source_part);
    if !package.contains(&path) {
        return Ok(rels);
    }
    let xml_content = package.part_text(&path)?;
    let xml = roxmltree::Document::parse(xml_content)?;

    for node in xml.root_element().children() {
        if node.tag_name().name() != "Relationship"
            || node.tag_name().namespace() != Some(PKG_REL_NS)
        {
            continue;
        }
        if node.attribute("TargetMode") == Some("External") {
            continue;
        }
        let (Some(id), Some(rel_type), Some(target)) = (
            node.attribute("Id"),
            node.attribute("Type"),
            node.attribute("Target"),
        ) else {
            continue;
        };
        rels.insert(
            id.to_string(),
            Relationship {
                rel_type: rel_type.to_string(),
                target: resolve_target(source_part, target),
            },
        );
    }
    Ok(rels)
}

fn find_main_part(package: &Package) -> Result<String, Error> {
    let root_rels = relationships(package, "")?;
    let mut office: Vec<&Relationship> = root_rels
        .values()
        .filter(|r| r.rel_type.ends_with("/officeDocument"))
        .collect();
    office.sort_by(|a, b| a.target.cmp(&b.target));
    let main = office
        .first()
        .map(|r| r.target.clone())
        .filter(|target| package.contains(target))
        .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());
    if !package.contains(&main) {
        return Err(Error::InvalidDocx(format!("missing main document part {main}")));
    }
    Ok(main)
}

fn parse_sections(
    body: roxmltree::Node,
    rels: &HashMap<String, Relationship>,
    main_part: &str,
) -> Vec<Section> {
    let mut sections = Vec::new();

    for sect in body.descendants().filter(|n| is_wml(*n, "sectPr")) {
        let attached = sect
            .parent_element()
            .is_some_and(|p| is_wml(p, "pPr") || is_wml(p, "body"));
        if !attached {
            continue;
        }

        let mut section = Section::default();
        for reference in sect.children().filter(|n| n.is_element()) {
            if reference.tag_name().namespace() != Some(WML_NS) {
                continue;
            }
            let Some(kind) = HeaderFooterKind::from_reference(
                reference.tag_name().name(),
                reference.attribute((WML_NS, "type")),
            ) else {
                continue;
            };
            let Some(id) = reference.attribute((REL_NS, "id")) else {
                continue;
            };
            match rels.get(id) {
                Some(rel) => section.set_slot(kind, rel.target.clone()),
                None => log::warn!("{main_part}: {kind:?} references unknown relationship {id}"),
            }
        }
        sections.push(section);
    }
    sections
}

pub(crate) fn load(package: Package) -> Result<Document, Error> {
    let main_part = find_main_part(&package)?;
    let rels = relationships(&package, &main_part)?;

    let sections = {
        let xml_content = package.part_text(&main_part)?;
        let xml = roxmltree::Document::parse(xml_content)?;
        let body = wml(xml.root_element(), "body")
            .ok_or_else(|| Error::InvalidDocx("missing w:body".into()))?;
        parse_sections(body, &rels, &main_part)
    };

    let mut note_parts = Vec::new();
    for suffix in ["/footnotes", "/endnotes"] {
        let mut targets: Vec<&str> = rels
            .values()
            .filter(|r| r.rel_type.ends_with(suffix))
            .map(|r| r.target.as_str())
            .collect();
        targets.sort_unstable();
        for target in targets {
            if package.contains(target) {
                note_parts.push(target.to_string());
            } else {
                log::warn!("{main_part}: note part {target} is missing from the package");
            }
        }
    }

    for section in &sections {
        for (kind, part) in section.parts() {
            if !package.contains(part) {
                return Err(Error::InvalidDocx(format!("{kind:?} part {part} is missing")));
            }
        }
    }

    log::debug!(
        "{main_part}: {} section(s), {} note part(s)",
        sections.len(),
        note_parts.len()
    );

    Ok(Document {
        package,
        main_part,
        sections,
        note_parts,
    })
}

impl Document {
    pub fn open(path: &Path) -> Result<Self, Error> {
        load(Package::open(path)?)
    }

    pub fn from_package(package: Package) -> Result<Self, Error> {
        load(package)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        self.package.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rels_path_for_nested_and_root_parts() {
        assert_eq!(rels_path("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_path(""), "_rels/.rels");
    }

    #[test]
    fn targets_resolve_against_source_directory() {
        assert_eq!(resolve_target("word/document.xml", "header1.xml"), "word/header1.xml");
        assert_eq!(resolve_target("word/document.xml", "/word/footer2.xml"), "word/footer2.xml");
        assert_eq!(resolve_target("word/document.xml", "../custom/h.xml"), "custom/h.xml");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word/document.xml", "./parts/f.xml"), "word/parts/f.xml");
    }
}
