use std::collections::HashSet;

use roxmltree::Node;

use crate::docx::{is_wml, wml};
use crate::error::Error;
use crate::model::{Document, HeaderFooterKind, Section};

/// Inline elements whose runs belong to the enclosing paragraph.
const RUN_WRAPPERS: &[&str] = &[
    "hyperlink",
    "ins",
    "moveTo",
    "smartTag",
    "customXml",
    "fldSimple",
    "sdt",
    "sdtContent",
    "dir",
    "bdo",
];

/// Where a paragraph was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Body,
    Table,
    HeaderFooter(HeaderFooterKind),
    TextBox,
    Note,
}

struct PartTree<'a> {
    name: &'a str,
    xml: roxmltree::Document<'a>,
}

impl<'a> PartTree<'a> {
    fn parse(doc: &'a Document, name: &'a str) -> Result<Self, Error> {
        let xml_content = doc.package.part_text(name)?;
        let xml = roxmltree::Document::parse(xml_content)?;
        Ok(PartTree { name, xml })
    }
}

/// Read-only parse of every text-bearing part of a [`Document`], each part
/// parsed once.
pub struct DocumentView<'a> {
    main: PartTree<'a>,
    others: Vec<PartTree<'a>>,
    sections: &'a [Section],
    note_parts: &'a [String],
}

impl<'a> DocumentView<'a> {
    pub fn parse(doc: &'a Document) -> Result<Self, Error> {
        let main = PartTree::parse(doc, &doc.main_part)?;
        let mut others: Vec<PartTree<'a>> = Vec::new();
        let header_footer_parts = doc
            .sections
            .iter()
            .flat_map(|s| s.parts().map(|(_, part)| part));
        let note_parts = doc.note_parts.iter().map(String::as_str);
        for name in header_footer_parts.chain(note_parts) {
            if name == main.name || others.iter().any(|t| t.name == name) {
                continue;
            }
            others.push(PartTree::parse(doc, name)?);
        }
        Ok(DocumentView {
            main,
            others,
            sections: &doc.sections,
            note_parts: &doc.note_parts,
        })
    }

    fn tree(&self, name: &str) -> Option<&PartTree<'a>> {
        self.others.iter().find(|t| t.name == name)
    }
}

pub struct Paragraph<'v, 'a> {
    node: Node<'v, 'a>,
    part: &'v str,
    origin: Origin,
}

impl<'v, 'a> Paragraph<'v, 'a> {
    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn part(&self) -> &'v str {
        self.part
    }

    /// Runs in document order, including those inside hyperlinks, insertions
    /// and inline content controls.
    pub fn runs(&self) -> Vec<Run<'v, 'a>> {
        let mut runs = Vec::new();
        collect_runs(self.node, self.part, &mut runs);
        runs
    }

    pub fn text(&self) -> String {
        self.runs().iter().map(|run| run.text()).collect()
    }
}

fn collect_runs<'v, 'a>(container: Node<'v, 'a>, part: &'v str, out: &mut Vec<Run<'v, 'a>>) {
    for child in container.children().filter(|n| n.is_element()) {
        if is_wml(child, "r") {
            out.push(Run { node: child, part });
        } else if RUN_WRAPPERS.iter().any(|w| is_wml(child, w)) {
            collect_runs(child, part, out);
        }
    }
}

pub struct Run<'v, 'a> {
    pub(crate) node: Node<'v, 'a>,
    pub(crate) part: &'v str,
}

impl Run<'_, '_> {
    pub fn text(&self) -> String {
        self.node
            .children()
            .filter(|n| is_wml(*n, "t"))
            .filter_map(|n| n.text())
            .collect()
    }
}

/// Block children of `container`, looking through block-level content
/// controls and custom XML wrappers.
fn blocks<'v, 'a>(container: Node<'v, 'a>) -> Vec<Node<'v, 'a>> {
    let mut out = Vec::new();
    collect_blocks(container, &mut out);
    out
}

fn collect_blocks<'v, 'a>(container: Node<'v, 'a>, out: &mut Vec<Node<'v, 'a>>) {
    for child in container.children().filter(|n| n.is_element()) {
        if is_wml(child, "sdt") {
            if let Some(content) = wml(child, "sdtContent") {
                collect_blocks(content, out);
            }
        } else if is_wml(child, "customXml") {
            collect_blocks(child, out);
        } else {
            out.push(child);
        }
    }
}

struct Walk<'v, 'a> {
    out: Vec<Paragraph<'v, 'a>>,
}

impl<'v, 'a> Walk<'v, 'a> {
    fn paragraphs(&mut self, container: Node<'v, 'a>, part: &'v str, origin: Origin) {
        for node in blocks(container).into_iter().filter(|n| is_wml(*n, "p")) {
            self.out.push(Paragraph { node, part, origin });
        }
    }

    fn tables(&mut self, container: Node<'v, 'a>, part: &'v str) {
        for table in blocks(container).into_iter().filter(|n| is_wml(*n, "tbl")) {
            self.table(table, part);
        }
    }

    /// Depth-first over rows and cells: a cell's paragraphs, then its nested tables.
    fn table(&mut self, table: Node<'v, 'a>, part: &'v str) {
        for row in blocks(table).into_iter().filter(|n| is_wml(*n, "tr")) {
            for cell in blocks(row).into_iter().filter(|n| is_wml(*n, "tc")) {
                self.paragraphs(cell, part, Origin::Table);
                self.tables(cell, part);
            }
        }
    }

    /// Paragraphs then tables, the order used for every block container.
    fn container(&mut self, container: Node<'v, 'a>, part: &'v str, origin: Origin) {
        self.paragraphs(container, part, origin);
        self.tables(container, part);
    }

    /// Every paragraph under any `w:txbxContent` below `root`, each once.
    fn text_boxes(&mut self, root: Node<'v, 'a>, part: &'v str) {
        let mut seen = HashSet::new();
        for txbx in root.descendants().filter(|n| is_wml(*n, "txbxContent")) {
            for node in txbx.descendants().filter(|n| is_wml(*n, "p")) {
                if seen.insert(node.id()) {
                    self.out.push(Paragraph {
                        node,
                        part,
                        origin: Origin::TextBox,
                    });
                }
            }
        }
    }
}

/// Every paragraph of the document in walk order: body paragraphs, body
/// tables, each section's header/footer slots, body text boxes, then
/// footnotes and endnotes.
pub fn all_text_paragraphs<'v, 'a>(view: &'v DocumentView<'a>) -> Vec<Paragraph<'v, 'a>> {
    let mut walk = Walk { out: Vec::new() };
    let main = &view.main;
    let body = wml(main.xml.root_element(), "body");

    if let Some(body) = body {
        walk.paragraphs(body, main.name, Origin::Body);
        walk.tables(body, main.name);
    }

    let mut visited: HashSet<&str> = HashSet::new();
    for section in view.sections {
        for (kind, part) in section.parts() {
            if !visited.insert(part) {
                continue;
            }
            let Some(tree) = view.tree(part) else {
                continue;
            };
            let root = tree.xml.root_element();
            walk.container(root, tree.name, Origin::HeaderFooter(kind));
            walk.text_boxes(root, tree.name);
            log::debug!("walked {kind:?} part {part}");
        }
    }

    if let Some(body) = body {
        walk.text_boxes(body, main.name);
    }

    for part in view.note_parts {
        let Some(tree) = view.tree(part) else {
            continue;
        };
        let root = tree.xml.root_element();
        for note in root
            .children()
            .filter(|n| is_wml(*n, "footnote") || is_wml(*n, "endnote"))
        {
            walk.container(note, tree.name, Origin::Note);
        }
        walk.text_boxes(root, tree.name);
        log::debug!("walked note part {part}");
    }

    walk.out
}
