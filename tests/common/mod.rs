#![allow(dead_code)]

use docx_cjk_font::{Document, Package};

pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape" "#,
    r#"xmlns:v="urn:schemas-microsoft-com:vml""#,
);

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub fn run(text: &str) -> String {
    format!(r#"<w:r><w:t xml:space="preserve">{text}</w:t></w:r>"#)
}

pub fn para(runs: &[String]) -> String {
    format!("<w:p>{}</w:p>", runs.concat())
}

pub fn text_para(text: &str) -> String {
    para(&[run(text)])
}

pub fn cell(content: &str) -> String {
    format!("<w:tc><w:tcPr/>{content}</w:tc>")
}

pub fn table(rows: &[Vec<String>]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| format!("<w:tr>{}</w:tr>", cells.concat()))
        .collect();
    format!("<w:tbl><w:tblPr/>{rows}</w:tbl>")
}

/// A DrawingML text box anchored in a run, with the VML fallback copy Word writes.
pub fn text_box(content: &str) -> String {
    format!(
        concat!(
            "<w:r><mc:AlternateContent><mc:Choice Requires=\"wps\"><w:drawing><wp:anchor>",
            "<a:graphic><a:graphicData><wps:wsp><wps:txbx><w:txbxContent>{c}</w:txbxContent>",
            "</wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:anchor></w:drawing></mc:Choice>",
            "<mc:Fallback><w:pict><v:shape><v:textbox><w:txbxContent>{c}</w:txbxContent>",
            "</v:textbox></v:shape></w:pict></mc:Fallback></mc:AlternateContent></w:r>",
        ),
        c = content
    )
}

/// A VML-only text box anchored in a run.
pub fn vml_text_box(content: &str) -> String {
    format!(
        "<w:r><w:pict><v:shape><v:textbox><w:txbxContent>{content}</w:txbxContent></v:textbox></v:shape></w:pict></w:r>"
    )
}

pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {NAMESPACES}><w:body>{body}</w:body></w:document>"#
    )
}

pub fn header_xml(content: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:hdr {NAMESPACES}>{content}</w:hdr>"#)
}

pub fn footer_xml(content: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:ftr {NAMESPACES}>{content}</w:ftr>"#)
}

pub fn footnotes_xml(content: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:footnotes {NAMESPACES}>{content}</w:footnotes>"#)
}

/// `<w:sectPr>` with `(element, type, rId)` references.
pub fn sect_pr(refs: &[(&str, &str, &str)]) -> String {
    let refs: String = refs
        .iter()
        .map(|(element, kind, id)| format!(r#"<w:{element} w:type="{kind}" r:id="{id}"/>"#))
        .collect();
    format!(r#"<w:sectPr>{refs}<w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#)
}

pub struct DocxBuilder {
    body: String,
    parts: Vec<(String, String)>,
    rels: Vec<(String, String, String)>,
}

impl DocxBuilder {
    pub fn new(body: &str) -> Self {
        DocxBuilder {
            body: body.to_string(),
            parts: Vec::new(),
            rels: Vec::new(),
        }
    }

    /// Add `word/<file>` related to the main part as `id` with relationship type `kind`.
    pub fn part(mut self, id: &str, kind: &str, file: &str, xml: String) -> Self {
        self.rels
            .push((id.to_string(), format!("{REL_BASE}/{kind}"), file.to_string()));
        self.parts.push((format!("word/{file}"), xml));
        self
    }

    pub fn header(self, id: &str, file: &str, content: &str) -> Self {
        self.part(id, "header", file, header_xml(content))
    }

    pub fn footer(self, id: &str, file: &str, content: &str) -> Self {
        self.part(id, "footer", file, footer_xml(content))
    }

    pub fn package(self) -> Package {
        let root_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="word/document.xml"/></Relationships>"#
        );
        let doc_rels: String = self
            .rels
            .iter()
            .map(|(id, kind, target)| {
                format!(r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#)
            })
            .collect();
        let doc_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{doc_rels}</Relationships>"#
        );

        let mut entries: Vec<(String, Vec<u8>)> = vec![
            ("_rels/.rels".to_string(), root_rels.into_bytes()),
            ("word/document.xml".to_string(), document_xml(&self.body).into_bytes()),
            ("word/_rels/document.xml.rels".to_string(), doc_rels.into_bytes()),
        ];
        entries.extend(self.parts.into_iter().map(|(n, x)| (n, x.into_bytes())));
        Package::from_entries(entries)
    }

    pub fn build(self) -> Document {
        Document::from_package(self.package()).expect("test package should load")
    }
}

pub fn doc_with_body(body: &str) -> Document {
    DocxBuilder::new(body).build()
}

pub fn part_text(doc: &Document, part: &str) -> String {
    doc.package().part_text(part).expect("part exists").to_string()
}

/// `(run text, w:eastAsia)` for every run of `part` in document order.
pub fn run_fonts(doc: &Document, part: &str) -> Vec<(String, Option<String>)> {
    let xml_content = part_text(doc, part);
    let xml = roxmltree::Document::parse(&xml_content).expect("part stays well-formed");
    xml.descendants()
        .filter(|n| n.tag_name().name() == "r" && n.tag_name().namespace() == Some(WML_NS))
        .map(|r| {
            let text: String = r
                .children()
                .filter(|n| n.tag_name().name() == "t")
                .filter_map(|n| n.text())
                .collect();
            let east_asia = r
                .children()
                .find(|n| n.tag_name().name() == "rPr")
                .and_then(|rpr| rpr.children().find(|n| n.tag_name().name() == "rFonts"))
                .and_then(|f| f.attribute((WML_NS, "eastAsia")))
                .map(str::to_string);
            (text, east_asia)
        })
        .collect()
}

/// East Asian font of the runs with the given text.
pub fn font_of(doc: &Document, part: &str, text: &str) -> Vec<Option<String>> {
    run_fonts(doc, part)
        .into_iter()
        .filter(|(t, _)| t == text)
        .map(|(_, f)| f)
        .collect()
}
