use std::ops::Range;

use roxmltree::Node;

use crate::config::FontName;
use crate::docx::{WML_NS, is_wml, wml};
use crate::error::Error;
use crate::walker::Run;

/// Replace `range` of a part's XML text with `text`. An empty range inserts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Splice {
    pub range: Range<usize>,
    pub text: String,
}

impl Splice {
    fn insert(at: usize, text: String) -> Self {
        Splice {
            range: at..at,
            text,
        }
    }
}

/// Pending splices, grouped per part in the order parts were first touched.
#[derive(Debug, Default)]
pub struct Edits {
    parts: Vec<(String, Vec<Splice>)>,
}

impl Edits {
    fn push(&mut self, part: &str, splice: Splice) {
        match self.parts.iter_mut().find(|(name, _)| name == part) {
            Some((_, splices)) => splices.push(splice),
            None => self.parts.push((part.to_string(), vec![splice])),
        }
    }

    /// Total number of splices across all parts.
    pub(crate) fn len(&self) -> usize {
        self.parts.iter().map(|(_, s)| s.len()).sum()
    }

    pub fn into_parts(self) -> Vec<(String, Vec<Splice>)> {
        self.parts
    }
}

/// Apply non-overlapping splices to `source`.
pub fn apply_splices(part: &str, source: &str, mut splices: Vec<Splice>) -> Result<String, Error> {
    splices.sort_by_key(|s| s.range.start);
    let added: usize = splices.iter().map(|s| s.text.len()).sum();
    let mut out = String::with_capacity(source.len() + added);
    let mut cursor = 0;
    for splice in &splices {
        if splice.range.start < cursor || splice.range.end > source.len() {
            return Err(Error::MalformedRun {
                part: part.to_string(),
                offset: splice.range.start,
                reason: "overlapping or out-of-bounds edit",
            });
        }
        out.push_str(&source[cursor..splice.range.start]);
        out.push_str(&splice.text);
        cursor = splice.range.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Names for markup inserted into a part, using whatever prefix the
/// WordprocessingML namespace has in scope.
struct Vocabulary {
    prefix: Option<String>,
}

impl Vocabulary {
    fn in_scope(node: Node) -> Self {
        let prefix = node
            .lookup_prefix(WML_NS)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        Vocabulary { prefix }
    }

    fn name(&self, local: &str) -> String {
        format!("{}:{local}", self.prefix.as_deref().unwrap_or("w"))
    }

    /// Namespace declaration needed when no prefix was bound.
    fn declaration(&self) -> String {
        match self.prefix {
            Some(_) => String::new(),
            None => format!(" xmlns:w=\"{WML_NS}\""),
        }
    }
}

/// Byte index of the `>` closing the start tag that begins at `start`.
fn start_tag_end(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    if bytes.get(start) != Some(&b'<') {
        return None;
    }
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Byte index just past the element name of the start tag at `start`.
fn qname_end(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    if bytes.get(start) != Some(&b'<') {
        return None;
    }
    let len = bytes[start + 1..]
        .iter()
        .position(|&b| b.is_ascii_whitespace() || b == b'/' || b == b'>')?;
    (len > 0).then_some(start + 1 + len)
}

/// Splice that makes `markup` the first child of `element`, expanding a
/// self-closing tag when needed.
fn insert_first_child(src: &str, element: Node, markup: String) -> Option<Splice> {
    let start = element.range().start;
    let end = start_tag_end(src, start)?;
    if end > start && src.as_bytes()[end - 1] == b'/' {
        let qname = &src[start + 1..qname_end(src, start)?];
        return Some(Splice {
            range: end - 1..end + 1,
            text: format!(">{markup}</{qname}>"),
        });
    }
    Some(Splice::insert(end + 1, markup))
}

/// Span of an attribute value, without its quotes.
fn value_span(src: &str, attr: &roxmltree::Attribute) -> Option<Range<usize>> {
    let range = attr.range_value();
    let bytes = src.as_bytes();
    let quoted = |i: usize| matches!(bytes.get(i), Some(b'"' | b'\''));
    if range.start > 0 && quoted(range.start - 1) && quoted(range.end) {
        return Some(range);
    }
    if range.end > range.start + 1 && quoted(range.start) && quoted(range.end - 1) {
        return Some(range.start + 1..range.end - 1);
    }
    None
}

/// Record the splice that sets `w:eastAsia` on the run's `w:rFonts`,
/// creating `w:rPr` and `w:rFonts` when absent. Every other attribute and
/// property of the run stays byte-identical.
pub fn set_east_asian_font(run: &Run, font: &FontName, edits: &mut Edits) -> Result<(), Error> {
    let node = run.node;
    let malformed = |reason: &'static str| Error::MalformedRun {
        part: run.part.to_string(),
        offset: node.range().start,
        reason,
    };

    if !is_wml(node, "r") {
        return Err(malformed("not a w:r element"));
    }
    if !node.ancestors().skip(1).any(|a| is_wml(a, "p")) {
        return Err(malformed("run is not inside a paragraph"));
    }

    let src = node.document().input_text();
    let vocab = Vocabulary::in_scope(node);
    let value = escape_attr(font.as_str());
    let east_asia = vocab.name("eastAsia");

    let splice = match wml(node, "rPr") {
        None => {
            let markup = format!(
                "<{rpr}{decl}><{fonts} {east_asia}=\"{value}\"/></{rpr}>",
                rpr = vocab.name("rPr"),
                fonts = vocab.name("rFonts"),
                decl = vocab.declaration(),
            );
            insert_first_child(src, node, markup).ok_or_else(|| malformed("unterminated run tag"))?
        }
        Some(rpr) => match wml(rpr, "rFonts") {
            None => {
                let markup = format!(
                    "<{fonts}{decl} {east_asia}=\"{value}\"/>",
                    fonts = vocab.name("rFonts"),
                    decl = vocab.declaration(),
                );
                // w:rStyle must stay the first property.
                match wml(rpr, "rStyle") {
                    Some(style) => Splice::insert(style.range().end, markup),
                    None => insert_first_child(src, rpr, markup)
                        .ok_or_else(|| malformed("unterminated w:rPr tag"))?,
                }
            }
            Some(fonts) => {
                let existing = fonts
                    .attributes()
                    .find(|a| a.namespace() == Some(WML_NS) && a.name() == "eastAsia");
                match existing {
                    Some(attr) => Splice {
                        range: value_span(src, &attr)
                            .ok_or_else(|| malformed("unreadable w:eastAsia value"))?,
                        text: value,
                    },
                    None => {
                        let at = qname_end(src, fonts.range().start)
                            .ok_or_else(|| malformed("unreadable w:rFonts tag"))?;
                        let decl = vocab.declaration();
                        Splice::insert(at, format!("{decl} {east_asia}=\"{value}\""))
                    }
                }
            }
        },
    };

    edits.push(run.part, splice);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splices_apply_in_offset_order() {
        let src = "<a><b/></a>";
        let splices = vec![
            Splice::insert(7, "<c/>".to_string()),
            Splice {
                range: 1..2,
                text: "x".to_string(),
            },
            Splice::insert(3, "<d/>".to_string()),
        ];
        assert_eq!(apply_splices("p", src, splices).unwrap(), "<x><d/><b/><c/></a>");
    }

    #[test]
    fn overlapping_splices_are_rejected() {
        let splices = vec![
            Splice {
                range: 0..4,
                text: String::new(),
            },
            Splice {
                range: 2..3,
                text: String::new(),
            },
        ];
        assert!(matches!(
            apply_splices("p", "abcdef", splices),
            Err(Error::MalformedRun { .. })
        ));
    }

    #[test]
    fn tag_scanning_skips_quoted_brackets() {
        let src = r#"<w:r w:x="a>b"><w:t/></w:r>"#;
        assert_eq!(start_tag_end(src, 0), Some(14));
        assert_eq!(qname_end(src, 0), Some(4));
        assert_eq!(qname_end("<w:rPr/>", 0), Some(6));
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(escape_attr(r#"A&B "C" <D>'"#), "A&amp;B &quot;C&quot; &lt;D&gt;&apos;");
    }
}
