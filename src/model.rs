use crate::package::Package;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderFooterKind {
    Header,
    FirstPageHeader,
    EvenPageHeader,
    Footer,
    FirstPageFooter,
    EvenPageFooter,
}

impl HeaderFooterKind {
    /// Walk order for the slots of one section.
    pub const ALL: [HeaderFooterKind; 6] = [
        HeaderFooterKind::Header,
        HeaderFooterKind::FirstPageHeader,
        HeaderFooterKind::EvenPageHeader,
        HeaderFooterKind::Footer,
        HeaderFooterKind::FirstPageFooter,
        HeaderFooterKind::EvenPageFooter,
    ];

    /// Maps a `w:headerReference`/`w:footerReference` to its slot.
    /// A missing `w:type` means `default`.
    pub fn from_reference(element: &str, ref_type: Option<&str>) -> Option<Self> {
        let kind = match (element, ref_type.unwrap_or("default")) {
            ("headerReference", "default") => HeaderFooterKind::Header,
            ("headerReference", "first") => HeaderFooterKind::FirstPageHeader,
            ("headerReference", "even") => HeaderFooterKind::EvenPageHeader,
            ("footerReference", "default") => HeaderFooterKind::Footer,
            ("footerReference", "first") => HeaderFooterKind::FirstPageFooter,
            ("footerReference", "even") => HeaderFooterKind::EvenPageFooter,
            _ => return None,
        };
        Some(kind)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Header/footer bundle of one `w:sectPr`. Slots hold package part names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    slots: [Option<String>; 6],
}

impl Section {
    pub fn slot(&self, kind: HeaderFooterKind) -> Option<&str> {
        self.slots[kind.index()].as_deref()
    }

    pub fn set_slot(&mut self, kind: HeaderFooterKind, part: String) {
        self.slots[kind.index()] = Some(part);
    }

    /// Present slots in walk order.
    pub fn parts(&self) -> impl Iterator<Item = (HeaderFooterKind, &str)> {
        HeaderFooterKind::ALL
            .into_iter()
            .filter_map(|kind| self.slot(kind).map(|part| (kind, part)))
    }
}

/// A loaded DOCX: the package plus the locations of every part that can hold text.
pub struct Document {
    pub(crate) package: Package,
    pub(crate) main_part: String,
    pub(crate) sections: Vec<Section>,
    pub(crate) note_parts: Vec<String>,
}

impl Document {
    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Footnote and endnote parts, in that order.
    pub fn note_parts(&self) -> &[String] {
        &self.note_parts
    }

    pub fn into_package(self) -> Package {
        self.package
    }
}
