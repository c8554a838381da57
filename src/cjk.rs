/// Inclusive code point ranges treated as East Asian script.
const CJK_RANGES: &[(u32, u32)] = &[
    (0x3000, 0x303F),   // CJK Symbols and Punctuation
    (0x3400, 0x4DBF),   // Extension A
    (0x4E00, 0x9FFF),   // Unified Ideographs
    (0xF900, 0xFAFF),   // Compatibility Ideographs
    (0xFE30, 0xFE4F),   // Compatibility Forms
    (0xFF00, 0xFFEF),   // Halfwidth and Fullwidth Forms
    (0x20000, 0x2A6DF), // Extension B
    (0x2A700, 0x2B73F), // Extension C
    (0x2B740, 0x2B81F), // Extension D
    (0x2B820, 0x2CEAF), // Extension E
    (0x2CEB0, 0x2EBEF), // Extension F
    (0x2F800, 0x2FA1F), // Compatibility Supplement
];

pub fn is_cjk_char(c: char) -> bool {
    let code = c as u32;
    CJK_RANGES
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&code))
}

/// True when at least one character of `text` falls in a CJK range.
///
/// Scans `char`s, so supplementary-plane ideographs are tested as whole
/// code points.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk_char)
}
