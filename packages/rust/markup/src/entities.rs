//! Character and entity reference decoding.
//!
//! Standard references are decoded first with the HTML character reference
//! algorithm (named, legacy names without `;`, decimal and hex numeric), then
//! the GCIDE-specific diacritic entities. Anything that does not resolve is
//! left in the text as written.

/// GCIDE entities outside the HTML5 set, applied after standard decoding.
pub const CUSTOM_ENTITIES: &[(&str, &str)] = &[
    ("&ebreve_;", "\u{0115}"),
    ("&emacr;", "\u{0113}"),
    ("&ocirc;", "\u{00f4}"),
    // Unverified: the source glyph is an italic e, mapped to e-acute.
    ("&eitalic_;", "\u{00e9}"),
    ("&omacr;", "\u{014d}"),
    ("&ubreve_;", "\u{016d}"),
    ("&ibreve_;", "\u{012d}"),
    ("&abreve_;", "\u{0103}"),
];

/// Decode standard references, then the custom GCIDE table.
pub fn decode_entities(text: &str) -> String {
    let mut result = htmlize::unescape(text).into_owned();
    for (entity, replacement) in CUSTOM_ENTITIES {
        if result.contains(entity) {
            result = result.replace(entity, replacement);
        }
    }
    result
}
