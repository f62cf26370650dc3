//! Canonical display form for free-text neighborhood (bairro) names.

use unicode_normalization::UnicodeNormalization;

/// Returned for a missing or empty neighborhood name.
pub const NOT_INFORMED: &str = "NÃO INFORMADO";

/// Abbreviation expansions, applied in this order as whole-string replacements.
///
/// The order is significant: `"s."` is a suffix of `"sta."` and `"sto."`, so it
/// must run last, and each rule sees the output of the rules before it.
static ABBREVIATIONS: &[(&str, &str)] = &[
    ("vl.", "Vila"),
    ("jd.", "Jardim"),
    ("sta.", "Santa"),
    ("sto.", "Santo"),
    ("s.", "São"),
];

/// Normalizes a neighborhood name: trim, lowercase, expand abbreviations,
/// strip accents and uppercase.
///
/// `None` and the empty string map to [`NOT_INFORMED`].
pub fn normalize_bairro(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return NOT_INFORMED.to_string(),
    };

    let mut value = raw.trim().to_lowercase();
    for (abbr, full) in ABBREVIATIONS {
        value = value.replace(abbr, full);
    }

    strip_accents(&value).to_uppercase()
}

/// Decomposes to NFD and drops every code point outside ASCII, so combining
/// marks disappear and characters without a base letter are removed.
fn strip_accents(value: &str) -> String {
    value.nfd().filter(char::is_ascii).collect()
}
