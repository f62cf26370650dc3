use crate::analyzers::types::BairroSet;
use crate::normalize::normalize_bairro;

/// Placeholder for a delta without a usable previous value.
pub const NO_BASE: &str = "NA (sem base)";

/// Placeholder for the delta of a neighborhood's first year.
pub const NO_DELTA: &str = "-";

/// Formats a percentage with two decimals and a trailing `%`, e.g. `"12.34%"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Returns `part / total * 100`, or `None` when `total` is zero.
pub fn pct(part: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        None
    } else {
        Some(part / total * 100.0)
    }
}

/// Parses a comma-separated `bairros` parameter into normalized names.
///
/// An absent or empty parameter means no filter. Blank entries are skipped;
/// if every entry is blank the resulting set is empty and matches nothing.
pub fn parse_bairros(param: Option<&str>) -> Option<BairroSet> {
    let param = param.filter(|p| !p.is_empty())?;
    Some(
        param
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| normalize_bairro(Some(name)))
            .collect(),
    )
}
