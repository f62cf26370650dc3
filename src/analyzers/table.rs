use crate::analyzers::types::{BairroSet, BairroTotals, DeltaRow, Filter};
use crate::analyzers::utility::{NO_BASE, NO_DELTA, format_percent, pct};
use crate::dataset::Dataset;
use std::collections::BTreeMap;

/// Builds the year-over-year table: one row per (year, neighborhood) with the
/// visit delta against the neighborhood's previous year in the view and its
/// share of that year's visits.
///
/// Rows are ordered newest year first, then by visits descending; remaining
/// ties fall back to ascending neighborhood name.
pub fn build_table(
    dataset: &Dataset,
    year: Option<i32>,
    bairros: Option<&BairroSet>,
) -> Vec<DeltaRow> {
    let filter = Filter::new(year, bairros);

    let mut by_bairro: BTreeMap<&str, BTreeMap<i32, BairroTotals>> = BTreeMap::new();
    let mut totals_by_year: BTreeMap<i32, u64> = BTreeMap::new();

    for record in dataset.records().iter().filter(|r| filter.matches(r)) {
        by_bairro
            .entry(record.bairro.as_str())
            .or_default()
            .entry(record.year)
            .or_default()
            .add(record);
        *totals_by_year.entry(record.year).or_insert(0) += record.visits;
    }

    let mut rows = Vec::new();

    for (bairro, series) in by_bairro {
        let mut prev_visits: Option<u64> = None;

        for (year, totals) in series {
            let (delta_visits, delta_visits_percent) = match prev_visits {
                None => (NO_DELTA.to_string(), NO_BASE.to_string()),
                Some(prev) => {
                    let delta = totals.visits as i64 - prev as i64;
                    let percent = pct(delta as f64, prev as f64)
                        .map(format_percent)
                        .unwrap_or_else(|| NO_BASE.to_string());
                    (delta.to_string(), percent)
                }
            };

            let year_total = totals_by_year.get(&year).copied().unwrap_or(0);
            let participation_percent = format_percent(
                pct(totals.visits as f64, year_total as f64).unwrap_or(0.0),
            );

            rows.push(DeltaRow {
                year,
                bairro: bairro.to_string(),
                visits: totals.visits,
                unique_patients: totals.unique_patients,
                delta_visits,
                delta_visits_percent,
                participation_percent,
            });

            prev_visits = Some(totals.visits);
        }
    }

    rows.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.visits.cmp(&a.visits))
            .then_with(|| a.bairro.cmp(&b.bairro))
    });
    rows
}
