//! Data types produced by the aggregation pipeline.
//!
//! Serialized field names follow the dashboard front-end's wire format.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::dataset::VisitRecord;

/// Set of normalized neighborhood names to restrict a view to.
pub type BairroSet = BTreeSet<String>;

/// Row selection applied before any grouping.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filter<'a> {
    pub year: Option<i32>,
    pub bairros: Option<&'a BairroSet>,
}

impl<'a> Filter<'a> {
    pub fn new(year: Option<i32>, bairros: Option<&'a BairroSet>) -> Self {
        Self { year, bairros }
    }

    pub fn matches(&self, record: &VisitRecord) -> bool {
        self.year.is_none_or(|y| record.year == y)
            && self.bairros.is_none_or(|set| set.contains(&record.bairro))
    }
}

/// Summed visits (`at`) and unique patients (`pu`) for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BairroTotals {
    #[serde(rename = "at")]
    pub visits: u64,
    #[serde(rename = "pu")]
    pub unique_patients: u64,
}

impl BairroTotals {
    pub fn add(&mut self, record: &VisitRecord) {
        self.visits += record.visits;
        self.unique_patients += record.unique_patients;
    }
}

/// A neighborhood and its totals, serialized as `[name, {"at": .., "pu": ..}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedBairro(pub String, pub BairroTotals);

/// Overall totals for a (possibly year-filtered) view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    #[serde(rename = "atTotal")]
    pub total_visits: u64,
    #[serde(rename = "puTotal")]
    pub total_unique_patients: u64,
    #[serde(rename = "mediaAtPorPU")]
    pub average_visits_per_patient: f64,
    #[serde(rename = "top5Bairros")]
    pub top_bairros: Vec<RankedBairro>,
}

/// One (year, neighborhood) row of the year-over-year table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaRow {
    #[serde(rename = "ano")]
    pub year: i32,
    pub bairro: String,
    #[serde(rename = "atendimentos")]
    pub visits: u64,
    #[serde(rename = "pacientes_unicos")]
    pub unique_patients: u64,
    /// `"-"` for the first year of a neighborhood's series.
    #[serde(rename = "deltaAt")]
    pub delta_visits: String,
    #[serde(rename = "deltaAtPercent")]
    pub delta_visits_percent: String,
    /// Share of the year's visits across all neighborhoods in the view.
    #[serde(rename = "participacao")]
    pub participation_percent: String,
}
