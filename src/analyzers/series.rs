use crate::analyzers::types::{BairroSet, Filter};
use crate::dataset::Dataset;
use std::collections::BTreeMap;

/// Total visits per year, optionally restricted to a set of normalized
/// neighborhood names. Years serialize as string keys in ascending order.
pub fn visits_by_year(dataset: &Dataset, bairros: Option<&BairroSet>) -> BTreeMap<i32, u64> {
    let filter = Filter::new(None, bairros);

    let mut series = BTreeMap::new();
    for record in dataset.records().iter().filter(|r| filter.matches(r)) {
        *series.entry(record.year).or_insert(0) += record.visits;
    }
    series
}
