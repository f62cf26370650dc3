use crate::analyzers::types::{BairroTotals, Filter, RankedBairro, Summary};
use crate::dataset::Dataset;
use std::collections::BTreeMap;

/// Number of neighborhoods in the ranking.
pub const TOP_N: usize = 5;

/// Sums visits and unique patients per normalized neighborhood over the
/// records matching `filter`. Keys iterate in ascending name order.
pub fn group_by_bairro<'a>(
    dataset: &'a Dataset,
    filter: &Filter,
) -> BTreeMap<&'a str, BairroTotals> {
    let mut groups: BTreeMap<&str, BairroTotals> = BTreeMap::new();
    for record in dataset.records().iter().filter(|r| filter.matches(r)) {
        groups.entry(record.bairro.as_str()).or_default().add(record);
    }
    groups
}

/// Ranks neighborhoods by summed visits, descending, and keeps the first `limit`.
///
/// Equal visit totals keep ascending name order.
pub fn rank_bairros(dataset: &Dataset, filter: &Filter, limit: usize) -> Vec<RankedBairro> {
    let mut ranked: Vec<(&str, BairroTotals)> =
        group_by_bairro(dataset, filter).into_iter().collect();
    // stable: ties stay alphabetical
    ranked.sort_by(|a, b| b.1.visits.cmp(&a.1.visits));

    ranked
        .into_iter()
        .take(limit)
        .map(|(name, totals)| RankedBairro(name.to_string(), totals))
        .collect()
}

/// Top [`TOP_N`] neighborhoods by visits, optionally restricted to one year.
pub fn top_bairros(dataset: &Dataset, year: Option<i32>) -> Vec<RankedBairro> {
    rank_bairros(dataset, &Filter::new(year, None), TOP_N)
}

/// Computes overall totals, the visits-per-patient ratio and the top
/// neighborhoods, optionally restricted to one year.
pub fn summarize(dataset: &Dataset, year: Option<i32>) -> Summary {
    let filter = Filter::new(year, None);

    let mut totals = BairroTotals::default();
    for record in dataset.records().iter().filter(|r| filter.matches(r)) {
        totals.add(record);
    }

    let average_visits_per_patient = if totals.unique_patients > 0 {
        totals.visits as f64 / totals.unique_patients as f64
    } else {
        0.0
    };

    Summary {
        total_visits: totals.visits,
        total_unique_patients: totals.unique_patients,
        average_visits_per_patient,
        top_bairros: rank_bairros(dataset, &filter, TOP_N),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::VisitRecord;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            VisitRecord::new(2020, Some("Centro"), 100, 50),
            VisitRecord::new(2020, Some("Vl. Nova"), 40, 10),
            VisitRecord::new(2021, Some("Centro"), 60, 30),
            VisitRecord::new(2021, Some("Jd. Sul"), 70, 20),
            VisitRecord::new(2021, Some("Alto"), 10, 5),
            VisitRecord::new(2021, Some("Baixo"), 10, 5),
            VisitRecord::new(2021, Some("Morro"), 5, 1),
            VisitRecord::new(2021, Some("Vale"), 1, 1),
        ])
    }

    #[test]
    fn test_summarize_all_years() {
        let s = summarize(&dataset(), None);

        assert_eq!(s.total_visits, 296);
        assert_eq!(s.total_unique_patients, 122);
        assert!((s.average_visits_per_patient - 296.0 / 122.0).abs() < 1e-12);
        assert_eq!(
            s.top_bairros[0],
            RankedBairro(
                "CENTRO".into(),
                BairroTotals {
                    visits: 160,
                    unique_patients: 80
                }
            )
        );
    }

    #[test]
    fn test_summarize_year_filter() {
        let s = summarize(&dataset(), Some(2020));

        assert_eq!(s.total_visits, 140);
        assert_eq!(s.total_unique_patients, 60);
        assert_eq!(s.top_bairros.len(), 2);
        assert_eq!(s.top_bairros[1].0, "VILA NOVA");
    }

    #[test]
    fn test_summarize_unknown_year_is_zero() {
        let s = summarize(&dataset(), Some(1999));

        assert_eq!(s.total_visits, 0);
        assert_eq!(s.average_visits_per_patient, 0.0);
        assert!(s.top_bairros.is_empty());
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let ds = dataset();
        assert_eq!(summarize(&ds, Some(2021)), summarize(&ds, Some(2021)));
    }

    #[test]
    fn test_top_bairros_limited_and_descending() {
        let top = top_bairros(&dataset(), Some(2021));

        assert_eq!(top.len(), TOP_N);
        assert!(top.windows(2).all(|w| w[0].1.visits >= w[1].1.visits));
        let names: Vec<&str> = top.iter().map(|r| r.0.as_str()).collect();
        // ALTO and BAIXO tie on 10 visits
        assert_eq!(names, vec!["JARDIM SUL", "CENTRO", "ALTO", "BAIXO", "MORRO"]);
    }

    #[test]
    fn test_top_bairros_fewer_than_five() {
        let ds = Dataset::from_records(vec![VisitRecord::new(2020, Some("Centro"), 1, 1)]);
        assert_eq!(top_bairros(&ds, None).len(), 1);
    }
}
