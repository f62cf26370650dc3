//! In-memory visit table, loaded once from CSV at startup.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::normalize::normalize_bairro;
use crate::parser::{is_missing, parse_count, parse_year};

/// Required columns, each with the header names it is accepted under.
const YEAR_COLUMN: &[&str] = &["Ano", "year"];
const BAIRRO_COLUMN: &[&str] = &["Bairro_oficial", "official-neighborhood-name"];
const VISITS_COLUMN: &[&str] = &["Atendimentos", "visits"];
const PATIENTS_COLUMN: &[&str] = &["Pacientes_unicos", "unique-patients"];

/// One row of the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub year: i32,
    pub raw_bairro: Option<String>,
    pub bairro: String,
    pub visits: u64,
    pub unique_patients: u64,
}

impl VisitRecord {
    /// Builds a record, deriving the normalized neighborhood from `raw_bairro`.
    pub fn new(year: i32, raw_bairro: Option<&str>, visits: u64, unique_patients: u64) -> Self {
        Self {
            year,
            raw_bairro: raw_bairro.map(str::to_string),
            bairro: normalize_bairro(raw_bairro),
            visits,
            unique_patients,
        }
    }
}

/// Read-only visit table with its distinct years and neighborhoods.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<VisitRecord>,
    years: Vec<i32>,
    bairros: Vec<String>,
}

struct ColumnIndex {
    year: usize,
    bairro: usize,
    visits: usize,
    unique_patients: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |aliases: &[&str]| names.iter().position(|n| aliases.contains(n));

        let (year, bairro, visits, unique_patients) = (
            find(YEAR_COLUMN),
            find(BAIRRO_COLUMN),
            find(VISITS_COLUMN),
            find(PATIENTS_COLUMN),
        );

        let missing: Vec<&str> = [
            (year, YEAR_COLUMN[0]),
            (bairro, BAIRRO_COLUMN[0]),
            (visits, VISITS_COLUMN[0]),
            (unique_patients, PATIENTS_COLUMN[0]),
        ]
        .iter()
        .filter(|(idx, _)| idx.is_none())
        .map(|(_, name)| *name)
        .collect();

        match (year, bairro, visits, unique_patients) {
            (Some(year), Some(bairro), Some(visits), Some(unique_patients)) => Ok(Self {
                year,
                bairro,
                visits,
                unique_patients,
            }),
            _ => bail!("Missing columns in CSV: {}", missing.join(", ")),
        }
    }
}

impl Dataset {
    /// Loads the table from the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist, cannot be parsed as CSV, or lacks one
    /// of the required columns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("CSV not found at {}", path.display());
        }
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Loads the table from any CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let columns = ColumnIndex::from_headers(rdr.headers()?)?;

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for (line, result) in rdr.records().enumerate() {
            let row = result?;
            let cell = |idx: usize| row.get(idx).unwrap_or("");

            let Some(year) = parse_year(cell(columns.year)) else {
                debug!(
                    line = line + 2,
                    value = cell(columns.year),
                    "Dropping row without a valid year"
                );
                dropped += 1;
                continue;
            };

            let raw_bairro = cell(columns.bairro);
            let raw_bairro = (!is_missing(raw_bairro)).then_some(raw_bairro);

            records.push(VisitRecord::new(
                year,
                raw_bairro,
                parse_count(cell(columns.visits)),
                parse_count(cell(columns.unique_patients)),
            ));
        }

        let dataset = Self::from_records(records);
        info!(
            rows = dataset.records.len(),
            dropped,
            years = dataset.years.len(),
            bairros = dataset.bairros.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Builds the table from already-parsed records, deriving the sorted
    /// distinct years and neighborhoods.
    pub fn from_records(records: Vec<VisitRecord>) -> Self {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let bairros: BTreeSet<&str> = records.iter().map(|r| r.bairro.as_str()).collect();
        let bairros = bairros.into_iter().map(str::to_string).collect();

        Self {
            years: years.into_iter().collect(),
            bairros,
            records,
        }
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Distinct normalized neighborhoods, ascending.
    pub fn bairros(&self) -> &[String] {
        &self.bairros
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Ano,Bairro_oficial,Atendimentos,Pacientes_unicos,Extra
2021,Vl. Centro,80,40,x
2020,Vl. Centro,100,50,y
2020,Jd. América,30,,z
abc,Centro,10,5,w
2021,,5,2,v
";

    #[test]
    fn test_from_reader_parses_and_normalizes() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(ds.records().len(), 4);
        assert_eq!(ds.records()[0].bairro, "VILA CENTRO");
        assert_eq!(ds.records()[0].raw_bairro.as_deref(), Some("Vl. Centro"));
        assert_eq!(ds.records()[2].bairro, "JARDIM AMERICA");
        assert_eq!(ds.records()[2].unique_patients, 0);
        assert_eq!(ds.records()[3].bairro, "NÃO INFORMADO");
    }

    #[test]
    fn test_derived_indices_sorted_distinct() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(ds.years(), &[2020, 2021]);
        assert_eq!(
            ds.bairros(),
            &["JARDIM AMERICA", "NÃO INFORMADO", "VILA CENTRO"]
        );
    }

    #[test]
    fn test_missing_markers_become_not_informed() {
        let csv = "\
Ano,Bairro_oficial,Atendimentos,Pacientes_unicos
2020,NA,1,1
2020,null,1,1
2020,N/A,1,1
2020,   ,1,1
2020,None,1,1
";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let names: Vec<&str> = ds.records().iter().map(|r| r.bairro.as_str()).collect();

        assert_eq!(
            names,
            vec!["NÃO INFORMADO", "NÃO INFORMADO", "NÃO INFORMADO", "", "NÃO INFORMADO"]
        );
        assert_eq!(ds.records()[0].raw_bairro, None);
        assert_eq!(ds.records()[3].raw_bairro.as_deref(), Some("   "));
    }

    #[test]
    fn test_english_headers_accepted() {
        let csv = "year,official-neighborhood-name,visits,unique-patients\n2019,Centro,3,1\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(ds.records().len(), 1);
        assert_eq!(ds.records()[0].visits, 3);
    }

    #[test]
    fn test_missing_columns_fail() {
        let csv = "Ano,Bairro_oficial\n2020,Centro\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("Atendimentos"));
        assert!(msg.contains("Pacientes_unicos"));
        assert!(!msg.contains("Ano,"));
    }

    #[test]
    fn test_short_rows_tolerated() {
        let csv = "Ano,Bairro_oficial,Atendimentos,Pacientes_unicos\n2020,Centro\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(ds.records()[0].visits, 0);
        assert_eq!(ds.records()[0].unique_patients, 0);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = Dataset::load("/definitely/not/here.csv").unwrap_err();
        assert!(err.to_string().contains("CSV not found"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let ds = Dataset::load(file.path()).unwrap();
        assert_eq!(ds.records().len(), 4);
    }
}
