//! Record → design matrix encoding.
//!
//! Column layout (fixed):
//!
//! 1. the numeric attributes, in `NumericAttributes::NAMES` order
//! 2. one indicator column per observed top-rated status, except the first seen
//! 3. one indicator column per observed country, except the first seen
//!
//! Dropping the first-seen level of each categorical keeps the indicator block
//! linearly independent of the intercept column added by the solver.

use nalgebra::DMatrix;

use crate::domain::{Categorical, NumericAttributes, Record};
use crate::error::EncodingError;

/// Encoded features for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// Rows = records, columns = features.
    pub matrix: DMatrix<f64>,
    /// Column names, aligned with `matrix` columns.
    pub feature_names: Vec<String>,
}

impl DesignMatrix {
    pub fn rows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn cols(&self) -> usize {
        self.matrix.ncols()
    }
}

/// Observed levels of one categorical attribute.
#[derive(Debug, Clone)]
struct Levels {
    attribute: Categorical,
    /// Distinct values in first-appearance order. Index 0 is the reference level.
    values: Vec<String>,
}

impl Levels {
    fn collect(attribute: Categorical, records: &[Record]) -> Self {
        let mut values: Vec<String> = Vec::new();
        for r in records {
            let v = attribute.value(r);
            if !values.iter().any(|seen| seen == v) {
                values.push(v.to_string());
            }
        }
        Self { attribute, values }
    }

    /// Levels that get their own column.
    fn encoded(&self) -> &[String] {
        self.values.get(1..).unwrap_or(&[])
    }
}

/// Encode records into a design matrix.
pub fn encode(records: &[Record]) -> Result<DesignMatrix, EncodingError> {
    if records.is_empty() {
        return Err(EncodingError::NoRecords);
    }

    let levels: Vec<Levels> = Categorical::ALL
        .iter()
        .map(|&attr| Levels::collect(attr, records))
        .collect();

    let mut feature_names: Vec<String> = NumericAttributes::NAMES.iter().map(|n| n.to_string()).collect();
    for l in &levels {
        for value in l.encoded() {
            feature_names.push(format!("{}_{}", l.attribute.prefix(), value));
        }
    }

    let d = feature_names.len();
    if d == 0 {
        return Err(EncodingError::NoFeatures);
    }

    let mut row = Vec::with_capacity(d);
    let mut data = Vec::with_capacity(records.len() * d);
    for r in records {
        row.clear();
        row.extend_from_slice(&r.numeric.values());
        for l in &levels {
            let own = l.attribute.value(r);
            row.extend(l.encoded().iter().map(|v| if v == own { 1.0 } else { 0.0 }));
        }
        data.extend_from_slice(&row);
    }

    Ok(DesignMatrix {
        matrix: DMatrix::from_row_slice(records.len(), d, &data),
        feature_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NumericAttributes;

    fn record(status: &str, country: &str, jobs: f64) -> Record {
        Record {
            identifier: format!("~{country}{jobs}"),
            name: "worker".to_string(),
            numeric: NumericAttributes {
                total_jobs: jobs,
                ..NumericAttributes::default()
            },
            top_rated_status: status.to_string(),
            country: country.to_string(),
            earnings: 100.0,
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(encode(&[]), Err(EncodingError::NoRecords));
    }

    #[test]
    fn drops_first_seen_level_per_categorical() {
        let records = vec![
            record("none", "US", 1.0),
            record("top_rated", "India", 2.0),
            record("top_rated_plus", "US", 3.0),
            record("none", "Brazil", 4.0),
        ];
        let design = encode(&records).unwrap();

        let n0 = NumericAttributes::COUNT;
        assert_eq!(design.cols(), n0 + 2 + 2);
        assert_eq!(
            &design.feature_names[n0..],
            &["topRated_top_rated", "topRated_top_rated_plus", "country_India", "country_Brazil"]
        );

        // Second record: top_rated + India.
        let row: Vec<f64> = design.matrix.row(1).iter().copied().collect();
        assert_eq!(&row[n0..], &[1.0, 0.0, 1.0, 0.0]);
        // First record is the reference for both attributes.
        let row: Vec<f64> = design.matrix.row(0).iter().copied().collect();
        assert_eq!(&row[n0..], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_valued_categorical_contributes_no_columns() {
        let records = vec![record("none", "US", 1.0), record("top_rated", "US", 2.0)];
        let design = encode(&records).unwrap();
        assert!(design.feature_names.iter().all(|n| !n.starts_with("country_")));
        assert_eq!(design.cols(), NumericAttributes::COUNT + 1);
    }

    #[test]
    fn k_levels_yield_k_minus_one_columns() {
        let countries = ["A", "B", "C", "D", "E"];
        let records: Vec<Record> = countries
            .iter()
            .enumerate()
            .map(|(i, c)| record("none", c, i as f64))
            .collect();
        let design = encode(&records).unwrap();
        let country_cols = design.feature_names.iter().filter(|n| n.starts_with("country_")).count();
        assert_eq!(country_cols, countries.len() - 1);
    }

    #[test]
    fn encoding_is_deterministic() {
        let records = vec![
            record("none", "US", 1.0),
            record("top_rated", "India", 2.0),
            record("none", "Kenya", 5.0),
        ];
        assert_eq!(encode(&records).unwrap(), encode(&records).unwrap());
    }

    #[test]
    fn numeric_columns_come_first_in_schema_order() {
        let records = vec![record("none", "US", 9.0)];
        let design = encode(&records).unwrap();
        let jobs_col = design.feature_names.iter().position(|n| n == "totalJobs").unwrap();
        assert_eq!(jobs_col, 4);
        assert_eq!(design.matrix[(0, jobs_col)], 9.0);
    }
}
