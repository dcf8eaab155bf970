//! CSV portfolio import: first column symbol (required), second column
//! weight (optional, percent). A missing weight column means equal-weight
//! across all rows.

use portfolio_core::{Holding, Portfolio, StoreError};
use std::io::Read;

/// Name given to every CSV-imported portfolio.
pub const CSV_PORTFOLIO_NAME: &str = "CSV Imported Portfolio";

/// Build a portfolio from already-parsed rows. Rows either all carry a
/// weight or none do; when none do, each row gets 100/N. A symbol listed
/// more than once collapses to its last row, keeping symbols unique.
pub fn import_from_rows(rows: &[(String, Option<f64>)]) -> Result<Portfolio, StoreError> {
    if rows.is_empty() {
        return Err(StoreError::EmptyImport);
    }

    let mut deduped: Vec<(String, Option<f64>)> = Vec::new();
    for (symbol, weight) in rows {
        match deduped.iter_mut().find(|(s, _)| s == symbol) {
            Some(row) => row.1 = *weight,
            None => deduped.push((symbol.clone(), *weight)),
        }
    }

    let equal_weight = 100.0 / deduped.len() as f64;
    let holdings = deduped
        .iter()
        .map(|(symbol, weight)| Holding {
            symbol: symbol.clone(),
            weight: weight.unwrap_or(equal_weight),
        })
        .collect();

    Ok(Portfolio::new(CSV_PORTFOLIO_NAME, holdings))
}

/// Parse CSV input into rows and import. Aborts on malformed input
/// (unreadable records, empty symbol cells, unparseable weights) without
/// producing a partial portfolio.
pub fn import_csv<R: Read>(reader: R) -> Result<Portfolio, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<(String, Option<f64>)> = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| StoreError::MalformedImport(e.to_string()))?;
        let symbol = record
            .get(0)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StoreError::MalformedImport("missing symbol column".to_string()))?;

        let weight = match record.get(1).map(str::trim).filter(|w| !w.is_empty()) {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                StoreError::MalformedImport(format!("invalid weight for {symbol}: {raw}"))
            })?),
            None => None,
        };

        rows.push((symbol.to_string(), weight));
    }

    import_from_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::reconcile;

    #[test]
    fn test_rows_with_weights() {
        let rows = vec![
            ("AAPL".to_string(), Some(60.0)),
            ("MSFT".to_string(), Some(40.0)),
        ];
        let p = import_from_rows(&rows).unwrap();
        assert_eq!(p.name, CSV_PORTFOLIO_NAME);
        assert_eq!(p.weight_of("AAPL"), Some(60.0));
        assert_eq!(p.weight_of("MSFT"), Some(40.0));
        assert!(reconcile(&p.holdings).valid);
    }

    #[test]
    fn test_rows_without_weights_equal_weight() {
        let rows = vec![("AAPL".to_string(), None), ("MSFT".to_string(), None)];
        let p = import_from_rows(&rows).unwrap();
        assert_eq!(p.weight_of("AAPL"), Some(50.0));
        assert_eq!(p.weight_of("MSFT"), Some(50.0));
    }

    #[test]
    fn test_empty_rows_rejected() {
        assert!(matches!(
            import_from_rows(&[]),
            Err(StoreError::EmptyImport)
        ));
    }

    #[test]
    fn test_csv_with_weight_column() {
        let input = "AAPL,60\nMSFT,40\n";
        let p = import_csv(input.as_bytes()).unwrap();
        assert_eq!(p.weight_of("AAPL"), Some(60.0));
        assert!(reconcile(&p.holdings).valid);
    }

    #[test]
    fn test_csv_without_weight_column() {
        let input = "AAPL\nMSFT\nNVDA\nSPY\n";
        let p = import_csv(input.as_bytes()).unwrap();
        assert_eq!(p.holdings.len(), 4);
        assert_eq!(p.weight_of("NVDA"), Some(25.0));
    }

    #[test]
    fn test_csv_duplicate_symbol_keeps_last_row() {
        let input = "AAPL,50\nMSFT,30\nAAPL,70\n";
        let p = import_csv(input.as_bytes()).unwrap();
        assert_eq!(p.holdings.len(), 2);
        assert_eq!(p.weight_of("AAPL"), Some(70.0));
        assert_eq!(p.weight_of("MSFT"), Some(30.0));
    }

    #[test]
    fn test_duplicate_rows_equal_weight_over_unique_symbols() {
        let rows = vec![
            ("AAPL".to_string(), None),
            ("AAPL".to_string(), None),
            ("MSFT".to_string(), None),
        ];
        let p = import_from_rows(&rows).unwrap();
        assert_eq!(p.holdings.len(), 2);
        assert_eq!(p.weight_of("AAPL"), Some(50.0));
        assert_eq!(p.weight_of("MSFT"), Some(50.0));
    }

    #[test]
    fn test_csv_empty_input_rejected() {
        assert!(matches!(
            import_csv("".as_bytes()),
            Err(StoreError::EmptyImport)
        ));
    }

    #[test]
    fn test_csv_bad_weight_rejected() {
        let err = import_csv("AAPL,sixty\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::MalformedImport(_)));
    }
}
