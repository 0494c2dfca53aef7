//! CSV loading of stock records.

use std::io;
use std::path::Path;

use crate::{DateValue, FeedError, NumberLike, StockRecord};

/// Loads every record from a CSV file with `Company`, `Date`, `Open` and
/// `Close` columns (header names are matched case-insensitively, extra
/// columns are ignored).
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<StockRecord>, FeedError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| FeedError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let records = read_records(io::BufReader::new(file))?;
    log::info!("Loaded {} records from {}", records.len(), path.display());

    Ok(records)
}

pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<StockRecord>, FeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers_lower: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_lowercase())
        .collect();

    let column = |name: &'static str| -> Result<usize, FeedError> {
        headers_lower
            .iter()
            .position(|h| h == &name.to_lowercase())
            .ok_or(FeedError::MissingColumn(name))
    };

    let company_col = column("Company")?;
    let date_col = column("Date")?;
    let open_col = column("Open")?;
    let close_col = column("Close")?;

    let mut records = Vec::new();

    // Bytes that aren't UTF-8 become U+FFFD instead of failing the whole file.
    for result in reader.byte_records() {
        let row = result?;
        let field = |col: usize| -> String {
            row.get(col)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default()
        };

        records.push(StockRecord {
            company: field(company_col),
            date: DateValue::Text(field(date_col)),
            open: NumberLike::Text(field(open_col)),
            close: NumberLike::Text(field(close_col)),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_in_file_order() {
        let input = "Company,Date,Open,High,Low,Close\n\
                     Apple,2023-11-01,170.00,171.0,169.0,173.97\n\
                     Microsoft,2023-11-01,339.79,347.0,339.0,346.07\n\
                     Apple,2023-11-02,175.52,177.7,175.0,177.57\n";

        let records = read_records(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].company, "Apple");
        assert_eq!(records[1].company, "Microsoft");
        assert_eq!(records[2].date, DateValue::Text("2023-11-02".into()));
        assert_eq!(records[2].close.to_f64(), 177.57);
    }

    #[test]
    fn header_lookup_ignores_case_and_order() {
        let input = "close, OPEN ,date,company\n152.5,150,11/03/2023,Apple\n";

        let records = read_records(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company, "Apple");
        assert_eq!(records[0].open.to_f64(), 150.0);
        assert_eq!(records[0].close.to_f64(), 152.5);
    }

    #[test]
    fn missing_column_is_reported() {
        let input = "Company,Date,Open\nApple,2023-11-01,170\n";

        let err = read_records(input.as_bytes()).unwrap_err();

        assert!(matches!(err, FeedError::MissingColumn("Close")));
    }

    #[test]
    fn short_rows_become_blank_fields() {
        let input = "Company,Date,Open,Close\nApple,2023-11-01\n";

        let records = read_records(input.as_bytes()).unwrap();

        assert_eq!(records[0].open, NumberLike::Text(String::new()));
        assert_eq!(records[0].close.to_f64(), 0.0);
    }

    #[test]
    fn invalid_utf8_row_keeps_the_rest() {
        let input: &[u8] = b"Company,Date,Open,Close\nApple,2023-11-01,1,2\nCaf\xe9,2023-11-02,3,4\n";

        let records = read_records(input).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company, "Apple");
        assert_eq!(records[0].close.to_f64(), 2.0);
        assert_eq!(records[1].company, "Caf\u{FFFD}");
        assert_eq!(records[1].open.to_f64(), 3.0);
    }
}
