//! Daily OHLCV series from CSV.
//!
//! Accepts a plain `date,open,high,low,close,volume` layout as well as the
//! Yahoo-style `Date,Open,High,Low,Close,Adj Close,Volume` export. Header
//! names are matched case-insensitively and extra columns are ignored. Rows
//! whose prices are blank or `null` (market holidays in Yahoo exports) are
//! skipped with a warning; truncated rows and any other unparseable field
//! are errors.

use chrono::NaiveDate;
use std::io::{Read, Write};
use std::path::Path;
use tracing::warn;

use crate::domain::{Bar, PriceSeries, SeriesError};
use crate::indicators::IndicatorValues;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    #[error("line {line}: {message}")]
    BadRow { line: u64, message: String },

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
}

const REQUIRED: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Column positions of the required fields, in `REQUIRED` order.
struct Columns([usize; 6]);

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let mut idx = [0usize; 6];
        for (slot, name) in idx.iter_mut().zip(REQUIRED) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(LoadError::MissingColumn(name))?;
        }
        Ok(Self(idx))
    }

    /// Number of fields a row needs to reach every required column.
    fn width(&self) -> usize {
        self.0.iter().max().map_or(0, |&i| i + 1)
    }

    /// `Ok(None)` for a holiday row with no prices.
    fn parse(&self, record: &csv::StringRecord) -> Result<Option<Bar>, String> {
        if record.len() < self.width() {
            return Err(format!(
                "expected at least {} fields, found {}",
                self.width(),
                record.len()
            ));
        }
        let field = |i: usize| record.get(self.0[i]).unwrap_or("").trim();

        let prices = [field(1), field(2), field(3), field(4)];
        if prices.iter().any(|p| p.is_empty() || p.eq_ignore_ascii_case("null")) {
            return Ok(None);
        }

        let date = parse_date(field(0))?;
        let mut values = [0.0; 4];
        for (v, (raw, name)) in values.iter_mut().zip(prices.iter().zip(&REQUIRED[1..5])) {
            *v = raw
                .parse::<f64>()
                .map_err(|_| format!("{name} is not a number: {raw:?}"))?;
        }
        let volume = parse_volume(field(5))?;

        Ok(Some(Bar {
            date,
            open: values[0],
            high: values[1],
            low: values[2],
            close: values[3],
            volume,
        }))
    }
}

/// `2024-01-02`, optionally followed by a time part.
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let day = raw
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| format!("bad date: {raw:?}"))
}

/// Volume may be blank (treated as 0) or written as a float.
fn parse_volume(raw: &str) -> Result<u64, String> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(0);
    }
    let v: f64 = raw
        .parse()
        .map_err(|_| format!("volume is not a number: {raw:?}"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("volume must be a non-negative number: {raw:?}"));
    }
    Ok(v.round() as u64)
}

/// Parse a series from any CSV reader.
///
/// Rows are sorted by date; the result must pass `PriceSeries::validate`, so
/// duplicate dates and non-positive prices are rejected.
pub fn parse_csv<R: Read>(reader: R, symbol: &str) -> Result<PriceSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::from_headers(rdr.headers()?)?;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        match columns.parse(&record) {
            Ok(Some(bar)) => bars.push(bar),
            Ok(None) => warn!(symbol, line, "skipping row without prices"),
            Err(message) => return Err(LoadError::BadRow { line, message }),
        }
    }

    bars.sort_by_key(|b| b.date);
    let series = PriceSeries::new(symbol, bars);
    series.validate()?;
    Ok(series)
}

pub fn load_csv(path: &Path, symbol: &str) -> Result<PriceSeries, LoadError> {
    let file = std::fs::File::open(path)?;
    parse_csv(std::io::BufReader::new(file), symbol)
}

/// Write `date,close` plus every indicator series as CSV; undefined values
/// are left blank.
pub fn write_indicators<W: Write>(
    writer: W,
    series: &PriceSeries,
    indicators: &IndicatorValues,
) -> Result<(), LoadError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let names: Vec<&str> = indicators.names().collect();
    let mut header = vec!["date".to_string(), "close".to_string()];
    header.extend(names.iter().map(|n| n.to_string()));
    wtr.write_record(&header)?;

    for (i, bar) in series.bars().iter().enumerate() {
        let mut row = vec![bar.date.to_string(), bar.close.to_string()];
        for name in &names {
            let cell = match indicators.get(name, i) {
                Some(v) if v.is_finite() => v.to_string(),
                _ => String::new(),
            };
            row.push(cell);
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_layout() {
        let data = "date,open,high,low,close,volume\n\
                    2024-01-02,100,105,99,104,12000\n\
                    2024-01-03,104,106,103,105.5,9000\n";
        let series = parse_csv(data.as_bytes(), "TCS.NS").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.symbol, "TCS.NS");
        assert_eq!(series.closes(), vec![104.0, 105.5]);
        assert_eq!(series.last().unwrap().volume, 9000);
    }

    #[test]
    fn parses_yahoo_layout_and_skips_null_rows() {
        let data = "Date,Open,High,Low,Close,Adj Close,Volume\n\
                    2024-01-02,100,105,99,104,103.1,12000.0\n\
                    2024-01-03,null,null,null,null,null,null\n\
                    2024-01-04 00:00:00+05:30,104,106,103,105,104.2,9000\n";
        let series = parse_csv(data.as_bytes(), "INFY.NS").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
        );
    }

    #[test]
    fn sorts_rows_by_date() {
        let data = "date,open,high,low,close,volume\n\
                    2024-01-03,104,106,103,105,1\n\
                    2024-01-02,100,105,99,104,1\n";
        let series = parse_csv(data.as_bytes(), "X").unwrap();
        assert_eq!(series.closes(), vec![104.0, 105.0]);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let data = "date,open,high,low,close,volume\n\
                    2024-01-02,100,105,99,104,1\n\
                    2024-01-02,100,105,99,104,1\n";
        let err = parse_csv(data.as_bytes(), "X").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Series(SeriesError::DuplicateDate { .. })
        ));
    }

    #[test]
    fn missing_column_is_reported() {
        let err = parse_csv("date,open,high,low,close\n".as_bytes(), "X").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("volume")));
    }

    #[test]
    fn bad_number_reports_line() {
        let data = "date,open,high,low,close,volume\n\
                    2024-01-02,100,105,99,abc,1\n";
        let err = parse_csv(data.as_bytes(), "X").unwrap_err();
        match err {
            LoadError::BadRow { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("close"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_row_is_an_error() {
        let data = "date,open,high,low,close,volume\n\
                    2024-01-02,100,105,99,104,1\n\
                    2024-01-03,104\n\
                    2024-01-04,104,106,103,105,1\n";
        let err = parse_csv(data.as_bytes(), "X").unwrap_err();
        match err {
            LoadError::BadRow { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("found 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_price_fields_are_still_a_holiday() {
        let data = "date,open,high,low,close,volume\n\
                    2024-01-02,100,105,99,104,1\n\
                    2024-01-03,,,,,\n";
        let series = parse_csv(data.as_bytes(), "X").unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn infinite_price_is_rejected() {
        let data = "date,open,high,low,close,volume\n\
                    2024-01-02,inf,inf,inf,inf,1\n";
        let err = parse_csv(data.as_bytes(), "X").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Series(SeriesError::NonPositivePrice { index: 0, .. })
        ));
    }

    #[test]
    fn writes_blank_cells_for_undefined_values() {
        let data = "date,open,high,low,close,volume\n\
                    2024-01-02,100,105,99,104,1\n\
                    2024-01-03,104,106,103,106,1\n";
        let series = parse_csv(data.as_bytes(), "X").unwrap();
        let mut iv = IndicatorValues::new();
        iv.insert("sma_2", vec![f64::NAN, 105.0]);

        let mut out = Vec::new();
        write_indicators(&mut out, &series, &iv).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,close,sma_2");
        assert_eq!(lines[1], "2024-01-02,104,");
        assert_eq!(lines[2], "2024-01-03,106,105");
    }
}
