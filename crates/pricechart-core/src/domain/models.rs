use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{DateRange, Interval, Symbol, TradingDay, ValidationError};

/// One row of a daily price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: TradingDay,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Cash dividend paid on this day, `0.0` when none.
    pub dividends: f64,
    /// Split ratio effective on this day, `0.0` when none.
    pub stock_splits: f64,
}

impl PriceRecord {
    pub fn new(
        date: TradingDay,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidPriceRange);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            dividends: 0.0,
            stock_splits: 0.0,
        })
    }

    pub fn with_dividend(mut self, amount: f64) -> Result<Self, ValidationError> {
        validate_non_negative("dividends", amount)?;
        self.dividends = amount;
        Ok(self)
    }

    pub fn with_split(mut self, ratio: f64) -> Result<Self, ValidationError> {
        validate_non_negative("stock_splits", ratio)?;
        self.stock_splits = ratio;
        Ok(self)
    }

    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume as f64,
            Field::Dividends => self.dividends,
            Field::StockSplits => self.stock_splits,
        }
    }
}

/// Column of a [`PriceSeries`] that can be projected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
    Dividends,
    StockSplits,
}

impl Field {
    /// Table header used upstream for this column.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
            Self::Dividends => "Dividends",
            Self::StockSplits => "Stock Splits",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Date-indexed price table for one symbol.
///
/// Record dates are strictly increasing and all fall inside `range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPriceSeries")]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub interval: Interval,
    pub range: DateRange,
    pub currency: Option<String>,
    records: Vec<PriceRecord>,
}

/// Wire shape of [`PriceSeries`]; decoding goes through [`PriceSeries::new`].
#[derive(Deserialize)]
struct RawPriceSeries {
    symbol: Symbol,
    interval: Interval,
    range: DateRange,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    records: Vec<PriceRecord>,
}

impl From<RawPriceSeries> for PriceSeries {
    fn from(raw: RawPriceSeries) -> Self {
        Self::new(raw.symbol, raw.interval, raw.range, raw.records).with_currency(raw.currency)
    }
}

impl PriceSeries {
    /// Build a series, sorting by date, dropping rows outside `range` and
    /// keeping the last row for any duplicated date.
    pub fn new(
        symbol: Symbol,
        interval: Interval,
        range: DateRange,
        mut records: Vec<PriceRecord>,
    ) -> Self {
        records.retain(|record| range.contains(record.date));
        // Stable sort keeps arrival order within a date, so the later row wins below.
        records.sort_by_key(|record| record.date);

        let mut deduped: Vec<PriceRecord> = Vec::with_capacity(records.len());
        for record in records {
            match deduped.last_mut() {
                Some(previous) if previous.date == record.date => *previous = record,
                _ => deduped.push(record),
            }
        }

        Self {
            symbol,
            interval,
            range,
            currency: None,
            records: deduped,
        }
    }

    pub fn with_currency(mut self, currency: Option<String>) -> Self {
        self.currency = currency;
        self
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&PriceRecord> {
        self.records.last()
    }

    /// The date index of the table.
    pub fn dates(&self) -> Vec<TradingDay> {
        self.records.iter().map(|record| record.date).collect()
    }

    /// Project a single field into a named, date-indexed column.
    pub fn column(&self, field: Field) -> Column {
        Column {
            name: field.label().to_owned(),
            points: self
                .records
                .iter()
                .map(|record| (record.date, record.value(field)))
                .collect(),
        }
    }
}

/// A single named sequence of numeric values indexed by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub points: Vec<(TradingDay, f64)>,
}

impl Column {
    pub fn new(name: impl Into<String>, points: Vec<(TradingDay, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, value)| *value)
    }

    pub fn min(&self) -> Option<f64> {
        self.values().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.values().reduce(f64::max)
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(raw: &str) -> TradingDay {
        TradingDay::parse(raw).expect("valid day")
    }

    fn record(raw: &str, close: f64) -> PriceRecord {
        PriceRecord::new(day(raw), close, close + 1.0, close - 1.0, close, 1_000)
            .expect("valid record")
    }

    fn range() -> DateRange {
        DateRange::new(day("2020-01-01"), day("2020-02-01")).expect("valid range")
    }

    #[test]
    fn rejects_inverted_high_low() {
        let err = PriceRecord::new(day("2020-01-02"), 10.0, 9.0, 11.0, 10.0, 5)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidPriceRange));
    }

    #[test]
    fn rejects_nan_prices() {
        let err = PriceRecord::new(day("2020-01-02"), f64::NAN, 9.0, 8.0, 9.0, 5)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "open" }));
    }

    #[test]
    fn series_sorts_dedupes_and_clips_to_range() {
        let series = PriceSeries::new(
            Symbol::parse("NTFL").expect("valid"),
            Interval::OneDay,
            range(),
            vec![
                record("2020-01-03", 3.0),
                record("2019-12-31", 1.5),
                record("2020-01-02", 2.0),
                record("2020-01-03", 30.0),
                record("2020-02-01", 99.0),
            ],
        );

        let dates: Vec<String> = series.dates().iter().map(ToString::to_string).collect();
        assert_eq!(dates, vec!["2020-01-02", "2020-01-03"]);
        assert_eq!(series.last().map(|r| r.close), Some(30.0));
        assert!(series.dates().windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn column_projection_matches_index_length_and_name() {
        let series = PriceSeries::new(
            Symbol::parse("NTFL").expect("valid"),
            Interval::OneDay,
            range(),
            vec![record("2020-01-02", 2.0), record("2020-01-03", 3.0)],
        );

        let close = series.column(Field::Close);
        let volume = series.column(Field::Volume);
        assert_eq!(close.name, "Close");
        assert_eq!(volume.name, "Volume");
        assert_eq!(close.len(), series.len());
        assert_eq!(volume.len(), series.len());
        assert_eq!(close.values().collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(volume.max(), Some(1_000.0));
    }

    #[test]
    fn decoding_restores_series_ordering() {
        let json = r#"{
            "symbol": "NTFL",
            "interval": "1d",
            "range": {"start": "2020-01-01", "end": "2020-02-01"},
            "currency": "USD",
            "records": [
                {"date": "2020-01-03", "open": 3.0, "high": 4.0, "low": 2.0, "close": 3.0, "volume": 10, "dividends": 0.0, "stock_splits": 0.0},
                {"date": "2020-03-01", "open": 9.0, "high": 9.0, "low": 9.0, "close": 9.0, "volume": 10, "dividends": 0.0, "stock_splits": 0.0},
                {"date": "2020-01-02", "open": 2.0, "high": 3.0, "low": 1.0, "close": 2.0, "volume": 10, "dividends": 0.0, "stock_splits": 0.0}
            ]
        }"#;

        let series: PriceSeries = serde_json::from_str(json).expect("decode");
        let dates: Vec<String> = series.dates().iter().map(ToString::to_string).collect();
        assert_eq!(dates, vec!["2020-01-02", "2020-01-03"]);
        assert_eq!(series.currency.as_deref(), Some("USD"));

        let encoded = serde_json::to_string(&series).expect("encode");
        assert_eq!(serde_json::from_str::<PriceSeries>(&encoded).expect("decode"), series);
    }

    #[test]
    fn split_and_dividend_columns_default_to_zero() {
        let plain = record("2020-01-02", 2.0);
        assert_eq!(plain.value(Field::Dividends), 0.0);
        assert_eq!(plain.value(Field::StockSplits), 0.0);

        let split = plain.with_split(7.0).expect("valid ratio");
        assert_eq!(split.value(Field::StockSplits), 7.0);
        assert_eq!(Field::StockSplits.label(), "Stock Splits");
    }
}
