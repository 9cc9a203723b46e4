use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Month, OffsetDateTime};

use crate::ValidationError;

/// Calendar day of a trading session, in the exchange's local calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDay(Date);

impl TradingDay {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parse `YYYY-MM-DD`. Unpadded month/day (`2010-5-31`) are accepted too.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: input.to_owned(),
        };

        let mut parts = input.trim().splitn(3, '-');
        let year = parts
            .next()
            .filter(|part| part.len() == 4)
            .and_then(|part| part.parse::<i32>().ok())
            .ok_or_else(invalid)?;
        let month = parts
            .next()
            .filter(|part| (1..=2).contains(&part.len()))
            .and_then(|part| part.parse::<u8>().ok())
            .and_then(|value| Month::try_from(value).ok())
            .ok_or_else(invalid)?;
        let day = parts
            .next()
            .filter(|part| (1..=2).contains(&part.len()))
            .and_then(|part| part.parse::<u8>().ok())
            .ok_or_else(invalid)?;

        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Calendar date of a unix timestamp shifted by the exchange's UTC offset.
    pub fn from_unix_timestamp(
        timestamp: i64,
        gmt_offset_secs: i64,
    ) -> Result<Self, ValidationError> {
        let shifted = timestamp.saturating_add(gmt_offset_secs);
        OffsetDateTime::from_unix_timestamp(shifted)
            .map(|value| Self(value.date()))
            .map_err(|_| ValidationError::InvalidDate {
                value: timestamp.to_string(),
            })
    }

    /// Unix seconds of this day's midnight UTC.
    pub fn unix_midnight_utc(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }
}

impl Display for TradingDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl FromStr for TradingDay {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl From<Date> for TradingDay {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Serialize for TradingDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TradingDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Half-open day range `[start, end)`; `end` is excluded like the upstream history call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: TradingDay,
    end: TradingDay,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: TradingDay,
    end: TradingDay,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = ValidationError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: TradingDay, end: TradingDay) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> TradingDay {
        self.start
    }

    pub const fn end(&self) -> TradingDay {
        self.end
    }

    pub fn contains(&self, day: TradingDay) -> bool {
        day >= self.start && day < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
