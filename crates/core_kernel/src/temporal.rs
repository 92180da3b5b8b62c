//! Temporal types for rental scheduling
//!
//! This module provides the time handling used across the platform:
//! - Rental periods: when a vehicle is out with a customer, possibly
//!   still open-ended
//! - Date ranges: the day-granularity windows used by availability queries
//! - Agency timezones: day boundaries are agency-local, not UTC

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use std::str::FromStr;

/// Timezone wrapper for agency locations
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the agency-local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Gets the start of day (00:00:00) in this timezone as UTC
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(0, 0, 0)
            .unwrap()
            .and_local_timezone(self.0)
            .single()
            .expect("Invalid timezone conversion")
            .with_timezone(&Utc)
    }

    /// Gets the end of day (23:59:59.999999999) in this timezone as UTC
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap()
            .and_local_timezone(self.0)
            .single()
            .expect("Invalid timezone conversion")
            .with_timezone(&Utc)
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Africa::Tunis)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must be before end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Date is in the future")]
    FutureDate,
}

/// The span a vehicle is rented out for
///
/// The end is `None` while the rental is still open (vehicle out with the
/// customer); completing the reservation closes the period at the return
/// instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPeriod {
    /// Start of the rental (inclusive)
    pub start: DateTime<Utc>,
    /// End of the rental (exclusive), None while the vehicle is out
    pub end: Option<DateTime<Utc>>,
}

impl RentalPeriod {
    /// Creates a new rental period
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<Self, TemporalError> {
        if let Some(end) = end {
            if start >= end {
                return Err(TemporalError::InvalidPeriod {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Creates an open-ended period starting from the given pickup time
    pub fn open(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    /// Creates a bounded period
    pub fn bounded(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        Self::new(start, Some(end))
    }

    /// Returns true if this period contains the given instant
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && self.end.map_or(true, |e| instant < e)
    }

    /// Returns true if this period overlaps with another
    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        let self_end = self.end.unwrap_or(DateTime::<Utc>::MAX_UTC);
        let other_end = other.end.unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.start < other_end && other.start < self_end
    }

    /// Returns true if the rental has no scheduled or actual end yet
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Closes the period at the given instant (vehicle returned)
    pub fn close_at(&mut self, instant: DateTime<Utc>) -> Result<(), TemporalError> {
        if instant <= self.start {
            return Err(TemporalError::InvalidPeriod {
                start: self.start.to_string(),
                end: instant.to_string(),
            });
        }
        self.end = Some(instant);
        Ok(())
    }

    /// Returns the duration of the period, if closed
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end.map(|e| e - self.start)
    }
}

/// A day-granularity window used by availability queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Converts to a RentalPeriod spanning the agency-local days
    pub fn to_rental_period(&self, tz: &Timezone) -> RentalPeriod {
        RentalPeriod {
            start: tz.start_of_day(self.start),
            end: Some(tz.end_of_day(self.end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rental_period_creation() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 8, 18, 0, 0).unwrap();

        let period = RentalPeriod::bounded(start, end).unwrap();
        assert!(period.contains(Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()));
        assert!(!period.contains(Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_rental_period_rejects_inverted_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let result = RentalPeriod::bounded(start, end);
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_open_period_contains_any_later_instant() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let period = RentalPeriod::open(start);

        assert!(period.is_open());
        assert!(period.contains(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
        assert!(!period.contains(Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_close_at_return_instant() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut period = RentalPeriod::open(start);

        let returned = Utc.with_ymd_and_hms(2024, 3, 5, 16, 30, 0).unwrap();
        period.close_at(returned).unwrap();

        assert!(!period.is_open());
        assert_eq!(period.duration().unwrap().num_days(), 4);
    }

    #[test]
    fn test_close_at_before_start_fails() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut period = RentalPeriod::open(start);

        let result = period.close_at(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_overlap_with_open_period() {
        let ongoing = RentalPeriod::open(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let upcoming = RentalPeriod::bounded(
            Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 8, 9, 0, 0).unwrap(),
        ).unwrap();

        assert!(ongoing.overlaps(&upcoming));
    }

    #[test]
    fn test_date_range_days() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        ).unwrap();

        assert_eq!(range.days(), 7);
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()));
    }

    #[test]
    fn test_date_range_to_rental_period() {
        let tz = Timezone::default();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        ).unwrap();

        let period = range.to_rental_period(&tz);
        assert!(period.contains(tz.start_of_day(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())));
    }
}
