//! Month window construction: enumerates the calendar days of a month and
//! classifies each as working or non-working (weekend).
//!
//! All functions here are pure over civil dates. Callers own timezone
//! consistency; the system clock is only consulted by [`MonthWindow::current`]
//! at the CLI edge.

use jiff::Zoned;
use jiff::civil::{Date, Weekday};
use serde::Serialize;

use crate::error::{CadenceError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct DayInfo {
    pub date: String,
    pub is_weekend: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthWindow {
    pub year: i16,
    pub month: i8,
    /// `YYYY-MM`, the prefix that leave dates and task endpoints are
    /// matched against.
    pub month_key: String,
    /// Ordered ISO date strings for the non-weekend days of the month.
    pub working_days: Vec<String>,
    /// Every day of the month, in order.
    pub all_days: Vec<DayInfo>,
}

impl MonthWindow {
    /// Build the window for the month containing `reference`. Any day of
    /// the target month works as a reference. `today` only drives the
    /// `is_today` flags.
    pub fn containing(reference: Date, today: Date) -> MonthWindow {
        let year = reference.year();
        let month = reference.month();
        let month_key = format!("{year:04}-{month:02}");

        let mut working_days = Vec::new();
        let mut all_days = Vec::new();

        for day in 1..=reference.days_in_month() {
            let date = jiff::civil::date(year, month, day);
            let is_weekend = matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday);
            let iso = date.to_string();

            if !is_weekend {
                working_days.push(iso.clone());
            }
            all_days.push(DayInfo {
                date: iso,
                is_weekend,
                is_today: date == today,
            });
        }

        MonthWindow {
            year,
            month,
            month_key,
            working_days,
            all_days,
        }
    }

    /// Window for the current month in the system's local timezone.
    pub fn current() -> MonthWindow {
        let today = Zoned::now().date();
        Self::containing(today, today)
    }

    pub fn working_day_count(&self) -> usize {
        self.working_days.len()
    }

    pub fn month_name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Unknown",
        }
    }
}

/// Parse an ISO calendar date (YYYY-MM-DD).
pub fn parse_date(s: &str) -> Result<Date> {
    s.parse::<Date>()
        .map_err(|_| CadenceError::InvalidDate(s.to_string()))
}

/// Resolve a `YYYY-MM` month key to the first day of that month.
pub fn parse_month_key(s: &str) -> Result<Date> {
    let err = || CadenceError::InvalidMonth(s.to_string());

    let (year_str, month_str) = s.split_once('-').ok_or_else(err)?;
    if year_str.len() != 4 || month_str.len() != 2 {
        return Err(err());
    }
    let year: i16 = year_str.parse().map_err(|_| err())?;
    let month: i8 = month_str.parse().map_err(|_| err())?;

    Date::new(year, month, 1).map_err(|_| err())
}
