use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RosterError};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month. Rosters are generated, fetched and deleted per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    /// 1 = January … 12 = December.
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(RosterError::InvalidInput(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        // Both neighbours must exist too, so next() and prev() never saturate
        // on a month built here.
        let first = NaiveDate::from_ymd_opt(year, month, 1);
        let bounded = first.is_some_and(|d| {
            d.checked_add_months(Months::new(1)).is_some()
                && d.checked_sub_months(Months::new(1)).is_some()
        });
        if !bounded {
            return Err(RosterError::InvalidInput(format!("year out of range: {year}")));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn num_days(&self) -> u32 {
        self.last_day().day()
    }

    /// Every day of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        first.iter_days().take(self.num_days() as usize)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Stays put on the last month chrono can represent.
    pub fn next(&self) -> Self {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map_or(*self, Self::of)
    }

    /// Stays put on the first month chrono can represent.
    pub fn prev(&self) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(1))
            .map_or(*self, Self::of)
    }

    /// English month name, e.g. `"February"`.
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Two-digit month, e.g. `"02"`.
    pub fn padded(&self) -> String {
        format!("{:02}", self.month)
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}
