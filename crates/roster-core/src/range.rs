use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::month::MonthRef;

/// Inclusive date range used by the summary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(RosterError::InvalidInput(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let month = MonthRef::of(date);
        Self {
            start: month.first_day(),
            end: month.last_day(),
        }
    }

    /// Monday-to-Sunday week containing `date`, clamped to the calendar
    /// edges.
    pub fn week_of(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let start = date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
        Self {
            start,
            end: start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every month the range touches, oldest first.
    pub fn months(&self) -> Vec<MonthRef> {
        let last = MonthRef::of(self.end);
        let mut cur = MonthRef::of(self.start);
        let mut out = vec![cur];
        while cur < last {
            cur = cur.next();
            out.push(cur);
        }
        out
    }
}
