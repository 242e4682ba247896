use chrono::NaiveDate;
use contracts::domain::a025_order_record::OrderRow;

use super::DashboardError;

/// Inclusive range of approval dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DashboardError> {
        if from > to {
            return Err(DashboardError::InvalidDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn start(&self) -> NaiveDate {
        self.from
    }

    pub fn end(&self) -> NaiveDate {
        self.to
    }

    /// The whole `to` day is part of the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Rows approved within the range, in input order.
/// Rows that were never approved are dropped.
pub fn filter_by_approval(rows: &[OrderRow], range: DateRange) -> Vec<OrderRow> {
    rows.iter()
        .filter(|row| row.approval_date().is_some_and(|d| range.contains(d)))
        .cloned()
        .collect()
}
