pub mod aggregator;
pub mod filter;
pub mod geo_reducer;
pub mod service;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("No approved orders to derive a date range from")]
    NoApprovalDates,

    #[error("Dataset is not loaded")]
    DatasetNotLoaded,
}
