use chrono::NaiveDate;
use contracts::domain::a025_order_record::OrderRow;
use contracts::domain::a026_customer_geolocation::GeolocationRecord;
use once_cell::sync::OnceCell;
use std::path::Path;

use super::csv_reader::{parse_geolocation_csv, parse_orders_csv, DataError};
use crate::shared::config::Config;

static DATASET: OnceCell<Dataset> = OnceCell::new();

/// Source tables held in memory for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Sorted by approval timestamp, rows without one at the end
    pub orders: Vec<OrderRow>,
    pub geolocations: Vec<GeolocationRecord>,
}

impl Dataset {
    pub fn new(mut orders: Vec<OrderRow>, geolocations: Vec<GeolocationRecord>) -> Self {
        orders.sort_by_key(|row| (row.order_approved_at.is_none(), row.order_approved_at));
        Self {
            orders,
            geolocations,
        }
    }

    /// Read both tables from the paths in the configuration
    pub fn load(config: &Config) -> Result<Self, DataError> {
        let orders_path = config.orders_path();
        let geolocation_path = config.geolocation_path();

        tracing::info!("Loading orders from {}", orders_path.display());
        let orders = parse_orders_csv(&read_text(&orders_path)?)?;

        tracing::info!("Loading geolocation from {}", geolocation_path.display());
        let geolocations = parse_geolocation_csv(&read_text(&geolocation_path)?)?;

        let dataset = Self::new(orders, geolocations);
        let unapproved = dataset
            .orders
            .iter()
            .filter(|row| row.order_approved_at.is_none())
            .count();

        tracing::info!(
            "Dataset loaded: {} order rows ({} without approval date), {} geolocation records",
            dataset.orders.len(),
            unapproved,
            dataset.geolocations.len()
        );

        Ok(dataset)
    }

    /// First and last approval date, None when no row was approved
    pub fn approval_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.orders.iter().filter_map(OrderRow::approval_date);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d)));
        Some((min, max))
    }
}

fn read_text(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Install the dataset for the request handlers. Can only happen once.
pub fn initialize_dataset(dataset: Dataset) -> anyhow::Result<()> {
    DATASET
        .set(dataset)
        .map_err(|_| anyhow::anyhow!("dataset is already initialized"))
}

pub fn get_dataset() -> Option<&'static Dataset> {
    DATASET.get()
}
