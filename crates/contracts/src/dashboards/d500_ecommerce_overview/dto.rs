use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a026_customer_geolocation::GeolocationRecord;

/// Query for the e-commerce overview dashboard.
///
/// Missing bounds fall back to the first/last approval date of the dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverviewRequest {
    /// Inclusive start in format "YYYY-MM-DD"
    pub date_from: Option<NaiveDate>,
    /// Inclusive end in format "YYYY-MM-DD"
    pub date_to: Option<NaiveDate>,
    /// Size of the seller city ranking
    pub top_n: Option<usize>,
}

/// Approval dates covered by the loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRangeResponse {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

/// Orders and revenue for one approval date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub order_count: u64,
    pub revenue: f64,
}

/// Customer spend for one approval date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpend {
    pub date: NaiveDate,
    pub total_spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItemCount {
    pub category: String,
    pub product_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountEntry<K> {
    pub key: K,
    pub count: u64,
}

/// Value counts ordered by count descending, plus the most frequent key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution<K> {
    pub entries: Vec<CountEntry<K>>,
    /// None for an empty distribution
    pub mode: Option<K>,
}

impl<K> Distribution<K> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            mode: None,
        }
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> Default for Distribution<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Delivered vs estimated delivery date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTimeliness {
    pub on_time: u64,
    pub late: u64,
    /// Rows without a delivery or estimate date
    pub undelivered: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodShare {
    pub payment_type: String,
    pub count: u64,
    /// Percent of all rows with a defined payment type
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerCityCount {
    pub seller_city: String,
    /// Distinct sellers located in the city
    pub seller_count: u64,
}

/// Pearson correlation between payment value and review score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentReviewCorrelation {
    /// None when fewer than two samples or one side has no variance
    pub coefficient: Option<f64>,
    pub sample_size: u64,
}

/// Headline figures shown above the charts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewSummary {
    pub total_orders: u64,
    pub total_revenue: f64,
    pub total_spend: f64,
    /// Mean spend per approval date
    pub average_spend: Option<f64>,
    pub total_items: u64,
    /// Mean items per product category
    pub average_items: Option<f64>,
    pub average_review_score: Option<f64>,
    pub most_common_review_score: Option<u8>,
    pub most_common_state: Option<String>,
    pub most_common_status: Option<String>,
}

/// Response for the e-commerce overview dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    /// Effective range after defaults were applied
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Rows left after date filtering
    pub row_count: usize,
    pub summary: OverviewSummary,
    pub daily_orders: Vec<DailyOrders>,
    pub spend_over_time: Vec<DailySpend>,
    pub item_counts: Vec<CategoryItemCount>,
    pub best_sellers: Vec<CategoryItemCount>,
    pub worst_sellers: Vec<CategoryItemCount>,
    pub review_scores: Distribution<u8>,
    pub states: Distribution<String>,
    pub order_statuses: Distribution<String>,
    pub delivery: DeliveryTimeliness,
    pub payment_methods: Vec<PaymentMethodShare>,
    pub top_seller_cities: Vec<SellerCityCount>,
    pub payment_review_correlation: PaymentReviewCorrelation,
}

/// Deduplicated customer locations for the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationResponse {
    /// Records before deduplication
    pub total_records: usize,
    pub points: Vec<GeolocationRecord>,
}
