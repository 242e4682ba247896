use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Payment type that marks an order without a recorded payment method
pub const PAYMENT_TYPE_NOT_DEFINED: &str = "not_defined";

/// One line of the merged order/customer/seller table.
///
/// A single order may span several rows (one per item and payment), every
/// row is treated independently by the aggregations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_id: String,
    pub customer_id: String,
    /// Stable customer identity across orders
    pub customer_unique_id: String,
    pub customer_city: String,
    /// Two-letter state code, e.g. "SP"
    pub customer_state: String,
    pub seller_id: String,
    pub seller_city: String,
    pub seller_state: String,
    /// Status label, e.g. "delivered", "shipped", "canceled"
    pub order_status: String,

    pub order_purchase_timestamp: Option<NaiveDateTime>,
    /// Moment the payment was confirmed; drives the date filter
    pub order_approved_at: Option<NaiveDateTime>,
    pub order_delivered_carrier_date: Option<NaiveDateTime>,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub order_estimated_delivery_date: Option<NaiveDateTime>,

    pub payment_type: String,
    /// `None` when the payment cell was blank
    pub payment_value: Option<f64>,
    /// Customer review, 1..=5
    pub review_score: Option<u8>,

    pub product_id: Option<String>,
    /// English product category name
    pub product_category: Option<String>,
    pub price: f64,
    pub freight_value: f64,
}

impl OrderRow {
    /// Calendar date of the payment approval
    pub fn approval_date(&self) -> Option<NaiveDate> {
        self.order_approved_at.map(|ts| ts.date())
    }

    /// `Some(true)` when delivered no later than estimated,
    /// `None` when either date is unknown.
    pub fn delivered_on_time(&self) -> Option<bool> {
        match (
            self.order_delivered_customer_date,
            self.order_estimated_delivery_date,
        ) {
            (Some(delivered), Some(estimated)) => Some(delivered <= estimated),
            _ => None,
        }
    }

    /// Payment value for sums, a missing payment counts as zero
    pub fn payment_amount(&self) -> f64 {
        self.payment_value.unwrap_or(0.0)
    }

    pub fn has_defined_payment_type(&self) -> bool {
        !self.payment_type.is_empty() && self.payment_type != PAYMENT_TYPE_NOT_DEFINED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_approval_date_strips_time() {
        let row = OrderRow {
            order_approved_at: Some(ts("2017-10-02 23:59:59")),
            ..Default::default()
        };
        assert_eq!(
            row.approval_date(),
            NaiveDate::from_ymd_opt(2017, 10, 2)
        );
        assert_eq!(OrderRow::default().approval_date(), None);
    }

    #[test]
    fn test_delivered_on_time() {
        let mut row = OrderRow {
            order_delivered_customer_date: Some(ts("2018-01-10 12:00:00")),
            order_estimated_delivery_date: Some(ts("2018-01-10 12:00:00")),
            ..Default::default()
        };
        assert_eq!(row.delivered_on_time(), Some(true));

        row.order_delivered_customer_date = Some(ts("2018-01-11 00:00:00"));
        assert_eq!(row.delivered_on_time(), Some(false));

        row.order_delivered_customer_date = None;
        assert_eq!(row.delivered_on_time(), None);
    }

    #[test]
    fn test_payment_type_not_defined() {
        let mut row = OrderRow {
            payment_type: "boleto".to_string(),
            ..Default::default()
        };
        assert!(row.has_defined_payment_type());
        row.payment_type = PAYMENT_TYPE_NOT_DEFINED.to_string();
        assert!(!row.has_defined_payment_type());
    }

    #[test]
    fn test_missing_payment_sums_as_zero() {
        let mut row = OrderRow::default();
        assert_eq!(row.payment_value, None);
        assert_eq!(row.payment_amount(), 0.0);
        row.payment_value = Some(42.5);
        assert_eq!(row.payment_amount(), 42.5);
    }
}
