use chrono::{NaiveDate, NaiveDateTime};
use contracts::domain::a025_order_record::{OrderRow, PAYMENT_TYPE_NOT_DEFINED};
use contracts::domain::a026_customer_geolocation::GeolocationRecord;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the source tables
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: invalid value {value:?} in column {column}")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Columns of the merged order table as they appear in the file.
/// Columns without `#[serde(default)]` must be present in the header.
#[derive(Debug, Deserialize)]
struct RawOrderRecord {
    order_id: String,
    customer_id: String,
    #[serde(default)]
    customer_unique_id: String,
    #[serde(default)]
    customer_city: String,
    customer_state: String,
    seller_id: String,
    seller_city: String,
    #[serde(default)]
    seller_state: String,
    order_status: String,
    #[serde(default)]
    order_purchase_timestamp: String,
    order_approved_at: String,
    #[serde(default)]
    order_delivered_carrier_date: String,
    order_delivered_customer_date: String,
    order_estimated_delivery_date: String,
    payment_type: String,
    payment_value: String,
    review_score: String,
    product_id: String,
    product_category_name_english: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    freight_value: String,
}

#[derive(Debug, Deserialize)]
struct RawGeolocationRecord {
    customer_unique_id: String,
    geolocation_lat: String,
    geolocation_lng: String,
    #[serde(default)]
    geolocation_city: String,
    #[serde(default)]
    geolocation_state: String,
}

/// Parse the merged order table
pub fn parse_orders_csv(csv_text: &str) -> Result<Vec<OrderRow>, DataError> {
    let mut reader = reader_for(csv_text);
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawOrderRecord = record.deserialize(Some(&headers))?;
        rows.push(raw.into_order_row(line)?);
    }

    Ok(rows)
}

/// Parse the customer geolocation table
pub fn parse_geolocation_csv(csv_text: &str) -> Result<Vec<GeolocationRecord>, DataError> {
    let mut reader = reader_for(csv_text);
    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawGeolocationRecord = record.deserialize(Some(&headers))?;

        records.push(GeolocationRecord {
            customer_unique_id: raw.customer_unique_id.trim().to_string(),
            geolocation_lat: required_f64(&raw.geolocation_lat, "geolocation_lat", line)?,
            geolocation_lng: required_f64(&raw.geolocation_lng, "geolocation_lng", line)?,
            geolocation_city: non_empty(&raw.geolocation_city),
            geolocation_state: non_empty(&raw.geolocation_state),
        });
    }

    Ok(records)
}

fn reader_for(csv_text: &str) -> csv::Reader<&[u8]> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes())
}

impl RawOrderRecord {
    fn into_order_row(self, line: u64) -> Result<OrderRow, DataError> {
        let payment_type = match self.payment_type.trim() {
            "" => PAYMENT_TYPE_NOT_DEFINED.to_string(),
            other => other.to_string(),
        };

        Ok(OrderRow {
            order_purchase_timestamp: timestamp(
                &self.order_purchase_timestamp,
                "order_purchase_timestamp",
                line,
            )?,
            order_approved_at: timestamp(&self.order_approved_at, "order_approved_at", line)?,
            order_delivered_carrier_date: timestamp(
                &self.order_delivered_carrier_date,
                "order_delivered_carrier_date",
                line,
            )?,
            order_delivered_customer_date: timestamp(
                &self.order_delivered_customer_date,
                "order_delivered_customer_date",
                line,
            )?,
            order_estimated_delivery_date: timestamp(
                &self.order_estimated_delivery_date,
                "order_estimated_delivery_date",
                line,
            )?,
            payment_value: optional_amount(&self.payment_value, "payment_value", line)?,
            review_score: review_score(&self.review_score, line)?,
            price: amount(&self.price, "price", line)?,
            freight_value: amount(&self.freight_value, "freight_value", line)?,
            product_id: non_empty(&self.product_id),
            product_category: non_empty(&self.product_category_name_english),
            payment_type,
            order_id: self.order_id.trim().to_string(),
            customer_id: self.customer_id.trim().to_string(),
            customer_unique_id: self.customer_unique_id.trim().to_string(),
            customer_city: self.customer_city.trim().to_string(),
            customer_state: self.customer_state.trim().to_string(),
            seller_id: self.seller_id.trim().to_string(),
            seller_city: self.seller_city.trim().to_string(),
            seller_state: self.seller_state.trim().to_string(),
            order_status: self.order_status.trim().to_string(),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn invalid(line: u64, column: &'static str, value: &str) -> DataError {
    DataError::InvalidField {
        line,
        column,
        value: value.to_string(),
    }
}

/// Accepts "YYYY-MM-DD HH:MM:SS" (optionally with fractional seconds) and
/// bare "YYYY-MM-DD". Blank cells are absent timestamps.
fn timestamp(
    value: &str,
    column: &'static str,
    line: u64,
) -> Result<Option<NaiveDateTime>, DataError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(Some)
        .ok_or_else(|| invalid(line, column, value))
}

/// Blank amounts count as zero (orders without items)
fn amount(value: &str, column: &'static str, line: u64) -> Result<f64, DataError> {
    Ok(optional_amount(value, column, line)?.unwrap_or(0.0))
}

/// Blank cells stay absent
fn optional_amount(value: &str, column: &'static str, line: u64) -> Result<Option<f64>, DataError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    required_f64(value, column, line).map(Some)
}

fn required_f64(value: &str, column: &'static str, line: u64) -> Result<f64, DataError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(line, column, value))
}

/// Scores are stored as floats in the merged file ("5.0")
fn review_score(value: &str, line: u64) -> Result<Option<u8>, DataError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let score = trimmed
        .parse::<f64>()
        .map_err(|_| invalid(line, "review_score", value))?;
    if score.fract() != 0.0 || !(1.0..=5.0).contains(&score) {
        return Err(invalid(line, "review_score", value));
    }
    Ok(Some(score as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d500_ecommerce_overview::aggregator::{
        payment_review_correlation, spend_over_time,
    };

    const HEADER: &str = "order_id,customer_id,customer_unique_id,customer_city,customer_state,\
seller_id,seller_city,seller_state,order_status,order_purchase_timestamp,order_approved_at,\
order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date,\
payment_type,payment_value,review_score,product_id,product_category_name_english,price,\
freight_value,extra_column";

    #[test]
    fn test_parse_orders() {
        let text = format!(
            "\u{FEFF}{}\n\
o1,c1,u1,sao paulo,SP,s1,campinas,SP,delivered,2017-10-02 10:56:33,2017-10-02 11:07:15,\
2017-10-04 19:55:00,2017-10-10 21:25:13,2017-10-18 00:00:00,\
credit_card,18.12,4.0,p1,housewares,29.99,8.72,x\n\
o2,c2,u2,rio,RJ,s2,curitiba,PR,shipped,2018-01-01 08:00:00,,,,2018-01-20,,,,,,,,y\n",
            HEADER
        );

        let rows = parse_orders_csv(&text).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.order_id, "o1");
        assert_eq!(first.customer_state, "SP");
        assert_eq!(first.payment_value, Some(18.12));
        assert_eq!(first.review_score, Some(4));
        assert_eq!(first.product_category.as_deref(), Some("housewares"));
        assert_eq!(
            first.approval_date(),
            NaiveDate::from_ymd_opt(2017, 10, 2)
        );

        let second = &rows[1];
        assert_eq!(second.order_approved_at, None);
        assert_eq!(second.payment_type, "not_defined");
        assert_eq!(second.payment_value, None);
        assert_eq!(second.payment_amount(), 0.0);
        assert_eq!(second.price, 0.0);
        assert_eq!(second.review_score, None);
        assert_eq!(second.product_id, None);
        assert!(second.order_estimated_delivery_date.is_some());
    }

    #[test]
    fn test_missing_required_column() {
        let text = "order_id,customer_id\no1,c1\n";
        let err = parse_orders_csv(text).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }

    #[test]
    fn test_invalid_timestamp_reports_line() {
        let text = format!(
            "{}\no1,c1,u1,x,SP,s1,y,SP,delivered,,not-a-date,,,,boleto,1,5,p,cat,1,1,\n",
            HEADER
        );
        match parse_orders_csv(&text) {
            Err(DataError::InvalidField { line, column, value }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "order_approved_at");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_review_score_out_of_range() {
        assert!(review_score("6", 1).is_err());
        assert!(review_score("4.5", 1).is_err());
        assert_eq!(review_score("1", 1).unwrap(), Some(1));
    }

    #[test]
    fn test_timestamp_formats() {
        let column = "order_approved_at";
        assert!(timestamp("2018-02-03 04:05:06", column, 1).unwrap().is_some());
        assert!(timestamp("2018-02-03T04:05:06.5", column, 1).unwrap().is_some());
        assert_eq!(
            timestamp("2018-02-03", column, 1).unwrap(),
            NaiveDate::from_ymd_opt(2018, 2, 3).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(timestamp("  ", column, 1).unwrap(), None);
        assert!(matches!(
            timestamp("03/02/2018", column, 7),
            Err(DataError::InvalidField { line: 7, .. })
        ));
    }

    #[test]
    fn test_blank_payment_left_out_of_correlation() {
        let text = format!(
            "{}\n\
o1,c1,u1,x,SP,s1,y,SP,delivered,,2018-01-01,,,,boleto,10,1,p1,toys,1,1,\n\
o2,c2,u2,x,SP,s1,y,SP,delivered,,2018-01-01,,,,boleto,20,2,p1,toys,1,1,\n\
o3,c3,u3,x,SP,s1,y,SP,delivered,,2018-01-02,,,,boleto,30,3,p1,toys,1,1,\n\
o4,c4,u4,x,SP,s1,y,SP,delivered,,2018-01-02,,,,boleto,,5,p1,toys,1,1,\n",
            HEADER
        );
        let rows = parse_orders_csv(&text).unwrap();

        let corr = payment_review_correlation(&rows);
        assert_eq!(corr.sample_size, 3);
        assert!((corr.coefficient.unwrap() - 1.0).abs() < 1e-9);

        let spend = spend_over_time(&rows);
        assert_eq!(spend[1].total_spend, 30.0);
    }

    #[test]
    fn test_parse_geolocation() {
        let text = "customer_unique_id,geolocation_lat,geolocation_lng,\
geolocation_city,geolocation_state\n\
u1,-23.54,-46.63,sao paulo,SP\n\
u2,-22.90,-43.17,,\n";
        let records = parse_geolocation_csv(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].geolocation_state.as_deref(), Some("SP"));
        assert_eq!(records[1].geolocation_city, None);
        assert_eq!(records[1].geolocation_lng, -43.17);
    }

    #[test]
    fn test_geolocation_requires_coordinates() {
        let text = "customer_unique_id,geolocation_lat,geolocation_lng\nu1,,-46.63\n";
        assert!(matches!(
            parse_geolocation_csv(text),
            Err(DataError::InvalidField {
                column: "geolocation_lat",
                ..
            })
        ));
    }
}
