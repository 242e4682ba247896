use contracts::domain::a026_customer_geolocation::GeolocationRecord;
use std::collections::HashSet;

/// Keep the first record of every customer, preserving encounter order
pub fn dedupe_by_customer(records: &[GeolocationRecord]) -> Vec<GeolocationRecord> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());

    records
        .iter()
        .filter(|record| seen.insert(record.customer_unique_id.as_str()))
        .cloned()
        .collect()
}
