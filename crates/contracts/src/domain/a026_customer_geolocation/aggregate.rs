use serde::{Deserialize, Serialize};

/// Customer location point used by the map view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeolocationRecord {
    /// Deduplication key
    pub customer_unique_id: String,
    pub geolocation_lat: f64,
    pub geolocation_lng: f64,
    pub geolocation_city: Option<String>,
    pub geolocation_state: Option<String>,
}
