pub mod a025_order_record;
pub mod a026_customer_geolocation;
