pub mod aggregate;

pub use aggregate::GeolocationRecord;
