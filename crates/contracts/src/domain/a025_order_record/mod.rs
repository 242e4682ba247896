pub mod aggregate;

pub use aggregate::{OrderRow, PAYMENT_TYPE_NOT_DEFINED};
