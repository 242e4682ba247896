pub mod csv_reader;
pub mod dataset;
