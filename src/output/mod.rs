//! Output formatting: console table, CSV and JSON export

pub mod formatter;
