//! Tabular upload core for the sales-quota demo dashboard.
//!
//! [`data::load`] turns an uploaded CSV, Excel or Parquet file into an
//! in-memory [`data::Table`], or a [`data::LoadError`] saying why it could not.

pub mod config;
pub mod data;
