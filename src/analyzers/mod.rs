//! Aggregations over the visit table.
//!
//! Every view filters the shared [`Dataset`](crate::dataset::Dataset) by year
//! and/or normalized neighborhood, then groups and sums visits and unique
//! patients. Nothing is cached; each call recomputes from the records.

pub mod aggregate;
pub mod series;
pub mod table;
pub mod types;
pub mod utility;
