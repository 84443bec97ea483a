//! FILENAME: core/trend-engine/src/lib.rs
//! Notification trend subsystem.
//!
//! This crate buckets notification records into the time series the
//! dashboard charts render. It depends on `engine` for the record model and
//! date normalization.
//!
//! Layers:
//! - `definition`: Serializable configuration (which columns, which flags)
//! - `series`: Chart-ready output shapes and bucket keys
//! - `aggregator`: Bucketing and gap-filling
//! - `period`: Latest-month selection and period labels

pub mod aggregator;
pub mod definition;
pub mod period;
pub mod series;

pub use definition::*;
pub use aggregator::{days_in_month, TrendAggregator};
pub use period::{latest_date, latest_month, report_period_label};
pub use series::*;
