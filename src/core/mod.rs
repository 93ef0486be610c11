pub mod actions;
pub mod charts;
pub mod dashboard;
pub mod metrics;
pub mod report;
pub mod store;

pub use crate::domain::model::{DashboardSummary, Record};
pub use crate::domain::ports::{ActionService, Clock, DataSource, Storage, TimeZoneResolver};
pub use crate::utils::error::Result;
