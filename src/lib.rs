pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use self::config::CliArgs;
pub use self::config::TomlConfig;

pub use self::adapters::{
    odoo::OdooClient, snapshot::SnapshotSource, storage::LocalStorage, time::FixedClock,
    time::NamedTimeZone, time::SystemClock, web_action::WebActionService,
};
pub use self::core::{
    actions::{DashboardAction, DashboardActions},
    dashboard::{HotelDashboard, RefreshReport, Slice, SliceFailure},
    store::SummaryStore,
};
pub use self::domain::model::DashboardSummary;
pub use self::utils::error::{DashboardError, Result};
