use crate::domain::model::Record;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Parameters of a record search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordQuery {
    /// Odoo-style domain, e.g. `[["state", "=", "available"]]`. Empty matches everything.
    pub domain: Vec<serde_json::Value>,
    /// Fields to return. Empty returns all readable fields.
    pub fields: Vec<String>,
    pub order: Option<String>,
}

impl RecordQuery {
    pub fn fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn order_by(mut self, order: &str) -> Self {
        self.order = Some(order.to_string());
        self
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_records(&self, entity: &str, query: &RecordQuery) -> Result<Vec<Record>>;
    async fn fetch_fields(&self, entity: &str, id: i64, fields: &[&str]) -> Result<Record>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait TimeZoneResolver: Send + Sync {
    fn time_zone(&self) -> Tz;
}

#[async_trait]
pub trait ActionService: Send + Sync {
    async fn do_action(&self, reference: &str) -> Result<()>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn server_url(&self) -> &str;
    fn database(&self) -> &str;
    fn login(&self) -> &str;
    fn password(&self) -> &str;
    fn company_id(&self) -> i64;
    fn timeout_seconds(&self) -> u64;
}
