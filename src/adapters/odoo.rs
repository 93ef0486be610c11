use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::domain::model::Record;
use crate::domain::ports::{ConfigProvider, DataSource, RecordQuery};
use crate::utils::error::{DashboardError, Result};

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: RpcParams<'a>,
    id: u64,
}

#[derive(Debug, Serialize)]
struct RpcParams<'a> {
    service: &'a str,
    method: &'a str,
    args: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<RpcErrorData>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorData {
    #[serde(default)]
    message: String,
}

/// Reads hotel records from an Odoo server over its `/jsonrpc` endpoint.
pub struct OdooClient {
    client: Client,
    endpoint: String,
    database: String,
    login: String,
    password: String,
    uid: OnceCell<i64>,
    next_id: AtomicU64,
}

impl OdooClient {
    pub fn new(
        base_url: &str,
        database: &str,
        login: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/jsonrpc", base_url.trim_end_matches('/')),
            database: database.to_string(),
            login: login.to_string(),
            password: password.to_string(),
            uid: OnceCell::new(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.server_url(),
            config.database(),
            config.login(),
            config.password(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    async fn call(&self, service: &str, method: &str, args: Vec<Value>) -> Result<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "call",
            params: RpcParams {
                service,
                method,
                args,
            },
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        tracing::debug!("RPC {}.{} -> {}", service, method, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: RpcResponse = response.json().await?;
        if let Some(error) = body.error {
            let message = match error.data {
                Some(data) if !data.message.is_empty() => data.message,
                _ => error.message,
            };
            return Err(DashboardError::RpcError {
                method: method.to_string(),
                code: error.code,
                message,
            });
        }

        Ok(body.result.unwrap_or(Value::Null))
    }

    async fn login(&self) -> Result<i64> {
        let result = self
            .call(
                "common",
                "login",
                vec![json!(self.database), json!(self.login), json!(self.password)],
            )
            .await?;
        match result.as_i64() {
            Some(uid) => {
                tracing::debug!("Authenticated as uid {}", uid);
                Ok(uid)
            }
            None => Err(DashboardError::AuthenticationError {
                database: self.database.clone(),
                login: self.login.clone(),
            }),
        }
    }

    /// Logs in once; concurrent and later calls reuse the uid.
    async fn uid(&self) -> Result<i64> {
        self.uid.get_or_try_init(|| self.login()).await.copied()
    }

    async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value> {
        let uid = self.uid().await?;
        self.call(
            "object",
            "execute_kw",
            vec![
                json!(self.database),
                json!(uid),
                json!(self.password),
                json!(model),
                json!(method),
                args,
                kwargs,
            ],
        )
        .await
    }
}

fn into_records(entity: &str, value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Array(rows) => rows
            .into_iter()
            .map(|row| match row {
                Value::Object(object) => Ok(Record::from(object)),
                other => Err(DashboardError::DecodeError {
                    entity: entity.to_string(),
                    message: format!("expected an object per row, got {}", other),
                }),
            })
            .collect(),
        other => Err(DashboardError::DecodeError {
            entity: entity.to_string(),
            message: format!("expected a list of rows, got {}", other),
        }),
    }
}

#[async_trait]
impl DataSource for OdooClient {
    async fn fetch_records(&self, entity: &str, query: &RecordQuery) -> Result<Vec<Record>> {
        let mut kwargs = serde_json::Map::new();
        if !query.fields.is_empty() {
            kwargs.insert("fields".to_string(), json!(query.fields));
        }
        if let Some(order) = &query.order {
            kwargs.insert("order".to_string(), json!(order));
        }

        let result = self
            .execute_kw(
                entity,
                "search_read",
                json!([query.domain]),
                Value::Object(kwargs),
            )
            .await?;
        let records = into_records(entity, result)?;
        tracing::debug!("Fetched {} {} record(s)", records.len(), entity);
        Ok(records)
    }

    async fn fetch_fields(&self, entity: &str, id: i64, fields: &[&str]) -> Result<Record> {
        let result = self
            .execute_kw(entity, "read", json!([[id]]), json!({ "fields": fields }))
            .await?;
        into_records(entity, result)?
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::RecordNotFound {
                entity: entity.to_string(),
                id,
            })
    }
}
