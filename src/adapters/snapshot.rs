use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::model::Record;
use crate::domain::ports::{DataSource, RecordQuery};
use crate::utils::error::{DashboardError, Result};

/// Serves records from a JSON export shaped as `{"hotel.room": [{...}, ...], ...}`.
///
/// Domains and ordering are not evaluated; rows come back as stored.
/// Requested fields are projected, with `id` always kept.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    entities: HashMap<String, Vec<Record>>,
}

impl SnapshotSource {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<serde_json::Map<String, serde_json::Value>>> =
            serde_json::from_str(content)?;
        let entities = raw
            .into_iter()
            .map(|(entity, rows)| (entity, rows.into_iter().map(Record::from).collect()))
            .collect();
        Ok(Self { entities })
    }

    fn rows(&self, entity: &str) -> &[Record] {
        self.entities.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }
    let data = record
        .data
        .iter()
        .filter(|(key, _)| key.as_str() == "id" || fields.iter().any(|f| f == *key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Record { data }
}

#[async_trait]
impl DataSource for SnapshotSource {
    async fn fetch_records(&self, entity: &str, query: &RecordQuery) -> Result<Vec<Record>> {
        if !self.entities.contains_key(entity) {
            tracing::warn!("Snapshot has no {} records", entity);
        }
        Ok(self
            .rows(entity)
            .iter()
            .map(|r| project(r, &query.fields))
            .collect())
    }

    async fn fetch_fields(&self, entity: &str, id: i64, fields: &[&str]) -> Result<Record> {
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        self.rows(entity)
            .iter()
            .find(|r| r.id() == Some(id))
            .map(|r| project(r, &fields))
            .ok_or_else(|| DashboardError::RecordNotFound {
                entity: entity.to_string(),
                id,
            })
    }
}
