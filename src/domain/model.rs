use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::utils::error::{DashboardError, Result};

/// Raw row as returned by a data source, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn id(&self) -> Option<i64> {
        self.data.get("id").and_then(|v| v.as_i64())
    }

    /// Decodes the row into one of the typed models below.
    pub fn decode<T: DeserializeOwned>(&self, entity: &str) -> Result<T> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| {
            DashboardError::DecodeError {
                entity: entity.to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: object.into_iter().collect(),
        }
    }
}

/// Decodes every row, failing on the first bad one.
pub fn decode_all<T: DeserializeOwned>(entity: &str, records: &[Record]) -> Result<Vec<T>> {
    records.iter().map(|r| r.decode(entity)).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reservation {
    #[serde(default, deserialize_with = "odoo::optional_date")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "odoo::optional_date")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(default = "no_feedback")]
    pub nps_score: i64,
    #[serde(default)]
    pub service_ids: BTreeSet<i64>,
}

fn no_feedback() -> i64 {
    -1
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomState {
    Available,
    Reserved,
    UnderMaintenance,
    Other(String),
}

impl From<&str> for RoomState {
    fn from(value: &str) -> Self {
        match value {
            "available" => RoomState::Available,
            "reserved" => RoomState::Reserved,
            "under_maintenance" => RoomState::UnderMaintenance,
            other => RoomState::Other(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for RoomState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = odoo::optional_string(deserializer)?;
        Ok(RoomState::from(raw.as_deref().unwrap_or_default()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Room {
    pub state: RoomState,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Service {
    pub id: i64,
    #[serde(rename = "service_id", default, deserialize_with = "odoo::string_or_empty")]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, deserialize_with = "odoo::optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "odoo::number_or_zero")]
    pub revpar: f64,
    #[serde(default, deserialize_with = "odoo::number_or_zero")]
    pub adr: f64,
    #[serde(default, deserialize_with = "odoo::number_or_zero")]
    pub occupancy_rate: f64,
    #[serde(default)]
    pub loyal_guests: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "odoo::string_or_empty")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationMetrics {
    pub count: usize,
    pub check_ins: usize,
    pub check_outs: usize,
    pub current_stays: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsMetrics {
    pub score: i64,
    pub promoters_pct: i64,
    pub neutrals_pct: i64,
    pub detractors_pct: i64,
    pub promoters: usize,
    pub neutrals: usize,
    pub detractors: usize,
    pub total_feedback: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub reserved: usize,
    pub free: usize,
    pub under_maintenance: usize,
    /// Rooms whose state matched none of the above; excluded from the counts.
    pub unrecognized: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOccurrence {
    pub service_id: i64,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDisplay {
    pub revpar: String,
    pub adr: String,
    pub occupancy: String,
    pub loyal_guests: i64,
}

impl Default for AnalyticsDisplay {
    fn default() -> Self {
        Self {
            revpar: "0".to_string(),
            adr: "0".to_string(),
            occupancy: "0.0%".to_string(),
            loyal_guests: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub company_name: String,
    pub reservations: ReservationMetrics,
    pub nps: NpsMetrics,
    pub rooms: RoomOccupancy,
    pub services: Vec<ServiceOccurrence>,
    pub analytics: AnalyticsDisplay,
    pub room_chart: Option<ChartData>,
    pub services_chart: Option<ChartData>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Odoo wire conventions: unset scalars come back as `false`.
mod odoo {
    use chrono::NaiveDate;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn optional_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) => Ok(Some(s)),
            Value::Bool(false) | Value::Null => Ok(None),
            other => Err(D::Error::custom(format!("expected string, got {}", other))),
        }
    }

    pub fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(optional_string(d)?.unwrap_or_default())
    }

    pub fn optional_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match optional_string(d)? {
            None => Ok(None),
            // datetime fields arrive as "YYYY-MM-DD HH:MM:SS"; the day is enough here
            Some(s) => NaiveDate::parse_from_str(s.get(..10).unwrap_or(&s), "%Y-%m-%d")
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid date '{}': {}", s, e))),
        }
    }

    pub fn number_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| D::Error::custom("number out of range")),
            Value::Bool(false) | Value::Null => Ok(0.0),
            other => Err(D::Error::custom(format!("expected number, got {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => Record::from(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_decode_reservation() {
        let r = record(json!({
            "id": 7,
            "check_in_date": "2026-10-19",
            "check_out_date": "2026-10-22",
            "nps_score": 9,
            "service_ids": [3, 1, 3]
        }));

        let reservation: Reservation = r.decode("hotel.reservation").unwrap();
        assert_eq!(reservation.check_in_date, NaiveDate::from_ymd_opt(2026, 10, 19));
        assert_eq!(reservation.nps_score, 9);
        assert_eq!(reservation.service_ids.len(), 2);
        assert_eq!(r.id(), Some(7));
    }

    #[test]
    fn test_decode_reservation_with_odoo_false_values() {
        let r = record(json!({"check_in_date": false, "check_out_date": false}));
        let reservation: Reservation = r.decode("hotel.reservation").unwrap();

        assert!(reservation.check_in_date.is_none());
        assert_eq!(reservation.nps_score, -1);
        assert!(reservation.service_ids.is_empty());
    }

    #[test]
    fn test_decode_bad_date_is_an_error() {
        let r = record(json!({"check_in_date": "19/10/2026"}));
        let err = r.decode::<Reservation>("hotel.reservation").unwrap_err();
        assert!(matches!(err, DashboardError::DecodeError { .. }));
    }

    #[test]
    fn test_decode_room_states() {
        let rooms: Vec<Room> = decode_all(
            "hotel.room",
            &[
                record(json!({"state": "available"})),
                record(json!({"state": "under_maintenance"})),
                record(json!({"state": "flooded"})),
                record(json!({"state": false})),
            ],
        )
        .unwrap();

        assert_eq!(rooms[0].state, RoomState::Available);
        assert_eq!(rooms[1].state, RoomState::UnderMaintenance);
        assert_eq!(rooms[2].state, RoomState::Other("flooded".to_string()));
        assert_eq!(rooms[3].state, RoomState::Other(String::new()));
    }

    #[test]
    fn test_decode_service_label_and_analysis() {
        let service: Service = record(json!({"id": 4, "service_id": "Spa"}))
            .decode("hotel.services")
            .unwrap();
        assert_eq!(service.label, "Spa");

        let analysis: AnalysisRecord = record(json!({
            "date": "2026-10-18",
            "revpar": 120,
            "adr": 95.5,
            "occupancy_rate": false,
            "loyal_guests": 12
        }))
        .decode("hotel.analysis")
        .unwrap();
        assert_eq!(analysis.revpar, 120.0);
        assert_eq!(analysis.occupancy_rate, 0.0);
        assert_eq!(analysis.loyal_guests, 12);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let value = serde_json::to_value(DashboardSummary::default()).unwrap();
        assert!(value.get("companyName").is_some());
        assert!(value["reservations"].get("checkIns").is_some());
        assert!(value["nps"].get("promotersPct").is_some());
        assert_eq!(value["analytics"]["occupancy"], "0.0%");
    }
}
