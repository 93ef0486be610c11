use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::core::charts::{room_chart, services_chart};
use crate::core::metrics::{
    compute_analytics_display, compute_nps, compute_reservation_metrics, compute_room_occupancy,
    compute_service_occurrences,
};
use crate::core::store::SummaryStore;
use crate::domain::model::{
    decode_all, AnalysisRecord, Company, DashboardSummary, Reservation, Room, Service,
};
use crate::domain::ports::{Clock, DataSource, RecordQuery, TimeZoneResolver};
use crate::utils::error::Result;

pub const COMPANY_MODEL: &str = "res.company";
pub const RESERVATION_MODEL: &str = "hotel.reservation";
pub const ROOM_MODEL: &str = "hotel.room";
pub const SERVICE_MODEL: &str = "hotel.services";
pub const ANALYSIS_MODEL: &str = "hotel.analysis";

/// Independently refreshed part of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slice {
    Company,
    Reservations,
    Rooms,
    Services,
    Analytics,
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slice::Company => "company",
            Slice::Reservations => "reservations",
            Slice::Rooms => "rooms",
            Slice::Services => "services",
            Slice::Analytics => "analytics",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceFailure {
    pub slice: Slice,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub summary: DashboardSummary,
    pub failures: Vec<SliceFailure>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct HotelDashboard<D: DataSource, C: Clock, Z: TimeZoneResolver> {
    source: D,
    clock: C,
    zone: Z,
    company_id: i64,
    store: SummaryStore,
    refreshing: Mutex<()>,
}

impl<D: DataSource, C: Clock, Z: TimeZoneResolver> HotelDashboard<D, C, Z> {
    pub fn new(source: D, clock: C, zone: Z, company_id: i64) -> Self {
        Self::with_store(source, clock, zone, company_id, SummaryStore::new())
    }

    pub fn with_store(source: D, clock: C, zone: Z, company_id: i64, store: SummaryStore) -> Self {
        Self {
            source,
            clock,
            zone,
            company_id,
            store,
            refreshing: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &SummaryStore {
        &self.store
    }

    async fn fetch_company(&self) -> Result<Company> {
        let record = self
            .source
            .fetch_fields(COMPANY_MODEL, self.company_id, &["name"])
            .await?;
        record.decode(COMPANY_MODEL)
    }

    async fn fetch_reservations(&self) -> Result<Vec<Reservation>> {
        let query = RecordQuery::fields(&[
            "check_in_date",
            "check_out_date",
            "nps_score",
            "service_ids",
        ]);
        let records = self.source.fetch_records(RESERVATION_MODEL, &query).await?;
        decode_all(RESERVATION_MODEL, &records)
    }

    async fn fetch_rooms(&self) -> Result<Vec<Room>> {
        let records = self
            .source
            .fetch_records(ROOM_MODEL, &RecordQuery::fields(&["state"]))
            .await?;
        decode_all(ROOM_MODEL, &records)
    }

    async fn fetch_services(&self) -> Result<Vec<Service>> {
        let records = self
            .source
            .fetch_records(SERVICE_MODEL, &RecordQuery::fields(&["service_id"]))
            .await?;
        decode_all(SERVICE_MODEL, &records)
    }

    async fn fetch_analyses(&self) -> Result<Vec<AnalysisRecord>> {
        let query = RecordQuery::fields(&["date", "revpar", "adr", "occupancy_rate", "loyal_guests"])
            .order_by("date asc, id asc");
        let records = self.source.fetch_records(ANALYSIS_MODEL, &query).await?;
        decode_all(ANALYSIS_MODEL, &records)
    }

    /// Fetches every record set concurrently and publishes the merged summary.
    ///
    /// Slices whose fetch fails keep the value from the previous snapshot.
    /// Overlapping calls run one after the other, so a slow refresh never
    /// publishes over a newer snapshot.
    pub async fn refresh(&self) -> RefreshReport {
        let _guard = self.refreshing.lock().await;
        tracing::debug!("Refreshing hotel dashboard");

        let (company, reservations, rooms, services, analyses) = tokio::join!(
            self.fetch_company(),
            self.fetch_reservations(),
            self.fetch_rooms(),
            self.fetch_services(),
            self.fetch_analyses(),
        );

        let now = self.clock.now();
        let zone = self.zone.time_zone();
        let mut summary = (*self.store.current()).clone();
        let mut failures = Vec::new();

        match company {
            Ok(company) => summary.company_name = company.name,
            Err(e) => record_failure(&mut failures, Slice::Company, e.to_string()),
        }

        match &reservations {
            Ok(reservations) => {
                summary.reservations = compute_reservation_metrics(reservations, now, zone);
                summary.nps = compute_nps(reservations);
                tracing::debug!(
                    "{} reservations, NPS {} from {} ratings",
                    summary.reservations.count,
                    summary.nps.score,
                    summary.nps.total_feedback
                );
            }
            Err(e) => record_failure(&mut failures, Slice::Reservations, e.to_string()),
        }

        match rooms {
            Ok(rooms) => {
                let occupancy = compute_room_occupancy(&rooms);
                if occupancy.unrecognized > 0 {
                    tracing::warn!(
                        "{} room(s) have an unrecognized state and were left out of the counts",
                        occupancy.unrecognized
                    );
                }
                summary.room_chart = Some(room_chart(&occupancy));
                summary.rooms = occupancy;
            }
            Err(e) => record_failure(&mut failures, Slice::Rooms, e.to_string()),
        }

        match (&reservations, services) {
            (Ok(reservations), Ok(services)) => {
                let occurrences = compute_service_occurrences(reservations, &services);
                summary.services_chart = Some(services_chart(&occurrences));
                summary.services = occurrences;
            }
            (_, Err(e)) => record_failure(&mut failures, Slice::Services, e.to_string()),
            (Err(_), Ok(_)) => record_failure(
                &mut failures,
                Slice::Services,
                "reservations unavailable".to_string(),
            ),
        }

        match analyses {
            Ok(analyses) => match compute_analytics_display(&analyses) {
                Some(display) => summary.analytics = display,
                None => tracing::debug!("No analysis records yet"),
            },
            Err(e) => record_failure(&mut failures, Slice::Analytics, e.to_string()),
        }

        summary.refreshed_at = Some(now);
        self.store.publish(summary.clone());

        if failures.is_empty() {
            tracing::info!("Dashboard refreshed");
        } else {
            tracing::warn!(
                "Dashboard refreshed with {} stale slice(s)",
                failures.len()
            );
        }

        RefreshReport { summary, failures }
    }

    /// Refreshes on every tick until `shutdown` resolves and returns the number
    /// of refreshes run. A shutdown signalled mid-refresh stops the loop once
    /// that refresh has published.
    pub async fn run_until<F>(&self, every: Duration, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(every);
        tokio::pin!(shutdown);
        let mut refreshes = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let report = self.refresh().await;
                    refreshes += 1;
                    if !report.is_complete() {
                        tracing::warn!("{} slice(s) kept their previous value", report.failures.len());
                    }
                }
            }
        }

        tracing::info!("Stopped after {} refresh(es)", refreshes);
        refreshes
    }
}

fn record_failure(failures: &mut Vec<SliceFailure>, slice: Slice, message: String) {
    tracing::error!("Error fetching {} data: {}", slice, message);
    failures.push(SliceFailure { slice, message });
}
