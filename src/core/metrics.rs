//! Aggregations over fetched hotel records.
//!
//! Every function here is pure: same input, same output, no I/O.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

use crate::domain::model::{
    AnalysisRecord, AnalyticsDisplay, NpsMetrics, Reservation, ReservationMetrics, Room,
    RoomOccupancy, RoomState, Service, ServiceOccurrence,
};

const NO_FEEDBACK: i64 = -1;

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Counts arrivals, departures and in-house stays relative to `reference`,
/// with dates read as calendar days in `zone`.
pub fn compute_reservation_metrics(
    reservations: &[Reservation],
    reference: DateTime<Utc>,
    zone: Tz,
) -> ReservationMetrics {
    let local_now = reference.with_timezone(&zone).naive_local();
    let today = local_now.date();

    let mut metrics = ReservationMetrics {
        count: reservations.len(),
        ..ReservationMetrics::default()
    };

    for reservation in reservations {
        if reservation.check_in_date == Some(today) {
            metrics.check_ins += 1;
        }
        if reservation.check_out_date == Some(today) {
            metrics.check_outs += 1;
        }
        if let (Some(check_in), Some(check_out)) =
            (reservation.check_in_date, reservation.check_out_date)
        {
            if start_of_day(check_in) <= local_now && local_now <= start_of_day(check_out) {
                metrics.current_stays += 1;
            }
        }
    }

    metrics
}

/// Rounds halves toward positive infinity (-12.5 -> -12, 12.5 -> 13).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn percentage(part: usize, total: usize) -> i64 {
    round_half_up(part as f64 / total as f64 * 100.0)
}

pub fn compute_nps(reservations: &[Reservation]) -> NpsMetrics {
    let mut nps = NpsMetrics::default();

    for reservation in reservations {
        match reservation.nps_score {
            NO_FEEDBACK => {}
            score if score >= 9 => nps.promoters += 1,
            score if score >= 7 => nps.neutrals += 1,
            _ => nps.detractors += 1,
        }
    }

    nps.total_feedback = nps.promoters + nps.neutrals + nps.detractors;
    if nps.total_feedback == 0 {
        return nps;
    }

    let total = nps.total_feedback as f64;
    nps.score = round_half_up((nps.promoters as f64 - nps.detractors as f64) / total * 100.0);
    nps.promoters_pct = percentage(nps.promoters, nps.total_feedback);
    nps.neutrals_pct = percentage(nps.neutrals, nps.total_feedback);
    nps.detractors_pct = percentage(nps.detractors, nps.total_feedback);
    nps
}

pub fn compute_room_occupancy(rooms: &[Room]) -> RoomOccupancy {
    rooms
        .iter()
        .fold(RoomOccupancy::default(), |mut acc, room| {
            match room.state {
                RoomState::Available => acc.free += 1,
                RoomState::Reserved => acc.reserved += 1,
                RoomState::UnderMaintenance => acc.under_maintenance += 1,
                RoomState::Other(_) => acc.unrecognized += 1,
            }
            acc
        })
}

/// Number of reservations using each service, in `services` order.
pub fn compute_service_occurrences(
    reservations: &[Reservation],
    services: &[Service],
) -> Vec<ServiceOccurrence> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for reservation in reservations {
        for service_id in &reservation.service_ids {
            *counts.entry(*service_id).or_default() += 1;
        }
    }

    services
        .iter()
        .map(|service| ServiceOccurrence {
            service_id: service.id,
            label: service.label.clone(),
            count: counts.get(&service.id).copied().unwrap_or(0),
        })
        .collect()
}

/// One decimal, halves away from zero on the scaled value, so 1.45 -> "1.5".
fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// Compact money figure: `1.3M`, `4.2k`, or the whole part below a thousand.
pub fn format_figure(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value >= 1_000_000.0 {
        format!("{}M", one_decimal(value / 1_000_000.0))
    } else if value >= 1_000.0 {
        format!("{}k", one_decimal(value / 1_000.0))
    } else {
        let whole = value.floor();
        if whole == 0.0 {
            "0".to_string()
        } else {
            format!("{:.0}", whole)
        }
    }
}

pub fn format_occupancy(rate: f64) -> String {
    if !rate.is_finite() {
        return "0.0%".to_string();
    }
    format!("{}%", one_decimal(rate * 100.0))
}

/// Latest record by `date`; among equal or missing dates the later position wins.
pub fn most_recent(records: &[AnalysisRecord]) -> Option<&AnalysisRecord> {
    records
        .iter()
        .enumerate()
        .max_by_key(|(index, record)| (record.date, *index))
        .map(|(_, record)| record)
}

pub fn compute_analytics_display(records: &[AnalysisRecord]) -> Option<AnalyticsDisplay> {
    let latest = most_recent(records)?;
    Some(AnalyticsDisplay {
        revpar: format_figure(latest.revpar),
        adr: format_figure(latest.adr),
        occupancy: format_occupancy(latest.occupancy_rate),
        loyal_guests: latest.loyal_guests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(check_in: NaiveDate, check_out: NaiveDate) -> Reservation {
        Reservation {
            check_in_date: Some(check_in),
            check_out_date: Some(check_out),
            nps_score: -1,
            service_ids: BTreeSet::new(),
        }
    }

    fn rated(score: i64) -> Reservation {
        Reservation {
            nps_score: score,
            ..stay(date(2026, 1, 1), date(2026, 1, 2))
        }
    }

    fn with_services(ids: &[i64]) -> Reservation {
        Reservation {
            service_ids: ids.iter().copied().collect(),
            ..rated(-1)
        }
    }

    fn room(state: &str) -> Room {
        Room {
            state: RoomState::from(state),
        }
    }

    fn analysis(day: Option<NaiveDate>, revpar: f64) -> AnalysisRecord {
        AnalysisRecord {
            date: day,
            revpar,
            adr: 0.0,
            occupancy_rate: 0.0,
            loyal_guests: 0,
        }
    }

    #[test]
    fn test_reservation_metrics_empty() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(
            compute_reservation_metrics(&[], now, chrono_tz::UTC),
            ReservationMetrics::default()
        );
    }

    #[test]
    fn test_reservation_metrics_today() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let reservations = vec![
            stay(date(2026, 10, 19), date(2026, 10, 21)), // arriving, staying
            stay(date(2026, 10, 17), date(2026, 10, 19)), // leaving at midnight boundary
            stay(date(2026, 10, 18), date(2026, 10, 20)), // staying
            stay(date(2026, 11, 1), date(2026, 11, 3)),   // future
        ];

        let metrics = compute_reservation_metrics(&reservations, now, chrono_tz::UTC);

        assert_eq!(metrics.count, 4);
        assert_eq!(metrics.check_ins, 1);
        assert_eq!(metrics.check_outs, 1);
        assert_eq!(metrics.current_stays, 2);
        assert!(metrics.check_ins <= metrics.count && metrics.check_outs <= metrics.count);
    }

    #[test]
    fn test_reservation_metrics_use_local_calendar_day() {
        // 23:30 UTC on the 19th is already the 20th in Tokyo.
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        let reservations = vec![stay(date(2026, 10, 20), date(2026, 10, 22))];

        let utc = compute_reservation_metrics(&reservations, now, chrono_tz::UTC);
        let tokyo = compute_reservation_metrics(&reservations, now, chrono_tz::Asia::Tokyo);

        assert_eq!(utc.check_ins, 0);
        assert_eq!(utc.current_stays, 0);
        assert_eq!(tokyo.check_ins, 1);
        assert_eq!(tokyo.current_stays, 1);
    }

    #[test]
    fn test_reservation_metrics_skip_missing_dates() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let reservations = vec![Reservation {
            check_in_date: Some(date(2026, 10, 19)),
            check_out_date: None,
            nps_score: -1,
            service_ids: BTreeSet::new(),
        }];

        let metrics = compute_reservation_metrics(&reservations, now, chrono_tz::UTC);
        assert_eq!(metrics.check_ins, 1);
        assert_eq!(metrics.check_outs, 0);
        assert_eq!(metrics.current_stays, 0);
    }

    #[test]
    fn test_nps_without_feedback_is_zero() {
        assert_eq!(compute_nps(&[]), NpsMetrics::default());
        assert_eq!(compute_nps(&[rated(-1), rated(-1)]).score, 0);
        assert_eq!(compute_nps(&[rated(-1)]).promoters_pct, 0);
    }

    #[test]
    fn test_nps_classification() {
        let reservations: Vec<Reservation> = [10, 10, 9, 8, 7, 6, 5, -1, 9, 9]
            .into_iter()
            .map(rated)
            .collect();

        let nps = compute_nps(&reservations);

        assert_eq!(nps.promoters, 5);
        assert_eq!(nps.neutrals, 2);
        assert_eq!(nps.detractors, 2);
        assert_eq!(nps.total_feedback, 9);
        assert_eq!(nps.score, 33);
        assert_eq!(nps.promoters_pct, 56);
        assert_eq!(nps.neutrals_pct, 22);
        assert_eq!(nps.detractors_pct, 22);
    }

    #[test]
    fn test_nps_negative_half_rounds_up() {
        // (1 - 2) / 8 * 100 = -12.5
        let reservations: Vec<Reservation> = [9, 0, 0, 7, 7, 7, 7, 7].into_iter().map(rated).collect();
        assert_eq!(compute_nps(&reservations).score, -12);
    }

    #[test]
    fn test_room_occupancy() {
        let rooms = vec![
            room("available"),
            room("available"),
            room("reserved"),
            room("under_maintenance"),
        ];

        let occupancy = compute_room_occupancy(&rooms);

        assert_eq!(occupancy.free, 2);
        assert_eq!(occupancy.reserved, 1);
        assert_eq!(occupancy.under_maintenance, 1);
        assert_eq!(occupancy.unrecognized, 0);
    }

    #[test]
    fn test_room_occupancy_ignores_unknown_states() {
        let occupancy = compute_room_occupancy(&[room("reserved"), room("demolished")]);
        assert_eq!(occupancy.reserved, 1);
        assert_eq!(occupancy.free + occupancy.under_maintenance, 0);
        assert_eq!(occupancy.unrecognized, 1);
    }

    #[test]
    fn test_service_occurrences_keep_service_order() {
        let services = vec![
            Service { id: 3, label: "Spa".to_string() },
            Service { id: 1, label: "Breakfast".to_string() },
            Service { id: 2, label: "Parking".to_string() },
        ];
        let reservations = vec![
            with_services(&[1, 3]),
            with_services(&[1]),
            with_services(&[]),
            with_services(&[1, 9]),
        ];

        let occurrences = compute_service_occurrences(&reservations, &services);

        let ids: Vec<i64> = occurrences.iter().map(|o| o.service_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        let counts: Vec<usize> = occurrences.iter().map(|o| o.count).collect();
        assert_eq!(counts, vec![1, 3, 0]);
        // unknown service 9 is not a known membership pair
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_format_figure() {
        assert_eq!(format_figure(1_250_000.0), "1.3M");
        assert_eq!(format_figure(4_200.0), "4.2k");
        assert_eq!(format_figure(850.0), "850");
        assert_eq!(format_figure(999.99), "999");
        assert_eq!(format_figure(1_000.0), "1.0k");
        assert_eq!(format_figure(f64::NAN), "0");
        assert_eq!(format_figure(0.4), "0");
        assert_eq!(format_figure(-0.0), "0");
        assert_eq!(format_figure(-12.5), "-13");
    }

    #[test]
    fn test_format_figure_rounds_tenths_half_away_from_zero() {
        assert_eq!(format_figure(1_450.0), "1.5k");
        assert_eq!(format_figure(1_250.0), "1.3k");
        assert_eq!(format_figure(2_450_000.0), "2.5M");
        assert_eq!(format_occupancy(0.0125), "1.3%");
    }

    #[test]
    fn test_format_figure_keeps_large_negative_magnitudes() {
        assert_eq!(format_figure(-1e20), "-100000000000000000000");
        assert_eq!(format_figure(-2_500_000.0), "-2500000");
    }

    #[test]
    fn test_format_occupancy() {
        assert_eq!(format_occupancy(0.734), "73.4%");
        assert_eq!(format_occupancy(0.0), "0.0%");
        assert_eq!(format_occupancy(1.0), "100.0%");
    }

    #[test]
    fn test_analytics_display_picks_latest_dated_record() {
        let records = vec![
            analysis(Some(date(2026, 10, 18)), 2_000.0),
            analysis(Some(date(2026, 10, 19)), 3_000.0),
            analysis(Some(date(2026, 10, 17)), 1_000.0),
        ];

        let display = compute_analytics_display(&records).unwrap();
        assert_eq!(display.revpar, "3.0k");
    }

    #[test]
    fn test_analytics_display_falls_back_to_last_position() {
        let records = vec![analysis(None, 100.0), analysis(None, 200.0)];
        assert_eq!(compute_analytics_display(&records).unwrap().revpar, "200");
        assert!(compute_analytics_display(&[]).is_none());
    }

    #[test]
    fn test_analytics_display_formats_every_field() {
        let record = AnalysisRecord {
            date: Some(date(2026, 10, 19)),
            revpar: 1_250_000.0,
            adr: 4_200.0,
            occupancy_rate: 0.734,
            loyal_guests: 17,
        };

        let display = compute_analytics_display(&[record]).unwrap();
        assert_eq!(display.revpar, "1.3M");
        assert_eq!(display.adr, "4.2k");
        assert_eq!(display.occupancy, "73.4%");
        assert_eq!(display.loyal_guests, 17);
    }

    #[test]
    fn test_aggregations_are_repeatable() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let reservations = vec![
            stay(date(2026, 10, 19), date(2026, 10, 20)),
            rated(10),
            with_services(&[1]),
        ];
        let services = vec![Service { id: 1, label: "Spa".to_string() }];

        let first = (
            compute_reservation_metrics(&reservations, now, chrono_tz::UTC),
            compute_nps(&reservations),
            compute_service_occurrences(&reservations, &services),
        );
        let second = (
            compute_reservation_metrics(&reservations, now, chrono_tz::UTC),
            compute_nps(&reservations),
            compute_service_occurrences(&reservations, &services),
        );
        assert_eq!(first, second);
    }
}
