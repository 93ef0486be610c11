use std::fmt;

use crate::domain::model::DashboardSummary;
use crate::utils::error::Result;

pub fn render_json(summary: &DashboardSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Plain-text KPI board for terminals.
pub fn render_text(summary: &DashboardSummary) -> String {
    TextBoard(summary).to_string()
}

struct TextBoard<'a>(&'a DashboardSummary);

impl fmt::Display for TextBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        let title = if summary.company_name.is_empty() {
            "Hotel dashboard"
        } else {
            summary.company_name.as_str()
        };

        writeln!(f, "{}", title)?;
        if let Some(at) = summary.refreshed_at {
            writeln!(f, "Refreshed: {}", at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        }
        writeln!(f)?;

        let r = &summary.reservations;
        writeln!(f, "Reservations   {:>6}", r.count)?;
        writeln!(f, "Check-ins      {:>6}", r.check_ins)?;
        writeln!(f, "Check-outs     {:>6}", r.check_outs)?;
        writeln!(f, "In house       {:>6}", r.current_stays)?;
        writeln!(f)?;

        let n = &summary.nps;
        writeln!(
            f,
            "NPS {:>4}   promoters {}%  neutrals {}%  detractors {}%",
            n.score, n.promoters_pct, n.neutrals_pct, n.detractors_pct
        )?;
        writeln!(f)?;

        let a = &summary.analytics;
        writeln!(
            f,
            "RevPAR {}   ADR {}   Occupancy {}   Loyal guests {}",
            a.revpar, a.adr, a.occupancy, a.loyal_guests
        )?;
        writeln!(f)?;

        let rooms = &summary.rooms;
        writeln!(
            f,
            "Rooms: {} reserved, {} free, {} under maintenance",
            rooms.reserved, rooms.free, rooms.under_maintenance
        )?;

        if !summary.services.is_empty() {
            writeln!(f, "Services:")?;
            for service in &summary.services {
                writeln!(f, "  {:<24} {:>5}", service.label, service.count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{NpsMetrics, ServiceOccurrence};

    #[test]
    fn test_render_text_lists_kpis() {
        let summary = DashboardSummary {
            company_name: "Hotel Aurora".to_string(),
            nps: NpsMetrics {
                score: 33,
                promoters_pct: 56,
                ..NpsMetrics::default()
            },
            services: vec![ServiceOccurrence {
                service_id: 1,
                label: "Spa".to_string(),
                count: 4,
            }],
            ..DashboardSummary::default()
        };

        let text = render_text(&summary);

        assert!(text.starts_with("Hotel Aurora\n"));
        assert!(text.contains("NPS   33"));
        assert!(text.contains("promoters 56%"));
        assert!(text.contains("Occupancy 0.0%"));
        assert!(text.contains("Spa"));
    }

    #[test]
    fn test_render_text_defaults_and_refresh_stamp() {
        use chrono::TimeZone;

        let summary = DashboardSummary {
            refreshed_at: Some(chrono::Utc.with_ymd_and_hms(2026, 10, 19, 6, 30, 0).unwrap()),
            ..DashboardSummary::default()
        };

        let text = render_text(&summary);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Hotel dashboard");
        assert_eq!(lines[1], "Refreshed: 2026-10-19 06:30:00 UTC");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Reservations        0");
        assert!(text.ends_with("Rooms: 0 reserved, 0 free, 0 under maintenance\n"));
        assert!(!text.contains("Services:"));
    }

    #[test]
    fn test_render_json_is_camel_case() {
        let json = render_json(&DashboardSummary::default()).unwrap();
        assert!(json.contains("\"currentStays\""));
        assert!(json.contains("\"roomChart\": null"));
    }
}
