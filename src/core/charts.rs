use crate::domain::model::{ChartData, ChartDataset, RoomOccupancy, ServiceOccurrence};

pub const ROOM_LABELS: [&str; 3] = ["Reserved", "Free", "Under Maintenance"];

pub fn room_chart(occupancy: &RoomOccupancy) -> ChartData {
    ChartData {
        labels: ROOM_LABELS.iter().map(|l| l.to_string()).collect(),
        datasets: vec![ChartDataset {
            label: "Rooms".to_string(),
            data: vec![
                occupancy.reserved as f64,
                occupancy.free as f64,
                occupancy.under_maintenance as f64,
            ],
        }],
    }
}

pub fn services_chart(occurrences: &[ServiceOccurrence]) -> ChartData {
    ChartData {
        labels: occurrences.iter().map(|o| o.label.clone()).collect(),
        datasets: vec![ChartDataset {
            label: "Services".to_string(),
            data: occurrences.iter().map(|o| o.count as f64).collect(),
        }],
    }
}
