use std::fmt;
use std::str::FromStr;

use crate::domain::ports::ActionService;
use crate::utils::error::{DashboardError, Result};

/// Navigation shortcuts offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    NewReservation,
    ViewAnalytics,
    ViewReservations,
    ViewServices,
    ViewRooms,
}

impl DashboardAction {
    pub const ALL: [DashboardAction; 5] = [
        DashboardAction::NewReservation,
        DashboardAction::ViewAnalytics,
        DashboardAction::ViewReservations,
        DashboardAction::ViewServices,
        DashboardAction::ViewRooms,
    ];

    /// External id of the window action on the server.
    pub fn reference(&self) -> &'static str {
        match self {
            DashboardAction::NewReservation => "hotel_manager.action_form_reservations",
            DashboardAction::ViewAnalytics => "hotel_manager.action_hotel_analysis_dashboard",
            DashboardAction::ViewReservations => "hotel_manager.action_reservations",
            DashboardAction::ViewServices => "hotel_manager.action_services",
            DashboardAction::ViewRooms => "hotel_manager.action_rooms",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DashboardAction::NewReservation => "new-reservation",
            DashboardAction::ViewAnalytics => "view-analytics",
            DashboardAction::ViewReservations => "view-reservations",
            DashboardAction::ViewServices => "view-services",
            DashboardAction::ViewRooms => "view-rooms",
        }
    }
}

impl fmt::Display for DashboardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DashboardAction {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| DashboardError::ActionError {
                action: s.to_string(),
                message: format!(
                    "unknown action, expected one of: {}",
                    Self::ALL.map(|a| a.name()).join(", ")
                ),
            })
    }
}

pub struct DashboardActions<A: ActionService> {
    service: A,
}

impl<A: ActionService> DashboardActions<A> {
    pub fn new(service: A) -> Self {
        Self { service }
    }

    pub async fn trigger(&self, action: DashboardAction) -> Result<()> {
        tracing::debug!("Triggering {} ({})", action, action.reference());
        self.service.do_action(action.reference()).await.map_err(|e| {
            tracing::error!("Error running action {}: {}", action, e);
            DashboardError::ActionError {
                action: action.name().to_string(),
                message: e.to_string(),
            }
        })
    }

    pub async fn new_reservation(&self) -> Result<()> {
        self.trigger(DashboardAction::NewReservation).await
    }

    pub async fn view_analytics(&self) -> Result<()> {
        self.trigger(DashboardAction::ViewAnalytics).await
    }

    pub async fn view_reservations(&self) -> Result<()> {
        self.trigger(DashboardAction::ViewReservations).await
    }

    pub async fn view_services(&self) -> Result<()> {
        self.trigger(DashboardAction::ViewServices).await
    }

    pub async fn view_rooms(&self) -> Result<()> {
        self.trigger(DashboardAction::ViewRooms).await
    }
}
