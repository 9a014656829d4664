use crate::client::types::ReportFilter;
use crate::config::CsrfSource;
use crate::models::{
    AvailabilityQuote, CreateReservationResponse, DateRange, ReportDataset, ReservationDraft,
};
use anyhow::Result;
use async_trait::async_trait;

/// Server endpoints the booking form and the reporting page talk to.
/// The controllers only see this trait, so tests can swap in fakes.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Price and availability for one resource over a date range
    async fn check_availability(
        &self,
        resource_id: &str,
        range: DateRange,
    ) -> Result<AvailabilityQuote>;

    /// Submit a reservation; an application-level refusal comes back as
    /// `success: false`, not as an error
    async fn create_reservation(
        &self,
        draft: &ReservationDraft,
        csrf: Option<&CsrfSource>,
    ) -> Result<CreateReservationResponse>;

    /// Revenue and occupancy series for the reporting charts
    async fn fetch_report(&self, filter: &ReportFilter) -> Result<ReportDataset>;
}
