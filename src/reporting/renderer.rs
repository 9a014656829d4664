use serde::Serialize;
use tracing::{error, info, warn};

use crate::client::{BookingApi, ReportFilter};
use crate::errors::BookingError;
use crate::models::ReportDataset;
use crate::reporting::charts::{occupancy_chart, revenue_chart};
use crate::reporting::registry::{ChartBackend, ChartRegistry};
use crate::reporting::stats::{build_summary, ReportSummary};

pub const LOAD_FAILED_TEXT: &str = "Failed to load chart data";

/// Placeholder shown in place of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PanelState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub state: PanelState,
    pub canvas_visible: bool,
}

impl Default for ChartPanel {
    fn default() -> Self {
        Self {
            state: PanelState::Loading,
            canvas_visible: false,
        }
    }
}

/// Elements present on the reporting page
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    pub revenue_canvas: Option<String>,
    pub occupancy_canvas: Option<String>,
    pub has_average_field: bool,
}

impl Default for ReportPage {
    fn default() -> Self {
        Self {
            revenue_canvas: Some("revenueChart".to_string()),
            occupancy_canvas: Some("occupancyChart".to_string()),
            has_average_field: true,
        }
    }
}

/// Where the report data comes from
#[derive(Debug, Clone)]
pub enum ReportSource {
    /// Embedded in the page, render straight away
    Inline(ReportDataset),
    /// Fetched from the reporting endpoint
    Fetch(ReportFilter),
}

/// Draws the revenue and occupancy charts and the summary figures
pub struct ReportRenderer<B: ChartBackend> {
    page: ReportPage,
    registry: ChartRegistry<B>,
    revenue: ChartPanel,
    occupancy: ChartPanel,
    summary: Option<ReportSummary>,
}

impl<B: ChartBackend> ReportRenderer<B> {
    pub fn new(page: ReportPage, backend: B) -> Self {
        Self {
            page,
            registry: ChartRegistry::new(backend),
            revenue: ChartPanel::default(),
            occupancy: ChartPanel::default(),
            summary: None,
        }
    }

    pub fn registry(&self) -> &ChartRegistry<B> {
        &self.registry
    }

    pub fn revenue_panel(&self) -> &ChartPanel {
        &self.revenue
    }

    pub fn occupancy_panel(&self) -> &ChartPanel {
        &self.occupancy
    }

    pub fn summary(&self) -> Option<&ReportSummary> {
        self.summary.as_ref()
    }

    /// Average occupancy text, if the page has a field for it
    pub fn average_field(&self) -> Option<&str> {
        if !self.page.has_average_field {
            return None;
        }
        self.summary.as_ref().map(|s| s.average_occupancy.as_str())
    }

    /// Load from either source. Never fails: problems end up in the panels.
    pub async fn load<A: BookingApi + ?Sized>(&mut self, source: ReportSource, api: &A) {
        let dataset = match source {
            ReportSource::Inline(dataset) => dataset,
            ReportSource::Fetch(filter) => {
                self.show_loading();
                match api.fetch_report(&filter).await {
                    Ok(dataset) => dataset,
                    Err(e) => {
                        error!("Report data request failed: {:#}", e);
                        self.show_error(LOAD_FAILED_TEXT);
                        return;
                    }
                }
            }
        };

        if let Err(e) = self.render(&dataset) {
            error!("Rendering report failed: {:#}", e);
        }
    }

    /// Draw both charts from a complete dataset, replacing earlier charts.
    /// On failure nothing from this dataset stays on the page.
    pub fn render(&mut self, dataset: &ReportDataset) -> anyhow::Result<()> {
        if let Err(e) = self.draw(dataset) {
            self.show_error(LOAD_FAILED_TEXT);
            return Err(e);
        }
        Ok(())
    }

    fn draw(&mut self, dataset: &ReportDataset) -> anyhow::Result<()> {
        dataset.validate()?;

        if let Some(canvas) = self.page.revenue_canvas.clone() {
            self.registry.set(&canvas, &revenue_chart(dataset))?;
        } else {
            warn!("{}", BookingError::MissingElement("revenueChart"));
        }
        if let Some(canvas) = self.page.occupancy_canvas.clone() {
            self.registry.set(&canvas, &occupancy_chart(dataset))?;
        } else {
            warn!("{}", BookingError::MissingElement("occupancyChart"));
        }

        let ready = ChartPanel {
            state: PanelState::Ready,
            canvas_visible: true,
        };
        if self.page.revenue_canvas.is_some() {
            self.revenue = ready.clone();
        }
        if self.page.occupancy_canvas.is_some() {
            self.occupancy = ready;
        }

        if !self.page.has_average_field {
            warn!("{}", BookingError::MissingElement("avgOccupancy"));
        }
        let summary = build_summary(dataset);
        info!(
            "Rendered report: {} months, average occupancy {}%",
            dataset.months.len(),
            summary.average_occupancy
        );
        self.summary = Some(summary);
        Ok(())
    }

    fn show_loading(&mut self) {
        self.revenue = ChartPanel::default();
        self.occupancy = ChartPanel::default();
    }

    /// Error placeholders only: earlier charts and figures are withdrawn
    fn show_error(&mut self, message: &str) {
        self.registry.dispose_all();
        self.summary = None;
        for panel in [&mut self.revenue, &mut self.occupancy] {
            panel.state = PanelState::Failed(message.to_string());
            panel.canvas_visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CsrfSource;
    use crate::models::{
        AvailabilityQuote, CreateReservationResponse, DateRange, OccupancySeries,
        ReservationDraft,
    };
    use crate::reporting::registry::tests::CountingBackend;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ReportApi {
        reply: Mutex<Option<ReportDataset>>,
        filters: Mutex<Vec<ReportFilter>>,
    }

    impl ReportApi {
        fn new(reply: Option<ReportDataset>) -> Self {
            Self {
                reply: Mutex::new(reply),
                filters: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BookingApi for ReportApi {
        async fn check_availability(&self, _: &str, _: DateRange) -> Result<AvailabilityQuote> {
            anyhow::bail!("not used")
        }

        async fn create_reservation(
            &self,
            _: &ReservationDraft,
            _: Option<&CsrfSource>,
        ) -> Result<CreateReservationResponse> {
            anyhow::bail!("not used")
        }

        async fn fetch_report(&self, filter: &ReportFilter) -> Result<ReportDataset> {
            self.filters.lock().unwrap().push(filter.clone());
            self.reply
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("503 Service Unavailable"))
        }
    }

    fn dataset(first: f64) -> ReportDataset {
        ReportDataset {
            months: vec!["May 2026".to_string(), "June 2026".to_string()],
            revenue: vec![first, 800.0],
            occupancy: vec![OccupancySeries {
                name: "Lakeside".to_string(),
                data: vec![50.0, 70.0],
                color: Some("rgb(10, 20, 30)".to_string()),
            }],
            ..ReportDataset::default()
        }
    }

    #[tokio::test]
    async fn inline_data_renders_without_fetching() {
        let api = ReportApi::new(None);
        let mut renderer = ReportRenderer::new(ReportPage::default(), CountingBackend::default());
        renderer.load(ReportSource::Inline(dataset(100.0)), &api).await;

        assert!(api.filters.lock().unwrap().is_empty());
        assert_eq!(renderer.revenue_panel().state, PanelState::Ready);
        assert!(renderer.occupancy_panel().canvas_visible);
        assert_eq!(renderer.average_field(), Some("60.0"));
        assert_eq!(renderer.summary().unwrap().total_revenue, "€900");
    }

    #[tokio::test]
    async fn refetch_replaces_charts_without_leaking() {
        let api = ReportApi::new(Some(dataset(100.0)));
        let mut renderer = ReportRenderer::new(ReportPage::default(), CountingBackend::default());

        renderer.load(ReportSource::Fetch(ReportFilter::default()), &api).await;
        let filtered = ReportFilter {
            cottage: "3".to_string(),
            ..ReportFilter::default()
        };
        renderer.load(ReportSource::Fetch(filtered.clone()), &api).await;

        let backend = renderer.registry().backend();
        assert_eq!(backend.created, 4);
        assert_eq!(backend.destroyed, 2);
        assert_eq!(backend.live.len(), 2);
        assert_eq!(api.filters.lock().unwrap().last(), Some(&filtered));
    }

    #[tokio::test]
    async fn failed_fetch_shows_error_and_hides_canvas() {
        let api = ReportApi::new(None);
        let mut renderer = ReportRenderer::new(ReportPage::default(), CountingBackend::default());
        renderer.load(ReportSource::Fetch(ReportFilter::default()), &api).await;

        for panel in [renderer.revenue_panel(), renderer.occupancy_panel()] {
            assert_eq!(panel.state, PanelState::Failed(LOAD_FAILED_TEXT.to_string()));
            assert!(!panel.canvas_visible);
        }
        assert!(renderer.registry().is_empty());
        assert_eq!(renderer.summary(), None);
    }

    #[tokio::test]
    async fn failed_refetch_withdraws_earlier_report() {
        let api = ReportApi::new(Some(dataset(100.0)));
        let mut renderer = ReportRenderer::new(ReportPage::default(), CountingBackend::default());
        renderer.load(ReportSource::Fetch(ReportFilter::default()), &api).await;
        assert_eq!(renderer.average_field(), Some("60.0"));

        *api.reply.lock().unwrap() = None;
        renderer.load(ReportSource::Fetch(ReportFilter::default()), &api).await;

        assert_eq!(
            renderer.revenue_panel().state,
            PanelState::Failed(LOAD_FAILED_TEXT.to_string())
        );
        assert_eq!(renderer.average_field(), None);
        assert_eq!(renderer.summary(), None);
        assert!(renderer.registry().is_empty());
        assert!(renderer.registry().backend().live.is_empty());
    }

    #[test]
    fn chart_creation_failure_leaves_nothing_drawn() {
        let mut renderer = ReportRenderer::new(ReportPage::default(), CountingBackend::default());
        renderer.render(&dataset(100.0)).unwrap();

        // revenue chart is recreated, then the occupancy chart fails
        renderer.registry.backend_mut().fail_after = Some(1);
        assert!(renderer.render(&dataset(200.0)).is_err());

        assert_eq!(renderer.summary(), None);
        assert!(renderer.registry().backend().live.is_empty());
        for panel in [renderer.revenue_panel(), renderer.occupancy_panel()] {
            assert!(!panel.canvas_visible);
        }
    }

    #[tokio::test]
    async fn malformed_data_is_not_drawn() {
        let mut broken = dataset(100.0);
        broken.revenue.pop();
        let api = ReportApi::new(Some(broken));
        let mut renderer = ReportRenderer::new(ReportPage::default(), CountingBackend::default());
        renderer.load(ReportSource::Fetch(ReportFilter::default()), &api).await;

        assert!(renderer.registry().is_empty());
        assert!(!renderer.revenue_panel().canvas_visible);
    }

    #[test]
    fn missing_canvas_is_skipped() {
        let page = ReportPage {
            revenue_canvas: None,
            has_average_field: false,
            ..ReportPage::default()
        };
        let mut renderer = ReportRenderer::new(page, CountingBackend::default());
        renderer.render(&dataset(100.0)).unwrap();

        assert!(!renderer.registry().contains("revenueChart"));
        assert!(renderer.registry().contains("occupancyChart"));
        assert_eq!(renderer.revenue_panel().state, PanelState::Loading);
        assert_eq!(renderer.average_field(), None);
    }
}
