use crate::client::traits::BookingApi;
use crate::client::types::ReportFilter;
use crate::config::{AppConfig, CsrfSource};
use crate::errors::BookingError;
use crate::models::{
    AvailabilityQuote, CreateReservationResponse, DateRange, ReportDataset, ReservationDraft,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

const CSRF_HEADER: &str = "X-CSRFToken";

/// reqwest-backed client for the booking site's JSON endpoints
pub struct HttpBookingClient {
    client: Client,
    config: AppConfig,
}

impl HttpBookingClient {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cottage-booking/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.config.endpoint(path)
    }

    /// Raw HTML of a page on the site, for reading its page context
    pub async fn fetch_page(&self, path: &str) -> Result<String> {
        let url = self.url(path)?;
        debug!("Fetching page: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
            return Err(BookingError::Http(response.status()).into());
        }

        response.text().await.context("Failed to read page body")
    }
}

#[async_trait]
impl BookingApi for HttpBookingClient {
    async fn check_availability(
        &self,
        resource_id: &str,
        range: DateRange,
    ) -> Result<AvailabilityQuote> {
        let url = self.url(&self.config.availability_path)?;
        debug!(
            "Checking availability of {} for {} - {}",
            resource_id, range.start, range.end
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("cottage_id", resource_id.to_string()),
                ("start_date", range.start.format("%Y-%m-%d").to_string()),
                ("end_date", range.end.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await
            .context("Failed to reach availability endpoint")?;

        if !response.status().is_success() {
            warn!("Availability check returned status: {}", response.status());
            return Err(BookingError::Http(response.status()).into());
        }

        let quote: AvailabilityQuote = response
            .json()
            .await
            .context("Failed to parse availability response")?;

        debug!(
            "Quote for {}: available={} total={}",
            resource_id, quote.available, quote.total_price
        );
        Ok(quote)
    }

    async fn create_reservation(
        &self,
        draft: &ReservationDraft,
        csrf: Option<&CsrfSource>,
    ) -> Result<CreateReservationResponse> {
        let url = self.url(&self.config.create_path)?;
        info!(
            "Creating reservation for {} ({} - {}, {} guests)",
            draft.resource_id, draft.range.start, draft.range.end, draft.guests
        );

        let mut request = self.client.post(url).form(&draft.form_fields());
        match csrf {
            Some(CsrfSource::HiddenField(token)) => {
                request = request.header(CSRF_HEADER, token.as_str());
            }
            Some(CsrfSource::Cookie(token)) => {
                request = request
                    .header(CSRF_HEADER, token.as_str())
                    .header(reqwest::header::COOKIE, format!("csrftoken={}", token));
            }
            None => warn!("No anti-forgery token available, the server will likely refuse"),
        }

        let response = request
            .send()
            .await
            .context("Failed to reach reservation endpoint")?;

        let status = response.status();
        debug!("Reservation response status: {}", status);
        let body = response
            .text()
            .await
            .context("Failed to read reservation response")?;

        match serde_json::from_str::<CreateReservationResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(BookingError::Http(status).into()),
            Err(e) => Err(e).context("Failed to parse reservation response"),
        }
    }

    async fn fetch_report(&self, filter: &ReportFilter) -> Result<ReportDataset> {
        let url = self.url(&self.config.report_path)?;
        info!("Fetching report data from {}", url);

        let response = self
            .client
            .get(url)
            .query(&filter.query_pairs())
            .send()
            .await
            .context("Failed to reach reporting endpoint")?;

        if !response.status().is_success() {
            warn!("Reporting endpoint returned status: {}", response.status());
            return Err(BookingError::Http(response.status()).into());
        }

        let dataset: ReportDataset = response
            .json()
            .await
            .context("Failed to parse report data")?;
        dataset.validate()?;

        info!(
            "Loaded {} months of revenue and {} occupancy series",
            dataset.months.len(),
            dataset.occupancy.len()
        );
        Ok(dataset)
    }
}
