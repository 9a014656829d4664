use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::client::BookingApi;
use crate::config::PageContext;
use crate::models::{AvailabilityQuote, DateRange};
use crate::reservation::form::{FormPhase, PriceDisplay, ReservationForm};

/// Handle for one issued availability query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    pub range: DateRange,
}

/// What the page should do after a submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Not signed in: go to the login page, coming back here afterwards
    RedirectToLogin(String),
    /// Reservation stored, follow the server's redirect
    Created { redirect_url: String },
    /// Server refused or could not be reached; shown as a blocking alert
    Rejected(String),
    /// Fields not fit to send; nothing was requested
    Invalid(String),
}

impl SubmitOutcome {
    /// Alert text for the outcomes that block the page
    pub fn alert_text(&self) -> Option<String> {
        match self {
            SubmitOutcome::Rejected(message) | SubmitOutcome::Invalid(message) => {
                Some(format!("Error: {}", message))
            }
            _ => None,
        }
    }
}

struct ControllerState {
    form: ReservationForm,
    /// Sequence number of the newest query issued
    latest_seq: u64,
}

/// Reservation form wired to the booking endpoints.
///
/// Handlers may run concurrently; a quote is only shown if it answers the
/// newest query, so a slow earlier response cannot overwrite a later one.
pub struct ReservationController<A: BookingApi> {
    api: Arc<A>,
    page: PageContext,
    state: Mutex<ControllerState>,
}

impl<A: BookingApi> ReservationController<A> {
    pub fn new(api: Arc<A>, page: PageContext, form: ReservationForm) -> Self {
        Self {
            api,
            page,
            state: Mutex::new(ControllerState {
                form,
                latest_seq: 0,
            }),
        }
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    /// Quote pre-filled dates, if the form came with both
    pub async fn initialize(&self) {
        if let Some(ticket) = self.issue_query().await {
            self.run_query(ticket).await;
        }
    }

    pub async fn on_check_in_change(&self, date: NaiveDate) -> PriceDisplay {
        {
            let mut state = self.state.lock().await;
            if let Err(e) = state.form.set_check_in(date) {
                warn!("Ignoring check-in change: {}", e);
                return state.form.display().clone();
            }
        }
        if let Some(ticket) = self.issue_query().await {
            self.run_query(ticket).await;
        }
        self.display().await
    }

    pub async fn on_check_out_change(&self, date: NaiveDate) -> PriceDisplay {
        self.state.lock().await.form.set_check_out(date);
        if let Some(ticket) = self.issue_query().await {
            self.run_query(ticket).await;
        }
        self.display().await
    }

    pub async fn on_guests_change(&self, guests: u32) {
        self.state.lock().await.form.set_guests(guests);
    }

    pub async fn on_customer_change(&self, customer_id: Option<String>) {
        self.state.lock().await.form.set_customer(customer_id);
    }

    /// Take a sequence number for the current dates; `None` when there is
    /// nothing to quote
    pub async fn issue_query(&self) -> Option<QueryTicket> {
        let mut state = self.state.lock().await;
        let range = state.form.quote_range()?;
        state.latest_seq += 1;
        Some(QueryTicket {
            seq: state.latest_seq,
            range,
        })
    }

    /// Apply an answer if it belongs to the newest query and the form still
    /// holds the dates it was asked for. Returns whether it was applied.
    pub async fn complete_query(
        &self,
        ticket: QueryTicket,
        result: Result<AvailabilityQuote>,
    ) -> bool {
        let mut state = self.state.lock().await;
        if ticket.seq != state.latest_seq {
            debug!(
                "Discarding stale quote #{} (latest is #{})",
                ticket.seq, state.latest_seq
            );
            return false;
        }
        if state.form.quote_range() != Some(ticket.range) {
            debug!(
                "Discarding quote #{} for {} - {}, dates have changed",
                ticket.seq, ticket.range.start, ticket.range.end
            );
            return false;
        }
        match result {
            Ok(quote) => state.form.apply_quote(&quote, self.page.base_price),
            Err(e) => {
                error!("Availability check failed: {:#}", e);
                state.form.apply_quote_failure();
            }
        }
        true
    }

    async fn run_query(&self, ticket: QueryTicket) {
        let result = self
            .api
            .check_availability(&self.page.resource_id, ticket.range)
            .await;
        self.complete_query(ticket, result).await;
    }

    pub async fn display(&self) -> PriceDisplay {
        self.state.lock().await.form.display().clone()
    }

    pub async fn phase(&self) -> FormPhase {
        self.state.lock().await.form.phase()
    }

    pub async fn check_out(&self) -> Option<NaiveDate> {
        self.state.lock().await.form.check_out()
    }

    pub async fn check_out_min(&self) -> Option<NaiveDate> {
        self.state.lock().await.form.check_out_min()
    }

    /// Login redirect carrying the current path as `next`
    pub fn login_redirect(&self) -> String {
        // form encoding writes spaces as '+'; a literal '+' is already %2B
        let next = url::form_urlencoded::byte_serialize(self.page.current_path.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        let separator = if self.page.login_url.contains('?') {
            '&'
        } else {
            '?'
        };
        format!("{}{}next={}", self.page.login_url, separator, next)
    }

    /// Submit the form. Anonymous users are sent to the login page without
    /// touching the creation endpoint.
    pub async fn on_submit(&self) -> SubmitOutcome {
        if !self.page.authenticated {
            let url = self.login_redirect();
            info!("Not signed in, redirecting to {}", url);
            return SubmitOutcome::RedirectToLogin(url);
        }

        let draft = {
            let state = self.state.lock().await;
            state
                .form
                .draft(&self.page.resource_id, self.page.max_guests)
        };
        let draft = match draft {
            Ok(draft) => draft,
            Err(e) => {
                warn!("Reservation not sent: {}", e);
                return SubmitOutcome::Invalid(e.to_string());
            }
        };

        match self
            .api
            .create_reservation(&draft, self.page.csrf.as_ref())
            .await
        {
            Ok(response) if response.success => match response.redirect_url {
                Some(redirect_url) => {
                    info!("Reservation created, redirecting to {}", redirect_url);
                    SubmitOutcome::Created { redirect_url }
                }
                None => {
                    warn!("Reservation created but no redirect was returned");
                    SubmitOutcome::Rejected("reservation created without a redirect".to_string())
                }
            },
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string());
                warn!("Reservation refused: {}", message);
                SubmitOutcome::Rejected(message)
            }
            Err(e) => {
                error!("Reservation request failed: {:#}", e);
                SubmitOutcome::Rejected(e.to_string())
            }
        }
    }
}
