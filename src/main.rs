use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use cottage_booking::page::{parse_reservation_page, report_source};
use cottage_booking::reporting::{
    ChartJsExporter, PanelState, ReportRenderer,
};
use cottage_booking::reservation::CustomerPicker;
use cottage_booking::{
    AppConfig, HttpBookingClient, PageContext, ReportFilter, ReservationController,
    ReservationForm, SubmitOutcome,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: cottage-booking <report [start end] | quote <check-in> <check-out> | book <check-in> <check-out> <guests> [customer-id]>";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!("🏡 Cottage booking client for {}", config.base_url);

    let client = Arc::new(HttpBookingClient::new(config)?);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("report") => report(&client, &args[1..]).await,
        Some("quote") => {
            let (check_in, check_out) = dates(&args[1..])?;
            let (controller, _) = reservation(client.clone()).await?;
            controller.on_check_in_change(check_in).await;
            let display = controller.on_check_out_change(check_out).await;

            println!("{}", display.price_text);
            if let Some(fee) = &display.cleaning_fee_text {
                println!("Cleaning fee: {}", fee);
            }
            println!("Total: {}", display.total_text);
            println!(
                "Reservation {}",
                if display.submit_enabled { "possible" } else { "not possible" }
            );
            Ok(())
        }
        Some("book") => {
            let (check_in, check_out) = dates(&args[1..])?;
            let guests: u32 = args
                .get(3)
                .context(USAGE)?
                .parse()
                .context("guests must be a number")?;
            let (controller, picker) = reservation(client.clone()).await?;
            controller.on_check_in_change(check_in).await;
            controller.on_check_out_change(check_out).await;
            controller.on_guests_change(guests).await;

            if let Some(customer_id) = args.get(4) {
                let details = picker.select(customer_id);
                if details.visible {
                    println!(
                        "Customer: {} <{}>, {}, {}",
                        details.name, details.email, details.phone, details.address
                    );
                }
                controller.on_customer_change(Some(customer_id.clone())).await;
            }

            let outcome = controller.on_submit().await;
            match &outcome {
                SubmitOutcome::RedirectToLogin(url) => println!("Sign in first: {}", url),
                SubmitOutcome::Created { redirect_url } => {
                    println!("✅ Reservation created: {}", redirect_url)
                }
                _ => {}
            }
            if let Some(alert) = outcome.alert_text() {
                bail!("{}", alert);
            }
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

fn dates(args: &[String]) -> Result<(NaiveDate, NaiveDate)> {
    let parse = |i: usize| -> Result<NaiveDate> {
        let raw = args.get(i).context(USAGE)?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("'{}' is not a YYYY-MM-DD date", raw))
    };
    Ok((parse(0)?, parse(1)?))
}

/// Controller for the cottage page named by `BOOKING_PAGE_PATH`, or for a
/// page context taken from the environment when no page is given
async fn reservation(
    client: Arc<HttpBookingClient>,
) -> Result<(ReservationController<HttpBookingClient>, CustomerPicker)> {
    let today = Local::now().date_naive();

    let (context, form, picker) = match std::env::var("BOOKING_PAGE_PATH") {
        Ok(path) => {
            let html = client.fetch_page(&path).await?;
            let page = parse_reservation_page(&html, &path)?;
            let mut form = ReservationForm::new(today, page.has_cleaning_fee_display);
            if let Some(check_in) = page.check_in {
                if let Err(e) = form.set_check_in(check_in) {
                    warn!("Ignoring pre-filled check-in: {}", e);
                }
            }
            if let Some(check_out) = page.check_out {
                form.set_check_out(check_out);
            }
            (page.context, form, CustomerPicker::new(page.customers))
        }
        Err(_) => {
            let context = PageContext::from_lookup(|key| std::env::var(key).ok())?;
            (
                context,
                ReservationForm::new(today, true),
                CustomerPicker::default(),
            )
        }
    };

    if context.resource_id.is_empty() {
        bail!("No cottage id: set BOOKING_PAGE_PATH or BOOKING_RESOURCE_ID");
    }

    let controller = ReservationController::new(client, context, form);
    controller.initialize().await;
    Ok((controller, picker))
}

async fn report(client: &HttpBookingClient, args: &[String]) -> Result<()> {
    let filter = match args {
        [] => ReportFilter::default(),
        [_, _, ..] => {
            let (start, end) = dates(args)?;
            ReportFilter {
                start: Some(start),
                end: Some(end),
                ..ReportFilter::default()
            }
        }
        [_] => bail!(USAGE),
    };

    let page_path = std::env::var("BOOKING_REPORT_PAGE_PATH").ok();
    let (page, source) = report_source(client, page_path.as_deref(), filter).await?;

    let mut renderer = ReportRenderer::new(page, ChartJsExporter::new());
    renderer.load(source, client).await;

    for panel in [renderer.revenue_panel(), renderer.occupancy_panel()] {
        if let PanelState::Failed(message) = &panel.state {
            bail!("{}", message);
        }
    }
    if let Some(summary) = renderer.summary() {
        println!("Total revenue: {}", summary.total_revenue);
        println!("Average occupancy: {}%", summary.average_occupancy);
    }

    let output_dir = client.config().output_dir.clone();
    renderer.registry().backend().write_all(&output_dir).await?;
    Ok(())
}
