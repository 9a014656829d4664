//! Page-supplied inputs read out of the served HTML: the reservation form's
//! data attributes, the anti-forgery field, customer option metadata and
//! the reporting page's inline data.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::client::{HttpBookingClient, ReportFilter};
use crate::config::{parse_flag, CsrfSource, PageContext};
use crate::errors::BookingError;
use crate::models::{CustomerOption, ReportDataset};
use crate::reporting::{ReportPage, ReportSource};

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Everything the reservation controller needs from the cottage page
#[derive(Debug, Clone)]
pub struct ReservationPage {
    pub context: PageContext,
    pub has_cleaning_fee_display: bool,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub customers: Vec<CustomerOption>,
}

pub fn parse_reservation_page(
    html: &str,
    current_path: &str,
) -> Result<ReservationPage, BookingError> {
    let document = Html::parse_document(html);

    let form = document
        .select(&selector("#reservation-form"))
        .next()
        .ok_or(BookingError::MissingElement("reservation-form"))?;
    let data = |name: &str| form.value().attr(name).map(str::to_string);

    let mut context = PageContext {
        resource_id: data("data-cottage-id").unwrap_or_default(),
        current_path: current_path.to_string(),
        ..PageContext::default()
    };
    if let Some(raw) = data("data-base-price") {
        match raw.trim().replace(',', ".").parse() {
            Ok(price) => context.base_price = price,
            Err(_) => warn!("Unreadable base price '{}'", raw),
        }
    }
    if let Some(url) = data("data-login-url") {
        context.login_url = url;
    }
    context.authenticated = data("data-user-authenticated")
        .map(|raw| parse_flag(&raw))
        .unwrap_or(false);
    context.max_guests = max_guests(&document);
    context.csrf = document
        .select(&selector("input[name=csrfmiddlewaretoken]"))
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|token| CsrfSource::HiddenField(token.to_string()));
    if context.csrf.is_none() {
        debug!("No anti-forgery field in the form");
    }

    let has_cleaning_fee_display = document.select(&selector("#cleaning-fee")).next().is_some();

    Ok(ReservationPage {
        context,
        has_cleaning_fee_display,
        check_in: date_input(&document, "#check-in"),
        check_out: date_input(&document, "#check-out"),
        customers: customer_options(&document),
    })
}

/// Largest value in the guests dropdown, i.e. the cottage's bed count
fn max_guests(document: &Html) -> Option<u32> {
    document
        .select(&selector("#guests option"))
        .filter_map(|option| option.value().attr("value")?.trim().parse::<u32>().ok())
        .max()
}

fn date_input(document: &Html, css: &'static str) -> Option<NaiveDate> {
    let value = document.select(&selector(css)).next()?.value().attr("value")?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn customer_options(document: &Html) -> Vec<CustomerOption> {
    document
        .select(&selector("#customer-select option"))
        .filter_map(customer_option)
        .collect()
}

fn customer_option(option: ElementRef<'_>) -> Option<CustomerOption> {
    let element = option.value();
    let id = element.attr("value")?.trim();
    if id.is_empty() {
        return None;
    }
    let attr = |name: &str| element.attr(name).unwrap_or_default().to_string();
    Some(CustomerOption {
        id: id.to_string(),
        name: attr("data-name"),
        email: attr("data-email"),
        phone: element
            .attr("data-phone")
            .map(str::to_string)
            .filter(|p| !p.trim().is_empty()),
        address: attr("data-address"),
    })
}

/// Chart elements of the reporting page plus its inline data, if any
pub fn parse_report_page(html: &str) -> (ReportPage, Option<ReportDataset>) {
    let document = Html::parse_document(html);
    let canvas = |id: &'static str, css: &'static str| {
        document
            .select(&selector(css))
            .next()
            .map(|_| id.to_string())
    };

    let page = ReportPage {
        revenue_canvas: canvas("revenueChart", "#revenueChart"),
        occupancy_canvas: canvas("occupancyChart", "#occupancyChart"),
        has_average_field: document.select(&selector("#avgOccupancy")).next().is_some(),
    };

    let inline = document
        .select(&selector("script#report-data"))
        .next()
        .map(|script| script.text().collect::<String>())
        .and_then(|raw| match serde_json::from_str::<ReportDataset>(raw.trim()) {
            Ok(dataset) => Some(dataset),
            Err(e) => {
                warn!("Inline report data unreadable: {}", e);
                None
            }
        });

    (page, inline)
}

/// Chart elements and data source for the reporting page at `page_path`.
/// Data embedded in the page wins; without a page or embedded data the
/// reporting endpoint is asked with `filter`.
pub async fn report_source(
    client: &HttpBookingClient,
    page_path: Option<&str>,
    filter: ReportFilter,
) -> anyhow::Result<(ReportPage, ReportSource)> {
    let Some(path) = page_path else {
        return Ok((ReportPage::default(), ReportSource::Fetch(filter)));
    };
    let html = client.fetch_page(path).await?;
    let (page, inline) = parse_report_page(&html);
    let source = match inline {
        Some(dataset) => {
            info!("Using report data embedded in {}", path);
            ReportSource::Inline(dataset)
        }
        None => ReportSource::Fetch(filter),
    };
    Ok((page, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COTTAGE_PAGE: &str = r#"
        <html><body>
        <form id="reservation-form" data-cottage-id="5" data-base-price="120.00"
              data-login-url="/accounts/login/" data-user-authenticated="True">
            <input type="hidden" name="csrfmiddlewaretoken" value="s3cr3t">
            <input id="check-in" type="date" value="2026-07-01">
            <input id="check-out" type="date" value="">
            <select id="guests">
                <option value="1">1 guest</option>
                <option value="2">2 guests</option>
                <option value="4">4 guests</option>
            </select>
            <select id="customer-select">
                <option value="">-- choose --</option>
                <option value="8" data-name="Aino Virtanen" data-email="aino@example.fi"
                        data-phone="" data-address="Rantatie 1">Aino</option>
            </select>
            <span id="price-display"></span>
            <span id="cleaning-fee"></span>
            <span id="total-price"></span>
            <button id="reserve-button">Reserve</button>
        </form>
        </body></html>
    "#;

    #[test]
    fn reads_form_context() {
        let page = parse_reservation_page(COTTAGE_PAGE, "/cottages/rantamokki/").unwrap();
        let context = &page.context;
        assert_eq!(context.resource_id, "5");
        assert_eq!(context.base_price, 120.0);
        assert!(context.authenticated);
        assert_eq!(context.max_guests, Some(4));
        assert_eq!(
            context.csrf,
            Some(CsrfSource::HiddenField("s3cr3t".to_string()))
        );
        assert_eq!(context.current_path, "/cottages/rantamokki/");
        assert!(page.has_cleaning_fee_display);
        assert_eq!(page.check_in, NaiveDate::from_ymd_opt(2026, 7, 1));
        assert_eq!(page.check_out, None);
    }

    #[test]
    fn reads_customer_options() {
        let page = parse_reservation_page(COTTAGE_PAGE, "/").unwrap();
        assert_eq!(page.customers.len(), 1);
        let aino = &page.customers[0];
        assert_eq!(aino.id, "8");
        assert_eq!(aino.email, "aino@example.fi");
        assert_eq!(aino.phone, None);
    }

    #[test]
    fn missing_form_is_reported() {
        assert!(matches!(
            parse_reservation_page("<html><body></body></html>", "/"),
            Err(BookingError::MissingElement("reservation-form"))
        ));
    }

    #[test]
    fn report_page_with_inline_data() {
        let html = r#"
            <div id="avgOccupancy"></div>
            <canvas id="revenueChart"></canvas>
            <script id="report-data" type="application/json">
                {"months": ["May 2026"], "revenue": [300.0],
                 "occupancy": [{"name": "Rantamökki", "data": [45.0]}]}
            </script>
        "#;
        let (page, inline) = parse_report_page(html);
        assert_eq!(page.revenue_canvas.as_deref(), Some("revenueChart"));
        assert_eq!(page.occupancy_canvas, None);
        assert!(page.has_average_field);
        let dataset = inline.unwrap();
        assert_eq!(dataset.occupancy[0].name, "Rantamökki");
    }

    #[test]
    fn report_page_without_inline_data() {
        let (page, inline) = parse_report_page(r#"<canvas id="occupancyChart"></canvas>"#);
        assert!(inline.is_none());
        assert!(!page.has_average_field);
    }
}
