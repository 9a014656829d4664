pub mod client;
pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod page;
pub mod reporting;
pub mod reservation;

pub use client::{BookingApi, HttpBookingClient, ReportFilter};
pub use config::{AppConfig, CsrfSource, PageContext};
pub use errors::BookingError;
pub use reservation::{ReservationController, ReservationForm, SubmitOutcome};
