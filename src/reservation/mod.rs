pub mod controller;
pub mod customer;
pub mod form;

pub use controller::{QueryTicket, ReservationController, SubmitOutcome};
pub use customer::{CustomerDetails, CustomerPicker};
pub use form::{FormPhase, PriceDisplay, ReservationForm};
