pub mod http;
pub mod traits;
pub mod types;

pub use http::HttpBookingClient;
pub use traits::BookingApi;
pub use types::ReportFilter;
