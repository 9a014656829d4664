pub mod charts;
pub mod export;
pub mod registry;
pub mod renderer;
pub mod stats;

pub use charts::{ChartConfig, ChartKind};
pub use export::ChartJsExporter;
pub use registry::{ChartBackend, ChartRegistry};
pub use renderer::{PanelState, ReportPage, ReportRenderer, ReportSource};
pub use stats::{average_occupancy, ReportSummary};
