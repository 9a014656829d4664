use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::reporting::charts::ChartConfig;
use crate::reporting::registry::ChartBackend;

/// Keeps the current chart configuration per canvas as JSON, ready to be
/// handed to the charting library or written to disk
#[derive(Debug, Default)]
pub struct ChartJsExporter {
    charts: BTreeMap<String, serde_json::Value>,
}

impl ChartJsExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart(&self, canvas_id: &str) -> Option<&serde_json::Value> {
        self.charts.get(canvas_id)
    }

    pub fn canvases(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    /// Write `<canvas>.json` for every live chart
    pub async fn write_all(&self, dir: &Path) -> Result<usize> {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        for (canvas_id, config) in &self.charts {
            let path = dir.join(format!("{}.json", canvas_id));
            let json = serde_json::to_string_pretty(config)?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        info!(
            "💾 Saved {} chart configurations to {}",
            self.charts.len(),
            dir.display()
        );
        Ok(self.charts.len())
    }
}

impl ChartBackend for ChartJsExporter {
    type Handle = String;

    fn create(&mut self, canvas_id: &str, config: &ChartConfig) -> Result<String> {
        let value = serde_json::to_value(config).context("Failed to serialize chart")?;
        self.charts.insert(canvas_id.to_string(), value);
        Ok(canvas_id.to_string())
    }

    fn destroy(&mut self, handle: String) {
        self.charts.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportDataset;
    use crate::reporting::charts::revenue_chart;
    use crate::reporting::registry::ChartRegistry;

    #[tokio::test]
    async fn writes_one_file_per_canvas() {
        let dataset = ReportDataset {
            months: vec!["May 2026".to_string()],
            revenue: vec![410.0],
            ..ReportDataset::default()
        };
        let mut registry = ChartRegistry::new(ChartJsExporter::new());
        registry.set("revenueChart", &revenue_chart(&dataset)).unwrap();
        registry.set("revenueChart", &revenue_chart(&dataset)).unwrap();

        let dir = std::env::temp_dir().join(format!("cottage-charts-{}", std::process::id()));
        let written = registry.backend().write_all(&dir).await.unwrap();
        assert_eq!(written, 1);

        let raw = tokio::fs::read_to_string(dir.join("revenueChart.json"))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["type"], "bar");
        assert_eq!(value["data"]["datasets"][0]["data"][0], 410.0);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
