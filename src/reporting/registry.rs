use std::collections::HashMap;

use anyhow::Result;
use tracing::debug;

use crate::reporting::charts::ChartConfig;

/// Charting library binding: creates a chart on a canvas and tears it down
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, canvas_id: &str, config: &ChartConfig) -> Result<Self::Handle>;

    fn destroy(&mut self, handle: Self::Handle);
}

/// Live charts keyed by canvas id. At most one chart exists per canvas:
/// [`ChartRegistry::set`] destroys the previous one before creating the next.
pub struct ChartRegistry<B: ChartBackend> {
    backend: B,
    charts: HashMap<String, B::Handle>,
}

impl<B: ChartBackend> ChartRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            charts: HashMap::new(),
        }
    }

    pub fn set(&mut self, canvas_id: &str, config: &ChartConfig) -> Result<()> {
        if let Some(previous) = self.charts.remove(canvas_id) {
            debug!("Destroying previous chart on '{}'", canvas_id);
            self.backend.destroy(previous);
        }
        let handle = self.backend.create(canvas_id, config)?;
        self.charts.insert(canvas_id.to_string(), handle);
        Ok(())
    }

    /// Returns whether a chart was bound to the canvas
    pub fn dispose(&mut self, canvas_id: &str) -> bool {
        match self.charts.remove(canvas_id) {
            Some(handle) => {
                self.backend.destroy(handle);
                true
            }
            None => false,
        }
    }

    pub fn dispose_all(&mut self) {
        for (_, handle) in self.charts.drain() {
            self.backend.destroy(handle);
        }
    }

    pub fn contains(&self, canvas_id: &str) -> bool {
        self.charts.contains_key(canvas_id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
