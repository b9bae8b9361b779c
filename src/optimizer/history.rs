use crate::error::NestResult;
use crate::optimizer::runner::{GenerationReport, ProgressCallback};
use std::path::Path;
use std::sync::Mutex;

/// Collects every generation report of a run, for CSV export.
#[derive(Debug, Default)]
pub struct GenerationHistory {
    reports: Mutex<Vec<GenerationReport>>,
}

impl GenerationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<GenerationReport> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One row per generation with a header line.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> NestResult<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for report in self.reports() {
            wtr.serialize(report)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ProgressCallback for GenerationHistory {
    fn on_generation(&self, report: &GenerationReport) {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(*report);
    }
}
