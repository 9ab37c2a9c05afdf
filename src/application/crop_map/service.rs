use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{CropMapRepositoryInterface, DomainResult, StateCrop};

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub inserted: u64,
    /// Records with a blank state or crop.
    pub skipped: u64,
    /// Rows deleted beforehand in replace mode.
    pub removed: u64,
}

pub struct CropMapService<R: CropMapRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: CropMapRepositoryInterface> CropMapService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Crops grown in `state`, matched case-insensitively and exactly.
    ///
    /// A blank state yields an empty list, never an error.
    pub async fn crops_for_state(&self, state: &str) -> DomainResult<Vec<String>> {
        let state = state.trim();
        if state.is_empty() {
            return Ok(Vec::new());
        }

        let crops = self.repo.crops_for_state(state).await?;
        debug!(state, count = crops.len(), "Crop lookup");
        Ok(crops)
    }

    /// Load reference records. With `replace`, the new records take the place
    /// of every existing row in one transaction.
    pub async fn import(
        &self,
        records: Vec<StateCrop>,
        replace: bool,
    ) -> DomainResult<ImportSummary> {
        let total = records.len() as u64;
        let records: Vec<StateCrop> = records
            .into_iter()
            .map(|r| StateCrop::new(r.state.trim(), r.crop.trim()))
            .filter(|r| !r.state.is_empty() && !r.crop.is_empty())
            .collect();
        let skipped = total - records.len() as u64;

        let (removed, inserted) = if replace {
            self.repo.replace_all(records).await?
        } else {
            (0, self.repo.insert_many(records).await?)
        };

        info!(inserted, skipped, removed, "Crop map import finished");
        Ok(ImportSummary {
            inserted,
            skipped,
            removed,
        })
    }
}
