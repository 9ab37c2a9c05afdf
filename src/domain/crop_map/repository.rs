use async_trait::async_trait;

use super::StateCrop;
use crate::domain::DomainResult;

#[async_trait]
pub trait CropMapRepositoryInterface: Send + Sync {
    /// Crops whose state equals `state` ignoring case (full Unicode
    /// lowercasing), in insertion order.
    async fn crops_for_state(&self, state: &str) -> DomainResult<Vec<String>>;

    /// Insert all records; returns the number inserted.
    async fn insert_many(&self, records: Vec<StateCrop>) -> DomainResult<u64>;

    /// Atomically replace every row with `records`; returns
    /// `(removed, inserted)`. On error the previous rows are kept.
    async fn replace_all(&self, records: Vec<StateCrop>) -> DomainResult<(u64, u64)>;
}
