use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::{CropMapRepositoryInterface, DomainResult, StateCrop};
use crate::infrastructure::database::entities::state_crop;

/// Rows per INSERT statement; keeps bound parameters well under SQLite limits.
const INSERT_CHUNK: usize = 500;

pub struct StateCropRepository {
    db: DatabaseConnection,
}

impl StateCropRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Lookup key for a state name. SQLite's LOWER() folds ASCII only, so the
/// key is lowercased here and stored next to the display name.
fn state_key(state: &str) -> String {
    state.to_lowercase()
}

async fn insert_chunked<C: ConnectionTrait>(
    conn: &C,
    records: &[StateCrop],
) -> Result<u64, DbErr> {
    let mut inserted = 0u64;

    for chunk in records.chunks(INSERT_CHUNK) {
        let models = chunk.iter().map(|r| state_crop::ActiveModel {
            id: NotSet,
            state: Set(r.state.clone()),
            state_key: Set(state_key(&r.state)),
            crop: Set(r.crop.clone()),
        });
        inserted += state_crop::Entity::insert_many(models)
            .exec_without_returning(conn)
            .await?;
    }

    Ok(inserted)
}

#[async_trait]
impl CropMapRepositoryInterface for StateCropRepository {
    async fn crops_for_state(&self, state: &str) -> DomainResult<Vec<String>> {
        let crops = state_crop::Entity::find()
            .select_only()
            .column(state_crop::Column::Crop)
            .filter(state_crop::Column::StateKey.eq(state_key(state)))
            .order_by_asc(state_crop::Column::Id)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(crops)
    }

    async fn insert_many(&self, records: Vec<StateCrop>) -> DomainResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await?;
        let inserted = insert_chunked(&txn, &records).await?;
        txn.commit().await?;
        Ok(inserted)
    }

    async fn replace_all(&self, records: Vec<StateCrop>) -> DomainResult<(u64, u64)> {
        // Dropping `txn` on an early return rolls the delete back.
        let txn = self.db.begin().await?;
        let removed = state_crop::Entity::delete_many()
            .exec(&txn)
            .await?
            .rows_affected;
        let inserted = insert_chunked(&txn, &records).await?;
        txn.commit().await?;
        Ok((removed, inserted))
    }
}
