use crate::database::DbResult;
use chrono::Utc;
use futures_util::future::BoxFuture;
use sea_orm::{entity::prelude::*, ActiveValue::Set, QueryOrder, QuerySelect};
use serde::Serialize;

/// Structure for a leaderboard entry. Only the name and score are
/// part of the serialized form, the identifier and submission time
/// are internal to the storage layer
#[derive(Serialize, Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leaderboard")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key, column_type = "Integer")]
    #[serde(skip)]
    pub id: i64,
    /// Name the score was submitted under
    pub name: String,
    /// The submitted score
    pub score: f64,
    /// Timestamp of the submission
    #[serde(skip)]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Retrieves the top `count` entries ordered by score descending.
    /// Entries with equal scores are ordered by insertion order, which
    /// follows submission time
    pub async fn top(db: &DatabaseConnection, count: u64) -> DbResult<Vec<Self>> {
        Entity::find()
            .order_by_desc(Column::Score)
            .order_by_asc(Column::Id)
            .limit(count)
            .all(db)
            .await
    }

    /// Stores a new entry stamped with the current time
    pub fn create(
        db: &DatabaseConnection,
        name: String,
        score: f64,
    ) -> BoxFuture<'_, DbResult<Self>> {
        ActiveModel {
            name: Set(name),
            score: Set(score),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
    }
}
