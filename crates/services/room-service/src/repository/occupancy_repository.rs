//! Occupancy repository: rooms, their occupants, and the assignment write.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use super::entities::room::{self, Entity as RoomEntity};
use super::entities::user::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{AssignedOccupant, Occupancy, Occupant, Room, RoomWithOccupants};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Occupancy repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OccupancyRepository: Send + Sync {
    /// Find the user record behind an identity-provider subject
    async fn find_by_auth_subject(&self, subject: Uuid) -> AppResult<Option<Occupant>>;

    /// Rooms ordered by name, each with occupants ordered by creation time
    async fn list_rooms_with_occupants(&self) -> AppResult<Vec<RoomWithOccupants>>;

    /// Occupants without a room, ordered by creation time
    async fn list_unassigned(&self) -> AppResult<Vec<Occupant>>;

    /// Set (or clear) an occupant's room after re-checking capacity.
    ///
    /// The capacity check and the write share one serializable transaction.
    async fn assign_room(
        &self,
        occupant_id: Uuid,
        room_id: Option<Uuid>,
    ) -> AppResult<AssignedOccupant>;

    /// Check database connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// SeaORM-backed implementation of OccupancyRepository
pub struct OccupancyStore {
    db: DatabaseConnection,
}

impl OccupancyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Body of the assignment transaction.
    async fn assign_in(
        txn: &DatabaseTransaction,
        occupant_id: Uuid,
        room_id: Option<Uuid>,
    ) -> AppResult<AssignedOccupant> {
        let user = UserEntity::find_by_id(occupant_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let room_name = match room_id {
            None => None,
            Some(room_id) => {
                // Row lock where the backend supports it; SQLite serializes writers anyway
                let room = RoomEntity::find_by_id(room_id)
                    .lock_exclusive()
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::not_found("Room"))?;
                let room = Room::try_from(room)?;

                let count = UserEntity::find()
                    .filter(user::Column::RoomId.eq(room_id))
                    .count(txn)
                    .await?;

                let already_member = user.room_id == Some(room_id);
                let occupancy = Occupancy::new(room.capacity, count as usize);
                if let Err(e) = occupancy.check_admission(already_member) {
                    tracing::info!(
                        occupant = %occupant_id,
                        room = %room_id,
                        occupancy = %occupancy,
                        "Assignment rejected: room at capacity"
                    );
                    return Err(e.into());
                }

                Some(room.name)
            }
        };

        let mut active: UserActiveModel = user.into();
        active.room_id = Set(room_id);
        active.updated_at = Set(chrono::Utc::now());
        let updated = active.update(txn).await?;

        Ok(AssignedOccupant {
            occupant: Occupant::try_from(updated)?,
            room_id,
            room_name,
        })
    }
}

#[async_trait]
impl OccupancyRepository for OccupancyStore {
    async fn find_by_auth_subject(&self, subject: Uuid) -> AppResult<Option<Occupant>> {
        let model = UserEntity::find()
            .filter(user::Column::AuthSubject.eq(subject))
            .one(&self.db)
            .await?;

        model
            .map(Occupant::try_from)
            .transpose()
            .map_err(AppError::from)
    }

    async fn list_rooms_with_occupants(&self) -> AppResult<Vec<RoomWithOccupants>> {
        let rooms = RoomEntity::find()
            .order_by_asc(room::Column::Name)
            .order_by_asc(room::Column::Id)
            .all(&self.db)
            .await?;

        let members = UserEntity::find()
            .filter(user::Column::RoomId.is_not_null())
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        let mut by_room: HashMap<Uuid, Vec<Occupant>> = HashMap::new();
        for model in members {
            if let Some(room_id) = model.room_id {
                by_room
                    .entry(room_id)
                    .or_default()
                    .push(Occupant::try_from(model)?);
            }
        }

        rooms
            .into_iter()
            .map(|model| {
                let occupants = by_room.remove(&model.id).unwrap_or_default();
                Ok(RoomWithOccupants {
                    room: Room::try_from(model)?,
                    occupants,
                })
            })
            .collect()
    }

    async fn list_unassigned(&self) -> AppResult<Vec<Occupant>> {
        let models = UserEntity::find()
            .filter(user::Column::RoomId.is_null())
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(|m| Occupant::try_from(m).map_err(AppError::from))
            .collect()
    }

    async fn assign_room(
        &self,
        occupant_id: Uuid,
        room_id: Option<Uuid>,
    ) -> AppResult<AssignedOccupant> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::Serializable),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        match Self::assign_in(&txn, occupant_id, room_id).await {
            Ok(assigned) => {
                txn.commit().await?;
                Ok(assigned)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn ping(&self) -> AppResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
