//! Assignment service - operator-only board reads and room assignment.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{AssignedOccupant, Board, Container, Occupant};

use crate::repository::OccupancyRepository;
use crate::service::Session;

/// A caller whose stored role allows managing assignments.
///
/// Board reads and writes take one, so authorization happens before anything else about
/// the request is looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator(Occupant);

impl Operator {
    pub fn new(occupant: Occupant) -> Self {
        Self(occupant)
    }

    pub fn occupant(&self) -> &Occupant {
        &self.0
    }
}

/// Assignment service trait for dependency injection.
#[async_trait]
pub trait AssignmentService: Send + Sync {
    /// Resolve the caller's stored role; only admins and workers pass
    async fn authorize(&self, caller: &Session) -> AppResult<Operator>;

    /// Rooms with occupants plus the unassigned pool
    async fn board(&self, operator: &Operator) -> AppResult<Board>;

    /// Move an occupant into a room or back to the unassigned pool
    async fn assign(
        &self,
        operator: &Operator,
        occupant_id: Uuid,
        target: Container,
    ) -> AppResult<AssignedOccupant>;

    /// Check the backing store is reachable
    async fn health(&self) -> AppResult<()>;
}

/// Concrete implementation of AssignmentService using repository.
pub struct AssignmentManager {
    repo: Arc<dyn OccupancyRepository>,
}

impl AssignmentManager {
    pub fn new(repo: Arc<dyn OccupancyRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AssignmentService for AssignmentManager {
    async fn authorize(&self, caller: &Session) -> AppResult<Operator> {
        let occupant = self
            .repo
            .find_by_auth_subject(caller.subject)
            .await?
            .ok_or(AppError::Forbidden)?;

        if !occupant.role.is_operator() {
            tracing::warn!(subject = %caller.subject, role = %occupant.role, "Non-operator denied");
            return Err(AppError::Forbidden);
        }

        Ok(Operator(occupant))
    }

    async fn board(&self, _operator: &Operator) -> AppResult<Board> {
        let rooms = self.repo.list_rooms_with_occupants().await?;
        let unassigned = self.repo.list_unassigned().await?;

        Ok(Board { rooms, unassigned })
    }

    async fn assign(
        &self,
        operator: &Operator,
        occupant_id: Uuid,
        target: Container,
    ) -> AppResult<AssignedOccupant> {
        let assigned = self.repo.assign_room(occupant_id, target.room_id()).await?;
        tracing::info!(
            operator = %operator.occupant().id,
            occupant = %occupant_id,
            target = %target,
            "Room assignment updated"
        );

        Ok(assigned)
    }

    async fn health(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}
