//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, Occupant, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Subject claim issued by the identity provider
    #[sea_orm(unique)]
    pub auth_subject: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub avatar_url: Option<String>,
    /// Room reference (NULL = unassigned)
    pub room_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id",
        on_delete = "SetNull"
    )]
    Room,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Unknown role strings are rejected rather than mapped to a default.
impl TryFrom<Model> for Occupant {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: Role = model.role.parse()?;

        Ok(Occupant {
            id: model.id,
            name: model.name,
            email: model.email,
            role,
            avatar_url: model.avatar_url,
            created_at: model.created_at,
        })
    }
}
