//! Room database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, Room};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity, re-checking the capacity floor.
impl TryFrom<Model> for Room {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let capacity = u32::try_from(model.capacity).map_err(|_| {
            DomainError::internal(format!("Room {} has negative capacity", model.id))
        })?;

        Ok(Room {
            id: model.id,
            name: model.name,
            description: model.description,
            image_url: model.image_url,
            capacity: Room::validate_capacity(capacity)?,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
