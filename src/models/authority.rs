use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// A single named permission, e.g. "READ_ASSET". The `method` string is the
/// stable key; the id is only referenced by link tables.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authorities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub method: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_authority::Entity")]
    RoleAuthorities,
    #[sea_orm(has_many = "super::user_authority::Entity")]
    UserAuthorities,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::role_authority::Relation::Role.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::role_authority::Relation::Authority.def().rev())
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_authority::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_authority::Relation::Authority.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && !super::user::has_identity(&self.id) {
            self.id = ActiveValue::Set(Uuid::new_v4());
        }
        Ok(self)
    }
}
