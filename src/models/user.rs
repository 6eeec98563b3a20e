use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<i64>,
    pub is_blocked: bool,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
    #[sea_orm(has_many = "super::user_authority::Entity")]
    UserAuthorities,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::Role.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::User.def().rev())
    }
}

impl Related<super::authority::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_authority::Relation::Authority.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_authority::Relation::User.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Assign a fresh random identity when inserting with the zero value.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && !has_identity(&self.id) {
            self.id = ActiveValue::Set(Uuid::new_v4());
        }
        Ok(self)
    }
}

pub(crate) fn has_identity(id: &ActiveValue<Uuid>) -> bool {
    match id {
        ActiveValue::Set(id) | ActiveValue::Unchanged(id) => !id.is_nil(),
        ActiveValue::NotSet => false,
    }
}
