//! User repository: generic CRUD plus hydration of the full grant graph
//! (roles with their authorities, and per-user additional authorities).

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::repository::base::BaseRepository;
use crate::repository::role::RoleWithAuthorities;
use crate::schemas::page::{Page, Pageable};

/// A user snapshot with roles and additional authorities loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithGrants {
    #[serde(flatten)]
    pub user: user::Model,
    pub roles: Vec<RoleWithAuthorities>,
    #[serde(rename = "authorities")]
    pub additional_authorities: Vec<authority::Model>,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository<User>,
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            db,
        }
    }

    pub async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserWithGrants>> {
        let users = self.base.get_by_ids(ids).await?;
        self.hydrate(users).await
    }

    pub async fn get_all(&self) -> Result<Vec<UserWithGrants>> {
        let users = self.base.get_all().await?;
        self.hydrate(users).await
    }

    pub async fn get_all_paged(&self, pageable: &Pageable) -> Result<Page<UserWithGrants>> {
        let page = self.base.get_all_paged(pageable).await?;
        let Page {
            content,
            pageable,
            total_elements,
            total_pages,
        } = page;
        let content = self.hydrate(content).await?;
        Ok(Page {
            content,
            pageable,
            total_elements,
            total_pages,
        })
    }

    pub async fn create(&self, users: Vec<user::Model>) -> Result<Vec<user::Model>> {
        self.base.create(users).await
    }

    pub async fn update(&self, users: Vec<user::Model>) -> Result<Vec<user::Model>> {
        self.base.update(users).await
    }

    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        self.base.delete_by_ids(ids).await
    }

    /// Direct store read by unique username, grants preloaded. The caller is
    /// expected to pass an already lower-cased username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserWithGrants>> {
        let user = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        match user {
            Some(user) => Ok(self.hydrate(vec![user]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Direct store read by unique email, without grant loading.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    pub async fn add_roles(&self, id: Uuid, role_ids: &[Uuid]) -> Result<()> {
        if role_ids.is_empty() {
            return Err(AppError::IllegalArgument("ids must not be empty".to_string()));
        }

        let links = role_ids.iter().map(|role_id| user_role::ActiveModel {
            user_id: Set(id),
            role_id: Set(*role_id),
        });
        UserRole::insert_many(links)
            .on_conflict(
                OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn remove_roles(&self, id: Uuid, role_ids: &[Uuid]) -> Result<()> {
        if role_ids.is_empty() {
            return Err(AppError::IllegalArgument("ids must not be empty".to_string()));
        }

        UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .filter(user_role::Column::RoleId.is_in(role_ids.iter().copied()))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn add_authorities(&self, id: Uuid, authority_ids: &[Uuid]) -> Result<()> {
        if authority_ids.is_empty() {
            return Err(AppError::IllegalArgument("ids must not be empty".to_string()));
        }

        let links = authority_ids
            .iter()
            .map(|authority_id| user_authority::ActiveModel {
                user_id: Set(id),
                authority_id: Set(*authority_id),
            });
        UserAuthority::insert_many(links)
            .on_conflict(
                OnConflict::columns([
                    user_authority::Column::UserId,
                    user_authority::Column::AuthorityId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn remove_authorities(&self, id: Uuid, authority_ids: &[Uuid]) -> Result<()> {
        if authority_ids.is_empty() {
            return Err(AppError::IllegalArgument("ids must not be empty".to_string()));
        }

        UserAuthority::delete_many()
            .filter(user_authority::Column::UserId.eq(id))
            .filter(user_authority::Column::AuthorityId.is_in(authority_ids.iter().copied()))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn hydrate(&self, users: Vec<user::Model>) -> Result<Vec<UserWithGrants>> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let roles_per_user = users.load_many_to_many(Role, UserRole, &self.db).await?;
        let additional_per_user = users
            .load_many_to_many(Authority, UserAuthority, &self.db)
            .await?;

        // One batched authority load for every role that appeared above.
        let role_counts: Vec<usize> = roles_per_user.iter().map(|roles| roles.len()).collect();
        let flat_roles: Vec<role::Model> = roles_per_user.into_iter().flatten().collect();
        let authorities_per_role = flat_roles
            .load_many_to_many(Authority, RoleAuthority, &self.db)
            .await?;
        let mut hydrated_roles = flat_roles
            .into_iter()
            .zip(authorities_per_role)
            .map(|(role, authorities)| RoleWithAuthorities { role, authorities });

        let mut result = Vec::with_capacity(users.len());
        for ((user, count), additional_authorities) in users
            .into_iter()
            .zip(role_counts)
            .zip(additional_per_user)
        {
            let roles = (&mut hydrated_roles).take(count).collect();
            result.push(UserWithGrants {
                user,
                roles,
                additional_authorities,
            });
        }
        Ok(result)
    }
}
