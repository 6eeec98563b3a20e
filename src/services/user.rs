use std::time::Duration;

use redis::aio::ConnectionManager;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::cache::ListingCache;
use crate::error::{AppError, Result};
use crate::models::user;
use crate::repository::authority::AuthorityRepository;
use crate::repository::role::RoleRepository;
use crate::repository::user::{UserRepository, UserWithGrants};
use crate::schemas::page::{Page, Pageable};
use crate::services::catalog::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_FIRST_NAME, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME,
};
use crate::services::role::RoleService;
use crate::services::security;

const CACHE_NAMESPACE: &str = "users";

pub struct UserService {
    repository: UserRepository,
    role_repository: RoleRepository,
    authority_repository: AuthorityRepository,
    cache: ListingCache<Page<UserWithGrants>>,
}

impl UserService {
    pub fn new(db: DatabaseConnection, cache: Option<ConnectionManager>, ttl: Duration) -> Self {
        Self {
            repository: UserRepository::new(db.clone()),
            role_repository: RoleRepository::new(db.clone()),
            authority_repository: AuthorityRepository::new(db),
            cache: ListingCache::new(cache, CACHE_NAMESPACE, ttl),
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserWithGrants> {
        self.repository
            .get_by_ids(&[id])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    pub async fn get_all_paged(&self, pageable: &Pageable) -> Result<Page<UserWithGrants>> {
        if let Some(page) = self.cache.get(pageable).await {
            return Ok(page);
        }
        let page = self.repository.get_all_paged(pageable).await?;
        Ok(self.cache.set(pageable, page).await)
    }

    /// Persist a new user. The password is expected to be hashed already;
    /// username and email are case-normalized here.
    pub async fn create(&self, mut user: user::Model) -> Result<UserWithGrants> {
        user.username = user.username.to_lowercase();
        user.email = user.email.to_lowercase();

        let created = self
            .repository
            .create(vec![user])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("create returned no entity".to_string()))?;
        self.cache.evict().await;
        self.get_by_id(created.id).await
    }

    pub async fn update(&self, mut user: user::Model) -> Result<UserWithGrants> {
        user.username = user.username.to_lowercase();
        user.email = user.email.to_lowercase();

        let updated = self
            .repository
            .update(vec![user])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("update returned no entity".to_string()))?;
        self.cache.evict().await;
        self.get_by_id(updated.id).await
    }

    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        self.repository.delete_by_ids(ids).await?;
        self.cache.evict().await;
        Ok(())
    }

    /// Direct store read by lower-cased username, bypassing the listing cache.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserWithGrants>> {
        self.repository
            .find_by_username(&username.to_lowercase())
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        self.repository.find_by_email(&email.to_lowercase()).await
    }

    pub async fn add_roles(&self, id: Uuid, role_ids: &[Uuid]) -> Result<UserWithGrants> {
        let roles = self.role_repository.get_by_ids(role_ids).await?;
        if roles.len() != role_ids.len() {
            return Err(AppError::NotFound("role not found".to_string()));
        }

        self.repository.add_roles(id, role_ids).await?;
        self.cache.evict().await;
        self.get_by_id(id).await
    }

    pub async fn remove_roles(&self, id: Uuid, role_ids: &[Uuid]) -> Result<UserWithGrants> {
        self.repository.remove_roles(id, role_ids).await?;
        self.cache.evict().await;
        self.get_by_id(id).await
    }

    pub async fn add_authorities(
        &self,
        id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<UserWithGrants> {
        let authorities = self.authority_repository.get_by_ids(authority_ids).await?;
        if authorities.len() != authority_ids.len() {
            return Err(AppError::NotFound("authority not found".to_string()));
        }

        self.repository.add_authorities(id, authority_ids).await?;
        self.cache.evict().await;
        self.get_by_id(id).await
    }

    pub async fn remove_authorities(
        &self,
        id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<UserWithGrants> {
        self.repository.remove_authorities(id, authority_ids).await?;
        self.cache.evict().await;
        self.get_by_id(id).await
    }

    /// Compare the given password against the stored hash of the lower-cased
    /// username's row. Unknown users verify as false, not as an error.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<bool> {
        match self.find_by_username(username).await? {
            Some(user) => Ok(security::verify_password(password, &user.user.password)),
            None => Ok(false),
        }
    }

    /// Create the default admin user once and grant it the ADMIN role. An
    /// existing user is left untouched, including its role assignment.
    pub async fn bootstrap(&self, roles: &RoleService) -> Result<()> {
        if self
            .find_by_username(DEFAULT_ADMIN_USERNAME)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let admin_role = roles.find_by_name("ADMIN").await?.ok_or_else(|| {
            AppError::Internal("default admin user requires the ADMIN role seed".to_string())
        })?;

        let created = self
            .create(user::Model {
                id: Uuid::nil(),
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password: security::hash_password(DEFAULT_ADMIN_PASSWORD)?,
                first_name: DEFAULT_ADMIN_FIRST_NAME.to_string(),
                last_name: String::new(),
                email: DEFAULT_ADMIN_EMAIL.to_string(),
                phone_number: None,
                is_blocked: false,
            })
            .await?;
        self.add_roles(created.user.id, &[admin_role.role.id]).await?;

        tracing::info!("Created default admin user '{}'", DEFAULT_ADMIN_USERNAME);
        Ok(())
    }
}
