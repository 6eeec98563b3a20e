use std::time::Duration;

use redis::aio::ConnectionManager;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::cache::ListingCache;
use crate::error::{AppError, Result};
use crate::models::role;
use crate::repository::role::{RoleRepository, RoleWithAuthorities};
use crate::schemas::page::{Page, Pageable};
use crate::services::authority::AuthorityService;
use crate::services::catalog::{RoleSeed, ROLE_SEEDS};

const CACHE_NAMESPACE: &str = "roles";

pub struct RoleService {
    repository: RoleRepository,
    cache: ListingCache<Page<RoleWithAuthorities>>,
}

impl RoleService {
    pub fn new(db: DatabaseConnection, cache: Option<ConnectionManager>, ttl: Duration) -> Self {
        Self {
            repository: RoleRepository::new(db),
            cache: ListingCache::new(cache, CACHE_NAMESPACE, ttl),
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RoleWithAuthorities> {
        self.repository
            .get_by_ids(&[id])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("role not found".to_string()))
    }

    pub async fn get_all_paged(&self, pageable: &Pageable) -> Result<Page<RoleWithAuthorities>> {
        if let Some(page) = self.cache.get(pageable).await {
            return Ok(page);
        }
        let page = self.repository.get_all_paged(pageable).await?;
        Ok(self.cache.set(pageable, page).await)
    }

    pub async fn create(
        &self,
        role: role::Model,
        authority_ids: &[Uuid],
    ) -> Result<RoleWithAuthorities> {
        let created = self
            .repository
            .create(vec![role])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("create returned no entity".to_string()))?;
        if !authority_ids.is_empty() {
            self.repository
                .set_authorities(created.id, authority_ids)
                .await?;
        }
        self.cache.evict().await;
        self.get_by_id(created.id).await
    }

    /// Full-row update; when `authority_ids` is given the role's authority
    /// set is replaced as well.
    pub async fn update(
        &self,
        role: role::Model,
        authority_ids: Option<&[Uuid]>,
    ) -> Result<RoleWithAuthorities> {
        let updated = self
            .repository
            .update(vec![role])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("update returned no entity".to_string()))?;
        if let Some(authority_ids) = authority_ids {
            self.repository
                .set_authorities(updated.id, authority_ids)
                .await?;
        }
        self.cache.evict().await;
        self.get_by_id(updated.id).await
    }

    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        self.repository.delete_by_ids(ids).await?;
        self.cache.evict().await;
        Ok(())
    }

    /// Direct store read, bypassing the listing cache.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<RoleWithAuthorities>> {
        self.repository.find_by_name(name).await
    }

    /// Seed the well-known roles. A missing role is created with its seed
    /// authority set; an existing one is re-saved, which replaces its stored
    /// authority set with the seed's current content on every startup.
    pub async fn bootstrap(&self, authorities: &AuthorityService) -> Result<()> {
        for seed in ROLE_SEEDS {
            self.seed_role(seed, authorities).await?;
        }
        Ok(())
    }

    async fn seed_role(&self, seed: &RoleSeed, authorities: &AuthorityService) -> Result<()> {
        let mut authority_ids = Vec::with_capacity(seed.authorities.len());
        for method in seed.authorities {
            let authority = authorities.find_by_method(method).await?.ok_or_else(|| {
                AppError::Internal(format!(
                    "role seed {} references missing authority {}",
                    seed.name, method
                ))
            })?;
            authority_ids.push(authority.id);
        }

        match self.find_by_name(seed.name).await? {
            None => {
                self.create(
                    role::Model {
                        id: Uuid::nil(),
                        name: seed.name.to_string(),
                        description: Some(seed.description.to_string()),
                    },
                    &authority_ids,
                )
                .await?;
            }
            Some(existing) => {
                self.update(
                    role::Model {
                        id: existing.role.id,
                        name: seed.name.to_string(),
                        description: Some(seed.description.to_string()),
                    },
                    Some(&authority_ids),
                )
                .await?;
            }
        }
        Ok(())
    }
}
