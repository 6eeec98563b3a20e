use std::time::Duration;

use redis::aio::ConnectionManager;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::cache::ListingCache;
use crate::error::{AppError, Result};
use crate::models::authority;
use crate::repository::authority::AuthorityRepository;
use crate::schemas::page::{Page, Pageable};
use crate::services::catalog::AUTHORITY_CATALOG;

const CACHE_NAMESPACE: &str = "authorities";

pub struct AuthorityService {
    repository: AuthorityRepository,
    cache: ListingCache<Page<authority::Model>>,
}

impl AuthorityService {
    pub fn new(db: DatabaseConnection, cache: Option<ConnectionManager>, ttl: Duration) -> Self {
        Self {
            repository: AuthorityRepository::new(db),
            cache: ListingCache::new(cache, CACHE_NAMESPACE, ttl),
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<authority::Model> {
        self.repository
            .get_by_ids(&[id])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("authority not found".to_string()))
    }

    pub async fn get_all(&self) -> Result<Vec<authority::Model>> {
        self.repository.get_all().await
    }

    pub async fn get_all_paged(&self, pageable: &Pageable) -> Result<Page<authority::Model>> {
        if let Some(page) = self.cache.get(pageable).await {
            return Ok(page);
        }
        let page = self.repository.get_all_paged(pageable).await?;
        Ok(self.cache.set(pageable, page).await)
    }

    pub async fn create(&self, authority: authority::Model) -> Result<authority::Model> {
        let created = self
            .repository
            .create(vec![authority])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("create returned no entity".to_string()))?;
        self.cache.evict().await;
        Ok(created)
    }

    pub async fn update(&self, authority: authority::Model) -> Result<authority::Model> {
        let updated = self
            .repository
            .update(vec![authority])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("update returned no entity".to_string()))?;
        self.cache.evict().await;
        Ok(updated)
    }

    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        self.repository.delete_by_ids(ids).await?;
        self.cache.evict().await;
        Ok(())
    }

    /// Direct store read, bypassing the listing cache.
    pub async fn find_by_method(&self, method: &str) -> Result<Option<authority::Model>> {
        self.repository.find_by_method(method).await
    }

    /// Upsert the fixed catalog keyed by `method`: missing entries are
    /// created, existing rows are reused untouched.
    pub async fn bootstrap(&self) -> Result<()> {
        for seed in AUTHORITY_CATALOG {
            if self.find_by_method(seed.method).await?.is_none() {
                self.create(authority::Model {
                    id: Uuid::nil(),
                    method: seed.method.to_string(),
                    description: Some(seed.description.to_string()),
                })
                .await?;
            }
        }
        Ok(())
    }
}
