use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::error::Result;
use crate::models::prelude::*;
use crate::repository::base::BaseRepository;
use crate::schemas::page::{Page, Pageable};

#[derive(Clone)]
pub struct AuthorityRepository {
    base: BaseRepository<Authority>,
    db: DatabaseConnection,
}

impl AuthorityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            db,
        }
    }

    pub async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<authority::Model>> {
        self.base.get_by_ids(ids).await
    }

    pub async fn get_all(&self) -> Result<Vec<authority::Model>> {
        self.base.get_all().await
    }

    pub async fn get_all_paged(&self, pageable: &Pageable) -> Result<Page<authority::Model>> {
        self.base.get_all_paged(pageable).await
    }

    pub async fn create(&self, authorities: Vec<authority::Model>) -> Result<Vec<authority::Model>> {
        self.base.create(authorities).await
    }

    pub async fn update(&self, authorities: Vec<authority::Model>) -> Result<Vec<authority::Model>> {
        self.base.update(authorities).await
    }

    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        self.base.delete_by_ids(ids).await
    }

    /// Direct store read by unique method; `None` when no row matches.
    pub async fn find_by_method(&self, method: &str) -> Result<Option<authority::Model>> {
        Ok(Authority::find()
            .filter(authority::Column::Method.eq(method))
            .one(&self.db)
            .await?)
    }
}
