//! Role repository: generic CRUD plus authority-set hydration and the
//! explicit link-table mutations behind "associations re-saved".

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::prelude::*;
use crate::repository::base::BaseRepository;
use crate::schemas::page::{Page, Pageable};

/// A role together with its authority set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleWithAuthorities {
    #[serde(flatten)]
    pub role: role::Model,
    pub authorities: Vec<authority::Model>,
}

#[derive(Clone)]
pub struct RoleRepository {
    base: BaseRepository<Role>,
    db: DatabaseConnection,
}

impl RoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            db,
        }
    }

    pub async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<RoleWithAuthorities>> {
        let roles = self.base.get_by_ids(ids).await?;
        self.hydrate(roles).await
    }

    pub async fn get_all(&self) -> Result<Vec<RoleWithAuthorities>> {
        let roles = self.base.get_all().await?;
        self.hydrate(roles).await
    }

    pub async fn get_all_paged(&self, pageable: &Pageable) -> Result<Page<RoleWithAuthorities>> {
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

    pub async fn create(&self, roles: Vec<role::Model>) -> Result<Vec<role::Model>> {
        self.base.create(roles).await
    }

    pub async fn update(&self, roles: Vec<role::Model>) -> Result<Vec<role::Model>> {
        self.base.update(roles).await
    }

    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        self.base.delete_by_ids(ids).await
    }

    /// Direct store read by unique name; `None` when no row matches.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<RoleWithAuthorities>> {
        let role = Role::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        match role {
            Some(role) => Ok(self.hydrate(vec![role]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Replace the role's authority set with exactly `authority_ids`.
    pub async fn set_authorities(&self, role_id: Uuid, authority_ids: &[Uuid]) -> Result<()> {
        RoleAuthority::delete_many()
            .filter(role_authority::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await?;

        if authority_ids.is_empty() {
            return Ok(());
        }

        let links = authority_ids.iter().map(|authority_id| {
            role_authority::ActiveModel {
                role_id: Set(role_id),
                authority_id: Set(*authority_id),
            }
        });
        RoleAuthority::insert_many(links)
            .on_conflict(
                OnConflict::columns([
                    role_authority::Column::RoleId,
                    role_authority::Column::AuthorityId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub(crate) async fn hydrate(
        &self,
        roles: Vec<role::Model>,
    ) -> Result<Vec<RoleWithAuthorities>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let authorities_per_role = roles
            .load_many_to_many(Authority, RoleAuthority, &self.db)
            .await?;

        Ok(roles
            .into_iter()
            .zip(authorities_per_role)
            .map(|(role, authorities)| RoleWithAuthorities { role, authorities })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::authority::AuthorityRepository;
    use crate::test_helpers::create_test_db;

    async fn seed_authorities(db: &DatabaseConnection, methods: &[&str]) -> Vec<authority::Model> {
        let repo = AuthorityRepository::new(db.clone());
        let models = methods
            .iter()
            .map(|m| authority::Model {
                id: Uuid::nil(),
                method: m.to_string(),
                description: None,
            })
            .collect();
        repo.create(models).await.unwrap()
    }

    #[tokio::test]
    async fn test_set_authorities_replaces_link_set() {
        let db = create_test_db().await;
        let repo = RoleRepository::new(db.clone());
        let authorities = seed_authorities(&db, &["A", "B", "C"]).await;

        let role = repo
            .create(vec![role::Model {
                id: Uuid::nil(),
                name: "TESTERS".to_string(),
                description: None,
            }])
            .await
            .unwrap()
            .remove(0);

        repo.set_authorities(role.id, &[authorities[0].id, authorities[1].id])
            .await
            .unwrap();
        let loaded = repo.find_by_name("TESTERS").await.unwrap().unwrap();
        assert_eq!(loaded.authorities.len(), 2);

        repo.set_authorities(role.id, &[authorities[2].id])
            .await
            .unwrap();
        let loaded = repo.find_by_name("TESTERS").await.unwrap().unwrap();
        assert_eq!(loaded.authorities.len(), 1);
        assert_eq!(loaded.authorities[0].method, "C");
    }

    #[tokio::test]
    async fn test_deleting_role_cascades_link_rows() {
        let db = create_test_db().await;
        let repo = RoleRepository::new(db.clone());
        let authorities = seed_authorities(&db, &["A"]).await;

        let role = repo
            .create(vec![role::Model {
                id: Uuid::nil(),
                name: "TESTERS".to_string(),
                description: None,
            }])
            .await
            .unwrap()
            .remove(0);
        repo.set_authorities(role.id, &[authorities[0].id])
            .await
            .unwrap();

        repo.delete_by_ids(&[role.id]).await.unwrap();

        let links = RoleAuthority::find().all(&db).await.unwrap();
        assert!(links.is_empty());
        // The shared authority itself survives.
        let remaining = Authority::find().all(&db).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_authority_cascades_link_rows_only() {
        let db = create_test_db().await;
        let repo = RoleRepository::new(db.clone());
        let authorities = seed_authorities(&db, &["A", "B"]).await;

        let role = repo
            .create(vec![role::Model {
                id: Uuid::nil(),
                name: "TESTERS".to_string(),
                description: None,
            }])
            .await
            .unwrap()
            .remove(0);
        repo.set_authorities(role.id, &[authorities[0].id, authorities[1].id])
            .await
            .unwrap();

        AuthorityRepository::new(db.clone())
            .delete_by_ids(&[authorities[0].id])
            .await
            .unwrap();

        let loaded = repo.find_by_name("TESTERS").await.unwrap().unwrap();
        assert_eq!(loaded.authorities.len(), 1);
        assert_eq!(loaded.authorities[0].method, "B");
    }
}
