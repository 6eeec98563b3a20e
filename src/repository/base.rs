//! Generic CRUD repository over any sea-orm entity.
//!
//! Every module instantiates this with its entity type; association loading
//! and link-table mutations live in the per-aggregate repositories that wrap
//! it. Identity assignment happens in the entities' `before_save` hooks, so
//! creating a row with the nil uuid yields a fresh random id.

use std::marker::PhantomData;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection,
    EntityTrait, IdenStatic, IntoActiveModel, Iterable, PaginatorTrait, PrimaryKeyToColumn,
    QueryFilter, QueryOrder, QuerySelect, Value,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::schemas::page::{Page, Pageable};

#[derive(Clone)]
pub struct BaseRepository<E>
where
    E: EntityTrait,
{
    db: DatabaseConnection,
    entity: PhantomData<E>,
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelBehavior + Send,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn id_column() -> Result<E::Column> {
        E::PrimaryKey::iter()
            .next()
            .map(PrimaryKeyToColumn::into_column)
            .ok_or_else(|| AppError::Internal("entity has no primary key column".to_string()))
    }

    /// Load the rows matching `ids`, in store-determined order.
    pub async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<E::Model>> {
        if ids.is_empty() {
            return Err(AppError::IllegalArgument("ids must not be empty".to_string()));
        }

        let id_column = Self::id_column()?;
        Ok(E::find()
            .filter(id_column.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?)
    }

    /// Full table scan. Intended for small reference tables.
    pub async fn get_all(&self) -> Result<Vec<E::Model>> {
        Ok(E::find().all(&self.db).await?)
    }

    /// One page of rows plus the independently-counted total.
    pub async fn get_all_paged(&self, pageable: &Pageable) -> Result<Page<E::Model>> {
        let mut query = E::find();

        if let Some(sort) = &pageable.sort {
            let column = E::Column::iter()
                .find(|c| c.as_str() == sort.field)
                .ok_or_else(|| {
                    AppError::IllegalArgument(format!("unknown sort field: {}", sort.field))
                })?;
            query = query.order_by(column, sort.order.into());
        }

        let content = query
            .offset(pageable.offset())
            .limit(pageable.size)
            .all(&self.db)
            .await?;
        let total = E::find().count(&self.db).await?;

        Ok(Page::new(content, pageable.clone()).with_total(total))
    }

    pub async fn create(&self, entities: Vec<E::Model>) -> Result<Vec<E::Model>> {
        let mut created = Vec::with_capacity(entities.len());
        for entity in entities {
            let active = entity.into_active_model().reset_all();
            created.push(active.insert(&self.db).await?);
        }
        Ok(created)
    }

    /// Full-row upsert-by-identity. Entities must already carry a real id.
    pub async fn update(&self, entities: Vec<E::Model>) -> Result<Vec<E::Model>> {
        let id_column = Self::id_column()?;
        let non_key_columns: Vec<E::Column> = E::Column::iter()
            .filter(|c| c.as_str() != id_column.as_str())
            .collect();

        let mut updated = Vec::with_capacity(entities.len());
        for entity in entities {
            let active = entity.into_active_model().reset_all();
            if is_nil_identity(&active.get(id_column)) {
                return Err(AppError::IllegalArgument(
                    "cannot update an entity without an identity".to_string(),
                ));
            }

            let model = E::insert(active)
                .on_conflict(
                    OnConflict::column(id_column)
                        .update_columns(non_key_columns.iter().copied())
                        .to_owned(),
                )
                .exec_with_returning(&self.db)
                .await?;
            updated.push(model);
        }
        Ok(updated)
    }

    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        if ids.is_empty() {
            return Err(AppError::IllegalArgument("ids must not be empty".to_string()));
        }

        let id_column = Self::id_column()?;
        E::delete_many()
            .filter(id_column.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

fn is_nil_identity(value: &ActiveValue<Value>) -> bool {
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => match v {
            Value::Uuid(None) => true,
            Value::Uuid(Some(id)) => id.is_nil(),
            _ => false,
        },
        ActiveValue::NotSet => true,
    }
}
