//! Migration: Create user additional-authority junction table
//!
//! Link rows are removed when either side is deleted (ON DELETE CASCADE).

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_users::Users;
use super::m20260301_000003_create_authorities::Authorities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAuthorities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserAuthorities::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserAuthorities::AuthorityId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserAuthorities::UserId)
                            .col(UserAuthorities::AuthorityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_authorities_user")
                            .from(UserAuthorities::Table, UserAuthorities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_authorities_authority")
                            .from(UserAuthorities::Table, UserAuthorities::AuthorityId)
                            .to(Authorities::Table, Authorities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(UserAuthorities::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum UserAuthorities {
    Table,
    #[iden = "user_id"]
    UserId,
    #[iden = "authority_id"]
    AuthorityId,
}
