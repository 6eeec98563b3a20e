//! Migration: Create role-authority junction table
//!
//! Link rows are removed when either side is deleted (ON DELETE CASCADE).

use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_roles::Roles;
use super::m20260301_000003_create_authorities::Authorities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoleAuthorities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoleAuthorities::RoleId).uuid().not_null())
                    .col(
                        ColumnDef::new(RoleAuthorities::AuthorityId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RoleAuthorities::RoleId)
                            .col(RoleAuthorities::AuthorityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_authorities_role")
                            .from(RoleAuthorities::Table, RoleAuthorities::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_authorities_authority")
                            .from(RoleAuthorities::Table, RoleAuthorities::AuthorityId)
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
                    .table(RoleAuthorities::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum RoleAuthorities {
    Table,
    #[iden = "role_id"]
    RoleId,
    #[iden = "authority_id"]
    AuthorityId,
}
