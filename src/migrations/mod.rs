pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_roles;
mod m20260301_000003_create_authorities;
mod m20260301_000004_create_user_roles;
mod m20260301_000005_create_role_authorities;
mod m20260301_000006_create_user_authorities;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_roles::Migration),
            Box::new(m20260301_000003_create_authorities::Migration),
            Box::new(m20260301_000004_create_user_roles::Migration),
            Box::new(m20260301_000005_create_role_authorities::Migration),
            Box::new(m20260301_000006_create_user_authorities::Migration),
        ]
    }
}
