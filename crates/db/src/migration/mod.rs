//! Database migrations.

use sea_orm_migration::prelude::*;

mod m20260830_000001_initial;

/// Migrator collecting every schema migration in order.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260830_000001_initial::Migration)]
    }
}
