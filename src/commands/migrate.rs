//! Schema migration command.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Apply, roll back, or inspect schema migrations.
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Migrations are under manual control here; skip the auto-run the
    // serve path performs on connect.
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Could not reach database: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(migration_error)?;
            tracing::info!("Schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(migration_error)?;
            tracing::info!("Rolled back one migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await.map_err(migration_error)? {
                println!("{:<60} {}", name, if applied { "applied" } else { "pending" });
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration");
            db.fresh_migrations().await.map_err(migration_error)?;
            tracing::info!("Schema recreated from scratch");
        }
    }

    Ok(())
}

fn migration_error(e: sea_orm::DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {}", e))
}
