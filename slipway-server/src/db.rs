use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create releases table. Nested collections (pipeline, linked work,
    // rollback ledger, approvers) live in JSONB; scalar columns carry the
    // fields the list queries filter and sort on.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS releases (
            id UUID PRIMARY KEY,
            version VARCHAR(100) NOT NULL,
            build_id VARCHAR(255) NOT NULL,
            product_id UUID NOT NULL,
            product_name VARCHAR(255) NOT NULL,
            platform VARCHAR(50) NOT NULL,
            status VARCHAR(50) NOT NULL,
            release_date TIMESTAMPTZ,
            planned_date TIMESTAMPTZ,
            features JSONB NOT NULL DEFAULT '[]',
            bug_fixes JSONB NOT NULL DEFAULT '[]',
            test_coverage REAL NOT NULL DEFAULT 0,
            pipeline JSONB NOT NULL DEFAULT '[]',
            rollback_logs JSONB NOT NULL DEFAULT '[]',
            release_notes TEXT,
            approval_status VARCHAR(50),
            approvers JSONB NOT NULL DEFAULT '[]',
            workspace_id UUID NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            revision BIGINT NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create approval workflows table, one workflow per feature
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS approval_workflows (
            id UUID PRIMARY KEY,
            feature_id UUID NOT NULL UNIQUE,
            workspace_id UUID NOT NULL,
            status VARCHAR(50) NOT NULL,
            current_gate_index INTEGER NOT NULL DEFAULT 0,
            gates JSONB NOT NULL DEFAULT '[]',
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            revision BIGINT NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Collaborator tables: products, features and bugs are owned by other
    // subsystems sharing this database; Slipway only reads them for name
    // resolution and tenant checks.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            workspace_id UUID NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS features (
            id UUID PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            workspace_id UUID NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bugs (
            id UUID PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            workspace_id UUID NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for the listing queries
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_releases_workspace ON releases(workspace_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_releases_workspace_status ON releases(workspace_id, status)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_releases_product ON releases(product_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_releases_created_at ON releases(created_at DESC)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_approval_workflows_workspace ON approval_workflows(workspace_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
