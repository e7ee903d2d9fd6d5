use crate::db::ConnectionPool;

use super::StoreResult;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL UNIQUE,
    encrypted_password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS pages (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS sections (
    id SERIAL PRIMARY KEY,
    page_id INTEGER NOT NULL REFERENCES pages(id),
    type TEXT NOT NULL,
    "order" INTEGER NOT NULL,
    data JSONB NOT NULL DEFAULT '{}'::jsonb,
    UNIQUE (page_id, "order")
);
"#;

/// Create the `users`, `pages` and `sections` tables when missing.
pub async fn migrate(pool: &ConnectionPool) -> StoreResult<()> {
    tracing::info!("applying content schema");

    let conn = pool.get().await?;
    conn.batch_execute(SCHEMA).await?;

    Ok(())
}
