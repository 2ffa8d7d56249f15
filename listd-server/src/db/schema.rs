//! Schema DDL, applied on every start

use sqlx::PgPool;

/// Statements are executed one by one; the extended query protocol does
/// not accept several statements in a single prepared query.
const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS list (
        list_id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE,
        created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        modified TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS item (
        item_id SERIAL PRIMARY KEY,
        list_id INT NOT NULL REFERENCES list(list_id),
        name VARCHAR(255) NOT NULL,
        quantity INT NOT NULL,
        created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        modified TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS item_list_id_idx ON item (list_id)",
];

/// Create the `list` and `item` tables if they do not exist yet.
pub async fn apply(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("applying database schema");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
