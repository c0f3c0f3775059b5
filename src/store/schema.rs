//! Table bootstrap. Idempotent `CREATE ... IF NOT EXISTS`; there is no migration history.

use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};

use crate::error::{AppError, ConfigError, ACCOUNT_EMAIL_CONSTRAINT};

/// Create `accounts`, `sheets` and `entries` if missing. Sheets cascade with their account,
/// entries with their sheet.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    let accounts_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL,
            surname TEXT NOT NULL,
            email TEXT NOT NULL CONSTRAINT {} UNIQUE,
            password TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        ACCOUNT_EMAIL_CONSTRAINT
    );
    let statements = [
        accounts_ddl.as_str(),
        r#"
        CREATE TABLE IF NOT EXISTS sheets (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        "CREATE INDEX IF NOT EXISTS sheets_user_id_idx ON sheets (user_id)",
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            sheet_id UUID NOT NULL REFERENCES sheets (id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            mark_count BIGINT NOT NULL DEFAULT 0,
            last_mark BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        "CREATE INDEX IF NOT EXISTS entries_sheet_id_idx ON entries (sheet_id)",
    ];
    for sql in statements {
        sqlx::query(sql).execute(pool).await?;
    }
    tracing::info!("tables ready");
    Ok(())
}

/// Create the database named in `database_url` when it is missing. Runs against the server's
/// `postgres` maintenance database, so call it before building the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (maintenance, target) = maintenance_options(database_url)?;
    let Some(target) = target else {
        return Ok(());
    };

    let mut conn = maintenance.connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&target)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        tracing::info!(database = %target, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&target)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options pointing at `postgres`, plus the target database when it needs checking.
fn maintenance_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|_| {
        AppError::Config(ConfigError::Invalid {
            key: "DATABASE_URL",
            value: database_url.to_string(),
        })
    })?;
    let target = opts
        .get_database()
        .map(str::to_owned)
        .filter(|name| !name.is_empty() && name != "postgres");
    Ok((opts.database("postgres"), target))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
