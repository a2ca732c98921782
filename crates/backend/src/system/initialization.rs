use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;
use crate::system::users;
use contracts::system::users::CreateUserDto;

/// Criar as tabelas do sistema de autenticação (sys_*), se ausentes
pub async fn apply_auth_migration() -> Result<()> {
    let conn = get_connection();

    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            email TEXT,
            full_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            last_login_at TEXT,
            created_by TEXT
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sys_refresh_tokens (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            token_hash TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT,
            revoked_at TEXT
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
        "CREATE INDEX IF NOT EXISTS idx_sys_refresh_hash ON sys_refresh_tokens(token_hash);",
    ];

    for sql in statements {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}

/// Garantir que exista ao menos um usuário administrador
pub async fn ensure_admin_user_exists() -> Result<()> {
    let total = users::repository::count_all().await?;
    if total > 0 {
        return Ok(());
    }

    tracing::warn!("No users found, creating default admin user 'admin'");
    let id = users::service::create(
        CreateUserDto {
            username: "admin".to_string(),
            password: "mudar-esta-senha1".to_string(),
            email: None,
            full_name: Some("Administrador".to_string()),
            is_admin: true,
        },
        None,
    )
    .await?;
    tracing::warn!(
        "Default admin user created (id {}). Change the password on first login.",
        id
    );

    Ok(())
}
