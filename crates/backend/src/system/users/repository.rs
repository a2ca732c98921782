use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

use crate::shared::data::db::get_connection;

/// Registro interno de usuário (inclui o hash da senha, que nunca sai
/// do service)
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

fn parse_ts(value: Option<String>) -> Option<DateTime<Utc>> {
    value.and_then(|s| s.parse::<DateTime<Utc>>().ok())
}

fn row_to_record(row: &QueryResult) -> Result<UserRecord> {
    let created_at = parse_ts(row.try_get("", "created_at").ok()).unwrap_or_else(Utc::now);
    let updated_at = parse_ts(row.try_get("", "updated_at").ok()).unwrap_or_else(Utc::now);
    let last_login_at = parse_ts(row.try_get("", "last_login_at").ok());

    Ok(UserRecord {
        user: User {
            id: row.try_get("", "id")?,
            username: row.try_get("", "username")?,
            email: row.try_get("", "email").ok(),
            full_name: row.try_get("", "full_name").ok(),
            is_active: row.try_get::<i32>("", "is_active").unwrap_or(0) != 0,
            is_admin: row.try_get::<i32>("", "is_admin").unwrap_or(0) != 0,
            created_at,
            updated_at,
            last_login_at,
            created_by: row.try_get("", "created_by").ok(),
        },
        password_hash: row.try_get("", "password_hash")?,
    })
}

pub async fn insert(record: &UserRecord) -> Result<()> {
    let conn = get_connection();
    let u = &record.user;
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users
            (id, username, password_hash, email, full_name, is_active, is_admin, created_at, updated_at, created_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            u.id.clone().into(),
            u.username.clone().into(),
            record.password_hash.clone().into(),
            u.email.clone().into(),
            u.full_name.clone().into(),
            (u.is_active as i32).into(),
            (u.is_admin as i32).into(),
            u.created_at.to_rfc3339().into(),
            u.updated_at.to_rfc3339().into(),
            u.created_by.clone().into(),
        ],
    ))
    .await?;
    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<UserRecord>> {
    let conn = get_connection();
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT * FROM sys_users WHERE id = ?",
            [id.into()],
        ))
        .await?;
    row.as_ref().map(row_to_record).transpose()
}

pub async fn get_by_username(username: &str) -> Result<Option<UserRecord>> {
    let conn = get_connection();
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT * FROM sys_users WHERE username = ?",
            [username.into()],
        ))
        .await?;
    row.as_ref().map(row_to_record).transpose()
}

pub async fn list_all() -> Result<Vec<User>> {
    let conn = get_connection();
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT * FROM sys_users ORDER BY username".to_string(),
        ))
        .await?;
    rows.iter()
        .map(|row| row_to_record(row).map(|r| r.user))
        .collect()
}

pub async fn count_all() -> Result<i64> {
    let conn = get_connection();
    let row = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) as cnt FROM sys_users".to_string(),
        ))
        .await?;
    Ok(row
        .and_then(|r| r.try_get::<i64>("", "cnt").ok())
        .unwrap_or(0))
}

pub async fn update_profile(
    id: &str,
    email: Option<&str>,
    full_name: Option<&str>,
    is_active: bool,
    is_admin: bool,
) -> Result<()> {
    let conn = get_connection();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET email = ?, full_name = ?, is_active = ?, is_admin = ?, updated_at = ? WHERE id = ?",
        [
            email.map(|s| s.to_string()).into(),
            full_name.map(|s| s.to_string()).into(),
            (is_active as i32).into(),
            (is_admin as i32).into(),
            Utc::now().to_rfc3339().into(),
            id.into(),
        ],
    ))
    .await?;
    Ok(())
}

pub async fn update_password_hash(id: &str, password_hash: &str) -> Result<()> {
    let conn = get_connection();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE id = ?",
        [
            password_hash.into(),
            Utc::now().to_rfc3339().into(),
            id.into(),
        ],
    ))
    .await?;
    Ok(())
}

pub async fn touch_last_login(id: &str) -> Result<()> {
    let conn = get_connection();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
        [Utc::now().to_rfc3339().into(), id.into()],
    ))
    .await?;
    Ok(())
}

/// Desativar o usuário (não há exclusão física)
pub async fn deactivate(id: &str) -> Result<bool> {
    let conn = get_connection();
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_users SET is_active = 0, updated_at = ? WHERE id = ?",
            [Utc::now().to_rfc3339().into(), id.into()],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}
