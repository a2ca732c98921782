use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};
use uuid::Uuid;

use super::repository;
use crate::system::auth::password;

/// Create a new user
pub async fn create(dto: CreateUserDto, created_by: Option<String>) -> Result<String> {
    if dto.username.trim().is_empty() {
        return Err(anyhow::anyhow!("Nome de usuário não pode ser vazio"));
    }

    if repository::get_by_username(&dto.username).await?.is_some() {
        return Err(anyhow::anyhow!("Nome de usuário já existe"));
    }

    if let Some(ref email) = dto.email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(anyhow::anyhow!("E-mail inválido"));
        }
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: dto.username.trim().to_string(),
        email: dto.email,
        full_name: dto.full_name,
        is_active: true,
        is_admin: dto.is_admin,
        created_at: now,
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    let id = user.id.clone();
    repository::insert(&repository::UserRecord {
        user,
        password_hash,
    })
    .await?;

    Ok(id)
}

/// Verificar credenciais de login. `None` quando usuário/senha não conferem
/// ou o usuário está inativo.
pub async fn verify_credentials(username: &str, password_plain: &str) -> Result<Option<User>> {
    let record = match repository::get_by_username(username).await? {
        Some(r) => r,
        None => return Ok(None),
    };

    if !record.user.is_active {
        return Ok(None);
    }

    if !password::verify_password(password_plain, &record.password_hash)? {
        return Ok(None);
    }

    repository::touch_last_login(&record.user.id).await?;
    Ok(Some(record.user))
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    Ok(repository::get_by_id(id).await?.map(|r| r.user))
}

pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

pub async fn update(dto: UpdateUserDto) -> Result<()> {
    if repository::get_by_id(&dto.id).await?.is_none() {
        return Err(anyhow::anyhow!("Usuário não encontrado"));
    }

    if let Some(ref email) = dto.email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(anyhow::anyhow!("E-mail inválido"));
        }
    }

    repository::update_profile(
        &dto.id,
        dto.email.as_deref(),
        dto.full_name.as_deref(),
        dto.is_active,
        dto.is_admin,
    )
    .await
}

/// Trocar a senha. Quando `old_password` vem preenchida (troca pelo próprio
/// usuário), ela é conferida antes.
pub async fn change_password(dto: ChangePasswordDto) -> Result<()> {
    let record = repository::get_by_id(&dto.user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Usuário não encontrado"))?;

    if let Some(old) = &dto.old_password {
        if !password::verify_password(old, &record.password_hash)? {
            return Err(anyhow::anyhow!("Senha atual incorreta"));
        }
    }

    password::validate_password_strength(&dto.new_password)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password_hash(&dto.user_id, &new_hash).await
}

pub async fn deactivate(id: &str) -> Result<bool> {
    repository::deactivate(id).await
}
