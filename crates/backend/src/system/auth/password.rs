use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with Argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow!("Invalid stored password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Regras mínimas de senha: 8+ caracteres, ao menos uma letra e um dígito
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(anyhow!("Senha deve ter no mínimo 8 caracteres"));
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err(anyhow!("Senha deve conter ao menos uma letra"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Senha deve conter ao menos um dígito"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_rules() {
        assert!(validate_password_strength("curta1").is_err());
        assert!(validate_password_strength("somenteletras").is_err());
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("senha123").is_ok());
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("senha123").unwrap();
        assert!(verify_password("senha123", &hash).unwrap());
        assert!(!verify_password("outra456", &hash).unwrap());
    }
}
